//! Native item adapters.
//!
//! Each adapter pulls its platform's menu through the host with the engine's
//! own filter detached, scrubs reserved keys and memoizes the result in the
//! request state. An uninstalled platform yields an empty, memoized menu.

use accord_sdk::item_map::ItemMap;
use accord_sdk::types::{CommerceMenu, MembershipMenu, NativeItem, RouteParams, is_reserved_key};
use tracing::debug;

use super::{ENHANCER_NAME, MEMBERSHIP_DEFAULT_ORDER};
use crate::host::MenuHost;
use crate::tap::{MenuTap, RequestState};

/// Native membership items, normalized and memoized for the request.
pub fn membership_base(host: &MenuHost, state: &RequestState) -> ItemMap<NativeItem> {
    if let Some(items) = state.membership_base() {
        return items.clone();
    }
    if !host.has_membership() {
        return state.remember_membership_base(ItemMap::new());
    }

    let raw = {
        let _detached = state.detach(MenuTap::MembershipMenu, ENHANCER_NAME);
        host.membership_menu(state)
    };
    let items = normalize_membership(host, raw);
    debug!(surface = "membership", items = items.len(), "pulled native menu");
    state.remember_membership_base(items)
}

/// Native commerce items, memoized for the request.
pub fn commerce_base(host: &MenuHost, state: &RequestState) -> CommerceMenu {
    if let Some(items) = state.commerce_base() {
        return items.clone();
    }
    if !host.has_commerce() {
        return state.remember_commerce_base(CommerceMenu::new());
    }

    let mut items = {
        let _detached = state.detach(MenuTap::CommerceMenu, ENHANCER_NAME);
        host.commerce_menu(state)
    };
    items.retain(|key, _| keep_native(key, "commerce"));
    debug!(surface = "commerce", items = items.len(), "pulled native menu");
    state.remember_commerce_base(items)
}

/// Label defaults to the key, URL comes from `url` or the item's route,
/// order from `_order` then `order`. Items without a URL are dropped.
fn normalize_membership(host: &MenuHost, raw: MembershipMenu) -> ItemMap<NativeItem> {
    let mut items = ItemMap::with_capacity(raw.len());
    for (key, link) in raw {
        if !keep_native(&key, "membership") {
            continue;
        }

        let url = link
            .url
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                link.route
                    .as_deref()
                    .filter(|route| !route.is_empty())
                    .and_then(|route| host.route_url(route, &RouteParams::new()))
            })
            .filter(|url| !url.trim().is_empty());
        let Some(url) = url else {
            debug!(key = %key, "dropping native membership item without a url");
            continue;
        };

        let order = link
            .sort_order
            .or(link.order)
            .unwrap_or(MEMBERSHIP_DEFAULT_ORDER);
        let label = link
            .label
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| key.clone());
        items.insert(key, NativeItem { label, url, order });
    }
    items
}

fn keep_native(key: &str, surface: &'static str) -> bool {
    if is_reserved_key(key) {
        debug!(surface, key = %key, "scrubbing reserved key from native menu");
        return false;
    }
    true
}
