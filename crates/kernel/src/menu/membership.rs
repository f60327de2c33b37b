//! Membership menu composition.

use accord_sdk::types::{MembershipMenu, MenuLink, NativeItem, Surface};
use tracing::debug;

use super::{
    BORROWED_COMMERCE_ORDER, CUSTOM_MEMBERSHIP_DEFAULT_ORDER, commerce_base, membership_base,
    position_order, resolve_custom_item,
};
use crate::host::MenuHost;
use crate::tap::{MenuTap, RequestState};

/// Rebuild the membership menu.
///
/// Native membership items come first in their own order, then custom items
/// targeting this surface, then (with integration on) visible commerce
/// endpoints at a fixed order. The result is stably sorted by order.
///
/// `items` is what the earlier filters produced; it is returned untouched in
/// pass-through mode, on re-entry and when the membership platform is absent.
pub fn compose_membership_menu(
    host: &MenuHost,
    state: &RequestState,
    items: MembershipMenu,
) -> MembershipMenu {
    let Some(_running) = state.enter(MenuTap::MembershipMenu) else {
        debug!(surface = "membership", "composition already running, passing through");
        return items;
    };

    let settings = state.settings();
    if settings.is_passthrough() {
        return items;
    }
    if !host.has_membership() {
        debug!(surface = "membership", "membership platform absent, passing through");
        return items;
    }

    let mut result = membership_base(host, state);

    for item in settings.custom_items_for(Surface::Membership) {
        let Some(url) = resolve_custom_item(host, state, item) else {
            continue;
        };
        let order = item
            .position
            .map(position_order)
            .unwrap_or(CUSTOM_MEMBERSHIP_DEFAULT_ORDER);
        result.insert(
            item.key(),
            NativeItem {
                label: item.label.clone(),
                url,
                order,
            },
        );
    }

    if settings.integration_enabled && host.has_commerce() {
        for (endpoint, label) in commerce_base(host, state) {
            if settings.is_hidden(&endpoint) || result.contains_key(&endpoint) {
                continue;
            }
            let url = host.commerce_endpoint_url(state, &endpoint);
            if url.trim().is_empty() {
                debug!(endpoint = %endpoint, "skipping commerce endpoint without a url");
                continue;
            }
            result.insert_if_absent(
                endpoint,
                NativeItem {
                    label,
                    url,
                    order: BORROWED_COMMERCE_ORDER,
                },
            );
        }
    }

    result.sort_by_key(|_, item| item.order);
    debug!(surface = "membership", items = result.len(), "composed menu");
    result.map_values(|_, item| MenuLink::from(item))
}
