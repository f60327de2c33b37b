//! Commerce menu composition.

use accord_sdk::item_map::ItemMap;
use accord_sdk::types::{CommerceMenu, MenuTarget, Surface, is_reserved_key};
use tracing::debug;

use super::{
    BORROWED_MEMBERSHIP_START, COMMERCE_NATIVE_POSITION, CUSTOM_COMMERCE_START, POSITION_STEP,
    membership_base, position_order, resolve_custom_item,
};
use crate::host::MenuHost;
use crate::tap::{MenuTap, RequestState};

/// A commerce entry before positions are dropped.
struct Row {
    label: String,
    position: i32,
}

/// Rebuild the commerce menu.
///
/// Starts from the menu the earlier filters produced, minus hidden and
/// reserved keys. With integration on, native membership items are borrowed
/// ahead of the commerce items; custom items targeting this surface follow.
/// Membership-only custom items are removed at the end whatever happened
/// before. Output is `endpoint → label`, stably sorted by position.
pub fn compose_commerce_menu(
    host: &MenuHost,
    state: &RequestState,
    items: CommerceMenu,
) -> CommerceMenu {
    let Some(_running) = state.enter(MenuTap::CommerceMenu) else {
        debug!(surface = "commerce", "composition already running, passing through");
        return items;
    };

    let settings = state.settings();
    if settings.is_passthrough() {
        let mut items = items;
        items.retain(|endpoint, _| !settings.is_hidden(endpoint));
        return items;
    }

    let mut merged: ItemMap<Row> = ItemMap::with_capacity(items.len());
    for (endpoint, label) in items {
        if settings.is_hidden(&endpoint) {
            continue;
        }
        if is_reserved_key(&endpoint) {
            debug!(endpoint = %endpoint, "scrubbing reserved key from commerce menu");
            continue;
        }
        merged.insert(
            endpoint,
            Row {
                label,
                position: COMMERCE_NATIVE_POSITION,
            },
        );
    }

    if settings.integration_enabled && host.has_membership() {
        let mut position = BORROWED_MEMBERSHIP_START;
        for (key, item) in membership_base(host, state) {
            let row = Row {
                label: item.label,
                position,
            };
            if merged.insert_if_absent(key, row) {
                position += POSITION_STEP;
            }
        }
    }

    let mut next_default = CUSTOM_COMMERCE_START;
    for item in settings.custom_items_for(Surface::Commerce) {
        if resolve_custom_item(host, state, item).is_none() {
            continue;
        }
        let position = item.position.map(position_order).unwrap_or(next_default);
        merged.insert(
            item.key(),
            Row {
                label: item.label.clone(),
                position,
            },
        );
        next_default += POSITION_STEP;
    }

    for item in &settings.custom_items {
        if item.target == MenuTarget::Membership && merged.remove(&item.key()).is_some() {
            debug!(id = item.id, "removed membership-only custom item from commerce menu");
        }
    }

    merged.sort_by_key(|_, row| row.position);
    debug!(surface = "commerce", items = merged.len(), "composed menu");
    merged.map_values(|_, row| row.label)
}
