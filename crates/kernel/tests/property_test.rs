#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Property tests over randomly configured sites and settings.

mod common;

use accord_kernel::host::MenuHost;
use accord_sdk::types::{MenuLink, custom_id, is_reserved_key};
use accord_test_utils::{TestSettings, native_link, test_settings, url_item};
use common::{alice, host_with, request};
use proptest::prelude::*;

const TARGETS: [&str; 3] = ["membership", "commerce", "both"];

fn on_membership(target: usize) -> bool {
    TARGETS[target] != "commerce"
}

fn on_commerce(target: usize) -> bool {
    TARGETS[target] != "membership"
}

/// A site whose native menus carry stray reserved keys.
fn site(stray: &[u32]) -> MenuHost {
    let mut membership: Vec<(String, MenuLink)> = vec![
        (
            "listings".to_string(),
            native_link("Listings", "https://example.com/l/", 10),
        ),
        (
            "orders".to_string(),
            native_link("My Orders", "https://example.com/o/", 40),
        ),
    ];
    let mut commerce: Vec<(String, String)> = vec![
        ("dashboard".to_string(), "Dashboard".to_string()),
        ("orders".to_string(), "Orders".to_string()),
        ("downloads".to_string(), "Downloads".to_string()),
    ];
    for n in stray {
        membership.push((
            format!("custom-{n}"),
            native_link("Stray", "https://example.com/stray/", 5),
        ));
        commerce.push((format!("custom-{n}"), "Stray".to_string()));
    }

    host_with(
        Some(membership.iter().map(|(k, v)| (k.as_str(), v.clone())).collect()),
        Some(commerce.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()),
    )
}

fn settings(targets: &[usize], positions: &[Option<u32>], mode: u8, hide: bool) -> TestSettings {
    let mut settings = test_settings();
    if mode & 1 != 0 {
        settings = settings.integration();
    }
    if mode & 2 != 0 {
        settings = settings.custom_only();
    }
    if hide {
        settings = settings.hide("orders");
    }
    for (i, target) in targets.iter().enumerate() {
        let mut item = url_item(&format!("Item {i}"), &format!("https://example.com/item/{i}"))
            .target(TARGETS[*target]);
        if let Some(Some(position)) = positions.get(i) {
            item = item.at(*position);
        }
        settings = settings.with_item(item);
    }
    settings
}

proptest! {
    #[test]
    fn prop_custom_items_land_only_on_their_targets(
        targets in prop::collection::vec(0usize..3, 0..6),
        positions in prop::collection::vec(prop::option::of(0u32..1000), 0..6),
        stray in prop::collection::vec(0u32..10, 0..3),
        mode in 1u8..4,
        hide in any::<bool>(),
    ) {
        let host = site(&stray);
        let state = request(&settings(&targets, &positions, mode, hide), alice());

        let membership = host.membership_menu(&state);
        for key in membership.keys().filter(|k| is_reserved_key(k)) {
            let id = custom_id(key).unwrap() as usize;
            prop_assert!(id < targets.len(), "stray key {} leaked into membership", key);
            prop_assert!(on_membership(targets[id]), "{} is not a membership item", key);
        }

        let commerce = host.commerce_menu(&state);
        for key in commerce.keys().filter(|k| is_reserved_key(k)) {
            let id = custom_id(key).unwrap() as usize;
            prop_assert!(id < targets.len(), "stray key {} leaked into commerce", key);
            prop_assert!(on_commerce(targets[id]), "{} is not a commerce item", key);
        }

        for (id, target) in targets.iter().enumerate() {
            let key = format!("custom-{id}");
            prop_assert_eq!(membership.contains_key(&key), on_membership(*target));
            prop_assert_eq!(commerce.contains_key(&key), on_commerce(*target));
        }
    }

    #[test]
    fn prop_membership_output_is_sorted_and_resolved(
        targets in prop::collection::vec(0usize..3, 0..6),
        positions in prop::collection::vec(prop::option::of(0u32..1000), 0..6),
        mode in 1u8..4,
        hide in any::<bool>(),
    ) {
        let host = site(&[]);
        let state = request(&settings(&targets, &positions, mode, hide), alice());

        let menu = host.membership_menu(&state);
        let orders: Vec<i32> = menu.values().map(|link| link.order.unwrap()).collect();
        prop_assert!(orders.windows(2).all(|w| w[0] <= w[1]), "unsorted: {:?}", orders);
        for link in menu.values() {
            prop_assert!(!link.url.as_deref().unwrap_or("").trim().is_empty());
        }
        if hide {
            // The membership item of the same name stays.
            prop_assert_eq!(
                menu.get("orders").and_then(|link| link.label.as_deref()),
                Some("My Orders")
            );
        }
    }

    #[test]
    fn prop_composition_is_deterministic(
        targets in prop::collection::vec(0usize..3, 0..6),
        positions in prop::collection::vec(prop::option::of(0u32..1000), 0..6),
        mode in 0u8..4,
    ) {
        let host = site(&[]);
        let settings = settings(&targets, &positions, mode, false);

        let first = request(&settings, alice());
        let second = request(&settings, alice());
        prop_assert_eq!(host.membership_menu(&first), host.membership_menu(&second));
        prop_assert_eq!(host.commerce_menu(&first), host.commerce_menu(&second));
    }

    #[test]
    fn prop_passthrough_only_hides(
        targets in prop::collection::vec(0usize..3, 0..6),
        stray in prop::collection::vec(0u32..10, 0..3),
        hide in any::<bool>(),
    ) {
        let host = site(&stray);
        let state = request(&settings(&targets, &[], 0, hide), alice());

        let membership = host.membership_menu(&state);
        prop_assert_eq!(membership.len(), 2 + distinct(&stray));

        let commerce = host.commerce_menu(&state);
        prop_assert_eq!(commerce.contains_key("orders"), !hide);
        let expected = 3 + distinct(&stray) - usize::from(hide);
        prop_assert_eq!(commerce.len(), expected);
    }
}

fn distinct(values: &[u32]) -> usize {
    let mut values = values.to_vec();
    values.sort_unstable();
    values.dedup();
    values.len()
}
