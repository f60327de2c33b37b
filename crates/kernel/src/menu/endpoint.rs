//! Commerce endpoint URL resolution.
//!
//! The commerce platform renders each menu entry by asking for its
//! endpoint's URL one key at a time. Injected keys have no real endpoint, so
//! their URL has to come from here.

use accord_sdk::types::{Surface, custom_id};
use tracing::debug;

use super::{commerce_base, membership_base, resolve_custom_item};
use crate::host::MenuHost;
use crate::tap::{MenuTap, RequestState};

/// URL for a commerce endpoint key, or `fallback` (the platform's own URL).
///
/// - `custom-{id}`: the custom item's URL when it targets the commerce menu
///   and the viewer may see it; otherwise `fallback`. Unknown ids fall
///   through.
/// - With integration on, a key borrowed from the membership menu resolves to
///   that item's URL. Keys the commerce platform owns itself keep `fallback`.
pub fn resolve_endpoint_url(
    host: &MenuHost,
    state: &RequestState,
    endpoint: &str,
    fallback: String,
) -> String {
    let Some(_running) = state.enter(MenuTap::CommerceEndpointUrl) else {
        return fallback;
    };

    let settings = state.settings();
    if settings.is_passthrough() {
        return fallback;
    }

    if let Some(id) = custom_id(endpoint)
        && let Some(item) = settings.custom_item(id)
    {
        if !item.target.includes(Surface::Commerce) {
            debug!(endpoint, "custom item is not on the commerce menu, keeping fallback");
            return fallback;
        }
        return resolve_custom_item(host, state, item).unwrap_or(fallback);
    }

    if settings.integration_enabled && host.has_membership() {
        let commerce_owns =
            commerce_base(host, state).contains_key(endpoint) && !settings.is_hidden(endpoint);
        if !commerce_owns {
            let membership = membership_base(host, state);
            if let Some(item) = membership.get(endpoint)
                && !item.url.is_empty()
            {
                return item.url.clone();
            }
        }
    }

    fallback
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::host::{FixtureCommerce, FixtureMembership, FixtureSite};
    use crate::settings::SettingsSnapshot;
    use accord_sdk::types::{CustomItem, CustomItemKind, MenuLink, MenuTarget, Viewer};
    use std::sync::Arc;

    const FALLBACK: &str = "https://example.com/my-account/fallback/";

    fn host() -> MenuHost {
        let membership = FixtureMembership::new([
            ("listings", MenuLink::resolved("Listings", "https://example.com/l/", 20)),
            ("dashboard", MenuLink::resolved("Home", "https://example.com/home/", 10)),
        ]);
        let commerce = FixtureCommerce::new(
            [("dashboard", "Dashboard"), ("orders", "Orders")],
            "https://example.com/my-account/",
        );
        MenuHost::builder(Arc::new(FixtureSite::new("https://example.com")))
            .membership(Arc::new(membership))
            .commerce(Arc::new(commerce))
            .build()
    }

    fn x_item(target: MenuTarget) -> CustomItem {
        CustomItem::new(
            3,
            "X",
            CustomItemKind::Url {
                url: "https://example.com/x".into(),
            },
        )
        .target(target)
    }

    fn resolve(settings: SettingsSnapshot, viewer: Viewer, endpoint: &str) -> String {
        let state = RequestState::new(viewer, settings);
        resolve_endpoint_url(&host(), &state, endpoint, FALLBACK.to_string())
    }

    fn integration(custom_items: Vec<CustomItem>) -> SettingsSnapshot {
        SettingsSnapshot {
            integration_enabled: true,
            custom_items,
            ..SettingsSnapshot::default()
        }
    }

    #[test]
    fn commerce_custom_item_resolves() {
        let url = resolve(
            integration(vec![x_item(MenuTarget::Commerce)]),
            Viewer::anonymous(),
            "custom-3",
        );
        assert_eq!(url, "https://example.com/x");
    }

    #[test]
    fn membership_custom_item_keeps_fallback() {
        let url = resolve(
            integration(vec![x_item(MenuTarget::Membership)]),
            Viewer::anonymous(),
            "custom-3",
        );
        assert_eq!(url, FALLBACK);
    }

    #[test]
    fn hidden_custom_item_keeps_fallback() {
        let url = resolve(
            integration(vec![x_item(MenuTarget::Both).roles(["editor"])]),
            Viewer::anonymous(),
            "custom-3",
        );
        assert_eq!(url, FALLBACK);
    }

    #[test]
    fn borrowed_membership_item_resolves() {
        let url = resolve(integration(vec![]), Viewer::anonymous(), "listings");
        assert_eq!(url, "https://example.com/l/");
    }

    #[test]
    fn commerce_keeps_its_own_keys() {
        let url = resolve(integration(vec![]), Viewer::anonymous(), "dashboard");
        assert_eq!(url, FALLBACK);
    }

    #[test]
    fn hidden_commerce_key_resolves_to_membership() {
        let mut settings = integration(vec![]);
        settings.hidden_commerce_keys.insert("dashboard".into());
        let url = resolve(settings, Viewer::anonymous(), "dashboard");
        assert_eq!(url, "https://example.com/home/");
    }

    #[test]
    fn custom_only_does_not_borrow() {
        let settings = SettingsSnapshot {
            custom_only_enabled: true,
            ..SettingsSnapshot::default()
        };
        assert_eq!(resolve(settings, Viewer::anonymous(), "listings"), FALLBACK);
    }

    #[test]
    fn passthrough_keeps_fallback() {
        let settings = SettingsSnapshot {
            custom_items: vec![x_item(MenuTarget::Commerce)],
            ..SettingsSnapshot::default()
        };
        assert_eq!(resolve(settings, Viewer::anonymous(), "custom-3"), FALLBACK);
    }

    #[test]
    fn reentry_keeps_fallback() {
        let state = RequestState::new(
            Viewer::anonymous(),
            integration(vec![x_item(MenuTarget::Commerce)]),
        );
        let _outer = state.enter(MenuTap::CommerceEndpointUrl).unwrap();
        let url = resolve_endpoint_url(&host(), &state, "custom-3", FALLBACK.to_string());
        assert_eq!(url, FALLBACK);
    }
}
