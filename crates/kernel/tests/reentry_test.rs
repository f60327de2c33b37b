#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for filters that call back into the host.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use accord_kernel::host::{FixtureCommerce, FixtureMembership, FixtureSite, MenuHost};
use accord_kernel::menu;
use accord_kernel::tap::{MenuFilter, MenuTap, RequestState};
use accord_sdk::host::{CommerceMenuSource, MembershipMenuSource};
use accord_sdk::types::{CommerceMenu, MembershipMenu, MenuLink};
use accord_test_utils::{assert, native_link, test_settings};
use common::{alice, request, site_fixture, test_host};

/// A commerce filter that reads the membership menu before adding its own
/// endpoint.
struct LoyaltyPoints;

impl MenuFilter for LoyaltyPoints {
    fn commerce_menu(
        &self,
        host: &MenuHost,
        state: &RequestState,
        mut items: CommerceMenu,
    ) -> CommerceMenu {
        if !host.membership_menu(state).is_empty() {
            items.insert("loyalty", "Loyalty".to_string());
        }
        items
    }
}

/// A membership filter that reads the commerce menu before adding a link.
struct ShopLink;

impl MenuFilter for ShopLink {
    fn membership_menu(
        &self,
        host: &MenuHost,
        state: &RequestState,
        mut items: MembershipMenu,
    ) -> MembershipMenu {
        if !host.commerce_menu(state).is_empty() {
            items.insert("shop", native_link("Shop", "https://example.com/shop/", 50));
        }
        items
    }
}

#[test]
fn test_commerce_filter_reading_membership_menu_terminates() {
    let host = test_host();
    host.taps()
        .register(MenuTap::CommerceMenu, "loyalty_points", 0, Arc::new(LoyaltyPoints));
    let state = request(&test_settings().integration(), alice());

    let commerce = host.commerce_menu(&state);
    assert::keys(
        &commerce,
        &[
            "listings",
            "messages",
            "dashboard",
            "orders",
            "downloads",
            "edit-account",
            "customer-logout",
            "loyalty",
        ],
    );

    let membership = host.membership_menu(&state);
    assert::keys(
        &membership,
        &[
            "listings",
            "messages",
            "orders",
            "dashboard",
            "downloads",
            "edit-account",
            "customer-logout",
            "loyalty",
        ],
    );
    assert_eq!(
        membership.get("loyalty").unwrap().url.as_deref(),
        Some("https://example.com/my-account/loyalty/")
    );
}

#[test]
fn test_membership_filter_reading_commerce_menu_terminates() {
    let host = test_host();
    host.taps()
        .register(MenuTap::MembershipMenu, "shop_link", 0, Arc::new(ShopLink));
    let state = request(&test_settings().integration(), alice());

    let membership = host.membership_menu(&state);
    assert::keys(
        &membership,
        &[
            "listings",
            "messages",
            "shop",
            "orders",
            "dashboard",
            "downloads",
            "edit-account",
            "customer-logout",
        ],
    );

    let commerce = host.commerce_menu(&state);
    assert::keys(
        &commerce,
        &[
            "listings",
            "messages",
            "shop",
            "dashboard",
            "orders",
            "downloads",
            "edit-account",
            "customer-logout",
        ],
    );
    assert_eq!(
        host.commerce_endpoint_url(&state, "shop"),
        "https://example.com/shop/"
    );
}

#[test]
fn test_running_composition_passes_input_through() {
    let host = test_host();
    let state = request(&test_settings().integration(), alice());

    let _running = state.enter(MenuTap::MembershipMenu).unwrap();
    assert_eq!(
        host.membership_menu(&state),
        site_fixture().membership.unwrap()
    );
}

#[test]
fn test_detached_engine_is_skipped() {
    let host = test_host();
    let state = request(&test_settings().integration(), alice());

    let _detached = state.detach(MenuTap::CommerceMenu, menu::ENHANCER_NAME);
    assert_eq!(
        host.commerce_menu(&state),
        site_fixture().commerce.unwrap().items
    );
}

struct CountingMembership {
    inner: FixtureMembership,
    pulls: AtomicUsize,
}

impl MembershipMenuSource for CountingMembership {
    fn items(&self) -> MembershipMenu {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        self.inner.items()
    }
}

struct CountingCommerce {
    inner: FixtureCommerce,
    pulls: AtomicUsize,
}

impl CommerceMenuSource for CountingCommerce {
    fn items(&self) -> CommerceMenu {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        self.inner.items()
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        self.inner.endpoint_url(endpoint)
    }
}

#[test]
fn test_native_menus_pulled_once_per_request() {
    let membership = Arc::new(CountingMembership {
        inner: FixtureMembership::new([
            ("listings", MenuLink::resolved("Listings", "https://example.com/l/", 10)),
            ("messages", MenuLink::resolved("Messages", "https://example.com/m/", 20)),
        ]),
        pulls: AtomicUsize::new(0),
    });
    let commerce = Arc::new(CountingCommerce {
        inner: FixtureCommerce::new(
            [("dashboard", "Dashboard"), ("orders", "Orders")],
            "https://example.com/my-account/",
        ),
        pulls: AtomicUsize::new(0),
    });
    let host = MenuHost::builder(Arc::new(FixtureSite::new("https://example.com")))
        .membership(Arc::clone(&membership) as Arc<dyn MembershipMenuSource>)
        .commerce(Arc::clone(&commerce) as Arc<dyn CommerceMenuSource>)
        .build();
    menu::install(&host);
    let state = request(&test_settings().integration(), alice());

    host.membership_menu(&state);
    let commerce_menu = host.commerce_menu(&state);
    for endpoint in commerce_menu.keys() {
        host.commerce_endpoint_url(&state, endpoint);
    }

    // One render of each surface plus one native pull each.
    assert_eq!(membership.pulls.load(Ordering::SeqCst), 2);
    assert_eq!(commerce.pulls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_fresh_request_pulls_again() {
    let host = test_host();
    let before = request(&test_settings(), alice());
    let after = request(&test_settings().integration(), alice());

    assert_eq!(
        host.commerce_menu(&before),
        site_fixture().commerce.unwrap().items
    );
    assert::has_key(&host.commerce_menu(&after), "listings");
}
