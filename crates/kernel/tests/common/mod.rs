#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Every test builds its host from a static fixture with the real engine
//! installed on its taps, then runs the same entry points a platform would.

#![allow(dead_code)]

use std::sync::Arc;

use accord_kernel::host::{FixtureCommerce, FixtureMembership, FixtureRouter, FixtureSite};
use accord_kernel::host::{MenuHost, SiteFixture, UserFixture};
use accord_kernel::menu;
use accord_kernel::settings::SettingsSnapshot;
use accord_kernel::tap::RequestState;
use accord_sdk::types::{MenuLink, Viewer};
use accord_test_utils::TestSettings;
use uuid::Uuid;

pub const HOME: &str = "https://example.com";

/// Fixture shared by most tests.
pub const SITE: &str = r#"
home_url: https://example.com
membership:
  listings:
    label: Listings
    route: listings_edit_page
    _order: 10
  messages:
    label: Messages
    url: https://example.com/account/messages/
    order: 20
  orders:
    label: Listing Orders
    route: listing_orders_page
commerce:
  endpoint_base: https://example.com/my-account/
  items:
    dashboard: Dashboard
    orders: Orders
    downloads: Downloads
    edit-account: Account details
    customer-logout: Logout
routes:
  listings_edit_page: /account/listings/
  listing_orders_page: /account/orders/
  user_view_page: /?user_id={user}
  vendor_view_page: /vendor/{vendor_id}/
pages:
  12: https://example.com/help/
users:
  00000000-0000-0000-0000-0000000a11ce:
    login: alice
    nicename: alice
    vendor: "31"
  00000000-0000-0000-0000-000000000b0b:
    login: ""
    nicename: bob-the-builder
"#;

pub fn alice_id() -> Uuid {
    Uuid::from_u128(0xa11ce)
}

pub fn bob_id() -> Uuid {
    Uuid::from_u128(0xb0b)
}

/// Alice: a customer with a vendor profile.
pub fn alice() -> Viewer {
    Viewer::authenticated(alice_id(), ["customer"])
}

/// Bob: a subscriber with only a nicename.
pub fn bob() -> Viewer {
    Viewer::authenticated(bob_id(), ["subscriber"])
}

pub fn site_fixture() -> SiteFixture {
    SiteFixture::from_yaml(SITE).unwrap()
}

/// The shared site with the engine installed.
pub fn test_host() -> MenuHost {
    let host = site_fixture().build_host().unwrap();
    menu::install(&host);
    host
}

/// A site with the given menus and the engine installed.
///
/// Route templates and users match [`SITE`].
pub fn host_with(
    membership: Option<Vec<(&str, MenuLink)>>,
    commerce: Option<Vec<(&str, &str)>>,
) -> MenuHost {
    let fixture = site_fixture();
    let site = fixture
        .users
        .iter()
        .fold(FixtureSite::new(HOME), |site, (id, user)| {
            site.with_user(*id, user.clone())
        })
        .with_page(12, "https://example.com/help/");

    let mut builder = MenuHost::builder(Arc::new(site))
        .router(Arc::new(FixtureRouter::new(HOME, fixture.routes.clone())));
    if let Some(items) = membership {
        builder = builder.membership(Arc::new(FixtureMembership::new(items)));
    }
    if let Some(items) = commerce {
        builder = builder.commerce(Arc::new(FixtureCommerce::new(
            items,
            "https://example.com/my-account/",
        )));
    }

    let host = builder.build();
    menu::install(&host);
    host
}

/// A fresh request for a viewer under the given settings.
pub fn request(settings: &TestSettings, viewer: Viewer) -> RequestState {
    let snapshot = SettingsSnapshot::from_blob(&settings.blob()).unwrap();
    RequestState::new(viewer, snapshot)
}

/// A user record for ad-hoc sites.
pub fn user(login: &str, nicename: &str) -> UserFixture {
    UserFixture {
        login: login.to_string(),
        nicename: nicename.to_string(),
        vendor: None,
    }
}
