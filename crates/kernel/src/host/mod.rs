//! The host side of the engine.
//!
//! [`MenuHost`] wires the upstream platforms (through the SDK traits) to the
//! tap registry. Its three entry points are what the platforms themselves
//! would call: fetch a menu, run it through the filter chain, return it.

mod fixture;

use std::fmt;
use std::sync::Arc;

use accord_sdk::host::{CommerceMenuSource, MembershipMenuSource, Router, SiteDirectory};
use accord_sdk::types::{CommerceMenu, MembershipMenu, RouteParams};

use crate::tap::{MenuTap, RequestState, TapRegistry, dispatch};

pub use fixture::{
    CommerceFixture, FixtureCommerce, FixtureMembership, FixtureRouter, FixtureSite, SiteFixture,
    UserFixture,
};

/// Upstream platforms plus the filter chains around them.
pub struct MenuHost {
    membership: Option<Arc<dyn MembershipMenuSource>>,
    commerce: Option<Arc<dyn CommerceMenuSource>>,
    router: Option<Arc<dyn Router>>,
    site: Arc<dyn SiteDirectory>,
    taps: TapRegistry,
}

impl MenuHost {
    /// Start building a host around a site directory.
    pub fn builder(site: Arc<dyn SiteDirectory>) -> MenuHostBuilder {
        MenuHostBuilder {
            membership: None,
            commerce: None,
            router: None,
            site,
        }
    }

    /// Whether the membership platform is installed.
    pub fn has_membership(&self) -> bool {
        self.membership.is_some()
    }

    /// Whether the commerce platform is installed.
    pub fn has_commerce(&self) -> bool {
        self.commerce.is_some()
    }

    pub fn taps(&self) -> &TapRegistry {
        &self.taps
    }

    pub fn site(&self) -> &dyn SiteDirectory {
        self.site.as_ref()
    }

    /// Resolve a membership route. `None` when no router is installed.
    pub fn route_url(&self, route: &str, params: &RouteParams) -> Option<String> {
        self.router.as_ref()?.url(route, params)
    }

    /// The membership menu as the platform renders it: raw items passed
    /// through every attached filter.
    pub fn membership_menu(&self, state: &RequestState) -> MembershipMenu {
        let items = self
            .membership
            .as_ref()
            .map(|source| source.items())
            .unwrap_or_default();
        dispatch(
            &self.taps,
            state,
            MenuTap::MembershipMenu,
            items,
            |filter, items| filter.membership_menu(self, state, items),
        )
    }

    /// The commerce menu as the platform renders it.
    pub fn commerce_menu(&self, state: &RequestState) -> CommerceMenu {
        let items = self
            .commerce
            .as_ref()
            .map(|source| source.items())
            .unwrap_or_default();
        dispatch(
            &self.taps,
            state,
            MenuTap::CommerceMenu,
            items,
            |filter, items| filter.commerce_menu(self, state, items),
        )
    }

    /// The commerce platform's URL for one endpoint, passed through the
    /// endpoint filters. Empty when the commerce platform is missing.
    pub fn commerce_endpoint_url(&self, state: &RequestState, endpoint: &str) -> String {
        let url = self
            .commerce
            .as_ref()
            .map(|source| source.endpoint_url(endpoint))
            .unwrap_or_default();
        dispatch(
            &self.taps,
            state,
            MenuTap::CommerceEndpointUrl,
            url,
            |filter, url| filter.commerce_endpoint_url(self, state, endpoint, url),
        )
    }
}

impl fmt::Debug for MenuHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuHost")
            .field("membership", &self.has_membership())
            .field("commerce", &self.has_commerce())
            .field("router", &self.router.is_some())
            .field("taps", &self.taps)
            .finish_non_exhaustive()
    }
}

/// Builder for [`MenuHost`]. Every upstream is optional.
pub struct MenuHostBuilder {
    membership: Option<Arc<dyn MembershipMenuSource>>,
    commerce: Option<Arc<dyn CommerceMenuSource>>,
    router: Option<Arc<dyn Router>>,
    site: Arc<dyn SiteDirectory>,
}

impl MenuHostBuilder {
    pub fn membership(mut self, source: Arc<dyn MembershipMenuSource>) -> Self {
        self.membership = Some(source);
        self
    }

    pub fn commerce(mut self, source: Arc<dyn CommerceMenuSource>) -> Self {
        self.commerce = Some(source);
        self
    }

    pub fn router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn build(self) -> MenuHost {
        MenuHost {
            membership: self.membership,
            commerce: self.commerce,
            router: self.router,
            site: self.site,
            taps: TapRegistry::new(),
        }
    }
}
