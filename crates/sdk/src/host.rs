//! Interfaces the engine consumes from its host.
//!
//! A host wires the upstream platforms into these traits. Every method is a
//! synchronous, in-memory read; none of them may fail. Missing data is
//! expressed as `None` or an empty collection.

use uuid::Uuid;

use crate::types::{CommerceMenu, MembershipMenu, RouteParams, UserRecord};

/// The membership platform's account menu, before any filter runs.
pub trait MembershipMenuSource: Send + Sync {
    /// Raw menu entries in the platform's own order.
    fn items(&self) -> MembershipMenu;
}

/// The commerce platform's account menu.
pub trait CommerceMenuSource: Send + Sync {
    /// Endpoint key → label, before any filter runs.
    fn items(&self) -> CommerceMenu;

    /// The platform's own URL for an endpoint, before any filter runs.
    fn endpoint_url(&self, endpoint: &str) -> String;
}

/// The membership platform's named-route resolver.
pub trait Router: Send + Sync {
    /// Resolve `route` with `params`. `None` when the route is unknown or a
    /// required parameter is missing.
    fn url(&self, route: &str, params: &RouteParams) -> Option<String>;
}

/// Site-wide lookups: pages, users, vendors and the home URL.
pub trait SiteDirectory: Send + Sync {
    /// Permalink of a CMS page, `None` if the page no longer exists.
    fn page_permalink(&self, page_id: u64) -> Option<String>;

    /// User record for an id.
    fn user(&self, id: Uuid) -> Option<UserRecord>;

    /// Vendor profile id owned by a user.
    fn vendor_for_user(&self, id: Uuid) -> Option<String>;

    /// Absolute URL for a site-relative path (`/user/alice/`).
    fn home_url(&self, path: &str) -> String;
}
