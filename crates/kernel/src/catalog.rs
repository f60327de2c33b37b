//! Known route names and commerce endpoints.
//!
//! These are the choices offered to operators when authoring settings. The
//! engine accepts names outside these lists; the validator only logs them.

/// Membership route that shows the current user's public profile.
pub const USER_PROFILE_ROUTE: &str = "user_view_page";

/// Membership route that shows the current user's vendor profile.
pub const VENDOR_PROFILE_ROUTE: &str = "vendor_view_page";

/// A named choice with a human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub label: &'static str,
}

/// Membership routes offered for `route` custom items.
///
/// The account overview route is left out on purpose; it is the menu's own
/// landing page.
pub const ROUTE_SHORTLIST: &[CatalogEntry] = &[
    CatalogEntry {
        name: USER_PROFILE_ROUTE,
        label: "User Profile",
    },
    CatalogEntry {
        name: "user_edit_settings_page",
        label: "Edit Settings",
    },
    CatalogEntry {
        name: "user_logout_page",
        label: "Log Out",
    },
    CatalogEntry {
        name: VENDOR_PROFILE_ROUTE,
        label: "Vendor Profile",
    },
    CatalogEntry {
        name: "listings_edit_page",
        label: "Edit Listings",
    },
    CatalogEntry {
        name: "listings_favorite_page",
        label: "Favorite Listings",
    },
];

/// Commerce endpoints an operator can hide.
pub const COMMERCE_ENDPOINTS: &[CatalogEntry] = &[
    CatalogEntry {
        name: "dashboard",
        label: "Dashboard",
    },
    CatalogEntry {
        name: "orders",
        label: "Orders",
    },
    CatalogEntry {
        name: "subscriptions",
        label: "Subscriptions",
    },
    CatalogEntry {
        name: "downloads",
        label: "Downloads",
    },
    CatalogEntry {
        name: "edit-address",
        label: "Addresses",
    },
    CatalogEntry {
        name: "payment-methods",
        label: "Payment Methods",
    },
    CatalogEntry {
        name: "edit-account",
        label: "Account Details",
    },
    CatalogEntry {
        name: "customer-logout",
        label: "Logout",
    },
];

pub fn is_known_route(name: &str) -> bool {
    ROUTE_SHORTLIST.iter().any(|e| e.name == name)
}

pub fn is_known_commerce_endpoint(name: &str) -> bool {
    COMMERCE_ENDPOINTS.iter().any(|e| e.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_sdk::types::is_reserved_key;
    use std::collections::HashSet;

    #[test]
    fn catalog_names_are_unique() {
        let routes: HashSet<_> = ROUTE_SHORTLIST.iter().map(|e| e.name).collect();
        assert_eq!(routes.len(), ROUTE_SHORTLIST.len());

        let endpoints: HashSet<_> = COMMERCE_ENDPOINTS.iter().map(|e| e.name).collect();
        assert_eq!(endpoints.len(), COMMERCE_ENDPOINTS.len());
    }

    #[test]
    fn profile_routes_are_listed() {
        assert!(is_known_route(USER_PROFILE_ROUTE));
        assert!(is_known_route(VENDOR_PROFILE_ROUTE));
        assert!(!is_known_route("user_account_page"));
    }

    #[test]
    fn no_endpoint_uses_the_reserved_namespace() {
        // `customer-logout` shares letters with the prefix but not the prefix itself.
        assert!(COMMERCE_ENDPOINTS.iter().all(|e| !is_reserved_key(e.name)));
        assert!(is_known_commerce_endpoint("customer-logout"));
    }
}
