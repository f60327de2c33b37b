//! Tap registry - indexes which filters implement which taps.
//!
//! The registry maps each tap to an ordered list of filters. Filters are
//! sorted by weight (lower = higher priority, called first); filters with
//! equal weight keep their registration order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use accord_sdk::types::{CommerceMenu, MembershipMenu};
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::RequestState;
use crate::host::MenuHost;

/// The menu extension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuTap {
    /// Membership account menu items.
    MembershipMenu,
    /// Commerce account menu items.
    CommerceMenu,
    /// URL of a single commerce account endpoint.
    CommerceEndpointUrl,
}

impl MenuTap {
    pub const ALL: [MenuTap; 3] = [
        MenuTap::MembershipMenu,
        MenuTap::CommerceMenu,
        MenuTap::CommerceEndpointUrl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::MembershipMenu => "tap_membership_menu",
            Self::CommerceMenu => "tap_commerce_menu",
            Self::CommerceEndpointUrl => "tap_commerce_endpoint_url",
        }
    }
}

impl fmt::Display for MenuTap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A filter on one or more menu taps.
///
/// Every method defaults to passing its input through, so a filter only
/// overrides the taps it is registered for. Filters receive the host so they
/// can call back into it; re-entrant calls are expected.
pub trait MenuFilter: Send + Sync {
    fn membership_menu(
        &self,
        _host: &MenuHost,
        _state: &RequestState,
        items: MembershipMenu,
    ) -> MembershipMenu {
        items
    }

    fn commerce_menu(
        &self,
        _host: &MenuHost,
        _state: &RequestState,
        items: CommerceMenu,
    ) -> CommerceMenu {
        items
    }

    fn commerce_endpoint_url(
        &self,
        _host: &MenuHost,
        _state: &RequestState,
        _endpoint: &str,
        url: String,
    ) -> String {
        url
    }
}

/// A registered tap handler with its name and priority.
#[derive(Clone)]
pub struct TapHandler {
    /// Name used for detaching and introspection.
    pub name: String,
    /// Weight for ordering (lower = higher priority).
    pub weight: i32,
    pub filter: Arc<dyn MenuFilter>,
}

impl fmt::Debug for TapHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapHandler")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// Registry mapping taps to ordered handlers.
///
/// Registration happens while the host is being wired up; per-request code
/// only reads. Readers get a snapshot so a filter may register or inspect
/// handlers without holding the lock.
#[derive(Debug, Default)]
pub struct TapRegistry {
    handlers: RwLock<HashMap<MenuTap, Vec<TapHandler>>>,
}

impl TapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter on a tap.
    ///
    /// A handler already registered under the same name on that tap is
    /// replaced.
    pub fn register(
        &self,
        tap: MenuTap,
        name: impl Into<String>,
        weight: i32,
        filter: Arc<dyn MenuFilter>,
    ) {
        let name = name.into();
        let mut handlers = self.handlers.write();
        let list = handlers.entry(tap).or_default();

        if let Some(pos) = list.iter().position(|h| h.name == name) {
            warn!(tap = %tap, handler = %name, "replacing tap handler");
            list.remove(pos);
        }

        debug!(tap = %tap, handler = %name, weight, "registered tap handler");
        list.push(TapHandler {
            name,
            weight,
            filter,
        });
        list.sort_by_key(|h| h.weight);
    }

    /// Remove a handler. Returns whether one was registered.
    pub fn unregister(&self, tap: MenuTap, name: &str) -> bool {
        let mut handlers = self.handlers.write();
        let Some(list) = handlers.get_mut(&tap) else {
            return false;
        };
        let before = list.len();
        list.retain(|h| h.name != name);
        before != list.len()
    }

    /// Snapshot of a tap's handlers, in weight order.
    pub fn handlers(&self, tap: MenuTap) -> Vec<TapHandler> {
        self.handlers.read().get(&tap).cloned().unwrap_or_default()
    }

    /// Check if any filter implements a tap.
    pub fn has_tap(&self, tap: MenuTap) -> bool {
        self.handlers
            .read()
            .get(&tap)
            .is_some_and(|handlers| !handlers.is_empty())
    }

    /// Whether a named handler is registered on a tap.
    pub fn is_registered(&self, tap: MenuTap, name: &str) -> bool {
        self.handlers
            .read()
            .get(&tap)
            .is_some_and(|handlers| handlers.iter().any(|h| h.name == name))
    }

    pub fn handler_count(&self, tap: MenuTap) -> usize {
        self.handlers.read().get(&tap).map(Vec::len).unwrap_or(0)
    }
}
