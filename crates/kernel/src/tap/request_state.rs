//! Per-request state for menu composition.
//!
//! A fresh `RequestState` is created for every request and passed to every
//! tap invocation. It carries the viewer and the settings snapshot plus the
//! only mutable state the engine has:
//! - memoized native pulls, written at most once per request;
//! - one re-entry flag per engine entry point;
//! - the handlers detached for the duration of an upstream pull.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use accord_sdk::item_map::ItemMap;
use accord_sdk::types::{CommerceMenu, NativeItem, Viewer};
use parking_lot::Mutex;
use tracing::debug;

use super::MenuTap;
use crate::settings::SettingsSnapshot;

/// Per-request state passed to every filter.
#[derive(Debug)]
pub struct RequestState {
    viewer: Viewer,
    settings: SettingsSnapshot,
    membership_base: OnceLock<ItemMap<NativeItem>>,
    commerce_base: OnceLock<CommerceMenu>,
    membership_running: AtomicBool,
    commerce_running: AtomicBool,
    endpoint_running: AtomicBool,
    detached: Mutex<Vec<(MenuTap, String)>>,
}

impl RequestState {
    pub fn new(viewer: Viewer, settings: SettingsSnapshot) -> Self {
        Self {
            viewer,
            settings,
            membership_base: OnceLock::new(),
            commerce_base: OnceLock::new(),
            membership_running: AtomicBool::new(false),
            commerce_running: AtomicBool::new(false),
            endpoint_running: AtomicBool::new(false),
            detached: Mutex::new(Vec::new()),
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn settings(&self) -> &SettingsSnapshot {
        &self.settings
    }

    /// Enter an engine entry point.
    ///
    /// Returns `None` when the same entry point is already running in this
    /// request; the caller must then return its input unchanged. The flag is
    /// released when the guard drops, on every exit path.
    pub fn enter(&self, tap: MenuTap) -> Option<ReentryGuard<'_>> {
        let flag = self.running_flag(tap);
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ReentryGuard { flag })
    }

    /// Whether an entry point is currently running.
    pub fn is_running(&self, tap: MenuTap) -> bool {
        self.running_flag(tap).load(Ordering::Acquire)
    }

    fn running_flag(&self, tap: MenuTap) -> &AtomicBool {
        match tap {
            MenuTap::MembershipMenu => &self.membership_running,
            MenuTap::CommerceMenu => &self.commerce_running,
            MenuTap::CommerceEndpointUrl => &self.endpoint_running,
        }
    }

    /// Detach a named handler from a tap for this request.
    ///
    /// The handler is re-attached when the guard drops. Detaching the same
    /// handler twice nests.
    pub fn detach(&self, tap: MenuTap, name: &str) -> DetachGuard<'_> {
        self.detached.lock().push((tap, name.to_string()));
        DetachGuard {
            state: self,
            tap,
            name: name.to_string(),
        }
    }

    pub fn is_detached(&self, tap: MenuTap, name: &str) -> bool {
        self.detached
            .lock()
            .iter()
            .any(|(t, n)| *t == tap && n == name)
    }

    /// Memoized membership pull, `None` if not pulled yet.
    ///
    /// An empty map means "pulled, nothing there".
    pub fn membership_base(&self) -> Option<&ItemMap<NativeItem>> {
        self.membership_base.get()
    }

    /// Store the membership pull. The first stored value wins.
    pub fn remember_membership_base(&self, items: ItemMap<NativeItem>) -> ItemMap<NativeItem> {
        remember(&self.membership_base, items, "membership")
    }

    /// Memoized commerce pull, `None` if not pulled yet.
    pub fn commerce_base(&self) -> Option<&CommerceMenu> {
        self.commerce_base.get()
    }

    /// Store the commerce pull. The first stored value wins.
    pub fn remember_commerce_base(&self, items: CommerceMenu) -> CommerceMenu {
        remember(&self.commerce_base, items, "commerce")
    }
}

fn remember<T: Clone>(cell: &OnceLock<T>, value: T, surface: &str) -> T {
    if cell.set(value.clone()).is_err() {
        debug!(surface, "native pull already memoized, keeping the first one");
    }
    cell.get().cloned().unwrap_or(value)
}

/// Marks an entry point as running until dropped.
#[derive(Debug)]
pub struct ReentryGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ReentryGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Keeps a handler detached until dropped.
#[derive(Debug)]
pub struct DetachGuard<'a> {
    state: &'a RequestState,
    tap: MenuTap,
    name: String,
}

impl Drop for DetachGuard<'_> {
    fn drop(&mut self) {
        let mut detached = self.state.detached.lock();
        if let Some(pos) = detached
            .iter()
            .rposition(|(t, n)| *t == self.tap && *n == self.name)
        {
            detached.remove(pos);
        }
    }
}
