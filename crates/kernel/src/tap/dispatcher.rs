//! Tap dispatcher - runs a value through a tap's filters in weight order.
//!
//! Handlers detached for the current request are skipped. Filters are
//! infallible, so every handler runs and the last output is returned.

use tracing::{debug, trace};

use super::{MenuFilter, MenuTap, RequestState, TapRegistry};

/// Thread `input` through every attached handler of `tap`.
///
/// `call` adapts the generic handler to the tap's method; the registry is
/// snapshotted first so filters may call back into the host.
pub fn dispatch<T>(
    registry: &TapRegistry,
    state: &RequestState,
    tap: MenuTap,
    input: T,
    mut call: impl FnMut(&dyn MenuFilter, T) -> T,
) -> T {
    let handlers = registry.handlers(tap);
    if handlers.is_empty() {
        trace!(tap = %tap, "no handlers registered for tap");
        return input;
    }

    let mut value = input;
    let mut invoked = 0usize;
    for handler in &handlers {
        if state.is_detached(tap, &handler.name) {
            debug!(tap = %tap, handler = %handler.name, "skipping detached handler");
            continue;
        }
        value = call(handler.filter.as_ref(), value);
        invoked += 1;
    }

    trace!(
        tap = %tap,
        handlers = handlers.len(),
        invoked,
        "dispatch complete"
    );
    value
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::settings::SettingsSnapshot;
    use accord_sdk::types::Viewer;
    use std::sync::Arc;

    struct Noop;
    impl MenuFilter for Noop {}

    fn state() -> RequestState {
        RequestState::new(Viewer::anonymous(), SettingsSnapshot::default())
    }

    #[test]
    fn empty_tap_returns_input() {
        let registry = TapRegistry::new();
        let out = dispatch(&registry, &state(), MenuTap::CommerceMenu, 7, |_, v| v + 1);
        assert_eq!(out, 7);
    }

    #[test]
    fn every_handler_runs_in_order() {
        let registry = TapRegistry::new();
        registry.register(MenuTap::CommerceMenu, "a", 1, Arc::new(Noop));
        registry.register(MenuTap::CommerceMenu, "b", 2, Arc::new(Noop));

        let out = dispatch(&registry, &state(), MenuTap::CommerceMenu, 0, |_, v| {
            v * 10 + 1
        });
        assert_eq!(out, 11);
    }

    #[test]
    fn detached_handlers_are_skipped() {
        let registry = TapRegistry::new();
        registry.register(MenuTap::CommerceMenu, "a", 1, Arc::new(Noop));
        registry.register(MenuTap::CommerceMenu, "b", 2, Arc::new(Noop));

        let state = state();
        {
            let _detached = state.detach(MenuTap::CommerceMenu, "b");
            let out = dispatch(&registry, &state, MenuTap::CommerceMenu, 0, |_, v| v + 1);
            assert_eq!(out, 1);
        }
        let out = dispatch(&registry, &state, MenuTap::CommerceMenu, 0, |_, v| v + 1);
        assert_eq!(out, 2);
    }
}
