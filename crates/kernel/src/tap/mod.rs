//! Tap system for menu extension points.
//!
//! Taps are named extension points the upstream platforms expose for their
//! account menus. When a tap is invoked, every registered filter is called in
//! weight order (lower = earlier), each receiving the previous one's output.

mod dispatcher;
mod registry;
mod request_state;

pub use dispatcher::dispatch;
pub use registry::{MenuFilter, MenuTap, TapHandler, TapRegistry};
pub use request_state::{DetachGuard, ReentryGuard, RequestState};
