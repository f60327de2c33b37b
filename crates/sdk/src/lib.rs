//! Accord SDK
//!
//! Data model and host interfaces for the account menu engine.
//! Hosts implement the traits in [`host`] to expose their upstream menus,
//! router and user directory; the kernel composes over the types in [`types`].

pub mod host;
pub mod item_map;
pub mod types;

pub mod prelude {
    pub use crate::host::*;
    pub use crate::item_map::ItemMap;
    pub use crate::types::*;
}
