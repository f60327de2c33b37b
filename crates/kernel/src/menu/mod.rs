//! Account menu composition.
//!
//! The engine sits on the three menu taps as the `account_menu_enhancer`
//! filter and:
//! - pulls each platform's native items with itself detached ([`provider`]);
//! - resolves operator custom items for the current viewer ([`resolver`]);
//! - rebuilds the membership and commerce menus ([`membership`], [`commerce`]);
//! - maps commerce endpoint keys back to real URLs ([`endpoint`]).
//!
//! Both flags off means pass-through: the menus come back as the platforms
//! built them (minus hidden commerce endpoints).

mod commerce;
mod endpoint;
mod enhancer;
mod membership;
mod provider;
mod resolver;

pub use commerce::compose_commerce_menu;
pub use endpoint::resolve_endpoint_url;
pub use enhancer::{AccountMenuEnhancer, ENDPOINT_WEIGHT, ENHANCER_NAME, MENU_WEIGHT, install};
pub use membership::compose_membership_menu;
pub use provider::{commerce_base, membership_base};
pub use resolver::{resolve_custom_item, resolve_custom_url};

/// Order of native membership items that carry none.
pub const MEMBERSHIP_DEFAULT_ORDER: i32 = 200;

/// Order of membership custom items without a position.
pub const CUSTOM_MEMBERSHIP_DEFAULT_ORDER: i32 = 999;

/// Order of commerce items borrowed into the membership menu.
pub const BORROWED_COMMERCE_ORDER: i32 = 600;

/// Position of native commerce items.
pub const COMMERCE_NATIVE_POSITION: i32 = 500;

/// First position of membership items borrowed into the commerce menu.
pub const BORROWED_MEMBERSHIP_START: i32 = 100;

/// First default position of commerce custom items.
pub const CUSTOM_COMMERCE_START: i32 = 300;

/// Gap between consecutive default positions.
pub const POSITION_STEP: i32 = 10;

/// Configured position as a sort key.
fn position_order(position: u32) -> i32 {
    i32::try_from(position).unwrap_or(i32::MAX)
}
