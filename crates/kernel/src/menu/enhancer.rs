//! The engine as a tap filter.

use std::sync::Arc;

use accord_sdk::types::{CommerceMenu, MembershipMenu};
use tracing::info;

use super::{compose_commerce_menu, compose_membership_menu, resolve_endpoint_url};
use crate::host::MenuHost;
use crate::tap::{MenuFilter, MenuTap, RequestState};

/// Handler name the engine registers (and detaches) under.
pub const ENHANCER_NAME: &str = "account_menu_enhancer";

/// Weight on both menu taps: after every other filter.
pub const MENU_WEIGHT: i32 = 999;

/// Weight on the endpoint URL tap.
pub const ENDPOINT_WEIGHT: i32 = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct AccountMenuEnhancer;

impl MenuFilter for AccountMenuEnhancer {
    fn membership_menu(
        &self,
        host: &MenuHost,
        state: &RequestState,
        items: MembershipMenu,
    ) -> MembershipMenu {
        compose_membership_menu(host, state, items)
    }

    fn commerce_menu(
        &self,
        host: &MenuHost,
        state: &RequestState,
        items: CommerceMenu,
    ) -> CommerceMenu {
        compose_commerce_menu(host, state, items)
    }

    fn commerce_endpoint_url(
        &self,
        host: &MenuHost,
        state: &RequestState,
        endpoint: &str,
        url: String,
    ) -> String {
        resolve_endpoint_url(host, state, endpoint, url)
    }
}

/// Register the engine on a host's taps.
///
/// Each menu tap is only used when its platform is present.
pub fn install(host: &MenuHost) {
    let enhancer: Arc<dyn MenuFilter> = Arc::new(AccountMenuEnhancer);
    if host.has_membership() {
        host.taps().register(
            MenuTap::MembershipMenu,
            ENHANCER_NAME,
            MENU_WEIGHT,
            Arc::clone(&enhancer),
        );
    }

    if host.has_commerce() {
        host.taps().register(
            MenuTap::CommerceMenu,
            ENHANCER_NAME,
            MENU_WEIGHT,
            Arc::clone(&enhancer),
        );
        host.taps().register(
            MenuTap::CommerceEndpointUrl,
            ENHANCER_NAME,
            ENDPOINT_WEIGHT,
            enhancer,
        );
    }

    info!(
        membership = host.has_membership(),
        commerce = host.has_commerce(),
        "account menu enhancer installed"
    );
}
