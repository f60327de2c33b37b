//! Custom item resolution: role gate plus target URL.
//!
//! `None` always means "leave the item out". Blank URLs are never returned.

use accord_sdk::types::{CustomItem, CustomItemKind, RouteParams};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{USER_PROFILE_ROUTE, VENDOR_PROFILE_ROUTE};
use crate::host::MenuHost;
use crate::tap::RequestState;

/// URL of a custom item for the current viewer, `None` if the viewer may
/// not see it or its target cannot be resolved.
pub fn resolve_custom_item(
    host: &MenuHost,
    state: &RequestState,
    item: &CustomItem,
) -> Option<String> {
    if !item.is_visible_to(state.viewer()) {
        debug!(id = item.id, "custom item hidden from viewer by role");
        return None;
    }
    let url = resolve_custom_url(host, state, item);
    if url.is_none() {
        debug!(id = item.id, kind = item.kind.name(), "custom item target did not resolve");
    }
    url
}

/// Target URL of a custom item, ignoring roles.
pub fn resolve_custom_url(
    host: &MenuHost,
    state: &RequestState,
    item: &CustomItem,
) -> Option<String> {
    let url = match &item.kind {
        CustomItemKind::Url { url } => Some(url.clone()),
        CustomItemKind::Page { page_id } => host.site().page_permalink(*page_id),
        CustomItemKind::Route { route } => resolve_route(host, state, route),
    };
    url.filter(|url| !url.trim().is_empty())
}

fn resolve_route(host: &MenuHost, state: &RequestState, route: &str) -> Option<String> {
    if route.is_empty() {
        return None;
    }

    match route {
        VENDOR_PROFILE_ROUTE => {
            let user_id = state.viewer().id?;
            let vendor_id = host.site().vendor_for_user(user_id)?;
            let params = RouteParams::from([("vendor_id".to_string(), vendor_id)]);
            host.route_url(route, &params)
        }
        USER_PROFILE_ROUTE => {
            let user_id = state.viewer().id?;
            let params = RouteParams::from([("user".to_string(), user_id.to_string())]);
            let routed = host.route_url(route, &params);
            pretty_user_url(host, state, routed, user_id)
        }
        _ => host.route_url(route, &RouteParams::new()),
    }
}

/// Prefer `/{base}/{username}/` over a query-string profile URL.
///
/// A router URL without a query string is kept as is. The router URL is
/// also the fallback when the user has neither login nor nicename.
fn pretty_user_url(
    host: &MenuHost,
    state: &RequestState,
    routed: Option<String>,
    user_id: Uuid,
) -> Option<String> {
    if let Some(url) = &routed
        && !url.is_empty()
        && !url.contains('?')
    {
        return routed;
    }

    let username = host
        .site()
        .user(user_id)
        .map(|user| {
            if user.login.is_empty() {
                user.nicename
            } else {
                user.login
            }
        })
        .filter(|name| !name.is_empty());
    let Some(username) = username else {
        return routed;
    };

    let base = &state.settings().user_base_slug;
    Some(
        host.site()
            .home_url(&format!("/{base}/{}/", urlencoding::encode(&username))),
    )
}
