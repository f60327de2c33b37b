//! Static site fixture.
//!
//! A YAML or JSON document describing a whole host: both upstream menus,
//! route templates, pages, users and the current viewer. Used by the CLI and
//! by tests in place of live platforms.
//!
//! ```yaml
//! home_url: https://example.com
//! membership:
//!   listings: { label: Listings, route: listings_edit_page, _order: 20 }
//! commerce:
//!   endpoint_base: https://example.com/my-account/
//!   items: { dashboard: Dashboard, orders: Orders }
//! routes:
//!   user_view_page: /?user_id={user}
//!   listings_edit_page: /account/listings/
//! pages: { 12: https://example.com/help/ }
//! users:
//!   7a1d...: { login: alice, nicename: alice, vendor: "31" }
//! viewer: { id: 7a1d..., roles: [customer] }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use accord_sdk::host::{CommerceMenuSource, MembershipMenuSource, Router, SiteDirectory};
use accord_sdk::types::{CommerceMenu, MembershipMenu, MenuLink, RouteParams, UserRecord, Viewer};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use super::MenuHost;
use crate::error::FixtureError;

/// Commerce section of a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommerceFixture {
    /// URL of the account page; endpoints hang below it.
    pub endpoint_base: String,
    #[serde(default)]
    pub items: CommerceMenu,
}

/// A user known to the fixture site.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserFixture {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub nicename: String,
    /// Vendor profile owned by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

/// A complete static host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFixture {
    pub home_url: String,
    /// Raw membership menu; absent means the platform is not installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership: Option<MembershipMenu>,
    /// Commerce menu; absent means the platform is not installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commerce: Option<CommerceFixture>,
    /// Route name → URL template with `{param}` placeholders.
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
    #[serde(default)]
    pub pages: BTreeMap<u64, String>,
    #[serde(default)]
    pub users: BTreeMap<Uuid, UserFixture>,
    #[serde(default)]
    pub viewer: Viewer,
}

impl SiteFixture {
    /// Load a fixture file; `.yaml`/`.yml` is read as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let raw = fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&raw),
            _ => Self::from_json(&raw),
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Self, FixtureError> {
        Ok(serde_yml::from_str(raw)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Wire the fixture into a [`MenuHost`].
    ///
    /// The router is installed with the membership platform, or on its own
    /// when route templates are given.
    pub fn build_host(&self) -> Result<MenuHost, FixtureError> {
        Url::parse(&self.home_url).map_err(|source| FixtureError::HomeUrl {
            url: self.home_url.clone(),
            source,
        })?;

        let site = FixtureSite {
            home: self.home_url.trim_end_matches('/').to_string(),
            pages: self.pages.clone(),
            users: self.users.clone(),
        };
        let mut builder = MenuHost::builder(Arc::new(site));

        if let Some(items) = &self.membership {
            builder = builder.membership(Arc::new(FixtureMembership {
                items: items.clone(),
            }));
        }
        if let Some(commerce) = &self.commerce {
            builder = builder.commerce(Arc::new(FixtureCommerce {
                items: commerce.items.clone(),
                endpoint_base: commerce.endpoint_base.clone(),
            }));
        }
        if self.membership.is_some() || !self.routes.is_empty() {
            builder = builder.router(Arc::new(FixtureRouter::new(
                &self.home_url,
                self.routes.clone(),
            )));
        }

        debug!(
            membership = self.membership.is_some(),
            commerce = self.commerce.is_some(),
            routes = self.routes.len(),
            "built host from fixture"
        );
        Ok(builder.build())
    }
}

/// Membership platform serving a fixed menu.
#[derive(Debug, Clone, Default)]
pub struct FixtureMembership {
    items: MembershipMenu,
}

impl FixtureMembership {
    pub fn new<K: Into<String>>(items: impl IntoIterator<Item = (K, MenuLink)>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

impl MembershipMenuSource for FixtureMembership {
    fn items(&self) -> MembershipMenu {
        self.items.clone()
    }
}

/// Commerce platform serving a fixed menu.
#[derive(Debug, Clone)]
pub struct FixtureCommerce {
    items: CommerceMenu,
    endpoint_base: String,
}

impl FixtureCommerce {
    pub fn new<K, L>(items: impl IntoIterator<Item = (K, L)>, endpoint_base: impl Into<String>) -> Self
    where
        K: Into<String>,
        L: Into<String>,
    {
        Self {
            items: items.into_iter().map(|(k, l)| (k, l.into())).collect(),
            endpoint_base: endpoint_base.into(),
        }
    }
}

impl CommerceMenuSource for FixtureCommerce {
    fn items(&self) -> CommerceMenu {
        self.items.clone()
    }

    /// `dashboard` is the account page itself; other endpoints are
    /// sub-paths of it.
    fn endpoint_url(&self, endpoint: &str) -> String {
        let base = self.endpoint_base.trim_end_matches('/');
        if endpoint == "dashboard" {
            format!("{base}/")
        } else {
            format!("{base}/{endpoint}/")
        }
    }
}

/// Router expanding URL templates.
#[derive(Debug, Clone)]
pub struct FixtureRouter {
    home: String,
    routes: BTreeMap<String, String>,
}

impl FixtureRouter {
    pub fn new(home_url: &str, routes: BTreeMap<String, String>) -> Self {
        Self {
            home: home_url.trim_end_matches('/').to_string(),
            routes,
        }
    }
}

impl Router for FixtureRouter {
    fn url(&self, route: &str, params: &RouteParams) -> Option<String> {
        let template = self.routes.get(route)?;
        let expanded = expand_template(template, params)?;
        if expanded.starts_with('/') {
            Some(format!("{}{expanded}", self.home))
        } else {
            Some(expanded)
        }
    }
}

/// Substitute `{name}` placeholders; `None` if a parameter is missing.
fn expand_template(template: &str, params: &RouteParams) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}')?;
        let value = params.get(&after[..end])?;
        out.push_str(&urlencoding::encode(value));
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}

/// Pages, users and home URL of a fixture site.
#[derive(Debug, Clone, Default)]
pub struct FixtureSite {
    home: String,
    pages: BTreeMap<u64, String>,
    users: BTreeMap<Uuid, UserFixture>,
}

impl FixtureSite {
    pub fn new(home_url: &str) -> Self {
        Self {
            home: home_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page_id: u64, permalink: impl Into<String>) -> Self {
        self.pages.insert(page_id, permalink.into());
        self
    }

    pub fn with_user(mut self, id: Uuid, user: UserFixture) -> Self {
        self.users.insert(id, user);
        self
    }
}

impl SiteDirectory for FixtureSite {
    fn page_permalink(&self, page_id: u64) -> Option<String> {
        self.pages.get(&page_id).cloned()
    }

    fn user(&self, id: Uuid) -> Option<UserRecord> {
        self.users.get(&id).map(|u| UserRecord {
            login: u.login.clone(),
            nicename: u.nicename.clone(),
        })
    }

    fn vendor_for_user(&self, id: Uuid) -> Option<String> {
        self.users.get(&id).and_then(|u| u.vendor.clone())
    }

    fn home_url(&self, path: &str) -> String {
        format!("{}/{}", self.home, path.trim_start_matches('/'))
    }
}
