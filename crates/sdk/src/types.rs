//! Core types shared between hosts and the menu engine.
//!
//! Two menu surfaces exist: the membership platform's account menu and the
//! commerce platform's account menu. Operator-authored [`CustomItem`]s are
//! injected into either or both under the reserved key namespace
//! `custom-{id}`, which native providers must never produce.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item_map::ItemMap;

/// Prefix of the reserved key namespace for injected custom items.
pub const CUSTOM_KEY_PREFIX: &str = "custom-";

/// Role that can see every custom item regardless of its role list.
pub const ADMINISTRATOR_ROLE: &str = "administrator";

/// Build the synthetic key of a custom item.
pub fn custom_key(id: u32) -> String {
    format!("{CUSTOM_KEY_PREFIX}{id}")
}

/// Parse the id out of a `custom-{id}` key.
///
/// Only canonical decimal ids are accepted: `custom-3` yields `Some(3)`,
/// `custom-x`, `custom-` and `custom-03` yield `None`.
pub fn custom_id(key: &str) -> Option<u32> {
    let digits = key.strip_prefix(CUSTOM_KEY_PREFIX)?;
    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return None;
    }
    digits.parse().ok()
}

/// Whether a key lies in the reserved `custom-*` namespace.
///
/// This is broader than [`custom_id`]: any key with the prefix is reserved,
/// so stray keys like `custom-foo` are scrubbed as well.
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with(CUSTOM_KEY_PREFIX)
}

/// One of the two menu surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// The membership platform's user account menu.
    Membership,
    /// The commerce platform's "my account" menu.
    Commerce,
}

impl Surface {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Membership => "membership",
            Self::Commerce => "commerce",
        }
    }

    /// The opposite surface.
    pub fn other(self) -> Self {
        match self {
            Self::Membership => Self::Commerce,
            Self::Commerce => Self::Membership,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which surface(s) a custom item is injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MenuTarget {
    Membership,
    Commerce,
    #[default]
    Both,
}

impl MenuTarget {
    /// Lenient parse: trimmed, case-insensitive, unknown values mean `Both`.
    ///
    /// Platform names are accepted as aliases (`hivepress`, `woocommerce`).
    pub fn normalize(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "membership" | "hivepress" | "a" => Self::Membership,
            "commerce" | "woocommerce" | "b" => Self::Commerce,
            _ => Self::Both,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Membership => "membership",
            Self::Commerce => "commerce",
            Self::Both => "both",
        }
    }

    /// Whether items with this target belong on `surface`.
    pub fn includes(self, surface: Surface) -> bool {
        match self {
            Self::Both => true,
            Self::Membership => surface == Surface::Membership,
            Self::Commerce => surface == Surface::Commerce,
        }
    }
}

impl From<String> for MenuTarget {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<MenuTarget> for String {
    fn from(value: MenuTarget) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MenuTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a custom item links to. Exactly one payload per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomItemKind {
    /// A static URL, validated when the settings were saved.
    Url { url: String },
    /// A named route of the membership platform's router.
    #[serde(alias = "hivepress_route")]
    Route { route: String },
    /// A CMS page, linked through its permalink.
    Page { page_id: u64 },
}

impl CustomItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Url { .. } => "url",
            Self::Route { .. } => "route",
            Self::Page { .. } => "page",
        }
    }
}

/// An operator-authored menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomItem {
    /// Index in the settings list; forms the `custom-{id}` key.
    pub id: u32,
    pub label: String,
    #[serde(flatten)]
    pub kind: CustomItemKind,
    #[serde(rename = "menu", default)]
    pub target: MenuTarget,
    /// Sort position; surface defaults apply when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    /// Roles allowed to see the item (empty = everyone).
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl CustomItem {
    pub fn new(id: u32, label: impl Into<String>, kind: CustomItemKind) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            target: MenuTarget::Both,
            position: None,
            roles: BTreeSet::new(),
        }
    }

    pub fn target(mut self, target: MenuTarget) -> Self {
        self.target = target;
        self
    }

    pub fn position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// The reserved key this item is injected under.
    pub fn key(&self) -> String {
        custom_key(self.id)
    }

    /// Role gate.
    ///
    /// - No roles configured: visible to everyone, anonymous included.
    /// - Otherwise the viewer must be authenticated and be an administrator
    ///   or hold at least one of the listed roles.
    pub fn is_visible_to(&self, viewer: &Viewer) -> bool {
        if self.roles.is_empty() {
            return true;
        }
        if !viewer.is_authenticated() {
            return false;
        }
        viewer.is_admin() || self.roles.iter().any(|r| viewer.has_role(r))
    }
}

/// The person the menus are being built for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewer {
    /// User id (`None` for anonymous visitors).
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated<I, S>(id: Uuid, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: Some(id),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.id.is_some()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMINISTRATOR_ROLE)
    }
}

/// An entry of the membership menu as the upstream platform emits it.
///
/// Either `url` or `route` locates the target. The engine's own output for
/// this surface uses the same shape with `url` and `order` filled in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MenuLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Internal sort weight some upstream menus carry; wins over `order`.
    #[serde(
        rename = "_order",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sort_order: Option<i32>,
}

impl MenuLink {
    /// A fully resolved link.
    pub fn resolved(label: impl Into<String>, url: impl Into<String>, order: i32) -> Self {
        Self {
            label: Some(label.into()),
            url: Some(url.into()),
            route: None,
            order: Some(order),
            sort_order: None,
        }
    }

    /// A link that points at a router route.
    pub fn routed(label: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            route: Some(route.into()),
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }
}

/// Raw membership menu: key → link.
pub type MembershipMenu = ItemMap<MenuLink>;

/// Commerce menu: endpoint key → label.
pub type CommerceMenu = ItemMap<String>;

/// A normalized membership item with its URL resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeItem {
    pub label: String,
    pub url: String,
    pub order: i32,
}

impl From<NativeItem> for MenuLink {
    fn from(item: NativeItem) -> Self {
        MenuLink::resolved(item.label, item.url, item.order)
    }
}

/// A user record as seen by the site directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserRecord {
    /// Login name.
    #[serde(default)]
    pub login: String,
    /// URL-safe display slug.
    #[serde(default)]
    pub nicename: String,
}

/// Named route parameters.
pub type RouteParams = BTreeMap<String, String>;
