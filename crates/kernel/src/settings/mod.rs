//! Operator settings for the account menu engine.
//!
//! Settings persist as one flat key-value blob (a JSON object). Each request
//! turns the blob into a read-only [`SettingsSnapshot`]; custom items are
//! parsed into tagged [`CustomItemKind`] variants here, so nothing past this
//! module branches on type strings.
//!
//! # Blob keys
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `enable_integration` | merge each surface's native items into the other |
//! | `enable_custom_only` | inject custom items without merging natives |
//! | `commerce_items_to_hide` | commerce endpoints to drop (legacy alias `woocommerce_items_to_hide`) |
//! | `custom_menu_items` | array (id = index) or object keyed by numeric id |
//! | `user_base_slug` | first path segment of pretty user profile URLs |

mod sanitize;
mod store;

use std::collections::BTreeSet;

use accord_sdk::types::{CustomItem, CustomItemKind, MenuTarget, Surface};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{SettingsError, json_type_name};

pub use sanitize::{SanitizeReport, sanitize};
pub use store::{FileSettingsStore, MemorySettingsStore, SettingsStore, load_snapshot, save_settings};

pub const KEY_ENABLE_INTEGRATION: &str = "enable_integration";
pub const KEY_ENABLE_CUSTOM_ONLY: &str = "enable_custom_only";
pub const KEY_HIDDEN_COMMERCE_ITEMS: &str = "commerce_items_to_hide";
pub const KEY_HIDDEN_COMMERCE_ITEMS_LEGACY: &str = "woocommerce_items_to_hide";
pub const KEY_CUSTOM_ITEMS: &str = "custom_menu_items";
pub const KEY_USER_BASE_SLUG: &str = "user_base_slug";

/// Default first segment of pretty user profile URLs.
pub const DEFAULT_USER_BASE_SLUG: &str = "user";

/// Read-only view of the operator settings for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsSnapshot {
    pub integration_enabled: bool,
    pub custom_only_enabled: bool,
    pub hidden_commerce_keys: BTreeSet<String>,
    /// Custom items in settings order.
    pub custom_items: Vec<CustomItem>,
    pub user_base_slug: String,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            integration_enabled: false,
            custom_only_enabled: false,
            hidden_commerce_keys: BTreeSet::new(),
            custom_items: Vec::new(),
            user_base_slug: DEFAULT_USER_BASE_SLUG.to_string(),
        }
    }
}

impl SettingsSnapshot {
    /// Parse a persisted blob.
    ///
    /// `null` yields the defaults. Custom items that fail structural checks
    /// are skipped with a warning; they should have been rejected on save.
    pub fn from_blob(blob: &Value) -> Result<Self, SettingsError> {
        let obj = match blob {
            Value::Null => return Ok(Self::default()),
            Value::Object(obj) => obj,
            other => {
                return Err(SettingsError::NotAnObject {
                    found: json_type_name(other),
                });
            }
        };

        let mut snapshot = Self::without_items(obj);
        for (id, raw) in custom_entries(obj.get(KEY_CUSTOM_ITEMS)) {
            match parse_custom_item(id, raw) {
                Ok(item) => snapshot.custom_items.push(item),
                Err(rejection) => {
                    warn!(id, reason = %rejection.reason, "skipping invalid stored custom menu item");
                }
            }
        }
        Ok(snapshot)
    }

    /// Flags, hide-list and slug of a blob; custom items left empty.
    pub(crate) fn without_items(obj: &Map<String, Value>) -> Self {
        Self {
            integration_enabled: flag(obj.get(KEY_ENABLE_INTEGRATION)),
            custom_only_enabled: flag(obj.get(KEY_ENABLE_CUSTOM_ONLY)),
            hidden_commerce_keys: hidden_keys(obj),
            custom_items: Vec::new(),
            user_base_slug: base_slug(obj.get(KEY_USER_BASE_SLUG)),
        }
    }

    /// Neither integration nor custom-only mode is on.
    pub fn is_passthrough(&self) -> bool {
        !self.integration_enabled && !self.custom_only_enabled
    }

    /// Whether a commerce endpoint is on the hide-list.
    pub fn is_hidden(&self, key: &str) -> bool {
        self.hidden_commerce_keys.contains(key)
    }

    /// Look up a custom item by id.
    pub fn custom_item(&self, id: u32) -> Option<&CustomItem> {
        self.custom_items.iter().find(|item| item.id == id)
    }

    /// Custom items targeting `surface`, in settings order.
    pub fn custom_items_for(&self, surface: Surface) -> impl Iterator<Item = &CustomItem> {
        self.custom_items
            .iter()
            .filter(move |item| item.target.includes(surface))
    }

    /// Replace the user base slug (site-level override).
    pub fn with_user_base_slug(mut self, slug: &str) -> Self {
        self.user_base_slug = normalize_slug(slug);
        self
    }

    /// Serialize back to the canonical blob shape.
    ///
    /// Custom items are written as an object keyed by id so ids survive
    /// gaps left by removed or rejected items.
    pub fn to_blob(&self) -> Value {
        let mut items = Map::new();
        for item in &self.custom_items {
            let mut value = match serde_json::to_value(item) {
                Ok(value) => value,
                Err(e) => {
                    warn!(id = item.id, error = %e, "failed to serialize custom menu item, skipping");
                    continue;
                }
            };
            if let Value::Object(fields) = &mut value {
                fields.remove("id");
            }
            items.insert(item.id.to_string(), value);
        }

        let hidden = self
            .hidden_commerce_keys
            .iter()
            .cloned()
            .map(Value::String)
            .collect();

        let mut blob = Map::new();
        blob.insert(
            KEY_ENABLE_INTEGRATION.into(),
            Value::from(u8::from(self.integration_enabled)),
        );
        blob.insert(
            KEY_ENABLE_CUSTOM_ONLY.into(),
            Value::from(u8::from(self.custom_only_enabled)),
        );
        blob.insert(KEY_HIDDEN_COMMERCE_ITEMS.into(), Value::Array(hidden));
        blob.insert(KEY_CUSTOM_ITEMS.into(), Value::Object(items));
        blob.insert(
            KEY_USER_BASE_SLUG.into(),
            Value::String(self.user_base_slug.clone()),
        );
        Value::Object(blob)
    }
}

/// Why a custom item definition was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("entry is not an object")]
    NotAnObject,
    #[error("label is empty")]
    EmptyLabel,
    #[error("url is missing")]
    MissingUrl,
    #[error("url '{0}' is not an absolute http(s) URL")]
    InvalidUrl(String),
    #[error("page id is missing or zero")]
    MissingPage,
    #[error("route name is missing")]
    MissingRoute,
    #[error("position {0} is not a non-negative integer")]
    InvalidPosition(String),
}

/// A custom item that did not make it into the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRejection {
    pub id: u32,
    #[serde(serialize_with = "serialize_display")]
    pub reason: RejectReason,
}

fn serialize_display<S: serde::Serializer>(
    reason: &RejectReason,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

/// Structural parse of one stored custom item definition.
///
/// Unknown types fall back to `url`; targets are normalized leniently.
pub(crate) fn parse_custom_item(id: u32, raw: &Value) -> Result<CustomItem, ItemRejection> {
    let reject = |reason| ItemRejection { id, reason };
    let Value::Object(fields) = raw else {
        return Err(reject(RejectReason::NotAnObject));
    };

    let label = text(fields.get("label"));
    if label.is_empty() {
        return Err(reject(RejectReason::EmptyLabel));
    }

    let kind = match text(fields.get("type")).as_str() {
        "page" => match number(fields.get("page_id")) {
            Some(page_id) if page_id > 0 => CustomItemKind::Page { page_id },
            _ => return Err(reject(RejectReason::MissingPage)),
        },
        "route" | "hivepress_route" => {
            let route = text(fields.get("route"));
            if route.is_empty() {
                return Err(reject(RejectReason::MissingRoute));
            }
            CustomItemKind::Route { route }
        }
        other => {
            if !other.is_empty() && other != "url" {
                debug!(id, kind = %other, "unknown custom item type, treating as url");
            }
            let url = text(fields.get("url"));
            if url.is_empty() {
                return Err(reject(RejectReason::MissingUrl));
            }
            CustomItemKind::Url { url }
        }
    };

    let target = fields
        .get("menu")
        .and_then(Value::as_str)
        .map(MenuTarget::normalize)
        .unwrap_or_default();

    let position = parse_position(fields.get("position")).unwrap_or_else(|reason| {
        debug!(id, %reason, "ignoring invalid custom item position");
        None
    });

    Ok(CustomItem {
        id,
        label,
        kind,
        target,
        position,
        roles: string_list(fields.get("roles")).into_iter().collect(),
    })
}

/// Stored position of a custom item. Missing and `null` mean unset.
pub(crate) fn parse_position(value: Option<&Value>) -> Result<Option<u32>, RejectReason> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => number(Some(value))
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| RejectReason::InvalidPosition(value.to_string())),
    }
}

/// `(id, raw)` pairs from the custom item list, ascending by id for objects.
///
/// Object keys must be canonical decimal ids (`"7"`, not `"07"` or `" 7"`),
/// so no two entries share an id.
fn custom_entries(value: Option<&Value>) -> Vec<(u32, &Value)> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(idx, raw)| u32::try_from(idx).ok().map(|id| (id, raw)))
            .collect(),
        Some(Value::Object(items)) => {
            let mut entries: Vec<(u32, &Value)> = items
                .iter()
                .filter_map(|(key, raw)| match key.parse::<u32>() {
                    Ok(id) if id.to_string() == *key => Some((id, raw)),
                    _ => {
                        warn!(key = %key, "ignoring custom menu item with non-canonical id");
                        None
                    }
                })
                .collect();
            entries.sort_by_key(|(id, _)| *id);
            entries
        }
        _ => Vec::new(),
    }
}

fn hidden_keys(obj: &Map<String, Value>) -> BTreeSet<String> {
    let value = obj
        .get(KEY_HIDDEN_COMMERCE_ITEMS)
        .or_else(|| obj.get(KEY_HIDDEN_COMMERCE_ITEMS_LEGACY));
    string_list(value).into_iter().collect()
}

fn base_slug(value: Option<&Value>) -> String {
    normalize_slug(&text(value))
}

fn normalize_slug(slug: &str) -> String {
    let trimmed = slug.trim().trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_USER_BASE_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Truthiness of a stored flag: `true`, `1` and `"1"` are on; `"0"`, `""`,
/// `0`, `false` and missing are off.
pub(crate) fn flag(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            !s.is_empty() && s != "0"
        }
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Trimmed string value; numbers are stringified, anything else is empty.
pub(crate) fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Non-negative integer from a number or a numeric string.
pub(crate) fn number(value: Option<&Value>) -> Option<u64> {
    match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// List of trimmed, non-empty strings. A lone string counts as a one-item list.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().map(|v| text(Some(v))).collect(),
        Some(other @ (Value::String(_) | Value::Number(_))) => vec![text(Some(other))],
        _ => Vec::new(),
    };
    items.into_iter().filter(|s| !s.is_empty()).collect()
}
