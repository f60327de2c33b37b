//! Save-path validation for submitted settings.
//!
//! Runs before a blob is persisted, so the composition engine only ever sees
//! well-formed custom items. Every rejected item is reported with a reason.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use accord_sdk::types::CustomItemKind;

use super::{
    ItemRejection, KEY_CUSTOM_ITEMS, RejectReason, SettingsSnapshot, custom_entries,
    parse_custom_item, parse_position,
};
use crate::catalog;
use crate::error::{SettingsError, json_type_name};

/// Outcome of validating a submitted settings blob.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizeReport {
    /// The accepted settings.
    pub settings: SettingsSnapshot,
    /// Custom items that were dropped.
    pub rejected: Vec<ItemRejection>,
}

impl SanitizeReport {
    /// Canonical blob ready to persist.
    pub fn blob(&self) -> Value {
        self.settings.to_blob()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Validate a submitted settings blob.
///
/// Flags, hide-list and base slug are normalized the same way the loader
/// reads them. Custom items additionally need a syntactically valid
/// absolute `http`/`https` URL when their type is `url`, and a position
/// that is either unset or a non-negative integer.
pub fn sanitize(submitted: &Value) -> Result<SanitizeReport, SettingsError> {
    let Value::Object(obj) = submitted else {
        return Err(SettingsError::NotAnObject {
            found: json_type_name(submitted),
        });
    };

    let mut settings = SettingsSnapshot::without_items(obj);

    let mut rejected = Vec::new();
    for (id, raw) in custom_entries(obj.get(KEY_CUSTOM_ITEMS)) {
        let parsed = parse_custom_item(id, raw).and_then(|item| {
            if let CustomItemKind::Url { url } = &item.kind
                && !is_valid_url(url)
            {
                return Err(ItemRejection {
                    id,
                    reason: RejectReason::InvalidUrl(url.clone()),
                });
            }
            parse_position(raw.get("position")).map_err(|reason| ItemRejection { id, reason })?;
            Ok(item)
        });

        match parsed {
            Ok(item) => {
                if let CustomItemKind::Route { route } = &item.kind
                    && !catalog::is_known_route(route)
                {
                    debug!(id, route = %route, "custom item uses a route outside the shortlist");
                }
                settings.custom_items.push(item);
            }
            Err(rejection) => {
                debug!(id, reason = %rejection.reason, "rejecting custom menu item");
                rejected.push(rejection);
            }
        }
    }

    for key in &settings.hidden_commerce_keys {
        if !catalog::is_known_commerce_endpoint(key) {
            debug!(endpoint = %key, "hide-list names an unknown commerce endpoint");
        }
    }

    info!(
        accepted = settings.custom_items.len(),
        rejected = rejected.len(),
        "settings validated"
    );

    Ok(SanitizeReport { settings, rejected })
}

/// Absolute URL with an `http` or `https` scheme and a host.
fn is_valid_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}
