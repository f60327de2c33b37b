//! Accord test utilities.
//!
//! Helpers for integration testing: viewers, settings blobs with custom
//! items, native menu links and assertions on composed menus.

use accord_sdk::types::{ADMINISTRATOR_ROLE, MenuLink, Viewer};
use serde_json::{Map, Value as JsonValue, json};
use uuid::Uuid;

/// Create an authenticated viewer with the given roles.
pub fn test_viewer(roles: &[&str]) -> Viewer {
    Viewer::authenticated(Uuid::now_v7(), roles.iter().copied())
}

/// Create an anonymous viewer.
pub fn anonymous_viewer() -> Viewer {
    Viewer::anonymous()
}

/// Create an administrator viewer.
pub fn admin_viewer() -> Viewer {
    test_viewer(&[ADMINISTRATOR_ROLE])
}

/// A resolved native membership link.
pub fn native_link(label: &str, url: &str, order: i32) -> MenuLink {
    MenuLink::resolved(label, url, order)
}

/// A native membership link without an order.
pub fn unordered_link(label: &str, url: &str) -> MenuLink {
    MenuLink {
        label: Some(label.to_string()),
        url: Some(url.to_string()),
        ..MenuLink::default()
    }
}

/// Custom item pointing at a static URL.
pub fn url_item(label: &str, url: &str) -> TestCustomItem {
    TestCustomItem::new(json!({"label": label, "type": "url", "url": url}))
}

/// Custom item pointing at a membership route.
pub fn route_item(label: &str, route: &str) -> TestCustomItem {
    TestCustomItem::new(json!({"label": label, "type": "route", "route": route}))
}

/// Custom item pointing at a CMS page.
pub fn page_item(label: &str, page_id: u64) -> TestCustomItem {
    TestCustomItem::new(json!({"label": label, "type": "page", "page_id": page_id}))
}

/// A custom item definition as it appears in the settings blob.
#[derive(Debug, Clone)]
pub struct TestCustomItem {
    fields: Map<String, JsonValue>,
}

impl TestCustomItem {
    fn new(value: JsonValue) -> Self {
        let fields = match value {
            JsonValue::Object(fields) => fields,
            _ => Map::new(),
        };
        Self { fields }
    }

    /// Set the target menu (`membership`, `commerce`, `both` or an alias).
    pub fn target(mut self, menu: &str) -> Self {
        self.fields.insert("menu".to_string(), json!(menu));
        self
    }

    /// Target the membership menu only.
    pub fn for_membership(self) -> Self {
        self.target("membership")
    }

    /// Target the commerce menu only.
    pub fn for_commerce(self) -> Self {
        self.target("commerce")
    }

    /// Set the position.
    pub fn at(mut self, position: u32) -> Self {
        self.fields.insert("position".to_string(), json!(position));
        self
    }

    /// Restrict to roles.
    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.fields.insert("roles".to_string(), json!(roles));
        self
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(self.fields.clone())
    }
}

/// Create a settings blob builder with both flags off.
pub fn test_settings() -> TestSettings {
    TestSettings {
        integration: false,
        custom_only: false,
        hidden: Vec::new(),
        user_base_slug: None,
        items: Vec::new(),
    }
}

/// A settings blob builder.
#[derive(Debug, Clone)]
pub struct TestSettings {
    pub integration: bool,
    pub custom_only: bool,
    pub hidden: Vec<String>,
    pub user_base_slug: Option<String>,
    pub items: Vec<TestCustomItem>,
}

impl TestSettings {
    /// Turn integration on.
    pub fn integration(mut self) -> Self {
        self.integration = true;
        self
    }

    /// Turn custom-only mode on.
    pub fn custom_only(mut self) -> Self {
        self.custom_only = true;
        self
    }

    /// Hide a commerce endpoint.
    pub fn hide(mut self, endpoint: &str) -> Self {
        self.hidden.push(endpoint.to_string());
        self
    }

    pub fn with_user_base_slug(mut self, slug: &str) -> Self {
        self.user_base_slug = Some(slug.to_string());
        self
    }

    /// Append a custom item; its id is its index.
    pub fn with_item(mut self, item: TestCustomItem) -> Self {
        self.items.push(item);
        self
    }

    /// The blob in its stored shape.
    pub fn blob(&self) -> JsonValue {
        let mut blob = json!({
            "enable_integration": u8::from(self.integration),
            "enable_custom_only": u8::from(self.custom_only),
            "commerce_items_to_hide": self.hidden,
            "custom_menu_items": self.items.iter().map(TestCustomItem::to_json).collect::<Vec<_>>(),
        });
        if let (Some(slug), Some(obj)) = (&self.user_base_slug, blob.as_object_mut()) {
            obj.insert("user_base_slug".to_string(), json!(slug));
        }
        blob
    }
}

/// Assertion helpers for composed menus.
pub mod assert {
    use accord_sdk::item_map::ItemMap;
    use accord_sdk::types::is_reserved_key;

    /// Assert the exact key sequence of a menu.
    pub fn keys<T>(menu: &ItemMap<T>, expected: &[&str]) {
        let actual: Vec<&str> = menu.keys().collect();
        assert_eq!(actual, expected, "menu keys differ");
    }

    /// Assert that a key is present.
    pub fn has_key<T>(menu: &ItemMap<T>, key: &str) {
        assert!(
            menu.contains_key(key),
            "Expected menu to contain '{key}', got: {:?}",
            menu.keys().collect::<Vec<_>>()
        );
    }

    /// Assert that a key is absent.
    pub fn lacks_key<T>(menu: &ItemMap<T>, key: &str) {
        assert!(
            !menu.contains_key(key),
            "Expected menu NOT to contain '{key}', got: {:?}",
            menu.keys().collect::<Vec<_>>()
        );
    }

    /// Assert that no key lies in the reserved custom namespace.
    pub fn no_reserved_keys<T>(menu: &ItemMap<T>) {
        let reserved: Vec<&str> = menu.keys().filter(|k| is_reserved_key(k)).collect();
        assert!(reserved.is_empty(), "unexpected reserved keys: {reserved:?}");
    }
}
