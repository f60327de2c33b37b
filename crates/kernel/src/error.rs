//! Kernel error types.
//!
//! Menu composition itself never fails; errors only come from loading and
//! saving settings and from reading fixture files.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the settings store and the settings blob.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings YAML is invalid: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("settings file {path}: unsupported format, expected .json, .yaml or .yml")]
    UnsupportedFormat { path: PathBuf },

    #[error("settings blob must be an object, got {found}")]
    NotAnObject { found: &'static str },
}

impl SettingsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from loading a static site fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fixture YAML is invalid: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("fixture home_url '{url}' is not an absolute URL: {source}")]
    HomeUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Short name of a JSON value's type for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_file() {
        let err = SettingsError::UnsupportedFormat {
            path: PathBuf::from("/etc/accord/settings.ini"),
        };
        let msg = err.to_string();
        assert!(msg.contains("settings.ini"));
        assert!(msg.contains(".yaml"));
    }

    #[test]
    fn not_an_object_names_the_type() {
        let err = SettingsError::NotAnObject {
            found: json_type_name(&serde_json::json!([1, 2])),
        };
        assert_eq!(err.to_string(), "settings blob must be an object, got array");
    }
}
