//! Loading and rendering of locale content.

use std::path::Path;

use serde_json::Value;

use crate::error::{LocalizorError, Result};

/// Serialization format shared by locale files and the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Resolve a format from a configured extension.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension {
            "yml" | "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(LocalizorError::Config(format!(
                "unsupported extension \"{other}\" (expected yml or json)"
            ))),
        }
    }

    /// Read and parse a file.
    pub fn load(self, path: &Path) -> Result<Value> {
        let raw = std::fs::read_to_string(path).map_err(|e| LocalizorError::read(path, e))?;
        self.parse(&raw, path)
    }

    /// Parse raw content; `origin` is only used for error reporting.
    pub fn parse(self, raw: &str, origin: &Path) -> Result<Value> {
        match self {
            Self::Yaml => serde_yaml::from_str::<serde_yaml::Value>(raw)
                .map(yaml_to_json)
                .map_err(|e| LocalizorError::ParseFailure {
                    path: origin.to_path_buf(),
                    message: e.to_string(),
                }),
            Self::Json => serde_json::from_str(raw).map_err(|e| LocalizorError::ParseFailure {
                path: origin.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Serialize a value fully in memory. Object keys come out sorted and
    /// YAML nulls are written as plain `null`.
    pub fn render(self, value: &Value) -> Result<String> {
        match self {
            Self::Yaml => {
                serde_yaml::to_string(value).map_err(|e| LocalizorError::Render(e.to_string()))
            }
            Self::Json => {
                serde_json::to_string(value).map_err(|e| LocalizorError::Render(e.to_string()))
            }
        }
    }
}

/// Convert a YAML value, stringifying non-string mapping keys and dropping tags.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (key_to_string(k), yaml_to_json(v)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn key_to_string(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
