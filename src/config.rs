//! JSON configuration for analysis runs.
//!
//! ```json
//! {
//!   "resolve": { "chooseLocal": false },
//!   "schema": { "maxDepth": 8, "lateBindParameters": "true" }
//! }
//! ```
//!
//! Every field is optional. Boolean options also accept the strings
//! `"true"` and `"false"`.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tshape_resolver::ResolveOptions;
use tshape_schema::SchemaOptions;

/// Custom deserializer for boolean options that accepts both bool and string values.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => {
            let normalized = s.trim().to_lowercase();
            match normalized.as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(Error::custom(format!(
                    "invalid boolean value: '{}'. Expected true, false, 'true', or 'false'",
                    s
                ))),
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    resolve: Option<RawResolveOptions>,
    #[serde(default)]
    schema: Option<RawSchemaOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResolveOptions {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    choose_local: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchemaOptions {
    #[serde(default)]
    max_depth: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    late_bind_parameters: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    inline_call_bodies: Option<bool>,
    #[serde(default)]
    template_expansion_limit: Option<usize>,
    #[serde(default)]
    max_deferred_definitions: Option<usize>,
}

impl RawResolveOptions {
    fn resolve(self) -> ResolveOptions {
        let defaults = ResolveOptions::default();
        ResolveOptions {
            choose_local: self.choose_local.unwrap_or(defaults.choose_local),
        }
    }
}

impl RawSchemaOptions {
    fn resolve(self) -> SchemaOptions {
        let defaults = SchemaOptions::default();
        SchemaOptions {
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            late_bind_parameters: self
                .late_bind_parameters
                .unwrap_or(defaults.late_bind_parameters),
            inline_call_bodies: self
                .inline_call_bodies
                .unwrap_or(defaults.inline_call_bodies),
            template_expansion_limit: self
                .template_expansion_limit
                .unwrap_or(defaults.template_expansion_limit),
            max_deferred_definitions: self
                .max_deferred_definitions
                .unwrap_or(defaults.max_deferred_definitions),
        }
    }
}

/// Options for one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub resolve: ResolveOptions,
    pub schema: SchemaOptions,
}

impl AnalysisConfig {
    pub fn from_json_str(source: &str) -> Result<Self> {
        let raw: RawConfig =
            serde_json::from_str(source).context("failed to parse analysis config JSON")?;
        Ok(AnalysisConfig {
            resolve: raw.resolve.unwrap_or_default().resolve(),
            schema: raw.schema.unwrap_or_default().resolve(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis config: {}", path.display()))?;
        Self::from_json_str(&source)
            .with_context(|| format!("failed to parse analysis config: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AnalysisConfig::from_json_str("{}").expect("parses");
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn booleans_accept_strings() {
        let config = AnalysisConfig::from_json_str(
            r#"{ "resolve": { "chooseLocal": "true" }, "schema": { "lateBindParameters": "yes", "inlineCallBodies": false } }"#,
        )
        .expect("parses");
        assert!(config.resolve.choose_local);
        assert!(config.schema.late_bind_parameters);
        assert!(!config.schema.inline_call_bodies);
    }

    #[test]
    fn unset_fields_keep_their_defaults() {
        let config =
            AnalysisConfig::from_json_str(r#"{ "schema": { "maxDepth": 3 } }"#).expect("parses");
        assert_eq!(config.schema.max_depth, 3);
        assert_eq!(
            config.schema.template_expansion_limit,
            SchemaOptions::default().template_expansion_limit
        );
    }

    #[test]
    fn invalid_booleans_are_rejected() {
        let error = AnalysisConfig::from_json_str(r#"{ "schema": { "inlineCallBodies": "maybe" } }"#)
            .expect_err("rejects");
        assert!(format!("{error:#}").contains("invalid boolean value"));
    }
}
