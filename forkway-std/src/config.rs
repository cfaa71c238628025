//! Declarative candidate tables.
//!
//! A candidate set can be described in TOML or JSON by handler *names* and
//! resolved against a [`HandlerRegistry`] at startup. The shape of the
//! `candidates` value decides the form:
//!
//! ```toml
//! # indexed: an array of arrays of names
//! name = "by-role"
//! candidates = [["audit", "admin_panel"], ["dashboard"]]
//! ```
//!
//! ```toml
//! # keyed: a table of arrays of names
//! name = "by-tenant"
//!
//! [candidates]
//! acme = ["acme_branding"]
//! globex = ["globex_branding", "globex_quota"]
//! ```
//!
//! Any other shape is accepted and selects nothing. Unknown names resolve to
//! [`Entry::Unresolved`](crate::conditional::Entry::Unresolved) and are
//! reported when their group is selected.

use crate::{conditional::CandidateSet, registry::HandlerRegistry};
use serde::{Deserialize, de::IgnoredAny};
use std::{collections::BTreeMap, path::Path};
use thiserror::Error;

/// Errors that can occur while loading a dispatch configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML text could not be parsed.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The JSON text could not be parsed.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// The candidate groups, by handler name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CandidateSpec {
    /// An array of arrays of names.
    Indexed(Vec<Vec<String>>),
    /// A table from key to an array of names.
    Keyed(BTreeMap<String, Vec<String>>),
    /// Anything else.
    Unrecognized(IgnoredAny),
}

impl Default for CandidateSpec {
    fn default() -> Self {
        CandidateSpec::Indexed(Vec::new())
    }
}

impl CandidateSpec {
    /// Resolve every name against `registry`.
    pub fn resolve<Req, Res>(
        &self,
        registry: &HandlerRegistry<Req, Res>,
    ) -> CandidateSet<Req, Res> {
        match self {
            CandidateSpec::Indexed(groups) => {
                CandidateSet::indexed(groups.iter().map(|names| registry.group(names)))
            }
            CandidateSpec::Keyed(groups) => CandidateSet::keyed(
                groups
                    .iter()
                    .map(|(key, names)| (key.clone(), registry.group(names))),
            ),
            CandidateSpec::Unrecognized(_) => CandidateSet::Unrecognized,
        }
    }

    /// Every handler name mentioned, in declaration order.
    pub fn handler_names(&self) -> Vec<&str> {
        match self {
            CandidateSpec::Indexed(groups) => groups.iter().flatten().map(String::as_str).collect(),
            CandidateSpec::Keyed(groups) => groups.values().flatten().map(String::as_str).collect(),
            CandidateSpec::Unrecognized(_) => Vec::new(),
        }
    }
}

/// One conditional stage, as written in a config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatchConfig {
    /// Stage name used in log output.
    #[serde(default)]
    pub name: Option<String>,
    /// The candidate groups.
    #[serde(default)]
    pub candidates: CandidateSpec,
}

impl DispatchConfig {
    /// Parse TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Parse JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Names in the config that `registry` does not know.
    pub fn unknown_names<Req, Res>(&self, registry: &HandlerRegistry<Req, Res>) -> Vec<String> {
        self.candidates
            .handler_names()
            .into_iter()
            .filter(|name| !registry.contains(name))
            .map(str::to_owned)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        conditional::{Entry, conditional},
        testing::{CallLog, Recording},
    };
    use forkway_core::{Condition, Flow, Middleware};

    fn registry(log: &CallLog) -> HandlerRegistry<(), ()> {
        HandlerRegistry::builder()
            .register("h1", Recording::new("h1", log))
            .register("h2", Recording::new("h2", log))
            .register("h3", Recording::new("h3", log))
            .build()
    }

    #[test]
    fn indexed_from_toml() {
        let config = DispatchConfig::from_toml_str(
            r#"
            name = "by-role"
            candidates = [["h1", "h2"], ["h3"]]
            "#,
        )
        .unwrap();
        assert_eq!(config.name.as_deref(), Some("by-role"));

        let set = config.candidates.resolve(&registry(&CallLog::new()));
        assert_eq!(set.len(), 2);
        assert_eq!(set.select(&Condition::Bool(true)).map(|g| g.len()), Some(2));
    }

    #[test]
    fn keyed_from_toml() {
        let config = DispatchConfig::from_toml_str(
            r#"
            [candidates]
            x = ["h1", "h2"]
            y = ["h3"]
            "#,
        )
        .unwrap();

        let set = config.candidates.resolve(&registry(&CallLog::new()));
        assert!(matches!(set, CandidateSet::Keyed(_)));
        assert_eq!(set.select(&Condition::Key("y".into())).map(|g| g.len()), Some(1));
    }

    #[test]
    fn other_shapes_are_unrecognized() {
        let config = DispatchConfig::from_json_str(r#"{ "candidates": "test" }"#).unwrap();
        assert!(matches!(config.candidates, CandidateSpec::Unrecognized(_)));

        let config = DispatchConfig::from_json_str(r#"{ "candidates": ["test", ["h1"]] }"#)
            .unwrap();
        assert!(matches!(config.candidates, CandidateSpec::Unrecognized(_)));
        assert!(config.candidates.handler_names().is_empty());

        let config = DispatchConfig::from_json_str("{}").unwrap();
        let set = config.candidates.resolve(&registry(&CallLog::new()));
        assert!(set.is_empty());
    }

    #[test]
    fn unknown_names_are_reported_and_unresolved() {
        let config = DispatchConfig::from_json_str(r#"{ "candidates": [["h1", "nope"]] }"#)
            .unwrap();
        let registry = registry(&CallLog::new());

        assert_eq!(config.unknown_names(&registry), ["nope"]);
        let set = config.candidates.resolve(&registry);
        let group = set.select(&Condition::Other).unwrap();
        assert!(matches!(group.entries()[1], Entry::Unresolved(_)));
    }

    #[test]
    fn invalid_text_is_an_error() {
        assert!(matches!(
            DispatchConfig::from_toml_str("candidates = [["),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            DispatchConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            DispatchConfig::from_path("/definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_config_driven_stage_dispatches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dispatch.toml");
        std::fs::write(&path, "candidates = [[\"h1\"], [\"h2\", \"h3\"]]\n").unwrap();

        let log = CallLog::new();
        let config = DispatchConfig::from_path(&path).unwrap();
        let stage = conditional(|_: &()| false)
            .candidates(config.candidates.resolve(&registry(&log)));

        assert_eq!(stage.handle(&mut (), &mut ()).await.unwrap(), Flow::Next);
        assert_eq!(log.entries(), ["h2", "h3"]);
    }
}
