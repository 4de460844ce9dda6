//! Transfer profiles: a saved choice of record kinds and E6AXIS seeds.
//!
//! ```toml
//! name = "cell 4 retrofit"
//! skip = ["LOAD_DATA"]
//! in_place = false
//!
//! [e6axis]
//! seeds = ["HOME", "RPARK=PARK"]
//! literal_suffix = true
//! ```

use std::collections::HashSet;
use std::path::Path;

use robocfg_engine::{KindSet, NamePair, RecordKind, ResolverOptions, TransferOptions};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransferProfile {
    #[serde(default)]
    pub name: Option<String>,
    /// Kinds to run. Empty means all.
    #[serde(default)]
    pub only: Vec<String>,
    /// Kinds removed from the selection.
    #[serde(default)]
    pub skip: Vec<String>,
    #[serde(default)]
    pub in_place: bool,
    #[serde(default)]
    pub e6axis: E6AxisConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct E6AxisConfig {
    /// `TARGET=SOURCE` pairs, or bare `NAME` for `XNAME=NAME`.
    #[serde(default = "default_seeds")]
    pub seeds: Vec<String>,
    #[serde(default = "default_true")]
    pub literal_suffix: bool,
}

fn default_seeds() -> Vec<String> {
    vec!["XHOME=HOME".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for E6AxisConfig {
    fn default() -> Self {
        Self { seeds: default_seeds(), literal_suffix: true }
    }
}

/// Resolve `only`/`skip` kind names into a set.
///
/// An empty `only` selects every kind. Naming a kind in both lists is an
/// error.
pub fn select_kinds(only: &[String], skip: &[String]) -> Result<KindSet, ConfigError> {
    let parse = |names: &[String]| -> Result<Vec<RecordKind>, ConfigError> {
        names
            .iter()
            .map(|n| n.parse::<RecordKind>().map_err(|e| ConfigError::UnknownKind(e.to_string())))
            .collect()
    };
    let only = parse(only)?;
    let skip = parse(skip)?;

    if let Some(kind) = only.iter().find(|k| skip.contains(k)) {
        return Err(ConfigError::Validation(format!("{kind} is both selected and skipped")));
    }

    let mut kinds = if only.is_empty() { KindSet::all() } else { only.into_iter().collect() };
    for kind in skip {
        kinds.remove(kind);
    }
    Ok(kinds)
}

/// Parse seed specs, rejecting empty names and duplicate target bases.
pub fn parse_seeds(specs: &[String]) -> Result<Vec<NamePair>, ConfigError> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::with_capacity(specs.len());
    for spec in specs {
        let pair = NamePair::parse(spec)
            .ok_or_else(|| ConfigError::Validation(format!("invalid E6AXIS seed '{spec}'")))?;
        if !seen.insert(pair.target.clone()) {
            return Err(ConfigError::Validation(format!("E6AXIS target base '{}' is mapped twice", pair.target)));
        }
        pairs.push(pair);
    }
    Ok(pairs)
}

impl TransferProfile {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let profile: TransferProfile = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        log::debug!("loaded profile {}", path.display());
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        select_kinds(&self.only, &self.skip)?;
        parse_seeds(&self.e6axis.seeds)?;
        Ok(())
    }

    pub fn kinds(&self) -> Result<KindSet, ConfigError> {
        select_kinds(&self.only, &self.skip)
    }

    pub fn to_options(&self) -> Result<TransferOptions, ConfigError> {
        Ok(TransferOptions {
            kinds: self.kinds()?,
            e6axis_seed: parse_seeds(&self.e6axis.seeds)?,
            resolver: ResolverOptions { literal_suffix: self.e6axis.literal_suffix },
        })
    }
}
