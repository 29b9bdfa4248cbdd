//! Rule variant selection and encounter tunables

use super::ConfigError;
use crate::rules::{
    AbilityScoreVariant, EncumbranceVariant, InitiativeResetPolicy, InitiativeVariant,
    MasteryVariant, ProgressionVariant,
};
use crate::to_hit::ToHitVariant;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Game seconds in one combat round
pub const DEFAULT_ROUND_DURATION: u32 = 10;

/// Which variant is active on each rule axis
///
/// Unset optional axes stay inactive and contribute nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "default_to_hit")]
    pub to_hit: ToHitVariant,
    #[serde(default = "default_initiative")]
    pub initiative: InitiativeVariant,
    #[serde(default)]
    pub initiative_reset: InitiativeResetPolicy,
    #[serde(default)]
    pub encumbrance: Option<EncumbranceVariant>,
    #[serde(default)]
    pub weapon_mastery: Option<MasteryVariant>,
    #[serde(default)]
    pub ability_scores: Option<AbilityScoreVariant>,
    #[serde(default)]
    pub class_progression: Option<ProgressionVariant>,
    #[serde(default = "default_round_duration")]
    pub round_duration: u32,
    /// Open a declaration phase when the encounter starts
    #[serde(default = "default_declarations")]
    pub declarations: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            to_hit: default_to_hit(),
            initiative: default_initiative(),
            initiative_reset: InitiativeResetPolicy::default(),
            encumbrance: None,
            weapon_mastery: None,
            ability_scores: None,
            class_progression: None,
            round_duration: default_round_duration(),
            declarations: default_declarations(),
        }
    }
}

fn default_to_hit() -> ToHitVariant {
    ToHitVariant::DescendingThac0
}
fn default_initiative() -> InitiativeVariant {
    InitiativeVariant::Individual
}
fn default_round_duration() -> u32 {
    DEFAULT_ROUND_DURATION
}
fn default_declarations() -> bool {
    true
}

impl RulesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_duration == 0 {
            return Err(ConfigError::Invalid(
                "round_duration must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load rule selection from a TOML file
pub fn load_rules_config(path: &Path) -> Result<RulesConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rules_config(&content)
}

/// Load rule selection from a TOML string
pub fn parse_rules_config(content: &str) -> Result<RulesConfig, ConfigError> {
    let config: RulesConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Get the bundled rule selection
pub fn default_rules_config() -> RulesConfig {
    let toml = include_str!("../../config/rules.toml");
    parse_rules_config(toml).unwrap_or_else(|e| {
        warn!(error = %e, "bundled rules.toml unreadable, using built-in defaults");
        RulesConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules() {
        let toml = r#"
to_hit = "dark_dungeons"
initiative = "group"
initiative_reset = "reroll"
weapon_mastery = "becmi"
ability_scores = "classic"
round_duration = 6
declarations = false
"#;

        let config = parse_rules_config(toml).unwrap();
        assert_eq!(config.to_hit, ToHitVariant::DarkDungeons);
        assert_eq!(config.initiative, InitiativeVariant::Group);
        assert_eq!(config.initiative_reset, InitiativeResetPolicy::Reroll);
        assert_eq!(config.weapon_mastery, Some(MasteryVariant::Becmi));
        assert_eq!(config.encumbrance, None);
        assert_eq!(config.round_duration, 6);
        assert!(!config.declarations);
    }

    #[test]
    fn test_empty_uses_defaults() {
        let config = parse_rules_config("").unwrap();
        assert_eq!(config, RulesConfig::default());
        assert_eq!(config.round_duration, 10);
        assert!(config.declarations);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let err = parse_rules_config("to_hit = \"percentile\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_round_duration_rejected() {
        let err = parse_rules_config("round_duration = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = load_rules_config(Path::new("no/such/rules.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("no/such/rules.toml"));
    }

    #[test]
    fn test_bundled_config_parses() {
        let toml = include_str!("../../config/rules.toml");
        let config = parse_rules_config(toml).unwrap();
        assert_eq!(config, default_rules_config());
        assert_eq!(config.to_hit, ToHitVariant::Classic);
    }
}
