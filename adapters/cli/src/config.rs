//! Loads tuning overrides for a headless run.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use corridor_defence_core::GameConfig;

/// Reads the TOML file at `path`, or falls back to the default tuning.
///
/// Missing keys keep their default values. The merged configuration is
/// validated before it is returned.
pub(crate) fn load(path: Option<&Path>) -> Result<GameConfig> {
    let config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("failed to load config file {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    Ok(config)
}

/// Applies a single seed to both the corridor and the wave rolls.
pub(crate) fn reseed(config: &mut GameConfig, seed: u64) {
    config.grid.seed = seed;
    config.waves.seed = seed.rotate_left(32) ^ 0x9e37_79b9_7f4a_7c15;
}

fn parse(contents: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(contents).context("invalid config TOML")?;
    config.validate().context("config out of range")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_keeps_defaults() {
        assert_eq!(parse("").expect("parses"), GameConfig::default());
    }

    #[test]
    fn partial_tables_override_named_keys_only() {
        let config = parse(
            r#"
            [economy]
            initial_money = 900

            [grid]
            columns = 20
            "#,
        )
        .expect("parses");

        let defaults = GameConfig::default();
        assert_eq!(config.economy.initial_money, 900);
        assert_eq!(config.economy.initial_lives, defaults.economy.initial_lives);
        assert_eq!(config.grid.columns, 20);
        assert_eq!(config.grid.rows, defaults.grid.rows);
        assert_eq!(config.waves, defaults.waves);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let error = parse("[grid]\ncolumns = 0\n").expect_err("zero columns rejected");
        assert!(format!("{error:#}").contains("config out of range"));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(parse("[economy\n").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load(Some(Path::new("/nonexistent/corridor.toml"))).expect_err("missing");
        assert!(format!("{error:#}").contains("/nonexistent/corridor.toml"));
    }

    #[test]
    fn reseed_changes_both_streams() {
        let mut config = GameConfig::default();
        reseed(&mut config, 7);
        assert_eq!(config.grid.seed, 7);
        assert_ne!(config.waves.seed, 7);
        assert_ne!(config.waves.seed, GameConfig::default().waves.seed);
    }
}
