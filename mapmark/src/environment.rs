use std::{env, path::PathBuf};

use crate::openstreetmap;

const DEFAULT_STORAGE_PATH: &str = "mapmark-storage.json";
const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:8080/";

#[derive(Debug, Clone)]
pub struct Environment {
    pub storage_path: PathBuf,
    pub osm_base_url: String,
    pub seed_examples: bool,
    pub share_base_url: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            storage_path: DEFAULT_STORAGE_PATH.into(),
            osm_base_url: openstreetmap::BASE_URL.into(),
            seed_examples: true,
            share_base_url: DEFAULT_SHARE_BASE_URL.into(),
        }
    }
}

fn var_or(name: &str, default: &str) -> anyhow::Result<String> {
    match env::var(name) {
        Ok(v) if v.trim().is_empty() => Ok(default.to_string()),
        Ok(v) => Ok(v),
        Err(env::VarError::NotPresent) => Ok(default.to_string()),
        Err(env::VarError::NotUnicode(e)) => {
            anyhow::bail!("Invalid value for environment variable {name}: {e:?}");
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn load() -> anyhow::Result<Environment> {
    let default = Environment::default();

    let storage_path = var_or("MAPMARK_STORAGE_PATH", DEFAULT_STORAGE_PATH)?.into();
    let osm_base_url = var_or("OSM_BASE_URL", openstreetmap::BASE_URL)?;
    let share_base_url = var_or("MAPMARK_SHARE_BASE_URL", DEFAULT_SHARE_BASE_URL)?;

    let seed_examples = match env::var("MAPMARK_SEED_EXAMPLES") {
        Ok(value) => parse_bool(&value).unwrap_or_else(|| {
            log::warn!("Invalid MAPMARK_SEED_EXAMPLES `{value}`");
            log::info!("Using default {}", default.seed_examples);
            default.seed_examples
        }),
        Err(_) => default.seed_examples,
    };

    Ok(Environment {
        storage_path,
        osm_base_url,
        seed_examples,
        share_base_url,
    })
}

#[test]
fn test_parse_bool() {
    assert_eq!(parse_bool("TRUE"), Some(true));
    assert_eq!(parse_bool(" 0 "), Some(false));
    assert_eq!(parse_bool("maybe"), None);
}
