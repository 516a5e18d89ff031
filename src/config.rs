//! Configuration for the comment tooling.
//!
//! Settings come from a small `KEY=VALUE` env file so the API key does not
//! have to be passed on the command line (where it would land in shell
//! history). Precedence for the key: explicit CLI value, then the
//! `YOUTUBE_API_KEY` process environment variable, then the config file.

use anyhow::{Context, Result};
use std::{env, fs, path::Path};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/ytcomments-env";
pub const API_KEY_ENV_VAR: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
}

/// Reads the config file if it exists. Lines are `KEY=VALUE`, `#` starts a
/// comment, values may be double-quoted.
pub fn read_env_config(path: &Path) -> Result<Option<EnvConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let mut cfg = EnvConfig::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value_raw)) = trimmed.split_once('=') {
            let value = value_raw.trim().trim_matches('"');
            if value.is_empty() {
                continue;
            }
            match key {
                "YOUTUBE_API_KEY" => cfg.api_key = Some(value.to_string()),
                "API_BASE_URL" => cfg.api_base_url = Some(value.to_string()),
                _ => {}
            }
        }
    }
    Ok(Some(cfg))
}

/// Resolves the API key from CLI argument, process environment, and config
/// file, in that order.
pub fn resolve_api_key(cli_value: Option<String>, file_cfg: Option<&EnvConfig>) -> Option<String> {
    resolve_api_key_from(cli_value, env::var(API_KEY_ENV_VAR).ok(), file_cfg)
}

fn resolve_api_key_from(
    cli_value: Option<String>,
    env_value: Option<String>,
    file_cfg: Option<&EnvConfig>,
) -> Option<String> {
    cli_value
        .or(env_value)
        .or_else(|| file_cfg.and_then(|cfg| cfg.api_key.clone()))
        .filter(|key| !key.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn read_env_config_extracts_key_and_base_url() {
        let cfg = make_config(
            "YOUTUBE_API_KEY=\"AIzaTest\"\nAPI_BASE_URL=\"http://localhost:9000/youtube/v3\"\n",
        );
        let parsed = read_env_config(cfg.path()).unwrap().unwrap();
        assert_eq!(parsed.api_key.as_deref(), Some("AIzaTest"));
        assert_eq!(
            parsed.api_base_url.as_deref(),
            Some("http://localhost:9000/youtube/v3")
        );
    }

    #[test]
    fn read_env_config_skips_comments_and_unknown_keys() {
        let cfg = make_config("# comment\nOTHER=1\nYOUTUBE_API_KEY=abc\n");
        let parsed = read_env_config(cfg.path()).unwrap().unwrap();
        assert_eq!(parsed.api_key.as_deref(), Some("abc"));
        assert_eq!(parsed.api_base_url, None);
    }

    #[test]
    fn read_env_config_missing_file_is_none() {
        let missing = Path::new("/nonexistent/ytcomments-env");
        assert!(read_env_config(missing).unwrap().is_none());
    }

    #[test]
    fn resolve_prefers_cli_over_env_over_file() {
        let file_cfg = EnvConfig {
            api_key: Some("from-file".into()),
            api_base_url: None,
        };
        assert_eq!(
            resolve_api_key_from(
                Some("from-cli".into()),
                Some("from-env".into()),
                Some(&file_cfg)
            ),
            Some("from-cli".into())
        );
        assert_eq!(
            resolve_api_key_from(None, Some("from-env".into()), Some(&file_cfg)),
            Some("from-env".into())
        );
        assert_eq!(
            resolve_api_key_from(None, None, Some(&file_cfg)),
            Some("from-file".into())
        );
        assert_eq!(resolve_api_key_from(None, None, None), None);
    }

    #[test]
    fn resolve_ignores_blank_values() {
        assert_eq!(resolve_api_key_from(Some("   ".into()), None, None), None);
    }
}
