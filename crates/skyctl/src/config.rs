use crate::prelude::*;
use log::{debug, warn};
use skyctl_core::config::Config;
use skyctl_core::filter::FilterSpec;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";

/// Login credentials, resolved from flags/env first and the config file second.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    pub fn resolve(
        username: Option<String>,
        password: Option<String>,
        config: &Config,
    ) -> Option<Self> {
        let identifier = username
            .filter(|u| !u.trim().is_empty())
            .or_else(|| config.username().map(str::to_string))?;
        let password = password
            .filter(|p| !p.is_empty())
            .or_else(|| config.password().map(str::to_string))?;

        Some(Self {
            identifier,
            password,
        })
    }
}

/// Candidate config locations, most specific first.
fn config_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs_next::config_dir() {
        candidates.push(dir.join("skyctl").join(CONFIG_FILE_NAME));
    }
    candidates
}

/// Load the configuration file.
///
/// The first existing candidate wins. When none exists the configuration is
/// empty; a file that exists but cannot be parsed is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    for path in config_candidates(explicit) {
        if let Some(contents) = read_optional(&path)? {
            debug!("loading configuration from {}", path.display());
            return Config::from_json_str(&contents)
                .wrap_err_with(|| f!("Failed to load configuration from {}", path.display()));
        }
    }

    if let Some(path) = explicit {
        warn!("configuration file {} not found, using defaults", path.display());
    }
    Ok(Config::default())
}

/// Load the filter spec. A missing file disables filtering.
pub fn load_filter_spec(path: &Path) -> Result<FilterSpec> {
    match read_optional(path)? {
        Some(contents) => FilterSpec::from_json_str(&contents)
            .wrap_err_with(|| f!("Failed to load filter spec from {}", path.display())),
        None => {
            debug!("filter spec {} not found, filtering disabled", path.display());
            Ok(FilterSpec::default())
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Config(f!("Failed to read {}: {}", path.display(), e)).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyctl_core::CoreError;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "config.json", r#"{"excerpt-length": 40, "timeline-did": "did:plc:abc"}"#);

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.excerpt_length(), 40);
        assert_eq!(config.timeline_did(), Some("did:plc:abc"));
    }

    #[test]
    fn test_missing_config_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("nope.json"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "config.json", "[1, 2, 3]");

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Config(_))));
    }

    #[test]
    fn test_missing_filter_spec_is_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        let spec = load_filter_spec(&dir.path().join("filter.json")).unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn test_load_filter_spec() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "filter.json",
            r#"{"block-user": ["spam.test"], "block-patterns": ["/crypto/i"], "rules": {"hashtagcloud": true}}"#,
        );

        let spec = load_filter_spec(&path).unwrap();
        assert_eq!(spec.block_user, vec!["spam.test"]);
        assert!(spec.rules.hashtagcloud);
    }

    #[test]
    fn test_credentials_prefer_flags() {
        let config = Config::from_json_str(
            r#"{"bluesky_username": "cfg.test", "bluesky_password": "cfg-secret"}"#,
        )
        .unwrap();

        let creds = Credentials::resolve(Some("flag.test".to_string()), None, &config).unwrap();
        assert_eq!(creds.identifier, "flag.test");
        assert_eq!(creds.password, "cfg-secret");

        assert!(Credentials::resolve(None, None, &Config::default()).is_none());
    }
}
