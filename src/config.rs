//! Client configuration: deserialization and validation.

use crate::error::QueryError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Where the configuration store API is installed on a stock system.
pub const DEFAULT_EXECUTABLE: &str = "/bin/cli-shell-api";

/// Strip an env var reference to its variable name.
///
/// Accepts `${VAR_NAME}` syntax only. Returns `None` if the value is not a
/// valid env-var reference.
pub fn parse_env_ref(value: &str) -> Option<&str> {
    value.strip_prefix("${").and_then(|s| s.strip_suffix('}'))
}

/// Resolve the configured env for the child process.
///
/// `${VAR}` values are looked up in our own environment; literals pass through
/// unchanged. A reference to an unset variable drops the key entirely, so the
/// child sees it unset rather than empty.
pub fn resolve_env_vars(env: &HashMap<String, String>) -> HashMap<String, String> {
    env.iter()
        .filter_map(|(k, v)| {
            let resolved = match parse_env_ref(v) {
                Some(var_name) => std::env::var(var_name).ok()?,
                None => v.clone(),
            };
            Some((k.clone(), resolved))
        })
        .collect()
}

/// How to reach `cli-shell-api`, parsed from TOML.
///
/// Every field is optional; an empty file yields the stock install.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// The executable to run.
    #[serde(default = "default_executable")]
    pub executable: PathBuf,
    /// Launcher args placed between the executable and the subcommand
    /// (e.g. when `executable` is `sudo` or an interpreter).
    #[serde(default)]
    pub args: Vec<String>,
    /// Env for the tool: literal values, or `${VAR}` references resolved at
    /// spawn time. The store locates the working session through these.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

fn default_executable() -> PathBuf {
    PathBuf::from(DEFAULT_EXECUTABLE)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at a specific executable, no launcher args or env.
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| QueryError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ClientConfig =
            toml::from_str(&content).map_err(|e| QueryError::ConfigParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config, failing fast before any query is run.
    pub fn validate(&self) -> crate::Result<()> {
        if self.executable.as_os_str().is_empty() {
            return Err(QueryError::InvalidConfig(
                "'executable' must not be empty".to_string(),
            ));
        }

        for key in self.env.keys() {
            if key.is_empty() || key.contains(['=', '\0']) {
                return Err(QueryError::InvalidConfig(format!(
                    "env key '{}' is not a valid variable name",
                    key
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse_toml(toml_str: &str) -> ClientConfig {
        toml::from_str(toml_str).expect("valid TOML")
    }

    #[test]
    fn test_parse_env_ref() {
        assert_eq!(parse_env_ref("${FOO}"), Some("FOO"));
        assert_eq!(parse_env_ref("${VYATTA_EDIT_LEVEL}"), Some("VYATTA_EDIT_LEVEL"));
        assert_eq!(parse_env_ref("$FOO"), None);
        assert_eq!(parse_env_ref("literal"), None);
        assert_eq!(parse_env_ref("${"), None);
        assert_eq!(parse_env_ref("${}"), Some(""));
    }

    #[test]
    fn test_resolve_env_vars() {
        // SAFETY: test-only, no concurrent threads depend on this env var.
        unsafe { std::env::set_var("CSTORE_QUERY_TEST_VAR", "resolved_value") };
        let mut env = HashMap::new();
        env.insert("KEY".to_string(), "${CSTORE_QUERY_TEST_VAR}".to_string());
        env.insert("MISSING".to_string(), "${CSTORE_QUERY_UNSET_VAR}".to_string());
        env.insert("EDIT_LEVEL".to_string(), "/".to_string());
        let resolved = resolve_env_vars(&env);
        assert_eq!(resolved.get("KEY").unwrap(), "resolved_value");
        assert_eq!(resolved.get("EDIT_LEVEL").unwrap(), "/");
        assert!(
            !resolved.contains_key("MISSING"),
            "unset reference must leave the key unset, not empty"
        );
        // SAFETY: test-only cleanup.
        unsafe { std::env::remove_var("CSTORE_QUERY_TEST_VAR") };
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_toml("");
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.executable, PathBuf::from("/bin/cli-shell-api"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let config = parse_toml(
            r#"
            executable = "/usr/bin/sudo"
            args = ["-u", "vyattacfg", "/opt/vyatta/sbin/my_cli_shell_api"]

            [env]
            VYATTA_EDIT_LEVEL = "${VYATTA_EDIT_LEVEL}"
            "#,
        );
        assert_eq!(config.executable, PathBuf::from("/usr/bin/sudo"));
        assert_eq!(config.args.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_executable_rejected() {
        let config = parse_toml(r#"executable = """#);
        let result = config.validate();
        assert!(
            matches!(result, Err(QueryError::InvalidConfig(msg)) if msg.contains("executable"))
        );
    }

    #[test]
    fn test_env_literal_values_allowed() {
        let config = parse_toml(
            r#"
            [env]
            VYATTA_EDIT_LEVEL = "/"
            UNIONFS = "$UNIONFS"
            "#,
        );
        assert!(config.validate().is_ok());
        let resolved = resolve_env_vars(&config.env);
        assert_eq!(resolved.get("VYATTA_EDIT_LEVEL").unwrap(), "/");
        // only ${VAR} is a reference; a bare $VAR is passed as written
        assert_eq!(resolved.get("UNIONFS").unwrap(), "$UNIONFS");
    }

    #[test]
    fn test_env_bad_key_rejected() {
        let config = parse_toml(
            r#"
            [env]
            "A=B" = "x"
            "#,
        );
        let result = config.validate();
        assert!(matches!(result, Err(QueryError::InvalidConfig(msg)) if msg.contains("A=B")));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"executable = "/opt/vyatta/bin/cli-shell-api""#).unwrap();
        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(
            config.executable,
            PathBuf::from("/opt/vyatta/bin/cli-shell-api")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(QueryError::ConfigRead { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "executable = [").unwrap();
        let result = ClientConfig::load(file.path());
        assert!(matches!(result, Err(QueryError::ConfigParse { .. })));
    }

    #[test]
    fn test_load_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "executable = \"\"").unwrap();
        let result = ClientConfig::load(file.path());
        assert!(matches!(result, Err(QueryError::InvalidConfig(_))));
    }
}
