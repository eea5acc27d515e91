use rowsql::{Dialect, GenerateOptions, IdentQuoting, QueryType, RowFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::DEFAULT_CONFIG;

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// `None` when running on built-in defaults.
    pub config_path: Option<PathBuf>,
    pub config_dir: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    /// Load `path`, or `./rowsql.toml` if it exists when `path` is `None`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG), false),
        };

        if !explicit && !config_path.exists() {
            tracing::debug!("no {DEFAULT_CONFIG} found; using built-in defaults");
            return Ok(Self {
                config_path: None,
                config_dir: PathBuf::from("."),
                file: ConfigFile::default(),
            });
        }

        let config_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to load config file {}: {e:#}",
                config_path.display()
            )
        })?;

        Ok(Self {
            config_path: Some(config_path),
            config_dir,
            file,
        })
    }

    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.config_dir.join(p)
        }
    }

    pub fn history_path(&self) -> PathBuf {
        self.resolve_path(&self.file.history.file)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            defaults: DefaultsConfig::default(),
            history: HistoryConfig::default(),
            clipboard: ClipboardConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub query_type: QueryType,
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub quote_identifiers: IdentQuoting,
    #[serde(default)]
    pub row_format: RowFormat,
}

impl DefaultsConfig {
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            dialect: self.dialect,
            quoting: self.quote_identifiers,
            row_format: self.row_format,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_history_file")]
    pub file: String,
}

fn default_true() -> bool {
    true
}

fn default_history_file() -> String {
    ".rowsql/history.json".to_string()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: default_history_file(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClipboardConfig {
    /// Program that reads the text to copy from stdin. Probed when unset.
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        self.history.file = expand_env_vars(&self.history.file)?;

        if let Some(command) = self.clipboard.command.as_mut() {
            *command = expand_env_vars(command)?;
        }
        for arg in &mut self.clipboard.args {
            *arg = expand_env_vars(arg)?;
        }

        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }
        if self.history.file.trim().is_empty() {
            anyhow::bail!("history.file must not be empty");
        }
        if let Some(command) = &self.clipboard.command {
            if command.trim().is_empty() {
                anyhow::bail!("clipboard.command must not be empty");
            }
        }
        Ok(())
    }
}

/// Replace each `${VAR}` with the environment value. Unset variables are errors.
fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Echo the reference as written, without inventing a closing brace.
            anyhow::bail!("unterminated env var reference: ${{{after}");
        };
        let key = &after[..end];
        if key.is_empty() {
            anyhow::bail!("invalid env var reference: ${{}}");
        }
        let value = std::env::var(key)
            .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let file = ConfigFile::parse("version = \"1\"").unwrap();
        assert_eq!(file.defaults.dialect, Dialect::Postgresql);
        assert_eq!(file.defaults.query_type, QueryType::Insert);
        assert_eq!(file.defaults.quote_identifiers, IdentQuoting::Always);
        assert!(file.history.enabled);
        assert_eq!(file.history.file, ".rowsql/history.json");
        assert!(file.clipboard.command.is_none());
    }

    #[test]
    fn full_config() {
        let raw = r#"
version = "1"

[defaults]
query_type = "update"
dialect = "mysql"
quote_identifiers = "never"
row_format = "json"

[history]
enabled = false
file = "hist.json"

[clipboard]
command = "xclip"
args = ["-selection", "clipboard"]
"#;
        let file = ConfigFile::parse(raw).unwrap();
        let options = file.defaults.options();
        assert_eq!(file.defaults.query_type, QueryType::Update);
        assert_eq!(options.dialect, Dialect::Mysql);
        assert_eq!(options.quoting, IdentQuoting::Never);
        assert_eq!(options.row_format, RowFormat::Json);
        assert!(!file.history.enabled);
        assert_eq!(file.clipboard.args, ["-selection", "clipboard"]);
    }

    #[test]
    fn postgres_alias_is_accepted() {
        let file = ConfigFile::parse("version = \"1\"\n[defaults]\ndialect = \"postgres\"").unwrap();
        assert_eq!(file.defaults.dialect, Dialect::Postgresql);
    }

    #[test]
    fn rejects_unknown_version() {
        assert!(ConfigFile::parse("version = \"2\"").is_err());
    }

    #[test]
    fn rejects_unknown_dialect() {
        assert!(ConfigFile::parse("version = \"1\"\n[defaults]\ndialect = \"oracle\"").is_err());
    }

    #[test]
    fn expands_env_vars() {
        let Ok(path) = std::env::var("PATH") else {
            return;
        };
        assert_eq!(expand_env_vars("${PATH}/x").unwrap(), format!("{path}/x"));
        assert_eq!(expand_env_vars("no vars").unwrap(), "no vars");
    }

    #[test]
    fn env_var_errors() {
        assert!(expand_env_vars("${ROWSQL_SURELY_UNSET_VAR}").is_err());
        assert!(expand_env_vars("${").is_err());
        assert!(expand_env_vars("${}").is_err());
        let err = expand_env_vars("dir/${HOME").unwrap_err();
        assert_eq!(err.to_string(), "unterminated env var reference: ${HOME");
    }

    #[test]
    fn resolves_history_path_against_config_dir() {
        let project = ProjectConfig {
            config_path: Some(PathBuf::from("conf/rowsql.toml")),
            config_dir: PathBuf::from("conf"),
            file: ConfigFile::default(),
        };
        assert_eq!(
            project.history_path(),
            PathBuf::from("conf").join(".rowsql/history.json")
        );
    }
}
