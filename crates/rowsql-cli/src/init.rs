use crate::cli::InitArgs;
use std::path::Path;

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    write_template(&args.config)?;
    println!("wrote {}", args.config.display());
    Ok(())
}

const TEMPLATE: &str = r#"version = "1"

[defaults]
query_type = "insert"        # insert | update
dialect = "postgresql"       # postgresql | mysql
quote_identifiers = "always" # always | never
row_format = "auto"          # auto | json

[history]
enabled = true
file = ".rowsql/history.json"

# [clipboard]
# command = "xclip"
# args = ["-selection", "clipboard"]
"#;

fn write_template(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("failed to create directory {}: {e}", parent.display())
            })?;
        }
    }

    std::fs::write(path, TEMPLATE)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;

    #[test]
    fn template_parses() {
        let file = ConfigFile::parse(TEMPLATE).unwrap();
        assert!(file.history.enabled);
        assert!(file.clipboard.command.is_none());
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("rowsql-init-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("rowsql.toml");

        write_template(&path).unwrap();
        assert!(write_template(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
