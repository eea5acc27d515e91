use crate::cli::{GenerateArgs, Input};
use crate::clipboard::CommandClipboard;
use crate::config::ProjectConfig;
use crate::store::FileStore;
use colored::Colorize;
use rowsql::{GenerateRequest, Workflow};
use std::io::Read;

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(args.config.as_deref())?;
    let defaults = project.file.defaults;

    let structure = match &args.structure {
        Some(input) => read_input(input, "structure")?,
        None => anyhow::bail!("missing table structure"),
    };
    let rows = read_input(&args.rows, "rows")?;

    let mut options = defaults.options();
    if let Some(dialect) = args.dialect {
        options.dialect = dialect;
    }
    if let Some(quoting) = args.quoting {
        options.quoting = quoting;
    }
    if let Some(row_format) = args.row_format {
        options.row_format = row_format;
    }

    let request = GenerateRequest {
        query_type: args.query_type.unwrap_or(defaults.query_type),
        table_name: args.table.clone().unwrap_or_default(),
        structure,
        rows,
        options,
    };

    let record = project.file.history.enabled && !args.no_history;
    let store = FileStore::new(project.history_path());
    tracing::debug!(
        config = ?project.config_path,
        history = %store.path().display(),
        record,
        "resolved project config"
    );
    let clipboard = CommandClipboard::from_config(&project.file.clipboard);
    let mut workflow = Workflow::new(store, clipboard).record_history(record);

    let outcome = workflow.generate(&request);
    let statement = match outcome.result {
        Ok(statement) => statement,
        Err(e) => anyhow::bail!(e),
    };

    println!("{}", statement.sql);

    if args.copy {
        let status = workflow.copy(&statement.sql);
        if status.is_error {
            eprintln!("{} {}", "WARN".yellow().bold(), status.message);
        } else {
            eprintln!("{} {}", "✓".green().bold(), status.message);
        }
    }

    Ok(())
}

fn read_input(input: &Input, what: &str) -> anyhow::Result<String> {
    match input {
        Input::Inline(text) => Ok(text.clone()),
        Input::File(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {what} file {}: {e}", path.display())),
        Input::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| anyhow::anyhow!("failed to read {what} from stdin: {e}"))?;
            Ok(buf)
        }
    }
}
