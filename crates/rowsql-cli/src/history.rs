use crate::cli::{HistoryArgs, HistoryKind};
use crate::config::ProjectConfig;
use crate::store::FileStore;
use colored::Colorize;
use rowsql::History;

pub fn run(args: HistoryArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(args.config.as_deref())?;
    let history = History::new(FileStore::new(project.history_path()));

    if matches!(args.kind, HistoryKind::All | HistoryKind::Tables) {
        println!("{}", "Tables:".bold());
        print_list(history.table_names());
    }
    if args.kind == HistoryKind::All {
        println!();
    }
    if matches!(args.kind, HistoryKind::All | HistoryKind::Structures) {
        println!("{}", "Structures:".bold());
        print_list(
            history
                .structure_suggestions()
                .into_iter()
                .map(|s| s.label.replace('\n', "\\n"))
                .collect(),
        );
    }

    Ok(())
}

fn print_list(items: Vec<String>) {
    if items.is_empty() {
        println!("  {}", "(none)".dimmed());
        return;
    }
    for (i, item) in items.iter().enumerate() {
        println!("  {}. {item}", i + 1);
    }
}
