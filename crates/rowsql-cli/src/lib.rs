mod cli;
mod clipboard;
mod config;
mod generate;
mod history;
mod init;
mod store;

use tracing_subscriber::EnvFilter;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let invocation = cli::parse_args(&args)?;
    init_logging(invocation.verbose);

    match invocation.command {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Generate(args) => generate::run(args),
        cli::Command::History(args) => history::run(args),
        cli::Command::Init(args) => init::run(args),
    }
}

/// Logs go to stderr; stdout carries only SQL. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("rowsql=debug,rowsql_cli=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
