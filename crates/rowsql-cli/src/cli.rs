use rowsql::{Dialect, IdentQuoting, QueryType, RowFormat};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Generate,
    History,
    Init,
}

#[derive(Debug, Clone)]
pub struct Invocation {
    pub verbose: bool,
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Generate(GenerateArgs),
    History(HistoryArgs),
    Init(InitArgs),
}

/// Where a piece of text input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Inline(String),
    File(PathBuf),
    Stdin,
}

#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// `None` means the default `rowsql.toml`, which may be absent.
    pub config: Option<PathBuf>,
    pub query_type: Option<QueryType>,
    pub dialect: Option<Dialect>,
    pub quoting: Option<IdentQuoting>,
    pub row_format: Option<RowFormat>,
    pub table: Option<String>,
    pub structure: Option<Input>,
    pub rows: Input,
    pub copy: bool,
    pub no_history: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    All,
    Tables,
    Structures,
}

#[derive(Debug, Clone)]
pub struct HistoryArgs {
    pub config: Option<PathBuf>,
    pub kind: HistoryKind,
}

#[derive(Debug, Clone)]
pub struct InitArgs {
    pub config: PathBuf,
}

pub const DEFAULT_CONFIG: &str = "rowsql.toml";

pub fn parse_args(args: &[String]) -> anyhow::Result<Invocation> {
    let mut verbose = false;
    let mut it = args.iter().skip(1).map(|s| s.as_str()).peekable();
    // Global flags come before the subcommand; later ones belong to its flag loop.
    while it.next_if(|s| matches!(*s, "-v" | "--verbose")).is_some() {
        verbose = true;
    }

    let command = match it.next() {
        None | Some("-h" | "--help" | "help") => Command::Help(HelpTopic::Root),
        Some("generate" | "gen") => parse_generate(it, &mut verbose)?,
        Some("history") => parse_history(it, &mut verbose)?,
        Some("init") => parse_init(it, &mut verbose)?,
        Some(other) => anyhow::bail!("unknown command: {other}"),
    };

    Ok(Invocation { verbose, command })
}

fn input_from(v: &str) -> Input {
    if v == "-" {
        Input::Stdin
    } else {
        Input::File(PathBuf::from(v))
    }
}

fn parse_generate<'a>(
    mut it: impl Iterator<Item = &'a str>,
    verbose: &mut bool,
) -> anyhow::Result<Command> {
    let mut args = GenerateArgs {
        config: None,
        query_type: None,
        dialect: None,
        quoting: None,
        row_format: None,
        table: None,
        structure: None,
        rows: Input::Stdin,
        copy: false,
        no_history: false,
    };

    while let Some(token) = it.next() {
        // Split `--flag=value` once so both spellings share one match arm.
        let (flag, inline) = match token.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f, Some(v)),
            _ => (token, None),
        };
        let mut value = |name: &str| -> anyhow::Result<String> {
            match inline {
                Some(v) => Ok(v.to_string()),
                None => it
                    .next()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow::anyhow!("{name} requires a value")),
            }
        };

        match flag {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Generate)),
            "-v" | "--verbose" => *verbose = true,
            "--config" => args.config = Some(PathBuf::from(value("--config")?)),
            "--type" => {
                let v = value("--type")?;
                args.query_type = Some(
                    QueryType::from_name(&v)
                        .ok_or_else(|| anyhow::anyhow!("invalid --type value: {v}"))?,
                );
            }
            "--insert" => args.query_type = Some(QueryType::Insert),
            "--update" => args.query_type = Some(QueryType::Update),
            "--dialect" => {
                let v = value("--dialect")?;
                args.dialect = Some(
                    Dialect::from_name(&v)
                        .ok_or_else(|| anyhow::anyhow!("invalid --dialect value: {v}"))?,
                );
            }
            "--quote" => {
                let v = value("--quote")?;
                args.quoting = Some(
                    IdentQuoting::from_name(&v)
                        .ok_or_else(|| anyhow::anyhow!("invalid --quote value: {v}"))?,
                );
            }
            "--json-only" => args.row_format = Some(RowFormat::Json),
            "--table" => args.table = Some(value("--table")?),
            "--structure" => args.structure = Some(Input::Inline(value("--structure")?)),
            "--structure-file" => args.structure = Some(input_from(&value("--structure-file")?)),
            "--rows" => args.rows = Input::Inline(value("--rows")?),
            "--rows-file" => args.rows = input_from(&value("--rows-file")?),
            "--copy" => args.copy = true,
            "--no-history" => args.no_history = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    if args.structure.is_none() {
        anyhow::bail!("missing table structure: pass --structure or --structure-file");
    }
    if args.structure == Some(Input::Stdin) && args.rows == Input::Stdin {
        anyhow::bail!("structure and rows cannot both be read from stdin");
    }

    Ok(Command::Generate(args))
}

fn parse_history<'a>(
    mut it: impl Iterator<Item = &'a str>,
    verbose: &mut bool,
) -> anyhow::Result<Command> {
    let mut config: Option<PathBuf> = None;
    let mut kind: Option<HistoryKind> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::History)),
            "-v" | "--verbose" => *verbose = true,
            "tables" if kind.is_none() => kind = Some(HistoryKind::Tables),
            "structures" if kind.is_none() => kind = Some(HistoryKind::Structures),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            other if other.starts_with('-') => anyhow::bail!("unknown argument: {other}"),
            other => anyhow::bail!("unexpected positional argument: {other}"),
        }
    }

    Ok(Command::History(HistoryArgs {
        config,
        kind: kind.unwrap_or(HistoryKind::All),
    }))
}

fn parse_init<'a>(
    mut it: impl Iterator<Item = &'a str>,
    verbose: &mut bool,
) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Init)),
            "-v" | "--verbose" => *verbose = true,
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Init(InitArgs { config }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
rowsql - turn ad hoc rows into INSERT/UPDATE SQL

USAGE:
  rowsql [-v] <COMMAND> [OPTIONS]

COMMANDS:
  generate      Generate INSERT or UPDATE statements
  history       Show remembered table names and structures
  init          Write a rowsql.toml template

OPTIONS:
  -v, --verbose Log parsing decisions to stderr
  -h, --help    Print help

Run `rowsql <COMMAND> --help` for details."
            );
        }
        HelpTopic::Generate => {
            println!(
                "\
rowsql generate - generate INSERT or UPDATE statements

USAGE:
  rowsql generate --table <NAME> --structure <TEXT> [OPTIONS] < rows.txt

OPTIONS:
  --table <NAME>             Target table, optionally schema-qualified
  --structure <TEXT>         Columns: `a b c`, `id:int:pk` lines, or a JSON array
  --structure-file <PATH|->  Read the structure from a file (or stdin)
  --rows <TEXT>              Row data inline
  --rows-file <PATH|->       Read row data from a file (default: stdin)
  --type <insert|update>     Statement kind (or --insert / --update)
  --dialect <postgresql|mysql>
  --quote <always|never>     Identifier quoting
  --json-only                Reject non-JSON row input
  --copy                     Copy the result to the clipboard
  --no-history               Do not remember table name and structure
  --config <FILE>            Config file (default: ./rowsql.toml if present)"
            );
        }
        HelpTopic::History => {
            println!(
                "\
rowsql history - show remembered inputs

USAGE:
  rowsql history [tables|structures] [--config <FILE>]"
            );
        }
        HelpTopic::Init => {
            println!(
                "\
rowsql init - write a config template

USAGE:
  rowsql init [--config <FILE>]"
            );
        }
    }
}
