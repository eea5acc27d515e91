use crate::config::ClipboardConfig;
use rowsql::{Clipboard, ClipboardError};
use std::io::Write;
use std::process::{Command, Stdio};

/// Programs probed, in order, when no clipboard command is configured.
const DEFAULT_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

/// Copies by piping text into an external program's stdin.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    candidates: Vec<(String, Vec<String>)>,
}

impl CommandClipboard {
    pub fn from_config(config: &ClipboardConfig) -> Self {
        let candidates = match &config.command {
            Some(command) => vec![(command.clone(), config.args.clone())],
            None => DEFAULT_COMMANDS
                .iter()
                .map(|(cmd, args)| {
                    (
                        cmd.to_string(),
                        args.iter().map(|a| a.to_string()).collect(),
                    )
                })
                .collect(),
        };
        Self { candidates }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut last_error = String::from("no clipboard command configured");
        for (program, args) in &self.candidates {
            match pipe_to(program, args, text) {
                Ok(()) => {
                    tracing::debug!(program = %program, "copied to clipboard");
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!(program = %program, error = %e, "clipboard command failed");
                    last_error = e;
                }
            }
        }
        Err(ClipboardError::new(last_error))
    }
}

fn pipe_to(program: &str, args: &[String], text: &str) -> Result<(), String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("failed to run {program}: {e}"))?;

    // Stdin is closed at the end of the match arm so the child sees EOF, and the
    // child is always reaped, even when the write failed.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child
        .wait()
        .map_err(|e| format!("failed to wait for {program}: {e}"))?;
    written.map_err(|e| format!("failed to write to {program}: {e}"))?;
    if !status.success() {
        return Err(format!("{program} exited with {status}"));
    }
    Ok(())
}
