//! ui::pager
//!
//! Pager for status output.
//!
//! Resolution order: `$GIT_SUBREPO_PAGER`, then `$PAGER`, then
//! `less -FRX` when `less` is on PATH. Paging only happens when stdout
//! is a terminal; otherwise output goes straight through.

use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};

/// Display `text`, paging when appropriate.
///
/// Falls back to plain stdout when no pager is available or the pager
/// fails to spawn.
pub fn page(text: &str) {
    if !std::io::stdout().is_terminal() {
        print!("{text}");
        return;
    }
    match pager_command() {
        Some((program, args)) => {
            let spawned = Command::new(&program)
                .args(&args)
                .stdin(Stdio::piped())
                .spawn();
            match spawned {
                Ok(mut child) => {
                    if let Some(stdin) = child.stdin.as_mut() {
                        // A broken pipe just means the user quit early.
                        let _ = stdin.write_all(text.as_bytes());
                    }
                    let _ = child.wait();
                }
                Err(_) => print!("{text}"),
            }
        }
        None => print!("{text}"),
    }
}

/// The pager program and arguments, if one is configured or available.
fn pager_command() -> Option<(String, Vec<String>)> {
    for var in ["GIT_SUBREPO_PAGER", "PAGER"] {
        if let Ok(value) = std::env::var(var) {
            let mut words = value.split_whitespace().map(String::from);
            let program = words.next()?;
            if program.is_empty() || program == "cat" {
                return None;
            }
            return Some((program, words.collect()));
        }
    }
    if which::which("less").is_ok() {
        return Some((
            "less".to_string(),
            vec!["-FRX".to_string()],
        ));
    }
    None
}
