//! cli::commands::status

use anyhow::Result;

use crate::core::types::Subdir;
use crate::engine::ops::status::{status as status_op, StatusReport};
use crate::engine::{preflight, Context};
use crate::git::Git;
use crate::ui::output::Verbosity;
use crate::ui::pager;

use super::open_git;

/// Run the status command.
pub fn status(ctx: &Context, subdirs: &[String], fetch: bool) -> Result<()> {
    let git = open_git(ctx)?;
    preflight::check(&git, &ctx.cwd(), &preflight::READ_ONLY)?;

    let subdirs: Vec<Subdir> = subdirs
        .iter()
        .map(|s| Subdir::new(s.as_str()))
        .collect::<Result<_, _>>()?;

    let report = status_op(&git, ctx, &subdirs, fetch)?;
    pager::page(&render(&git, &report, ctx.verbosity)?);
    Ok(())
}

/// Render the report for the given verbosity. Quiet mode prints only
/// subdir paths; verbose mode adds the ref tips that exist.
fn render(git: &Git, report: &StatusReport, verbosity: Verbosity) -> Result<String> {
    let mut out = String::new();

    if verbosity == Verbosity::Quiet {
        for entry in &report.entries {
            out.push_str(entry.subdir.as_str());
            out.push('\n');
        }
        return Ok(out);
    }

    let n = report.entries.len();
    out.push_str(&format!(
        "{n} subrepo{} in this repository\n",
        if n == 1 { "" } else { "s" }
    ));

    for entry in &report.entries {
        out.push_str(&format!("\nsubrepo '{}':\n", entry.subdir));
        match &entry.record {
            Ok(record) => {
                out.push_str(&format!("  remote:   {}\n", record.remote));
                out.push_str(&format!("  branch:   {}\n", record.branch));
                if let Some(commit) = &record.commit {
                    out.push_str(&format!("  commit:   {}\n", git.short_oid(commit)?));
                }
                if let Some(parent) = &record.parent {
                    out.push_str(&format!("  parent:   {}\n", git.short_oid(parent)?));
                }
                if record.parent.is_none() {
                    if let Some(former) = &record.former {
                        out.push_str(&format!(
                            "  former:   {} (deprecated)\n",
                            git.short_oid(former)?
                        ));
                    }
                }
            }
            Err(error) => {
                out.push_str(&format!("  error:    {error}\n"));
            }
        }
        if verbosity.is_verbose() && !entry.refs.is_empty() {
            out.push_str("  refs:\n");
            for (label, oid) in &entry.refs {
                out.push_str(&format!("    {label:<7} {}\n", git.short_oid(oid)?));
            }
        }
    }

    Ok(out)
}
