//! mainguard: a PreToolUse hook for Claude Code that stops direct pushes to
//! protected branches.
//!
//! A proposed Bash command is split into its parts, every git invocation in
//! it is located past its global options, and `git push` arguments are
//! classified. An explicit protected target (`main`, `HEAD:master`, `--all`)
//! blocks outright; an implicit push (`git push`, `git push origin`) blocks
//! only when the checked-out branch is protected. The outcome is one of
//! [`eval::Verdict::Allow`], [`eval::Verdict::Block`] or
//! [`eval::Verdict::Reject`].
//!
//! # Architecture
//!
//! - **[`parse`]** — Shell parsing: heredocs, substitutions, compound splitting, shlex tokenizer.
//! - **[`git`]** — Invocation locator, refspec rules, push classifier, branch oracle.
//! - **[`eval`]** — Decision engine and the [`Guard`](crate::eval::Guard) pipeline.
//! - **[`hook`]** — Request envelope decoding and working-directory resolution.
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]** — Decision logging to `~/.local/share/mainguard/decisions.log`.

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Crate error type.
pub mod error;
/// Decision engine: verdicts, push policy, the command pipeline.
pub mod eval;
/// Git invocation analysis and current-branch lookup.
pub mod git;
/// PreToolUse request handling.
pub mod hook;
/// File-based decision logging.
pub mod logging;
/// Shell command parsing: heredocs, substitutions, compound splitting, tokenizer.
pub mod parse;

pub use error::Error;

use eval::Verdict;
use git::BranchOracle;

/// Build a guard from the default config and evaluate a command string,
/// reading the current branch from `oracle` when needed.
///
/// This is the main entry point for tests and simple usage.
pub fn evaluate(command: &str, oracle: &dyn BranchOracle) -> Verdict {
    let config = config::Config::default_config();
    match eval::Guard::from_config(&config) {
        Ok(guard) => guard.evaluate(command, oracle, None),
        Err(e) => Verdict::Reject(format!("Error: {e}")),
    }
}
