//! The PreToolUse request envelope and how it maps onto a verdict.

use std::path::PathBuf;

use serde::Deserialize;

use crate::config::Settings;
use crate::error::Error;
use crate::eval::{Guard, Verdict};
use crate::git::BranchOracle;

#[derive(Debug, Deserialize)]
pub struct HookInput {
    pub tool_name: Option<String>,
    pub tool_input: Option<ToolInput>,
    /// Working directory the agent is running in.
    pub cwd: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToolInput {
    pub command: Option<String>,
}

impl HookInput {
    pub fn parse(input: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn command(&self) -> &str {
        self.tool_input
            .as_ref()
            .and_then(|t| t.command.as_deref())
            .unwrap_or_default()
    }
}

/// Pick the directory to read the current branch from: the request's `cwd`,
/// then the project-root variable. Candidates that aren't existing
/// directories are skipped.
pub fn resolve_workdir(cwd: Option<&str>, project_dir: Option<&str>) -> Option<PathBuf> {
    [cwd, project_dir]
        .into_iter()
        .flatten()
        .filter(|dir| !dir.is_empty())
        .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref()))
        .find(|dir| dir.is_dir())
}

/// Evaluate a raw request body. Every verdict is written to the decision log.
///
/// `project_dir` is the value of the configured project-root variable, if set.
pub fn evaluate_request(
    input: &str,
    guard: &Guard,
    settings: &Settings,
    oracle: &dyn BranchOracle,
    project_dir: Option<&str>,
) -> Verdict {
    let request = match HookInput::parse(input) {
        Ok(request) => request,
        Err(e) => {
            let verdict = Verdict::Reject(format!("Error: {e}"));
            crate::logging::log_decision(input, &verdict);
            return verdict;
        }
    };

    let command = request.command();
    let verdict = evaluate_parsed(&request, guard, settings, oracle, project_dir);
    crate::logging::log_decision(command, &verdict);
    verdict
}

fn evaluate_parsed(
    request: &HookInput,
    guard: &Guard,
    settings: &Settings,
    oracle: &dyn BranchOracle,
    project_dir: Option<&str>,
) -> Verdict {
    let is_shell = request
        .tool_name
        .as_deref()
        .is_some_and(|name| settings.shell_tools.iter().any(|t| t == name));
    if !is_shell {
        return Verdict::Allow;
    }

    let command = request.command();
    if command.is_empty() {
        return Verdict::Allow;
    }

    let workdir = resolve_workdir(request.cwd.as_deref(), project_dir);
    guard.evaluate(command, oracle, workdir.as_deref())
}
