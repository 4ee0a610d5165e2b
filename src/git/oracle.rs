//! Reading the checked-out branch of a repository.

use std::path::Path;
use std::process::{Command, Stdio};

/// Result of asking which branch is checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchState {
    Known(String),
    /// No branch could be read: git missing, not a repository, detached HEAD.
    Unknown {
        /// Whether the lookup ran in a directory that actually exists.
        workdir_established: bool,
    },
}

/// Source of the current branch name.
pub trait BranchOracle {
    /// Report the branch checked out in `workdir`, or in the process's own
    /// directory when `None`. Never fails; problems become `Unknown`.
    fn current_branch(&self, workdir: Option<&Path>) -> BranchState;
}

/// Asks the git binary via `git branch --show-current`.
pub struct GitOracle {
    program: String,
}

impl GitOracle {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl BranchOracle for GitOracle {
    fn current_branch(&self, workdir: Option<&Path>) -> BranchState {
        // A named directory that doesn't exist is never swapped for our own
        if let Some(dir) = workdir
            && !dir.is_dir()
        {
            log::debug!("{} is not a directory", dir.display());
            return BranchState::Unknown {
                workdir_established: false,
            };
        }
        let unknown = BranchState::Unknown {
            workdir_established: workdir.is_some(),
        };

        let mut cmd = Command::new(&self.program);
        cmd.args(["branch", "--show-current"])
            .stdin(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = workdir {
            cmd.current_dir(dir);
        }

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                log::debug!("could not run {}: {e}", self.program);
                return unknown;
            }
        };
        if !output.status.success() {
            log::debug!("{} branch --show-current: {}", self.program, output.status);
            return unknown;
        }

        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if name.is_empty() {
            // detached HEAD
            return unknown;
        }
        BranchState::Known(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_unknown() {
        let oracle = GitOracle::new("mainguard-no-such-binary");
        assert_eq!(
            oracle.current_branch(None),
            BranchState::Unknown {
                workdir_established: false
            }
        );
    }

    #[test]
    fn missing_directory_skips_the_lookup() {
        // `echo` would succeed and print a "branch" if it were run
        let oracle = GitOracle::new("echo");
        let state = oracle.current_branch(Some(Path::new("/nonexistent/mainguard/dir")));
        assert_eq!(
            state,
            BranchState::Unknown {
                workdir_established: false
            }
        );
    }

    #[test]
    fn existing_directory_runs_the_lookup() {
        let oracle = GitOracle::new("echo");
        let dir = std::env::temp_dir();
        assert_eq!(
            oracle.current_branch(Some(dir.as_path())),
            BranchState::Known("branch --show-current".into())
        );
    }

    #[test]
    fn missing_directory_is_not_established() {
        let oracle = GitOracle::new("mainguard-no-such-binary");
        let state = oracle.current_branch(Some(Path::new("/nonexistent/mainguard/dir")));
        assert_eq!(
            state,
            BranchState::Unknown {
                workdir_established: false
            }
        );
    }

    #[test]
    fn existing_directory_is_established() {
        let oracle = GitOracle::new("mainguard-no-such-binary");
        let dir = std::env::temp_dir();
        assert_eq!(
            oracle.current_branch(Some(dir.as_path())),
            BranchState::Unknown {
                workdir_established: true
            }
        );
    }
}
