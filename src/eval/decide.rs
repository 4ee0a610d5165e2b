use crate::config::{Config, UnknownBranch};
use crate::git::{BranchState, Classification, Invocation};

use super::Verdict;

const ADVICE: &str = "Push to a feature branch and open a pull request instead.";

/// Turns a located invocation and its classification into a verdict.
pub struct PushPolicy {
    protected: Vec<String>,
    unknown: UnknownBranch,
}

impl PushPolicy {
    pub fn new(protected: Vec<String>, unknown: UnknownBranch) -> Self {
        Self { protected, unknown }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.git.protected_branches.clone(),
            config.settings.unknown_branch,
        )
    }

    /// Current-branch names compare case-insensitively.
    fn is_protected(&self, branch: &str) -> bool {
        self.protected.iter().any(|p| p.eq_ignore_ascii_case(branch))
    }

    /// Decide one git invocation.
    ///
    /// `branch_lookup` is called at most once, and only for an implicit push
    /// that names no protected branch itself.
    pub fn decide<F>(
        &self,
        invocation: Option<&Invocation>,
        classification: Option<&Classification>,
        branch_lookup: F,
    ) -> Verdict
    where
        F: FnOnce() -> BranchState,
    {
        let Some(invocation) = invocation.filter(|inv| inv.subcommand == "push") else {
            return Verdict::Allow;
        };
        let Some(classification) = classification else {
            return Verdict::Allow;
        };

        if classification.explicit_target {
            let target = match &classification.matched {
                Some((arg, "bulk")) => format!("`{arg}` pushes every branch, protected ones included"),
                Some((arg, rule)) => format!("`{arg}` targets a protected branch ({rule} refspec)"),
                None => "it targets a protected branch".to_string(),
            };
            return Verdict::Block(format!(
                "Direct push to a protected branch is blocked: {target}.\n{ADVICE}"
            ));
        }

        if !classification.implicit {
            return Verdict::Allow;
        }

        let args = invocation.args.join(" ");
        match branch_lookup() {
            BranchState::Known(branch) if self.is_protected(&branch) => Verdict::Block(format!(
                "`git push {args}` names no branch, so it would push the current branch \
                 '{branch}', which is protected.\n{ADVICE}"
            )),
            BranchState::Known(_) => Verdict::Allow,
            BranchState::Unknown {
                workdir_established,
            } => {
                let block = match self.unknown {
                    UnknownBranch::Allow => false,
                    UnknownBranch::Block => true,
                    UnknownBranch::Auto => !workdir_established,
                };
                if block {
                    Verdict::Block(format!(
                        "`git push {args}` names no branch and the current branch could not \
                         be determined, so it may push a protected branch.\n{ADVICE}"
                    ))
                } else {
                    Verdict::Allow
                }
            }
        }
    }
}
