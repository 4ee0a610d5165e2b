pub mod decide;
pub mod decision;

pub use decide::PushPolicy;
pub use decision::Verdict;

use std::path::Path;

use crate::config::Config;
use crate::error::Error;
use crate::git::{self, BranchOracle, OptionSpec, PushClassifier};
use crate::parse;

/// The full command pipeline: parse, locate, classify, decide.
pub struct Guard {
    program: String,
    options: OptionSpec,
    classifier: PushClassifier,
    policy: PushPolicy,
}

impl Guard {
    /// Build the guard from configuration.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            program: config.git.program.clone(),
            options: OptionSpec::from_config(&config.git),
            classifier: PushClassifier::from_config(&config.git)?,
            policy: PushPolicy::from_config(config),
        })
    }

    /// Evaluate a single (non-compound) command.
    ///
    /// `workdir` is where the command would start; `-C` options are applied
    /// on top of it before asking `oracle`.
    pub fn evaluate_single(
        &self,
        command: &str,
        oracle: &dyn BranchOracle,
        workdir: Option<&Path>,
    ) -> Verdict {
        let tokens = parse::tokenize(command);
        let invocation = git::locate(&tokens, &self.program, &self.options);

        let classification = invocation
            .as_ref()
            .filter(|inv| inv.subcommand == "push")
            .map(|inv| self.classifier.classify(&inv.args));
        if let Some(c) = &classification {
            log::debug!(
                "push {:?}: explicit={} implicit={} matched={:?}",
                command,
                c.explicit_target,
                c.implicit,
                c.matched
            );
        }

        self.policy
            .decide(invocation.as_ref(), classification.as_ref(), || {
                let dir = invocation.as_ref().and_then(|inv| inv.working_dir(workdir));
                let state = oracle.current_branch(dir.as_deref());
                log::debug!("current branch in {dir:?}: {state:?}");
                state
            })
    }

    /// Evaluate a full command string, handling compound expressions,
    /// heredocs and substitutions. The first blocked part decides.
    pub fn evaluate(
        &self,
        command: &str,
        oracle: &dyn BranchOracle,
        workdir: Option<&Path>,
    ) -> Verdict {
        if command.trim().is_empty() {
            return Verdict::Allow;
        }

        let pipeline = parse::parse(command);
        if !pipeline.operators.is_empty() {
            let ops: Vec<&str> = pipeline.operators.iter().map(|o| o.as_str()).collect();
            log::debug!(
                "compound command: {} segment(s), operators [{}]",
                pipeline.segments.len(),
                ops.join(" ")
            );
        }

        for inner in &pipeline.substitutions {
            let verdict = self.evaluate(inner, oracle, workdir);
            if verdict.is_block() {
                return verdict;
            }
        }

        for segment in &pipeline.segments {
            let verdict = self.evaluate_single(&segment.command, oracle, workdir);
            if verdict.is_block() {
                return verdict;
            }
        }

        Verdict::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::BranchState;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Records every directory it is asked about.
    struct Recording {
        branch: &'static str,
        seen: RefCell<Vec<Option<PathBuf>>>,
    }

    impl Recording {
        fn on(branch: &'static str) -> Self {
            Self {
                branch,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl BranchOracle for Recording {
        fn current_branch(&self, workdir: Option<&Path>) -> BranchState {
            self.seen.borrow_mut().push(workdir.map(Path::to_path_buf));
            BranchState::Known(self.branch.into())
        }
    }

    fn guard() -> Guard {
        Guard::from_config(&Config::default_config()).unwrap()
    }

    #[test]
    fn empty_command_allows() {
        let oracle = Recording::on("main");
        assert_eq!(guard().evaluate("  ", &oracle, None), Verdict::Allow);
        assert!(oracle.seen.borrow().is_empty());
    }

    #[test]
    fn explicit_push_never_queries() {
        let oracle = Recording::on("feature");
        let v = guard().evaluate("git push origin main", &oracle, None);
        assert!(v.is_block());
        assert!(oracle.seen.borrow().is_empty());
    }

    #[test]
    fn non_push_never_queries() {
        let oracle = Recording::on("main");
        assert_eq!(guard().evaluate("git status", &oracle, None), Verdict::Allow);
        assert!(oracle.seen.borrow().is_empty());
    }

    #[test]
    fn lookup_uses_request_workdir() {
        let oracle = Recording::on("feature");
        guard().evaluate("git push", &oracle, Some(Path::new("/work")));
        assert_eq!(*oracle.seen.borrow(), vec![Some(PathBuf::from("/work"))]);
    }

    #[test]
    fn lookup_follows_chdir() {
        let oracle = Recording::on("feature");
        guard().evaluate("git -C sub push origin", &oracle, Some(Path::new("/work")));
        assert_eq!(*oracle.seen.borrow(), vec![Some(PathBuf::from("/work/sub"))]);
    }

    #[test]
    fn second_segment_is_checked() {
        let oracle = Recording::on("feature");
        let v = guard().evaluate("git status && git push origin main", &oracle, None);
        assert!(v.is_block());
    }

    #[test]
    fn stops_at_first_block() {
        let oracle = Recording::on("main");
        let v = guard().evaluate("git push; git push origin", &oracle, None);
        assert!(v.is_block());
        assert_eq!(oracle.seen.borrow().len(), 1);
    }

    #[test]
    fn missing_chdir_target_blocks_implicit_push() {
        // `echo` prints a non-protected "branch" wherever it actually runs
        let oracle = git::GitOracle::new("echo");
        let g = guard();
        let v = g.evaluate("git -C /nonexistent/mainguard push", &oracle, None);
        assert!(v.is_block());
        assert_eq!(g.evaluate("git push", &oracle, None), Verdict::Allow);
    }

    #[test]
    fn substitution_is_checked() {
        let oracle = Recording::on("feature");
        let v = guard().evaluate("echo $(git push origin HEAD:main)", &oracle, None);
        assert!(v.is_block());
    }
}
