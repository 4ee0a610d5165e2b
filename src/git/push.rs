//! Classification of `git push` arguments.

use crate::config::GitConfig;
use crate::error::Error;

use super::refspec::RefspecMatcher;

/// What a push's arguments say about protected branches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Some argument names a protected branch, or a bulk flag pushes them all.
    pub explicit_target: bool,
    /// At most one positional argument: git falls back to its default push
    /// mapping, which normally pushes the current branch.
    pub implicit: bool,
    /// The argument that produced `explicit_target`, with the rule it hit.
    pub matched: Option<(String, &'static str)>,
}

pub struct PushClassifier {
    refspecs: RefspecMatcher,
    bulk_flags: Vec<String>,
    options_with_arg: Vec<String>,
}

impl PushClassifier {
    pub fn from_config(config: &GitConfig) -> Result<Self, Error> {
        Ok(Self {
            refspecs: RefspecMatcher::new(&config.protected_branches)?,
            bulk_flags: config.bulk_push_flags.clone(),
            options_with_arg: config.push_options_with_arg.clone(),
        })
    }

    /// Split push arguments into flags and positionals.
    ///
    /// Values of options like `-o <opt>` are neither; after `--` every word is
    /// positional.
    fn split_args<'a>(&self, args: &'a [String]) -> (Vec<&'a str>, Vec<&'a str>) {
        let mut flags = Vec::new();
        let mut positional = Vec::new();
        let mut iter = args.iter();
        let mut options_done = false;

        while let Some(arg) = iter.next() {
            if options_done {
                positional.push(arg.as_str());
            } else if arg == "--" {
                options_done = true;
            } else if self.options_with_arg.contains(arg) {
                flags.push(arg.as_str());
                iter.next();
            } else if arg.starts_with('-') {
                flags.push(arg.as_str());
            } else {
                positional.push(arg.as_str());
            }
        }

        (flags, positional)
    }

    /// Classify the arguments that follow `push`. Pure: the result depends
    /// only on `args`.
    pub fn classify(&self, args: &[String]) -> Classification {
        let (flags, positional) = self.split_args(args);

        let bulk = flags
            .iter()
            .find(|f| self.bulk_flags.iter().any(|b| b == *f))
            .map(|f| (f.to_string(), "bulk"));

        let matched = bulk.or_else(|| {
            positional.iter().find_map(|arg| {
                self.refspecs
                    .matching_rule(arg)
                    .map(|rule| (arg.to_string(), rule.name))
            })
        });

        Classification {
            explicit_target: matched.is_some(),
            implicit: positional.len() <= 1,
            matched,
        }
    }
}
