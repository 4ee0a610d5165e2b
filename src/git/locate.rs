//! Finding the git invocation inside a tokenized command.

use std::path::{Path, PathBuf};

use crate::config::GitConfig;
use crate::parse::program_name;

/// Global options that git accepts before the subcommand.
///
/// Built once from configuration and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    /// Options that consume the following word (`-C <path>`, `-c <k=v>`).
    with_arg: Vec<String>,
    /// Boolean flags (`--no-pager`, `--bare`).
    flags: Vec<String>,
}

impl OptionSpec {
    pub fn new(with_arg: Vec<String>, flags: Vec<String>) -> Self {
        Self { with_arg, flags }
    }

    pub fn from_config(config: &GitConfig) -> Self {
        Self::new(
            config.global_options_with_arg.clone(),
            config.global_flags.clone(),
        )
    }

    fn takes_arg(&self, token: &str) -> bool {
        self.with_arg.iter().any(|o| o == token)
    }

    /// Match `--git-dir=/x` or a two-letter short option with its value
    /// glued on (`-C/x`, `-cuser.name=me`). Returns the option and the value.
    fn attached<'t>(&self, token: &'t str) -> Option<(&str, &'t str)> {
        self.with_arg.iter().find_map(|opt| {
            let rest = token.strip_prefix(opt.as_str())?;
            if opt.starts_with("--") {
                rest.strip_prefix('=').map(|v| (opt.as_str(), v))
            } else if opt.len() == 2 && !rest.is_empty() {
                Some((opt.as_str(), rest))
            } else {
                None
            }
        })
    }

    fn is_flag(&self, token: &str) -> bool {
        self.flags.iter().any(|f| f == token)
    }
}

/// A git command split into its subcommand and the words after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub subcommand: String,
    pub args: Vec<String>,
    /// Values of every `-C` option seen before the subcommand, in order.
    pub chdir: Vec<String>,
}

impl Invocation {
    /// Directory git would run in, given the directory the command starts in.
    ///
    /// Each `-C` is applied in turn: absolute paths replace, relative paths
    /// join, empty values are ignored (as git does).
    pub fn working_dir(&self, base: Option<&Path>) -> Option<PathBuf> {
        self.chdir
            .iter()
            .filter(|dir| !dir.is_empty())
            .fold(base.map(Path::to_path_buf), |current, dir| {
                let expanded = shellexpand::tilde(dir);
                let path = Path::new(expanded.as_ref());
                match current {
                    Some(cur) if path.is_relative() => Some(cur.join(path)),
                    _ => Some(path.to_path_buf()),
                }
            })
    }
}

/// Locate the `program` invocation in `tokens`.
///
/// Scanning starts right after the first word whose basename is `program`.
/// Global options are skipped; the first remaining non-option word is the
/// subcommand and everything after it is its arguments. Returns `None` when
/// the program never appears or nothing follows its options.
pub fn locate(tokens: &[String], program: &str, options: &OptionSpec) -> Option<Invocation> {
    let start = tokens.iter().position(|t| program_name(t) == program)?;
    let mut chdir = Vec::new();
    let mut i = start + 1;

    while i < tokens.len() {
        let token = tokens[i].as_str();

        if options.takes_arg(token) {
            if token == "-C" {
                chdir.push(tokens.get(i + 1)?.clone());
            }
            i += 2;
            continue;
        }
        if let Some((opt, value)) = options.attached(token) {
            if opt == "-C" {
                chdir.push(value.to_string());
            }
            i += 1;
            continue;
        }
        // Unknown dash-words are treated as flags
        if options.is_flag(token) || token.starts_with('-') {
            i += 1;
            continue;
        }

        return Some(Invocation {
            subcommand: token.to_string(),
            args: tokens[i + 1..].to_vec(),
            chdir,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::parse::tokenize;

    fn locate_str(cmd: &str) -> Option<Invocation> {
        let options = OptionSpec::from_config(&Config::default_config().git);
        locate(&tokenize(cmd), "git", &options)
    }

    #[test]
    fn no_git_token() {
        assert_eq!(locate_str("ls -la"), None);
    }

    #[test]
    fn plain_push() {
        let inv = locate_str("git push origin main").unwrap();
        assert_eq!(inv.subcommand, "push");
        assert_eq!(inv.args, vec!["origin", "main"]);
        assert!(inv.chdir.is_empty());
    }

    #[test]
    fn bare_git() {
        assert_eq!(locate_str("git"), None);
    }

    #[test]
    fn only_options() {
        assert_eq!(locate_str("git --no-pager -c core.pager=cat"), None);
    }

    #[test]
    fn option_missing_its_value() {
        assert_eq!(locate_str("git -C"), None);
    }

    #[test]
    fn skips_separate_value() {
        let inv = locate_str("git -C /some/path push origin main").unwrap();
        assert_eq!(inv.subcommand, "push");
        assert_eq!(inv.args, vec!["origin", "main"]);
        assert_eq!(inv.chdir, vec!["/some/path"]);
    }

    #[test]
    fn value_that_looks_like_subcommand_is_skipped() {
        let inv = locate_str("git -c push.default=current status").unwrap();
        assert_eq!(inv.subcommand, "status");
    }

    #[test]
    fn skips_long_attached_value() {
        let inv = locate_str("git --git-dir=/repo/.git --work-tree=/repo push").unwrap();
        assert_eq!(inv.subcommand, "push");
        assert!(inv.args.is_empty());
    }

    #[test]
    fn skips_short_attached_value() {
        let inv = locate_str("git -C/repo -cuser.name=me push origin").unwrap();
        assert_eq!(inv.subcommand, "push");
        assert_eq!(inv.args, vec!["origin"]);
        assert_eq!(inv.chdir, vec!["/repo"]);
    }

    #[test]
    fn skips_known_and_unknown_flags() {
        let inv = locate_str("git --no-pager --some-new-flag push").unwrap();
        assert_eq!(inv.subcommand, "push");
    }

    #[test]
    fn env_prefix_and_absolute_path() {
        let inv = locate_str("GIT_TRACE=1 /usr/bin/git push origin").unwrap();
        assert_eq!(inv.subcommand, "push");
        assert_eq!(inv.args, vec!["origin"]);
    }

    #[test]
    fn git_not_first_word() {
        let inv = locate_str("cd repo && git push").unwrap();
        assert_eq!(inv.subcommand, "push");
    }

    #[test]
    fn empty_option_tables_still_skip_dashes() {
        let options = OptionSpec::new(vec![], vec![]);
        let inv = locate(&tokenize("git --bare push"), "git", &options).unwrap();
        assert_eq!(inv.subcommand, "push");
    }

    #[test]
    fn working_dir_without_chdir() {
        let inv = locate_str("git push").unwrap();
        assert_eq!(inv.working_dir(None), None);
        assert_eq!(
            inv.working_dir(Some(Path::new("/work"))),
            Some(PathBuf::from("/work"))
        );
    }

    #[test]
    fn working_dir_relative_chdir_joins() {
        let inv = locate_str("git -C sub -C deeper push").unwrap();
        assert_eq!(
            inv.working_dir(Some(Path::new("/work"))),
            Some(PathBuf::from("/work/sub/deeper"))
        );
    }

    #[test]
    fn working_dir_absolute_chdir_replaces() {
        let inv = locate_str("git -C /other push").unwrap();
        assert_eq!(
            inv.working_dir(Some(Path::new("/work"))),
            Some(PathBuf::from("/other"))
        );
    }

    #[test]
    fn working_dir_empty_chdir_ignored() {
        let inv = locate_str("git -C '' push").unwrap();
        assert_eq!(inv.working_dir(None), None);
    }
}
