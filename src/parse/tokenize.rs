/// Tokenize a command segment into words using shlex (POSIX word splitting).
///
/// Unbalanced quotes make shlex give up; the segment is then split on runs of
/// whitespace instead so evaluation can still proceed.
pub fn tokenize(command: &str) -> Vec<String> {
    shlex::split(command).unwrap_or_else(|| {
        log::debug!("unbalanced quoting, falling back to whitespace split: {command}");
        command.split_whitespace().map(String::from).collect()
    })
}

/// Basename of a command word: `/usr/bin/git` → `git`.
pub fn program_name(word: &str) -> &str {
    match word.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name,
        _ => word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_simple() {
        assert_eq!(
            tokenize("git push origin main"),
            vec!["git", "push", "origin", "main"]
        );
    }

    #[test]
    fn tokenize_quoted() {
        assert_eq!(
            tokenize("git commit -m 'push to main'"),
            vec!["git", "commit", "-m", "push to main"]
        );
    }

    #[test]
    fn tokenize_double_quoted() {
        assert_eq!(
            tokenize("git push origin \"HEAD:main\""),
            vec!["git", "push", "origin", "HEAD:main"]
        );
    }

    #[test]
    fn tokenize_escaped_space() {
        assert_eq!(
            tokenize(r"git -C my\ repo push"),
            vec!["git", "-C", "my repo", "push"]
        );
    }

    #[test]
    fn tokenize_leaves_expansions_opaque() {
        assert_eq!(
            tokenize("git push $REMOTE ~/x *"),
            vec!["git", "push", "$REMOTE", "~/x", "*"]
        );
    }

    #[test]
    fn tokenize_unbalanced_falls_back() {
        assert_eq!(
            tokenize("git push origin main 'oops"),
            vec!["git", "push", "origin", "main", "'oops"]
        );
    }

    #[test]
    fn tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn program_name_plain() {
        assert_eq!(program_name("git"), "git");
    }

    #[test]
    fn program_name_absolute_path() {
        assert_eq!(program_name("/usr/bin/git"), "git");
    }

    #[test]
    fn program_name_trailing_slash() {
        assert_eq!(program_name("dir/"), "dir/");
    }
}
