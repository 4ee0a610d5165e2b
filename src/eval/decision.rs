/// Final outcome for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Block(String),
    /// The request itself was malformed.
    Reject(String),
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Allow => "allow",
            Verdict::Block(_) => "block",
            Verdict::Reject(_) => "reject",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Allow => None,
            Verdict::Block(reason) | Verdict::Reject(reason) => Some(reason),
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Verdict::Block(_))
    }

    /// Process exit status understood by the calling agent:
    /// 0 lets the tool run, 2 blocks it and shows stderr, 1 is an error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Allow => 0,
            Verdict::Block(_) => 2,
            Verdict::Reject(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(Verdict::Allow.exit_code(), 0);
        assert_eq!(Verdict::Block("x".into()).exit_code(), 2);
        assert_eq!(Verdict::Reject("x".into()).exit_code(), 1);
    }

    #[test]
    fn reasons() {
        assert_eq!(Verdict::Allow.reason(), None);
        assert_eq!(Verdict::Block("nope".into()).reason(), Some("nope"));
    }
}
