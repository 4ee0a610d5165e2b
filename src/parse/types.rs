//! Types produced by the shell parser and consumed by the eval layer.

/// Shell operator separating consecutive pipeline segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    /// `&&` — run next only if previous succeeded
    And,
    /// `||` — run next only if previous failed
    Or,
    /// `;` or an unquoted newline — run next unconditionally
    Semi,
    /// `|` — pipe stdout
    Pipe,
    /// `|&` — pipe stdout+stderr
    PipeErr,
    /// `&` — run previous in the background, continue immediately
    Background,
}

impl Operator {
    /// The operator's shell syntax.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Semi => ";",
            Operator::Pipe => "|",
            Operator::PipeErr => "|&",
            Operator::Background => "&",
        }
    }
}

/// A single evaluable command within a compound pipeline.
///
/// Any `$()`, backtick, or process substitution spans have been replaced
/// with `__SUBST__` placeholders; their contents live in
/// [`ParsedPipeline::substitutions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSegment {
    pub command: String,
}

/// A fully decomposed compound command: segments interleaved with operators,
/// plus the inner commands of every top-level substitution.
///
/// For a simple command like `git push`, there is one segment and no operators.
/// For `a && b | c`, there are three segments and two operators (`&&`, `|`).
#[derive(Debug, Clone, Default)]
pub struct ParsedPipeline {
    pub segments: Vec<ShellSegment>,
    pub operators: Vec<Operator>,
    pub substitutions: Vec<String>,
}
