use super::types::{Operator, ParsedPipeline, ShellSegment};

/// Drop heredoc bodies, keeping the line that introduces each one.
///
/// Recognizes `<<WORD`, `<<-WORD`, `<<'WORD'` and `<<"WORD"` in command
/// position: unquoted, or inside a `$(...)` (even one that sits in double
/// quotes). `<<` inside quoted text or `$((...))` arithmetic is a shift, and
/// `<<<` here-strings have no body; both are left alone. Several heredocs
/// opened on one line are consumed in order.
pub fn strip_heredocs(command: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    let mut stack: Vec<Context> = Vec::new();

    for line in command.lines() {
        if let Some(terminator) = pending.first() {
            if line.trim() == terminator {
                pending.remove(0);
            }
            continue;
        }
        pending.extend(heredoc_markers(line, &mut stack));
        kept.push(line);
    }

    kept.join("\n")
}

/// Lexical context open at some point of a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Single,
    Double,
    /// `$(`
    Subst,
    /// `$((` or `((`
    Arith,
    /// A plain `(` nested in one of the above
    Paren,
}

/// Whether the innermost `$(` / `$((` currently open is arithmetic.
fn in_arith(stack: &[Context]) -> bool {
    stack
        .iter()
        .rev()
        .find(|c| matches!(c, Context::Arith | Context::Subst))
        == Some(&Context::Arith)
}

/// Collect heredoc delimiters opened on one line.
///
/// The context stack carries over between lines.
fn heredoc_markers(line: &str, stack: &mut Vec<Context>) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let mut markers = Vec::new();
    let mut i = 0;

    while i < len {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        let dollar_paren = c == '$' && next == Some('(');

        match stack.last().copied() {
            Some(Context::Single) => {
                if c == '\'' {
                    stack.pop();
                }
                i += 1;
                continue;
            }
            Some(Context::Double) => {
                if c == '\\' {
                    i += 2;
                } else if c == '"' {
                    stack.pop();
                    i += 1;
                } else if dollar_paren {
                    i += open_substitution(&chars, i, stack);
                } else {
                    i += 1;
                }
                continue;
            }
            _ => {}
        }

        match c {
            '\\' => i += 2,
            '\'' => {
                stack.push(Context::Single);
                i += 1;
            }
            '"' => {
                stack.push(Context::Double);
                i += 1;
            }
            '$' if dollar_paren => i += open_substitution(&chars, i, stack),
            '(' if next == Some('(') => {
                stack.push(Context::Arith);
                i += 2;
            }
            '(' => {
                stack.push(Context::Paren);
                i += 1;
            }
            ')' => {
                match stack.last().copied() {
                    Some(Context::Arith) if next == Some(')') => {
                        stack.pop();
                        i += 1;
                    }
                    Some(Context::Subst | Context::Paren) => {
                        stack.pop();
                    }
                    _ => {}
                }
                i += 1;
            }
            '<' if next == Some('<') && !in_arith(stack) => {
                if chars.get(i + 2) == Some(&'<') {
                    i += 3;
                    continue;
                }
                let (word, end) = heredoc_word(&chars, i + 2);
                if !word.is_empty() {
                    markers.push(word);
                }
                i = end;
            }
            _ => i += 1,
        }
    }

    markers
}

/// Push the context opened by `$(` or `$((` at `i`; returns its length.
fn open_substitution(chars: &[char], i: usize, stack: &mut Vec<Context>) -> usize {
    if chars.get(i + 2) == Some(&'(') {
        stack.push(Context::Arith);
        3
    } else {
        stack.push(Context::Subst);
        2
    }
}

/// Read the delimiter following `<<` (starting at `i`), with quotes removed.
/// Returns the word and the index just past it.
fn heredoc_word(chars: &[char], mut i: usize) -> (String, usize) {
    if chars.get(i) == Some(&'-') {
        i += 1;
    }
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    let mut word = String::new();
    while let Some(&wc) = chars.get(i) {
        if matches!(wc, '\'' | '"' | '\\') {
            i += 1;
            continue;
        }
        if wc.is_whitespace() || matches!(wc, ';' | '|' | '&' | '<' | '>' | '(' | ')') {
            break;
        }
        word.push(wc);
        i += 1;
    }
    (word, i)
}

/// Split a command at shell operators (&&, ||, ;, |, |&, &, newline),
/// respecting single/double quotes and backslash escapes.
///
/// Returns segments and the operators between them.
fn split_compound_command(command: &str) -> (Vec<String>, Vec<Operator>) {
    let mut parts = Vec::new();
    let mut operators = Vec::new();
    let mut buf = String::new();

    let chars: Vec<char> = command.chars().collect();
    let len = chars.len();
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);

    let mut flush = |buf: &mut String, op: Operator| {
        parts.push(buf.trim().to_string());
        operators.push(op);
        buf.clear();
    };

    while i < len {
        let c = chars[i];

        if esc {
            buf.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            buf.push(c);
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
            buf.push(c);
            i += 1;
            continue;
        }
        if c == '"' && !sq {
            dq = !dq;
            buf.push(c);
            i += 1;
            continue;
        }
        if sq || dq {
            buf.push(c);
            i += 1;
            continue;
        }

        // Two-char operators
        if i + 1 < len {
            let op = match (c, chars[i + 1]) {
                ('&', '&') => Some(Operator::And),
                ('|', '|') => Some(Operator::Or),
                ('|', '&') => Some(Operator::PipeErr),
                _ => None,
            };
            if let Some(op) = op {
                flush(&mut buf, op);
                i += 2;
                continue;
            }
        }

        // A lone `&` backgrounds the command before it; `>&`, `<&` and `&>`
        // are redirections.
        let redirect_amp = (i > 0 && matches!(chars[i - 1], '>' | '<'))
            || chars.get(i + 1) == Some(&'>');

        match c {
            '|' => flush(&mut buf, Operator::Pipe),
            ';' | '\n' => flush(&mut buf, Operator::Semi),
            '&' if !redirect_amp => flush(&mut buf, Operator::Background),
            _ => buf.push(c),
        }
        i += 1;
    }

    let tail = buf.trim().to_string();
    if !tail.is_empty() {
        parts.push(tail);
    }

    parts.retain(|p| !p.is_empty());

    (parts, operators)
}

/// Read a parenthesized body starting just past its opening `(`.
///
/// Returns the body and the index just past the matching `)` (or the end of
/// input when unbalanced). Parentheses inside quotes don't count.
fn take_balanced(chars: &[char], mut i: usize) -> (String, usize) {
    let mut depth: u32 = 1;
    let mut inner = String::new();
    let (mut sq, mut dq, mut esc) = (false, false, false);

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if esc {
            esc = false;
        } else if c == '\\' && !sq {
            esc = true;
        } else if c == '\'' && !dq {
            sq = !sq;
        } else if c == '"' && !sq {
            dq = !dq;
        } else if !sq && !dq {
            if c == '(' {
                depth += 1;
            } else if c == ')' {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }
        inner.push(c);
    }

    (inner, i)
}

/// Extract command substitution contents from `$(...)`, backticks and
/// process substitutions `<(...)` / `>(...)`.
///
/// Returns the outer command with substitutions replaced by `__SUBST__`
/// placeholders, plus the extracted inner command strings. Nested
/// substitutions stay inside their parent's text and are found when the
/// parent is evaluated in turn.
///
/// `$()` is extracted even inside double quotes (shell expands it there).
/// Only single quotes block substitution detection.
fn extract_substitutions(command: &str) -> (String, Vec<String>) {
    let chars: Vec<char> = command.chars().collect();
    let len = chars.len();
    let mut outer = String::new();
    let mut inners = Vec::new();
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);

    let mut keep = |inner: String, outer: &mut String| {
        let trimmed = inner.trim();
        if !trimmed.is_empty() {
            inners.push(trimmed.to_string());
        }
        outer.push_str("__SUBST__");
    };

    while i < len {
        let c = chars[i];

        if esc {
            outer.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            outer.push(c);
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
            outer.push(c);
            i += 1;
            continue;
        }
        if c == '"' && !sq {
            dq = !dq;
            outer.push(c);
            i += 1;
            continue;
        }
        if sq {
            outer.push(c);
            i += 1;
            continue;
        }

        let opens_paren = i + 1 < len && chars[i + 1] == '(';

        if c == '$' && opens_paren {
            let (inner, next) = take_balanced(&chars, i + 2);
            keep(inner, &mut outer);
            i = next;
            continue;
        }

        if (c == '<' || c == '>') && opens_paren && !dq {
            let (inner, next) = take_balanced(&chars, i + 2);
            keep(inner, &mut outer);
            i = next;
            continue;
        }

        // Backticks don't nest
        if c == '`' {
            let mut inner = String::new();
            i += 1;
            while i < len && chars[i] != '`' {
                if chars[i] == '\\' && i + 1 < len {
                    inner.push(chars[i]);
                    inner.push(chars[i + 1]);
                    i += 2;
                    continue;
                }
                inner.push(chars[i]);
                i += 1;
            }
            i += 1;
            keep(inner, &mut outer);
            continue;
        }

        outer.push(c);
        i += 1;
    }

    (outer, inners)
}

/// Parse a full command string into a `ParsedPipeline`.
///
/// Heredoc bodies are dropped first, then substitutions are pulled out, then
/// the outer text is split at compound operators.
pub fn parse(command: &str) -> ParsedPipeline {
    let stripped = strip_heredocs(command);
    let (outer, substitutions) = extract_substitutions(&stripped);
    let (parts, operators) = split_compound_command(&outer);

    ParsedPipeline {
        segments: parts
            .into_iter()
            .map(|command| ShellSegment { command })
            .collect(),
        operators,
        substitutions,
    }
}
