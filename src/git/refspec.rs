//! Refspec rules that recognize a protected branch as a push target.

use regex::Regex;

/// One named refspec shape, compiled for a fixed set of branch names.
#[derive(Debug)]
pub struct RefspecRule {
    pub name: &'static str,
    regex: Regex,
}

impl RefspecRule {
    pub fn is_match(&self, arg: &str) -> bool {
        self.regex.is_match(arg)
    }
}

/// Shapes of a push argument that land on a protected branch.
///
/// `{b}` is replaced by an alternation of the protected branch names.
const RULE_TEMPLATES: &[(&str, &str)] = &[
    // main
    ("bare", r"^(?:{b})$"),
    // +main, +refs/heads/main
    ("force", r"^\+(?:refs/heads/)?(?:{b})$"),
    // HEAD:main, feature:refs/heads/main, :main
    ("destination", r"^[^:]*:(?:refs/heads/)?(?:{b})$"),
    // refs/heads/main
    ("qualified", r"^refs/heads/(?:{b})$"),
];

/// The compiled rule set. Branch names match case-sensitively.
#[derive(Debug)]
pub struct RefspecMatcher {
    rules: Vec<RefspecRule>,
}

impl RefspecMatcher {
    pub fn new(branches: &[String]) -> Result<Self, regex::Error> {
        if branches.is_empty() {
            return Ok(Self { rules: Vec::new() });
        }
        let alternation = branches
            .iter()
            .map(|b| regex::escape(b))
            .collect::<Vec<_>>()
            .join("|");

        let rules = RULE_TEMPLATES
            .iter()
            .map(|&(name, template)| {
                Ok(RefspecRule {
                    name,
                    regex: Regex::new(&template.replace("{b}", &alternation))?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { rules })
    }

    /// The first rule that matches `arg`, if any.
    pub fn matching_rule(&self, arg: &str) -> Option<&RefspecRule> {
        self.rules.iter().find(|rule| rule.is_match(arg))
    }

    pub fn rules(&self) -> &[RefspecRule] {
        &self.rules
    }
}
