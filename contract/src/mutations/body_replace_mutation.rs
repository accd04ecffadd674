use super::BodyMutation;
use regex::Regex;

/// Replaces every occurrence of a literal text in a recorded body.
#[derive(Debug)]
pub struct BodyReplaceMutation {
    text: String,
    substitution: String,
}

impl BodyReplaceMutation {
    pub fn new<S1: Into<String>, S2: Into<String>>(text: S1, substitution: S2) -> Self {
        Self {
            text: text.into(),
            substitution: substitution.into(),
        }
    }
}

impl BodyMutation for BodyReplaceMutation {
    fn mutate(&self, body: &mut String) {
        if body.contains(&self.text) {
            *body = body.replace(&self.text, &self.substitution);
        }
    }
}

/// Replaces every match of `pattern`; the substitution may refer to capture groups.
#[derive(Debug)]
pub struct BodyReplaceRegexMutation {
    pattern: Regex,
    substitution: String,
}

impl BodyReplaceRegexMutation {
    pub fn new<S: Into<String>>(pattern: Regex, substitution: S) -> Self {
        Self {
            pattern,
            substitution: substitution.into(),
        }
    }
}

impl BodyMutation for BodyReplaceRegexMutation {
    fn mutate(&self, body: &mut String) {
        let replaced = self
            .pattern
            .replace_all(body, self.substitution.as_str())
            .into_owned();
        *body = replaced;
    }
}
