use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A submitted answer for one question: a single option index ("2") or a set
/// of option indices for multiple choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SubmittedAnswer {
    One(String),
    Many(Vec<String>),
}

impl SubmittedAnswer {
    /// Normalized view used for grading: every answer is a set of trimmed
    /// option keys, so single and multiple choice compare under one rule.
    pub fn as_key_set(&self) -> BTreeSet<&str> {
        match self {
            SubmittedAnswer::One(value) => std::iter::once(value.trim()).collect(),
            SubmittedAnswer::Many(values) => values.iter().map(|v| v.trim()).collect(),
        }
    }
}
