use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a token, unique within one job.
///
/// Containment checks (is this run still in the sentence?) compare ids only,
/// never the token text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub i64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Smallest addressable unit of rendered text: a word or punctuation mark plus
/// whatever separator follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub value: String,
    #[serde(default)]
    pub after: String,
}

impl Token {
    pub fn new(id: i64, value: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            id: TokenId(id),
            value: value.into(),
            after: after.into(),
        }
    }

    /// Byte length of the rendered token (`value` + `after`)
    pub fn text_len(&self) -> usize {
        self.value.len() + self.after.len()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.after)
    }
}
