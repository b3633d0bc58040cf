//! Wire shapes exchanged with the correction service.
//!
//! A [`Job`] is the annotated response exactly as received (or as exported
//! again after a review session). It carries no derived metadata; see
//! [`crate::editing::Document`] for the working form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::models::Token;

/// HTTP-style status the service reports for a completed job
pub const JOB_CREATED: u16 = 201;

/// Metadata keys a previous client may have written into a transformation.
/// They are recomputed on load and never written back.
pub(crate) const TRANSFORMATION_META_KEYS: &[&str] = &[
    "groupId",
    "isAvailable",
    "transformIndex",
    "indexInSentence",
    "sentenceIndex",
];

/// Metadata keys a previous client may have written into a sentence.
pub(crate) const SENTENCE_META_KEYS: &[&str] = &["activeTokens", "groups", "sentenceIndex"];

/// Review status of a single transformation.
///
/// Serialized with the service's vocabulary (`clean`, `accept`, `reject`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "clean")]
    Clean,
    #[serde(rename = "accept", alias = "accepted")]
    Accepted,
    #[serde(rename = "reject", alias = "rejected")]
    Rejected,
}

impl Status {
    /// Wire spelling of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Clean => "clean",
            Status::Accepted => "accept",
            Status::Rejected => "reject",
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, Status::Clean)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Clean => "clean",
            Status::Accepted => "accepted",
            Status::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// Annotated correction response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Opaque job identifier, echoed back in status updates
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub rules_applied: Vec<JobSentence>,
    #[serde(default)]
    pub grammar_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Response fields this crate does not interpret (e.g. `corrected`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Parse a job from its JSON representation
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// True if the service reported the job as successfully created
    pub fn is_successful(&self) -> bool {
        self.status == Some(JOB_CREATED)
    }

    pub fn grammar_score(&self) -> Option<f64> {
        self.grammar_score
    }
}

/// One sentence of the response with the edits proposed for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSentence {
    pub original_sentence: Vec<Token>,
    #[serde(default)]
    pub transformations: Vec<JobTransformation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A proposed edit as received from the service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTransformation {
    #[serde(default)]
    pub tokens_affected: Vec<Token>,
    #[serde(default)]
    pub tokens_added: Vec<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_replacement: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_suggestion: Option<bool>,
    /// Present when recovering a job that was already reviewed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobTransformation {
    pub fn new(tokens_affected: Vec<Token>, tokens_added: Vec<Token>) -> Self {
        Self {
            tokens_affected,
            tokens_added,
            ..Default::default()
        }
    }

    pub fn suggestion(mut self) -> Self {
        self.is_suggestion = Some(true);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Explicit wire flag, falling back to "has added tokens"
    pub fn has_replacement(&self) -> bool {
        self.has_replacement
            .unwrap_or(!self.tokens_added.is_empty())
    }
}

/// Notification sent to the persistence collaborator after every
/// accept, reject or undo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub job_id: Value,
    pub response_type: String,
    pub sentence_index: usize,
    /// Index of the transformation within its sentence
    pub transform_index: usize,
    /// Sentence text the offset refers to
    pub sentence: String,
    pub offset: Option<usize>,
    pub status: Status,
}

pub(crate) fn strip_keys(extra: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        extra.remove(*key);
    }
}
