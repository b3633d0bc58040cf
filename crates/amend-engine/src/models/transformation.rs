use serde_json::{Map, Value};
use std::fmt;

use crate::editing::text::text_of;
use crate::models::{Status, Token};

/// Position of a transformation in the document-wide flattened order.
///
/// Dense `0..N` across all sentences, assigned once when the document is
/// built. Doubles as the index into the document's transformation arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TransformId(pub usize);

impl fmt::Display for TransformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Overlap group of a transformation within its sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GroupId(pub usize);

/// Anything that removes one token run and inserts another.
///
/// Implemented by both the wire form and the working form so overlap
/// grouping can run on either.
pub trait TokenEdit {
    fn tokens_affected(&self) -> &[Token];
    fn tokens_added(&self) -> &[Token];
}

/// A proposed edit inside a built [`crate::editing::Document`]
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    pub(crate) id: TransformId,
    pub(crate) sentence_index: usize,
    pub(crate) index_in_sentence: usize,
    pub(crate) group_id: GroupId,
    pub(crate) tokens_affected: Vec<Token>,
    pub(crate) tokens_added: Vec<Token>,
    pub(crate) has_replacement: bool,
    pub(crate) is_suggestion: bool,
    pub(crate) status: Status,
    pub(crate) is_available: bool,
    pub(crate) extra: Map<String, Value>,
}

impl Transformation {
    pub fn id(&self) -> TransformId {
        self.id
    }

    pub fn sentence_index(&self) -> usize {
        self.sentence_index
    }

    pub fn index_in_sentence(&self) -> usize {
        self.index_in_sentence
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn tokens_affected(&self) -> &[Token] {
        &self.tokens_affected
    }

    pub fn tokens_added(&self) -> &[Token] {
        &self.tokens_added
    }

    pub fn has_replacement(&self) -> bool {
        self.has_replacement
    }

    pub fn is_suggestion(&self) -> bool {
        self.is_suggestion
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the edit can be accepted or rejected right now
    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn is_clean(&self) -> bool {
        self.status == Status::Clean
    }

    pub fn is_accepted(&self) -> bool {
        self.status == Status::Accepted
    }

    pub fn is_rejected(&self) -> bool {
        self.status == Status::Rejected
    }

    /// Fields from the service this crate does not interpret (rule ids, messages...)
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// The removed tokens rendered as text
    pub fn affected_text(&self) -> String {
        text_of(&self.tokens_affected)
    }

    /// The inserted tokens rendered as text
    pub fn added_text(&self) -> String {
        text_of(&self.tokens_added)
    }

    /// Same sentence and position-for-position identical affected ids
    pub fn affects_same_tokens(&self, other: &Transformation) -> bool {
        self.sentence_index == other.sentence_index
            && self.tokens_affected.len() == other.tokens_affected.len()
            && self
                .tokens_affected
                .iter()
                .zip(&other.tokens_affected)
                .all(|(a, b)| a.id == b.id)
    }
}

impl TokenEdit for Transformation {
    fn tokens_affected(&self) -> &[Token] {
        &self.tokens_affected
    }

    fn tokens_added(&self) -> &[Token] {
        &self.tokens_added
    }
}

impl TokenEdit for crate::models::JobTransformation {
    fn tokens_affected(&self) -> &[Token] {
        &self.tokens_affected
    }

    fn tokens_added(&self) -> &[Token] {
        &self.tokens_added
    }
}
