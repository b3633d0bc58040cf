use serde_json::{Map, Value};

use crate::editing::text::text_of;
use crate::models::{GroupId, Token, TransformId};

/// A sentence inside a built [`crate::editing::Document`].
///
/// `original` is the token sequence as received and never changes.
/// `active` is the working sequence: `original` with every accepted
/// replacement spliced in. Transformations live in the document arena; the
/// sentence only holds their ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub(crate) index: usize,
    pub(crate) original: Vec<Token>,
    pub(crate) active: Vec<Token>,
    pub(crate) transforms: Vec<TransformId>,
    /// Indexed by `GroupId`; members in discovery order
    pub(crate) groups: Vec<Vec<TransformId>>,
    pub(crate) extra: Map<String, Value>,
}

impl Sentence {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn original_tokens(&self) -> &[Token] {
        &self.original
    }

    pub fn active_tokens(&self) -> &[Token] {
        &self.active
    }

    /// Transformations of this sentence in their original order
    pub fn transform_ids(&self) -> &[TransformId] {
        &self.transforms
    }

    pub fn num_transformations(&self) -> usize {
        self.transforms.len()
    }

    /// Transformation at `index_in_sentence`
    pub fn transform_at(&self, index_in_sentence: usize) -> Option<TransformId> {
        self.transforms.get(index_in_sentence).copied()
    }

    pub fn groups(&self) -> &[Vec<TransformId>] {
        &self.groups
    }

    pub fn group(&self, group_id: GroupId) -> Option<&[TransformId]> {
        self.groups.get(group_id.0).map(Vec::as_slice)
    }

    /// Sentence text with accepted edits applied
    pub fn current_text(&self) -> String {
        text_of(&self.active)
    }

    /// Sentence text as received
    pub fn original_text(&self) -> String {
        text_of(&self.original)
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}
