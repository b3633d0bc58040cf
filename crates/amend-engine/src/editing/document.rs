use serde_json::{Map, Value};

use crate::editing::commands::{self, Cmd, EditError};
use crate::editing::{Patch, metadata};
use crate::models::{GroupId, Job, Sentence, Status, TransformId, Transformation};

/// A correction job with its review metadata built.
///
/// Document is the working model for one review session. It maintains:
///
/// ## 1. Transformation arena
/// - **Single owner**: every transformation lives once in `transforms`,
///   indexed by its [`TransformId`] (the document-wide flattened position)
/// - **Shared by id**: sentences, overlap groups and the session's flattened
///   view hold ids, so one update is visible everywhere
///
/// ## 2. Working token sequences
/// - **Original text**: each sentence keeps the tokens as received
/// - **Active tokens**: the same sentence with accepted edits spliced in
///
/// ## 3. Command-based editing
/// - **Edit algebra**: accept, reject and undo flow through [`Cmd`]
/// - **Atomic**: a command either fails its precondition and changes nothing,
///   or fully applies and returns a [`Patch`]
/// - **Version counter**: incremented on every applied command
///
/// ## Usage Pattern
///
/// ```rust
/// # use amend_engine::editing::{Cmd, Document};
/// # use amend_engine::models::{Job, TransformId};
/// # let job = Job::from_json(r#"{"id": 1, "rulesApplied": [{
/// #     "originalSentence": [{"id": 1, "value": "Teh", "after": "."}],
/// #     "transformations": [{
/// #         "tokensAffected": [{"id": 1, "value": "Teh", "after": "."}],
/// #         "tokensAdded": [{"id": 2, "value": "The", "after": "."}]
/// #     }]
/// # }]}"#).unwrap();
/// let mut doc = Document::from_job(job);
/// let first = TransformId(0);
///
/// assert!(doc.can_make_transform(first));
/// let patch = doc.apply(Cmd::Accept(first)).unwrap();
/// assert_eq!(doc.current_text(), "The.");
///
/// doc.apply(Cmd::Undo(patch.transform)).unwrap();
/// assert_eq!(doc.current_text(), "Teh.");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) job_id: Value,
    pub(crate) grammar_score: Option<f64>,
    pub(crate) job_status: Option<u16>,
    pub(crate) sentences: Vec<Sentence>,
    pub(crate) transforms: Vec<Transformation>,
    pub(crate) extra: Map<String, Value>,
    pub(crate) version: u64,
}

impl Document {
    /// Build review metadata for a freshly received (or recovered) job
    pub fn from_job(job: Job) -> Self {
        metadata::build(job)
    }

    /// Export back to the wire shape, carrying each transformation's status.
    ///
    /// Feeding the result to [`Document::from_job`] recovers the same
    /// working state.
    pub fn to_job(&self) -> Job {
        metadata::export(self)
    }

    /// Apply a command to the document
    ///
    /// Either the command's precondition fails and the document is left
    /// untouched, or the edit is applied in full:
    ///
    /// 1. **Token splice**: accepted replacements swap their tokens into the
    ///    sentence's active sequence (undo swaps them back)
    /// 2. **Status update**: the transformation becomes accepted, rejected or
    ///    clean
    /// 3. **Group refresh**: availability is recomputed for every member of
    ///    the transformation's overlap group
    /// 4. **Version increment**
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        commands::apply_command(self, cmd)
    }

    pub fn accept(&mut self, id: TransformId) -> Result<Patch, EditError> {
        self.apply(Cmd::Accept(id))
    }

    pub fn reject(&mut self, id: TransformId) -> Result<Patch, EditError> {
        self.apply(Cmd::Reject(id))
    }

    pub fn undo(&mut self, id: TransformId) -> Result<Patch, EditError> {
        self.apply(Cmd::Undo(id))
    }

    /// True if the transformation can be accepted or rejected now
    pub fn can_make_transform(&self, id: TransformId) -> bool {
        self.transform(id).is_some_and(Transformation::is_available)
    }

    /// True if the transformation can be returned to clean now
    pub fn can_undo_transform(&self, id: TransformId) -> bool {
        commands::can_undo(self, id)
    }

    pub fn job_id(&self) -> &Value {
        &self.job_id
    }

    /// Score from the service, if it was requested
    pub fn grammar_score(&self) -> Option<f64> {
        self.grammar_score
    }

    /// True if the service reported the job as successfully created
    pub fn is_successful(&self) -> bool {
        self.job_status == Some(crate::models::job::JOB_CREATED)
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentence(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    pub fn num_sentences(&self) -> usize {
        self.sentences.len()
    }

    /// Every transformation in flattened `(sentence, position)` order
    pub fn transforms(&self) -> &[Transformation] {
        &self.transforms
    }

    pub fn transform(&self, id: TransformId) -> Option<&Transformation> {
        self.transforms.get(id.0)
    }

    /// Transformation by sentence and position within the sentence
    pub fn transform_at(
        &self,
        sentence_index: usize,
        index_in_sentence: usize,
    ) -> Option<&Transformation> {
        let id = self.sentence(sentence_index)?.transform_at(index_in_sentence)?;
        self.transform(id)
    }

    /// Sentence a transformation belongs to
    pub fn sentence_of(&self, id: TransformId) -> Option<&Sentence> {
        self.sentence(self.transform(id)?.sentence_index)
    }

    /// All members of the transformation's overlap group, itself included
    pub fn overlapping_group(&self, id: TransformId) -> Option<&[TransformId]> {
        let transform = self.transform(id)?;
        self.sentence(transform.sentence_index)?.group(transform.group_id)
    }

    /// Group members of a sentence's group
    pub fn group(&self, sentence_index: usize, group_id: GroupId) -> Option<&[TransformId]> {
        self.sentence(sentence_index)?.group(group_id)
    }

    /// Available transformations of one sentence, in sentence order
    pub fn available_in_sentence(&self, sentence_index: usize) -> Vec<TransformId> {
        self.sentence(sentence_index)
            .map(|sentence| {
                sentence
                    .transforms
                    .iter()
                    .copied()
                    .filter(|&id| self.can_make_transform(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of transformations per status, in `[clean, accepted, rejected]` order
    pub fn status_counts(&self) -> [usize; 3] {
        self.transforms.iter().fold([0; 3], |mut counts, t| {
            let slot = match t.status {
                Status::Clean => 0,
                Status::Accepted => 1,
                Status::Rejected => 2,
            };
            counts[slot] += 1;
            counts
        })
    }
}

impl From<Job> for Document {
    fn from(job: Job) -> Self {
        Self::from_job(job)
    }
}
