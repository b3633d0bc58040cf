use serde_json::Value;

use crate::models::{Status, StatusUpdate, TransformId};

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub transform: TransformId,
    pub sentence_index: usize,
    pub index_in_sentence: usize,
    /// Status the transformation was left in
    pub status: Status,
    /// Sentence text the change was made against: before the edit for
    /// accept/reject, after it for undo
    pub sentence_text: String,
    /// Offset of the transformation within `sentence_text`
    pub offset: Option<usize>,
    /// True if the sentence's active tokens were spliced
    pub tokens_changed: bool,
    /// Group members whose availability flipped
    pub availability_changed: Vec<TransformId>,
    pub version: u64,
}

impl Patch {
    /// Notification for the persistence collaborator
    pub fn status_update(&self, job_id: &Value) -> StatusUpdate {
        StatusUpdate {
            job_id: job_id.clone(),
            response_type: "rulesApplied".to_string(),
            sentence_index: self.sentence_index,
            transform_index: self.index_in_sentence,
            sentence: self.sentence_text.clone(),
            offset: self.offset,
            status: self.status,
        }
    }
}
