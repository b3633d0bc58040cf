//! Interactive review session over one [`Document`].
//!
//! The session flattens every transformation into one traversal order,
//! keeps the undo history, caches which transformations can be offered next,
//! and forwards every status change to an optional [`StatusSink`].

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::editing::{Document, EditError, Patch};
use crate::models::{Job, Sentence, TransformId, Transformation};
use crate::service::{ServiceError, StatusSink, UsageSource};

/// Behaviour switches for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Leave transformations without a replacement out of the available list
    pub ignore_no_replacement: bool,
    /// Send a status update to the sink after every change
    pub persist: bool,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),

    /// The change was applied in memory but could not be persisted
    #[error("transformation {transform} applied but not persisted: {source}")]
    Persist {
        transform: TransformId,
        #[source]
        source: ServiceError,
    },
}

pub struct Session {
    document: Document,
    options: SessionOptions,
    history: Vec<TransformId>,
    available: Vec<TransformId>,
    sink: Option<Box<dyn StatusSink>>,
    usage: Option<Box<dyn UsageSource>>,
}

impl Session {
    /// Start reviewing a job or an already built document.
    ///
    /// Transformations that already carry a non-clean status seed the undo
    /// history in flattened order. That is not necessarily the order the
    /// decisions were originally made in.
    pub fn new(document: impl Into<Document>) -> Self {
        let document = document.into();
        let history = document
            .transforms()
            .iter()
            .filter(|t| !t.is_clean())
            .map(Transformation::id)
            .collect();

        let mut session = Self {
            document,
            options: SessionOptions::default(),
            history,
            available: Vec::new(),
            sink: None,
            usage: None,
        };
        session.refresh_available();
        session
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self.refresh_available();
        self
    }

    pub fn with_sink(mut self, sink: impl StatusSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn with_usage_source(mut self, usage: impl UsageSource + 'static) -> Self {
        self.usage = Some(Box::new(usage));
        self
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn accept_correction(&mut self, id: TransformId) -> Result<Patch, SessionError> {
        let patch = self.document.accept(id)?;
        self.history.push(id);
        self.refresh_available();
        self.notify(&patch)?;
        Ok(patch)
    }

    pub fn reject_correction(&mut self, id: TransformId) -> Result<Patch, SessionError> {
        let patch = self.document.reject(id)?;
        self.history.push(id);
        self.refresh_available();
        self.notify(&patch)?;
        Ok(patch)
    }

    /// Undo the most recent decision.
    ///
    /// The history entry is only dropped once the undo succeeded.
    pub fn undo_last(&mut self) -> Result<Patch, SessionError> {
        let id = *self.history.last().ok_or(EditError::EmptyHistory)?;
        let patch = self.document.undo(id)?;
        self.history.pop();
        self.refresh_available();
        self.notify(&patch)?;
        Ok(patch)
    }

    pub fn can_undo_last(&self) -> bool {
        self.history
            .last()
            .is_some_and(|&id| self.document.can_undo_transform(id))
    }

    /// Transformation the next [`Session::undo_last`] would undo
    pub fn last_transform(&self) -> Option<&Transformation> {
        self.document.transform(*self.history.last()?)
    }

    /// Undo history, oldest first
    pub fn history(&self) -> &[TransformId] {
        &self.history
    }

    /// Accept available transformations until none are left, returning how
    /// many were accepted.
    ///
    /// Each accept can lock or unlock other members of its group, so the
    /// next candidate is picked from the refreshed list every time.
    pub fn apply_all(&mut self, skip_suggestions: bool) -> usize {
        let mut applied = 0;
        while let Some(id) = self.next_transform(skip_suggestions) {
            match self.accept_correction(id) {
                Ok(_) | Err(SessionError::Persist { .. }) => applied += 1,
                Err(SessionError::Edit(err)) => {
                    log::warn!("apply all stopped at {id}: {err}");
                    break;
                }
            }
        }
        log::debug!("applied {applied} transformations");
        applied
    }

    /// Undo decisions from the most recent until nothing more can be undone,
    /// returning how many were undone
    pub fn undo_all(&mut self) -> usize {
        let mut undone = 0;
        while self.can_undo_last() {
            match self.undo_last() {
                Ok(_) | Err(SessionError::Persist { .. }) => undone += 1,
                Err(SessionError::Edit(err)) => {
                    log::warn!("undo all stopped: {err}");
                    break;
                }
            }
        }
        log::debug!("undid {undone} transformations");
        undone
    }

    /// Transformations that can be offered now, in flattened order
    pub fn available_transforms(&self) -> &[TransformId] {
        &self.available
    }

    /// First available transformation, skipping suggestions if asked
    pub fn next_transform(&self, skip_suggestions: bool) -> Option<TransformId> {
        self.available.iter().copied().find(|&id| {
            !skip_suggestions
                || self
                    .document
                    .transform(id)
                    .is_some_and(|t| !t.is_suggestion())
        })
    }

    pub fn has_next_transform(&self, skip_suggestions: bool) -> bool {
        self.next_transform(skip_suggestions).is_some()
    }

    pub fn available_in_sentence(&self, sentence_index: usize) -> Vec<TransformId> {
        self.available
            .iter()
            .copied()
            .filter(|&id| {
                self.document
                    .transform(id)
                    .is_some_and(|t| t.sentence_index() == sentence_index)
            })
            .collect()
    }

    /// Transformation at a flattened position
    pub fn transform(&self, index: usize) -> Option<&Transformation> {
        self.document.transform(TransformId(index))
    }

    pub fn num_transforms(&self) -> usize {
        self.document.transforms().len()
    }

    pub fn sentence(&self, index: usize) -> Option<&Sentence> {
        self.document.sentence(index)
    }

    pub fn sentence_of(&self, id: TransformId) -> Option<&Sentence> {
        self.document.sentence_of(id)
    }

    pub fn num_sentences(&self) -> usize {
        self.document.num_sentences()
    }

    pub fn can_make_transform(&self, id: TransformId) -> bool {
        self.document.can_make_transform(id)
    }

    pub fn can_undo_transform(&self, id: TransformId) -> bool {
        self.document.can_undo_transform(id)
    }

    pub fn is_clean(&self, id: TransformId) -> bool {
        self.document.transform(id).is_some_and(Transformation::is_clean)
    }

    pub fn is_accepted(&self, id: TransformId) -> bool {
        self.document.transform(id).is_some_and(Transformation::is_accepted)
    }

    pub fn is_rejected(&self, id: TransformId) -> bool {
        self.document.transform(id).is_some_and(Transformation::is_rejected)
    }

    /// Members of the transformation's overlap group, itself included
    pub fn overlapping_group(&self, id: TransformId) -> Vec<&Transformation> {
        self.document
            .overlapping_group(id)
            .unwrap_or_default()
            .iter()
            .filter_map(|&member| self.document.transform(member))
            .collect()
    }

    /// Group members that replace exactly the same tokens, itself included
    pub fn overlapping_transforms(&self, id: TransformId) -> Vec<&Transformation> {
        let Some(transform) = self.document.transform(id) else {
            return Vec::new();
        };
        self.overlapping_group(id)
            .into_iter()
            .filter(|other| other.affects_same_tokens(transform))
            .collect()
    }

    /// Transformations nobody has decided on yet
    pub fn clean_transforms(&self) -> Vec<&Transformation> {
        self.document
            .transforms()
            .iter()
            .filter(|t| t.is_clean())
            .collect()
    }

    pub fn current_text(&self) -> String {
        self.document.current_text()
    }

    pub fn original_text(&self) -> String {
        self.document.original_text()
    }

    pub fn transform_offset(&self, id: TransformId) -> Option<usize> {
        self.document.transform_offset(id)
    }

    pub fn sentence_offset(&self, sentence_index: usize) -> Option<usize> {
        self.document.sentence_offset(sentence_index)
    }

    pub fn transform_document_offset(&self, id: TransformId) -> Option<usize> {
        self.document.transform_document_offset(id)
    }

    pub fn grammar_score(&self) -> Option<f64> {
        self.document.grammar_score()
    }

    /// Usage reported by the usage source, `None` without one
    pub fn usage(&self) -> Result<Option<Value>, ServiceError> {
        self.usage.as_ref().map(|source| source.usage()).transpose()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Wire form carrying every decision made so far
    pub fn to_job(&self) -> Job {
        self.document.to_job()
    }

    fn refresh_available(&mut self) {
        let ignore_no_replacement = self.options.ignore_no_replacement;
        self.available = self
            .document
            .transforms()
            .iter()
            .filter(|t| t.is_available() && (!ignore_no_replacement || t.has_replacement()))
            .map(Transformation::id)
            .collect();
    }

    fn notify(&mut self, patch: &Patch) -> Result<(), SessionError> {
        if !self.options.persist {
            return Ok(());
        }
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };

        let update = patch.status_update(self.document.job_id());
        sink.save_status(&update).map_err(|source| {
            log::warn!("failed to persist {} of {}: {source}", patch.status, patch.transform);
            SessionError::Persist {
                transform: patch.transform,
                source,
            }
        })
    }
}

impl From<Document> for Session {
    fn from(document: Document) -> Self {
        Self::new(document)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("document", &self.document)
            .field("options", &self.options)
            .field("history", &self.history)
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Status, StatusUpdate};
    use crate::service::{MemorySink, StaticUsage};
    use crate::tests::{he_hzve_job, insertion_job, two_sentence_job};
    use pretty_assertions::assert_eq;

    struct FailingSink;

    impl StatusSink for FailingSink {
        fn save_status(&mut self, _update: &StatusUpdate) -> Result<(), ServiceError> {
            Err(ServiceError::Rejected("quota exceeded".to_string()))
        }
    }

    fn ids(list: &[usize]) -> Vec<TransformId> {
        list.iter().copied().map(TransformId).collect()
    }

    #[test]
    fn test_new_session_offers_available_transforms() {
        let session = Session::new(he_hzve_job());
        assert_eq!(session.available_transforms(), ids(&[0, 2]).as_slice());
        assert!(session.history().is_empty());
        assert_eq!(session.next_transform(false), Some(TransformId(0)));
    }

    #[test]
    fn test_accept_pushes_history_and_refreshes() {
        let mut session = Session::new(he_hzve_job());
        session.accept_correction(TransformId(0)).unwrap();

        assert_eq!(session.history(), ids(&[0]).as_slice());
        assert_eq!(session.available_transforms(), ids(&[1, 2]).as_slice());
        assert_eq!(session.last_transform().unwrap().id(), TransformId(0));
    }

    #[test]
    fn test_failed_accept_leaves_history_alone() {
        let mut session = Session::new(he_hzve_job());
        let err = session.accept_correction(TransformId(1)).unwrap_err();

        assert!(matches!(err, SessionError::Edit(EditError::Unavailable { .. })));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_undo_last_on_empty_history() {
        let mut session = Session::new(he_hzve_job());
        assert!(matches!(
            session.undo_last(),
            Err(SessionError::Edit(EditError::EmptyHistory))
        ));
        assert!(!session.can_undo_last());
    }

    #[test]
    fn test_undo_last_keeps_entry_on_failure() {
        let mut session = Session::new(he_hzve_job());
        session.accept_correction(TransformId(0)).unwrap();
        session.accept_correction(TransformId(1)).unwrap();
        // make the most recent entry point at an edit whose tokens are gone
        session.history.push(TransformId(0));

        assert!(session.undo_last().is_err());
        assert_eq!(session.history(), ids(&[0, 1, 0]).as_slice());
    }

    #[test]
    fn test_undo_all_returns_to_original() {
        let mut session = Session::new(he_hzve_job());
        session.accept_correction(TransformId(0)).unwrap();
        session.accept_correction(TransformId(1)).unwrap();
        session.reject_correction(TransformId(2)).unwrap();

        assert_eq!(session.undo_all(), 3);
        assert_eq!(session.current_text(), session.original_text());
        assert_eq!(session.clean_transforms().len(), 3);
        assert_eq!(session.available_transforms(), ids(&[0, 2]).as_slice());
    }

    #[test]
    fn test_undo_all_reverts_insertion_without_anchor() {
        let mut session = Session::new(insertion_job());

        assert_eq!(session.apply_all(false), 1);
        assert_eq!(session.history(), ids(&[0]).as_slice());

        assert_eq!(session.undo_all(), 1);
        assert!(session.history().is_empty());
        assert!(session.is_clean(TransformId(0)));
        assert_eq!(session.available_transforms(), ids(&[0]).as_slice());
    }

    #[test]
    fn test_apply_all_reaches_fixed_point() {
        let mut session = Session::new(he_hzve_job());

        // edit 1 only becomes available after edit 0 was accepted
        assert_eq!(session.apply_all(false), 3);
        assert_eq!(session.current_text(), "He has been there before.");
        assert!(!session.has_next_transform(false));
    }

    #[test]
    fn test_apply_all_skipping_suggestions() {
        let mut session = Session::new(two_sentence_job());

        assert_eq!(session.apply_all(true), 4);
        assert_eq!(
            session.current_text(),
            "He has been there before. They're going to the park."
        );
        // the "There" alternative lost its token, "park" is still open
        assert!(session.is_clean(TransformId(4)));
        assert!(!session.can_make_transform(TransformId(4)));
        assert_eq!(session.available_transforms(), ids(&[5]).as_slice());
        assert!(!session.has_next_transform(true));
    }

    #[test]
    fn test_ignore_no_replacement_hides_edit() {
        let session = Session::new(two_sentence_job()).with_options(SessionOptions {
            ignore_no_replacement: true,
            ..Default::default()
        });

        assert_eq!(session.available_in_sentence(1), ids(&[3, 4]));
        assert!(session.can_make_transform(TransformId(5)));
    }

    #[test]
    fn test_recovered_session_seeds_history_in_flattened_order() {
        let mut job = two_sentence_job();
        job.rules_applied[1].transformations[0].status = Some(Status::Rejected);
        job.rules_applied[0].transformations[2].status = Some(Status::Accepted);

        let mut session = Session::new(job);
        assert_eq!(session.history(), ids(&[2, 3]).as_slice());

        session.undo_last().unwrap();
        assert!(session.is_clean(TransformId(3)));
        assert!(session.is_accepted(TransformId(2)));
    }

    #[test]
    fn test_overlapping_transforms_share_span() {
        let session = Session::new(two_sentence_job());

        let group: Vec<TransformId> = session
            .overlapping_group(TransformId(0))
            .iter()
            .map(|t| t.id())
            .collect();
        assert_eq!(group, ids(&[0, 1]));

        let same_span: Vec<TransformId> = session
            .overlapping_transforms(TransformId(3))
            .iter()
            .map(|t| t.id())
            .collect();
        assert_eq!(same_span, ids(&[3, 4]));
        assert_eq!(session.overlapping_transforms(TransformId(0)).len(), 1);
        assert!(session.overlapping_transforms(TransformId(99)).is_empty());
    }

    #[test]
    fn test_persist_sends_status_updates() {
        let sink = MemorySink::default();
        let mut session = Session::new(he_hzve_job())
            .with_options(SessionOptions {
                persist: true,
                ..Default::default()
            })
            .with_sink(sink.clone());

        session.reject_correction(TransformId(2)).unwrap();
        session.undo_last().unwrap();

        let updates = sink.updates();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].status, Status::Rejected);
        assert_eq!(updates[0].transform_index, 2);
        assert_eq!(updates[0].offset, Some(17));
        assert_eq!(updates[0].job_id, Value::from("job-1"));
        assert_eq!(updates[1].status, Status::Clean);
    }

    #[test]
    fn test_no_updates_without_persist() {
        let sink = MemorySink::default();
        let mut session = Session::new(he_hzve_job()).with_sink(sink.clone());

        session.accept_correction(TransformId(0)).unwrap();
        assert!(sink.updates().is_empty());
    }

    #[test]
    fn test_persist_failure_keeps_change() {
        let mut session = Session::new(he_hzve_job())
            .with_options(SessionOptions {
                persist: true,
                ..Default::default()
            })
            .with_sink(FailingSink);

        let err = session.accept_correction(TransformId(0)).unwrap_err();

        assert!(matches!(err, SessionError::Persist { transform, .. } if transform == TransformId(0)));
        assert!(session.is_accepted(TransformId(0)));
        assert_eq!(session.history(), ids(&[0]).as_slice());
        assert_eq!(session.current_text(), "He have be there befor.");
    }

    #[test]
    fn test_apply_all_continues_past_persist_failures() {
        let mut session = Session::new(he_hzve_job())
            .with_options(SessionOptions {
                persist: true,
                ..Default::default()
            })
            .with_sink(FailingSink);

        assert_eq!(session.apply_all(false), 3);
    }

    #[test]
    fn test_usage_and_score_pass_through() {
        let session = Session::new(he_hzve_job());
        assert_eq!(session.usage().unwrap(), None);
        assert_eq!(session.grammar_score(), Some(72.0));

        let usage = serde_json::json!({"remaining": 12});
        let session = session.with_usage_source(StaticUsage(usage.clone()));
        assert_eq!(session.usage().unwrap(), Some(usage));
    }

    #[test]
    fn test_to_job_recovers_session() {
        let mut session = Session::new(he_hzve_job());
        session.accept_correction(TransformId(0)).unwrap();

        let recovered = Session::new(session.to_job());
        assert_eq!(recovered.current_text(), "He have be there befor.");
        assert_eq!(recovered.history(), ids(&[0]).as_slice());
        assert_eq!(recovered.available_transforms(), session.available_transforms());
    }
}
