//! Accept / reject / undo as commands over a [`Document`].
//!
//! Every command is local to the transformation's sentence: it may splice the
//! sentence's active tokens, sets the transformation's status, and then
//! recomputes availability for the transformation's overlap group only.

use thiserror::Error;

use crate::editing::tokens::{contains_run, splice};
use crate::editing::{Document, Patch};
use crate::models::{GroupId, Sentence, Status, Token, TransformId, Transformation};

/// Edit algebra
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    /// Splice the replacement in and mark the transformation accepted
    Accept(TransformId),
    /// Mark the transformation rejected; tokens are untouched
    Reject(TransformId),
    /// Return an accepted or rejected transformation to clean
    Undo(TransformId),
}

impl Cmd {
    pub fn transform(&self) -> TransformId {
        match self {
            Cmd::Accept(id) | Cmd::Reject(id) | Cmd::Undo(id) => *id,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("transformation {transform} is not available")]
    Unavailable { transform: TransformId },

    #[error("transformation {transform} cannot be undone")]
    NotUndoable { transform: TransformId },

    #[error("no transformation {0}")]
    UnknownTransform(TransformId),

    #[error("nothing to undo")]
    EmptyHistory,
}

/// A clean transformation is available when its affected run is present
pub(crate) fn compute_availability(transform: &Transformation, active: &[Token]) -> bool {
    transform.status == Status::Clean && contains_run(active, &transform.tokens_affected)
}

/// Recompute availability of every transformation in `sentence`
pub(crate) fn refresh_sentence(sentence: &Sentence, transforms: &mut [Transformation]) {
    for id in &sentence.transforms {
        if let Some(transform) = transforms.get_mut(id.0) {
            transform.is_available = compute_availability(transform, &sentence.active);
        }
    }
}

/// Recompute availability inside one overlap group, returning the members
/// whose flag flipped
fn refresh_group(
    sentence: &Sentence,
    transforms: &mut [Transformation],
    group_id: GroupId,
) -> Vec<TransformId> {
    let Some(members) = sentence.group(group_id) else {
        return Vec::new();
    };

    let mut changed = Vec::new();
    for &id in members {
        let Some(transform) = transforms.get_mut(id.0) else {
            continue;
        };
        let available = compute_availability(transform, &sentence.active);
        if available != transform.is_available {
            transform.is_available = available;
            changed.push(id);
        }
    }
    changed
}

pub(crate) fn can_undo(doc: &Document, id: TransformId) -> bool {
    let Some(transform) = doc.transform(id) else {
        return false;
    };
    let Some(sentence) = doc.sentence(transform.sentence_index) else {
        return false;
    };

    !transform.has_replacement
        || match transform.status {
            // an insertion without anchor tokens never spliced anything
            Status::Accepted => {
                transform.tokens_affected.is_empty()
                    || contains_run(&sentence.active, &transform.tokens_added)
            }
            Status::Rejected => contains_run(&sentence.active, &transform.tokens_affected),
            Status::Clean => false,
        }
}

pub(crate) fn apply_command(doc: &mut Document, cmd: Cmd) -> Result<Patch, EditError> {
    let id = cmd.transform();
    let transform = doc.transform(id).ok_or(EditError::UnknownTransform(id))?;
    let sentence_index = transform.sentence_index;
    let index_in_sentence = transform.index_in_sentence;
    let group_id = transform.group_id;

    let allowed = match cmd {
        Cmd::Accept(_) | Cmd::Reject(_) => transform.is_available,
        Cmd::Undo(_) => can_undo(doc, id),
    };
    if !allowed {
        return Err(match cmd {
            Cmd::Undo(_) => EditError::NotUndoable { transform: id },
            _ => EditError::Unavailable { transform: id },
        });
    }

    // Accept and reject report the sentence as it read when the user acted on it
    let before = match cmd {
        Cmd::Undo(_) => None,
        _ => Some((
            doc.current_sentence_text(sentence_index).unwrap_or_default(),
            doc.transform_offset(id),
        )),
    };

    let Document {
        sentences,
        transforms,
        version,
        ..
    } = doc;
    let sentence = sentences
        .get_mut(sentence_index)
        .ok_or(EditError::UnknownTransform(id))?;
    let transform = transforms
        .get_mut(id.0)
        .ok_or(EditError::UnknownTransform(id))?;

    let tokens_changed = match cmd {
        Cmd::Accept(_) => {
            transform.status = Status::Accepted;
            transform.has_replacement
                && splice(
                    &mut sentence.active,
                    &transform.tokens_affected,
                    &transform.tokens_added,
                )
        }
        Cmd::Reject(_) => {
            transform.status = Status::Rejected;
            false
        }
        Cmd::Undo(_) => {
            let was_accepted = transform.status == Status::Accepted;
            transform.status = Status::Clean;
            was_accepted
                && transform.has_replacement
                && !transform.tokens_affected.is_empty()
                && splice(
                    &mut sentence.active,
                    &transform.tokens_added,
                    &transform.tokens_affected,
                )
        }
    };
    let status = transform.status;

    let availability_changed = refresh_group(sentence, transforms, group_id);
    *version += 1;

    let (sentence_text, offset) = match before {
        Some(before) => before,
        None => (
            doc.current_sentence_text(sentence_index).unwrap_or_default(),
            doc.transform_offset(id),
        ),
    };

    log::debug!(
        "{cmd:?} applied to sentence {sentence_index}: status {status}, tokens changed {tokens_changed}, \
         {} availability flips",
        availability_changed.len()
    );

    Ok(Patch {
        transform: id,
        sentence_index,
        index_in_sentence,
        status,
        sentence_text,
        offset,
        tokens_changed,
        availability_changed,
        version: doc.version,
    })
}
