//! One-time metadata build over a received job, and the reverse export.
//!
//! Building assigns every transformation its sentence position, its
//! document-wide [`TransformId`] and its overlap group, reconstructs each
//! sentence's active tokens from recovered `accept` statuses, and computes
//! initial availability.

use crate::editing::commands::refresh_sentence;
use crate::editing::Document;
use crate::editing::grouping::group_transformations;
use crate::editing::tokens::splice;
use crate::models::job::{SENTENCE_META_KEYS, TRANSFORMATION_META_KEYS, strip_keys};
use crate::models::{
    GroupId, Job, JobSentence, JobTransformation, Sentence, Status, TransformId, Transformation,
};

pub(crate) fn build(job: Job) -> Document {
    let Job {
        id,
        rules_applied,
        grammar_score,
        status,
        extra,
    } = job;

    // The arena doubles as the running transform counter: the next id is its length
    let mut transforms = Vec::new();
    let sentences = rules_applied
        .into_iter()
        .enumerate()
        .map(|(index, raw)| build_sentence(index, raw, &mut transforms))
        .collect();

    Document {
        job_id: id,
        grammar_score,
        job_status: status,
        sentences,
        transforms,
        extra,
        version: 0,
    }
}

fn build_sentence(
    sentence_index: usize,
    raw: JobSentence,
    arena: &mut Vec<Transformation>,
) -> Sentence {
    let JobSentence {
        original_sentence,
        transformations,
        mut extra,
    } = raw;
    strip_keys(&mut extra, SENTENCE_META_KEYS);

    let first_id = arena.len();
    let member_lists = group_transformations(&transformations);

    let mut group_of = vec![GroupId::default(); transformations.len()];
    let mut groups: Vec<Vec<TransformId>> = Vec::with_capacity(member_lists.len());
    for (group, members) in member_lists.iter().enumerate() {
        for &index in members {
            group_of[index] = GroupId(group);
        }
        groups.push(members.iter().map(|&index| TransformId(first_id + index)).collect());
    }

    let mut active = original_sentence.clone();
    let mut ids = Vec::with_capacity(transformations.len());

    for (index_in_sentence, raw) in transformations.into_iter().enumerate() {
        let id = TransformId(arena.len());
        let transform = build_transformation(
            id,
            sentence_index,
            index_in_sentence,
            group_of[index_in_sentence],
            raw,
        );

        if transform.status == Status::Accepted
            && transform.has_replacement
            && !transform.tokens_affected.is_empty()
            && !splice(&mut active, &transform.tokens_affected, &transform.tokens_added)
        {
            log::warn!(
                "recovered accepted transformation {id} does not apply to sentence {sentence_index}; \
                 its tokens are not present"
            );
        }

        ids.push(id);
        arena.push(transform);
    }

    let sentence = Sentence {
        index: sentence_index,
        original: original_sentence,
        active,
        transforms: ids,
        groups,
        extra,
    };
    refresh_sentence(&sentence, arena);

    log::debug!(
        "built sentence {sentence_index}: {} transformations in {} groups",
        sentence.transforms.len(),
        sentence.groups.len()
    );
    sentence
}

fn build_transformation(
    id: TransformId,
    sentence_index: usize,
    index_in_sentence: usize,
    group_id: GroupId,
    raw: JobTransformation,
) -> Transformation {
    let has_replacement = raw.has_replacement();
    let JobTransformation {
        tokens_affected,
        tokens_added,
        is_suggestion,
        status,
        mut extra,
        ..
    } = raw;
    strip_keys(&mut extra, TRANSFORMATION_META_KEYS);

    Transformation {
        id,
        sentence_index,
        index_in_sentence,
        group_id,
        tokens_affected,
        tokens_added,
        has_replacement,
        is_suggestion: is_suggestion.unwrap_or(false),
        status: status.unwrap_or_default(),
        is_available: false,
        extra,
    }
}

pub(crate) fn export(doc: &Document) -> Job {
    let rules_applied = doc
        .sentences
        .iter()
        .map(|sentence| JobSentence {
            original_sentence: sentence.original.clone(),
            transformations: sentence
                .transforms
                .iter()
                .map(|id| export_transformation(&doc.transforms[id.0]))
                .collect(),
            extra: sentence.extra.clone(),
        })
        .collect();

    Job {
        id: doc.job_id.clone(),
        rules_applied,
        grammar_score: doc.grammar_score,
        status: doc.job_status,
        extra: doc.extra.clone(),
    }
}

fn export_transformation(transform: &Transformation) -> JobTransformation {
    JobTransformation {
        tokens_affected: transform.tokens_affected.clone(),
        tokens_added: transform.tokens_added.clone(),
        has_replacement: Some(transform.has_replacement),
        is_suggestion: Some(transform.is_suggestion),
        status: Some(transform.status),
        extra: transform.extra.clone(),
    }
}
