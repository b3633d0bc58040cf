//! Shared fixtures for unit tests.
//!
//! Token ids follow the service's convention: original tokens are numbered
//! first, added tokens continue the sequence.

use serde_json::Value;

use crate::models::{Job, JobSentence, JobTransformation, Token};

fn sentence(tokens: Vec<Token>, transformations: Vec<JobTransformation>) -> JobSentence {
    JobSentence {
        original_sentence: tokens,
        transformations,
        extra: Default::default(),
    }
}

fn job(sentences: Vec<JobSentence>) -> Job {
    Job {
        id: Value::from("job-1"),
        rules_applied: sentences,
        grammar_score: Some(72.0),
        status: Some(crate::models::job::JOB_CREATED),
        extra: Default::default(),
    }
}

/// "He hzve be there befor" with its three edits, closing with `last_after`
fn he_hzve_sentence(last_after: &str) -> JobSentence {
    sentence(
        vec![
            Token::new(1, "He", " "),
            Token::new(2, "hzve", " "),
            Token::new(3, "be", " "),
            Token::new(4, "there", " "),
            Token::new(5, "befor", last_after),
        ],
        vec![
            // hzve -> have
            JobTransformation::new(
                vec![Token::new(2, "hzve", " ")],
                vec![Token::new(6, "have", " ")],
            ),
            // have be -> has been; only applicable after the first edit
            JobTransformation::new(
                vec![Token::new(6, "have", " "), Token::new(3, "be", " ")],
                vec![Token::new(7, "has", " "), Token::new(8, "been", " ")],
            ),
            // befor -> before
            JobTransformation::new(
                vec![Token::new(5, "befor", last_after)],
                vec![Token::new(9, "before", last_after)],
            ),
        ],
    )
}

/// One sentence, "He hzve be there befor."
///
/// Edit 1 consumes the token edit 0 adds, edit 2 is independent.
pub fn he_hzve_job() -> Job {
    job(vec![he_hzve_sentence(".")])
}

/// "He hzve be there befor. Their going to the park."
///
/// The second sentence has two mutually exclusive alternatives for "Their"
/// (the second a suggestion) and a suggestion without replacement on "park".
pub fn two_sentence_job() -> Job {
    job(vec![
        he_hzve_sentence(". "),
        sentence(
            vec![
                Token::new(10, "Their", " "),
                Token::new(11, "going", " "),
                Token::new(12, "to", " "),
                Token::new(13, "the", " "),
                Token::new(14, "park", "."),
            ],
            vec![
                JobTransformation::new(
                    vec![Token::new(10, "Their", " ")],
                    vec![Token::new(20, "They're", " ")],
                ),
                JobTransformation::new(
                    vec![Token::new(10, "Their", " ")],
                    vec![Token::new(21, "There", " ")],
                )
                .suggestion(),
                JobTransformation::new(vec![Token::new(14, "park", ".")], Vec::new()).suggestion(),
            ],
        ),
    ])
}

/// "Hello" with one edit that adds "!" but names no tokens to replace
pub fn insertion_job() -> Job {
    job(vec![sentence(
        vec![Token::new(1, "Hello", "")],
        vec![JobTransformation::new(Vec::new(), vec![Token::new(2, "!", "")])],
    )])
}

pub fn create_test_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

pub fn create_test_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
