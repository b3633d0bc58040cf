// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use amend_engine::models::{Job, JobSentence, JobTransformation, Token};

/// A job of `sentences` copies of "He hzve be there befor." with fresh token ids.
///
/// Each sentence carries a dependent pair of edits, an independent edit and
/// a mutually exclusive alternative.
#[allow(dead_code)]
pub fn generate_job(sentences: usize) -> Job {
    let rules_applied = (0..sentences)
        .map(|index| {
            let base = index as i64 * 100;
            let t = |offset: i64, value: &str, after: &str| Token::new(base + offset, value, after);

            JobSentence {
                original_sentence: vec![
                    t(1, "He", " "),
                    t(2, "hzve", " "),
                    t(3, "be", " "),
                    t(4, "there", " "),
                    t(5, "befor", ". "),
                ],
                transformations: vec![
                    JobTransformation::new(vec![t(2, "hzve", " ")], vec![t(6, "have", " ")]),
                    JobTransformation::new(
                        vec![t(6, "have", " "), t(3, "be", " ")],
                        vec![t(7, "has", " "), t(8, "been", " ")],
                    ),
                    JobTransformation::new(vec![t(5, "befor", ". ")], vec![t(9, "before", ". ")]),
                    JobTransformation::new(vec![t(5, "befor", ". ")], vec![t(10, "beefier", ". ")])
                        .suggestion(),
                ],
                extra: Default::default(),
            }
        })
        .collect();

    Job {
        id: serde_json::Value::from("bench"),
        rules_applied,
        grammar_score: None,
        status: None,
        extra: Default::default(),
    }
}
