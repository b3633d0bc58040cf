//! Text and offset reconstruction.
//!
//! Offsets are byte offsets into the UTF-8 rendering of the current document
//! state. Nothing here is cached: any accepted or undone edit can move every
//! later offset, so each query rescans the token sequences.

use crate::editing::Document;
use crate::editing::tokens::find_run;
use crate::models::{Token, TransformId};

/// Render a token sequence: each token's value followed by its separator
pub fn text_of(tokens: &[Token]) -> String {
    let mut text = String::with_capacity(tokens.iter().map(Token::text_len).sum());
    for token in tokens {
        text.push_str(&token.value);
        text.push_str(&token.after);
    }
    text
}

impl Document {
    /// Full text with every accepted edit applied
    pub fn current_text(&self) -> String {
        self.sentences.iter().map(|s| s.current_text()).collect()
    }

    /// Full text as received from the service
    pub fn original_text(&self) -> String {
        self.sentences.iter().map(|s| s.original_text()).collect()
    }

    /// Byte offset of a sentence's start in the current text
    pub fn sentence_offset(&self, sentence_index: usize) -> Option<usize> {
        let preceding = self.sentences.get(..sentence_index)?;
        Some(
            preceding
                .iter()
                .flat_map(|s| s.active.iter())
                .map(Token::text_len)
                .sum(),
        )
    }

    /// Byte offset of a transformation's affected tokens within its sentence.
    ///
    /// `None` when those tokens are not in the sentence as it currently reads.
    /// Status plays no part: a rejected edit still points at its tokens.
    pub fn transform_offset(&self, id: TransformId) -> Option<usize> {
        let transform = self.transform(id)?;
        let sentence = self.sentences.get(transform.sentence_index)?;
        let run = find_run(&sentence.active, &transform.tokens_affected)?;
        Some(sentence.active[..run.start].iter().map(Token::text_len).sum())
    }

    /// Byte offset of a transformation relative to the start of the document
    pub fn transform_document_offset(&self, id: TransformId) -> Option<usize> {
        let transform = self.transform(id)?;
        let sentence_offset = self.sentence_offset(transform.sentence_index)?;
        Some(sentence_offset + self.transform_offset(id)?)
    }

    /// Current text of one sentence
    pub fn current_sentence_text(&self, sentence_index: usize) -> Option<String> {
        self.sentences.get(sentence_index).map(|s| s.current_text())
    }

    /// Original text of one sentence
    pub fn original_sentence_text(&self, sentence_index: usize) -> Option<String> {
        self.sentences.get(sentence_index).map(|s| s.original_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{he_hzve_job, two_sentence_job};

    #[test]
    fn test_text_of_concatenates_value_and_after() {
        let tokens = vec![Token::new(1, "Hi", ", "), Token::new(2, "there", "!")];
        assert_eq!(text_of(&tokens), "Hi, there!");
        assert_eq!(text_of(&[]), "");
    }

    #[test]
    fn test_document_text_before_any_action() {
        let doc = Document::from_job(he_hzve_job());
        assert_eq!(doc.current_text(), "He hzve be there befor.");
        assert_eq!(doc.original_text(), "He hzve be there befor.");
    }

    #[test]
    fn test_transform_offset_of_available_edit() {
        let doc = Document::from_job(he_hzve_job());

        // "He " precedes "hzve"
        assert_eq!(doc.transform_offset(TransformId(0)), Some(3));
        // "He hzve be there " precedes "befor"
        assert_eq!(doc.transform_offset(TransformId(2)), Some(17));
    }

    #[test]
    fn test_transform_offset_of_missing_tokens_is_none() {
        let doc = Document::from_job(he_hzve_job());
        assert_eq!(doc.transform_offset(TransformId(1)), None);
        assert_eq!(doc.transform_offset(TransformId(99)), None);
    }

    #[test]
    fn test_transform_offset_ignores_status() {
        let mut doc = Document::from_job(he_hzve_job());

        doc.reject(TransformId(2)).unwrap();
        assert!(!doc.can_make_transform(TransformId(2)));
        assert_eq!(doc.transform_offset(TransformId(2)), Some("He hzve be there ".len()));

        // accepting replaces the affected token, so there is nothing to point at
        doc.accept(TransformId(0)).unwrap();
        assert_eq!(doc.transform_offset(TransformId(0)), None);
    }

    #[test]
    fn test_offsets_follow_accepted_edits() {
        let mut doc = Document::from_job(two_sentence_job());
        assert_eq!(doc.sentence_offset(0), Some(0));
        assert_eq!(doc.sentence_offset(1), Some("He hzve be there befor. ".len()));

        doc.accept(TransformId(0)).unwrap();
        doc.accept(TransformId(1)).unwrap();

        // "He has been there befor. " is one byte longer than the original
        assert_eq!(doc.sentence_offset(1), Some("He has been there befor. ".len()));
        assert_eq!(doc.transform_offset(TransformId(2)), Some("He has been there ".len()));
    }

    #[test]
    fn test_transform_document_offset_adds_sentence_offset() {
        let doc = Document::from_job(two_sentence_job());
        let second_sentence_edit = TransformId(3);

        let sentence_offset = doc.sentence_offset(1).unwrap();
        let local = doc.transform_offset(second_sentence_edit).unwrap();
        assert_eq!(
            doc.transform_document_offset(second_sentence_edit),
            Some(sentence_offset + local)
        );
    }

    #[test]
    fn test_sentence_offset_out_of_range() {
        let doc = Document::from_job(he_hzve_job());
        assert_eq!(doc.sentence_offset(1), Some(doc.current_text().len()));
        assert_eq!(doc.sentence_offset(2), None);
    }
}
