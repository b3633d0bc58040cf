/*!
 * # Editing Core Module
 *
 * Review state for a correction job: which proposed edits can be acted on,
 * what the text looks like after any mix of accepts, rejects and undos.
 *
 * ## Architecture Overview
 *
 * ### 1. Token Runs as the Only Truth
 * - Every sentence keeps its **original** tokens and a working **active** sequence
 * - Edits are matched by token id runs, never by text position
 * - Text and offsets are always rendered from the active tokens on demand
 *
 * ### 2. Transformation Arena
 * - All transformations live once in the `Document`, indexed by `TransformId`
 * - Sentences, overlap groups and session views hold ids only
 *
 * ### 3. Command-Based Editing
 * - Accept, reject and undo are **Commands** (`Cmd` enum) applied through `Document::apply`
 * - Each applied command returns a `Patch` describing what changed
 * - Availability is recomputed for the touched overlap group only
 *
 * ### 4. Overlap Groups
 * - Transformations sharing token ids are connected; each connected set is a group
 * - Groups are computed once when the document is built and never change
 *
 * ## Module Structure
 *
 * - **`document`**: `Document` type owning sentences and the transformation arena
 * - **`commands`**: `Cmd` enum, `EditError` and the accept/reject/undo state machine
 * - **`grouping`**: pure overlap grouping over a sentence's transformations
 * - **`tokens`**: id-run search and splicing
 * - **`text`**: text and byte offset reconstruction
 * - **`patch`**: edit result metadata, convertible into a status notification
 *
 * ## Usage Pattern
 *
 * ```rust
 * use amend_engine::editing::*;
 * use amend_engine::models::{Job, TransformId};
 *
 * # let json = r#"{"id": "j", "rulesApplied": [{
 * #     "originalSentence": [{"id": 1, "value": "A", "after": " "}, {"id": 2, "value": "cat", "after": "."}],
 * #     "transformations": [{
 * #         "tokensAffected": [{"id": 1, "value": "A", "after": " "}],
 * #         "tokensAdded": [{"id": 3, "value": "The", "after": " "}]
 * #     }]
 * # }]}"#;
 * // 1. Build review metadata once
 * let mut doc = Document::from_job(Job::from_json(json).unwrap());
 *
 * // 2. Apply edits via commands
 * let patch = doc.apply(Cmd::Accept(TransformId(0))).unwrap();
 * assert_eq!(patch.offset, Some(0));
 *
 * // 3. Render the current state
 * assert_eq!(doc.current_text(), "The cat.");
 * ```
 */

pub mod commands;
pub mod document;
pub mod grouping;
mod metadata;
pub mod patch;
pub mod text;
pub mod tokens;

pub use commands::{Cmd, EditError};
pub use document::Document;
pub use patch::Patch;
