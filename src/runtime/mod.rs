//! Block runtime
//!
//! Extraction (HTML to blocks), serialization (blocks to HTML) and the editor
//! session that keeps the two in step while blocks are appended, moved and
//! removed.

pub mod clock;
pub mod drag;
pub mod extractor;
pub mod serializer;
pub mod session;

pub use clock::{Clock, FixedClock, IdGenerator, SystemClock};
pub use drag::{DragSource, DragState};
pub use extractor::{extract_blocks, extract_blocks_with_diagnostics, BlockExtractor, Diagnostic, Extraction};
pub use serializer::{serialize_blocks, serialize_with};
pub use session::{DragGuard, DropOutcome, EditorSession, ReplaceOutcome, SessionState};
