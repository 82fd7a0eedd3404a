//! Core types for highlights: records, notes, appearance, identifiers and text normalization.

/// Highlight appearance: theme and decoration style.
pub mod appearance;
/// Serialized anchor descriptors.
pub mod descriptor;
/// Identifier generation.
pub mod ids;
/// Durable highlight records and notes.
pub mod record;
/// Whitespace normalization shared by the codec and the store.
pub mod text;

pub use appearance::{Appearance, HighlightStyle, Theme, UnknownVariant};
pub use descriptor::{AnchorDescriptor, BoundaryDescriptor, NodeTypeMarker};
pub use ids::{IdGenerator, new_note_id};
pub use record::{HighlightKind, HighlightRecord, Note, RecordId, VideoData, effective_id};
pub use text::{normalize_text, normalize_with_map};

