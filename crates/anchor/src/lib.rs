//! Range codec.
//!
//! Converts live [`TextRange`](horizon_dom::TextRange)s into storable
//! [`AnchorDescriptor`](horizon_primitives::AnchorDescriptor)s and back.
//! Two strategies are tried in order when re-anchoring:
//!
//! 1. **Structural**: replay the element-sibling paths recorded by
//!    [`serialize`] ([`deserialize`]). Fast and exact while the page
//!    structure is unchanged.
//! 2. **Text search**: scan `<body>` text for the stored body text
//!    ([`find_by_text`]). Survives re-rendering; every candidate is verified
//!    against the search text before it is accepted.
//!
//! Nothing here returns an error: an unresolvable anchor is `None`, and
//! callers keep the record for a later attempt.

mod codec;
mod resolve;
mod search;

pub use codec::{deserialize, serialize};
pub use horizon_primitives::normalize_text;
pub use resolve::{Anchor, Strategy, resolve, resolve_record, validate_range_content};
pub use search::{HIGHLIGHT_CLASS, find_by_text};
