//! Persisted storage keys.

/// Array of highlight records.
pub const HIGHLIGHTS: &str = "highlights";
/// Style applied to new highlights.
pub const DEFAULT_STYLE: &str = "defaultHighlightStyle";
/// Theme applied to new highlights.
pub const DEFAULT_THEME: &str = "defaultHighlightTheme";
/// Id of the highlight to scroll to after navigation.
pub const PENDING_SCROLL_HIGHLIGHT: &str = "pendingScrollHighlight";
/// Epoch milliseconds at which the pending scroll was stored.
pub const PENDING_SCROLL_TIMESTAMP: &str = "pendingScrollTimestamp";
