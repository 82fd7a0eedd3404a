use thiserror::Error;

/// Errors raised while setting up a highlighter context.
///
/// Operations on a running context never return these; they log and report
/// `bool` or `Option` results instead.
#[derive(Debug, Error)]
pub enum HighlighterError {
	/// The page cannot draw text decorations, so the highlighter refuses to
	/// start.
	#[error("text decorations are not supported on this page")]
	CapabilityUnavailable,

	/// The theme context was used after [`ThemeContext::shutdown`].
	///
	/// [`ThemeContext::shutdown`]: crate::ThemeContext::shutdown
	#[error("theme context has been shut down")]
	ThemeContextClosed,
}

pub type Result<T> = std::result::Result<T, HighlighterError>;
