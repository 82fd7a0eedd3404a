use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Color theme a highlight is drawn with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
	/// Light palette.
	#[default]
	Light,
	/// Dark palette.
	Dark,
}

/// Decoration style of a highlight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
	/// Dotted underline below the text.
	#[default]
	Underline,
	/// Tinted background behind the text.
	Background,
}

/// A (theme, style) pair. Ranges sharing one pair are decorated together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Appearance {
	pub theme: Theme,
	pub style: HighlightStyle,
}

impl Appearance {
	pub const fn new(theme: Theme, style: HighlightStyle) -> Self {
		Self { theme, style }
	}
}

impl Theme {
	pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Light => "light",
			Self::Dark => "dark",
		}
	}
}

impl HighlightStyle {
	pub const ALL: [HighlightStyle; 2] = [HighlightStyle::Underline, HighlightStyle::Background];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Underline => "underline",
			Self::Background => "background",
		}
	}
}

impl fmt::Display for Theme {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl fmt::Display for HighlightStyle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl fmt::Display for Appearance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.theme, self.style)
	}
}

/// Error returned when parsing an unknown theme or style name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown variant: {}", self.0)
	}
}

impl std::error::Error for UnknownVariant {}

impl FromStr for Theme {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"light" => Ok(Self::Light),
			"dark" => Ok(Self::Dark),
			other => Err(UnknownVariant(other.to_string())),
		}
	}
}

impl FromStr for HighlightStyle {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"underline" => Ok(Self::Underline),
			"background" => Ok(Self::Background),
			other => Err(UnknownVariant(other.to_string())),
		}
	}
}
