//! Declarative subtree construction.
//!
//! ```
//! use horizon_dom::{Document, el, text};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let p = doc
//! 	.append_markup(body, &el("p", [text("The quick "), el("b", [text("brown")]), text(" fox")]))
//! 	.unwrap();
//! assert_eq!(doc.text_content(p), "The quick brown fox");
//! ```

use crate::document::Document;
use crate::error::Result;
use crate::node::NodeId;

/// A subtree description appended with [`Document::append_markup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
	Element {
		tag: String,
		attributes: Vec<(String, String)>,
		children: Vec<Markup>,
	},
	Text(String),
	Comment(String),
}

/// Element with children.
pub fn el(tag: &str, children: impl IntoIterator<Item = Markup>) -> Markup {
	Markup::Element {
		tag: tag.to_string(),
		attributes: Vec::new(),
		children: children.into_iter().collect(),
	}
}

/// Text node.
pub fn text(data: &str) -> Markup {
	Markup::Text(data.to_string())
}

/// Comment node.
pub fn comment(data: &str) -> Markup {
	Markup::Comment(data.to_string())
}

impl Markup {
	/// Sets an attribute. No effect on text or comment markup.
	pub fn attr(mut self, name: &str, value: &str) -> Self {
		if let Self::Element { attributes, .. } = &mut self {
			attributes.push((name.to_string(), value.to_string()));
		}
		self
	}

	/// Sets the `class` attribute.
	pub fn class(self, class: &str) -> Self {
		self.attr("class", class)
	}
}

impl Document {
	/// Creates the nodes described by `markup` and appends them to `parent`.
	/// Returns the id of the subtree root.
	pub fn append_markup(&mut self, parent: NodeId, markup: &Markup) -> Result<NodeId> {
		let node = self.build_detached(markup)?;
		self.append_child(parent, node)?;
		Ok(node)
	}

	/// Creates the nodes described by `markup` without attaching them.
	pub fn build_detached(&mut self, markup: &Markup) -> Result<NodeId> {
		match markup {
			Markup::Text(data) => Ok(self.create_text(data.as_str())),
			Markup::Comment(data) => Ok(self.create_comment(data.as_str())),
			Markup::Element {
				tag,
				attributes,
				children,
			} => {
				let element = self.create_element(tag);
				for (name, value) in attributes {
					self.set_attribute(element, name, value.as_str())?;
				}
				for child in children {
					let child = self.build_detached(child)?;
					self.append_child(element, child)?;
				}
				Ok(element)
			}
		}
	}
}
