use std::cmp::Ordering;

use pretty_assertions::assert_eq;

use super::*;

fn sample() -> (Document, NodeId) {
	let mut doc = Document::new();
	let body = doc.body();
	let article = doc
		.append_markup(
			body,
			&el(
				"article",
				[
					comment("header"),
					el("p", [text("The quick "), el("b", [text("brown")]), text(" fox")]),
					el("p", [text("jumps over the lazy dog")]),
				],
			),
		)
		.unwrap();
	(doc, article)
}

#[test]
fn new_document_has_html_head_body() {
	let doc = Document::new();
	assert_eq!(doc.parent(doc.document_element()), Some(doc.root()));
	assert_eq!(doc.element_children(doc.document_element()).collect::<Vec<_>>(), vec![doc.head(), doc.body()]);
	assert!(doc.is_connected(doc.body()));
}

#[test]
fn element_index_skips_non_elements() {
	let (doc, article) = sample();
	let children = doc.children(article).to_vec();
	assert_eq!(doc.child_index(children[1]), Some(1));
	assert_eq!(doc.element_index(children[1]), Some(0));
	assert_eq!(doc.element_index(children[2]), Some(1));
}

#[test]
fn text_nodes_follow_document_order() {
	let (doc, article) = sample();
	let texts: Vec<_> = doc.text_nodes(article).filter_map(|n| doc.text(n)).collect();
	assert_eq!(texts, vec!["The quick ", "brown", " fox", "jumps over the lazy dog"]);
}

#[test]
fn range_text_spans_nested_nodes() {
	let (doc, article) = sample();
	let p = doc.element_children(article).next().unwrap();
	let first = doc.children(p)[0];
	let last = doc.children(p)[2];
	let range = doc.create_range(BoundaryPoint::new(first, 4), BoundaryPoint::new(last, 4)).unwrap();
	assert_eq!(doc.range_text(&range).unwrap(), "quick brown fox");
}

#[test]
fn element_boundaries_cover_whole_children() {
	let (doc, article) = sample();
	let p = doc.element_children(article).next().unwrap();
	let range = doc.create_range(BoundaryPoint::new(p, 1), BoundaryPoint::new(p, 2)).unwrap();
	assert_eq!(doc.range_text(&range).unwrap(), "brown");
}

#[test]
fn out_of_bounds_offsets_are_rejected() {
	let (doc, article) = sample();
	let p = doc.element_children(article).nth(1).unwrap();
	let t = doc.children(p)[0];
	let err = doc.create_range(BoundaryPoint::new(t, 0), BoundaryPoint::new(t, 99)).unwrap_err();
	assert_eq!(err, DomError::IndexSize { node: t, offset: 99, len: 23 });
}

#[test]
fn inverted_ranges_are_rejected() {
	let (doc, article) = sample();
	let p = doc.element_children(article).nth(1).unwrap();
	let t = doc.children(p)[0];
	let err = doc.create_range(BoundaryPoint::new(t, 5), BoundaryPoint::new(t, 2)).unwrap_err();
	assert_eq!(err, DomError::InvertedRange);
}

#[test]
fn detached_nodes_fail_validation() {
	let (mut doc, article) = sample();
	let p = doc.element_children(article).nth(1).unwrap();
	let t = doc.children(p)[0];
	let range = doc.create_range(BoundaryPoint::new(t, 0), BoundaryPoint::new(t, 5)).unwrap();
	doc.remove_child(article, p).unwrap();
	assert_eq!(doc.validate_range(&range), Err(DomError::Disconnected(t)));
}

#[test]
fn compare_points_orders_across_subtrees() {
	let (doc, article) = sample();
	let ps: Vec<_> = doc.element_children(article).collect();
	let a = BoundaryPoint::new(doc.children(ps[0])[2], 0);
	let b = BoundaryPoint::new(doc.children(ps[1])[0], 0);
	assert_eq!(doc.compare_points(a, b), Ok(Ordering::Less));
	assert_eq!(doc.compare_points(BoundaryPoint::new(article, 3), b), Ok(Ordering::Greater));
}

#[test]
fn insert_rejects_cycles_and_attached_children() {
	let (mut doc, article) = sample();
	let body = doc.body();
	assert!(matches!(doc.append_child(article, body), Err(DomError::HierarchyRequest { .. })));
	let p = doc.element_children(article).next().unwrap();
	assert!(matches!(doc.append_child(body, p), Err(DomError::HierarchyRequest { .. })));
}

#[test]
fn classes_and_closest() {
	let mut doc = Document::new();
	let body = doc.body();
	let mark = doc
		.append_markup(body, &el("span", [el("em", [text("x")])]).class("horizon-highlight  extra"))
		.unwrap();
	let em = doc.children(mark)[0];
	let t = doc.children(em)[0];
	assert!(doc.has_class(mark, "horizon-highlight"));
	assert!(!doc.has_class(t, "horizon-highlight"));
	assert_eq!(doc.closest(t, |e| e.has_class("horizon-highlight")), Some(mark));
	doc.add_class(em, "note-indicator").unwrap();
	doc.add_class(em, "note-indicator").unwrap();
	assert_eq!(doc.attribute(em, "class"), Some("note-indicator"));
}

#[test]
fn mutations_are_recorded_only_inside_body_while_observing() {
	let mut doc = Document::new();
	let body = doc.body();
	let head = doc.head();
	let early = doc.append_markup(body, &el("p", [])).unwrap();
	doc.observe();
	let style = doc.create_element("style");
	doc.append_child(head, style).unwrap();
	let late = doc.append_markup(body, &el("div", [text("x")])).unwrap();
	doc.set_attribute(early, "data-x", "1").unwrap();
	let records = doc.take_mutations();
	assert_eq!(records.len(), 2);
	assert_eq!(records[0].target, body);
	assert_eq!(records[0].added_nodes(), &[late]);
	assert_eq!(records[1].kind, MutationKind::Attributes { name: "data-x".into() });
	assert!(doc.take_mutations().is_empty());
}

#[test]
fn replace_child_keeps_position() {
	let (mut doc, article) = sample();
	let old = doc.element_children(article).next().unwrap();
	let new = doc.build_detached(&el("section", [text("fresh")])).unwrap();
	doc.replace_child(article, new, old).unwrap();
	assert_eq!(doc.children(article)[1], new);
	assert!(!doc.is_connected(old));
}

#[test]
fn selection_is_cleared_when_its_nodes_detach() {
	let (mut doc, article) = sample();
	let p = doc.element_children(article).nth(1).unwrap();
	let t = doc.children(p)[0];
	let range = doc.create_range(BoundaryPoint::new(t, 0), BoundaryPoint::new(t, 5)).unwrap();
	doc.set_selection(Some(range)).unwrap();
	assert_eq!(doc.selection(), Some(range));
	doc.remove_child(article, p).unwrap();
	assert_eq!(doc.selection(), None);
}

mod props {
	use proptest::prelude::*;

	use super::*;

	proptest! {
		#[test]
		fn range_text_matches_slice_of_flat_text(words in proptest::collection::vec("[a-z ]{1,6}", 1..6), a in 0usize..40, b in 0usize..40) {
			let mut doc = Document::new();
			let body = doc.body();
			let p = doc.append_markup(body, &el("p", words.iter().map(|w| text(w)))).unwrap();
			let flat: String = words.concat();
			let total = flat.chars().count();
			let (lo, hi) = (a.min(b).min(total), a.max(b).min(total));

			// Map flat offsets to (node, offset) pairs.
			let locate = |pos: usize| {
				let mut acc = 0;
				for &node in doc.children(p) {
					let len = doc.text(node).unwrap().chars().count();
					if pos <= acc + len {
						return BoundaryPoint::new(node, pos - acc);
					}
					acc += len;
				}
				unreachable!()
			};
			let range = doc.create_range(locate(lo), locate(hi)).unwrap();
			let expected: String = flat.chars().skip(lo).take(hi - lo).collect();
			prop_assert_eq!(doc.range_text(&range).unwrap(), expected);
		}
	}
}
