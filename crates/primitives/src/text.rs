/// Collapses every whitespace run to a single space and trims both ends.
pub fn normalize_text(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut pending_space = false;
	for ch in text.chars() {
		if ch.is_whitespace() {
			pending_space = !out.is_empty();
			continue;
		}
		if pending_space {
			out.push(' ');
			pending_space = false;
		}
		out.push(ch);
	}
	out
}

/// Normalizes `text` and records, for every normalized char, the char index in
/// `text` it was produced from. A collapsed space maps to the first whitespace
/// char of its run.
pub fn normalize_with_map(text: &str) -> (String, Vec<usize>) {
	let mut out = String::with_capacity(text.len());
	let mut map = Vec::with_capacity(text.len());
	let mut run_start: Option<usize> = None;
	for (idx, ch) in text.chars().enumerate() {
		if ch.is_whitespace() {
			if run_start.is_none() && !out.is_empty() {
				run_start = Some(idx);
			}
			continue;
		}
		if let Some(start) = run_start.take() {
			out.push(' ');
			map.push(start);
		}
		out.push(ch);
		map.push(idx);
	}
	(out, map)
}
