use aho_corasick::{AhoCorasick, BuildError, MatchKind};

/// Replace every non-overlapping occurrence of `find`, left to right.
///
/// Scanning resumes after the matched span in the input, so text produced by
/// `replace` is never searched again. Returns the new text and the number of
/// replacements made.
pub fn replace_literal(haystack: &str, find: &str, replace: &str) -> (String, usize) {
	let mut out = String::with_capacity(haystack.len());
	let mut last = 0;
	let mut count = 0;

	for (start, matched) in haystack.match_indices(find) {
		out.push_str(&haystack[last..start]);
		out.push_str(replace);
		last = start + matched.len();
		count += 1;
	}
	out.push_str(&haystack[last..]);

	(out, count)
}

/// A find→replace mapping applied in a single pass.
///
/// At each position the longest matching key wins; matched spans are consumed
/// and replacements are not re-scanned.
#[derive(Debug, Clone)]
pub struct LiteralTable {
	matcher: AhoCorasick,
	replacements: Vec<String>,
}

impl LiteralTable {
	/// Build a table from `(find, replace)` pairs. Keys must be non-empty and unique.
	pub fn new(entries: &[(String, String)]) -> Result<Self, BuildError> {
		let matcher = AhoCorasick::builder()
			.match_kind(MatchKind::LeftmostLongest)
			.build(entries.iter().map(|(find, _)| find))?;

		let replacements = entries.iter().map(|(_, replace)| replace.clone()).collect();

		Ok(LiteralTable {
			matcher,
			replacements,
		})
	}

	/// Apply the table to `haystack`, returning the new text and the replacement count.
	pub fn apply(&self, haystack: &str) -> (String, usize) {
		let mut out = String::with_capacity(haystack.len());
		let mut last = 0;
		let mut count = 0;

		for found in self.matcher.find_iter(haystack) {
			out.push_str(&haystack[last..found.start()]);
			out.push_str(&self.replacements[found.pattern().as_usize()]);
			last = found.end();
			count += 1;
		}
		out.push_str(&haystack[last..]);

		(out, count)
	}

	pub fn len(&self) -> usize {
		self.replacements.len()
	}

	pub fn is_empty(&self) -> bool {
		self.replacements.is_empty()
	}
}
