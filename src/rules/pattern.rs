use crate::config::types::PatternRule;
use regex::{Regex, RegexBuilder};

/// A compiled pattern rule ready to apply.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
	/// The compiled regex, with the rule's flags baked in.
	pub regex: Regex,

	/// Replacement template (`$1`, `${1}`, `${name}`, `$$`).
	pub template: String,

	/// Whether to replace all occurrences.
	pub global: bool,
}

impl CompiledPattern {
	/// Compile a pattern rule.
	///
	/// In `dot_matches_newline` mode, greedy `.` repetitions become lazy unless
	/// the rule sets `greedy`, so a block pattern stops at the first closing
	/// marker. Other quantifiers, and `.` repetitions already marked lazy, are
	/// left as written.
	pub fn compile(rule: &PatternRule) -> Result<Self, regex::Error> {
		let pattern = if rule.dot_matches_newline && !rule.greedy {
			lazy_dot_repetitions(&rule.pattern)
		} else {
			rule.pattern.clone()
		};

		let regex = RegexBuilder::new(&pattern)
			.multi_line(rule.multiline)
			.dot_matches_new_line(rule.dot_matches_newline)
			.case_insensitive(rule.case_insensitive)
			.build()?;

		Ok(CompiledPattern {
			regex,
			template: rule.template.clone(),
			global: rule.global,
		})
	}

	/// Apply this pattern to `haystack`, returning the new text and the replacement count.
	pub fn apply(&self, haystack: &str) -> (String, usize) {
		let mut out = String::with_capacity(haystack.len());
		let mut last = 0;
		let mut count = 0;

		for caps in self.regex.captures_iter(haystack) {
			let Some(whole) = caps.get(0) else {
				continue;
			};
			out.push_str(&haystack[last..whole.start()]);
			caps.expand(&self.template, &mut out);
			last = whole.end();
			count += 1;

			if !self.global {
				break;
			}
		}
		out.push_str(&haystack[last..]);

		(out, count)
	}
}

/// Append `?` to every greedy repetition of a bare `.` in `pattern`.
///
/// Escaped dots (`\.`) and dots inside character classes are not repetitions
/// of "any character" and are skipped.
fn lazy_dot_repetitions(pattern: &str) -> String {
	let chars: Vec<char> = pattern.chars().collect();
	let mut out = String::with_capacity(pattern.len() + 4);
	let mut class_depth = 0usize;
	let mut i = 0;

	while i < chars.len() {
		let c = chars[i];
		out.push(c);
		i += 1;

		match c {
			'\\' => {
				if let Some(&escaped) = chars.get(i) {
					out.push(escaped);
					i += 1;
				}
			}
			'[' => {
				class_depth += 1;
				// A `]` (after an optional `^`) right at the start is a literal.
				if chars.get(i) == Some(&'^') {
					out.push('^');
					i += 1;
				}
				if class_depth == 1 && chars.get(i) == Some(&']') {
					out.push(']');
					i += 1;
				}
			}
			']' if class_depth > 0 => class_depth -= 1,
			'.' if class_depth == 0 => {
				let quantifier_end = match chars.get(i) {
					Some('*') | Some('+') => Some(i + 1),
					Some('{') => chars[i..]
						.iter()
						.position(|&ch| ch == '}')
						.map(|offset| i + offset + 1),
					_ => None,
				};
				if let Some(end) = quantifier_end {
					out.extend(&chars[i..end]);
					i = end;
					if chars.get(i) != Some(&'?') {
						out.push('?');
					}
				}
			}
			_ => {}
		}
	}

	out
}
