//! Ordered application of a ruleset to an in-memory buffer.
//!
//! The pipeline is pure: it never touches the filesystem. Each rule sees the
//! output of the rule before it.

pub mod report;

use crate::error::RewriteError;
use crate::rules::RuleSet;

pub use report::{RuleReport, total_replacements};

/// The buffer after applying a ruleset, with one report per rule that ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
	pub buffer: String,

	pub reports: Vec<RuleReport>,
}

impl Outcome {
	/// Total replacements made by all rules.
	pub fn replacements(&self) -> usize {
		total_replacements(&self.reports)
	}
}

/// A required rule failed. Carries the partially rewritten buffer for diagnostics.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct Aborted {
	pub error: RewriteError,

	/// Buffer and reports up to, and including, the failing rule.
	pub partial: Outcome,
}

/// Apply every rule of `ruleset` to `buffer`, in order.
///
/// A rule that matches nothing is recorded as a no-op. A `required` rule that
/// matches nothing stops the pipeline with `PatternNotFound`.
pub fn apply(buffer: &str, ruleset: &RuleSet) -> Result<Outcome, Aborted> {
	let mut current = buffer.to_string();
	let mut reports = Vec::with_capacity(ruleset.len());

	for (index, rule) in ruleset.rules().iter().enumerate() {
		let (next, count) = rule.apply(&current);
		reports.push(RuleReport {
			index,
			kind: rule.kind(),
			name: rule.name().map(str::to_string),
			matched: count > 0,
			count,
		});

		if count == 0 {
			if rule.is_required() {
				return Err(Aborted {
					error: RewriteError::PatternNotFound {
						index,
						rule: rule.describe(),
					},
					partial: Outcome {
						buffer: current,
						reports,
					},
				});
			}
			log::warn!("rule {index} ({}) matched nothing", rule.describe());
			continue;
		}

		log::debug!("rule {index} ({}) made {count} replacement(s)", rule.describe());
		current = next;
	}

	Ok(Outcome {
		buffer: current,
		reports,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parse_ruleset_str;
	use std::path::Path;

	fn ruleset(toml: &str) -> RuleSet {
		let file = parse_ruleset_str(toml, Path::new("test.toml")).unwrap();
		RuleSet::compile(&file).unwrap()
	}

	#[test]
	fn test_rules_apply_in_order() {
		let set = ruleset(
			r#"
[[rules]]
kind = "literal"
find = "dark"
replace = "light"

[[rules]]
kind = "literal"
find = "light"
replace = "mint"
"#,
		);
		let outcome = apply("dark theme", &set).unwrap();
		assert_eq!(outcome.buffer, "mint theme");
		assert_eq!(outcome.reports.len(), 2);
		assert!(outcome.reports.iter().all(|r| r.matched && r.count == 1));
	}

	#[test]
	fn test_optional_no_match_is_reported_noop() {
		let set = ruleset(
			r#"
[[rules]]
kind = "pattern"
pattern = "COL_SHADOW"
template = "COL_DIVIDER"
"#,
		);
		let input = "#define COL_BG 0x0000\n";
		let outcome = apply(input, &set).unwrap();
		assert_eq!(outcome.buffer.as_bytes(), input.as_bytes());
		assert_eq!(
			outcome.reports,
			vec![RuleReport {
				index: 0,
				kind: crate::rules::RuleKind::Pattern,
				name: None,
				matched: false,
				count: 0,
			}]
		);
	}

	#[test]
	fn test_required_no_match_aborts_with_partial_buffer() {
		let set = ruleset(
			r#"
[[rules]]
kind = "literal"
find = "COL_BG"
replace = "COL_CARD"

[[rules]]
kind = "pattern"
name = "palette"
pattern = "// Color Palette.*// end"
template = "x"
dot_matches_newline = true
required = true

[[rules]]
kind = "literal"
find = "never"
replace = "reached"
"#,
		);
		let aborted = apply("COL_BG never", &set).unwrap_err();

		match aborted.error {
			RewriteError::PatternNotFound { index, ref rule } => {
				assert_eq!(index, 1);
				assert_eq!(rule, "palette");
			}
			_ => panic!("Expected PatternNotFound error"),
		}
		assert_eq!(aborted.partial.buffer, "COL_CARD never");
		assert_eq!(aborted.partial.reports.len(), 2);
		assert!(!aborted.partial.reports[1].matched);
	}

	#[test]
	fn test_identity_rule_counts_matches() {
		let set = ruleset(
			r#"
[[rules]]
kind = "literal"
find = "OK"
replace = "OK"
"#,
		);
		let input = "OK, OK and OK";
		let outcome = apply(input, &set).unwrap();
		assert_eq!(outcome.buffer, input);
		assert!(outcome.reports[0].matched);
		assert_eq!(outcome.reports[0].count, 3);
	}

	#[test]
	fn test_apply_is_deterministic() {
		let set = ruleset(
			r#"
[[rules]]
kind = "pattern"
pattern = "(\\d+)"
template = "<${1}>"
"#,
		);
		let first = apply("a1 b22", &set).unwrap();
		let second = apply("a1 b22", &set).unwrap();
		assert_eq!(first, second);
		assert_eq!(first.buffer, "a<1> b<22>");
		assert_eq!(first.replacements(), 2);
	}

	#[test]
	fn test_reapplying_reports_noops() {
		let set = ruleset(
			r#"
[[rules]]
kind = "literal"
find = "0x0000 // dark"
replace = "0xF7DE // light"
"#,
		);
		let once = apply("#define COL_BG 0x0000 // dark", &set).unwrap();
		let twice = apply(&once.buffer, &set).unwrap();
		assert_eq!(twice.buffer, once.buffer);
		assert!(!twice.reports[0].matched);
	}

	#[test]
	fn test_round_trip_through_inverse() {
		let set = ruleset(
			r#"
[[rules]]
kind = "literal"
find = "canvas.setFont(&thaiFont16);"
replace = "canvas.setFont(&fonts::FreeSans9pt7b);"

[[rules]]
kind = "table"
entries = [
    ["\"กลับ\"", "\"Back\""],
    ["\"บันทึก\"", "\"Save\""],
    ["\"ยกเลิก\"", "\"Cancel\""],
]

[[rules]]
kind = "literal"
find = "\"เวลา\""
replace = "\"Time\""
"#,
		);
		let original = "canvas.setFont(&thaiFont16);\nbtn(\"กลับ\");\nbtn(\"บันทึก\");\nlabel(\"เวลา\");\nbtn(\"ยกเลิก\");\n";

		let forward = apply(original, &set).unwrap();
		assert_ne!(forward.buffer, original);
		assert!(forward.buffer.contains("\"Back\""));

		let inverse = set.inverse().unwrap();
		let back = apply(&forward.buffer, &inverse).unwrap();
		assert_eq!(back.buffer, original);
	}
}
