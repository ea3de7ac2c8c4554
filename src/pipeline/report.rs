use crate::rules::RuleKind;
use serde::Serialize;
use std::fmt;

/// What a single rule did to the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleReport {
	/// Position of the rule in its ruleset.
	pub index: usize,

	pub kind: RuleKind,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	/// Whether the rule matched at least once.
	pub matched: bool,

	/// Number of replacements made.
	pub count: usize,
}

impl fmt::Display for RuleReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "rule {} [{}]", self.index, self.kind)?;
		if let Some(ref name) = self.name {
			write!(f, " {name}")?;
		}
		if self.matched {
			write!(f, ": {} replacement(s)", self.count)
		} else {
			write!(f, ": no match")
		}
	}
}

/// Total replacements across a set of reports.
pub fn total_replacements(reports: &[RuleReport]) -> usize {
	reports.iter().map(|report| report.count).sum()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display_matched() {
		let report = RuleReport {
			index: 2,
			kind: RuleKind::Pattern,
			name: Some("palette".to_string()),
			matched: true,
			count: 1,
		};
		assert_eq!(report.to_string(), "rule 2 [pattern] palette: 1 replacement(s)");
	}

	#[test]
	fn test_display_no_match() {
		let report = RuleReport {
			index: 0,
			kind: RuleKind::Literal,
			name: None,
			matched: false,
			count: 0,
		};
		assert_eq!(report.to_string(), "rule 0 [literal]: no match");
	}

	#[test]
	fn test_json_shape() {
		let report = RuleReport {
			index: 1,
			kind: RuleKind::Table,
			name: None,
			matched: true,
			count: 4,
		};
		let json = serde_json::to_value(&report).unwrap();
		assert_eq!(
			json,
			serde_json::json!({"index": 1, "kind": "table", "matched": true, "count": 4})
		);
	}
}
