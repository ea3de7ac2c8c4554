use crate::error::RewriteError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Top-level contents of a ruleset file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuleSetFile {
	/// Short label shown in reports, e.g. "light-theme".
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,

	/// Rules in application order. Order is significant.
	#[serde(default)]
	pub rules: Vec<RuleDescriptor>,
}

/// A single rule as written in a ruleset file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RuleDescriptor {
	Literal(LiteralRule),
	Table(TableRule),
	Pattern(PatternRule),
}

/// Exact substring replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct LiteralRule {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	pub find: String,

	pub replace: String,

	/// Abort the pipeline if `find` does not occur.
	#[serde(default, skip_serializing_if = "is_false")]
	pub required: bool,
}

/// A literal mapping applied in one pass, longest match first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct TableRule {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	/// `[find, replace]` pairs.
	pub entries: Vec<(String, String)>,

	#[serde(default, skip_serializing_if = "is_false")]
	pub required: bool,
}

/// Regex replacement with capture-group templates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct PatternRule {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	pub pattern: String,

	/// Replacement template. `$1`, `${1}` and `${name}` expand to captures.
	pub template: String,

	/// `^` and `$` match at line boundaries.
	#[serde(default, skip_serializing_if = "is_false")]
	pub multiline: bool,

	/// `.` also matches `\n`. Quantifiers become lazy unless `greedy` is set.
	#[serde(default, skip_serializing_if = "is_false")]
	pub dot_matches_newline: bool,

	#[serde(default, skip_serializing_if = "is_false")]
	pub case_insensitive: bool,

	/// Keep greedy quantifiers in `dot_matches_newline` mode.
	#[serde(default, skip_serializing_if = "is_false")]
	pub greedy: bool,

	/// Replace every match instead of only the first.
	#[serde(default = "default_true", skip_serializing_if = "is_true")]
	pub global: bool,

	#[serde(default, skip_serializing_if = "is_false")]
	pub required: bool,
}

impl Default for PatternRule {
	fn default() -> Self {
		PatternRule {
			name: None,
			pattern: String::new(),
			template: String::new(),
			multiline: false,
			dot_matches_newline: false,
			case_insensitive: false,
			greedy: false,
			global: true,
			required: false,
		}
	}
}

fn default_true() -> bool {
	true
}

fn is_false(value: &bool) -> bool {
	!*value
}

fn is_true(value: &bool) -> bool {
	*value
}

impl RuleDescriptor {
	/// The optional label given to this rule.
	pub fn name(&self) -> Option<&str> {
		match self {
			RuleDescriptor::Literal(rule) => rule.name.as_deref(),
			RuleDescriptor::Table(rule) => rule.name.as_deref(),
			RuleDescriptor::Pattern(rule) => rule.name.as_deref(),
		}
	}

	pub fn is_required(&self) -> bool {
		match self {
			RuleDescriptor::Literal(rule) => rule.required,
			RuleDescriptor::Table(rule) => rule.required,
			RuleDescriptor::Pattern(rule) => rule.required,
		}
	}

	/// Check the structural constraints that don't need a compiled regex.
	///
	/// `index` is the rule's position in its ruleset and is carried into the error.
	pub fn validate(&self, index: usize) -> Result<(), RewriteError> {
		let invalid = |reason: &str| RewriteError::InvalidRule {
			index,
			reason: reason.to_string(),
		};

		match self {
			RuleDescriptor::Literal(rule) => {
				if rule.find.is_empty() {
					return Err(invalid("literal rule has an empty `find`"));
				}
			}
			RuleDescriptor::Table(rule) => {
				if rule.entries.is_empty() {
					return Err(invalid("table rule has no entries"));
				}
				let mut seen = HashSet::new();
				for (find, _) in &rule.entries {
					if find.is_empty() {
						return Err(invalid("table rule has an entry with an empty `find`"));
					}
					if !seen.insert(find.as_str()) {
						return Err(RewriteError::InvalidRule {
							index,
							reason: format!("table rule has duplicate entry for {find:?}"),
						});
					}
				}
			}
			RuleDescriptor::Pattern(rule) => {
				if rule.pattern.is_empty() {
					return Err(invalid("pattern rule has an empty `pattern`"));
				}
				if rule.greedy && !rule.dot_matches_newline {
					return Err(invalid("`greedy` only applies together with `dot_matches_newline`"));
				}
				if rule.dot_matches_newline && !rule.required {
					return Err(invalid(
						"`dot_matches_newline` spans must be marked `required`",
					));
				}
			}
		}

		Ok(())
	}
}

impl RuleSetFile {
	/// Validate all rules in this ruleset.
	pub fn validate(&self) -> Result<(), RewriteError> {
		for (index, rule) in self.rules.iter().enumerate() {
			rule.validate(index)?;
		}
		Ok(())
	}
}
