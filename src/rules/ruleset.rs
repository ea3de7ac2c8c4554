use crate::config::types::{LiteralRule, RuleDescriptor, RuleSetFile, TableRule};
use crate::error::{Result, RewriteError};
use crate::rules::literal::{LiteralTable, replace_literal};
use crate::rules::pattern::CompiledPattern;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// The kind of a rule, as shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
	Literal,
	Table,
	Pattern,
}

impl RuleKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			RuleKind::Literal => "literal",
			RuleKind::Table => "table",
			RuleKind::Pattern => "pattern",
		}
	}
}

impl fmt::Display for RuleKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone)]
enum Rewriter {
	Literal { find: String, replace: String },
	Table(LiteralTable),
	Pattern(CompiledPattern),
}

/// A validated, compiled rule.
#[derive(Debug, Clone)]
pub struct CompiledRule {
	/// The rule as it was declared.
	pub descriptor: RuleDescriptor,

	rewriter: Rewriter,
}

impl CompiledRule {
	/// Validate and compile a single rule declared at `index`.
	pub fn compile(index: usize, descriptor: &RuleDescriptor) -> Result<Self> {
		descriptor.validate(index)?;

		let rewriter = match descriptor {
			RuleDescriptor::Literal(rule) => Rewriter::Literal {
				find: rule.find.clone(),
				replace: rule.replace.clone(),
			},
			RuleDescriptor::Table(rule) => {
				let table = LiteralTable::new(&rule.entries).map_err(|source| {
					RewriteError::InvalidRule {
						index,
						reason: format!("table could not be built: {source}"),
					}
				})?;
				Rewriter::Table(table)
			}
			RuleDescriptor::Pattern(rule) => {
				let pattern = CompiledPattern::compile(rule).map_err(|source| {
					RewriteError::InvalidRule {
						index,
						reason: format!("regex does not compile: {source}"),
					}
				})?;
				Rewriter::Pattern(pattern)
			}
		};

		Ok(CompiledRule {
			descriptor: descriptor.clone(),
			rewriter,
		})
	}

	pub fn kind(&self) -> RuleKind {
		match self.rewriter {
			Rewriter::Literal { .. } => RuleKind::Literal,
			Rewriter::Table(_) => RuleKind::Table,
			Rewriter::Pattern(_) => RuleKind::Pattern,
		}
	}

	pub fn name(&self) -> Option<&str> {
		self.descriptor.name()
	}

	pub fn is_required(&self) -> bool {
		self.descriptor.is_required()
	}

	/// Apply this rule to `buffer`, returning the new text and the replacement count.
	pub fn apply(&self, buffer: &str) -> (String, usize) {
		match &self.rewriter {
			Rewriter::Literal { find, replace } => replace_literal(buffer, find, replace),
			Rewriter::Table(table) => table.apply(buffer),
			Rewriter::Pattern(pattern) => pattern.apply(buffer),
		}
	}

	/// Short human-readable label for diagnostics.
	pub fn describe(&self) -> String {
		if let Some(name) = self.name() {
			return name.to_string();
		}
		match &self.descriptor {
			RuleDescriptor::Literal(rule) => format!("literal {:?}", rule.find),
			RuleDescriptor::Table(rule) => format!("table of {} entries", rule.entries.len()),
			RuleDescriptor::Pattern(rule) => format!("pattern {:?}", rule.pattern),
		}
	}
}

/// An ordered, immutable collection of compiled rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
	name: Option<String>,
	description: Option<String>,
	rules: Vec<CompiledRule>,
}

impl RuleSet {
	/// Validate and compile every rule, preserving declaration order.
	pub fn compile(file: &RuleSetFile) -> Result<Self> {
		let rules = file
			.rules
			.iter()
			.enumerate()
			.map(|(index, descriptor)| CompiledRule::compile(index, descriptor))
			.collect::<Result<Vec<_>>>()?;

		Ok(RuleSet {
			name: file.name.clone(),
			description: file.description.clone(),
			rules,
		})
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	pub fn rules(&self) -> &[CompiledRule] {
		&self.rules
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// The declarative form of this ruleset.
	pub fn to_file(&self) -> RuleSetFile {
		RuleSetFile {
			name: self.name.clone(),
			description: self.description.clone(),
			rules: self.rules.iter().map(|rule| rule.descriptor.clone()).collect(),
		}
	}

	/// Generate the ruleset that undoes this one.
	///
	/// Literal rules swap `find` and `replace` and run in reverse order; table
	/// rules swap every entry. Pattern rules have no inverse. The round trip
	/// only restores the input when no replacement text also occurs elsewhere
	/// in the buffer.
	pub fn inverse(&self) -> Result<RuleSet> {
		let mut inverted = self
			.rules
			.iter()
			.enumerate()
			.map(|(index, rule)| invert_descriptor(index, &rule.descriptor))
			.collect::<Result<Vec<_>>>()?;
		inverted.reverse();

		let file = RuleSetFile {
			name: self.name.as_ref().map(|name| format!("{name}-inverse")),
			description: self
				.name
				.as_ref()
				.map(|name| format!("Generated inverse of {name}")),
			rules: inverted,
		};

		RuleSet::compile(&file)
	}
}

fn invert_descriptor(index: usize, descriptor: &RuleDescriptor) -> Result<RuleDescriptor> {
	let not_invertible = |reason: String| RewriteError::NotInvertible { index, reason };

	match descriptor {
		RuleDescriptor::Literal(rule) => {
			if rule.replace.is_empty() {
				return Err(not_invertible(format!(
					"literal {:?} deletes text",
					rule.find
				)));
			}
			Ok(RuleDescriptor::Literal(LiteralRule {
				name: rule.name.clone(),
				find: rule.replace.clone(),
				replace: rule.find.clone(),
				required: rule.required,
			}))
		}
		RuleDescriptor::Table(rule) => {
			let mut targets = HashSet::new();
			let mut entries = Vec::with_capacity(rule.entries.len());
			for (find, replace) in &rule.entries {
				if replace.is_empty() {
					return Err(not_invertible(format!("table entry {find:?} deletes text")));
				}
				if !targets.insert(replace.as_str()) {
					return Err(not_invertible(format!(
						"several table entries map to {replace:?}"
					)));
				}
				entries.push((replace.clone(), find.clone()));
			}
			Ok(RuleDescriptor::Table(TableRule {
				name: rule.name.clone(),
				entries,
				required: rule.required,
			}))
		}
		RuleDescriptor::Pattern(rule) => Err(not_invertible(format!(
			"pattern {:?} has no literal inverse",
			rule.pattern
		))),
	}
}
