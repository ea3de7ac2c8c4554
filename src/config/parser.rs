use crate::config::types::RuleSetFile;
use crate::error::{Result, RewriteError};
use crate::rules::RuleSet;
use std::path::Path;

/// Parse a ruleset file from the given path.
pub fn parse_ruleset_file(path: &Path) -> Result<RuleSetFile> {
	let content = std::fs::read_to_string(path).map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			RewriteError::RuleSetNotFound {
				path: path.to_path_buf(),
			}
		} else {
			RewriteError::RuleSetRead {
				path: path.to_path_buf(),
				source,
			}
		}
	})?;

	parse_ruleset_str(&content, path)
}

/// Parse a ruleset from a string (useful for testing).
pub fn parse_ruleset_str(content: &str, path: &Path) -> Result<RuleSetFile> {
	let file: RuleSetFile =
		toml::from_str(content).map_err(|source| RewriteError::RuleSetParse {
			path: path.to_path_buf(),
			source,
		})?;

	file.validate()?;

	Ok(file)
}

/// Read, validate and compile a ruleset. No target file is touched.
pub fn load_ruleset(path: &Path) -> Result<RuleSet> {
	let file = parse_ruleset_file(path)?;
	log::debug!("loaded {} rule(s) from {}", file.rules.len(), path.display());

	RuleSet::compile(&file)
}

/// Render a ruleset back to TOML.
pub fn render_ruleset(file: &RuleSetFile) -> Result<String> {
	toml::to_string(file).map_err(|source| RewriteError::RuleSetSerialize { source })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::{PatternRule, RuleDescriptor};
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_ruleset() {
		let path = PathBuf::from("test.toml");
		let file = parse_ruleset_str("", &path).unwrap();

		assert!(file.name.is_none());
		assert!(file.rules.is_empty());
	}

	#[test]
	fn test_parse_rules_array_of_tables() {
		let content = r##"
name = "light-theme"
description = "Swap the dark palette for the mint one"

[[rules]]
kind = "literal"
find = "COL_BG"
replace = "COL_TEXT_INV"

[[rules]]
kind = "pattern"
pattern = "#define COL_BG .*"
template = "#define COL_BG 0xFFFF"
required = true

[[rules]]
kind = "table"
entries = [["Back", "กลับ"], ["Save", "บันทึก"]]
"##;
		let path = PathBuf::from("test.toml");
		let file = parse_ruleset_str(content, &path).unwrap();

		assert_eq!(file.name.as_deref(), Some("light-theme"));
		assert_eq!(file.rules.len(), 3);

		match &file.rules[0] {
			RuleDescriptor::Literal(rule) => {
				assert_eq!(rule.find, "COL_BG");
				assert_eq!(rule.replace, "COL_TEXT_INV");
				assert!(!rule.required);
			}
			other => panic!("Expected literal rule, got {other:?}"),
		}

		match &file.rules[1] {
			RuleDescriptor::Pattern(rule) => {
				assert!(rule.required);
				assert!(rule.global);
				assert!(!rule.dot_matches_newline);
			}
			other => panic!("Expected pattern rule, got {other:?}"),
		}

		match &file.rules[2] {
			RuleDescriptor::Table(rule) => {
				assert_eq!(rule.entries[1], ("Save".to_string(), "บันทึก".to_string()));
			}
			other => panic!("Expected table rule, got {other:?}"),
		}
	}

	#[test]
	fn test_parse_inline_tables_preserve_order() {
		let content = r#"
rules = [
    { kind = "literal", find = "b", replace = "c" },
    { kind = "literal", find = "a", replace = "b" },
]
"#;
		let path = PathBuf::from("test.toml");
		let file = parse_ruleset_str(content, &path).unwrap();

		let finds: Vec<_> = file
			.rules
			.iter()
			.map(|rule| match rule {
				RuleDescriptor::Literal(rule) => rule.find.as_str(),
				_ => unreachable!(),
			})
			.collect();
		assert_eq!(finds, vec!["b", "a"]);
	}

	#[test]
	fn test_unknown_kind_is_parse_error() {
		let content = r#"
[[rules]]
kind = "ast"
find = "x"
"#;
		let path = PathBuf::from("test.toml");
		match parse_ruleset_str(content, &path).unwrap_err() {
			RewriteError::RuleSetParse { path, .. } => assert_eq!(path, PathBuf::from("test.toml")),
			_ => panic!("Expected RuleSetParse error"),
		}
	}

	#[test]
	fn test_foreign_field_is_parse_error() {
		let content = r#"
[[rules]]
kind = "literal"
find = "x"
replace = "y"
dot_matches_newline = true
"#;
		let path = PathBuf::from("test.toml");
		assert!(matches!(
			parse_ruleset_str(content, &path),
			Err(RewriteError::RuleSetParse { .. })
		));
	}

	#[test]
	fn test_validation_runs_after_parse() {
		let content = r#"
[[rules]]
kind = "literal"
find = ""
replace = "y"
"#;
		let path = PathBuf::from("test.toml");
		assert!(matches!(
			parse_ruleset_str(content, &path),
			Err(RewriteError::InvalidRule { index: 0, .. })
		));
	}

	#[test]
	fn test_missing_file_is_not_found() {
		let path = PathBuf::from("/nonexistent/rules.toml");
		assert!(matches!(
			parse_ruleset_file(&path),
			Err(RewriteError::RuleSetNotFound { .. })
		));
	}

	#[test]
	fn test_load_ruleset_compiles_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("fonts.toml");
		std::fs::write(
			&path,
			r#"
name = "fonts"

[[rules]]
kind = "table"
entries = [["thaiFont16", "FreeSans9pt7b"]]

[[rules]]
kind = "literal"
find = "COL_BG"
replace = "COL_CARD"
"#,
		)
		.unwrap();

		let ruleset = load_ruleset(&path).unwrap();
		assert_eq!(ruleset.name(), Some("fonts"));
		assert_eq!(ruleset.len(), 2);
	}

	#[test]
	fn test_render_parses_back() {
		let file = RuleSetFile {
			name: Some("inverse".to_string()),
			description: None,
			rules: vec![RuleDescriptor::Pattern(PatternRule {
				pattern: "a(b)".to_string(),
				template: "${1}".to_string(),
				global: false,
				..Default::default()
			})],
		};

		let rendered = render_ruleset(&file).unwrap();
		assert!(rendered.contains("kind = \"pattern\""));
		assert!(rendered.contains("global = false"));
		assert!(!rendered.contains("required"));

		let parsed = parse_ruleset_str(&rendered, Path::new("inverse.toml")).unwrap();
		assert_eq!(parsed, file);
	}
}
