use std::path::PathBuf;

/// Library-level structured errors for rewrite.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
	#[error("Target file not found: {path}")]
	FileNotFound { path: PathBuf },

	#[error("Access denied to target file: {path}")]
	FileAccessDenied {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read target file: {path}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write target file: {path}")]
	WriteFailure {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Ruleset not found: {path}")]
	RuleSetNotFound { path: PathBuf },

	#[error("Failed to read ruleset: {path}")]
	RuleSetRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse ruleset: {path}")]
	RuleSetParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to serialize ruleset")]
	RuleSetSerialize {
		#[source]
		source: toml::ser::Error,
	},

	#[error("Invalid rule #{index}: {reason}")]
	InvalidRule { index: usize, reason: String },

	#[error("Required rule #{index} did not match: {rule}")]
	PatternNotFound { index: usize, rule: String },

	#[error("Rule #{index} cannot be inverted: {reason}")]
	NotInvertible { index: usize, reason: String },
}

/// Result type alias using RewriteError.
pub type Result<T> = std::result::Result<T, RewriteError>;
