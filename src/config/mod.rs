//! Ruleset loading for rewrite.
//!
//! This module handles:
//! - TOML ruleset parsing and structural validation
//! - Named ruleset lookup in the user's config directory
//! - Rendering rulesets back to TOML

pub mod locate;
pub mod parser;
pub mod types;

pub use locate::{resolve_ruleset_path, user_rulesets_dir};
pub use parser::{load_ruleset, parse_ruleset_file, parse_ruleset_str, render_ruleset};
pub use types::{LiteralRule, PatternRule, RuleDescriptor, RuleSetFile, TableRule};
