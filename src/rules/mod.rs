//! Rule compilation and application for rewrite.
//!
//! This module handles:
//! - Exact literal replacement and single-pass literal tables
//! - Regex pattern replacement with capture templates
//! - Compiled rulesets and their generated inverses

pub mod literal;
pub mod pattern;
pub mod ruleset;

pub use literal::{LiteralTable, replace_literal};
pub use pattern::CompiledPattern;
pub use ruleset::{CompiledRule, RuleKind, RuleSet};
