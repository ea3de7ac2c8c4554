//! Rewrite - rule-based text rewriting with atomic in-place file edits.
//!
//! This library provides the core functionality for rewrite, including:
//! - Ruleset file parsing, validation and named lookup
//! - Literal, table and regex pattern rewriting
//! - An ordered, pure rewrite pipeline with per-rule reports
//! - Locked reads and atomic writes of the target file
//!
//! # Example
//!
//! ```no_run
//! use rewrite_cli::config::load_ruleset;
//! use rewrite_cli::pipeline;
//! use rewrite_cli::target::{read_target, write_target};
//! use std::path::Path;
//!
//! let ruleset = load_ruleset(Path::new("rulesets/light-theme.toml")).unwrap();
//! let target = Path::new("src/ui_manager.cpp");
//!
//! let original = read_target(target).unwrap();
//! let outcome = pipeline::apply(&original, &ruleset).unwrap();
//!
//! for report in &outcome.reports {
//!     println!("{report}");
//! }
//! write_target(target, &outcome.buffer).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod rules;
pub mod target;

pub use error::{Result, RewriteError};
