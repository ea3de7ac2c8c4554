use crate::error::{Result, RewriteError};
use std::path::{Path, PathBuf};

/// Resolve a ruleset argument to a file path.
///
/// The lookup order is:
/// 1. `arg` as a path, if it exists
/// 2. If `arg` is a bare name (no separator, no extension), the user's
///    `<config dir>/rewrite/rulesets/<arg>.toml`
///
/// Anything else is reported as `RuleSetNotFound` for `arg` itself.
pub fn resolve_ruleset_path(arg: &str) -> Result<PathBuf> {
	let direct = PathBuf::from(arg);
	if direct.exists() {
		return Ok(direct);
	}

	if is_bare_name(arg)
		&& let Some(dir) = user_rulesets_dir()
	{
		let named = named_ruleset_path(&dir, arg);
		if named.exists() {
			log::debug!("resolved ruleset {arg:?} to {}", named.display());
			return Ok(named);
		}
	}

	Err(RewriteError::RuleSetNotFound { path: direct })
}

/// Directory holding the user's named rulesets, if a config dir exists.
pub fn user_rulesets_dir() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("rewrite").join("rulesets"))
}

fn named_ruleset_path(dir: &Path, name: &str) -> PathBuf {
	dir.join(format!("{name}.toml"))
}

fn is_bare_name(arg: &str) -> bool {
	let path = Path::new(arg);
	!arg.is_empty() && path.components().count() == 1 && path.extension().is_none()
}
