use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use rewrite_cli::config::{
	RuleDescriptor, load_ruleset, render_ruleset, resolve_ruleset_path, user_rulesets_dir,
};
use rewrite_cli::pipeline::{self, RuleReport, total_replacements};
use rewrite_cli::rules::RuleSet;
use rewrite_cli::target::{read_target, write_target};

#[derive(Parser)]
#[command(name = "rewrite")]
#[command(
	author,
	version,
	about = "Rule-based text rewriting with atomic in-place file edits"
)]
#[command(
	arg_required_else_help = true,
	args_conflicts_with_subcommands = true,
	subcommand_negates_reqs = true
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// File to rewrite in place
	#[arg(required = true)]
	target: Option<PathBuf>,

	/// Ruleset file, or the name of a ruleset in the user config directory
	#[arg(required = true)]
	ruleset: Option<String>,

	/// Apply the generated inverse of the ruleset
	#[arg(long)]
	inverse: bool,

	/// Report what would change without writing the target
	#[arg(long)]
	dry_run: bool,

	/// Report format
	#[arg(long, value_enum, default_value_t = ReportFormat::Text)]
	format: ReportFormat,

	/// Increase log verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Ruleset management commands
	Ruleset {
		#[command(subcommand)]
		action: RulesetAction,
	},
}

#[derive(Subcommand)]
enum RulesetAction {
	/// Check a ruleset for errors without touching any file
	Validate { ruleset: String },
	/// List the rules of a ruleset in application order
	Show { ruleset: String },
	/// Print the generated inverse of a ruleset as TOML
	Invert { ruleset: String },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
	Text,
	Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
	target: &'a Path,
	ruleset: Option<&'a str>,
	written: bool,
	aborted: Option<String>,
	replacements: usize,
	rules: &'a [RuleReport],
}

struct RewriteOptions {
	inverse: bool,
	dry_run: bool,
	format: ReportFormat,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	// Handle subcommands
	if let Some(command) = cli.command {
		return match command {
			Commands::Ruleset { action } => match action {
				RulesetAction::Validate { ruleset } => handle_ruleset_validate(&ruleset),
				RulesetAction::Show { ruleset } => handle_ruleset_show(&ruleset),
				RulesetAction::Invert { ruleset } => handle_ruleset_invert(&ruleset),
			},
		};
	}

	// Both are required unless a subcommand is given
	let (Some(target), Some(ruleset)) = (cli.target, cli.ruleset) else {
		anyhow::bail!("a target file and a ruleset are required");
	};

	let options = RewriteOptions {
		inverse: cli.inverse,
		dry_run: cli.dry_run,
		format: cli.format,
	};
	handle_rewrite(&target, &ruleset, &options)
}

fn init_logging(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
		.format_timestamp(None)
		.init();
}

fn load(ruleset_arg: &str) -> Result<(PathBuf, RuleSet)> {
	let path = resolve_ruleset_path(ruleset_arg)
		.with_context(|| format!("Failed to locate ruleset {ruleset_arg:?}"))?;
	let ruleset =
		load_ruleset(&path).with_context(|| format!("Failed to load {}", path.display()))?;
	Ok((path, ruleset))
}

fn handle_rewrite(target: &Path, ruleset_arg: &str, options: &RewriteOptions) -> Result<ExitCode> {
	// Rules are validated before the target is opened
	let (_, mut ruleset) = load(ruleset_arg)?;
	if options.inverse {
		ruleset = ruleset.inverse().context("Failed to invert ruleset")?;
	}

	let original =
		read_target(target).with_context(|| format!("Failed to read {}", target.display()))?;

	let outcome = match pipeline::apply(&original, &ruleset) {
		Ok(outcome) => outcome,
		Err(aborted) => {
			print_report(
				target,
				&ruleset,
				&aborted.partial.reports,
				false,
				Some(aborted.error.to_string()),
				options.format,
			)?;
			return Err(anyhow::Error::new(aborted.error).context(format!(
				"Rewrite aborted; {} left unchanged",
				target.display()
			)));
		}
	};

	let changed = outcome.buffer != original;
	let written = changed && !options.dry_run;
	if written {
		write_target(target, &outcome.buffer)
			.with_context(|| format!("Failed to write {}", target.display()))?;
	}

	print_report(
		target,
		&ruleset,
		&outcome.reports,
		written,
		None,
		options.format,
	)?;

	if options.format == ReportFormat::Text {
		if written {
			println!("Rewrote {}", target.display());
		} else if changed {
			println!("Dry run: {} not written", target.display());
		} else {
			println!("No changes to {}", target.display());
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn print_report(
	target: &Path,
	ruleset: &RuleSet,
	reports: &[RuleReport],
	written: bool,
	aborted: Option<String>,
	format: ReportFormat,
) -> Result<()> {
	match format {
		ReportFormat::Text => {
			for report in reports {
				println!("{report}");
			}
		}
		ReportFormat::Json => {
			let report = JsonReport {
				target,
				ruleset: ruleset.name(),
				written,
				aborted,
				replacements: total_replacements(reports),
				rules: reports,
			};
			let json =
				serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
			println!("{json}");
		}
	}
	Ok(())
}

fn handle_ruleset_validate(ruleset_arg: &str) -> Result<ExitCode> {
	match load(ruleset_arg) {
		Ok((path, ruleset)) => {
			println!(
				"Ruleset is valid: {} ({} rules)",
				path.display(),
				ruleset.len()
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Ruleset error: {e:#}");
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_ruleset_show(ruleset_arg: &str) -> Result<ExitCode> {
	let (path, ruleset) = load(ruleset_arg)?;

	println!("# Source: {}", path.display());
	if let Some(name) = ruleset.name() {
		println!("# name: {name}");
	}
	if let Some(description) = ruleset.description() {
		println!("# description: {description}");
	}
	println!("# rules: {}", ruleset.len());
	println!();

	for (i, rule) in ruleset.rules().iter().enumerate() {
		println!("  Rule {i} ({}):", rule.kind());
		if let Some(name) = rule.name() {
			println!("    name: {name}");
		}
		match &rule.descriptor {
			RuleDescriptor::Literal(literal) => {
				println!("    find: {:?}", literal.find);
				println!("    replace: {:?}", literal.replace);
			}
			RuleDescriptor::Table(table) => {
				println!("    entries: {}", table.entries.len());
				for (find, replace) in &table.entries {
					println!("      {find:?} -> {replace:?}");
				}
			}
			RuleDescriptor::Pattern(pattern) => {
				println!("    pattern: {:?}", pattern.pattern);
				println!("    template: {:?}", pattern.template);
				let flags: Vec<&str> = [
					("multiline", pattern.multiline),
					("dot_matches_newline", pattern.dot_matches_newline),
					("case_insensitive", pattern.case_insensitive),
					("greedy", pattern.greedy),
					("global", pattern.global),
				]
				.iter()
				.filter(|(_, set)| *set)
				.map(|(flag, _)| *flag)
				.collect();
				if !flags.is_empty() {
					println!("    flags: {}", flags.join(", "));
				}
			}
		}
		if rule.is_required() {
			println!("    required: true");
		}
		println!();
	}

	// Show where named rulesets are looked up
	if let Some(dir) = user_rulesets_dir() {
		println!("Named rulesets directory: {}", dir.display());
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_ruleset_invert(ruleset_arg: &str) -> Result<ExitCode> {
	let (path, ruleset) = load(ruleset_arg)?;
	let inverse = ruleset
		.inverse()
		.with_context(|| format!("Failed to invert {}", path.display()))?;

	let rendered = render_ruleset(&inverse.to_file()).context("Failed to render ruleset")?;
	print!("{rendered}");
	Ok(ExitCode::SUCCESS)
}
