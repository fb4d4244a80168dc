use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use owo_colors::OwoColorize;
use readmix_cli::Commands;
use readmix_cli::OutputFormat;
use readmix_cli::ReadmixCli;
use readmix_core::Pipeline;
use readmix_core::PublishStateManager;
use readmix_core::ReadmixConfig;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "READMIX_LOG";

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = ReadmixCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Generate {
			dry_run,
			watch,
			repo_url,
		}) => run_generate(&args, *dry_run, *watch, repo_url.as_deref()),
		Some(Commands::Check {
			diff,
			format,
			repo_url,
		}) => run_check(&args, *diff, *format, repo_url.as_deref()),
		Some(Commands::Prepare) => run_prepare(&args),
		Some(Commands::Restore) => run_restore(&args),
		Some(Commands::Status) => run_status(&args),
		None => {
			eprintln!("No subcommand specified. Run `readmix --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<readmix_core::ReadmixError>() {
			Ok(readmix_err) => {
				let report: miette::Report = (*readmix_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log library events to stderr. `READMIX_LOG` takes precedence over the
/// `--verbose` default.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose {
		"warn,readmix_core=debug"
	} else {
		"warn"
	};
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &ReadmixCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_pipeline(
	root: &Path,
	repo_url: Option<&str>,
) -> Result<Pipeline, Box<dyn std::error::Error>> {
	let config = ReadmixConfig::load_or_default(root)?;
	Ok(Pipeline::from_config(root, &config, repo_url)?)
}

fn load_publish_manager(root: &Path) -> Result<PublishStateManager, Box<dyn std::error::Error>> {
	let config = ReadmixConfig::load_or_default(root)?;
	Ok(PublishStateManager::from_paths(&config.project_paths(root)))
}

fn run_init(args: &ReadmixCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let existing_config = ReadmixConfig::resolve_path(&root);

	if let Some(config_path) = &existing_config {
		println!("Config file already exists: {}", config_path.display());
	} else {
		let sample_config = "# readmix configuration\n\n# Prepend a comment noting the readme was \
		                     converted.\n# notice = true\n\n[files]\nsource = \"README.md\"\ntemplate \
		                     = \".README_npm.md\"\noutput = \".npm-readme.md\"\n\n[publish]\nreadme = \
		                     \"README.md\"\nbackup = \".original-readme.md\"\n\n[links]\n# Required. \
		                     Used for anchor links and relative images.\n# repository = \
		                     \"https://github.com/owner/repo\"\nbranch = \"main\"\n\n# Extra emoji \
		                     shortcodes.\n# [emoji]\n# \":tada:\" = \"🎉\"\n\n# Admonition style \
		                     overrides.\n# [admonitions.NOTE]\n# icon = \"📝\"\n# color = \
		                     \"#0075ff\"\n# label = \"Note\"\n";

		std::fs::write(root.join("readmix.toml"), sample_config)?;
		println!("Created readmix.toml");
	}

	let template_path = ReadmixConfig::load_or_default(&root)?
		.project_paths(&root)
		.template;
	let template_exists = template_path.exists();
	if template_exists {
		println!("Template file already exists: {}", template_path.display());
	} else {
		let sample_template = "# package-name\n\n{{ INTRO }}\n\n<!--\nEach {{ NAME }} above is \
		                       replaced with the text between two matching NAME\nmarkers in \
		                       README.md, written as html comments.\n-->\n";

		std::fs::write(&template_path, sample_template)?;
		println!("Created template file: {}", template_path.display());
	}

	if existing_config.is_none() || !template_exists {
		println!();
		println!("Next steps:");
		println!("  1. Set `repository` under [links] in readmix.toml");
		println!("  2. Wrap reusable sections of README.md in markers:");
		println!("     <!-- INTRO -->");
		println!("     <!-- INTRO -->");
		println!("  3. Run `readmix generate` to write the registry readme");
	}

	Ok(())
}

fn run_generate(
	args: &ReadmixCli,
	dry_run: bool,
	watch: bool,
	repo_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
	// Run the initial generation.
	run_generate_once(args, dry_run, repo_url)?;

	if !watch || dry_run {
		return Ok(());
	}

	// Watch mode
	println!("\nWatching for file changes... (press Ctrl+C to stop)");
	let root = resolve_root(args);
	let (tx, rx) = mpsc::channel();
	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		if let Err(e) = run_generate_once(args, false, repo_url) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

/// Generate once. The output file is only written when its content changes,
/// so the write does not retrigger watch mode.
fn run_generate_once(
	args: &ReadmixCli,
	dry_run: bool,
	repo_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let pipeline = load_pipeline(&root, repo_url)?;
	let generated = pipeline.run()?;
	let output = make_relative(&pipeline.paths().output, &root);

	if args.verbose {
		eprintln!(
			"Resolved {} placeholder(s), skipped {} inside comments",
			generated.resolved, generated.skipped
		);
	}

	if dry_run {
		print!("{}", generated.content);
		return Ok(());
	}

	let current = std::fs::read_to_string(&pipeline.paths().output).ok();
	if current.as_deref() == Some(generated.content.as_str()) {
		println!("{output} is already up to date.");
		return Ok(());
	}

	pipeline.write(&generated)?;
	println!("Generated {output}.");

	if !generated.missing_blocks.is_empty() {
		println!(
			"{} block(s) missing from the source: {}",
			generated.missing_blocks.len(),
			generated.missing_blocks.join(", ")
		);
	}

	Ok(())
}

fn run_check(
	args: &ReadmixCli,
	show_diff: bool,
	format: OutputFormat,
	repo_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let pipeline = load_pipeline(&root, repo_url)?;
	let result = pipeline.check()?;
	let output = make_relative(&result.output, &root);

	match format {
		OutputFormat::Json => {
			let value = serde_json::json!({
				"ok": result.is_ok(),
				"output": output,
				"exists": !result.is_missing(),
				"missing_blocks": result.missing_blocks,
			});
			println!("{value}");
		}
		OutputFormat::Text => {
			if result.is_ok() {
				println!(
					"{} {output} is up to date.",
					colored!("Check passed:", green)
				);
			} else {
				let reason = if result.is_missing() {
					"has not been generated"
				} else {
					"is out of date"
				};
				eprintln!("{} {output} {reason}.", colored!("Check failed:", yellow));

				if show_diff {
					print_diff(result.current.as_deref().unwrap_or(""), &result.expected);
				}

				eprintln!();
				eprintln!("Run `readmix generate` to fix.");
			}
		}
	}

	if !result.is_ok() {
		process::exit(1);
	}

	Ok(())
}

fn run_prepare(args: &ReadmixCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let manager = load_publish_manager(&root)?;
	let outcome = manager.prepare()?;

	let working = make_relative(manager.working(), &root);
	let backup = make_relative(manager.backup(), &root);
	let generated = make_relative(manager.generated(), &root);

	if outcome.kept_existing_backup {
		println!("Kept existing backup {backup}.");
	} else if outcome.backed_up {
		println!("Backed up {working} to {backup}.");
	}
	println!("Staged {generated} as {working}.");

	Ok(())
}

fn run_restore(args: &ReadmixCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let manager = load_publish_manager(&root)?;
	let outcome = manager.restore()?;

	let working = make_relative(manager.working(), &root);
	let backup = make_relative(manager.backup(), &root);
	let generated = make_relative(manager.generated(), &root);

	if outcome.restored {
		println!("Restored {working} from {backup}.");
	} else {
		println!("Nothing to restore: {backup} does not exist.");
	}

	if outcome.removed_generated {
		println!("Removed {generated}.");
	}

	Ok(())
}

fn run_status(args: &ReadmixCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let manager = load_publish_manager(&root)?;
	println!("{}", colored!(manager.status().to_string(), bold));

	if args.verbose {
		println!("{:<12} {}", "working", make_relative(manager.working(), &root));
		println!("{:<12} {}", "backup", make_relative(manager.backup(), &root));
		println!("{:<12} {}", "generated", make_relative(manager.generated(), &root));
	}

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
