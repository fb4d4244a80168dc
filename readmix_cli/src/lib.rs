use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Build a package registry readme from your repository readme.",
	long_about = "readmix reuses named blocks from your repository readme inside a registry \
	              readme template, converts markdown that only renders on the code host into \
	              markdown the registry understands, and swaps the result in for publishing.\n\nQuick \
	              start:\n  readmix init      Create readmix.toml and a template\n  readmix \
	              generate  Write the registry readme\n  readmix prepare   Stage it as README.md \
	              before publishing\n  readmix restore   Put the original README.md back"
)]
pub struct ReadmixCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize readmix in a project.
	///
	/// Creates a `readmix.toml` and a `.README_npm.md` template in the project
	/// root. Files that already exist are left untouched.
	Init,
	/// Generate the registry readme.
	///
	/// Replaces every `{{ NAME }}` placeholder in the template with the
	/// content between the `<!-- NAME -->` markers of the source readme, then
	/// converts emoji shortcodes, task lists, relative images, collapsible
	/// sections, badges, admonitions and anchor links.
	Generate {
		/// Print the generated readme instead of writing it.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Watch for file changes and regenerate automatically.
		#[arg(long, default_value_t = false)]
		watch: bool,

		/// Repository url used for anchor links and relative images.
		/// Overrides `[links] repository` in readmix.toml.
		#[arg(long)]
		repo_url: Option<String>,
	},
	/// Check that the generated readme is up to date.
	///
	/// Regenerates the readme in memory and compares it with the file on
	/// disk. Exits with status 1 if the file is stale or missing.
	Check {
		/// Show a diff between the file on disk and the expected content.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,

		/// Repository url used for anchor links and relative images.
		#[arg(long)]
		repo_url: Option<String>,
	},
	/// Stage the generated readme as the working readme.
	///
	/// Backs up the working readme (unless a backup already exists) and copies
	/// the generated readme over it. Run this right before publishing.
	Prepare,
	/// Restore the original readme after publishing.
	///
	/// Copies the backup over the working readme and removes both the backup
	/// and the generated readme. Nothing to restore is not an error.
	Restore,
	/// Print whether the working readme is `clean` or `staged`.
	Status,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
