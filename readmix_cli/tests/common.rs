#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const SOURCE: &str = "# My Project\n\n<!-- INTRO -->\nA fast tool :rocket:\n<!-- INTRO \
                          -->\n\n## Usage\n\nRun it.\n";

pub const TEMPLATE: &str = "# my-package\n\n{{ INTRO }}\n\nSee [usage](#usage).\n";

/// What `SOURCE` and `TEMPLATE` generate for `https://github.com/owner/repo`.
pub const EXPECTED: &str =
	"# my-package\n\nA fast tool 🚀\n\nSee [usage](https://github.com/owner/repo#usage).\n";

pub fn readmix_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("readmix"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("READMIX_LOG");
	cmd
}

/// Write a config, source readme and template into `root`.
pub fn seed_project(root: &Path) -> std::io::Result<()> {
	std::fs::write(
		root.join("readmix.toml"),
		"[links]\nrepository = \"https://github.com/owner/repo\"\n",
	)?;
	std::fs::write(root.join("README.md"), SOURCE)?;
	std::fs::write(root.join(".README_npm.md"), TEMPLATE)?;
	Ok(())
}
