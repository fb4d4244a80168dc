mod common;

use clap::CommandFactory;
use readmix_cli::ReadmixCli;
use readmix_core::AnyEmptyResult;
use serde_json::Value;

fn generate(path: &std::path::Path) {
	common::readmix_cmd()
		.arg("generate")
		.arg("--path")
		.arg(path)
		.assert()
		.success();
}

#[test]
fn cli_definition_is_valid() {
	ReadmixCli::command().debug_assert();
}

#[test]
fn check_passes_when_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_project(tmp.path())?;
	generate(tmp.path());

	common::readmix_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(".npm-readme.md is up to date."));

	Ok(())
}

#[test]
fn check_fails_when_not_generated() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_project(tmp.path())?;

	common::readmix_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains(".npm-readme.md has not been generated."))
		.stderr(predicates::str::contains("Run `readmix generate` to fix."));

	Ok(())
}

#[test]
fn check_fails_when_stale() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_project(tmp.path())?;
	generate(tmp.path());

	std::fs::write(
		tmp.path().join("README.md"),
		common::SOURCE.replace("A fast tool", "A faster tool"),
	)?;

	common::readmix_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains(".npm-readme.md is out of date."));

	Ok(())
}

#[test]
fn check_diff_shows_changed_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_project(tmp.path())?;
	std::fs::write(
		tmp.path().join(".npm-readme.md"),
		common::EXPECTED.replace("A fast tool 🚀", "A slow tool"),
	)?;

	common::readmix_cmd()
		.arg("check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-A slow tool"))
		.stderr(predicates::str::contains("+A fast tool 🚀"));

	Ok(())
}

#[test]
fn check_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_project(tmp.path())?;

	let output = common::readmix_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value["ok"], Value::Bool(false));
	assert_eq!(value["exists"], Value::Bool(false));
	assert_eq!(value["output"], Value::String(".npm-readme.md".into()));

	generate(tmp.path());

	let output = common::readmix_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value["ok"], Value::Bool(true));
	assert_eq!(value["missing_blocks"], Value::Array(vec![]));

	Ok(())
}

#[test]
fn no_subcommand_exits_with_error() {
	common::readmix_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("No subcommand specified"));
}
