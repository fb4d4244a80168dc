mod common;

use readmix_core::AnyEmptyResult;
use similar_asserts::assert_eq;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::readmix_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created readmix.toml"))
		.stdout(predicates::str::contains("Created template file"));

	let config = std::fs::read_to_string(tmp.path().join("readmix.toml"))?;
	assert!(config.contains("[files]"));
	assert!(config.contains("[links]"));

	let template = std::fs::read_to_string(tmp.path().join(".README_npm.md"))?;
	assert!(template.contains("{{ INTRO }}"));

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join(".readmix.toml"), "notice = true\n")?;
	std::fs::write(tmp.path().join(".README_npm.md"), "existing template")?;

	common::readmix_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Config file already exists"))
		.stdout(predicates::str::contains("Template file already exists"));

	assert!(!tmp.path().join("readmix.toml").exists());
	assert_eq!(
		std::fs::read_to_string(tmp.path().join(".README_npm.md"))?,
		"existing template"
	);

	Ok(())
}

#[test]
fn init_then_generate() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("README.md"),
		"# Project\n\n<!-- INTRO -->\nHello there.\n<!-- INTRO -->\n",
	)?;

	common::readmix_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::readmix_cmd()
		.arg("generate")
		.arg("--repo-url")
		.arg("https://github.com/owner/repo")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let output = std::fs::read_to_string(tmp.path().join(".npm-readme.md"))?;
	assert!(output.starts_with("# package-name\n\nHello there.\n"));
	assert!(output.contains("Each {{ NAME }} above"));

	Ok(())
}
