mod common;

use readmix_core::AnyEmptyResult;
use similar_asserts::assert_eq;

fn generate(path: &std::path::Path) {
	common::readmix_cmd()
		.arg("generate")
		.arg("--path")
		.arg(path)
		.assert()
		.success();
}

#[test]
fn prepare_and_restore_round_trip() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_project(tmp.path())?;
	generate(tmp.path());

	common::readmix_cmd()
		.arg("prepare")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Backed up README.md to .original-readme.md.",
		))
		.stdout(predicates::str::contains("Staged .npm-readme.md as README.md."));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("README.md"))?,
		common::EXPECTED
	);
	assert_eq!(
		std::fs::read_to_string(tmp.path().join(".original-readme.md"))?,
		common::SOURCE
	);

	common::readmix_cmd()
		.arg("status")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("staged\n");

	common::readmix_cmd()
		.arg("restore")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Restored README.md from .original-readme.md.",
		))
		.stdout(predicates::str::contains("Removed .npm-readme.md."));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("README.md"))?,
		common::SOURCE
	);
	assert!(!tmp.path().join(".original-readme.md").exists());
	assert!(!tmp.path().join(".npm-readme.md").exists());

	common::readmix_cmd()
		.arg("status")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("clean\n");

	Ok(())
}

#[test]
fn prepare_twice_keeps_backup() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_project(tmp.path())?;
	generate(tmp.path());

	for _ in 0..2 {
		common::readmix_cmd()
			.arg("prepare")
			.arg("--path")
			.arg(tmp.path())
			.assert()
			.success();
	}

	assert_eq!(
		std::fs::read_to_string(tmp.path().join(".original-readme.md"))?,
		common::SOURCE
	);

	common::readmix_cmd()
		.arg("prepare")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Kept existing backup .original-readme.md.",
		));

	Ok(())
}

#[test]
fn prepare_without_generated_readme_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_project(tmp.path())?;

	common::readmix_cmd()
		.arg("prepare")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("generated readme not found"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("README.md"))?,
		common::SOURCE
	);
	assert!(!tmp.path().join(".original-readme.md").exists());

	Ok(())
}

#[test]
fn restore_without_backup_succeeds() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_project(tmp.path())?;
	generate(tmp.path());

	common::readmix_cmd()
		.arg("restore")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Nothing to restore: .original-readme.md does not exist.",
		))
		.stderr(predicates::str::contains("no backed up readme found to restore"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("README.md"))?,
		common::SOURCE
	);
	assert!(!tmp.path().join(".npm-readme.md").exists());

	Ok(())
}

#[test]
fn staged_readme_is_not_used_as_source() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_project(tmp.path())?;
	generate(tmp.path());

	common::readmix_cmd()
		.arg("prepare")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::readmix_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	Ok(())
}
