//! Staging of the generated readme for a publishing tool.
//!
//! The publishing tool reads a fixed file (the working readme). Before
//! publishing, [`PublishStateManager::prepare`] moves the original aside into a
//! backup and copies the generated readme into its place. Afterwards
//! [`PublishStateManager::restore`] copies the backup back and removes the
//! generated file.
//!
//! The backup file is the only record of the swap. Its presence means the
//! working readme is [`PublishStatus::Staged`], its absence means
//! [`PublishStatus::Clean`]. Nothing is remembered in memory between calls, so
//! a `restore` after a crash still finds the original.
//!
//! Two processes running `prepare` at the same time race on the backup. This
//! is not guarded against.

use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::ProjectPaths;
use crate::ReadmixError;
use crate::ReadmixResult;

/// Whether the working readme is currently swapped out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PublishStatus {
	/// No backup exists; the working readme is the original.
	#[display("clean")]
	Clean,
	/// A backup exists; the working readme holds generated content.
	#[display("staged")]
	Staged,
}

/// What [`PublishStateManager::prepare`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareOutcome {
	/// A new backup of the working readme was written.
	pub backed_up: bool,
	/// A backup from an earlier `prepare` was found and kept.
	pub kept_existing_backup: bool,
}

/// What [`PublishStateManager::restore`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOutcome {
	/// The backup was copied over the working readme and removed.
	pub restored: bool,
	/// The generated readme was removed.
	pub removed_generated: bool,
}

/// Manages the working, backup and generated readme files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishStateManager {
	working: PathBuf,
	backup: PathBuf,
	generated: PathBuf,
}

impl PublishStateManager {
	pub fn new(
		working: impl Into<PathBuf>,
		backup: impl Into<PathBuf>,
		generated: impl Into<PathBuf>,
	) -> Self {
		Self {
			working: working.into(),
			backup: backup.into(),
			generated: generated.into(),
		}
	}

	/// Manager for the configured readme, backup and output paths.
	pub fn from_paths(paths: &ProjectPaths) -> Self {
		Self::new(&paths.readme, &paths.backup, &paths.output)
	}

	pub fn working(&self) -> &Path {
		&self.working
	}

	pub fn backup(&self) -> &Path {
		&self.backup
	}

	pub fn generated(&self) -> &Path {
		&self.generated
	}

	/// The current state, read from the filesystem.
	pub fn status(&self) -> PublishStatus {
		if self.backup.is_file() {
			PublishStatus::Staged
		} else {
			PublishStatus::Clean
		}
	}

	/// Put the generated readme in place of the working readme.
	///
	/// Fails with [`ReadmixError::MissingGeneratedArtifact`] before touching
	/// any file when the generated readme does not exist. An existing backup
	/// is never overwritten, so calling this twice keeps the true original.
	pub fn prepare(&self) -> ReadmixResult<PrepareOutcome> {
		if !self.generated.is_file() {
			return Err(ReadmixError::MissingGeneratedArtifact {
				path: self.generated.clone(),
			});
		}

		let mut outcome = PrepareOutcome {
			backed_up: false,
			kept_existing_backup: false,
		};

		if self.status() == PublishStatus::Staged {
			tracing::info!(backup = %self.backup.display(), "keeping existing backup");
			outcome.kept_existing_backup = true;
		} else if self.working.is_file() {
			atomic_copy(&self.working, &self.backup)?;
			tracing::info!(backup = %self.backup.display(), "backed up original readme");
			outcome.backed_up = true;
		}

		atomic_copy(&self.generated, &self.working)?;
		tracing::info!(working = %self.working.display(), "staged generated readme");

		Ok(outcome)
	}

	/// Put the original readme back and remove the generated readme.
	///
	/// A missing backup is only a warning. The generated readme is removed
	/// either way so it does not linger into the next run.
	pub fn restore(&self) -> ReadmixResult<RestoreOutcome> {
		let mut outcome = RestoreOutcome {
			restored: false,
			removed_generated: false,
		};

		if self.status() == PublishStatus::Staged {
			atomic_copy(&self.backup, &self.working)?;
			std::fs::remove_file(&self.backup)?;
			tracing::info!(working = %self.working.display(), "restored original readme");
			outcome.restored = true;
		} else {
			tracing::warn!(backup = %self.backup.display(), "no backed up readme found to restore");
		}

		if self.generated.is_file() {
			std::fs::remove_file(&self.generated)?;
			tracing::info!(generated = %self.generated.display(), "removed generated readme");
			outcome.removed_generated = true;
		}

		Ok(outcome)
	}
}

/// Copy `from` to `to` through a sibling temporary file so that `to` is
/// either untouched or completely written.
fn atomic_copy(from: &Path, to: &Path) -> ReadmixResult<()> {
	let bytes = std::fs::read(from)?;
	let file_name = to
		.file_name()
		.map_or_else(|| "readme".into(), |name| name.to_string_lossy());
	let temp_path = to.with_file_name(format!(
		".{file_name}.tmp-{}-{}",
		std::process::id(),
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0, |duration| duration.as_nanos())
	));

	std::fs::write(&temp_path, bytes)?;

	if let Err(error) = std::fs::rename(&temp_path, to) {
		let _ = std::fs::remove_file(&temp_path);
		return Err(error.into());
	}

	Ok(())
}
