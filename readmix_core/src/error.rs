use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ReadmixError {
	#[error(transparent)]
	#[diagnostic(code(readmix::io_error))]
	Io(#[from] std::io::Error),

	#[error("{role} file not found: `{}`", path.display())]
	#[diagnostic(
		code(readmix::missing_input),
		help("check the `[files]` section of readmix.toml or create the file")
	)]
	MissingInputFile { role: FileRole, path: PathBuf },

	#[error("generated readme not found: `{}`", path.display())]
	#[diagnostic(
		code(readmix::missing_generated),
		help("run `readmix generate` before `readmix prepare`")
	)]
	MissingGeneratedArtifact { path: PathBuf },

	#[error("no repository url configured")]
	#[diagnostic(
		code(readmix::missing_repository_url),
		help("set `repository` under `[links]` in readmix.toml or pass `--repo-url`")
	)]
	MissingRepositoryUrl,

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(readmix::config_parse),
		help("check that readmix.toml is valid TOML with [files], [publish] and/or [links] sections")
	)]
	ConfigParse(String),
}

/// The role a file plays in the pipeline, used to make missing-file errors
/// point at the right configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum FileRole {
	#[display("source")]
	Source,
	#[display("template")]
	Template,
}

pub type ReadmixResult<T> = Result<T, ReadmixError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
