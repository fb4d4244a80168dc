use std::path::Path;
use std::path::PathBuf;

use crate::DialectConverter;
use crate::Document;
use crate::FileRole;
use crate::ProjectPaths;
use crate::PublishStateManager;
use crate::PublishStatus;
use crate::ReadmixConfig;
use crate::ReadmixResult;
use crate::resolve_placeholders_with_report;

/// A converted readme held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
	/// The final registry readme.
	pub content: String,
	/// Block names that were referenced by the template but missing from the
	/// source. Each was replaced by the not-found sentinel.
	pub missing_blocks: Vec<String>,
	/// Number of placeholders replaced.
	pub resolved: usize,
	/// Number of placeholders left alone because they were inside a comment.
	pub skipped: usize,
}

/// Result of comparing the generated readme on disk with a fresh conversion.
#[derive(Debug)]
pub struct CheckResult {
	/// Path of the generated readme.
	pub output: PathBuf,
	/// Content currently on disk, `None` when the file does not exist.
	pub current: Option<String>,
	/// What a fresh conversion produces.
	pub expected: String,
	/// Blocks missing from the source.
	pub missing_blocks: Vec<String>,
}

impl CheckResult {
	/// Returns true if the file on disk matches a fresh conversion.
	pub fn is_ok(&self) -> bool {
		self.current.as_deref() == Some(self.expected.as_str())
	}

	/// Returns true if the generated readme has not been written yet.
	pub fn is_missing(&self) -> bool {
		self.current.is_none()
	}
}

/// Resolve placeholders in `template` against `source`, then convert the
/// result to the registry dialect.
pub fn generate_document(source: &str, template: &str, converter: &DialectConverter) -> Generated {
	let resolution = resolve_placeholders_with_report(template, source);
	let content = converter.convert(&resolution.content);

	Generated {
		content,
		missing_blocks: resolution.missing,
		resolved: resolution.resolved,
		skipped: resolution.skipped,
	}
}

/// Reads the source and template from disk, converts them, and writes or
/// checks the generated readme.
#[derive(Debug, Clone)]
pub struct Pipeline {
	paths: ProjectPaths,
	converter: DialectConverter,
}

impl Pipeline {
	pub fn new(paths: ProjectPaths, converter: DialectConverter) -> Self {
		Self { paths, converter }
	}

	/// Build a pipeline for `root` from its configuration. `repository_url`
	/// overrides the configured repository.
	pub fn from_config(
		root: &Path,
		config: &ReadmixConfig,
		repository_url: Option<&str>,
	) -> ReadmixResult<Self> {
		let options = config.dialect_options(repository_url)?;
		Ok(Self::new(
			config.project_paths(root),
			DialectConverter::new(options),
		))
	}

	pub fn paths(&self) -> &ProjectPaths {
		&self.paths
	}

	pub fn converter(&self) -> &DialectConverter {
		&self.converter
	}

	/// Where the source is read from. While the readme is staged the working
	/// readme holds generated content, so a source that points at it is read
	/// from the backup instead.
	pub fn source_path(&self) -> &Path {
		let publish = PublishStateManager::from_paths(&self.paths);
		if self.paths.source == self.paths.readme && publish.status() == PublishStatus::Staged {
			tracing::info!(
				backup = %self.paths.backup.display(),
				"readme is staged, reading source from backup"
			);
			return &self.paths.backup;
		}

		&self.paths.source
	}

	/// Read both inputs and produce the converted readme.
	pub fn run(&self) -> ReadmixResult<Generated> {
		let source = Document::read(self.source_path(), FileRole::Source)?;
		let template = Document::read(&self.paths.template, FileRole::Template)?;
		Ok(generate_document(&source, &template, &self.converter))
	}

	/// Write a generated readme to the configured output path.
	pub fn write(&self, generated: &Generated) -> ReadmixResult<()> {
		if let Some(parent) = self.paths.output.parent() {
			if !parent.as_os_str().is_empty() {
				std::fs::create_dir_all(parent)?;
			}
		}

		std::fs::write(&self.paths.output, &generated.content)?;
		tracing::info!(output = %self.paths.output.display(), "wrote generated readme");
		Ok(())
	}

	/// Compare the generated readme on disk with a fresh conversion.
	pub fn check(&self) -> ReadmixResult<CheckResult> {
		let generated = self.run()?;
		let current = match std::fs::read_to_string(&self.paths.output) {
			Ok(content) => Some(content),
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
			Err(error) => return Err(error.into()),
		};

		Ok(CheckResult {
			output: self.paths.output.clone(),
			current,
			expected: generated.content,
			missing_blocks: generated.missing_blocks,
		})
	}
}
