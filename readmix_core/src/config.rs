use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::AdmonitionStyle;
use crate::DEFAULT_BADGE_BASE_URL;
use crate::DialectOptions;
use crate::ReadmixError;
use crate::ReadmixResult;
use crate::raw_base_for;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["readmix.toml", ".readmix.toml", ".config/readmix.toml"];

pub const DEFAULT_SOURCE_FILE: &str = "README.md";
pub const DEFAULT_TEMPLATE_FILE: &str = ".README_npm.md";
pub const DEFAULT_OUTPUT_FILE: &str = ".npm-readme.md";
pub const DEFAULT_README_FILE: &str = "README.md";
pub const DEFAULT_BACKUP_FILE: &str = ".original-readme.md";
pub const DEFAULT_BRANCH: &str = "main";

/// Configuration loaded from a `readmix.toml` file.
///
/// ```toml
/// notice = false
///
/// [files]
/// source = "README.md"
/// template = ".README_npm.md"
/// output = ".npm-readme.md"
///
/// [publish]
/// readme = "README.md"
/// backup = ".original-readme.md"
///
/// [links]
/// repository = "https://github.com/owner/repo"
/// branch = "main"
/// badge_base = "https://img.shields.io"
///
/// [emoji]
/// ":tada:" = "🎉"
///
/// [admonitions.CAUTION]
/// icon = "🔥"
/// label = "Careful"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ReadmixConfig {
	/// Prepend a comment noting that the output was converted.
	#[serde(default)]
	pub notice: bool,
	/// Input and output documents.
	#[serde(default)]
	pub files: FilesConfig,
	/// Files involved in staging the generated readme for publishing.
	#[serde(default)]
	pub publish: PublishConfig,
	/// Urls used to absolutize links and images.
	#[serde(default)]
	pub links: LinksConfig,
	/// Extra shortcodes, merged over the default table.
	#[serde(default)]
	pub emoji: BTreeMap<String, String>,
	/// Admonition style overrides keyed by type name.
	#[serde(default)]
	pub admonitions: BTreeMap<String, AdmonitionOverride>,
}

/// Paths of the documents read and written by `readmix generate`. Relative
/// to the project root.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
	/// The canonical readme that blocks are extracted from.
	#[serde(default = "default_source")]
	pub source: PathBuf,
	/// The registry readme template containing `{{ name }}` placeholders.
	#[serde(default = "default_template")]
	pub template: PathBuf,
	/// Where the converted readme is written.
	#[serde(default = "default_output")]
	pub output: PathBuf,
}

impl Default for FilesConfig {
	fn default() -> Self {
		Self {
			source: default_source(),
			template: default_template(),
			output: default_output(),
		}
	}
}

/// Paths used by `readmix prepare` and `readmix restore`.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishConfig {
	/// The readme the publishing tool reads.
	#[serde(default = "default_readme")]
	pub readme: PathBuf,
	/// Where the original readme is kept while the generated one is staged.
	#[serde(default = "default_backup")]
	pub backup: PathBuf,
}

impl Default for PublishConfig {
	fn default() -> Self {
		Self {
			readme: default_readme(),
			backup: default_backup(),
		}
	}
}

/// Link configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LinksConfig {
	/// Repository page url, e.g. `https://github.com/owner/repo`.
	#[serde(default)]
	pub repository: Option<String>,
	/// Base url for relative images. Defaults to
	/// `<repository>/raw/<branch>`.
	#[serde(default)]
	pub raw_base: Option<String>,
	/// Branch used to build the default `raw_base`.
	#[serde(default = "default_branch")]
	pub branch: String,
	/// Base url for badge images without a scheme.
	#[serde(default = "default_badge_base")]
	pub badge_base: String,
}

impl Default for LinksConfig {
	fn default() -> Self {
		Self {
			repository: None,
			raw_base: None,
			branch: default_branch(),
			badge_base: default_badge_base(),
		}
	}
}

/// Partial admonition style. Missing fields keep the default for that type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdmonitionOverride {
	pub icon: Option<String>,
	pub color: Option<String>,
	pub label: Option<String>,
}

fn default_source() -> PathBuf {
	PathBuf::from(DEFAULT_SOURCE_FILE)
}

fn default_template() -> PathBuf {
	PathBuf::from(DEFAULT_TEMPLATE_FILE)
}

fn default_output() -> PathBuf {
	PathBuf::from(DEFAULT_OUTPUT_FILE)
}

fn default_readme() -> PathBuf {
	PathBuf::from(DEFAULT_README_FILE)
}

fn default_backup() -> PathBuf {
	PathBuf::from(DEFAULT_BACKUP_FILE)
}

fn default_branch() -> String {
	DEFAULT_BRANCH.to_string()
}

fn default_badge_base() -> String {
	DEFAULT_BADGE_BASE_URL.to_string()
}

/// Absolute locations of every file role for a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
	pub source: PathBuf,
	pub template: PathBuf,
	pub output: PathBuf,
	pub readme: PathBuf,
	pub backup: PathBuf,
}

impl ReadmixConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> ReadmixResult<Option<ReadmixConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: ReadmixConfig =
			toml::from_str(&content).map_err(|e| ReadmixError::ConfigParse(e.to_string()))?;

		tracing::debug!(path = %config_path.display(), "loaded config");
		Ok(Some(config))
	}

	/// Like [`ReadmixConfig::load`] but falls back to the defaults.
	pub fn load_or_default(root: &Path) -> ReadmixResult<ReadmixConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Join every configured path onto `root`.
	pub fn project_paths(&self, root: &Path) -> ProjectPaths {
		ProjectPaths {
			source: root.join(&self.files.source),
			template: root.join(&self.files.template),
			output: root.join(&self.files.output),
			readme: root.join(&self.publish.readme),
			backup: root.join(&self.publish.backup),
		}
	}

	/// Build converter options, preferring `repository_override` over the
	/// configured repository url.
	pub fn dialect_options(&self, repository_override: Option<&str>) -> ReadmixResult<DialectOptions> {
		let repository = repository_override
			.or(self.links.repository.as_deref())
			.map(str::trim)
			.filter(|url| !url.is_empty())
			.ok_or(ReadmixError::MissingRepositoryUrl)?;

		let raw_base = self
			.links
			.raw_base
			.clone()
			.unwrap_or_else(|| raw_base_for(repository, &self.links.branch));

		let mut options = DialectOptions::new(repository)
			.with_raw_base_url(raw_base)
			.with_badge_base_url(self.links.badge_base.clone())
			.with_emoji(self.emoji.clone())
			.with_notice(self.notice);

		for (kind, overrides) in &self.admonitions {
			let kind = kind.to_ascii_uppercase();
			let base = options
				.admonitions
				.get(&kind)
				.cloned()
				.unwrap_or_else(|| {
					AdmonitionStyle {
						label: kind.clone(),
						..options.fallback_admonition.clone()
					}
				});
			let style = AdmonitionStyle {
				icon: overrides.icon.clone().unwrap_or(base.icon),
				color: overrides.color.clone().unwrap_or(base.color),
				label: overrides.label.clone().unwrap_or(base.label),
			};
			options = options.with_admonition(&kind, style);
		}

		Ok(options)
	}
}
