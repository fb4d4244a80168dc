use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern `{pattern}`: {e}"))
}

/// `![alt](path)` on a single line.
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"!\[(.*?)\]\((.*?)\)"));

/// `<details><summary>title</summary> body </details>` across lines.
static DETAILS_RE: LazyLock<Regex> = LazyLock::new(|| {
	compile(r"(?s)<details>\s*<summary>(.*?)</summary>\s*(.*?)\s*</details>")
});

/// `[![alt](image)](link)`.
static BADGE_RE: LazyLock<Regex> =
	LazyLock::new(|| compile(r"\[!\[(.*?)\]\((.*?)\)\]\((.*?)\)"));

/// `[text](#anchor)`.
static ANCHOR_LINK_RE: LazyLock<Regex> =
	LazyLock::new(|| compile(r"\[([^\]]+)\]\(#([^)]+)\)"));

/// The opening line of an admonition, e.g. `> [!NOTE]`.
static ADMONITION_OPEN_RE: LazyLock<Regex> =
	LazyLock::new(|| compile(r"^>[ \t]*\[!([A-Za-z][A-Za-z0-9_-]*)\][ \t]*$"));

/// A leading url scheme such as `https:` or `data:`.
static URL_SCHEME_RE: LazyLock<Regex> =
	LazyLock::new(|| compile(r"^[A-Za-z][A-Za-z0-9+.\-]*:"));

/// Default base url for badge images without a scheme.
pub const DEFAULT_BADGE_BASE_URL: &str = "https://img.shields.io";

/// Comment lines prepended to the output when the conversion notice is
/// enabled.
pub const CONVERSION_NOTICE: &str = "<!-- This README was converted from GitHub-flavored \
                                     Markdown to npm format. -->\n<!-- Some elements may display \
                                     differently on npmjs.com vs. GitHub. -->\n\n";

/// How an admonition of a given type is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmonitionStyle {
	/// Glyph shown before the label.
	pub icon: String,
	/// Css color used for the border and the label.
	pub color: String,
	/// Label text, e.g. `WARNING`.
	pub label: String,
}

impl AdmonitionStyle {
	pub fn new(icon: impl Into<String>, color: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			icon: icon.into(),
			color: color.into(),
			label: label.into(),
		}
	}

	/// The style used for admonition types that are not in the table. The
	/// label is filled in from the type name at render time.
	pub fn generic() -> Self {
		Self::new("❗", "#0075ff", "")
	}
}

/// The shortcodes replaced by default.
pub fn default_emoji_table() -> BTreeMap<String, String> {
	[
		(":smile:", "😄"),
		(":heart:", "❤️"),
		(":thumbsup:", "👍"),
		(":warning:", "⚠️"),
		(":rocket:", "🚀"),
		(":star:", "⭐"),
		(":zap:", "⚡"),
		(":bug:", "🐛"),
		(":information_source:", "ℹ️"),
		(":memo:", "📝"),
		(":bulb:", "💡"),
		(":exclamation:", "❗"),
	]
	.into_iter()
	.map(|(code, glyph)| (code.to_string(), glyph.to_string()))
	.collect()
}

/// The admonition styles used by default, keyed by upper case type name.
pub fn default_admonition_styles() -> BTreeMap<String, AdmonitionStyle> {
	[
		("NOTE", "📝", "#0075ff"),
		("TIP", "💡", "#3aa76d"),
		("IMPORTANT", "🚨", "#d63384"),
		("WARNING", "⚠️", "#bf8700"),
		("CAUTION", "🔥", "#d1242f"),
	]
	.into_iter()
	.map(|(name, icon, color)| (name.to_string(), AdmonitionStyle::new(icon, color, name)))
	.collect()
}

/// Everything the converter needs to know about the target repository along
/// with the lookup tables that drive the data-driven rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectOptions {
	/// Repository page url used for same-document anchors, e.g.
	/// `https://github.com/owner/repo`.
	pub repository_url: String,
	/// Base url that relative image paths are joined onto.
	pub raw_base_url: String,
	/// Base url for badge images without a scheme.
	pub badge_base_url: String,
	/// Shortcode to glyph table.
	pub emoji: BTreeMap<String, String>,
	/// Admonition type (upper case) to style table.
	pub admonitions: BTreeMap<String, AdmonitionStyle>,
	/// Style for admonition types missing from `admonitions`.
	pub fallback_admonition: AdmonitionStyle,
	/// Prepend [`CONVERSION_NOTICE`] to the converted output.
	pub notice: bool,
}

impl DialectOptions {
	/// Options with the default tables. Raw content is served from the `main`
	/// branch of `repository_url`.
	pub fn new(repository_url: impl Into<String>) -> Self {
		let repository_url = repository_url.into();
		let raw_base_url = raw_base_for(&repository_url, "main");

		Self {
			repository_url,
			raw_base_url,
			badge_base_url: DEFAULT_BADGE_BASE_URL.to_string(),
			emoji: default_emoji_table(),
			admonitions: default_admonition_styles(),
			fallback_admonition: AdmonitionStyle::generic(),
			notice: false,
		}
	}

	#[must_use]
	pub fn with_raw_base_url(mut self, raw_base_url: impl Into<String>) -> Self {
		self.raw_base_url = raw_base_url.into();
		self
	}

	#[must_use]
	pub fn with_badge_base_url(mut self, badge_base_url: impl Into<String>) -> Self {
		self.badge_base_url = badge_base_url.into();
		self
	}

	/// Add or override shortcodes.
	#[must_use]
	pub fn with_emoji<I, K, V>(mut self, entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.emoji
			.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
		self
	}

	/// Add or override the style for an admonition type.
	#[must_use]
	pub fn with_admonition(mut self, kind: &str, style: AdmonitionStyle) -> Self {
		self.admonitions.insert(kind.to_ascii_uppercase(), style);
		self
	}

	#[must_use]
	pub fn with_notice(mut self, notice: bool) -> Self {
		self.notice = notice;
		self
	}
}

/// The raw-content url for `branch` of a repository page url.
pub fn raw_base_for(repository_url: &str, branch: &str) -> String {
	format!("{}/raw/{branch}", repository_url.trim_end_matches('/'))
}

/// One rewrite step of the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Rule {
	#[display("emoji")]
	Emoji,
	#[display("task-list")]
	TaskList,
	#[display("images")]
	Images,
	#[display("collapsible")]
	Collapsible,
	#[display("badges")]
	Badges,
	#[display("admonitions")]
	Admonitions,
	#[display("anchor-links")]
	AnchorLinks,
}

impl Rule {
	/// Every rule in the order the converter applies them. Admonitions must
	/// see the quoted lines before anchor links inside them are rewritten.
	pub const ALL: [Rule; 7] = [
		Rule::Emoji,
		Rule::TaskList,
		Rule::Images,
		Rule::Collapsible,
		Rule::Badges,
		Rule::Admonitions,
		Rule::AnchorLinks,
	];
}

/// Rewrites code-hosting flavored markdown into markdown that renders on the
/// package registry.
#[derive(Debug, Clone)]
pub struct DialectConverter {
	options: DialectOptions,
}

impl DialectConverter {
	pub fn new(options: DialectOptions) -> Self {
		Self { options }
	}

	pub fn options(&self) -> &DialectOptions {
		&self.options
	}

	/// Run every rule in [`Rule::ALL`] order.
	pub fn convert(&self, text: &str) -> String {
		let mut result = text.to_string();

		for rule in Rule::ALL {
			let next = self.apply_rule(rule, &result);
			let changed = next != result;
			tracing::debug!(%rule, changed, "applied dialect rule");
			result = next;
		}

		if self.options.notice {
			result.insert_str(0, CONVERSION_NOTICE);
		}

		result
	}

	/// Run a single rule.
	pub fn apply_rule(&self, rule: Rule, text: &str) -> String {
		let options = &self.options;
		match rule {
			Rule::Emoji => replace_emoji(text, &options.emoji),
			Rule::TaskList => replace_task_markers(text),
			Rule::Images => absolutize_images(text, &options.raw_base_url),
			Rule::Collapsible => flatten_details(text),
			Rule::Badges => fix_badges(text, &options.badge_base_url),
			Rule::Admonitions => {
				convert_admonitions(text, &options.admonitions, &options.fallback_admonition)
			}
			Rule::AnchorLinks => absolutize_anchor_links(text, &options.repository_url),
		}
	}
}

/// Replace each shortcode in `table` with its glyph. Unknown shortcodes are
/// left alone.
pub fn replace_emoji(text: &str, table: &BTreeMap<String, String>) -> String {
	let mut result = text.to_string();
	for (code, glyph) in table {
		if result.contains(code.as_str()) {
			result = result.replace(code.as_str(), glyph);
		}
	}
	result
}

/// Replace `[ ]` with `□` and `[x]` with `✓`.
///
/// This is plain text replacement: bracket pairs outside of task lists are
/// rewritten as well.
pub fn replace_task_markers(text: &str) -> String {
	text.replace("[ ]", "□").replace("[x]", "✓")
}

/// Whether `path` is already absolute, either with a scheme (`https:`,
/// `data:`) or protocol relative (`//host/...`).
pub fn has_url_scheme(path: &str) -> bool {
	URL_SCHEME_RE.is_match(path) || path.starts_with("//")
}

/// Join `base` and a relative `path`, dropping any leading `./` and `/`.
pub fn join_url(base: &str, path: &str) -> String {
	let mut relative = path;
	loop {
		if let Some(rest) = relative.strip_prefix("./") {
			relative = rest;
		} else if let Some(rest) = relative.strip_prefix('/') {
			relative = rest;
		} else {
			break;
		}
	}

	format!("{}/{relative}", base.trim_end_matches('/'))
}

/// Rewrite relative image paths to absolute urls under `raw_base_url`.
pub fn absolutize_images(text: &str, raw_base_url: &str) -> String {
	IMAGE_RE
		.replace_all(text, |captures: &Captures<'_>| {
			let alt = &captures[1];
			let path = &captures[2];

			if has_url_scheme(path) {
				captures[0].to_string()
			} else {
				format!("![{alt}]({})", join_url(raw_base_url, path))
			}
		})
		.into_owned()
}

/// Turn `<details>` sections into a level three heading followed by the body.
pub fn flatten_details(text: &str) -> String {
	DETAILS_RE
		.replace_all(text, |captures: &Captures<'_>| {
			format!("### {}\n\n{}", captures[1].trim(), &captures[2])
		})
		.into_owned()
}

/// Prefix badge images that have no scheme with `badge_base_url`.
pub fn fix_badges(text: &str, badge_base_url: &str) -> String {
	BADGE_RE
		.replace_all(text, |captures: &Captures<'_>| {
			let alt = &captures[1];
			let image = &captures[2];
			let link = &captures[3];

			if has_url_scheme(image) {
				captures[0].to_string()
			} else {
				format!("[![{alt}]({})]({link})", join_url(badge_base_url, image))
			}
		})
		.into_owned()
}

/// Rewrite `[text](#anchor)` links so they point at the repository page.
pub fn absolutize_anchor_links(text: &str, repository_url: &str) -> String {
	let base = repository_url.trim_end_matches('/');
	ANCHOR_LINK_RE
		.replace_all(text, |captures: &Captures<'_>| {
			format!("[{}]({base}#{})", &captures[1], &captures[2])
		})
		.into_owned()
}

/// Convert `> [!TYPE]` quoted blocks into styled html containers.
///
/// The block runs until the first line that is blank or not quoted. Quote
/// markers are removed from the body and the body is emitted as-is, so a
/// nested `> [!TYPE]` inside it is not converted.
pub fn convert_admonitions(
	text: &str,
	styles: &BTreeMap<String, AdmonitionStyle>,
	fallback: &AdmonitionStyle,
) -> String {
	let lines: Vec<&str> = text.split_inclusive('\n').collect();
	let mut result = String::with_capacity(text.len());
	let mut index = 0;

	while index < lines.len() {
		let line = lines[index];
		let Some(captures) = ADMONITION_OPEN_RE.captures(strip_line_ending(line)) else {
			result.push_str(line);
			index += 1;
			continue;
		};

		let kind = captures[1].to_ascii_uppercase();
		let mut body: Vec<&str> = Vec::new();
		let mut ending = line_ending(line);
		index += 1;

		while let Some(next) = lines.get(index) {
			let Some(content) = dequote(strip_line_ending(next)) else {
				break;
			};

			body.push(content);
			ending = line_ending(next);
			index += 1;
		}

		let style = styles.get(&kind).cloned().unwrap_or_else(|| {
			AdmonitionStyle {
				label: kind.clone(),
				..fallback.clone()
			}
		});
		tracing::debug!(kind = %kind, lines = body.len(), "converted admonition");

		result.push_str(&render_admonition(&style, &body.join("\n")));
		result.push_str(ending);
	}

	result
}

fn render_admonition(style: &AdmonitionStyle, body: &str) -> String {
	let AdmonitionStyle { icon, color, label } = style;
	format!(
		"<div style=\"background-color: #f6f8fa; border-left: 4px solid {color}; padding: 15px; \
		 margin: 15px 0; border-radius: 3px;\">\n<p style=\"margin: 0 0 10px 0; color: \
		 {color};\"><strong>{icon} {label}:</strong></p>\n\n{body}\n</div>"
	)
}

/// The content of a quoted line without its `>` marker and one following
/// space. Returns `None` for lines that are blank or not quoted.
fn dequote(line: &str) -> Option<&str> {
	if line.trim().is_empty() {
		return None;
	}

	let rest = line.strip_prefix('>')?;
	Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn strip_line_ending(line: &str) -> &str {
	let line = line.strip_suffix('\n').unwrap_or(line);
	line.strip_suffix('\r').unwrap_or(line)
}

fn line_ending(line: &str) -> &str {
	&line[strip_line_ending(line).len()..]
}
