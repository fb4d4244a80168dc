use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::lexer::CommentScanner;

/// Matches a `{{ name }}` placeholder on a single line.
static PLACEHOLDER_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").unwrap_or_else(|e| panic!("{e}")));

/// A `{{ name }}` reference found in a template document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
	/// The block name with surrounding whitespace removed.
	pub name: String,
	/// Byte range of the whole `{{ … }}` span in the template.
	pub range: Range<usize>,
	/// Whether the placeholder sits inside an unclosed html comment. These
	/// are left untouched so a template can document its own syntax.
	pub inside_comment: bool,
}

/// Output of [`resolve_placeholders_with_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
	/// The template with every resolvable placeholder substituted.
	pub content: String,
	/// Number of placeholders that were replaced (including those replaced by
	/// the not-found sentinel).
	pub resolved: usize,
	/// Number of placeholders skipped because they were inside a comment.
	pub skipped: usize,
	/// Names that had no matching block in the source, in order of first
	/// appearance.
	pub missing: Vec<String>,
}

/// The text substituted for a block that could not be found.
pub fn missing_block_sentinel(name: &str) -> String {
	format!("[Block {name} not found]")
}

/// Extract the trimmed content between the first pair of `<!-- name -->`
/// markers in `source`.
///
/// Whitespace inside the marker comments is ignored and the match may span
/// any number of lines. When no pair exists the
/// [`missing_block_sentinel`] is returned so the failure shows up in the
/// generated output instead of silently disappearing.
pub fn extract_block(source: &str, name: &str) -> String {
	find_block(source, name).map_or_else(|| missing_block_sentinel(name), str::to_string)
}

/// Like [`extract_block`] but returns `None` for a missing block.
pub fn find_block<'a>(source: &'a str, name: &str) -> Option<&'a str> {
	let marker = format!(r"<!--\s*{}\s*-->", regex::escape(name));
	let pattern = format!(r"(?s){marker}(.*?){marker}");
	let re = Regex::new(&pattern).ok()?;
	let captures = re.captures(source)?;

	captures.get(1).map(|m| m.as_str().trim())
}

/// Find every placeholder in `target`, classifying each one by whether it is
/// inside an html comment.
pub fn find_placeholders(target: &str) -> Vec<Placeholder> {
	let mut scanner = CommentScanner::new(target);

	PLACEHOLDER_RE
		.captures_iter(target)
		.filter_map(|captures| {
			let whole = captures.get(0)?;
			let name = captures.get(1)?.as_str().trim().to_string();
			let inside_comment = scanner.is_inside_comment(whole.start());

			Some(Placeholder {
				name,
				range: whole.range(),
				inside_comment,
			})
		})
		.collect()
}

/// Replace every `{{ name }}` in `target` with the matching block from
/// `source`.
///
/// Placeholders inside an html comment are kept verbatim. Substituted content
/// is not scanned again, so placeholders inside an extracted block stay as
/// they are.
pub fn resolve_placeholders(target: &str, source: &str) -> String {
	resolve_placeholders_with_report(target, source).content
}

/// [`resolve_placeholders`] together with counts and the names of blocks
/// that were not found.
pub fn resolve_placeholders_with_report(target: &str, source: &str) -> Resolution {
	let placeholders = find_placeholders(target);
	let mut content = String::with_capacity(target.len());
	let mut missing: Vec<String> = Vec::new();
	let mut resolved = 0;
	let mut skipped = 0;
	let mut last = 0;

	for placeholder in placeholders {
		if placeholder.inside_comment {
			tracing::debug!(name = %placeholder.name, "skipping placeholder inside comment");
			skipped += 1;
			continue;
		}

		content.push_str(&target[last..placeholder.range.start]);

		if let Some(block) = find_block(source, &placeholder.name) {
			tracing::debug!(name = %placeholder.name, "resolved placeholder");
			content.push_str(block);
		} else {
			tracing::warn!(name = %placeholder.name, "no block found for placeholder");
			content.push_str(&missing_block_sentinel(&placeholder.name));
			if !missing.contains(&placeholder.name) {
				missing.push(placeholder.name.clone());
			}
		}

		resolved += 1;
		last = placeholder.range.end;
	}

	content.push_str(&target[last..]);

	Resolution {
		content,
		resolved,
		skipped,
		missing,
	}
}
