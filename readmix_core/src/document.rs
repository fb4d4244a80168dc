use std::path::Path;
use std::path::PathBuf;

use derive_more::Deref;

use crate::FileRole;
use crate::ReadmixError;
use crate::ReadmixResult;

/// The full text of a markdown file captured at a point in time.
///
/// A document is never parsed into a tree. Every operation in this crate is a
/// pattern based rewrite over the text, so the type only derefs to `str` and
/// remembers where it was read from for diagnostics.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct Document {
	#[deref(forward)]
	text: String,
	origin: Option<PathBuf>,
}

impl Document {
	/// Wrap in-memory text.
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			origin: None,
		}
	}

	/// Read a document from disk. A missing file becomes
	/// [`ReadmixError::MissingInputFile`] tagged with `role` so that callers
	/// can tell the source and template apart.
	pub fn read(path: &Path, role: FileRole) -> ReadmixResult<Self> {
		let text = std::fs::read_to_string(path).map_err(|error| {
			if error.kind() == std::io::ErrorKind::NotFound {
				ReadmixError::MissingInputFile {
					role,
					path: path.to_path_buf(),
				}
			} else {
				ReadmixError::Io(error)
			}
		})?;

		Ok(Self {
			text,
			origin: Some(path.to_path_buf()),
		})
	}

	/// Path the document was read from, if any.
	pub fn origin(&self) -> Option<&Path> {
		self.origin.as_deref()
	}

	pub fn as_str(&self) -> &str {
		&self.text
	}

	pub fn into_string(self) -> String {
		self.text
	}
}

impl From<String> for Document {
	fn from(text: String) -> Self {
		Self::new(text)
	}
}

impl From<&str> for Document {
	fn from(text: &str) -> Self {
		Self::new(text)
	}
}
