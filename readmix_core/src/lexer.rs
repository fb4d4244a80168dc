use logos::Logos;

/// Raw tokens for the html comment markers in a document. Everything else is
/// skipped, and stray `<` or `-` characters surface as lexer errors which the
/// scanner ignores.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[^<\-]+")]
enum RawToken {
	#[token("<!--")]
	HtmlCommentOpen,
	/// `-->` along with any extra leading dashes, e.g. `---->`.
	#[regex("--+>")]
	HtmlCommentClose,
	/// `<!-->` holds both an opening and a closing marker.
	#[token("<!-->")]
	HtmlCommentOpenClose,
	/// `<!--->` also holds both markers.
	#[token("<!--->")]
	HtmlCommentOpenDashClose,
}

/// A comment marker and the byte offset where the marker ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CommentMarker {
	/// Change in comment balance (`+1` for an opening, `-1` for a closing, and
	/// `0` for the overlapping forms that hold both).
	pub delta: i32,
	/// Offset just past the marker.
	pub end: usize,
}

/// Walks a document once and reports, for increasing offsets, whether that
/// offset sits inside an html comment.
///
/// The balance is `opens - closes` over the text before the offset. A
/// position is inside a comment when the balance is positive. Queries must be
/// made with non-decreasing offsets.
pub(crate) struct CommentScanner {
	markers: Vec<CommentMarker>,
	cursor: usize,
	balance: i32,
}

impl CommentScanner {
	pub(crate) fn new(source: &str) -> Self {
		Self {
			markers: comment_markers(source),
			cursor: 0,
			balance: 0,
		}
	}

	/// Whether `offset` is preceded by more comment openings than closings.
	pub(crate) fn is_inside_comment(&mut self, offset: usize) -> bool {
		while let Some(marker) = self.markers.get(self.cursor) {
			if marker.end > offset {
				break;
			}

			self.balance += marker.delta;
			self.cursor += 1;
		}

		self.balance > 0
	}
}

/// Tokenize the comment markers of `source` in order.
pub(crate) fn comment_markers(source: &str) -> Vec<CommentMarker> {
	RawToken::lexer(source)
		.spanned()
		.filter_map(|(token, span)| {
			let delta = match token.ok()? {
				RawToken::HtmlCommentOpen => 1,
				RawToken::HtmlCommentClose => -1,
				RawToken::HtmlCommentOpenClose | RawToken::HtmlCommentOpenDashClose => 0,
			};

			Some(CommentMarker {
				delta,
				end: span.end,
			})
		})
		.collect()
}
