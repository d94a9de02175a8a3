//! Line terminator kinds.

use serde::Deserialize;

use crate::graphemes::is_newline;

/// The line terminator a buffer inserts for a new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Eol {
	#[default]
	Lf,
	#[serde(rename = "crlf")]
	CrLf,
	Cr,
	FormFeed,
	VerticalTab,
	/// U+0085 NEXT LINE.
	NextLine,
	/// U+2028 LINE SEPARATOR.
	LineSeparator,
	/// U+2029 PARAGRAPH SEPARATOR.
	ParagraphSeparator,
}

impl Eol {
	/// Returns the terminator text.
	pub fn as_str(self) -> &'static str {
		match self {
			Eol::Lf => "\n",
			Eol::CrLf => "\r\n",
			Eol::Cr => "\r",
			Eol::FormFeed => "\u{0c}",
			Eol::VerticalTab => "\u{0b}",
			Eol::NextLine => "\u{85}",
			Eol::LineSeparator => "\u{2028}",
			Eol::ParagraphSeparator => "\u{2029}",
		}
	}

	/// Classifies a single newline grapheme.
	pub fn from_grapheme(grapheme: &str) -> Option<Self> {
		if !is_newline(grapheme) {
			return None;
		}
		Some(match grapheme {
			"\r\n" => Eol::CrLf,
			"\r" => Eol::Cr,
			"\u{0c}" => Eol::FormFeed,
			"\u{0b}" => Eol::VerticalTab,
			"\u{85}" => Eol::NextLine,
			"\u{2028}" => Eol::LineSeparator,
			"\u{2029}" => Eol::ParagraphSeparator,
			_ => Eol::Lf,
		})
	}

	/// Returns the terminator of the first newline among `graphemes`.
	pub fn detect<'a>(graphemes: impl IntoIterator<Item = &'a str>) -> Option<Self> {
		graphemes.into_iter().find_map(Self::from_grapheme)
	}
}
