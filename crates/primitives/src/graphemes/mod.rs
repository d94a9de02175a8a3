//! Grapheme classification used for line and column bookkeeping.
//!
//! Columns are 1-based display cells. A tab advances to the next tab stop,
//! East Asian wide glyphs occupy two cells and every newline grapheme starts
//! a new line.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Returns whether `grapheme` is one of the Unicode line terminators.
///
/// `"\r\n"` forms a single grapheme cluster and counts as one newline.
pub fn is_newline(grapheme: &str) -> bool {
	matches!(
		grapheme,
		"\n" | "\r" | "\r\n" | "\u{0b}" | "\u{0c}" | "\u{85}" | "\u{2028}" | "\u{2029}"
	)
}

/// Returns the number of display cells `grapheme` occupies when drawn at `col`.
///
/// Tabs expand to the next multiple of `tab_width` (counted from column 1).
/// Other graphemes take the width of their base character; control
/// characters without a defined width are drawn as a single cell.
pub fn width(grapheme: &str, col: usize, tab_width: usize) -> usize {
	if grapheme == "\t" {
		let tab_width = tab_width.max(1);
		let dest = 1 + (1 + col.saturating_sub(1) / tab_width) * tab_width;
		return dest - col;
	}

	grapheme
		.chars()
		.next()
		.map_or(0, |base| base.width().unwrap_or(1))
}

/// Counts newline graphemes in `text`.
pub fn count_newlines(text: &str) -> usize {
	text.graphemes(true).filter(|g| is_newline(g)).count()
}

/// Returns the column reached after drawing `text` starting from `col`.
///
/// A newline inside `text` resets the column to 1.
pub fn advance_column(text: &str, mut col: usize, tab_width: usize) -> usize {
	for g in text.graphemes(true) {
		if is_newline(g) {
			col = 1;
		} else {
			col += width(g, col, tab_width);
		}
	}
	col
}
