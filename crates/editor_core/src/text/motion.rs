//! Grapheme and line motions of markers.
//!
//! Motions work on marker values of either direction and keep `line` and
//! `col` in step with the offset. They never touch the marker set; callers
//! store the moved marker back.

use std::ops::Range;

use kiln_gap::GapBuffer;
use kiln_primitives::graphemes::{advance_column, is_newline, width};

use super::MarkedText;
use crate::marker::BufferMarker;

/// Column of `offset`: the display width of its line up to it, plus one.
pub(crate) fn column_at(gap: &GapBuffer, offset: usize, tab_width: usize) -> usize {
	let mut line_start = offset;
	while let Some(prev) = gap.prev_grapheme(line_start) {
		if is_newline(&gap.slice(prev.clone())) {
			break;
		}
		line_start = prev.start;
	}
	advance_column(&gap.slice(line_start..offset), 1, tab_width)
}

impl MarkedText {
	pub(crate) fn grapheme_column(&self, offset: usize) -> usize {
		column_at(&self.gap, offset, self.tab_width)
	}

	fn grapheme_is_newline(&self, range: Range<usize>) -> bool {
		is_newline(&self.gap.slice(range))
	}

	/// Moves `marker` past the next grapheme and returns that grapheme's
	/// range, or `None` at the end of the buffer.
	pub(crate) fn next(&self, marker: &mut BufferMarker) -> Option<Range<usize>> {
		let range = self.gap.next_grapheme(marker.abs_offset(self.extent()))?;
		let grapheme = self.gap.slice(range.clone());
		marker.offset += range.len() as isize;
		if is_newline(&grapheme) {
			marker.line += 1;
			marker.col = 1;
		} else {
			marker.col += width(&grapheme, marker.col, self.tab_width);
		}
		Some(range)
	}

	/// Moves `marker` before the previous grapheme and returns that
	/// grapheme's range, or `None` at the start of the buffer.
	pub(crate) fn prev(&self, marker: &mut BufferMarker) -> Option<Range<usize>> {
		let range = self.gap.prev_grapheme(marker.abs_offset(self.extent()))?;
		marker.offset -= range.len() as isize;
		if self.grapheme_is_newline(range.clone()) {
			marker.line -= 1;
		}
		marker.col = self.grapheme_column(range.start);
		Some(range)
	}

	/// Moves `marker` to the start of the following line, or to the end of
	/// the buffer on the last line.
	pub(crate) fn next_line(&self, marker: &mut BufferMarker) {
		while let Some(range) = self.next(marker) {
			if self.grapheme_is_newline(range) {
				break;
			}
		}
	}

	/// Moves `marker` to the start of its line.
	pub(crate) fn start_of_line(&self, marker: &mut BufferMarker) {
		let extent = self.extent();
		while let Some(range) = self.gap.prev_grapheme(marker.abs_offset(extent)) {
			if self.grapheme_is_newline(range) {
				break;
			}
			self.prev(marker);
		}
	}

	/// Moves `marker` onto the newline that ends its line, or to the end of
	/// the buffer on the last line.
	pub(crate) fn end_of_line(&self, marker: &mut BufferMarker) {
		let extent = self.extent();
		while let Some(range) = self.gap.next_grapheme(marker.abs_offset(extent)) {
			if self.grapheme_is_newline(range) {
				break;
			}
			self.next(marker);
		}
	}
}
