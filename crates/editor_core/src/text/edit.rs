use std::ops::Range;

use kiln_gap::GapError;
use kiln_primitives::graphemes::count_newlines;
use kiln_undo::{ChangePos, ReplayHost};

use super::MarkedText;
use crate::marker::BufferMarker;

/// Text removed by [`MarkedText::delete_selection`], with the positions it
/// spanned.
#[derive(Debug)]
pub(crate) struct Removed {
	pub(crate) from: BufferMarker,
	pub(crate) until: BufferMarker,
	pub(crate) text: String,
}

impl MarkedText {
	/// Inserts `text` at a degenerate selection and moves the cursor past it.
	///
	/// Returns the cursor positions before and after the insertion, or
	/// `None` when the selection is not degenerate or `text` is empty.
	/// Stored markers need no update: those before the cursor are
	/// left-to-right, the others are anchored to the end and move with the
	/// text after it.
	pub(crate) fn insert_at_cursor(&mut self, text: &str) -> Result<Option<(BufferMarker, BufferMarker)>, GapError> {
		if !self.markers.is_degenerate() || text.is_empty() {
			return Ok(None);
		}

		let from = self.markers.sel_finish();
		let start = from.offset as usize;
		let window = self.edit_window(start..start);
		let before = self.newlines_in(window.clone());
		let lead = self.newlines_in(window.start..start);

		self.gap.insert(start, text)?;

		let after = self.newlines_in(window.start..window.end + text.len());
		self.lines = self.lines + after - before;
		let until = self.marker_after(from, window.start, lead, start + text.len());
		self.set_sel(Some(until), Some(until));
		self.recalc_hi_cols();
		Ok(Some((from, until)))
	}

	/// Deletes the selected text, leaving a cursor at its left edge.
	///
	/// Stored markers inside the selection move to the left edge. Returns
	/// `None` for a degenerate selection.
	pub(crate) fn delete_selection(&mut self) -> Option<Removed> {
		if self.markers.is_degenerate() {
			return None;
		}

		let (from, until) = self.markers.sorted_selection();
		self.markers.collapse_selection();

		let start = from.offset as usize;
		let len = (until.offset - from.offset) as usize;
		let window = self.edit_window(start..start + len);
		let before = self.newlines_in(window.clone());

		let text = self.gap.copy_range(start, len);
		self.gap.delete(start, len);

		let after = self.newlines_in(window.start..window.end - len);
		self.lines = self.lines + after - before;

		self.set_sel(Some(from), Some(from));
		self.recalc_hi_cols();
		Some(Removed { from, until, text })
	}

	/// The range from the start of the grapheme before `range` to the end of
	/// the grapheme after it: the text whose segmentation an edit of `range`
	/// can change.
	pub(crate) fn edit_window(&self, range: Range<usize>) -> Range<usize> {
		let start = self.gap.prev_grapheme(range.start).map_or(range.start, |g| g.start);
		let end = self.gap.next_grapheme(range.end).map_or(range.end, |g| g.end);
		start..end
	}

	pub(crate) fn newlines_in(&self, range: Range<usize>) -> usize {
		count_newlines(&self.gap.slice(range))
	}

	/// Marker for `offset`, the end of text just written at `from`.
	///
	/// `lead` is the number of newlines the edit window held before `from`
	/// prior to the edit; the line is recounted from the window start.
	pub(crate) fn marker_after(&self, from: BufferMarker, window_start: usize, lead: usize, offset: usize) -> BufferMarker {
		let line = from.line as usize - lead + self.newlines_in(window_start..offset);
		BufferMarker::at(offset, line, self.grapheme_column(offset))
	}

	/// Recomputes the columns of right-to-left markers on the line of the
	/// high selection endpoint, the only ones an edit there can shift
	/// sideways.
	pub(crate) fn recalc_hi_cols(&mut self) {
		let extent = self.extent();
		let line = self.markers.high().line - extent.lines as isize;
		for id in self.markers.hi_on_line(line) {
			if let Some(marker) = self.markers.get(id) {
				let col = self.grapheme_column(marker.abs_offset(extent));
				self.markers.set_col(id, col);
			}
		}
	}
}

impl ReplayHost for MarkedText {
	type Error = GapError;

	fn add(&mut self, from: ChangePos, _until: ChangePos, text: &str) -> Result<(), GapError> {
		let from = BufferMarker::from_change_pos(from);
		self.set_sel(Some(from), Some(from));
		self.insert_at_cursor(text)?;
		// Select what was restored.
		self.set_sel(Some(from), None);
		Ok(())
	}

	fn delete(&mut self, from: ChangePos, until: ChangePos) -> String {
		self.set_sel(
			Some(BufferMarker::from_change_pos(from)),
			Some(BufferMarker::from_change_pos(until)),
		);
		self.delete_selection().map(|removed| removed.text).unwrap_or_default()
	}
}
