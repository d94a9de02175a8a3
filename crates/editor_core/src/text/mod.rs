//! Gap buffer text with its markers and line count kept in step.
//!
//! [`MarkedText`] owns everything an edit has to update: the characters,
//! the marker set with the selection, and the cached number of lines. It
//! implements [`ReplayHost`](kiln_undo::ReplayHost), so undo and redo go
//! through the same primitives as live edits.

use kiln_gap::GapBuffer;
use kiln_primitives::graphemes::count_newlines;

use crate::marker::{BufferMarker, Extent, MarkerId, MarkerSet};

mod edit;
mod motion;
mod pipe;

pub(crate) use edit::Removed;
pub(crate) use pipe::PipeEdit;

#[derive(Debug)]
pub(crate) struct MarkedText {
	pub(crate) gap: GapBuffer,
	pub(crate) markers: MarkerSet,
	pub(crate) lines: usize,
	pub(crate) tab_width: usize,
	buf_start: MarkerId,
	buf_end: MarkerId,
}

impl MarkedText {
	#[cfg(test)]
	pub(crate) fn new(tab_width: usize) -> Self {
		Self::with_gap(GapBuffer::new(), tab_width)
	}

	/// Wraps loaded text, with the cursor at its start and no other markers
	/// besides the buffer boundaries.
	pub(crate) fn with_gap(gap: GapBuffer, tab_width: usize) -> Self {
		let extent = Extent {
			len: gap.len(),
			lines: 1 + count_newlines(&gap.slice(0..gap.len())),
		};
		let mut markers = MarkerSet::new();
		let buf_start = markers.insert_origin();
		let end_col = motion::column_at(&gap, extent.len, tab_width);
		let buf_end = markers.insert(BufferMarker::end(end_col), extent);
		Self {
			gap,
			markers,
			lines: extent.lines,
			tab_width,
			buf_start,
			buf_end,
		}
	}

	pub(crate) fn extent(&self) -> Extent {
		Extent {
			len: self.gap.len(),
			lines: self.lines,
		}
	}

	/// Absolute, left-to-right form of a stored marker.
	pub(crate) fn resolve(&self, id: MarkerId) -> Option<BufferMarker> {
		self.markers.get(id).map(|m| m.to_ltr(self.extent()))
	}

	pub(crate) fn start_marker(&self) -> Option<BufferMarker> {
		self.resolve(self.buf_start)
	}

	pub(crate) fn end_marker(&self) -> Option<BufferMarker> {
		self.resolve(self.buf_end)
	}

	pub(crate) fn is_boundary_marker(&self, id: MarkerId) -> bool {
		id == self.buf_start || id == self.buf_end
	}

	/// Builds a marker for an absolute offset by counting lines from the
	/// start of the buffer.
	///
	/// # Panics
	///
	/// Panics if `offset` is out of bounds or not on a character boundary.
	pub(crate) fn marker_at(&self, offset: usize) -> BufferMarker {
		let line = 1 + count_newlines(&self.gap.slice(0..offset));
		BufferMarker::at(offset, line, self.grapheme_column(offset))
	}

	pub(crate) fn set_sel(&mut self, start: Option<BufferMarker>, finish: Option<BufferMarker>) {
		let extent = self.extent();
		self.markers.set_selection(start, finish, extent);
	}

	/// Stores a new tracked marker.
	pub(crate) fn add_marker(&mut self, marker: BufferMarker) -> MarkerId {
		let extent = self.extent();
		self.markers.insert(marker, extent)
	}

	/// Moves a stored marker one grapheme forward.
	pub(crate) fn advance_marker(&mut self, id: MarkerId) -> bool {
		self.step_marker(id, Self::next)
	}

	/// Moves a stored marker one grapheme back.
	pub(crate) fn retreat_marker(&mut self, id: MarkerId) -> bool {
		self.step_marker(id, Self::prev)
	}

	fn step_marker<T>(&mut self, id: MarkerId, step: impl Fn(&Self, &mut BufferMarker) -> Option<T>) -> bool {
		let Some(mut marker) = self.markers.get(id).copied() else {
			return false;
		};
		if step(self, &mut marker).is_none() {
			return false;
		}
		let extent = self.extent();
		self.markers.reposition(id, marker, extent)
	}
}

#[cfg(test)]
mod tests;
