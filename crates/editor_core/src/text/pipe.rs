use std::process::Command;

use kiln_gap::{GapError, PipeOutput};

use super::MarkedText;
use crate::marker::BufferMarker;

/// A selection replaced by filter output.
#[derive(Debug)]
pub(crate) struct PipeEdit {
	pub(crate) from: BufferMarker,
	/// Where the replaced text ended.
	pub(crate) replaced_until: BufferMarker,
	pub(crate) replaced: String,
	/// Where the output ends.
	pub(crate) until: BufferMarker,
	pub(crate) output: PipeOutput,
}

impl MarkedText {
	/// Replaces the selection with the output of `command` fed with it.
	///
	/// The selection keeps its orientation and covers the output afterwards.
	/// Markers inside the selection move to its left edge. On error the
	/// text, the selection and the markers are left as they were.
	pub(crate) fn pipe_selection(&mut self, command: &mut Command) -> Result<PipeEdit, GapError> {
		let (from, replaced_until) = self.markers.sorted_selection();
		let start = from.offset as usize;
		let len = (replaced_until.offset - from.offset) as usize;
		let replaced = self.gap.copy_range(start, len);
		let window = self.edit_window(start..start + len);
		let before = self.newlines_in(window.clone());
		let lead = self.newlines_in(window.start..start);

		let output = self.gap.pipe(command, start, len)?;

		self.markers.collapse_selection();
		let after = self.newlines_in(window.start..window.end - len + output.len);
		self.lines = self.lines + after - before;

		let until = self.marker_after(from, window.start, lead, start + output.len);
		if self.markers.sel_start().offset <= self.markers.sel_finish().offset {
			self.set_sel(Some(from), Some(until));
		} else {
			self.set_sel(Some(until), Some(from));
		}
		self.recalc_hi_cols();

		Ok(PipeEdit {
			from,
			replaced_until,
			replaced,
			until,
			output,
		})
	}
}
