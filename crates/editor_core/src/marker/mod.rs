//! Tracked buffer positions.
//!
//! A [`BufferMarker`] is anchored either to the start of the buffer
//! ([`Direction::LeftToRight`]) or to its end ([`Direction::RightToLeft`]).
//! Right-to-left markers store their offset and line relative to the end of
//! the buffer, so edits to their left never have to touch them. The
//! [`MarkerSet`] keeps every marker before the high selection endpoint
//! left-to-right and every marker at or after it right-to-left, which
//! means an edit at the cursor leaves all stored markers valid as they are
//! and on the text they were placed on.

use std::cmp::Ordering;

use kiln_undo::ChangePos;

mod set;

pub use set::MarkerSet;

/// Which end of the buffer a marker is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Direction {
	#[default]
	LeftToRight,
	RightToLeft,
}

impl Direction {
	/// 0 for left-to-right, 1 for right-to-left.
	fn factor(self) -> isize {
		match self {
			Direction::LeftToRight => 0,
			Direction::RightToLeft => 1,
		}
	}
}

/// Buffer dimensions needed to resolve right-to-left markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
	/// Content length in bytes.
	pub len: usize,
	/// Number of lines; an empty buffer has one.
	pub lines: usize,
}

/// A position in a buffer with its 1-based line and column.
///
/// Absolute offset is `factor * len + offset` and absolute line is
/// `factor * lines + line`, where `factor` is 0 for left-to-right and 1 for
/// right-to-left markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferMarker {
	pub direction: Direction,
	pub offset: isize,
	pub line: isize,
	pub col: usize,
}

impl Default for BufferMarker {
	fn default() -> Self {
		Self::START
	}
}

impl BufferMarker {
	/// First position of every buffer.
	pub const START: BufferMarker = BufferMarker {
		direction: Direction::LeftToRight,
		offset: 0,
		line: 1,
		col: 1,
	};

	/// A left-to-right marker at an absolute position.
	pub fn at(offset: usize, line: usize, col: usize) -> Self {
		Self {
			direction: Direction::LeftToRight,
			offset: offset as isize,
			line: line as isize,
			col,
		}
	}

	/// A right-to-left marker at the end of the buffer, on its last line.
	pub fn end(col: usize) -> Self {
		Self {
			direction: Direction::RightToLeft,
			offset: 0,
			line: 0,
			col,
		}
	}

	pub fn abs_offset(&self, extent: Extent) -> usize {
		(self.direction.factor() * extent.len as isize + self.offset) as usize
	}

	pub fn abs_line(&self, extent: Extent) -> usize {
		(self.direction.factor() * extent.lines as isize + self.line) as usize
	}

	/// Re-anchors the marker to the start of the buffer.
	pub fn to_ltr(self, extent: Extent) -> Self {
		Self::at(self.abs_offset(extent), self.abs_line(extent), self.col)
	}

	/// Re-anchors the marker to the end of the buffer.
	pub fn to_rtl(self, extent: Extent) -> Self {
		Self {
			direction: Direction::RightToLeft,
			offset: self.abs_offset(extent) as isize - extent.len as isize,
			line: self.abs_line(extent) as isize - extent.lines as isize,
			col: self.col,
		}
	}

	/// Orders markers of the same buffer: right-to-left markers after
	/// left-to-right ones, then by stored offset.
	pub fn cmp_stored(&self, other: &Self) -> Ordering {
		self.direction
			.cmp(&other.direction)
			.then(self.offset.cmp(&other.offset))
	}

	/// Absolute position as recorded in the undo history.
	pub fn change_pos(&self, extent: Extent) -> ChangePos {
		ChangePos::new(self.abs_offset(extent), self.abs_line(extent), self.col)
	}

	pub fn from_change_pos(pos: ChangePos) -> Self {
		Self::at(pos.offset, pos.line, pos.col)
	}
}

/// Stable handle to a marker in a [`MarkerSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(usize);
