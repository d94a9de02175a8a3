//! UTF-8 gap buffer.
//!
//! A [`GapBuffer`] stores text in one contiguous allocation with a movable
//! hole (the gap) at the editing point. Insertions and deletions at the gap
//! are constant time; moving the gap costs a copy of the bytes between the
//! old and new position.
//!
//! Logical offsets count bytes of content and ignore the gap. Every public
//! offset must lie on a UTF-8 character boundary, and the content is always
//! valid UTF-8.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use tracing::trace;

mod error;
mod graphemes;
mod persist;
mod pipe;
mod resize;

pub use error::{GapError, Result};
pub use pipe::{PipeOutput, shell_command};
pub use resize::{QUANTUM, get_new_size};

/// Byte storage with a movable gap.
///
/// Storage layout is `[pre-gap text][gap][post-gap text]`. The gap bytes are
/// never observable through the public API.
pub struct GapBuffer {
	storage: Vec<u8>,
	gap_offset: usize,
	gap_size: usize,
}

impl Default for GapBuffer {
	fn default() -> Self {
		Self::new()
	}
}

impl GapBuffer {
	/// Creates an empty buffer with the initial storage size.
	pub fn new() -> Self {
		let size = get_new_size(0, 0);
		Self {
			storage: vec![0; size],
			gap_offset: 0,
			gap_size: size,
		}
	}

	/// Creates a buffer holding `text`, with the gap after it.
	pub fn from_text(text: &str) -> Result<Self> {
		let mut buf = Self::new();
		buf.insert(0, text)?;
		Ok(buf)
	}

	/// Length of the content in bytes.
	pub fn len(&self) -> usize {
		self.storage.len() - self.gap_size
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Size of the underlying storage, gap included.
	pub fn total_size(&self) -> usize {
		self.storage.len()
	}

	/// Logical offset of the gap.
	pub fn gap_offset(&self) -> usize {
		self.gap_offset
	}

	pub fn gap_size(&self) -> usize {
		self.gap_size
	}

	fn gap_end(&self) -> usize {
		self.gap_offset + self.gap_size
	}

	/// Maps a logical offset to its position in storage.
	fn physical(&self, offset: usize) -> usize {
		if offset < self.gap_offset {
			offset
		} else {
			offset + self.gap_size
		}
	}

	/// Returns the byte at logical `offset`.
	pub fn byte_at(&self, offset: usize) -> Option<u8> {
		if offset >= self.len() {
			return None;
		}
		Some(self.storage[self.physical(offset)])
	}

	/// Returns `true` if `offset` is the start or end of the content or
	/// starts a UTF-8 sequence.
	pub fn is_char_boundary(&self, offset: usize) -> bool {
		match self.byte_at(offset) {
			Some(byte) => (byte as i8) >= -0x40,
			None => offset == self.len(),
		}
	}

	/// Returns the text before and after the gap.
	pub fn chunks(&self) -> (&str, &str) {
		let pre = &self.storage[..self.gap_offset];
		let post = &self.storage[self.gap_end()..];
		// SAFETY: the content is valid UTF-8 and the gap only ever sits on a
		// character boundary, so each side is valid UTF-8 on its own.
		unsafe {
			(
				std::str::from_utf8_unchecked(pre),
				std::str::from_utf8_unchecked(post),
			)
		}
	}

	/// Returns the text in `range`, borrowing when it does not straddle the gap.
	///
	/// # Panics
	///
	/// Panics if the range is out of bounds or splits a character.
	pub fn slice(&self, range: Range<usize>) -> Cow<'_, str> {
		assert!(
			range.start <= range.end && range.end <= self.len(),
			"slice {range:?} out of bounds for length {}",
			self.len()
		);
		let (pre, post) = self.chunks();
		let split = pre.len();
		if range.end <= split {
			Cow::Borrowed(&pre[range])
		} else if range.start >= split {
			Cow::Borrowed(&post[range.start - split..range.end - split])
		} else {
			let mut text = String::with_capacity(range.len());
			text.push_str(&pre[range.start..]);
			text.push_str(&post[..range.end - split]);
			Cow::Owned(text)
		}
	}

	/// Copies `len` bytes starting at `start` into a new string.
	///
	/// The length is clamped to the end of the content.
	pub fn copy_range(&self, start: usize, len: usize) -> String {
		let start = start.min(self.len());
		let end = start.saturating_add(len).min(self.len());
		self.slice(start..end).into_owned()
	}

	/// Moves the gap so that it starts at logical `pos`.
	fn move_gap(&mut self, pos: usize) {
		debug_assert!(pos <= self.len());
		if pos < self.gap_offset {
			let move_len = self.gap_offset - pos;
			let dest = self.gap_end() - move_len;
			self.storage.copy_within(pos..self.gap_offset, dest);
		} else if pos > self.gap_offset {
			let move_len = pos - self.gap_offset;
			let src = self.gap_end();
			self.storage
				.copy_within(src..src + move_len, self.gap_offset);
		} else {
			return;
		}
		trace!(from = self.gap_offset, to = pos, "gap moved");
		self.gap_offset = pos;
	}

	fn assert_boundary(&self, offset: usize) {
		assert!(
			offset <= self.len(),
			"offset {offset} out of bounds for length {}",
			self.len()
		);
		assert!(
			self.is_char_boundary(offset),
			"offset {offset} is not on a character boundary"
		);
	}

	/// Inserts `text` at `cursor`, leaving the gap right after it.
	///
	/// # Errors
	///
	/// Returns [`GapError::Alloc`] if the storage cannot grow; the buffer is
	/// then unchanged.
	///
	/// # Panics
	///
	/// Panics if `cursor` is out of bounds or not on a character boundary.
	pub fn insert(&mut self, cursor: usize, text: &str) -> Result<()> {
		self.assert_boundary(cursor);
		if text.len() > self.gap_size {
			self.grow(self.len() + text.len())?;
		}
		self.move_gap(cursor);
		self.push_at_gap(text.as_bytes());
		Ok(())
	}

	/// Copies `bytes` into the start of the gap. The gap must be large enough.
	fn push_at_gap(&mut self, bytes: &[u8]) {
		let end = self.gap_offset + bytes.len();
		self.storage[self.gap_offset..end].copy_from_slice(bytes);
		self.gap_offset = end;
		self.gap_size -= bytes.len();
	}

	/// Deletes up to `len` bytes at `cursor` and returns how many were removed.
	///
	/// A cursor at or past the end removes nothing; a length running past the
	/// end is clamped.
	///
	/// # Panics
	///
	/// Panics if either end of the removed range is not on a character boundary.
	pub fn delete(&mut self, cursor: usize, len: usize) -> usize {
		if cursor >= self.len() {
			return 0;
		}
		let len = len.min(self.len() - cursor);
		self.assert_boundary(cursor);
		self.assert_boundary(cursor + len);

		self.move_gap(cursor);
		self.gap_size += len;
		self.auto_shrink();
		len
	}

	/// Removes all content and resets the storage to its initial size.
	pub fn clear(&mut self) {
		*self = Self::new();
	}
}

impl fmt::Display for GapBuffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (pre, post) = self.chunks();
		f.write_str(pre)?;
		f.write_str(post)
	}
}

impl fmt::Debug for GapBuffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (pre, post) = self.chunks();
		f.debug_struct("GapBuffer")
			.field("pre", &pre)
			.field("gap_offset", &self.gap_offset)
			.field("gap_size", &self.gap_size)
			.field("post", &post)
			.finish()
	}
}
