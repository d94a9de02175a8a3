//! Extended grapheme cluster navigation across the gap.
//!
//! Segmentation runs over the two text chunks on either side of the gap, so
//! clusters that straddle the gap are found without moving it.

use std::ops::Range;

use unicode_segmentation::{GraphemeCursor, GraphemeIncomplete};

use crate::GapBuffer;

impl GapBuffer {
	/// Returns the byte range of the grapheme cluster starting at `offset`.
	///
	/// Returns `None` at or past the end of the content.
	pub fn next_grapheme(&self, offset: usize) -> Option<Range<usize>> {
		let len = self.len();
		if offset >= len {
			return None;
		}

		let (pre, post) = self.chunks();
		let split = pre.len();
		let mut cursor = GraphemeCursor::new(offset, len, true);
		let mut in_post = offset >= split;

		loop {
			let (chunk, chunk_start) = if in_post { (post, split) } else { (pre, 0) };
			match cursor.next_boundary(chunk, chunk_start) {
				Ok(Some(end)) => return Some(offset..end),
				Ok(None) => return None,
				Err(GraphemeIncomplete::NextChunk) if !in_post => in_post = true,
				Err(GraphemeIncomplete::PreContext(end)) => {
					let (ctx, ctx_start) = context_before(pre, post, end);
					cursor.provide_context(ctx, ctx_start);
				}
				Err(_) => return None,
			}
		}
	}

	/// Returns the byte range of the grapheme cluster ending at `offset`.
	///
	/// Returns `None` at the start of the content or past its end.
	pub fn prev_grapheme(&self, offset: usize) -> Option<Range<usize>> {
		let len = self.len();
		if offset == 0 || offset > len {
			return None;
		}

		let (pre, post) = self.chunks();
		let split = pre.len();
		let mut cursor = GraphemeCursor::new(offset, len, true);
		let mut in_post = offset > split;

		loop {
			let (chunk, chunk_start) = if in_post { (post, split) } else { (pre, 0) };
			match cursor.prev_boundary(chunk, chunk_start) {
				Ok(Some(start)) => return Some(start..offset),
				Ok(None) => return None,
				Err(GraphemeIncomplete::PrevChunk) if in_post => in_post = false,
				Err(GraphemeIncomplete::PreContext(end)) => {
					let (ctx, ctx_start) = context_before(pre, post, end);
					cursor.provide_context(ctx, ctx_start);
				}
				Err(_) => return None,
			}
		}
	}

	/// Deletes the grapheme cluster before `cursor`, returning the bytes removed.
	pub fn backspace_grapheme(&mut self, cursor: usize) -> usize {
		match self.prev_grapheme(cursor) {
			Some(range) => self.delete(range.start, range.len()),
			None => 0,
		}
	}

	/// Deletes the grapheme cluster after `cursor`, returning the bytes removed.
	pub fn delete_grapheme(&mut self, cursor: usize) -> usize {
		match self.next_grapheme(cursor) {
			Some(range) => self.delete(range.start, range.len()),
			None => 0,
		}
	}
}

/// Returns the chunk that ends at logical offset `end`, with its start offset.
fn context_before<'a>(pre: &'a str, post: &'a str, end: usize) -> (&'a str, usize) {
	if end <= pre.len() {
		(&pre[..end], 0)
	} else {
		(&post[..end - pre.len()], pre.len())
	}
}
