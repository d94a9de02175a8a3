/// A position recorded with a change: byte offset plus the line and column
/// the editor computed for it, so replay can place the cursor without
/// rescanning the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangePos {
	pub offset: usize,
	pub line: usize,
	pub col: usize,
}

impl ChangePos {
	pub const fn new(offset: usize, line: usize, col: usize) -> Self {
		Self { offset, line, col }
	}
}

/// One primitive edit.
///
/// `text` is `None` for text that was inserted between `from` and `until`;
/// replaying it deletes that range. `text` is `Some` for text that was
/// deleted from `from`; replaying it inserts the text again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
	pub from: ChangePos,
	pub until: ChangePos,
	pub text: Option<String>,
}

impl Change {
	/// Records an insertion spanning `from..until`.
	pub fn insertion(from: ChangePos, until: ChangePos) -> Self {
		Self { from, until, text: None }
	}

	/// Records the deletion of `text`, which spanned `from..until`.
	pub fn deletion(from: ChangePos, until: ChangePos, text: impl Into<String>) -> Self {
		Self {
			from,
			until,
			text: Some(text.into()),
		}
	}

	pub fn is_insertion(&self) -> bool {
		self.text.is_none()
	}

	pub fn len(&self) -> usize {
		self.until.offset - self.from.offset
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Merges `next`, logged right after `self`, into `self`.
	///
	/// Text typed at the end of an insertion extends it, and text deleted
	/// right in front of a deletion (backspacing) extends that. Both keep
	/// every recorded position valid for replay. Returns `next` unchanged
	/// when the changes cannot be merged.
	pub(crate) fn merge(&mut self, next: Change) -> Result<(), Change> {
		match (&mut self.text, next.text) {
			(None, None) if self.until.offset == next.from.offset => {
				self.until = next.until;
				Ok(())
			}
			(Some(text), Some(front)) if next.until.offset == self.from.offset => {
				text.insert_str(0, &front);
				self.from = next.from;
				Ok(())
			}
			(_, text) => Err(Change { text, ..next }),
		}
	}
}
