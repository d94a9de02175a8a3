//! Single-line command input.

use kiln_gap::GapBuffer;

use crate::Result;

/// Text typed into the command line, edited at a cursor that follows the
/// typing.
#[derive(Debug, Default)]
pub struct CommandLine {
	text: GapBuffer,
	cursor: usize,
}

impl CommandLine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts typed text at the cursor.
	pub fn input(&mut self, text: &str) -> Result<()> {
		self.text.insert(self.cursor, text)?;
		self.cursor += text.len();
		Ok(())
	}

	/// Deletes the grapheme before the cursor. Returns `false` when empty.
	pub fn backspace(&mut self) -> bool {
		let removed = self.text.backspace_grapheme(self.cursor);
		self.cursor -= removed;
		removed > 0
	}

	/// Moves the cursor one grapheme left.
	pub fn move_left(&mut self) -> bool {
		match self.text.prev_grapheme(self.cursor) {
			Some(range) => {
				self.cursor = range.start;
				true
			}
			None => false,
		}
	}

	/// Moves the cursor one grapheme right.
	pub fn move_right(&mut self) -> bool {
		match self.text.next_grapheme(self.cursor) {
			Some(range) => {
				self.cursor = range.end;
				true
			}
			None => false,
		}
	}

	pub fn cursor(&self) -> usize {
		self.cursor
	}

	pub fn text(&self) -> String {
		self.text.to_string()
	}

	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}

	pub fn clear(&mut self) {
		self.text.clear();
		self.cursor = 0;
	}

	/// Returns the typed text and clears the line.
	pub fn take(&mut self) -> String {
		let text = self.text();
		self.clear();
		text
	}
}
