//! Editor mode state.
//!
//! Modes are stacked so a nested context (the command line above insert
//! mode, say) returns to its parent when popped. The bottom of the stack is
//! always [`Mode::Select`].

/// How cursor input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
	/// Keys move and extend the selection.
	#[default]
	Select,
	/// Keys insert text at a degenerate selection.
	Insert,
	/// Keys edit the command line; submitting pipes the selection.
	Command,
}

impl Mode {
	/// Returns a simple string identifier for the mode.
	pub fn name(&self) -> &'static str {
		match self {
			Mode::Select => "select",
			Mode::Insert => "insert",
			Mode::Command => "command",
		}
	}
}

/// Stack of active modes with a fixed [`Mode::Select`] base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeStack {
	stack: Vec<Mode>,
}

impl Default for ModeStack {
	fn default() -> Self {
		Self {
			stack: vec![Mode::Select],
		}
	}
}

impl ModeStack {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the innermost mode.
	pub fn current(&self) -> Mode {
		self.stack.last().copied().unwrap_or_default()
	}

	pub fn push(&mut self, mode: Mode) {
		self.stack.push(mode);
	}

	/// Pops the innermost mode, returning it.
	///
	/// The base select mode is never popped; `None` is returned instead.
	pub fn pop(&mut self) -> Option<Mode> {
		if self.stack.len() > 1 {
			self.stack.pop()
		} else {
			None
		}
	}

	/// Number of stacked modes, including the base.
	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	/// Iterates modes from the base upwards.
	pub fn iter(&self) -> impl Iterator<Item = Mode> + '_ {
		self.stack.iter().copied()
	}
}
