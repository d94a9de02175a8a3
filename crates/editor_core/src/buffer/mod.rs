//! Editable buffer: text, selection, tracked markers and undo history.
//!
//! Every edit goes through the selection. Text is inserted at a
//! degenerate selection (the cursor) and deleted or filtered as the
//! selected range. Edits are logged to the [`UndoTree`] as they happen and
//! grouped into undo steps by [`Buffer::commit`].

use std::borrow::Cow;
use std::path::PathBuf;

use kiln_gap::{GapBuffer, PipeOutput, shell_command};
use kiln_primitives::{Eol, Mode, ModeStack};
use kiln_undo::{NodeId, UndoTree};
use tracing::{debug, trace};

use crate::command_line::CommandLine;
use crate::marker::{BufferMarker, MarkerId};
use crate::text::MarkedText;
use crate::{Options, Result};

mod io;

/// Environment variable carrying the buffer's language to filter commands.
pub const SRC_LANG_VAR: &str = "SRC_LANG";

/// A text buffer with its editing state.
#[derive(Debug)]
pub struct Buffer {
	text: MarkedText,
	history: UndoTree,
	options: Options,
	eol: Eol,
	path: Option<PathBuf>,
	language: Option<String>,
	modes: ModeStack,
	command_line: CommandLine,
}

impl Default for Buffer {
	fn default() -> Self {
		Self::new(Options::default())
	}
}

impl Buffer {
	/// Creates an empty buffer in select mode.
	pub fn new(options: Options) -> Self {
		Self::with_gap(GapBuffer::new(), options)
	}

	/// Creates a buffer holding `text` with the cursor at its start and an
	/// empty history.
	pub fn from_text(text: &str, options: Options) -> Result<Self> {
		Ok(Self::with_gap(GapBuffer::from_text(text)?, options))
	}

	fn with_gap(gap: GapBuffer, options: Options) -> Self {
		let text = MarkedText::with_gap(gap, options.tab_width);
		let eol = detect_eol(&text.gap).unwrap_or(options.default_eol);
		Self {
			text,
			history: UndoTree::new(),
			eol,
			options,
			path: None,
			language: None,
			modes: ModeStack::new(),
			command_line: CommandLine::new(),
		}
	}

	/// Length of the text in bytes.
	pub fn len(&self) -> usize {
		self.text.gap.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of lines; an empty buffer has one.
	pub fn line_count(&self) -> usize {
		self.text.lines
	}

	/// The whole text.
	pub fn contents(&self) -> String {
		self.text.gap.to_string()
	}

	/// The text in `range`.
	///
	/// # Panics
	///
	/// Panics if the range is out of bounds or splits a character.
	pub fn slice(&self, range: std::ops::Range<usize>) -> Cow<'_, str> {
		self.text.gap.slice(range)
	}

	/// Underlying storage, for rendering.
	pub fn storage(&self) -> &GapBuffer {
		&self.text.gap
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	/// Line terminator inserted by [`Buffer::insert_newline`].
	pub fn eol(&self) -> Eol {
		self.eol
	}

	pub fn set_eol(&mut self, eol: Eol) {
		self.eol = eol;
	}

	pub fn language(&self) -> Option<&str> {
		self.language.as_deref()
	}

	/// Sets the language exported to filter commands as `SRC_LANG`.
	pub fn set_language(&mut self, language: Option<String>) {
		self.language = language;
	}

	/// Display column of `offset`.
	///
	/// # Panics
	///
	/// Panics if `offset` is out of bounds.
	pub fn column_of(&self, offset: usize) -> usize {
		self.text.grapheme_column(offset)
	}

	/// A marker for `offset` with its line and column.
	///
	/// # Panics
	///
	/// Panics if `offset` is out of bounds or not on a character boundary.
	pub fn marker_at(&self, offset: usize) -> BufferMarker {
		self.text.marker_at(offset)
	}

	// Selection

	/// The selection as `(start, finish)`; finish is the end that moves.
	pub fn selection(&self) -> (BufferMarker, BufferMarker) {
		self.text.markers.selection()
	}

	/// The moving end of the selection.
	pub fn cursor(&self) -> BufferMarker {
		self.text.markers.sel_finish()
	}

	/// The later of the two selection endpoints.
	pub fn high_selection(&self) -> BufferMarker {
		self.text.markers.high()
	}

	pub fn is_selection_degenerate(&self) -> bool {
		self.text.markers.is_degenerate()
	}

	/// Selects from `start` to `finish`, byte offsets in either order.
	///
	/// # Panics
	///
	/// Panics if an offset is out of bounds or not on a character boundary.
	pub fn select(&mut self, start: usize, finish: usize) {
		let start = self.text.marker_at(start);
		let finish = self.text.marker_at(finish);
		self.text.set_sel(Some(start), Some(finish));
	}

	/// Sets the selection from markers; `None` keeps an endpoint.
	pub fn set_selection(&mut self, start: Option<BufferMarker>, finish: Option<BufferMarker>) {
		self.text.set_sel(start, finish);
	}

	/// Moves the cursor by `delta` graphemes, right for positive values.
	///
	/// Without `extend` the selection collapses onto the cursor. Motion
	/// stops at either end of the buffer.
	pub fn move_cursor(&mut self, delta: isize, extend: bool) {
		let mut finish = self.cursor();
		for _ in 0..delta.unsigned_abs() {
			let moved = if delta > 0 {
				self.text.next(&mut finish)
			} else {
				self.text.prev(&mut finish)
			};
			if moved.is_none() {
				break;
			}
		}
		let start = if extend { self.selection().0 } else { finish };
		self.text.set_sel(Some(start), Some(finish));
	}

	/// Moves the cursor to the start of its line.
	pub fn move_to_line_start(&mut self, extend: bool) {
		let mut finish = self.cursor();
		self.text.start_of_line(&mut finish);
		let start = if extend { None } else { Some(finish) };
		self.text.set_sel(start, Some(finish));
	}

	/// Moves the cursor onto the terminator of its line.
	pub fn move_to_line_end(&mut self, extend: bool) {
		let mut finish = self.cursor();
		self.text.end_of_line(&mut finish);
		let start = if extend { None } else { Some(finish) };
		self.text.set_sel(start, Some(finish));
	}

	/// Selects through the end of the current line, then line by line.
	///
	/// Without `extend`, or when the cursor is inside a line, the selection
	/// restarts at the beginning of the cursor's line.
	pub fn select_next_line(&mut self, extend: bool) {
		let mut next_line = self.cursor();
		let mut line_start = next_line;
		self.text.next_line(&mut next_line);

		let start = if !extend || line_start.col != 1 {
			self.text.start_of_line(&mut line_start);
			Some(line_start)
		} else {
			None
		};
		self.text.set_sel(start, Some(next_line));
	}

	/// Selects the line above the cursor's line, with the cursor at its
	/// start. With `extend` the selection start stays in place.
	pub fn select_prev_line(&mut self, extend: bool) {
		let mut line_start = self.cursor();
		self.text.start_of_line(&mut line_start);
		self.text.prev(&mut line_start);
		self.text.start_of_line(&mut line_start);

		let start = if extend {
			None
		} else {
			let mut next_line = line_start;
			self.text.next_line(&mut next_line);
			Some(next_line)
		};
		self.text.set_sel(start, Some(line_start));
	}

	// Editing

	/// Inserts `text` at the cursor and moves the cursor past it.
	///
	/// Does nothing unless the selection is degenerate.
	pub fn insert_text(&mut self, text: &str) -> Result<()> {
		if let Some((from, until)) = self.text.insert_at_cursor(text)? {
			self.history.notify_add(
				from.change_pos(self.text.extent()),
				until.change_pos(self.text.extent()),
			);
		}
		Ok(())
	}

	/// Inserts typed text, expanding tabs to spaces when an indent width
	/// is configured.
	pub fn insert_input_string(&mut self, input: &str) -> Result<()> {
		if self.options.indent_width == 0 || !input.contains('\t') {
			return self.insert_text(input);
		}
		let spaces = " ".repeat(self.options.indent_width);
		self.insert_text(&input.replace('\t', &spaces))
	}

	/// Inserts the buffer's line terminator.
	pub fn insert_newline(&mut self) -> Result<()> {
		self.insert_input_string(self.eol.as_str())
	}

	/// Deletes the selected text, leaving the cursor at its left edge.
	///
	/// Tracked markers inside the selection move to the left edge. A
	/// degenerate selection deletes nothing.
	pub fn delete_selection(&mut self) {
		if let Some(removed) = self.text.delete_selection() {
			let extent = self.text.extent();
			self.history.notify_delete(
				removed.from.change_pos(extent),
				removed.until.change_pos(extent),
				&removed.text,
			);
		}
	}

	/// Deletes the grapheme before the cursor, or only the selection when
	/// it is not degenerate.
	pub fn backspace(&mut self) {
		if self.is_selection_degenerate() {
			self.move_cursor(-1, true);
		}
		self.delete_selection();
	}

	/// Deletes the grapheme after the cursor, or only the selection when it
	/// is not degenerate.
	pub fn delete_forward(&mut self) {
		if self.is_selection_degenerate() {
			self.move_cursor(1, true);
		}
		self.delete_selection();
	}

	/// Replaces the selection with the output of `script` run by the
	/// configured shell, fed with the selected text.
	///
	/// The replacement is its own undo step. When the buffer has a
	/// language, it is exported to the command as `SRC_LANG`. On error the
	/// buffer is left unchanged.
	pub fn pipe_selection(&mut self, script: &str) -> Result<PipeOutput> {
		self.history.commit();

		let mut command = shell_command(&self.options.shell, script);
		if let Some(language) = &self.language {
			command.env(SRC_LANG_VAR, language);
		}

		let edit = self.text.pipe_selection(&mut command)?;
		let extent = self.text.extent();
		self.history.notify_delete(
			edit.from.change_pos(extent),
			edit.replaced_until.change_pos(extent),
			&edit.replaced,
		);
		self.history.notify_add(edit.from.change_pos(extent), edit.until.change_pos(extent));
		self.history.commit();

		debug!(script, replaced = edit.replaced.len(), output = edit.output.len, "selection piped");
		Ok(edit.output)
	}

	// History

	/// Closes the current undo step. Returns `false` if nothing changed
	/// since the last commit.
	pub fn commit(&mut self) -> bool {
		self.history.commit()
	}

	/// Reverts the last committed step. Returns `false` when there is
	/// nothing to undo.
	///
	/// # Errors
	///
	/// Fails if the storage cannot grow to re-insert deleted text. The
	/// buffer and its history are then left as they were.
	///
	/// # Panics
	///
	/// Panics if there are uncommitted edits.
	pub fn undo(&mut self) -> Result<bool> {
		Ok(self.history.undo(&mut self.text)?)
	}

	/// Re-applies `branch`, one of [`Buffer::futures`].
	///
	/// # Errors
	///
	/// Fails like [`Buffer::undo`], with the same guarantee.
	///
	/// # Panics
	///
	/// Panics if there are uncommitted edits or `branch` is not a future
	/// of the current step.
	pub fn redo(&mut self, branch: NodeId) -> Result<()> {
		Ok(self.history.redo(branch, &mut self.text)?)
	}

	/// Redoes the most recent branch. Returns `false` when there is none.
	///
	/// # Errors
	///
	/// Fails like [`Buffer::undo`], with the same guarantee.
	pub fn redo_latest(&mut self) -> Result<bool> {
		Ok(self.history.redo_latest(&mut self.text)?)
	}

	/// Redo branches of the current step, newest first.
	pub fn futures(&self) -> &[NodeId] {
		self.history.futures()
	}

	pub fn history(&self) -> &UndoTree {
		&self.history
	}

	// Tracked markers

	/// Starts tracking the position at `offset`.
	///
	/// # Panics
	///
	/// Panics if `offset` is out of bounds or not on a character boundary.
	pub fn add_marker(&mut self, offset: usize) -> MarkerId {
		let marker = self.text.marker_at(offset);
		self.text.add_marker(marker)
	}

	/// Starts tracking the cursor position.
	pub fn mark_cursor(&mut self) -> MarkerId {
		let cursor = self.cursor();
		self.text.add_marker(cursor)
	}

	/// Current absolute position of a tracked marker.
	pub fn marker(&self, id: MarkerId) -> Option<BufferMarker> {
		self.text.resolve(id)
	}

	/// Stops tracking a marker. The buffer's start and end markers cannot
	/// be removed.
	pub fn remove_marker(&mut self, id: MarkerId) -> Option<BufferMarker> {
		if self.text.is_boundary_marker(id) {
			return None;
		}
		let extent = self.text.extent();
		self.text.markers.remove(id).map(|m| m.to_ltr(extent))
	}

	/// Moves a tracked marker one grapheme right.
	pub fn advance_marker(&mut self, id: MarkerId) -> bool {
		!self.text.is_boundary_marker(id) && self.text.advance_marker(id)
	}

	/// Moves a tracked marker one grapheme left.
	pub fn retreat_marker(&mut self, id: MarkerId) -> bool {
		!self.text.is_boundary_marker(id) && self.text.retreat_marker(id)
	}

	/// Tracked markers in buffer order, with absolute positions. Includes
	/// the start and end markers.
	pub fn markers(&self) -> impl Iterator<Item = (MarkerId, BufferMarker)> + '_ {
		let extent = self.text.extent();
		self.text.markers.iter().map(move |(id, m)| (id, m.to_ltr(extent)))
	}

	/// Position of the start of the buffer, tracked like any marker.
	pub fn start_marker(&self) -> BufferMarker {
		self.text.start_marker().unwrap_or(BufferMarker::START)
	}

	/// Position of the end of the buffer, tracked like any marker.
	pub fn end_marker(&self) -> BufferMarker {
		self.text.end_marker().unwrap_or_else(|| self.text.marker_at(self.len()))
	}

	// Modes

	pub fn mode(&self) -> Mode {
		self.modes.current()
	}

	pub fn modes(&self) -> &ModeStack {
		&self.modes
	}

	pub fn push_mode(&mut self, mode: Mode) {
		trace!(mode = mode.name(), "push mode");
		self.modes.push(mode);
	}

	/// Leaves the current mode. The base select mode stays.
	pub fn pop_mode(&mut self) -> Option<Mode> {
		let popped = self.modes.pop();
		if let Some(mode) = popped {
			trace!(mode = mode.name(), "pop mode");
		}
		popped
	}

	/// Collapses the selection onto its start and enters insert mode.
	pub fn insert_before(&mut self) {
		let (start, _) = self.selection();
		self.text.set_sel(None, Some(start));
		self.push_mode(Mode::Insert);
	}

	/// Collapses the selection onto its finish and enters insert mode.
	pub fn insert_after(&mut self) {
		let (_, finish) = self.selection();
		self.text.set_sel(Some(finish), None);
		self.push_mode(Mode::Insert);
	}

	/// Deletes the selection and enters insert mode.
	pub fn change_selection(&mut self) {
		self.delete_selection();
		self.push_mode(Mode::Insert);
	}

	// Command line

	pub fn command_line(&self) -> &CommandLine {
		&self.command_line
	}

	pub fn command_line_mut(&mut self) -> &mut CommandLine {
		&mut self.command_line
	}

	/// Enters command mode with an empty command line.
	pub fn open_command_line(&mut self) {
		self.command_line.clear();
		self.push_mode(Mode::Command);
	}

	/// Leaves command mode, discarding the typed command.
	pub fn cancel_command_line(&mut self) {
		self.command_line.clear();
		if self.mode() == Mode::Command {
			self.pop_mode();
		}
	}

	/// Leaves command mode and pipes the selection through the typed
	/// command. An empty command does nothing.
	pub fn submit_command_line(&mut self) -> Result<Option<PipeOutput>> {
		let script = self.command_line.take();
		if self.mode() == Mode::Command {
			self.pop_mode();
		}
		if script.trim().is_empty() {
			return Ok(None);
		}
		self.pipe_selection(&script).map(Some)
	}
}

/// Returns the terminator of the first newline in `gap`.
fn detect_eol(gap: &GapBuffer) -> Option<Eol> {
	let mut offset = 0;
	while let Some(range) = gap.next_grapheme(offset) {
		if let Some(eol) = Eol::from_grapheme(&gap.slice(range.clone())) {
			return Some(eol);
		}
		offset = range.end;
	}
	None
}
