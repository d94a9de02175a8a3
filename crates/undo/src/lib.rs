//! Branching undo history.
//!
//! Edits are staged as [`Change`]s on the present state until
//! [`UndoTree::commit`] freezes them into a history node. Undoing a node
//! replays its changes backwards through a [`ReplayHost`]; the inverted
//! changes produced by the replay are stored back on the node so that it
//! can be redone later. Every committed node stays reachable: committing
//! after an undo starts a new branch next to the old ones.

mod change;
mod tree;

pub use change::{Change, ChangePos};
pub use tree::{NodeId, UndoTree};

/// Buffer side of undo and redo.
///
/// The tree never touches text itself; it hands each logged change to the
/// host, which performs the edit through its normal editing path.
pub trait ReplayHost {
	/// Why an insertion could not be performed.
	type Error;

	/// Inserts `text` at `from`. `until` is where the inserted text ends.
	///
	/// An error means nothing was inserted.
	fn add(&mut self, from: ChangePos, until: ChangePos, text: &str) -> Result<(), Self::Error>;

	/// Deletes the text between `from` and `until` and returns it.
	fn delete(&mut self, from: ChangePos, until: ChangePos) -> String;
}
