use tracing::{trace, warn};

use crate::{Change, ChangePos, ReplayHost};

/// Handle to a node of an [`UndoTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// The empty state the history starts from.
	pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug)]
struct Node {
	parent: Option<NodeId>,
	/// Children, most recently committed first.
	futures: Vec<NodeId>,
	/// Changes in replay order.
	changes: Vec<Change>,
}

/// Tree of committed edit groups plus the changes staged on top of the
/// current node.
#[derive(Debug)]
pub struct UndoTree {
	nodes: Vec<Node>,
	current: NodeId,
	/// Changes since the last commit, oldest first.
	staged: Vec<Change>,
}

impl Default for UndoTree {
	fn default() -> Self {
		Self::new()
	}
}

impl UndoTree {
	pub fn new() -> Self {
		Self {
			nodes: vec![Node {
				parent: None,
				futures: Vec::new(),
				changes: Vec::new(),
			}],
			current: NodeId::ROOT,
			staged: Vec::new(),
		}
	}

	/// Logs an insertion of the text between `from` and `until`.
	pub fn notify_add(&mut self, from: ChangePos, until: ChangePos) {
		self.stage(Change::insertion(from, until));
	}

	/// Logs the deletion of `text`, which spanned `from..until`.
	pub fn notify_delete(&mut self, from: ChangePos, until: ChangePos, text: &str) {
		self.stage(Change::deletion(from, until, text));
	}

	fn stage(&mut self, change: Change) {
		if change.is_empty() {
			return;
		}
		let change = match self.staged.last_mut() {
			Some(last) => match last.merge(change) {
				Ok(()) => return,
				Err(change) => change,
			},
			None => change,
		};
		self.staged.push(change);
	}

	/// Freezes the staged changes into a new history node.
	///
	/// Returns `false` without touching the history when nothing is staged.
	pub fn commit(&mut self) -> bool {
		if self.staged.is_empty() {
			return false;
		}

		let mut changes = std::mem::take(&mut self.staged);
		changes.reverse();

		let id = NodeId(self.nodes.len());
		self.nodes.push(Node {
			parent: Some(self.current),
			futures: Vec::new(),
			changes,
		});
		self.node_mut(self.current).futures.insert(0, id);
		trace!(node = id.0, parent = self.current.0, "undo commit");
		self.current = id;
		true
	}

	/// Reverts the current node and moves to its parent.
	///
	/// Returns `false` at the root, where there is nothing to undo.
	///
	/// # Errors
	///
	/// Returns the host's error if a change cannot be replayed. The text and
	/// the history are then as they were before the call.
	///
	/// # Panics
	///
	/// Panics if changes are staged; commit them first.
	pub fn undo<H: ReplayHost>(&mut self, host: &mut H) -> Result<bool, H::Error> {
		assert!(
			self.staged.is_empty(),
			"undo with {} uncommitted changes",
			self.staged.len()
		);

		let id = self.current;
		let Some(parent) = self.node(id).parent else {
			return Ok(false);
		};

		self.replay(id, host)?;
		trace!(node = id.0, parent = parent.0, "undo");
		self.current = parent;
		Ok(true)
	}

	/// Re-applies `branch`, which must be one of the current node's futures.
	///
	/// # Errors
	///
	/// Returns the host's error if a change cannot be replayed, leaving the
	/// text and the history unchanged.
	///
	/// # Panics
	///
	/// Panics if changes are staged or if `branch` is not a child of the
	/// current node.
	pub fn redo<H: ReplayHost>(&mut self, branch: NodeId, host: &mut H) -> Result<(), H::Error> {
		assert!(
			self.staged.is_empty(),
			"redo with {} uncommitted changes",
			self.staged.len()
		);
		assert!(
			self.node(self.current).futures.contains(&branch),
			"redo target {branch:?} is not a future of {:?}",
			self.current
		);

		self.replay(branch, host)?;
		trace!(node = branch.0, "redo");
		self.current = branch;
		Ok(())
	}

	/// Redoes the most recently committed future, if there is one.
	pub fn redo_latest<H: ReplayHost>(&mut self, host: &mut H) -> Result<bool, H::Error> {
		match self.latest_future() {
			Some(branch) => {
				self.redo(branch, host)?;
				Ok(true)
			}
			None => Ok(false),
		}
	}

	/// Applies the node's changes through `host` and stores their inverses.
	///
	/// If a change fails, the ones already applied are reverted and the
	/// node keeps its changes.
	fn replay<H: ReplayHost>(&mut self, id: NodeId, host: &mut H) -> Result<(), H::Error> {
		let changes = std::mem::take(&mut self.node_mut(id).changes);
		let mut inverted = Vec::with_capacity(changes.len());
		for change in &changes {
			match apply(change, host) {
				Ok(inverse) => inverted.push(inverse),
				Err(err) => {
					for inverse in inverted.iter().rev() {
						if apply(inverse, host).is_err() {
							warn!(node = id.0, "could not revert a partially replayed step");
							break;
						}
					}
					self.node_mut(id).changes = changes;
					return Err(err);
				}
			}
		}
		inverted.reverse();
		self.node_mut(id).changes = inverted;
		Ok(())
	}

	/// Redo branches of the current node, most recent first.
	pub fn futures(&self) -> &[NodeId] {
		&self.node(self.current).futures
	}

	pub fn latest_future(&self) -> Option<NodeId> {
		self.futures().first().copied()
	}

	pub fn current(&self) -> NodeId {
		self.current
	}

	/// Number of undo steps between the current node and the root.
	pub fn depth(&self) -> usize {
		std::iter::successors(self.node(self.current).parent, |id| self.node(*id).parent).count()
	}

	/// Total number of committed nodes, across all branches.
	pub fn len(&self) -> usize {
		self.nodes.len() - 1
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn has_staged(&self) -> bool {
		!self.staged.is_empty()
	}

	/// Changes logged since the last commit, oldest first.
	pub fn staged(&self) -> &[Change] {
		&self.staged
	}

	fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.0]
	}

	fn node_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.nodes[id.0]
	}
}

/// Performs `change` through `host` and returns the change that reverts it.
fn apply<H: ReplayHost>(change: &Change, host: &mut H) -> Result<Change, H::Error> {
	match &change.text {
		Some(text) => {
			host.add(change.from, change.until, text)?;
			Ok(Change::insertion(change.from, change.until))
		}
		None => {
			let text = host.delete(change.from, change.until);
			Ok(Change::deletion(change.from, change.until, text))
		}
	}
}
