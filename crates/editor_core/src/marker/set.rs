use std::collections::BTreeSet;

use slab::Slab;
use tracing::trace;

use super::{BufferMarker, Direction, Extent, MarkerId};

/// Ordered markers of one buffer plus its selection.
///
/// Stored markers live in an arena. Those before the high selection
/// endpoint are left-to-right and indexed in `lo`; those at or after it are
/// right-to-left and indexed in `hi`, so text typed at the cursor lands in
/// front of them. Both indexes are keyed by stored offset with the id as
/// tie-break. The selection endpoints are always left-to-right and are not
/// part of either index, and neither is the origin marker, which stays on
/// offset 0.
#[derive(Debug, Clone)]
pub struct MarkerSet {
	arena: Slab<BufferMarker>,
	lo: BTreeSet<(isize, MarkerId)>,
	hi: BTreeSet<(isize, MarkerId)>,
	origin: Option<MarkerId>,
	sel_start: BufferMarker,
	sel_finish: BufferMarker,
}

impl Default for MarkerSet {
	fn default() -> Self {
		Self::new()
	}
}

impl MarkerSet {
	/// An empty set with a cursor at the start of the buffer.
	pub fn new() -> Self {
		Self {
			arena: Slab::new(),
			lo: BTreeSet::new(),
			hi: BTreeSet::new(),
			origin: None,
			sel_start: BufferMarker::START,
			sel_finish: BufferMarker::START,
		}
	}

	/// Number of stored markers.
	pub fn len(&self) -> usize {
		self.arena.len()
	}

	pub fn is_empty(&self) -> bool {
		self.arena.is_empty()
	}

	pub fn selection(&self) -> (BufferMarker, BufferMarker) {
		(self.sel_start, self.sel_finish)
	}

	pub fn sel_start(&self) -> BufferMarker {
		self.sel_start
	}

	pub fn sel_finish(&self) -> BufferMarker {
		self.sel_finish
	}

	/// The selection endpoints in buffer order.
	pub fn sorted_selection(&self) -> (BufferMarker, BufferMarker) {
		if self.sel_start.offset <= self.sel_finish.offset {
			(self.sel_start, self.sel_finish)
		} else {
			(self.sel_finish, self.sel_start)
		}
	}

	/// The later selection endpoint.
	pub fn high(&self) -> BufferMarker {
		self.sorted_selection().1
	}

	pub fn is_degenerate(&self) -> bool {
		self.sel_start.offset == self.sel_finish.offset
	}

	/// Replaces either selection endpoint and moves stored markers across
	/// the new high endpoint as needed.
	///
	/// Endpoints are stored left-to-right whatever their given direction.
	pub fn set_selection(&mut self, start: Option<BufferMarker>, finish: Option<BufferMarker>, extent: Extent) {
		if let Some(start) = start {
			self.sel_start = start.to_ltr(extent);
		}
		if let Some(finish) = finish {
			self.sel_finish = finish.to_ltr(extent);
		}
		self.rebalance(extent);
	}

	/// Restores `lo < high <= hi` after the high endpoint moved.
	fn rebalance(&mut self, extent: Extent) {
		let high = self.high().offset;
		let len = extent.len as isize;

		while let Some(&(key, id)) = self.hi.first() {
			if len + key >= high {
				break;
			}
			self.hi.pop_first();
			let marker = &mut self.arena[id.0];
			*marker = marker.to_ltr(extent);
			self.lo.insert((marker.offset, id));
			trace!(marker = id.0, offset = marker.offset, "marker moved to low set");
		}

		while let Some(&(key, id)) = self.lo.last() {
			if key < high {
				break;
			}
			self.lo.pop_last();
			let marker = &mut self.arena[id.0];
			*marker = marker.to_rtl(extent);
			self.hi.insert((marker.offset, id));
			trace!(marker = id.0, offset = marker.offset, "marker moved to high set");
		}
	}

	/// Stores a marker, anchoring it to the side of the high endpoint it
	/// lies on. A marker on the high endpoint is anchored to the end.
	pub fn insert(&mut self, marker: BufferMarker, extent: Extent) -> MarkerId {
		let id = MarkerId(self.arena.insert(marker));
		self.place(id, marker, extent);
		id
	}

	fn place(&mut self, id: MarkerId, marker: BufferMarker, extent: Extent) {
		let high = self.high().offset as usize;
		let marker = if marker.abs_offset(extent) < high {
			marker.to_ltr(extent)
		} else {
			marker.to_rtl(extent)
		};
		self.arena[id.0] = marker;
		match marker.direction {
			Direction::LeftToRight => self.lo.insert((marker.offset, id)),
			Direction::RightToLeft => self.hi.insert((marker.offset, id)),
		};
	}

	/// Stores the marker of the start of the buffer. It is never
	/// re-anchored and no insertion moves it.
	pub fn insert_origin(&mut self) -> MarkerId {
		if let Some(id) = self.origin {
			return id;
		}
		let id = MarkerId(self.arena.insert(BufferMarker::START));
		self.origin = Some(id);
		id
	}

	fn unindex(&mut self, id: MarkerId) {
		if self.origin == Some(id) {
			self.origin = None;
			return;
		}
		let marker = self.arena[id.0];
		match marker.direction {
			Direction::LeftToRight => self.lo.remove(&(marker.offset, id)),
			Direction::RightToLeft => self.hi.remove(&(marker.offset, id)),
		};
	}

	pub fn get(&self, id: MarkerId) -> Option<&BufferMarker> {
		self.arena.get(id.0)
	}

	pub fn contains(&self, id: MarkerId) -> bool {
		self.arena.contains(id.0)
	}

	/// Moves a stored marker to a new position.
	///
	/// Returns `false` if the id is unknown or names the origin.
	pub fn reposition(&mut self, id: MarkerId, marker: BufferMarker, extent: Extent) -> bool {
		if !self.contains(id) || self.origin == Some(id) {
			return false;
		}
		self.unindex(id);
		self.place(id, marker, extent);
		true
	}

	pub fn remove(&mut self, id: MarkerId) -> Option<BufferMarker> {
		if !self.contains(id) {
			return None;
		}
		self.unindex(id);
		Some(self.arena.remove(id.0))
	}

	/// Moves every stored marker inside the selection onto its left
	/// endpoint.
	pub fn collapse_selection(&mut self) {
		let (left, _) = self.sorted_selection();
		while let Some(&(key, id)) = self.lo.last() {
			if key <= left.offset {
				break;
			}
			self.lo.pop_last();
			self.arena[id.0] = left;
			self.lo.insert((left.offset, id));
			trace!(marker = id.0, offset = left.offset, "marker collapsed");
		}
	}

	/// Ids of right-to-left markers whose relative line is `line`, in
	/// buffer order. These are the first entries of the high index.
	pub fn hi_on_line(&self, line: isize) -> Vec<MarkerId> {
		self.hi
			.iter()
			.map(|&(_, id)| id)
			.take_while(|id| self.arena[id.0].line == line)
			.collect()
	}

	pub fn set_col(&mut self, id: MarkerId, col: usize) {
		if let Some(marker) = self.arena.get_mut(id.0) {
			marker.col = col;
		}
	}

	/// Stored markers in buffer order.
	pub fn iter(&self) -> impl Iterator<Item = (MarkerId, &BufferMarker)> + '_ {
		self.origin
			.into_iter()
			.chain(self.lo.iter().chain(self.hi.iter()).map(|&(_, id)| id))
			.map(|id| (id, &self.arena[id.0]))
	}

	/// Checks the ordering between the indexes and the selection.
	#[cfg(test)]
	pub(crate) fn assert_consistent(&self, extent: Extent) {
		let high = self.high().offset as usize;
		let origin = usize::from(self.origin.is_some());
		assert_eq!(self.lo.len() + self.hi.len() + origin, self.arena.len());
		if let Some(id) = self.origin {
			assert_eq!(self.arena[id.0], BufferMarker::START);
		}
		for &(key, id) in &self.lo {
			let marker = self.arena[id.0];
			assert_eq!(marker.direction, Direction::LeftToRight);
			assert_eq!(marker.offset, key);
			assert!(marker.abs_offset(extent) < high, "{marker:?} not below high {high}");
		}
		for &(key, id) in &self.hi {
			let marker = self.arena[id.0];
			assert_eq!(marker.direction, Direction::RightToLeft);
			assert_eq!(marker.offset, key);
			assert!(marker.abs_offset(extent) >= high, "{marker:?} below high {high}");
			assert!(marker.abs_offset(extent) <= extent.len);
		}
		assert_eq!(self.sel_start.direction, Direction::LeftToRight);
		assert_eq!(self.sel_finish.direction, Direction::LeftToRight);
	}
}
