//! Storage sizing.
//!
//! Storage grows by whole [`QUANTUM`]s when an insertion does not fit the gap
//! and shrinks only once it could have lost two quanta, keeping one quantum
//! of slack. Deleting and retyping the same text therefore never reallocates
//! on every keystroke.

use tracing::debug;

use crate::{GapBuffer, GapError, Result};

/// Allocation granularity of the storage in bytes.
pub const QUANTUM: usize = 1024;

/// Computes the storage size for a buffer of storage size `prev` that must
/// hold `req` bytes.
///
/// `get_new_size(0, 0)` is the initial storage size.
pub fn get_new_size(prev: usize, req: usize) -> usize {
	if prev == 0 && req == 0 {
		return QUANTUM;
	}

	if req > prev {
		let quanta = (req - prev).div_ceil(QUANTUM);
		return prev + quanta * QUANTUM;
	}

	if req < prev {
		let left_over = (prev - req) / QUANTUM;
		if left_over == 0 {
			return prev;
		}
		return (prev - (left_over - 1) * QUANTUM).max(QUANTUM);
	}

	prev
}

impl GapBuffer {
	/// Grows the storage so that it holds at least `req` bytes.
	///
	/// The gap absorbs the added space. On allocation failure nothing changes.
	pub(crate) fn grow(&mut self, req: usize) -> Result<()> {
		let old = self.storage.len();
		let new = get_new_size(old, req);
		if new <= old {
			return Ok(());
		}

		self.storage
			.try_reserve_exact(new - old)
			.map_err(|source| GapError::Alloc {
				requested: new,
				source,
			})?;

		let post = old - self.gap_end();
		self.storage.resize(new, 0);
		self.storage.copy_within(old - post..old, new - post);
		self.gap_size += new - old;

		debug!(old, new, len = self.len(), "gap buffer grown");
		Ok(())
	}

	/// Releases storage the content no longer needs, per [`get_new_size`].
	pub fn auto_shrink(&mut self) {
		let old = self.storage.len();
		let new = get_new_size(old, self.len());
		if new >= old {
			return;
		}

		let post = old - self.gap_end();
		self.storage.copy_within(old - post..old, new - post);
		self.storage.truncate(new);
		self.storage.shrink_to_fit();
		self.gap_size -= old - new;

		debug!(old, new, len = self.len(), "gap buffer shrunk");
	}
}
