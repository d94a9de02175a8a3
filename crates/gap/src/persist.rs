//! Loading content from and saving it to byte streams.

use std::io::{self, Read, Seek, SeekFrom, Write};

use tracing::debug;

use crate::{GapBuffer, GapError, Result, get_new_size};

impl GapBuffer {
	/// Replaces the content with everything readable from `input`.
	///
	/// The input is sized by seeking, so pipes and sockets are rejected with
	/// [`GapError::Unseekable`]. The new content must be valid UTF-8. On any
	/// error the buffer keeps its previous content.
	pub fn read_from<R: Read + Seek>(&mut self, input: &mut R) -> Result<()> {
		let size = input.seek(SeekFrom::End(0)).map_err(GapError::Unseekable)?;
		input.seek(SeekFrom::Start(0)).map_err(GapError::Unseekable)?;
		let size = usize::try_from(size).map_err(|_| {
			GapError::Io(io::Error::new(
				io::ErrorKind::FileTooLarge,
				"input does not fit in memory",
			))
		})?;

		let total = get_new_size(get_new_size(0, 0), size);
		let mut storage = Vec::new();
		storage
			.try_reserve_exact(total)
			.map_err(|source| GapError::Alloc {
				requested: total,
				source,
			})?;
		input.take(size as u64).read_to_end(&mut storage)?;

		if let Err(err) = std::str::from_utf8(&storage) {
			return Err(GapError::InvalidUtf8 {
				valid_up_to: err.valid_up_to(),
			});
		}

		let len = storage.len();
		storage.resize(total.max(len), 0);
		self.gap_offset = len;
		self.gap_size = storage.len() - len;
		self.storage = storage;

		debug!(len, total = self.storage.len(), "buffer loaded");
		Ok(())
	}

	/// Writes the content to `out`: the text before the gap, then after it.
	pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
		let (pre, post) = self.chunks();
		out.write_all(pre.as_bytes())?;
		out.write_all(post.as_bytes())?;
		Ok(())
	}
}
