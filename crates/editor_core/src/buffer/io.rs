use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use kiln_gap::{GapBuffer, GapError};
use tracing::{debug, info};

use super::Buffer;
use crate::{BufferError, Options, Result};

impl Buffer {
	/// Opens the file at `path`. A missing file gives an empty buffer that
	/// saves to `path`.
	///
	/// # Errors
	///
	/// Fails if the file cannot be read, cannot be sized by seeking, or is
	/// not valid UTF-8.
	pub fn open(path: impl Into<PathBuf>, options: Options) -> Result<Self> {
		let path = path.into();
		let gap = match File::open(&path) {
			Ok(mut file) => {
				let mut gap = GapBuffer::new();
				gap.read_from(&mut file).map_err(|err| with_path(err, &path))?;
				gap
			}
			Err(error) if error.kind() == ErrorKind::NotFound => {
				debug!(path = %path.display(), "new file");
				GapBuffer::new()
			}
			Err(error) => return Err(BufferError::Io { path, error }),
		};

		let mut buffer = Self::with_gap(gap, options);
		debug!(
			path = %path.display(),
			len = buffer.len(),
			lines = buffer.line_count(),
			eol = ?buffer.eol(),
			"buffer opened"
		);
		buffer.path = Some(path);
		Ok(buffer)
	}

	/// File the buffer saves to.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Writes the text to the buffer's file.
	pub fn save(&self) -> Result<()> {
		let path = self.path.as_deref().ok_or(BufferError::NoPath)?;
		let io_err = |error| BufferError::Io {
			path: path.to_path_buf(),
			error,
		};

		let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
		self.text.gap.write_to(&mut out).map_err(|err| with_path(err, path))?;
		out.flush().map_err(io_err)?;

		info!(path = %path.display(), len = self.len(), "buffer saved");
		Ok(())
	}

	/// Binds the buffer to `path` and saves it there.
	pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
		self.path = Some(path.into());
		self.save()
	}
}

/// Attaches the file path to plain I/O failures.
fn with_path(err: GapError, path: &Path) -> BufferError {
	match err {
		GapError::Io(error) => BufferError::Io {
			path: path.to_path_buf(),
			error,
		},
		other => BufferError::Gap(other),
	}
}
