//! Error types for buffer operations.

use std::path::PathBuf;

use kiln_gap::GapError;
use thiserror::Error;

/// Errors that can occur while editing, loading or saving a buffer.
#[derive(Debug, Error)]
pub enum BufferError {
	/// The text storage rejected the operation.
	#[error(transparent)]
	Gap(#[from] GapError),

	/// Error reading or writing a file.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path of the file involved.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The buffer has no file to save to.
	#[error("buffer has no file name")]
	NoPath,

	/// Error parsing an options file.
	#[error("options parse error: {0}")]
	Config(#[from] toml::de::Error),
}

/// Result type for buffer operations.
pub type Result<T> = std::result::Result<T, BufferError>;
