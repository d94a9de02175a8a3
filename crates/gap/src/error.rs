//! Error types for gap buffer operations.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Errors reported by [`GapBuffer`](crate::GapBuffer) operations.
///
/// Every failing operation leaves the logical buffer content exactly as it
/// was before the call.
#[derive(Debug, Error)]
pub enum GapError {
	/// Growing the storage failed.
	#[error("failed to allocate {requested} bytes of buffer storage")]
	Alloc {
		/// Total storage size that was requested.
		requested: usize,
		#[source]
		source: TryReserveError,
	},

	/// Reading or writing the backing file failed.
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	/// The input cannot be sized up front (a pipe or a socket).
	#[error("input does not support seeking: {0}")]
	Unseekable(#[source] io::Error),

	/// The input is not valid UTF-8.
	#[error("input is not valid UTF-8 (first invalid byte at {valid_up_to})")]
	InvalidUtf8 {
		/// Length of the valid prefix.
		valid_up_to: usize,
	},

	/// The filter command could not be started.
	#[error("failed to spawn filter command: {0}")]
	Spawn(#[source] io::Error),

	/// Communication with a running filter command failed.
	#[error("filter command I/O failed: {0}")]
	Pipe(#[source] io::Error),

	/// The filter command produced bytes that are not valid UTF-8.
	#[error("filter output is not valid UTF-8 (first invalid byte at {valid_up_to})")]
	InvalidOutput {
		/// Length of the valid prefix of the output.
		valid_up_to: usize,
	},
}

/// Result type for gap buffer operations.
pub type Result<T> = std::result::Result<T, GapError>;
