//! Editor core: buffers with tracked markers, selections and branching
//! undo on top of a gap buffer.
//!
//! A [`Buffer`] is the collaborator-facing handle. It owns the text, the
//! selection, any number of tracked [`BufferMarker`]s and the undo
//! history. The marker machinery lives in [`marker`]; edits keep markers
//! valid without visiting each one.

mod buffer;
mod command_line;
mod error;
pub mod marker;
mod options;
mod text;

pub use buffer::{Buffer, SRC_LANG_VAR};
pub use command_line::CommandLine;
pub use error::{BufferError, Result};
pub use kiln_gap::{GapBuffer, GapError, PipeOutput};
pub use kiln_primitives::{Eol, Mode, ModeStack};
pub use kiln_undo::{ChangePos, NodeId};
pub use marker::{BufferMarker, Direction, MarkerId};
pub use options::Options;
