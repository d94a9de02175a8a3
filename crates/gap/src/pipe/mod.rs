//! Filtering a range of the buffer through an external command.
//!
//! The selected bytes are streamed to the command's standard input while its
//! output is read back into the same storage, behind the bytes already sent.
//! Output that would overtake unsent input is held in a side buffer. Once the
//! input is exhausted the gap is moved to the end of the written output and
//! the rest of the output is read straight into the gap.

use std::ffi::OsStr;
use std::io::{self, Read, Write};
use std::ops::Range;
use std::process::{ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::thread;

use tracing::{debug, trace, warn};

use crate::{GapBuffer, GapError, Result};

/// Bytes written to the command per step.
const CHUNK: usize = 512;

/// Outcome of a successful [`GapBuffer::pipe`].
#[derive(Debug, Clone, Copy)]
pub struct PipeOutput {
	/// Exit status of the command. A non-zero status still keeps the output.
	pub status: ExitStatus,
	/// Length of the text that replaced the range.
	pub len: usize,
}

/// Builds `<shell> -c <script>`.
pub fn shell_command(shell: impl AsRef<OsStr>, script: &str) -> Command {
	let mut command = Command::new(shell);
	command.arg("-c").arg(script);
	command
}

/// Streaming state shared between the input spans.
struct Feed {
	stdin: Option<ChildStdin>,
	/// Storage position where the next output byte lands.
	write_head: usize,
	/// Output that arrived while no storage was free to receive it.
	spill: Vec<u8>,
}

impl GapBuffer {
	/// Replaces `len` bytes at `start` with the output of `command` fed with
	/// those bytes.
	///
	/// Standard input and output of `command` are replaced by pipes and its
	/// standard error is discarded. The length is clamped to the end of the
	/// content.
	///
	/// # Errors
	///
	/// Fails if the command cannot be spawned, if communicating with it
	/// fails, or if its output is not valid UTF-8. The original text is put
	/// back in every case.
	///
	/// # Panics
	///
	/// Panics if either end of the range is not on a character boundary.
	pub fn pipe(&mut self, command: &mut Command, start: usize, len: usize) -> Result<PipeOutput> {
		self.assert_boundary(start);
		let len = len.min(self.len() - start);
		self.assert_boundary(start + len);

		let original = self.copy_range(start, len);
		let mut child = command
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
			.map_err(GapError::Spawn)?;

		let (Some(stdin), Some(mut stdout), Some(mut stderr)) =
			(child.stdin.take(), child.stdout.take(), child.stderr.take())
		else {
			let _ = child.kill();
			let _ = child.wait();
			return Err(GapError::Spawn(io::Error::other("child pipes were not captured")));
		};

		debug!(pid = child.id(), start, len, "filter started");
		let discard = thread::spawn(move || io::copy(&mut stderr, &mut io::sink()));

		if let Err(err) = rustix::io::ioctl_fionbio(&stdout, true) {
			drop(stdin);
			drop(stdout);
			let _ = child.kill();
			let _ = child.wait();
			let _ = discard.join();
			return Err(GapError::Pipe(err.into()));
		}

		let result = self
			.stream(stdin, &mut stdout, start, len)
			.and_then(|()| self.drain(&mut stdout));
		drop(stdout);
		if result.is_err() {
			let _ = child.kill();
		}
		let status = child.wait().map_err(GapError::Pipe);
		let _ = discard.join();

		// The output now occupies [start, gap_offset) whatever happened.
		let outcome = result.and(status).and_then(|status| {
			match std::str::from_utf8(&self.storage[start..self.gap_offset]) {
				Ok(_) => Ok(status),
				Err(err) => Err(GapError::InvalidOutput {
					valid_up_to: err.valid_up_to(),
				}),
			}
		});

		match outcome {
			Ok(status) => {
				let len = self.gap_offset - start;
				self.auto_shrink();
				if !status.success() {
					warn!(%status, "filter exited unsuccessfully");
				}
				debug!(%status, len, "filter finished");
				Ok(PipeOutput { status, len })
			}
			Err(err) => {
				warn!(error = %err, "filter failed, restoring original text");
				self.gap_size += self.gap_offset - start;
				self.gap_offset = start;
				// Storage never shrinks while piping, so the gap still has
				// room for the range it started from.
				debug_assert!(self.gap_size >= original.len());
				self.push_at_gap(original.as_bytes());
				self.auto_shrink();
				Err(err)
			}
		}
	}

	/// Feeds the range to the command and reads its output back in place.
	///
	/// On return, successful or not, the output read so far sits right
	/// before the gap starting at `start` and the unconsumed tail of the
	/// range has been absorbed into the gap. Standard input is closed.
	fn stream(&mut self, stdin: ChildStdin, stdout: &mut ChildStdout, start: usize, len: usize) -> Result<()> {
		let phys_start = self.physical(start);
		let phys_stop = self.physical(start + len);
		let gap_inside = phys_start < self.gap_offset && phys_stop > self.gap_offset;
		let spans = if gap_inside {
			[phys_start..self.gap_offset, self.gap_end()..phys_stop]
		} else {
			[phys_start..phys_stop, phys_stop..phys_stop]
		};

		let mut feed = Feed {
			stdin: Some(stdin),
			write_head: phys_start,
			spill: Vec::new(),
		};
		let mut result = Ok(());
		for span in spans {
			if let Err(err) = self.feed_span(&mut feed, stdout, span) {
				result = Err(GapError::Pipe(err));
				break;
			}
		}
		drop(feed.stdin.take());

		let write_head = feed.write_head;
		if gap_inside {
			self.gap_offset = write_head;
			self.gap_size = phys_stop - write_head;
		} else {
			let logical = if phys_start >= self.gap_end() {
				write_head - self.gap_size
			} else {
				write_head
			};
			self.move_gap(logical);
			self.gap_size += phys_stop - write_head;
		}
		trace!(written = self.gap_offset - start, spilled = feed.spill.len(), "input streamed");

		if !feed.spill.is_empty() {
			if feed.spill.len() > self.gap_size {
				self.grow(self.len() + feed.spill.len())?;
			}
			self.push_at_gap(&feed.spill);
		}
		result
	}

	/// Writes one contiguous storage span to the command in [`CHUNK`]s,
	/// collecting output after each write.
	fn feed_span(&mut self, feed: &mut Feed, stdout: &mut ChildStdout, span: Range<usize>) -> io::Result<()> {
		let mut read_from = span.start;
		while read_from < span.end {
			let Some(stdin) = feed.stdin.as_mut() else {
				break;
			};
			let end = (read_from + CHUNK).min(span.end);
			match stdin.write_all(&self.storage[read_from..end]) {
				Ok(()) => {}
				Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
					trace!("filter closed its input early");
					feed.stdin = None;
				}
				Err(err) => return Err(err),
			}
			read_from = end;
			self.collect(feed, stdout, read_from)?;
		}
		Ok(())
	}

	/// Reads whatever output is available without blocking.
	///
	/// Output lands in storage up to `limit`, the end of the bytes already
	/// sent, and in the spill buffer past it.
	fn collect(&mut self, feed: &mut Feed, stdout: &mut ChildStdout, limit: usize) -> io::Result<()> {
		let mut scratch = [0u8; CHUNK];
		loop {
			let in_place = feed.spill.is_empty() && feed.write_head < limit;
			let read = if in_place {
				stdout.read(&mut self.storage[feed.write_head..limit])
			} else {
				stdout.read(&mut scratch)
			};
			match read {
				Ok(0) => return Ok(()),
				Ok(n) if in_place => feed.write_head += n,
				Ok(n) => feed.spill.extend_from_slice(&scratch[..n]),
				Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(()),
				Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
				Err(err) => return Err(err),
			}
		}
	}

	/// Reads the remaining output into the gap until end of file.
	fn drain(&mut self, stdout: &mut ChildStdout) -> Result<()> {
		rustix::io::ioctl_fionbio(&*stdout, false).map_err(|err| GapError::Pipe(err.into()))?;
		loop {
			if self.gap_size == 0 {
				self.grow(self.total_size() + 1)?;
			}
			let gap = self.gap_offset..self.gap_end();
			match stdout.read(&mut self.storage[gap]) {
				Ok(0) => return Ok(()),
				Ok(n) => {
					self.gap_offset += n;
					self.gap_size -= n;
				}
				Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
				Err(err) => return Err(GapError::Pipe(err)),
			}
		}
	}
}

#[cfg(test)]
mod tests;
