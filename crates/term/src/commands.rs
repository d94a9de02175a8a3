//! Subcommand execution.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use kiln_editor_core::{Buffer, Eol, Options};
use tracing::info;

use crate::cli::{Command, FileLocation, unescape};

/// Runs `command`, writing reports to `out`.
pub fn run(command: Command, options: Options, out: &mut impl Write) -> anyhow::Result<()> {
	match command {
		Command::Stats { file } => stats(&file, options, out),
		Command::Insert { location, text } => insert(&location, &unescape(&text), options),
		Command::Pipe {
			location,
			lines,
			lang,
			dry_run,
			script,
		} => {
			let buffer = pipe(&location, lines, lang, &script, options)?;
			if dry_run {
				write!(out, "{}", buffer.contents())?;
			} else {
				buffer.save()?;
			}
			Ok(())
		}
	}
}

fn stats(file: &Path, options: Options, out: &mut impl Write) -> anyhow::Result<()> {
	if !file.exists() {
		bail!("{}: no such file", file.display());
	}
	let buffer = Buffer::open(file, options)?;
	writeln!(out, "bytes: {}", buffer.len())?;
	writeln!(out, "lines: {}", buffer.line_count())?;
	writeln!(out, "eol: {}", eol_name(buffer.eol()))?;
	Ok(())
}

fn insert(location: &FileLocation, text: &str, options: Options) -> anyhow::Result<()> {
	let mut buffer = Buffer::open(&location.path, options)?;
	seek(&mut buffer, location);
	let at = buffer.cursor();
	buffer.insert_text(text)?;
	buffer.commit();
	buffer.save()?;
	info!(path = %location.path.display(), offset = at.offset, len = text.len(), "inserted");
	Ok(())
}

/// Opens the location's file and replaces `lines` lines from it with the
/// output of `script`.
fn pipe(
	location: &FileLocation,
	lines: usize,
	lang: Option<String>,
	script: &str,
	options: Options,
) -> anyhow::Result<Buffer> {
	let mut buffer = Buffer::open(&location.path, options)?;
	buffer.set_language(lang);
	seek(&mut buffer, location);

	let start = buffer.cursor().offset as usize;
	for i in 0..lines {
		buffer.select_next_line(i > 0);
	}
	let finish = buffer.cursor().offset as usize;
	buffer.select(start, finish);

	let output = buffer
		.pipe_selection(script)
		.with_context(|| format!("filtering {} through `{script}`", location.path.display()))?;
	if !output.status.success() {
		bail!("`{script}` exited with {}", output.status);
	}
	Ok(buffer)
}

/// Places the cursor at the location's line and column.
fn seek(buffer: &mut Buffer, location: &FileLocation) {
	for _ in 1..location.line.unwrap_or(1) {
		if buffer.cursor().offset as usize == buffer.len() {
			break;
		}
		buffer.select_next_line(false);
	}
	let column = location.column.unwrap_or(1).saturating_sub(1);
	buffer.move_cursor(column as isize, false);
}

fn eol_name(eol: Eol) -> &'static str {
	match eol {
		Eol::Lf => "lf",
		Eol::CrLf => "crlf",
		Eol::Cr => "cr",
		Eol::FormFeed => "form-feed",
		Eol::VerticalTab => "vertical-tab",
		Eol::NextLine => "next-line",
		Eol::LineSeparator => "line-separator",
		Eol::ParagraphSeparator => "paragraph-separator",
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use super::*;

	fn options() -> Options {
		Options {
			shell: PathBuf::from("/bin/sh"),
			..Options::default()
		}
	}

	fn location(path: &Path, line: Option<usize>, column: Option<usize>) -> FileLocation {
		FileLocation {
			path: path.to_path_buf(),
			line,
			column,
		}
	}

	#[test]
	fn stats_reports_lines_and_eol() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("crlf.txt");
		std::fs::write(&path, "a\r\nb\r\n").unwrap();

		let mut out = Vec::new();
		run(Command::Stats { file: path }, options(), &mut out).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "bytes: 6\nlines: 3\neol: crlf\n");
	}

	#[test]
	fn stats_on_missing_file_fails() {
		let dir = tempfile::tempdir().unwrap();
		let file = dir.path().join("nope");
		assert!(run(Command::Stats { file }, options(), &mut Vec::new()).is_err());
	}

	#[test]
	fn insert_at_line_and_column() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("f.txt");
		std::fs::write(&path, "one\ntwo\n").unwrap();

		insert(&location(&path, Some(2), Some(2)), "-", options()).unwrap();
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\nt-wo\n");
	}

	#[test]
	fn insert_past_last_line_appends() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("f.txt");
		std::fs::write(&path, "x\n").unwrap();

		insert(&location(&path, Some(9), None), "y\n", options()).unwrap();
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\ny\n");
	}

	#[test]
	fn pipe_replaces_selected_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("f.txt");
		std::fs::write(&path, "keep\nc\nb\na\nkeep\n").unwrap();

		let buffer = pipe(&location(&path, Some(2), None), 3, None, "sort", options()).unwrap();
		assert_eq!(buffer.contents(), "keep\na\nb\nc\nkeep\n");
		assert!(!buffer.is_selection_degenerate());
	}

	#[test]
	fn pipe_failure_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("f.txt");
		std::fs::write(&path, "text\n").unwrap();

		let err = pipe(&location(&path, None, None), 1, None, "cat; exit 3", options()).unwrap_err();
		assert!(err.to_string().contains("exited"));
	}

	#[test]
	fn dry_run_leaves_file_alone() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("f.txt");
		std::fs::write(&path, "abc\n").unwrap();

		let mut out = Vec::new();
		let command = Command::Pipe {
			location: location(&path, None, None),
			lines: 1,
			lang: Some("text".into()),
			dry_run: true,
			script: "tr a-z A-Z".into(),
		};
		run(command, options(), &mut out).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "ABC\n");
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "abc\n");
	}
}
