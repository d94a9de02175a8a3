//! CLI schema and parsing helpers for the kiln binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// A file path with an optional line and column.
///
/// Supports:
/// * `file.txt` - just a path
/// * `file.txt:42` - path with line number
/// * `file.txt:42:10` - path with line and column
///
/// Lines and columns are 1-indexed, columns count graphemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
	pub path: PathBuf,
	pub line: Option<usize>,
	pub column: Option<usize>,
}

impl FileLocation {
	/// Parses a location, falling back to a plain path.
	pub fn parse(s: &str) -> Self {
		Self::parse_colon_format(s).unwrap_or_else(|| Self {
			path: PathBuf::from(s),
			line: None,
			column: None,
		})
	}

	fn parse_colon_format(s: &str) -> Option<Self> {
		let (rest, last) = s.rsplit_once(':')?;
		let last = positive(last)?;

		if let Some((path, line)) = rest.rsplit_once(':')
			&& let Some(line) = positive(line)
			&& !path.is_empty()
		{
			return Some(Self {
				path: PathBuf::from(path),
				line: Some(line),
				column: Some(last),
			});
		}

		(!rest.is_empty()).then(|| Self {
			path: PathBuf::from(rest),
			line: Some(last),
			column: None,
		})
	}
}

fn positive(s: &str) -> Option<usize> {
	s.parse().ok().filter(|&n| n > 0)
}

impl std::str::FromStr for FileLocation {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::parse(s))
	}
}

#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(about = "Edit and filter text files through kiln buffers")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Buffer options file (TOML)
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v')]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print size, line count and line terminator of a file
	Stats {
		/// File to inspect
		file: PathBuf,
	},
	/// Insert text at a location and save
	Insert {
		/// Target as `path[:line[:col]]`
		location: FileLocation,
		/// Text to insert; `\n` and `\t` escapes are expanded
		text: String,
	},
	/// Replace lines with the output of a shell command
	Pipe {
		/// Start as `path[:line[:col]]`
		location: FileLocation,
		/// Number of lines to select from the start
		#[arg(long, short = 'n', default_value_t = 1)]
		lines: usize,
		/// Language exported to the command as SRC_LANG
		#[arg(long)]
		lang: Option<String>,
		/// Print the result instead of saving it
		#[arg(long)]
		dry_run: bool,
		/// Shell script run by the configured shell
		script: String,
	},
}

/// Expands `\n`, `\t` and `\\` in text given on the command line.
pub fn unescape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut chars = text.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}
		match chars.next() {
			Some('n') => out.push('\n'),
			Some('t') => out.push('\t'),
			Some('\\') => out.push('\\'),
			Some(other) => {
				out.push('\\');
				out.push(other);
			}
			None => out.push('\\'),
		}
	}
	out
}
