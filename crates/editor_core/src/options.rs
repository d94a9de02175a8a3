//! Per-buffer editing options.

use std::path::{Path, PathBuf};

use kiln_primitives::Eol;
use serde::Deserialize;

use crate::{BufferError, Result};

/// Editing options, deserialized from TOML.
///
/// Missing keys take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
	/// Distance between tab stops, in columns.
	pub tab_width: usize,
	/// Spaces inserted for a typed tab. Zero keeps tabs as they are.
	pub indent_width: usize,
	/// Line terminator for buffers without one to detect.
	pub default_eol: Eol,
	/// Shell that runs filter commands as `<shell> -c <command>`.
	pub shell: PathBuf,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			tab_width: 4,
			indent_width: 0,
			default_eol: Eol::Lf,
			shell: PathBuf::from("/bin/bash"),
		}
	}
}

impl Options {
	/// Parses options from a TOML document.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses an options file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| BufferError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn empty_document_gives_defaults() {
		assert_eq!(Options::from_toml_str("").unwrap(), Options::default());
	}

	#[test]
	fn partial_document_overrides_fields() {
		let opts = Options::from_toml_str("tab_width = 8\ndefault_eol = \"crlf\"\n").unwrap();
		assert_eq!(opts.tab_width, 8);
		assert_eq!(opts.default_eol, Eol::CrLf);
		assert_eq!(opts.indent_width, 0);
		assert_eq!(opts.shell, PathBuf::from("/bin/bash"));
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = Options::from_toml_str("tabwidth = 2").unwrap_err();
		assert!(matches!(err, BufferError::Config(_)));
	}

	#[test]
	fn load_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "indent_width = 2\nshell = \"/bin/sh\"").unwrap();
		let opts = Options::load(file.path()).unwrap();
		assert_eq!(opts.indent_width, 2);
		assert_eq!(opts.shell, PathBuf::from("/bin/sh"));
	}

	#[test]
	fn missing_file_reports_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("absent.toml");
		match Options::load(&path) {
			Err(BufferError::Io { path: reported, .. }) => assert_eq!(reported, path),
			other => panic!("unexpected result: {other:?}"),
		}
	}
}
