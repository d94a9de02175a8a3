use super::*;

fn sh(script: &str) -> Command {
	shell_command("/bin/sh", script)
}

fn buffer_with_gap(text: &str, gap: usize) -> GapBuffer {
	let mut buf = GapBuffer::from_text(text).unwrap();
	buf.move_gap(gap);
	buf
}

#[test]
fn filters_range_before_gap() {
	let mut buf = GapBuffer::from_text("hello world").unwrap();
	let out = buf.pipe(&mut sh("tr a-z A-Z"), 0, 5).unwrap();
	assert!(out.status.success());
	assert_eq!(out.len, 5);
	assert_eq!(buf.to_string(), "HELLO world");
}

#[test]
fn filters_range_containing_gap() {
	let mut buf = buffer_with_gap("hello world", 3);
	let out = buf.pipe(&mut sh("tr a-z A-Z"), 0, 11).unwrap();
	assert_eq!(out.len, 11);
	assert_eq!(buf.to_string(), "HELLO WORLD");
}

#[test]
fn filters_range_after_gap() {
	let mut buf = buffer_with_gap("hello world", 0);
	buf.pipe(&mut sh("tr a-z A-Z"), 6, 5).unwrap();
	assert_eq!(buf.to_string(), "hello WORLD");
}

#[test]
fn range_ending_at_gap_is_filtered() {
	let mut buf = buffer_with_gap("abc def", 3);
	buf.pipe(&mut sh("tr a-z A-Z"), 0, 3).unwrap();
	assert_eq!(buf.to_string(), "ABC def");
}

#[test]
fn shorter_output_closes_range() {
	let mut buf = buffer_with_gap("keep drop keep", 2);
	let out = buf.pipe(&mut sh("cat >/dev/null"), 5, 5).unwrap();
	assert_eq!(out.len, 0);
	assert_eq!(buf.to_string(), "keep keep");
}

#[test]
fn empty_range_receives_output() {
	let mut buf = GapBuffer::from_text("ab").unwrap();
	let out = buf.pipe(&mut sh("printf xyz"), 1, 0).unwrap();
	assert_eq!(out.len, 3);
	assert_eq!(buf.to_string(), "axyzb");
}

#[test]
fn output_ahead_of_input_is_spilled() {
	let body = "0123456789".repeat(1000);
	let text = format!("<{body}>");
	let mut buf = buffer_with_gap(&text, 0);
	let out = buf.pipe(&mut sh("printf PREFIX; cat"), 1, body.len()).unwrap();
	assert_eq!(out.len, body.len() + 6);
	assert_eq!(buf.to_string(), format!("<PREFIX{body}>"));
}

#[test]
fn output_larger_than_storage_grows_gap() {
	let mut buf = GapBuffer::from_text("ab").unwrap();
	let out = buf
		.pipe(&mut sh("cat; head -c 5000 /dev/zero | tr '\\0' x"), 0, 2)
		.unwrap();
	assert_eq!(out.len, 5002);
	assert_eq!(buf.to_string(), format!("ab{}", "x".repeat(5000)));
}

#[test]
fn early_exit_drops_remaining_input() {
	let text = "q".repeat(200_000);
	let mut buf = GapBuffer::from_text(&text).unwrap();
	let out = buf.pipe(&mut sh("head -c 3"), 0, text.len()).unwrap();
	assert_eq!(out.len, 3);
	assert_eq!(buf.to_string(), "qqq");
}

#[test]
fn failing_command_keeps_output() {
	let mut buf = GapBuffer::from_text("abc").unwrap();
	let out = buf.pipe(&mut sh("cat; echo oops >&2; exit 3"), 0, 3).unwrap();
	assert_eq!(out.status.code(), Some(3));
	assert_eq!(buf.to_string(), "abc");
}

#[test]
fn invalid_output_restores_original() {
	let mut buf = buffer_with_gap("one two three", 5);
	let err = buf.pipe(&mut sh("cat >/dev/null; printf 'ok\\377'"), 4, 3).unwrap_err();
	assert!(matches!(err, GapError::InvalidOutput { valid_up_to: 2 }));
	assert_eq!(buf.to_string(), "one two three");
}

#[test]
fn invalid_output_after_growth_restores_original() {
	let body = "0123456789".repeat(300);
	let text = format!("[{body}]");
	let mut buf = buffer_with_gap(&text, 0);
	let script = "cat; head -c 8000 /dev/zero | tr '\\0' y; printf '\\377'";
	let err = buf.pipe(&mut sh(script), 1, body.len()).unwrap_err();
	assert!(matches!(err, GapError::InvalidOutput { valid_up_to } if valid_up_to == body.len() + 8000));
	assert_eq!(buf.to_string(), text);
	assert_eq!(buf.len(), text.len());
}

#[test]
fn spawn_failure_leaves_buffer_untouched() {
	let mut buf = GapBuffer::from_text("unchanged").unwrap();
	let mut command = shell_command("/nonexistent/shell", "cat");
	let err = buf.pipe(&mut command, 0, 9).unwrap_err();
	assert!(matches!(err, GapError::Spawn(_)));
	assert_eq!(buf.to_string(), "unchanged");
}

#[test]
fn multibyte_text_survives_round_trip() {
	let text = "αβγ\n日本語\n".repeat(300);
	let mut buf = buffer_with_gap(&text, 7);
	let out = buf.pipe(&mut sh("cat"), 0, text.len()).unwrap();
	assert_eq!(out.len, text.len());
	assert_eq!(buf.to_string(), text);
}
