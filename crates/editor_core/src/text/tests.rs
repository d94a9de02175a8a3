use kiln_gap::shell_command;
use kiln_undo::{ChangePos, ReplayHost};

use super::*;
use crate::marker::Direction;

fn marked(text: &str) -> MarkedText {
	MarkedText::with_gap(GapBuffer::from_text(text).unwrap(), 4)
}

fn cursor_to(text: &mut MarkedText, offset: usize) {
	let marker = text.marker_at(offset);
	text.set_sel(Some(marker), Some(marker));
}

fn select(text: &mut MarkedText, start: usize, finish: usize) {
	let start = text.marker_at(start);
	let finish = text.marker_at(finish);
	text.set_sel(Some(start), Some(finish));
}

fn abs(text: &MarkedText, id: MarkerId) -> BufferMarker {
	text.resolve(id).unwrap()
}

#[test]
fn boundary_markers_span_the_text() {
	let text = marked("ab\ncd");
	assert_eq!(text.lines, 2);
	assert_eq!(text.start_marker(), Some(BufferMarker::START));
	assert_eq!(text.end_marker(), Some(BufferMarker::at(5, 2, 3)));
}

#[test]
fn empty_buffer_has_one_line() {
	let mut text = MarkedText::new(4);
	assert_eq!(text.lines, 1);
	assert_eq!(text.end_marker(), Some(BufferMarker::START));

	text.insert_at_cursor("hello\n").unwrap();
	assert_eq!(text.lines, 2);
	assert_eq!(text.markers.sel_finish(), BufferMarker::at(6, 2, 1));
	assert_eq!(text.end_marker(), Some(BufferMarker::at(6, 2, 1)));
	text.markers.assert_consistent(text.extent());
}

#[test]
fn insertion_leaves_markers_on_their_text() {
	let mut text = marked("one two three");
	let before = text.add_marker(text.marker_at(1));
	let after = text.add_marker(text.marker_at(8));
	cursor_to(&mut text, 4);

	text.insert_at_cursor("and\n").unwrap();
	assert_eq!(text.gap.to_string(), "one and\ntwo three");
	assert_eq!(abs(&text, before).offset, 1);
	assert_eq!(abs(&text, after), BufferMarker::at(12, 2, 5));
	text.markers.assert_consistent(text.extent());
}

#[test]
fn insertion_recomputes_columns_on_cursor_line() {
	let mut text = marked("a\tb\nc");
	let tab_stop = text.add_marker(text.marker_at(2));
	assert_eq!(abs(&text, tab_stop).col, 5);
	cursor_to(&mut text, 0);

	text.insert_at_cursor("xyzw").unwrap();
	assert_eq!(abs(&text, tab_stop), BufferMarker::at(6, 1, 9));
}

#[test]
fn deleting_selection_collapses_inner_markers() {
	let mut text = marked("l1\nl2\nl3\nl4\nl5");
	assert_eq!(text.lines, 5);
	let inside = text.add_marker(text.marker_at(4));
	let after = text.add_marker(text.marker_at(10));
	select(&mut text, 1, 7);

	let removed = text.delete_selection().unwrap();
	assert_eq!(removed.text, "1\nl2\nl");
	assert_eq!(text.lines, 3);
	assert_eq!(text.gap.to_string(), "l3\nl4\nl5");
	assert_eq!(abs(&text, inside), BufferMarker::at(1, 1, 2));
	assert_eq!(abs(&text, after), BufferMarker::at(4, 2, 2));
	assert!(text.markers.is_degenerate());
	text.markers.assert_consistent(text.extent());
}

#[test]
fn deleting_degenerate_selection_is_noop() {
	let mut text = marked("abc");
	cursor_to(&mut text, 1);
	assert!(text.delete_selection().is_none());
	assert_eq!(text.gap.to_string(), "abc");
}

#[test]
fn motion_tracks_lines_and_columns() {
	let text = marked("a\u{4e16}\tb\r\nc");
	let mut marker = BufferMarker::START;

	text.next(&mut marker).unwrap();
	assert_eq!((marker.offset, marker.col), (1, 2));
	text.next(&mut marker).unwrap();
	assert_eq!((marker.offset, marker.col), (4, 4));
	text.next(&mut marker).unwrap();
	assert_eq!((marker.offset, marker.col), (5, 5));
	text.next(&mut marker).unwrap();
	text.next(&mut marker).unwrap();
	assert_eq!(marker, BufferMarker::at(8, 2, 1));
	text.next(&mut marker).unwrap();
	assert!(text.next(&mut marker).is_none());

	text.prev(&mut marker).unwrap();
	text.prev(&mut marker).unwrap();
	assert_eq!(marker, BufferMarker::at(6, 1, 6));
	text.prev(&mut marker).unwrap();
	assert_eq!(marker, BufferMarker::at(5, 1, 5));
}

#[test]
fn line_motions() {
	let text = marked("ab\ncde\nf");
	let mut marker = text.marker_at(4);

	text.start_of_line(&mut marker);
	assert_eq!(marker, BufferMarker::at(3, 2, 1));
	text.end_of_line(&mut marker);
	assert_eq!(marker, BufferMarker::at(6, 2, 4));
	text.next_line(&mut marker);
	assert_eq!(marker, BufferMarker::at(7, 3, 1));
	text.next_line(&mut marker);
	assert_eq!(marker, BufferMarker::at(8, 3, 2));
}

#[test]
fn stored_markers_step_across_cursor() {
	let mut text = marked("abcd");
	cursor_to(&mut text, 2);
	let id = text.add_marker(text.marker_at(1));
	assert_eq!(text.markers.get(id).unwrap().direction, Direction::LeftToRight);

	assert!(text.advance_marker(id));
	assert!(text.advance_marker(id));
	assert_eq!(text.markers.get(id).unwrap().direction, Direction::RightToLeft);
	assert_eq!(abs(&text, id), BufferMarker::at(3, 1, 4));

	assert!(text.advance_marker(id));
	assert!(!text.advance_marker(id));
	assert!(text.retreat_marker(id));
	assert_eq!(abs(&text, id).offset, 3);
	text.markers.assert_consistent(text.extent());
}

#[test]
fn replay_host_round_trip() {
	let mut text = marked("hello world");
	let deleted = text.delete(ChangePos::new(5, 1, 6), ChangePos::new(11, 1, 12));
	assert_eq!(deleted, " world");
	assert_eq!(text.gap.to_string(), "hello");

	text.add(ChangePos::new(5, 1, 6), ChangePos::new(11, 1, 12), &deleted).unwrap();
	assert_eq!(text.gap.to_string(), "hello world");
	let (start, finish) = text.markers.selection();
	assert_eq!((start.offset, finish.offset), (5, 11));
	assert_eq!(finish.col, 12);
}

#[test]
fn pipe_rewrites_selection_and_line_count() {
	let mut text = marked("keep\nab\ncd\nkeep");
	let inside = text.add_marker(text.marker_at(6));
	let after = text.add_marker(text.marker_at(13));
	select(&mut text, 10, 5);

	let edit = text
		.pipe_selection(&mut shell_command("/bin/sh", "tr -d '\\n'"))
		.unwrap();
	assert_eq!(edit.replaced, "ab\ncd");
	assert_eq!(edit.output.len, 4);
	assert_eq!(text.gap.to_string(), "keep\nabcd\nkeep");
	assert_eq!(text.lines, 3);

	let (start, finish) = text.markers.selection();
	assert_eq!(start, BufferMarker::at(9, 2, 5));
	assert_eq!(finish, BufferMarker::at(5, 2, 1));
	assert_eq!(abs(&text, inside).offset, 5);
	assert_eq!(abs(&text, after), BufferMarker::at(12, 3, 3));
	text.markers.assert_consistent(text.extent());
}

#[test]
fn failed_pipe_changes_nothing() {
	let mut text = marked("abc\ndef");
	let inside = text.add_marker(text.marker_at(2));
	select(&mut text, 1, 5);

	let err = text.pipe_selection(&mut shell_command("/nonexistent/sh", "cat"));
	assert!(err.is_err());
	assert_eq!(text.gap.to_string(), "abc\ndef");
	assert_eq!(text.lines, 2);
	assert_eq!(abs(&text, inside).offset, 2);
	let (start, finish) = text.markers.selection();
	assert_eq!((start.offset, finish.offset), (1, 5));
}

#[test]
fn newline_after_lone_cr_joins_it() {
	let mut text = marked("a\r");
	assert_eq!(text.lines, 2);
	cursor_to(&mut text, 2);

	text.insert_at_cursor("\n").unwrap();
	assert_eq!(text.gap.to_string(), "a\r\n");
	assert_eq!(text.lines, 2);
	assert_eq!(text.markers.sel_finish(), BufferMarker::at(3, 2, 1));
	assert_eq!(text.end_marker(), Some(text.marker_at(3)));
	text.markers.assert_consistent(text.extent());
}

#[test]
fn splitting_crlf_adds_a_line() {
	let mut text = marked("a\r\nb");
	assert_eq!(text.lines, 2);
	let b = text.add_marker(text.marker_at(3));
	cursor_to(&mut text, 2);

	text.insert_at_cursor("x").unwrap();
	assert_eq!(text.gap.to_string(), "a\rx\nb");
	assert_eq!(text.lines, 3);
	assert_eq!(abs(&text, b), BufferMarker::at(4, 3, 1));
	assert_eq!(text.end_marker(), Some(text.marker_at(5)));

	select(&mut text, 2, 3);
	text.delete_selection().unwrap();
	assert_eq!(text.gap.to_string(), "a\r\nb");
	assert_eq!(text.lines, 2);
	assert_eq!(abs(&text, b), BufferMarker::at(3, 2, 1));
	text.markers.assert_consistent(text.extent());
}

#[test]
fn pipe_output_joining_neighbours_is_counted_once() {
	let mut text = marked("a\rb\nc");
	select(&mut text, 2, 3);

	text.pipe_selection(&mut shell_command("/bin/sh", "tr b '\\n'")).unwrap();
	assert_eq!(text.gap.to_string(), "a\r\n\nc");
	assert_eq!(text.lines, 3);
	assert_eq!(text.markers.selection().1, BufferMarker::at(3, 2, 1));
	assert_eq!(text.end_marker(), Some(text.marker_at(5)));
}

#[test]
fn marker_at_cursor_stays_on_its_character() {
	let mut placed_first = marked("abc");
	let id_first = placed_first.add_marker(placed_first.marker_at(1));
	cursor_to(&mut placed_first, 1);

	let mut placed_after = marked("abc");
	cursor_to(&mut placed_after, 1);
	let id_after = placed_after.add_marker(placed_after.marker_at(1));

	for (text, id) in [(&mut placed_first, id_first), (&mut placed_after, id_after)] {
		text.insert_at_cursor("X").unwrap();
		assert_eq!(text.gap.to_string(), "aXbc");
		assert_eq!(abs(text, id), BufferMarker::at(2, 1, 3));
		text.markers.assert_consistent(text.extent());
	}
}
