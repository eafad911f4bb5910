//! The Editing API: motions and the three mutating operations.
//!
//! Every motion takes a store and a [`Selection`] and returns the updated
//! selection; none of them can fail. The mutating operations at the bottom
//! are the only callers of [`TextStore::insert`]/[`TextStore::remove`] and
//! surface the store's strict [`BufferError`]s unchanged.
//!
//! A "word" is a maximal run of alphanumeric-or-underscore codepoints.
//! Word motions stop hard at the first/last codepoint; they never wrap.

use crate::buffer::{BufferError, TextStore};
use crate::position::Position;
use crate::selection::Selection;

pub fn forward_character<S: TextStore>(store: &S, mut sel: Selection) -> Selection {
    let pos = store.next_position(sel.cursor);
    sel.move_to(pos);
    sel
}

pub fn backward_character<S: TextStore>(store: &S, mut sel: Selection) -> Selection {
    let pos = store.previous_position(sel.cursor);
    sel.move_to(pos);
    sel
}

pub fn beginning_of_line<S: TextStore>(store: &S, mut sel: Selection) -> Selection {
    let pos = store.line_start_position(sel.cursor);
    sel.move_to(pos);
    sel
}

pub fn end_of_line<S: TextStore>(store: &S, mut sel: Selection) -> Selection {
    let pos = store.line_end_position(sel.cursor);
    sel.move_to(pos);
    sel
}

/// First codepoint of the line that is not a space or tab; the line's
/// terminating newline when the line is blank.
pub fn first_non_blank_of_line<S: TextStore>(store: &S, mut sel: Selection) -> Selection {
    let mut pos = store.line_start_position(sel.cursor);
    while !store.is_newline_at(pos.offset)
        && matches!(store.codepoint_at(pos.offset), Some(' ') | Some('\t'))
    {
        let next = store.next_position(pos);
        if next.offset == pos.offset {
            break;
        }
        pos = next;
    }
    sel.move_to(pos);
    sel
}

pub fn beginning_of_buffer<S: TextStore>(store: &S, mut sel: Selection) -> Selection {
    sel.move_to(store.position_at_offset(0));
    sel
}

pub fn end_of_buffer<S: TextStore>(store: &S, mut sel: Selection) -> Selection {
    sel.move_to(store.position_at_offset(usize::MAX));
    sel
}

pub fn next_line<S: TextStore>(store: &S, sel: Selection) -> Selection {
    vertical(store, sel, 1)
}

pub fn previous_line<S: TextStore>(store: &S, sel: Selection) -> Selection {
    vertical(store, sel, -1)
}

/// One step of a vertical chain.
///
/// The first step captures either the current column or, when the cursor
/// sits on a newline unit, the newline flag (which wins on landing). Later
/// steps reuse the memory so crossing a short line does not lose the
/// column. Off the first/last line the step is a no-op.
fn vertical<S: TextStore>(store: &S, mut sel: Selection, delta: isize) -> Selection {
    let cursor = store.resolve(sel.cursor);
    if !sel.has_transients() {
        if store.is_newline_at(cursor.offset) {
            sel.transient_newline = true;
        } else {
            sel.transient_column = cursor.column();
        }
    }
    let line = cursor.line().unwrap_or(1);
    let last_line = store.position_at_offset(usize::MAX).line().unwrap_or(1);
    let target = if delta > 0 {
        if line >= last_line {
            sel.move_to(cursor);
            return sel;
        }
        line + 1
    } else {
        if line <= 1 {
            sel.move_to(cursor);
            return sel;
        }
        line - 1
    };
    let landing = if sel.transient_newline {
        store.line_end_position(store.position_at(target, 1))
    } else {
        store.position_at(target, sel.transient_column.unwrap_or(1))
    };
    sel.move_to(landing);
    sel
}

fn is_word_at<S: TextStore>(store: &S, offset: usize) -> bool {
    store
        .codepoint_at(offset)
        .is_some_and(|ch| ch == '_' || ch.is_alphanumeric())
}

/// A word codepoint whose successor is not a word codepoint.
fn is_word_end_at<S: TextStore>(store: &S, offset: usize) -> bool {
    if !is_word_at(store, offset) {
        return false;
    }
    let next = store.next_position(Position::at(offset)).offset;
    next == offset || !is_word_at(store, next)
}

/// A word codepoint whose predecessor is not a word codepoint.
fn is_word_begin_at<S: TextStore>(store: &S, offset: usize) -> bool {
    if !is_word_at(store, offset) {
        return false;
    }
    offset == 0 || !is_word_at(store, store.previous_position(Position::at(offset)).offset)
}

/// First codepoint of the next word (the `w` of modal editors).
pub fn next_word_start<S: TextStore>(store: &S, mut sel: Selection) -> Selection {
    let last = store.last_offset();
    let mut pos = store.resolve(sel.cursor);
    while pos.offset < last && is_word_at(store, pos.offset) {
        pos = store.next_position(pos);
    }
    while pos.offset < last && !is_word_at(store, pos.offset) {
        pos = store.next_position(pos);
    }
    sel.move_to(pos);
    sel
}

/// Last codepoint of the previous word (`ge`).
pub fn previous_word_end<S: TextStore>(store: &S, mut sel: Selection) -> Selection {
    let mut pos = store.resolve(sel.cursor);
    if pos.offset > 0 {
        pos = store.previous_position(pos);
        while pos.offset > 0 && !is_word_end_at(store, pos.offset) {
            pos = store.previous_position(pos);
        }
    }
    sel.move_to(pos);
    sel
}

/// First codepoint of the current word, or of the word before when the
/// cursor already sits at a word start (`b`).
pub fn word_start<S: TextStore>(store: &S, mut sel: Selection) -> Selection {
    let mut pos = store.resolve(sel.cursor);
    if pos.offset > 0 {
        pos = store.previous_position(pos);
        while pos.offset > 0 && !is_word_begin_at(store, pos.offset) {
            pos = store.previous_position(pos);
        }
    }
    sel.move_to(pos);
    sel
}

/// Last codepoint of the current word, or of the next word when the
/// cursor already sits at a word end (`e`).
pub fn word_end<S: TextStore>(store: &S, mut sel: Selection) -> Selection {
    let last = store.last_offset();
    let mut pos = store.resolve(sel.cursor);
    if pos.offset < last {
        pos = store.next_position(pos);
        while pos.offset < last && !is_word_end_at(store, pos.offset) {
            pos = store.next_position(pos);
        }
    }
    sel.move_to(pos);
    sel
}

/// Insert one codepoint at the cursor; the cursor lands right after it.
pub fn insert_character<S: TextStore>(
    store: &mut S,
    mut sel: Selection,
    ch: char,
) -> Result<Selection, BufferError> {
    let mut utf8 = [0u8; 4];
    let bytes = ch.encode_utf8(&mut utf8).as_bytes();
    store.insert(sel.cursor.offset, bytes)?;
    sel.move_to(store.position_at_offset(sel.cursor.offset + bytes.len()));
    Ok(sel)
}

/// Insert the buffer's own newline unit; the cursor lands at the start of
/// the following line.
pub fn insert_newline<S: TextStore>(
    store: &mut S,
    mut sel: Selection,
) -> Result<Selection, BufferError> {
    let ending = store.line_ending();
    store.insert(sel.cursor.offset, ending.as_bytes())?;
    sel.move_to(store.position_at_offset(sel.cursor.offset + ending.len()));
    Ok(sel)
}

/// Remove the unit under the cursor; the cursor stays at the same offset,
/// healed when it now sits past the last codepoint.
pub fn remove_character_forward<S: TextStore>(
    store: &mut S,
    mut sel: Selection,
) -> Result<Selection, BufferError> {
    store.remove(sel.cursor.offset, sel.cursor.offset)?;
    sel.move_to(store.position_at_offset(sel.cursor.offset));
    Ok(sel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::position::LineEnding;

    fn unix(text: &str) -> Buffer {
        Buffer::from_str(text, LineEnding::Unix)
    }

    fn sel_at(buf: &Buffer, offset: usize) -> Selection {
        Selection::at(buf.position_at_offset(offset))
    }

    #[test]
    fn test_forward_backward_character() {
        let buf = unix("aé\nb");
        let sel = sel_at(&buf, 0);
        let sel = forward_character(&buf, sel);
        assert_eq!(sel.cursor.offset, 1);
        let sel = forward_character(&buf, sel);
        assert_eq!(sel.cursor.offset, 3); // skipped é's continuation byte
        let sel = backward_character(&buf, sel);
        assert_eq!(sel.cursor.offset, 1);
    }

    #[test]
    fn test_motion_clamps_at_buffer_edges() {
        let buf = unix("ab");
        let sel = forward_character(&buf, sel_at(&buf, 1));
        assert_eq!(sel.cursor.offset, 1);
        let sel = backward_character(&buf, sel_at(&buf, 0));
        assert_eq!(sel.cursor.offset, 0);
    }

    #[test]
    fn test_first_non_blank() {
        let buf = unix("  \thello\n   \nx");
        let sel = first_non_blank_of_line(&buf, sel_at(&buf, 1));
        assert_eq!(sel.cursor.offset, 3);
        // Blank line: lands on its newline.
        let sel = first_non_blank_of_line(&buf, sel_at(&buf, 10));
        assert_eq!(sel.cursor.offset, 12);
    }

    #[test]
    fn test_buffer_edges() {
        let buf = unix("abc\ndef");
        let sel = end_of_buffer(&buf, sel_at(&buf, 0));
        assert_eq!(sel.cursor.offset, 6);
        assert_eq!(sel.cursor.line(), Some(2));
        let sel = beginning_of_buffer(&buf, sel);
        assert_eq!(sel.cursor.offset, 0);
        assert_eq!(sel.cursor.column(), Some(1));
    }

    #[test]
    fn test_vertical_chain_remembers_column() {
        // Line 2 is shorter than the starting column; line 3 is long again.
        let buf = unix("abcdef\nxy\nabcdef");
        let sel = sel_at(&buf, 4); // column 5 on line 1
        let sel = next_line(&buf, sel);
        assert_eq!(sel.transient_column, Some(5));
        // Line 2 has columns 1..=3 (x, y, newline): clamped to the newline.
        assert_eq!(sel.cursor.offset, 9);
        let sel = next_line(&buf, sel);
        // Line 3 is long enough: back on column 5.
        assert_eq!(sel.cursor.column(), Some(5));
        assert_eq!(sel.cursor.offset, 14);
    }

    #[test]
    fn test_vertical_chain_newline_memory() {
        let buf = unix("ab\ncdef\ngh");
        let sel = sel_at(&buf, 2); // on the first newline
        let sel = next_line(&buf, sel);
        assert!(sel.transient_newline);
        // Lands on line 2's terminating newline, not column 3.
        assert_eq!(sel.cursor.offset, 7);
        let sel = next_line(&buf, sel);
        // Final line has no newline: its last codepoint.
        assert_eq!(sel.cursor.offset, 9);
    }

    #[test]
    fn test_vertical_no_op_at_edges() {
        let buf = unix("ab\ncd");
        let sel = previous_line(&buf, sel_at(&buf, 1));
        assert_eq!(sel.cursor.offset, 1);
        let sel = next_line(&buf, sel_at(&buf, 4));
        assert_eq!(sel.cursor.offset, 4);
    }

    #[test]
    fn test_reset_breaks_vertical_chain() {
        let buf = unix("abcdef\nx\nabcdef");
        let mut sel = next_line(&buf, sel_at(&buf, 5));
        assert_eq!(sel.transient_column, Some(6));
        sel.reset_transients();
        let sel = next_line(&buf, sel);
        // New chain starts from the landed column, not the old one.
        assert_ne!(sel.transient_column, Some(6));
    }

    #[test]
    fn test_next_word_start() {
        let buf = unix("foo_1  bar!baz");
        let sel = next_word_start(&buf, sel_at(&buf, 0));
        assert_eq!(sel.cursor.offset, 7); // bar
        let sel = next_word_start(&buf, sel);
        assert_eq!(sel.cursor.offset, 11); // baz
        // Hard stop at the last codepoint, no wrap.
        let sel = next_word_start(&buf, sel);
        assert_eq!(sel.cursor.offset, 13);
    }

    #[test]
    fn test_previous_word_end() {
        let buf = unix("foo  bar");
        let sel = previous_word_end(&buf, sel_at(&buf, 6));
        assert_eq!(sel.cursor.offset, 2); // second o of foo
        let sel = previous_word_end(&buf, sel);
        assert_eq!(sel.cursor.offset, 0); // hard stop
    }

    #[test]
    fn test_word_start_and_end() {
        let buf = unix("alpha beta");
        // From mid-word to its start.
        let sel = word_start(&buf, sel_at(&buf, 8));
        assert_eq!(sel.cursor.offset, 6);
        // From a word start to the previous word's start.
        let sel = word_start(&buf, sel);
        assert_eq!(sel.cursor.offset, 0);
        // From mid-word to its end.
        let sel = word_end(&buf, sel_at(&buf, 1));
        assert_eq!(sel.cursor.offset, 4);
        // From a word end to the next word's end.
        let sel = word_end(&buf, sel);
        assert_eq!(sel.cursor.offset, 9);
    }

    #[test]
    fn test_word_motion_over_unicode() {
        let buf = unix("deň je");
        // ň is alphanumeric: the word run covers it.
        let sel = next_word_start(&buf, sel_at(&buf, 0));
        assert_eq!(sel.cursor.offset, 5);
    }

    #[test]
    fn test_insert_character_repositions() {
        let mut buf = unix("ac");
        let sel = Selection::at(buf.position_at_offset(1));
        let sel = insert_character(&mut buf, sel, 'b').unwrap();
        assert_eq!(buf.text(), "abc");
        assert_eq!(sel.cursor.offset, 2);
        assert_eq!(sel.cursor.column(), Some(3));
    }

    #[test]
    fn test_insert_newline_uses_buffer_ending() {
        let mut buf = Buffer::from_str("ab", LineEnding::Dos);
        let sel = Selection::at(buf.position_at_offset(1));
        let sel = insert_newline(&mut buf, sel).unwrap();
        assert_eq!(buf.text(), "a\r\nb");
        assert_eq!(sel.cursor.offset, 3);
        assert_eq!(sel.cursor.line(), Some(2));
        assert_eq!(sel.cursor.column(), Some(1));
    }

    #[test]
    fn test_remove_character_forward_heals_cursor() {
        let mut buf = unix("ab");
        let sel = Selection::at(buf.position_at_offset(1));
        let sel = remove_character_forward(&mut buf, sel).unwrap();
        assert_eq!(buf.text(), "a");
        // Offset 1 is now past the last codepoint: healed back to 0.
        assert_eq!(sel.cursor.offset, 0);
    }

    #[test]
    fn test_failed_mutation_propagates() {
        let mut buf = Buffer::from_str("\r\n", LineEnding::Dos);
        let mut sel = Selection::new();
        sel.cursor = Position::at(1);
        assert!(insert_character(&mut buf, sel, 'u').is_err());
        assert_eq!(buf.text(), "\r\n");
    }

    #[test]
    fn test_anchored_motion_extends_selection() {
        let buf = unix("hello");
        let mut sel = sel_at(&buf, 0);
        sel.anchored = true;
        let sel = next_word_start(&buf, sel);
        assert_eq!(sel.anchor.offset, 0);
        assert_eq!(sel.cursor.offset, 4);
        assert!(sel.is_extended());
    }
}
