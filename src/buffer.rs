//! The text buffer: byte storage plus coordinate arithmetic.
//!
//! A [`Buffer`] owns a growable byte sequence and its [`LineEnding`]. Every
//! externally visible offset points at the first byte of a UTF-8 codepoint
//! or newline unit (a DOS `\n` is never addressable on its own; its `\r`
//! is the unit's address).
//!
//! Two failure policies split the surface in half:
//!
//! * Read/navigation operations never fail. A stale, mid-codepoint, or
//!   past-the-end input is healed: the operation snaps to the nearest valid
//!   boundary and recomputes coordinates as needed.
//! * Mutations ([`Buffer::insert`], [`Buffer::remove`]) are strict: every
//!   boundary violation is a distinct [`BufferError`] and the buffer is
//!   left untouched on failure.
//!
//! The operation contract is also expressed as the [`TextStore`] trait so
//! an alternative storage engine (rope, piece table) can satisfy the same
//! surface without touching the selection, motion, or highlight layers.

use crate::position::{Coords, LineEnding, Position};

/// A mutation that violated the buffer's boundary invariants.
///
/// Each violation is its own variant so the command dispatcher can report
/// exactly what the remote client did wrong. Navigation never produces
/// these; it self-corrects instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Offset (or range bound) lies beyond the buffer contents.
    OffsetPastEnd { offset: usize, len: usize },
    /// Removal range with `start > end`.
    InvalidRange { start: usize, end: usize },
    /// Offset points into the middle of a multi-byte codepoint.
    NotCharBoundary { offset: usize },
    /// Offset points at the `\n` byte of a DOS `\r\n` unit.
    MidDosNewline { offset: usize },
    /// Inserted bytes are not well-formed UTF-8.
    InvalidUtf8,
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::OffsetPastEnd { offset, len } => {
                write!(f, "offset {offset} past buffer end (length {len})")
            }
            BufferError::InvalidRange { start, end } => {
                write!(f, "invalid range: start {start} > end {end}")
            }
            BufferError::NotCharBoundary { offset } => {
                write!(f, "offset {offset} is not a codepoint boundary")
            }
            BufferError::MidDosNewline { offset } => {
                write!(f, "offset {offset} addresses the LF of a CRLF unit")
            }
            BufferError::InvalidUtf8 => write!(f, "inserted bytes are not valid UTF-8"),
        }
    }
}

impl std::error::Error for BufferError {}

/// The operation contract any storage strategy must satisfy.
///
/// [`Buffer`] is the contiguous-array implementation; the selection,
/// motion, and highlight layers only ever go through this trait.
pub trait TextStore {
    /// Total length in bytes.
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn line_ending(&self) -> LineEnding;

    fn byte_at(&self, offset: usize) -> Option<u8>;
    /// Decode the codepoint whose unit starts at `offset` (a DOS unit
    /// decodes as `'\r'`). `None` when out of range or mid-unit.
    fn codepoint_at(&self, offset: usize) -> Option<char>;
    /// Bytes of `[start, end)`, clamped to the buffer contents.
    fn slice(&self, start: usize, end: usize) -> &[u8];
    /// The full contents. The buffer only ever holds well-formed UTF-8.
    fn text(&self) -> &str;

    /// True for the first byte of a codepoint or newline unit, and for the
    /// end sentinel `offset == len()`. False for the `\n` of a DOS unit.
    fn is_valid_offset(&self, offset: usize) -> bool;
    /// Line-ending-specific newline unit detection at `offset`.
    fn is_newline_at(&self, offset: usize) -> bool;

    /// Offset of the first codepoint (always 0).
    fn first_offset(&self) -> usize {
        0
    }
    /// Offset of the last codepoint or newline unit; 0 when empty.
    fn last_offset(&self) -> usize;
    /// Number of lines: newline units plus one. A trailing terminator
    /// still opens a final empty line.
    fn line_count(&self) -> usize;

    /// The position one unit after `pos`, clamped at the last codepoint.
    fn next_position(&self, pos: Position) -> Position;
    /// The position one unit before `pos`, clamped at offset 0.
    fn previous_position(&self, pos: Position) -> Position;
    /// First unit of the line containing `pos`.
    fn line_start_position(&self, pos: Position) -> Position;
    /// The line's terminating newline unit, or the last unit of the final
    /// line.
    fn line_end_position(&self, pos: Position) -> Position;

    /// Canonical, O(offset) resolution of an offset into full coordinates.
    /// Clamps past-the-end offsets to the last unit and snaps mid-unit
    /// offsets back to their unit start.
    fn position_at_offset(&self, offset: usize) -> Position;
    /// Inverse scan: resolve 1-based line/column into a position, clamping
    /// the line to the last line and the column to the line's last column.
    fn position_at(&self, line: usize, column: usize) -> Position;
    /// Cheap resolution: trusts already-resolved coordinates on a valid
    /// offset, recomputes otherwise.
    fn resolve(&self, pos: Position) -> Position;

    /// Strict insertion of UTF-8 `bytes` at `offset`; `offset == len()`
    /// appends.
    fn insert(&mut self, offset: usize, bytes: &[u8]) -> Result<(), BufferError>;
    /// Strict removal of the inclusive unit range `[start, end]`: the unit
    /// starting at `end` is removed through its final byte.
    fn remove(&mut self, start: usize, end: usize) -> Result<(), BufferError>;
}

/// Contiguous growable-byte storage with a fixed line-ending convention.
#[derive(Debug, Clone)]
pub struct Buffer {
    bytes: Vec<u8>,
    line_ending: LineEnding,
}

impl Buffer {
    /// Create an empty buffer.
    pub fn new(line_ending: LineEnding) -> Self {
        Buffer {
            bytes: Vec::new(),
            line_ending,
        }
    }

    /// Create a buffer holding `text`.
    pub fn from_str(text: &str, line_ending: LineEnding) -> Self {
        Buffer {
            bytes: text.as_bytes().to_vec(),
            line_ending,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        let end = end.min(self.bytes.len());
        let start = start.min(end);
        &self.bytes[start..end]
    }

    /// The buffer contents as text. Mutations only ever splice whole
    /// codepoints, so the contents stay well-formed UTF-8.
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    pub fn codepoint_at(&self, offset: usize) -> Option<char> {
        if offset >= self.bytes.len() || !self.is_valid_offset(offset) {
            return None;
        }
        let end = offset + self.unit_len(offset);
        std::str::from_utf8(self.slice(offset, end))
            .ok()?
            .chars()
            .next()
    }

    pub fn is_newline_at(&self, offset: usize) -> bool {
        match self.bytes.get(offset) {
            None => false,
            Some(&b) => match self.line_ending {
                LineEnding::Unix => b == b'\n',
                LineEnding::OldMac => b == b'\r',
                LineEnding::Dos => b == b'\r' && self.bytes.get(offset + 1) == Some(&b'\n'),
            },
        }
    }

    pub fn is_valid_offset(&self, offset: usize) -> bool {
        if offset == self.bytes.len() {
            return true; // end sentinel
        }
        let Some(&b) = self.bytes.get(offset) else {
            return false;
        };
        if is_continuation(b) {
            return false;
        }
        // The LF of a CRLF unit is addressed through its CR.
        !(self.line_ending == LineEnding::Dos
            && b == b'\n'
            && offset > 0
            && self.bytes[offset - 1] == b'\r')
    }

    pub fn last_offset(&self) -> usize {
        if self.bytes.is_empty() {
            0
        } else {
            self.unit_start(self.bytes.len() - 1)
        }
    }

    /// Number of lines, counted as newline units plus one.
    pub fn line_count(&self) -> usize {
        let mut count = 1;
        let mut o = 0;
        while o < self.bytes.len() {
            if self.is_newline_at(o) {
                count += 1;
            }
            o += self.unit_len(o);
        }
        count
    }

    /// Snap an in-range offset back to the start of the unit containing it.
    fn unit_start(&self, offset: usize) -> usize {
        let mut offset = offset;
        if self.line_ending == LineEnding::Dos
            && self.bytes[offset] == b'\n'
            && offset > 0
            && self.bytes[offset - 1] == b'\r'
        {
            return offset - 1;
        }
        while offset > 0 && is_continuation(self.bytes[offset]) {
            offset -= 1;
        }
        offset
    }

    /// Byte width of the unit starting at `offset` (a valid unit start).
    fn unit_len(&self, offset: usize) -> usize {
        if self.line_ending == LineEnding::Dos && self.is_newline_at(offset) {
            return 2;
        }
        utf8_sequence_len(self.bytes[offset])
    }

    /// Heal an arbitrary offset into a valid in-buffer unit start.
    fn healed_offset(&self, offset: usize) -> usize {
        if self.bytes.is_empty() {
            0
        } else if offset >= self.bytes.len() {
            self.last_offset()
        } else {
            self.unit_start(offset)
        }
    }

    pub fn position_at_offset(&self, offset: usize) -> Position {
        let target = self.healed_offset(offset);
        let mut o = 0;
        let mut line = 1;
        let mut column = 1;
        while o < target {
            if self.is_newline_at(o) {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
            o += self.unit_len(o);
        }
        Position::resolved(target, line, column)
    }

    pub fn position_at(&self, line: usize, column: usize) -> Position {
        if self.bytes.is_empty() {
            return Position::resolved(0, 1, 1);
        }
        let last = self.position_at_offset(self.last_offset());
        let line = line.clamp(1, last.line().unwrap_or(1));
        let column = column.max(1);
        let mut o = 0;
        let mut l = 1;
        let mut c = 1;
        loop {
            if l == line && (c == column || self.is_newline_at(o)) {
                // Exact hit, or the line ran out of columns: a terminating
                // newline unit occupies the line's final column.
                return Position::resolved(o, l, c);
            }
            let next = o + self.unit_len(o);
            if next >= self.bytes.len() {
                // Final unit clamps a column past the final line's length.
                return Position::resolved(o, l, c);
            }
            if self.is_newline_at(o) {
                l += 1;
                c = 1;
            } else {
                c += 1;
            }
            o = next;
        }
    }

    pub fn resolve(&self, pos: Position) -> Position {
        let healed = self.healed_offset(pos.offset);
        match pos.coords {
            Coords::Resolved { .. } if healed == pos.offset => pos,
            _ => self.position_at_offset(healed),
        }
    }

    pub fn next_position(&self, pos: Position) -> Position {
        if self.bytes.is_empty() {
            return Position::resolved(0, 1, 1);
        }
        let last = self.last_offset();
        let start = self.healed_offset(pos.offset);
        if start >= last {
            // Never overruns the last codepoint.
            return if pos.offset == last {
                self.resolve(pos)
            } else {
                self.position_at_offset(last)
            };
        }
        let next = start + self.unit_len(start);
        match pos.coords {
            // Carry coordinates when the input was already a valid start.
            Coords::Resolved { line, column } if start == pos.offset => {
                if self.is_newline_at(start) {
                    Position::resolved(next, line + 1, 1)
                } else {
                    Position::resolved(next, line, column + 1)
                }
            }
            _ => self.position_at_offset(next),
        }
    }

    pub fn previous_position(&self, pos: Position) -> Position {
        if self.bytes.is_empty() {
            return Position::resolved(0, 1, 1);
        }
        if pos.offset == 0 {
            return self.resolve(pos);
        }
        let o = pos.offset.min(self.bytes.len());
        let prev = self.unit_start(o - 1);
        match pos.coords {
            // Moving left within the same line keeps the carried line: a
            // column above 1 means the unit before the cursor is not a
            // newline.
            Coords::Resolved { line, column }
                if column > 1 && o == pos.offset && self.is_valid_offset(o) =>
            {
                Position::resolved(prev, line, column - 1)
            }
            _ => self.position_at_offset(prev),
        }
    }

    pub fn line_start_position(&self, pos: Position) -> Position {
        if self.bytes.is_empty() {
            return Position::resolved(0, 1, 1);
        }
        let resolved = self.resolve(pos);
        let mut p = resolved.offset;
        // A newline terminates its own line, so the scan stops at the
        // nearest newline strictly before `p`.
        while p > 0 {
            let q = self.unit_start(p - 1);
            if self.is_newline_at(q) {
                break;
            }
            p = q;
        }
        Position::resolved(p, resolved.line().unwrap_or(1), 1)
    }

    pub fn line_end_position(&self, pos: Position) -> Position {
        if self.bytes.is_empty() {
            return Position::resolved(0, 1, 1);
        }
        let resolved = self.resolve(pos);
        let mut p = resolved.offset;
        let mut column = resolved.column().unwrap_or(1);
        while !self.is_newline_at(p) {
            let next = p + self.unit_len(p);
            if next >= self.bytes.len() {
                break; // last unit of the final line
            }
            p = next;
            column += 1;
        }
        Position::resolved(p, resolved.line().unwrap_or(1), column)
    }

    /// Reject a mutation bound that is not a valid unit start.
    fn check_boundary(&self, offset: usize) -> Result<(), BufferError> {
        let Some(&b) = self.bytes.get(offset) else {
            return Ok(()); // bounds are checked separately
        };
        if is_continuation(b) {
            return Err(BufferError::NotCharBoundary { offset });
        }
        if self.line_ending == LineEnding::Dos
            && b == b'\n'
            && offset > 0
            && self.bytes[offset - 1] == b'\r'
        {
            return Err(BufferError::MidDosNewline { offset });
        }
        Ok(())
    }

    pub fn insert(&mut self, offset: usize, bytes: &[u8]) -> Result<(), BufferError> {
        if offset > self.bytes.len() {
            return Err(BufferError::OffsetPastEnd {
                offset,
                len: self.bytes.len(),
            });
        }
        if std::str::from_utf8(bytes).is_err() {
            return Err(BufferError::InvalidUtf8);
        }
        self.check_boundary(offset)?;
        self.bytes.splice(offset..offset, bytes.iter().copied());
        tracing::debug!(offset, inserted = bytes.len(), "buffer insert");
        Ok(())
    }

    pub fn remove(&mut self, start: usize, end: usize) -> Result<(), BufferError> {
        if start > end {
            return Err(BufferError::InvalidRange { start, end });
        }
        let len = self.bytes.len();
        if start >= len {
            return Err(BufferError::OffsetPastEnd { offset: start, len });
        }
        if end >= len {
            return Err(BufferError::OffsetPastEnd { offset: end, len });
        }
        self.check_boundary(start)?;
        self.check_boundary(end)?;
        // Inclusive range: the unit starting at `end` goes too.
        let stop = end + self.unit_len(end);
        // Shift the tail left in place; no reallocation.
        self.bytes.copy_within(stop.., start);
        self.bytes.truncate(len - (stop - start));
        tracing::debug!(start, end, removed = stop - start, "buffer remove");
        Ok(())
    }
}

impl TextStore for Buffer {
    fn len(&self) -> usize {
        Buffer::len(self)
    }

    fn line_ending(&self) -> LineEnding {
        Buffer::line_ending(self)
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        Buffer::byte_at(self, offset)
    }

    fn codepoint_at(&self, offset: usize) -> Option<char> {
        Buffer::codepoint_at(self, offset)
    }

    fn slice(&self, start: usize, end: usize) -> &[u8] {
        Buffer::slice(self, start, end)
    }

    fn text(&self) -> &str {
        Buffer::text(self)
    }

    fn is_valid_offset(&self, offset: usize) -> bool {
        Buffer::is_valid_offset(self, offset)
    }

    fn is_newline_at(&self, offset: usize) -> bool {
        Buffer::is_newline_at(self, offset)
    }

    fn last_offset(&self) -> usize {
        Buffer::last_offset(self)
    }

    fn line_count(&self) -> usize {
        Buffer::line_count(self)
    }

    fn next_position(&self, pos: Position) -> Position {
        Buffer::next_position(self, pos)
    }

    fn previous_position(&self, pos: Position) -> Position {
        Buffer::previous_position(self, pos)
    }

    fn line_start_position(&self, pos: Position) -> Position {
        Buffer::line_start_position(self, pos)
    }

    fn line_end_position(&self, pos: Position) -> Position {
        Buffer::line_end_position(self, pos)
    }

    fn position_at_offset(&self, offset: usize) -> Position {
        Buffer::position_at_offset(self, offset)
    }

    fn position_at(&self, line: usize, column: usize) -> Position {
        Buffer::position_at(self, line, column)
    }

    fn resolve(&self, pos: Position) -> Position {
        Buffer::resolve(self, pos)
    }

    fn insert(&mut self, offset: usize, bytes: &[u8]) -> Result<(), BufferError> {
        Buffer::insert(self, offset, bytes)
    }

    fn remove(&mut self, start: usize, end: usize) -> Result<(), BufferError> {
        Buffer::remove(self, start, end)
    }
}

fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

fn utf8_sequence_len(b: u8) -> usize {
    if b < 0x80 {
        1
    } else if b & 0xE0 == 0xC0 {
        2
    } else if b & 0xF0 == 0xE0 {
        3
    } else if b & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unix(text: &str) -> Buffer {
        Buffer::from_str(text, LineEnding::Unix)
    }

    fn dos(text: &str) -> Buffer {
        Buffer::from_str(text, LineEnding::Dos)
    }

    #[test]
    fn test_empty_buffer_positions() {
        let buf = Buffer::new(LineEnding::Unix);
        assert_eq!(buf.last_offset(), 0);
        assert_eq!(buf.position_at_offset(0), Position::resolved(0, 1, 1));
        assert_eq!(
            buf.next_position(Position::at(0)),
            Position::resolved(0, 1, 1)
        );
        assert_eq!(
            buf.previous_position(Position::at(0)),
            Position::resolved(0, 1, 1)
        );
        assert!(buf.is_valid_offset(0));
    }

    #[test]
    fn test_next_skips_multibyte_codepoint() {
        // ý is two bytes at offset 4; its continuation byte is skipped.
        let buf = unix("Dobrý\ndeň");
        let next = buf.next_position(Position::at(4));
        assert_eq!(next.offset, 6);
        assert_eq!(next.line(), Some(1));
        assert_eq!(next.column(), Some(6));
    }

    #[test]
    fn test_dos_newline_is_one_unit() {
        let buf = dos("\r\n1\r\n");
        let next = buf.next_position(Position::at(0));
        assert_eq!(next.offset, 2);
        assert_eq!(next.line(), Some(2));
        assert_eq!(next.column(), Some(1));
        assert!(!buf.is_valid_offset(1));
        assert!(buf.is_valid_offset(0));
        assert!(buf.is_valid_offset(2));
    }

    #[test]
    fn test_insert_mid_dos_newline_rejected() {
        let mut buf = dos("\r\n");
        assert_eq!(
            buf.insert(1, b"u"),
            Err(BufferError::MidDosNewline { offset: 1 })
        );
        assert_eq!(buf.text(), "\r\n");
    }

    #[test]
    fn test_remove_is_inclusive() {
        let mut buf = unix("0123456789");
        buf.remove(0, 0).unwrap();
        assert_eq!(buf.text(), "123456789");
    }

    #[test]
    fn test_remove_inclusive_multibyte_end() {
        let mut buf = unix("aýžb"); // ý at 1, ž at 3, both two bytes
        buf.remove(1, 3).unwrap();
        assert_eq!(buf.text(), "ab");
    }

    #[test]
    fn test_remove_dos_newline_unit() {
        let mut buf = dos("a\r\nb");
        buf.remove(1, 1).unwrap();
        assert_eq!(buf.text(), "ab");
    }

    #[test]
    fn test_remove_errors_are_distinct() {
        let mut buf = unix("aé");
        assert_eq!(
            buf.remove(2, 1),
            Err(BufferError::InvalidRange { start: 2, end: 1 })
        );
        assert_eq!(
            buf.remove(0, 9),
            Err(BufferError::OffsetPastEnd { offset: 9, len: 3 })
        );
        assert_eq!(
            buf.remove(2, 2),
            Err(BufferError::NotCharBoundary { offset: 2 })
        );
        assert_eq!(buf.text(), "aé");
    }

    #[test]
    fn test_insert_errors() {
        let mut buf = unix("é");
        assert_eq!(
            buf.insert(9, b"x"),
            Err(BufferError::OffsetPastEnd { offset: 9, len: 2 })
        );
        assert_eq!(
            buf.insert(1, b"x"),
            Err(BufferError::NotCharBoundary { offset: 1 })
        );
        assert_eq!(buf.insert(0, &[0xff, 0xfe]), Err(BufferError::InvalidUtf8));
        assert_eq!(buf.text(), "é");
    }

    #[test]
    fn test_insert_at_end_appends() {
        let mut buf = unix("ab");
        buf.insert(2, b"c").unwrap();
        assert_eq!(buf.text(), "abc");
    }

    #[test]
    fn test_failed_edit_leaves_buffer_unchanged() {
        let mut buf = dos("x\r\ny");
        assert!(buf.insert(2, b"!").is_err());
        assert!(buf.remove(2, 2).is_err());
        assert_eq!(buf.text(), "x\r\ny");
    }

    #[test]
    fn test_line_count() {
        assert_eq!(unix("").line_count(), 1);
        assert_eq!(unix("ab").line_count(), 1);
        // A trailing terminator opens a final empty line.
        assert_eq!(unix("a\nb\n").line_count(), 3);
        assert_eq!(dos("\r\n1\r\n").line_count(), 3);
        assert_eq!(
            Buffer::from_str("a\rb", LineEnding::OldMac).line_count(),
            2
        );
        // A lone LF is an ordinary codepoint under the DOS convention.
        assert_eq!(dos("a\nb").line_count(), 1);
    }

    #[test]
    fn test_round_trip_offset_line_column() {
        let buf = unix("Dobrý\ndeň\n\nx");
        let mut o = 0;
        while o < buf.len() {
            let pos = buf.position_at_offset(o);
            let back = buf.position_at(pos.line().unwrap(), pos.column().unwrap());
            assert_eq!(back.offset, o, "round trip at offset {o}");
            o += buf.unit_len(o);
        }
    }

    #[test]
    fn test_boundary_idempotence() {
        let buf = unix("ab\ncd");
        let last = buf.last_offset();
        let at_last = buf.next_position(Position::at(last));
        assert_eq!(at_last.offset, last);
        assert_eq!(buf.next_position(at_last).offset, last);
        let at_first = buf.previous_position(Position::at(0));
        assert_eq!(at_first.offset, 0);
        assert_eq!(buf.previous_position(at_first).offset, 0);
    }

    #[test]
    fn test_next_snaps_mid_codepoint_forward() {
        let buf = unix("aéb");
        // Offset 2 is the continuation byte of é; next boundary forward is 3.
        assert_eq!(buf.next_position(Position::at(2)).offset, 3);
    }

    #[test]
    fn test_previous_snaps_mid_codepoint_backward() {
        let buf = unix("aéb");
        assert_eq!(buf.previous_position(Position::at(2)).offset, 1);
    }

    #[test]
    fn test_position_at_offset_clamps_past_end() {
        let buf = unix("ab\ncd");
        let pos = buf.position_at_offset(999);
        assert_eq!(pos.offset, 4);
        assert_eq!(pos.line(), Some(2));
        assert_eq!(pos.column(), Some(2));
    }

    #[test]
    fn test_position_at_clamps_line_and_column() {
        let buf = unix("abc\nd");
        // Line past the last line clamps to the last line.
        assert_eq!(buf.position_at(9, 1).offset, 4);
        // Column past the line's length clamps to its newline unit.
        let pos = buf.position_at(1, 99);
        assert_eq!(pos.offset, 3);
        assert_eq!(pos.column(), Some(4));
    }

    #[test]
    fn test_position_at_empty_line() {
        let buf = unix("a\n\nb");
        // Line 2 is empty; its only column is the newline itself.
        let pos = buf.position_at(2, 5);
        assert_eq!(pos.offset, 2);
        assert_eq!(pos.column(), Some(1));
    }

    #[test]
    fn test_line_start_end_monotonic() {
        let buf = unix("abc\ndef\ng");
        for o in [0, 2, 3, 4, 6, 7, 8] {
            let pos = Position::at(o);
            let start = buf.line_start_position(pos);
            let end = buf.line_end_position(pos);
            assert!(start.offset <= o, "start {} <= {o}", start.offset);
            assert!(end.offset >= o, "end {} >= {o}", end.offset);
        }
    }

    #[test]
    fn test_newline_belongs_to_its_line() {
        let buf = unix("ab\ncd");
        // Cursor on the newline at offset 2: its line starts at 0.
        assert_eq!(buf.line_start_position(Position::at(2)).offset, 0);
        assert_eq!(buf.line_end_position(Position::at(0)).offset, 2);
        // Final line has no newline: line end is the last codepoint.
        assert_eq!(buf.line_end_position(Position::at(3)).offset, 4);
    }

    #[test]
    fn test_line_end_on_dos_buffer() {
        let buf = dos("ab\r\ncd");
        let end = buf.line_end_position(Position::at(0));
        assert_eq!(end.offset, 2);
        assert!(buf.is_newline_at(end.offset));
        assert_eq!(buf.next_position(Position::at(2)).offset, 4);
    }

    #[test]
    fn test_old_mac_newline_detection() {
        let buf = Buffer::from_str("a\rb", LineEnding::OldMac);
        assert!(buf.is_newline_at(1));
        let pos = buf.position_at_offset(2);
        assert_eq!(pos.line(), Some(2));
        assert_eq!(pos.column(), Some(1));
    }

    #[test]
    fn test_lone_lf_in_dos_buffer_is_addressable() {
        // A bare \n with no preceding \r is an ordinary control codepoint.
        let buf = dos("a\nb");
        assert!(buf.is_valid_offset(1));
        assert!(!buf.is_newline_at(1));
        assert_eq!(buf.position_at_offset(2).line(), Some(1));
    }

    #[test]
    fn test_post_mutation_validity() {
        let mut buf = unix("hčlanok");
        buf.remove(1, 2).unwrap();
        assert!(buf.is_valid_offset(0));
        assert!(buf.is_valid_offset(buf.len()));
        buf.insert(1, "é".as_bytes()).unwrap();
        assert!(buf.is_valid_offset(0));
        assert!(buf.is_valid_offset(buf.len()));
        assert_eq!(buf.text(), "héanok");
    }

    #[test]
    fn test_resolve_trusts_valid_resolved_input() {
        let buf = unix("ab\ncd");
        let pos = Position::resolved(3, 2, 1);
        assert_eq!(buf.resolve(pos), pos);
        // A stale offset is recomputed, not trusted.
        let stale = Position::resolved(99, 7, 7);
        assert_eq!(buf.resolve(stale), Position::resolved(4, 2, 2));
    }

    #[test]
    fn test_codepoint_at() {
        let buf = unix("aé");
        assert_eq!(buf.codepoint_at(0), Some('a'));
        assert_eq!(buf.codepoint_at(1), Some('é'));
        assert_eq!(buf.codepoint_at(2), None); // mid-codepoint
        assert_eq!(buf.codepoint_at(3), None); // end sentinel
        let crlf = dos("\r\n");
        assert_eq!(crlf.codepoint_at(0), Some('\r'));
    }
}
