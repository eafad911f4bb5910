//! Positions and line endings.
//!
//! A [`Position`] addresses one codepoint (or newline unit) in a buffer by
//! byte offset, optionally paired with its 1-based line/column coordinates.
//! Whether the coordinates are known is a type-level fact: [`Coords`] is
//! either `Resolved` or `Unresolved`, never a magic zero. Navigation calls
//! on the buffer accept unresolved positions and always hand back resolved
//! ones.

use serde::{Deserialize, Serialize};

/// The newline convention of a buffer.
///
/// A DOS newline is a two-byte unit addressed by its `\r`; the trailing
/// `\n` byte is never a valid offset on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    Unix,
    Dos,
    OldMac,
}

impl LineEnding {
    /// The terminator byte sequence.
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Unix => "\n",
            LineEnding::Dos => "\r\n",
            LineEnding::OldMac => "\r",
        }
    }

    pub fn as_bytes(self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    /// Byte width of one newline unit.
    pub fn len(self) -> usize {
        self.as_str().len()
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        LineEnding::Unix
    }
}

/// Line/column coordinates of a position, or the fact that they are stale.
///
/// `line` and `column` are 1-based and counted in codepoints. A position
/// whose coordinates are `Unresolved` carries only its byte offset; the
/// buffer recomputes the coordinates on the next navigation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coords {
    Resolved { line: usize, column: usize },
    Unresolved,
}

/// One addressable point in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset of the first byte of a codepoint or newline unit.
    pub offset: usize,
    pub coords: Coords,
}

impl Position {
    /// A position known only by byte offset.
    pub fn at(offset: usize) -> Self {
        Position {
            offset,
            coords: Coords::Unresolved,
        }
    }

    /// A position with known line/column coordinates.
    pub fn resolved(offset: usize, line: usize, column: usize) -> Self {
        Position {
            offset,
            coords: Coords::Resolved { line, column },
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.coords, Coords::Resolved { .. })
    }

    /// 1-based line, if resolved.
    pub fn line(&self) -> Option<usize> {
        match self.coords {
            Coords::Resolved { line, .. } => Some(line),
            Coords::Unresolved => None,
        }
    }

    /// 1-based column in codepoints, if resolved.
    pub fn column(&self) -> Option<usize> {
        match self.coords {
            Coords::Resolved { column, .. } => Some(column),
            Coords::Unresolved => None,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::resolved(0, 1, 1)
    }
}
