//! Cursors, anchors, and multi-cursor bookkeeping.
//!
//! A [`Selection`] is a cursor/anchor pair. Ordinary motion moves both
//! together (a collapsed selection is just a caret); setting `anchored`
//! pins the anchor so subsequent motion extends the selected stretch.
//! The two transient fields remember where a chain of vertical moves
//! started, so stepping through lines of different lengths snaps back to
//! the original column.

use crate::position::Position;
use serde::{Deserialize, Serialize};

/// A cursor/anchor pair with vertical-navigation memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub cursor: Position,
    pub anchor: Position,
    /// When set, `move_to` leaves the anchor behind.
    pub anchored: bool,
    /// The selection whose cursor line becomes the active line.
    pub primary: bool,
    /// Column captured by the first move of a vertical chain.
    pub transient_column: Option<usize>,
    /// Set instead of a column when the chain started on a newline unit;
    /// takes precedence when landing.
    pub transient_newline: bool,
}

impl Selection {
    /// A collapsed primary selection at the start of the buffer.
    pub fn new() -> Self {
        Selection {
            cursor: Position::default(),
            anchor: Position::default(),
            anchored: false,
            primary: true,
            transient_column: None,
            transient_newline: false,
        }
    }

    /// A collapsed selection at `pos`.
    pub fn at(pos: Position) -> Self {
        Selection {
            cursor: pos,
            anchor: pos,
            ..Selection::new()
        }
    }

    /// Move the cursor; collapses the anchor onto it unless anchored.
    pub fn move_to(&mut self, pos: Position) {
        self.cursor = pos;
        if !self.anchored {
            self.anchor = pos;
        }
    }

    /// Forget the vertical chain. Must run before any motion that is not
    /// a continuation of vertical movement.
    pub fn reset_transients(&mut self) {
        self.transient_column = None;
        self.transient_newline = false;
    }

    pub fn has_transients(&self) -> bool {
        self.transient_newline || self.transient_column.is_some()
    }

    /// True when the anchor sits apart from the cursor.
    pub fn is_extended(&self) -> bool {
        self.anchor.offset != self.cursor.offset
    }

    /// Anchor/cursor offsets in ascending order.
    pub fn range(&self) -> (usize, usize) {
        let (a, c) = (self.anchor.offset, self.cursor.offset);
        if a <= c {
            (a, c)
        } else {
            (c, a)
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::new()
    }
}

/// The set of live selections for one buffer.
///
/// Always holds at least one member and exactly one primary. Editing
/// commands iterate it; `normalize` collapses duplicates after motions
/// pile several cursors onto the same offset.
#[derive(Debug, Clone)]
pub struct Selections {
    items: Vec<Selection>,
}

impl Selections {
    pub fn new() -> Self {
        Selections {
            items: vec![Selection::new()],
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        false // never empty by construction
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Selection> {
        self.items.iter_mut()
    }

    pub fn primary(&self) -> &Selection {
        self.items
            .iter()
            .find(|s| s.primary)
            .unwrap_or(&self.items[0])
    }

    pub fn primary_mut(&mut self) -> &mut Selection {
        let idx = self.items.iter().position(|s| s.primary).unwrap_or(0);
        &mut self.items[idx]
    }

    /// Add a non-primary cursor at `pos`.
    pub fn push(&mut self, pos: Position) {
        let mut sel = Selection::at(pos);
        sel.primary = false;
        self.items.push(sel);
    }

    /// Sort by cursor offset and drop duplicate cursors, keeping the
    /// primary over a non-primary at the same offset.
    pub fn normalize(&mut self) {
        self.items
            .sort_by_key(|s| (s.cursor.offset, !s.primary as u8));
        self.items.dedup_by_key(|s| s.cursor.offset);
        tracing::trace!(count = self.items.len(), "selections normalized");
    }
}

impl Default for Selections {
    fn default() -> Self {
        Selections::new()
    }
}
