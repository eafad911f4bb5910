//! Styled-range bookkeeping for one render pass.
//!
//! A [`SegmentSet`] holds the styled byte ranges of one buffer snapshot:
//! sorted by start, never overlapping. Overlapping insertions self-repair
//! by trimming, splitting, or evicting the ranges already present, so the
//! set can be built from arbitrary layers (matches first, selections on
//! top, cursors last) without the caller minding the collisions.
//!
//! The set lives for one render pass: build it, synthesize draw data from
//! it, throw both away.

use crate::buffer::TextStore;
use crate::selection::Selection;
use serde::{Deserialize, Serialize};

/// One resolved color channel triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Resolved display attributes for a styled range.
///
/// The renderer maps these onto whatever its terminal supports; the core
/// never emits escape sequences itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub reverse: bool,
}

impl Face {
    /// The stretch between anchor and cursor.
    pub const SELECTION: Face = Face {
        fg: None,
        bg: Some(Rgb(68, 68, 90)),
        reverse: false,
    };

    /// The one-codepoint cursor marker.
    pub const CURSOR: Face = Face {
        fg: None,
        bg: None,
        reverse: true,
    };

    /// A literal pattern match.
    pub const MATCH: Face = Face {
        fg: Some(Rgb(0, 0, 0)),
        bg: Some(Rgb(215, 175, 0)),
        reverse: false,
    };
}

/// A half-open styled byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub face: Face,
}

impl Segment {
    pub fn new(start: usize, end: usize, face: Face) -> Self {
        Segment { start, end, face }
    }
}

/// Rejected segment: the only structural precondition is `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSegment {
    pub start: usize,
    pub end: usize,
}

impl std::fmt::Display for InvalidSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "segment range {}..{} is empty", self.start, self.end)
    }
}

impl std::error::Error for InvalidSegment {}

/// Disjoint, ordered styled ranges over one buffer snapshot.
#[derive(Debug, Default)]
pub struct SegmentSet {
    segments: Vec<Segment>,
    active_line: Option<usize>,
}

impl SegmentSet {
    pub fn new() -> Self {
        SegmentSet::default()
    }

    /// The segments, ascending by start, pairwise disjoint.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Line of the primary selection's cursor, once one was added.
    pub fn active_line(&self) -> Option<usize> {
        self.active_line
    }

    /// Insert a styled range, resolving every collision against the
    /// ranges already present.
    ///
    /// Containment evicts, partial overlap splits the contested stretch
    /// at the old boundaries, and a strictly-surrounding range is cut in
    /// two around the newcomer (both halves keep their face). The only
    /// reported failure is an empty range.
    pub fn add(&mut self, mut seg: Segment) -> Result<(), InvalidSegment> {
        if seg.start >= seg.end {
            return Err(InvalidSegment {
                start: seg.start,
                end: seg.end,
            });
        }
        // First existing segment that could intersect the newcomer.
        let mut i = self.segments.partition_point(|s| s.end <= seg.start);
        while i < self.segments.len() && self.segments[i].start < seg.end {
            let existing = self.segments[i];
            if seg.start <= existing.start && existing.end <= seg.end {
                // Newcomer swallows it whole.
                self.segments.remove(i);
            } else if existing.start < seg.start && seg.end < existing.end {
                // Newcomer sits strictly inside: split around it.
                let tail = Segment::new(seg.end, existing.end, existing.face);
                self.segments[i].end = seg.start;
                self.segments.insert(i + 1, tail);
                break;
            } else if seg.start <= existing.start {
                // Overlap at the existing segment's start: both retreat to
                // the other's former boundary.
                self.segments[i].start = seg.end;
                if existing.start > seg.start {
                    seg.end = existing.start;
                }
                break;
            } else {
                // Overlap at the existing segment's end, mirrored.
                self.segments[i].end = seg.start;
                if existing.end < seg.end {
                    seg.start = existing.end;
                }
                i += 1;
            }
        }
        if seg.start < seg.end {
            let at = self.segments.partition_point(|s| s.start < seg.start);
            self.segments.insert(at, seg);
        }
        Ok(())
    }

    /// Derive segments from one selection: the stretch between anchor and
    /// cursor, then the cursor marker on top (added last, so it wins any
    /// collision at that point). A primary selection also pins the active
    /// line.
    pub fn add_selection<S: TextStore>(&mut self, store: &S, selection: &Selection) {
        let (lo, hi) = selection.range();
        if lo < hi {
            self.insert_span(lo, hi, Face::SELECTION);
        }
        let cursor = store.resolve(selection.cursor);
        let marker_end = if cursor.offset >= store.last_offset() {
            store.len()
        } else {
            store.next_position(cursor).offset
        };
        if cursor.offset < marker_end {
            self.insert_span(cursor.offset, marker_end, Face::CURSOR);
        }
        if selection.primary {
            self.active_line = cursor.line();
        }
        tracing::trace!(
            lo,
            hi,
            cursor = cursor.offset,
            primary = selection.primary,
            "selection decorated"
        );
    }

    /// Add one match segment per non-overlapping literal occurrence.
    pub fn add_pattern(&mut self, text: &str, pattern: &str) {
        if pattern.is_empty() {
            return;
        }
        let mut from = 0;
        while let Some(found) = text[from..].find(pattern) {
            let start = from + found;
            self.insert_span(start, start + pattern.len(), Face::MATCH);
            from = start + pattern.len();
        }
    }

    /// `add` for ranges the engine built itself, which are never empty.
    fn insert_span(&mut self, start: usize, end: usize, face: Face) {
        debug_assert!(start < end);
        let _ = self.add(Segment::new(start, end, face));
    }

    /// Check the structural invariant: ordered and pairwise disjoint.
    #[cfg(test)]
    fn is_disjoint(&self) -> bool {
        self.segments
            .windows(2)
            .all(|w| w[0].start < w[0].end && w[0].end <= w[1].start)
    }
}
