//! Turning a decorated buffer snapshot into renderable lines.
//!
//! [`synthesize`] walks the snapshot text line by line, clips the segment
//! set to each line, and emits [`DrawData`]: plain data the protocol layer
//! serializes for the client and the renderer paints verbatim. One call
//! produces one artifact; it is dropped together with its [`SegmentSet`]
//! when the render pass ends.
//!
//! Lines are split on the buffer's own line-ending terminator, so a DOS
//! snapshot renders through the same convention the coordinate arithmetic
//! uses (never a hard-coded `"\n"` split).

use crate::highlight::{Face, SegmentSet};
use crate::position::LineEnding;
use serde::{Deserialize, Serialize};

/// One run of identically-styled text; `face: None` is the unstyled gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub face: Option<Face>,
}

impl Span {
    fn plain(text: &str) -> Self {
        Span {
            text: text.to_string(),
            face: None,
        }
    }

    fn styled(text: &str, face: Face) -> Self {
        Span {
            text: text.to_string(),
            face: Some(face),
        }
    }
}

/// One renderable line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawLine {
    /// 1-based line number.
    pub number: usize,
    pub spans: Vec<Span>,
}

/// The per-render-pass artifact handed across the protocol boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawData {
    pub lines: Vec<DrawLine>,
    /// Digits needed for the widest line number.
    pub max_line_number_width: usize,
    /// Line of the primary cursor, when a primary selection was decorated.
    pub active_line: Option<usize>,
}

/// Clip the segment set to `[line_start, line_end)` of `text`, emitting
/// alternating unstyled gaps and styled runs that cover the range exactly.
///
/// A segment reaching past `line_end` gets one synthetic styled space
/// appended, so a highlight spanning the line break stays visible at the
/// line's trailing edge. That includes a segment covering only the
/// terminator itself (`start == line_end`): the cursor marker on a line's
/// newline unit renders as the styled space.
///
/// Bounds that fall inside a multibyte codepoint are snapped back to the
/// nearest boundary rather than panicking; the engine's own segments are
/// always aligned, but `SegmentSet::add` accepts arbitrary ranges.
pub fn decorate_line(
    set: &SegmentSet,
    text: &str,
    line_start: usize,
    line_end: usize,
) -> Vec<Span> {
    let line_start = floor_boundary(text, line_start);
    let line_end = floor_boundary(text, line_end).max(line_start);
    let mut spans = Vec::new();
    let mut at = line_start;
    for seg in set.segments() {
        if seg.end <= line_start {
            continue;
        }
        if seg.start > line_end {
            break;
        }
        let start = floor_boundary(text, seg.start.max(line_start));
        let end = floor_boundary(text, seg.end.min(line_end));
        if start > at {
            spans.push(Span::plain(&text[at..start]));
        }
        if start < end {
            spans.push(Span::styled(&text[start..end], seg.face));
        }
        at = at.max(end);
        if seg.end > line_end {
            spans.push(Span::styled(" ", seg.face));
        }
    }
    if at < line_end {
        spans.push(Span::plain(&text[at..line_end]));
    }
    spans
}

/// Snap `i` to the nearest codepoint boundary at or below it.
fn floor_boundary(text: &str, i: usize) -> usize {
    let mut i = i.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Split `text` on `ending`'s terminator, decorate every line, and size
/// the line-number column from the total line count.
pub fn synthesize(set: &SegmentSet, text: &str, ending: LineEnding) -> DrawData {
    let term = ending.as_str();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut number = 1;
    loop {
        match text[start..].find(term) {
            Some(found) => {
                let end = start + found;
                lines.push(DrawLine {
                    number,
                    spans: decorate_line(set, text, start, end),
                });
                start = end + term.len();
                number += 1;
            }
            None => {
                lines.push(DrawLine {
                    number,
                    spans: decorate_line(set, text, start, text.len()),
                });
                break;
            }
        }
    }
    let max_line_number_width = decimal_width(lines.len());
    tracing::debug!(
        lines = lines.len(),
        active_line = ?set.active_line(),
        "draw data synthesized"
    );
    DrawData {
        lines,
        max_line_number_width,
        active_line: set.active_line(),
    }
}

fn decimal_width(mut n: usize) -> usize {
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}
