//! Editing core for a client/server terminal editor.
//!
//! Everything here operates on one buffer snapshot: byte-offset and
//! line/column arithmetic under three line-ending conventions, selections
//! with sticky vertical navigation, the named editing operations, and the
//! highlight/draw pipeline that turns a decorated snapshot into plain
//! renderable data. No terminal handling, no I/O; the server owns the
//! buffers and ships [`draw::DrawData`] to thin clients.

pub mod buffer;
pub mod draw;
pub mod highlight;
pub mod motion;
pub mod ops;
pub mod position;
pub mod selection;

pub use buffer::{Buffer, BufferError, TextStore};
pub use draw::{decorate_line, synthesize, DrawData, DrawLine, Span};
pub use highlight::{Face, InvalidSegment, Rgb, Segment, SegmentSet};
pub use ops::{Op, OpError};
pub use position::{Coords, LineEnding, Position};
pub use selection::{Selection, Selections};
