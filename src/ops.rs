//! The closed, named operation set.
//!
//! The keymap resolver maps a raw keypress to one [`Op`] name; the command
//! dispatcher then invokes it with nothing but a selection and, for
//! inserts, a character and repeat count. [`Op::apply`] owns the
//! transient-reset rule: every operation that is not a vertical move
//! breaks the vertical chain before running.

use crate::buffer::{BufferError, TextStore};
use crate::motion;
use crate::selection::Selection;
use serde::{Deserialize, Serialize};

/// One user-facing editing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Op {
    ForwardCharacter,
    BackwardCharacter,
    BeginningOfLine,
    EndOfLine,
    FirstNonBlankOfLine,
    BeginningOfBuffer,
    EndOfBuffer,
    NextLine,
    PreviousLine,
    NextWordStart,
    PreviousWordEnd,
    WordStart,
    WordEnd,
    InsertCharacter,
    InsertNewline,
    RemoveCharacterForward,
}

/// A dispatch that could not run or whose edit was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpError {
    /// `insert-character` arrived without a character payload.
    MissingCharacter(Op),
    Buffer(BufferError),
}

impl std::fmt::Display for OpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpError::MissingCharacter(op) => {
                write!(f, "operation {} requires a character", op.name())
            }
            OpError::Buffer(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for OpError {}

impl From<BufferError> for OpError {
    fn from(err: BufferError) -> Self {
        OpError::Buffer(err)
    }
}

impl Op {
    pub const ALL: [Op; 16] = [
        Op::ForwardCharacter,
        Op::BackwardCharacter,
        Op::BeginningOfLine,
        Op::EndOfLine,
        Op::FirstNonBlankOfLine,
        Op::BeginningOfBuffer,
        Op::EndOfBuffer,
        Op::NextLine,
        Op::PreviousLine,
        Op::NextWordStart,
        Op::PreviousWordEnd,
        Op::WordStart,
        Op::WordEnd,
        Op::InsertCharacter,
        Op::InsertNewline,
        Op::RemoveCharacterForward,
    ];

    /// Stable wire name, as the keymap resolver spells it.
    pub fn name(self) -> &'static str {
        match self {
            Op::ForwardCharacter => "forward-character",
            Op::BackwardCharacter => "backward-character",
            Op::BeginningOfLine => "beginning-of-line",
            Op::EndOfLine => "end-of-line",
            Op::FirstNonBlankOfLine => "first-non-blank-of-line",
            Op::BeginningOfBuffer => "beginning-of-buffer",
            Op::EndOfBuffer => "end-of-buffer",
            Op::NextLine => "next-line",
            Op::PreviousLine => "previous-line",
            Op::NextWordStart => "next-word-start",
            Op::PreviousWordEnd => "previous-word-end",
            Op::WordStart => "word-start",
            Op::WordEnd => "word-end",
            Op::InsertCharacter => "insert-character",
            Op::InsertNewline => "insert-newline",
            Op::RemoveCharacterForward => "remove-character-forward",
        }
    }

    pub fn from_name(name: &str) -> Option<Op> {
        Op::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// Vertical moves continue a chain instead of resetting it.
    pub fn is_vertical(self) -> bool {
        matches!(self, Op::NextLine | Op::PreviousLine)
    }

    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            Op::InsertCharacter | Op::InsertNewline | Op::RemoveCharacterForward
        )
    }

    /// Run the operation `count` times against one selection.
    ///
    /// A failing repetition stops the loop and reports the failure; the
    /// repetitions already applied stand (each one left the store valid).
    pub fn apply<S: TextStore>(
        self,
        store: &mut S,
        sel: Selection,
        ch: Option<char>,
        count: usize,
    ) -> Result<Selection, OpError> {
        let mut sel = sel;
        if !self.is_vertical() {
            sel.reset_transients();
        }
        tracing::trace!(op = self.name(), count, "dispatch");
        for _ in 0..count {
            sel = match self {
                Op::ForwardCharacter => motion::forward_character(store, sel),
                Op::BackwardCharacter => motion::backward_character(store, sel),
                Op::BeginningOfLine => motion::beginning_of_line(store, sel),
                Op::EndOfLine => motion::end_of_line(store, sel),
                Op::FirstNonBlankOfLine => motion::first_non_blank_of_line(store, sel),
                Op::BeginningOfBuffer => motion::beginning_of_buffer(store, sel),
                Op::EndOfBuffer => motion::end_of_buffer(store, sel),
                Op::NextLine => motion::next_line(store, sel),
                Op::PreviousLine => motion::previous_line(store, sel),
                Op::NextWordStart => motion::next_word_start(store, sel),
                Op::PreviousWordEnd => motion::previous_word_end(store, sel),
                Op::WordStart => motion::word_start(store, sel),
                Op::WordEnd => motion::word_end(store, sel),
                Op::InsertCharacter => {
                    let ch = ch.ok_or(OpError::MissingCharacter(self))?;
                    motion::insert_character(store, sel, ch)?
                }
                Op::InsertNewline => motion::insert_newline(store, sel)?,
                Op::RemoveCharacterForward => motion::remove_character_forward(store, sel)?,
            };
        }
        Ok(sel)
    }
}
