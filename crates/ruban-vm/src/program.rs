//! program.rs — Source → `Program` (ops + paired jump targets)
//!
//! The source is scanned byte by byte. The eight instruction bytes are ASCII,
//! so UTF-8 continuation bytes can never be mistaken for one; every other
//! byte is a comment and is dropped here.
//!
//! Each op keeps the byte offset it came from, so runtime errors and
//! diagnostics can point back into the source via `LineMap`.

use core::fmt;

use log::debug;

use crate::error::ProgramError;

/* ─────────────────────────── Ops ─────────────────────────── */

/// One translated instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `+`
    Incr,
    /// `-`
    Decr,
    /// `>`
    Right,
    /// `<`
    Left,
    /// `.`
    Output,
    /// `,`
    Input,
    /// `[` ; `end` is the index of the matching `LoopEnd`.
    LoopStart {
        /// Index of the paired `]`.
        end: usize,
    },
    /// `]` ; `start` is the index of the matching `LoopStart`.
    LoopEnd {
        /// Index of the paired `[`.
        start: usize,
    },
}

impl Op {
    /// Source character of the op.
    pub const fn symbol(self) -> char {
        match self {
            Op::Incr => '+',
            Op::Decr => '-',
            Op::Right => '>',
            Op::Left => '<',
            Op::Output => '.',
            Op::Input => ',',
            Op::LoopStart { .. } => '[',
            Op::LoopEnd { .. } => ']',
        }
    }
}

/* ─────────────────────────── LineMap ─────────────────────────── */

/// Line-start table: byte offset → (line, column), both 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMap {
    /// Offsets of line starts (always contains 0).
    line_starts: Vec<usize>,
}

impl LineMap {
    /// Builds the table from raw source bytes.
    pub fn new(src: &[u8]) -> Self {
        let mut ls = Vec::with_capacity(16);
        ls.push(0);
        for (i, b) in src.iter().enumerate() {
            if *b == b'\n' {
                ls.push(i + 1);
            }
        }
        Self { line_starts: ls }
    }

    /// Converts a byte offset to `(line, column)`.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let col = offset.saturating_sub(self.line_starts[idx]) + 1;
        (to_u32(idx + 1), to_u32(col))
    }
}

fn to_u32(v: usize) -> u32 { u32::try_from(v).unwrap_or(u32::MAX) }

/* ─────────────────────────── Program ─────────────────────────── */

/// A translated, bracket-paired program. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    ops: Vec<Op>,
    /// Source byte offset of each op (same length as `ops`).
    offsets: Vec<usize>,
    lines: LineMap,
}

impl Program {
    /// Translates `source`, pairing every `[` with its `]`.
    ///
    /// A `]` with no open loop is inert, like any comment byte.
    ///
    /// # Errors
    ///
    /// `ProgramError::UnclosedLoop` if a `[` is still open at end of source;
    /// the error names that bracket's position.
    pub fn compile(source: impl AsRef<[u8]>) -> Result<Self, ProgramError> {
        let src = source.as_ref();
        let lines = LineMap::new(src);
        let mut ops = Vec::with_capacity(src.len());
        let mut offsets = Vec::with_capacity(src.len());
        // Open `[` as (op index, source offset).
        let mut open: Vec<(usize, usize)> = Vec::new();

        for (offset, &b) in src.iter().enumerate() {
            let op = match b {
                b'+' => Op::Incr,
                b'-' => Op::Decr,
                b'>' => Op::Right,
                b'<' => Op::Left,
                b'.' => Op::Output,
                b',' => Op::Input,
                b'[' => {
                    open.push((ops.len(), offset));
                    // patched when the matching `]` shows up
                    Op::LoopStart { end: usize::MAX }
                }
                b']' => {
                    let Some((start, _)) = open.pop() else {
                        continue;
                    };
                    ops[start] = Op::LoopStart { end: ops.len() };
                    Op::LoopEnd { start }
                }
                _ => continue,
            };
            ops.push(op);
            offsets.push(offset);
        }

        // Innermost unclosed bracket is the one reported.
        if let Some(&(_, offset)) = open.last() {
            let (line, column) = lines.line_col(offset);
            return Err(ProgramError::UnclosedLoop { offset, line, column });
        }

        debug!("compiled program: {} op(s) from {} byte(s)", ops.len(), src.len());
        Ok(Self { ops, offsets, lines })
    }

    /// Number of ops (comments excluded).
    pub fn len(&self) -> usize { self.ops.len() }

    /// True if the program has no instruction at all.
    pub fn is_empty(&self) -> bool { self.ops.is_empty() }

    /// Translated ops.
    pub fn ops(&self) -> &[Op] { &self.ops }

    /// Op at `pc`, if any.
    pub fn get(&self, pc: usize) -> Option<Op> { self.ops.get(pc).copied() }

    /// Source byte offset of the op at `pc`.
    pub fn offset_of(&self, pc: usize) -> Option<usize> { self.offsets.get(pc).copied() }

    /// Source `(line, column)` of the op at `pc`.
    pub fn line_col(&self, pc: usize) -> Option<(u32, u32)> {
        self.offset_of(pc).map(|off| self.lines.line_col(off))
    }
}

impl fmt::Display for Program {
    /// Prints the program with comments stripped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{}", op.symbol())?;
        }
        Ok(())
    }
}

/* ─────────────────────────── Tests ─────────────────────────── */
