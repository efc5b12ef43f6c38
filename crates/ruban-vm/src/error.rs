//! error.rs — Errors raised while translating or running a program.
//!
//! Two layers:
//!   - `ProgramError` : the source cannot be translated (unclosed `[`).
//!   - `VmError`      : anything that stops a run, translation errors included.

use thiserror::Error;

/// Translation errors. Positions are byte offsets plus 1-based line/column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// `[` with no matching `]` before the end of the source.
    #[error("unclosed loop: `[` at {line}:{column} (offset {offset}) has no matching `]`")]
    UnclosedLoop {
        /// Byte offset of the `[`.
        offset: usize,
        /// Line of the `[` (1-based).
        line: u32,
        /// Column of the `[` (1-based, in bytes).
        column: u32,
    },
}

/// Errors that stop a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// The source could not be translated.
    #[error(transparent)]
    Program(#[from] ProgramError),

    /// `,` executed with no input left under `EofPolicy::Error`.
    #[error("input exhausted at op {pc} after {consumed} byte(s)")]
    InputExhausted {
        /// Index of the `,` op.
        pc: usize,
        /// Number of input bytes consumed so far.
        consumed: usize,
    },

    /// The run would execute more instructions than allowed.
    #[error("step limit of {limit} instruction(s) exceeded")]
    StepLimitExceeded {
        /// Configured limit.
        limit: u64,
    },

    /// The tape would grow past the configured number of cells.
    #[error("tape limit of {limit} cell(s) exceeded")]
    TapeLimitExceeded {
        /// Configured limit.
        limit: usize,
    },
}

/// VM result alias.
pub type VmResult<T> = std::result::Result<T, VmError>;

/* ─────────────────────────── Tests ─────────────────────────── */
