//! ruban-vm — interpreter for the eight-instruction byte-tape language
//!
//! Provides:
//! - `Program` : source → ops, brackets paired up front (comments dropped)
//! - `Tape`    : wrapping 8-bit cells, grows to the right only
//! - `Machine` : one run's state (tape, loop stack, input cursor, output)
//! - `ExecOptions` / `EofPolicy` : step/tape limits, EOF behaviour
//! - `execute*` : one-shot helpers
//!
//! Quick example:
//! ```
//! let out = ruban_vm::execute("++++++[>++++++++++<-]>+++++.", b"").unwrap();
//! assert_eq!(out, b"A");
//! ```
//!
//! Features:
//! - `serde` : (de)serialisable `ExecOptions` / `EofPolicy`
//!
//! Logging goes through the `log` facade; this crate never installs a logger.

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

/* ─────────────────────────── Modules ─────────────────────────── */

pub mod error;
pub mod machine;
pub mod options;
pub mod program;
pub mod tape;

pub use error::{ProgramError, VmError, VmResult};
pub use machine::{Machine, Status};
pub use options::{EofPolicy, ExecOptions};
pub use program::{LineMap, Op, Program};
pub use tape::Tape;

/* ─────────────────────────── One-shot API ─────────────────────────── */

/// Runs `program` over `input` with default options and returns its output.
///
/// Default options: EOF reads store 0, no step or tape limit. A program that
/// never halts makes this call never return; use [`execute_with`] with a
/// step limit to bound it.
///
/// # Errors
///
/// `VmError::Program` if a `[` is never closed. With default options no
/// other error can occur.
pub fn execute(program: &str, input: &[u8]) -> VmResult<Vec<u8>> {
    execute_with(program, input, &ExecOptions::default())
}

/// Runs `program` over `input` with explicit options.
///
/// # Errors
///
/// `VmError::Program` for an unclosed `[`, then whatever the run hits under
/// `opts`: `InputExhausted`, `StepLimitExceeded` or `TapeLimitExceeded`.
pub fn execute_with(program: &str, input: &[u8], opts: &ExecOptions) -> VmResult<Vec<u8>> {
    let program = Program::compile(program)?;
    let mut machine = Machine::new(&program, input, *opts);
    machine.run()?;
    Ok(machine.into_output())
}

/// Like [`execute`], with each output byte mapped to the char of the same
/// code point (Latin-1), so every byte value yields exactly one char.
///
/// # Errors
///
/// Same as [`execute`].
pub fn execute_to_string(program: &str, input: &[u8]) -> VmResult<String> {
    execute(program, input).map(|bytes| bytes.into_iter().map(char::from).collect())
}

/* ─────────────────────────── Prelude ─────────────────────────── */

/// Handy imports for embedding the VM.
pub mod prelude {
    pub use super::{
        execute, execute_to_string, execute_with, EofPolicy, ExecOptions, Machine, Program,
        ProgramError, Status, VmError, VmResult,
    };
}

/* ─────────────────────────── Tests ─────────────────────────── */
