//! machine.rs — Execution context and dispatch loop
//!
//! A `Machine` owns everything one run mutates (tape, pc, loop stack, input
//! cursor, output buffer, step counter) and only borrows the immutable
//! `Program` and input bytes. Nothing is shared between machines.
//!
//! Loops run on an explicit stack instead of recursion:
//!   - `[` captures the head position (the *entry* cell). If that cell is 0
//!     the body is skipped; otherwise a `LoopFrame` is pushed.
//!   - `]` re-checks the entry cell (not the cell under the head). Nonzero →
//!     jump back to the first op of the body; zero → pop and fall through.
//!
//! Usage:
//!   let program = Program::compile(src)?;
//!   let mut m = Machine::new(&program, input, ExecOptions::default());
//!   m.run()?;
//!   let out = m.into_output();

use log::{debug, trace, warn};

use crate::{
    error::{VmError, VmResult},
    options::{EofPolicy, ExecOptions},
    program::{Op, Program},
    tape::Tape,
};

/// Outcome of a single `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// More ops remain.
    Running,
    /// The pc ran past the last op.
    Halted,
}

/// Saved state of an active loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LoopFrame {
    /// Index of the `[` op.
    start: usize,
    /// Head position when the loop was entered.
    entry: usize,
}

/// One execution of a program over one input.
#[derive(Debug, Clone)]
pub struct Machine<'p, 'i> {
    program: &'p Program,
    input: &'i [u8],
    opts: ExecOptions,
    tape: Tape,
    pc: usize,
    loops: Vec<LoopFrame>,
    input_pos: usize,
    output: Vec<u8>,
    steps: u64,
}

impl<'p, 'i> Machine<'p, 'i> {
    /// Fresh machine: pc 0, tape `[0]`, empty output.
    pub fn new(program: &'p Program, input: &'i [u8], opts: ExecOptions) -> Self {
        Self {
            program,
            input,
            opts,
            tape: Tape::new(),
            pc: 0,
            loops: Vec::new(),
            input_pos: 0,
            output: Vec::new(),
            steps: 0,
        }
    }

    /// Executes one op.
    ///
    /// On error the machine is left as it was before the failing op, so the
    /// output produced so far stays readable.
    ///
    /// # Errors
    ///
    /// `StepLimitExceeded`, `TapeLimitExceeded` or `InputExhausted`
    /// (the latter only under `EofPolicy::Error`).
    pub fn step(&mut self) -> VmResult<Status> {
        let Some(op) = self.program.get(self.pc) else {
            return Ok(Status::Halted);
        };
        if let Some(limit) = self.opts.step_limit {
            if self.steps >= limit {
                return Err(VmError::StepLimitExceeded { limit });
            }
        }

        let mut next = self.pc + 1;
        match op {
            Op::Incr => self.tape.incr(),
            Op::Decr => self.tape.decr(),
            Op::Right => {
                if !self.tape.right(self.opts.tape_limit) {
                    return Err(VmError::TapeLimitExceeded {
                        limit: self.opts.tape_limit.unwrap_or(usize::MAX),
                    });
                }
            }
            Op::Left => self.tape.left(),
            Op::Output => self.output.push(self.tape.current()),
            Op::Input => self.read_input()?,
            Op::LoopStart { end } => {
                if self.tape.current() == 0 {
                    next = end + 1;
                } else {
                    let entry = self.tape.head();
                    trace!("loop enter: pc={} entry={entry} depth={}", self.pc, self.loops.len() + 1);
                    self.loops.push(LoopFrame { start: self.pc, entry });
                }
            }
            Op::LoopEnd { start } => {
                let frame = self.loops.last().copied();
                debug_assert_eq!(frame.map(|f| f.start), Some(start));
                match frame {
                    Some(f) if self.tape.get(f.entry).is_some_and(|v| v != 0) => next = start + 1,
                    _ => {
                        self.loops.pop();
                    }
                }
            }
        }

        self.steps += 1;
        self.pc = next;
        Ok(if self.is_halted() { Status::Halted } else { Status::Running })
    }

    /// Steps until the program halts or an error stops it.
    ///
    /// # Errors
    ///
    /// The first error returned by [`Machine::step`].
    pub fn run(&mut self) -> VmResult<()> {
        debug!(
            "run start: {} op(s), {} input byte(s), {:?}",
            self.program.len(),
            self.input.len(),
            self.opts
        );
        loop {
            match self.step() {
                Ok(Status::Running) => {}
                Ok(Status::Halted) => break,
                Err(e) => {
                    warn!("run aborted at pc={} after {} step(s): {e}", self.pc, self.steps);
                    return Err(e);
                }
            }
        }
        debug!(
            "run done: {} step(s), {} output byte(s), {} cell(s)",
            self.steps,
            self.output.len(),
            self.tape.len()
        );
        Ok(())
    }

    fn read_input(&mut self) -> VmResult<()> {
        if let Some(&b) = self.input.get(self.input_pos) {
            self.tape.set(b);
            self.input_pos += 1;
            return Ok(());
        }
        match self.opts.eof {
            EofPolicy::Zero => self.tape.set(0),
            EofPolicy::Unchanged => {}
            EofPolicy::Error => {
                return Err(VmError::InputExhausted { pc: self.pc, consumed: self.input_pos });
            }
        }
        Ok(())
    }

    /* ───────────── Introspection ───────────── */

    /// The tape.
    pub fn tape(&self) -> &Tape { &self.tape }

    /// Output emitted so far.
    pub fn output(&self) -> &[u8] { &self.output }

    /// Consumes the machine, returning its output.
    pub fn into_output(self) -> Vec<u8> { self.output }

    /// Number of executed instructions.
    pub fn steps(&self) -> u64 { self.steps }

    /// Index of the next op to execute.
    pub fn pc(&self) -> usize { self.pc }

    /// Number of input bytes read so far.
    pub fn input_consumed(&self) -> usize { self.input_pos }

    /// Number of loops currently entered.
    pub fn loop_depth(&self) -> usize { self.loops.len() }

    /// True once the pc has run past the last op.
    pub fn is_halted(&self) -> bool { self.pc >= self.program.len() }

    /// Options this machine runs with.
    pub fn options(&self) -> &ExecOptions { &self.opts }
}

/* ─────────────────────────── Tests ─────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn machine(program: &Program) -> Machine<'_, 'static> {
        Machine::new(program, &[], ExecOptions::default())
    }

    #[test]
    fn empty_program_is_halted_from_the_start() {
        let p = Program::compile("").unwrap();
        let mut m = machine(&p);
        assert!(m.is_halted());
        assert_eq!(m.step().unwrap(), Status::Halted);
        assert_eq!(m.steps(), 0);
    }

    #[test]
    fn step_reports_running_then_halted() {
        let p = Program::compile("+.").unwrap();
        let mut m = machine(&p);
        assert_eq!(m.step().unwrap(), Status::Running);
        assert_eq!(m.step().unwrap(), Status::Halted);
        assert_eq!(m.output(), &[1]);
    }

    #[test]
    fn zero_entry_cell_skips_the_body() {
        let p = Program::compile("[+++.]+").unwrap();
        let mut m = machine(&p);
        m.run().unwrap();
        assert_eq!(m.output(), &[] as &[u8]);
        assert_eq!(m.tape().cells(), &[1]);
        // `[` then `+`
        assert_eq!(m.steps(), 2);
    }

    #[test]
    fn loop_rechecks_the_entry_cell_not_the_head() {
        let p = Program::compile("++[>+<-]>.").unwrap();
        let mut m = machine(&p);
        m.run().unwrap();
        assert_eq!(m.output(), &[2]);

        // At `]` the head sits on cell 1 (value 1) but cell 0 is already 0.
        let p = Program::compile("+[->+].").unwrap();
        let mut m = machine(&p);
        m.run().unwrap();
        assert_eq!(m.tape().cells(), &[0, 1]);
        assert_eq!(m.tape().head(), 1);
        assert_eq!(m.output(), &[1]);
    }

    #[test]
    fn loop_stack_unwinds() {
        let p = Program::compile("++[>++[-]<-]").unwrap();
        let mut m = machine(&p);
        m.run().unwrap();
        assert_eq!(m.loop_depth(), 0);
        assert_eq!(m.tape().cells(), &[0, 0]);
    }

    #[test]
    fn step_limit_counts_instructions_only() {
        let p = Program::compile("+ + + comment").unwrap();
        let mut m = Machine::new(&p, &[], ExecOptions::default().with_step_limit(3));
        m.run().unwrap();
        assert_eq!(m.steps(), 3);

        let mut m = Machine::new(&p, &[], ExecOptions::default().with_step_limit(2));
        assert_eq!(m.run(), Err(VmError::StepLimitExceeded { limit: 2 }));
        assert_eq!(m.tape().current(), 2);
    }

    #[test]
    fn tape_limit_stops_growth() {
        let p = Program::compile("+[>+]").unwrap();
        let mut m = Machine::new(&p, &[], ExecOptions::default().with_tape_limit(4));
        assert_eq!(m.run(), Err(VmError::TapeLimitExceeded { limit: 4 }));
        assert_eq!(m.tape().len(), 4);
    }

    #[test]
    fn eof_policies() {
        let p = Program::compile("+,.").unwrap();

        let mut m = Machine::new(&p, &[], ExecOptions::default());
        m.run().unwrap();
        assert_eq!(m.output(), &[0]);

        let mut m = Machine::new(&p, &[], ExecOptions::default().with_eof(EofPolicy::Unchanged));
        m.run().unwrap();
        assert_eq!(m.output(), &[1]);

        let mut m = Machine::new(&p, &[], ExecOptions::default().with_eof(EofPolicy::Error));
        assert_eq!(m.run(), Err(VmError::InputExhausted { pc: 1, consumed: 0 }));
        assert_eq!(m.pc(), 1);
    }

    #[test]
    fn input_is_consumed_in_order() {
        let p = Program::compile(",.,.").unwrap();
        let mut m = Machine::new(&p, b"xy", ExecOptions::default());
        m.run().unwrap();
        assert_eq!(m.input_consumed(), 2);
        assert_eq!(m.into_output(), b"xy".to_vec());
    }
}
