//! Run configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What `,` does once the input is used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EofPolicy {
    /// Store 0 in the current cell.
    #[default]
    Zero,
    /// Leave the current cell as it is.
    Unchanged,
    /// Stop the run with `VmError::InputExhausted`.
    Error,
}

/// Options for one run. `Default` = zero on EOF, no limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExecOptions {
    /// Input exhaustion policy.
    pub eof: EofPolicy,
    /// Max number of executed instructions (comments never count).
    pub step_limit: Option<u64>,
    /// Max number of tape cells.
    pub tape_limit: Option<usize>,
}

impl ExecOptions {
    /// Sets the EOF policy.
    #[must_use]
    pub const fn with_eof(mut self, eof: EofPolicy) -> Self {
        self.eof = eof;
        self
    }

    /// Bounds the number of executed instructions.
    #[must_use]
    pub const fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Bounds the number of tape cells.
    #[must_use]
    pub const fn with_tape_limit(mut self, limit: usize) -> Self {
        self.tape_limit = Some(limit);
        self
    }
}

/* ─────────────────────────── Tests ─────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let o = ExecOptions::default()
            .with_eof(EofPolicy::Error)
            .with_step_limit(7)
            .with_tape_limit(3);
        assert_eq!(o.eof, EofPolicy::Error);
        assert_eq!(o.step_limit, Some(7));
        assert_eq!(o.tape_limit, Some(3));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_fills_missing_fields() {
        let o: ExecOptions = serde_json::from_str(r#"{"eof":"unchanged"}"#).unwrap();
        assert_eq!(o, ExecOptions::default().with_eof(EofPolicy::Unchanged));
    }
}
