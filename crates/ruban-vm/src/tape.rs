//! tape.rs — Byte tape with a head that never leaves it.
//!
//! Invariants: `cells.len() >= 1` and `head < cells.len()`. The tape grows
//! one zero cell at a time to the right and never shrinks.

/// Growable tape of wrapping 8-bit cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    head: usize,
}

impl Default for Tape {
    fn default() -> Self { Self::new() }
}

impl Tape {
    /// Fresh tape: one zero cell, head at 0.
    pub fn new() -> Self { Self { cells: vec![0], head: 0 } }

    /// Current head position.
    pub fn head(&self) -> usize { self.head }

    /// Number of cells allocated so far.
    pub fn len(&self) -> usize { self.cells.len() }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    /// All cells, leftmost first.
    pub fn cells(&self) -> &[u8] { &self.cells }

    /// Value under the head.
    pub fn current(&self) -> u8 { self.cells[self.head] }

    /// Value at `index`, if the tape reaches that far.
    pub fn get(&self, index: usize) -> Option<u8> { self.cells.get(index).copied() }

    /// Overwrites the cell under the head.
    pub fn set(&mut self, value: u8) { self.cells[self.head] = value; }

    /// `+` : wrapping increment.
    pub fn incr(&mut self) {
        let c = &mut self.cells[self.head];
        *c = c.wrapping_add(1);
    }

    /// `-` : wrapping decrement.
    pub fn decr(&mut self) {
        let c = &mut self.cells[self.head];
        *c = c.wrapping_sub(1);
    }

    /// `>` : moves right, appending a zero cell when stepping past the end.
    ///
    /// Returns `false` (and leaves the tape untouched) if growing would make
    /// the tape longer than `limit` cells.
    pub fn right(&mut self, limit: Option<usize>) -> bool {
        let next = self.head + 1;
        if next >= self.cells.len() {
            if limit.is_some_and(|max| next >= max) {
                return false;
            }
            self.cells.push(0);
        }
        self.head = next;
        true
    }

    /// `<` : moves left, clamped at 0.
    pub fn left(&mut self) { self.head = self.head.saturating_sub(1); }
}

/* ─────────────────────────── Tests ─────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_with_one_zero_cell() {
        let t = Tape::new();
        assert_eq!(t.cells(), &[0]);
        assert_eq!(t.head(), 0);
        assert!(!t.is_empty());
    }

    #[test]
    fn wraps_both_ways() {
        let mut t = Tape::new();
        t.decr();
        assert_eq!(t.current(), 255);
        t.incr();
        assert_eq!(t.current(), 0);
    }

    #[test]
    fn right_grows_by_one_and_left_clamps() {
        let mut t = Tape::new();
        assert!(t.right(None));
        assert!(t.right(None));
        assert_eq!(t.len(), 3);
        t.left();
        t.left();
        t.left();
        assert_eq!(t.head(), 0);
        // moving over existing cells never grows
        assert!(t.right(None));
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn right_respects_limit() {
        let mut t = Tape::new();
        assert!(t.right(Some(2)));
        assert!(!t.right(Some(2)));
        assert_eq!(t.head(), 1);
        assert_eq!(t.len(), 2);
    }
}
