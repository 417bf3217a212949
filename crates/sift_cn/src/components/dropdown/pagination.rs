//! Lazy materialization of the option list
//!
//! The default (unfiltered) view shows a prefix of the option set. The
//! prefix grows one batch at a time and never shrinks while mounted.

use std::ops::Range;

/// Default number of options materialized per step
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Prefix cursor into the option set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    cursor: usize,
    total: usize,
    batch_size: usize,
}

impl Pagination {
    /// Nothing materialized yet. A zero batch size is treated as one.
    pub fn new(total: usize, batch_size: usize) -> Self {
        Self {
            cursor: 0,
            total,
            batch_size: batch_size.max(1),
        }
    }

    /// Extend the window by one batch
    ///
    /// Returns the range of newly materialized options; empty once the
    /// whole set is materialized.
    pub fn load_next(&mut self) -> Range<usize> {
        let start = self.cursor;
        let end = (start + self.batch_size).min(self.total);
        self.cursor = end;
        start..end
    }

    /// Number of options materialized
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Every option is materialized
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.total
    }

    /// The materialized prefix of `options`
    pub fn materialized<'a>(&self, options: &'a [String]) -> &'a [String] {
        &options[..self.cursor.min(options.len())]
    }
}
