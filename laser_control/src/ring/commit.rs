//! Commit protocol: the foreground side of the ring.
//!
//! Power values of a command line are appended optimistically while the
//! line is parsed. The checksum stage then either commits them or throws them
//! away, and motion acceptance either claims the committed span for a move or
//! rolls the line back when it turned out to need no motion.
//!
//! [`LineWriter`] owns `write`, `committed` and `unclaimed`.

use core::sync::atomic::Ordering;

use laser_common::power::{Power, pct_to_power};
use thiserror::Error;

use super::{Cursor, PowerRing};

/// Commit protocol violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommitError {
    /// A newer line already advanced `committed` past the line being rolled
    /// back. Cursors are left untouched.
    #[error("rollback of line ending at slot {line_end} refused: committed is at slot {committed}")]
    StaleRollback { line_end: Cursor, committed: Cursor },
}

/// Boundaries of one committed line: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMarks {
    /// `write` when the line started.
    pub start: Cursor,
    /// `committed` right after the line was committed.
    pub end: Cursor,
}

/// Span transferred to "claimed" by one accepted move: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimedSpan {
    pub start: Cursor,
    pub end: Cursor,
    /// Samples in the span.
    pub len: usize,
}

impl ClaimedSpan {
    /// True if the move claimed no samples.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Foreground handle: appends, commits, rolls back and claims.
///
/// Obtained from [`PowerRing::split`]. Methods take `&mut self` so the handle
/// itself cannot be shared.
#[derive(Debug)]
pub struct LineWriter<'a, const N: usize> {
    ring: &'a PowerRing<N>,
}

impl<'a, const N: usize> LineWriter<'a, N> {
    pub(super) const fn new(ring: &'a PowerRing<N>) -> Self {
        Self { ring }
    }

    /// The ring this handle writes to.
    #[inline]
    pub fn ring(&self) -> &'a PowerRing<N> {
        self.ring
    }

    /// Current `write` cursor: where the next appended sample lands.
    #[inline]
    pub fn write_cursor(&self) -> Cursor {
        self.ring.write.load(Ordering::Relaxed)
    }

    /// Current `committed` cursor.
    #[inline]
    pub fn committed_cursor(&self) -> Cursor {
        self.ring.committed.load(Ordering::Relaxed)
    }

    /// Append one sample; dropped silently when the ring is full.
    ///
    /// Returns `false` if the sample was dropped.
    #[inline]
    pub fn append(&mut self, power: Power) -> bool {
        self.ring.append(power)
    }

    /// Convert a percentage and append it.
    #[inline]
    pub fn append_pct(&mut self, pct: f32) -> bool {
        self.ring.append(pct_to_power(pct))
    }

    /// Make everything appended since the last commit point claimable.
    ///
    /// Returns the new `committed` cursor (the line's end mark).
    pub fn commit_line(&mut self) -> Cursor {
        let write = self.ring.write.load(Ordering::Relaxed);
        self.ring.committed.store(write, Ordering::Release);
        write
    }

    /// Drop the unvalidated segment by rewinding `write` to `committed`.
    ///
    /// Used when a line fails its checksum, so the next commit does not pick
    /// up the rejected values. Returns the number of samples discarded.
    pub fn discard_uncommitted(&mut self) -> usize {
        let write = self.ring.write.load(Ordering::Relaxed);
        let committed = self.ring.committed.load(Ordering::Relaxed);
        self.ring.write.store(committed, Ordering::Release);
        PowerRing::<N>::forward_distance(committed, write)
    }

    /// Free a validated line that turned out to need no motion.
    ///
    /// Safe only while the line is still the most recent commit
    /// (`committed == line_committed_end`): `committed` and `write` rewind to
    /// `line_start`, and `unclaimed` follows if nothing was claimed beyond it.
    /// The next line then reuses the same slots.
    ///
    /// # Errors
    ///
    /// [`CommitError::StaleRollback`] if a newer line has committed since;
    /// no cursor is modified in that case.
    pub fn rollback_if_unclaimed(
        &mut self,
        line_start: Cursor,
        line_committed_end: Cursor,
    ) -> Result<(), CommitError> {
        let committed = self.ring.committed.load(Ordering::Relaxed);
        if committed != line_committed_end {
            return Err(CommitError::StaleRollback {
                line_end: line_committed_end,
                committed,
            });
        }

        if self.ring.unclaimed.load(Ordering::Relaxed) == committed {
            self.ring.unclaimed.store(line_start, Ordering::Release);
        }
        self.ring.committed.store(line_start, Ordering::Release);
        self.ring.write.store(line_start, Ordering::Release);
        Ok(())
    }

    /// [`rollback_if_unclaimed`](Self::rollback_if_unclaimed) using recorded marks.
    #[inline]
    pub fn rollback_line(&mut self, marks: LineMarks) -> Result<(), CommitError> {
        self.rollback_if_unclaimed(marks.start, marks.end)
    }

    /// Hand the whole committed-but-unclaimed span to the step consumer.
    ///
    /// Called once per move accepted into the planner; partial claims are
    /// not supported.
    pub fn claim_for_move(&mut self) -> ClaimedSpan {
        let start = self.ring.unclaimed.load(Ordering::Relaxed);
        let end = self.ring.committed.load(Ordering::Relaxed);
        self.ring.unclaimed.store(end, Ordering::Release);
        let len = if start == end {
            0
        } else {
            PowerRing::<N>::circular_distance(end, start)
        };
        ClaimedSpan { start, end, len }
    }
}
