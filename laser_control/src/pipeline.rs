//! Per-line foreground flow through the commit protocol.
//!
//! For each command line:
//! 1. append every `L` value as it is parsed (optimistic);
//! 2. checksum failed → discard the unvalidated values;
//! 3. checksum passed → commit;
//! 4. line enqueues a move → claim the committed span for it;
//!    line needs no motion → roll the line back so its slots are reused.

use laser_common::laser::job::JobLine;
use tracing::{error, trace, warn};

use crate::ring::{ClaimedSpan, CommitError, LineMarks, LineWriter};

/// What happened to one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Checksum failed; appended values thrown away.
    Rejected { discarded: usize },
    /// Committed and claimed by a move.
    Queued(ClaimedSpan),
    /// Committed, then rolled back because no motion was needed.
    Handled(LineMarks),
    /// Committed, no motion, but rollback was refused; values stay committed.
    Stale(CommitError),
}

/// Running pipeline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub lines: u64,
    pub rejected: u64,
    pub queued: u64,
    pub rolled_back: u64,
    pub stale_rollbacks: u64,
    pub samples_appended: u64,
    pub samples_dropped: u64,
}

/// Foreground side of the ring, one line at a time.
#[derive(Debug)]
pub struct LinePipeline<'a, const N: usize> {
    writer: LineWriter<'a, N>,
    stats: PipelineStats,
}

impl<'a, const N: usize> LinePipeline<'a, N> {
    pub fn new(writer: LineWriter<'a, N>) -> Self {
        Self {
            writer,
            stats: PipelineStats::default(),
        }
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn writer(&self) -> &LineWriter<'a, N> {
        &self.writer
    }

    /// Run one line through append → validate → claim / rollback.
    pub fn process_line(&mut self, line: &JobLine) -> LineOutcome {
        self.stats.lines += 1;
        let start = self.writer.write_cursor();

        let mut dropped = 0usize;
        for &pct in &line.powers {
            if self.writer.append_pct(pct) {
                self.stats.samples_appended += 1;
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            self.stats.samples_dropped += dropped as u64;
            warn!(
                line = self.stats.lines,
                dropped, "power ring full, laser power values dropped"
            );
        }

        if !line.checksum_ok {
            let discarded = self.writer.discard_uncommitted();
            self.stats.rejected += 1;
            trace!(line = self.stats.lines, discarded, "checksum failed");
            return LineOutcome::Rejected { discarded };
        }

        let marks = LineMarks {
            start,
            end: self.writer.commit_line(),
        };

        if line.motion {
            let span = self.writer.claim_for_move();
            self.stats.queued += 1;
            trace!(line = self.stats.lines, ?span, "claimed for move");
            return LineOutcome::Queued(span);
        }

        match self.writer.rollback_line(marks) {
            Ok(()) => {
                self.stats.rolled_back += 1;
                trace!(line = self.stats.lines, ?marks, "no motion, line released");
                LineOutcome::Handled(marks)
            }
            Err(e) => {
                self.stats.stale_rollbacks += 1;
                error!(line = self.stats.lines, "{e}");
                LineOutcome::Stale(e)
            }
        }
    }
}
