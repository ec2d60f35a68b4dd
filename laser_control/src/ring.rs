//! Laser power ring.
//!
//! Fixed array of 8-bit power samples shared between the foreground context
//! (parser, checksum stage, motion acceptance) and the step interrupt. Four
//! cursors partition the ring, in circular order starting at `oldest`:
//!
//! ```text
//!   oldest      unclaimed      committed       write           oldest
//!     │ claimed    │ committed    │ appended     │ free            │
//!     ├────────────┼──────────────┼──────────────┼─────────────────┤
//!     │ by a move  │ not claimed  │ not checked  │ (>= 1 slot)     │
//! ```
//!
//! ## Ownership
//!
//! No locks. Each cursor has exactly one writer context:
//!
//! | Cursor      | Writer                          |
//! |-------------|---------------------------------|
//! | `write`     | foreground ([`LineWriter`])     |
//! | `committed` | foreground ([`LineWriter`])     |
//! | `unclaimed` | foreground ([`LineWriter`])     |
//! | `oldest`    | step context ([`StepConsumer`]) |
//!
//! [`PowerRing::split`] hands out exactly one handle per context, so the
//! single-writer rule is enforced by the borrow checker. Foreign cursors are
//! only ever compared against to bound the owner's own movement, and they only
//! move forward, so a stale read is always conservative.
//!
//! One slot is always kept free: `write + 1 == oldest` means full and
//! `write == oldest` means empty.

pub mod commit;
pub mod consumer;

use core::sync::atomic::{AtomicU8, AtomicU16, AtomicU32, Ordering};

use laser_common::consts::POWER_BUFFER_LEN;
use laser_common::power::Power;
use static_assertions::{assert_impl_all, const_assert};

pub use commit::{ClaimedSpan, CommitError, LineMarks, LineWriter};
pub use consumer::StepConsumer;

/// Index into the ring storage.
pub type Cursor = u16;

// ─── Cursor Snapshot ────────────────────────────────────────────────

/// Point-in-time copy of the four cursors (diagnostics and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingCursors {
    pub write: Cursor,
    pub committed: Cursor,
    pub unclaimed: Cursor,
    pub oldest: Cursor,
}

impl RingCursors {
    /// All cursors at slot 0.
    pub const ORIGIN: Self = Self {
        write: 0,
        committed: 0,
        unclaimed: 0,
        oldest: 0,
    };

    /// True if `oldest ≤ unclaimed ≤ committed ≤ write`, measured as forward
    /// distance from `oldest` in a ring of `len` slots.
    pub fn is_ordered(&self, len: usize) -> bool {
        let d = |c: Cursor| (c as usize + len - self.oldest as usize) % len;
        d(self.unclaimed) <= d(self.committed) && d(self.committed) <= d(self.write)
    }

    /// True if all four cursors coincide.
    pub fn all_equal(&self) -> bool {
        self.write == self.committed
            && self.committed == self.unclaimed
            && self.unclaimed == self.oldest
    }
}

// ─── Ring ───────────────────────────────────────────────────────────

/// Fixed-capacity laser power ring with `N` slots (`N - 1` usable).
///
/// Can live in a `static`: construction is `const` and all interior state
/// is atomic.
pub struct PowerRing<const N: usize> {
    elts: [AtomicU8; N],
    write: AtomicU16,
    committed: AtomicU16,
    unclaimed: AtomicU16,
    oldest: AtomicU16,
    /// Appends refused because the ring was full.
    dropped: AtomicU32,
}

impl<const N: usize> PowerRing<N> {
    const SIZE_OK: () = assert!(
        N >= 2 && N <= u16::MAX as usize,
        "PowerRing needs 2..=65535 slots"
    );

    /// Create an empty ring with all cursors at the origin.
    pub const fn new() -> Self {
        let () = Self::SIZE_OK;
        Self {
            elts: [const { AtomicU8::new(0) }; N],
            write: AtomicU16::new(0),
            committed: AtomicU16::new(0),
            unclaimed: AtomicU16::new(0),
            oldest: AtomicU16::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Split into the foreground writer and the step-context consumer.
    ///
    /// The exclusive borrow guarantees a single handle per context for as
    /// long as the handles live.
    pub fn split(&mut self) -> (LineWriter<'_, N>, StepConsumer<'_, N>) {
        let ring: &Self = self;
        (LineWriter::new(ring), StepConsumer::new(ring))
    }

    /// Return every cursor to slot 0 and clear the drop counter.
    ///
    /// Startup / reinitialization only; requires that no handle is alive.
    pub fn reset(&mut self) {
        *self.write.get_mut() = 0;
        *self.committed.get_mut() = 0;
        *self.unclaimed.get_mut() = 0;
        *self.oldest.get_mut() = 0;
        *self.dropped.get_mut() = 0;
    }

    // ── Index arithmetic ──

    /// Next slot after `idx`, wrapping at `N`.
    #[inline]
    pub const fn advance(idx: Cursor) -> Cursor {
        let next = idx as usize + 1;
        if next >= N { 0 } else { next as Cursor }
    }

    /// Slots from `from` forward to `to` (0 when equal).
    #[inline]
    pub const fn forward_distance(from: Cursor, to: Cursor) -> usize {
        (to as usize + N - from as usize) % N
    }

    /// Forward distance from `b` to `a`, assuming a non-empty span.
    ///
    /// Never returns 0: equal cursors are read as a full lap (`N`).
    #[inline]
    pub const fn circular_distance(a: Cursor, b: Cursor) -> usize {
        let (a, b) = (a as usize, b as usize);
        if a <= b { a + N - b } else { a - b }
    }

    // ── Queries ──

    /// Usable slots (`N - 1`).
    #[inline]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// True if the next append would be dropped.
    #[inline]
    pub fn is_full(&self) -> bool {
        Self::advance(self.write.load(Ordering::Acquire)) == self.oldest.load(Ordering::Acquire)
    }

    /// True if nothing is pending anywhere: no claimed, committed or
    /// unvalidated sample remains.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.oldest.load(Ordering::Acquire) == self.write.load(Ordering::Acquire)
    }

    /// Live samples, `oldest` up to `write`.
    #[inline]
    pub fn len(&self) -> usize {
        Self::forward_distance(
            self.oldest.load(Ordering::Acquire),
            self.write.load(Ordering::Acquire),
        )
    }

    /// Samples claimed by queued moves and not yet consumed.
    #[inline]
    pub fn claimed_len(&self) -> usize {
        Self::forward_distance(
            self.oldest.load(Ordering::Acquire),
            self.unclaimed.load(Ordering::Acquire),
        )
    }

    /// Total appends dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Copy of the four cursors.
    pub fn cursors(&self) -> RingCursors {
        RingCursors {
            write: self.write.load(Ordering::Acquire),
            committed: self.committed.load(Ordering::Acquire),
            unclaimed: self.unclaimed.load(Ordering::Acquire),
            oldest: self.oldest.load(Ordering::Acquire),
        }
    }

    // ── Raw operations (one writer each, see module docs) ──

    /// Store `power` at `write` and advance it, unless the ring is full.
    ///
    /// Foreground only. Returns `false` when the sample was dropped.
    pub(crate) fn append(&self, power: Power) -> bool {
        let write = self.write.load(Ordering::Relaxed);
        let next = Self::advance(write);
        if next == self.oldest.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        self.elts[write as usize].store(power, Ordering::Relaxed);
        self.write.store(next, Ordering::Release);
        true
    }

    /// Take the sample at `oldest` if it has been claimed, else 0.
    ///
    /// Step context only. O(1), never blocks.
    pub(crate) fn pop(&self) -> Power {
        let oldest = self.oldest.load(Ordering::Relaxed);
        if oldest == self.unclaimed.load(Ordering::Acquire) {
            return 0;
        }
        let power = self.elts[oldest as usize].load(Ordering::Relaxed);
        self.oldest.store(Self::advance(oldest), Ordering::Release);
        power
    }
}

impl<const N: usize> Default for PowerRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for PowerRing<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PowerRing")
            .field("slots", &N)
            .field("cursors", &self.cursors())
            .field("dropped", &self.dropped())
            .finish()
    }
}

// Shared by reference between the foreground and the step context.
assert_impl_all!(PowerRing<POWER_BUFFER_LEN>: Send, Sync);
assert_impl_all!(LineWriter<'static, POWER_BUFFER_LEN>: Send);
assert_impl_all!(StepConsumer<'static, POWER_BUFFER_LEN>: Send);
// One byte per slot plus cursors and the drop counter.
const_assert!(core::mem::size_of::<PowerRing<POWER_BUFFER_LEN>>() <= POWER_BUFFER_LEN + 16);
