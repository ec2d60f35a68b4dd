//! Deterministic job runner: foreground loop interleaved with step ticks.
//!
//! Simulates the firmware's single core on one thread. Each tick runs
//! `steps_per_tick` step interrupts (pop one power, apply it to the laser),
//! then one pass of the foreground control loop (`manage_laser`). Command
//! lines are fed through the [`LinePipeline`] between ticks; a line that
//! enqueues a move waits for a free planner slot first, the way the parser
//! stalls on a full move queue.
//!
//! ## Tick
//! ```text
//!   ┌ step × steps_per_tick ┐   ┌ foreground ┐
//!   │ next_power → set_laser│ → │ manage_laser│
//!   └───────────────────────┘   └─────────────┘
//! ```

use heapless::Deque;
use laser_common::prelude::{
    ConfigError, Job, JobLine, LaserControlConfig, MAX_MOVE_QUEUE, RunnerConfig,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::actuator::LaserActuator;
use crate::output::LaserOutputs;
use crate::pipeline::{LineOutcome, LinePipeline, PipelineStats};
use crate::ring::{ClaimedSpan, PowerRing, StepConsumer};

/// Job runner failures.
#[derive(Debug, Clone, Error)]
pub enum RunError {
    /// Runner settings failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Planner queue had no free slot for a move.
    #[error("move queue full ({depth} moves queued)")]
    QueueFull { depth: usize },
}

/// A move accepted into the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedMove {
    /// Power values claimed for the move.
    pub span: ClaimedSpan,
    /// Step interrupts the move runs for.
    pub steps: u32,
}

/// The move being executed.
#[derive(Debug, Clone, Copy)]
struct ActiveMove {
    steps_left: u32,
    /// Claimed samples of this move not yet popped.
    samples_left: usize,
}

impl From<PlannedMove> for ActiveMove {
    fn from(planned: PlannedMove) -> Self {
        Self {
            steps_left: planned.steps,
            samples_left: planned.span.len,
        }
    }
}

// ─── Run Statistics ─────────────────────────────────────────────────

/// Counters accumulated over a job. O(1) per update, no allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Line pipeline counters.
    pub pipeline: PipelineStats,
    /// Moves whose steps all ran.
    pub moves_completed: u64,
    /// Step interrupts executed.
    pub steps: u64,
    /// Claimed samples skipped because their move ran out of steps first.
    pub samples_skipped: u64,
    /// Foreground ticks executed.
    pub ticks: u64,
    /// Ticks that ended with the cooling fan running.
    pub fan_on_ticks: u64,
    /// High-water mark of live samples in the ring.
    pub max_live_samples: usize,
    /// High-water mark of the planner queue.
    pub max_queued_moves: usize,
}

impl RunStats {
    #[inline]
    fn record_tick(&mut self, fan_on: bool) {
        self.ticks += 1;
        if fan_on {
            self.fan_on_ticks += 1;
        }
    }

    #[inline]
    fn record_levels(&mut self, live_samples: usize, queued_moves: usize) {
        self.max_live_samples = self.max_live_samples.max(live_samples);
        self.max_queued_moves = self.max_queued_moves.max(queued_moves);
    }
}

// ─── Runner ─────────────────────────────────────────────────────────

/// Owns both ring handles, the actuator and the planner queue.
pub struct JobRunner<'a, const N: usize, O: LaserOutputs> {
    ring: &'a PowerRing<N>,
    pipeline: LinePipeline<'a, N>,
    consumer: StepConsumer<'a, N>,
    actuator: LaserActuator<O>,
    moves: Deque<PlannedMove, MAX_MOVE_QUEUE>,
    active: Option<ActiveMove>,
    settings: RunnerConfig,
    stats: RunStats,
}

impl<'a, const N: usize, O: LaserOutputs> JobRunner<'a, N, O> {
    /// Validate `config`, split the ring and take ownership of the outputs.
    ///
    /// # Errors
    ///
    /// [`RunError::Config`] if any config section is out of bounds; the ring
    /// and the outputs are left untouched.
    pub fn new(
        ring: &'a mut PowerRing<N>,
        outputs: O,
        config: &LaserControlConfig,
    ) -> Result<Self, RunError> {
        config.validate()?;

        let (writer, consumer) = ring.split();
        Ok(Self {
            ring: writer.ring(),
            pipeline: LinePipeline::new(writer),
            consumer,
            actuator: LaserActuator::new(outputs, config.laser),
            moves: Deque::new(),
            active: None,
            settings: config.runner,
            stats: RunStats::default(),
        })
    }

    pub fn ring(&self) -> &'a PowerRing<N> {
        self.ring
    }

    pub fn actuator(&self) -> &LaserActuator<O> {
        &self.actuator
    }

    /// Mutable access for the head detector and other foreground callers.
    pub fn actuator_mut(&mut self) -> &mut LaserActuator<O> {
        &mut self.actuator
    }

    /// Moves waiting in the planner (not counting the one executing).
    pub fn queued_moves(&self) -> usize {
        self.moves.len()
    }

    /// True while a move is executing or waiting.
    pub fn is_moving(&self) -> bool {
        self.active.is_some() || !self.moves.is_empty()
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            pipeline: *self.pipeline.stats(),
            ..self.stats
        }
    }

    /// Feed every line, let all moves finish, then switch the laser off and
    /// give the fan its drain check.
    pub fn run(&mut self, job: &Job) -> Result<RunStats, RunError> {
        info!(lines = job.lines.len(), "job started");
        for line in &job.lines {
            self.feed(line)?;
        }
        self.drain();

        self.actuator.set_laser(0);
        self.actuator.manage_laser(self.ring);
        if !self.ring.is_empty() {
            warn!(
                remaining = self.ring.len(),
                "job finished with laser power values still in the ring"
            );
        }
        Ok(self.stats())
    }

    /// Feed one command line, then run one tick.
    ///
    /// A moving line first waits for a free planner slot, so its samples are
    /// only claimed once the move can be queued.
    pub fn feed(&mut self, line: &JobLine) -> Result<LineOutcome, RunError> {
        if line.motion {
            while self.moves.len() >= self.settings.move_queue_depth {
                self.tick();
            }
            if self.moves.is_full() {
                return Err(RunError::QueueFull {
                    depth: self.moves.len(),
                });
            }
        }

        let outcome = self.pipeline.process_line(line);
        if let LineOutcome::Queued(span) = outcome {
            let planned = PlannedMove {
                span,
                steps: line.step_count(),
            };
            self.moves.push_back(planned).map_err(|_| RunError::QueueFull {
                depth: self.moves.len(),
            })?;
            debug!(steps = planned.steps, samples = span.len, "move queued");
        }
        self.stats.record_levels(self.ring.len(), self.moves.len());

        self.tick();
        Ok(outcome)
    }

    /// Tick until the planner is empty.
    pub fn drain(&mut self) {
        while self.is_moving() {
            self.tick();
        }
    }

    /// One foreground iteration preceded by its step interrupts.
    pub fn tick(&mut self) {
        for _ in 0..self.settings.steps_per_tick {
            if !self.step() {
                break;
            }
        }
        self.actuator.manage_laser(self.ring);
        self.stats.record_tick(self.actuator.is_fan_on());
    }

    /// Immediate laser + fan shutdown.
    pub fn shutdown(&mut self) {
        self.actuator.disable_laser();
    }

    /// One step interrupt. Returns `false` when no move is available.
    fn step(&mut self) -> bool {
        let mut active = loop {
            match self.active {
                Some(m) if m.steps_left == 0 => self.complete_move(),
                Some(m) => break m,
                None => match self.moves.pop_front() {
                    Some(planned) => self.active = Some(planned.into()),
                    None => return false,
                },
            }
        };

        let power = self.consumer.next_power();
        self.actuator.set_laser(power);
        self.stats.steps += 1;

        active.steps_left -= 1;
        active.samples_left = active.samples_left.saturating_sub(1);
        self.active = Some(active);
        if active.steps_left == 0 {
            self.complete_move();
        }
        true
    }

    /// Retire the active move. Samples it claimed but never stepped through
    /// are popped here so the next move starts on its own values.
    fn complete_move(&mut self) {
        let leftover = self.active.take().map_or(0, |done| done.samples_left);
        if leftover > 0 {
            warn!(
                skipped = leftover,
                "move finished before its laser power values, skipping the rest"
            );
            for _ in 0..leftover {
                self.consumer.next_power();
            }
            self.stats.samples_skipped += leftover as u64;
        }
        self.stats.moves_completed += 1;
    }
}
