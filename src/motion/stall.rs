//! Encoder-based stall supervision.
//!
//! Every scheduler tick compares the steps commanded since the last sample
//! with the encoder movement over the same interval. Short intervals are not
//! judged; once enough steps have accumulated the sample is evaluated and the
//! baseline moves to the encoder-derived position.

use crate::config::EncoderScale;

/// Minimum commanded steps between two evaluated samples.
pub const STALLED_STEPS: u32 = 15;

/// Consecutive bad samples tolerated before the axis is declared stalled.
pub const NSTALLED_MAX: u8 = 5;

/// Outcome of one stall check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StallVerdict {
    /// Not enough steps since the last sample; nothing evaluated.
    Insufficient,
    /// Encoder followed the commanded motion.
    Healthy,
    /// Encoder disagrees, but not yet persistently.
    Slipping,
    /// Encoder disagreed for more than [`NSTALLED_MAX`] samples in a row.
    Stalled,
}

impl StallVerdict {
    /// Whether the sample was evaluated and the baseline resynchronized.
    #[inline]
    pub fn resynced(self) -> bool {
        self != StallVerdict::Insufficient
    }
}

/// Stall detector state of one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StallDetector {
    prev_step: i32,
    prev_encoder: i32,
    count: u8,
}

impl StallDetector {
    /// Detector with zeroed baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consecutive bad samples so far.
    #[inline]
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Move the baseline to the given step and encoder positions.
    pub fn rebase(&mut self, step_position: i32, encoder: i32) {
        self.prev_step = step_position;
        self.prev_encoder = encoder;
    }

    /// Reset the bad-sample counter for a new move.
    ///
    /// Resuming after a stall keeps half the budget used up.
    pub fn forgive(&mut self, resuming_from_stall: bool) {
        self.count = if resuming_from_stall { NSTALLED_MAX / 2 } else { 0 };
    }

    /// Evaluate one sample.
    ///
    /// `encoder_position` is the step position derived from `encoder`; on an
    /// evaluated sample it becomes the new step baseline and the caller must
    /// resynchronize its step counter to it.
    pub fn check(
        &mut self,
        step_position: i32,
        encoder: i32,
        encoder_position: i32,
        scale: &EncoderScale,
    ) -> StallVerdict {
        let dstep = step_position as i64 - self.prev_step as i64;
        let dstp = dstep.unsigned_abs();
        if dstp < STALLED_STEPS as u64 {
            return StallVerdict::Insufficient;
        }

        let denc_raw = encoder as i64 - self.prev_encoder as i64;
        let mut denc = denc_raw.abs();
        if denc_raw != 0 && (denc_raw > 0) != (dstep > 0) {
            denc = -denc;
        }

        self.rebase(encoder_position, encoder);

        let steps = dstp as f32;
        let ticks = denc as f32;
        if ticks < scale.per_step_min * steps || ticks > scale.per_step_max * steps {
            self.count = self.count.saturating_add(1);
            if self.count > NSTALLED_MAX {
                StallVerdict::Stalled
            } else {
                StallVerdict::Slipping
            }
        } else {
            self.count = 0;
            StallVerdict::Healthy
        }
    }
}
