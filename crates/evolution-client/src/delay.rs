//! Send throttling for bulk loops

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay for the given (zero-based) loop round.
///
/// The first `const_rounds` rounds use `min`; after that the delay grows by
/// one per round, capped at `max`.
pub fn calculate_send_delay(loop_index: u32, min: u32, max: u32, const_rounds: u32) -> u32 {
    if loop_index < const_rounds {
        return min;
    }
    let delay = min.saturating_add((loop_index - const_rounds).saturating_add(1));
    delay.min(max)
}

/// Throttling parameters for bulk sends, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendDelay {
    #[serde(default = "default_min")]
    pub min: u32,
    #[serde(default = "default_max")]
    pub max: u32,
    #[serde(default = "default_const_rounds")]
    pub const_rounds: u32,
}

impl Default for SendDelay {
    fn default() -> Self {
        Self {
            min: default_min(),
            max: default_max(),
            const_rounds: default_const_rounds(),
        }
    }
}

fn default_min() -> u32 {
    5
}

fn default_max() -> u32 {
    30
}

fn default_const_rounds() -> u32 {
    10
}

impl SendDelay {
    /// Delay in seconds for the given round
    pub fn seconds(&self, loop_index: u32) -> u32 {
        calculate_send_delay(loop_index, self.min, self.max, self.const_rounds)
    }

    /// Delay for the given round, ready to pass as a send pause
    pub fn pause(&self, loop_index: u32) -> Duration {
        Duration::from_secs(u64::from(self.seconds(loop_index)))
    }
}
