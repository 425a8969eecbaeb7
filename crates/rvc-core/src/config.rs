use serde::{Deserialize, Serialize};

use crate::mapper::K_MAX_DEFAULT;

/// Rest state of every trace-plane cell. Fixed for the lifetime of one
/// container, recorded in its header at encode time, and required at
/// decode time — never inferred from cell contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    /// Untouched cells rest at zero; encoding raises them.
    Zero,
    /// Untouched cells rest at the all-maximum value; encoding erases
    /// from it.
    Full,
}

/// First step index handed to the mapper. Step assignment is
/// positional, so the base shifts every coordinate's row component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepBase {
    Zero,
    One,
}

impl StepBase {
    #[inline]
    pub fn value(self) -> u64 {
        match self {
            StepBase::Zero => 0,
            StepBase::One => 1,
        }
    }
}

/// Container-level configuration, fixed per canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasProfile {
    #[serde(default = "default_baseline")]
    pub baseline: Baseline,
    #[serde(default = "default_base")]
    pub base: StepBase,
    /// Capacity class: depth indices must stay below this bound.
    #[serde(default = "default_k_max")]
    pub k_max: u64,
}

fn default_baseline() -> Baseline {
    Baseline::Full
}

fn default_base() -> StepBase {
    StepBase::One
}

fn default_k_max() -> u64 {
    K_MAX_DEFAULT
}

impl Default for CanvasProfile {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            base: default_base(),
            k_max: default_k_max(),
        }
    }
}

impl CanvasProfile {
    /// Maximum number of encodable bytes: one byte per step, steps
    /// running from the base while `step >> 1 < k_max`.
    pub fn capacity(&self) -> u64 {
        // Largest admissible step is 2 * k_max - 1 (lane R at the last
        // depth), so the step range [base, 2 * k_max) is usable.
        (2u64).saturating_mul(self.k_max).saturating_sub(self.base.value())
    }
}
