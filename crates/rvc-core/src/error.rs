use std::fmt;

/// Terminal failures of the codec core.
///
/// Every variant is fatal for the operation in progress; the core
/// never retries (replaying arithmetic on the same corrupted input
/// cannot succeed). Presentation is left to callers.
#[derive(Debug)]
pub enum CanvasError {
    /// Input needs a depth index at or past the configured capacity
    /// class. Non-retryable without a larger `k_max`.
    CapacityExceeded { step: u64, k_max: u64 },
    /// A step expected to be materialized is missing from the canvas,
    /// or occupancy bookkeeping contradicts itself. Indicates a
    /// corrupted or foreign container.
    Membership(String),
    /// Peeling did not converge: a cell's content contradicts its
    /// step, or occupancy/planes were not back at baseline after the
    /// final peel.
    Convergence(String),
    /// The serialized container is structurally invalid.
    Malformed(String),
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasError::CapacityExceeded { step, k_max } => {
                write!(f, "capacity exceeded: step {step} needs depth >= k_max {k_max}")
            }
            CanvasError::Membership(msg) => write!(f, "occupancy membership violation: {msg}"),
            CanvasError::Convergence(msg) => write!(f, "convergence failure: {msg}"),
            CanvasError::Malformed(msg) => write!(f, "malformed container: {msg}"),
        }
    }
}

impl std::error::Error for CanvasError {}
