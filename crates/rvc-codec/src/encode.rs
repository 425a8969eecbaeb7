use rvc_core::{Canvas, CanvasError, CanvasProfile};

/// Encodes `payload` onto a fresh canvas under `profile`.
///
/// Steps are assigned positionally, one per byte, counting up from the
/// profile's base; the counter is threaded explicitly rather than held
/// in shared state. No partial canvas escapes: the result is either a
/// complete container or an error.
pub fn encode(payload: &[u8], profile: CanvasProfile) -> Result<Canvas, CanvasError> {
    let len = payload.len() as u64;
    if len > profile.capacity() {
        // The loop below would hit the same wall; failing up front
        // names the first step that cannot be placed.
        return Err(CanvasError::CapacityExceeded {
            step: profile.base.value() + profile.capacity(),
            k_max: profile.k_max,
        });
    }

    let mut canvas = Canvas::new(profile);
    let base = profile.base.value();
    for (i, &x) in payload.iter().enumerate() {
        canvas.stamp(base + i as u64, x)?;
    }

    tracing::debug!(bytes = len, "canvas encode complete");
    Ok(canvas)
}
