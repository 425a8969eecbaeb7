use rvc_core::{Canvas, CanvasError, Lane};

/// Peels a canvas back to the original byte sequence.
///
/// The total step count comes from the container header, never from
/// `max(BA)`. Steps are reverted in strictly descending order — each
/// cell's inverse transform is only valid against the matching forward
/// transform, so the order is semantic, not an optimization. The
/// terminal phase is [`verify`].
pub fn decode(mut canvas: Canvas) -> Result<Vec<u8>, CanvasError> {
    let n = canvas.steps();
    if canvas.occupied_steps() != n {
        return Err(CanvasError::Membership(format!(
            "occupancy holds {} steps but the header declares {n}",
            canvas.occupied_steps()
        )));
    }

    let base = canvas.profile().base.value();
    let mut out = vec![0u8; n as usize];
    for i in (0..n).rev() {
        out[i as usize] = canvas.peel(base + i)?;
    }

    verify(&canvas)?;
    tracing::debug!(bytes = n, "canvas decode converged");
    Ok(out)
}

/// The formal reversibility check for one decode run: occupancy must
/// be empty and both planes back at baseline. Not a cryptographic
/// integrity check.
pub fn verify(canvas: &Canvas) -> Result<(), CanvasError> {
    if !canvas.occupancy().is_empty() {
        return Err(CanvasError::Convergence(format!(
            "{} steps left in occupancy after the final peel",
            canvas.occupied_steps()
        )));
    }
    for lane in [Lane::R, Lane::G] {
        let residue = canvas.plane(lane).len();
        if residue != 0 {
            return Err(CanvasError::Convergence(format!(
                "{residue} cells off baseline in lane {lane:?} after the final peel"
            )));
        }
    }
    Ok(())
}
