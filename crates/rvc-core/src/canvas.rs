use rvc_dsa::{OccupancySet, TracePlane};

use crate::config::{Baseline, CanvasProfile};
use crate::error::CanvasError;
use crate::mapper::{self, Lane, CELL_FULL, HEIGHT, PIDX_SPAN, WIDTH};

/// The fixed-geometry container: an occupancy set and two trace
/// planes, plus the profile and declared step count that travel with
/// them.
///
/// A canvas is exclusively owned by one encode-or-decode operation at
/// a time. The encoder builds one with [`Canvas::stamp`]; the decoder
/// consumes it destructively with [`Canvas::peel`] until it has
/// converged back to baseline.
#[derive(Debug, Clone)]
pub struct Canvas {
    profile: CanvasProfile,
    steps: u64,
    occupancy: OccupancySet,
    r: TracePlane,
    g: TracePlane,
}

impl Canvas {
    pub fn new(profile: CanvasProfile) -> Self {
        Self {
            profile,
            steps: 0,
            occupancy: OccupancySet::new(),
            r: TracePlane::new(),
            g: TracePlane::new(),
        }
    }

    /// Reassembles a canvas from deserialized parts.
    pub fn from_parts(
        profile: CanvasProfile,
        steps: u64,
        occupancy: OccupancySet,
        r: TracePlane,
        g: TracePlane,
    ) -> Self {
        Self {
            profile,
            steps,
            occupancy,
            r,
            g,
        }
    }

    /// Grid width in columns. Constant regardless of payload length.
    pub fn width(&self) -> u32 {
        WIDTH
    }

    /// Grid height in rows. Constant regardless of payload length.
    pub fn height(&self) -> u32 {
        HEIGHT
    }

    pub fn profile(&self) -> &CanvasProfile {
        &self.profile
    }

    /// Total step count declared for this canvas.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of steps currently materialized (`|BA|`).
    pub fn occupied_steps(&self) -> u64 {
        self.occupancy.len()
    }

    pub fn occupancy(&self) -> &OccupancySet {
        &self.occupancy
    }

    pub fn plane(&self, lane: Lane) -> &TracePlane {
        match lane {
            Lane::R => &self.r,
            Lane::G => &self.g,
        }
    }

    fn plane_mut(&mut self, lane: Lane) -> &mut TracePlane {
        match lane {
            Lane::R => &mut self.r,
            Lane::G => &mut self.g,
        }
    }

    /// Rest value every untouched or fully peeled cell holds.
    pub fn baseline_value(&self) -> u64 {
        match self.profile.baseline {
            Baseline::Zero => 0,
            Baseline::Full => CELL_FULL,
        }
    }

    /// Forward transform: the cell value a materialized byte leaves
    /// behind. Bijective per cell over `x`, with a nonzero delta so a
    /// stamped cell is never mistaken for baseline.
    fn forward(&self, x: u8) -> u64 {
        let delta = u64::from(x) + 1;
        match self.profile.baseline {
            Baseline::Zero => delta,
            Baseline::Full => CELL_FULL - delta,
        }
    }

    /// Materializes byte `x` at step `step`: occupancy is recorded
    /// first, then the addressed trace cell leaves baseline.
    pub fn stamp(&mut self, step: u64, x: u8) -> Result<(), CanvasError> {
        let site = mapper::step_site(step, x, self.profile.k_max)?;

        // Occupancy before planes, for encode and decode alike.
        if !self.occupancy.insert(step) {
            return Err(CanvasError::Membership(format!(
                "step {step} already materialized"
            )));
        }

        let value = self.forward(x);
        if !self.plane_mut(site.lane).occupy(site.k, site.pidx, value) {
            return Err(CanvasError::Membership(format!(
                "depth {} already occupied in lane {:?}",
                site.k, site.lane
            )));
        }
        self.steps += 1;
        Ok(())
    }

    /// Reverts step `step` and recovers its byte.
    ///
    /// The byte is not known up front: it falls out of the inverse
    /// transform, and is cross-checked against the cell's own planar
    /// coordinate. Any disagreement is a detected corruption, never a
    /// silent wrong byte.
    pub fn peel(&mut self, step: u64) -> Result<u8, CanvasError> {
        let lane = mapper::lane_of(step);
        let k = mapper::depth_of(step);

        // Occupancy before planes.
        if !self.occupancy.remove(step) {
            return Err(CanvasError::Membership(format!(
                "step {step} absent from occupancy"
            )));
        }

        let cell = self.plane_mut(lane).take(k).ok_or_else(|| {
            CanvasError::Membership(format!(
                "no materialized cell at depth {k} in lane {lane:?}"
            ))
        })?;

        if cell.pidx >= PIDX_SPAN {
            return Err(CanvasError::Convergence(format!(
                "step {step}: cell coordinate {} outside the grid",
                cell.pidx
            )));
        }
        let column = cell.pidx & 511;
        let row = cell.pidx >> 9;
        if column >= WIDTH || row != mapper::row_of(step) {
            tracing::warn!(step, pidx = cell.pidx, "trace cell contradicts its step");
            return Err(CanvasError::Convergence(format!(
                "step {step}: cell coordinate {} contradicts row {}",
                cell.pidx,
                mapper::row_of(step)
            )));
        }

        let delta = match self.profile.baseline {
            Baseline::Zero => Some(cell.value),
            Baseline::Full => CELL_FULL.checked_sub(cell.value),
        };
        let x = match delta {
            Some(d) if (1..=256).contains(&d) => (d - 1) as u8,
            _ => {
                return Err(CanvasError::Convergence(format!(
                    "step {step}: cell value {} has no preimage",
                    cell.value
                )))
            }
        };
        if u32::from(x) != column {
            return Err(CanvasError::Convergence(format!(
                "step {step}: recovered byte {x:#04x} disagrees with column {column}"
            )));
        }
        Ok(x)
    }

    /// True once occupancy is empty and both planes are back at
    /// baseline.
    pub fn is_converged(&self) -> bool {
        self.occupancy.is_empty() && self.r.is_empty() && self.g.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StepBase;
    use crate::mapper::K_MAX_DEFAULT;

    fn zero_profile() -> CanvasProfile {
        CanvasProfile {
            baseline: Baseline::Zero,
            base: StepBase::Zero,
            k_max: K_MAX_DEFAULT,
        }
    }

    #[test]
    fn stamp_leaves_the_documented_cell_values() {
        let mut canvas = Canvas::new(zero_profile());
        canvas.stamp(0, 0x41).unwrap();
        canvas.stamp(1, 0x00).unwrap();
        canvas.stamp(2, 0xFF).unwrap();

        // Zero baseline: cell = x + 1.
        let g0 = canvas.plane(Lane::G).get(0).unwrap();
        assert_eq!((g0.pidx, g0.value), (0x41, 0x42));
        let r0 = canvas.plane(Lane::R).get(0).unwrap();
        assert_eq!((r0.pidx, r0.value), (512, 1));
        let g1 = canvas.plane(Lane::G).get(1).unwrap();
        assert_eq!((g1.pidx, g1.value), ((2 << 9) + 0xFF, 256));
    }

    #[test]
    fn full_baseline_erases_from_the_limit() {
        let mut canvas = Canvas::new(CanvasProfile::default());
        canvas.stamp(1, 0x7F).unwrap();
        let r0 = canvas.plane(Lane::R).get(0).unwrap();
        assert_eq!(r0.value, CELL_FULL - 0x80);
        assert_eq!(canvas.peel(1).unwrap(), 0x7F);
        assert!(canvas.is_converged());
    }

    #[test]
    fn peel_reverts_in_reverse_order() {
        let mut canvas = Canvas::new(zero_profile());
        for (i, x) in [0x41u8, 0x00, 0xFF].into_iter().enumerate() {
            canvas.stamp(i as u64, x).unwrap();
        }
        assert_eq!(canvas.peel(2).unwrap(), 0xFF);
        assert_eq!(canvas.peel(1).unwrap(), 0x00);
        assert_eq!(canvas.peel(0).unwrap(), 0x41);
        assert!(canvas.is_converged());
    }

    #[test]
    fn peeling_an_absent_step_is_a_membership_error() {
        let mut canvas = Canvas::new(zero_profile());
        canvas.stamp(0, 7).unwrap();
        let err = canvas.peel(4).unwrap_err();
        assert!(matches!(err, CanvasError::Membership(_)));
    }

    #[test]
    fn double_stamp_is_rejected() {
        let mut canvas = Canvas::new(zero_profile());
        canvas.stamp(0, 7).unwrap();
        let err = canvas.stamp(0, 9).unwrap_err();
        assert!(matches!(err, CanvasError::Membership(_)));
    }
}
