use crate::error::CanvasError;

/// Byte values are column coordinates, so the grid is 256 columns wide.
pub const WIDTH: u32 = 256;
/// Rows cycle with the step index modulo 512.
pub const HEIGHT: u32 = 512;
/// Planar index span: `pidx = (y << 9) + x` with y < 512.
pub const PIDX_SPAN: u32 = 512 * 512;
/// Standard capacity class: depth indices below 2^59 (3.125% of the
/// u64 range).
pub const K_MAX_DEFAULT: u64 = 1 << 59;
/// All-maximum rest value for `Baseline::Full` cells. Independent of
/// the capacity class so small-k_max containers stay well-formed.
pub const CELL_FULL: u64 = 1 << 59;

/// Trace lane, selected by step parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    R,
    G,
}

/// Planar address of one step: grid cell, lane, and depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSite {
    pub pidx: u32,
    pub lane: Lane,
    pub k: u64,
}

#[inline]
pub fn lane_of(step: u64) -> Lane {
    if step & 1 == 1 {
        Lane::R
    } else {
        Lane::G
    }
}

#[inline]
pub fn depth_of(step: u64) -> u64 {
    step >> 1
}

/// Inverse of the `(lane, k)` pair back to the step index.
#[inline]
pub fn step_of(lane: Lane, k: u64) -> u64 {
    match lane {
        Lane::R => 2 * k + 1,
        Lane::G => 2 * k,
    }
}

#[inline]
pub fn row_of(step: u64) -> u32 {
    (step & 511) as u32
}

#[inline]
pub fn pidx_of(x: u8, y: u32) -> u32 {
    (y << 9) + u32::from(x)
}

/// Maps step `step` carrying byte `x` to its planar site.
///
/// Pure and side-effect free; the encoder and decoder share it. For a
/// fixed byte value the mapping `step -> (pidx, lane, k)` is a
/// bijection onto its image: depth strictly increases within a lane as
/// the step advances by 2, so two steps never collide on a cell.
pub fn step_site(step: u64, x: u8, k_max: u64) -> Result<StepSite, CanvasError> {
    let k = depth_of(step);
    if k >= k_max {
        return Err(CanvasError::CapacityExceeded { step, k_max });
    }
    Ok(StepSite {
        pidx: pidx_of(x, row_of(step)),
        lane: lane_of(step),
        k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_and_depth_are_a_bijection() {
        for step in 0u64..4096 {
            assert_eq!(step_of(lane_of(step), depth_of(step)), step);
        }
    }

    #[test]
    fn sites_match_the_documented_formula() {
        // Worked example: bytes [0x41, 0x00, 0xFF] at base 0.
        let k_max = K_MAX_DEFAULT;
        let s0 = step_site(0, 0x41, k_max).unwrap();
        assert_eq!(s0, StepSite { pidx: 0x41, lane: Lane::G, k: 0 });

        let s1 = step_site(1, 0x00, k_max).unwrap();
        assert_eq!(s1, StepSite { pidx: 512, lane: Lane::R, k: 0 });

        let s2 = step_site(2, 0xFF, k_max).unwrap();
        assert_eq!(s2, StepSite { pidx: (2 << 9) + 0xFF, lane: Lane::G, k: 1 });
    }

    #[test]
    fn rows_wrap_at_512() {
        assert_eq!(row_of(511), 511);
        assert_eq!(row_of(512), 0);
        assert_eq!(row_of(513), 1);
    }

    #[test]
    fn depth_at_the_bound_is_rejected() {
        // k = step >> 1, so step 8 is the first to need depth 4.
        assert!(step_site(7, 0, 4).is_ok());
        let err = step_site(8, 0, 4).unwrap_err();
        assert!(matches!(
            err,
            CanvasError::CapacityExceeded { step: 8, k_max: 4 }
        ));
    }
}
