//! # Convergence Tests
//!
//! Occupancy cardinality moves by exactly one per step in each
//! direction, and a fully peeled canvas is provably back at baseline.

use revcanvas::{encode, verify, Baseline, Canvas, CanvasError, CanvasProfile, StepBase};

fn profile() -> CanvasProfile {
    CanvasProfile {
        baseline: Baseline::Full,
        base: StepBase::One,
        ..CanvasProfile::default()
    }
}

/// `|BA|` grows by exactly 1 per stamped byte and shrinks by exactly 1
/// per peeled step.
#[test]
fn occupancy_is_strictly_monotonic() {
    let payload: Vec<u8> = (0..200u16).map(|i| (i % 256) as u8).collect();
    let mut canvas = Canvas::new(profile());

    for (i, &x) in payload.iter().enumerate() {
        let step = 1 + i as u64;
        canvas.stamp(step, x).unwrap();
        assert_eq!(canvas.occupied_steps(), step);
    }

    for i in (0..payload.len()).rev() {
        let step = 1 + i as u64;
        let x = canvas.peel(step).unwrap();
        assert_eq!(x, payload[i]);
        assert_eq!(canvas.occupied_steps(), i as u64);
    }

    assert!(canvas.is_converged());
    verify(&canvas).unwrap();
}

/// A canvas with any step still materialized fails verification with
/// a convergence error.
#[test]
fn verify_rejects_leftover_steps() {
    let canvas = encode(b"residue", profile()).unwrap();
    let err = verify(&canvas).unwrap_err();
    assert!(matches!(err, CanvasError::Convergence(_)));
}

/// Peeling out of order still converges per cell, but skipping a step
/// leaves the canvas unverifiable.
#[test]
fn skipped_steps_are_caught_at_the_end() {
    let mut canvas = encode(b"abc", profile()).unwrap();
    // Peel steps 3 and 1, leave 2 behind.
    canvas.peel(3).unwrap();
    canvas.peel(1).unwrap();
    assert!(!canvas.is_converged());
    assert!(matches!(
        verify(&canvas),
        Err(CanvasError::Convergence(_))
    ));
}
