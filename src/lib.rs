//! Deterministic, fully reversible byte-to-canvas codec.
//!
//! Every encode has exactly one decode that reproduces the original
//! bytes bit-for-bit, or the container is reported corrupt. This crate
//! is the façade; the work lives in `rvc-core` (container, mapper),
//! `rvc-dsa` (sparse occupancy and planes), and `rvc-codec`
//! (encode/decode/verify and the wire format).

pub use rvc_codec::{decode, decode_from_slice, encode, encode_to_vec, pack, unpack, verify, MAGIC};
pub use rvc_core::{
    Baseline, Canvas, CanvasError, CanvasProfile, Lane, StepBase, CELL_FULL, HEIGHT,
    K_MAX_DEFAULT, WIDTH,
};
pub use rvc_dsa::{OccupancySet, PlaneCell, TracePlane};
