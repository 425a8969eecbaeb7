pub mod canvas;
pub mod config;
pub mod error;
pub mod mapper;

pub use canvas::Canvas;
pub use config::{Baseline, CanvasProfile, StepBase};
pub use error::CanvasError;
pub use mapper::{Lane, StepSite, CELL_FULL, HEIGHT, K_MAX_DEFAULT, PIDX_SPAN, WIDTH};
