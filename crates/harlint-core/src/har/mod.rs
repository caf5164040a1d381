pub mod model;
pub mod read;

pub use model::CaptureRecord;
pub use read::{CaptureContext, CaptureInfo, read_capture};
