mod canvas;
mod presenter;
mod preview;

pub use canvas::{Canvas, DrawOp, Rgba};
pub use presenter::{check_frame, Presenter};
pub use preview::Preview;
