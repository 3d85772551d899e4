//! GPU line-strip rendering for the waveform view.
//!
//! Traces are packed into a single vertex buffer (one strip per trace) and
//! drawn through an `egui_wgpu` paint callback. The vertex shader applies the
//! pan/zoom transform `scale * (position + pan)` held in one uniform.

pub mod pipeline;
pub mod vertex;
pub mod view;

pub use pipeline::{LineStripCallback, LineStripRenderer};
pub use vertex::{StripVertex, pack_strips};
pub use view::PanZoom;
