//! Orbit lines as they appear on the map: sampled, projected to the screen,
//! and searchable by cursor position.

pub mod curves;
pub mod frame;
pub mod projection;

pub use curves::{Curve, CurveSet, PathSample};
pub use frame::{FrameOptions, MapFrame, PathKind};
pub use projection::{Projector, TopDown};
