pub mod geometry;
pub mod intervals;
pub mod root_finding;
pub mod stumpff;
