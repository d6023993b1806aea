pub mod geometry;
pub mod orrery;
pub mod trajectory;
