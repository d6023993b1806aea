pub mod astro;
pub mod file;
pub mod gui;
pub mod map;
pub mod math;
pub mod model;
pub mod overlay;
pub mod scenario;

#[cfg(test)]
pub mod consts;
