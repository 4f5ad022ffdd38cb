mod geometry;
mod projection;
mod renderer;

pub use projection::RotatedMercator;
pub use renderer::{MapLayers, MapRenderer};
