mod common;
mod native;

pub use common::{CameraParams, LightParams, RenderInstance};
pub use native::Renderer;
