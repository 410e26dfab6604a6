//! Rolling-block game core with a small wgpu front end.
//!
//! The crate exposes the block state machine, the two board geometries and
//! the game controllers as plain library types so that the rules stay
//! testable headlessly; the window loop and renderer live at the edges and
//! are only touched by the binaries.

pub mod app;
pub mod block;
pub mod camera;
pub mod game;
pub mod ground;
pub mod input;
pub mod level;
pub mod render;

pub use app::{run, WindowInitError};
pub use block::{Direction, Orientation, RollingBlock, ANIMATION_DURATION};
pub use camera::Camera;
pub use game::{Game, PuzzleGame, TrailGame};
pub use ground::Ground;
pub use input::{map_keycode, Command};
pub use level::{Level, LevelError, TileKind, TileSupport};
pub use render::{CameraParams, LightParams, RenderInstance, Renderer};
