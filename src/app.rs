use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use log::info;
use parking_lot::Mutex;
use pollster::block_on;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::WindowBuilder;

use crate::game::Game;
use crate::input::map_keycode;
use crate::render::Renderer;

/// Raised when a window, event loop or GPU device cannot be created, so
/// callers can fall back to a headless mode instead of aborting.
#[derive(Debug)]
pub struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

/// Opens a window and drives the game until it is closed.
///
/// Fails with [`WindowInitError`] when no display or GPU is available.
pub fn run(title: &str, mut game: impl Game + 'static) -> Result<()> {
    // Window backends panic rather than error on a missing display.
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;

    let window = Arc::new(
        WindowBuilder::new()
            .with_title(title)
            .with_inner_size(LogicalSize::new(1280.0, 720.0))
            .build(&event_loop)
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );

    let mut renderer = block_on(Renderer::new(Arc::clone(&window)))
        .map_err(|err| WindowInitError::from_error("renderer", err))?;

    // run() takes the closure by value, so failures escape through this slot.
    let failure = Arc::new(Mutex::new(None::<anyhow::Error>));
    let failure_slot = Arc::clone(&failure);
    let mut last_frame = Instant::now();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, window_id } if window_id == renderer.window_id() => {
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => renderer.resize(size),
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = renderer.window().inner_size();
                        renderer.resize(size);
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(code),
                                state: ElementState::Pressed,
                                repeat: false,
                                ..
                            },
                        ..
                    } => {
                        if let Some(command) = map_keycode(code) {
                            game.handle(command);
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let camera = game.camera().params(renderer.aspect());
                        renderer.update_globals(&camera, &game.light());
                        if let Err(err) = renderer.render(&game.instances()) {
                            match err {
                                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                                    let size = renderer.window().inner_size();
                                    renderer.resize(size);
                                }
                                wgpu::SurfaceError::OutOfMemory => {
                                    *failure_slot.lock() = Some(anyhow!("GPU is out of memory"));
                                    elwt.exit();
                                }
                                wgpu::SurfaceError::Timeout => {
                                    info!("Surface timeout; retrying next frame");
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                // Clamp stalls (window drags, suspends) to one sane step.
                let dt = (now - last_frame).as_secs_f32().min(0.1);
                last_frame = now;
                game.update(dt);
                renderer.window().request_redraw();
            }
            _ => {}
        }
    })?;

    let failure = failure.lock().take();
    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
