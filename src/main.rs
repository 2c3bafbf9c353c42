use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowBuilder},
};

use displacement_demo::{build_scene, load_material, reference, Config, State, CONTROLS};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::parse();

    let images = load_material(&config)?;
    let scene = build_scene(&config);

    if let Some(path) = &config.snapshot {
        let image = reference::render_snapshot(&scene, &images, config.width, config.height);
        image
            .save(path)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        info!("Wrote {} snapshot to {}", scene.technique, path.display());
        return Ok(());
    }

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let window = WindowBuilder::new()
        .with_title("Displacement Map Demo")
        .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
        .build(&event_loop)
        .context("Failed to create window")?;

    let mut state = State::new(window, scene, &images)?;
    info!("Technique: {}", state.scene.technique);
    info!("{}", CONTROLS);
    let mut mouse_captured = false;

    event_loop.run(move |event, window_target| {
        match event {
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::KeyboardInput {
                        event: KeyEvent {
                            physical_key: PhysicalKey::Code(key_code),
                            state: key_state,
                            repeat,
                            ..
                        },
                        ..
                    } => {
                        let pressed = key_state == ElementState::Pressed;
                        match key_code {
                            KeyCode::Escape => {
                                if pressed {
                                    mouse_captured = false;
                                    release_cursor(state.window());
                                }
                            }
                            // Held keys repeat; only movement cares about them
                            _ if repeat => {}
                            _ => {
                                state.scene.process_keyboard(key_code, pressed);
                            }
                        }
                    }
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button: MouseButton::Left,
                        ..
                    } => {
                        mouse_captured = capture_cursor(state.window());
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let lines = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                        };
                        state.scene.process_scroll(lines);
                    }
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(new_size);
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(e) = state.render() {
                            error!("Render error: {:#}", e);
                            window_target.exit();
                        }
                    }
                    _ => {}
                }
            }
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } if mouse_captured => {
                state.scene.process_mouse(delta.0 as f32, delta.1 as f32);
            }
            Event::AboutToWait => {
                state.scene.update();
                state.window().request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}

fn capture_cursor(window: &Window) -> bool {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    match grabbed {
        Ok(()) => {
            window.set_cursor_visible(false);
            true
        }
        Err(e) => {
            warn!("Failed to capture cursor: {}", e);
            false
        }
    }
}

fn release_cursor(window: &Window) {
    if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        warn!("Failed to release cursor: {}", e);
    }
    window.set_cursor_visible(true);
}
