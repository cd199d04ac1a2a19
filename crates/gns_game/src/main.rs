//! Genius -- a 3D color-memory game, main loop and entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` using a **fixed-timestep** model
//! (see `GameClock`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- consume fixed-dt slices; each step advances
//!      the round state machine (intro flight, playback, input, scoring)
//!   3. Sync the camera from the rig, stream camera + per-object uniforms
//!   4. Draw the board objects, composite the egui layer on top
//!
//! The board is data-driven: `assets/board/board.json` declares every
//! drawable object (mesh source, texture, tint, light channel) and is watched
//! via mtime polling, so board edits land without a restart.

mod board;
mod camera_rig;
mod obj;
#[cfg(test)]
mod playthrough;
mod round;
mod sequence;
mod shapes;
mod tracker;

use std::collections::HashMap;
use std::sync::Arc;

use glam::{EulerRot, Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use board::{load_board_from_path, BoardFile, BoardObject, BoardWatcher, ShapeSpec};
use gns_core::input::{InputState, Key};
use gns_core::time::GameClock;
use gns_devtools::{DebugOverlay, OverlayStats};
use gns_platform::window::PlatformConfig;
use gns_render::{Camera3D, GpuContext, Mesh, MeshData, MeshPipeline, ObjectUniform, Texture};
use round::{RoundPhase, RoundState, Screen};
use sequence::{ButtonColor, SequenceGenerator};

const BOARD_PATH: &str = "assets/board/board.json";
const FLAT_WHITE_ASSET: &str = "__flat_white";

struct GpuBoardTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// One drawable piece of the board, resolved from its manifest entry.
/// The uniform buffer is rewritten every frame with the object's model
/// matrix, tint, and light power.
struct BoardObjectGpu {
    id: String,
    mesh: Mesh,
    texture_key: Arc<str>,
    local_offset: Vec3,
    tint: [f32; 3],
    light: Option<ButtonColor>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// All mutable game state. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
///
/// Ownership is split into three conceptual groups:
///  - **Core systems** (clock, input, camera) -- updated every frame
///  - **Round state** (sequence, tracker, rig) -- pure simulation, GPU-free
///  - **Board content** (manifest, meshes, textures) -- loaded from disk,
///    hot-reloadable
struct GameState {
    window: Arc<Window>,
    gpu: GpuContext,
    clock: GameClock,
    input: InputState,
    camera: Camera3D,
    mesh_pipeline: MeshPipeline,
    debug_overlay: DebugOverlay,

    round: RoundState,

    board_path: std::path::PathBuf,
    board_watcher: BoardWatcher,
    board: BoardFile,
    /// Runtime board pose, seeded from the manifest, nudged by pose keys
    /// and the overlay drag controls.
    board_offset: Vec3,
    board_orientation_deg: Vec3,

    textures: HashMap<Arc<str>, GpuBoardTexture>,
    objects: Vec<BoardObjectGpu>,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

impl GameState {
    fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window.clone());
        let clock = GameClock::new();
        let input = InputState::new();
        let mesh_pipeline = MeshPipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let board_path = std::path::PathBuf::from(BOARD_PATH);
        let board_watcher = BoardWatcher::new(board_path.clone());
        let board = load_board_from_path(&board_path).unwrap_or_else(|err| {
            panic!(
                "Failed to load initial board '{}': {}",
                board_path.display(),
                err
            );
        });

        let camera = Camera3D::new();
        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = mesh_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);

        let board_offset = Vec3::from(board.offset);
        let board_orientation_deg = Vec3::from(board.orientation_deg);

        let mut state = Self {
            window,
            gpu,
            clock,
            input,
            camera,
            mesh_pipeline,
            debug_overlay,
            round: RoundState::new(SequenceGenerator::new()),
            board_path,
            board_watcher,
            board,
            board_offset,
            board_orientation_deg,
            textures: HashMap::new(),
            objects: Vec::new(),
            camera_buffer,
            camera_bind_group,
        };

        // Startup order matters: textures must exist before the draw loop
        // looks up the objects' texture keys.
        state.ensure_textures_for_board();
        state.objects = build_board_objects(&state.gpu.device, &state.mesh_pipeline, &state.board)
            .unwrap_or_else(|err| {
                panic!(
                    "Failed to build initial board '{}': {}",
                    state.board_path.display(),
                    err
                );
            });
        log::info!(
            "Board loaded: {} ({} objects)",
            state.board.board_id,
            state.objects.len()
        );
        state
    }

    fn reload_board(&mut self, reason: &str) {
        match load_board_from_path(&self.board_path) {
            Ok(board_candidate) => {
                match build_board_objects(&self.gpu.device, &self.mesh_pipeline, &board_candidate)
                {
                    Ok(objects) => {
                        self.board = board_candidate;
                        self.ensure_textures_for_board();
                        self.objects = objects;
                        self.board_offset = Vec3::from(self.board.offset);
                        self.board_orientation_deg = Vec3::from(self.board.orientation_deg);
                        log::info!(
                            "Board reloaded ({reason}): {} ({} objects)",
                            self.board.board_id,
                            self.objects.len()
                        );
                    }
                    Err(err) => {
                        log::error!("Board reload failed ({reason}): {err}");
                    }
                }
            }
            Err(err) => {
                log::error!("Board reload failed ({reason}): {err}");
            }
        }
    }

    fn ensure_textures_for_board(&mut self) {
        for object in &self.board.objects {
            let Some(texture_path) = &object.texture else {
                continue;
            };
            if self.textures.contains_key(texture_path.as_str()) {
                continue;
            }
            let texture = load_texture_asset(
                &self.gpu.device,
                &self.gpu.queue,
                &self.mesh_pipeline,
                texture_path,
            );
            self.textures
                .insert(Arc::from(texture_path.as_str()), texture);
        }

        if !self.textures.contains_key(FLAT_WHITE_ASSET) {
            let texture = Texture::from_rgba8(
                &self.gpu.device,
                &self.gpu.queue,
                &[255, 255, 255, 255],
                1,
                1,
                "flat_white",
            );
            let bind_group = self
                .mesh_pipeline
                .create_texture_bind_group(&self.gpu.device, &texture);
            self.textures.insert(
                Arc::from(FLAT_WHITE_ASSET),
                GpuBoardTexture {
                    texture,
                    bind_group,
                },
            );
        }
    }

    fn estimate_texture_memory_mb(&self) -> f32 {
        let mut bytes: usize = 0;
        for tex in self.textures.values() {
            let (w, h) = tex.texture.size;
            bytes += (w as usize) * (h as usize) * 4;
        }
        bytes as f32 / (1024.0 * 1024.0)
    }

    /// Stream camera and per-object uniforms for the frame about to render.
    fn write_frame_uniforms(&mut self, light_powers: [f32; 4]) {
        self.camera.position = self.round.rig.position;
        self.camera.look_target = self.round.rig.look_target;
        self.camera.projection = self.round.projection;

        let camera_uniform = self.camera.build_uniform();
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let board_matrix = Mat4::from_translation(self.board_offset)
            * Mat4::from_euler(
                EulerRot::YXZ,
                self.board_orientation_deg.y.to_radians(),
                self.board_orientation_deg.x.to_radians(),
                self.board_orientation_deg.z.to_radians(),
            );

        for object in &self.objects {
            let model = board_matrix * Mat4::from_translation(object.local_offset);
            let power = object
                .light
                .map_or(0.0, |color| light_powers[color.index()]);
            let uniform = ObjectUniform {
                model: model.to_cols_array_2d(),
                tint: [object.tint[0], object.tint[1], object.tint[2], 1.0],
                emissive: [power, 0.0, 0.0, 0.0],
            };
            self.gpu.queue.write_buffer(
                &object.uniform_buffer,
                0,
                bytemuck::cast_slice(&[uniform]),
            );
        }
    }
}

struct App {
    config: PlatformConfig,
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = gns_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(GameState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step simulation phase.
                state.clock.begin_frame();
                while state.clock.should_step() {
                    if state.input.is_just_pressed(Key::Escape) {
                        event_loop.exit();
                        return;
                    }
                    if state.input.is_just_pressed(Key::F12) {
                        state.debug_overlay.toggle();
                    }
                    if state.board_watcher.should_reload() {
                        state.reload_board("file watcher");
                    }

                    let events = state.round.tick(
                        &state.input,
                        state.clock.game_time,
                        state.clock.fixed_dt,
                    );
                    if let Some(pose) = events.pose_snapped {
                        state.board_offset.z = pose.board_z();
                    }
                }

                // Render phase reads finalized simulation state from this frame.
                let light_powers = state.round.light_powers(state.clock.game_time);
                state.write_frame_uniforms(light_powers);

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let screen = state.round.screen();
                let won = state.round.phase == RoundPhase::Won;
                let score = state.round.score;
                let sequence_length = state.round.sequence_length;
                let (egui_primitives, egui_textures_delta, overlay_actions) =
                    state.debug_overlay.prepare(
                        &state.window,
                        &state.clock,
                        Some(OverlayStats {
                            phase_label: state.round.phase.label().to_string(),
                            score,
                            sequence_length,
                            entered_count: state.round.tracker.entered.len(),
                            light_powers,
                            projection_label: state.round.projection.label().to_string(),
                            texture_memory_mb: state.estimate_texture_memory_mb(),
                            board_offset: state.board_offset.to_array(),
                            board_orientation_deg: state.board_orientation_deg.to_array(),
                        }),
                        |ctx| draw_game_screens(ctx, screen, won, score, sequence_length),
                    );

                // Handle overlay button actions
                if overlay_actions.toggle_projection {
                    state.round.projection = state.round.projection.next();
                    log::info!("Projection (overlay): {}", state.round.projection);
                }
                if let Some(offset) = overlay_actions.board_offset {
                    state.board_offset = Vec3::from(offset);
                }
                if let Some(orientation) = overlay_actions.board_orientation_deg {
                    state.board_orientation_deg = Vec3::from(orientation);
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Board Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                            view: &state.gpu.depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        }),
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.mesh_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);

                    for object in &state.objects {
                        let Some(texture) = state.textures.get(&object.texture_key) else {
                            log::warn!("Skipping object '{}': missing texture", object.id);
                            continue;
                        };
                        render_pass.set_bind_group(1, &texture.bind_group, &[]);
                        render_pass.set_bind_group(2, &object.bind_group, &[]);
                        render_pass.set_vertex_buffer(0, object.mesh.vertex_buffer.slice(..));
                        render_pass.set_index_buffer(
                            object.mesh.index_buffer.slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        render_pass.draw_indexed(0..object.mesh.index_count, 0, 0..1);
                    }
                }

                state.debug_overlay.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .debug_overlay
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.debug_overlay.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                // Only clear edge-triggered input (just_pressed / just_released)
                // after at least one fixed step consumed it. Otherwise a press
                // that lands on a frame with 0 simulation steps is silently lost.
                if state.clock.steps_this_frame > 0 {
                    state.input.end_frame();
                }
            }

            _ => {}
        }
    }
}

fn draw_game_screens(
    ctx: &egui::Context,
    screen: Screen,
    won: bool,
    score: u32,
    sequence_length: usize,
) {
    match screen {
        Screen::Board => {
            egui::Area::new(egui::Id::new("score_strip"))
                .anchor(egui::Align2::LEFT_TOP, [12.0, 12.0])
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "Score: {score}   Sequence: {sequence_length}"
                        ))
                        .size(18.0),
                    );
                });
        }
        Screen::Title => {
            egui::Area::new(egui::Id::new("title_screen"))
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new("GENIUS").size(52.0).strong());
                        ui.add_space(12.0);
                        ui.label("Watch the colors light up, then repeat the sequence.");
                        ui.label("Up = yellow   Down = red   Right = blue   Left = green");
                        ui.add_space(12.0);
                        ui.label(egui::RichText::new("Press Enter to start").size(20.0));
                    });
                });
        }
        Screen::GameOver => {
            let headline = if won { "YOU WIN!" } else { "WRONG COLOR" };
            egui::Area::new(egui::Id::new("game_over_screen"))
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(headline).size(44.0).strong());
                        ui.add_space(8.0);
                        ui.label(format!("Final score: {score}"));
                        ui.add_space(8.0);
                        ui.label("Press Escape to quit.");
                    });
                });
        }
    }
}

fn build_board_objects(
    device: &wgpu::Device,
    pipeline: &MeshPipeline,
    board: &BoardFile,
) -> Result<Vec<BoardObjectGpu>, String> {
    let mut objects = Vec::with_capacity(board.objects.len());
    for entry in &board.objects {
        let data = resolve_mesh_data(entry)?;
        let mesh = Mesh::from_data(device, &data, &entry.id);
        let uniform = ObjectUniform {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            tint: [entry.tint[0], entry.tint[1], entry.tint[2], 1.0],
            emissive: [0.0; 4],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Object Uniform", entry.id)),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = pipeline.create_object_bind_group(device, &uniform_buffer);
        let texture_key: Arc<str> = match &entry.texture {
            Some(path) => Arc::from(path.as_str()),
            None => Arc::from(FLAT_WHITE_ASSET),
        };

        objects.push(BoardObjectGpu {
            id: entry.id.clone(),
            mesh,
            texture_key,
            local_offset: Vec3::from(entry.offset),
            tint: entry.tint,
            light: entry.light,
            uniform_buffer,
            bind_group,
        });
    }
    Ok(objects)
}

fn resolve_mesh_data(entry: &BoardObject) -> Result<MeshData, String> {
    match &entry.shape {
        ShapeSpec::Box { size } => Ok(shapes::box_mesh(*size)),
        ShapeSpec::Cylinder {
            radius,
            height,
            segments,
        } => Ok(shapes::cylinder_mesh(*radius, *height, *segments)),
        ShapeSpec::RingSegment {
            inner_radius,
            outer_radius,
            height,
            start_deg,
            sweep_deg,
            segments,
        } => Ok(shapes::ring_segment_mesh(
            *inner_radius,
            *outer_radius,
            *height,
            *start_deg,
            *sweep_deg,
            *segments,
        )),
        ShapeSpec::Obj { path } => obj::load_obj_from_path(std::path::Path::new(path))
            .map_err(|err| format!("object '{}': {}", entry.id, err)),
    }
}

fn load_texture_asset(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &MeshPipeline,
    asset_path: &str,
) -> GpuBoardTexture {
    let texture = match std::fs::read(asset_path) {
        Ok(bytes) => Texture::from_bytes(device, queue, &bytes, asset_path),
        Err(err) => {
            log::warn!(
                "Failed to read texture '{}': {}. Falling back to flat white.",
                asset_path,
                err
            );
            Texture::from_rgba8(device, queue, &[255, 255, 255, 255], 1, 1, asset_path)
        }
    };
    let bind_group = pipeline.create_texture_bind_group(device, &texture);
    GpuBoardTexture {
        texture,
        bind_group,
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::KeyP => Some(Key::P),
        KeyCode::F1 => Some(Key::F1),
        KeyCode::F2 => Some(Key::F2),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::F12 => Some(Key::F12),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Genius starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
