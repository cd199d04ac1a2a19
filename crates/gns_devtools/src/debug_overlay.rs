//! Debug overlay rendered via egui on top of the 3D scene.
//!
//! egui needs a four-phase render split because `egui_wgpu::Renderer::render()`
//! wants a `RenderPass<'static>` while `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! The game's own screens (title, game over) render through the same context
//! via the `game_ui` closure, so they stay visible with the debug window
//! hidden. The debug window itself only runs when `visible` is true (toggled
//! by F12), but egui event handling is always active so the overlay can
//! intercept clicks when it is shown.

use gns_core::time::GameClock;
use winit::window::Window;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    /// Current round phase label (e.g. "show sequence")
    pub phase_label: String,
    pub score: u32,
    /// Colors the current round asks for
    pub sequence_length: usize,
    /// Entries the player has produced so far this round
    pub entered_count: usize,
    /// Emissive power per button, yellow/blue/green/red order
    pub light_powers: [f32; 4],
    /// Projection label (e.g. "Perspective")
    pub projection_label: String,
    /// Estimated texture memory usage in megabytes
    pub texture_memory_mb: f32,
    pub board_offset: [f32; 3],
    pub board_orientation_deg: [f32; 3],
}

#[derive(Debug, Clone, Default)]
pub struct OverlayActions {
    /// User clicked the projection toggle button
    pub toggle_projection: bool,
    /// User dragged the board offset controls
    pub board_offset: Option<[f32; 3]>,
    /// User dragged the board orientation controls
    pub board_orientation_deg: Option<[f32; 3]>,
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        clock: &GameClock,
        stats: Option<OverlayStats>,
        mut game_ui: impl FnMut(&egui::Context),
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        OverlayActions,
    ) {
        let mut actions = OverlayActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            game_ui(ctx);

            if self.visible {
                egui::Window::new("Debug")
                    .default_pos([10.0, 10.0])
                    .show(ctx, |ui| {
                        ui.label(format!("FPS: {:.1}", clock.smoothed_fps));
                        ui.label(format!("Frame time: {:.2} ms", clock.smoothed_frame_time_ms));
                        ui.label(format!("Steps this frame: {}", clock.steps_this_frame));
                        ui.label(format!("Total steps: {}", clock.fixed_step_count));
                        ui.label(format!("Frame: {}", clock.frame_count));

                        if let Some(ref stats) = stats {
                            ui.separator();
                            ui.label(format!("Phase: {}", stats.phase_label));
                            ui.label(format!("Score: {}", stats.score));
                            ui.label(format!(
                                "Sequence: {} of {}",
                                stats.entered_count, stats.sequence_length
                            ));
                            let [yellow, blue, green, red] = stats.light_powers;
                            ui.label(format!(
                                "Lights: Y {yellow:.1}  B {blue:.1}  G {green:.1}  R {red:.1}"
                            ));
                            ui.label(format!("Textures: {:.1} MB", stats.texture_memory_mb));

                            ui.separator();
                            ui.horizontal(|ui| {
                                ui.label(format!("Projection: {}", stats.projection_label));
                                if ui.button("Toggle").clicked() {
                                    actions.toggle_projection = true;
                                }
                            });

                            ui.separator();
                            let mut offset = stats.board_offset;
                            ui.horizontal(|ui| {
                                ui.label("Board offset");
                                for axis in &mut offset {
                                    ui.add(egui::DragValue::new(axis).speed(0.05));
                                }
                            });
                            if offset != stats.board_offset {
                                actions.board_offset = Some(offset);
                            }

                            let mut orientation = stats.board_orientation_deg;
                            ui.horizontal(|ui| {
                                ui.label("Board rotation");
                                for axis in &mut orientation {
                                    ui.add(
                                        egui::DragValue::new(axis).speed(1.0).suffix("\u{b0}"),
                                    );
                                }
                            });
                            if orientation != stats.board_orientation_deg {
                                actions.board_orientation_deg = Some(orientation);
                            }
                        }
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
