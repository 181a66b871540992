//! Control panel and stats overlay
//!
//! Built on egui: `egui-winit` turns window events into egui input and
//! `egui-wgpu` paints the result on top of the frame. The panel edits the
//! shared [`Controls`] directly and reports button presses as
//! [`SceneAction`]s for the render loop to apply.

use egui::{Align2, RichText};
use egui_wgpu::ScreenDescriptor;
use winit::{event::WindowEvent, window::Window};

use glowsphere_render::Frame;

use crate::controls::{
    Controls, SceneAction, AMBIENT_RANGE, AMPLITUDE_RANGE, FREQUENCY_RANGE, GLOW_RANGE,
    MAX_TESSELATIONS,
};
use super::FrameStats;

/// Output of a GUI pass waiting to be painted
struct PendingPaint {
    shapes: Vec<egui::epaint::ClippedShape>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// Owns the egui context, its winit adapter and its wgpu painter
pub struct GuiSystem {
    ctx: egui::Context,
    state: egui_winit::State,
    painter: egui_wgpu::Renderer,
    pending: Option<PendingPaint>,
    show_stats: bool,
}

impl GuiSystem {
    pub fn new(
        window: &Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        show_stats: bool,
    ) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            None,
            None,
            None,
        );
        let painter = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            ctx,
            state,
            painter,
            pending: None,
            show_stats,
        }
    }

    /// Feed a window event to egui
    ///
    /// Returns true if egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Whether the pointer is over or dragging a panel
    pub fn wants_pointer(&self) -> bool {
        self.ctx.wants_pointer_input() || self.ctx.is_pointer_over_area()
    }

    /// Toggle the stats overlay
    pub fn toggle_stats(&mut self) -> bool {
        self.show_stats = !self.show_stats;
        self.show_stats
    }

    /// Lay out the panel for this frame
    ///
    /// Returns the buttons pressed. The result is painted by
    /// [`GuiSystem::paint`].
    pub fn run(
        &mut self,
        window: &Window,
        controls: &mut Controls,
        stats: &FrameStats,
    ) -> Vec<SceneAction> {
        let input = self.state.take_egui_input(window);
        let show_stats = self.show_stats;

        let mut actions = Vec::new();
        let output = self.ctx.run(input, |ctx| {
            actions = control_panel(ctx, controls);
            if show_stats {
                stats_overlay(ctx, stats);
            }
        });

        let egui::FullOutput {
            platform_output,
            textures_delta,
            shapes,
            pixels_per_point,
            ..
        } = output;
        self.state.handle_platform_output(window, platform_output);
        self.pending = Some(PendingPaint {
            shapes,
            textures_delta,
            pixels_per_point,
        });

        actions
    }

    /// Paint the last laid-out GUI into the frame
    ///
    /// Returns command buffers that must be submitted before the frame's
    /// own encoder.
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        frame: &mut Frame,
        size_in_pixels: [u32; 2],
    ) -> Vec<wgpu::CommandBuffer> {
        let Some(pending) = self.pending.take() else {
            return Vec::new();
        };

        let screen = ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: pending.pixels_per_point,
        };
        let clipped = self.ctx.tessellate(pending.shapes, screen.pixels_per_point);

        for (id, delta) in &pending.textures_delta.set {
            self.painter.update_texture(device, queue, *id, delta);
        }
        let commands =
            self.painter
                .update_buffers(device, queue, &mut frame.encoder, &clipped, &screen);

        {
            let mut pass = frame
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            self.painter.render(&mut pass, &clipped, &screen);
        }

        for id in &pending.textures_delta.free {
            self.painter.free_texture(id);
        }

        commands
    }
}

/// The settings window
fn control_panel(ctx: &egui::Context, controls: &mut Controls) -> Vec<SceneAction> {
    let mut actions = Vec::new();

    egui::Window::new("Controls")
        .anchor(Align2::RIGHT_TOP, [-8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.add(
                egui::Slider::new(&mut controls.tesselations, 0..=MAX_TESSELATIONS)
                    .step_by(1.0)
                    .text("tesselations"),
            );

            ui.horizontal(|ui| {
                if ui.button("Load Scene").clicked() {
                    actions.push(SceneAction::LoadScene);
                }
                if ui.button("Reset Scene").clicked() {
                    actions.push(SceneAction::ResetScene);
                }
            });

            ui.horizontal(|ui| {
                ui.color_edit_button_srgba_unmultiplied(&mut controls.color);
                ui.label("colour");
            });

            let sliders = [
                (&mut controls.frequency, FREQUENCY_RANGE, "frequency"),
                (&mut controls.amplitude, AMPLITUDE_RANGE, "amplitude"),
                (&mut controls.glow, GLOW_RANGE, "glow"),
                (&mut controls.ambient, AMBIENT_RANGE, "ambient"),
            ];
            for (value, range, name) in sliders {
                ui.add(
                    egui::Slider::new(value, range.min..=range.max)
                        .step_by(range.step as f64)
                        .text(name),
                );
            }
        });

    actions
}

/// FPS readout in the top-left corner
fn stats_overlay(ctx: &egui::Context, stats: &FrameStats) {
    egui::Area::new(egui::Id::new("frame_stats"))
        .anchor(Align2::LEFT_TOP, [0.0, 0.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(RichText::new(stats.summary()).monospace());
            });
        });
}
