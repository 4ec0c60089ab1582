//! head-pan - Head-relative stereo panning demo
//!
//! A fixed virtual tone source sits in front of the listener. Rotating the
//! head slider re-balances the left and right ears in real time.
//!
//! The window is only a thin front-end: every control forwards to
//! `PanEngine`, which owns the gain law and the audio graph.

use eframe::egui;

mod audio;
mod engine;
mod error;
mod panning;

use audio::{CpalOutput, SessionConfig};
use engine::PanEngine;

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting head-pan");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 300.0])
            .with_title("head-pan"),
        ..Default::default()
    };

    eframe::run_native(
        "head-pan",
        options,
        Box::new(|cc| Ok(Box::new(PanApp::new(cc)))),
    )
}

/// Main application state
struct PanApp {
    engine: PanEngine,
    /// Slider position in degrees
    head_angle: f64,
}

impl PanApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let engine = PanEngine::new(Box::new(CpalOutput::new()), SessionConfig::default());
        Self {
            head_angle: engine.angle(),
            engine,
        }
    }
}

impl eframe::App for PanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Errors are already reflected in the status line
        let _ = self.engine.poll();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Head rotation");
                ui.label(format!("{:.0}°", self.engine.normalized_angle()));
            });

            if ui
                .add(
                    egui::Slider::new(&mut self.head_angle, -180.0..=180.0)
                        .step_by(1.0)
                        .suffix("°"),
                )
                .changed()
            {
                self.engine.on_angle_changed(self.head_angle);
            }

            ui.separator();

            let gains = self.engine.gains();
            let (left_pct, right_pct) = gains.percentages();
            ui.horizontal(|ui| {
                ui.label("Left ear");
                ui.add(egui::ProgressBar::new(gains.left()).text(format!("{}%", left_pct)));
            });
            ui.horizontal(|ui| {
                ui.label("Right ear");
                ui.add(egui::ProgressBar::new(gains.right()).text(format!("{}%", right_pct)));
            });

            ui.separator();

            ui.horizontal(|ui| {
                let playing = self.engine.is_playing();
                let button_text = if playing { "⏸ Pause" } else { "▶ Play" };

                if ui.button(button_text).clicked() {
                    // Failures land in the status line
                    let _ = self.engine.on_play_toggled(!playing);
                }

                if ui.button("⟲ Reset").clicked() {
                    self.engine.on_reset();
                    self.head_angle = self.engine.angle();
                }
            });

            ui.separator();
            ui.small(self.engine.status());
        });

        // Keep polling for device errors while audio runs
        if self.engine.is_playing() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
