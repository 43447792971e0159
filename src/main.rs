//! Main application for the SoundSorcery video-to-MP3 converter GUI

// Transient download payload registry
mod blob;
// Conversion lifecycle: run state, history, notices
mod conversion;
// Simulated conversion routine
mod converter;
// Human-readable size and duration formatting
mod format;
// Data models for sources, options, results, and notices
mod model;
// Preview artwork decoding
mod preview;
// Progress and completion event types
mod progress;

use conversion::ConversionManager;
use format::{format_duration, format_file_size};
use model::{ConversionOptions, ConversionResult, Notice, NoticeKind, Quality, SourceFile};

// eframe/egui for GUI application framework
use eframe::{egui, App, Frame};
// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
// FileDialog for the video picker
use rfd::FileDialog;
use std::{
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::runtime::Runtime;
use egui::{RichText, TextureOptions, Visuals};

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// How long a toast stays on screen
const TOAST_TTL: Duration = Duration::from_secs(4);

/// Video extensions offered by the file picker
const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "m4v", "mov", "avi", "webm", "mkv", "mpeg"];

/// Program entry point: initializes logging and the runtime, launches the GUI
fn main() -> Result<(), eframe::Error> {
    // Log filtering driven by RUST_LOG
    env_logger::init();

    // Create a new Tokio runtime and store it globally
    let rt = Arc::new(Runtime::new().unwrap());
    RUNTIME.set(rt).unwrap();

    // Configure default native options for egui window
    let options = eframe::NativeOptions::default();
    // Run the application
    eframe::run_native(
        "SoundSorcery",
        options,
        Box::new(|cc| {
            // Use dark theme visuals
            cc.egui_ctx.set_visuals(Visuals::dark());
            Box::new(ConverterApp::new())
        }),
    )
}

/// Application state for the GUI
struct ConverterApp {
    /// Currently selected source video, if any
    source: Option<SourceFile>,
    /// Quality tier picked in the options dropdown
    quality: Quality,
    /// Conversion lifecycle owner (run state, history, notices)
    manager: ConversionManager,
    /// Active toasts with the time they were queued
    toasts: Vec<(Notice, Instant)>,
    /// Cached texture for the preview artwork
    preview_tex: Option<egui::TextureHandle>,
}

impl ConverterApp {
    fn new() -> Self {
        Self {
            source: None,
            quality: Quality::default(),
            manager: ConversionManager::new(RUNTIME.get().unwrap().handle().clone()),
            toasts: Vec::new(),
            preview_tex: None,
        }
    }

    /// Validates a picked or dropped file and installs it as the source.
    /// Non-video files are rejected with a toast and leave everything as is.
    fn select_source(&mut self, path: &Path) {
        match SourceFile::from_path(path) {
            Ok(file) => {
                log::info!(
                    "selected {} ({} bytes, {})",
                    file.name,
                    file.size_bytes,
                    file.media_type
                );
                self.source = Some(file);
            }
            Err(e) => {
                log::warn!("rejected {}: {e}", path.display());
                self.manager
                    .notify(NoticeKind::Error, "Invalid file type", "Please select a video file");
            }
        }
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 1️⃣ Drain conversion events and refresh the toast queue
        self.manager.poll();
        let now = Instant::now();
        for notice in self.manager.take_notices() {
            self.toasts.push((notice, now));
        }
        self.toasts.retain(|(_, since)| now.duration_since(*since) < TOAST_TTL);

        // 2️⃣ Accept files dropped anywhere on the window
        let dropped: Vec<_> = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(path) = file.path {
                self.select_source(&path);
            }
        }
        let hovering_files = ctx.input(|i| !i.raw.hovered_files.is_empty());

        // Per-frame snapshots so panel closures don't fight over the manager
        let source = self.source.clone();
        let converting = self.manager.state().is_converting;
        let progress = self.manager.state().progress;
        let last = self.manager.state().last_result.clone();
        let history = self.manager.state().history.clone();

        // Deferred interactions applied after the panels are drawn
        let mut to_download: Option<ConversionResult> = None;
        let mut remove_source = false;

        // 3️⃣ Header and footer branding
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🎵 SoundSorcery");
                ui.label(RichText::new("Transform videos into audio").weak());
            });
        });
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.label(
                RichText::new("Simulated conversion for demo purposes. No real transcoding happens.")
                    .small()
                    .weak(),
            );
        });

        // 4️⃣ Right-side panel: recent conversions
        egui::SidePanel::right("recent_panel").show(ctx, |ui| {
            ui.heading("Recent Conversions");
            ui.separator();

            if history.is_empty() {
                ui.label(RichText::new("Nothing converted yet").weak());
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    for entry in &history {
                        ui.group(|ui| {
                            ui.label(RichText::new(&entry.filename).strong());
                            ui.label(format!(
                                "{} • {}",
                                format_duration(entry.duration_secs),
                                format_file_size(entry.size_bytes)
                            ));
                            if ui.button("⬇ Download").clicked() {
                                to_download = Some(entry.clone());
                            }
                        });
                    }
                });
        });

        // 5️⃣ Central panel: upload surface, preview, options, progress, result
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    // Upload surface
                    ui.group(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(12.0);
                            ui.label(RichText::new("📹 Upload your video").size(18.0));
                            let hint = if hovering_files {
                                "Drop to select"
                            } else {
                                "Drag and drop a video file here, or browse for one"
                            };
                            ui.label(hint);
                            if ui.button("Select Video…").clicked() {
                                if let Some(path) = FileDialog::new()
                                    .add_filter("Video", &VIDEO_EXTENSIONS)
                                    .pick_file()
                                {
                                    self.select_source(&path);
                                }
                            }
                            ui.label(
                                RichText::new("Supported formats: MP4, MOV, AVI, WebM, MKV")
                                    .small()
                                    .weak(),
                            );
                            ui.add_space(12.0);
                        });
                    });

                    if let Some(src) = &source {
                        // Preview: placeholder artwork plus source metadata
                        ui.add_space(8.0);
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                if self.preview_tex.is_none() {
                                    if let Some(img) = preview::placeholder_art() {
                                        self.preview_tex = Some(ctx.load_texture(
                                            "preview_art",
                                            img,
                                            TextureOptions::default(),
                                        ));
                                    }
                                }
                                if let Some(tex) = &self.preview_tex {
                                    ui.image(tex);
                                }
                                ui.vertical(|ui| {
                                    ui.label(RichText::new(&src.name).strong());
                                    ui.label(&src.media_type);
                                    ui.label(format_file_size(src.size_bytes));
                                    ui.label(
                                        RichText::new(src.path.display().to_string())
                                            .small()
                                            .weak(),
                                    );
                                });
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::TOP),
                                    |ui| {
                                        if ui.button("❌").clicked() {
                                            remove_source = true;
                                        }
                                    },
                                );
                            });
                        });

                        // Conversion options
                        ui.add_space(8.0);
                        ui.heading("Conversion Options");
                        ui.add_enabled_ui(!converting, |ui| {
                            egui::ComboBox::from_label("Audio Quality")
                                .selected_text(self.quality.label())
                                .show_ui(ui, |ui| {
                                    for q in Quality::ALL {
                                        ui.selectable_value(&mut self.quality, q, q.label());
                                    }
                                });
                        });

                        let convert_label = if converting {
                            "⟳ Converting…"
                        } else {
                            "🎵 Convert to MP3"
                        };
                        if ui
                            .add_enabled(!converting, egui::Button::new(convert_label))
                            .clicked()
                        {
                            self.manager.start_conversion(
                                src,
                                ConversionOptions {
                                    quality: self.quality,
                                    include_video: None,
                                },
                            );
                        }
                    }

                    // Conversion progress
                    if converting {
                        ui.add_space(8.0);
                        ui.group(|ui| {
                            ui.label(RichText::new("Converting…").strong());
                            ui.add(egui::ProgressBar::new(progress / 100.0).show_percentage());
                        });
                    }

                    // Conversion result
                    if let Some(result) = last.as_ref().filter(|_| !converting) {
                        ui.add_space(8.0);
                        ui.group(|ui| {
                            ui.label(RichText::new("✅ Conversion Complete").strong());
                            ui.label("Your MP3 file is ready to download");
                            ui.separator();
                            egui::Grid::new("result_rows").num_columns(2).show(ui, |ui| {
                                ui.label("File name:");
                                ui.label(&result.filename);
                                ui.end_row();
                                ui.label("Quality:");
                                ui.label(result.quality.name());
                                ui.end_row();
                                ui.label("Size:");
                                ui.label(format_file_size(result.size_bytes));
                                ui.end_row();
                                ui.label("Duration:");
                                ui.label(format_duration(result.duration_secs));
                                ui.end_row();
                            });
                            ui.horizontal(|ui| {
                                if ui.button("⬇ Download MP3").clicked() {
                                    to_download = Some(result.clone());
                                }
                                if ui.button("Clear").clicked() {
                                    self.manager.clear_result();
                                }
                            });
                        });
                    }
                });
        });

        // 6️⃣ Toast overlay in the bottom-right corner
        if !self.toasts.is_empty() {
            egui::Area::new(egui::Id::new("toasts"))
                .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
                .order(egui::Order::Foreground)
                .show(ctx, |ui| {
                    for (notice, _) in &self.toasts {
                        let color = match notice.kind {
                            NoticeKind::Success => egui::Color32::LIGHT_GREEN,
                            NoticeKind::Error => egui::Color32::LIGHT_RED,
                        };
                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                            ui.label(RichText::new(&notice.title).color(color).strong());
                            ui.label(&notice.detail);
                        });
                    }
                });
        }

        // Apply interactions deferred from the panel closures
        if remove_source {
            log::info!("source removed");
            self.source = None;
        }
        if let Some(result) = to_download {
            self.manager.download_result(&result);
        }

        // Request periodic repaint for progress updates
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
