use std::{
    path::Path,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use playback::PlayerIntent;
use serde::{Deserialize, Serialize};
use shared::settings::ViewerSettings;

use crate::backend_bridge::commands::{LoaderCommand, SimulationFiles};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_loader_command;
use crate::ui::{panels, session::Session};

pub const PERSISTED_STATE_KEY: &str = "viewer_gui.state";

const IDLE_REPAINT: Duration = Duration::from_millis(100);
const ANIMATION_REPAINT: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedViewerState {
    pub last_files: Option<SimulationFiles>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

pub struct ViewerApp {
    cmd_tx: Sender<LoaderCommand>,
    ui_rx: Receiver<UiEvent>,
    settings: ViewerSettings,
    session: Option<Session>,
    last_files: Option<SimulationFiles>,
    status: String,
    status_banner: Option<StatusBanner>,
    animating: bool,
}

impl ViewerApp {
    pub fn new(
        cmd_tx: Sender<LoaderCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: ViewerSettings,
        startup: Option<SimulationFiles>,
        persisted: Option<PersistedViewerState>,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            settings,
            session: None,
            last_files: persisted.unwrap_or_default().last_files,
            status: "Open a simulation with File > Open".to_string(),
            status_banner: None,
            animating: false,
        };
        if let Some(files) = startup {
            app.load(files);
        }
        app
    }

    fn load(&mut self, files: SimulationFiles) {
        dispatch_loader_command(&self.cmd_tx, LoaderCommand::Load(files), &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    tracing::debug!("{message}");
                }
                UiEvent::SimulationLoaded { files, data } => {
                    match Session::start(files.clone(), &data, &self.settings) {
                        Ok(session) => {
                            self.status = format!(
                                "Loaded {} ({} ticks)",
                                display_name(&files.abundance),
                                data.max_ticks()
                            );
                            self.status_banner = None;
                            self.last_files = Some(files);
                            self.session = Some(session);
                        }
                        Err(err) => self.report(UiError::from(&err)),
                    }
                }
                UiEvent::Error(err) => self.report(err),
            }
        }
    }

    fn report(&mut self, err: UiError) {
        tracing::warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
        self.status = err.status_text();
        if err.needs_banner() {
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Error,
                message: self.status.clone(),
            });
        }
    }

    fn advance_playback(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.animating = false;
            return;
        };
        match session.advance(Instant::now()) {
            Ok(animating) => self.animating = animating,
            Err(err) => {
                tracing::error!("playback failed, closing session: {err}");
                self.session = None;
                self.animating = false;
                self.report(UiError::from(&err));
            }
        }
    }

    fn open_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Open simulation output")
            .add_filter("Simulation output", &["csv", "txt"]);
        if let Some(dir) = self
            .last_files
            .as_ref()
            .and_then(|files| files.abundance.parent())
        {
            dialog = dialog.set_directory(dir);
        }
        let Some(paths) = dialog.pick_files() else {
            return;
        };

        match SimulationFiles::from_selection(&paths) {
            Some(files) => self.load(files),
            None => self.report(UiError::from_message(
                UiErrorContext::General,
                "select the abundance table (*ticks.csv) and optionally the transition log (*transLog_NP.txt)",
            )),
        }
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("app_top_menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open...").clicked() {
                        ui.close();
                        self.open_dialog();
                    }
                    let recent = self.last_files.clone();
                    if ui
                        .add_enabled(recent.is_some(), egui::Button::new("Reopen last"))
                        .clicked()
                    {
                        ui.close();
                        if let Some(files) = recent {
                            self.load(files);
                        }
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.separator();
                ui.label(egui::RichText::new(&self.status).weak());
            });
        });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
        }
    }

    fn show_control_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("player_controls")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let Some(session) = self.session.as_ref() else {
                        ui.add_enabled(false, egui::Button::new("Play"));
                        ui.add_enabled(false, egui::Button::new("Reset"));
                        ui.add_enabled(false, egui::Button::new("Step"));
                        return;
                    };

                    let surface = session.surface();
                    let mut pressed = None;
                    if surface.play_visible() && ui.button("Play").clicked() {
                        pressed = Some(PlayerIntent::Play);
                    }
                    if surface.pause_visible() && ui.button("Pause").clicked() {
                        pressed = Some(PlayerIntent::Pause);
                    }
                    if ui.button("Reset").clicked() {
                        pressed = Some(PlayerIntent::Reset);
                    }
                    if ui.button("Step").clicked() {
                        pressed = Some(PlayerIntent::Step);
                    }
                    ui.separator();
                    ui.monospace(surface.ticks_text());

                    if let Some(intent) = pressed {
                        session.request(intent);
                        ctx.request_repaint();
                    }
                });
            });
    }

    fn show_views(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);

            let Some(session) = self.session.as_ref() else {
                ui.centered_and_justified(|ui| {
                    ui.label("No simulation loaded");
                });
                return;
            };

            let views = session.views();
            let now = Instant::now();
            let has_diagram = views.diagram.is_some() || views.edges.is_some();
            ui.columns(if has_diagram { 2 } else { 1 }, |columns| {
                egui::ScrollArea::vertical()
                    .id_salt("charts")
                    .show(&mut columns[0], |ui| {
                        for chart in &views.charts {
                            if let Ok(chart) = chart.try_borrow() {
                                panels::chart(ui, &chart, 260.0);
                            }
                        }
                    });

                if has_diagram {
                    let ui = &mut columns[1];
                    if let Some(Ok(diagram)) = views.diagram.as_ref().map(|d| d.try_borrow()) {
                        panels::state_diagram(ui, &diagram, now);
                    }
                    if let Some(Ok(edges)) = views.edges.as_ref().map(|e| e.try_borrow()) {
                        panels::transition_edges(ui, &edges);
                    }
                }
            });
        });
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        let mut wait = IDLE_REPAINT;
        if self.animating {
            wait = ANIMATION_REPAINT;
        }
        if let Some(deadline) = self.session.as_ref().and_then(Session::next_deadline) {
            wait = wait.min(deadline.saturating_duration_since(Instant::now()));
        }
        ctx.request_repaint_after(wait);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.advance_playback();

        self.show_menu_bar(ctx);
        self.show_control_panel(ctx);
        self.show_views(ctx);

        self.schedule_repaint(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let state = PersistedViewerState {
            last_files: self.last_files.clone(),
        };
        if let Ok(serialized) = serde_json::to_string(&state) {
            storage.set_string(PERSISTED_STATE_KEY, serialized);
        }
    }
}
