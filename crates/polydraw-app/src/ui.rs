//! UI components using egui.

use egui::{Color32, Context, RichText};
use polydraw_core::Session;

use crate::shortcuts::ShortcutRegistry;

/// Width of the controls panel.
const PANEL_WIDTH: f32 = 220.0;

/// Action requested by the UI, applied by the app after the frame is laid out.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SaveDrawing,
    ImportDrawing,
    SaveSketch,
    LoadSketch,
    ClearCanvas,
    DeleteLastPoint,
    ExportPng,
    CopyPng,
    SetScale(f64),
    SetDpi(f64),
    ToggleLabels,
    ToggleShortcuts,
}

/// A user-visible status message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// UI state that lives across frames.
pub struct UiState {
    /// Scale field contents; may hold a rejected value until corrected.
    pub scale_input: f64,
    /// DPI field contents; may hold a rejected value until corrected.
    pub dpi_input: f64,
    /// Whether measurement labels are drawn on the canvas.
    pub show_labels: bool,
    /// Whether the shortcuts window is open.
    pub shortcuts_open: bool,
    /// Last status message.
    pub notice: Option<Notice>,
}

impl UiState {
    pub fn new(session: &Session, show_labels: bool) -> Self {
        let mut state = Self {
            scale_input: 0.0,
            dpi_input: 0.0,
            show_labels,
            shortcuts_open: false,
            notice: None,
        };
        state.sync_calibration(session);
        state
    }

    /// Reset the calibration fields to the session's values.
    pub fn sync_calibration(&mut self, session: &Session) {
        self.scale_input = session.calibration().scale();
        self.dpi_input = session.calibration().dpi();
    }
}

/// Render all UI panels. Returns the action requested this frame, if any.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, session: &Session) -> Option<UiAction> {
    let mut action = render_controls_panel(ctx, ui_state, session);
    if ui_state.shortcuts_open {
        render_shortcuts_window(ctx, ui_state);
    }
    if action.is_none() {
        action = ShortcutRegistry::dispatch(ctx);
    }
    action
}

fn render_controls_panel(
    ctx: &Context,
    ui_state: &mut UiState,
    session: &Session,
) -> Option<UiAction> {
    let mut action = None;

    egui::SidePanel::right("controls")
        .resizable(false)
        .exact_width(PANEL_WIDTH)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.heading("Polygon Drawer");
            ui.separator();

            section_label(ui, "Calibration");
            ui.horizontal(|ui| {
                ui.label("Scale:");
                let response = ui.add(egui::DragValue::new(&mut ui_state.scale_input).speed(0.1));
                if response.changed() {
                    action = Some(UiAction::SetScale(ui_state.scale_input));
                }
            });
            ui.label(format!("1 inch = {} feet", session.calibration().scale()));
            ui.horizontal(|ui| {
                ui.label("DPI:");
                let response = ui.add(egui::DragValue::new(&mut ui_state.dpi_input).speed(1.0));
                if response.changed() {
                    action = Some(UiAction::SetDpi(ui_state.dpi_input));
                }
            });
            ui.separator();

            section_label(ui, "Drawing");
            if full_width_button(ui, "Save Drawing") {
                action = Some(UiAction::SaveDrawing);
            }
            if full_width_button(ui, "Import Drawing") {
                action = Some(UiAction::ImportDrawing);
            }
            if full_width_button(ui, "Save Sketch") {
                action = Some(UiAction::SaveSketch);
            }
            if full_width_button(ui, "Load Sketch") {
                action = Some(UiAction::LoadSketch);
            }
            ui.separator();

            section_label(ui, "Edit");
            if full_width_button(ui, "Delete Last Point") {
                action = Some(UiAction::DeleteLastPoint);
            }
            if full_width_button(ui, "Clear Canvas") {
                action = Some(UiAction::ClearCanvas);
            }
            ui.separator();

            section_label(ui, "Export");
            if full_width_button(ui, "Export PNG") {
                action = Some(UiAction::ExportPng);
            }
            if full_width_button(ui, "Copy PNG") {
                action = Some(UiAction::CopyPng);
            }
            let mut show_labels = ui_state.show_labels;
            if ui.checkbox(&mut show_labels, "Show measurements").changed() {
                action = Some(UiAction::ToggleLabels);
            }
            ui.separator();

            section_label(ui, "Summary");
            ui.label(format!("Polygons: {}", session.completed().len()));
            ui.label(format!("Points in progress: {}", session.draft().len()));
            let total_area: f64 = session.measurements().iter().map(|m| m.area).sum();
            ui.label(format!("Total area: {:.2} sq ft", total_area));

            if let Some(notice) = &ui_state.notice {
                ui.separator();
                let color = if notice.is_error {
                    Color32::from_rgb(220, 38, 38)
                } else {
                    Color32::from_rgb(22, 101, 52)
                };
                ui.colored_label(color, &notice.text);
            }

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                if ui.small_button("Keyboard shortcuts (F1)").clicked() {
                    action = Some(UiAction::ToggleShortcuts);
                }
            });
        });

    action
}

fn render_shortcuts_window(ctx: &Context, ui_state: &mut UiState) {
    let mut open = ui_state.shortcuts_open;
    egui::Window::new("Keyboard Shortcuts")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            egui::Grid::new("shortcuts_grid").striped(true).show(ui, |ui| {
                for shortcut in ShortcutRegistry::all() {
                    ui.label(RichText::new(shortcut.format()).monospace());
                    ui.label(shortcut.description);
                    ui.end_row();
                }
            });
        });
    ui_state.shortcuts_open = open;
}

fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(text).small().strong().color(Color32::GRAY));
}

fn full_width_button(ui: &mut egui::Ui, label: &str) -> bool {
    ui.add_sized([ui.available_width(), 24.0], egui::Button::new(label))
        .clicked()
}
