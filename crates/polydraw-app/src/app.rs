//! Core application state and lifecycle.

use kurbo::Size;
use peniko::Color;
use polydraw_core::export;
use polydraw_core::{
    CanvasInput, DocumentError, FileStorage, ImportFormat, MemoryStorage, Session, Storage,
    StorageError, SKETCH_KEY,
};
use polydraw_render::{PngRenderResult, RasterRenderer, RenderContext, RendererError};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::canvas_view;
use crate::file_ops::{self, JSON_FILTER, PNG_FILTER};
use crate::ui::{render_ui, Notice, UiAction, UiState};

/// Application errors surfaced to the user as notices.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error("Not supported in this build: {0}")]
    Unsupported(&'static str),
    #[error("Window error: {0}")]
    Window(String),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Environment variable overriding the sketch directory.
pub const STORAGE_DIR_VAR: &str = "POLYDRAW_STORAGE_DIR";
/// Environment variable overriding the canvas background (`#rrggbb`).
pub const BACKGROUND_VAR: &str = "POLYDRAW_BACKGROUND";

/// Parse a CSS hex color like "#ff0000".
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some(Color::from_rgba8(r, g, b, 255))
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    /// Directory for the local sketch. `None` uses the platform data dir.
    pub storage_dir: Option<PathBuf>,
    /// Whether measurement labels start visible.
    pub show_labels: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Polygon Drawer".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            storage_dir: None,
            show_labels: true,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `POLYDRAW_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(STORAGE_DIR_VAR).filter(|d| !d.is_empty()) {
            config.storage_dir = Some(PathBuf::from(dir));
        }
        if let Some(value) = lookup(BACKGROUND_VAR) {
            match parse_color(&value) {
                Some(color) => config.background_color = color,
                None => log::warn!("Ignoring {}={:?}: expected #rrggbb", BACKGROUND_VAR, value),
            }
        }
        config
    }
}

/// Open the sketch storage, falling back to memory when the directory is
/// unusable.
fn open_storage(config: &AppConfig) -> Box<dyn Storage> {
    let storage = match &config.storage_dir {
        Some(dir) => FileStorage::new(dir.clone()),
        None => FileStorage::default_location(),
    };
    match storage {
        Ok(storage) => {
            log::info!("Sketch storage: {}", storage.base_path().display());
            Box::new(storage)
        }
        Err(e) => {
            log::warn!("Sketch storage unavailable ({}), sketches will not persist", e);
            Box::new(MemoryStorage::new())
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    session: Session,
    input: CanvasInput,
    ui_state: UiState,
    storage: Box<dyn Storage>,
    /// Canvas size from the last frame; PNG exports use it.
    canvas_size: Size,
}

impl App {
    /// Create a new application with its configured storage.
    pub fn new(config: AppConfig) -> Self {
        let storage = open_storage(&config);
        Self::with_storage(config, storage)
    }

    /// Create a new application with a custom storage backend.
    pub fn with_storage(config: AppConfig, storage: Box<dyn Storage>) -> Self {
        let session = Session::new();
        let ui_state = UiState::new(&session, config.show_labels);
        let canvas_size = Size::new(config.width as f64, config.height as f64);
        Self {
            config,
            session,
            input: CanvasInput::new(),
            ui_state,
            storage,
            canvas_size,
        }
    }

    /// Run the application window until it is closed.
    pub fn run(config: AppConfig) -> AppResult<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(config.title.clone())
                .with_inner_size([config.width as f32, config.height as f32]),
            ..Default::default()
        };
        let title = config.title.clone();
        eframe::run_native(
            &title,
            options,
            Box::new(move |_cc| Ok(Box::new(App::new(config)))),
        )
        .map_err(|e| AppError::Window(e.to_string()))
    }

    /// Apply a UI action, reporting the outcome as a notice.
    pub fn handle_action(&mut self, action: UiAction) {
        log::debug!("UI action: {:?}", action);
        match action {
            UiAction::SaveDrawing => {
                let result = self.save_drawing();
                self.report(result);
            }
            UiAction::ImportDrawing => {
                let result = self.import_drawing();
                self.report(result);
            }
            UiAction::SaveSketch => {
                let result = self.save_sketch().map(|()| Some("Sketch saved".to_string()));
                self.report(result);
            }
            UiAction::LoadSketch => {
                let result = self.load_sketch().map(|found| {
                    Some(if found { "Sketch loaded" } else { "No saved sketch found" }.to_string())
                });
                self.report(result);
            }
            UiAction::ClearCanvas => {
                self.input.cancel();
                self.session.clear();
                self.ui_state.notice = Some(Notice::info("Canvas cleared"));
            }
            UiAction::DeleteLastPoint => {
                if self.session.delete_last_point().is_none() {
                    log::debug!("No unfinished polygon to delete from");
                }
            }
            UiAction::ExportPng => {
                let result = self.export_png();
                self.report(result);
            }
            UiAction::CopyPng => {
                let result = self
                    .copy_png()
                    .map(|()| Some("Drawing copied to clipboard".to_string()));
                self.report(result);
            }
            UiAction::SetScale(scale) => {
                let result = self.session.set_scale(scale);
                self.report_calibration(result);
            }
            UiAction::SetDpi(dpi) => {
                let result = self.session.set_dpi(dpi);
                self.report_calibration(result);
            }
            UiAction::ToggleLabels => {
                self.ui_state.show_labels = !self.ui_state.show_labels;
            }
            UiAction::ToggleShortcuts => {
                self.ui_state.shortcuts_open = !self.ui_state.shortcuts_open;
            }
        }
    }

    fn report(&mut self, result: AppResult<Option<String>>) {
        match result {
            Ok(Some(message)) => self.ui_state.notice = Some(Notice::info(message)),
            Ok(None) => {}
            Err(e) => {
                log::error!("{}", e);
                self.ui_state.notice = Some(Notice::error(e.to_string()));
            }
        }
    }

    fn report_calibration(&mut self, result: Result<(), polydraw_core::CalibrationError>) {
        if let Err(e) = result {
            self.ui_state.notice = Some(Notice::error(e.to_string()));
            self.ui_state.sync_calibration(&self.session);
        }
    }

    /// Write the session JSON to `path`.
    pub fn save_drawing_to(&self, path: &Path) -> AppResult<()> {
        let json = self.session.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved drawing to {}", path.display());
        Ok(())
    }

    /// Replace the session with the drawing stored at `path`.
    ///
    /// On any error the session is left as it was.
    pub fn import_drawing_from(&mut self, path: &Path) -> AppResult<ImportFormat> {
        let json = std::fs::read_to_string(path)?;
        let format = self.session.import_json(&json)?;
        self.input.cancel();
        self.ui_state.sync_calibration(&self.session);
        log::info!("Imported drawing from {}", path.display());
        Ok(format)
    }

    fn save_drawing(&self) -> AppResult<Option<String>> {
        let name = export::json_export_name();
        let Some(path) = file_ops::pick_save_path("Save Drawing", &name, JSON_FILTER)? else {
            return Ok(None);
        };
        self.save_drawing_to(&path)?;
        Ok(Some(format!("Saved {}", path.display())))
    }

    fn import_drawing(&mut self) -> AppResult<Option<String>> {
        let Some(path) = file_ops::pick_open_path("Import Drawing", JSON_FILTER)? else {
            return Ok(None);
        };
        let format = self.import_drawing_from(&path)?;
        let message = match format {
            ImportFormat::Session => "Drawing imported",
            ImportFormat::Legacy => "Legacy sketch imported",
        };
        Ok(Some(message.to_string()))
    }

    /// Store the session in the local sketch slot.
    pub fn save_sketch(&self) -> AppResult<()> {
        self.storage.save(SKETCH_KEY, &self.session.to_document())?;
        log::info!("Sketch saved");
        Ok(())
    }

    /// Restore the session from the local sketch slot.
    ///
    /// Returns `false` when no sketch has been saved.
    pub fn load_sketch(&mut self) -> AppResult<bool> {
        let document = match self.storage.load(SKETCH_KEY) {
            Ok(document) => document,
            Err(StorageError::NotFound(_)) => {
                log::info!("No saved sketch found");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };
        self.session.load_document(document)?;
        self.input.cancel();
        self.ui_state.sync_calibration(&self.session);
        log::info!("Sketch loaded");
        Ok(true)
    }

    /// Rasterize the session at the current canvas size.
    pub fn render_png(&self) -> AppResult<PngRenderResult> {
        let ctx = RenderContext::new(&self.session, self.canvas_size)
            .with_background(self.config.background_color)
            .with_labels(self.ui_state.show_labels);
        Ok(RasterRenderer::render_png(&ctx)?)
    }

    fn export_png(&self) -> AppResult<Option<String>> {
        let name = export::png_export_name();
        let Some(path) = file_ops::pick_save_path("Export PNG", &name, PNG_FILTER)? else {
            return Ok(None);
        };
        let png = self.render_png()?;
        std::fs::write(&path, &png.png_data)?;
        log::info!("Exported PNG to {}", path.display());
        Ok(Some(format!("Exported {}", path.display())))
    }

    fn copy_png(&self) -> AppResult<()> {
        let png = self.render_png()?;
        file_ops::copy_image_to_clipboard(&png.rgba_data, png.width, png.height)
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(action) = render_ui(ctx, &mut self.ui_state, &self.session) {
            self.handle_action(action);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.canvas_size = canvas_view::show_canvas(
                    ui,
                    &mut self.session,
                    &mut self.input,
                    self.config.background_color,
                    self.ui_state.show_labels,
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn test_app() -> App {
        App::with_storage(AppConfig::default(), Box::new(MemoryStorage::new()))
    }

    fn draw_triangle(app: &mut App) {
        for (x, y) in [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (2.0, 2.0)] {
            app.session.add_point(Point::new(x, y));
        }
    }

    #[test]
    fn test_parse_color() {
        let c = parse_color("#1a2B3c").unwrap().to_rgba8();
        assert_eq!((c.r, c.g, c.b, c.a), (0x1a, 0x2b, 0x3c, 255));
        assert!(parse_color("red").is_none());
        assert!(parse_color("#12345").is_none());
        // Multi-byte characters must not split inside a code point.
        assert!(parse_color("#aé123").is_none());
        assert!(parse_color("#123é5").is_none());
    }

    #[test]
    fn test_config_from_vars() {
        let vars: HashMap<&str, &str> =
            [(STORAGE_DIR_VAR, "/tmp/sketches"), (BACKGROUND_VAR, "#000000")].into();
        let config = AppConfig::from_vars(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/sketches")));
        let c = config.background_color.to_rgba8();
        assert_eq!((c.r, c.g, c.b), (0, 0, 0));

        let config = AppConfig::from_vars(|_| None);
        assert!(config.storage_dir.is_none());
        assert!(config.show_labels);

        let default = AppConfig::default().background_color.to_rgba8();
        let config =
            AppConfig::from_vars(|k| (k == BACKGROUND_VAR).then(|| "#aé123".to_string()));
        let c = config.background_color.to_rgba8();
        assert_eq!((c.r, c.g, c.b), (default.r, default.g, default.b));
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let mut app = test_app();
        app.ui_state.scale_input = -3.0;
        app.handle_action(UiAction::SetScale(-3.0));

        assert_eq!(app.session.calibration().scale(), 1.0);
        assert_eq!(app.ui_state.scale_input, 1.0);
        assert!(app.ui_state.notice.as_ref().is_some_and(|n| n.is_error));

        app.handle_action(UiAction::SetDpi(20.0));
        assert_eq!(app.session.calibration().dpi(), 20.0);
    }

    #[test]
    fn test_clear_and_delete_last_point() {
        let mut app = test_app();
        draw_triangle(&mut app);
        app.session.add_point(Point::new(300.0, 300.0));

        app.handle_action(UiAction::DeleteLastPoint);
        assert!(app.session.draft().is_empty());
        assert_eq!(app.session.completed().len(), 1);

        // Nothing left to delete; completed polygons are untouched.
        app.handle_action(UiAction::DeleteLastPoint);
        assert_eq!(app.session.completed().len(), 1);

        app.handle_action(UiAction::ClearCanvas);
        assert!(app.session.is_empty());
    }

    #[test]
    fn test_sketch_round_trip() {
        let mut app = test_app();
        draw_triangle(&mut app);
        app.handle_action(UiAction::SetScale(2.5));
        app.handle_action(UiAction::SaveSketch);
        let saved = app.session.clone();

        app.handle_action(UiAction::ClearCanvas);
        app.handle_action(UiAction::SetScale(1.0));
        app.handle_action(UiAction::LoadSketch);

        assert_eq!(app.session, saved);
        assert_eq!(app.ui_state.scale_input, 2.5);
        assert_eq!(app.ui_state.notice, Some(Notice::info("Sketch loaded")));
    }

    #[test]
    fn test_load_missing_sketch() {
        let mut app = test_app();
        draw_triangle(&mut app);
        let before = app.session.clone();

        app.handle_action(UiAction::LoadSketch);
        assert_eq!(app.session, before);
        assert_eq!(app.ui_state.notice, Some(Notice::info("No saved sketch found")));
    }

    #[test]
    fn test_file_storage_sketch() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            storage_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let mut app = App::new(config.clone());
        draw_triangle(&mut app);
        app.save_sketch().unwrap();

        let mut reopened = App::new(config);
        assert!(reopened.load_sketch().unwrap());
        assert_eq!(reopened.session.completed().len(), 1);
    }

    #[test]
    fn test_drawing_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drawing.json");

        let mut app = test_app();
        draw_triangle(&mut app);
        app.session.add_point(Point::new(200.0, 200.0));
        app.save_drawing_to(&path).unwrap();

        let mut other = test_app();
        assert_eq!(other.import_drawing_from(&path).unwrap(), ImportFormat::Session);
        assert_eq!(other.session, app.session);
    }

    #[test]
    fn test_failed_import_keeps_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut app = test_app();
        draw_triangle(&mut app);
        let before = app.session.clone();

        assert!(matches!(
            app.import_drawing_from(&path),
            Err(AppError::Document(DocumentError::Parse(_)))
        ));
        assert!(matches!(
            app.import_drawing_from(&dir.path().join("missing.json")),
            Err(AppError::Io(_))
        ));
        assert_eq!(app.session, before);
    }

    #[test]
    fn test_legacy_import() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.json");
        std::fs::write(&path, r#"[{"x":0,"y":0},{"x":10,"y":0},{"x":0,"y":10}]"#).unwrap();

        let mut app = test_app();
        app.handle_action(UiAction::SetScale(3.0));
        assert_eq!(app.import_drawing_from(&path).unwrap(), ImportFormat::Legacy);
        assert_eq!(app.session.completed().len(), 1);
        assert_eq!(app.session.calibration().scale(), 3.0);
    }

    #[test]
    fn test_render_png_uses_canvas_size() {
        let mut app = test_app();
        draw_triangle(&mut app);
        app.canvas_size = Size::new(200.0, 150.0);
        let png = app.render_png().unwrap();
        assert_eq!((png.width, png.height), (200, 150));
    }

    #[test]
    fn test_toggles() {
        let mut app = test_app();
        assert!(app.ui_state.show_labels);
        app.handle_action(UiAction::ToggleLabels);
        assert!(!app.ui_state.show_labels);
        app.handle_action(UiAction::ToggleShortcuts);
        assert!(app.ui_state.shortcuts_open);
    }
}
