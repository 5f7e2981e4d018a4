//! Polydraw Application
//!
//! The desktop shell: window, drawing canvas, controls panel, file dialogs
//! and clipboard integration.

mod app;
mod canvas_view;
mod file_ops;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig, AppError, AppResult};
pub use canvas_view::PainterRenderer;
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{render_ui, Notice, UiAction, UiState};
