//! Native file dialogs and clipboard access.

use crate::app::{AppError, AppResult};
use std::path::PathBuf;

pub const JSON_FILTER: (&str, &[&str]) = ("Polygon Drawing", &["json"]);
pub const PNG_FILTER: (&str, &[&str]) = ("PNG Image", &["png"]);

#[cfg(feature = "native")]
mod native {
    use super::*;

    /// Ask for a destination path. `None` when the user cancels.
    pub fn pick_save_path(
        title: &str,
        file_name: &str,
        filter: (&str, &[&str]),
    ) -> AppResult<Option<PathBuf>> {
        let path = rfd::FileDialog::new()
            .set_title(title)
            .set_file_name(file_name)
            .add_filter(filter.0, filter.1)
            .save_file();
        Ok(path)
    }

    /// Ask for a file to open. `None` when the user cancels.
    pub fn pick_open_path(title: &str, filter: (&str, &[&str])) -> AppResult<Option<PathBuf>> {
        let path = rfd::FileDialog::new()
            .set_title(title)
            .add_filter(filter.0, filter.1)
            .pick_file();
        Ok(path)
    }

    /// Put straight RGBA pixels on the system clipboard as an image.
    pub fn copy_image_to_clipboard(rgba_data: &[u8], width: u32, height: u32) -> AppResult<()> {
        let image_data = arboard::ImageData {
            width: width as usize,
            height: height as usize,
            bytes: std::borrow::Cow::Borrowed(rgba_data),
        };
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
        clipboard
            .set_image(image_data)
            .map_err(|e| AppError::Clipboard(e.to_string()))?;
        log::info!("PNG copied to clipboard ({}x{})", width, height);
        Ok(())
    }
}

#[cfg(not(feature = "native"))]
mod native {
    use super::*;

    pub fn pick_save_path(
        _title: &str,
        _file_name: &str,
        _filter: (&str, &[&str]),
    ) -> AppResult<Option<PathBuf>> {
        Err(AppError::Unsupported("file dialogs"))
    }

    pub fn pick_open_path(_title: &str, _filter: (&str, &[&str])) -> AppResult<Option<PathBuf>> {
        Err(AppError::Unsupported("file dialogs"))
    }

    pub fn copy_image_to_clipboard(_rgba_data: &[u8], _width: u32, _height: u32) -> AppResult<()> {
        Err(AppError::Unsupported("clipboard"))
    }
}

pub use native::{copy_image_to_clipboard, pick_open_path, pick_save_path};
