//! Native implementation of the collaborator calls over the local filesystem.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use rayon::prelude::*;

use crate::services::backend::types::{DirEntry, ImageMetadata, SaveRequest, SaveResult};
use crate::services::backend::ImageBackend;
use crate::services::staging::OutputFormat;
use crate::types::errors::BackendError;

/// Stateless backend reading and writing the local disk.
///
/// Blocking work (decoding, directory reads, encoding) runs on tokio's
/// blocking pool; batch saves fan out over rayon.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBackend;

impl LocalBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for LocalBackend {
    async fn get_image_metadata(&self, path: &str) -> Result<ImageMetadata, BackendError> {
        let path = path.to_string();
        tokio::task::spawn_blocking(move || read_image_metadata(&path)).await?
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, BackendError> {
        let path = path.to_string();
        tokio::task::spawn_blocking(move || read_directory(&path)).await?
    }

    async fn get_parent_directory(&self, path: &str) -> Result<String, BackendError> {
        parent_of(path)
    }

    async fn get_home_directory(&self) -> Result<String, BackendError> {
        Ok(home_directory())
    }

    async fn file_exists(&self, path: &str) -> Result<bool, BackendError> {
        Path::new(path)
            .try_exists()
            .map_err(|e| BackendError::ExistenceCheck {
                path: path.to_string(),
                message: e.to_string(),
            })
    }

    async fn save_images(&self, requests: Vec<SaveRequest>) -> Result<SaveResult, BackendError> {
        tokio::task::spawn_blocking(move || save_batch(&requests)).await?
    }

    async fn open_path(&self, path: &str) -> Result<(), BackendError> {
        open::that(path).map_err(|e| BackendError::OpenFolder {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

pub fn read_image_metadata(path: &str) -> Result<ImageMetadata, BackendError> {
    let metadata_error = |message: String| BackendError::Metadata {
        path: path.to_string(),
        message,
    };

    let (width, height) = image::image_dimensions(path).map_err(|e| metadata_error(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(metadata_error(format!("Image reports empty size {width}x{height}")));
    }
    let size_bytes = std::fs::metadata(path)
        .map_err(|e| metadata_error(e.to_string()))?
        .len();

    Ok(ImageMetadata {
        width,
        height,
        size_bytes,
    })
}

/// Hidden entries are skipped. Directories first, then names case-insensitively.
pub fn read_directory(path: &str) -> Result<Vec<DirEntry>, BackendError> {
    let entries = std::fs::read_dir(path).map_err(|e| BackendError::Access {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let mut listing: Vec<DirEntry> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                return None;
            }
            let entry_path = entry.path();
            Some(DirEntry {
                name,
                is_directory: entry_path.is_dir(),
                path: entry_path.to_string_lossy().to_string(),
            })
        })
        .collect();

    listing.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    log::debug!("Listed {} entries in {}", listing.len(), path);
    Ok(listing)
}

pub fn parent_of(path: &str) -> Result<String, BackendError> {
    Path::new(path)
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| BackendError::ParentNavigation(path.to_string()))
}

pub fn home_directory() -> String {
    dirs::home_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| std::path::MAIN_SEPARATOR_STR.to_string())
}

fn save_batch(requests: &[SaveRequest]) -> Result<SaveResult, BackendError> {
    let failures: Vec<String> = requests
        .par_iter()
        .filter_map(|request| {
            save_one(request)
                .err()
                .map(|e| format!("{}: {}", request.destination_path, e))
        })
        .collect();

    if !failures.is_empty() {
        let message = format!(
            "Failed to save {} of {} images. {}",
            failures.len(),
            requests.len(),
            failures.join("; ")
        );
        log::error!("{message}");
        return Err(BackendError::Save(message));
    }

    log::info!("Saved {} images", requests.len());
    Ok(SaveResult {
        success: true,
        saved_count: requests.len(),
    })
}

fn save_one(request: &SaveRequest) -> Result<(), String> {
    let format = match request.output_format {
        OutputFormat::KeepOriginal => ImageFormat::from_path(&request.destination_path)
            .map_err(|e| format!("Unsupported output format: {e}"))?,
        OutputFormat::Png => ImageFormat::Png,
        OutputFormat::Jpeg => ImageFormat::Jpeg,
        OutputFormat::WebP => ImageFormat::WebP,
    };

    let img = image::open(&request.source_path).map_err(|e| format!("Failed to open: {e}"))?;
    let resized = img.resize_exact(
        request.target_width.max(1),
        request.target_height.max(1),
        FilterType::Lanczos3,
    );

    let file =
        File::create(&request.destination_path).map_err(|e| format!("Failed to create: {e}"))?;
    let mut writer = BufWriter::new(file);
    encode(&resized, format, request.quality, &mut writer)?;
    writer.flush().map_err(|e| format!("Failed to write: {e}"))
}

fn encode<W: Write + Seek>(
    img: &DynamicImage,
    format: ImageFormat,
    quality: u8,
    writer: &mut W,
) -> Result<(), String> {
    let result = match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100));
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
        }
        // The WebP encoder is lossless and only takes 8-bit RGB(A).
        ImageFormat::WebP => DynamicImage::ImageRgba8(img.to_rgba8()).write_to(writer, format),
        other => img.write_to(writer, other),
    };
    result.map_err(|e| format!("Failed to encode: {e}"))
}

#[cfg(test)]
#[path = "tests/local_tests.rs"]
mod tests;
