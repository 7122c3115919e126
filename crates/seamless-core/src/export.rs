//! Raster export: settings, the rasterizer boundary, and download naming.

use crate::elements::Element;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid export size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Rasterization failed: {0}")]
    RasterFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
        }
    }

    /// Whether `quality` affects the encoding.
    pub fn is_lossy(&self) -> bool {
        matches!(self, ExportFormat::Jpeg)
    }
}

/// User-facing export options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    /// Encoder quality in `0.1..=1.0`; only used for JPEG.
    pub quality: f64,
    /// Device pixel ratio of the final download.
    pub pixel_ratio: f64,
    pub width: u32,
    pub height: u32,
    /// Download name without extension.
    pub filename: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 1.0,
            pixel_ratio: 2.0,
            width: 800,
            height: 600,
            filename: "seamless-design".to_string(),
        }
    }
}

impl ExportSettings {
    pub const MIN_QUALITY: f64 = 0.1;
    pub const MAX_QUALITY: f64 = 1.0;

    /// Request for the final download.
    pub fn request(&self) -> ExportRequest {
        ExportRequest {
            format: self.format,
            pixel_ratio: self.pixel_ratio,
            quality: self.quality.clamp(Self::MIN_QUALITY, Self::MAX_QUALITY),
            width: self.width,
            height: self.height,
        }
    }

    /// Request for the on-screen preview, always at pixel ratio 1.
    pub fn preview(&self) -> ExportRequest {
        ExportRequest {
            pixel_ratio: 1.0,
            ..self.request()
        }
    }

    /// Download file name, e.g. `seamless-design.png`. A blank name falls
    /// back to the default.
    pub fn file_name(&self) -> String {
        let stem = self.filename.trim();
        let stem = if stem.is_empty() { "seamless-design" } else { stem };
        format!("{}.{}", stem, self.format.extension())
    }
}

/// What the rasterizer is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub pixel_ratio: f64,
    pub quality: f64,
    pub width: u32,
    pub height: u32,
}

impl ExportRequest {
    /// Output size in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let scale = |v: u32| (v as f64 * self.pixel_ratio).round().max(1.0) as u32;
        (scale(self.width), scale(self.height))
    }
}

/// Renders elements into encoded image bytes. Implemented by the host's
/// 2D rendering backend.
pub trait Rasterizer {
    fn rasterize(
        &self,
        elements: &[Element],
        request: &ExportRequest,
    ) -> Result<Vec<u8>, ExportError>;
}

/// An encoded export ready for download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

fn run(
    rasterizer: &dyn Rasterizer,
    elements: &[Element],
    request: &ExportRequest,
    file_name: String,
) -> Result<ExportedImage, ExportError> {
    if request.width == 0 || request.height == 0 {
        return Err(ExportError::InvalidSize {
            width: request.width,
            height: request.height,
        });
    }
    match rasterizer.rasterize(elements, request) {
        Ok(bytes) => {
            log::info!("Exported {} ({} bytes)", file_name, bytes.len());
            Ok(ExportedImage {
                file_name,
                mime_type: request.format.mime_type(),
                bytes,
            })
        }
        Err(e) => {
            log::warn!("Export of {} failed: {}", file_name, e);
            Err(e)
        }
    }
}

/// Rasterize the scene for download.
pub fn export(
    rasterizer: &dyn Rasterizer,
    elements: &[Element],
    settings: &ExportSettings,
) -> Result<ExportedImage, ExportError> {
    run(rasterizer, elements, &settings.request(), settings.file_name())
}

/// Rasterize the scene for the export dialog preview.
pub fn export_preview(
    rasterizer: &dyn Rasterizer,
    elements: &[Element],
    settings: &ExportSettings,
) -> Result<ExportedImage, ExportError> {
    run(rasterizer, elements, &settings.preview(), settings.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        requests: RefCell<Vec<ExportRequest>>,
        fail: bool,
    }

    impl Rasterizer for Recorder {
        fn rasterize(
            &self,
            elements: &[Element],
            request: &ExportRequest,
        ) -> Result<Vec<u8>, ExportError> {
            self.requests.borrow_mut().push(*request);
            if self.fail {
                return Err(ExportError::RasterFailed("no surface".to_string()));
            }
            Ok(vec![elements.len() as u8, 1, 2])
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = ExportSettings::default();
        assert_eq!(settings.format, ExportFormat::Png);
        assert_eq!(settings.file_name(), "seamless-design.png");
        assert_eq!(settings.request().pixel_size(), (1600, 1200));
        assert!((settings.preview().pixel_ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jpeg_naming_and_quality_clamp() {
        let settings = ExportSettings {
            format: ExportFormat::Jpeg,
            quality: 0.0,
            filename: "  ".to_string(),
            ..ExportSettings::default()
        };
        assert_eq!(settings.file_name(), "seamless-design.jpeg");
        assert!((settings.request().quality - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_export_passes_request() {
        let recorder = Recorder::default();
        let image = export(&recorder, &[], &ExportSettings::default()).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data_url(), "data:image/png;base64,AAEC");

        let preview = export_preview(&recorder, &[], &ExportSettings::default()).unwrap();
        assert_eq!(preview.file_name, "seamless-design.png");
        let requests = recorder.requests.borrow();
        assert!((requests[0].pixel_ratio - 2.0).abs() < f64::EPSILON);
        assert!((requests[1].pixel_ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_export_failure_and_invalid_size() {
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        assert!(matches!(
            export(&recorder, &[], &ExportSettings::default()),
            Err(ExportError::RasterFailed(_))
        ));

        let settings = ExportSettings {
            width: 0,
            ..ExportSettings::default()
        };
        assert!(matches!(
            export(&Recorder::default(), &[], &settings),
            Err(ExportError::InvalidSize { .. })
        ));
    }
}
