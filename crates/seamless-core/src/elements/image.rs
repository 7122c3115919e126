//! Image element for placing raster images.

use super::{ElementId, ElementStyle, ElementTrait, box_hit_test};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors while decoding an embedded image source.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image source is not a data URL")]
    NotDataUrl,
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Image format for embedded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// CSS-style filters applied to an image when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFilters {
    /// Percent, 0–200.
    pub brightness: f64,
    /// Percent, 0–200.
    pub contrast: f64,
    /// Percent, 0–200.
    pub saturation: f64,
    /// Pixels, 0–20.
    pub blur: f64,
    /// Percent, 0–100.
    pub grayscale: f64,
    /// Percent, 0–100.
    pub sepia: f64,
    /// Degrees, 0–360.
    pub hue_rotate: f64,
}

impl Default for ImageFilters {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
            grayscale: 0.0,
            sepia: 0.0,
            hue_rotate: 0.0,
        }
    }
}

impl ImageFilters {
    /// Clamp every filter into its valid range.
    pub fn clamped(self) -> Self {
        Self {
            brightness: self.brightness.clamp(0.0, 200.0),
            contrast: self.contrast.clamp(0.0, 200.0),
            saturation: self.saturation.clamp(0.0, 200.0),
            blur: self.blur.clamp(0.0, 20.0),
            grayscale: self.grayscale.clamp(0.0, 100.0),
            sepia: self.sepia.clamp(0.0, 100.0),
            hue_rotate: self.hue_rotate.clamp(0.0, 360.0),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// CSS `filter` value for renderers that accept one.
    pub fn to_css(&self) -> String {
        format!(
            concat!(
                "brightness({}%) contrast({}%) saturate({}%) blur({}px) ",
                "grayscale({}%) sepia({}%) hue-rotate({}deg)"
            ),
            self.brightness,
            self.contrast,
            self.saturation,
            self.blur,
            self.grayscale,
            self.sepia,
            self.hue_rotate
        )
    }
}

/// An image element. `src` is a URL or a `data:` URL.
///
/// A source that fails to load leaves the element in place with nothing drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub src: String,
    #[serde(default)]
    pub filters: ImageFilters,
    /// Rotation angle in degrees (around the top-left corner).
    #[serde(default)]
    pub rotation: f64,
    pub style: ElementStyle,
    #[serde(default)]
    pub locked: bool,
}

impl Image {
    pub fn new(position: Point, src: String, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            src,
            filters: ImageFilters::default(),
            rotation: 0.0,
            style: ElementStyle::default(),
            locked: false,
        }
    }

    /// Create an image with its bytes embedded as a base64 data URL.
    /// Returns `None` when the bytes are not PNG, JPEG or WebP.
    pub fn from_bytes(position: Point, data: &[u8], width: f64, height: f64) -> Option<Self> {
        use base64::{engine::general_purpose::STANDARD, Engine};

        let format = ImageFormat::from_magic_bytes(data)?;
        let src = format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data));
        Some(Self::new(position, src, width, height))
    }

    pub fn is_embedded(&self) -> bool {
        self.src.starts_with("data:")
    }

    /// Decode an embedded `data:<mime>;base64,<payload>` source.
    pub fn decode_embedded(&self) -> Result<(ImageFormat, Vec<u8>), ImageError> {
        use base64::{engine::general_purpose::STANDARD, Engine};

        let rest = self.src.strip_prefix("data:").ok_or(ImageError::NotDataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(ImageError::NotDataUrl)?;
        let mime = header.strip_suffix(";base64").ok_or(ImageError::NotDataUrl)?;
        let format = ImageFormat::from_mime_type(mime)
            .ok_or_else(|| ImageError::UnsupportedFormat(mime.to_string()))?;
        Ok((format, STANDARD.decode(payload)?))
    }
}

impl ElementTrait for Image {
    fn id(&self) -> ElementId {
        self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }

    fn self_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        box_hit_test(self.position, self.rotation, self.width, self.height, point, tolerance)
    }

    fn to_path(&self) -> BezPath {
        self.self_rect().to_path(0.1)
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }

    fn locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}
