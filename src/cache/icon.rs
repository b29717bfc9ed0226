//! Condition icon download and decoding

use image::imageops::{self, FilterType};
use image::RgbaImage;
use reqwest::Client;
use thiserror::Error;

/// Pixels with alpha below this are drawn as terminal background
const ALPHA_CUTOFF: u8 = 128;

/// Errors that can occur when loading an icon
#[derive(Debug, Error)]
pub enum IconError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// Body is not a decodable image
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// One terminal cell of an icon thumbnail, drawn as an upper half block
///
/// `None` means the pixel is transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailCell {
    pub top: Option<[u8; 3]>,
    pub bottom: Option<[u8; 3]>,
}

/// A decoded condition icon
#[derive(Debug, Clone)]
pub struct Icon {
    image: RgbaImage,
}

impl Icon {
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decodes PNG, JPEG or GIF bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, IconError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_image(image.to_rgba8()))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Downsamples the icon to `cols` x `rows` terminal cells
    ///
    /// Each cell covers two vertical pixels of the resized image, so the
    /// result keeps a roughly square aspect ratio in most terminal fonts.
    pub fn thumbnail(&self, cols: u16, rows: u16) -> Vec<Vec<ThumbnailCell>> {
        if cols == 0 || rows == 0 || self.width() == 0 || self.height() == 0 {
            return Vec::new();
        }

        let resized = imageops::resize(
            &self.image,
            u32::from(cols),
            u32::from(rows) * 2,
            FilterType::Triangle,
        );

        (0..u32::from(rows))
            .map(|row| {
                (0..u32::from(cols))
                    .map(|col| ThumbnailCell {
                        top: opaque_rgb(resized.get_pixel(col, row * 2).0),
                        bottom: opaque_rgb(resized.get_pixel(col, row * 2 + 1).0),
                    })
                    .collect()
            })
            .collect()
    }
}

fn opaque_rgb([r, g, b, a]: [u8; 4]) -> Option<[u8; 3]> {
    (a >= ALPHA_CUTOFF).then_some([r, g, b])
}

/// Downloads and decodes the icon at `url`
pub async fn fetch_icon(client: &Client, url: &str) -> Result<Icon, IconError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(IconError::Status(status.as_u16()));
    }
    let bytes = response.bytes().await?;
    Icon::decode(&bytes)
}
