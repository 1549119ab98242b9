//! Rasterizes a rendered card to PNG.
//!
//! The card is serialized to SVG, parsed with `usvg` and painted with
//! `resvg`. Every failure is reported; a blank image is never returned.

use crate::layout::CardLayout;
use crate::svg::render_svg;
use crate::{CardType, Customization, Fetcher, PreviewError, PreviewResult};
use base64::Engine;
use resvg::usvg;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

/// Name of the file written by [`CardExporter::export_to_dir`].
pub const EXPORT_FILE_NAME: &str = "link-preview.png";

/// Largest exported side in pixels, after scaling.
pub const MAX_CANVAS_SIDE: u32 = 8192;

#[derive(Clone)]
pub struct CardExporter {
    fetcher: Fetcher,
    fontdb: Arc<usvg::fontdb::Database>,
    scale: f32,
}

impl std::fmt::Debug for CardExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardExporter")
            .field("fonts", &self.fontdb.len())
            .field("scale", &self.scale)
            .finish()
    }
}

impl Default for CardExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CardExporter {
    pub fn new() -> Self {
        Self::with_fetcher(Fetcher::new())
    }

    /// Uses `fetcher` to download thumbnails. System fonts are loaded once
    /// here and shared by every export.
    pub fn with_fetcher(fetcher: Fetcher) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        debug!(fonts = fontdb.len(), "Loaded system fonts for card export");

        Self {
            fetcher,
            fontdb: Arc::new(fontdb),
            scale: 1.0,
        }
    }

    /// Device pixel ratio of the produced image.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Renders the card and returns the encoded PNG.
    #[instrument(level = "debug", skip_all, fields(card_type = %card_type))]
    pub async fn export_png(
        &self,
        result: &PreviewResult,
        customization: &Customization,
        card_type: CardType,
    ) -> Result<Vec<u8>, PreviewError> {
        let layout = CardLayout::compute(result, customization, card_type);
        self.canvas_size(&layout)?;

        let thumbnail = match layout.image {
            Some(_) => Some(self.load_thumbnail(&layout.image_url, &result.url).await?),
            None => None,
        };

        self.rasterize(&layout, thumbnail.as_deref())
    }

    /// Writes the PNG to `dir/link-preview.png` and returns the path.
    pub async fn export_to_dir(
        &self,
        dir: &Path,
        result: &PreviewResult,
        customization: &Customization,
        card_type: CardType,
    ) -> Result<PathBuf, PreviewError> {
        let png = self.export_png(result, customization, card_type).await?;
        let path = dir.join(EXPORT_FILE_NAME);
        tokio::fs::write(&path, &png).await.map_err(|e| {
            PreviewError::ExportError(format!("Failed to write {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), bytes = png.len(), "Card exported");
        Ok(path)
    }

    /// Paints `layout` with an already encoded PNG thumbnail.
    pub fn rasterize(
        &self,
        layout: &CardLayout,
        thumbnail_png: Option<&[u8]>,
    ) -> Result<Vec<u8>, PreviewError> {
        let (scaled_width, scaled_height) = self.canvas_size(layout)?;

        let href = thumbnail_png.map(|png| {
            format!(
                "data:image/png;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(png)
            )
        });
        let svg = render_svg(layout, href.as_deref());

        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&svg, &options)
            .map_err(|e| PreviewError::ExportError(format!("Failed to parse card SVG: {e}")))?;

        let mut pixmap = tiny_skia::Pixmap::new(scaled_width, scaled_height).ok_or_else(|| {
            PreviewError::ExportError(format!(
                "Cannot allocate a {scaled_width}x{scaled_height} canvas"
            ))
        })?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(self.scale, self.scale),
            &mut pixmap.as_mut(),
        );

        pixmap
            .encode_png()
            .map_err(|e| PreviewError::ExportError(format!("Failed to encode PNG: {e}")))
    }

    /// Scaled canvas size, rejected before anything is allocated when a side
    /// exceeds [`MAX_CANVAS_SIDE`].
    fn canvas_size(&self, layout: &CardLayout) -> Result<(u32, u32), PreviewError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(PreviewError::ExportError(format!(
                "Invalid export scale {}",
                self.scale
            )));
        }

        let (width, height) = layout.pixel_size();
        let scaled_width = (width as f64 * self.scale as f64).ceil();
        let scaled_height = (height as f64 * self.scale as f64).ceil();
        let max = MAX_CANVAS_SIDE as f64;
        if scaled_width > max || scaled_height > max {
            return Err(PreviewError::ExportError(format!(
                "Card of {scaled_width}x{scaled_height} px exceeds the {MAX_CANVAS_SIDE} px limit"
            )));
        }

        Ok((scaled_width as u32, scaled_height as u32))
    }

    /// Downloads the thumbnail and re-encodes it as PNG so that any format
    /// the `image` crate understands ends up embeddable.
    async fn load_thumbnail(&self, source: &str, page_url: &str) -> Result<Vec<u8>, PreviewError> {
        let bytes = if let Some(encoded) = source
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, data)| data)
        {
            base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map_err(|e| PreviewError::ExportError(format!("Invalid inline image: {e}")))?
        } else {
            let url = resolve_image_url(source, page_url)?;
            self.fetcher
                .fetch_bytes(url.as_str())
                .await
                .map_err(|e| PreviewError::ExportError(format!("Failed to load thumbnail: {e}")))?
        };

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| PreviewError::ExportError(format!("Unsupported thumbnail: {e}")))?;

        let mut png = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| PreviewError::ExportError(format!("Failed to re-encode thumbnail: {e}")))?;
        Ok(png)
    }
}

/// Thumbnails may be relative to the previewed page.
fn resolve_image_url(image: &str, page_url: &str) -> Result<Url, PreviewError> {
    match Url::parse(image) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(page_url)
            .and_then(|base| base.join(image))
            .map_err(|e| {
                PreviewError::ExportError(format!("Cannot resolve thumbnail {image}: {e}"))
            }),
        Err(e) => Err(PreviewError::ExportError(format!(
            "Invalid thumbnail url {image}: {e}"
        ))),
    }
}
