//! Geometry shared by the HTML and SVG card renderers.
//!
//! Text is measured with a fixed average glyph width so that layout stays a
//! pure function of its inputs and both renderers agree on line breaks.

use crate::utils::{display_host, strip_control_chars, wrap_lines};
use crate::{CardType, Customization, PreviewResult};

/// Average advance of a glyph as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.55;
const PADDING: f32 = 16.0;
const MIN_CARD_WIDTH: u32 = 2 * PADDING as u32 + 40;
const TWITTER_IMAGE_RATIO: f32 = 1.91;
const TYPE_ONE_IMAGE_RATIO: f32 = 0.56;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Host,
    Title,
    Description,
    Publisher,
}

impl TextRole {
    pub fn class_name(self) -> &'static str {
        match self {
            TextRole::Host => "host",
            TextRole::Title => "title",
            TextRole::Description => "description",
            TextRole::Publisher => "publisher",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub role: TextRole,
    pub lines: Vec<String>,
    pub x: f32,
    /// Baseline of the first line.
    pub baseline: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub bold: bool,
    pub color: &'static str,
}

impl TextBlock {
    pub fn line_baselines(&self) -> impl Iterator<Item = (f32, &str)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, line)| (self.baseline + i as f32 * self.line_height, line.as_str()))
    }
}

struct TextStyle {
    role: TextRole,
    font_size: f32,
    line_height: f32,
    max_lines: usize,
    bold: bool,
    color: &'static str,
    gap_after: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub card_type: CardType,
    pub width: f32,
    pub height: f32,
    pub card_radius: f32,
    pub background: &'static str,
    pub border: Option<&'static str>,
    /// Thumbnail box, absent when the result has no image.
    pub image: Option<Rect>,
    pub image_radius: f32,
    pub image_url: String,
    pub alt: String,
    pub blocks: Vec<TextBlock>,
}

impl CardLayout {
    pub fn compute(
        result: &PreviewResult,
        customization: &Customization,
        card_type: CardType,
    ) -> Self {
        let width = customization.card_width.max(MIN_CARD_WIDTH) as f32;
        let content_width = width - 2.0 * PADDING;

        let (image, styles, texts, border) = match card_type {
            CardType::TypeOne => {
                let image = result.has_image().then(|| Rect {
                    x: PADDING,
                    y: PADDING,
                    width: content_width,
                    height: (content_width * TYPE_ONE_IMAGE_RATIO).round(),
                });
                let styles = vec![
                    TextStyle {
                        role: TextRole::Title,
                        font_size: 17.0,
                        line_height: 22.0,
                        max_lines: 2,
                        bold: true,
                        color: "#1a1a1a",
                        gap_after: 6.0,
                    },
                    TextStyle {
                        role: TextRole::Description,
                        font_size: 14.0,
                        line_height: 19.0,
                        max_lines: 3,
                        bold: false,
                        color: "#555555",
                        gap_after: 10.0,
                    },
                    TextStyle {
                        role: TextRole::Publisher,
                        font_size: 12.0,
                        line_height: 16.0,
                        max_lines: 1,
                        bold: false,
                        color: "#888888",
                        gap_after: 0.0,
                    },
                ];
                let texts = vec![
                    result.title.clone(),
                    result.description.clone(),
                    result.publisher.clone(),
                ];
                (image, styles, texts, Some("#e0e0e0"))
            }
            CardType::TypeTwo => {
                let image = result.has_image().then(|| Rect {
                    x: 0.0,
                    y: 0.0,
                    width,
                    height: (width / TWITTER_IMAGE_RATIO).round(),
                });
                let muted = "#536471";
                let styles = vec![
                    TextStyle {
                        role: TextRole::Host,
                        font_size: 15.0,
                        line_height: 20.0,
                        max_lines: 1,
                        bold: false,
                        color: muted,
                        gap_after: 0.0,
                    },
                    TextStyle {
                        role: TextRole::Title,
                        font_size: 15.0,
                        line_height: 20.0,
                        max_lines: 1,
                        bold: false,
                        color: "#0f1419",
                        gap_after: 0.0,
                    },
                    TextStyle {
                        role: TextRole::Description,
                        font_size: 15.0,
                        line_height: 20.0,
                        max_lines: 2,
                        bold: false,
                        color: muted,
                        gap_after: 0.0,
                    },
                ];
                let texts = vec![
                    display_host(&result.url),
                    result.title.clone(),
                    result.description.clone(),
                ];
                (image, styles, texts, Some("#cfd9de"))
            }
        };

        let mut y = match image {
            Some(rect) => rect.y + rect.height + 12.0,
            None => PADDING,
        };

        let mut blocks = Vec::with_capacity(styles.len());
        for (style, text) in styles.into_iter().zip(texts) {
            let columns = (content_width / (style.font_size * AVG_GLYPH_WIDTH)).floor() as usize;
            let lines = wrap_lines(&strip_control_chars(&text), columns, style.max_lines);
            if lines.is_empty() {
                continue;
            }
            let block_height = lines.len() as f32 * style.line_height;
            blocks.push(TextBlock {
                role: style.role,
                baseline: y + baseline_offset(style.font_size, style.line_height),
                lines,
                x: PADDING,
                font_size: style.font_size,
                line_height: style.line_height,
                bold: style.bold,
                color: style.color,
            });
            y += block_height + style.gap_after;
        }

        let height = if customization.is_auto_height() {
            (y + PADDING).ceil()
        } else {
            customization.card_height as f32
        };

        Self {
            card_type,
            width,
            height,
            card_radius: customization.card_radius as f32,
            background: "#ffffff",
            border,
            image,
            image_radius: customization.image_radius as f32,
            image_url: result.image.clone(),
            alt: strip_control_chars(&result.title),
            blocks,
        }
    }

    pub fn block(&self, role: TextRole) -> Option<&TextBlock> {
        self.blocks.iter().find(|b| b.role == role)
    }

    /// Pixel size of the rasterized card.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.ceil() as u32, self.height.ceil().max(1.0) as u32)
    }
}

// centre the glyphs vertically inside their line box
fn baseline_offset(font_size: f32, line_height: f32) -> f32 {
    (line_height - font_size) / 2.0 + font_size * 0.8
}
