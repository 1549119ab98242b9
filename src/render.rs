//! HTML card renderers.

use crate::layout::{CardLayout, TextBlock};
use crate::{CardType, Customization, PreviewResult};
use maud::{html, Markup, DOCTYPE};

/// Stylesheet shared by both card variants. Sizes that depend on the
/// customization are set inline.
pub const CARD_STYLESHEET: &str = r#"
body { margin: 0; padding: 24px; background: #f4f5f7; font-family: Helvetica, Arial, sans-serif; }
.link-preview-card { box-sizing: border-box; position: relative; overflow: hidden; }
.link-preview-card__image { display: block; position: absolute; object-fit: cover; }
.link-preview-card__text { position: absolute; margin: 0; white-space: nowrap; }
.link-preview-card__line { display: block; }
"#;

/// Renders the card for `result` with the given customization.
///
/// Output depends only on the arguments.
pub fn render_card(
    result: &PreviewResult,
    customization: &Customization,
    card_type: CardType,
) -> Markup {
    let layout = CardLayout::compute(result, customization, card_type);
    let variant = match card_type {
        CardType::TypeOne => "link-preview-card--type-one",
        CardType::TypeTwo => "link-preview-card--twitter",
    };

    html! {
        div class={ "link-preview-card " (variant) } style=(card_style(&layout)) {
            @if let Some(rect) = layout.image {
                img.link-preview-card__image
                    src=(layout.image_url)
                    alt=(layout.alt)
                    style=(format!(
                        "left: {}px; top: {}px; width: {}px; height: {}px; border-radius: {}px;",
                        rect.x, rect.y, rect.width, rect.height, layout.image_radius
                    ));
            }
            @for block in &layout.blocks {
                (text_block(block))
            }
        }
    }
}

/// Standalone document containing only the card.
pub fn render_page(
    result: &PreviewResult,
    customization: &Customization,
    card_type: CardType,
) -> Markup {
    let title = if result.title.is_empty() {
        "Link preview"
    } else {
        result.title.as_str()
    };

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CARD_STYLESHEET) }
            }
            body {
                (render_card(result, customization, card_type))
            }
        }
    }
}

fn card_style(layout: &CardLayout) -> String {
    let border = layout
        .border
        .map(|color| format!(" border: 1px solid {color};"))
        .unwrap_or_default();
    format!(
        "width: {}px; height: {}px; border-radius: {}px; background: {};{}",
        layout.width, layout.height, layout.card_radius, layout.background, border
    )
}

fn text_block(block: &TextBlock) -> Markup {
    let top = block.baseline - (block.line_height - block.font_size) / 2.0 - block.font_size * 0.8;
    let weight = if block.bold { 700 } else { 400 };
    html! {
        p class={ "link-preview-card__text link-preview-card__" (block.role.class_name()) }
            style=(format!(
                "left: {}px; top: {}px; font-size: {}px; line-height: {}px; font-weight: {}; color: {};",
                block.x, top, block.font_size, block.line_height, weight, block.color
            )) {
            @for line in &block.lines {
                span.link-preview-card__line { (line) }
            }
        }
    }
}
