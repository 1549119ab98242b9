use crate::layout::CardLayout;
use maud::html;

const FONT_FAMILY: &str = "Helvetica, Arial, 'Liberation Sans', 'DejaVu Sans', sans-serif";
const PLACEHOLDER_FILL: &str = "#e1e8ed";

/// Serializes the card into a standalone SVG document of exactly the card's
/// size. `thumbnail` is the href used for the image box, typically a data
/// URI; without it the box is painted as a neutral placeholder.
///
/// Empty elements are written with explicit closing tags so the output is
/// well-formed XML.
pub fn render_svg(layout: &CardLayout, thumbnail: Option<&str>) -> String {
    let (width, height) = (layout.width, layout.height);
    let card_radius = layout.card_radius;
    let image_radius = layout.image_radius;

    let markup = html! {
        svg xmlns="http://www.w3.org/2000/svg"
            width=(width)
            height=(height)
            viewBox={ "0 0 " (width) " " (height) } {
            defs {
                clipPath id="card-clip" {
                    rect x="0" y="0" width=(width) height=(height)
                        rx=(card_radius) ry=(card_radius) {}
                }
                @if let Some(rect) = layout.image {
                    clipPath id="image-clip" {
                        rect x=(rect.x) y=(rect.y) width=(rect.width) height=(rect.height)
                            rx=(image_radius) ry=(image_radius) {}
                    }
                }
            }
            g clip-path="url(#card-clip)" {
                rect x="0" y="0" width=(width) height=(height) fill=(layout.background) {}
                @if let Some(rect) = layout.image {
                    @match thumbnail {
                        Some(href) => {
                            image x=(rect.x) y=(rect.y) width=(rect.width) height=(rect.height)
                                preserveAspectRatio="xMidYMid slice"
                                clip-path="url(#image-clip)"
                                href=(href) {}
                        }
                        None => {
                            rect x=(rect.x) y=(rect.y) width=(rect.width) height=(rect.height)
                                fill=(PLACEHOLDER_FILL)
                                clip-path="url(#image-clip)" {}
                        }
                    }
                }
                @for block in &layout.blocks {
                    text font-family=(FONT_FAMILY)
                        font-size=(block.font_size)
                        font-weight=(if block.bold { "bold" } else { "normal" })
                        fill=(block.color) {
                        @for (baseline, line) in block.line_baselines() {
                            tspan x=(block.x) y=(baseline) { (line) }
                        }
                    }
                }
            }
            @if let Some(border) = layout.border {
                // inset by half the stroke width
                rect x="0.5" y="0.5" width=(width - 1.0) height=(height - 1.0)
                    rx=(card_radius) ry=(card_radius)
                    fill="none" stroke=(border) stroke-width="1" {}
            }
        }
    };

    markup.into_string()
}
