#![cfg(feature = "export")]

mod common;

use async_trait::async_trait;
use common::StubServer;
use image::{ImageFormat, Rgba, RgbaImage};
use link_preview_card::{
    CardExporter, CardLayout, CardType, Customization, Fetcher, FetcherConfig, PreviewController,
    PreviewError, PreviewProvider, PreviewResult, EXPORT_FILE_NAME, MAX_CANVAS_SIDE,
};
use std::io::Cursor;
use std::sync::Arc;

struct StaticProvider(PreviewResult);

#[async_trait]
impl PreviewProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_preview(&self, _url: &str) -> Result<PreviewResult, PreviewError> {
        Ok(self.0.clone())
    }
}

fn exporter() -> CardExporter {
    let fetcher = Fetcher::new_with_config(FetcherConfig {
        no_proxy: true,
        ..FetcherConfig::default()
    })
    .unwrap();
    CardExporter::with_fetcher(fetcher)
}

fn red_png() -> Vec<u8> {
    let img = RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255]));
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).unwrap();
    png
}

fn decode(png: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(png, ImageFormat::Png)
        .expect("exported bytes are a PNG")
        .to_rgba8()
}

fn text_only() -> PreviewResult {
    PreviewResult::new("Hello", "World", "", "https://example.com", None)
}

#[test]
fn rasterized_card_matches_layout_size() {
    let customization = Customization::default();
    let layout = CardLayout::compute(&text_only(), &customization, CardType::TypeOne);
    let png = exporter().rasterize(&layout, None).unwrap();

    let img = decode(&png);
    let (width, height) = layout.pixel_size();
    assert_eq!(img.dimensions(), (width, height));

    // rounded corner is cut away, the body is painted white
    assert_eq!(img.get_pixel(0, 0)[3], 0);
    assert_eq!(*img.get_pixel(width - 6, height / 2), Rgba([255, 255, 255, 255]));
}

#[test]
fn oversized_card_is_rejected_before_allocating() {
    let mut customization = Customization::default();
    customization.set_field("cardWidth", 40_000);
    customization.set_field("cardHeight", 40_000);
    let layout = CardLayout::compute(&text_only(), &customization, CardType::TypeOne);

    let err = exporter().rasterize(&layout, None).unwrap_err();
    assert!(matches!(err, PreviewError::ExportError(msg) if msg.contains("8192")));

    // within bounds at 1x, over the limit once scaled
    let mut customization = Customization::default();
    customization.set_field("cardWidth", 5_000);
    customization.set_field("cardHeight", 100);
    let layout = CardLayout::compute(&text_only(), &customization, CardType::TypeOne);
    assert!(matches!(
        exporter().with_scale(2.0).rasterize(&layout, None),
        Err(PreviewError::ExportError(_))
    ));
}

#[tokio::test]
async fn oversized_card_skips_thumbnail_download() {
    let server = StubServer::start(200, "image/png", red_png()).await;
    let result = PreviewResult::new("Big", "", server.url("/thumb.png"), "", None);
    let mut customization = Customization::default();
    customization.set_field("cardHeight", MAX_CANVAS_SIDE + 1);

    let err = exporter()
        .export_png(&result, &customization, CardType::TypeOne)
        .await
        .unwrap_err();
    assert!(matches!(err, PreviewError::ExportError(_)));
    assert_eq!(server.hits(), 0);
}

#[test]
fn control_characters_in_text_still_export() {
    let result = PreviewResult::new("Breaking\u{8}News", "tab\there\u{1b}", "", "", None);
    let layout = CardLayout::compute(&result, &Customization::default(), CardType::TypeOne);
    let png = exporter().rasterize(&layout, None).unwrap();
    assert_eq!(decode(&png).dimensions(), layout.pixel_size());
}

#[test]
fn scale_multiplies_pixel_size() {
    let layout = CardLayout::compute(&text_only(), &Customization::default(), CardType::TypeOne);
    let png = exporter().with_scale(2.0).rasterize(&layout, None).unwrap();
    let (width, height) = layout.pixel_size();
    assert_eq!(decode(&png).dimensions(), (width * 2, height * 2));
}

#[tokio::test]
async fn thumbnail_is_painted_into_the_card() {
    let server = StubServer::start(200, "image/png", red_png()).await;
    let result = PreviewResult::new(
        "Red",
        "A red thumbnail",
        server.url("/thumb.png"),
        "https://example.com",
        None,
    );
    let customization = Customization::for_card_type(CardType::TypeTwo);

    let png = exporter()
        .export_png(&result, &customization, CardType::TypeTwo)
        .await
        .unwrap();
    let img = decode(&png);
    let layout = CardLayout::compute(&result, &customization, CardType::TypeTwo);
    let rect = layout.image.unwrap();

    let centre = img.get_pixel(
        (rect.x + rect.width / 2.0) as u32,
        (rect.y + rect.height / 2.0) as u32,
    );
    assert_eq!(*centre, Rgba([255, 0, 0, 255]));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn inline_thumbnail_needs_no_download() {
    use base64::Engine;

    let data_uri = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(red_png())
    );
    let result = PreviewResult::new("Inline", "", data_uri, "", None);
    let png = exporter()
        .export_png(&result, &Customization::default(), CardType::TypeOne)
        .await
        .unwrap();
    assert!(png.starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn missing_thumbnail_is_an_error() {
    let server = StubServer::start(404, "text/plain", b"gone".to_vec()).await;
    let result = PreviewResult::new("T", "D", server.url("/missing.png"), "", None);

    let err = exporter()
        .export_png(&result, &Customization::default(), CardType::TypeOne)
        .await
        .unwrap_err();
    assert!(matches!(err, PreviewError::ExportError(_)));
}

#[tokio::test]
async fn undecodable_thumbnail_is_an_error() {
    let server = StubServer::start(200, "image/png", b"definitely not a png".to_vec()).await;
    let result = PreviewResult::new("T", "D", server.url("/broken.png"), "", None);

    let err = exporter()
        .export_png(&result, &Customization::default(), CardType::TypeOne)
        .await
        .unwrap_err();
    assert!(matches!(err, PreviewError::ExportError(msg) if msg.contains("Unsupported thumbnail")));
}

#[tokio::test]
async fn controller_exports_displayed_card_to_fixed_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = exporter();

    let provider = Arc::new(StaticProvider(text_only()));
    let mut controller = PreviewController::new(provider.clone(), provider);

    assert!(matches!(
        controller.export_to_dir(&exporter, dir.path()).await,
        Err(PreviewError::ExportError(_))
    ));

    controller.lookup("example.com").await;
    controller.edit_customization("cardHeight", 150);
    let path = controller.export_to_dir(&exporter, dir.path()).await.unwrap();

    assert_eq!(path, dir.path().join(EXPORT_FILE_NAME));
    let img = decode(&std::fs::read(&path).unwrap());
    assert_eq!(img.dimensions(), (300, 150));
}
