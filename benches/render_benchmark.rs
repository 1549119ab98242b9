use criterion::{black_box, criterion_group, criterion_main, Criterion};
use link_preview_card::{
    render_card, render_svg, CardLayout, CardType, Customization, PreviewResult,
};
use std::time::Duration;

fn sample() -> PreviewResult {
    PreviewResult::new(
        "The Rust Programming Language",
        "A language empowering everyone to build reliable and efficient software. \
         Rust is blazingly fast and memory-efficient: with no runtime or garbage collector.",
        "https://www.rust-lang.org/static/images/rust-social-wide.jpg",
        "https://www.rust-lang.org/",
        Some("Rust".to_string()),
    )
}

fn bench_render(c: &mut Criterion) {
    let result = sample();
    let mut group = c.benchmark_group("card_render");

    group
        .sample_size(50)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));

    for card_type in CardType::ALL {
        let customization = Customization::for_card_type(card_type);

        group.bench_function(format!("layout/{card_type}"), |b| {
            b.iter(|| black_box(CardLayout::compute(&result, &customization, card_type)))
        });

        group.bench_function(format!("html/{card_type}"), |b| {
            b.iter(|| black_box(render_card(&result, &customization, card_type).into_string()))
        });

        let layout = CardLayout::compute(&result, &customization, card_type);
        group.bench_function(format!("svg/{card_type}"), |b| {
            b.iter(|| black_box(render_svg(&layout, None)))
        });
    }

    group.finish();
}

#[cfg(feature = "export")]
fn bench_rasterize(c: &mut Criterion) {
    use link_preview_card::CardExporter;

    let exporter = CardExporter::new();
    let result = sample();
    let mut group = c.benchmark_group("card_export");
    group.sample_size(20);

    for card_type in CardType::ALL {
        let customization = Customization::for_card_type(card_type);
        let layout = CardLayout::compute(&result, &customization, card_type);
        group.bench_function(format!("rasterize/{card_type}"), |b| {
            b.iter(|| black_box(exporter.rasterize(&layout, None).unwrap()))
        });
    }

    group.finish();
}

#[cfg(not(feature = "export"))]
fn bench_rasterize(_c: &mut Criterion) {}

criterion_group!(benches, bench_render, bench_rasterize);
criterion_main!(benches);
