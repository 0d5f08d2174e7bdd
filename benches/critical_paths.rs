//! Criterion benchmarks for Tonepal critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Template: tokenizing and rendering `{field}` templates
//! - Palette: flattening entities x tones x subtones, sequential and parallel

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tonepal::palette::PaletteBuilder;
use tonepal::template::{tokenize_template, RecordTemplate};
use tonepal::{attributes, create_tone, Entities, Modifier, OrderedMap, PaletteConfig, SubtoneGroup};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate n entities with main/dark/light/extra fields
fn make_entities(n: usize) -> Entities {
    (0..n)
        .map(|i| {
            let name = format!("c{}", i);
            let rec = attributes([
                ("main", format!("#{:06X}", i * 97 % 0xFFFFFF)),
                ("dark", format!("dark{}", i)),
                ("light", format!("light{}", i)),
                ("extra", format!("extra{}", i)),
            ]);
            (name, rec)
        })
        .collect()
}

fn table(pairs: &[(&str, &str)]) -> OrderedMap<String> {
    pairs.iter().map(|&(k, v)| (k, v.to_string())).collect()
}

/// Generate a config with `tones` tones of `subtones` subtones each
fn make_config(tones: usize, subtones: usize) -> PaletteConfig {
    let (base, _) = Modifier::from_template(&table(&[("background", "{main}"), ("color", "{main}")]));
    let mut config = PaletteConfig::new(base);

    for t in 0..tones {
        let (modifier, _) =
            Modifier::from_template(&table(&[("foreground", "{main}"), ("border", "1px solid {dark}")]));
        let mut group = SubtoneGroup::new(format!("tone{}", t));
        for s in 0..subtones {
            let (sub, _) = Modifier::from_template(&table(&[("value", "{light} {extra}")]));
            group = group.with_subtone(format!("s{}", s), sub);
        }
        config = config.with_tone(format!("t{}", t), create_tone(modifier, Some(group)));
    }

    config
}

// =============================================================================
// Template Benchmarks
// =============================================================================

fn bench_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("template");

    group.bench_function("tokenize", |b| {
        b.iter(|| tokenize_template(black_box("1px solid {dark} / {main} on {light}")))
    });

    let (template, _) = RecordTemplate::parse(&table(&[
        ("foreground", "{main}"),
        ("border", "1px solid {dark}"),
        ("shadow", "0 0 2px {extra}"),
    ]));
    let record = attributes([("main", "red"), ("dark", "darkred"), ("extra", "extrared")]);
    group.bench_function("render", |b| b.iter(|| template.render(black_box(&record))));

    group.finish();
}

// =============================================================================
// Palette Benchmarks
// =============================================================================

fn bench_palette(c: &mut Criterion) {
    let mut group = c.benchmark_group("palette");
    let config = make_config(4, 4);

    for n in [4usize, 64, 512] {
        let entities = make_entities(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("sequential", n), &entities, |b, entities| {
            b.iter(|| PaletteBuilder::new(&config).build(black_box(entities)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", n), &entities, |b, entities| {
            b.iter(|| PaletteBuilder::new(&config).with_parallel(true).build(black_box(entities)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_template, bench_palette);
criterion_main!(benches);
