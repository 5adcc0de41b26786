//! Locator Operations Benchmarks
//!
//! Benchmarks for locator resolution, cache hits and staleness recovery.
//!
//! Run with: `cargo bench --bench locator_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use probar_element::mock::{MockDriver, MockElement};
use probar_element::prelude::*;
use std::sync::Arc;

fn bench_locator_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator_resolution");

    let values = vec![
        ("simple_id", "#my-button"),
        ("complex_css", "div.container > button.btn-primary:first-child"),
        ("absolute_xpath", "//div[@id='main']/ul/li[3]"),
        ("relative_xpath", "./span[@class='label']"),
        ("contains_xpath", "a[contains(text(), 'Next')]"),
        ("long_css", "form#checkout fieldset.address input[name=\"postal-code\"]"),
    ];

    for (name, value) in values {
        group.bench_with_input(BenchmarkId::from_parameter(name), &value, |bench, v| {
            bench.iter(|| {
                let by = resolve(black_box(By::Css), black_box(v));
                black_box(by);
            });
        });
    }

    group.finish();
}

fn bench_locator_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator_creation");

    let strategies = vec![
        ("css", By::Css),
        ("xpath", By::XPath),
        ("id", By::Id),
        ("name", By::Name),
        ("tag_name", By::TagName),
        ("link_text", By::LinkText),
    ];

    for (name, by) in strategies {
        group.bench_with_input(BenchmarkId::from_parameter(name), &by, |bench, by| {
            bench.iter(|| {
                let locator = Locator::new(*by, black_box("submit")).resolved();
                black_box(locator);
            });
        });
    }

    group.finish();
}

fn bench_cache_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_hits");

    for entries in [1_usize, 10, 100] {
        let driver = Arc::new(MockDriver::new());
        let locators: Vec<Locator> = (0..entries)
            .map(|i| Locator::css(format!("#item-{i}")))
            .collect();
        for locator in &locators {
            driver.add(MockElement::new("div").matching(locator.clone()));
        }
        let page = Page::with_config(Arc::clone(&driver), ElementConfig::new().with_waits(false));
        for locator in &locators {
            page.element(locator, false).unwrap();
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(entries),
            &locators,
            |bench, locators| {
                bench.iter(|| {
                    for locator in locators {
                        black_box(page.element(black_box(locator), false).unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_staleness_recovery(c: &mut Criterion) {
    let driver = Arc::new(MockDriver::new());
    let node = driver.add(
        MockElement::new("span")
            .with_text("42")
            .matching(Locator::css(".count")),
    );
    let page = Page::with_config(Arc::clone(&driver), ElementConfig::new().with_waits(false));
    let element = page.element(&Locator::css(".count"), false).unwrap();

    c.bench_function("staleness_recovery", |bench| {
        bench.iter(|| {
            driver.rerender(node);
            black_box(element.text().unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_locator_resolution,
    bench_locator_creation,
    bench_cache_hits,
    bench_staleness_recovery,
);
criterion_main!(benches);
