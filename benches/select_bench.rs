// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strict_soup::{Selector, StrictSoup};

const HTML: &str = r#"
    <!DOCTYPE html>
    <html>
    <head><title>Test</title></head>
    <body>
        <div id="content">
            <a href="/page1" class="nav">Link 1</a>
            <a href="/page2" class="nav">Link 2</a>
            <form action="/submit" method="post">
                <input type="text" name="query">
                <input type="submit">
            </form>
            <ul><li>1</li><li>2</li><li>3</li><li>4</li></ul>
        </div>
    </body>
    </html>
"#;

fn html_parsing_benchmark(c: &mut Criterion) {
    c.bench_function("parse_html", |b| {
        b.iter(|| StrictSoup::parse(black_box(HTML)).unwrap())
    });
}

fn selector_benchmark(c: &mut Criterion) {
    c.bench_function("parse_selector", |b| {
        b.iter(|| Selector::parse(black_box("div#content > ul li:nth-child(2n+1), a.nav[href^='/']")).unwrap())
    });

    let soup = StrictSoup::parse(HTML).unwrap();
    c.bench_function("strict_select", |b| {
        b.iter(|| soup.strict_select(black_box("#content a.nav")).unwrap())
    });
    c.bench_function("strict_select_one", |b| {
        b.iter(|| soup.strict_select_one(black_box("form input[type=text]")).unwrap())
    });
}

criterion_group!(benches, html_parsing_benchmark, selector_benchmark);
criterion_main!(benches);
