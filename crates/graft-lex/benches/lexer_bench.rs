//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package graft-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use graft_lex::lex;

fn token_count(source: &str) -> usize {
    lex(source).map(|tokens| tokens.len()).unwrap_or(0)
}

fn bench_lexer_small_program(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "S() S() d+=90 s=25 J() S()";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("small_program", |b| b.iter(|| token_count(black_box(source))));

    group.finish();
}

fn bench_lexer_circle(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_circle");

    let source = "d+=1 s=3 S()".repeat(200);
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("repeated_program", |b| b.iter(|| token_count(black_box(&source))));

    group.finish();
}

criterion_group!(benches, bench_lexer_small_program, bench_lexer_circle);
criterion_main!(benches);
