use criterion::{Criterion, black_box, criterion_group, criterion_main};

use razen_syntax::analyzer::parse_source;
use razen_syntax::tokenizer::token::Tokenizer;

const SAMPLE: &str = r#"
use collections;

pub struct Point {
    x: float,
    y: float,
}

impl Point {
    fun norm(self) -> float {
        return (self.x ** 2 + self.y ** 2) ** 0.5;
    }
}

fun classify(value: int) -> str {
    match value {
        0 => "zero",
        _ => f"other: {value}",
    }
    return "done";
}

fun main() {
    var total = 0;
    for i in 0..100 {
        if i % 2 == 0 {
            total += i;
        } else {
            total--;
        }
    }
    var table: map<str, array<int>> = {"evens": [2, 4], "odds": [1, 3]};
    while total > 0 {
        total = total - 1;
    }
}
"#;

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize", |b| {
        b.iter(|| Tokenizer::new().tokenize(black_box(SAMPLE)))
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_source", |b| {
        b.iter(|| parse_source("bench.rzn", black_box(SAMPLE)))
    });
}

criterion_group!(benches, bench_tokenize, bench_parse);
criterion_main!(benches);
