//! Benchmark harness for the quill compiler.
//!
//! Run with: cargo bench -p quill_compiler

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quill_compiler::{parse_files, Compilation, CompilationOptions};
use quill_core::text::SourceText;
use quill_core::CompilerArena;
use quill_evaluator::{Globals, Host};

const SMALL_SOURCE: &str = r#"
function add(a: int, b: int): int {
    return a + b
}
let answer = add(40, 2)
print(string(answer))
"#;

/// Generate a program with `functions` functions, each with a loop and a branch.
fn generate_source(functions: usize) -> String {
    let mut source = String::new();
    for i in 0..functions {
        source.push_str(&format!(
            "function f{i}(n: int): int {{
    var total = {i}
    for k = 1 to n {{
        if k % 3 == 0
            total += k
        else
            total -= 1
    }}
    while total > 1000 {{
        total /= 2
    }}
    return total
}}\n\n"
        ));
    }
    source.push_str("var sum = 0\n");
    for i in 0..functions {
        source.push_str(&format!("sum += f{i}(10)\n"));
    }
    source
}

struct SilentHost;

impl Host for SilentHost {
    fn print(&mut self, _text: &str) {}

    fn input(&mut self) -> String {
        String::new()
    }

    fn random(&mut self, _maximum: i32) -> i32 {
        0
    }
}

// ============================================================================
// Compilation Benchmarks
// ============================================================================

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    group.bench_function("small", |b| {
        b.iter(|| {
            let arena = CompilerArena::new();
            let trees = parse_files(&arena, vec![SourceText::shared("bench.qs", black_box(SMALL_SOURCE))]);
            let compilation = Compilation::new(CompilationOptions::default(), trees);
            black_box(compilation.has_errors());
        });
    });

    for size in [10, 100] {
        let source = generate_source(size);
        group.bench_with_input(BenchmarkId::new("functions", size), &source, |b, source| {
            b.iter(|| {
                let arena = CompilerArena::new();
                let trees = parse_files(&arena, vec![SourceText::shared("bench.qs", black_box(source.as_str()))]);
                let compilation = Compilation::new(CompilationOptions::default(), trees);
                black_box(compilation.has_errors());
            });
        });
    }

    group.finish();
}

// ============================================================================
// Multi-file Benchmarks
// ============================================================================

fn bench_parse_files(c: &mut Criterion) {
    let files: Vec<String> = (0..8).map(|i| generate_source(20).replace("function f", &format!("function g{i}_"))).collect();
    c.bench_function("parse_files_parallel", |b| {
        b.iter(|| {
            let arena = CompilerArena::new();
            let sources = files
                .iter()
                .enumerate()
                .map(|(i, text)| SourceText::shared(format!("file{i}.qs"), text.as_str()))
                .collect();
            black_box(parse_files(&arena, sources).len());
        });
    });
}

// ============================================================================
// Evaluation Benchmarks
// ============================================================================

fn bench_evaluate(c: &mut Criterion) {
    let source = generate_source(50);
    let arena = CompilerArena::new();
    let trees = parse_files(&arena, vec![SourceText::shared("bench.qs", source)]);
    let compilation = Compilation::new(CompilationOptions { is_script: true }, trees);
    assert!(!compilation.has_errors());

    c.bench_function("evaluate_50_functions", |b| {
        b.iter(|| {
            let mut globals = Globals::default();
            let result = compilation.evaluate(&mut globals, &mut SilentHost);
            black_box(result.is_ok());
        });
    });
}

criterion_group!(benches, bench_compile, bench_parse_files, bench_evaluate);
criterion_main!(benches);
