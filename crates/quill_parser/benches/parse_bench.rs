use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quill_core::CompilerArena;

// A medium-size program with every statement and expression form
const QUILL_SOURCE: &str = r#"
// Integer helpers
function gcd(a: int, b: int): int {
    while b != 0 {
        let t = b
        b = a % b
        a = t
    }
    return a
}

function fib(n: int): int {
    if n <= 1 return n
    return fib(n - 1) + fib(n - 2)
}

function isPrime(n: int): bool {
    if n < 2 return false
    for i = 2 to n - 1 {
        if n % i == 0 return false
    }
    return true
}

/* string building */
function repeat(text: string, count: int): string {
    var result = ""
    var i = 0
    do {
        result += text
        i++
    } while i < count
    return result
}

function main() {
    var total = 0
    for i = 1 to 100 {
        if isPrime(i) total += i
        else continue
    }
    print("sum of primes: " + string(total))
    print(repeat("ab", 3))
    let g = gcd(84, 36)
    if g == 12 && !(total < 0) || false
        print("ok")
    var n = 10
    start:
    n--
    if n > 0 goto start
    print(string(fib(15)))
}
"#;

fn bench_parse_quill(c: &mut Criterion) {
    c.bench_function("parse_quill_medium", |b| {
        b.iter(|| {
            let arena = CompilerArena::new();
            let tree = quill_parser::parse_text(&arena, "bench.qs", black_box(QUILL_SOURCE));
            black_box(tree.root().members.len());
        });
    });
}

criterion_group!(benches, bench_parse_quill);
criterion_main!(benches);
