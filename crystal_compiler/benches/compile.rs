use criterion::{black_box, criterion_group, criterion_main, Criterion};

use crystal_compiler::prelude::*;

fn criterion_benchmark(c: &mut Criterion) {
    let fib = include_str!("../tests/programs/fib.crystal");
    let shapes = include_str!("../tests/programs/shapes.crystal");

    c.bench_function("compile fib", |b| {
        b.iter(|| black_box(compile_str(black_box(fib))))
    });

    c.bench_function("compile shapes recorded", |b| {
        b.iter(|| black_box(compile_recorded(black_box(shapes))))
    });

    {
        // Long straight-line body to stress the expression engine.
        let mut source = String::from("void main: int a, int b begin\n");
        for i in 0..500 {
            source.push_str(&format!("    a = (a + {i}) * (b - 3) % 7 + b;\n"));
        }
        source.push_str("end\n");

        c.bench_function("compile long main", |b| {
            b.iter(|| black_box(compile_str(black_box(source.as_str()))))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
