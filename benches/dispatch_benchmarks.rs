//! Resolution throughput benchmarks.
//!
//! Measures a full `resolve_and_invoke` round trip for the common call
//! shapes: fixed arity, variadic wrap, variadic pass-through, inherited
//! members and name-bound callables driving a collection.
//!
//! ```bash
//! cargo bench --bench dispatch_benchmarks
//! ```

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use fluency::prelude::*;
use std::hint::black_box;

fn int() -> TypeRef {
    TypeRef::boxed(PrimitiveKind::Int32)
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();
    registry
        .register_class("Counter")
        .method("inc", vec![int()], int(), |ctx: &mut CallContext| {
            let i: i32 = ctx.arg(0)?;
            ctx.set_return(i + 1);
            Ok(())
        })
        .method("inc", vec![int(), int()], int(), |ctx: &mut CallContext| {
            let i: i32 = ctx.arg(0)?;
            let offset: i32 = ctx.arg(1)?;
            ctx.set_return(i + offset);
            Ok(())
        })
        .variadic_method(
            "sum",
            vec![int(), TypeRef::array_of(int())],
            int(),
            |ctx: &mut CallContext| {
                let start: i32 = ctx.arg(0)?;
                let rest: ArrayRef = ctx.arg(1)?;
                let mut total = start;
                for item in rest.items().iter() {
                    total += i32::from_value(item)?;
                }
                ctx.set_return(total);
                Ok(())
            },
        )
        .build()
        .unwrap();

    let mut base = "Counter".to_string();
    for depth in 1..=5 {
        let name = format!("Level{depth}");
        registry.register_class(name.clone()).extends(base).build().unwrap();
        base = name;
    }
    registry
}

fn bench_resolution(c: &mut Criterion) {
    let registry = registry();
    let counter = Value::Object(registry.instantiate("Counter").unwrap());
    let deep = Value::Object(registry.instantiate("Level5").unwrap());
    let wrapped: Vec<Value> = (0..9).map(Value::Int32).collect();
    let none: [Value; 0] = [];
    let passed = [
        Value::Int32(0),
        Value::array(int(), (1..9).map(Value::Int32).collect()),
    ];

    let mut group = c.benchmark_group("resolution");
    group.throughput(Throughput::Elements(1));

    group.bench_function("fixed_arity", |b| {
        b.iter(|| resolve_and_invoke(black_box(&counter), "inc", black_box(&[Value::Int32(1)])))
    });
    group.bench_function("variadic_wrap", |b| {
        b.iter(|| resolve_and_invoke(black_box(&counter), "sum", black_box(&wrapped)))
    });
    group.bench_function("variadic_pass_through", |b| {
        b.iter(|| resolve_and_invoke(black_box(&counter), "sum", black_box(&passed)))
    });
    group.bench_function("inherited_depth_5", |b| {
        b.iter(|| resolve_and_invoke(black_box(&deep), "inc", black_box(&[Value::Int32(1)])))
    });
    group.bench_function("no_match", |b| {
        b.iter(|| resolve_and_invoke(black_box(&counter), "doesNotExist", black_box(&none)))
    });
    group.finish();
}

fn bench_coercion(c: &mut Criterion) {
    let seq: Sequence = (0..100).map(|i| Value::string(format!("item{i}"))).collect();
    let name = Value::string("length");

    let mut group = c.benchmark_group("coercion");
    group.throughput(Throughput::Elements(seq.len() as u64));
    group.bench_function("map_by_method_name", |b| b.iter(|| black_box(&seq).map(&name)));
    group.bench_function("sort_by_method_name", |b| b.iter(|| black_box(&seq).sort_by(&name)));
    group.finish();
}

criterion_group!(benches, bench_resolution, bench_coercion);
criterion_main!(benches);
