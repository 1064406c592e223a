use criterion::{black_box, criterion_group, criterion_main, Criterion};
use microflow_benches::{job_registry, Job, Phase};
use microflow_core::{Engine, Variables};
use std::time::Duration;

fn benchmark_fire(c: &mut Criterion) {
    let engine = Engine::new(job_registry());
    let mut group = c.benchmark_group("trigger_execution");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("guarded_cycle", |b| {
        let mut job = Job { phase: Phase::Idle };
        b.iter(|| {
            for trigger in ["start", "finish", "restart"] {
                let vars = Variables::new().with("worker", "w-1".to_string());
                let result = engine.fire(&mut job, black_box(trigger), vars);
                black_box(result.is_ok());
            }
        })
    });

    group.bench_function("denied", |b| {
        let mut job = Job { phase: Phase::Idle };
        b.iter(|| black_box(engine.fire(&mut job, "start", Variables::new()).is_ok()))
    });

    group.bench_function("available_triggers", |b| {
        let mut job = Job { phase: Phase::Idle };
        b.iter(|| black_box(engine.available_triggers(&mut job).map(|t| t.len())))
    });

    group.finish();
}

criterion_group!(benches, benchmark_fire);
criterion_main!(benches);
