//! Criterion benchmarks for rust_config_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_config_logger::prelude::*;
use std::sync::Arc;

// ============================================================================
// Pattern Compiler Benchmarks
// ============================================================================

fn bench_pattern_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_compile");
    group.throughput(Throughput::Elements(1));

    for (name, pattern) in [
        ("message_only", "%m%n"),
        ("default", rust_config_logger::DEFAULT_PATTERN),
        ("custom_date", "%d{%H:%M:%S%.3f} [%p] %c %f:%l %m%n"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), pattern, |b, pattern| {
            b.iter(|| black_box(LogFormatter::new(pattern)));
        });
    }

    group.finish();
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Elements(1));

    let event = LogEvent::new(Arc::from("bench"), LogLevel::Info)
        .with_location(file!(), line!())
        .with_message("request served in 12 ms");

    for (name, pattern) in [
        ("message_only", "%m%n"),
        ("default", rust_config_logger::DEFAULT_PATTERN),
    ] {
        let formatter = LogFormatter::new(pattern);
        group.bench_function(BenchmarkId::new("buffer", name), |b| {
            let mut buf = Vec::with_capacity(256);
            b.iter(|| {
                buf.clear();
                formatter.format_into(black_box(&event), &mut buf);
                black_box(buf.len())
            });
        });
        group.bench_function(BenchmarkId::new("string", name), |b| {
            b.iter(|| black_box(formatter.format(black_box(&event))));
        });
    }

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::new("bench");
    logger.set_formatter("%d [%p] %c %m%n").unwrap();
    let memory = Arc::new(MemoryAppender::new());
    logger.add_appender(memory.clone());

    group.bench_function("accepted", |b| {
        b.iter(|| {
            logger.info(black_box("Info message"));
            if memory.len() > 10_000 {
                memory.take();
            }
        });
    });

    logger.set_level(LogLevel::Error);
    group.bench_function("filtered", |b| {
        b.iter(|| logger.debug(black_box("Debug message")));
    });

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");
    let threads = 4;
    let per_thread = 250;
    group.throughput(Throughput::Elements((threads * per_thread) as u64));

    group.bench_function("memory_4_threads", |b| {
        b.iter(|| {
            let logger = Arc::new(Logger::new("bench"));
            logger.set_formatter("%t %m").unwrap();
            logger.add_appender(Arc::new(MemoryAppender::new()));

            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    let logger = Arc::clone(&logger);
                    std::thread::spawn(move || {
                        for i in 0..per_thread {
                            logger.info(format!("message {}", i));
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Config Benchmarks
// ============================================================================

fn bench_config(c: &mut Criterion) {
    let mut group = c.benchmark_group("config");

    let registry = ConfigRegistry::new();
    let cell = registry.lookup("bench.port", 0u16, "").unwrap();
    let mut port = 0u16;

    group.bench_function("set_value", |b| {
        b.iter(|| {
            port = port.wrapping_add(1);
            cell.set_value(black_box(port)).unwrap();
        });
    });

    group.bench_function("lookup_existing", |b| {
        b.iter(|| black_box(registry.lookup("bench.port", 0u16, "").unwrap()));
    });

    let document = serde_json::json!({
        "bench": {"port": 8080, "name": "svc", "tags": ["a", "b", "c"]},
        "unrelated": {"deep": {"tree": {"of": {"keys": 1}}}}
    });
    group.bench_function("load_document", |b| {
        b.iter(|| registry.load_from_document(black_box(&document)).unwrap());
    });

    group.finish();
}

fn bench_reload(c: &mut Criterion) {
    let mut group = c.benchmark_group("reload");

    let loggers = Arc::new(LoggerRegistry::new());
    let factory = AppenderFactory::new();
    factory.register("memory", |_config: &AppenderConfig| {
        Ok(Arc::new(MemoryAppender::new()) as Arc<dyn Appender>)
    });
    let reconciler = ReloadReconciler::new(loggers, Arc::new(factory));

    let configs = |level: LogLevel| -> LoggerConfigSet {
        (0..16)
            .map(|i| {
                LoggerConfig::new(format!("svc.{}", i), level).with_appender(AppenderConfig {
                    kind: "memory".to_string(),
                    ..AppenderConfig::default()
                })
            })
            .collect()
    };
    let info = configs(LogLevel::Info);
    let warn = configs(LogLevel::Warn);

    group.bench_function("unchanged_16", |b| {
        b.iter(|| reconciler.apply(black_box(&info), black_box(&info)).unwrap());
    });
    group.bench_function("rebuild_16", |b| {
        b.iter(|| {
            reconciler.apply(&info, &warn).unwrap();
            reconciler.apply(&warn, &info).unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_pattern_compile,
    bench_render,
    bench_logging,
    bench_concurrent_logging,
    bench_config,
    bench_reload,
);

criterion_main!(benches);
