use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mysql_slowlog_analyzer::{
    Aggregator, Analysis, AnalyzerConfig, RecordSplitter, calculate_performance_stats,
    parse_events_from_string, parse_events_with_config,
};

/// 生成包含 `count` 条记录的合成日志
fn synthetic_log(count: usize) -> String {
    let statements = [
        "SELECT * FROM orders o JOIN users u ON u.id = o.user_id WHERE o.id = {}",
        "UPDATE inventory SET qty = qty - 1 WHERE sku = 'SKU-{}'",
        "INSERT INTO audit_log (user_id, action) VALUES ({}, 'login')",
        "DELETE FROM sessions WHERE expires < {}",
        "SELECT COUNT(*) FROM events\nWHERE created_at > '2025-05-{}'\nAND kind IN (1, 2, 3)",
    ];

    let mut log = String::from("/usr/sbin/mysqld, Version: 8.0.36. started with:\n");
    for i in 0..count {
        let sql = statements[i % statements.len()].replace("{}", &i.to_string());
        log.push_str(&format!(
            "# Time: 2025-05-31T01:{:02}:{:02}.000000Z\n\
             # User@Host: user{}[user{}] @  [10.0.0.{}]\n\
             # Thread_id: {}  Schema: shop  QC_hit: No\n\
             # Query_time: {:.6}  Lock_time: 0.000100 Rows_sent: 1  Rows_examined: {}\n\
             # Rows_affected: 0  Bytes_sent: 512\n\
             SET timestamp={};\n\
             {};\n",
            (i / 60) % 60,
            i % 60,
            i % 10,
            i % 10,
            i % 255,
            i,
            (i % 400) as f64 * 0.1,
            i * 3,
            1748653200 + i,
            sql
        ));
    }
    log
}

/// 记录切分
fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");

    for count in [1_000usize, 10_000] {
        let log = synthetic_log(count);
        group.throughput(Throughput::Bytes(log.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &log, |b, log| {
            b.iter(|| RecordSplitter::new(black_box(log)).count());
        });
    }

    group.finish();
}

/// 串行与并行解析
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.sample_size(10); // 减少样本数量以加快测试速度

    let log = synthetic_log(20_000);
    let serial = AnalyzerConfig {
        parallel_threshold: 0,
        ..AnalyzerConfig::default()
    };
    let parallel = AnalyzerConfig {
        parallel_threshold: 1,
        ..AnalyzerConfig::default()
    };

    group.bench_function("serial", |b| {
        b.iter(|| parse_events_with_config(black_box(&log), &serial).0.len());
    });
    group.bench_function("parallel", |b| {
        b.iter(|| parse_events_with_config(black_box(&log), &parallel).0.len());
    });

    group.finish();
}

/// 聚合与统计
fn bench_aggregate_and_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    group.sample_size(10); // 减少样本数量以加快测试速度

    let (events, _errors) = parse_events_from_string(&synthetic_log(20_000));
    let aggregator = Aggregator::new();

    group.bench_function("aggregate", |b| {
        b.iter(|| aggregator.aggregate(black_box(&events)).summaries.len());
    });
    group.bench_function("performance_stats", |b| {
        b.iter(|| calculate_performance_stats(black_box(&events)).map(|s| s.type_stats.len()));
    });

    group.finish();
}

/// 完整流程：文本 → 分析快照
fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    group.sample_size(10); // 减少样本数量以加快测试速度

    let log = synthetic_log(10_000);
    let config = AnalyzerConfig::default();
    group.bench_function("from_log_text", |b| {
        b.iter(|| {
            let (analysis, errors) = Analysis::from_log_text("bench", black_box(&log), &config);
            (analysis.total_templates(), errors.len())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_split,
    bench_parse,
    bench_aggregate_and_stats,
    bench_full_analysis
);
criterion_main!(benches);
