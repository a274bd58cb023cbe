use criterion::{Criterion, black_box, criterion_group, criterion_main};
use loomlog::fmt::PatternFormatter;
use loomlog::level::Level;
use loomlog::roll::parse_size;
use loomlog::{Document, Format};

const YAML: &str = r#"
variables:
  LOG_DIR: /var/log/app
logger:
  - name: root
    level: info
    console_writer:
      stream: stderr
      pattern_formatter: { pattern: "%d %p %c: %m%n" }
  - name: net
    level: debug
    rolling_file_writer:
      file_name: ${LOG_DIR}/net.log
      pattern_formatter: { pattern: "%d [%t] %p %c: %m%n" }
      size_file_roll_trigger: { max_size: 10MB }
      numbered_file_roller:
        max_index: 5
        gzip_file_compressor: { min_index: 2 }
"#;

const PROPERTIES: &str = "
variables.LOG_DIR = /var/log/app
logger.r.name = root
logger.r.level = info
logger.r.console_writer.c.stream = stderr
logger.r.console_writer.c.pattern_formatter.p.pattern = %d %p %c: %m%n
logger.n.name = net
logger.n.level = debug
logger.n.file_writer.f.file_name = ${LOG_DIR}/net.log
logger.n.file_writer.f.pattern_formatter.p.pattern = %d [%t] %p %c: %m%n
";

fn bench_document_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("Document::parse");

    group.bench_function("yaml", |b| {
        b.iter(|| Document::parse(black_box(YAML), Format::Yaml));
    });

    group.bench_function("properties", |b| {
        b.iter(|| Document::parse(black_box(PROPERTIES), Format::Properties));
    });

    group.bench_function("yaml_syntax_error", |b| {
        b.iter(|| Document::parse(black_box("logger: [unclosed\n"), Format::Yaml));
    });

    group.finish();
}

fn bench_pattern_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("PatternFormatter::parse");

    group.bench_function("typical", |b| {
        b.iter(|| PatternFormatter::parse(black_box("%d [%t] %p %c: %m%n")));
    });

    group.bench_function("custom_date", |b| {
        b.iter(|| PatternFormatter::parse(black_box("%d{%H:%M:%S%.3f} %p %m%n")));
    });

    group.bench_function("literal_only", |b| {
        b.iter(|| PatternFormatter::parse(black_box("no tokens here at all")));
    });

    group.finish();
}

fn bench_scalar_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalars");

    group.bench_function("level_from_str", |b| {
        b.iter(|| black_box("WARN").parse::<Level>());
    });

    group.bench_function("parse_size", |b| {
        b.iter(|| parse_size(black_box("1.5GB")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_document_parse,
    bench_pattern_parse,
    bench_scalar_parsing
);
criterion_main!(benches);
