use criterion::{black_box, criterion_group, criterion_main, Criterion};

use towerflux::convert;
use towerflux::metrics::Sample;
use towerflux::sink::{MetricSink, SinkError};

struct NullSink;

impl MetricSink for NullSink {
    fn emit(&mut self, _sample: &Sample) -> Result<(), SinkError> {
        Ok(())
    }
}

fn scrape_text(lines: usize) -> String {
    let mut text = String::from(
        "# HELP awx_status_total Counts of requests by status\n# TYPE awx_status_total counter\n",
    );
    for n in 0..lines {
        text.push_str(&format!(
            "awx_status_total{{status=\"successful\",node=\"tower-{n}.example.com\"}} {n}\n"
        ));
    }
    text
}

fn bench_convert(c: &mut Criterion) {
    let raw = scrape_text(1_000);
    c.bench_function("convert 1k scrape lines", |b| {
        b.iter(|| convert::convert(black_box(&raw), &mut NullSink))
    });
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
