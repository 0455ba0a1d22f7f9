use thiserror::Error;

use crate::metrics::Sample;

mod ilp;
pub use self::ilp::IlpWriter;

mod statsd;
pub use self::statsd::FloatPolicy;
pub use self::statsd::StatsdSink;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("could not write the metric line: {0}")]
    Io(#[from] std::io::Error),
    #[error("{name} has non-integer value {value}, dropping the gauge")]
    NonIntegerValue { name: String, value: f64 },
}

/// One output format. The converter pushes every parsed sample through a
/// sink; a failed emit only affects that sample.
pub trait MetricSink {
    fn emit(&mut self, sample: &Sample) -> Result<(), SinkError>;
}
