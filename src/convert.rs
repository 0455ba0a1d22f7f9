use crate::metrics;
use crate::sink::MetricSink;

/// Outcome of one conversion pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertStats {
    pub emitted: usize,
    pub skipped: usize,
}

/// Walk the raw exposition text and push every data line through the sink,
/// in input order. Comment lines and lines of length <= 1 are ignored. A
/// line that fails to parse or emit is logged and skipped; the pass always
/// runs to the end.
pub fn convert(raw: &str, sink: &mut dyn MetricSink) -> ConvertStats {
    let mut stats = ConvertStats::default();
    for line in raw.lines() {
        if line.len() <= 1 || line.starts_with('#') {
            continue;
        }
        let sample = match metrics::parse_sample(line) {
            Ok(sample) => sample,
            Err(err) => {
                log::warn!("skipping metric line {line:?}: {err}");
                stats.skipped += 1;
                continue;
            }
        };
        match sink.emit(&sample) {
            Ok(()) => stats.emitted += 1,
            Err(err) => {
                log::warn!("skipping metric line {line:?}: {err}");
                stats.skipped += 1;
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Sample, Value};
    use crate::sink::SinkError;

    #[derive(Default)]
    struct RecordingSink {
        samples: Vec<Sample>,
    }

    impl MetricSink for RecordingSink {
        fn emit(&mut self, sample: &Sample) -> Result<(), SinkError> {
            self.samples.push(sample.clone());
            Ok(())
        }
    }

    /// Fails every sample whose value is a float, like the statsd sink in
    /// reject mode.
    #[derive(Default)]
    struct IntOnlySink {
        names: Vec<String>,
    }

    impl MetricSink for IntOnlySink {
        fn emit(&mut self, sample: &Sample) -> Result<(), SinkError> {
            match sample.value {
                Value::Float(value) => Err(SinkError::NonIntegerValue {
                    name: sample.flat_name(),
                    value,
                }),
                Value::Int(_) => {
                    self.names.push(sample.flat_name());
                    Ok(())
                }
            }
        }
    }

    const SCRAPE: &str = "\
# HELP awx_status_total Counts of requests by status
# TYPE awx_status_total counter
awx_status_total{status=\"successful\"} 7
awx_status_total{status=\"failed\"} 2

awx_sessions_total 12
";

    #[test]
    fn skips_comments_and_blank_lines() {
        let mut sink = RecordingSink::default();
        let stats = convert(SCRAPE, &mut sink);
        assert_eq!(stats, ConvertStats { emitted: 3, skipped: 0 });
        assert_eq!(sink.samples.len(), 3);
    }

    #[test]
    fn skips_lines_of_length_one() {
        let mut sink = RecordingSink::default();
        let stats = convert("x\nup 1\n", &mut sink);
        assert_eq!(stats, ConvertStats { emitted: 1, skipped: 0 });
    }

    #[test]
    fn preserves_input_order() {
        let mut sink = RecordingSink::default();
        convert(SCRAPE, &mut sink);
        let names: Vec<String> = sink
            .samples
            .iter()
            .map(|sample| sample.flat_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "awx_status_total,status=successful",
                "awx_status_total,status=failed",
                "awx_sessions_total",
            ]
        );
    }

    #[test]
    fn a_parse_failure_does_not_block_later_lines() {
        let mut sink = RecordingSink::default();
        let stats = convert("up 1\ngarbage line here\ndown 0\n", &mut sink);
        assert_eq!(stats, ConvertStats { emitted: 2, skipped: 1 });
        assert_eq!(sink.samples[1].name, "down");
    }

    #[test]
    fn a_sink_failure_does_not_block_later_lines() {
        let mut sink = IntOnlySink::default();
        let stats = convert("up 1\nawx_load 3.14\ndown 0\n", &mut sink);
        assert_eq!(stats, ConvertStats { emitted: 2, skipped: 1 });
        assert_eq!(sink.names, vec!["up", "down"]);
    }
}
