use std::io;
use std::net::UdpSocket;
use std::time::{Duration, Instant};

use super::{MetricSink, SinkError};
use crate::metrics::{Sample, Value};

// Conservative safe payload size for a single UDP datagram.
const MAX_DATAGRAM: usize = 512;
// Buffered gauges are pushed out at least this often.
const FLUSH_INTERVAL: Duration = Duration::from_secs(2);

/// How gauge emission treats float-valued samples. Gauges go out as
/// integers; floats are either truncated toward zero or dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum FloatPolicy {
    /// Log the sample and skip it
    Reject,
    /// Truncate toward zero and send the integer part
    Truncate,
}

/// Buffering StatsD client, gauge-only. Datagrams are batched up to
/// [`MAX_DATAGRAM`] bytes and flushed on overflow, after [`FLUSH_INTERVAL`],
/// and on drop.
pub struct StatsdSink {
    socket: UdpSocket,
    prefix: String,
    float_policy: FloatPolicy,
    buf: String,
    last_flush: Instant,
}

impl StatsdSink {
    pub fn connect(addr: &str, prefix: &str, float_policy: FloatPolicy) -> io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect(addr)?;
        Ok(Self {
            socket,
            prefix: prefix.to_string(),
            float_policy,
            buf: String::new(),
            last_flush: Instant::now(),
        })
    }

    fn gauge(&mut self, name: &str, value: i64) -> io::Result<()> {
        let datagram = format!("{}{}:{}|g", self.prefix, sanitize(name), value);
        if self.buf.len() + datagram.len() + 1 > MAX_DATAGRAM {
            self.flush()?;
        }
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.buf.push_str(&datagram);
        if self.last_flush.elapsed() >= FLUSH_INTERVAL {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            self.socket.send(self.buf.as_bytes())?;
            self.buf.clear();
        }
        self.last_flush = Instant::now();
        Ok(())
    }
}

impl MetricSink for StatsdSink {
    fn emit(&mut self, sample: &Sample) -> Result<(), SinkError> {
        let value = match (sample.value, self.float_policy) {
            (Value::Int(value), _) => value,
            (Value::Float(value), FloatPolicy::Truncate) => value as i64,
            (Value::Float(value), FloatPolicy::Reject) => {
                return Err(SinkError::NonIntegerValue {
                    name: sample.flat_name(),
                    value,
                });
            }
        };
        let name = sample.flat_name();
        self.gauge(&name, value)?;
        log::debug!("sent statsd gauge {name}:{value}");
        Ok(())
    }
}

impl Drop for StatsdSink {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            log::warn!("could not flush the statsd buffer: {err}");
        }
    }
}

// The wire format reserves `:` and `|`; newlines split datagrams. Spaces are
// flattened too since downstream parsers tend to choke on them.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|ch| match ch {
            ':' | '|' | ' ' | '\n' => '_',
            other => other,
        })
        .collect()
}
