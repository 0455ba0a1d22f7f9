use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::Utc;

use super::{MetricSink, SinkError};
use crate::metrics::Sample;

/// Writes one influx-line-protocol line per sample, flushed as produced so a
/// crash mid-run loses at most the line being written.
pub struct IlpWriter<W: Write> {
    out: W,
    debug_file: Option<File>,
}

impl<W: Write> IlpWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            debug_file: None,
        }
    }

    /// Tee every emitted line into `path`, appending.
    pub fn with_debug_file(out: W, path: &Path) -> std::io::Result<Self> {
        let debug_file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            out,
            debug_file: Some(debug_file),
        })
    }
}

impl<W: Write> MetricSink for IlpWriter<W> {
    fn emit(&mut self, sample: &Sample) -> Result<(), SinkError> {
        let line = render_line(sample, Utc::now().timestamp());
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        if let Some(file) = &mut self.debug_file {
            writeln!(file, "{line}")?;
        }
        log::debug!("emitted metric: {line}");
        Ok(())
    }
}

/// `measurement,tag1=v1,tag2=v2 value=<num> <unixSeconds>`
fn render_line(sample: &Sample, timestamp: i64) -> String {
    let mut line = sample.name.clone();
    for label in &sample.labels {
        line.push(',');
        line.push_str(&label.name);
        line.push('=');
        line.push_str(&escape_tag_value(&label.value));
    }
    line.push_str(" value=");
    line.push_str(&sample.value.to_string());
    line.push(' ');
    line.push_str(&timestamp.to_string());
    line
}

// Line protocol treats comma, equals and space as separators inside the tag
// set; they have to be backslash-escaped in tag values.
fn escape_tag_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, ',' | '=' | ' ') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
