use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::{Label, Sample, Value};

lazy_static! {
    // name ["{" labels "}"] SP number
    static ref LINE_RE: Regex =
        Regex::new(r#"^(?P<name>[a-zA-Z_:][a-zA-Z0-9_:]*)(?:\{(?P<labels>.*)\})?\s+(?P<value>\S+)$"#)
            .unwrap();
    // one key="value" pair, anchored at the front of the remaining label text
    static ref LABEL_RE: Regex =
        Regex::new(r#"^\s*(?P<key>[a-zA-Z_][a-zA-Z0-9_]*)\s*=\s*"(?P<value>(?:[^"\\]|\\.)*)""#)
            .unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line does not match `name{{label=\"value\",...}} number`")]
    Shape,
    #[error("malformed label block near {0:?}")]
    Labels(String),
    #[error("{0:?} is not a numeric value")]
    Number(String),
}

/// Parse one exposition data line. Comment and blank lines are the caller's
/// concern; everything handed in here is expected to match the grammar.
pub fn parse_sample(line: &str) -> Result<Sample, ParseError> {
    let caps = LINE_RE.captures(line).ok_or(ParseError::Shape)?;
    let labels = match caps.name("labels") {
        Some(body) => parse_labels(body.as_str())?,
        None => Vec::new(),
    };
    let value = parse_value(&caps["value"])?;
    Ok(Sample {
        name: caps["name"].to_string(),
        labels,
        value,
    })
}

fn parse_value(text: &str) -> Result<Value, ParseError> {
    if let Ok(int) = text.parse::<i64>() {
        return Ok(Value::Int(int));
    }
    text.parse::<f64>()
        .map(Value::Float)
        .map_err(|_| ParseError::Number(text.to_string()))
}

fn parse_labels(body: &str) -> Result<Vec<Label>, ParseError> {
    let mut labels = Vec::new();
    let mut rest = body.trim();
    while !rest.is_empty() {
        let caps = LABEL_RE
            .captures(rest)
            .ok_or_else(|| ParseError::Labels(rest.to_string()))?;
        labels.push(Label {
            name: caps["key"].to_string(),
            value: unescape(&caps["value"]),
        });
        rest = rest[caps.get(0).unwrap().end()..].trim_start();
        // a trailing comma after the last label is legal exposition syntax
        match rest.strip_prefix(',') {
            Some(after) => rest = after.trim_start(),
            None if !rest.is_empty() => return Err(ParseError::Labels(rest.to_string())),
            None => {}
        }
    }
    Ok(labels)
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}
