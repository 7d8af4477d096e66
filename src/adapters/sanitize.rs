//! Log redaction for clinical measurements.
//!
//! Prediction code never formats record values into log messages, but
//! error strings from the model adapter or third-party crates can. Any
//! `<feature>=<number>` or `<feature>: <number>` pair whose key is one of the
//! 13 contract features is replaced with `<feature>=[REDACTED]` before the
//! line reaches the log sink.
//!
//! Terminal color sequences are stripped first: with ANSI enabled the `fmt`
//! layer writes `age\x1b[0m\x1b[2m=\x1b[0m63`, which would hide the pair.
//!
//! Sanitizing is line-based and capped (see `CARDIORISK_SANITIZE_MAX_BYTES`)
//! so a huge unterminated write cannot grow the buffer without bound.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::FEATURE_NAMES;

static FEATURE_VALUE: OnceLock<Regex> = OnceLock::new();
static ANSI_SGR: OnceLock<Regex> = OnceLock::new();

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

fn max_sanitize_bytes() -> usize {
    std::env::var("CARDIORISK_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn feature_value_pattern() -> &'static Regex {
    FEATURE_VALUE.get_or_init(|| {
        let keys = FEATURE_NAMES.join("|");
        Regex::new(&format!(
            r#"(?i)\b({keys})\b"?\s*[:=]\s*"?-?[0-9]+(?:\.[0-9]+)?"?"#
        ))
        .expect("feature pattern is valid")
    })
}

fn ansi_sgr_pattern() -> &'static Regex {
    ANSI_SGR.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("SGR pattern is valid"))
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Redact clinical feature values from a string.
#[must_use]
pub fn redact(input: &str) -> String {
    redact_with_limit(input, max_sanitize_bytes())
}

fn redact_with_limit(input: &str, max_bytes: usize) -> String {
    let plain = ansi_sgr_pattern().replace_all(input, "");
    let (prefix, truncated) = truncate_to_char_boundary(&plain, max_bytes);
    let mut out = match feature_value_pattern().replace_all(prefix, "$1=[REDACTED]") {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    };
    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    out
}

/// A `tracing_subscriber` writer wrapper that redacts each formatted line
/// before it reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let clean = redact(&String::from_utf8_lossy(&line));
            self.inner.write_all(clean.as_bytes())?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let clean = redact(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(clean.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let clean = redact(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(clean.as_bytes())?;
            self.buffer.clear();
        }
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}
