//! Destinations for finalized records.

use std::io::{self, Write};

use serde_json::Value;

pub trait RecordSink {
    /// Writes one finalized record.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the record cannot be written.
    fn write_record(&mut self, record: &Value) -> io::Result<()>;

    /// Flushes buffered output. Called once after the crawl.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if buffered output cannot be written.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One compact JSON object per line. Non-ASCII text is written as UTF-8,
/// not escaped.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn write_record(&mut self, record: &Value) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Collects records in memory.
impl RecordSink for Vec<Value> {
    fn write_record(&mut self, record: &Value) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn writes_one_object_per_line_without_escaping() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.write_record(&json!({ "title": "Вино", "count": 1 })).unwrap();
        sink.write_record(&json!({ "title": "Пиво" })).unwrap();
        sink.flush().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "{\"title\":\"Вино\",\"count\":1}\n{\"title\":\"Пиво\"}\n");
    }

    #[test]
    fn vec_sink_collects_records() {
        let mut sink: Vec<Value> = Vec::new();
        sink.write_record(&json!({ "sku": "1" })).unwrap();
        assert_eq!(sink, vec![json!({ "sku": "1" })]);
    }
}
