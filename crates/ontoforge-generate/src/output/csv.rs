use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ontoforge_core::{EntityPool, fields};

/// Write a pool as CSV with the given column ordering.
///
/// List-valued reference fields are rendered as a single delimited cell so
/// the tabular form can round-trip them.
pub fn write_pool_csv(
    path: &Path,
    pool: &EntityPool,
    field_order: &[String],
) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(field_order)?;

    for record in pool.records() {
        let row: Vec<String> = field_order
            .iter()
            .map(|name| {
                if name == fields::ID {
                    record.id().to_string()
                } else {
                    record
                        .get(name)
                        .map(|value| value.to_csv())
                        .unwrap_or_default()
                }
            })
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontoforge_core::{EntityRecord, FieldValue, PoolBuilder};

    #[test]
    fn header_and_rows_follow_field_order() {
        let mut builder = PoolBuilder::new("machine");
        let mut record = EntityRecord::new("machine_0");
        record.set("kind", FieldValue::Text("press".to_string()));
        record.set("line", FieldValue::Ref("line_2".to_string()));
        builder.push(record).expect("push record");
        let pool = builder.freeze();

        let mut path = std::env::temp_dir();
        path.push(format!("ontoforge_csv_{}.csv", uuid::Uuid::new_v4()));

        let field_order = vec![
            "id".to_string(),
            "line".to_string(),
            "kind".to_string(),
        ];
        let bytes = write_pool_csv(&path, &pool, &field_order).expect("write csv");
        assert!(bytes > 0);

        let contents = std::fs::read_to_string(&path).expect("read csv back");
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("id,line,kind"));
        assert_eq!(lines.next(), Some("machine_0,line_2,press"));

        std::fs::remove_file(&path).ok();
    }
}
