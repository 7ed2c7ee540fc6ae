use csv::{ReaderBuilder, StringRecord};

use super::error::ImportError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// An uploaded comma-separated table: one header row plus data rows.
///
/// Rows shorter than the header are kept and read as blank cells. Rows longer
/// than the header make the whole table malformed.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    records: Vec<StringRecord>,
}

impl Table {
    pub fn parse(body: &[u8]) -> Result<Self, ImportError> {
        let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ImportError::MalformedTable(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(body);

        let headers: Vec<String> = reader
            .headers()
            .map_err(malformed)?
            .iter()
            .map(str::to_owned)
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(malformed)?;
            if is_blank_line(&record) {
                continue;
            }
            if record.len() > headers.len() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(ImportError::MalformedTable(format!(
                    "Error tokenizing data. Expected {} fields in line {}, saw {}",
                    headers.len(),
                    line,
                    record.len()
                )));
            }
            records.push(record);
        }

        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn malformed(err: csv::Error) -> ImportError {
    ImportError::MalformedTable(err.to_string())
}

fn is_blank_line(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|cell| cell.trim().is_empty())
}
