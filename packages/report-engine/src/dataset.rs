//! Tabular dataset loading.
//!
//! A dataset is loaded once per session and is immutable afterwards. Only
//! the columns the KPI stage cares about are projected out: `Revenue`
//! (numeric), `Region` (categorical), `Date` (temporal). Column names are
//! matched case-insensitively.

use calamine::Data;
use chrono::NaiveDate;

use crate::error::{ReportError, Result};

/// One projected row of the source table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub revenue: Option<f64>,
    pub region: Option<String>,
    /// `None` when the column is absent or the value did not parse.
    /// Such rows are excluded from time-windowed aggregates only.
    pub date: Option<NaiveDate>,
}

/// An immutable tabular dataset projected onto the KPI columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<Record>,
    pub has_revenue: bool,
    pub has_region: bool,
    pub has_date: bool,
}

impl Dataset {
    /// Load from CSV text (headers in the first row).
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ReportError::Tabular(e.to_string()))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ReportError::Tabular(e.to_string()))?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Self::from_table(&headers, rows))
    }

    /// Load from the first worksheet of an XLSX workbook.
    pub fn from_xlsx(bytes: &[u8]) -> Result<Self> {
        use calamine::Reader;

        let cursor = std::io::Cursor::new(bytes.to_vec());
        let mut workbook = calamine::Xlsx::new(cursor)
            .map_err(|e| ReportError::Tabular(e.to_string()))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(result) => result.map_err(|e| ReportError::Tabular(e.to_string()))?,
            None => return Ok(Self::default()),
        };

        let mut table = range.rows().map(|row| {
            row.iter().map(cell_to_string).collect::<Vec<String>>()
        });

        let headers = match table.next() {
            Some(headers) => headers,
            None => return Ok(Self::default()),
        };

        Ok(Self::from_table(&headers, table.collect()))
    }

    /// Project a header + string-rows table onto the KPI columns.
    fn from_table(headers: &[String], rows: Vec<Vec<String>>) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let revenue_idx = find("revenue");
        let region_idx = find("region");
        let date_idx = find("date");

        let records = rows
            .into_iter()
            .map(|cells| {
                let cell = |idx: Option<usize>| {
                    idx.and_then(|i| cells.get(i))
                        .map(|c| c.trim())
                        .filter(|c| !c.is_empty())
                };
                Record {
                    revenue: cell(revenue_idx).and_then(parse_number),
                    region: cell(region_idx).map(|c| c.to_string()),
                    date: cell(date_idx).and_then(parse_date),
                }
            })
            .collect();

        Self {
            rows: records,
            has_revenue: revenue_idx.is_some(),
            has_region: region_idx.is_some(),
            has_date: date_idx.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a numeric cell, tolerating currency symbols and thousands separators.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok()
}

/// Parse a date cell through a fixed list of accepted formats.
///
/// Datetime values are accepted by taking their date part. Anything
/// unparseable yields `None` rather than an error.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    None
}

/// Render a spreadsheet cell as text.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}
