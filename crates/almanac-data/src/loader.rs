//! CSV loading for the three input sources.
//!
//! Each source has a fixed schema (see [`Source::required_columns`]). Columns are
//! located by header name, so extra columns and any column order are accepted.
//! The `date` column is parsed as a calendar date; numeric fields that are empty
//! or hold a missing-value marker load as `None`.

use crate::error::{DataError, Result};
use crate::records::{EconomicRecord, SalesRecord, SearchIndexRecord, Source};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Date-only formats accepted in the date column.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Date-time formats accepted in the date column; the time part is discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Tokens read as a missing numeric value.
const MISSING_TOKENS: &[&str] = &["", "NA", "NaN", "nan", "NULL", "null"];

/// Parse a date field in any of the accepted formats.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Header-resolved CSV table for one source.
struct SourceTable<R: Read> {
    path: PathBuf,
    reader: csv::Reader<R>,
    /// Field index of each required column, in [`Source::required_columns`] order.
    indices: Vec<usize>,
}

/// One parsed CSV row, with access helpers that produce located errors.
struct Row<'a> {
    path: &'a Path,
    line: u64,
    record: &'a csv::StringRecord,
    indices: &'a [usize],
    columns: &'static [&'static str],
}

impl Row<'_> {
    fn text(&self, slot: usize) -> &str {
        self.record.get(self.indices[slot]).unwrap_or_default()
    }

    fn date(&self, slot: usize) -> Result<NaiveDate> {
        let value = self.text(slot);
        parse_date(value).ok_or_else(|| DataError::DateParse {
            path: self.path.to_path_buf(),
            line: self.line,
            value: value.to_string(),
        })
    }

    /// Key field, or `None` when empty or a missing-value marker.
    fn key(&self, slot: usize) -> Option<&str> {
        let value = self.text(slot);
        (!MISSING_TOKENS.contains(&value)).then_some(value)
    }

    fn number(&self, slot: usize) -> Result<Option<f64>> {
        let value = self.text(slot);
        if MISSING_TOKENS.contains(&value) {
            return Ok(None);
        }
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| DataError::InvalidValue {
                path: self.path.to_path_buf(),
                line: self.line,
                column: self.columns[slot].to_string(),
                value: value.to_string(),
            })
    }
}

impl<R: Read> SourceTable<R> {
    fn new(source: Source, path: &Path, input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        let indices = source
            .required_columns()
            .iter()
            .map(|column| {
                headers
                    .iter()
                    .position(|h| h == *column)
                    .ok_or_else(|| DataError::SchemaMismatch {
                        path: path.to_path_buf(),
                        column: (*column).to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            indices,
        })
    }

    /// Parse every row with `parse`, stopping at the first error.
    fn rows<T>(
        mut self,
        source: Source,
        parse: impl Fn(&Row<'_>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut out = Vec::new();
        let mut record = csv::StringRecord::new();
        while self.reader.read_record(&mut record)? {
            let line = record.position().map_or(0, |p| p.line());
            let row = Row {
                path: &self.path,
                line,
                record: &record,
                indices: &self.indices,
                columns: source.required_columns(),
            };
            out.push(parse(&row)?);
        }
        Ok(out)
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => DataError::Io(e),
    })
}

/// Parse sales records from any reader. `path` is used for error reporting only.
///
/// Rows with an empty or missing region or customer segment have no group key
/// and are skipped. Their date and revenue fields are still validated.
pub fn parse_sales<R: Read>(input: R, path: &Path) -> Result<Vec<SalesRecord>> {
    let rows = SourceTable::new(Source::Sales, path, input)?.rows(Source::Sales, |row| {
        let date = row.date(0)?;
        let revenue = row.number(3)?;
        Ok(match (row.key(1), row.key(2)) {
            (Some(region), Some(segment)) => Some(SalesRecord::new(date, region, segment, revenue)),
            _ => None,
        })
    })?;

    let total = rows.len();
    let records: Vec<SalesRecord> = rows.into_iter().flatten().collect();
    if records.len() < total {
        tracing::warn!(
            path = %path.display(),
            skipped = total - records.len(),
            "skipped sales rows without a region or customer segment"
        );
    }
    Ok(records)
}

/// Parse search-index records from any reader.
pub fn parse_search<R: Read>(input: R, path: &Path) -> Result<Vec<SearchIndexRecord>> {
    SourceTable::new(Source::Search, path, input)?.rows(Source::Search, |row| {
        Ok(SearchIndexRecord {
            date: row.date(0)?,
            search_index: row.number(1)?,
        })
    })
}

/// Parse economic-indicator records from any reader.
pub fn parse_economic<R: Read>(input: R, path: &Path) -> Result<Vec<EconomicRecord>> {
    SourceTable::new(Source::Economic, path, input)?.rows(Source::Economic, |row| {
        Ok(EconomicRecord {
            date: row.date(0)?,
            gdp_growth: row.number(1)?,
            inflation_rate: row.number(2)?,
        })
    })
}

/// Load the sales source from a CSV file.
pub fn load_sales(path: &Path) -> Result<Vec<SalesRecord>> {
    let records = parse_sales(open(path)?, path)?;
    tracing::info!(source = %Source::Sales, rows = records.len(), path = %path.display(), "loaded source");
    Ok(records)
}

/// Load the search-index source from a CSV file.
pub fn load_search(path: &Path) -> Result<Vec<SearchIndexRecord>> {
    let records = parse_search(open(path)?, path)?;
    tracing::info!(source = %Source::Search, rows = records.len(), path = %path.display(), "loaded source");
    Ok(records)
}

/// Load the economic-indicator source from a CSV file.
pub fn load_economic(path: &Path) -> Result<Vec<EconomicRecord>> {
    let records = parse_economic(open(path)?, path)?;
    tracing::info!(source = %Source::Economic, rows = records.len(), path = %path.display(), "loaded source");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2024-01-15", Some(ymd(2024, 1, 15)))]
    #[case("2024/01/15", Some(ymd(2024, 1, 15)))]
    #[case("2024-01-15 13:45:00", Some(ymd(2024, 1, 15)))]
    #[case("2024-01-15T13:45:00", Some(ymd(2024, 1, 15)))]
    #[case(" 2024-01-15 ", Some(ymd(2024, 1, 15)))]
    #[case("15.01.2024", None)]
    #[case("2024-02-30", None)]
    #[case("", None)]
    fn test_parse_date(#[case] input: &str, #[case] expected: Option<NaiveDate>) {
        assert_eq!(parse_date(input), expected);
    }

    #[test]
    fn test_parse_sales() {
        let csv = "date,region,customer_segment,revenue\n\
                   2024-01-03,North,Retail,100.5\n\
                   2024-01-20,South,Corporate,\n";
        let records = parse_sales(csv.as_bytes(), Path::new("sales.csv")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], SalesRecord::new(ymd(2024, 1, 3), "North", "Retail", Some(100.5)));
        assert_eq!(records[1].revenue, None);
    }

    #[test]
    fn test_rows_without_key_are_skipped() {
        let csv = "date,region,customer_segment,revenue\n\
                   2024-01-03,North,Retail,100\n\
                   2024-01-04,,Retail,50\n\
                   2024-01-05,South,NA,70\n";
        let records = parse_sales(csv.as_bytes(), Path::new("sales.csv")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].region, "North");
    }

    #[test]
    fn test_skipped_rows_still_validate_dates() {
        let csv = "date,region,customer_segment,revenue\n\
                   not-a-date,,Retail,50\n";
        let err = parse_sales(csv.as_bytes(), Path::new("sales.csv")).unwrap_err();
        assert!(matches!(err, DataError::DateParse { .. }));
    }

    #[rstest]
    #[case("inf")]
    #[case("-inf")]
    #[case("infinity")]
    fn test_non_finite_number_is_invalid_value(#[case] value: &str) {
        let csv = format!("date,search_index\n2024-01-01,{value}\n");
        let err = parse_search(csv.as_bytes(), Path::new("search.csv")).unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { value: ref v, .. } if v == value));
    }

    #[test]
    fn test_columns_located_by_header() {
        let csv = "revenue,extra,customer_segment,region,date\n\
                   50,x,Retail,West,2024-03-09\n";
        let records = parse_sales(csv.as_bytes(), Path::new("sales.csv")).unwrap();
        assert_eq!(records[0].region, "West");
        assert_eq!(records[0].customer_segment, "Retail");
        assert_eq!(records[0].revenue, Some(50.0));
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let csv = "date,gdp_growth\n2024-01-01,1.0\n";
        let err = parse_economic(csv.as_bytes(), Path::new("eco.csv")).unwrap_err();
        match err {
            DataError::SchemaMismatch { column, .. } => assert_eq!(column, "inflation_rate"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date_reports_line() {
        let csv = "date,search_index\n2024-01-01,10\nnot-a-date,20\n";
        let err = parse_search(csv.as_bytes(), Path::new("search.csv")).unwrap_err();
        match err {
            DataError::DateParse { line, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_number_is_invalid_value() {
        let csv = "date,search_index\n2024-01-01,abc\n";
        let err = parse_search(csv.as_bytes(), Path::new("search.csv")).unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { ref column, .. } if column == "search_index"));
    }

    #[test]
    fn test_missing_tokens() {
        let csv = "date,gdp_growth,inflation_rate\n2024-01-01,NaN,NULL\n2024-02-01,NA,2.5\n";
        let records = parse_economic(csv.as_bytes(), Path::new("eco.csv")).unwrap();
        assert_eq!(records[0], EconomicRecord::new(ymd(2024, 1, 1), None, None));
        assert_eq!(records[1].inflation_rate, Some(2.5));
    }

    #[test]
    fn test_missing_file() {
        let err = load_sales(Path::new("/definitely/not/here/sales.csv")).unwrap_err();
        assert!(matches!(err, DataError::InputNotFound { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("google_trends.csv");
        std::fs::write(&path, "date,search_index\n2024-01-07,42\n").unwrap();
        let records = load_search(&path).unwrap();
        assert_eq!(records, vec![SearchIndexRecord::new(ymd(2024, 1, 7), Some(42.0))]);
    }
}
