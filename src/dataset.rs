//! Tab-delimited input parsing into an in-memory table.
//!
//! The loader mirrors the behaviour users expect from dataframe libraries: the first row names
//! the columns, every column gets a single inferred type, and the usual "not available" markers
//! are read as missing values.  Numeric columns are the only ones the analysis looks at.

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::Path;

use log::{debug, info};

use crate::error::{ParseFailure, ReportError};

/// Field delimiter of the input format.
pub const DELIMITER: u8 = b'\t';

/// Field values treated as missing data.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Type inferred for a whole column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    /// Every value is an integer and none is missing.
    Integer,
    /// Every present value is a number; missing values are allowed.
    Float,
    /// At least one value is not a number.
    Text,
}

impl ColumnType {
    /// Returns whether the column holds numbers.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// A single value of the table, stored in the representation of its column type.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Missing,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Returns the numeric value of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Missing | Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("nan"),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) => f.write_str(&format_float(*value)),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Formats a float in its shortest round-trip form, keeping a trailing `.0` for integral values.
///
/// Magnitudes below `1e-4` or from `1e16` up switch to exponent notation with a signed exponent
/// of at least two digits (`1e+16`, `1.5e-08`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}inf", sign);
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }

    let formatted = value.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        formatted + ".0"
    }
}

/// Name and inferred type of a column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
}

impl Column {
    /// Returns the column name as it appears in the header row.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the inferred column type.
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }
}

/// Ordered rows sharing one fixed set of columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Loads the tab-delimited file at `path`.
    ///
    /// The file must exist and be non-empty before it is parsed.  A dataset without data rows is
    /// returned as-is; see [`validate`] for that check.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ReportError::FileNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(err) => return Err(ParseFailure::Io(err).into()),
        };

        if metadata.len() == 0 {
            return Err(ReportError::EmptyInput {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(ParseFailure::Io)?;
        let dataset = Self::from_reader(file)?;
        info!(
            "Loaded {} rows x {} columns from {}",
            dataset.len(),
            dataset.columns.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parses tab-delimited content with a header row from `reader`.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, ReportError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers().map_err(ParseFailure::Csv)?.clone();
        if headers.is_empty() {
            return Err(ReportError::MalformedInput);
        }
        let names = column_names(headers.iter());
        let width = names.len();

        let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
        for result in reader.records() {
            let record = result.map_err(ParseFailure::Csv)?;
            if record.len() > width {
                return Err(ParseFailure::TooManyFields {
                    line: record.position().map(|pos| pos.line()).unwrap_or_default(),
                    expected: width,
                    found: record.len(),
                }
                .into());
            }

            let mut row: Vec<Option<String>> = record.iter().map(present_value).collect();
            row.resize(width, None);
            raw_rows.push(row);
        }

        let mut columns = Vec::with_capacity(width);
        for (index, name) in names.into_iter().enumerate() {
            let column_type = infer_column_type(raw_rows.iter().map(|row| row[index].as_deref()));
            debug!("Column '{}' inferred as {:?}", name, column_type);
            columns.push(Column { name, column_type });
        }

        let rows = raw_rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&columns)
                    .map(|(value, column)| typed_cell(value, column.column_type))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Returns the columns in file order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns all rows in file order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Returns up to the first `count` rows.
    pub fn head(&self, count: usize) -> &[Vec<Cell>] {
        &self.rows[..count.min(self.rows.len())]
    }

    /// Iterates over the cells of one column.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Returns the number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the dataset has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a printable preview of the first `rows` rows.
    pub fn preview(&self, rows: usize) -> Preview<'_> {
        Preview {
            dataset: self,
            rows,
        }
    }
}

/// Rejects a dataset that parsed successfully but contains no data rows.
pub fn validate(dataset: &Dataset) -> Result<(), ReportError> {
    if dataset.is_empty() {
        return Err(ReportError::EmptyDataset);
    }
    Ok(())
}

/// Plain-text table of the leading rows, prefixed with a row index column.
pub struct Preview<'a> {
    dataset: &'a Dataset,
    rows: usize,
}

impl fmt::Display for Preview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<Vec<String>> = self
            .dataset
            .head(self.rows)
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let index_width = rows.len().saturating_sub(1).to_string().len();
        let widths: Vec<usize> = self
            .dataset
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                rows.iter()
                    .map(|row| row[index].chars().count())
                    .chain(std::iter::once(column.name.chars().count()))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (column, width) in self.dataset.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", column.name, width = *width)?;
        }

        for (index, row) in rows.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{:<index_width$}", index)?;
            for (value, width) in row.iter().zip(&widths) {
                write!(f, "  {:>width$}", value, width = *width)?;
            }
        }

        Ok(())
    }
}

fn column_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .enumerate()
        .map(|(index, header)| {
            let base = if header.is_empty() {
                format!("Unnamed: {}", index)
            } else {
                header.to_owned()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

fn present_value(field: &str) -> Option<String> {
    if MISSING_MARKERS.contains(&field) {
        None
    } else {
        Some(field.to_owned())
    }
}

fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}

fn infer_column_type<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ColumnType {
    let mut present = 0usize;
    let mut missing = false;
    let mut integral = true;

    for value in values {
        match value {
            None => missing = true,
            Some(value) if parse_integer(value).is_some() => present += 1,
            Some(value) if parse_float(value).is_some() => {
                present += 1;
                integral = false;
            }
            Some(_) => return ColumnType::Text,
        }
    }

    match (present, missing) {
        (0, false) => ColumnType::Text,
        (_, false) if integral => ColumnType::Integer,
        _ => ColumnType::Float,
    }
}

fn typed_cell(value: Option<String>, column_type: ColumnType) -> Cell {
    let Some(value) = value else {
        return Cell::Missing;
    };

    match column_type {
        ColumnType::Integer => parse_integer(&value).map_or(Cell::Missing, Cell::Integer),
        ColumnType::Float => parse_float(&value).map_or(Cell::Missing, Cell::Float),
        ColumnType::Text => Cell::Text(value),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_float, validate, Cell, ColumnType, Dataset};
    use crate::error::{ParseFailure, ReportError};

    fn parse(input: &str) -> Result<Dataset, ReportError> {
        Dataset::from_reader(input.as_bytes())
    }

    #[test]
    fn infers_column_types() {
        let dataset = parse("name\tage\tscore\nAda\t36\t1.5\nAlan\t41\t2\n").unwrap();
        let types: Vec<_> = dataset.columns().iter().map(|c| c.column_type()).collect();

        assert_eq!(
            types,
            [ColumnType::Text, ColumnType::Integer, ColumnType::Float]
        );
        assert_eq!(dataset.rows()[1][2], Cell::Float(2.0));
    }

    #[test]
    fn missing_values_turn_integer_columns_into_floats() {
        let dataset = parse("id\tsalary\n1\t100\n2\tNA\n3\t\n").unwrap();

        assert_eq!(dataset.columns()[1].column_type(), ColumnType::Float);
        assert_eq!(dataset.rows()[0][1], Cell::Float(100.0));
        assert_eq!(dataset.rows()[1][1], Cell::Missing);
        assert_eq!(dataset.rows()[0][1].to_string(), "100.0");
        assert_eq!(dataset.rows()[2][1].to_string(), "nan");
    }

    #[test]
    fn short_rows_are_padded_with_missing_values() {
        let dataset = parse("a\tb\tc\n1\tx\n").unwrap();

        assert_eq!(dataset.rows()[0].len(), 3);
        assert_eq!(dataset.rows()[0][2], Cell::Missing);
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = parse("a\tb\n1\t2\t3\n").unwrap_err();

        assert!(matches!(
            err,
            ReportError::Parse(ParseFailure::TooManyFields {
                expected: 2,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn blank_content_has_no_headers() {
        assert!(matches!(parse("\n\n"), Err(ReportError::MalformedInput)));
    }

    #[test]
    fn duplicate_and_empty_headers_are_renamed() {
        let dataset = parse("Name\tName\t\tName\nx\ty\tz\tw\n").unwrap();
        let names: Vec<_> = dataset.columns().iter().map(|c| c.name()).collect();

        assert_eq!(names, ["Name", "Name.1", "Unnamed: 2", "Name.2"]);
    }

    #[test]
    fn header_only_input_fails_validation() {
        let dataset = parse("Name\tDepartment\tSalary\n").unwrap();

        assert!(dataset.is_empty());
        assert!(matches!(validate(&dataset), Err(ReportError::EmptyDataset)));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = Dataset::from_reader(&b"name\n\xff\xfe\n"[..]).unwrap_err();

        assert!(matches!(err, ReportError::Parse(ParseFailure::Csv(_))));
    }

    #[test]
    fn floats_keep_a_decimal_point() {
        assert_eq!(format_float(45000.0), "45000.0");
        assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(1e15), "1000000000000000.0");
    }

    #[test]
    fn extreme_floats_use_signed_two_digit_exponents() {
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1e-7), "1e-07");
        assert_eq!(format_float(1.5e-8), "1.5e-08");
        assert_eq!(format_float(-2.5e20), "-2.5e+20");
        assert_eq!(format_float(1.2345e-100), "1.2345e-100");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn preview_right_aligns_columns() {
        let dataset = parse("Name\tSalary\nAlice\t50000\nBo\t4\n").unwrap();
        let preview = dataset.preview(5).to_string();

        assert_eq!(
            preview,
            "    Name  Salary\n0  Alice   50000\n1     Bo       4"
        );
    }

    #[test]
    fn head_is_bounded_by_row_count() {
        let dataset = parse("a\n1\n2\n").unwrap();

        assert_eq!(dataset.head(5).len(), 2);
        assert_eq!(dataset.head(1).len(), 1);
    }
}
