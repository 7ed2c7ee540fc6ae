use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::error::ImportError;
use super::table::Table;

/// Column layout for one uploadable entity: header renames plus the canonical
/// columns that must be present once renaming is done.
#[derive(Debug)]
pub struct NormalizationProfile {
    pub entity: &'static str,
    pub renames: &'static [(&'static str, &'static str)],
    pub required: &'static [&'static str],
}

pub static PREDICT_PROFILE: NormalizationProfile = NormalizationProfile {
    entity: "predict",
    renames: &[
        ("Дата начала", "date"),
        ("Груз", "brand_name"),
        ("Вес по акту, тн", "weight"),
        ("Склад", "warehouse_name"),
        ("Штабель", "stack_number"),
    ],
    required: &[
        "date",
        "brand_name",
        "weight",
        "warehouse_name",
        "stack_number",
    ],
};

pub static SUPPLIES_PROFILE: NormalizationProfile = NormalizationProfile {
    entity: "supplies",
    renames: &[
        ("ВыгрузкаНаСклад", "warehouse_date"),
        ("Наим. ЕТСНГ", "brand_name"),
        ("Штабель", "stack_number"),
        ("ПогрузкаНаСудно", "ship_date"),
        ("На склад, тн", "warehouse_weight"),
        ("На судно, тн", "ship_weight"),
        ("Склад", "warehouse_name"),
    ],
    required: &[
        "warehouse_date",
        "warehouse_name",
        "stack_number",
        "brand_name",
        "warehouse_weight",
        "ship_date",
        "ship_weight",
    ],
};

pub static TEMPERATURE_PROFILE: NormalizationProfile = NormalizationProfile {
    entity: "temperature",
    renames: &[
        ("Склад", "warehouse_name"),
        ("Штабель", "stack_number"),
        ("Марка", "brand_name"),
        ("Максимальная температура", "max_temperature"),
        ("Пикет", "picket"),
        ("Дата акта", "act_date"),
        ("Смена", "shift"),
    ],
    required: &[
        "warehouse_name",
        "stack_number",
        "brand_name",
        "max_temperature",
        "picket",
        "act_date",
        "shift",
    ],
};

pub static BRAND_LIST_PROFILE: NormalizationProfile = NormalizationProfile {
    entity: "brand",
    renames: &[],
    required: &["brand"],
};

pub static STACK_LIST_PROFILE: NormalizationProfile = NormalizationProfile {
    entity: "stack",
    renames: &[],
    required: &["stack", "warehouse_name"],
};

impl NormalizationProfile {
    /// Canonical name for a source header. Unmapped headers pass through unchanged.
    pub fn canonical<'h>(&self, header: &'h str) -> &'h str {
        self.renames
            .iter()
            .find(|(source, _)| *source == header)
            .map(|(_, canonical)| *canonical)
            .unwrap_or(header)
    }

    /// Renames the table's headers and checks every required column is present.
    pub fn apply<'t>(&'static self, table: &'t Table) -> Result<NormalizedTable<'t>, ImportError> {
        let mut columns = HashMap::new();
        for (index, header) in table.headers().iter().enumerate() {
            columns
                .entry(self.canonical(header).to_owned())
                .or_insert(index);
        }

        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|field| !columns.contains_key(**field))
            .map(|field| (*field).to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        Ok(NormalizedTable {
            profile: self,
            table,
            columns,
        })
    }
}

/// A table whose columns have been mapped onto canonical field names.
#[derive(Debug)]
pub struct NormalizedTable<'t> {
    profile: &'static NormalizationProfile,
    table: &'t Table,
    columns: HashMap<String, usize>,
}

impl<'t> NormalizedTable<'t> {
    pub fn profile(&self) -> &'static NormalizationProfile {
        self.profile
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.table
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| RowView {
                number: index + 1,
                record,
                columns: &self.columns,
            })
    }
}

/// Typed access to one data row by canonical column name.
///
/// Row numbers count data rows from 1; the header is not counted.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    number: usize,
    record: &'a StringRecord,
    columns: &'a HashMap<String, usize>,
}

impl<'a> RowView<'a> {
    pub fn number(&self) -> usize {
        self.number
    }

    /// Raw cell text. Columns past the end of a short row read as blank.
    pub fn cell(&self, column: &str) -> &'a str {
        self.columns
            .get(column)
            .and_then(|index| self.record.get(*index))
            .unwrap_or("")
    }

    /// Cell text used verbatim, with no trimming or case folding. Missing
    /// cells read as the empty string.
    pub fn text(&self, column: &str) -> String {
        self.cell(column).to_owned()
    }

    pub fn date(&self, column: &'static str) -> Result<NaiveDate, ImportError> {
        let raw = self.cell(column);
        parse_date(raw).ok_or_else(|| self.invalid(column, raw, "a date"))
    }

    pub fn optional_date(&self, column: &'static str) -> Result<Option<NaiveDate>, ImportError> {
        let raw = self.cell(column);
        if raw.trim().is_empty() {
            return Ok(None);
        }
        parse_date(raw)
            .map(Some)
            .ok_or_else(|| self.invalid(column, raw, "a date"))
    }

    /// Floating value; blank and non-finite cells become null.
    pub fn float(&self, column: &'static str) -> Result<Option<f64>, ImportError> {
        let raw = self.cell(column);
        parse_float(raw)
            .map(finite)
            .ok_or_else(|| self.invalid(column, raw, "a number"))
    }

    /// Fixed-point value for a `NUMERIC(precision, scale)` column, read through
    /// a float and rounded to `scale` places. Finite values the column cannot
    /// hold are rejected.
    pub fn decimal(
        &self,
        column: &'static str,
        precision: u32,
        scale: u32,
    ) -> Result<Option<Decimal>, ImportError> {
        let raw = self.cell(column);
        let Some(value) = self.float(column)? else {
            return Ok(None);
        };
        Decimal::from_f64(value)
            .map(|value| value.round_dp(scale))
            .filter(|value| fits_column(*value, precision, scale))
            .map(Some)
            .ok_or_else(|| self.invalid(column, raw, "a number within the column range"))
    }

    /// Whole number; blank and NaN cells become null, fractional values are rejected.
    pub fn optional_int(&self, column: &'static str) -> Result<Option<i32>, ImportError> {
        let raw = self.cell(column);
        parse_int(raw).ok_or_else(|| self.invalid(column, raw, "a whole number"))
    }

    fn invalid(&self, column: &'static str, raw: &str, expected: &'static str) -> ImportError {
        ImportError::InvalidCell {
            row: self.number,
            column,
            value: raw.to_owned(),
            expected,
        }
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Calendar date from the spreadsheet export formats; any time of day is dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    // Fractional seconds are ignored
    let raw = match raw.split_once('.') {
        Some((head, tail))
            if head.contains(':') && tail.chars().all(|c| c.is_ascii_digit()) =>
        {
            head
        }
        _ => raw,
    };
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|datetime| datetime.date())
        })
}

/// `None` for text that is not a number. Blank parses as NaN.
pub fn parse_float(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}

/// Whether the integer part has at most `precision - scale` digits.
fn fits_column(value: Decimal, precision: u32, scale: u32) -> bool {
    let bound = 10i64
        .checked_pow(precision.saturating_sub(scale))
        .map(Decimal::from)
        .unwrap_or(Decimal::MAX);
    value.abs() < bound
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Outer `None` is a rejected cell, inner `None` is a null value.
pub fn parse_int(raw: &str) -> Option<Option<i32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(None);
    }
    if let Ok(value) = raw.parse::<i32>() {
        return Some(Some(value));
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_nan() {
        return Some(None);
    }
    let whole = value.is_finite()
        && value.fract() == 0.0
        && value >= f64::from(i32::MIN)
        && value <= f64::from(i32::MAX);
    whole.then_some(Some(value as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("2024-05-01", Some((2024, 5, 1)))]
    #[case(" 2024-05-01 ", Some((2024, 5, 1)))]
    #[case("01.05.2024", Some((2024, 5, 1)))]
    #[case("2024/05/01", Some((2024, 5, 1)))]
    #[case("2024-05-01 13:45", Some((2024, 5, 1)))]
    #[case("2024-05-01 13:45:10", Some((2024, 5, 1)))]
    #[case("2024-05-01T23:59:59", Some((2024, 5, 1)))]
    #[case("2024-05-01 23:59:59.250", Some((2024, 5, 1)))]
    #[case("01.05.2024 08:00", Some((2024, 5, 1)))]
    #[case("2024-02-30", None)]
    #[case("yesterday", None)]
    #[case("", None)]
    fn dates(#[case] raw: &str, #[case] expected: Option<(i32, u32, u32)>) {
        let expected = expected.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        assert_eq!(parse_date(raw), expected);
    }

    #[rstest]
    #[case("1234.5", Some(Some(1234.5)))]
    #[case(" 12 ", Some(Some(12.0)))]
    #[case("-3e2", Some(Some(-300.0)))]
    #[case("", Some(None))]
    #[case("NaN", Some(None))]
    #[case("inf", Some(None))]
    #[case("-infinity", Some(None))]
    #[case("12,5", None)]
    #[case("heavy", None)]
    fn floats(#[case] raw: &str, #[case] expected: Option<Option<f64>>) {
        assert_eq!(parse_float(raw).map(finite), expected);
    }

    #[rstest]
    #[case("2", Some(Some(2)))]
    #[case("2.0", Some(Some(2)))]
    #[case("", Some(None))]
    #[case("nan", Some(None))]
    #[case("2.5", None)]
    #[case("night", None)]
    #[case("1e12", None)]
    fn shifts(#[case] raw: &str, #[case] expected: Option<Option<i32>>) {
        assert_eq!(parse_int(raw), expected);
    }

    /// Outer `None` means the cell was rejected.
    fn weight_cell(raw: &str, precision: u32, scale: u32) -> Option<Option<Decimal>> {
        let csv = format!(
            "date,brand_name,weight,warehouse_name,stack_number\n\
             2024-01-01,A,{raw},W,1\n"
        );
        let table = Table::parse(csv.as_bytes()).unwrap();
        let normalized = PREDICT_PROFILE.apply(&table).unwrap();
        let row = normalized.rows().next().unwrap();
        match row.decimal("weight", precision, scale) {
            Ok(value) => Some(value),
            Err(err) => {
                assert_matches!(err, ImportError::InvalidCell { row: 1, column: "weight", .. });
                None
            }
        }
    }

    #[rstest]
    #[case("1234.56789", 15, 4, Some(Some(dec!(1234.5679))))]
    #[case("99999999999.9999", 15, 4, Some(Some(dec!(99999999999.9999))))]
    #[case("-12.5", 15, 4, Some(Some(dec!(-12.5))))]
    #[case("", 15, 4, Some(None))]
    #[case("NaN", 15, 4, Some(None))]
    #[case("-inf", 15, 4, Some(None))]
    #[case("1e12", 15, 4, None)]
    #[case("1e30", 15, 4, None)]
    #[case("-1e30", 15, 4, None)]
    #[case("999.99", 5, 2, Some(Some(dec!(999.99))))]
    #[case("999.996", 5, 2, None)]
    #[case("1000", 5, 2, None)]
    #[case("1e12", 5, 2, None)]
    fn decimals_respect_column_range(
        #[case] raw: &str,
        #[case] precision: u32,
        #[case] scale: u32,
        #[case] expected: Option<Option<Decimal>>,
    ) {
        assert_eq!(weight_cell(raw, precision, scale), expected);
    }

    #[test]
    fn renames_are_exact() {
        assert_eq!(SUPPLIES_PROFILE.canonical("На судно, тн"), "ship_weight");
        assert_eq!(SUPPLIES_PROFILE.canonical("на судно, тн"), "на судно, тн");
        assert_eq!(SUPPLIES_PROFILE.canonical("ship_weight"), "ship_weight");
    }

    #[test]
    fn canonical_headers_satisfy_profile() {
        let table = Table::parse(b"date,brand_name,weight,warehouse_name,stack_number\n").unwrap();
        assert!(PREDICT_PROFILE.apply(&table).is_ok());
    }

    #[test]
    fn reports_every_missing_column() {
        let table = Table::parse("Склад,Штабель,Марка,Дата акта\n".as_bytes()).unwrap();
        let err = TEMPERATURE_PROFILE.apply(&table).unwrap_err();
        assert_matches!(err, ImportError::MissingColumns(missing) => {
            assert_eq!(missing, vec!["max_temperature", "picket", "shift"]);
        });
    }

    #[test]
    fn row_accessors_coerce_cells() {
        let table = Table::parse(
            "Склад,Штабель,Марка,Максимальная температура,Пикет,Дата акта,Смена\n\
             W1,5,A-1,41.256,,02.03.2024,\n"
                .as_bytes(),
        )
        .unwrap();
        let normalized = TEMPERATURE_PROFILE.apply(&table).unwrap();
        let row = normalized.rows().next().unwrap();

        assert_eq!(row.number(), 1);
        assert_eq!(row.text("warehouse_name"), "W1");
        assert_eq!(row.decimal("max_temperature", 5, 2).unwrap(), Some(dec!(41.26)));
        assert_eq!(row.text("picket"), "");
        assert_eq!(row.optional_int("shift").unwrap(), None);
        assert_eq!(
            row.date("act_date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn short_rows_read_as_blank() {
        let table = Table::parse(b"stack,warehouse_name\n7\n").unwrap();
        let normalized = STACK_LIST_PROFILE.apply(&table).unwrap();
        let row = normalized.rows().next().unwrap();
        assert_eq!(row.cell("warehouse_name"), "");
    }

    #[test]
    fn bad_cells_name_row_and_column() {
        let table = Table::parse(
            b"date,brand_name,weight,warehouse_name,stack_number\n\
              2024-01-01,A,0.5,W,1\n\
              2024-01-02,A,high,W,1\n",
        )
        .unwrap();
        let normalized = PREDICT_PROFILE.apply(&table).unwrap();
        let err = normalized
            .rows()
            .map(|row| row.float("weight"))
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert_matches!(err, ImportError::InvalidCell { row: 2, column: "weight", .. });
    }

    proptest! {
        #[test]
        fn finite_floats_round_to_requested_scale(value in -1.0e9f64..1.0e9f64) {
            let rendered = format!("{value}");
            let parsed = parse_float(&rendered).and_then(finite).unwrap();
            let decimal = Decimal::from_f64(parsed).unwrap().round_dp(4);
            prop_assert!(decimal.scale() <= 4);
        }

        #[test]
        fn iso_dates_parse(y in 1900i32..2100, m in 1u32..=12, d in 1u32..=28) {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            prop_assert_eq!(parse_date(&date.format("%Y-%m-%d").to_string()), Some(date));
            prop_assert_eq!(parse_date(&date.format("%d.%m.%Y").to_string()), Some(date));
        }
    }
}
