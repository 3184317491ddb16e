//! Result values, rows and statement outcomes.
//!
//! The driver hands back `mysql::Value` cells whose shape depends on the
//! protocol: text results are always bytes, binary (prepared) results are
//! typed. `Value::from_driver` normalises both against the column metadata so
//! callers see one representation regardless of how the statement ran.

use indexmap::IndexMap;
use mysql::Column;
use mysql::consts::{ColumnFlags, ColumnType};
use serde::{Serialize, Serializer};

/// A single result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

/// Result row keyed by column name, in column order.
pub type AssocRow = IndexMap<String, Value>;

/// Result row as positional values, in column order.
pub type NumericRow = Vec<Value>;

/// Result of a plain statement that may or may not return rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<R> {
    /// The statement returned a result set (possibly empty).
    Rows(Vec<R>),
    /// The statement succeeded without returning a result set.
    Executed,
}

impl<R> Fetch<R> {
    /// Rows of the result set; empty when the statement returned none.
    pub fn into_rows(self) -> Vec<R> {
        match self {
            Fetch::Rows(rows) => rows,
            Fetch::Executed => Vec::new(),
        }
    }

    pub fn is_executed(&self) -> bool {
        matches!(self, Fetch::Executed)
    }
}

/// Result of a statement run for its effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Produced a result set or affected at least one row.
    Applied,
    /// Executed but affected no rows.
    NoEffect,
}

impl Outcome {
    pub(crate) fn from_affected(affected_rows: u64) -> Self {
        if affected_rows > 0 {
            Outcome::Applied
        } else {
            Outcome::NoEffect
        }
    }

    pub fn applied(self) -> bool {
        self == Outcome::Applied
    }
}

impl From<Outcome> for bool {
    fn from(outcome: Outcome) -> Self {
        outcome.applied()
    }
}

impl Value {
    /// Normalise a driver value using its column's type and flags.
    pub(crate) fn from_driver(value: mysql::Value, column: &Column) -> Self {
        let column_type = column.column_type();
        let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);

        match value {
            mysql::Value::NULL => Value::Null,
            mysql::Value::Int(i) => Value::Int(i),
            mysql::Value::UInt(u) => Value::UInt(u),
            mysql::Value::Float(f) => Value::Float(widen_float(f)),
            mysql::Value::Double(d) => Value::Float(d),
            mysql::Value::Bytes(bytes) => Self::from_text(bytes, column_type, unsigned),
            mysql::Value::Date(year, month, day, hour, minute, second, micros) => {
                let date = format!("{:04}-{:02}-{:02}", year, month, day);
                if column_type == ColumnType::MYSQL_TYPE_DATE {
                    Value::Str(date)
                } else {
                    let time = format!("{:02}:{:02}:{:02}", hour, minute, second);
                    Value::Str(format!("{} {}{}", date, time, fraction(micros)))
                }
            }
            mysql::Value::Time(negative, days, hours, minutes, seconds, micros) => {
                let sign = if negative { "-" } else { "" };
                let hours = u64::from(days) * 24 + u64::from(hours);
                Value::Str(format!(
                    "{}{:02}:{:02}:{:02}{}",
                    sign,
                    hours,
                    minutes,
                    seconds,
                    fraction(micros)
                ))
            }
        }
    }

    /// Text-protocol cells arrive as bytes; parse the numeric column types.
    fn from_text(bytes: Vec<u8>, column_type: ColumnType, unsigned: bool) -> Self {
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => return Value::Bytes(e.into_bytes()),
        };

        if is_integer_type(column_type) {
            let parsed = if unsigned {
                text.parse::<u64>().ok().map(Value::UInt)
            } else {
                text.parse::<i64>().ok().map(Value::Int)
            };
            return parsed.unwrap_or(Value::Str(text));
        }

        if is_float_type(column_type) {
            return text.parse::<f64>().map(Value::Float).unwrap_or(Value::Str(text));
        }

        Value::Str(text)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render the value as plain text for table output.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::Bytes(b) => format!("0x{}", hex::encode(b)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_str(&hex::encode(b)),
        }
    }
}

/// Widen through the shortest `f32` text so a FLOAT cell matches what the
/// text protocol sends for the same column.
fn widen_float(f: f32) -> f64 {
    f.to_string().parse().unwrap_or(f64::from(f))
}

fn fraction(micros: u32) -> String {
    if micros == 0 {
        String::new()
    } else {
        format!(".{:06}", micros)
    }
}

fn is_integer_type(column_type: ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::MYSQL_TYPE_TINY
            | ColumnType::MYSQL_TYPE_SHORT
            | ColumnType::MYSQL_TYPE_INT24
            | ColumnType::MYSQL_TYPE_LONG
            | ColumnType::MYSQL_TYPE_LONGLONG
            | ColumnType::MYSQL_TYPE_YEAR
    )
}

fn is_float_type(column_type: ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE
    )
}

/// Convert one driver row into positional values.
pub(crate) fn numeric_row(row: mysql::Row) -> NumericRow {
    let columns = row.columns();
    row.unwrap()
        .into_iter()
        .zip(columns.iter())
        .map(|(value, column)| Value::from_driver(value, column))
        .collect()
}

/// Convert one driver row into a column-name keyed map.
///
/// A repeated column name keeps its first position and the last value.
pub(crate) fn assoc_row(row: mysql::Row) -> AssocRow {
    let columns = row.columns();
    row.unwrap()
        .into_iter()
        .zip(columns.iter())
        .map(|(value, column)| {
            (
                column.name_str().into_owned(),
                Value::from_driver(value, column),
            )
        })
        .collect()
}
