use crate::domain::entities::report::ReportValue;
use crate::infrastructure::db::database::{DatabaseError, ResultSet};
use crate::infrastructure::db::postgres::numeric::NumericText;
use serde_json::Value;
use sqlx::postgres::{PgColumn, PgHasArrayType, PgRow};
use sqlx::{Column, Decode, Postgres, Row, Type, TypeInfo, ValueRef};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Convert fetched rows into a [`ResultSet`].
///
/// Column names are taken from the first row; every row of one call shares
/// them. An empty row set yields no columns.
pub(crate) fn decode_rows(rows: &[PgRow]) -> Result<ResultSet, DatabaseError> {
    let Some(first) = rows.first() else {
        return Ok(ResultSet::default());
    };

    let columns = first
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect::<Vec<_>>();

    let rows = rows
        .iter()
        .map(decode_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResultSet { columns, rows })
}

fn decode_row(row: &PgRow) -> Result<Vec<ReportValue>, DatabaseError> {
    (0..row.len()).map(|index| decode_value(row, index)).collect()
}

fn decode_value(row: &PgRow, index: usize) -> Result<ReportValue, DatabaseError> {
    let column = &row.columns()[index];
    let raw = row.try_get_raw(index).map_err(|e| conversion(column, e))?;
    if raw.is_null() {
        return Ok(ReportValue::Null);
    }

    let value = match column.type_info().name() {
        "BOOL" => ReportValue::Bool(get(row, column)?),
        "INT2" => ReportValue::Int(i64::from(get::<i16>(row, column)?)),
        "INT4" => ReportValue::Int(i64::from(get::<i32>(row, column)?)),
        "INT8" => ReportValue::Int(get(row, column)?),
        "FLOAT4" => ReportValue::Float(f64::from(get::<f32>(row, column)?)),
        "FLOAT8" => ReportValue::Float(get(row, column)?),
        "NUMERIC" => ReportValue::Numeric(get::<NumericText>(row, column)?.0),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => ReportValue::Text(get(row, column)?),
        "DATE" => ReportValue::Text(get::<Date>(row, column)?.to_string()),
        "TIME" => {
            let value = format_time(get(row, column)?).map_err(|e| conversion(column, e))?;
            ReportValue::Text(value)
        }
        "TIMESTAMP" => {
            let value = format_timestamp(get(row, column)?).map_err(|e| conversion(column, e))?;
            ReportValue::Text(value)
        }
        "TIMESTAMPTZ" => {
            let value = get::<OffsetDateTime>(row, column)?;
            ReportValue::Text(value.format(&Rfc3339).map_err(|e| conversion(column, e))?)
        }
        "UUID" => ReportValue::Text(get::<uuid::Uuid>(row, column)?.to_string()),
        "JSON" | "JSONB" => ReportValue::Json(get(row, column)?),
        "BOOL[]" => array::<bool>(row, column, |v| Ok(Value::from(v)))?,
        "INT2[]" => array::<i16>(row, column, |v| Ok(Value::from(v)))?,
        "INT4[]" => array::<i32>(row, column, |v| Ok(Value::from(v)))?,
        "INT8[]" => array::<i64>(row, column, |v| Ok(Value::from(v)))?,
        "FLOAT4[]" => array::<f32>(row, column, |v| Ok(Value::from(f64::from(v))))?,
        "FLOAT8[]" => array::<f64>(row, column, |v| Ok(Value::from(v)))?,
        "NUMERIC[]" => array::<NumericText>(row, column, |v| Ok(Value::String(v.0)))?,
        "TEXT[]" | "VARCHAR[]" | "BPCHAR[]" | "NAME[]" => {
            array::<String>(row, column, |v| Ok(Value::String(v)))?
        }
        "DATE[]" => array::<Date>(row, column, |v| Ok(Value::String(v.to_string())))?,
        "TIMESTAMPTZ[]" => array::<OffsetDateTime>(row, column, |v| {
            v.format(&Rfc3339)
                .map(Value::String)
                .map_err(|e| conversion(column, e))
        })?,
        "UUID[]" => array::<uuid::Uuid>(row, column, |v| Ok(Value::String(v.to_string())))?,
        other => {
            return Err(DatabaseError::Conversion(format!(
                "column '{}' has unsupported type {other}",
                column.name()
            )));
        }
    };

    Ok(value)
}

fn get<'r, T>(row: &'r PgRow, column: &PgColumn) -> Result<T, DatabaseError>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get::<T, _>(column.ordinal())
        .map_err(|e| conversion(column, e))
}

/// Decode a one-dimensional array into a JSON list. SQL `NULL` elements
/// become JSON `null`.
fn array<T>(
    row: &PgRow,
    column: &PgColumn,
    render: impl Fn(T) -> Result<Value, DatabaseError>,
) -> Result<ReportValue, DatabaseError>
where
    T: for<'r> Decode<'r, Postgres> + Type<Postgres> + PgHasArrayType,
{
    let items = get::<Vec<Option<T>>>(row, column)?
        .into_iter()
        .map(|item| item.map_or(Ok(Value::Null), &render))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReportValue::Json(Value::Array(items)))
}

fn format_time(value: Time) -> Result<String, time::error::Format> {
    if value.nanosecond() == 0 {
        value.format(format_description!("[hour]:[minute]:[second]"))
    } else {
        value.format(format_description!("[hour]:[minute]:[second].[subsecond]"))
    }
}

fn format_timestamp(value: PrimitiveDateTime) -> Result<String, time::error::Format> {
    if value.nanosecond() == 0 {
        value.format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]"
        ))
    } else {
        value.format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"
        ))
    }
}

fn conversion(column: &PgColumn, err: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::Conversion(format!("column '{}': {err}", column.name()))
}

#[cfg(test)]
mod tests {
    use super::{format_time, format_timestamp};
    use time::macros::{date, datetime, time};

    #[test]
    fn given_whole_second_time_when_formatted_should_omit_fraction() {
        assert_eq!(format_time(time!(9:05:07)).unwrap(), "09:05:07");
    }

    #[test]
    fn given_fractional_time_when_formatted_should_keep_significant_digits() {
        assert_eq!(format_time(time!(9:05:07.25)).unwrap(), "09:05:07.25");
    }

    #[test]
    fn given_timestamp_when_formatted_should_use_iso_separator() {
        assert_eq!(
            format_timestamp(datetime!(2024-01-31 23:59:00)).unwrap(),
            "2024-01-31T23:59:00"
        );
    }

    #[test]
    fn given_date_when_displayed_should_be_iso() {
        assert_eq!(date!(2024 - 01 - 02).to_string(), "2024-01-02");
    }
}
