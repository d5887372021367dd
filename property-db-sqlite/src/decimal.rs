//! Moving fixed-point values in and out of SQLite.
//!
//! SQLite has no decimal type: a `NUMERIC(11,2)` column stores `2500` as an
//! INTEGER and `6.5` as a REAL. Reads accept either and round back to the
//! column scale; writes round first and bind an `f64`.

use property_core::RepositoryError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

/// Scale of the money columns.
pub const MONEY_SCALE: u32 = 2;

/// Scale of the percent columns.
pub const PERCENT_SCALE: u32 = 2;

fn to_scale(
    value: Decimal,
    scale: u32,
) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Reads a NOT NULL numeric column.
pub fn get_decimal(
    row: &SqliteRow,
    column: &str,
    scale: u32,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{column}' not found: {e}")))?;

    if value_ref.is_null() {
        return Err(RepositoryError::Database(format!(
            "Column '{column}' is NULL"
        )));
    }

    let type_name = value_ref.type_info().name().to_string();

    let value = match type_name.as_str() {
        "INTEGER" => {
            let raw: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to read INTEGER '{column}': {e}"))
            })?;
            Decimal::from(raw)
        }
        "REAL" => {
            let raw: f64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to read REAL '{column}': {e}"))
            })?;
            Decimal::try_from(raw).map_err(|e| {
                RepositoryError::Database(format!("'{column}' value {raw} is not a decimal: {e}"))
            })?
        }
        other => {
            return Err(RepositoryError::Database(format!(
                "Unexpected type '{other}' for column '{column}'"
            )));
        }
    };

    Ok(to_scale(value, scale))
}

/// Reads a nullable numeric column.
pub fn get_optional_decimal(
    row: &SqliteRow,
    column: &str,
    scale: u32,
) -> Result<Option<Decimal>, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{column}' not found: {e}")))?;

    if value_ref.is_null() {
        return Ok(None);
    }

    get_decimal(row, column, scale).map(Some)
}

/// Rounds to the column scale and converts for binding.
pub fn to_column(
    value: Decimal,
    scale: u32,
) -> f64 {
    to_scale(value, scale).to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        sqlx::query(
            "CREATE TABLE amounts (
                id INTEGER PRIMARY KEY,
                money NUMERIC(11, 2),
                label TEXT
            )",
        )
        .execute(&pool)
        .await
        .expect("Failed to create test table");

        pool
    }

    async fn fetch(
        pool: &SqlitePool,
        insert: &str,
    ) -> SqliteRow {
        sqlx::query(insert)
            .execute(pool)
            .await
            .expect("Failed to insert test data");

        sqlx::query("SELECT money, label FROM amounts WHERE id = 1")
            .fetch_one(pool)
            .await
            .expect("Failed to fetch row")
    }

    // =========================================================================
    // get_decimal
    // =========================================================================

    #[tokio::test]
    async fn whole_amounts_are_stored_as_integer() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO amounts (id, money) VALUES (1, 2500.0)").await;

        assert_eq!(get_decimal(&row, "money", MONEY_SCALE), Ok(dec!(2500)));
    }

    #[tokio::test]
    async fn fractional_amounts_are_read_from_real() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO amounts (id, money) VALUES (1, 6.5)").await;

        assert_eq!(get_decimal(&row, "money", PERCENT_SCALE), Ok(dec!(6.50)));
    }

    #[tokio::test]
    async fn reads_round_to_the_column_scale() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO amounts (id, money) VALUES (1, 1234.565)").await;

        assert_eq!(get_decimal(&row, "money", MONEY_SCALE), Ok(dec!(1234.57)));
    }

    #[tokio::test]
    async fn negative_amounts_survive() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO amounts (id, money) VALUES (1, -456.78)").await;

        assert_eq!(get_decimal(&row, "money", MONEY_SCALE), Ok(dec!(-456.78)));
    }

    #[tokio::test]
    async fn null_is_an_error_for_required_columns() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO amounts (id) VALUES (1)").await;

        assert_eq!(
            get_decimal(&row, "money", MONEY_SCALE),
            Err(RepositoryError::Database("Column 'money' is NULL".to_string()))
        );
    }

    #[tokio::test]
    async fn text_is_rejected() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO amounts (id, label) VALUES (1, 'x')").await;

        assert_eq!(
            get_decimal(&row, "label", MONEY_SCALE),
            Err(RepositoryError::Database(
                "Unexpected type 'TEXT' for column 'label'".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn missing_column_is_reported() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO amounts (id) VALUES (1)").await;

        let result = get_decimal(&row, "nope", MONEY_SCALE);

        assert!(
            matches!(&result, Err(RepositoryError::Database(msg)) if msg.starts_with("Column 'nope' not found:")),
            "{result:?}"
        );
    }

    // =========================================================================
    // get_optional_decimal
    // =========================================================================

    #[tokio::test]
    async fn optional_null_is_none() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO amounts (id) VALUES (1)").await;

        assert_eq!(get_optional_decimal(&row, "money", MONEY_SCALE), Ok(None));
    }

    #[tokio::test]
    async fn optional_value_is_some() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO amounts (id, money) VALUES (1, 650000)").await;

        assert_eq!(
            get_optional_decimal(&row, "money", MONEY_SCALE),
            Ok(Some(dec!(650000)))
        );
    }

    // =========================================================================
    // to_column
    // =========================================================================

    #[test]
    fn to_column_rounds_half_away_from_zero() {
        assert_eq!(to_column(dec!(10.005), MONEY_SCALE), 10.01);
        assert_eq!(to_column(dec!(-10.005), MONEY_SCALE), -10.01);
    }

    #[test]
    fn to_column_keeps_exact_values() {
        assert_eq!(to_column(dec!(999999999.99), MONEY_SCALE), 999999999.99);
        assert_eq!(to_column(Decimal::ZERO, PERCENT_SCALE), 0.0);
    }
}
