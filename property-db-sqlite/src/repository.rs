use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use property_core::{Property, PropertyDetails, PropertyRepository, RentalMode, RepositoryError};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use tracing::{debug, info};
use uuid::Uuid;

use crate::decimal::{MONEY_SCALE, PERCENT_SCALE, get_decimal, get_optional_decimal, to_column};

const SELECT_PROPERTY: &str = "SELECT id, url, notes,
        purchase_price, loan_rate, ltv, months,
        insurance, taxes_yearly, closing,
        mode, monthly_rent, average_nightly_rent, occupancy_rate,
        vacancy_rate, management_rate, capital_expenditures_rate, repair_rate,
        total_rehab_cost, post_rehab_value,
        created_at, updated_at
     FROM property";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {database_url}"))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn row_to_property(row: &SqliteRow) -> Result<Property, RepositoryError> {
    let mode: String = row.try_get("mode").map_err(db_err)?;
    let mode = RentalMode::parse(&mode)
        .ok_or_else(|| RepositoryError::Database(format!("Unknown rental mode '{mode}'")))?;

    let details = PropertyDetails {
        url: row.try_get("url").map_err(db_err)?,
        notes: row.try_get("notes").map_err(db_err)?,
        purchase_price: get_decimal(row, "purchase_price", MONEY_SCALE)?,
        loan_rate: get_decimal(row, "loan_rate", PERCENT_SCALE)?,
        ltv: get_decimal(row, "ltv", PERCENT_SCALE)?,
        months: row.try_get("months").map_err(db_err)?,
        insurance: get_decimal(row, "insurance", MONEY_SCALE)?,
        taxes_yearly: get_decimal(row, "taxes_yearly", MONEY_SCALE)?,
        closing: get_decimal(row, "closing", MONEY_SCALE)?,
        mode,
        monthly_rent: get_decimal(row, "monthly_rent", MONEY_SCALE)?,
        average_nightly_rent: get_decimal(row, "average_nightly_rent", MONEY_SCALE)?,
        occupancy_rate: get_decimal(row, "occupancy_rate", PERCENT_SCALE)?,
        vacancy_rate: get_decimal(row, "vacancy_rate", PERCENT_SCALE)?,
        management_rate: get_decimal(row, "management_rate", PERCENT_SCALE)?,
        capital_expenditures_rate: get_decimal(row, "capital_expenditures_rate", PERCENT_SCALE)?,
        repair_rate: get_decimal(row, "repair_rate", PERCENT_SCALE)?,
        total_rehab_cost: get_optional_decimal(row, "total_rehab_cost", MONEY_SCALE)?,
        post_rehab_value: get_optional_decimal(row, "post_rehab_value", MONEY_SCALE)?,
    };

    Ok(Property {
        id: row.try_get("id").map_err(db_err)?,
        details,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

#[async_trait]
impl PropertyRepository for SqliteRepository {
    async fn create_property(
        &self,
        details: PropertyDetails,
    ) -> Result<Property, RepositoryError> {
        let id = Uuid::new_v4().simple().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO property (
                id, url, notes,
                purchase_price, loan_rate, ltv, months,
                insurance, taxes_yearly, closing,
                mode, monthly_rent, average_nightly_rent, occupancy_rate,
                vacancy_rate, management_rate, capital_expenditures_rate, repair_rate,
                total_rehab_cost, post_rehab_value,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&details.url)
        .bind(&details.notes)
        .bind(to_column(details.purchase_price, MONEY_SCALE))
        .bind(to_column(details.loan_rate, PERCENT_SCALE))
        .bind(to_column(details.ltv, PERCENT_SCALE))
        .bind(details.months)
        .bind(to_column(details.insurance, MONEY_SCALE))
        .bind(to_column(details.taxes_yearly, MONEY_SCALE))
        .bind(to_column(details.closing, MONEY_SCALE))
        .bind(details.mode.as_str())
        .bind(to_column(details.monthly_rent, MONEY_SCALE))
        .bind(to_column(details.average_nightly_rent, MONEY_SCALE))
        .bind(to_column(details.occupancy_rate, PERCENT_SCALE))
        .bind(to_column(details.vacancy_rate, PERCENT_SCALE))
        .bind(to_column(details.management_rate, PERCENT_SCALE))
        .bind(to_column(details.capital_expenditures_rate, PERCENT_SCALE))
        .bind(to_column(details.repair_rate, PERCENT_SCALE))
        .bind(details.total_rehab_cost.map(|v| to_column(v, MONEY_SCALE)))
        .bind(details.post_rehab_value.map(|v| to_column(v, MONEY_SCALE)))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        info!(id = %id, mode = %details.mode, "Created property");
        self.get_property(&id).await
    }

    async fn get_property(
        &self,
        id: &str,
    ) -> Result<Property, RepositoryError> {
        debug!(id, "Loading property");
        let row = sqlx::query(&format!("{SELECT_PROPERTY} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_property(&row)
    }

    async fn update_property(
        &self,
        property: &Property,
    ) -> Result<(), RepositoryError> {
        let details = &property.details;

        let result = sqlx::query(
            "UPDATE property SET
                url = ?, notes = ?,
                purchase_price = ?, loan_rate = ?, ltv = ?, months = ?,
                insurance = ?, taxes_yearly = ?, closing = ?,
                mode = ?, monthly_rent = ?, average_nightly_rent = ?, occupancy_rate = ?,
                vacancy_rate = ?, management_rate = ?, capital_expenditures_rate = ?, repair_rate = ?,
                total_rehab_cost = ?, post_rehab_value = ?,
                updated_at = ?
             WHERE id = ?",
        )
        .bind(&details.url)
        .bind(&details.notes)
        .bind(to_column(details.purchase_price, MONEY_SCALE))
        .bind(to_column(details.loan_rate, PERCENT_SCALE))
        .bind(to_column(details.ltv, PERCENT_SCALE))
        .bind(details.months)
        .bind(to_column(details.insurance, MONEY_SCALE))
        .bind(to_column(details.taxes_yearly, MONEY_SCALE))
        .bind(to_column(details.closing, MONEY_SCALE))
        .bind(details.mode.as_str())
        .bind(to_column(details.monthly_rent, MONEY_SCALE))
        .bind(to_column(details.average_nightly_rent, MONEY_SCALE))
        .bind(to_column(details.occupancy_rate, PERCENT_SCALE))
        .bind(to_column(details.vacancy_rate, PERCENT_SCALE))
        .bind(to_column(details.management_rate, PERCENT_SCALE))
        .bind(to_column(details.capital_expenditures_rate, PERCENT_SCALE))
        .bind(to_column(details.repair_rate, PERCENT_SCALE))
        .bind(details.total_rehab_cost.map(|v| to_column(v, MONEY_SCALE)))
        .bind(details.post_rehab_value.map(|v| to_column(v, MONEY_SCALE)))
        .bind(Utc::now())
        .bind(&property.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!(id = %property.id, "Updated property");
        Ok(())
    }

    async fn delete_property(
        &self,
        id: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM property WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!(id, "Deleted property");
        Ok(())
    }

    async fn list_properties(&self) -> Result<Vec<Property>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_PROPERTY} ORDER BY updated_at DESC, id"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(row_to_property).collect()
    }
}
