use std::io::Read;

use property_core::{
    Property, PropertyDetails, PropertyRepository, PropertyValidationError, RentalMode,
    RepositoryError,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when importing properties.
#[derive(Debug, Error)]
pub enum PropertyLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Row {row}: unknown rental mode '{value}', expected 'ltr' or 'str'")]
    InvalidMode { row: usize, value: String },

    #[error("Row {row}: {source}")]
    Validation {
        row: usize,
        #[source]
        source: PropertyValidationError,
    },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for PropertyLoaderError {
    fn from(err: csv::Error) -> Self {
        PropertyLoaderError::CsvParse(err.to_string())
    }
}

/// One row of a property import file.
///
/// Columns are matched by header name:
/// - `url`, `notes`: free text, optional
/// - `mode`: `ltr` or `str`, empty means `ltr`
/// - `purchase_price`, `monthly_rent`, `average_nightly_rent`, `insurance`,
///   `taxes_yearly`, `closing`: dollar amounts
/// - `loan_rate`, `ltv`, `occupancy_rate`, `vacancy_rate`, `management_rate`,
///   `capital_expenditures_rate`, `repair_rate`: percentages on a 0-100 scale
/// - `months`: loan term
/// - `total_rehab_cost`, `post_rehab_value`: optional dollar amounts
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PropertyRecord {
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub mode: Option<String>,

    pub purchase_price: Decimal,
    pub monthly_rent: Decimal,
    pub average_nightly_rent: Decimal,
    pub occupancy_rate: Decimal,
    pub insurance: Decimal,
    pub loan_rate: Decimal,
    pub ltv: Decimal,
    pub months: i32,
    pub taxes_yearly: Decimal,
    pub closing: Decimal,
    pub vacancy_rate: Decimal,
    pub management_rate: Decimal,
    pub capital_expenditures_rate: Decimal,
    pub repair_rate: Decimal,

    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub total_rehab_cost: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub post_rehab_value: Option<Decimal>,
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl PropertyRecord {
    /// Converts and validates the record. `row` is the 1-based data row,
    /// used only for error reporting.
    pub fn to_details(
        &self,
        row: usize,
    ) -> Result<PropertyDetails, PropertyLoaderError> {
        let mode = match self.mode.as_deref() {
            None => RentalMode::default(),
            Some(code) => code
                .parse::<RentalMode>()
                .map_err(|_| PropertyLoaderError::InvalidMode {
                    row,
                    value: code.to_string(),
                })?,
        };

        let details = PropertyDetails {
            url: self.url.clone(),
            notes: self.notes.clone(),
            purchase_price: self.purchase_price,
            loan_rate: self.loan_rate,
            ltv: self.ltv,
            months: self.months,
            insurance: self.insurance,
            taxes_yearly: self.taxes_yearly,
            closing: self.closing,
            mode,
            monthly_rent: self.monthly_rent,
            average_nightly_rent: self.average_nightly_rent,
            occupancy_rate: self.occupancy_rate,
            vacancy_rate: self.vacancy_rate,
            management_rate: self.management_rate,
            capital_expenditures_rate: self.capital_expenditures_rate,
            repair_rate: self.repair_rate,
            total_rehab_cost: self.total_rehab_cost,
            post_rehab_value: self.post_rehab_value,
        };

        details
            .validate()
            .map_err(|source| PropertyLoaderError::Validation { row, source })?;

        Ok(details)
    }
}

/// Bulk import of properties from CSV through any [`PropertyRepository`].
pub struct PropertyLoader;

impl PropertyLoader {
    /// Parses every row of `reader`. Headers are required.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<PropertyRecord>, PropertyLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let records = csv_reader
            .deserialize()
            .collect::<Result<Vec<PropertyRecord>, _>>()?;

        debug!(count = records.len(), "Parsed property records");
        Ok(records)
    }

    /// Validates all records, then creates one property per record.
    ///
    /// Nothing is written when any record fails validation. A storage error
    /// part way through leaves the earlier rows in place.
    pub async fn load<R: PropertyRepository + ?Sized>(
        repo: &R,
        records: &[PropertyRecord],
    ) -> Result<Vec<Property>, PropertyLoaderError> {
        let details = records
            .iter()
            .enumerate()
            .map(|(index, record)| record.to_details(index + 1))
            .collect::<Result<Vec<_>, _>>()?;

        let mut created = Vec::with_capacity(details.len());
        for details in details {
            created.push(repo.create_property(details).await?);
        }

        info!(count = created.len(), "Imported properties");
        Ok(created)
    }
}
