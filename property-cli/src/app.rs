use anyhow::{Context, Result};
use clap::Args;
use property_core::db::RepositoryRegistry;
use property_core::{Property, PropertyDetails, PropertyInput, PropertyRepository, RentalMode};
use property_db_sqlite::SqliteRepositoryFactory;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::report::PropertyReport;

/// Builds a registry with every storage backend compiled into this binary.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Link under which a saved property can be revisited.
pub fn share_url(
    base_url: &str,
    id: &str,
) -> String {
    format!("{}/property/{id}", base_url.trim_end_matches('/'))
}

/// Property fields settable from the command line. Anything left out keeps
/// its current value, or the default for a new property.
#[derive(Debug, Clone, Default, Args)]
pub struct PropertyArgs {
    /// Listing URL
    #[arg(long)]
    pub url: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Rental mode: ltr or str
    #[arg(long)]
    pub mode: Option<RentalMode>,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Monthly rent (long-term rentals)
    #[arg(long)]
    pub monthly_rent: Option<Decimal>,

    /// Average nightly rent (short-term rentals)
    #[arg(long)]
    pub average_nightly_rent: Option<Decimal>,

    /// Occupancy, as a percentage (short-term rentals)
    #[arg(long)]
    pub occupancy_rate: Option<Decimal>,

    /// Yearly insurance
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Annual loan rate, as a percentage
    #[arg(long)]
    pub loan_rate: Option<Decimal>,

    /// Loan-to-value, as a percentage
    #[arg(long)]
    pub ltv: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub months: Option<i32>,

    /// Yearly property taxes
    #[arg(long)]
    pub taxes_yearly: Option<Decimal>,

    /// Closing costs
    #[arg(long)]
    pub closing: Option<Decimal>,

    /// Vacancy, as a percentage of rent
    #[arg(long)]
    pub vacancy_rate: Option<Decimal>,

    /// Property management, as a percentage of rent
    #[arg(long)]
    pub management_rate: Option<Decimal>,

    /// Capital expenditures, as a percentage of rent
    #[arg(long)]
    pub capital_expenditures_rate: Option<Decimal>,

    /// Repairs, as a percentage of rent
    #[arg(long)]
    pub repair_rate: Option<Decimal>,

    /// Total rehab budget
    #[arg(long)]
    pub total_rehab_cost: Option<Decimal>,

    /// Expected value after rehab
    #[arg(long)]
    pub post_rehab_value: Option<Decimal>,
}

impl PropertyArgs {
    /// Overwrites the fields of `details` that were given on the command line.
    pub fn apply_to(
        &self,
        details: &mut PropertyDetails,
    ) {
        fn set<T: Clone>(
            target: &mut T,
            value: &Option<T>,
        ) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        if self.url.is_some() {
            details.url = self.url.clone();
        }
        if self.notes.is_some() {
            details.notes = self.notes.clone();
        }
        set(&mut details.mode, &self.mode);
        set(&mut details.purchase_price, &self.purchase_price);
        set(&mut details.monthly_rent, &self.monthly_rent);
        set(&mut details.average_nightly_rent, &self.average_nightly_rent);
        set(&mut details.occupancy_rate, &self.occupancy_rate);
        set(&mut details.insurance, &self.insurance);
        set(&mut details.loan_rate, &self.loan_rate);
        set(&mut details.ltv, &self.ltv);
        set(&mut details.months, &self.months);
        set(&mut details.taxes_yearly, &self.taxes_yearly);
        set(&mut details.closing, &self.closing);
        set(&mut details.vacancy_rate, &self.vacancy_rate);
        set(&mut details.management_rate, &self.management_rate);
        set(
            &mut details.capital_expenditures_rate,
            &self.capital_expenditures_rate,
        );
        set(&mut details.repair_rate, &self.repair_rate);
        if self.total_rehab_cost.is_some() {
            details.total_rehab_cost = self.total_rehab_cost;
        }
        if self.post_rehab_value.is_some() {
            details.post_rehab_value = self.post_rehab_value;
        }
    }

    /// Default property details with the command-line overrides applied.
    pub fn to_details(&self) -> PropertyDetails {
        let mut details = PropertyDetails::default();
        self.apply_to(&mut details);
        details
    }
}

/// Validates and saves a new property built from defaults plus `args`.
pub async fn create_property(
    repo: &dyn PropertyRepository,
    args: &PropertyArgs,
) -> Result<Property> {
    let details = args.to_details();
    details.validate().context("Invalid property")?;

    let property = repo
        .create_property(details)
        .await
        .context("Failed to save property")?;
    info!(id = %property.id, mode = %property.details.mode, "Saved new property");
    Ok(property)
}

pub async fn get_property(
    repo: &dyn PropertyRepository,
    id: &str,
) -> Result<Property> {
    repo.get_property(id)
        .await
        .with_context(|| format!("Failed to load property '{id}'"))
}

/// Applies `args` to a saved property and writes it back once the result
/// validates. The stored record is untouched when validation fails.
pub async fn update_property(
    repo: &dyn PropertyRepository,
    id: &str,
    args: &PropertyArgs,
) -> Result<Property> {
    let mut property = get_property(repo, id).await?;
    args.apply_to(&mut property.details);
    property.details.validate().context("Invalid property")?;

    repo.update_property(&property)
        .await
        .with_context(|| format!("Failed to update property '{id}'"))?;

    debug!(id, "Re-reading updated property");
    get_property(repo, id).await
}

pub async fn delete_property(
    repo: &dyn PropertyRepository,
    id: &str,
) -> Result<()> {
    repo.delete_property(id)
        .await
        .with_context(|| format!("Failed to delete property '{id}'"))
}

pub async fn list_properties(repo: &dyn PropertyRepository) -> Result<Vec<Property>> {
    repo.list_properties()
        .await
        .context("Failed to list properties")
}

/// Report for a saved property, including its share link.
pub fn saved_report(
    property: &Property,
    base_url: &str,
) -> PropertyReport {
    PropertyReport::new(PropertyInput::from(property))
        .with_share_url(share_url(base_url, &property.id))
}

/// Report for a property that is never saved.
pub fn evaluate(args: &PropertyArgs) -> Result<PropertyReport> {
    let details = args.to_details();
    details.validate().context("Invalid property")?;
    Ok(PropertyReport::new(PropertyInput::from(&details)))
}
