//! Printable views of a property and its KPIs.

use anyhow::{Context, Result};
use clap::ValueEnum;
use property_core::format::{format_level, format_money, format_percent};
use property_core::{
    KpiLevel, KpiResult, KpiTiers, Property, PropertyInput, RentalMode, derive_kpis,
};
use serde::Serialize;
use tabled::Table;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// A property's inputs alongside everything derived from them.
///
/// In JSON, non-finite KPI values are written as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    pub input: PropertyInput,
    pub kpis: KpiResult,
    pub tiers: KpiTiers,
}

impl PropertyReport {
    pub fn new(input: PropertyInput) -> Self {
        let kpis = derive_kpis(&input);
        if !kpis.is_finite() {
            warn!(
                id = ?input.id,
                purchase_price = input.purchase_price,
                months = input.months,
                "Some KPIs are not finite"
            );
        }
        Self {
            share_url: None,
            tiers: kpis.tiers(),
            kpis,
            input,
        }
    }

    pub fn with_share_url(
        mut self,
        url: impl Into<String>,
    ) -> Self {
        self.share_url = Some(url.into());
        self
    }

    /// `[label, value, tier]` rows, inputs first. Untiered rows have an
    /// empty tier cell.
    pub fn rows(&self) -> Vec<[String; 3]> {
        let input = &self.input;
        let kpis = &self.kpis;
        let tiers = &self.tiers;

        let mut rows = Vec::with_capacity(24);
        let mut plain = |label: &str, value: String| {
            rows.push([label.to_string(), value, String::new()]);
        };

        if let Some(id) = &input.id {
            plain("Id", id.clone());
        }
        if let Some(url) = &input.url {
            plain("Listing", url.clone());
        }
        plain("Mode", input.mode.label().to_string());
        plain("Purchase price", format_money(input.purchase_price));
        match input.mode {
            RentalMode::Ltr => plain("Monthly rent", format_money(input.monthly_rent)),
            RentalMode::Str => {
                plain("Nightly rent", format_money(input.average_nightly_rent));
                plain("Occupancy", format!("{}%", input.occupancy_rate));
            }
        }
        plain(
            "Loan",
            format!(
                "{}% for {} months at {}% LTV",
                input.loan_rate, input.months, input.ltv
            ),
        );

        plain("Monthly revenue", format_money(kpis.monthly_rev));
        plain("Taxes", format_money(kpis.monthly_taxes));
        plain("Insurance", format_money(kpis.monthly_insurance));
        plain("Vacancy", format_money(kpis.vacancy));
        plain("Management", format_money(kpis.management));
        plain("Capital expenditures", format_money(kpis.capital_expenditures));
        plain("Repairs", format_money(kpis.repairs));
        plain("Mortgage payment", format_money(kpis.monthly_mortgage_payment));
        plain("Total monthly cost", format_money(kpis.total_monthly_cost));
        plain("Cash to close", format_money(kpis.total_close));

        let tiered = [
            (
                "Net monthly cash flow",
                format_money(kpis.net_monthly_cash_flow),
                tiers.net_monthly_cash_flow,
            ),
            (
                "1% rule",
                format_percent(kpis.one_percent_rule, 2),
                tiers.one_percent_rule,
            ),
            ("Cap rate", format_percent(kpis.cap_rate, 2), tiers.cap_rate),
            ("50% rule cash flow", format_money(kpis.cash_flow), tiers.cash_flow),
            (
                "Cash-on-cash return",
                format_percent(kpis.co_croi, 2),
                tiers.co_croi,
            ),
        ];
        for (label, value, level) in tiered {
            rows.push([label.to_string(), value, tier_cell(level)]);
        }

        if let Some(url) = &self.share_url {
            rows.push(["Share".to_string(), url.clone(), String::new()]);
        }

        rows
    }

    pub fn render(
        &self,
        format: OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Value", "Tier"]);
                for row in self.rows() {
                    builder.push_record(row);
                }
                Ok(styled(builder))
            }
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize report")
            }
        }
    }
}

fn tier_cell(level: KpiLevel) -> String {
    format_level(level).to_string()
}

fn styled(builder: Builder) -> String {
    let mut table: Table = builder.build();
    table.with(Style::sharp());
    table.to_string()
}

#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    id: &'a str,
    mode: RentalMode,
    url: Option<&'a str>,
    purchase_price: f64,
    net_monthly_cash_flow: f64,
    cap_rate: f64,
    updated_at: String,
}

/// Summary of saved properties, one line each.
pub fn render_list(
    properties: &[Property],
    format: OutputFormat,
) -> Result<String> {
    let entries: Vec<ListEntry<'_>> = properties
        .iter()
        .map(|property| {
            let input = PropertyInput::from(property);
            let kpis = derive_kpis(&input);
            ListEntry {
                id: &property.id,
                mode: property.details.mode,
                url: property.details.url.as_deref(),
                purchase_price: input.purchase_price,
                net_monthly_cash_flow: kpis.net_monthly_cash_flow,
                cap_rate: kpis.cap_rate,
                updated_at: property.updated_at.to_rfc3339(),
            }
        })
        .collect();

    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&entries).context("Failed to serialize property list")
        }
        OutputFormat::Table => {
            if entries.is_empty() {
                return Ok("(no saved properties)".to_string());
            }
            let mut builder = Builder::default();
            builder.push_record(["Id", "Mode", "Price", "Net cash flow", "Cap rate", "Updated"]);
            for entry in &entries {
                builder.push_record([
                    entry.id.to_string(),
                    entry.mode.to_string(),
                    format_money(entry.purchase_price),
                    format_money(entry.net_monthly_cash_flow),
                    format_percent(entry.cap_rate, 2),
                    entry.updated_at.clone(),
                ]);
            }
            Ok(styled(builder))
        }
    }
}
