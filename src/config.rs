//! Starting values for the form, optionally read from a JSON file.
//!
//! Every field is optional in the file; anything left out keeps its default.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::down_payment::PropertyTax;
use crate::savings::SavingsProfile;

/// Loan terms offered on the form, in years.
pub const LOAN_TERMS: [u32; 4] = [30, 20, 15, 10];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseConfig {
    pub home_price: f64,
    pub target_monthly_payment: f64,
    pub interest_rate: f64,
    pub loan_term_years: u32,
    pub property_tax: PropertyTax,
    /// Annual.
    pub home_insurance: f64,
    /// Monthly.
    pub hoa_fees: f64,
    pub pmi_rate: f64,
    pub closing_costs: f64,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            home_price: 500_000.0,
            target_monthly_payment: 3_000.0,
            interest_rate: 7.0,
            loan_term_years: 30,
            property_tax: PropertyTax::PercentOfPrice(1.2),
            home_insurance: 1_200.0,
            hoa_fees: 50.0,
            pmi_rate: 0.5,
            closing_costs: 10_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinanceConfig {
    pub original_amount: f64,
    pub original_rate: f64,
    pub original_term_years: u32,
    pub months_paid: u32,
    pub new_rate: f64,
    pub new_term_years: u32,
    pub closing_costs: f64,
    pub extra_principal: f64,
}

impl Default for RefinanceConfig {
    fn default() -> Self {
        Self {
            original_amount: 300_000.0,
            original_rate: 6.5,
            original_term_years: 30,
            months_paid: 24,
            new_rate: 5.5,
            new_term_years: 30,
            closing_costs: 5_000.0,
            extra_principal: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub purchase: PurchaseConfig,
    pub savings: SavingsProfile,
    pub refinance: RefinanceConfig,
    /// Where the refinance schedule is written as CSV.
    pub export_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            purchase: PurchaseConfig::default(),
            savings: SavingsProfile::default(),
            refinance: RefinanceConfig::default(),
            export_path: PathBuf::from("refinance_schedule.csv"),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing config")
    }

    fn validate(&self) -> Result<()> {
        let terms = [
            ("purchase.loan_term_years", self.purchase.loan_term_years),
            ("refinance.original_term_years", self.refinance.original_term_years),
            ("refinance.new_term_years", self.refinance.new_term_years),
        ];
        for (field, years) in terms {
            if !LOAN_TERMS.contains(&years) {
                bail!("{field} must be one of {LOAN_TERMS:?}, got {years}");
            }
        }
        Ok(())
    }
}
