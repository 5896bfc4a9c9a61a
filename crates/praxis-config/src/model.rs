use praxis_domain::{BracketTable, ComplianceSettings, SocialRates, TaxBracket, VatRates};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Longest look-ahead, in days, accepted for upcoming deadlines.
pub const MAX_UPCOMING_WINDOW_DAYS: u32 = 366;

/// Rates and tunables for one jurisdiction. Changing rates means changing this data only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxConfig {
    #[serde(default = "TaxConfig::default_currency")]
    pub currency: String,
    #[serde(default = "TaxConfig::default_locale")]
    pub locale: String,
    #[serde(default = "TaxConfig::default_brackets")]
    pub brackets: BracketTable,
    #[serde(default = "TaxConfig::default_vat_rates")]
    pub vat_rates: VatRates,
    #[serde(default = "TaxConfig::default_social_rates")]
    pub social_rates: SocialRates,
    #[serde(default)]
    pub compliance: ComplianceSettings,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            locale: Self::default_locale(),
            brackets: Self::default_brackets(),
            vat_rates: Self::default_vat_rates(),
            social_rates: Self::default_social_rates(),
            compliance: ComplianceSettings::default(),
        }
    }
}

impl TaxConfig {
    pub fn default_currency() -> String {
        "EUR".into()
    }

    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_brackets() -> BracketTable {
        BracketTable::new(vec![
            TaxBracket::bounded(Decimal::from(5_000), Decimal::ZERO),
            TaxBracket::bounded(Decimal::from(20_000), Decimal::from(26)),
            TaxBracket::unbounded(Decimal::from(28)),
        ])
        .unwrap_or_else(|_| unreachable!("default bracket table is well formed"))
    }

    pub fn default_vat_rates() -> VatRates {
        VatRates {
            normal: Decimal::from(19),
            reduced: Decimal::from(9),
            super_reduced: Decimal::from(5),
            exempt: Decimal::ZERO,
        }
    }

    pub fn default_social_rates() -> SocialRates {
        SocialRates {
            employee: Decimal::from(11),
            employer: Decimal::from(15),
        }
    }

    /// Checks the parts serde cannot: rate signs, threshold ranges and the deadline window.
    ///
    /// The bracket table is already validated on construction and deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (class, rate) in self.vat_rates.iter() {
            if rate < Decimal::ZERO {
                return Err(ConfigError::Invalid(format!(
                    "VAT rate {class:?} must not be negative"
                )));
            }
        }
        if self.social_rates.employee < Decimal::ZERO || self.social_rates.employer < Decimal::ZERO
        {
            return Err(ConfigError::Invalid(
                "social contribution rates must not be negative".into(),
            ));
        }
        let hundred = Decimal::ONE_HUNDRED;
        let thresholds = [
            ("healthy_threshold", self.compliance.healthy_threshold),
            ("warning_threshold", self.compliance.warning_threshold),
        ];
        for (name, value) in thresholds {
            if value < Decimal::ZERO || value > hundred {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be between 0 and 100"
                )));
            }
        }
        if self.compliance.warning_threshold > self.compliance.healthy_threshold {
            return Err(ConfigError::Invalid(
                "warning_threshold must not exceed healthy_threshold".into(),
            ));
        }
        let window = self.compliance.upcoming_window_days;
        if !(1..=MAX_UPCOMING_WINDOW_DAYS).contains(&window) {
            return Err(ConfigError::Invalid(format!(
                "upcoming_window_days must be between 1 and {MAX_UPCOMING_WINDOW_DAYS}, got {window}"
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_config_is_valid() {
        TaxConfig::default().validate().expect("defaults validate");
    }

    #[test]
    fn rejects_negative_vat_rate() {
        let mut cfg = TaxConfig::default();
        cfg.vat_rates.reduced = dec!(-9);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("Reduced"));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let mut cfg = TaxConfig::default();
        cfg.compliance.warning_threshold = dec!(90);
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_out_of_range_upcoming_window() {
        let mut cfg = TaxConfig::default();
        cfg.compliance.upcoming_window_days = u32::MAX;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
        cfg.compliance.upcoming_window_days = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
        cfg.compliance.upcoming_window_days = MAX_UPCOMING_WINDOW_DAYS;
        cfg.validate().expect("a one-year window is accepted");
    }
}
