//! Configuration: global gateway settings plus per-site overrides.
//!
//! Loaded from a TOML file with `PAYMENT__`-prefixed environment
//! overrides layered on top. Fee and tax values keep both a built-in
//! default and a per-site override; neither source is authoritative,
//! resolution is per field.

use std::{collections::HashMap, path::PathBuf};

use common_enums::ProcessorKind;
use common_utils::{
    consts,
    types::{MajorUnit, MinorUnit},
};
use domain_types::invoice::TotalsPolicy;
use rust_decimal::{prelude::FromPrimitive, Decimal};
use secrecy::{ExposeSecret, SecretString};

/// Environment variables are read as `PAYMENT__SECTION__FIELD`.
pub const ENV_PREFIX: &str = "PAYMENT";

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_processor: ProcessorKind,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub sites: HashMap<String, SiteConfig>,
}

#[derive(Debug, serde::Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Used when a site carries no key of its own. Absence of both is
    /// a setup-time `ConfigurationError`.
    pub fallback_secret_key: Option<SecretString>,
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
    #[serde(default = "default_read_retry_limit")]
    pub read_retry_limit: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fallback_secret_key: None,
            call_timeout_secs: default_call_timeout_secs(),
            read_retry_limit: default_read_retry_limit(),
        }
    }
}

/// Per-site settings. Every field is optional; unset fields fall back
/// to the crate defaults.
#[derive(Debug, Default, serde::Deserialize)]
pub struct SiteConfig {
    pub secret_key: Option<SecretString>,
    pub publishable_key: Option<String>,
    pub base_fee_percent: Option<f64>,
    pub base_fee_fixed_minor_units: Option<i64>,
    pub commission_percent: Option<f64>,
    pub tax_percent: Option<f64>,
    pub shipping_flat: Option<f64>,
}

/// Resolved fee inputs for one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSettings {
    pub percent: Decimal,
    pub fixed: MinorUnit,
    pub commission_percent: Decimal,
}

fn default_base_url() -> String {
    "https://api.stripe.com/v1".to_string()
}

fn default_call_timeout_secs() -> u64 {
    consts::GATEWAY_CALL_TIMEOUT_SECS
}

fn default_read_retry_limit() -> u32 {
    consts::GATEWAY_READ_RETRY_LIMIT
}

fn decimal_or(value: Option<f64>, fallback: f64) -> Decimal {
    value
        .and_then(Decimal::from_f64)
        .or_else(|| Decimal::from_f64(fallback))
        .unwrap_or_default()
}

impl Config {
    /// Build the configuration from the default location
    /// (`config/payment.toml` under the working directory).
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::new_with_config_path(None)
    }

    /// Build the configuration from an explicit file path plus
    /// environment overrides.
    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, config::ConfigError> {
        let config_path =
            explicit_config_path.unwrap_or_else(|| PathBuf::from("config/payment.toml"));

        let config = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn site(&self, domain: &str) -> Option<&SiteConfig> {
        self.sites.get(domain)
    }

    /// The secret key charging `domain` should use: the site's own key
    /// when configured, else the global fallback.
    pub fn resolve_secret_key(&self, domain: &str) -> Option<SecretString> {
        self.site(domain)
            .and_then(|site| site.secret_key.as_ref())
            .or(self.gateway.fallback_secret_key.as_ref())
            .map(|key| SecretString::new(key.expose_secret().into()))
    }

    pub fn publishable_key(&self, domain: &str) -> Option<&str> {
        self.site(domain)
            .and_then(|site| site.publishable_key.as_deref())
    }

    /// Totals policy for `domain`, falling back to the crate defaults
    /// per field.
    pub fn totals_policy(&self, domain: &str) -> TotalsPolicy {
        let site = self.site(domain);
        TotalsPolicy {
            tax_percent: decimal_or(
                site.and_then(|site| site.tax_percent),
                consts::DEFAULT_TAX_PERCENT,
            ),
            shipping_flat: MajorUnit::new(decimal_or(
                site.and_then(|site| site.shipping_flat),
                consts::DEFAULT_SHIPPING_FLAT,
            )),
        }
    }

    /// Fee inputs for `domain`, falling back to the crate defaults
    /// per field.
    pub fn fee_settings(&self, domain: &str) -> FeeSettings {
        let site = self.site(domain);
        FeeSettings {
            percent: decimal_or(
                site.and_then(|site| site.base_fee_percent),
                consts::DEFAULT_BASE_FEE_PERCENT,
            ),
            fixed: MinorUnit::new(
                site.and_then(|site| site.base_fee_fixed_minor_units)
                    .unwrap_or(consts::DEFAULT_BASE_FEE_FIXED_MINOR_UNITS),
            ),
            commission_percent: decimal_or(
                site.and_then(|site| site.commission_percent),
                consts::DEFAULT_COMMISSION_PERCENT,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn config_with_site(site: SiteConfig) -> Config {
        let mut sites = HashMap::new();
        sites.insert("example.com".to_string(), site);
        Config {
            default_processor: ProcessorKind::Stripe,
            gateway: GatewayConfig {
                fallback_secret_key: Some(SecretString::new("sk_fallback".into())),
                ..GatewayConfig::default()
            },
            sites,
        }
    }

    #[test]
    fn site_key_wins_over_fallback() {
        let config = config_with_site(SiteConfig {
            secret_key: Some(SecretString::new("sk_site".into())),
            ..SiteConfig::default()
        });
        let key = config.resolve_secret_key("example.com").unwrap();
        assert_eq!(key.expose_secret(), "sk_site");
    }

    #[test]
    fn fallback_key_applies_to_unknown_sites() {
        let config = config_with_site(SiteConfig::default());
        let key = config.resolve_secret_key("other.example").unwrap();
        assert_eq!(key.expose_secret(), "sk_fallback");
    }

    #[test]
    fn fee_settings_fall_back_per_field() {
        let config = config_with_site(SiteConfig {
            base_fee_percent: Some(2.0),
            ..SiteConfig::default()
        });
        let fees = config.fee_settings("example.com");
        assert_eq!(fees.percent, Decimal::from(2));
        assert_eq!(
            fees.fixed,
            MinorUnit::new(consts::DEFAULT_BASE_FEE_FIXED_MINOR_UNITS)
        );
        assert_eq!(fees.commission_percent, Decimal::ZERO);
    }

    #[test]
    fn totals_policy_defaults_to_ten_percent_tax() {
        let config = config_with_site(SiteConfig::default());
        let policy = config.totals_policy("example.com");
        assert_eq!(policy.tax_percent, Decimal::from(10));
        assert_eq!(policy.shipping_flat, MajorUnit::zero());
    }
}
