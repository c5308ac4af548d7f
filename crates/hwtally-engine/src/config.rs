//! Tally configuration

use hwtally_common::{HwTallyError, Result};
use serde::{Deserialize, Serialize};

/// Tally run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyConfig {
    /// Products to tally from each inventory
    pub products: Vec<String>,
    /// Hosts per shard when tallying in parallel
    pub shard_size: usize,
    /// Host facts JSON file read by the binary
    pub input_path: Option<String>,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            products: vec![crate::DEFAULT_PRODUCT.to_string()],
            shard_size: crate::DEFAULT_SHARD_SIZE,
            input_path: None,
        }
    }
}

impl TallyConfig {
    /// Load configuration from `.env` and `HWTALLY_` environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(products) = lookup("HWTALLY_PRODUCTS") {
            let products: Vec<String> = products
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if products.is_empty() {
                return Err(HwTallyError::Config(
                    "HWTALLY_PRODUCTS names no products".into(),
                ));
            }
            cfg.products = products;
        }

        if let Some(val) = lookup("HWTALLY_SHARD_SIZE") {
            cfg.shard_size = val.trim().parse().map_err(|_| {
                HwTallyError::Config(format!("HWTALLY_SHARD_SIZE is not a number: '{}'", val))
            })?;
        }

        if let Some(path) = lookup("HWTALLY_INPUT") {
            cfg.input_path = Some(path);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shard_size == 0 {
            return Err(HwTallyError::Config("shard_size must be positive".into()));
        }
        if self.products.is_empty() {
            return Err(HwTallyError::Config("at least one product is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = TallyConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, TallyConfig::default());
        assert_eq!(cfg.products, vec!["RHEL".to_string()]);
    }

    #[test]
    fn test_overrides() {
        let cfg = TallyConfig::from_lookup(lookup(&[
            ("HWTALLY_PRODUCTS", "RHEL, RHEL Workstation,"),
            ("HWTALLY_SHARD_SIZE", "250"),
            ("HWTALLY_INPUT", "/tmp/hosts.json"),
        ]))
        .unwrap();

        assert_eq!(cfg.products, vec!["RHEL", "RHEL Workstation"]);
        assert_eq!(cfg.shard_size, 250);
        assert_eq!(cfg.input_path.as_deref(), Some("/tmp/hosts.json"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(TallyConfig::from_lookup(lookup(&[("HWTALLY_SHARD_SIZE", "lots")])).is_err());
        assert!(TallyConfig::from_lookup(lookup(&[("HWTALLY_SHARD_SIZE", "0")])).is_err());
        assert!(TallyConfig::from_lookup(lookup(&[("HWTALLY_PRODUCTS", " , ")])).is_err());
    }
}
