//! Subcommand handlers. Each prints one JSON document on stdout.

pub mod convert;
pub mod solve;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::debug;

use pbo_core::wire::{load_model, LoadedModel};
use pbo_core::{Coefficient, Domain, Model};

use crate::config::{exact_coefficient, PboConfig};

/// Model input shared by every subcommand
#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Model document (JSON)
    pub model: PathBuf,

    /// Substitute a parameter before solving, e.g. `--set lam=10`
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_binding)]
    pub params: Vec<(String, f64)>,
}

fn parse_binding(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for '{}': {}", name, e))?;
    Ok((name.trim().to_string(), value))
}

impl ModelArgs {
    /// Read, compile and parameter-substitute the model document.
    pub fn load(&self, config: &PboConfig) -> Result<LoadedModel> {
        let json = fs::read_to_string(&self.model)
            .with_context(|| format!("reading {}", self.model.display()))?;
        let loaded = load_model(&json, &config.constraint_options())
            .with_context(|| format!("loading {}", self.model.display()))?;
        debug!(target: "cli", domain = %loaded.kind(), "model loaded");

        if self.params.is_empty() {
            return Ok(loaded);
        }
        let values: BTreeMap<String, Coefficient> = self
            .params
            .iter()
            .map(|(name, v)| (name.clone(), exact_coefficient(*v)))
            .collect();
        Ok(match loaded {
            LoadedModel::Binary(m) => LoadedModel::Binary(m.subs_many(&values)),
            LoadedModel::Spin(m) => LoadedModel::Spin(m.subs_many(&values)),
        })
    }
}

/// Fail early on parameters nothing substituted.
pub fn ensure_numeric<D: Domain>(model: &Model<D>) -> Result<()> {
    let params = model.params();
    if !params.is_empty() {
        let names: Vec<String> = params.into_iter().collect();
        anyhow::bail!("unresolved parameters: {} (use --set NAME=VALUE)", names.join(", "));
    }
    Ok(())
}

pub fn print_pretty_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{}", out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings() {
        assert_eq!(parse_binding("lam=10").unwrap(), ("lam".to_string(), 10.0));
        assert_eq!(parse_binding(" w = 0.5").unwrap(), ("w".to_string(), 0.5));
        assert!(parse_binding("lam").is_err());
        assert!(parse_binding("lam=x").is_err());
    }
}
