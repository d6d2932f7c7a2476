//! solve subcommand: exhaustive search over a model.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use pbo_core::wire::LoadedModel;
use pbo_core::{Assignment, Domain, DomainKind, Model};

use super::{ensure_numeric, print_pretty_json, ModelArgs};
use crate::config::PboConfig;

/// Arguments for the solve subcommand
#[derive(Args, Debug)]
pub struct SolveArgs {
    #[command(flatten)]
    pub input: ModelArgs,

    /// Report every minimizer instead of the first one
    #[arg(long, default_value_t = false)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
struct SolutionJson {
    assignment: BTreeMap<String, i8>,
    valid: bool,
}

#[derive(Debug, Serialize)]
struct SolveOutput {
    domain: DomainKind,
    variables: usize,
    /// Penalized objective at the reported solutions
    energy: f64,
    solutions: Vec<SolutionJson>,
    diagnostics: Vec<String>,
}

pub fn run(args: SolveArgs, config: &PboConfig) -> Result<()> {
    let output = match args.input.load(config)? {
        LoadedModel::Binary(m) => solve(&m, args.all, config)?,
        LoadedModel::Spin(m) => solve(&m, args.all, config)?,
    };
    print_pretty_json(&output)
}

fn solve<D: Domain>(model: &Model<D>, all: bool, config: &PboConfig) -> Result<SolveOutput> {
    ensure_numeric(model)?;
    let variables = model.num_binary_variables();
    if variables > config.max_bruteforce_variables {
        bail!(
            "model has {} variables, more than the configured limit of {}",
            variables,
            config.max_bruteforce_variables
        );
    }

    let (energy, solutions) = model.bruteforce(all)?;
    debug!(target: "cli", variables, minimizers = solutions.len(), "solved");

    let solutions: Vec<SolutionJson> = solutions
        .iter()
        .map(|sol| SolutionJson {
            assignment: labelled(sol),
            valid: model.is_solution_valid(sol),
        })
        .collect();
    if solutions.iter().any(|s| !s.valid) {
        info!(target: "cli", "no feasible assignment; every solution violates a constraint");
    }

    Ok(SolveOutput {
        domain: D::KIND,
        variables,
        energy: energy.to_f64(),
        solutions,
        diagnostics: model.diagnostics().iter().map(|d| d.to_string()).collect(),
    })
}

fn labelled(solution: &Assignment) -> BTreeMap<String, i8> {
    solution.iter().map(|(l, &v)| (l.to_string(), v)).collect()
}
