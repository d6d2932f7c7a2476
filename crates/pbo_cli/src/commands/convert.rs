//! convert subcommand: print a canonical form of a model.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::debug;

use pbo_core::wire::{LoadedModel, WirePolynomial};
use pbo_core::{AncillaTable, Domain, Label, Model, Polynomial, ReductionWeight};

use super::{ensure_numeric, print_pretty_json, ModelArgs};
use crate::config::PboConfig;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    Qubo,
    Ising,
    Pubo,
    Hising,
}

/// Arguments for the convert subcommand
#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: ModelArgs,

    /// Target canonical form
    #[arg(long, value_enum)]
    pub to: Form,

    /// Degree bound for pubo and hising (qubo and ising are always quadratic)
    #[arg(long)]
    pub degree: Option<usize>,
}

#[derive(Debug, Serialize)]
struct AncillaJson {
    index: usize,
    origin: String,
}

#[derive(Debug, Serialize)]
struct ConvertOutput {
    form: Form,
    #[serde(flatten)]
    polynomial: WirePolynomial<usize>,
    /// `[label, index]` for every labelled variable, by index
    mapping: Vec<(Label, usize)>,
    ancillas: Vec<AncillaJson>,
}

pub fn run(args: ConvertArgs, config: &PboConfig) -> Result<()> {
    let output = match args.input.load(config)? {
        LoadedModel::Binary(m) => convert(&m, &args, config)?,
        LoadedModel::Spin(m) => convert(&m, &args, config)?,
    };
    print_pretty_json(&output)
}

fn convert<D: Domain>(model: &Model<D>, args: &ConvertArgs, config: &PboConfig) -> Result<ConvertOutput> {
    ensure_numeric(model)?;
    let degree = args.degree.or(config.degree);
    let weight = ReductionWeight::Auto;
    let (polynomial, ancillas) = match args.to {
        Form::Qubo => wire(model.to_qubo()?.as_polynomial())?,
        Form::Ising => wire(model.to_ising()?.as_polynomial())?,
        Form::Pubo => wire(&model.to_pubo_with(degree, &weight)?)?,
        Form::Hising => wire(&model.to_hising_with(degree, &weight)?)?,
    };
    debug!(
        target: "cli",
        form = ?args.to,
        terms = polynomial.terms.len(),
        ancillas = ancillas.len(),
        "converted"
    );

    Ok(ConvertOutput {
        form: args.to,
        polynomial,
        mapping: model.reverse_mapping().into_iter().map(|(i, l)| (l, i)).collect(),
        ancillas: ancillas
            .iter()
            .map(|(&index, origin)| AncillaJson {
                index,
                origin: origin.to_string(),
            })
            .collect(),
    })
}

fn wire<T: Domain>(p: &Polynomial<T, usize>) -> Result<(WirePolynomial<usize>, AncillaTable<usize>)> {
    let polynomial = WirePolynomial::from_polynomial(p).context("converting coefficients")?;
    Ok((polynomial, p.ancillas().clone()))
}
