//! JSON documents: model input and canonical polynomial output.
//!
//! A model document lists terms as `[key, coefficient]` pairs, where the key
//! is an array of labels (integers or strings) and the coefficient is a
//! number or a parameter name:
//!
//! ```json
//! {
//!   "domain": "spin",
//!   "objective": [[["a"], -1], [["a", "b"], -3], [[], -2]],
//!   "constraints": [
//!     { "relation": "le", "polynomial": [[["a"], 1], [[], -1]], "lam": 10 }
//!   ]
//! }
//! ```
//!
//! Output polynomials carry plain floating point coefficients so any client
//! can read them; solutions come back through `convert_solution`.

use pbo_coeff::{Coefficient, Number};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Binary, Domain, DomainKind, Spin};
use crate::error::{PbError, Result};
use crate::label::{Label, Variable};
use crate::model::{ConstraintKind, ConstraintOptions, Hoio, Model, Pcbo};
use crate::polynomial::Polynomial;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireCoefficient {
    Int(i64),
    Float(f64),
    Param(String),
}

impl From<&WireCoefficient> for Coefficient {
    fn from(c: &WireCoefficient) -> Self {
        match c {
            WireCoefficient::Int(n) => Coefficient::from(*n),
            WireCoefficient::Float(x) => Coefficient::from(*x),
            WireCoefficient::Param(name) => Coefficient::param(name),
        }
    }
}

/// `[key, coefficient]`; the key stays untyped until validated.
pub type WireEntry = (Value, WireCoefficient);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintDocument {
    pub relation: ConstraintKind,
    pub polynomial: Vec<WireEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lam: Option<WireCoefficient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_trick: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDocument {
    pub domain: DomainKind,
    pub objective: Vec<WireEntry>,
    #[serde(default)]
    pub constraints: Vec<ConstraintDocument>,
}

/// A model in whichever domain its document declared.
#[derive(Debug, Clone)]
pub enum LoadedModel {
    Binary(Pcbo),
    Spin(Hoio),
}

impl LoadedModel {
    pub fn kind(&self) -> DomainKind {
        match self {
            LoadedModel::Binary(_) => DomainKind::Binary,
            LoadedModel::Spin(_) => DomainKind::Spin,
        }
    }
}

fn parse_key(key: &Value) -> Result<Vec<Label>> {
    let Value::Array(items) = key else {
        return Err(PbError::InvalidKey(key.to_string()));
    };
    items
        .iter()
        .map(|item| match item {
            Value::Number(_) | Value::String(_) => {
                Label::deserialize(item.clone()).map_err(|_| PbError::InvalidKey(key.to_string()))
            }
            _ => Err(PbError::InvalidKey(key.to_string())),
        })
        .collect()
}

/// Build a polynomial from wire entries. Keys are checked before anything is
/// accumulated.
pub fn polynomial_from_entries<D: Domain>(entries: &[WireEntry]) -> Result<Polynomial<D, Label>> {
    let parsed = entries
        .iter()
        .map(|(key, c)| Ok((parse_key(key)?, Coefficient::from(c))))
        .collect::<Result<Vec<_>>>()?;
    Ok(Polynomial::from_terms(parsed))
}

impl ModelDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PbError::MalformedInput(e.to_string()))
    }

    /// Compile the document; absent per-constraint options come from `defaults`.
    pub fn into_model(self, defaults: &ConstraintOptions) -> Result<LoadedModel> {
        match self.domain {
            DomainKind::Binary => Ok(LoadedModel::Binary(self.build::<Binary>(defaults)?)),
            DomainKind::Spin => Ok(LoadedModel::Spin(self.build::<Spin>(defaults)?)),
        }
    }

    fn build<D: Domain>(&self, defaults: &ConstraintOptions) -> Result<Model<D>> {
        let mut model = Model::from(polynomial_from_entries::<D>(&self.objective)?);
        for c in &self.constraints {
            let p = polynomial_from_entries::<D>(&c.polynomial)?;
            let mut opts = defaults.clone();
            if let Some(lam) = &c.lam {
                opts.lam = Coefficient::from(lam);
            }
            if let Some(log_trick) = c.log_trick {
                opts.log_trick = log_trick;
            }
            if let Some((lo, hi)) = c.bounds {
                opts.bounds = Some((Number::from(lo), Number::from(hi)));
            }
            model.add_constraint(c.relation, &p, &opts)?;
        }
        Ok(model)
    }
}

/// Parse and compile a JSON model document.
pub fn load_model(json: &str, defaults: &ConstraintOptions) -> Result<LoadedModel> {
    ModelDocument::from_json(json)?.into_model(defaults)
}

/// Numeric polynomial in a form any JSON reader understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePolynomial<V> {
    pub domain: DomainKind,
    pub terms: Vec<(Vec<V>, f64)>,
}

impl<V: Variable> WirePolynomial<V> {
    /// Fails on unresolved parameters.
    pub fn from_polynomial<D: Domain>(p: &Polynomial<D, V>) -> Result<Self> {
        let terms = p
            .numeric_terms()?
            .into_iter()
            .map(|(t, c)| (t.vars().to_vec(), c.to_f64()))
            .collect();
        Ok(Self {
            domain: D::KIND,
            terms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly;
    use crate::polynomial::HIsing;

    const EXAMPLE: &str = r#"{
        "domain": "spin",
        "objective": [[["a"], -1], [["b"], 2], [["a", "b"], -3], [["b", "c"], -4], [[], -2]]
    }"#;

    #[test]
    fn loads_spin_objective() {
        let loaded = load_model(EXAMPLE, &ConstraintOptions::new()).unwrap();
        let LoadedModel::Spin(model) = loaded else {
            panic!("expected a spin model");
        };
        let expected: HIsing = poly! { ["a"] => -1, ["b"] => 2, ["a", "b"] => -3, ["b", "c"] => -4, [] => -2 };
        assert_eq!(*model.objective(), expected);
    }

    #[test]
    fn integer_and_ancilla_labels() {
        let entries: Vec<WireEntry> = vec![
            (serde_json::json!([0, "x"]), WireCoefficient::Int(1)),
            (serde_json::json!(["__a3"]), WireCoefficient::Float(0.5)),
        ];
        let p = polynomial_from_entries::<Binary>(&entries).unwrap();
        assert_eq!(p.coefficient([Label::Int(0), Label::from("x")]), Coefficient::from(1));
        assert_eq!(p.coefficient([Label::Ancilla(3)]), Coefficient::from(0.5));
    }

    #[test]
    fn non_sequence_key_is_invalid() {
        let json = r#"{ "domain": "spin", "objective": [[0, -1]] }"#;
        assert!(matches!(
            load_model(json, &ConstraintOptions::new()),
            Err(PbError::InvalidKey(_))
        ));
        let json = r#"{ "domain": "spin", "objective": [[[[0]], -1]] }"#;
        assert!(matches!(
            load_model(json, &ConstraintOptions::new()),
            Err(PbError::InvalidKey(_))
        ));
    }

    #[test]
    fn syntax_errors_are_malformed_input() {
        assert!(matches!(
            load_model("{ not json", &ConstraintOptions::new()),
            Err(PbError::MalformedInput(_))
        ));
        let json = r#"{ "domain": "ternary", "objective": [] }"#;
        assert!(matches!(
            load_model(json, &ConstraintOptions::new()),
            Err(PbError::MalformedInput(_))
        ));
    }

    #[test]
    fn constraints_use_document_options() {
        let json = r#"{
            "domain": "binary",
            "objective": [[["x"], -1], [["y"], -1]],
            "constraints": [
                { "relation": "le", "polynomial": [[["x"], 1], [["y"], 1], [[], -1]], "lam": "lam" }
            ]
        }"#;
        let LoadedModel::Binary(model) = load_model(json, &ConstraintOptions::new()).unwrap() else {
            panic!("expected a binary model");
        };
        assert_eq!(model.constraints().len(), 1);
        assert!(model.params().contains("lam"));
        assert_eq!(model.ancillas().len(), 1);
    }

    #[test]
    fn wire_polynomial_uses_plain_numbers() {
        let h: HIsing = poly! { ["a"] => Number::ratio(1, 2), [] => -2 };
        let wire = WirePolynomial::from_polynomial(&h.to_indexed()).unwrap();
        assert_eq!(wire.domain, DomainKind::Spin);
        assert_eq!(wire.terms, vec![(vec![], -2.0), (vec![0usize], 0.5)]);
        let json = serde_json::to_string(&wire).unwrap();
        assert_eq!(json, r#"{"domain":"spin","terms":[[[],-2.0],[[0],0.5]]}"#);
    }
}
