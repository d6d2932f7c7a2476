//! Variable labels.
//!
//! User models name variables with integers or strings. Slack bits created by
//! the constraint compiler get `Ancilla` labels, which can never collide with
//! user labels. Canonical forms use plain `usize` indices instead.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

const ANCILLA_PREFIX: &str = "__a";

/// Anything usable as a polynomial variable.
pub trait Variable: Clone + Ord + Hash + fmt::Debug + fmt::Display {}

impl<T> Variable for T where T: Clone + Ord + Hash + fmt::Debug + fmt::Display {}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Int(i64),
    Name(String),
    /// Engine-generated slack bit
    Ancilla(u32),
}

impl Label {
    pub fn name(s: impl Into<String>) -> Self {
        Label::Name(s.into())
    }

    pub fn is_ancilla(&self) -> bool {
        matches!(self, Label::Ancilla(_))
    }

    /// Parse the textual form; `__a<n>` maps back to an ancilla.
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix(ANCILLA_PREFIX).and_then(|n| n.parse().ok()) {
            Some(n) => Label::Ancilla(n),
            None => Label::Name(s.to_string()),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(n) => write!(f, "{}", n),
            Label::Name(s) => write!(f, "{}", s),
            Label::Ancilla(n) => write!(f, "{}{}", ANCILLA_PREFIX, n),
        }
    }
}

impl From<i64> for Label {
    fn from(n: i64) -> Self {
        Label::Int(n)
    }
}

impl From<i32> for Label {
    fn from(n: i32) -> Self {
        Label::Int(n as i64)
    }
}

impl From<usize> for Label {
    fn from(n: usize) -> Self {
        Label::Int(n as i64)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Name(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Name(s)
    }
}

impl From<char> for Label {
    fn from(c: char) -> Self {
        Label::Name(c.to_string())
    }
}

// JSON form: integers stay integers, everything else is a string.
impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Label::Int(n) => serializer.serialize_i64(*n),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        match Raw::deserialize(deserializer) {
            Ok(Raw::Int(n)) => Ok(Label::Int(n)),
            Ok(Raw::Str(s)) => Ok(Label::parse(&s)),
            Err(_) => Err(de::Error::custom("label must be an integer or a string")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancilla_text_round_trips() {
        let a = Label::Ancilla(7);
        assert_eq!(a.to_string(), "__a7");
        assert_eq!(Label::parse("__a7"), a);
        assert_eq!(Label::parse("__ax"), Label::name("__ax"));
    }

    #[test]
    fn json_round_trip() {
        let labels = vec![Label::Int(3), Label::name("b"), Label::Ancilla(0)];
        let json = serde_json::to_string(&labels).unwrap();
        assert_eq!(json, r#"[3,"b","__a0"]"#);
        let back: Vec<Label> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, labels);
    }

    #[test]
    fn non_scalar_label_is_rejected() {
        assert!(serde_json::from_str::<Label>("[1]").is_err());
    }
}
