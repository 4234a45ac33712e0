//! Ensemble manifests
//!
//! A manifest records the members of a finished ensemble and the rendered
//! composite. It is written as canonical JSON (sorted keys, no whitespace)
//! so its BLAKE3 hash is reproducible.

use combo_core::{render, OutputFormat, RenderOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::Result;
use crate::ensemble::Ensemble;
use crate::scorer::WeightedScorer;

/// One retained member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMember {
    /// Canonical combo text, always without labels
    pub tree: String,
    pub weight: f64,
    pub score: f64,
}

/// Description of a finished ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleManifest {
    pub version: String,
    pub strategy: String,
    pub format: String,
    pub members: Vec<ManifestMember>,
    pub bias: f64,
    pub flat_score: f64,
    /// Composite rendered in `format`; absent for an empty ensemble
    pub composite: Option<String>,
}

impl EnsembleManifest {
    pub fn from_ensemble<S: WeightedScorer>(
        ensemble: &Ensemble<S>,
        format: OutputFormat,
        opts: &RenderOptions<'_>,
    ) -> Result<Self> {
        let params = ensemble.params();
        let strategy = match (params.experts, params.exact_experts) {
            (false, _) => "adaboost",
            (true, true) => "exact_experts",
            (true, false) => "inexact_experts",
        };

        let members = ensemble
            .members()
            .iter()
            .map(|m| ManifestMember {
                tree: m.tree().to_string(),
                weight: m.weight(),
                score: m.score(),
            })
            .collect();

        let composite = ensemble
            .weighted_tree()
            .map(|tree| render(&tree, format, opts))
            .transpose()?;

        Ok(Self {
            version: crate::VERSION.to_string(),
            strategy: strategy.to_string(),
            format: format.to_string(),
            members,
            bias: ensemble.bias() * params.bias_scale,
            flat_score: ensemble.flat_score()?,
            composite,
        })
    }

    pub fn to_canonical_json(&self) -> Result<String> {
        to_canonical_json(self)
    }

    pub fn hash_hex(&self) -> Result<String> {
        let json = self.to_canonical_json()?;
        Ok(hex::encode(blake3::hash(json.as_bytes()).as_bytes()))
    }
}

/// Serialize a value to canonical JSON (sorted keys, no whitespace)
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let json_value = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&canonicalize_value(&json_value))?)
}

/// Canonicalize a JSON value by sorting all object keys recursively
fn canonicalize_value(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut btree = BTreeMap::new();
            for (k, v) in map {
                btree.insert(k.clone(), canonicalize_value(v));
            }
            serde_json::Value::Object(btree.into_iter().collect())
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(canonicalize_value).collect())
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorts_keys() {
        let value = json!({"zeta": 1, "alpha": {"b": 2, "a": [ {"y": 1, "x": 0} ]}});
        let out = to_canonical_json(&value).unwrap();
        assert_eq!(out, r#"{"alpha":{"a":[{"x":0,"y":1}],"b":2},"zeta":1}"#);
    }

    #[test]
    fn test_hash_is_stable() {
        let manifest = EnsembleManifest {
            version: "0.1.0".to_string(),
            strategy: "adaboost".to_string(),
            format: "combo".to_string(),
            members: vec![ManifestMember {
                tree: "and($1 $2)".to_string(),
                weight: 1.0,
                score: 0.0,
            }],
            bias: 0.0,
            flat_score: 0.0,
            composite: Some("and($1 $2)".to_string()),
        };
        let h1 = manifest.hash_hex().unwrap();
        let h2 = manifest.clone().hash_hex().unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);

        let mut other = manifest;
        other.members[0].weight = 0.5;
        assert_ne!(other.hash_hex().unwrap(), h1);
    }
}
