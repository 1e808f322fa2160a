//! k-nearest-neighbour voting over labelled vectors.

use oanlp_common::{OaNlpError, Result};
use std::collections::BTreeMap;
use tracing::debug;

use crate::distance::euclidean;

/// Every neighbour votes 1.
pub fn uniform_weight(_query: &[f64], _neighbour: &[f64]) -> f64 {
    1.0
}

/// Closer neighbours vote more: 1 / (1 + euclidean distance).
pub fn inverse_distance_weight(query: &[f64], neighbour: &[f64]) -> f64 {
    euclidean(query, neighbour).map(|d| 1.0 / (1.0 + d)).unwrap_or(0.0)
}

/// One of the k closest training points.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbour<'a> {
    pub distance: f64,
    pub label: &'a str,
    pub vector: &'a [f64],
}

#[derive(Debug, Clone)]
pub struct Knn {
    training: Vec<(String, Vec<f64>)>,
    k: usize,
    dimension: Option<usize>,
}

impl Knn {
    /// Labels may repeat; duplicates add voting weight.
    pub fn new<L: Into<String>>(training: Vec<(L, Vec<f64>)>, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(OaNlpError::InvalidInput("k must be at least 1".into()));
        }
        let training: Vec<(String, Vec<f64>)> =
            training.into_iter().map(|(label, v)| (label.into(), v)).collect();

        let dimension = training.first().map(|(_, v)| v.len());
        if let Some(expected) = dimension {
            if let Some((_, v)) = training.iter().find(|(_, v)| v.len() != expected) {
                return Err(OaNlpError::DimensionMismatch { expected, actual: v.len() });
            }
        }
        Ok(Self { training, k, dimension })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.training.len()
    }

    pub fn is_empty(&self) -> bool {
        self.training.is_empty()
    }

    fn check_query(&self, query: &[f64]) -> Result<()> {
        match self.dimension {
            Some(expected) if expected != query.len() => {
                Err(OaNlpError::DimensionMismatch { expected, actual: query.len() })
            }
            _ => Ok(()),
        }
    }

    /// The k closest training points in ascending distance; ties keep training order.
    pub fn nearest<D>(&self, query: &[f64], distance_fn: D) -> Result<Vec<Neighbour<'_>>>
    where
        D: Fn(&[f64], &[f64]) -> Result<f64>,
    {
        self.check_query(query)?;
        let mut scored = self
            .training
            .iter()
            .map(|(label, v)| {
                Ok(Neighbour { distance: distance_fn(query, v)?, label: label.as_str(), vector: v.as_slice() })
            })
            .collect::<Result<Vec<_>>>()?;

        // sort_by is stable
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(self.k);
        Ok(scored)
    }

    /// Uniform weights, euclidean distance.
    pub fn calculate(&self, query: &[f64]) -> Result<Vec<(f64, String)>> {
        self.calculate_with(query, uniform_weight, euclidean)
    }

    /// Accumulated weight per category among the k nearest, heaviest first.
    /// Ties are ordered by label.
    pub fn calculate_with<W, D>(&self, query: &[f64], weight_fn: W, distance_fn: D) -> Result<Vec<(f64, String)>>
    where
        W: Fn(&[f64], &[f64]) -> f64,
        D: Fn(&[f64], &[f64]) -> Result<f64>,
    {
        let neighbours = self.nearest(query, distance_fn)?;

        let mut votes: BTreeMap<&str, f64> = BTreeMap::new();
        for n in &neighbours {
            *votes.entry(n.label).or_insert(0.0) += weight_fn(query, n.vector);
        }

        let mut ranked: Vec<(f64, String)> =
            votes.into_iter().map(|(label, w)| (w, label.to_string())).collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        debug!(k = self.k, neighbours = neighbours.len(), categories = ranked.len(), "knn votes");
        Ok(ranked)
    }

    /// The winning `(weight, category)`, or `None` for an empty training set.
    pub fn classify(&self, query: &[f64]) -> Result<Option<(f64, String)>> {
        Ok(self.calculate(query)?.into_iter().next())
    }

    pub fn classify_with<W, D>(&self, query: &[f64], weight_fn: W, distance_fn: D) -> Result<Option<(f64, String)>>
    where
        W: Fn(&[f64], &[f64]) -> f64,
        D: Fn(&[f64], &[f64]) -> Result<f64>,
    {
        Ok(self.calculate_with(query, weight_fn, distance_fn)?.into_iter().next())
    }
}
