//! oanlp-classify — Utilities for categorising corpus documents.
//! - Distance metrics over numeric vectors
//! - k-nearest-neighbour voting with pluggable weight and distance functions
//! - Tokenisation, reference-marker and stop-word removal, word counts

pub mod distance;
pub mod knn;
pub mod normalise;

pub use distance::{chebyshev, euclidean, manhattan, minkowski, scalar_distance, Distance};
pub use knn::{inverse_distance_weight, uniform_weight, Knn, Neighbour};
pub use normalise::{clean_field, NormalisedDocument, TextNormaliser};
