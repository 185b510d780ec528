//! Named reducers.

use crate::encode::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A server-side reducer.
///
/// Reducers appear in two places: as the temporal reduction of an image
/// collection (`reduce.max`, `reduce.mean`) and as the aggregation used when
/// reducing resolution (`Reducer.mean`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    /// Per-pixel maximum.
    Max,
    /// Per-pixel mean.
    Mean,
}

impl Reducer {
    /// Short name used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reducer::Max => "max",
            Reducer::Mean => "mean",
        }
    }

    /// Algorithm reducing a whole collection to one image.
    pub fn collection_algorithm(&self) -> &'static str {
        match self {
            Reducer::Max => "reduce.max",
            Reducer::Mean => "reduce.mean",
        }
    }

    /// Algorithm constructing the reducer object itself.
    pub fn constructor(&self) -> &'static str {
        match self {
            Reducer::Max => "Reducer.max",
            Reducer::Mean => "Reducer.mean",
        }
    }

    /// Reducer object as a graph node.
    pub fn to_node(&self) -> Node {
        Node::Invocation {
            function: self.constructor().to_string(),
            arguments: BTreeMap::new(),
        }
    }
}

impl std::fmt::Display for Reducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
