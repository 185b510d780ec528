//! Encoding of computation graphs into the Earth Engine REST `Expression`.
//!
//! The REST API accepts a flat table of values plus the id of the result:
//!
//! ```json
//! {
//!   "result": "2",
//!   "values": {
//!     "0": { "functionInvocationValue": { "functionName": "ImageCollection.load",
//!            "arguments": { "id": { "constantValue": "MODIS/006/MOD13A2" } } } },
//!     "1": { "functionInvocationValue": { "functionName": "reduce.max",
//!            "arguments": { "collection": { "valueReference": "0" } } } },
//!     "2": { ... }
//!   }
//! }
//! ```
//!
//! Every function invocation gets an entry in the table and is referenced by
//! id. Constants are inlined. Identical invocations share one entry.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};

/// A node of a server-side computation graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A literal JSON value.
    Constant(Value),
    /// A call to a named server-side algorithm.
    Invocation {
        /// Algorithm name, e.g. `Image.clip`.
        function: String,
        /// Named arguments.
        arguments: BTreeMap<String, Node>,
    },
}

impl Node {
    /// Literal value node.
    pub fn constant(value: impl Into<Value>) -> Self {
        Node::Constant(value.into())
    }

    /// Invocation node with the given named arguments.
    pub fn call<'a>(function: &str, arguments: impl IntoIterator<Item = (&'a str, Node)>) -> Self {
        Node::Invocation {
            function: function.to_string(),
            arguments: arguments
                .into_iter()
                .map(|(name, node)| (name.to_string(), node))
                .collect(),
        }
    }

    /// Algorithm name if this node is an invocation.
    pub fn function(&self) -> Option<&str> {
        match self {
            Node::Invocation { function, .. } => Some(function),
            Node::Constant(_) => None,
        }
    }

    /// Named argument of an invocation.
    pub fn argument(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Invocation { arguments, .. } => arguments.get(name),
            Node::Constant(_) => None,
        }
    }
}

/// An encoded computation, ready to be embedded in a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    /// Id of the value holding the final result.
    pub result: String,
    /// Value table keyed by id.
    pub values: BTreeMap<String, Value>,
}

impl Expression {
    /// Encode a computation graph.
    pub fn encode(root: &Node) -> Self {
        let mut encoder = Encoder::default();
        let result = match root {
            Node::Constant(value) => encoder.intern(json!({ "constantValue": value })),
            Node::Invocation {
                function,
                arguments,
            } => encoder.intern_invocation(function, arguments),
        };

        Expression {
            result,
            values: encoder.values,
        }
    }

    /// Number of entries in the value table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the value table is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Algorithm names in the value table, in id order.
    pub fn function_names(&self) -> Vec<&str> {
        let mut entries: Vec<(usize, &str)> = self
            .values
            .iter()
            .filter_map(|(id, value)| {
                let name = value
                    .get("functionInvocationValue")?
                    .get("functionName")?
                    .as_str()?;
                Some((id.parse().ok()?, name))
            })
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, name)| name).collect()
    }
}

#[derive(Default)]
struct Encoder {
    values: BTreeMap<String, Value>,
    /// Serialized value -> id, for sharing identical entries.
    seen: HashMap<String, String>,
}

impl Encoder {
    fn intern(&mut self, value: Value) -> String {
        let key = value.to_string();
        if let Some(id) = self.seen.get(&key) {
            return id.clone();
        }
        let id = self.values.len().to_string();
        self.values.insert(id.clone(), value);
        self.seen.insert(key, id.clone());
        id
    }

    fn intern_invocation(&mut self, function: &str, arguments: &BTreeMap<String, Node>) -> String {
        let mut encoded = Map::new();
        for (name, node) in arguments {
            encoded.insert(name.clone(), self.encode_argument(node));
        }
        self.intern(json!({
            "functionInvocationValue": {
                "functionName": function,
                "arguments": encoded,
            }
        }))
    }

    fn encode_argument(&mut self, node: &Node) -> Value {
        match node {
            Node::Constant(value) => json!({ "constantValue": value }),
            Node::Invocation {
                function,
                arguments,
            } => {
                let id = self.intern_invocation(function, arguments);
                json!({ "valueReference": id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(id: &str) -> Node {
        Node::call("ImageCollection.load", [("id", Node::constant(id))])
    }

    #[test]
    fn test_single_invocation() {
        let expr = Expression::encode(&load("MODIS/006/MOD13A2"));
        assert_eq!(expr.result, "0");
        assert_eq!(expr.len(), 1);
        assert_eq!(
            expr.values["0"],
            json!({
                "functionInvocationValue": {
                    "functionName": "ImageCollection.load",
                    "arguments": { "id": { "constantValue": "MODIS/006/MOD13A2" } }
                }
            })
        );
    }

    #[test]
    fn test_nested_invocations_are_referenced() {
        let root = Node::call("reduce.max", [("collection", load("MODIS/006/MOD13A2"))]);
        let expr = Expression::encode(&root);

        assert_eq!(expr.result, "1");
        assert_eq!(expr.function_names(), vec!["ImageCollection.load", "reduce.max"]);
        assert_eq!(
            expr.values["1"]["functionInvocationValue"]["arguments"]["collection"],
            json!({ "valueReference": "0" })
        );
    }

    #[test]
    fn test_identical_invocations_are_shared() {
        let bbox = || {
            Node::call(
                "GeometryConstructors.BBox",
                [
                    ("west", Node::constant(-125.48)),
                    ("south", Node::constant(24.86)),
                    ("east", Node::constant(-65.93)),
                    ("north", Node::constant(49.84)),
                ],
            )
        };
        let first = Node::call(
            "Image.clip",
            [("input", Node::call("reduce.mean", [("collection", load("a"))])), ("geometry", bbox())],
        );
        let root = Node::call("Image.clip", [("input", first), ("geometry", bbox())]);

        let expr = Expression::encode(&root);
        let bbox_count = expr
            .function_names()
            .iter()
            .filter(|name| **name == "GeometryConstructors.BBox")
            .count();
        assert_eq!(bbox_count, 1);
        assert_eq!(expr.len(), 5);
    }

    #[test]
    fn test_constant_root() {
        let expr = Expression::encode(&Node::constant(42));
        assert_eq!(expr.values[&expr.result], json!({ "constantValue": 42 }));
    }

    #[test]
    fn test_node_accessors() {
        let node = Node::call("reduce.max", [("collection", load("x"))]);
        assert_eq!(node.function(), Some("reduce.max"));
        assert_eq!(
            node.argument("collection").and_then(Node::function),
            Some("ImageCollection.load")
        );
        assert!(node.argument("missing").is_none());
    }
}
