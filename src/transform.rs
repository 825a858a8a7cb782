//! The recursive selection-tree resolution engine.
//!
//! [`Transform`] walks a selection tree depth-first against an in-memory
//! data context, applying the resolvers named by each node's arguments and
//! reassembling results upward. Assembly is governed by a single switch,
//! [`TransformOptions::keep`]: nested mode mirrors the tree's shape, flatten
//! mode writes leaves and sequences into one shared accumulator.

use indexmap::IndexMap;

use crate::ast::Selection;
use crate::resolver::{Registry, ResolveError};
use crate::value::Value;

/// Engine configuration, fixed at construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformOptions {
    /// `true` keeps the nested shape of the selection tree in the output;
    /// `false` (the default) flattens results into a single mapping keyed by
    /// field name or alias
    pub keep: bool,
}

/// The shape of the value a node resolved to, decided once per node.
///
/// Sequence-scoped nodes do not recurse into child selections beyond one
/// level of field projection; record-scoped nodes resolve every child
/// independently against the same value. The asymmetry is deliberate,
/// documented behavior.
enum Scope {
    Sequence(Vec<Value>),
    Record(Value),
}

impl Scope {
    fn of(value: Value) -> Scope {
        match value {
            Value::Array(items) => Scope::Sequence(items),
            other => Scope::Record(other),
        }
    }
}

/// The selection-tree resolution engine.
///
/// Resolution is a single synchronous depth-first pass with no partial
/// results: the first resolver error aborts the whole call. The flatten-mode
/// accumulator is allocated fresh per top-level call, so independent calls
/// (including reentrant ones) never share state.
///
/// # Examples
///
/// ```
/// use graft::{Selection, Transform, TransformOptions, json_to_value};
///
/// let data = json_to_value(serde_json::json!({
///     "items": [
///         { "id": 1, "price": 5 },
///         { "id": 2, "price": 1 }
///     ]
/// }));
///
/// // items(orderBy: "price", first: "") { id price }
/// let query = Selection::field("items")
///     .argument("orderBy", "price")
///     .argument("first", "");
///
/// let engine = Transform::new(TransformOptions { keep: true });
/// let result = engine.resolve(&query, &data).unwrap();
/// assert_eq!(result, json_to_value(serde_json::json!({
///     "items": { "id": 2, "price": 1 }
/// })));
/// ```
#[derive(Default)]
pub struct Transform {
    options: TransformOptions,
    registry: Registry,
}

impl Transform {
    /// Creates an engine with the default resolver vocabulary.
    pub fn new(options: TransformOptions) -> Self {
        Transform {
            options,
            registry: Registry::new(),
        }
    }

    /// Creates an engine around a pre-populated resolver registry.
    pub fn with_registry(options: TransformOptions, registry: Registry) -> Self {
        Transform { options, registry }
    }

    /// Register a custom resolver by argument name.
    ///
    /// Custom resolvers take over the implicit equality-filter fallback for
    /// that name; the fixed vocabulary cannot be shadowed.
    pub fn register_resolver<F>(&mut self, name: impl Into<String>, resolver: F)
    where
        F: Fn(Value, &str) -> Result<Value, ResolveError> + 'static,
    {
        self.registry.register(name, resolver);
    }

    /// Resolve a single root selection against the root data context.
    pub fn resolve(&self, selection: &Selection, data: &Value) -> Result<Value, ResolveError> {
        self.resolve_set(std::slice::from_ref(selection), data)
    }

    /// Resolve a root selection set against the root data context.
    ///
    /// Nested mode returns an object holding exactly the selected output
    /// keys. Flatten mode returns the accumulator: scalar leaves keyed by
    /// alias/name (last writer wins on collision, in selection order) and
    /// sequences keyed by the name of the node that addressed them.
    pub fn resolve_set(
        &self,
        selections: &[Selection],
        data: &Value,
    ) -> Result<Value, ResolveError> {
        let mut flat = IndexMap::new();
        let resolved = self.resolve_selections(selections, data, &mut flat)?;
        if self.options.keep {
            Ok(resolved)
        } else {
            Ok(Value::Object(flat))
        }
    }

    /// Resolve every selection in a set against the same record scope and
    /// reassemble per the configured mode.
    fn resolve_selections(
        &self,
        selections: &[Selection],
        scope: &Value,
        flat: &mut IndexMap<String, Value>,
    ) -> Result<Value, ResolveError> {
        let mut nested = IndexMap::new();

        for node in selections {
            let value = self.resolve_field(node, scope, flat)?;

            if self.options.keep {
                nested.insert(node.output_name().to_string(), value);
                continue;
            }

            match &value {
                // Sequence results land under the addressing node's name
                // rather than nested per-child.
                Value::Array(_) => {
                    flat.insert(node.output_name().to_string(), value);
                }
                // Scalar leaves land under their own alias/name; later
                // writers overwrite earlier ones.
                _ if node.is_leaf() => {
                    flat.insert(node.output_name().to_string(), value);
                }
                // Record-shaped results already wrote their leaves during
                // recursion.
                _ => {}
            }
        }

        if self.options.keep {
            Ok(Value::Object(nested))
        } else {
            Ok(Value::Object(flat.clone()))
        }
    }

    /// Resolve one node: address its field in the record scope, thread the
    /// value through the node's resolvers, then recurse by shape.
    fn resolve_field(
        &self,
        node: &Selection,
        scope: &Value,
        flat: &mut IndexMap<String, Value>,
    ) -> Result<Value, ResolveError> {
        // Missing fields resolve to null and propagate without raising.
        let mut value = scope.get(&node.name).cloned().unwrap_or(Value::Null);

        // Chain resolvers left to right, each output feeding the next input.
        for arg in &node.arguments {
            value = self.registry.apply(&arg.name, value, &arg.value)?;
        }

        // A leaf passes its resolved value through untouched, whatever its
        // runtime shape.
        if node.is_leaf() {
            return Ok(value);
        }

        match Scope::of(value) {
            Scope::Sequence(items) => Ok(Value::Array(project(items, &node.selections))),
            Scope::Record(record) => self.resolve_selections(&node.selections, &record, flat),
        }
    }
}

/// One-level projection of a sequence: keep only the declared child fields
/// of each object-shaped item, dropping items of any other shape.
fn project(items: Vec<Value>, selections: &[Selection]) -> Vec<Value> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => {
                let mut picked = IndexMap::new();
                for sel in selections {
                    if let Some(v) = map.get(&sel.name) {
                        picked.insert(sel.name.clone(), v.clone());
                    }
                }
                Some(Value::Object(picked))
            }
            _ => None,
        })
        .collect()
}
