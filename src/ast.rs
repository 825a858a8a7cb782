//! Selection-tree AST consumed by the resolution engine.
//!
//! The engine does not parse query strings. Any GraphQL-syntax parser can
//! produce this shape; the builder methods below cover the common case of
//! assembling a tree by hand:
//!
//! ```
//! use graft::Selection;
//!
//! // items(orderBy: "price") { id price }
//! let query = Selection::field("items")
//!     .argument("orderBy", "price")
//!     .select(Selection::field("id"))
//!     .select(Selection::field("price"));
//!
//! assert_eq!(query.output_name(), "items");
//! ```

/// A single `(name, value)` argument on a selection node.
///
/// Argument values are always raw strings; numeric or boolean coercion is
/// each resolver's own responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Argument name, which selects the resolver to run
    pub name: String,
    /// Raw argument value as written in the query
    pub value: String,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Argument {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One node of a selection tree.
///
/// A node with a non-empty `selections` list addresses an object or an array
/// of objects in the data; a node with no child selections is a scalar leaf.
/// That decision is structural (driven by the tree), never inferred from the
/// data's runtime shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Field identifier looked up in the data context
    pub name: String,
    /// Optional rename applied to the field in output
    pub alias: Option<String>,
    /// Resolver invocations, applied left to right
    pub arguments: Vec<Argument>,
    /// Child selections; empty means leaf
    pub selections: Vec<Selection>,
}

impl Selection {
    /// Create a leaf selection for `name` with no alias, arguments or children
    pub fn field(name: impl Into<String>) -> Self {
        Selection {
            name: name.into(),
            alias: None,
            arguments: Vec::new(),
            selections: Vec::new(),
        }
    }

    /// Rename the field in output
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Append an argument (resolver invocation)
    pub fn argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.push(Argument::new(name, value));
        self
    }

    /// Append a child selection
    pub fn select(mut self, child: Selection) -> Self {
        self.selections.push(child);
        self
    }

    /// The effective output key: alias if present, else name
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Whether this node is a scalar leaf (no child selections)
    pub fn is_leaf(&self) -> bool {
        self.selections.is_empty()
    }
}
