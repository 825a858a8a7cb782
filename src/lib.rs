pub mod ast;
pub mod convert;
pub mod resolver;
pub mod transform;
pub mod value;

pub use ast::{Argument, Selection};
pub use convert::{json_to_value, value_to_json};
pub use resolver::{Registry, ResolveError, Resolver, ResolverFn};
pub use transform::{Transform, TransformOptions};
pub use value::Value;
