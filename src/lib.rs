//! Schema-driven JSON validation.
//!
//! Feed a decoded value and a JSON Schema (draft-4, plus the common draft-6
//! keywords) and get back every violation, each located by a JSON Pointer.
//! Evaluation walks every keyword of every reachable schema node and never
//! stops at the first failure; a depth guard bounds recursion so cyclic
//! schemas cannot run away.
pub mod engine;
pub mod error;
pub mod format;
pub mod keywords;
pub mod options;
pub mod path_de;
pub mod pointer;
pub mod resolver;
pub mod schema;
pub mod validator;
pub mod value;

pub use engine::{Context, Engine};
pub use error::{ErrorKind, StructuralError, ValidationError};
pub use format::{FormatCheck, Formats};
pub use options::{BigintMode, Options};
pub use pointer::{Pointer, Segment};
pub use resolver::{LocalResolver, Resolve, Resolved};
pub use schema::SchemaNode;
pub use validator::{evaluate, fails, passes, Validator};
pub use value::JsonType;
