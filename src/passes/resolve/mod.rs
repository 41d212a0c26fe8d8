//! Passes over the built class graph, in the order they must run.

mod cycles;
mod inherit_doc;
mod lint;
mod return_values;
mod versions;

pub use cycles::CircularDeps;
pub use inherit_doc::InheritDoc;
pub use lint::Lint;
pub use return_values::{ReturnValues, SELF_RETURN_TYPE};
pub use versions::Versions;
