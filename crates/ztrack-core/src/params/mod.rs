//! Declarative, typed tracker parameters.
//!
//! Every tracker owns a [`ParameterSet`] describing its tunable knobs. Sets
//! round-trip through a plain [`ParamMap`] so a saved configuration can be
//! applied to any tracker without special cases.

pub mod set;
pub mod variable;

pub use set::{ParamMap, ParameterSet};
pub use variable::{fold_180, wrap_360, ParamValue, Variable, VariableKind};
