//! Markup-level helpers used by the binding parser: interpolation markers and
//! namespaced names.

pub mod defaults;
pub mod tags;

pub use defaults::{default_interpolation_config, InterpolationConfig};
pub use tags::merge_ns_and_name;
