//! Convenient imports for typical `rowbase` usage.
//!
//! ```ignore
//! use rowbase::prelude::*;
//! ```

pub use crate::{
    Dialect, Filter, GenericClient, Model, ModelError, ModelResult, Record, Value,
};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_with_config};
