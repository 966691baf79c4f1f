//! Dimension identity model.
//!
//! Every [`Dimension`] has a local id and, when owned by a
//! [`CoordinateSystem`], a global id of the form `owner#local`. Global ids
//! let dimensions from independently authored coordinate systems be told
//! apart while still recognising the same axis under different owners.
//!
//! # Example
//!
//! ```
//! use coordreg::identity::{CoordinateSystem, DimensionKind};
//!
//! let mut cs = CoordinateSystem::new("physical").unwrap();
//! cs.add_dimension("micrometer", None, Some("x")).unwrap();
//! let t = cs.add_dimension("second", None, None).unwrap();
//!
//! assert_eq!(t.global_id(), "physical#dim_0");
//! assert_eq!(t.kind(), DimensionKind::Time);
//! ```

mod coordinate_system;
mod dimension;
mod error;
mod ids;

pub use coordinate_system::{extract_owner_id, CoordinateSystem};
pub use dimension::{Dimension, DimensionBuilder, DimensionKind, INDEX_UNIT};
pub use error::IdentityError;
pub use ids::{join_global_id, parse_global_id, NAMESPACE_SEPARATOR};
