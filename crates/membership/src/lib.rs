//! Fuzzy Membership Functions
//!
//! Provides the eight parametric membership shapes used by the risk engine
//! and the evenly spaced universe they are sampled over.

mod error;
mod shape;
mod universe;

pub use error::MembershipError;
pub use shape::{Shape, ShapeKind};
pub use universe::Universe;
