//! # FlexoPlate IQ Core
//!
//! Pure logic for FlexoPlate IQ: plate data model, catalog abstraction,
//! equivalency scoring, and UV exposure calculation.
//!
//! This crate performs no filesystem or network I/O and holds no global
//! state. Callers hand in materialized [`models::PlateSpec`] values (or a
//! [`catalog::Catalog`] implementation) together with explicit
//! [`weights::EquivalencyWeights`], and get freshly allocated results back.

pub mod catalog;
pub mod equivalency;
pub mod error;
pub mod exposure;
pub mod models;
pub mod similarity;
pub mod weights;

pub use error::{CoreError, Result};
