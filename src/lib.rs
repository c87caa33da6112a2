//! # FlexoPlate IQ
//!
//! Plate intelligence for flexographic printing: find cross-supplier plate
//! equivalents and compute UV exposure times from supplier energy data.
//!
//! The scoring and exposure logic lives in the `flexoplate-iq-core` crate.
//! This crate wires it to a TOML config, a JSON plate catalog, and the
//! `fpiq` command line.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌─────────────────────┐
//! │ plates.json  │──▶│ InMemoryCatalog│──▶│ flexoplate-iq-core   │
//! └──────────────┘   └────────────────┘   │ equivalency/exposure │
//!                                         └──────────┬──────────┘
//!                                                    ▼
//!                                             ┌──────────┐
//!                                             │   CLI    │
//!                                             │  (fpiq)  │
//!                                             └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`catalog_file`] | JSON catalog loading |
//! | [`plates`] | Plate, supplier and family listings, plate detail |
//! | [`equivalency_cmd`] | Equivalent plate search |
//! | [`exposure_cmd`] | Exposure calculation and intensity scaling |
//! | [`logging`] | Tracing subscriber setup |

pub mod catalog_file;
pub mod config;
pub mod equivalency_cmd;
pub mod exposure_cmd;
pub mod logging;
pub mod plates;
