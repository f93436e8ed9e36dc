//! # Faraday - EV Charging Specification Dataset Curator
//!
//! An interactive tool for curating a structured dataset of electric-vehicle
//! charging specifications. Records are entered through a guided flow,
//! validated against the domain schema, and enriched with a derived
//! charging-power curve before being appended to the JSON dataset.
//!
//! ## Features
//!
//! - **Guided Entry**: Step-by-step record collection with back/exit
//!   navigation at every prompt
//! - **Schema Validation**: Exhaustive, human-readable violation reporting
//! - **Curve Synthesis**: Default DC charging curves from a tiered policy
//!   table keyed by battery capacity and voltage architecture
//! - **Typed Records**: Structured record types with a bit-exact JSON wire
//!   contract
//! - **Configuration**: YAML-based configuration with validation
//!
//! ## Architecture
//!
//! The application follows a modular architecture with clear separation of concerns:
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `record`: Domain model and constants
//! - `curve`: Charging-curve synthesis
//! - `validation`: Record validation engine
//! - `entry`: Guided data-entry state machine
//! - `store`: Dataset store collaborator and JSON-file implementation
//! - `prompt`: Terminal implementation of the entry prompt

pub mod config;
pub mod curve;
pub mod entry;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod record;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use entry::{EntryStateMachine, Flow, SessionOutcome};
pub use error::{FaradayError, Result};
pub use record::VehicleRecord;
pub use validation::ValidationEngine;
