//! Core module - shared infrastructure for Switchboard
//!
//! This module contains foundational types, configuration, the registration
//! table and error handling used throughout the application.

pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use config::Config;
pub use error::{Result, SwitchboardError};
pub use registry::{ComponentClass, Registry, RegistryEntry};
pub use types::*;
