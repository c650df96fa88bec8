//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.
//!
//! The validation is organized into several submodules:
//! - `trait_def`: Core Validate trait definition
//! - `access_validators`: Policy, hierarchy and entity registry validators
//! - `storage_validators`: Database and logging validators
//! - `tests`: Test suite for all validators

mod access_validators;
mod storage_validators;
mod trait_def;

pub use trait_def::Validate;
