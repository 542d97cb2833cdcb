//! Shared types and models for the Route Weather Advisory system
//!
//! This crate contains the domain types shared between the advisory core,
//! the (external) web layer, and diagnostic tooling.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
