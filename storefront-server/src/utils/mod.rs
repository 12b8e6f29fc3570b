//! Shared server utilities

pub mod validation;
