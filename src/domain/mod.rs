//! Domain model
pub mod aggregates;
pub mod issues;
pub mod value_objects;
