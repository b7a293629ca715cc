//! umlsync Core Types and Definitions
//!
//! This crate provides the model side of umlsync, independent of any
//! document format:
//!
//! - **Descriptors**: The structural model of a class ([`descriptor::ClassDescriptor`])
//! - **Model**: Ordered descriptors with resolved associations ([`model::ClassModel`])
//! - **Metrics**: Label size estimation ([`metrics`] module)
//! - **Markup**: HTML label helpers ([`markup`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)

pub mod descriptor;
pub mod geometry;
pub mod markup;
pub mod metrics;
pub mod model;
