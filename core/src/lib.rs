// eshop-flow/src/lib.rs

//! A small asynchronous step-pipeline engine.
//!
//! A [`Pipeline`] is an ordered list of named steps. Each step can carry
//! `before`, `on` and `after` handlers that operate on a shared
//! [`ContextData`] and return a [`PipelineControl`] signal:
//!  - steps may be optional (skipped when nothing handles them) or skipped by a predicate,
//!  - any handler can stop the run early,
//!  - the first handler error ends the run and is returned as-is.
//!
//! Pipelines are registered in a [`Registry`] keyed by their context type, so a
//! caller only needs to build the context and hand it to [`Registry::run`].

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::Registry;
