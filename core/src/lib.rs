// src/lib.rs

//! shopkeep-flow: small async step pipelines for multi-step store operations.
//!
//! A pipeline is an ordered list of named steps. Each step can carry `before`,
//! `on` and `after` handlers that all receive the same shared context. The
//! pipeline runs the steps in declaration order and halts on the first error
//! or on an explicit [`PipelineControl::Stop`]. Steps can be marked optional
//! and can be skipped at runtime through a condition evaluated against the
//! context.
//!
//! Callers usually register one pipeline per context type in a [`Workflows`]
//! registry and dispatch by handing the registry a [`ContextData`].

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::Workflows;

/*
    Typical use:
    1. Define a context struct `MyCtx` holding the inputs and the values each step produces.
    2. Create a `Pipeline<MyCtx, MyError>` listing the step names in order.
    3. Attach async handlers with `.on_root()`, `.before_root()` or `.after_root()`.
    4. Register the pipeline in a `Workflows<MyError>` registry.
    5. Wrap a fresh `MyCtx` in `ContextData::new` and call `workflows.run(ctx.clone()).await`,
       then read the results back out of `ctx`.
*/
