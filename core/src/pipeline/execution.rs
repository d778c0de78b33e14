// src/pipeline/execution.rs

//! `Pipeline::run()`: walks the steps in order and drives each step's handlers.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::handler::Handler;
use crate::core::step::StepDef;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, info_span, instrument, Instrument, Level};

enum StepOutcome {
  Finished,
  Skipped,
  Stopped,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// The first handler error aborts the run and is returned as-is. A step that
  /// is not optional and has no handlers at all fails with
  /// [`FlowError::HandlerMissing`], converted into `Err`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = info_span!(
        "pipeline_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional
      );
      match self.run_step(step_def, &ctx_data).instrument(step_span).await? {
        StepOutcome::Finished | StepOutcome::Skipped => {}
        StepOutcome::Stopped => return Ok(PipelineResult::Stopped),
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: &ContextData<TData>) -> Result<StepOutcome, Err> {
    let step_name = step_def.name.as_str();

    if let Some(skip_if) = &step_def.skip_if {
      if skip_if(ctx_data.clone()) {
        event!(Level::DEBUG, "Step skipped by its skip condition.");
        return Ok(StepOutcome::Skipped);
      }
    }

    let before = self.before.get(step_name).filter(|v| !v.is_empty());
    let on = self.on.get(step_name).filter(|v| !v.is_empty());
    let after = self.after.get(step_name).filter(|v| !v.is_empty());

    if before.is_none() && on.is_none() && after.is_none() {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(StepOutcome::Skipped);
      }
      event!(Level::ERROR, "Non-optional step has no handlers.");
      return Err(Err::from(FlowError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for (phase, handlers) in [("before", before), ("on", on), ("after", after)] {
      let Some(handlers) = handlers else { continue };
      if !run_phase(phase, handlers, ctx_data).await? {
        event!(Level::INFO, phase, "Pipeline stopped by a handler.");
        return Ok(StepOutcome::Stopped);
      }
    }

    event!(Level::DEBUG, "Step finished.");
    Ok(StepOutcome::Finished)
  }
}

/// Runs one phase's handlers in registration order. Returns `false` when a
/// handler asked the pipeline to stop.
async fn run_phase<TData, Err>(
  phase: &'static str,
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<bool, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    event!(Level::TRACE, phase, handler_index = handler_idx, "Running handler.");
    match handler_fn(ctx_data.clone()).await {
      Ok(PipelineControl::Continue) => {}
      Ok(PipelineControl::Stop) => return Ok(false),
      Err(e) => {
        event!(Level::ERROR, phase, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(true)
}
