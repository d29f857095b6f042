// eshop-flow/src/pipeline/execution.rs

//! `Pipeline::run()`: walks the steps and drives their handlers.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, info_span, Instrument, Level};

/// What a phase's handler list decided.
enum PhaseOutcome<Err> {
  Continue,
  Stopped,
  Failed(Err),
}

async fn run_phase<TData, Err>(
  phase: &'static str,
  handlers: Option<&Vec<Handler<TData, Err>>>,
  ctx_data: &ContextData<TData>,
) -> PhaseOutcome<Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  let Some(handlers) = handlers else {
    return PhaseOutcome::Continue;
  };
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    match handler_fn(ctx_data.clone()).await {
      Ok(PipelineControl::Continue) => {}
      Ok(PipelineControl::Stop) => {
        event!(Level::INFO, phase, handler_idx, "Pipeline stopped by handler.");
        return PhaseOutcome::Stopped;
      }
      Err(e) => {
        event!(Level::ERROR, phase, handler_idx, error = %e, "Handler failed.");
        return PhaseOutcome::Failed(e);
      }
    }
  }
  PhaseOutcome::Continue
}

fn has_handlers<H>(handlers: Option<&Vec<H>>) -> bool {
  handlers.is_some_and(|v| !v.is_empty())
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// A required step without any handler fails with [`FlowError::HandlerMissing`]
  /// (converted into `Err`). Handler errors are returned unchanged.
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(
      Level::DEBUG,
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
      "Pipeline execution starting."
    );

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = info_span!(
        "pipeline_step",
        step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx_data.clone()) {
          event!(parent: &step_span, Level::INFO, "Step skipped by its skip condition.");
          continue;
        }
      }

      let before = self.before.get(step_name);
      let on = self.on.get(step_name);
      let after = self.after.get(step_name);

      if !has_handlers(before) && !has_handlers(on) && !has_handlers(after) {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Required step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let outcome = async {
        for (phase, handlers) in [("before", before), ("on", on), ("after", after)] {
          match run_phase(phase, handlers, &ctx_data).await {
            PhaseOutcome::Continue => {}
            other => return other,
          }
        }
        PhaseOutcome::Continue
      }
      .instrument(step_span)
      .await;

      match outcome {
        PhaseOutcome::Continue => {}
        PhaseOutcome::Stopped => return Ok(PipelineResult::Stopped),
        PhaseOutcome::Failed(e) => return Err(e),
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }
}
