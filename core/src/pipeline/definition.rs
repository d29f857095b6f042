// eshop-flow/src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` struct and its structural operations.

use crate::core::context::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::FlowError;
use std::collections::HashMap;

/// An ordered set of named steps over a root data type `TData`.
///
/// Handlers return `Result<_, Err>`. `Err` must be constructible from
/// [`FlowError`] so that engine-level failures (a required step nobody handles)
/// come back through the same error channel as handler failures.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,

  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Builds a pipeline from `(name, optional, skip_if)` tuples, in execution order.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  /// Step names in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  fn position_of(&self, step_name: &str) -> Option<usize> {
    self.steps.iter().position(|s| s.name == step_name)
  }

  /// Panics on an unknown step. Wiring a handler to a misspelled step is a setup bug.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) -> usize {
    match self.position_of(step_name) {
      Some(idx) => idx,
      None => panic!("Pipeline setup error: step '{}' is not defined.", step_name),
    }
  }

  fn ensure_step_not_exists(&self, step_name: &str) {
    if self.position_of(step_name).is_some() {
      panic!("Pipeline setup error: step '{}' is already defined.", step_name);
    }
  }

  pub fn insert_before_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    let idx = self.ensure_step_exists(existing_step_name);
    let name: String = new_step_name.into();
    self.ensure_step_not_exists(&name);
    self.steps.insert(idx, StepDef { name, optional, skip_if });
  }

  pub fn insert_after_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    let idx = self.ensure_step_exists(existing_step_name);
    let name: String = new_step_name.into();
    self.ensure_step_not_exists(&name);
    self.steps.insert(idx + 1, StepDef { name, optional, skip_if });
  }

  /// Removes a step together with its handlers. Unknown names are a no-op.
  pub fn remove_step(&mut self, step_name: &str) {
    if let Some(idx) = self.position_of(step_name) {
      self.steps.remove(idx);
      self.before.remove(step_name);
      self.on.remove(step_name);
      self.after.remove(step_name);
    }
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) {
    let idx = self.ensure_step_exists(step_name);
    self.steps[idx].optional = optional;
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    let idx = self.ensure_step_exists(step_name);
    self.steps[idx].skip_if = skip_if;
  }

  /// Fails with [`FlowError::StepNotFound`] instead of panicking; for callers that
  /// take step names from configuration.
  pub fn try_step(&self, step_name: &str) -> Result<&StepDef<TData>, FlowError> {
    self
      .position_of(step_name)
      .map(|idx| &self.steps[idx])
      .ok_or_else(|| FlowError::StepNotFound {
        step_name: step_name.to_string(),
      })
  }
}
