// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`SupportCodeLibrary`] produced by a load cycle.

use std::time::Duration;

use derive_more::with_trait::Debug;
use smart_default::SmartDefault;

use crate::{
    definition::{
        Definition, Phase, StepDefinition, TestCaseHookDefinition,
        TestRunHookDefinition,
    },
    finalize::{wrap_definitions, DefinitionFunctionWrapper},
    parameter::ParameterTypeRegistry,
    world::{DefaultWorld, World, WorldConstructor, WorldInit},
};

/// Timeout of steps and hooks not overriding it, unless the support code sets
/// another one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Everything the support code registered during one load cycle.
///
/// Handed out by [`SupportCodeLibraryBuilder::finalize()`] and read-only
/// afterwards: all definitions are wrapped and the "after" hooks are ordered
/// as they should execute, the last registered first.
///
/// [`SupportCodeLibraryBuilder::finalize()`]: crate::SupportCodeLibraryBuilder::finalize
#[derive(Debug, SmartDefault)]
pub struct SupportCodeLibrary<W: World = DefaultWorld> {
    /// Registered steps, in registration order.
    pub(crate) step_definitions: Vec<StepDefinition<W>>,

    /// `Before` hooks, in registration order.
    pub(crate) before_test_case_hook_definitions: Vec<TestCaseHookDefinition<W>>,

    /// `After` hooks, in execution order once finalized.
    pub(crate) after_test_case_hook_definitions: Vec<TestCaseHookDefinition<W>>,

    /// `BeforeAll` hooks, in registration order.
    pub(crate) before_test_run_hook_definitions: Vec<TestRunHookDefinition<W>>,

    /// `AfterAll` hooks, in execution order once finalized.
    pub(crate) after_test_run_hook_definitions: Vec<TestRunHookDefinition<W>>,

    /// Timeout of the definitions not overriding it.
    #[default(DEFAULT_TIMEOUT)]
    pub(crate) default_timeout: Duration,

    /// Decorator of every definition [`Code`].
    ///
    /// [`Code`]: crate::Code
    pub(crate) definition_function_wrapper: Option<DefinitionFunctionWrapper<W>>,

    /// Constructor of the per-scenario [`World`].
    pub(crate) world_constructor: WorldConstructor<W>,

    /// Parameter types usable in step patterns.
    pub(crate) parameter_type_registry: ParameterTypeRegistry,
}

impl<W: World> SupportCodeLibrary<W> {
    /// Returns the registered steps, in registration order.
    #[must_use]
    pub fn step_definitions(&self) -> &[StepDefinition<W>] {
        &self.step_definitions
    }

    /// Iterates over the steps usable with the given [`Phase`], in
    /// registration order.
    pub fn step_definitions_for(
        &self,
        phase: Phase,
    ) -> impl Iterator<Item = &StepDefinition<W>> {
        self.step_definitions.iter().filter(move |s| s.phase.accepts(phase))
    }

    /// Returns the `Before` hooks, in execution order.
    #[must_use]
    pub fn before_test_case_hook_definitions(&self) -> &[TestCaseHookDefinition<W>] {
        &self.before_test_case_hook_definitions
    }

    /// Returns the `After` hooks, in execution order.
    #[must_use]
    pub fn after_test_case_hook_definitions(&self) -> &[TestCaseHookDefinition<W>] {
        &self.after_test_case_hook_definitions
    }

    /// Returns the `BeforeAll` hooks, in execution order.
    #[must_use]
    pub fn before_test_run_hook_definitions(&self) -> &[TestRunHookDefinition<W>] {
        &self.before_test_run_hook_definitions
    }

    /// Returns the `AfterAll` hooks, in execution order.
    #[must_use]
    pub fn after_test_run_hook_definitions(&self) -> &[TestRunHookDefinition<W>] {
        &self.after_test_run_hook_definitions
    }

    /// Returns the timeout of the definitions not overriding it.
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Returns the [`DefinitionFunctionWrapper`] the definitions were wrapped
    /// with, if any.
    #[must_use]
    pub const fn definition_function_wrapper(
        &self,
    ) -> Option<&DefinitionFunctionWrapper<W>> {
        self.definition_function_wrapper.as_ref()
    }

    /// Returns the [`WorldConstructor`] of this library.
    #[must_use]
    pub const fn world_constructor(&self) -> &WorldConstructor<W> {
        &self.world_constructor
    }

    /// Instantiates a new [`World`] for a scenario.
    #[must_use]
    pub fn new_world(&self, init: WorldInit) -> W {
        self.world_constructor.construct(init)
    }

    /// Returns the [`ParameterTypeRegistry`] of this library.
    #[must_use]
    pub const fn parameter_type_registry(&self) -> &ParameterTypeRegistry {
        &self.parameter_type_registry
    }

    /// Wraps every definition and puts the "after" hooks into execution
    /// order.
    ///
    /// Must happen exactly once per library: a second call would wrap the
    /// definitions twice and restore the registration order of the hooks.
    pub(crate) fn seal(&mut self) {
        let definitions = self
            .step_definitions
            .iter_mut()
            .map(erase)
            .chain(self.before_test_case_hook_definitions.iter_mut().map(erase))
            .chain(self.after_test_case_hook_definitions.iter_mut().map(erase))
            .chain(self.before_test_run_hook_definitions.iter_mut().map(erase))
            .chain(self.after_test_run_hook_definitions.iter_mut().map(erase));
        wrap_definitions(definitions, self.definition_function_wrapper.as_ref());

        self.after_test_case_hook_definitions.reverse();
        self.after_test_run_hook_definitions.reverse();
    }
}

/// Views a concrete definition as a [`Definition`] trait object.
fn erase<W, D: Definition<W>>(definition: &mut D) -> &mut dyn Definition<W> {
    definition
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let library = SupportCodeLibrary::<DefaultWorld>::default();

        assert!(library.step_definitions().is_empty());
        assert!(library.before_test_case_hook_definitions().is_empty());
        assert!(library.after_test_run_hook_definitions().is_empty());
        assert_eq!(library.default_timeout(), Duration::from_millis(5000));
        assert!(library.definition_function_wrapper().is_none());
        assert_eq!(library.parameter_type_registry().len(), 5);

        let world = library.new_world(WorldInit::default());
        assert_eq!(world.parameters, serde_json::json!({}));
    }
}
