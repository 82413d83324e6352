// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`SupportCodeLibraryBuilder`] driving a load cycle of support code.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use cucumber_support::{Code, SupportCodeLibraryBuilder};
//!
//! # fn main() -> cucumber_support::Result<()> {
//! let mut builder: SupportCodeLibraryBuilder = SupportCodeLibraryBuilder::new();
//!
//! builder.reset("/project");
//! builder.given("I have {int} cucumbers", Code::step_sync(|_, _| {}))?;
//! builder.after(Code::test_case_hook_sync(|_, _| {}))?;
//! builder.set_default_timeout(Duration::from_secs(10))?;
//!
//! let library = builder.finalize()?;
//! assert_eq!(library.step_definitions().len(), 1);
//! assert_eq!(library.default_timeout(), Duration::from_secs(10));
//! # Ok(())
//! # }
//! ```

use std::{
    mem,
    path::{Path, PathBuf},
    time::Duration,
};

use derive_more::with_trait::Debug;
use smart_default::SmartDefault;

use crate::{
    code::Code,
    definition::{
        build_step_definition, build_test_case_hook_definition,
        build_test_run_hook_definition, Pattern, Phase, StepOptions,
        TestCaseHookDefinition, TestCaseHookOptions, TestRunHookDefinition,
        TestRunHookOptions, WrapperOptions,
    },
    error::{LifecycleError, Result},
    finalize::DefinitionFunctionWrapper,
    library::SupportCodeLibrary,
    parameter::{build_parameter_type, ParameterTypeOptions},
    world::{DefaultWorld, World, WorldConstructor, WorldInit},
};

/// Lifecycle state of a [`SupportCodeLibraryBuilder`].
#[derive(Debug, SmartDefault)]
enum State<W: World> {
    /// Never reset.
    #[default]
    Idle,

    /// Accepting registrations.
    Loaded {
        /// Working directory source locations are relative to.
        cwd: PathBuf,

        /// Library being filled.
        library: SupportCodeLibrary<W>,
    },

    /// Library handed out, waiting for the next reset.
    Finalized,
}

/// Whether a hook runs before or after the thing it hooks.
#[derive(Clone, Copy, Debug)]
enum Position {
    Before,
    After,
}

/// Registration facade the support code is loaded through.
///
/// One builder may serve any number of consecutive load cycles:
/// [`reset()`] starts a new cycle with a blank [`SupportCodeLibrary`], the
/// registration methods fill it, and [`finalize()`] hands it out. Calling a
/// registration method outside of a cycle is a [`LifecycleError`].
///
/// The builder is meant for a single loader at a time. Independent
/// libraries loaded concurrently need a builder each.
///
/// [`finalize()`]: Self::finalize
/// [`reset()`]: Self::reset
#[derive(Debug, SmartDefault)]
pub struct SupportCodeLibraryBuilder<W: World = DefaultWorld> {
    /// Current lifecycle state.
    state: State<W>,
}

impl<W: World> SupportCodeLibraryBuilder<W> {
    /// Creates a new [`SupportCodeLibraryBuilder`], which has to be
    /// [`reset()`] before registering anything.
    ///
    /// [`reset()`]: Self::reset
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load cycle, dropping everything registered before.
    ///
    /// Source locations of the definitions are made relative to the given
    /// `cwd`.
    pub fn reset(&mut self, cwd: impl Into<PathBuf>) {
        let cwd = cwd.into();
        tracing::debug!(cwd = %cwd.display(), "support code library reset");

        self.state = State::Loaded { cwd, library: SupportCodeLibrary::default() };
    }

    /// Indicates whether this builder accepts registrations.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded { .. })
    }

    /// Returns the working directory of the current load cycle, if any.
    #[must_use]
    pub fn cwd(&self) -> Option<&Path> {
        match &self.state {
            State::Loaded { cwd, .. } => Some(cwd),
            State::Idle | State::Finalized => None,
        }
    }

    /// Registers a custom parameter type.
    ///
    /// # Errors
    ///
    /// - If the `options` are malformed.
    /// - If the parameter type conflicts with an already registered one.
    /// - If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    pub fn define_parameter_type(&mut self, options: ParameterTypeOptions) -> Result<()> {
        let (_, library) = self.loaded("define_parameter_type")?;
        let parameter_type = build_parameter_type(options)?;
        library.parameter_type_registry.define_parameter_type(parameter_type)?;
        Ok(())
    }

    /// Registers a step usable with any verb, with default [`StepOptions`].
    ///
    /// # Errors
    ///
    /// - If the `pattern` is malformed.
    /// - If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    #[track_caller]
    pub fn define_step(&mut self, pattern: impl Into<Pattern>, code: Code<W>) -> Result<()> {
        self.push_step("define_step", pattern, StepOptions::default(), code)
    }

    /// Registers a step with the given [`StepOptions`].
    ///
    /// # Errors
    ///
    /// - If the `pattern` is malformed.
    /// - If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    #[track_caller]
    pub fn define_step_with(
        &mut self,
        pattern: impl Into<Pattern>,
        options: StepOptions,
        code: Code<W>,
    ) -> Result<()> {
        self.push_step("define_step", pattern, options, code)
    }

    /// Registers a [Given] step.
    ///
    /// # Errors
    ///
    /// Same as [`define_step()`](Self::define_step).
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[track_caller]
    pub fn given(&mut self, pattern: impl Into<Pattern>, code: Code<W>) -> Result<()> {
        self.given_with(pattern, StepOptions::default(), code)
    }

    /// Registers a [Given] step with the given [`StepOptions`], overriding
    /// their [`StepOptions::phase`].
    ///
    /// # Errors
    ///
    /// Same as [`define_step()`](Self::define_step).
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[track_caller]
    pub fn given_with(
        &mut self,
        pattern: impl Into<Pattern>,
        options: StepOptions,
        code: Code<W>,
    ) -> Result<()> {
        let options = StepOptions { phase: Phase::Given, ..options };
        self.push_step("given", pattern, options, code)
    }

    /// Registers a [When] step.
    ///
    /// # Errors
    ///
    /// Same as [`define_step()`](Self::define_step).
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[track_caller]
    pub fn when(&mut self, pattern: impl Into<Pattern>, code: Code<W>) -> Result<()> {
        self.when_with(pattern, StepOptions::default(), code)
    }

    /// Registers a [When] step with the given [`StepOptions`], overriding
    /// their [`StepOptions::phase`].
    ///
    /// # Errors
    ///
    /// Same as [`define_step()`](Self::define_step).
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[track_caller]
    pub fn when_with(
        &mut self,
        pattern: impl Into<Pattern>,
        options: StepOptions,
        code: Code<W>,
    ) -> Result<()> {
        let options = StepOptions { phase: Phase::When, ..options };
        self.push_step("when", pattern, options, code)
    }

    /// Registers a [Then] step.
    ///
    /// # Errors
    ///
    /// Same as [`define_step()`](Self::define_step).
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[track_caller]
    pub fn then(&mut self, pattern: impl Into<Pattern>, code: Code<W>) -> Result<()> {
        self.then_with(pattern, StepOptions::default(), code)
    }

    /// Registers a [Then] step with the given [`StepOptions`], overriding
    /// their [`StepOptions::phase`].
    ///
    /// # Errors
    ///
    /// Same as [`define_step()`](Self::define_step).
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[track_caller]
    pub fn then_with(
        &mut self,
        pattern: impl Into<Pattern>,
        options: StepOptions,
        code: Code<W>,
    ) -> Result<()> {
        let options = StepOptions { phase: Phase::Then, ..options };
        self.push_step("then", pattern, options, code)
    }

    /// Registers a hook running before each scenario.
    ///
    /// # Errors
    ///
    /// If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    #[track_caller]
    pub fn before(&mut self, code: Code<W>) -> Result<()> {
        self.before_with(TestCaseHookOptions::default(), code)
    }

    /// Registers a hook running before each scenario matching the
    /// [`TestCaseHookOptions::tags`].
    ///
    /// # Errors
    ///
    /// - If the [`TestCaseHookOptions::tags`] are malformed.
    /// - If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    #[track_caller]
    pub fn before_with(&mut self, options: TestCaseHookOptions, code: Code<W>) -> Result<()> {
        self.push_test_case_hook("before", Position::Before, options, code)
    }

    /// Registers a hook running after each scenario.
    ///
    /// Once finalized, the last registered `after` hook runs first.
    ///
    /// # Errors
    ///
    /// If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    #[track_caller]
    pub fn after(&mut self, code: Code<W>) -> Result<()> {
        self.after_with(TestCaseHookOptions::default(), code)
    }

    /// Registers a hook running after each scenario matching the
    /// [`TestCaseHookOptions::tags`].
    ///
    /// # Errors
    ///
    /// - If the [`TestCaseHookOptions::tags`] are malformed.
    /// - If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    #[track_caller]
    pub fn after_with(&mut self, options: TestCaseHookOptions, code: Code<W>) -> Result<()> {
        self.push_test_case_hook("after", Position::After, options, code)
    }

    /// Registers a hook running once before all scenarios.
    ///
    /// # Errors
    ///
    /// If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    #[track_caller]
    pub fn before_all(&mut self, code: Code<W>) -> Result<()> {
        self.before_all_with(TestRunHookOptions::default(), code)
    }

    /// Registers a hook running once before all scenarios, with the given
    /// [`TestRunHookOptions`].
    ///
    /// # Errors
    ///
    /// If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    #[track_caller]
    pub fn before_all_with(&mut self, options: TestRunHookOptions, code: Code<W>) -> Result<()> {
        self.push_test_run_hook("before_all", Position::Before, options, code)
    }

    /// Registers a hook running once after all scenarios.
    ///
    /// Once finalized, the last registered `after_all` hook runs first.
    ///
    /// # Errors
    ///
    /// If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    #[track_caller]
    pub fn after_all(&mut self, code: Code<W>) -> Result<()> {
        self.after_all_with(TestRunHookOptions::default(), code)
    }

    /// Registers a hook running once after all scenarios, with the given
    /// [`TestRunHookOptions`].
    ///
    /// # Errors
    ///
    /// If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    #[track_caller]
    pub fn after_all_with(&mut self, options: TestRunHookOptions, code: Code<W>) -> Result<()> {
        self.push_test_run_hook("after_all", Position::After, options, code)
    }

    /// Sets the timeout of the steps and hooks not overriding it.
    ///
    /// # Errors
    ///
    /// If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    pub fn set_default_timeout(&mut self, timeout: Duration) -> Result<()> {
        let (_, library) = self.loaded("set_default_timeout")?;
        library.default_timeout = timeout;
        Ok(())
    }

    /// Sets the decorator applied to the [`Code`] of every step and hook on
    /// [`finalize()`], replacing the previously set one.
    ///
    /// # Errors
    ///
    /// If this builder is not [`reset()`].
    ///
    /// [`finalize()`]: Self::finalize
    /// [`reset()`]: Self::reset
    pub fn set_definition_function_wrapper(
        &mut self,
        wrapper: impl Fn(Code<W>, &WrapperOptions) -> Code<W> + 'static,
    ) -> Result<()> {
        let (_, library) = self.loaded("set_definition_function_wrapper")?;
        library.definition_function_wrapper =
            Some(DefinitionFunctionWrapper::new(wrapper));
        Ok(())
    }

    /// Sets the constructor of the per-scenario [`World`], replacing
    /// [`World::new()`] or the previously set one.
    ///
    /// # Errors
    ///
    /// If this builder is not [`reset()`].
    ///
    /// [`reset()`]: Self::reset
    pub fn set_world_constructor(
        &mut self,
        constructor: impl Fn(WorldInit) -> W + 'static,
    ) -> Result<()> {
        let (_, library) = self.loaded("set_world_constructor")?;
        library.world_constructor = WorldConstructor::new(constructor);
        Ok(())
    }

    /// Runs the given function with this builder.
    ///
    /// # Errors
    ///
    /// Whatever the given function returns.
    #[deprecated(
        since = "0.1.0",
        note = "call the registration methods on the builder directly"
    )]
    pub fn define_support_code<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        tracing::warn!(
            "`define_support_code()` is deprecated, call the registration \
             methods on the builder directly",
        );
        f(self)
    }

    /// Ends the current load cycle, handing out the filled
    /// [`SupportCodeLibrary`].
    ///
    /// Every definition gets wrapped with the definition function wrapper (if
    /// any), and the `after` and `after_all` hooks get reversed, so the last
    /// registered runs first. The builder needs a [`reset()`] before the next
    /// registration.
    ///
    /// # Errors
    ///
    /// If this builder is not [`reset()`], or is finalized already.
    ///
    /// [`reset()`]: Self::reset
    pub fn finalize(&mut self) -> Result<SupportCodeLibrary<W>> {
        let mut library = match mem::replace(&mut self.state, State::Finalized) {
            State::Loaded { library, .. } => library,
            State::Idle => {
                self.state = State::Idle;
                return Err(LifecycleError::NotLoaded { operation: "finalize" }.into());
            }
            State::Finalized => {
                return Err(
                    LifecycleError::AlreadyFinalized { operation: "finalize" }.into(),
                );
            }
        };

        library.seal();
        tracing::debug!(
            steps = library.step_definitions.len(),
            before_hooks = library.before_test_case_hook_definitions.len(),
            after_hooks = library.after_test_case_hook_definitions.len(),
            before_all_hooks = library.before_test_run_hook_definitions.len(),
            after_all_hooks = library.after_test_run_hook_definitions.len(),
            wrapped = library.definition_function_wrapper.is_some(),
            "support code library finalized",
        );
        Ok(library)
    }

    fn loaded(
        &mut self,
        operation: &'static str,
    ) -> std::result::Result<(&Path, &mut SupportCodeLibrary<W>), LifecycleError> {
        match &mut self.state {
            State::Loaded { cwd, library } => Ok((cwd.as_path(), library)),
            State::Idle => Err(LifecycleError::NotLoaded { operation }),
            State::Finalized => Err(LifecycleError::AlreadyFinalized { operation }),
        }
    }

    #[track_caller]
    fn push_step(
        &mut self,
        operation: &'static str,
        pattern: impl Into<Pattern>,
        options: StepOptions,
        code: Code<W>,
    ) -> Result<()> {
        let (cwd, library) = self.loaded(operation)?;
        let step = build_step_definition(pattern, options, code, cwd)?;

        tracing::trace!(
            pattern = %step.pattern,
            phase = %step.phase,
            location = %step.location,
            "step defined",
        );
        library.step_definitions.push(step);
        Ok(())
    }

    #[track_caller]
    fn push_test_case_hook(
        &mut self,
        operation: &'static str,
        position: Position,
        options: TestCaseHookOptions,
        code: Code<W>,
    ) -> Result<()> {
        let (cwd, library) = self.loaded(operation)?;
        let hook = build_test_case_hook_definition(options, code, cwd)?;

        tracing::trace!(?position, location = %hook.location, "test case hook defined");
        test_case_hooks(library, position).push(hook);
        Ok(())
    }

    #[track_caller]
    fn push_test_run_hook(
        &mut self,
        operation: &'static str,
        position: Position,
        options: TestRunHookOptions,
        code: Code<W>,
    ) -> Result<()> {
        let (cwd, library) = self.loaded(operation)?;
        let hook = build_test_run_hook_definition(options, code, cwd);

        tracing::trace!(?position, location = %hook.location, "test run hook defined");
        test_run_hooks(library, position).push(hook);
        Ok(())
    }
}

fn test_case_hooks<W: World>(
    library: &mut SupportCodeLibrary<W>,
    position: Position,
) -> &mut Vec<TestCaseHookDefinition<W>> {
    match position {
        Position::Before => &mut library.before_test_case_hook_definitions,
        Position::After => &mut library.after_test_case_hook_definitions,
    }
}

fn test_run_hooks<W: World>(
    library: &mut SupportCodeLibrary<W>,
    position: Position,
) -> &mut Vec<TestRunHookDefinition<W>> {
    match position {
        Position::Before => &mut library.before_test_run_hook_definitions,
        Position::After => &mut library.after_test_run_hook_definitions,
    }
}
