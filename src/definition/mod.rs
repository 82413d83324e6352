// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Normalized definition records and the pure builders producing them out of
//! raw DSL arguments.
//!
//! - [`step`]: [`StepDefinition`]s bound to a [`Phase`]
//! - [`hook`]: test case and test run hook definitions
//! - [`pattern`]: [`Pattern`]s matched against steps text
//! - [`location`]: where a definition was registered

pub mod hook;
pub mod location;
pub mod pattern;
pub mod step;

use std::{collections::BTreeMap, time::Duration};

use crate::code::Code;

pub use self::{
    hook::{
        build_test_case_hook_definition, build_test_run_hook_definition,
        TestCaseHookDefinition, TestCaseHookOptions, TestRunHookDefinition,
        TestRunHookOptions,
    },
    location::Location,
    pattern::Pattern,
    step::{build_step_definition, Phase, StepDefinition, StepOptions},
};

/// Free-form options of a definition, handed as-is to the
/// [`DefinitionFunctionWrapper`].
///
/// [`DefinitionFunctionWrapper`]: crate::DefinitionFunctionWrapper
pub type WrapperOptions = BTreeMap<String, String>;

/// Common view over every kind of definition holding user [`Code`].
pub trait Definition<W> {
    /// Returns the [`Code`] of this definition.
    fn code(&self) -> &Code<W>;

    /// Returns the [`Code`] of this definition for replacing it.
    fn code_mut(&mut self) -> &mut Code<W>;

    /// Returns the options handed to the definition function wrapper.
    fn wrapper_options(&self) -> &WrapperOptions;

    /// Returns the timeout this definition overrides the default one with,
    /// if any.
    fn timeout_override(&self) -> Option<Duration>;

    /// Returns where this definition was registered.
    fn location(&self) -> &Location;

    /// Resolves the timeout of this definition against the `default` one.
    #[must_use]
    fn timeout(&self, default: Duration) -> Duration {
        self.timeout_override().unwrap_or(default)
    }
}
