// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Test case and test run hook definitions and their builders.

use std::{path::Path, time::Duration};

use derive_more::with_trait::Debug;

use super::{Definition, Location, WrapperOptions};
use crate::{code::Code, error::DefinitionError, tag::TagExpression};

/// Recognized options of a `Before` or `After` hook registration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TestCaseHookOptions {
    /// [Tag expression][0] restricting the scenarios this hook runs around.
    ///
    /// [0]: https://cucumber.io/docs/cucumber/api#tag-expressions
    pub tags: Option<String>,

    /// Human-readable name of this hook, used in reports.
    pub name: Option<String>,

    /// Timeout overriding the default one of the library.
    pub timeout: Option<Duration>,

    /// Options handed to the definition function wrapper.
    pub wrapper_options: WrapperOptions,
}

impl TestCaseHookOptions {
    /// Creates [`TestCaseHookOptions`] restricted to the given tag
    /// expression.
    #[must_use]
    pub fn tagged(tags: impl Into<String>) -> Self {
        Self { tags: Some(tags.into()), ..Self::default() }
    }
}

/// Hook running before or after every matching scenario.
#[derive(Debug)]
pub struct TestCaseHookDefinition<W> {
    /// Normalized registration options.
    pub options: TestCaseHookOptions,

    /// Parsed [`TestCaseHookOptions::tags`].
    pub tag_expression: Option<TagExpression>,

    /// Function running the hook.
    pub code: Code<W>,

    /// Where this hook was registered.
    pub location: Location,
}

impl<W> TestCaseHookDefinition<W> {
    /// Indicates whether this hook runs around a scenario with the given
    /// `tags`.
    #[must_use]
    pub fn applies_to<I, S>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tag_expression.as_ref().is_none_or(|expr| expr.evaluate(tags))
    }
}

impl<W> Definition<W> for TestCaseHookDefinition<W> {
    fn code(&self) -> &Code<W> {
        &self.code
    }

    fn code_mut(&mut self) -> &mut Code<W> {
        &mut self.code
    }

    fn wrapper_options(&self) -> &WrapperOptions {
        &self.options.wrapper_options
    }

    fn timeout_override(&self) -> Option<Duration> {
        self.options.timeout
    }

    fn location(&self) -> &Location {
        &self.location
    }
}

/// Recognized options of a `BeforeAll` or `AfterAll` hook registration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TestRunHookOptions {
    /// Timeout overriding the default one of the library.
    pub timeout: Option<Duration>,

    /// Options handed to the definition function wrapper.
    pub wrapper_options: WrapperOptions,
}

/// Hook running once before or after the whole run.
#[derive(Debug)]
pub struct TestRunHookDefinition<W> {
    /// Normalized registration options.
    pub options: TestRunHookOptions,

    /// Function running the hook.
    pub code: Code<W>,

    /// Where this hook was registered.
    pub location: Location,
}

impl<W> Definition<W> for TestRunHookDefinition<W> {
    fn code(&self) -> &Code<W> {
        &self.code
    }

    fn code_mut(&mut self) -> &mut Code<W> {
        &mut self.code
    }

    fn wrapper_options(&self) -> &WrapperOptions {
        &self.options.wrapper_options
    }

    fn timeout_override(&self) -> Option<Duration> {
        self.options.timeout
    }

    fn location(&self) -> &Location {
        &self.location
    }
}

/// Builds a new [`TestCaseHookDefinition`], capturing the location of the
/// first caller up the stack not annotated with `#[track_caller]`.
///
/// # Errors
///
/// If the [`TestCaseHookOptions::tags`] is not a valid tag expression.
#[track_caller]
pub fn build_test_case_hook_definition<W>(
    options: TestCaseHookOptions,
    code: Code<W>,
    cwd: &Path,
) -> Result<TestCaseHookDefinition<W>, DefinitionError> {
    let location = Location::caller(cwd);
    let tag_expression =
        options.tags.as_deref().map(str::parse::<TagExpression>).transpose()?;

    Ok(TestCaseHookDefinition { options, tag_expression, code, location })
}

/// Builds a new [`TestRunHookDefinition`], capturing the location of the
/// first caller up the stack not annotated with `#[track_caller]`.
#[must_use]
#[track_caller]
pub fn build_test_run_hook_definition<W>(
    options: TestRunHookOptions,
    code: Code<W>,
    cwd: &Path,
) -> TestRunHookDefinition<W> {
    TestRunHookDefinition { options, code, location: Location::caller(cwd) }
}
