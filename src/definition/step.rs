// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`StepDefinition`]s and their builder.

use std::{path::Path, time::Duration};

use derive_more::with_trait::{Debug, Display};
use gherkin::StepType;

use super::{Definition, Location, Pattern, WrapperOptions};
use crate::{code::Code, error::DefinitionError};

/// Step verb a [`StepDefinition`] is bound to.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub enum Phase {
    /// [Given] step.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[display("given")]
    Given,

    /// [When] step.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[display("when")]
    When,

    /// [Then] step.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[display("then")]
    Then,

    /// Step registered via `define_step()`, usable with any verb.
    #[default]
    #[display("unspecified")]
    Unspecified,
}

impl From<StepType> for Phase {
    fn from(ty: StepType) -> Self {
        match ty {
            StepType::Given => Self::Given,
            StepType::When => Self::When,
            StepType::Then => Self::Then,
        }
    }
}

impl Phase {
    /// Indicates whether a step of this [`Phase`] may run as a step of the
    /// `other` one.
    #[must_use]
    pub fn accepts(self, other: Self) -> bool {
        self == Self::Unspecified || self == other
    }
}

/// Recognized options of a step registration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StepOptions {
    /// Verb the step is bound to.
    pub phase: Phase,

    /// Timeout overriding the default one of the library.
    pub timeout: Option<Duration>,

    /// Options handed to the definition function wrapper.
    pub wrapper_options: WrapperOptions,
}

/// Step definition: a [`Pattern`] mapped to the [`Code`] running the step.
#[derive(Debug)]
pub struct StepDefinition<W> {
    /// [`Pattern`] matched against steps text.
    pub pattern: Pattern,

    /// Verb this step is bound to.
    pub phase: Phase,

    /// Normalized registration options.
    pub options: StepOptions,

    /// Function running the step.
    pub code: Code<W>,

    /// Where this step was registered.
    pub location: Location,
}

impl<W> Definition<W> for StepDefinition<W> {
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

/// Builds a new [`StepDefinition`], capturing the location of the first
/// caller up the stack not annotated with `#[track_caller]`.
///
/// # Errors
///
/// If the `pattern` is empty or malformed.
#[track_caller]
pub fn build_step_definition<W>(
    pattern: impl Into<Pattern>,
    options: StepOptions,
    code: Code<W>,
    cwd: &Path,
) -> Result<StepDefinition<W>, DefinitionError> {
    let pattern = pattern.into();
    pattern.validate()?;

    Ok(StepDefinition {
        pattern,
        phase: options.phase,
        options,
        code,
        location: Location::caller(cwd),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct World;

    fn noop() -> Code<World> {
        Code::step_sync(|_, _| {})
    }

    #[test]
    fn copies_phase_from_options() {
        let options = StepOptions { phase: Phase::When, ..StepOptions::default() };
        let step =
            build_step_definition("I eat {int}", options, noop(), Path::new("/"))
                .unwrap();

        assert_eq!(step.phase, Phase::When);
        assert_eq!(step.pattern, Pattern::from("I eat {int}"));
        assert_eq!(step.location.line, line!() - 5);
    }

    #[test]
    fn defaults_to_unspecified_phase() {
        let step = build_step_definition(
            "a step",
            StepOptions::default(),
            noop(),
            Path::new("/"),
        )
        .unwrap();

        assert_eq!(step.phase, Phase::Unspecified);
        assert!(step.phase.accepts(Phase::Then));
        assert!(!Phase::Given.accepts(Phase::Then));
    }

    #[test]
    fn resolves_timeout() {
        let options = StepOptions {
            timeout: Some(Duration::from_millis(250)),
            ..StepOptions::default()
        };
        let step =
            build_step_definition("a slow step", options, noop(), Path::new("/"))
                .unwrap();

        assert_eq!(
            step.timeout(Duration::from_secs(5)),
            Duration::from_millis(250),
        );
    }

    #[test]
    fn rejects_malformed_pattern() {
        let res = build_step_definition(
            "I have {int",
            StepOptions::default(),
            noop(),
            Path::new("/"),
        );

        assert!(res.unwrap_err().is_pattern_error());
    }

    #[test]
    fn converts_gherkin_step_type() {
        assert_eq!(Phase::from(StepType::Given), Phase::Given);
        assert_eq!(Phase::from(StepType::Then).to_string(), "then");
    }
}
