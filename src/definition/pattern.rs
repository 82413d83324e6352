// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Patterns matching steps text.

use cucumber_expressions::Expression;
use derive_more::with_trait::Display;
use regex::Regex;

use crate::{error::DefinitionError, hashable_regex::HashableRegex};

/// Pattern of a [`StepDefinition`], matched later against steps text by the
/// step matching engine.
///
/// [`StepDefinition`]: super::StepDefinition
#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Pattern {
    /// [Cucumber Expression][0] like `I have {int} cucumbers`.
    ///
    /// [0]: https://github.com/cucumber/cucumber-expressions
    #[display("{_0}")]
    Expression(String),

    /// Regular expression like `^I have (\d+) cucumbers$`.
    #[display("/{_0}/")]
    Regex(HashableRegex),
}

impl From<&str> for Pattern {
    fn from(expr: &str) -> Self {
        Self::Expression(expr.to_owned())
    }
}

impl From<String> for Pattern {
    fn from(expr: String) -> Self {
        Self::Expression(expr)
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re.into())
    }
}

impl From<HashableRegex> for Pattern {
    fn from(re: HashableRegex) -> Self {
        Self::Regex(re)
    }
}

impl Pattern {
    /// Compiles the given `source` into a [`Pattern::Regex`].
    ///
    /// # Errors
    ///
    /// If the `source` is not a valid regular expression.
    pub fn regex(source: &str) -> Result<Self, DefinitionError> {
        HashableRegex::new(source)
            .map(Self::Regex)
            .map_err(|e| DefinitionError::invalid_regex(source, e))
    }

    /// Returns the source of this [`Pattern`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Expression(e) => e,
            Self::Regex(re) => re.as_str(),
        }
    }

    /// Checks this [`Pattern`] is usable by the step matching engine.
    ///
    /// Parameter names of a [`Pattern::Expression`] are not resolved here, as
    /// parameter types may be defined after the steps using them.
    ///
    /// # Errors
    ///
    /// If the [`Pattern`] is empty or is not a valid Cucumber Expression.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.as_str().is_empty() {
            return Err(DefinitionError::EmptyPattern);
        }
        if let Self::Expression(expr) = self {
            Expression::parse(expr.as_str())
                .map(drop)
                .map_err(|e| DefinitionError::invalid_expression(expr, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_expressions_and_regexes() {
        assert!(Pattern::from("I have {int} cucumbers").validate().is_ok());
        assert!(Pattern::from("I have (a )cucumber(s)").validate().is_ok());
        assert!(Pattern::regex(r"^I have (\d+) cucumbers$")
            .unwrap()
            .validate()
            .is_ok());
    }

    #[test]
    fn does_not_resolve_parameter_names() {
        assert!(Pattern::from("a {color} ball").validate().is_ok());
    }

    #[test]
    fn rejects_empty_pattern() {
        assert_eq!(
            Pattern::from("").validate(),
            Err(DefinitionError::EmptyPattern),
        );
        assert_eq!(
            Pattern::from(Regex::new("").unwrap()).validate(),
            Err(DefinitionError::EmptyPattern),
        );
    }

    #[test]
    fn rejects_malformed_expression() {
        let err = Pattern::from("I have {int cucumbers").validate().unwrap_err();

        assert!(matches!(err, DefinitionError::InvalidExpression { .. }));
    }

    #[test]
    fn rejects_malformed_regex() {
        let err = Pattern::regex("I have (").unwrap_err();

        assert!(matches!(err, DefinitionError::InvalidRegex { .. }));
    }

    #[test]
    fn displays_kind() {
        assert_eq!(Pattern::from("a step").to_string(), "a step");
        assert_eq!(Pattern::regex("^a step$").unwrap().to_string(), "/^a step$/");
    }
}
