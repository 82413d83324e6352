// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of building step and hook definitions.

use derive_more::with_trait::{Display, Error};

/// Error of validating raw arguments of a step or hook registration.
///
/// No definition is recorded when one of these is returned.
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum DefinitionError {
    /// Step pattern is empty.
    #[display("Step pattern must not be empty")]
    EmptyPattern,

    /// Step pattern is not a valid [Cucumber Expression][0].
    ///
    /// [0]: https://github.com/cucumber/cucumber-expressions
    #[display("Invalid Cucumber Expression `{expression}`: {reason}")]
    InvalidExpression {
        /// Source of the rejected expression.
        #[error(not(source))]
        expression: String,

        /// Parser diagnostics.
        reason: String,
    },

    /// Step pattern is not a valid regular expression.
    #[display("Invalid regular expression `{regex}`: {reason}")]
    InvalidRegex {
        /// Source of the rejected regular expression.
        #[error(not(source))]
        regex: String,

        /// Compiler diagnostics.
        reason: String,
    },

    /// `tags` option of a hook is not a valid tag expression.
    #[display("Invalid tag expression `{expression}`: {reason}")]
    InvalidTagExpression {
        /// Source of the rejected tag expression.
        #[error(not(source))]
        expression: String,

        /// Parser diagnostics.
        reason: String,
    },
}

impl DefinitionError {
    /// Creates a new [`DefinitionError::InvalidExpression`].
    #[must_use]
    pub fn invalid_expression(
        expression: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidExpression {
            expression: expression.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a new [`DefinitionError::InvalidRegex`].
    #[must_use]
    pub fn invalid_regex(regex: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidRegex { regex: regex.into(), reason: reason.to_string() }
    }

    /// Creates a new [`DefinitionError::InvalidTagExpression`].
    #[must_use]
    pub fn invalid_tag_expression(
        expression: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidTagExpression {
            expression: expression.into(),
            reason: reason.to_string(),
        }
    }

    /// Indicates whether this error was caused by a malformed step pattern.
    #[must_use]
    pub const fn is_pattern_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPattern
                | Self::InvalidExpression { .. }
                | Self::InvalidRegex { .. },
        )
    }

    /// Indicates whether this error was caused by a malformed tag expression.
    #[must_use]
    pub const fn is_tag_expression_error(&self) -> bool {
        matches!(self, Self::InvalidTagExpression { .. })
    }
}
