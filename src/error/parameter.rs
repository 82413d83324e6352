// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of defining and looking up parameter types.

use derive_more::with_trait::{Display, Error};

/// Error of building or registering a [`ParameterType`].
///
/// [`ParameterType`]: crate::ParameterType
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum ParameterTypeError {
    /// Name contains a character reserved by Cucumber Expressions syntax.
    #[display(
        "Illegal character `{character}` in parameter name `{name}`, \
         parameter names may not contain `()[]{{}}\\/`"
    )]
    IllegalName {
        /// Rejected name.
        #[error(not(source))]
        name: String,

        /// First offending character.
        character: char,
    },

    /// Name is empty.
    #[display("Parameter name must not be empty")]
    EmptyName,

    /// No regular expression was provided.
    #[display("Parameter type `{name}` must have at least one regexp")]
    NoRegexps {
        /// Name of the parameter type.
        #[error(not(source))]
        name: String,
    },

    /// One of the regular expressions doesn't compile.
    #[display("Invalid regexp `{regex}` of parameter type `{name}`: {reason}")]
    InvalidRegex {
        /// Name of the parameter type.
        #[error(not(source))]
        name: String,

        /// Source of the rejected regular expression.
        regex: String,

        /// Compiler diagnostics.
        reason: String,
    },

    /// Parameter type with the same name is registered already.
    #[display("There is already a parameter type with name `{name}`")]
    DuplicateName {
        /// Conflicting name.
        #[error(not(source))]
        name: String,
    },

    /// Two parameter types both prefer the same regular expression.
    #[display(
        "There can only be one preferential parameter type per regexp. \
         The regexp `{regex}` is used for two preferential parameter types, \
         `{existing}` and `{name}`"
    )]
    DuplicatePreferential {
        /// Contested regular expression.
        #[error(not(source))]
        regex: String,

        /// Name of the parameter type registered first.
        existing: String,

        /// Name of the rejected parameter type.
        name: String,
    },

    /// Several parameter types share a regular expression and none of them
    /// is preferential.
    #[display(
        "Regexp `{regex}` matches several parameter types: {}. \
         Set `prefer_for_regexp_match` on one of them",
        candidates.join(", ")
    )]
    AmbiguousRegexp {
        /// Shared regular expression.
        #[error(not(source))]
        regex: String,

        /// Names of all the candidates, in registration order.
        candidates: Vec<String>,
    },
}

impl ParameterTypeError {
    /// Creates a new [`ParameterTypeError::DuplicateName`].
    #[must_use]
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Indicates whether this error is a conflict with an already registered
    /// parameter type, rather than a malformed definition.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateName { .. } | Self::DuplicatePreferential { .. },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_are_distinguished_from_validation() {
        assert!(ParameterTypeError::duplicate_name("color").is_conflict());
        assert!(!ParameterTypeError::EmptyName.is_conflict());
    }

    #[test]
    fn ambiguity_lists_candidates() {
        let err = ParameterTypeError::AmbiguousRegexp {
            regex: "red|blue".into(),
            candidates: vec!["color".into(), "shade".into()],
        };
        assert!(err.to_string().contains("color, shade"));
    }

    #[test]
    fn illegal_name_mentions_reserved_characters() {
        let err = ParameterTypeError::IllegalName {
            name: "a{b".into(),
            character: '{',
        };
        assert!(err.to_string().contains("`()[]{}\\/`"));
    }
}
