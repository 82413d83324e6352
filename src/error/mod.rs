// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types of the support code library.
//!
//! - [`definition`] - malformed step and hook registrations
//! - [`parameter`] - malformed or conflicting parameter types
//! - [`lifecycle`] - calls made outside a `reset()`/`finalize()` cycle

pub mod definition;
pub mod lifecycle;
pub mod parameter;

use derive_more::with_trait::{Display, From};

pub use self::{
    definition::DefinitionError, lifecycle::LifecycleError,
    parameter::ParameterTypeError,
};

/// Top-level error of every registration operation.
///
/// Errors are surfaced to the caller as-is: the builder never swallows or
/// retries them.
#[derive(
    Clone, Debug, Display, derive_more::with_trait::Error, Eq, From, PartialEq,
)]
pub enum Error {
    /// Malformed step or hook registration.
    #[display("Invalid definition: {_0}")]
    Definition(DefinitionError),

    /// Malformed or conflicting parameter type.
    #[display("Invalid parameter type: {_0}")]
    ParameterType(ParameterTypeError),

    /// Method called outside of a load cycle.
    #[display("Lifecycle misuse: {_0}")]
    Lifecycle(LifecycleError),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Indicates whether this [`Error`] is a programming error in the loader
    /// rather than a problem with the loaded support code.
    #[must_use]
    pub const fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Lifecycle(_))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn converts_from_nested_errors() {
        let err: Error = DefinitionError::EmptyPattern.into();
        assert!(matches!(err, Error::Definition(_)));

        let err: Error = ParameterTypeError::duplicate_name("int").into();
        assert!(matches!(err, Error::ParameterType(_)));

        let err: Error = LifecycleError::NotLoaded { operation: "given" }.into();
        assert!(err.is_lifecycle());
    }

    #[test]
    fn preserves_source_chain() {
        let err = Error::from(ParameterTypeError::duplicate_name("int"));
        let source = err.source().map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("There is already a parameter type with name `int`"),
        );
        assert!(err.to_string().starts_with("Invalid parameter type: "));
    }

    #[test]
    fn boxes_as_std_error() {
        let boxed: Box<dyn std::error::Error> =
            Box::new(Error::from(DefinitionError::EmptyPattern));

        assert!(boxed.source().is_some());
        assert!(boxed.to_string().starts_with("Invalid definition: "));
    }

    #[test]
    fn lifecycle_names_operation() {
        let err = LifecycleError::AlreadyFinalized { operation: "finalize" };
        assert_eq!(err.operation(), "finalize");
        assert!(err.to_string().contains("`finalize`"));
    }
}
