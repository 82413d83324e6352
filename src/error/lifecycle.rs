// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of misusing the builder lifecycle.

use derive_more::with_trait::{Display, Error};

/// Error of calling a [`SupportCodeLibraryBuilder`] method in a state it
/// doesn't support.
///
/// [`SupportCodeLibraryBuilder`]: crate::SupportCodeLibraryBuilder
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum LifecycleError {
    /// Builder was never [`reset()`].
    ///
    /// [`reset()`]: crate::SupportCodeLibraryBuilder::reset
    #[display("Cannot `{operation}`: builder must be `reset()` first")]
    NotLoaded {
        /// Name of the rejected operation.
        #[error(not(source))]
        operation: &'static str,
    },

    /// Builder was [`finalize()`]d already and not [`reset()`] since.
    ///
    /// [`finalize()`]: crate::SupportCodeLibraryBuilder::finalize
    /// [`reset()`]: crate::SupportCodeLibraryBuilder::reset
    #[display(
        "Cannot `{operation}`: support code library is finalized already, \
         `reset()` the builder to start a new load cycle"
    )]
    AlreadyFinalized {
        /// Name of the rejected operation.
        #[error(not(source))]
        operation: &'static str,
    },
}

impl LifecycleError {
    /// Returns the name of the rejected operation.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::NotLoaded { operation } | Self::AlreadyFinalized { operation } => {
                operation
            }
        }
    }
}
