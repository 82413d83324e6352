// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [Tag expressions][0] filtering test case hooks.
//!
//! [0]: https://cucumber.io/docs/cucumber/api#tag-expressions

use std::str::FromStr;

use derive_more::with_trait::{Debug, Display};
use gherkin::tagexpr::TagOperation;

use crate::error::DefinitionError;

/// Parsed [tag expression][0], remembering its source.
///
/// [0]: https://cucumber.io/docs/cucumber/api#tag-expressions
#[derive(Clone, Debug, Display)]
#[display("{source}")]
#[debug("TagExpression({source:?})")]
pub struct TagExpression {
    /// Source of this expression, as written by the user.
    source: String,

    /// Parsed [`TagOperation`].
    operation: TagOperation,
}

impl PartialEq for TagExpression {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for TagExpression {}

impl FromStr for TagExpression {
    type Err = DefinitionError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let operation = source
            .parse::<TagOperation>()
            .map_err(|e| DefinitionError::invalid_tag_expression(source, e))?;
        Ok(Self { source: source.to_owned(), operation })
    }
}

impl TagExpression {
    /// Returns the source of this [`TagExpression`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluates this [`TagExpression`] for the given `tags`.
    ///
    /// Tags are compared ignoring the leading `@`, so both `@slow` and `slow`
    /// satisfy an expression mentioning `@slow`.
    #[must_use]
    pub fn evaluate<I, S>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = tags
            .into_iter()
            .map(|t| strip_at(t.as_ref()).to_owned())
            .collect::<Vec<_>>();
        eval(&self.operation, &tags)
    }
}

fn eval(op: &TagOperation, tags: &[String]) -> bool {
    match op {
        TagOperation::And(l, r) => eval(l, tags) && eval(r, tags),
        TagOperation::Or(l, r) => eval(l, tags) || eval(r, tags),
        TagOperation::Not(t) => !eval(t, tags),
        TagOperation::Tag(t) => tags.iter().any(|tag| tag == strip_at(t)),
    }
}

fn strip_at(tag: &str) -> &str {
    tag.strip_prefix('@').unwrap_or(tag)
}
