// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`ParameterType`]s and their builder.

use std::{any::Any, fmt, rc::Rc};

use derive_more::with_trait::Debug;

use crate::{error::ParameterTypeError, hashable_regex::HashableRegex};

/// Characters reserved by the Cucumber Expressions syntax.
const ILLEGAL_NAME_CHARS: [char; 8] = ['(', ')', '[', ']', '{', '}', '\\', '/'];

/// Result of transforming captured text into a step argument.
pub type TransformResult = Result<Box<dyn Any>, String>;

/// Function transforming the text captured by a [`ParameterType`] into a
/// step argument.
///
/// Receives the capture groups of the matched regexp, or the whole match when
/// the regexp has none.
#[derive(Debug)]
#[debug("Transformer({:p})", Rc::as_ptr(_0).cast::<()>())]
pub struct Transformer(Rc<dyn Fn(&[&str]) -> TransformResult>);

impl Clone for Transformer {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl Default for Transformer {
    /// Returns the first group as a [`String`].
    fn default() -> Self {
        Self::new(|groups| {
            Ok(Box::new(groups.first().copied().unwrap_or_default().to_owned()))
        })
    }
}

impl Transformer {
    /// Creates a new [`Transformer`] out of the given function.
    #[must_use]
    pub fn new(f: impl Fn(&[&str]) -> TransformResult + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Creates a new [`Transformer`] parsing the first group with
    /// [`str::parse()`].
    #[must_use]
    pub fn parse<T>() -> Self
    where
        T: std::str::FromStr + 'static,
        T::Err: fmt::Display,
    {
        Self::new(|groups| {
            let text = groups.first().copied().unwrap_or_default();
            text.parse::<T>()
                .map(|v| -> Box<dyn Any> { Box::new(v) })
                .map_err(|e| format!("cannot parse `{text}`: {e}"))
        })
    }

    /// Transforms the given capture `groups`.
    ///
    /// # Errors
    ///
    /// If the user function rejects the `groups`.
    pub fn transform(&self, groups: &[&str]) -> TransformResult {
        (self.0)(groups)
    }
}

/// Raw arguments of a `define_parameter_type()` call.
#[derive(Clone, Debug, Default)]
pub struct ParameterTypeOptions {
    /// Name used inside Cucumber Expressions, like `color` in `{color}`.
    pub name: String,

    /// Sources of the regular expressions matching the parameter.
    pub regexps: Vec<String>,

    /// Transformer of the captured text, the first group as a [`String`] if
    /// [`None`].
    pub transformer: Option<Transformer>,

    /// Whether snippets of undefined steps may suggest this parameter type,
    /// `true` if [`None`].
    pub use_for_snippets: Option<bool>,

    /// Whether this parameter type wins over others sharing a regexp when
    /// matching regular expression steps, `false` if [`None`].
    pub prefer_for_regexp_match: Option<bool>,
}

impl ParameterTypeOptions {
    /// Creates [`ParameterTypeOptions`] with the given `name` and a single
    /// `regexp`, all other options defaulted.
    #[must_use]
    pub fn new(name: impl Into<String>, regexp: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regexps: vec![regexp.into()],
            ..Self::default()
        }
    }
}

/// Named, reusable transform of step text into a step argument.
#[derive(Clone, Debug)]
pub struct ParameterType {
    /// Name of this type.
    pub(super) name: String,

    /// Regular expressions matching this type.
    pub(super) regexps: Vec<HashableRegex>,

    /// Transformer of the matched text.
    pub(super) transformer: Transformer,

    /// Whether snippets may suggest this type.
    pub(super) use_for_snippets: bool,

    /// Whether this type wins ties on a shared regexp.
    pub(super) prefer_for_regexp_match: bool,
}

impl ParameterType {
    /// Returns the name of this [`ParameterType`].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the regular expressions matching this [`ParameterType`].
    #[must_use]
    pub fn regexps(&self) -> &[HashableRegex] {
        &self.regexps
    }

    /// Indicates whether snippets may suggest this [`ParameterType`].
    #[must_use]
    pub const fn use_for_snippets(&self) -> bool {
        self.use_for_snippets
    }

    /// Indicates whether this [`ParameterType`] wins over others sharing a
    /// regexp.
    #[must_use]
    pub const fn prefer_for_regexp_match(&self) -> bool {
        self.prefer_for_regexp_match
    }

    /// Transforms the given capture `groups` into a step argument.
    ///
    /// # Errors
    ///
    /// If the [`Transformer`] rejects the `groups`.
    pub fn transform(&self, groups: &[&str]) -> TransformResult {
        self.transformer.transform(groups)
    }
}

/// Builds a new [`ParameterType`], applying the defaults of
/// [`ParameterTypeOptions`].
///
/// # Errors
///
/// - If the name is empty or contains characters reserved by Cucumber
///   Expressions.
/// - If no regexp is given, or any of them doesn't compile.
pub fn build_parameter_type(
    options: ParameterTypeOptions,
) -> Result<ParameterType, ParameterTypeError> {
    let ParameterTypeOptions {
        name,
        regexps,
        transformer,
        use_for_snippets,
        prefer_for_regexp_match,
    } = options;

    if name.is_empty() {
        return Err(ParameterTypeError::EmptyName);
    }
    if let Some(character) = name.chars().find(|c| ILLEGAL_NAME_CHARS.contains(c)) {
        return Err(ParameterTypeError::IllegalName { name, character });
    }
    if regexps.is_empty() {
        return Err(ParameterTypeError::NoRegexps { name });
    }

    let regexps = regexps
        .iter()
        .map(|src| {
            HashableRegex::new(src).map_err(|e| ParameterTypeError::InvalidRegex {
                name: name.clone(),
                regex: src.clone(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParameterType {
        name,
        regexps,
        transformer: transformer.unwrap_or_default(),
        use_for_snippets: use_for_snippets.unwrap_or(true),
        prefer_for_regexp_match: prefer_for_regexp_match.unwrap_or(false),
    })
}
