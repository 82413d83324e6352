// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`ParameterTypeRegistry`] with the built-in parameter types.

use std::collections::HashMap;

use lazy_regex::regex;
use regex::Regex;

use super::{ParameterType, Transformer};
use crate::{error::ParameterTypeError, hashable_regex::HashableRegex};

/// Registry of every [`ParameterType`] known to a load cycle.
///
/// Consumed by the step matching engine to resolve `{name}` placeholders and
/// to type the groups of regular expression steps.
#[derive(Clone, Debug)]
pub struct ParameterTypeRegistry {
    /// Registered types, in registration order.
    types: Vec<ParameterType>,

    /// Indices into [`Self::types`] by name.
    by_name: HashMap<String, usize>,

    /// Indices into [`Self::types`] by regexp source.
    by_regexp: HashMap<String, Vec<usize>>,
}

impl Default for ParameterTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterTypeRegistry {
    /// Creates a new [`ParameterTypeRegistry`] populated with the built-in
    /// `int`, `float`, `word`, `string` and anonymous parameter types.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            types: Vec::new(),
            by_name: HashMap::new(),
            by_regexp: HashMap::new(),
        };
        for param in builtins() {
            registry.insert(param);
        }
        registry
    }

    /// Registers the given [`ParameterType`].
    ///
    /// # Errors
    ///
    /// - If a [`ParameterType`] with the same name is registered already.
    /// - If the given [`ParameterType`] prefers a regexp some other
    ///   registered [`ParameterType`] prefers already.
    pub fn define_parameter_type(
        &mut self,
        parameter_type: ParameterType,
    ) -> Result<(), ParameterTypeError> {
        if self.by_name.contains_key(&parameter_type.name) {
            return Err(ParameterTypeError::duplicate_name(parameter_type.name));
        }
        if parameter_type.prefer_for_regexp_match {
            for re in &parameter_type.regexps {
                if let Some(existing) = self.preferential(re.as_str()) {
                    return Err(ParameterTypeError::DuplicatePreferential {
                        regex: re.as_str().to_owned(),
                        existing: existing.name.clone(),
                        name: parameter_type.name,
                    });
                }
            }
        }

        tracing::trace!(name = %parameter_type.name, "parameter type defined");
        self.insert(parameter_type);
        Ok(())
    }

    /// Looks up a [`ParameterType`] by its name.
    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Option<&ParameterType> {
        self.by_name.get(name).map(|&idx| &self.types[idx])
    }

    /// Looks up the [`ParameterType`] a group of a regular expression step
    /// with the given source is typed with.
    ///
    /// # Errors
    ///
    /// If several [`ParameterType`]s share the regexp and none of them is
    /// preferential.
    pub fn lookup_by_regexp(
        &self,
        source: &str,
    ) -> Result<Option<&ParameterType>, ParameterTypeError> {
        let Some(candidates) = self.by_regexp.get(source) else {
            return Ok(None);
        };
        if let Some(preferred) = self.preferential(source) {
            return Ok(Some(preferred));
        }
        match candidates.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(&self.types[*single])),
            many => Err(ParameterTypeError::AmbiguousRegexp {
                regex: source.to_owned(),
                candidates: many
                    .iter()
                    .map(|&idx| self.types[idx].name.clone())
                    .collect(),
            }),
        }
    }

    /// Iterates over all the registered [`ParameterType`]s in registration
    /// order, built-in ones first.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterType> {
        self.types.iter()
    }

    /// Returns the number of registered [`ParameterType`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Indicates whether no [`ParameterType`] is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn preferential(&self, source: &str) -> Option<&ParameterType> {
        self.by_regexp
            .get(source)?
            .iter()
            .map(|&idx| &self.types[idx])
            .find(|p| p.prefer_for_regexp_match)
    }

    fn insert(&mut self, parameter_type: ParameterType) {
        let idx = self.types.len();
        _ = self.by_name.insert(parameter_type.name.clone(), idx);
        for re in &parameter_type.regexps {
            self.by_regexp.entry(re.as_str().to_owned()).or_default().push(idx);
        }
        self.types.push(parameter_type);
    }
}

fn builtin(
    name: &str,
    regexps: impl IntoIterator<Item = Regex>,
    transformer: Transformer,
) -> ParameterType {
    ParameterType {
        name: name.to_owned(),
        regexps: regexps.into_iter().map(HashableRegex::from).collect(),
        transformer,
        use_for_snippets: true,
        prefer_for_regexp_match: false,
    }
}

fn builtins() -> [ParameterType; 5] {
    [
        builtin(
            "int",
            [Regex::clone(regex!(r"-?\d+")), Regex::clone(regex!(r"\d+"))],
            Transformer::parse::<i64>(),
        ),
        builtin(
            "float",
            [Regex::clone(regex!(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?"))],
            Transformer::parse::<f64>(),
        ),
        builtin(
            "word",
            [Regex::clone(regex!(r"[^\s]+"))],
            Transformer::default(),
        ),
        builtin(
            "string",
            [
                Regex::clone(regex!(r#""([^"\\]*(?:\\.[^"\\]*)*)""#)),
                Regex::clone(regex!(r"'([^'\\]*(?:\\.[^'\\]*)*)'")),
            ],
            Transformer::new(|groups| {
                let text = groups.first().copied().unwrap_or_default();
                Ok(Box::new(text.replace("\\\"", "\"").replace("\\'", "'")))
            }),
        ),
        builtin("", [Regex::clone(regex!(r".*"))], Transformer::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{build_parameter_type, ParameterTypeOptions};

    fn param(name: &str, regexp: &str, prefer: bool) -> ParameterType {
        build_parameter_type(ParameterTypeOptions {
            prefer_for_regexp_match: Some(prefer),
            ..ParameterTypeOptions::new(name, regexp)
        })
        .unwrap()
    }

    #[test]
    fn contains_builtins() {
        let registry = ParameterTypeRegistry::new();

        assert_eq!(registry.len(), 5);
        for name in ["int", "float", "word", "string", ""] {
            assert!(registry.lookup_by_name(name).is_some(), "missing `{name}`");
        }

        let int = registry.lookup_by_name("int").unwrap();
        assert_eq!(int.transform(&["-17"]).unwrap().downcast_ref::<i64>(), Some(&-17));

        let string = registry.lookup_by_name("string").unwrap();
        let unquoted = string.transform(&[r#"say \"hi\""#]).unwrap();
        assert_eq!(
            unquoted.downcast_ref::<String>().map(String::as_str),
            Some(r#"say "hi""#),
        );
    }

    #[test]
    fn registers_custom_type() {
        let mut registry = ParameterTypeRegistry::new();

        registry.define_parameter_type(param("color", "red|blue", false)).unwrap();

        assert_eq!(registry.len(), 6);
        assert_eq!(registry.lookup_by_name("color").map(ParameterType::name), Some("color"));
        assert_eq!(
            registry.iter().last().map(ParameterType::name),
            Some("color"),
        );
    }

    #[test]
    fn rejects_duplicate_name() {
        let mut registry = ParameterTypeRegistry::new();

        let err = registry.define_parameter_type(param("int", r"\d+", false)).unwrap_err();

        assert_eq!(err, ParameterTypeError::duplicate_name("int"));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn rejects_second_preferential_type_per_regexp() {
        let mut registry = ParameterTypeRegistry::new();
        registry.define_parameter_type(param("color", "red|blue", true)).unwrap();

        let err = registry
            .define_parameter_type(param("shade", "red|blue", true))
            .unwrap_err();

        assert!(err.is_conflict());
        assert!(registry.lookup_by_name("shade").is_none());
    }

    #[test]
    fn resolves_regexp_lookups() {
        let mut registry = ParameterTypeRegistry::new();
        registry.define_parameter_type(param("color", "red|blue", false)).unwrap();
        registry.define_parameter_type(param("shade", "red|blue", false)).unwrap();
        registry.define_parameter_type(param("pet", "cat|dog", false)).unwrap();

        assert!(matches!(registry.lookup_by_regexp("nothing"), Ok(None)));
        assert_eq!(
            registry.lookup_by_regexp("cat|dog").unwrap().map(ParameterType::name),
            Some("pet"),
        );
        assert!(matches!(
            registry.lookup_by_regexp("red|blue"),
            Err(ParameterTypeError::AmbiguousRegexp { .. }),
        ));

        registry.define_parameter_type(param("hue", "red|blue", true)).unwrap();
        assert_eq!(
            registry.lookup_by_regexp("red|blue").unwrap().map(ParameterType::name),
            Some("hue"),
        );
    }

    #[test]
    fn registries_are_independent() {
        let mut first = ParameterTypeRegistry::new();
        let second = ParameterTypeRegistry::new();

        first.define_parameter_type(param("color", "red", false)).unwrap();

        assert!(first.lookup_by_name("color").is_some());
        assert!(second.lookup_by_name("color").is_none());
    }
}
