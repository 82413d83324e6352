// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Regex`] comparable by its source.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use derive_more::with_trait::{AsRef, Debug, Deref, Display, From};
use regex::Regex;

/// [`Regex`] wrapper implementing [`Eq`], [`Ord`] and [`Hash`] by comparing
/// the source strings.
///
/// Two [`HashableRegex`]es compiled from the same source are equal, even
/// though the matching engine may treat them as distinct objects.
#[derive(AsRef, Clone, Debug, Deref, Display, From)]
#[debug("{:?}", _0.as_str())]
pub struct HashableRegex(Regex);

impl HashableRegex {
    /// Compiles the given `source` into a [`HashableRegex`].
    ///
    /// # Errors
    ///
    /// If the `source` is not a valid regular expression.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    /// Returns the inner [`Regex`].
    #[must_use]
    pub fn into_inner(self) -> Regex {
        self.0
    }
}

impl Hash for HashableRegex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_str().hash(state);
    }
}

impl PartialEq for HashableRegex {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl Eq for HashableRegex {}

impl PartialOrd for HashableRegex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HashableRegex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.as_str().cmp(other.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn compares_by_source() {
        let a = HashableRegex::new(r"(\d+) cucumbers").unwrap();
        let b = HashableRegex::from(Regex::new(r"(\d+) cucumbers").unwrap());
        let c = HashableRegex::new(r"(\d+) gherkins").unwrap();

        assert_eq!(a, b);
        assert!(a < c);
        assert_eq!(HashSet::from([a.clone(), b, c]).len(), 2);
        assert!(a.is_match("5 cucumbers"));
    }

    #[test]
    fn rejects_invalid_source() {
        assert!(HashableRegex::new("(unclosed").is_err());
    }

    #[test]
    fn displays_and_debugs_source() {
        let re = HashableRegex::new(r"^\w+$").unwrap();

        assert_eq!(re.to_string(), r"^\w+$");
        assert_eq!(format!("{re:?}"), r#""^\\w+$""#);
    }
}
