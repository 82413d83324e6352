// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Source location of a registered definition.

use std::{
    panic,
    path::{Path, PathBuf},
};

use derive_more::with_trait::Display;

/// Place in the user's support code where a definition was registered.
///
/// Only used for diagnostics and snippets, never for execution semantics.
#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{path}:{line}:{column}")]
pub struct Location {
    /// Path to the file, relative to the working directory of the load cycle
    /// whenever it lies inside of it.
    pub path: String,

    /// Line of the registration call.
    pub line: u32,

    /// Column of the registration call.
    pub column: u32,
}

impl Location {
    /// Creates a new [`Location`].
    #[must_use]
    pub fn new(path: impl Into<String>, line: u32, column: u32) -> Self {
        Self { path: path.into(), line, column }
    }

    /// Captures the [`Location`] of the first caller up the stack which is
    /// not annotated with `#[track_caller]`, relativized against `cwd`.
    #[must_use]
    #[track_caller]
    pub fn caller(cwd: &Path) -> Self {
        let caller = panic::Location::caller();
        let path = relativize(Path::new(caller.file()), cwd);

        Self::new(path.to_string_lossy(), caller.line(), caller.column())
    }

    /// Returns the file name of the [`Location::path`].
    #[must_use]
    pub fn filename(&self) -> &str {
        self.path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(&self.path)
    }

    /// Returns a short representation of the location
    /// (`filename:line:column`).
    #[must_use]
    pub fn short(&self) -> String {
        format!("{}:{}:{}", self.filename(), self.line, self.column)
    }
}

/// Makes the `file` relative to the `cwd`, when it lies inside.
///
/// `file!()` paths are relative to the workspace root, which may be an
/// ancestor of `cwd`: the longest trailing part of `cwd` the `file` starts
/// with is stripped then.
fn relativize<'f>(file: &'f Path, cwd: &Path) -> &'f Path {
    if let Ok(path) = file.strip_prefix(cwd) {
        return path;
    }
    if file.is_absolute() {
        return file;
    }
    let components = cwd.components().collect::<Vec<_>>();
    (0..components.len())
        .find_map(|i| {
            let tail = components[i..].iter().collect::<PathBuf>();
            file.strip_prefix(tail).ok()
        })
        .unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_caller() {
        let loc = Location::caller(Path::new("/nonexistent"));
        let line = line!() - 1;

        assert!(loc.path.ends_with("location.rs"), "{loc}");
        assert_eq!(loc.line, line);
    }

    #[test]
    fn relativizes_against_cwd() {
        let here = PathBuf::from(file!());
        let cwd = here.parent().unwrap();

        let loc = Location::caller(cwd);

        assert_eq!(loc.path, "location.rs");
    }

    #[test]
    fn keeps_path_outside_cwd() {
        let loc = Location::caller(Path::new("/definitely/elsewhere"));

        assert_eq!(loc.path, file!());
    }

    #[test]
    fn relativizes_workspace_member_paths() {
        let file = Path::new("member/src/steps.rs");

        assert_eq!(
            relativize(file, Path::new("/ws/member")),
            Path::new("src/steps.rs"),
        );
        assert_eq!(
            relativize(file, Path::new("/ws/other")),
            Path::new("member/src/steps.rs"),
        );
        assert_eq!(
            relativize(Path::new("/ws/member/src/steps.rs"), Path::new("/ws")),
            Path::new("member/src/steps.rs"),
        );
    }

    #[test]
    fn shortens_to_filename() {
        let unix = Location::new("features/support/steps.rs", 42, 10);
        let windows = Location::new(r"features\support\steps.rs", 42, 10);
        let bare = Location::new("steps.rs", 1, 1);

        assert_eq!(unix.short(), "steps.rs:42:10");
        assert_eq!(windows.filename(), "steps.rs");
        assert_eq!(bare.filename(), "steps.rs");
        assert_eq!(unix.to_string(), "features/support/steps.rs:42:10");
    }
}
