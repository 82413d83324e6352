// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Type-erased user callables registered as steps and hooks.
//!
//! Steps, test case hooks and test run hooks receive different arguments, yet
//! a single [`DefinitionFunctionWrapper`] must be able to decorate all of
//! them. So every callable is stored as a [`Code`] accepting an
//! [`Invocation`], and typed constructors adapt user closures to it.
//!
//! [`DefinitionFunctionWrapper`]: crate::DefinitionFunctionWrapper

use std::{fmt, rc::Rc};

use derive_more::with_trait::Display;
use futures::future::{self, FutureExt as _, LocalBoxFuture};

/// Name of a capturing group inside a step pattern.
pub type CaptureName = Option<String>;

/// Arguments of a step function, produced by the step matching engine.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Context {
    /// Text of the matched step.
    pub text: String,

    /// Captured groups, the whole match first.
    pub matches: Vec<(CaptureName, String)>,
}

impl Context {
    /// Creates a new [`Context`] for the given step `text`.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        matches: Vec<(CaptureName, String)>,
    ) -> Self {
        Self { text: text.into(), matches }
    }

    /// Returns the value of a capture group by index (0 is the whole match).
    #[must_use]
    pub fn capture(&self, index: usize) -> Option<&str> {
        self.matches.get(index).map(|(_, value)| value.as_str())
    }

    /// Returns the value of a named capture group, if any.
    #[must_use]
    pub fn named_capture(&self, name: &str) -> Option<&str> {
        self.matches
            .iter()
            .find(|(n, _)| n.as_deref() == Some(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Scenario a test case hook runs around.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TestCase {
    /// Name of the scenario.
    pub name: String,

    /// Tags of the scenario, including the inherited ones.
    pub tags: Vec<String>,
}

/// Arguments a [`Code`] is invoked with.
#[derive(Debug)]
pub enum Invocation<'a, W> {
    /// Running a step.
    Step {
        /// World of the running scenario.
        world: &'a mut W,

        /// Matched step arguments.
        context: Context,
    },

    /// Running a `Before` or `After` hook.
    TestCase {
        /// World of the running scenario.
        world: &'a mut W,

        /// Scenario the hook runs around.
        test_case: &'a TestCase,
    },

    /// Running a `BeforeAll` or `AfterAll` hook.
    TestRun,
}

impl<W> Invocation<'_, W> {
    /// Returns the [`InvocationKind`] of this [`Invocation`].
    #[must_use]
    pub const fn kind(&self) -> InvocationKind {
        match self {
            Self::Step { .. } => InvocationKind::Step,
            Self::TestCase { .. } => InvocationKind::TestCase,
            Self::TestRun => InvocationKind::TestRun,
        }
    }
}

/// Kind of an [`Invocation`], without its arguments.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum InvocationKind {
    /// [`Invocation::Step`].
    #[display("step")]
    Step,

    /// [`Invocation::TestCase`].
    #[display("test case hook")]
    TestCase,

    /// [`Invocation::TestRun`].
    #[display("test run hook")]
    TestRun,
}

type Erased<W> = dyn for<'a> Fn(Invocation<'a, W>) -> LocalBoxFuture<'a, ()>;

/// User callable of a step or hook definition.
///
/// Cloning is cheap and preserves identity, see [`Code::ptr_eq()`].
pub struct Code<W>(Rc<Erased<W>>);

// Implemented manually to omit redundant `W: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<W> Clone for Code<W> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<W> fmt::Debug for Code<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Code").field(&Rc::as_ptr(&self.0).cast::<()>()).finish()
    }
}

impl<W: 'static> Code<W> {
    /// Creates a new [`Code`] out of a raw function accepting any
    /// [`Invocation`].
    ///
    /// This is the shape [`DefinitionFunctionWrapper`]s produce.
    ///
    /// [`DefinitionFunctionWrapper`]: crate::DefinitionFunctionWrapper
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a> Fn(Invocation<'a, W>) -> LocalBoxFuture<'a, ()> + 'static,
    {
        Self(Rc::new(f))
    }

    /// Creates a new step [`Code`] out of an asynchronous function.
    #[must_use]
    pub fn step<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut W, Context) -> LocalBoxFuture<'a, ()> + 'static,
    {
        Self::new(move |invocation| match invocation {
            Invocation::Step { world, context } => f(world, context),
            other => mismatch(InvocationKind::Step, other.kind()),
        })
    }

    /// Creates a new step [`Code`] out of a synchronous function.
    #[must_use]
    pub fn step_sync<F>(f: F) -> Self
    where
        F: Fn(&mut W, Context) + 'static,
    {
        Self::step(move |world, context| {
            f(world, context);
            future::ready(()).boxed_local()
        })
    }

    /// Creates a new test case hook [`Code`] out of an asynchronous function.
    #[must_use]
    pub fn test_case_hook<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut W, &'a TestCase) -> LocalBoxFuture<'a, ()>
            + 'static,
    {
        Self::new(move |invocation| match invocation {
            Invocation::TestCase { world, test_case } => f(world, test_case),
            other => mismatch(InvocationKind::TestCase, other.kind()),
        })
    }

    /// Creates a new test case hook [`Code`] out of a synchronous function.
    #[must_use]
    pub fn test_case_hook_sync<F>(f: F) -> Self
    where
        F: Fn(&mut W, &TestCase) + 'static,
    {
        Self::test_case_hook(move |world, test_case| {
            f(world, test_case);
            future::ready(()).boxed_local()
        })
    }

    /// Creates a new test run hook [`Code`] out of an asynchronous function.
    #[must_use]
    pub fn test_run_hook<F>(f: F) -> Self
    where
        F: Fn() -> LocalBoxFuture<'static, ()> + 'static,
    {
        Self::new(move |invocation| match invocation {
            Invocation::TestRun => f(),
            other => mismatch(InvocationKind::TestRun, other.kind()),
        })
    }

    /// Creates a new test run hook [`Code`] out of a synchronous function.
    #[must_use]
    pub fn test_run_hook_sync<F>(f: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::test_run_hook(move || {
            f();
            future::ready(()).boxed_local()
        })
    }
}

impl<W> Code<W> {
    /// Invokes this [`Code`].
    ///
    /// # Panics
    ///
    /// If this [`Code`] was built for another [`InvocationKind`] (for example
    /// a step invoked as a hook). Failures of the user function itself are
    /// panics as well, and are left to the executing engine.
    pub fn call<'a>(&self, invocation: Invocation<'a, W>) -> LocalBoxFuture<'a, ()> {
        (self.0)(invocation)
    }

    /// Indicates whether both [`Code`]s are clones of the same callable.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

fn mismatch(expected: InvocationKind, actual: InvocationKind) -> ! {
    panic!("{expected} function cannot be invoked as a {actual}")
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, panic};

    use futures::executor::block_on;

    use super::*;

    #[derive(Default)]
    struct Counter(usize);

    #[test]
    fn step_receives_world_and_context() {
        let code = Code::step_sync(|w: &mut Counter, ctx: Context| {
            w.0 += ctx.capture(1).and_then(|c| c.parse().ok()).unwrap_or(0);
        });

        let mut world = Counter(1);
        let context = Context::new(
            "I have 5 cucumbers",
            vec![(None, "I have 5 cucumbers".into()), (None, "5".into())],
        );
        block_on(code.call(Invocation::Step { world: &mut world, context }));

        assert_eq!(world.0, 6);
    }

    #[test]
    fn async_step_mutates_world() {
        let code = Code::<Counter>::step(|w, _| {
            async move {
                w.0 += 1;
            }
            .boxed_local()
        });

        let mut world = Counter::default();
        block_on(code.call(Invocation::Step {
            world: &mut world,
            context: Context::default(),
        }));
        block_on(code.call(Invocation::Step {
            world: &mut world,
            context: Context::default(),
        }));

        assert_eq!(world.0, 2);
    }

    #[test]
    fn test_case_hook_sees_scenario() {
        let code = Code::test_case_hook_sync(|w: &mut Counter, tc: &TestCase| {
            w.0 = tc.tags.len();
        });

        let mut world = Counter::default();
        let test_case = TestCase {
            name: "eating".into(),
            tags: vec!["@slow".into(), "@db".into()],
        };
        block_on(code.call(Invocation::TestCase {
            world: &mut world,
            test_case: &test_case,
        }));

        assert_eq!(world.0, 2);
    }

    #[test]
    fn test_run_hook_takes_no_world() {
        thread_local! {
            static RUNS: Cell<u8> = const { Cell::new(0) };
        }

        let code = Code::<Counter>::test_run_hook_sync(|| {
            RUNS.with(|r| r.set(r.get() + 1));
        });
        block_on(code.call(Invocation::TestRun));

        assert_eq!(RUNS.with(Cell::get), 1);
    }

    #[test]
    fn panics_on_mismatched_invocation() {
        let code = Code::<Counter>::test_run_hook_sync(|| {});
        let mut world = Counter::default();

        let res = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            drop(code.call(Invocation::Step {
                world: &mut world,
                context: Context::default(),
            }));
        }));

        assert!(res.is_err());
    }

    #[test]
    fn clones_share_identity() {
        let code = Code::<Counter>::test_run_hook_sync(|| {});
        let other = Code::<Counter>::test_run_hook_sync(|| {});

        assert!(code.ptr_eq(&code.clone()));
        assert!(!code.ptr_eq(&other));
    }

    #[test]
    fn context_looks_up_captures() {
        let context = Context::new(
            "I eat 3 apples",
            vec![
                (None, "I eat 3 apples".into()),
                (Some("count".into()), "3".into()),
            ],
        );

        assert_eq!(context.capture(0), Some("I eat 3 apples"));
        assert_eq!(context.named_capture("count"), Some("3"));
        assert_eq!(context.named_capture("fruit"), None);
        assert_eq!(context.capture(2), None);
    }
}
