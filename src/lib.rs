// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![doc = "\
Support code library builder for [Cucumber].

Step definitions, hooks, custom parameter types and run configuration are
registered into a [`SupportCodeLibraryBuilder`] during a load cycle. Once the
support code is loaded, the builder is finalized into a read-only
[`SupportCodeLibrary`] a runner executes scenarios against.

[Cucumber]: https://cucumber.io"]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(nonstandard_style, rustdoc::all, trivial_casts, trivial_numeric_casts)]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::missing_const_for_fn,
    clippy::panic_in_result_fn,
    clippy::str_to_string,
    clippy::todo,
    clippy::unwrap_used,
    future_incompatible,
    let_underscore_drop,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod builder;
pub mod code;
pub mod definition;
pub mod error;
pub mod finalize;
pub mod hashable_regex;
pub mod library;
pub mod parameter;
pub mod tag;
pub mod world;

#[doc(inline)]
pub use self::{
    builder::SupportCodeLibraryBuilder,
    code::{Code, Context, Invocation, InvocationKind, TestCase},
    definition::{
        Definition, Location, Pattern, Phase, StepDefinition, StepOptions,
        TestCaseHookDefinition, TestCaseHookOptions, TestRunHookDefinition,
        TestRunHookOptions, WrapperOptions,
    },
    error::{Error, Result},
    finalize::{wrap_definitions, DefinitionFunctionWrapper},
    hashable_regex::HashableRegex,
    library::{SupportCodeLibrary, DEFAULT_TIMEOUT},
    parameter::{
        ParameterType, ParameterTypeOptions, ParameterTypeRegistry,
        Transformer,
    },
    tag::TagExpression,
    world::{
        Attach, Attachment, DefaultWorld, World, WorldConstructor, WorldInit,
    },
};

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use super::*;

    #[test]
    fn loads_and_finalizes() {
        let mut builder: SupportCodeLibraryBuilder = SupportCodeLibraryBuilder::new();
        assert!(!builder.is_loaded());

        builder.reset("/project");
        assert!(builder.is_loaded());

        builder.given("a {word}", Code::step_sync(|_, _| {})).unwrap();
        builder.when(Pattern::regex("^b$").unwrap(), Code::step_sync(|_, _| {})).unwrap();
        builder.then("c", Code::step_sync(|_, _| {})).unwrap();
        builder.define_step("d", Code::step_sync(|_, _| {})).unwrap();

        let library = builder.finalize().unwrap();
        assert!(!builder.is_loaded());

        let phases = library
            .step_definitions()
            .iter()
            .map(|s| s.phase)
            .collect::<Vec<_>>();
        assert_eq!(
            phases,
            [Phase::Given, Phase::When, Phase::Then, Phase::Unspecified],
        );
        assert_eq!(library.step_definitions_for(Phase::When).count(), 2);
    }

    #[test]
    fn wraps_every_definition_once() {
        let wrapped = Rc::new(RefCell::new(Vec::new()));

        let mut builder: SupportCodeLibraryBuilder = SupportCodeLibraryBuilder::new();
        builder.reset("/project");
        builder.given("a", Code::step_sync(|_, _| {})).unwrap();
        builder.before(Code::test_case_hook_sync(|_, _| {})).unwrap();
        builder.after(Code::test_case_hook_sync(|_, _| {})).unwrap();
        builder.before_all(Code::test_run_hook_sync(|| {})).unwrap();
        builder.after_all(Code::test_run_hook_sync(|| {})).unwrap();
        builder
            .set_definition_function_wrapper({
                let wrapped = Rc::clone(&wrapped);
                move |code, opts| {
                    wrapped.borrow_mut().push(opts.clone());
                    code
                }
            })
            .unwrap();

        let library = builder.finalize().unwrap();

        assert_eq!(wrapped.borrow().len(), 5);
        assert!(library.definition_function_wrapper().is_some());
        assert_eq!(library.default_timeout(), Duration::from_millis(5000));
    }
}
