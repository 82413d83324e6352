// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Wrapping of registered [`Code`] with the definition function wrapper.

use std::rc::Rc;

use derive_more::with_trait::Debug;

use crate::{
    code::Code,
    definition::{Definition, WrapperOptions},
};

/// User decorator applied to the [`Code`] of every step and hook definition
/// when the library is finalized.
///
/// Used for cross-cutting concerns, like instrumentation or binding extra
/// context. The returned [`Code`] replaces the original one.
#[derive(Debug)]
#[debug("DefinitionFunctionWrapper({:p})", Rc::as_ptr(_0).cast::<()>())]
pub struct DefinitionFunctionWrapper<W>(
    Rc<dyn Fn(Code<W>, &WrapperOptions) -> Code<W>>,
);

// Implemented manually to omit redundant `W: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<W> Clone for DefinitionFunctionWrapper<W> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<W> DefinitionFunctionWrapper<W> {
    /// Creates a new [`DefinitionFunctionWrapper`] out of the given function.
    #[must_use]
    pub fn new(
        f: impl Fn(Code<W>, &WrapperOptions) -> Code<W> + 'static,
    ) -> Self {
        Self(Rc::new(f))
    }

    /// Wraps the given `code`.
    #[must_use]
    pub fn wrap(&self, code: Code<W>, options: &WrapperOptions) -> Code<W> {
        (self.0)(code, options)
    }
}

/// Replaces the [`Code`] of every definition with the wrapped one, in the
/// given order.
///
/// Without a `wrapper` the definitions are left untouched.
pub fn wrap_definitions<'d, W: 'd>(
    definitions: impl IntoIterator<Item = &'d mut dyn Definition<W>>,
    wrapper: Option<&DefinitionFunctionWrapper<W>>,
) {
    let Some(wrapper) = wrapper else {
        return;
    };
    for definition in definitions {
        let code = definition.code().clone();
        let wrapped = wrapper.wrap(code, definition.wrapper_options());
        *definition.code_mut() = wrapped;
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, path::Path};

    use super::*;
    use crate::definition::{
        build_step_definition, build_test_run_hook_definition, StepOptions,
        TestRunHookOptions,
    };

    struct World;

    #[test]
    fn passes_through_without_wrapper() {
        let code = Code::<World>::step_sync(|_, _| {});
        let mut step = build_step_definition(
            "a step",
            StepOptions::default(),
            code.clone(),
            Path::new("/"),
        )
        .unwrap();

        let definitions: [&mut dyn Definition<World>; 1] = [&mut step];
        wrap_definitions(definitions, None);

        assert!(step.code.ptr_eq(&code));
    }

    #[test]
    fn wraps_each_definition_once_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let wrapper = DefinitionFunctionWrapper::new({
            let seen = Rc::clone(&seen);
            move |code: Code<World>, options: &WrapperOptions| {
                seen.borrow_mut().push(options.get("id").cloned());
                Code::new(move |invocation| code.call(invocation))
            }
        });

        let options = |id: &str| StepOptions {
            wrapper_options: WrapperOptions::from([("id".into(), id.into())]),
            ..StepOptions::default()
        };
        let original = Code::<World>::step_sync(|_, _| {});
        let mut first = build_step_definition(
            "first",
            options("1"),
            original.clone(),
            Path::new("/"),
        )
        .unwrap();
        let mut second = build_step_definition(
            "second",
            options("2"),
            original.clone(),
            Path::new("/"),
        )
        .unwrap();
        let mut hook = build_test_run_hook_definition(
            TestRunHookOptions::default(),
            Code::<World>::test_run_hook_sync(|| {}),
            Path::new("/"),
        );

        let definitions: [&mut dyn Definition<World>; 3] =
            [&mut first, &mut second, &mut hook];
        wrap_definitions(definitions, Some(&wrapper));

        assert_eq!(
            *seen.borrow(),
            [Some("1".to_owned()), Some("2".to_owned()), None],
        );
        assert!(!first.code.ptr_eq(&original));
        assert!(!second.code.ptr_eq(&original));
    }
}
