// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`World`] trait, its default implementation and constructor.

use std::rc::Rc;

use derive_more::with_trait::Debug;

/// Represents a user-defined state living on per-[scenario][0] basis.
///
/// A fresh [`World`] is instantiated for every [scenario][0] by the
/// [`WorldConstructor`] of the finalized [`SupportCodeLibrary`], and handed to
/// every [`Step`] and test case hook of that [scenario][0].
///
/// [0]: https://cucumber.io/docs/gherkin/reference#descriptions
/// [`Step`]: crate::StepDefinition
/// [`SupportCodeLibrary`]: crate::SupportCodeLibrary
pub trait World: Sized + 'static {
    /// Creates a new [`World`] instance out of the capabilities provided by
    /// the executing engine.
    fn new(init: WorldInit) -> Self;
}

/// Capabilities and configuration a [`World`] is created with.
#[derive(Clone, Debug)]
pub struct WorldInit {
    /// Capability of attaching artifacts to the report of the running
    /// scenario.
    pub attach: Attach,

    /// World parameters of the run, as configured by the user.
    pub parameters: serde_json::Value,
}

impl Default for WorldInit {
    fn default() -> Self {
        Self {
            attach: Attach::default(),
            parameters: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Artifact attached to the report of a scenario.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attachment {
    /// Raw attached bytes.
    pub data: Vec<u8>,

    /// [MIME type][0] of the [`Attachment::data`].
    ///
    /// [0]: https://developer.mozilla.org/docs/Web/HTTP/Basics_of_HTTP/MIME_types
    pub media_type: String,
}

/// Capability of attaching [`Attachment`]s, provided by the executing engine.
#[derive(Clone, Debug)]
#[debug("Attach({:p})", Rc::as_ptr(_0).cast::<()>())]
pub struct Attach(Rc<dyn Fn(Attachment)>);

impl Default for Attach {
    /// Discards every [`Attachment`].
    fn default() -> Self {
        Self::new(drop)
    }
}

impl Attach {
    /// Creates a new [`Attach`] capability out of the given sink.
    #[must_use]
    pub fn new(sink: impl Fn(Attachment) + 'static) -> Self {
        Self(Rc::new(sink))
    }

    /// Attaches the given `data` with the given `media_type`.
    pub fn attach(&self, data: impl Into<Vec<u8>>, media_type: impl Into<String>) {
        (self.0)(Attachment { data: data.into(), media_type: media_type.into() });
    }
}

/// [`World`] used when the support code doesn't set its own constructor.
///
/// Simply stores the [`WorldInit`] it was created with.
#[derive(Clone, Debug)]
pub struct DefaultWorld {
    /// Capability of attaching artifacts to the report of the running
    /// scenario.
    pub attach: Attach,

    /// World parameters of the run.
    pub parameters: serde_json::Value,
}

impl World for DefaultWorld {
    fn new(WorldInit { attach, parameters }: WorldInit) -> Self {
        Self { attach, parameters }
    }
}

/// Callable instantiating a [`World`] for each scenario.
#[derive(Debug)]
#[debug("WorldConstructor({:p})", Rc::as_ptr(_0).cast::<()>())]
pub struct WorldConstructor<W>(Rc<dyn Fn(WorldInit) -> W>);

// Implemented manually to omit redundant `W: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<W> Clone for WorldConstructor<W> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<W: World> Default for WorldConstructor<W> {
    /// Delegates to [`World::new()`].
    fn default() -> Self {
        Self::new(W::new)
    }
}

impl<W> WorldConstructor<W> {
    /// Creates a new [`WorldConstructor`] out of the given function.
    #[must_use]
    pub fn new(f: impl Fn(WorldInit) -> W + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Instantiates a new [`World`].
    #[must_use]
    pub fn construct(&self, init: WorldInit) -> W {
        (self.0)(init)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn default_world_stores_init() {
        let attached = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&attached);
        let init = WorldInit {
            attach: Attach::new(move |a| sink.borrow_mut().push(a)),
            parameters: serde_json::json!({"browser": "firefox"}),
        };

        let world = WorldConstructor::<DefaultWorld>::default().construct(init);
        world.attach.attach("hello", "text/plain");

        assert_eq!(world.parameters["browser"], "firefox");
        assert_eq!(
            *attached.borrow(),
            [Attachment { data: b"hello".to_vec(), media_type: "text/plain".into() }],
        );
    }

    #[test]
    fn default_init_has_empty_parameters() {
        let world = DefaultWorld::new(WorldInit::default());

        assert_eq!(world.parameters, serde_json::json!({}));
        world.attach.attach(vec![1, 2, 3], "application/octet-stream");
    }

    #[test]
    fn custom_constructor_overrides_world_new() {
        struct Calculator {
            precision: u64,
        }

        impl World for Calculator {
            fn new(_: WorldInit) -> Self {
                Self { precision: 2 }
            }
        }

        let constructor = WorldConstructor::new(|init: WorldInit| Calculator {
            precision: init.parameters["precision"].as_u64().unwrap_or(0),
        });
        let world = constructor.construct(WorldInit {
            parameters: serde_json::json!({"precision": 8}),
            ..WorldInit::default()
        });

        assert_eq!(world.precision, 8);
        assert_eq!(Calculator::new(WorldInit::default()).precision, 2);
    }
}
