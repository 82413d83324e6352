// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Custom [parameter types][0] and the registry owning them.
//!
//! [0]: https://github.com/cucumber/cucumber-expressions#custom-parameter-types

mod parameter_type;
mod registry;

pub use self::{
    parameter_type::{
        build_parameter_type, ParameterType, ParameterTypeOptions,
        TransformResult, Transformer,
    },
    registry::ParameterTypeRegistry,
};
