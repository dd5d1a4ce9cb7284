// SPDX-License-Identifier: MPL-2.0
//! Domain error types.
//!
//! - [`Failure`]: any caught failure, normalized into a closed set of shapes
//! - [`ErrorKind`]: the user-facing taxonomy a failure is classified into

mod failure;
mod kind;

pub use failure::{BackendCode, Failure};
pub use kind::ErrorKind;
