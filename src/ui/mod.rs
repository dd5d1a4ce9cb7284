// SPDX-License-Identifier: MPL-2.0
//! State shared with the presentation layer.
//!
//! Rendering itself lives outside this crate; what remains here is the
//! state a renderer reads, such as the alert queue.

pub mod notifications;
