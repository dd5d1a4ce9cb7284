// SPDX-License-Identifier: MPL-2.0
//! Diagnostics domain types.
//!
//! - [`BufferCapacity`]: how many events the diagnostics buffer keeps

mod capacity;

pub use capacity::{buffer_capacity_bounds, BufferCapacity};
