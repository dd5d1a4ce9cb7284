// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Backend**: where user documents live
//! - **Alerts**: how many alerts show at once and for how long

// ==========================================================================
// Backend Defaults
// ==========================================================================

/// Collection holding one document per user, keyed by the auth user key.
pub const DEFAULT_USERS_COLLECTION: &str = "Users";

// ==========================================================================
// Alert Defaults
// ==========================================================================

/// Maximum number of alerts visible at once.
pub const DEFAULT_MAX_VISIBLE_ALERTS: usize = 3;

/// Upper bound for the configured number of visible alerts.
pub const MAX_VISIBLE_ALERTS_LIMIT: usize = 10;

/// Display time of info alerts, in seconds.
pub const INFO_DISMISS_SECS: u64 = 3;

/// Display time of warning alerts, in seconds.
pub const WARNING_DISMISS_SECS: u64 = 5;
