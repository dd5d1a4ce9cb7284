// SPDX-License-Identifier: MPL-2.0
//! Alert queue for user feedback.
//!
//! Alerts are short, localized messages (most often a classified error)
//! that the presentation layer shows as toasts and removes again, either
//! when the user dismisses them or when their display time runs out.
//!
//! # Components
//!
//! - [`notification`] - `Alert` record and `Severity` levels
//! - [`manager`] - `Manager`, the ordered queue alerts are pushed into
//!
//! # Usage
//!
//! ```
//! use session_shell::ui::notifications::{Manager, Severity};
//!
//! let mut alerts = Manager::new();
//! let alert = alerts.push(Severity::Error, "Unable to reach the server.");
//! assert_eq!(alerts.len(), 1);
//!
//! alerts.dismiss(alert.id());
//! assert!(alerts.is_empty());
//! ```
//!
//! # Display rules
//!
//! - Info disappears after 3s, warnings after 5s, errors stay until dismissed
//! - At most `max_visible` alerts are shown; later ones wait their turn

mod manager;
mod notification;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Alert, AlertId, Severity};
