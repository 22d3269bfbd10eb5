//! Desktop notification support
//! Implements macOS (osascript) and Linux (notify-send) backends
use serde::{Deserialize, Serialize};
#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::process::Command;
use tracing::debug;

/// Whether the user allowed desktop notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not asked yet
    #[default]
    Default,
    Granted,
    Denied,
    /// No notification backend on this platform
    Unsupported,
}

impl Permission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Permission::Granted)
    }
}

/// A user-facing alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Something that can put a notification in front of the user
pub trait Notifier {
    /// Whether this notifier can show anything at all
    fn capability(&self) -> bool;

    fn show(&self, notification: &Notification);
}

/// Sends notifications through the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn capability(&self) -> bool {
        cfg!(any(target_os = "macos", target_os = "linux"))
    }

    fn show(&self, notification: &Notification) {
        #[cfg(target_os = "macos")]
        {
            let script = format!(
                r#"display notification "{}" with title "{}""#,
                notification.body.replace('"', "\\\""),
                notification.title.replace('"', "\\\"")
            );

            if let Err(e) = Command::new("osascript").arg("-e").arg(&script).output() {
                debug!(error = %e, "osascript failed");
            }
        }

        #[cfg(target_os = "linux")]
        {
            if let Err(e) = Command::new("notify-send")
                .arg(&notification.title)
                .arg(&notification.body)
                .output()
            {
                debug!(error = %e, "notify-send failed");
            }
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            debug!(title = %notification.title, "no notification backend");
        }
    }
}

/// Notifier that never shows anything (used with --no-notify)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn capability(&self) -> bool {
        false
    }

    fn show(&self, _notification: &Notification) {}
}

/// Resolve the effective permission from the stored answer and the backend
pub fn effective_permission(stored: Permission, notifier: &dyn Notifier) -> Permission {
    if !notifier.capability() {
        return Permission::Unsupported;
    }
    match stored {
        // A stored "unsupported" from another machine means we never asked here
        Permission::Unsupported => Permission::Default,
        other => other,
    }
}
