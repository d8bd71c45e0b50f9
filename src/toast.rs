use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A short-lived message shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    /// Session clock time (seconds) after which the toast disappears
    pub expires_at: f64,
}

/// Queue of visible toasts, dismissed automatically once they expire
#[derive(Debug, Clone)]
pub struct Toasts {
    duration: Duration,
    active: Vec<Toast>,
}

impl Toasts {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            active: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, level: ToastLevel, now: f64) {
        self.active.push(Toast {
            message: message.into(),
            level,
            expires_at: now + self.duration.as_secs_f64(),
        });
    }

    /// Drop every toast whose time is up
    pub fn prune(&mut self, now: f64) {
        self.active.retain(|toast| toast.expires_at > now);
    }

    pub fn active(&self) -> &[Toast] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_duration() {
        let mut toasts = Toasts::new(Duration::from_secs(3));
        toasts.push("text element added", ToastLevel::Success, 10.0);
        toasts.push("later", ToastLevel::Info, 12.0);

        toasts.prune(12.9);
        assert_eq!(toasts.active().len(), 2);

        toasts.prune(13.0);
        assert_eq!(toasts.active().len(), 1);
        assert_eq!(toasts.active()[0].message, "later");

        toasts.prune(15.0);
        assert!(toasts.is_empty());
    }
}
