use std::time::{Duration, Instant};

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub is_error: bool,
    pub expires_at: Instant,
    pub stamp: u64,
}

/// At most one visible toast. Each `show` bumps the stamp so that expiry
/// timers scheduled for an older toast are ignored.
#[derive(Debug, Default)]
pub struct ToastState {
    current: Option<Toast>,
    stamp: u64,
}

impl ToastState {
    /// Replace any visible toast. Returns the stamp for its expiry timer.
    pub fn show(&mut self, text: String, is_error: bool, now: Instant) -> u64 {
        self.stamp += 1;
        self.current = Some(Toast {
            text,
            is_error,
            expires_at: now + TOAST_DURATION,
            stamp: self.stamp,
        });
        self.stamp
    }

    /// Clear the toast if `stamp` is the current one and it has actually
    /// expired. Returns whether anything was cleared.
    pub fn expire(&mut self, stamp: u64, now: Instant) -> bool {
        match &self.current {
            Some(t) if t.stamp == stamp && now >= t.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_before_deadline_is_ignored() {
        let t0 = Instant::now();
        let mut toasts = ToastState::default();
        let stamp = toasts.show("saved".into(), false, t0);

        assert!(!toasts.expire(stamp, t0 + Duration::from_secs(1)));
        assert!(toasts.current().is_some());
        assert!(toasts.expire(stamp, t0 + TOAST_DURATION));
        assert!(toasts.current().is_none());
    }

    #[test]
    fn old_timer_cannot_clear_new_toast() {
        let t0 = Instant::now();
        let mut toasts = ToastState::default();
        let first = toasts.show("one".into(), false, t0);
        let t1 = t0 + Duration::from_secs(2);
        let second = toasts.show("two".into(), true, t1);
        assert_ne!(first, second);

        // The first toast's timer fires at t0+3s, after its own deadline.
        assert!(!toasts.expire(first, t0 + TOAST_DURATION));
        let current = toasts.current().unwrap();
        assert_eq!(current.text, "two");
        assert_eq!(current.expires_at, t1 + TOAST_DURATION);

        assert!(toasts.expire(second, t1 + TOAST_DURATION));
    }
}
