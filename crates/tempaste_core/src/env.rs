//! Scoped environment overrides for tests that read configuration from env.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[allow(unused_unsafe)]
fn write_var(key: &str, value: Option<&str>) {
    // SAFETY: every writer holds the process-wide lock owned by `ScopedEnv`.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Holds the process-wide env lock and restores every touched variable on drop.
pub struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Acquire the env lock. Blocks while another test holds a scope.
    pub fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: env_lock().lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Set `key=value` for the lifetime of this scope.
    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.remember(key);
        write_var(key, Some(value));
        self
    }

    /// Unset `key` for the lifetime of this scope.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.remember(key);
        write_var(key, None);
        self
    }

    fn remember(&mut self, key: &str) {
        if self.saved.iter().all(|(saved, _)| saved != key) {
            self.saved.push((key.to_string(), std::env::var(key).ok()));
        }
    }
}

impl Default for ScopedEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            write_var(&key, previous.as_deref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScopedEnv;

    #[test]
    fn restores_previous_values_in_reverse_order() {
        let key = "TEMPASTE_TEST_SCOPED_ENV_RESTORE";
        {
            let mut outer = ScopedEnv::new();
            outer.set(key, "before");
            outer.set(key, "after").remove("TEMPASTE_TEST_SCOPED_ENV_OTHER");
            assert_eq!(std::env::var(key).ok().as_deref(), Some("after"));
        }
        assert!(std::env::var(key).is_err());
    }

    #[test]
    fn first_snapshot_wins_when_a_key_is_touched_twice() {
        let key = "TEMPASTE_TEST_SCOPED_ENV_REMOVE";
        {
            let mut scope = ScopedEnv::new();
            scope.remove(key).set(key, "temporary");
            assert_eq!(std::env::var(key).ok().as_deref(), Some("temporary"));
        }
        assert!(std::env::var(key).is_err());
    }
}
