//! Macro recorder — captures keys typed during an insert session so the
//! session can be replayed.

use tracing::debug;

/// Records keys between [`begin`](Self::begin) and [`end`](Self::end).
#[derive(Debug, Default)]
pub struct MacroRecorder {
    /// The recording in progress, if any.
    active: Option<String>,
    /// The most recently finished recording.
    last: Option<String>,
}

impl MacroRecorder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: None,
            last: None,
        }
    }

    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Start recording. Does nothing if a recording is already running.
    pub fn begin(&mut self) {
        if self.active.is_none() {
            debug!("macro recording started");
            self.active = Some(String::new());
        }
    }

    /// Stop recording and keep the result as the last recording. Does
    /// nothing if no recording is running.
    pub fn end(&mut self) {
        if let Some(keys) = self.active.take() {
            debug!(keys = keys.as_str(), "macro recording stopped");
            self.last = Some(keys);
        }
    }

    /// Append keys to the running recording, if any.
    pub fn record(&mut self, keys: &str) {
        if let Some(active) = &mut self.active {
            active.push_str(keys);
        }
    }

    /// The keys of the recording in progress.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The most recently finished recording.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_only_while_active() {
        let mut rec = MacroRecorder::new();
        rec.record("lost");
        rec.begin();
        rec.record("ab");
        rec.record("c");
        assert_eq!(rec.current(), Some("abc"));
        rec.end();
        rec.record("lost");
        assert_eq!(rec.last(), Some("abc"));
        assert!(!rec.is_recording());
    }

    #[test]
    fn begin_while_recording_keeps_progress() {
        let mut rec = MacroRecorder::new();
        rec.begin();
        rec.record("x");
        rec.begin();
        assert_eq!(rec.current(), Some("x"));
    }

    #[test]
    fn end_while_idle_keeps_last() {
        let mut rec = MacroRecorder::new();
        rec.begin();
        rec.record("x");
        rec.end();
        rec.end();
        assert_eq!(rec.last(), Some("x"));
    }
}
