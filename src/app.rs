//! Live application state: the current frame and debounced rebuilds.
//!
//! Edits arrive faster than frames can be rebuilt. Each request replaces the
//! pending one and pushes the deadline back, so a burst of edits results in a
//! single rebuild with the latest input.

use crate::frame::{Frame, FrameError, FrameParameters, RawFrameInput, assemble_frame};

pub const DEFAULT_DEBOUNCE_MS: f64 = 200.0;

#[derive(Debug, Clone)]
struct PendingRebuild {
    input: RawFrameInput,
    due_ms: f64,
}

/// Owns the frame shown to the user.
#[derive(Debug, Clone)]
pub struct AppState {
    frame: Frame,
    pending: Option<PendingRebuild>,
    debounce_ms: f64,
    rebuild_count: u64,
}

impl AppState {
    /// Start with a frame built from the defaults.
    ///
    /// # Errors
    /// Returns [`FrameError`] if the default frame cannot be built.
    pub fn new() -> Result<Self, FrameError> {
        Self::with_debounce(DEFAULT_DEBOUNCE_MS)
    }

    /// Like [`AppState::new`] with a custom delay. Negative or non-finite
    /// delays fall back to the default.
    ///
    /// # Errors
    /// Returns [`FrameError`] if the default frame cannot be built.
    pub fn with_debounce(debounce_ms: f64) -> Result<Self, FrameError> {
        let debounce_ms = if debounce_ms.is_finite() && debounce_ms >= 0.0 {
            debounce_ms
        } else {
            DEFAULT_DEBOUNCE_MS
        };
        Ok(Self {
            frame: assemble_frame(FrameParameters::default())?,
            pending: None,
            debounce_ms,
            rebuild_count: 0,
        })
    }

    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[must_use]
    pub fn debounce_ms(&self) -> f64 {
        self.debounce_ms
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of rebuilds since construction, the initial build excluded.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Queue `input`, dropping any earlier pending input.
    pub fn request_rebuild(&mut self, input: RawFrameInput, now_ms: f64) {
        self.pending = Some(PendingRebuild {
            input,
            due_ms: now_ms + self.debounce_ms,
        });
    }

    /// Rebuild if the pending request is due. Returns whether it rebuilt.
    ///
    /// # Errors
    /// Returns [`FrameError`] if the rebuild fails. The previous frame is
    /// kept and the request is dropped.
    pub fn poll(&mut self, now_ms: f64) -> Result<bool, FrameError> {
        match self.pending.take() {
            Some(pending) if now_ms >= pending.due_ms => {
                self.rebuild_now(&pending.input)?;
                Ok(true)
            }
            other => {
                self.pending = other;
                Ok(false)
            }
        }
    }

    /// Rebuild immediately, discarding anything pending.
    ///
    /// # Errors
    /// Returns [`FrameError`] if the rebuild fails.
    pub fn rebuild_now(&mut self, input: &RawFrameInput) -> Result<&Frame, FrameError> {
        self.pending = None;
        self.replace(input.to_parameters())
    }

    /// Back to the default parameters.
    ///
    /// # Errors
    /// Returns [`FrameError`] if the rebuild fails.
    pub fn reset(&mut self) -> Result<&Frame, FrameError> {
        self.pending = None;
        self.replace(FrameParameters::default())
    }

    fn replace(&mut self, params: FrameParameters) -> Result<&Frame, FrameError> {
        self.frame = assemble_frame(params)?;
        self.rebuild_count += 1;
        log::debug!("rebuild #{}", self.rebuild_count);
        Ok(&self.frame)
    }
}
