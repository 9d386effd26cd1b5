//! Output buffer with retroactive insertion.
//!
//! The buffer is append-only from the handlers' point of view, with three
//! escape hatches needed by OSIS rendering:
//!
//! - one *insertion window*: `main[pos..]` is lifted out so later writes land
//!   before text that was already emitted (titles before verse numbers);
//! - a *temp store* that diverts writes while a note or reference is being
//!   captured;
//! - a *suppression* counter for content that must not be shown.
//!
//! Routing priority on every write is suppression, then capture, then main.

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;

use quick_xml::escape::partial_escape;

/// Growable HTML sink for one render pass.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    main: String,
    temp: String,
    tail: Option<String>,
    capture_depth: usize,
    suppress_depth: usize,
    max_bytes: Option<usize>,
    overflowed: bool,
}

impl OutputBuffer {
    /// Unbounded buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer that stops accepting writes past `max_bytes` (`None` = unbounded).
    pub fn with_limit(max_bytes: Option<usize>) -> Self {
        Self {
            max_bytes,
            ..Self::default()
        }
    }

    /// Append raw markup.
    pub fn append(&mut self, text: &str) {
        if text.is_empty() || self.suppress_depth > 0 {
            return;
        }
        if !self.reserve(text.len()) {
            return;
        }
        if self.capture_depth > 0 {
            self.temp.push_str(text);
        } else {
            self.main.push_str(text);
        }
    }

    /// Append character data.
    ///
    /// Text landing in `main` is HTML-escaped; captured text is kept plain so
    /// extracted notes carry readable text.
    pub fn append_text(&mut self, text: &str) {
        if self.capture_depth > 0 || self.suppress_depth > 0 {
            self.append(text);
            return;
        }
        let escaped: Cow<'_, str> = partial_escape(text);
        self.append(&escaped);
    }

    fn reserve(&mut self, additional: usize) -> bool {
        if self.overflowed {
            return false;
        }
        if let Some(limit) = self.max_bytes {
            let held =
                self.main.len() + self.temp.len() + self.tail.as_ref().map_or(0, String::len);
            if held + additional > limit {
                log::warn!(
                    "[BUFFER] Output limit of {} bytes reached ({} held, {} requested)",
                    limit,
                    held,
                    additional
                );
                self.overflowed = true;
                return false;
            }
        }
        true
    }

    /// Current length of `main`, usable as a bookmark.
    pub fn position(&self) -> usize {
        self.main.len()
    }

    /// Lift `main[pos..]` aside so following writes land at `pos`.
    ///
    /// Only one window can be open. A second call closes the current window
    /// first and then opens the new one.
    pub fn begin_insert_at(&mut self, pos: usize) {
        if self.tail.is_some() {
            log::warn!("[BUFFER] Insertion window already open; closing it before reopening");
            self.finish_insert();
        }
        let pos = self.boundary_at_or_before(pos);
        self.tail = Some(self.main.split_off(pos));
    }

    /// Put the lifted tail back. No-op when no window is open.
    pub fn finish_insert(&mut self) {
        if let Some(tail) = self.tail.take() {
            self.main.push_str(&tail);
        }
    }

    /// Drop a window left open by unbalanced markup. Returns whether one was open.
    pub fn abort_unterminated_insert(&mut self) -> bool {
        match self.tail.take() {
            Some(tail) => {
                log::warn!(
                    "[BUFFER] Discarding unterminated insertion window ({} bytes)",
                    tail.len()
                );
                true
            }
            None => false,
        }
    }

    /// Whether an insertion window is open.
    pub fn is_inserting(&self) -> bool {
        self.tail.is_some()
    }

    /// Truncate `main` back to `pos`.
    pub fn remove_after(&mut self, pos: usize) {
        if pos < self.main.len() {
            let pos = self.boundary_at_or_before(pos);
            self.main.truncate(pos);
        }
    }

    /// Enter a capture scope: writes go to the temp store.
    pub fn begin_capture(&mut self) {
        self.capture_depth += 1;
    }

    /// Leave a capture scope.
    pub fn end_capture(&mut self) {
        self.capture_depth = self.capture_depth.saturating_sub(1);
    }

    /// Leave every capture scope at once. Returns how many were open.
    pub fn reset_capture(&mut self) -> usize {
        let open = self.capture_depth;
        self.capture_depth = 0;
        self.temp.clear();
        open
    }

    /// Whether writes currently go to the temp store.
    pub fn is_capturing(&self) -> bool {
        self.capture_depth > 0
    }

    /// Drain the temp store.
    pub fn clear_temp(&mut self) -> String {
        core::mem::take(&mut self.temp)
    }

    /// Read the temp store without draining it.
    pub fn peek_temp(&self) -> &str {
        &self.temp
    }

    /// Current temp store length, usable as a capture mark.
    pub fn temp_len(&self) -> usize {
        self.temp.len()
    }

    /// Drain only the temp text written after `mark`.
    pub fn drain_temp_from(&mut self, mark: usize) -> String {
        if mark >= self.temp.len() {
            return String::new();
        }
        let mut mark = mark;
        while !self.temp.is_char_boundary(mark) {
            mark -= 1;
        }
        self.temp.split_off(mark)
    }

    /// Push (`true`) or pop (`false`) one level of write suppression.
    pub fn set_suppressed(&mut self, suppressed: bool) {
        if suppressed {
            self.suppress_depth += 1;
        } else {
            self.suppress_depth = self.suppress_depth.saturating_sub(1);
        }
    }

    /// Whether writes are currently discarded.
    pub fn is_suppressed(&self) -> bool {
        self.suppress_depth > 0
    }

    /// Whether the next write would reach `main`.
    pub fn writes_to_main(&self) -> bool {
        self.suppress_depth == 0 && self.capture_depth == 0
    }

    /// Whether the byte limit was hit.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Rendered HTML so far (excluding a lifted tail).
    pub fn as_str(&self) -> &str {
        &self.main
    }

    /// Consume the buffer, restoring any open window.
    pub fn into_string(mut self) -> String {
        self.finish_insert();
        self.main
    }

    fn boundary_at_or_before(&self, pos: usize) -> usize {
        let mut pos = pos.min(self.main.len());
        while !self.main.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }
}
