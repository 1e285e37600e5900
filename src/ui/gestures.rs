use eframe::egui::Pos2;

pub const LONG_PRESS_SECS: f64 = 0.5;
pub const LONG_PRESS_TOLERANCE: f32 = 10.0;

const HEADER_TOP_ZONE: f32 = 8.0;
const HEADER_SCROLL_DELTA: f32 = 2.0;

#[derive(Debug, Clone)]
struct PendingPress {
    item_id: String,
    started_at: f64,
    origin: Pos2,
}

/// Cancellable hold timer driven by the frame clock.
///
/// A new press replaces the pending one; release or movement past the
/// tolerance cancels it; `poll` fires at most once per press. The row a
/// press fired on is remembered until the next press, so the release that
/// ends the hold is not taken as a tap.
#[derive(Debug, Clone)]
pub struct LongPress {
    pending: Option<PendingPress>,
    fired: Option<String>,
    hold_secs: f64,
    tolerance: f32,
}

impl Default for LongPress {
    fn default() -> Self {
        Self::new(LONG_PRESS_SECS, LONG_PRESS_TOLERANCE)
    }
}

impl LongPress {
    pub fn new(hold_secs: f64, tolerance: f32) -> Self {
        Self {
            pending: None,
            fired: None,
            hold_secs,
            tolerance,
        }
    }

    pub fn press(&mut self, item_id: &str, now: f64, at: Pos2) {
        self.fired = None;
        self.pending = Some(PendingPress {
            item_id: item_id.to_string(),
            started_at: now,
            origin: at,
        });
    }

    pub fn release(&mut self) {
        self.pending = None;
    }

    pub fn pointer_moved(&mut self, to: Pos2) {
        if let Some(pending) = &self.pending {
            if pending.origin.distance(to) > self.tolerance {
                self.pending = None;
            }
        }
    }

    /// Seconds until the pending press fires.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.pending
            .as_ref()
            .map(|p| (p.started_at + self.hold_secs - now).max(0.0))
    }

    /// Item id and press position once the hold time has elapsed.
    pub fn poll(&mut self, now: f64) -> Option<(String, Pos2)> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| now - p.started_at >= self.hold_secs);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        self.fired = Some(pending.item_id.clone());
        Some((pending.item_id, pending.origin))
    }

    pub fn clear_fired(&mut self) {
        self.fired = None;
    }

    /// Whether the current gesture on `item_id` already fired as a long press.
    pub fn fired_on(&self, item_id: &str) -> bool {
        self.fired.as_deref() == Some(item_id)
    }
}

/// Hides the header while scrolling down and shows it again on the way up.
#[derive(Debug, Clone, Default)]
pub struct HeaderVisibility {
    hidden: bool,
    last_offset: f32,
}

impl HeaderVisibility {
    pub fn on_scroll(&mut self, offset: f32) -> bool {
        let delta = offset - self.last_offset;
        self.last_offset = offset;
        if offset <= HEADER_TOP_ZONE {
            self.hidden = false;
        } else if delta > HEADER_SCROLL_DELTA {
            self.hidden = true;
        } else if delta < -HEADER_SCROLL_DELTA {
            self.hidden = false;
        }
        self.hidden
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}
