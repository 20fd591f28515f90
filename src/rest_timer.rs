/// Rest countdown between sets, driven by the runtime's one-second tick.
///
/// The timer never sleeps or spawns anything itself; it only advances when
/// `on_tick` is called. A suspended process therefore pauses the countdown,
/// which is the documented behavior. Only one timer is meant to be live at a
/// time: constructing a replacement drops the old one, which is the whole
/// cancellation model.
///
/// Completion is reported exactly once, as the `true` return from whichever
/// of `on_tick` or `skip` finishes the timer. Later ticks are inert.
#[derive(Debug)]
pub struct RestTimer {
    remaining_secs: u32,
    finished: bool,
}

impl RestTimer {
    pub fn new(secs: u32) -> Self {
        Self {
            remaining_secs: secs,
            finished: false,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances the countdown by one second. Returns true on the tick that
    /// reaches zero, false on every other call.
    pub fn on_tick(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.finished = true;
            return true;
        }
        false
    }

    /// Ends the countdown immediately. Returns true iff the timer had not
    /// already finished.
    pub fn skip(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.remaining_secs = 0;
        self.finished = true;
        true
    }

    /// Adds time to a running countdown (e.g. +30s). No-op once finished.
    pub fn extend(&mut self, secs: u32) {
        if !self.finished {
            self.remaining_secs = self.remaining_secs.saturating_add(secs);
        }
    }
}
