use crate::time::Millis;

/// Fixed delay between entering `Intro` and the reveal. Product constant.
pub const REVEAL_DELAY: Millis = Millis(5758);

/// Discrete phase of the reveal sequence. Ordered; transitions never regress.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Stage {
    /// Waiting on an explicit audio answer (blocking-consent policy only).
    Gating,
    /// Ambient intro running; the reveal timer is armed.
    Intro,
    /// Terminal: full composition visible.
    Revealed,
}

/// Timer-driven state machine advancing `Gating -> Intro -> Revealed`.
///
/// The one-shot reveal timer is a deadline polled via [`Sequencer::tick`]; the
/// host's real timer just calls `tick` with its timestamp. `cancel` on
/// teardown guarantees a late tick cannot fire the transition.
#[derive(Clone, Debug)]
pub struct Sequencer {
    stage: Stage,
    entered_at: Millis,
    reveal_delay: Millis,
    deadline: Option<Millis>,
}

impl Sequencer {
    /// Start in `Gating` when `gated`, otherwise directly in `Intro` with the
    /// reveal timer armed.
    pub fn start(gated: bool, reveal_delay: Millis, now: Millis) -> Self {
        let mut seq = Self {
            stage: Stage::Gating,
            entered_at: now,
            reveal_delay,
            deadline: None,
        };
        if !gated {
            seq.open_gate(now);
        }
        seq
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Elapsed time in the current stage, for animation sampling.
    pub fn elapsed(&self, now: Millis) -> Millis {
        now.since(self.entered_at)
    }

    /// `Gating -> Intro`: arms the reveal deadline exactly once. No-op from
    /// any later stage, so rapid duplicate gate events cannot re-arm.
    pub fn open_gate(&mut self, now: Millis) {
        if self.stage != Stage::Gating {
            return;
        }
        self.stage = Stage::Intro;
        self.entered_at = now;
        self.deadline = Some(now.add(self.reveal_delay));
        tracing::debug!(deadline_ms = self.deadline.map(|d| d.0), "entered intro");
    }

    /// Fire `Intro -> Revealed` when the armed deadline has passed. Returns
    /// whether the transition fired on this call.
    pub fn tick(&mut self, now: Millis) -> bool {
        match self.deadline {
            Some(deadline) if self.stage == Stage::Intro && now >= deadline => {
                self.stage = Stage::Revealed;
                self.entered_at = now;
                self.deadline = None;
                tracing::info!("revealed");
                true
            }
            _ => false,
        }
    }

    /// Disarm the pending timer. Part of teardown; a tick afterwards is inert.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_fires_at_exact_delay_never_earlier() {
        let mut seq = Sequencer::start(false, REVEAL_DELAY, Millis(100));
        assert_eq!(seq.stage(), Stage::Intro);
        assert!(!seq.tick(Millis(100 + 5757)));
        assert_eq!(seq.stage(), Stage::Intro);
        assert!(seq.tick(Millis(100 + 5758)));
        assert_eq!(seq.stage(), Stage::Revealed);
    }

    #[test]
    fn reveal_fires_only_once() {
        let mut seq = Sequencer::start(false, REVEAL_DELAY, Millis(0));
        assert!(seq.tick(Millis(6_000)));
        assert!(!seq.tick(Millis(7_000)));
        assert_eq!(seq.stage(), Stage::Revealed);
    }

    #[test]
    fn cancel_prevents_late_fire() {
        let mut seq = Sequencer::start(false, REVEAL_DELAY, Millis(0));
        seq.cancel();
        assert!(!seq.tick(Millis(60_000)));
        assert_eq!(seq.stage(), Stage::Intro);
    }

    #[test]
    fn gated_start_waits_for_gate() {
        let mut seq = Sequencer::start(true, REVEAL_DELAY, Millis(0));
        assert_eq!(seq.stage(), Stage::Gating);
        assert!(!seq.tick(Millis(60_000)));
        seq.open_gate(Millis(2_000));
        assert_eq!(seq.stage(), Stage::Intro);
        assert!(!seq.tick(Millis(2_000 + 5757)));
        assert!(seq.tick(Millis(2_000 + 5758)));
    }

    #[test]
    fn duplicate_gate_events_do_not_rearm() {
        let mut seq = Sequencer::start(true, REVEAL_DELAY, Millis(0));
        seq.open_gate(Millis(1_000));
        seq.open_gate(Millis(4_000));
        assert!(seq.tick(Millis(1_000 + 5758)));
    }

    #[test]
    fn elapsed_tracks_stage_entry() {
        let mut seq = Sequencer::start(false, REVEAL_DELAY, Millis(500));
        assert_eq!(seq.elapsed(Millis(1_500)), Millis(1_000));
        seq.tick(Millis(500 + 5758));
        assert_eq!(seq.elapsed(Millis(500 + 5758 + 250)), Millis(250));
    }
}
