use crate::{error::StagegateResult, time::Millis};

/// Autoplay permission as negotiated with the host runtime.
///
/// `Denied` is transient: it only drives the resume affordance and flips back
/// to `Granted` on explicit consent or any successful external play event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Permission {
    Unknown,
    Granted,
    Denied,
}

/// How strictly the visual sequence waits on an audio answer.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AudioGatePolicy {
    /// Full-screen consent question; nothing advances until answered.
    BlockingConsent,
    /// Autoplay immediately; on rejection show a resume affordance but let
    /// the sequence run. Production default.
    #[default]
    NonBlockingPrompt,
    /// Autoplay immediately; on rejection stay silent with no affordance.
    SilentFallback,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct AudioState {
    pub permission: Permission,
    pub playing: bool,
    /// Wall-clock instant the engine began waiting for audio. Basis for the
    /// resume offset so a late start still sounds continuous.
    pub started_at: Millis,
}

impl AudioState {
    pub fn new(started_at: Millis) -> Self {
        Self {
            permission: Permission::Unknown,
            playing: false,
            started_at,
        }
    }
}

/// The host refused to start playback without a prior user gesture.
///
/// Expected, not exceptional: callers convert it into `Permission::Denied`
/// instead of propagating.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("autoplay rejected by host policy")]
pub struct PlayRejected;

/// Seam to the single audio source. The controller is the only writer; no
/// other component touches playback directly.
pub trait AudioSink {
    fn set_volume(&mut self, volume: f64);
    fn play(&mut self) -> Result<(), PlayRejected>;
    fn pause(&mut self);
    fn seek(&mut self, position: Millis);
    /// Loop length of the source, when metadata has loaded.
    fn duration(&self) -> Option<Millis>;
}

/// Audio policy controller: reconciles autoplay policy, user consent, and
/// playback position with the sequence clock.
#[derive(Debug)]
pub struct AudioController {
    state: AudioState,
    volume: f64,
    policy: AudioGatePolicy,
}

impl AudioController {
    pub fn new(policy: AudioGatePolicy, volume: f64, now: Millis) -> Self {
        Self {
            state: AudioState::new(now),
            volume,
            policy,
        }
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn policy(&self) -> AudioGatePolicy {
        self.policy
    }

    /// Attempt autoplay at the configured volume.
    ///
    /// Success grants permission immediately; rejection parks the controller
    /// in `Denied` so the resume affordance can show. Never fails the caller.
    pub fn begin(&mut self, sink: &mut dyn AudioSink) {
        sink.set_volume(self.volume);
        match sink.play() {
            Ok(()) => {
                tracing::debug!("autoplay accepted");
                self.state.permission = Permission::Granted;
                self.state.playing = true;
            }
            Err(PlayRejected) => {
                tracing::info!("autoplay rejected, waiting for user gesture");
                self.state.permission = Permission::Denied;
                self.state.playing = false;
            }
        }
    }

    /// Playback position that makes a delayed start appear continuous with
    /// `started_at`. Falls back to absolute elapsed time when the sink has no
    /// duration metadata yet.
    pub fn resume_offset(&self, sink: &dyn AudioSink, now: Millis) -> StagegateResult<Millis> {
        let elapsed = now.since(self.state.started_at);
        match sink.duration() {
            Some(duration) if duration.0 > 0 => elapsed.rem(duration),
            _ => Ok(elapsed),
        }
    }

    /// User gesture on the resume affordance: seek to the continuity offset
    /// and start playback. Idempotent once granted and playing.
    pub fn resume(&mut self, sink: &mut dyn AudioSink, now: Millis) -> StagegateResult<()> {
        if self.state.permission == Permission::Granted && self.state.playing {
            return Ok(());
        }
        let offset = self.resume_offset(sink, now)?;
        sink.seek(offset);
        if sink.play().is_ok() {
            tracing::debug!(offset_ms = offset.0, "resumed playback");
            self.state.permission = Permission::Granted;
            self.state.playing = true;
        }
        Ok(())
    }

    /// Binary consent answer from the gating screen. Either answer settles
    /// permission; only a yes starts playback.
    pub fn consent(&mut self, sink: &mut dyn AudioSink, allow: bool, now: Millis) -> StagegateResult<()> {
        if allow {
            self.resume(sink, now)
        } else {
            sink.pause();
            self.state.permission = Permission::Granted;
            self.state.playing = false;
            Ok(())
        }
    }

    /// A successful play event from any source clears a transient denial.
    /// Dispatching while already granted leaves state unchanged.
    pub fn external_play(&mut self) {
        if self.state.permission != Permission::Granted || !self.state.playing {
            self.state.permission = Permission::Granted;
            self.state.playing = true;
        }
    }

    /// Whether the "enable sound" affordance should be visible.
    pub fn resume_visible(&self) -> bool {
        self.state.permission == Permission::Denied
            && !matches!(self.policy, AudioGatePolicy::SilentFallback)
    }
}

#[cfg(test)]
pub(crate) mod test_sink {
    use super::*;

    /// Scripted sink: rejects the first `reject_first` play attempts.
    #[derive(Debug, Default)]
    pub struct ScriptedSink {
        pub reject_first: u32,
        pub plays: u32,
        pub volume: f64,
        pub position: Option<Millis>,
        pub duration: Option<Millis>,
        pub paused: bool,
    }

    impl AudioSink for ScriptedSink {
        fn set_volume(&mut self, volume: f64) {
            self.volume = volume;
        }

        fn play(&mut self) -> Result<(), PlayRejected> {
            if self.plays < self.reject_first {
                self.plays += 1;
                return Err(PlayRejected);
            }
            self.plays += 1;
            self.paused = false;
            Ok(())
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn seek(&mut self, position: Millis) {
            self.position = Some(position);
        }

        fn duration(&self) -> Option<Millis> {
            self.duration
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_sink::ScriptedSink;
    use super::*;

    #[test]
    fn autoplay_success_grants_immediately() {
        let mut sink = ScriptedSink::default();
        let mut ctl = AudioController::new(AudioGatePolicy::NonBlockingPrompt, 0.5, Millis(0));
        ctl.begin(&mut sink);
        assert_eq!(ctl.state().permission, Permission::Granted);
        assert!(ctl.state().playing);
        assert_eq!(sink.volume, 0.5);
        assert!(!ctl.resume_visible());
    }

    #[test]
    fn rejection_shows_resume_affordance() {
        let mut sink = ScriptedSink {
            reject_first: 1,
            ..Default::default()
        };
        let mut ctl = AudioController::new(AudioGatePolicy::NonBlockingPrompt, 0.5, Millis(0));
        ctl.begin(&mut sink);
        assert_eq!(ctl.state().permission, Permission::Denied);
        assert!(ctl.resume_visible());
    }

    #[test]
    fn silent_fallback_never_prompts() {
        let mut sink = ScriptedSink {
            reject_first: 1,
            ..Default::default()
        };
        let mut ctl = AudioController::new(AudioGatePolicy::SilentFallback, 0.5, Millis(0));
        ctl.begin(&mut sink);
        assert_eq!(ctl.state().permission, Permission::Denied);
        assert!(!ctl.resume_visible());
    }

    #[test]
    fn resume_offset_wraps_on_known_duration() {
        let mut sink = ScriptedSink {
            reject_first: 1,
            duration: Some(Millis(5_000)),
            ..Default::default()
        };
        let mut ctl = AudioController::new(AudioGatePolicy::NonBlockingPrompt, 0.5, Millis(0));
        ctl.begin(&mut sink);
        ctl.resume(&mut sink, Millis(12_300)).unwrap();
        assert_eq!(sink.position, Some(Millis(2_300)));
        assert_eq!(ctl.state().permission, Permission::Granted);
        assert!(ctl.state().playing);
    }

    #[test]
    fn resume_offset_is_absolute_without_duration() {
        let mut sink = ScriptedSink {
            reject_first: 1,
            ..Default::default()
        };
        let mut ctl = AudioController::new(AudioGatePolicy::NonBlockingPrompt, 0.5, Millis(0));
        ctl.begin(&mut sink);
        ctl.resume(&mut sink, Millis(12_300)).unwrap();
        assert_eq!(sink.position, Some(Millis(12_300)));
    }

    #[test]
    fn resume_is_idempotent_once_playing() {
        let mut sink = ScriptedSink::default();
        let mut ctl = AudioController::new(AudioGatePolicy::NonBlockingPrompt, 0.5, Millis(0));
        ctl.begin(&mut sink);
        let plays_after_begin = sink.plays;
        ctl.resume(&mut sink, Millis(9_999)).unwrap();
        assert_eq!(sink.plays, plays_after_begin);
        assert_eq!(sink.position, None);
    }

    #[test]
    fn external_play_clears_denied_once() {
        let mut sink = ScriptedSink {
            reject_first: 1,
            ..Default::default()
        };
        let mut ctl = AudioController::new(AudioGatePolicy::NonBlockingPrompt, 0.5, Millis(0));
        ctl.begin(&mut sink);
        ctl.external_play();
        let snapshot = ctl.state();
        ctl.external_play();
        assert_eq!(ctl.state(), snapshot);
        assert!(!ctl.resume_visible());
    }

    #[test]
    fn declining_consent_settles_without_playback() {
        let mut sink = ScriptedSink {
            reject_first: 1,
            ..Default::default()
        };
        let mut ctl = AudioController::new(AudioGatePolicy::BlockingConsent, 0.5, Millis(0));
        ctl.begin(&mut sink);
        ctl.consent(&mut sink, false, Millis(3_000)).unwrap();
        assert_eq!(ctl.state().permission, Permission::Granted);
        assert!(!ctl.state().playing);
        assert!(sink.paused);
    }
}
