use crate::{
    audio::{AudioController, AudioGatePolicy, AudioSink, AudioState},
    compose::{self, LayerFrame},
    error::StagegateResult,
    model::EngineConfig,
    stage::{Sequencer, Stage},
    text::{GateFrame, GateScreen, TextFrame, TextReveal},
    time::Millis,
};

/// User and host events fed into the engine. All state transitions flow
/// through [`IntroEngine::handle`] or [`IntroEngine::tick`]; nothing else
/// writes the state tuple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// Answer from the consent screen (blocking-consent policy).
    Consent(bool),
    /// The "enable sound" affordance was pressed.
    ResumePressed,
    /// The host observed a successful play event from any source.
    ExternalPlay,
    /// Pointer hover passthrough for the graphics collaborator.
    PointerHover(bool),
}

/// Shared state tuple handed to subscribers after each transition.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Snapshot {
    pub stage: Stage,
    pub audio: AudioState,
    pub resume_visible: bool,
    pub hovering: bool,
}

/// One fully evaluated frame: everything the host renderer needs.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SceneFrame {
    pub stage: Stage,
    pub audio: AudioState,
    pub resume_visible: bool,
    pub layers: Vec<LayerFrame>,
    pub text: TextFrame,
    pub gate: GateFrame,
}

type Subscriber = Box<dyn FnMut(&Snapshot)>;

/// Presentation sequencing engine: owns the `(stage, audio)` state tuple and
/// the single audio sink, and evaluates the composition as a pure function of
/// that tuple plus elapsed time.
///
/// Lifecycle is explicit: [`IntroEngine::mount`] acquires the timer and audio
/// side effects, [`IntroEngine::dispose`] releases them. After `dispose`
/// every entry point is inert.
pub struct IntroEngine {
    config: EngineConfig,
    sequencer: Sequencer,
    audio: AudioController,
    sink: Box<dyn AudioSink>,
    text: TextReveal,
    gate: GateScreen,
    hovering: bool,
    subscribers: Vec<Subscriber>,
    disposed: bool,
}

impl IntroEngine {
    /// Validate the config, attempt autoplay, and start the sequencer.
    ///
    /// Under `BlockingConsent` the sequencer waits in `Gating` unless the
    /// autoplay attempt already succeeded; the other policies enter `Intro`
    /// immediately whatever the audio verdict.
    pub fn mount(
        config: EngineConfig,
        sink: Box<dyn AudioSink>,
        now: Millis,
    ) -> StagegateResult<Self> {
        config.validate()?;
        let mut engine = Self {
            audio: AudioController::new(config.policy, config.volume, now),
            sequencer: Sequencer::start(
                config.policy == AudioGatePolicy::BlockingConsent,
                config.reveal_delay,
                now,
            ),
            config,
            sink,
            text: TextReveal::default(),
            gate: GateScreen::default(),
            hovering: false,
            subscribers: Vec::new(),
            disposed: false,
        };
        engine.audio.begin(engine.sink.as_mut());
        if engine.audio.state().playing {
            // Confirmed autoplay success opens the gate without a gesture.
            engine.sequencer.open_gate(now);
        }
        Ok(engine)
    }

    pub fn stage(&self) -> Stage {
        self.sequencer.stage()
    }

    pub fn audio_state(&self) -> AudioState {
        self.audio.state()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stage: self.sequencer.stage(),
            audio: self.audio.state(),
            resume_visible: self.audio.resume_visible(),
            hovering: self.hovering,
        }
    }

    /// Register a re-render callback, invoked after every observable state
    /// change. Dropped on dispose.
    pub fn subscribe(&mut self, f: impl FnMut(&Snapshot) + 'static) {
        self.subscribers.push(Box::new(f));
    }

    /// Apply a user/host event at `now`. No-op after dispose; idempotent
    /// events (e.g. a duplicate play notification) do not notify subscribers.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn handle(&mut self, event: EngineEvent, now: Millis) -> StagegateResult<()> {
        if self.disposed {
            return Ok(());
        }
        let before = self.snapshot();
        match event {
            EngineEvent::Consent(allow) => {
                self.audio.consent(self.sink.as_mut(), allow, now)?;
                // Either answer settles the question and opens the gate.
                self.sequencer.open_gate(now);
            }
            EngineEvent::ResumePressed => {
                self.audio.resume(self.sink.as_mut(), now)?;
            }
            EngineEvent::ExternalPlay => {
                self.audio.external_play();
                if self.audio.state().playing {
                    self.sequencer.open_gate(now);
                }
            }
            EngineEvent::PointerHover(hovering) => {
                self.hovering = hovering;
            }
        }
        self.notify_if_changed(before);
        Ok(())
    }

    /// Poll the reveal timer. The host's one-shot timer lands here; returns
    /// whether the `Intro -> Revealed` transition fired on this call.
    pub fn tick(&mut self, now: Millis) -> bool {
        if self.disposed {
            return false;
        }
        let before = self.snapshot();
        let fired = self.sequencer.tick(now);
        self.notify_if_changed(before);
        fired
    }

    /// Evaluate the full composition at `now`. Pure with respect to engine
    /// state; safe to call at animation-frame rate.
    pub fn frame(&self, now: Millis) -> SceneFrame {
        let stage = self.sequencer.stage();
        let elapsed = self.sequencer.elapsed(now);
        SceneFrame {
            stage,
            audio: self.audio.state(),
            resume_visible: self.audio.resume_visible(),
            layers: compose::render(&self.config, stage, self.audio.state(), elapsed, self.hovering),
            text: self.text.sample(stage, elapsed),
            gate: self.gate.sample(stage, elapsed),
        }
    }

    /// Release the timer, silence the sink, and drop subscribers. Every
    /// later `handle`/`tick` is inert, so a timer callback racing teardown
    /// cannot mutate a disposed view.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.sequencer.cancel();
        self.sink.pause();
        self.subscribers.clear();
        self.disposed = true;
        tracing::debug!("engine disposed");
    }

    fn notify_if_changed(&mut self, before: Snapshot) {
        let after = self.snapshot();
        if after == before {
            return;
        }
        for sub in &mut self.subscribers {
            sub(&after);
        }
    }
}

impl Drop for IntroEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}
