use crate::{
    audio::AudioGatePolicy,
    error::{StagegateError, StagegateResult},
    stage::REVEAL_DELAY,
    time::Millis,
};

/// Engine configuration. Defaults mirror the production intro; `from_json`
/// accepts partial documents, so `{}` yields the shipped behavior.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub policy: AudioGatePolicy,
    /// Delay between entering the intro and the reveal.
    pub reveal_delay: Millis,
    /// Layer crossfade window on stage changes.
    pub crossfade: Millis,
    pub volume: f64,
    pub audio_src: String,
    pub video_src: String,
    pub image_src: String,
    /// Particle layer collaborator parameters, passed through untouched.
    pub particle_count: u32,
    pub noise_intensity: f64,
    /// Keep media layers mounted (opacity 0) pre-reveal so assets preload.
    pub keep_media_mounted: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: AudioGatePolicy::NonBlockingPrompt,
            reveal_delay: REVEAL_DELAY,
            crossfade: Millis(1500),
            volume: 0.5,
            audio_src: "/music/mus.mp3".to_string(),
            video_src: "/vid/mdia.mp4".to_string(),
            image_src: "/images/iinsan.png".to_string(),
            particle_count: 1000,
            noise_intensity: 0.001,
            keep_media_mounted: true,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder {
            config: Self::default(),
        }
    }

    pub fn from_json(s: &str) -> StagegateResult<Self> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| StagegateError::serde(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StagegateResult<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(StagegateError::validation("volume must be within [0, 1]"));
        }
        if self.reveal_delay.0 == 0 {
            return Err(StagegateError::validation("reveal_delay must be non-zero"));
        }
        if self.crossfade.0 == 0 {
            return Err(StagegateError::validation("crossfade must be non-zero"));
        }
        if !self.noise_intensity.is_finite() || self.noise_intensity < 0.0 {
            return Err(StagegateError::validation(
                "noise_intensity must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn policy(mut self, policy: AudioGatePolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn reveal_delay(mut self, delay: Millis) -> Self {
        self.config.reveal_delay = delay;
        self
    }

    pub fn crossfade(mut self, crossfade: Millis) -> Self {
        self.config.crossfade = crossfade;
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.config.volume = volume;
        self
    }

    pub fn keep_media_mounted(mut self, keep: bool) -> Self {
        self.config.keep_media_mounted = keep;
        self
    }

    pub fn build(self) -> StagegateResult<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
