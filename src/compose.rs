use crate::{
    audio::{AudioGatePolicy, AudioState, Permission},
    ease::Ease,
    model::EngineConfig,
    stage::Stage,
    time::Millis,
};

/// Base opacity of the looping video element inside its container.
pub const VIDEO_BASE_OPACITY: f64 = 0.6;
/// Base opacity of the blend-mode image overlay inside its container.
pub const IMAGE_BASE_OPACITY: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum LayerKind {
    Video,
    ImageOverlay,
    Tint,
    Graphics,
    Ambient,
    Text,
}

impl LayerKind {
    /// Fixed stacking order. The ambient layer sits above the media stack
    /// while it lives; text is always topmost.
    pub fn z(self) -> i32 {
        match self {
            Self::Video => 0,
            Self::ImageOverlay => 1,
            Self::Tint => 2,
            Self::Graphics => 3,
            Self::Ambient => 4,
            Self::Text => 10,
        }
    }
}

/// Collaborator inputs carried alongside each layer, consumed by the host
/// renderer without inspection by the engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum LayerParams {
    Ambient { particle_count: u32, noise_intensity: f64 },
    Video { src: String },
    ImageOverlay { src: String },
    Tint,
    Graphics { hovering: bool },
    Text,
}

/// One evaluated layer: whether it is in the tree at all, and at what
/// effective opacity. Unmounted layers always report opacity 0.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayerFrame {
    pub kind: LayerKind,
    pub z: i32,
    pub mounted: bool,
    pub opacity: f64,
    pub params: LayerParams,
}

/// Pure compositor: evaluates the layer stack for `(stage, audio, elapsed)`.
///
/// Output is sorted by z and stable for equal inputs; callers re-run it on
/// every state change or animation frame.
#[tracing::instrument(skip(cfg, audio), level = "trace")]
pub fn render(
    cfg: &EngineConfig,
    stage: Stage,
    audio: AudioState,
    elapsed: Millis,
    hovering: bool,
) -> Vec<LayerFrame> {
    // Container fade shared by the media stack and graphics layer after the
    // reveal. Before the reveal the container is fully transparent.
    let reveal_fade = match stage {
        Stage::Revealed => Ease::OutCubic.apply(elapsed.progress(cfg.crossfade)),
        _ => 0.0,
    };

    // Media may preload hidden during the intro, but never behind the gate.
    let media_mounted = stage == Stage::Revealed || (cfg.keep_media_mounted && stage != Stage::Gating);
    let ambient_mounted = stage == Stage::Intro;
    // Ambient fades in on entering the intro; it leaves the tree at reveal.
    let ambient_opacity = if ambient_mounted {
        Ease::OutCubic.apply(elapsed.progress(cfg.crossfade))
    } else {
        0.0
    };

    let text_mounted = match cfg.policy {
        AudioGatePolicy::BlockingConsent => {
            stage != Stage::Gating && audio.permission != Permission::Unknown
        }
        _ => true,
    };

    let mut layers = vec![
        LayerFrame {
            kind: LayerKind::Video,
            z: LayerKind::Video.z(),
            mounted: media_mounted,
            opacity: if media_mounted {
                reveal_fade * VIDEO_BASE_OPACITY
            } else {
                0.0
            },
            params: LayerParams::Video {
                src: cfg.video_src.clone(),
            },
        },
        LayerFrame {
            kind: LayerKind::ImageOverlay,
            z: LayerKind::ImageOverlay.z(),
            mounted: media_mounted,
            opacity: if media_mounted {
                reveal_fade * IMAGE_BASE_OPACITY
            } else {
                0.0
            },
            params: LayerParams::ImageOverlay {
                src: cfg.image_src.clone(),
            },
        },
        LayerFrame {
            kind: LayerKind::Tint,
            z: LayerKind::Tint.z(),
            mounted: media_mounted,
            opacity: if media_mounted { reveal_fade } else { 0.0 },
            params: LayerParams::Tint,
        },
        // The generative graphics collaborator is expensive; it must not be
        // in the tree until the reveal.
        LayerFrame {
            kind: LayerKind::Graphics,
            z: LayerKind::Graphics.z(),
            mounted: stage == Stage::Revealed,
            opacity: reveal_fade,
            params: LayerParams::Graphics { hovering },
        },
        LayerFrame {
            kind: LayerKind::Ambient,
            z: LayerKind::Ambient.z(),
            mounted: ambient_mounted,
            opacity: ambient_opacity,
            params: LayerParams::Ambient {
                particle_count: cfg.particle_count,
                noise_intensity: cfg.noise_intensity,
            },
        },
        LayerFrame {
            kind: LayerKind::Text,
            z: LayerKind::Text.z(),
            mounted: text_mounted,
            opacity: if text_mounted { 1.0 } else { 0.0 },
            params: LayerParams::Text,
        },
    ];

    layers.sort_by(|a, b| (a.z, a.kind).cmp(&(b.z, b.kind)));
    layers
}
