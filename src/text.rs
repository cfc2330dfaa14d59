use crate::{
    anim::Tween,
    ease::Ease,
    stage::Stage,
    time::Millis,
};

/// Headline rest pose before the reveal: pulled up by 45% of the viewport,
/// oversized, fully desaturated.
pub const PRE_REVEAL_OFFSET_VH: f64 = -45.0;
pub const PRE_REVEAL_SCALE: f64 = 1.5;

const REVEAL_DURATION: Millis = Millis(2000);
const DIVIDER_DELAY: Millis = Millis(500);
const CAPTION_DELAY: Millis = Millis(200);
const SECONDARY_DURATION: Millis = Millis(1000);
pub const DIVIDER_TARGET_PCT: f64 = 60.0;

/// Evaluated pose of the headline block and its secondary elements.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TextFrame {
    /// Vertical offset in viewport-height percent (negative is up).
    pub offset_vh: f64,
    pub scale: f64,
    pub opacity: f64,
    /// Grayscale filter amount, 1 fully desaturated.
    pub grayscale: f64,
    /// Divider width in percent of the container.
    pub divider_width_pct: f64,
    pub caption_opacity: f64,
}

/// Pure animator for the headline block. Pre-reveal stages hold the rest
/// pose; the reveal drives every channel from tweens over elapsed time.
#[derive(Clone, Copy, Debug)]
pub struct TextReveal {
    offset: Tween<f64>,
    scale: Tween<f64>,
    grayscale: Tween<f64>,
    divider: Tween<f64>,
    caption: Tween<f64>,
}

impl Default for TextReveal {
    fn default() -> Self {
        Self {
            offset: Tween::new(PRE_REVEAL_OFFSET_VH, 0.0, REVEAL_DURATION, Ease::OutExpo),
            scale: Tween::new(PRE_REVEAL_SCALE, 1.0, REVEAL_DURATION, Ease::OutExpo),
            grayscale: Tween::new(1.0, 0.0, REVEAL_DURATION, Ease::OutExpo),
            divider: Tween::new(0.0, DIVIDER_TARGET_PCT, SECONDARY_DURATION, Ease::OutQuad)
                .delayed(DIVIDER_DELAY),
            caption: Tween::new(0.0, 1.0, SECONDARY_DURATION, Ease::OutQuad)
                .delayed(CAPTION_DELAY),
        }
    }
}

impl TextReveal {
    pub fn sample(&self, stage: Stage, elapsed: Millis) -> TextFrame {
        match stage {
            Stage::Gating | Stage::Intro => TextFrame {
                offset_vh: PRE_REVEAL_OFFSET_VH,
                scale: PRE_REVEAL_SCALE,
                opacity: 1.0,
                grayscale: 1.0,
                divider_width_pct: 0.0,
                caption_opacity: 0.0,
            },
            Stage::Revealed => TextFrame {
                offset_vh: self.offset.sample(elapsed),
                scale: self.scale.sample(elapsed),
                opacity: 1.0,
                grayscale: self.grayscale.sample(elapsed),
                divider_width_pct: self.divider.sample(elapsed),
                caption_opacity: self.caption.sample(elapsed),
            },
        }
    }
}

/// Staggered entrance of the consent screen (blocking-consent policy).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct GateFrame {
    pub visible: bool,
    pub headline_opacity: f64,
    pub headline_offset_px: f64,
    pub accept_opacity: f64,
    pub decline_opacity: f64,
}

/// Fade applied by the host when the gate screen leaves the tree.
pub const GATE_EXIT_FADE: Millis = Millis(500);

#[derive(Clone, Copy, Debug)]
pub struct GateScreen {
    headline_opacity: Tween<f64>,
    headline_offset: Tween<f64>,
    accept: Tween<f64>,
    decline: Tween<f64>,
}

impl Default for GateScreen {
    fn default() -> Self {
        Self {
            headline_opacity: Tween::new(0.0, 1.0, Millis(300), Ease::OutQuad)
                .delayed(Millis(200)),
            headline_offset: Tween::new(20.0, 0.0, Millis(300), Ease::OutQuad)
                .delayed(Millis(200)),
            accept: Tween::new(0.0, 1.0, Millis(300), Ease::OutQuad).delayed(Millis(400)),
            decline: Tween::new(0.0, 1.0, Millis(300), Ease::OutQuad).delayed(Millis(500)),
        }
    }
}

impl GateScreen {
    pub fn sample(&self, stage: Stage, elapsed: Millis) -> GateFrame {
        if stage != Stage::Gating {
            return GateFrame {
                visible: false,
                headline_opacity: 0.0,
                headline_offset_px: 0.0,
                accept_opacity: 0.0,
                decline_opacity: 0.0,
            };
        }
        GateFrame {
            visible: true,
            headline_opacity: self.headline_opacity.sample(elapsed),
            headline_offset_px: self.headline_offset.sample(elapsed),
            accept_opacity: self.accept.sample(elapsed),
            decline_opacity: self.decline.sample(elapsed),
        }
    }
}
