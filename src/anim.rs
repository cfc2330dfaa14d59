use crate::{ease::Ease, time::Millis};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

/// A single delayed, eased segment from `from` to `to`.
///
/// Sampled against elapsed time since the owning stage transition: holds
/// `from` through the delay, holds `to` once `delay + duration` has passed.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub delay: Millis,
    pub duration: Millis,
    pub ease: Ease,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    pub fn new(from: T, to: T, duration: Millis, ease: Ease) -> Self {
        Self {
            from,
            to,
            delay: Millis::ZERO,
            duration,
            ease,
        }
    }

    pub fn delayed(mut self, delay: Millis) -> Self {
        self.delay = delay;
        self
    }

    pub fn constant(value: T) -> Self {
        Self {
            from: value.clone(),
            to: value,
            delay: Millis::ZERO,
            duration: Millis::ZERO,
            ease: Ease::Linear,
        }
    }

    pub fn sample(&self, elapsed: Millis) -> T {
        if elapsed.0 < self.delay.0 {
            return self.from.clone();
        }
        let local = elapsed.since(self.delay);
        let t = self.ease.apply(local.progress(self.duration));
        T::lerp(&self.from, &self.to, t)
    }
}
