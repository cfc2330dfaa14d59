#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use stagegate::{AudioSink, Millis, PlayRejected};

/// Host-side media element stand-in with externally observable effects.
#[derive(Debug, Default)]
pub struct SinkState {
    pub reject_first: u32,
    pub plays: u32,
    pub volume: f64,
    pub position: Option<Millis>,
    pub duration: Option<Millis>,
    pub paused: bool,
}

#[derive(Clone, Default)]
pub struct HostSink(pub Rc<RefCell<SinkState>>);

impl HostSink {
    pub fn rejecting(duration: Option<Millis>) -> Self {
        let sink = Self::default();
        sink.0.borrow_mut().reject_first = 1;
        sink.0.borrow_mut().duration = duration;
        sink
    }
}

impl AudioSink for HostSink {
    fn set_volume(&mut self, volume: f64) {
        self.0.borrow_mut().volume = volume;
    }

    fn play(&mut self) -> Result<(), PlayRejected> {
        let mut state = self.0.borrow_mut();
        if state.plays < state.reject_first {
            state.plays += 1;
            return Err(PlayRejected);
        }
        state.plays += 1;
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.borrow_mut().paused = true;
    }

    fn seek(&mut self, position: Millis) {
        self.0.borrow_mut().position = Some(position);
    }

    fn duration(&self) -> Option<Millis> {
        self.0.borrow().duration
    }
}
