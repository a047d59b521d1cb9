//! Recording test doubles for the amplifier pin and audio backend.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use pg_audio::{AudioBackend, AudioError, AudioOutput};
use pg_ir::RawSample;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    PinHigh,
    PinLow,
    Open(usize),
    Play { id: usize, rate: u32, len: usize, looping: bool },
    SetRate { id: usize, rate: u32 },
    Stop(usize),
    Release(usize),
}

#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Event>>>);

impl Recorder {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn position(&self, event: &Event) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == event)
    }
}

#[derive(Debug)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct MockPin {
    log: Recorder,
    broken: bool,
}

impl MockPin {
    pub fn new(log: &Recorder) -> Self {
        Self { log: log.clone(), broken: false }
    }

    pub fn broken(log: &Recorder) -> Self {
        Self { log: log.clone(), broken: true }
    }
}

impl ErrorType for MockPin {
    type Error = PinFault;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), PinFault> {
        if self.broken {
            return Err(PinFault);
        }
        self.log.push(Event::PinLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        if self.broken {
            return Err(PinFault);
        }
        self.log.push(Event::PinHigh);
        Ok(())
    }
}

pub struct MockBackend {
    log: Recorder,
    next_id: Cell<usize>,
    fail_open: bool,
    fail_play: bool,
    /// `is_playing` checks a one-shot sample survives before finishing.
    one_shot_polls: usize,
}

impl MockBackend {
    pub fn new(log: &Recorder) -> Self {
        Self {
            log: log.clone(),
            next_id: Cell::new(0),
            fail_open: false,
            fail_play: false,
            one_shot_polls: 3,
        }
    }

    pub fn failing(log: &Recorder) -> Self {
        Self { fail_open: true, ..Self::new(log) }
    }

    /// Opens fine, but every output refuses to play.
    pub fn failing_play(log: &Recorder) -> Self {
        Self { fail_play: true, ..Self::new(log) }
    }
}

impl AudioBackend for MockBackend {
    type Output = MockOutput;

    fn open(&self) -> Result<MockOutput, AudioError> {
        if self.fail_open {
            return Err(AudioError::NoDevice);
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.log.push(Event::Open(id));
        Ok(MockOutput {
            id,
            log: self.log.clone(),
            looping: false,
            playing: Cell::new(false),
            polls_left: Cell::new(0),
            one_shot_polls: self.one_shot_polls,
            fail_play: self.fail_play,
        })
    }
}

pub struct MockOutput {
    pub id: usize,
    log: Recorder,
    looping: bool,
    playing: Cell<bool>,
    polls_left: Cell<usize>,
    one_shot_polls: usize,
    fail_play: bool,
}

impl AudioOutput for MockOutput {
    fn play(&mut self, sample: &RawSample, looping: bool) -> Result<(), AudioError> {
        if self.fail_play {
            return Err(AudioError::Playback("device rejected sample".into()));
        }
        self.log.push(Event::Play {
            id: self.id,
            rate: sample.sample_rate,
            len: sample.len(),
            looping,
        });
        self.looping = looping;
        self.playing.set(true);
        self.polls_left.set(self.one_shot_polls);
        Ok(())
    }

    fn set_sample_rate(&mut self, sample_rate: u32) {
        self.log.push(Event::SetRate { id: self.id, rate: sample_rate });
    }

    fn is_playing(&self) -> bool {
        if self.playing.get() && !self.looping {
            let left = self.polls_left.get();
            if left == 0 {
                self.playing.set(false);
            } else {
                self.polls_left.set(left - 1);
            }
        }
        self.playing.get()
    }

    fn stop(&mut self) {
        self.log.push(Event::Stop(self.id));
        self.playing.set(false);
    }
}

impl Drop for MockOutput {
    fn drop(&mut self) {
        self.log.push(Event::Release(self.id));
    }
}
