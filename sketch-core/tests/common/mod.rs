//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use sketch_core::{
    Action, ActionError, Compositing, DrawContext, Drawable, Hsv, PaletteSet, RecordingCanvas,
};

/// Shared log of events observed during a run.
pub type Log = Rc<RefCell<Vec<Event>>>;

/// Something observed during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A spy drew with this index and colour.
    Drew { index: usize, colour: Hsv },
    /// The completion hook fired.
    Done,
}

/// An action that records its invocation and paints nothing.
#[derive(Debug)]
pub struct Spy {
    pub index: usize,
    pub log: Log,
}

impl Action for Spy {
    fn name(&self) -> &'static str {
        "spy"
    }

    fn draw(
        &self,
        _ctx: &mut dyn DrawContext,
        colour: Hsv,
        _surfaces: &mut Compositing<'_>,
    ) -> Result<(), ActionError> {
        self.log.borrow_mut().push(Event::Drew {
            index: self.index,
            colour,
        });
        Ok(())
    }
}

/// A drawable over a recording canvas whose completion hook logs `Done`.
pub fn spied_drawable(log: &Log) -> Drawable<RecordingCanvas> {
    let done = Rc::clone(log);
    Drawable::builder()
        .name("spied")
        .canvas(RecordingCanvas::new(1, 1))
        .palettes(PaletteSet::default())
        .on_complete(move || done.borrow_mut().push(Event::Done))
        .build()
        .expect("build drawable")
}

/// A fresh empty log.
pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Indices of `Drew` events, in order.
pub fn drawn_indices(log: &Log) -> Vec<usize> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Drew { index, .. } => Some(*index),
            Event::Done => None,
        })
        .collect()
}

/// Number of `Done` events.
pub fn completions(log: &Log) -> usize {
    log.borrow().iter().filter(|e| **e == Event::Done).count()
}
