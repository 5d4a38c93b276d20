//! Downstream destination for shaped scroll events.

use smoothwheel_model::event::OutputEvent;

/// Receives output events in emission order.
pub trait ScrollSink {
    fn post(&mut self, event: OutputEvent);
}

impl ScrollSink for Vec<OutputEvent> {
    fn post(&mut self, event: OutputEvent) {
        self.push(event);
    }
}

impl<S: ScrollSink + ?Sized> ScrollSink for &mut S {
    fn post(&mut self, event: OutputEvent) {
        (**self).post(event);
    }
}

/// Forwards only tracking-end markers; used while output is blocked so the
/// lifecycle still reports the end of manual input.
pub struct MarkersOnly<'a, S: ScrollSink + ?Sized> {
    inner: &'a mut S,
}

impl<'a, S: ScrollSink + ?Sized> MarkersOnly<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self { inner }
    }
}

impl<S: ScrollSink + ?Sized> ScrollSink for MarkersOnly<'_, S> {
    fn post(&mut self, event: OutputEvent) {
        if event.tracking_end {
            self.inner.post(event);
        }
    }
}
