//! Fan-out sink.
//!
//! [`AggregateSink`] forwards every line, in order, to each of its child
//! sinks. A failing child does not stop the others: every child is tried
//! and the first error is returned afterwards.

use super::{Severity, Sink};
use anyhow::Result;

pub struct AggregateSink<'a> {
    sinks: Vec<&'a mut dyn Sink>,
}

impl<'a> AggregateSink<'a> {
    pub fn new(sinks: Vec<&'a mut dyn Sink>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn each<F>(&mut self, mut op: F) -> Result<()>
    where
        F: FnMut(&mut (dyn Sink + 'a)) -> Result<()>,
    {
        let mut first_error = None;
        for sink in self.sinks.iter_mut() {
            if let Err(e) = op(&mut **sink) {
                tracing::warn!(error = %e, "sink failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Sink for AggregateSink<'_> {
    fn write(&mut self, severity: Severity, line: &str) -> Result<()> {
        self.each(|sink| sink.write(severity, line))
    }

    fn close(&mut self) -> Result<()> {
        self.each(|sink| sink.close())
    }
}
