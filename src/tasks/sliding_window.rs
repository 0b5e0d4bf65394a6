use std::any::Any;
use std::collections::VecDeque;
use std::io::{Error, ErrorKind};

use crate::core::{EventBatch, Observation, StreamEvent};
use crate::tasks::task::{StreamTask, TaskError};

/// Bounded FIFO buffer over the most recent observations.
///
/// Once the buffer is full, every insert that overflows it displaces the
/// oldest buffered observation and pairs the insert with one `Evict` for the
/// displaced slot, added to the same batch. Downstream aggregators rely on
/// this pairing discipline.
#[derive(Debug)]
pub struct SlidingWindow {
    name: String,
    capacity: usize,
    buffer: VecDeque<Observation>,
}

impl SlidingWindow {
    pub fn new<N: Into<String>>(name: N, capacity: usize) -> Result<SlidingWindow, Error> {
        if capacity == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Window capacity must be > 0",
            ));
        }
        Ok(SlidingWindow {
            name: name.into(),
            capacity,
            buffer: VecDeque::with_capacity(capacity),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl StreamTask for SlidingWindow {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, batch: &mut EventBatch) -> Result<(), TaskError> {
        // Inserts are buffered in id order; evictions originating upstream
        // pass through untouched.
        let inserts: Vec<Observation> = batch
            .values()
            .filter_map(|event| match event {
                StreamEvent::Insert(obs) => Some(obs.clone()),
                StreamEvent::Evict(_) => None,
            })
            .collect();

        for obs in inserts {
            self.buffer.push_back(obs);
            if self.buffer.len() > self.capacity {
                if let Some(displaced) = self.buffer.pop_front() {
                    batch.insert(displaced.id, StreamEvent::Evict(displaced));
                }
            }
        }

        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
