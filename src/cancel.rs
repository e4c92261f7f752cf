//! Supersession of in-flight page-pair loads.
//!
//! Each selection takes a ticket; starting a newer load makes every older
//! ticket stale, and a stale load must drop its result instead of applying
//! it. A load counts as in flight until its current ticket is dropped.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
pub struct LoadGeneration {
    current: Rc<Cell<u64>>,
    settled: Rc<Cell<u64>>,
}

#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
    current: Rc<Cell<u64>>,
    settled: Rc<Cell<u64>>,
}

impl LoadGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, invalidating all outstanding tickets.
    pub fn begin(&self) -> LoadTicket {
        let generation = self.current.get().wrapping_add(1);
        self.current.set(generation);
        LoadTicket {
            generation,
            current: Rc::clone(&self.current),
            settled: Rc::clone(&self.settled),
        }
    }

    /// `true` while the latest ticket is still alive.
    pub fn in_flight(&self) -> bool {
        self.settled.get() != self.current.get()
    }
}

impl LoadTicket {
    pub fn is_current(&self) -> bool {
        self.current.get() == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for LoadTicket {
    fn drop(&mut self) {
        if self.is_current() {
            self.settled.set(self.generation);
        }
    }
}
