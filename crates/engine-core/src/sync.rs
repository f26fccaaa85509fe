//! Lock-free hand-off of engine snapshots from the tick thread to readers.
//!
//! Three slots: the publisher owns one, the reader owns one, and the third is
//! the shared back buffer. Publishing swaps the freshly written slot into the
//! back position; reading swaps it out if it is newer than what the reader
//! already holds. Neither side ever touches a slot the other owns.

use crate::state::EngineState;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const INDEX_MASK: u8 = 0b011;
const FRESH: u8 = 0b100;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Published<T> {
    pub sequence: u64,
    pub value: T,
}

struct TripleBuffer<T: Copy> {
    slots: [UnsafeCell<Published<T>>; 3],
    back: AtomicU8,
}

// Slots are only reached through the index each handle owns exclusively.
unsafe impl<T: Copy + Send> Send for TripleBuffer<T> {}
unsafe impl<T: Copy + Send> Sync for TripleBuffer<T> {}

pub struct Publisher<T: Copy> {
    shared: Arc<TripleBuffer<T>>,
    index: u8,
    sequence: u64,
}

pub struct Reader<T: Copy> {
    shared: Arc<TripleBuffer<T>>,
    index: u8,
}

pub fn triple_buffer<T: Copy + Default>() -> (Publisher<T>, Reader<T>) {
    let shared = Arc::new(TripleBuffer {
        slots: std::array::from_fn(|_| UnsafeCell::new(Published::default())),
        back: AtomicU8::new(1),
    });
    (
        Publisher {
            shared: Arc::clone(&shared),
            index: 0,
            sequence: 0,
        },
        Reader { shared, index: 2 },
    )
}

impl<T: Copy> Publisher<T> {
    /// Never blocks.
    pub fn publish(&mut self, value: T) {
        self.sequence += 1;
        unsafe {
            *self.shared.slots[self.index as usize].get() = Published {
                sequence: self.sequence,
                value,
            };
        }
        let previous = self.shared.back.swap(self.index | FRESH, Ordering::AcqRel);
        self.index = previous & INDEX_MASK;
    }
}

impl<T: Copy> Reader<T> {
    /// Latest published value, or the default with sequence 0 if nothing has
    /// been published yet.
    pub fn latest(&mut self) -> Published<T> {
        if self.shared.back.load(Ordering::Relaxed) & FRESH != 0 {
            let previous = self.shared.back.swap(self.index, Ordering::AcqRel);
            self.index = previous & INDEX_MASK;
        }
        unsafe { *self.shared.slots[self.index as usize].get() }
    }
}

pub type SnapshotPublisher = Publisher<EngineState>;
pub type SnapshotReader = Reader<EngineState>;

pub fn snapshot_exchange() -> (SnapshotPublisher, SnapshotReader) {
    triple_buffer()
}
