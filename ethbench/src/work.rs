//! The queue senders pull work from.
use async_channel::{bounded, unbounded, Receiver};
use tokio::task::JoinHandle;
#[allow(unused)]
use tracing::{debug, trace};

/// One call to be made. Carries nothing but its position in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkItem(u64);

impl WorkItem {
    pub fn index(&self) -> u64 {
        self.0
    }
}

/// Multi-consumer queue of work items. Every item is received by exactly one consumer.
#[derive(Debug)]
pub struct WorkSource {
    rx: Receiver<WorkItem>,
    producer: Option<JoinHandle<()>>,
}

impl WorkSource {
    /// A closed queue already holding `count` items; consumers see the end once it is drained.
    pub fn preloaded(count: u64) -> Self {
        let (tx, rx) = unbounded();
        for index in 0..count {
            // The receiver is alive and the channel unbounded, so this cannot fail.
            let _ = tx.try_send(WorkItem(index));
        }
        tx.close();
        Self { rx, producer: None }
    }

    /// A queue fed forever by a background producer, holding at most `capacity` pending items.
    ///
    /// Must be called from within a tokio runtime.
    pub fn continuous(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity.max(1));
        let producer = tokio::spawn(async move {
            let mut index = 0;
            while tx.send(WorkItem(index)).await.is_ok() {
                index += 1;
            }
            trace!("Work queue closed after {index} items");
        });
        Self {
            rx,
            producer: Some(producer),
        }
    }

    pub fn receiver(&self) -> Receiver<WorkItem> {
        self.rx.clone()
    }

    /// Stops issuing work. Items still queued are discarded and never reach a sender.
    pub fn stop(&mut self) {
        self.rx.close();
        if let Some(producer) = self.producer.take() {
            producer.abort();
        }
        let mut discarded = 0;
        while self.rx.try_recv().is_ok() {
            discarded += 1;
        }
        debug!("Work source stopped, {discarded} queued items discarded");
    }
}
