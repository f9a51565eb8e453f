use log::debug;

use crate::{error::QueueError, queue::Queue, sort::SortOptions};

/// Queue operations on a handle that may not hold a queue.
///
/// An absent queue is never a fault: inserts and removes fail with
/// [`QueueError::Absent`], `size` is `0` and everything else does nothing.
pub trait QueueHandle {
    /// Drops the queue and every element in it, leaving the handle absent.
    fn free(&mut self);

    fn insert_front(&mut self, text: &str) -> Result<(), QueueError>;

    fn insert_back(&mut self, text: &str) -> Result<(), QueueError>;

    fn remove_front(&mut self, buf: Option<&mut [u8]>) -> Result<(), QueueError>;

    fn size(&self) -> usize;

    fn reverse(&mut self);

    fn sort(&mut self, options: SortOptions);
}

impl QueueHandle for Option<Queue> {
    fn free(&mut self) {
        if let Some(queue) = self.take() {
            debug!("freeing queue with {} elements", queue.size());
        }
    }

    fn insert_front(&mut self, text: &str) -> Result<(), QueueError> {
        self.as_mut()
            .ok_or(QueueError::Absent)?
            .insert_front(text)
    }

    fn insert_back(&mut self, text: &str) -> Result<(), QueueError> {
        self.as_mut().ok_or(QueueError::Absent)?.insert_back(text)
    }

    fn remove_front(&mut self, buf: Option<&mut [u8]>) -> Result<(), QueueError> {
        self.as_mut().ok_or(QueueError::Absent)?.remove_front(buf)
    }

    fn size(&self) -> usize {
        self.as_ref().map_or(0, Queue::size)
    }

    fn reverse(&mut self) {
        if let Some(queue) = self {
            queue.reverse();
        }
    }

    fn sort(&mut self, options: SortOptions) {
        if let Some(queue) = self {
            queue.sort(options);
        }
    }
}
