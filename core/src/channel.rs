//! Channel configuration for the request queue

/// Buffer configuration for the queue between the producer and the workers
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Request queue capacity (producer -> workers)
    pub queue_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { queue_buffer: 2 }
    }
}

impl ChannelConfig {
    /// Queue sized so the producer can run ahead of `workers` consumers
    pub fn for_workers(workers: usize) -> Self {
        Self {
            queue_buffer: workers.saturating_mul(2).max(1),
        }
    }

    /// Create a new channel config with a custom queue size
    pub fn with_queue_buffer(mut self, size: usize) -> Self {
        self.queue_buffer = size;
        self
    }
}
