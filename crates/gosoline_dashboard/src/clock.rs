use std::time::{Duration, Instant};

use async_trait::async_trait;

/// Source of time for code that waits between attempts.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
