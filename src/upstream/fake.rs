//! Scripted upstream double used by the resolver and API tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::UpstreamClient;
use crate::cache::CacheKey;
use crate::error::UpstreamError;
use crate::models::Quote;

/// Outcome template; quotes are stamped with the requested key.
#[derive(Debug, Clone)]
enum Scripted {
    Prices(Decimal, Decimal),
    Failure(UpstreamError),
}

/// Replays a fixed sequence of outcomes and counts calls.
///
/// Once the script runs out, the last outcome repeats.
#[derive(Debug)]
pub struct ScriptedUpstream {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<Option<Scripted>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedUpstream {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Upstream that always answers with these prices.
    pub fn prices(highest_buy_order: Decimal, lowest_sell_order: Decimal) -> Self {
        Self::new().then_prices(highest_buy_order, lowest_sell_order)
    }

    /// Upstream that always fails with `err`.
    pub fn failing(err: UpstreamError) -> Self {
        Self::new().then_fail(err)
    }

    pub fn then_prices(self, highest_buy_order: Decimal, lowest_sell_order: Decimal) -> Self {
        self.push(Scripted::Prices(highest_buy_order, lowest_sell_order))
    }

    pub fn then_fail(self, err: UpstreamError) -> Self {
        self.push(Scripted::Failure(err))
    }

    /// Waits `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of fetches made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(self, outcome: Scripted) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
        self
    }

    fn next_outcome(&self) -> Option<Scripted> {
        let next = self.script.lock().ok()?.pop_front();
        let mut last = self.last.lock().ok()?;
        if let Some(outcome) = next {
            *last = Some(outcome);
        }
        last.clone()
    }
}

impl Default for ScriptedUpstream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamClient for ScriptedUpstream {
    async fn fetch(&self, key: &CacheKey) -> Result<Quote, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.next_outcome() {
            Some(Scripted::Prices(buy, sell)) => Ok(Quote::new(key, buy, sell)),
            Some(Scripted::Failure(err)) => Err(err),
            None => Err(UpstreamError::NotFound { status: 404 }),
        }
    }
}
