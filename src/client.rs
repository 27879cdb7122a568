use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, warn};

use crate::cache::LocalCache;
use crate::models::{AudioSettings, Counter, PaymentData, PaymentRequest, PaymentResponse};

const PROBE_TTL: Duration = Duration::from_secs(30);
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

// The pay endpoint requires a priced request even though settlement is
// simulated; these mirror the fixed client-side charge.
const PAYMENT_AMOUNT: f64 = 100.0;
const PAYMENT_CURRENCY: &str = "JPY";

// Cached liveness verdict for the remote counter service.
#[derive(Debug, Default)]
struct Availability {
    state: Option<bool>,
    checked_at: Option<Instant>,
}

impl Availability {
    fn fresh(&self, ttl: Duration) -> Option<bool> {
        let state = self.state?;
        let checked_at = self.checked_at?;
        (checked_at.elapsed() < ttl).then_some(state)
    }

    fn record(&mut self, up: bool) {
        self.state = Some(up);
        self.checked_at = Some(Instant::now());
    }

    // Flips the verdict without touching the probe timestamp, so the next
    // call past the TTL re-probes.
    fn mark_down(&mut self) {
        self.state = Some(false);
    }
}

/// Counter client that prefers the remote service and falls back to the
/// local cache, presenting one API either way. Counter operations never
/// fail: remote trouble degrades to the cache instead of surfacing.
pub struct HybridClient {
    http: Client,
    base_url: String,
    user_id: String,
    cache: LocalCache,
    availability: Availability,
}

impl HybridClient {
    pub fn new(
        base_url: impl Into<String>,
        user_id: impl Into<String>,
        cache: LocalCache,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            user_id: user_id.into(),
            cache,
            availability: Availability::default(),
        }
    }

    pub async fn get_count(&mut self) -> u32 {
        if self.check_availability().await {
            match self.fetch_remote_count().await {
                Ok(count) => {
                    self.cache.set_count(count);
                    return count;
                }
                Err(err) => {
                    warn!(error = %err, "remote read failed, falling back to local cache");
                    self.availability.mark_down();
                }
            }
        }
        self.cache.count()
    }

    pub async fn set_count(&mut self, count: u32) {
        if self.check_availability().await {
            match self.push_remote_count(count).await {
                Ok(confirmed) => {
                    self.cache.set_count(confirmed);
                    return;
                }
                Err(err) => {
                    warn!(error = %err, "remote update failed, falling back to local cache");
                    self.availability.mark_down();
                }
            }
        }
        self.cache.set_count(count);
    }

    pub async fn increment(&mut self) -> u32 {
        if self.check_availability().await {
            match self.remote_increment().await {
                Ok(count) => {
                    self.cache.set_count(count);
                    return count;
                }
                Err(err) => {
                    warn!(error = %err, "remote add failed, falling back to local cache");
                    self.availability.mark_down();
                }
            }
        }
        self.cache.increment()
    }

    pub async fn decrement(&mut self) -> u32 {
        // Read the authoritative count first: the remote pay call rejects at
        // zero, so a zero here saves the round trip.
        let current = self.get_count().await;
        if current == 0 {
            return current;
        }

        if self.check_availability().await {
            match self.remote_pay().await {
                Ok(count) => {
                    self.cache.set_count(count);
                    return count;
                }
                Err(err) => {
                    warn!(error = %err, "remote payment failed, falling back to local cache");
                    self.availability.mark_down();
                }
            }
        }
        self.cache.decrement()
    }

    // Audio preferences are per-device state and never leave the cache.
    pub fn audio_settings(&self) -> AudioSettings {
        self.cache.audio_settings()
    }

    pub fn set_add_payment_audio(&self, audio_url: impl Into<String>) {
        self.cache.set_add_payment_audio(audio_url);
    }

    pub fn set_payment_success_audio(&self, audio_url: impl Into<String>) {
        self.cache.set_payment_success_audio(audio_url);
    }

    pub async fn is_online(&mut self) -> bool {
        self.check_availability().await
    }

    /// One-shot push of the cached count to the remote service after a
    /// reconnect. Last write wins; divergent histories are not merged.
    pub async fn sync_to_server(&mut self) -> bool {
        if !self.check_availability().await {
            return false;
        }
        let local = self.cache.count();
        match self.push_remote_count(local).await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "failed to sync local count to remote");
                self.availability.mark_down();
                false
            }
        }
    }

    async fn check_availability(&mut self) -> bool {
        if let Some(up) = self.availability.fresh(PROBE_TTL) {
            return up;
        }

        let up = match self
            .http
            .get(self.counter_url())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!(error = %err, "remote counter service unreachable");
                false
            }
        };
        self.availability.record(up);
        up
    }

    async fn fetch_remote_count(&self) -> Result<u32, reqwest::Error> {
        let counter: Counter = self
            .http
            .get(self.counter_url())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(counter.count)
    }

    async fn push_remote_count(&self, count: u32) -> Result<u32, reqwest::Error> {
        let counter: Counter = self
            .http
            .patch(self.counter_url())
            .json(&serde_json::json!({ "count": count }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(counter.count)
    }

    async fn remote_increment(&self) -> Result<u32, reqwest::Error> {
        let counter: Counter = self
            .http
            .post(format!("{}/add", self.counter_url()))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(counter.count)
    }

    async fn remote_pay(&self) -> Result<u32, reqwest::Error> {
        let request = PaymentRequest {
            amount: PAYMENT_AMOUNT,
            currency: PAYMENT_CURRENCY.to_string(),
            payment_data: PaymentData::simulated(),
        };
        let response: PaymentResponse = self
            .http
            .post(format!("{}/pay", self.counter_url()))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.counter.count)
    }

    fn counter_url(&self) -> String {
        format!(
            "{}/counter/{}",
            self.base_url.trim_end_matches('/'),
            self.user_id
        )
    }
}
