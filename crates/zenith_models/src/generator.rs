//! Retrying record generation on top of a completion driver.

use crate::{build_messages, parse_record};
use futures::{StreamExt, TryStreamExt, stream};
use rand::Rng;
use tracing::{debug, error, info, instrument, warn};
use zenith_config::{GenerationConfig, ModelConfig};
use zenith_core::{CharacterRecord, ChatMessage, CompletionRequest, GenerationPreferences};
use zenith_error::{GenerationError, GenerationErrorKind, GenerationResult, RetryableError};
use zenith_interface::{CompletionDriver, RecordFailure};

/// Inclusive range each call draws its sampling temperature from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    min: f32,
    max: f32,
}

impl TemperatureRange {
    /// Creates a range, swapping the bounds if they are reversed.
    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Draws one temperature uniformly from the range.
    ///
    /// # Examples
    ///
    /// ```
    /// use zenith_models::TemperatureRange;
    ///
    /// let range = TemperatureRange::new(0.7, 1.0);
    /// let t = range.sample();
    /// assert!((0.7..=1.0).contains(&t));
    /// ```
    pub fn sample(&self) -> f32 {
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

/// Records and per-slot failures from one batch, in request order.
#[derive(Debug, Clone, Default)]
pub struct GeneratedBatch {
    /// Valid records
    pub records: Vec<CharacterRecord>,
    /// Slots that exhausted their attempts
    pub failures: Vec<RecordFailure>,
}

enum Slot {
    Record(CharacterRecord),
    Failed(RecordFailure),
}

/// Produces validated character records from a [`CompletionDriver`].
///
/// Each record slot gets up to `max_attempts` calls with the same prompt.
/// Only malformed replies are retried; an unavailable API ends the whole
/// request on the first failure.
#[derive(Debug)]
pub struct CharacterGenerator<D> {
    driver: D,
    max_attempts: u32,
    batch_concurrency: usize,
    temperature: TemperatureRange,
    max_tokens: u32,
}

impl<D: CompletionDriver> CharacterGenerator<D> {
    /// Wrap a driver with the configured retry and sampling settings.
    pub fn new(driver: D, generation: &GenerationConfig, model: &ModelConfig) -> Self {
        Self {
            driver,
            max_attempts: generation.max_attempts.max(1),
            batch_concurrency: generation.batch_concurrency.max(1),
            temperature: TemperatureRange::new(model.temperature_min, model.temperature_max),
            max_tokens: model.max_tokens,
        }
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Attempts spent per record before giving up.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Generate exactly one record.
    ///
    /// # Errors
    ///
    /// Returns an unavailable error as soon as the API fails, or
    /// [`GenerationErrorKind::Exhausted`] if every attempt was malformed.
    #[instrument(skip(self, prefs), fields(provider = self.driver.provider_name()))]
    pub async fn generate_one(
        &self,
        prefs: &GenerationPreferences,
    ) -> GenerationResult<CharacterRecord> {
        let messages = build_messages(prefs);
        match self.generate_slot(0, &messages).await? {
            Slot::Record(record) => Ok(record),
            Slot::Failed(_) => Err(GenerationError::new(GenerationErrorKind::Exhausted {
                requested: 1,
                attempts: self.max_attempts,
            })),
        }
    }

    /// Generate `prefs.count` records independently.
    ///
    /// Slots run with bounded concurrency; results keep request order. A slot
    /// that exhausts its attempts becomes a [`RecordFailure`] without affecting
    /// its siblings.
    ///
    /// # Errors
    ///
    /// Returns the first unavailable error; no partial batch is returned then.
    #[instrument(skip(self, prefs), fields(count = prefs.count, concurrency = self.batch_concurrency))]
    pub async fn generate_batch(
        &self,
        prefs: &GenerationPreferences,
    ) -> GenerationResult<GeneratedBatch> {
        let messages = build_messages(prefs);

        let slots: Vec<Slot> = stream::iter(0..prefs.count)
            .map(|index| self.generate_slot(index, &messages))
            .buffered(self.batch_concurrency)
            .try_collect()
            .await?;

        let mut batch = GeneratedBatch::default();
        for slot in slots {
            match slot {
                Slot::Record(record) => batch.records.push(record),
                Slot::Failed(failure) => batch.failures.push(failure),
            }
        }

        info!(
            generated = batch.records.len(),
            failed = batch.failures.len(),
            "Batch generation finished"
        );
        Ok(batch)
    }

    #[instrument(skip(self, messages))]
    async fn generate_slot(&self, index: u32, messages: &[ChatMessage]) -> GenerationResult<Slot> {
        let mut last_reason = String::new();

        for attempt in 1..=self.max_attempts {
            let request = self.request(messages)?;
            debug!(attempt, temperature = %request.temperature(), "Requesting completion");

            let reply = match self.driver.complete(&request).await {
                Ok(reply) => reply,
                Err(e) if e.is_retryable() => {
                    warn!(attempt, error = %e.kind, "Completion unusable, retrying");
                    last_reason = e.kind.to_string();
                    continue;
                }
                Err(e) => {
                    error!(attempt, error = %e.kind, "Model API unavailable");
                    return Err(e);
                }
            };

            match parse_record(&reply.text) {
                Ok(record) => {
                    debug!(attempt, name = %record.name(), "Record generated");
                    return Ok(Slot::Record(record));
                }
                Err(e) => {
                    warn!(attempt, error = %e.kind, "Reply rejected, retrying");
                    last_reason = e.kind.to_string();
                }
            }
        }

        warn!(attempts = self.max_attempts, reason = %last_reason, "Record slot exhausted");
        Ok(Slot::Failed(RecordFailure {
            index,
            attempts: self.max_attempts,
            reason: last_reason,
        }))
    }

    fn request(&self, messages: &[ChatMessage]) -> GenerationResult<CompletionRequest> {
        CompletionRequest::builder()
            .messages(messages.to_vec())
            .temperature(self.temperature.sample())
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| GenerationError::malformed(format!("Invalid completion request: {}", e)))
    }
}
