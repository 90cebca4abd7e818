use crate::app::config::GatewayConfig;
use crate::logging::FileLogger;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Result of one attempt, as seen by [`RetryPolicy`].
pub trait Outcome {
    fn is_retryable(&self) -> bool;

    /// Short description used in retry warnings.
    fn describe(&self) -> String;
}

impl Outcome for Result<reqwest::Response, reqwest::Error> {
    fn is_retryable(&self) -> bool {
        match self {
            Ok(response) => !response.status().is_success(),
            // Requisição mal montada falha igual em toda tentativa.
            Err(e) => !e.is_builder(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Ok(response) => format!("HTTP {}", response.status().as_u16()),
            Err(e) if e.is_timeout() => format!("timeout: {}", e),
            Err(e) => e.to_string(),
        }
    }
}

/// Bounded retry with exponential backoff: retry `k` (1-based) waits
/// `backoff_unit * 2^k`, for at most `max_retries` retries after the first attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_unit: Duration,
    jitter: bool,
    logger: Arc<FileLogger>,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_unit: Duration, logger: Arc<FileLogger>) -> Self {
        Self {
            max_retries,
            backoff_unit,
            jitter: false,
            logger,
        }
    }

    pub fn from_config(config: &GatewayConfig, logger: Arc<FileLogger>) -> Self {
        Self::new(config.max_retries, config.backoff_unit(), logger).with_jitter(config.retry_jitter)
    }

    /// Adds a uniform random delay of up to one backoff unit to every wait.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn backoff_for(&self, retry: u32) -> Duration {
        let base = self
            .backoff_unit
            .saturating_mul(2u32.saturating_pow(retry));

        if !self.jitter {
            return base;
        }

        let unit_ms = self.backoff_unit.as_millis() as u64;
        let extra = rand::thread_rng().gen_range(0..=unit_ms);
        base.saturating_add(Duration::from_millis(extra))
    }

    /// Runs `operation` until it yields a non-retryable outcome or the retries
    /// run out. The closure receives the 1-based attempt number. The last
    /// outcome is returned as-is, whether or not it succeeded.
    pub async fn execute<F, Fut, O>(&self, mut operation: F) -> O
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = O>,
        O: Outcome,
    {
        let mut retries = 0;

        loop {
            let outcome = operation(retries + 1).await;

            if !outcome.is_retryable() || retries >= self.max_retries {
                return outcome;
            }

            retries += 1;
            let delay = self.backoff_for(retries);

            self.logger.log_warning(&format!(
                "Attempt {} failed ({}). Waiting {} seconds before retrying.",
                retries,
                outcome.describe(),
                delay.as_secs_f64()
            ));

            // Libera a resposta com falha antes de dormir.
            drop(outcome);
            tokio::time::sleep(delay).await;
        }
    }
}
