//! Bounded retry policy for the dataset fetch.

use std::time::Duration;

use crate::http_client::HttpError;

/// Backoff strategy between fetch attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed { delay: Duration },
    /// `base * factor^attempt`, capped at `max`, optionally jittered by +/- 50%.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(250),
            factor: 2.0,
            max: Duration::from_secs(2),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let seconds = base.as_secs_f64() * factor.powi(exponent);
                let capped = Duration::from_secs_f64(seconds.min(max.as_secs_f64()));

                if !jitter {
                    return capped;
                }

                let capped_ms = u64::try_from(capped.as_millis()).unwrap_or(u64::MAX);
                let spread = capped_ms / 2;
                let offset = fastrand::u64(0..=spread.saturating_mul(2));
                Duration::from_millis((capped_ms - spread).saturating_add(offset))
            }
        }
    }
}

/// How many times, and on which failures, a fetch is repeated.
///
/// The default performs a single attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub enabled: bool,
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
    pub retry_on_status: Vec<u16>,
    pub retry_on_timeout: bool,
    pub retry_on_connect: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::no_retry()
    }
}

impl RetryConfig {
    pub fn exponential(max_retries: u32) -> Self {
        Self {
            enabled: max_retries > 0,
            max_retries,
            backoff: Backoff::default(),
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
            retry_on_timeout: true,
            retry_on_connect: true,
        }
    }

    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            backoff: Backoff::Fixed { delay },
            ..Self::exponential(max_retries)
        }
    }

    pub fn no_retry() -> Self {
        Self {
            enabled: false,
            max_retries: 0,
            ..Self::exponential(0)
        }
    }

    pub fn max_attempts(&self) -> u32 {
        if self.enabled {
            self.max_retries.saturating_add(1)
        } else {
            1
        }
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.enabled && self.retry_on_status.contains(&status)
    }

    pub fn should_retry_error(&self, error: &HttpError) -> bool {
        if !self.enabled || !error.retryable() {
            return false;
        }
        if error.is_timeout() {
            self.retry_on_timeout
        } else {
            self.retry_on_connect
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_backoff() {
        let backoff = Backoff::Fixed {
            delay: Duration::from_millis(100),
        };

        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(7), Duration::from_millis(100));
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max: Duration::from_secs(1),
            jitter: false,
        };

        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(400));
        assert_eq!(backoff.delay(4), Duration::from_secs(1));
    }

    #[test]
    fn test_jitter_stays_within_half_of_delay() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(200),
            factor: 2.0,
            max: Duration::from_secs(1),
            jitter: true,
        };

        for _ in 0..20 {
            let delay = backoff.delay(1).as_millis();
            assert!((200..=600).contains(&delay), "delay_ms={delay}");
        }
    }

    #[test]
    fn test_default_is_single_attempt() {
        let config = RetryConfig::default();

        assert!(!config.enabled);
        assert_eq!(config.max_attempts(), 1);
        assert!(!config.should_retry_status(503));
        assert!(!config.should_retry_error(&HttpError::new("connection reset")));
    }

    #[test]
    fn test_bounded_retry_classifies_failures() {
        let config = RetryConfig::fixed(Duration::from_millis(10), 2);

        assert_eq!(config.max_attempts(), 3);
        assert!(config.should_retry_status(503));
        assert!(!config.should_retry_status(404));
        assert!(config.should_retry_error(&HttpError::timeout("slow")));
        assert!(!config.should_retry_error(&HttpError::non_retryable("bad url")));
    }
}
