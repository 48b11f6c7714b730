/// Environment variable read by [`RetryOptions::from_env`].
pub const ATTEMPTS_ENV_VAR: &str = "RATELIMIT_RETRY_ATTEMPTS";

/// Configures the retry budget of a [`crate::RetryableTransport`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RetryOptions {
    /// Maximum number of retries after the initial attempt.
    pub attempts: usize,
}

impl RetryOptions {
    /// Creates options allowing `attempts` retries after the first attempt.
    pub fn new(attempts: usize) -> Self {
        Self { attempts }
    }

    /// Reads the retry budget from `RATELIMIT_RETRY_ATTEMPTS`.
    ///
    /// A missing variable yields the default (no retries). A variable that is
    /// set but empty or not a non-negative integer is reported as an error.
    pub fn from_env() -> std::result::Result<Self, String> {
        match std::env::var(ATTEMPTS_ENV_VAR) {
            Ok(value) => Self::parse_attempts(&value),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(format!("{ATTEMPTS_ENV_VAR} is not valid unicode"))
            }
        }
    }

    fn parse_attempts(value: &str) -> std::result::Result<Self, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(format!("{ATTEMPTS_ENV_VAR} is set but empty"));
        }
        trimmed
            .parse::<usize>()
            .map(Self::new)
            .map_err(|err| format!("invalid {ATTEMPTS_ENV_VAR} value '{trimmed}': {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::RetryOptions;

    #[test]
    fn default_allows_a_single_attempt() {
        assert_eq!(RetryOptions::default().attempts, 0);
    }

    #[test]
    fn parse_attempts_accepts_padded_integer() {
        assert_eq!(RetryOptions::parse_attempts(" 3 "), Ok(RetryOptions::new(3)));
    }

    #[test]
    fn parse_attempts_rejects_empty_and_negative_values() {
        assert!(RetryOptions::parse_attempts("").is_err());
        assert!(RetryOptions::parse_attempts("-1").is_err());
        assert!(RetryOptions::parse_attempts("many").is_err());
    }
}
