use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub auth: AuthSettings,
}

/// Authentication settings
///
/// The signing and encryption keys are loaded once before first use and
/// stay read-only for the process lifetime; every component borrows them
/// from here instead of reading globals.
#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    /// HMAC-SHA256 signing key for access and refresh tokens
    pub signing_key: String,
    /// AES-256-GCM key, must be exactly 32 bytes
    pub encryption_key: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// seconds (default 1800 = 30 minutes)
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    /// seconds (default 604800 = 7 days)
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
    /// Snowflake worker id, distinct per process sharing the epoch
    #[serde(default = "default_worker_id")]
    pub worker_id: u64,
}

fn default_issuer() -> String {
    "vcb-member".to_string()
}

fn default_access_token_expiry() -> i64 {
    1800
}

fn default_refresh_token_expiry() -> i64 {
    604800
}

fn default_worker_id() -> u64 {
    1
}

impl AuthSettings {
    /// Validate key material once at startup.
    ///
    /// An empty signing key or a wrong-length encryption key is a fatal
    /// misconfiguration: startup must abort rather than let per-call
    /// paths fail later.
    pub fn validate(&self) -> Result<(), String> {
        if self.signing_key.is_empty() {
            return Err("auth.signing_key must not be empty".to_string());
        }
        if self.encryption_key.len() != 32 {
            return Err(format!(
                "auth.encryption_key must be exactly 32 bytes, got {}",
                self.encryption_key.len()
            ));
        }
        if self.access_token_expiry <= 0 || self.refresh_token_expiry <= 0 {
            return Err("token expiries must be positive".to_string());
        }
        Ok(())
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .build()?;
    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> AuthSettings {
        AuthSettings {
            signing_key: "test-signing-key-for-hmac-sha256".to_string(),
            encryption_key: "01234567890123456789012345678901".to_string(),
            issuer: default_issuer(),
            access_token_expiry: default_access_token_expiry(),
            refresh_token_expiry: default_refresh_token_expiry(),
            worker_id: default_worker_id(),
        }
    }

    #[test]
    fn test_valid_settings_pass_validation() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_empty_signing_key_rejected() {
        let mut settings = valid_settings();
        settings.signing_key = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_wrong_length_encryption_key_rejected() {
        let mut settings = valid_settings();
        settings.encryption_key = "too-short".to_string();
        let err = settings.validate().unwrap_err();
        assert!(err.contains("32 bytes"));
    }

    #[test]
    fn test_non_positive_expiry_rejected() {
        let mut settings = valid_settings();
        settings.access_token_expiry = 0;
        assert!(settings.validate().is_err());
    }
}
