use crate::core::ads::{AdNetwork, DEFAULT_SCRIPT_URL};
use crate::core::entitlement::PREMIUM_MAX_FILE_BYTES;
use crate::core::{PlanType, UserId};
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{
    validate_at_least, validate_non_empty_string, validate_one_of, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub ads: AdsConfig,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 上傳大小上限須大於付費方案的檔案上限，多出的部分留給 multipart 標頭
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: u64,
    #[serde(default)]
    pub production: bool,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    #[serde(default = "default_delay_ms")]
    pub simulated_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdsConfig {
    #[serde(default = "default_publisher_id")]
    pub publisher_id: String,
    #[serde(default = "default_script_url")]
    pub script_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub token: String,
    pub user_id: String,
    /// `free` or `premium`; omitted means no subscription record.
    pub plan: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_body_bytes() -> u64 {
    PREMIUM_MAX_FILE_BYTES + 4 * 1024 * 1024
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_publisher_id() -> String {
    "ca-pub-XXXXXXXXXXXXXXXX".to_string()
}

fn default_script_url() -> String {
    DEFAULT_SCRIPT_URL.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            production: false,
            cors_origins: Vec::new(),
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: default_delay_ms(),
        }
    }
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            publisher_id: default_publisher_id(),
            script_url: default_script_url(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConvertError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConvertError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ADS_PUBLISHER_ID})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConvertError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_at_least("server.port", self.server.port, 1)?;
        validate_at_least(
            "server.max_body_bytes",
            self.server.max_body_bytes,
            PREMIUM_MAX_FILE_BYTES,
        )?;
        for origin in &self.server.cors_origins {
            validate_url("server.cors_origins", origin)?;
        }

        validate_non_empty_string("ads.publisher_id", &self.ads.publisher_id)?;
        validate_url("ads.script_url", &self.ads.script_url)?;

        let mut tokens = HashSet::new();
        for account in &self.accounts {
            validate_non_empty_string("accounts.token", &account.token)?;
            validate_non_empty_string("accounts.user_id", &account.user_id)?;
            if let Some(plan) = &account.plan {
                validate_one_of("accounts.plan", plan, &["free", "premium"])?;
            }
            if !tokens.insert(account.token.as_str()) {
                return Err(ConvertError::InvalidConfigValueError {
                    field: "accounts.token".to_string(),
                    value: account.token.clone(),
                    reason: "Token is assigned to more than one account".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.conversion.simulated_delay_ms)
    }

    pub fn ad_network(&self) -> AdNetwork {
        AdNetwork {
            publisher_id: self.ads.publisher_id.clone(),
            script_url: self.ads.script_url.clone(),
            production: self.server.production,
        }
    }

    pub fn identity_tokens(&self) -> Vec<(String, UserId)> {
        self.accounts
            .iter()
            .map(|a| (a.token.clone(), UserId::new(a.user_id.clone())))
            .collect()
    }

    /// Subscription records to seed; accounts without a plan get none.
    pub fn subscriptions(&self) -> Vec<(UserId, PlanType)> {
        self.accounts
            .iter()
            .filter_map(|a| {
                let plan = a.plan.as_deref().and_then(PlanType::parse)?;
                Some((UserId::new(a.user_id.clone()), plan))
            })
            .collect()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.simulated_delay(), Duration::from_secs(2));
        assert!(!config.server.production);
        assert!(config.accounts.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_accounts() {
        let toml_content = r#"
[server]
port = 8080
production = true

[conversion]
simulated_delay_ms = 0

[ads]
publisher_id = "ca-pub-42"

[[accounts]]
token = "tok-free"
user_id = "alice"
plan = "free"

[[accounts]]
token = "tok-premium"
user_id = "bob"
plan = "premium"

[[accounts]]
token = "tok-none"
user_id = "carol"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.identity_tokens().len(), 3);
        assert_eq!(
            config.subscriptions(),
            vec![
                (UserId::new("alice"), PlanType::Free),
                (UserId::new("bob"), PlanType::Premium)
            ]
        );
        assert!(config.ad_network().production);
        assert_eq!(config.ad_network().publisher_id, "ca-pub-42");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CONVERT_PRO_TEST_PUBLISHER", "ca-pub-from-env");

        let toml_content = r#"
[ads]
publisher_id = "${CONVERT_PRO_TEST_PUBLISHER}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.ads.publisher_id, "ca-pub-from-env");

        std::env::remove_var("CONVERT_PRO_TEST_PUBLISHER");
    }

    #[test]
    fn test_config_validation() {
        let bad_plan = r#"
[[accounts]]
token = "t"
user_id = "u"
plan = "gold"
"#;
        assert!(AppConfig::from_toml_str(bad_plan).unwrap().validate().is_err());

        let duplicate_token = r#"
[[accounts]]
token = "t"
user_id = "u1"

[[accounts]]
token = "t"
user_id = "u2"
"#;
        assert!(AppConfig::from_toml_str(duplicate_token)
            .unwrap()
            .validate()
            .is_err());

        let small_body = r#"
[server]
max_body_bytes = 1024
"#;
        assert!(AppConfig::from_toml_str(small_body).unwrap().validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nhost = \"127.0.0.1\"\nport = 9000\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }
}
