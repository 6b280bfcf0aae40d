use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::insulation::controller::RetryPolicy;
use crate::insulation::record::{DEFAULT_DISCOUNT_RATE, DEFAULT_TIME_PERIOD_YEARS};
use crate::units::{ConductivityUnit, LengthUnit, UValueUnit};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// 설정 파일보다 우선하는 API 토큰 환경 변수.
pub const TOKEN_ENV: &str = "INSULATION_API_TOKEN";

/// 원격 API 접속 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

/// 조회 실패 재시도 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.base_delay_ms),
        }
    }
}

/// 오프라인 경제성 계산 기본값.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    /// 에너지 단가 [€/kWh]
    pub energy_price_per_kwh: f64,
    pub time_period_years: u32,
    /// [%]
    pub discount_rate: f64,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            energy_price_per_kwh: 0.15,
            time_period_years: DEFAULT_TIME_PERIOD_YEARS,
            discount_rate: DEFAULT_DISCOUNT_RATE,
        }
    }
}

/// 결과 표시 단위.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub u_value: UValueUnit,
    pub conductivity: ConductivityUnit,
    pub thickness: LengthUnit,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            u_value: UValueUnit::WPerSquareMeterK,
            conductivity: ConductivityUnit::WPerMeterK,
            thickness: LengthUnit::Centimeter,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: String,
    pub language_pack_dir: Option<String>,
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub economics: EconomicsConfig,
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            language_pack_dir: None,
            api: ApiConfig::default(),
            retry: RetryConfig::default(),
            economics: EconomicsConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 TOML로 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 환경 변수 토큰이 있으면 그것을, 없으면 설정 파일 토큰을 쓴다.
    pub fn api_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.api.token.clone())
    }
}
