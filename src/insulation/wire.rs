//! 백엔드 JSON/시나리오 TOML의 느슨한 숫자 표현을 받아들이는 역직렬화 도우미.
//!
//! Decimal 필드는 `"0.050"` 같은 문자열로 내려오는 경우가 있어 숫자/문자열을 모두 허용한다.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Int(i64),
    Float(f64),
    Text(String),
}

fn parse_text<E: Error>(text: &str) -> Result<Option<f64>, E> {
    let t = text.trim();
    if t.is_empty() {
        return Ok(None);
    }
    t.replace(',', ".")
        .parse::<f64>()
        .map(Some)
        .map_err(|_| E::custom(format!("숫자가 아닌 값: {t}")))
}

/// 숫자 또는 숫자 문자열. null/빈 문자열은 0으로 본다.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?.unwrap_or(0.0))
}

/// 숫자 또는 숫자 문자열. null/빈 문자열은 `None`.
pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(v)) => Ok(Some(v as f64)),
        Some(Raw::Float(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) => parse_text(&s),
    }
}

/// 정수 또는 정수 문자열. 소수부가 있거나 `u32` 범위를 벗어나면 오류.
pub(crate) fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = optional_number(deserializer)?.unwrap_or(0.0);
    if value < 0.0 {
        return Err(D::Error::custom(format!("음수일 수 없는 값: {value}")));
    }
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(D::Error::custom(format!("정수가 아닌 값: {value}")));
    }
    Ok(value as u32)
}

/// 폼 입력처럼 원문 그대로 다뤄야 하는 값. 숫자도 문자열로 바꿔 보관한다.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => String::new(),
        Some(Raw::Int(v)) => v.to_string(),
        Some(Raw::Float(v)) => v.to_string(),
        Some(Raw::Text(s)) => s,
    })
}
