//! 입력 보정 및 표시용 단위 정의 모음.
//!
//! 계산 모델은 항상 SI 기준(m, m², W/m·K, W/m²·K)으로만 동작하므로
//! 사용자 입력은 이 모듈을 거쳐 SI로 환산한 뒤 전달한다.

pub mod area;
pub mod length;
pub mod thermal;

pub use area::{convert_area, AreaUnit};
pub use length::{convert_length, LengthUnit};
pub use thermal::{convert_conductivity, convert_u_value, ConductivityUnit, UValueUnit};

/// 숫자와 단위 기호가 붙어 있는 입력(`5cm`, `0,05 m`)을 값/기호로 분리한다.
///
/// 소수점 쉼표는 점으로 바꾼다. 숫자 부분을 해석할 수 없으면 `None`.
pub fn split_value_and_symbol(raw: &str) -> Option<(f64, &str)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let split_at = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | 'e' | 'E')))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let (number, symbol) = trimmed.split_at(split_at);
    let value = number.trim().replace(',', ".").parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((value, symbol.trim()))
}
