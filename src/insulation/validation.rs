//! 재료층/경제성 입력 검증.
//!
//! 검증에 실패하면 제출 전체를 거부하고 필드명 → 메시지 맵을 돌려준다.
//! 원격 저장소 호출은 모든 필드가 통과한 뒤에만 일어난다.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use super::assembly::{AssemblyKind, MaterialLayer, Membership, SurfaceType};
use super::catalog::{find_material, CatalogMaterial};
use super::record::HOURS_PER_YEAR;
use super::wire;
use crate::i18n::{keys, Translator};
use crate::units::{convert_area, convert_length, split_value_and_symbol, AreaUnit, LengthUnit};

pub const FIELD_MATERIAL: &str = "material";
pub const FIELD_THICKNESS: &str = "thickness";
pub const FIELD_SURFACE_AREA: &str = "surface_area";
pub const FIELD_COST: &str = "cost";
pub const FIELD_SURFACE_TYPE: &str = "surface_type";
/// 특정 필드에 속하지 않는 서버 오류(`detail`/`error`)를 담는 키.
pub const FIELD_GENERAL: &str = "detail";

/// 필드 단위 오류 메시지 모음.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 같은 필드의 첫 번째 오류만 보관한다.
    pub fn insert(&mut self, field: &str, message: String) {
        self.0.entry(field.to_string()).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// 재료 입력 폼의 원문 값. 숫자 필드도 사용자가 입력한 문자열 그대로 받는다.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MaterialForm {
    #[serde(default)]
    pub material: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub thickness: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub surface_area: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub cost: String,
    #[serde(default)]
    pub surface_type: String,
    #[serde(default)]
    pub membership: Membership,
}

enum NumberIssue {
    Missing,
    NotANumber,
    UnknownUnit(String),
}

fn parse_with_unit<U>(
    raw: &str,
    unit_of: impl Fn(&str) -> Option<U>,
    to_si: impl Fn(f64, U) -> f64,
) -> Result<f64, NumberIssue> {
    if raw.trim().is_empty() {
        return Err(NumberIssue::Missing);
    }
    let (value, symbol) = split_value_and_symbol(raw).ok_or(NumberIssue::NotANumber)?;
    let unit = unit_of(symbol).ok_or_else(|| NumberIssue::UnknownUnit(symbol.to_string()))?;
    Ok(to_si(value, unit))
}

fn parse_plain(raw: &str) -> Result<f64, NumberIssue> {
    parse_with_unit(
        raw,
        |s| if s.is_empty() { Some(()) } else { None },
        |v, _| v,
    )
}

fn issue_message(tr: &Translator, issue: NumberIssue) -> String {
    match issue {
        NumberIssue::Missing => tr.t(keys::VALIDATION_REQUIRED),
        NumberIssue::NotANumber => tr.t(keys::VALIDATION_NOT_A_NUMBER),
        NumberIssue::UnknownUnit(unit) => tr.fmt(keys::VALIDATION_UNKNOWN_UNIT, &[("unit", unit)]),
    }
}

/// 양수 필드를 검사하고 SI 값으로 돌려준다. 실패 시 오류를 기록하고 `None`.
fn positive_field(
    errors: &mut FieldErrors,
    tr: &Translator,
    field: &str,
    parsed: Result<f64, NumberIssue>,
) -> Option<f64> {
    match parsed {
        Ok(v) if v > 0.0 => Some(v),
        Ok(_) => {
            errors.insert(field, tr.t(keys::VALIDATION_MUST_BE_POSITIVE));
            None
        }
        Err(issue) => {
            errors.insert(field, issue_message(tr, issue));
            None
        }
    }
}

/// 재료 입력을 검증해 계산/저장 가능한 재료층으로 변환한다.
///
/// λ는 사용자 입력이 아니라 카탈로그 값에서 가져온다. 비용은 NEW 층일 때만
/// 필수이며, OLD 층에 입력된 비용은 무시한다.
pub fn validate_material(
    form: &MaterialForm,
    kind: AssemblyKind,
    catalog: &[CatalogMaterial],
    tr: &Translator,
) -> Result<MaterialLayer, FieldErrors> {
    let mut errors = FieldErrors::new();

    let material = if form.material.trim().is_empty() {
        errors.insert(FIELD_MATERIAL, tr.t(keys::VALIDATION_REQUIRED));
        None
    } else {
        let found = find_material(catalog, &form.material);
        if found.is_none() {
            errors.insert(FIELD_MATERIAL, tr.t(keys::VALIDATION_UNKNOWN_MATERIAL));
        }
        found
    };

    let thickness = positive_field(
        &mut errors,
        tr,
        FIELD_THICKNESS,
        parse_with_unit(&form.thickness, LengthUnit::from_symbol, |v, u| {
            convert_length(v, u, LengthUnit::Meter)
        }),
    );

    let surface_area = positive_field(
        &mut errors,
        tr,
        FIELD_SURFACE_AREA,
        parse_with_unit(&form.surface_area, AreaUnit::from_symbol, |v, u| {
            convert_area(v, u, AreaUnit::SquareMeter)
        }),
    );

    let cost = match form.membership {
        Membership::Old => None,
        Membership::New => match parse_plain(&form.cost) {
            Ok(v) if v >= 0.0 => Some(v),
            Ok(_) => {
                errors.insert(FIELD_COST, tr.t(keys::VALIDATION_MUST_BE_NON_NEGATIVE));
                None
            }
            Err(issue) => {
                errors.insert(FIELD_COST, issue_message(tr, issue));
                None
            }
        },
    };

    let surface_type = if form.surface_type.trim().is_empty() {
        errors.insert(FIELD_SURFACE_TYPE, tr.t(keys::VALIDATION_REQUIRED));
        None
    } else {
        match SurfaceType::from_code(&form.surface_type).filter(|s| kind.allows(*s)) {
            Some(s) => Some(s),
            None => {
                let allowed: Vec<&str> = kind
                    .profile()
                    .surface_types
                    .iter()
                    .map(SurfaceType::as_code)
                    .collect();
                errors.insert(
                    FIELD_SURFACE_TYPE,
                    tr.fmt(
                        keys::VALIDATION_INVALID_SURFACE_TYPE,
                        &[("allowed", allowed.join(", "))],
                    ),
                );
                None
            }
        }
    };

    match (material, thickness, surface_area, surface_type) {
        (Some(m), Some(thickness), Some(surface_area), Some(surface_type)) if errors.is_empty() => {
            Ok(MaterialLayer {
                uuid: String::new(),
                material: m.id.clone(),
                material_name: m.name.clone(),
                thickness,
                thermal_conductivity: m.thermal_conductivity,
                surface_area,
                cost,
                surface_type: Some(surface_type),
                membership: form.membership,
            })
        }
        _ => Err(errors),
    }
}

/// 레코드 저장 시 사용자가 입력하는 경제성/운전 조건.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomicParams {
    pub heating_hours_per_year: f64,
    pub cooling_hours_per_year: f64,
    pub time_period_years: u32,
    pub annual_operating_costs: f64,
    /// [%]
    pub discount_rate: f64,
}

fn range_check(
    errors: &mut FieldErrors,
    tr: &Translator,
    field: &str,
    value: f64,
    min: f64,
    max: f64,
) {
    if !value.is_finite() || value < min || value > max {
        errors.insert(
            field,
            tr.fmt(
                keys::VALIDATION_OUT_OF_RANGE,
                &[("min", min.to_string()), ("max", max.to_string())],
            ),
        );
    }
}

/// 경제성 입력 범위를 검사한다.
pub fn validate_economics(params: &EconomicParams, tr: &Translator) -> Result<EconomicParams, FieldErrors> {
    let mut errors = FieldErrors::new();
    range_check(
        &mut errors,
        tr,
        "heating_hours_per_year",
        params.heating_hours_per_year,
        0.0,
        HOURS_PER_YEAR,
    );
    range_check(
        &mut errors,
        tr,
        "cooling_hours_per_year",
        params.cooling_hours_per_year,
        0.0,
        HOURS_PER_YEAR,
    );
    range_check(
        &mut errors,
        tr,
        "time_period_years",
        f64::from(params.time_period_years),
        1.0,
        50.0,
    );
    range_check(&mut errors, tr, "discount_rate", params.discount_rate, 0.0, 100.0);
    if !params.annual_operating_costs.is_finite() || params.annual_operating_costs < 0.0 {
        errors.insert(
            "annual_operating_costs",
            tr.t(keys::VALIDATION_MUST_BE_NON_NEGATIVE),
        );
    }
    errors.into_result(*params)
}
