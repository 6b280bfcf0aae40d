//! 오프라인 계산용 시나리오 파일(TOML).
//!
//! ```toml
//! kind = "wall"
//!
//! [economics]
//! heating_hours_per_year = 2000
//! cooling_hours_per_year = 800
//!
//! [[old]]
//! material = "brick"
//! thickness = "24cm"
//! surface_area = 20
//! surface_type = "external_wall_outdoor"
//!
//! [[new]]
//! material = "eps"
//! thickness = "5cm"
//! surface_area = 20
//! cost = 500
//! surface_type = "external_wall_outdoor"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::config::EconomicsConfig;
use crate::i18n::Translator;
use crate::insulation::comparison::RetrofitComparison;
use crate::insulation::economics::{retrofit_economics, RetrofitEconomicsInput, RetrofitEconomicsResult};
use crate::insulation::thermal::ThermalSummary;
use crate::insulation::validation::{
    validate_economics, validate_material, EconomicParams, FieldErrors, MaterialForm,
};
use crate::insulation::{AssemblyKind, CatalogMaterial, MaterialLayer, Membership, ThermalAssembly};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioEconomics {
    pub heating_hours_per_year: f64,
    pub cooling_hours_per_year: f64,
    pub annual_operating_costs: f64,
    /// 없으면 설정값을 쓴다.
    pub time_period_years: Option<u32>,
    /// [%]. 없으면 설정값을 쓴다.
    pub discount_rate: Option<f64>,
    /// [€/년]. 없으면 절감 에너지 × 에너지 단가로 추정한다.
    pub annual_benefit: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub kind: AssemblyKind,
    #[serde(default)]
    pub economics: ScenarioEconomics,
    #[serde(default)]
    pub old: Vec<MaterialForm>,
    #[serde(default)]
    pub new: Vec<MaterialForm>,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("시나리오 파일을 읽을 수 없음: {0}")]
    Io(#[from] std::io::Error),
    #[error("시나리오 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    /// 몇 번째 층(OLD/NEW 구분)에서 검증이 실패했는지 함께 담는다.
    #[error("{membership:?} layer #{index}: {errors}")]
    InvalidLayer {
        membership: Membership,
        index: usize,
        errors: FieldErrors,
    },
    #[error("economics: {0}")]
    InvalidEconomics(FieldErrors),
}

/// 시나리오 계산 결과 전체.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub kind: AssemblyKind,
    pub old: ThermalAssembly,
    pub new: ThermalAssembly,
    /// 설정 기본값을 채우고 범위 검사를 통과한 경제성 입력
    pub params: EconomicParams,
    /// 개선 후(OLD+NEW) 구성 요약
    pub combined: ThermalSummary,
    pub comparison: RetrofitComparison,
    pub total_cost: f64,
    pub annual_benefit: f64,
    pub economics: RetrofitEconomicsResult,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(content)?)
    }

    fn validated_assembly(
        &self,
        membership: Membership,
        catalog: &[CatalogMaterial],
        tr: &Translator,
    ) -> Result<ThermalAssembly, ScenarioError> {
        let forms = match membership {
            Membership::Old => &self.old,
            Membership::New => &self.new,
        };
        let layers = forms
            .iter()
            .enumerate()
            .map(|(i, form)| {
                let form = MaterialForm {
                    membership,
                    ..form.clone()
                };
                validate_material(&form, self.kind, catalog, tr).map_err(|errors| {
                    ScenarioError::InvalidLayer {
                        membership,
                        index: i + 1,
                        errors,
                    }
                })
            })
            .collect::<Result<Vec<MaterialLayer>, _>>()?;
        Ok(ThermalAssembly::new(self.kind, membership, layers))
    }

    /// 비어 있는 값은 설정 기본값으로 채운 뒤 범위를 검사한다.
    fn economic_params(&self, defaults: &EconomicsConfig, tr: &Translator) -> Result<EconomicParams, ScenarioError> {
        let eco = &self.economics;
        let params = EconomicParams {
            heating_hours_per_year: eco.heating_hours_per_year,
            cooling_hours_per_year: eco.cooling_hours_per_year,
            time_period_years: eco.time_period_years.unwrap_or(defaults.time_period_years),
            annual_operating_costs: eco.annual_operating_costs,
            discount_rate: eco.discount_rate.unwrap_or(defaults.discount_rate),
        };
        validate_economics(&params, tr).map_err(ScenarioError::InvalidEconomics)
    }

    /// 모든 층을 검증한 뒤 열성능과 경제성을 계산한다.
    pub fn evaluate(
        &self,
        catalog: &[CatalogMaterial],
        defaults: &EconomicsConfig,
        tr: &Translator,
    ) -> Result<ScenarioReport, ScenarioError> {
        let old = self.validated_assembly(Membership::Old, catalog, tr)?;
        let new = self.validated_assembly(Membership::New, catalog, tr)?;
        let params = self.economic_params(defaults, tr)?;

        let comparison = RetrofitComparison::between(
            &old,
            &new,
            params.heating_hours_per_year,
            params.cooling_hours_per_year,
        );
        let annual_benefit = self
            .economics
            .annual_benefit
            .unwrap_or_else(|| comparison.estimated_annual_benefit(defaults.energy_price_per_kwh));
        let cost = new.total_cost();
        let economics = retrofit_economics(&RetrofitEconomicsInput {
            total_cost: cost,
            annual_benefit,
            annual_operating_costs: params.annual_operating_costs,
            discount_rate_percent: params.discount_rate,
            years: params.time_period_years,
        });

        Ok(ScenarioReport {
            kind: self.kind,
            combined: old.stacked_with(&new).summary(),
            old,
            new,
            params,
            comparison,
            total_cost: cost,
            annual_benefit,
            economics,
        })
    }
}
