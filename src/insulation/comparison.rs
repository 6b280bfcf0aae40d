//! 기존(OLD) 구성 대비 개선 후(OLD+NEW) 구성의 열손실 감소와 연간 절감량 추정.

use super::assembly::ThermalAssembly;
use super::thermal::{Season, ThermalSummary};

/// 개선 전후 비교 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrofitComparison {
    pub before: ThermalSummary,
    pub after: ThermalSummary,
    /// 전후 비교에 공통으로 쓰는 외피 면적 [m²]
    pub envelope_area_m2: f64,
    /// 겨울 시간당 열손실 감소 [kW]
    pub winter_reduction_kw: f64,
    /// 여름 시간당 열손실 감소 [kW]
    pub summer_reduction_kw: f64,
    /// 연간 절감 에너지 [kWh/년]
    pub annual_savings_kwh: f64,
}

/// 모든 층이 같은 외피를 덮으므로 가장 큰 층 면적을 외피 면적으로 본다.
fn envelope_area(layers: impl Iterator<Item = f64>) -> f64 {
    layers
        .filter(|a| a.is_finite() && *a > 0.0)
        .fold(0.0, f64::max)
}

fn loss_kw(u: f64, area: f64, season: Season) -> f64 {
    u * area * season.degree_factor() / 1000.0
}

impl RetrofitComparison {
    /// 개선 후 구성은 기존 층 위에 NEW 층을 직렬로 더한 것으로 본다.
    pub fn between(
        existing: &ThermalAssembly,
        upgrade: &ThermalAssembly,
        heating_hours: f64,
        cooling_hours: f64,
    ) -> Self {
        let combined = existing.stacked_with(upgrade);
        let before = existing.summary();
        let after = combined.summary();
        let area = envelope_area(combined.layers.iter().map(|l| l.surface_area));

        let winter_reduction_kw = loss_kw(before.u_coefficient, area, Season::Winter)
            - loss_kw(after.u_coefficient, area, Season::Winter);
        let summer_reduction_kw = loss_kw(before.u_coefficient, area, Season::Summer)
            - loss_kw(after.u_coefficient, area, Season::Summer);
        let annual_savings_kwh = winter_reduction_kw * heating_hours.max(0.0)
            + summer_reduction_kw * cooling_hours.max(0.0);
        Self {
            before,
            after,
            envelope_area_m2: area,
            winter_reduction_kw,
            summer_reduction_kw,
            annual_savings_kwh,
        }
    }

    pub fn u_reduction(&self) -> f64 {
        self.before.u_coefficient - self.after.u_coefficient
    }

    /// 에너지 단가 [€/kWh]를 곱한 연간 편익 추정치 [€].
    pub fn estimated_annual_benefit(&self, energy_price_per_kwh: f64) -> f64 {
        self.annual_savings_kwh * energy_price_per_kwh.max(0.0)
    }
}
