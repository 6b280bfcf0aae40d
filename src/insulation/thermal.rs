//! 다층 구조체의 열저항/열관류율과 계절별 시간당 열손실 계산.
//!
//! 모든 함수는 순수 함수이며 패닉하지 않는다. 잘못된 층 값은 검증 단계에서
//! 걸러져야 하지만, 들어오더라도 λ=1, 두께=0으로 치환해 계산을 계속한다.

use super::assembly::{AssemblyKind, MaterialLayer, Membership, ThermalAssembly};

/// 계절별 고정 온도차 계수. 실시간 기후값이 아닌 단순화된 상수이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Summer,
}

impl Season {
    pub fn degree_factor(&self) -> f64 {
        match self {
            Season::Winter => 17.0,
            Season::Summer => 13.0,
        }
    }
}

fn safe_conductivity(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

fn safe_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// 한 층의 열저항 R = d / λ [m²K/W].
pub fn layer_resistance(layer: &MaterialLayer) -> f64 {
    safe_non_negative(layer.thickness) / safe_conductivity(layer.thermal_conductivity)
}

/// 재료층 열저항의 합.
pub fn materials_resistance(layers: &[MaterialLayer]) -> f64 {
    layers.iter().map(layer_resistance).sum()
}

/// R_total = R_si + R_se + Σ(d/λ). 층이 없으면 R_si + R_se 그대로이다.
pub fn r_total(kind: AssemblyKind, layers: &[MaterialLayer]) -> f64 {
    kind.surface_resistance() + materials_resistance(layers)
}

/// U = 1 / R_total [W/m²K]. R_total이 0 이하이면 0.
pub fn u_coefficient(kind: AssemblyKind, layers: &[MaterialLayer]) -> f64 {
    let r = r_total(kind, layers);
    if r > 0.0 {
        1.0 / r
    } else {
        0.0
    }
}

/// 층 면적의 합 [m²]. 열손실 추정에만 사용한다.
pub fn total_surface_area(layers: &[MaterialLayer]) -> f64 {
    layers.iter().map(|l| safe_non_negative(l.surface_area)).sum()
}

/// 시간당 열손실 [kW] = U × A × 계절계수 / 1000.
pub fn hourly_losses(kind: AssemblyKind, layers: &[MaterialLayer], season: Season) -> f64 {
    u_coefficient(kind, layers) * total_surface_area(layers) * season.degree_factor() / 1000.0
}

/// NEW 층의 비용 합. OLD 층은 합산 대상에서 제외된다.
pub fn total_cost(layers: &[MaterialLayer]) -> f64 {
    layers
        .iter()
        .filter(|l| l.membership == Membership::New)
        .filter_map(|l| l.cost)
        .map(safe_non_negative)
        .sum()
}

/// 구조체 하나에 대한 열성능 요약.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalSummary {
    pub r_total: f64,
    pub u_coefficient: f64,
    pub surface_area_m2: f64,
    pub winter_losses_kw: f64,
    pub summer_losses_kw: f64,
}

impl ThermalAssembly {
    pub fn r_total(&self) -> f64 {
        r_total(self.kind, &self.layers)
    }

    pub fn u_coefficient(&self) -> f64 {
        u_coefficient(self.kind, &self.layers)
    }

    pub fn hourly_losses(&self, season: Season) -> f64 {
        hourly_losses(self.kind, &self.layers, season)
    }

    pub fn summary(&self) -> ThermalSummary {
        summarize(self.kind, &self.layers)
    }

    /// NEW 층 비용의 합.
    pub fn total_cost(&self) -> f64 {
        total_cost(&self.layers)
    }
}

/// R/U/면적/계절 열손실을 한 번에 계산한다.
pub fn summarize(kind: AssemblyKind, layers: &[MaterialLayer]) -> ThermalSummary {
    let r = r_total(kind, layers);
    let u = if r > 0.0 { 1.0 / r } else { 0.0 };
    let area = total_surface_area(layers);
    ThermalSummary {
        r_total: r,
        u_coefficient: u,
        surface_area_m2: area,
        winter_losses_kw: u * area * Season::Winter.degree_factor() / 1000.0,
        summer_losses_kw: u * area * Season::Summer.degree_factor() / 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(thickness: f64, lambda: f64) -> MaterialLayer {
        MaterialLayer {
            uuid: String::new(),
            material: "x".into(),
            material_name: "x".into(),
            thickness,
            thermal_conductivity: lambda,
            surface_area: 1.0,
            cost: None,
            surface_type: None,
            membership: Membership::Old,
        }
    }

    #[test]
    fn malformed_conductivity_falls_back_to_one() {
        assert!((layer_resistance(&layer(0.2, 0.0)) - 0.2).abs() < 1e-12);
        assert!((layer_resistance(&layer(0.2, -3.0)) - 0.2).abs() < 1e-12);
        assert!((layer_resistance(&layer(0.2, f64::NAN)) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn negative_thickness_contributes_nothing() {
        assert_eq!(layer_resistance(&layer(-0.1, 0.04)), 0.0);
    }
}
