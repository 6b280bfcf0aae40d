use serde::{Deserialize, Serialize};

use super::assembly::{AssemblyKind, MaterialLayer, Membership, ThermalAssembly};
use super::wire;

pub const DEFAULT_TIME_PERIOD_YEARS: u32 = 20;
pub const DEFAULT_DISCOUNT_RATE: f64 = 5.0;
pub const HOURS_PER_YEAR: f64 = 8760.0;

fn default_time_period() -> u32 {
    DEFAULT_TIME_PERIOD_YEARS
}

fn default_discount_rate() -> f64 {
    DEFAULT_DISCOUNT_RATE
}

/// 건물 하나의 벽체 또는 지붕 단열 기록.
///
/// 파생값(`u_coefficient`, 시간당 열손실, `total_cost`, `net_present_value`)은
/// 저장 후 서버 재계산 값이 최종값이다. 로컬 계산은 즉시 표시용이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsulationRecord {
    /// 식별자와 건물은 필수이다. 이 둘이 없으면 기록 응답으로 보지 않는다.
    pub uuid: String,
    pub building: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default)]
    pub old_materials: Vec<MaterialLayer>,
    #[serde(default)]
    pub new_materials: Vec<MaterialLayer>,
    /// [W/m²K]
    #[serde(default, deserialize_with = "wire::number")]
    pub u_coefficient: f64,
    /// [kW]
    #[serde(default, deserialize_with = "wire::number")]
    pub winter_hourly_losses: f64,
    /// [kW]
    #[serde(default, deserialize_with = "wire::number")]
    pub summer_hourly_losses: f64,
    #[serde(default, deserialize_with = "wire::number")]
    pub heating_hours_per_year: f64,
    #[serde(default, deserialize_with = "wire::number")]
    pub cooling_hours_per_year: f64,
    #[serde(default, deserialize_with = "wire::number")]
    pub total_cost: f64,
    #[serde(default, deserialize_with = "wire::number")]
    pub annual_benefit: f64,
    #[serde(default = "default_time_period", deserialize_with = "wire::whole_number")]
    pub time_period_years: u32,
    #[serde(default, deserialize_with = "wire::number")]
    pub annual_operating_costs: f64,
    /// [%]
    #[serde(default = "default_discount_rate", deserialize_with = "wire::number")]
    pub discount_rate: f64,
    #[serde(default, deserialize_with = "wire::number")]
    pub net_present_value: f64,
}

/// 레코드 생성 요청에 쓰는 기본 필드 묶음.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordDraft {
    pub building: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub heating_hours_per_year: f64,
    pub cooling_hours_per_year: f64,
    pub time_period_years: u32,
    pub annual_operating_costs: f64,
    pub discount_rate: f64,
}

impl RecordDraft {
    pub fn baseline(building: &str, project: Option<&str>) -> Self {
        Self {
            building: building.to_string(),
            project: project.map(str::to_string),
            heating_hours_per_year: 0.0,
            cooling_hours_per_year: 0.0,
            time_period_years: DEFAULT_TIME_PERIOD_YEARS,
            annual_operating_costs: 0.0,
            discount_rate: DEFAULT_DISCOUNT_RATE,
        }
    }
}

impl InsulationRecord {
    /// 저장 전 로컬 레코드. 서버 응답을 받기 전 테스트/오프라인 계산에 쓴다.
    pub fn from_draft(draft: &RecordDraft) -> Self {
        Self {
            uuid: String::new(),
            building: draft.building.clone(),
            project: draft.project.clone(),
            old_materials: Vec::new(),
            new_materials: Vec::new(),
            u_coefficient: 0.0,
            winter_hourly_losses: 0.0,
            summer_hourly_losses: 0.0,
            heating_hours_per_year: draft.heating_hours_per_year,
            cooling_hours_per_year: draft.cooling_hours_per_year,
            total_cost: 0.0,
            annual_benefit: 0.0,
            time_period_years: draft.time_period_years,
            annual_operating_costs: draft.annual_operating_costs,
            discount_rate: draft.discount_rate,
            net_present_value: 0.0,
        }
    }

    /// 각 목록에 속한 층의 membership 태그를 목록과 일치시킨다.
    pub fn normalize(mut self) -> Self {
        for layer in &mut self.old_materials {
            layer.membership = Membership::Old;
            layer.cost = None;
        }
        for layer in &mut self.new_materials {
            layer.membership = Membership::New;
        }
        self
    }

    pub fn layers(&self, membership: Membership) -> &[MaterialLayer] {
        match membership {
            Membership::Old => &self.old_materials,
            Membership::New => &self.new_materials,
        }
    }

    pub fn layers_mut(&mut self, membership: Membership) -> &mut Vec<MaterialLayer> {
        match membership {
            Membership::Old => &mut self.old_materials,
            Membership::New => &mut self.new_materials,
        }
    }

    pub fn assembly(&self, kind: AssemblyKind, membership: Membership) -> ThermalAssembly {
        ThermalAssembly::new(kind, membership, self.layers(membership).to_vec())
    }

    /// 개선 후 구성(OLD 층 + NEW 층).
    pub fn retrofitted(&self, kind: AssemblyKind) -> ThermalAssembly {
        self.assembly(kind, Membership::Old)
            .stacked_with(&self.assembly(kind, Membership::New))
    }

    /// uuid로 층을 찾는다.
    pub fn find_layer(&self, layer_uuid: &str) -> Option<&MaterialLayer> {
        self.old_materials
            .iter()
            .chain(&self.new_materials)
            .find(|l| l.uuid == layer_uuid)
    }

    /// uuid에 해당하는 층을 어느 목록에서든 제거하고 돌려준다.
    pub fn remove_layer(&mut self, layer_uuid: &str) -> Option<MaterialLayer> {
        for membership in [Membership::Old, Membership::New] {
            let list = self.layers_mut(membership);
            if let Some(pos) = list.iter().position(|l| l.uuid == layer_uuid) {
                return Some(list.remove(pos));
            }
        }
        None
    }

    /// 층을 membership에 맞는 목록에 넣는다. 같은 uuid가 있으면 교체한다.
    pub fn upsert_layer(&mut self, layer: MaterialLayer) {
        if !layer.uuid.is_empty() {
            self.remove_layer(&layer.uuid);
        }
        self.layers_mut(layer.membership).push(layer);
    }

    /// 로컬 계산값으로 파생 필드를 갱신한다. NPV는 서버 값 그대로 둔다.
    ///
    /// 시간당 열손실의 면적은 OLD+NEW 모든 층 면적의 합이다. 같은 벽에 층이 셋이면
    /// 면적도 세 번 더해진다. `RetrofitComparison`은 가장 큰 층 면적 하나만 쓰므로
    /// 두 값은 서로 다르게 나온다.
    pub fn apply_local_metrics(&mut self, kind: AssemblyKind) {
        let summary = self.retrofitted(kind).summary();
        self.u_coefficient = summary.u_coefficient;
        self.winter_hourly_losses = summary.winter_losses_kw;
        self.summer_hourly_losses = summary.summer_losses_kw;
        self.total_cost = self.assembly(kind, Membership::New).total_cost();
    }
}
