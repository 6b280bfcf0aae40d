use serde::{Deserialize, Serialize};

use super::wire;

/// 단열 대상 구조체 종류. 종류마다 표면 열저항과 허용 표면 유형이 다르다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyKind {
    Wall,
    Roof,
}

/// 구조체 종류별 고정 상수 묶음.
#[derive(Debug)]
pub struct AssemblyProfile {
    pub kind: AssemblyKind,
    /// 실내측 표면 열저항 R_si [m²K/W]
    pub r_si: f64,
    /// 실외측 표면 열저항 R_se [m²K/W]
    pub r_se: f64,
    pub surface_types: &'static [SurfaceType],
    /// REST 경로 접두어 (`wall_insulations` 등)
    pub endpoint: &'static str,
}

static WALL: AssemblyProfile = AssemblyProfile {
    kind: AssemblyKind::Wall,
    r_si: 0.13,
    r_se: 0.04,
    surface_types: &[
        SurfaceType::ExternalWallOutdoor,
        SurfaceType::Internal,
        SurfaceType::Intermediate,
    ],
    endpoint: "wall_insulations",
};

static ROOF: AssemblyProfile = AssemblyProfile {
    kind: AssemblyKind::Roof,
    r_si: 0.10,
    r_se: 0.04,
    surface_types: &[SurfaceType::External, SurfaceType::ExternalHorizontalRoof],
    endpoint: "roof_insulations",
};

impl AssemblyKind {
    pub const ALL: [AssemblyKind; 2] = [AssemblyKind::Wall, AssemblyKind::Roof];

    pub fn profile(&self) -> &'static AssemblyProfile {
        match self {
            AssemblyKind::Wall => &WALL,
            AssemblyKind::Roof => &ROOF,
        }
    }

    /// 표면 열저항 합 R_si + R_se. 재료층이 없을 때의 R_total과 같다.
    pub fn surface_resistance(&self) -> f64 {
        let p = self.profile();
        p.r_si + p.r_se
    }

    pub fn allows(&self, surface: SurfaceType) -> bool {
        self.profile().surface_types.contains(&surface)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "wall" | "walls" => Some(AssemblyKind::Wall),
            "roof" | "roofs" => Some(AssemblyKind::Roof),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            AssemblyKind::Wall => "wall",
            AssemblyKind::Roof => "roof",
        }
    }
}

/// 재료층이 놓인 표면의 노출 유형.
///
/// 벽체용(`ExternalWallOutdoor`, `Internal`, `Intermediate`)과
/// 지붕용(`External`, `ExternalHorizontalRoof`)은 서로 겹치지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceType {
    ExternalWallOutdoor,
    Internal,
    Intermediate,
    External,
    ExternalHorizontalRoof,
}

impl SurfaceType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().replace('-', "_").as_str() {
            "external_wall_outdoor" => Some(SurfaceType::ExternalWallOutdoor),
            "internal" => Some(SurfaceType::Internal),
            "intermediate" => Some(SurfaceType::Intermediate),
            "external" => Some(SurfaceType::External),
            "external_horizontal_roof" => Some(SurfaceType::ExternalHorizontalRoof),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            SurfaceType::ExternalWallOutdoor => "external_wall_outdoor",
            SurfaceType::Internal => "internal",
            SurfaceType::Intermediate => "intermediate",
            SurfaceType::External => "external",
            SurfaceType::ExternalHorizontalRoof => "external_horizontal_roof",
        }
    }
}

/// 재료층이 기존(OLD) 구성인지 개선(NEW) 구성인지 표시한다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    #[default]
    #[serde(alias = "OLD")]
    Old,
    #[serde(alias = "NEW")]
    New,
}

/// 단열 재료층 하나.
///
/// 두께/면적/열전도율은 검증 단계에서 양수임이 보장되어야 하지만,
/// 서버에서 받은 값은 그대로 보관하고 계산 단계에서 안전하게 처리한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLayer {
    /// 서버가 부여한 식별자. 저장 전에는 비어 있다.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    /// 카탈로그 재료 식별자
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub material_name: String,
    /// 두께 [m]
    #[serde(default, deserialize_with = "wire::number")]
    pub thickness: f64,
    /// 열전도율 λ [W/m·K]
    #[serde(default, deserialize_with = "wire::number")]
    pub thermal_conductivity: f64,
    /// 면적 [m²]
    #[serde(default, deserialize_with = "wire::number")]
    pub surface_area: f64,
    /// 시공 비용 [€]. NEW 층에만 존재한다.
    #[serde(
        default,
        deserialize_with = "wire::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<f64>,
    #[serde(default)]
    pub surface_type: Option<SurfaceType>,
    #[serde(default, rename = "material_type")]
    pub membership: Membership,
}

/// 하나의 구조체(벽/지붕)의 OLD 또는 NEW 재료층 묶음.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalAssembly {
    pub kind: AssemblyKind,
    pub membership: Membership,
    pub layers: Vec<MaterialLayer>,
}

impl ThermalAssembly {
    pub fn new(kind: AssemblyKind, membership: Membership, layers: Vec<MaterialLayer>) -> Self {
        Self {
            kind,
            membership,
            layers,
        }
    }

    pub fn empty(kind: AssemblyKind, membership: Membership) -> Self {
        Self::new(kind, membership, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// 기존 구성 바깥에 개선 층을 직렬로 덧댄 개선 후 구성.
    pub fn stacked_with(&self, upgrade: &ThermalAssembly) -> ThermalAssembly {
        let layers = self.layers.iter().chain(&upgrade.layers).cloned().collect();
        ThermalAssembly::new(self.kind, Membership::New, layers)
    }
}
