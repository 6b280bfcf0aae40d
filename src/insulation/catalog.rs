//! 단열/구조 재료 카탈로그. 원격 카탈로그를 받지 못할 때 내장 목록을 쓴다.
//! 열전도율은 일반적인 설계값 근사치이며 제품 인증값으로 검증해야 한다.
use serde::{Deserialize, Serialize};

use super::wire;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMaterial {
    #[serde(alias = "uuid")]
    pub id: String,
    pub name: String,
    /// λ [W/m·K]
    #[serde(deserialize_with = "wire::number")]
    pub thermal_conductivity: f64,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug)]
struct BuiltinMaterial {
    code: &'static str,
    name: &'static str,
    category: &'static str,
    lambda: f64,
}

const fn bm(code: &'static str, name: &'static str, category: &'static str, lambda: f64) -> BuiltinMaterial {
    BuiltinMaterial {
        code,
        name,
        category,
        lambda,
    }
}

const MATERIALS: &[BuiltinMaterial] = &[
    bm("eps", "Expanded polystyrene (EPS)", "insulation", 0.035),
    bm("xps", "Extruded polystyrene (XPS)", "insulation", 0.034),
    bm("mineral_wool", "Mineral wool", "insulation", 0.040),
    bm("glass_wool", "Glass wool", "insulation", 0.038),
    bm("pir", "Polyisocyanurate board (PIR)", "insulation", 0.023),
    bm("wood_fibre", "Wood fibre board", "insulation", 0.045),
    bm("brick", "Solid clay brick", "masonry", 0.77),
    bm("hollow_brick", "Hollow clay brick", "masonry", 0.45),
    bm("concrete", "Reinforced concrete", "structure", 2.30),
    bm("aerated_concrete", "Aerated concrete block", "masonry", 0.16),
    bm("cement_plaster", "Cement plaster", "finish", 0.87),
    bm("gypsum_board", "Gypsum plasterboard", "finish", 0.25),
    bm("roof_tile", "Clay roof tile", "roofing", 1.00),
    bm("bitumen_membrane", "Bitumen membrane", "roofing", 0.23),
];

/// 내장 카탈로그를 반환한다.
pub fn builtin_catalog() -> Vec<CatalogMaterial> {
    MATERIALS
        .iter()
        .map(|m| CatalogMaterial {
            id: m.code.to_string(),
            name: m.name.to_string(),
            thermal_conductivity: m.lambda,
            category: m.category.to_string(),
        })
        .collect()
}

/// 식별자 또는 이름(대소문자 무시)으로 재료를 찾는다.
pub fn find_material<'a>(catalog: &'a [CatalogMaterial], key: &str) -> Option<&'a CatalogMaterial> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    catalog
        .iter()
        .find(|m| m.id.eq_ignore_ascii_case(key) || m.name.eq_ignore_ascii_case(key))
}
