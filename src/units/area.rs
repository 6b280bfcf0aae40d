use serde::{Deserialize, Serialize};

/// 면적 단위. 내부 기준은 제곱미터이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaUnit {
    SquareMeter,
    SquareFoot,
}

const SQUARE_METER_PER_SQUARE_FOOT: f64 = 0.092903;

impl AreaUnit {
    /// 단위 기호를 해석한다. 빈 문자열은 제곱미터로 본다.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim().to_lowercase().as_str() {
            "" | "m2" | "m²" | "sqm" => Some(AreaUnit::SquareMeter),
            "ft2" | "ft²" | "sqft" => Some(AreaUnit::SquareFoot),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AreaUnit::SquareMeter => "m²",
            AreaUnit::SquareFoot => "ft²",
        }
    }
}

/// 면적을 변환한다.
pub fn convert_area(value: f64, from: AreaUnit, to: AreaUnit) -> f64 {
    let m2 = match from {
        AreaUnit::SquareMeter => value,
        AreaUnit::SquareFoot => value * SQUARE_METER_PER_SQUARE_FOOT,
    };
    match to {
        AreaUnit::SquareMeter => m2,
        AreaUnit::SquareFoot => m2 / SQUARE_METER_PER_SQUARE_FOOT,
    }
}
