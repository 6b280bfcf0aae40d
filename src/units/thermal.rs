//! 열전도율(λ)과 열관류율(U) 단위.

use serde::{Deserialize, Serialize};

const BTU_CONDUCTIVITY_FACTOR: f64 = 1.730735;
const BTU_U_VALUE_FACTOR: f64 = 5.678263;

/// 열전도율 단위. 내부 기준은 W/m·K이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConductivityUnit {
    WPerMeterK,
    BtuPerHourFootF,
}

impl ConductivityUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            ConductivityUnit::WPerMeterK => "W/mK",
            ConductivityUnit::BtuPerHourFootF => "Btu/h·ft·°F",
        }
    }
}

/// 열관류율(U) 표시 단위. 내부 기준은 W/m²·K이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UValueUnit {
    WPerSquareMeterK,
    BtuPerHourSquareFootF,
}

impl UValueUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            UValueUnit::WPerSquareMeterK => "W/m²K",
            UValueUnit::BtuPerHourSquareFootF => "Btu/h·ft²·°F",
        }
    }
}

/// 열전도율을 변환한다.
pub fn convert_conductivity(value: f64, from: ConductivityUnit, to: ConductivityUnit) -> f64 {
    let si = match from {
        ConductivityUnit::WPerMeterK => value,
        ConductivityUnit::BtuPerHourFootF => value * BTU_CONDUCTIVITY_FACTOR,
    };
    match to {
        ConductivityUnit::WPerMeterK => si,
        ConductivityUnit::BtuPerHourFootF => si / BTU_CONDUCTIVITY_FACTOR,
    }
}

/// 열관류율을 변환한다.
pub fn convert_u_value(value: f64, from: UValueUnit, to: UValueUnit) -> f64 {
    let si = match from {
        UValueUnit::WPerSquareMeterK => value,
        UValueUnit::BtuPerHourSquareFootF => value * BTU_U_VALUE_FACTOR,
    };
    match to {
        UValueUnit::WPerSquareMeterK => si,
        UValueUnit::BtuPerHourSquareFootF => si / BTU_U_VALUE_FACTOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imperial_u_value_is_smaller_number() {
        let ip = convert_u_value(1.0, UValueUnit::WPerSquareMeterK, UValueUnit::BtuPerHourSquareFootF);
        assert!((ip - 0.176_110).abs() < 1e-5);
        let back = convert_conductivity(
            convert_conductivity(0.035, ConductivityUnit::WPerMeterK, ConductivityUnit::BtuPerHourFootF),
            ConductivityUnit::BtuPerHourFootF,
            ConductivityUnit::WPerMeterK,
        );
        assert!((back - 0.035).abs() < 1e-12);
    }
}
