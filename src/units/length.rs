use serde::{Deserialize, Serialize};

/// 두께 입력에 쓰는 길이 단위. 내부 기준은 미터이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Meter,
    Centimeter,
    Millimeter,
    Inch,
}

impl LengthUnit {
    /// 단위 기호를 해석한다. 빈 문자열은 미터로 본다.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim().to_lowercase().as_str() {
            "" | "m" => Some(LengthUnit::Meter),
            "cm" => Some(LengthUnit::Centimeter),
            "mm" => Some(LengthUnit::Millimeter),
            "in" | "\"" | "inch" => Some(LengthUnit::Inch),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Meter => "m",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Millimeter => "mm",
            LengthUnit::Inch => "in",
        }
    }

    fn meters_per_unit(&self) -> f64 {
        match self {
            LengthUnit::Meter => 1.0,
            LengthUnit::Centimeter => 0.01,
            LengthUnit::Millimeter => 0.001,
            LengthUnit::Inch => 0.0254,
        }
    }
}

/// 길이를 다른 단위로 변환한다.
pub fn convert_length(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    value * from.meters_per_unit() / to.meters_per_unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centimeters_to_meters() {
        assert!((convert_length(5.0, LengthUnit::Centimeter, LengthUnit::Meter) - 0.05).abs() < 1e-12);
        assert!((convert_length(1.0, LengthUnit::Inch, LengthUnit::Millimeter) - 25.4).abs() < 1e-9);
    }

    #[test]
    fn parses_symbols() {
        assert_eq!(LengthUnit::from_symbol("MM"), Some(LengthUnit::Millimeter));
        assert_eq!(LengthUnit::from_symbol(""), Some(LengthUnit::Meter));
        assert_eq!(LengthUnit::from_symbol("ft"), None);
    }
}
