use super::record::InsulationRecord;

/// 단열 개선 경제성 입력.
#[derive(Debug, Clone)]
pub struct RetrofitEconomicsInput {
    /// 초기 투자비(NEW 층 비용 합) [€]
    pub total_cost: f64,
    /// 연간 편익 [€/년]
    pub annual_benefit: f64,
    /// 연간 운전/유지비 [€/년]
    pub annual_operating_costs: f64,
    /// 할인율 [%]
    pub discount_rate_percent: f64,
    /// 분석 기간 [년]
    pub years: u32,
}

/// 경제성 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrofitEconomicsResult {
    /// 순현재가치(NPV) [€]
    pub npv: f64,
    /// 단순 회수기간 [년]. 연간 순편익이 0 이하이면 무한대.
    pub payback_years: f64,
}

impl From<&InsulationRecord> for RetrofitEconomicsInput {
    fn from(record: &InsulationRecord) -> Self {
        Self {
            total_cost: record.total_cost,
            annual_benefit: record.annual_benefit,
            annual_operating_costs: record.annual_operating_costs,
            discount_rate_percent: record.discount_rate,
            years: record.time_period_years,
        }
    }
}

/// 기말 할인 기준 NPV = -투자비 + Σ(편익 - 운전비)/(1+r)^t, t=1..T.
pub fn net_present_value(input: &RetrofitEconomicsInput) -> f64 {
    let rate = input.discount_rate_percent / 100.0;
    let net = input.annual_benefit - input.annual_operating_costs;
    let mut npv = -input.total_cost;
    for year in 1..=input.years {
        let df = (1.0 + rate).powf(f64::from(year));
        if df > 0.0 {
            npv += net / df;
        }
    }
    npv
}

/// 단순 회수기간 = 투자비 / 연간 순편익.
pub fn simple_payback_years(input: &RetrofitEconomicsInput) -> f64 {
    let net = input.annual_benefit - input.annual_operating_costs;
    if net > 0.0 {
        input.total_cost / net
    } else {
        f64::INFINITY
    }
}

/// NPV와 회수기간을 함께 계산한다.
pub fn retrofit_economics(input: &RetrofitEconomicsInput) -> RetrofitEconomicsResult {
    RetrofitEconomicsResult {
        npv: net_present_value(input),
        payback_years: simple_payback_years(input),
    }
}

/// 레코드 값으로 NPV를 계산한다. 서버 값이 우선이며 로컬 미리보기 용도이다.
pub fn record_net_present_value(record: &InsulationRecord) -> f64 {
    net_present_value(&RetrofitEconomicsInput::from(record))
}
