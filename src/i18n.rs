use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const WARNING_PREFIX: &str = "general.warning_prefix";

    pub const VALIDATION_REQUIRED: &str = "validation.required";
    pub const VALIDATION_NOT_A_NUMBER: &str = "validation.not_a_number";
    pub const VALIDATION_MUST_BE_POSITIVE: &str = "validation.must_be_positive";
    pub const VALIDATION_MUST_BE_NON_NEGATIVE: &str = "validation.must_be_non_negative";
    pub const VALIDATION_UNKNOWN_MATERIAL: &str = "validation.unknown_material";
    pub const VALIDATION_INVALID_SURFACE_TYPE: &str = "validation.invalid_surface_type";
    pub const VALIDATION_UNKNOWN_UNIT: &str = "validation.unknown_unit";
    pub const VALIDATION_OUT_OF_RANGE: &str = "validation.out_of_range";

    pub const NOTICE_RECORD_LOADED: &str = "notice.record_loaded";
    pub const NOTICE_RECORD_CREATED: &str = "notice.record_created";
    pub const NOTICE_RECORD_SAVED: &str = "notice.record_saved";
    pub const NOTICE_MATERIAL_ADDED: &str = "notice.material_added";
    pub const NOTICE_MATERIAL_UPDATED: &str = "notice.material_updated";
    pub const NOTICE_MATERIAL_DELETED: &str = "notice.material_deleted";
    pub const NOTICE_RECALCULATE_FAILED: &str = "notice.recalculate_failed";
    pub const NOTICE_REFRESH_FAILED: &str = "notice.refresh_failed";
    pub const NOTICE_CATALOG_FALLBACK: &str = "notice.catalog_fallback";
    pub const NOTICE_LOAD_FAILED: &str = "notice.load_failed";
    pub const NOTICE_REQUEST_FAILED: &str = "notice.request_failed";
    pub const NOTICE_LAYER_NOT_FOUND: &str = "notice.layer_not_found";

    pub const REPORT_HEADING: &str = "report.heading";
    pub const REPORT_KIND: &str = "report.kind";
    pub const REPORT_OLD_LAYERS: &str = "report.old_layers";
    pub const REPORT_NEW_LAYERS: &str = "report.new_layers";
    pub const REPORT_NO_LAYERS: &str = "report.no_layers";
    pub const REPORT_R_TOTAL: &str = "report.r_total";
    pub const REPORT_U_VALUE: &str = "report.u_value";
    pub const REPORT_WINTER_LOSS: &str = "report.winter_loss";
    pub const REPORT_SUMMER_LOSS: &str = "report.summer_loss";
    pub const REPORT_BEFORE: &str = "report.before";
    pub const REPORT_AFTER: &str = "report.after";
    pub const REPORT_SAVINGS: &str = "report.savings";
    pub const REPORT_TOTAL_COST: &str = "report.total_cost";
    pub const REPORT_ANNUAL_BENEFIT: &str = "report.annual_benefit";
    pub const REPORT_NPV: &str = "report.npv";
    pub const REPORT_PAYBACK: &str = "report.payback";
    pub const REPORT_NO_PAYBACK: &str = "report.no_payback";
    pub const REPORT_RECORD: &str = "report.record";
    pub const CATALOG_HEADING: &str = "catalog.heading";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: pack_dir.and_then(|dir| load_overrides(dir, lang_code)),
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 한국어 번역이 없으면 영어 문자열, 그것도 없으면 키 자체를 쓴다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v.clone();
        }
        let text = match self.lang {
            Language::Ko => ko(key).or_else(|| en(key)),
            Language::En => en(key),
        };
        text.map(str::to_string).unwrap_or_else(|| key.to_string())
    }

    /// `{name}` 자리표시자를 채운 번역을 가져온다.
    pub fn fmt(&self, key: &str, vars: &[(&str, String)]) -> String {
        let mut out = self.t(key);
        for (name, value) in vars {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_lang) {
        return Some(lang);
    }
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_lang(v.split(['.', '_']).next().unwrap_or_default()))
}

/// TOML 언어팩을 로드한다. 중첩 테이블은 `a.b` 형태의 키로 펼친다.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };
    try_load(lang).or_else(|| {
        let (base, _) = lang.split_once(['-', '_'])?;
        try_load(base)
    })
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    let value: toml::Value = toml::from_str(src).ok()?;
    let mut map = HashMap::new();
    walk("", &value, &mut map);
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        WARNING_PREFIX => "주의",
        VALIDATION_REQUIRED => "필수 입력 항목입니다.",
        VALIDATION_NOT_A_NUMBER => "숫자를 입력하세요.",
        VALIDATION_MUST_BE_POSITIVE => "0보다 커야 합니다.",
        VALIDATION_MUST_BE_NON_NEGATIVE => "0 이상이어야 합니다.",
        VALIDATION_UNKNOWN_MATERIAL => "카탈로그에 없는 재료입니다.",
        VALIDATION_INVALID_SURFACE_TYPE => "이 구조체에 허용되지 않는 표면 유형입니다. 허용: {allowed}",
        VALIDATION_UNKNOWN_UNIT => "알 수 없는 단위: {unit}",
        VALIDATION_OUT_OF_RANGE => "{min} ~ {max} 범위여야 합니다.",
        NOTICE_RECORD_LOADED => "단열 기록을 불러왔습니다.",
        NOTICE_RECORD_CREATED => "단열 기록이 없어 새로 생성했습니다.",
        NOTICE_RECORD_SAVED => "저장되었습니다.",
        NOTICE_MATERIAL_ADDED => "재료층을 추가했습니다.",
        NOTICE_MATERIAL_UPDATED => "재료층을 수정했습니다.",
        NOTICE_MATERIAL_DELETED => "재료층을 삭제했습니다.",
        NOTICE_RECALCULATE_FAILED => "재계산에 실패했습니다. 저장된 값은 유지됩니다.",
        NOTICE_REFRESH_FAILED => "최신 기록을 다시 불러오지 못했습니다.",
        NOTICE_CATALOG_FALLBACK => "재료 목록을 불러오지 못해 내장 목록을 사용합니다.",
        NOTICE_LOAD_FAILED => "단열 기록을 불러오거나 생성하지 못했습니다.",
        NOTICE_REQUEST_FAILED => "요청이 실패했습니다: {reason}",
        NOTICE_LAYER_NOT_FOUND => "재료층을 찾을 수 없습니다: {uuid}",
        REPORT_HEADING => "=== 단열 개선 계산 결과 ===",
        REPORT_KIND => "구조체",
        REPORT_OLD_LAYERS => "기존 구성(OLD)",
        REPORT_NEW_LAYERS => "개선 구성(NEW)",
        REPORT_NO_LAYERS => "(재료층 없음)",
        REPORT_R_TOTAL => "총 열저항 R",
        REPORT_U_VALUE => "열관류율 U",
        REPORT_WINTER_LOSS => "겨울 시간당 열손실",
        REPORT_SUMMER_LOSS => "여름 시간당 열손실",
        REPORT_BEFORE => "개선 전",
        REPORT_AFTER => "개선 후",
        REPORT_SAVINGS => "연간 절감 에너지",
        REPORT_TOTAL_COST => "총 시공비",
        REPORT_ANNUAL_BENEFIT => "연간 편익",
        REPORT_NPV => "순현재가치(NPV)",
        REPORT_PAYBACK => "단순 회수기간",
        REPORT_NO_PAYBACK => "회수 불가",
        REPORT_RECORD => "단열 기록",
        CATALOG_HEADING => "=== 재료 카탈로그 ===",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        WARNING_PREFIX => "Warning",
        VALIDATION_REQUIRED => "This field is required.",
        VALIDATION_NOT_A_NUMBER => "Enter a number.",
        VALIDATION_MUST_BE_POSITIVE => "Must be greater than zero.",
        VALIDATION_MUST_BE_NON_NEGATIVE => "Must be zero or greater.",
        VALIDATION_UNKNOWN_MATERIAL => "Material is not in the catalog.",
        VALIDATION_INVALID_SURFACE_TYPE => "Surface type not allowed for this assembly. Allowed: {allowed}",
        VALIDATION_UNKNOWN_UNIT => "Unknown unit: {unit}",
        VALIDATION_OUT_OF_RANGE => "Must be between {min} and {max}.",
        NOTICE_RECORD_LOADED => "Insulation record loaded.",
        NOTICE_RECORD_CREATED => "No insulation record found; a new one was created.",
        NOTICE_RECORD_SAVED => "Saved.",
        NOTICE_MATERIAL_ADDED => "Material layer added.",
        NOTICE_MATERIAL_UPDATED => "Material layer updated.",
        NOTICE_MATERIAL_DELETED => "Material layer deleted.",
        NOTICE_RECALCULATE_FAILED => "Recalculation failed; saved values are kept.",
        NOTICE_REFRESH_FAILED => "Could not reload the latest record.",
        NOTICE_CATALOG_FALLBACK => "Could not load the material catalog; using the built-in list.",
        NOTICE_LOAD_FAILED => "Could not load or create the insulation record.",
        NOTICE_REQUEST_FAILED => "Request failed: {reason}",
        NOTICE_LAYER_NOT_FOUND => "Material layer not found: {uuid}",
        REPORT_HEADING => "=== Insulation retrofit results ===",
        REPORT_KIND => "Assembly",
        REPORT_OLD_LAYERS => "Existing layers (OLD)",
        REPORT_NEW_LAYERS => "Proposed layers (NEW)",
        REPORT_NO_LAYERS => "(no layers)",
        REPORT_R_TOTAL => "Total resistance R",
        REPORT_U_VALUE => "U-coefficient",
        REPORT_WINTER_LOSS => "Winter hourly losses",
        REPORT_SUMMER_LOSS => "Summer hourly losses",
        REPORT_BEFORE => "Before",
        REPORT_AFTER => "After",
        REPORT_SAVINGS => "Annual energy savings",
        REPORT_TOTAL_COST => "Total cost",
        REPORT_ANNUAL_BENEFIT => "Annual benefit",
        REPORT_NPV => "Net present value",
        REPORT_PAYBACK => "Simple payback",
        REPORT_NO_PAYBACK => "no payback",
        REPORT_RECORD => "Insulation record",
        CATALOG_HEADING => "=== Material catalog ===",
        _ => return None,
    })
}
