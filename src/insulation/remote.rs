//! 원격 저장소(REST API) 경계.
//!
//! 저장소는 단열 기록을 보관하고 파생값을 서버에서 다시 계산한다.
//! 구현체는 `http::HttpRemoteStore`(실서버)와 `memory::MemoryStore`(테스트/오프라인)가 있다.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::assembly::{AssemblyKind, MaterialLayer};
use super::catalog::CatalogMaterial;
use super::record::{InsulationRecord, RecordDraft};
use super::validation::{FieldErrors, FIELD_GENERAL};

/// 서버가 돌려준 구조화된 거부 응답.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejection {
    /// `detail` 또는 `error` 필드의 일반 메시지
    pub detail: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl Rejection {
    /// JSON 본문을 해석한다. 객체가 아니거나 내용이 없으면 `None`.
    ///
    /// 필드 값은 문자열 또는 문자열 배열(Django REST 형식)을 허용한다.
    pub fn from_json(body: &Value) -> Option<Self> {
        let obj = body.as_object()?;
        let mut rejection = Rejection::default();
        for (key, value) in obj {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
                _ => continue,
            };
            if text.is_empty() {
                continue;
            }
            if key == "detail" || key == "error" || key == "non_field_errors" {
                rejection.detail.get_or_insert(text);
            } else {
                rejection.fields.insert(key.clone(), text);
            }
        }
        if rejection.detail.is_none() && rejection.fields.is_empty() {
            None
        } else {
            Some(rejection)
        }
    }

    /// 검증 오류와 같은 형태로 바꾼다. 일반 메시지는 `detail` 키에 둔다.
    pub fn to_field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(detail) = &self.detail {
            errors.insert(FIELD_GENERAL, detail.clone());
        }
        for (field, message) in &self.fields {
            errors.insert(field, message.clone());
        }
        errors
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{detail}"),
            None => write!(f, "{}", self.to_field_errors()),
        }
    }
}

/// 원격 호출 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    /// 네트워크 실패 또는 구조화되지 않은 HTTP 오류
    #[error("transport error: {0}")]
    Transport(String),
    /// 서버가 구조화된 오류 본문으로 요청을 거부함
    #[error("rejected by server (HTTP {status}): {rejection}")]
    Rejected { status: u16, rejection: Rejection },
    /// 응답 본문을 해석할 수 없음
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn is_transport(&self) -> bool {
        matches!(self, RemoteError::Transport(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            RemoteError::Rejected { rejection, .. } => Some(rejection),
            _ => None,
        }
    }
}

/// 재료층 추가 응답. 서버에 따라 기록 전체 또는 추가된 층만 돌려준다.
///
/// 기록은 `uuid`/`building`이 있어야 하므로 층 본문이 기록으로 읽히지 않는다.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MaterialResponse {
    Record(InsulationRecord),
    Layer(MaterialLayer),
}

/// 단열 기록 REST API 계약.
///
/// 모든 호출은 요청/응답 한 쌍이며 동시성 제어는 하지 않는다.
pub trait RemoteStore {
    /// `GET /{kind}_insulations/building/{building}/`
    fn fetch_by_building(
        &self,
        kind: AssemblyKind,
        building_uuid: &str,
    ) -> Result<Vec<InsulationRecord>, RemoteError>;

    /// `POST /{kind}_insulations/create/`
    fn create(&self, kind: AssemblyKind, draft: &RecordDraft) -> Result<InsulationRecord, RemoteError>;

    /// `PUT /{kind}_insulations/{uuid}/`
    fn update(&self, kind: AssemblyKind, record: &InsulationRecord) -> Result<InsulationRecord, RemoteError>;

    /// `POST /{kind}_insulations/{uuid}/recalculate/`
    fn recalculate(&self, kind: AssemblyKind, record_uuid: &str) -> Result<InsulationRecord, RemoteError>;

    /// `GET /{kind}_insulations/materials/available/`
    fn available_materials(&self, kind: AssemblyKind) -> Result<Vec<CatalogMaterial>, RemoteError>;

    /// `POST /{kind}_insulations/{uuid}/materials/add/`
    fn add_material(
        &self,
        kind: AssemblyKind,
        record_uuid: &str,
        layer: &MaterialLayer,
    ) -> Result<MaterialResponse, RemoteError>;

    /// `PUT /{kind}_insulations/material-layers/{uuid}/`
    fn update_material(&self, kind: AssemblyKind, layer: &MaterialLayer) -> Result<MaterialLayer, RemoteError>;

    /// `DELETE /{kind}_insulations/material-layers/{uuid}/`
    fn delete_material(&self, kind: AssemblyKind, layer_uuid: &str) -> Result<(), RemoteError>;
}

/// 엔드포인트 경로를 만든다. 선행 슬래시를 포함하고 후행 슬래시로 끝난다.
pub mod paths {
    use super::AssemblyKind;

    fn base(kind: AssemblyKind) -> &'static str {
        kind.profile().endpoint
    }

    pub fn by_building(kind: AssemblyKind, building_uuid: &str) -> String {
        format!("/{}/building/{building_uuid}/", base(kind))
    }

    pub fn create(kind: AssemblyKind) -> String {
        format!("/{}/create/", base(kind))
    }

    pub fn record(kind: AssemblyKind, uuid: &str) -> String {
        format!("/{}/{uuid}/", base(kind))
    }

    pub fn recalculate(kind: AssemblyKind, uuid: &str) -> String {
        format!("/{}/{uuid}/recalculate/", base(kind))
    }

    pub fn available_materials(kind: AssemblyKind) -> String {
        format!("/{}/materials/available/", base(kind))
    }

    pub fn add_material(kind: AssemblyKind, record_uuid: &str) -> String {
        format!("/{}/{record_uuid}/materials/add/", base(kind))
    }

    pub fn material_layer(kind: AssemblyKind, layer_uuid: &str) -> String {
        format!("/{}/material-layers/{layer_uuid}/", base(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_django_style_field_errors() {
        let body = json!({"thickness": ["Ensure this value is greater than 0."], "detail": "Invalid"});
        let r = Rejection::from_json(&body).unwrap();
        assert_eq!(r.detail.as_deref(), Some("Invalid"));
        let errors = r.to_field_errors();
        assert_eq!(errors.get("thickness"), Some("Ensure this value is greater than 0."));
        assert_eq!(errors.get(FIELD_GENERAL), Some("Invalid"));
    }

    #[test]
    fn layer_body_is_not_mistaken_for_record() {
        let body = json!({
            "uuid": "layer-77",
            "material": "eps",
            "thickness": "0.05",
            "thermal_conductivity": "0.035",
            "surface_area": 20,
            "cost": "500.00",
            "material_type": "NEW"
        });
        assert!(serde_json::from_value::<InsulationRecord>(body.clone()).is_err());
        match serde_json::from_value::<MaterialResponse>(body).unwrap() {
            MaterialResponse::Layer(layer) => {
                assert_eq!(layer.uuid, "layer-77");
                assert_eq!(layer.cost, Some(500.0));
            }
            other => panic!("expected layer, got {other:?}"),
        }

        let record = json!({"uuid": "wall-1", "building": "b-1", "new_materials": []});
        assert!(matches!(
            serde_json::from_value::<MaterialResponse>(record).unwrap(),
            MaterialResponse::Record(r) if r.building == "b-1"
        ));
    }

    #[test]
    fn empty_or_non_object_bodies_are_not_rejections() {
        assert!(Rejection::from_json(&json!({})).is_none());
        assert!(Rejection::from_json(&json!("boom")).is_none());
    }

    #[test]
    fn paths_follow_kind_prefix() {
        assert_eq!(
            paths::by_building(AssemblyKind::Roof, "b1"),
            "/roof_insulations/building/b1/"
        );
        assert_eq!(
            paths::material_layer(AssemblyKind::Wall, "l9"),
            "/wall_insulations/material-layers/l9/"
        );
    }
}
