//! `ureq` 기반 HTTP 원격 저장소 구현.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::assembly::{AssemblyKind, MaterialLayer};
use super::catalog::CatalogMaterial;
use super::record::{InsulationRecord, RecordDraft};
use super::remote::{paths, MaterialResponse, Rejection, RemoteError, RemoteStore};
use crate::session::SessionContext;

/// 목록 응답은 배열 또는 페이지네이션 객체(`results`)로 온다.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Plain(v) => v,
            ListBody::Paged { results } => results,
        }
    }
}

/// REST API 클라이언트.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    agent: ureq::Agent,
    base_url: String,
    session: SessionContext,
}

impl HttpRemoteStore {
    pub fn new(base_url: &str, session: SessionContext, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "remote request");
        let mut req = self
            .agent
            .request(method, &url)
            .set("Accept", "application/json")
            .set("Accept-Language", &self.session.locale);
        if let Some(auth) = self.session.authorization_header() {
            req = req.set("Authorization", &auth);
        }
        req
    }

    fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ureq::Response, RemoteError> {
        let req = self.request(method, path);
        let result = match body {
            Some(b) => req.send_json(b),
            None => req.call(),
        };
        result.map_err(map_ureq_error)
    }

    fn json<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, RemoteError> {
        let response = self.send(method, path, body)?;
        response
            .into_json::<T>()
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Option<serde_json::Value>, RemoteError> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| RemoteError::Decode(e.to_string()))
}

fn map_ureq_error(err: ureq::Error) -> RemoteError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            let rejection = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| Rejection::from_json(&v));
            match rejection {
                Some(rejection) => RemoteError::Rejected { status, rejection },
                // 본문 없는 4xx는 재시도해도 같으므로 거부로 본다. 5xx만 전송 오류.
                None if (400..500).contains(&status) => RemoteError::Rejected {
                    status,
                    rejection: Rejection {
                        detail: Some(format!("HTTP {status}")),
                        fields: Default::default(),
                    },
                },
                None => RemoteError::Transport(format!("HTTP {status}")),
            }
        }
        ureq::Error::Transport(t) => RemoteError::Transport(t.to_string()),
    }
}

impl RemoteStore for HttpRemoteStore {
    fn fetch_by_building(
        &self,
        kind: AssemblyKind,
        building_uuid: &str,
    ) -> Result<Vec<InsulationRecord>, RemoteError> {
        match self.json::<ListBody<InsulationRecord>>("GET", &paths::by_building(kind, building_uuid), None) {
            Ok(list) => Ok(list.into_vec()),
            // 기록이 없는 건물은 404로 응답하는 경우가 있다.
            Err(RemoteError::Rejected { status: 404, .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn create(&self, kind: AssemblyKind, draft: &RecordDraft) -> Result<InsulationRecord, RemoteError> {
        self.json("POST", &paths::create(kind), to_body(draft)?)
    }

    fn update(&self, kind: AssemblyKind, record: &InsulationRecord) -> Result<InsulationRecord, RemoteError> {
        self.json("PUT", &paths::record(kind, &record.uuid), to_body(record)?)
    }

    fn recalculate(&self, kind: AssemblyKind, record_uuid: &str) -> Result<InsulationRecord, RemoteError> {
        self.json("POST", &paths::recalculate(kind, record_uuid), Some(serde_json::json!({})))
    }

    fn available_materials(&self, kind: AssemblyKind) -> Result<Vec<CatalogMaterial>, RemoteError> {
        self.json::<ListBody<CatalogMaterial>>("GET", &paths::available_materials(kind), None)
            .map(ListBody::into_vec)
    }

    fn add_material(
        &self,
        kind: AssemblyKind,
        record_uuid: &str,
        layer: &MaterialLayer,
    ) -> Result<MaterialResponse, RemoteError> {
        self.json(
            "POST",
            &paths::add_material(kind, record_uuid),
            to_body(layer)?,
        )
    }

    fn update_material(&self, kind: AssemblyKind, layer: &MaterialLayer) -> Result<MaterialLayer, RemoteError> {
        self.json("PUT", &paths::material_layer(kind, &layer.uuid), to_body(layer)?)
    }

    fn delete_material(&self, kind: AssemblyKind, layer_uuid: &str) -> Result<(), RemoteError> {
        let response = self.send("DELETE", &paths::material_layer(kind, layer_uuid), None)?;
        if response.status() >= 300 {
            warn!(status = response.status(), "unexpected status on delete");
        }
        Ok(())
    }
}
