//! 건물별 단열 기록 조회/생성과 재료층 변경 후 재계산 흐름.
//!
//! 상태: `Uninitialized → Loading → Ready | Error`.
//! 모든 원격 응답은 요청 순번으로 걸러서 늦게 도착한 옛 응답이 최신 상태를 덮지 않게 한다.

use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::assembly::{AssemblyKind, MaterialLayer, Membership};
use super::catalog::{builtin_catalog, CatalogMaterial};
use super::record::{InsulationRecord, RecordDraft};
use super::remote::{MaterialResponse, RemoteError, RemoteStore};
use super::validation::{validate_economics, validate_material, EconomicParams, FieldErrors, MaterialForm};
use crate::i18n::{keys, Translator};

/// 조회 실패 시 재시도 정책. 대기 시간은 `base_delay * 2^(n-1)`로 늘어난다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// 재시도 없이 한 번만 시도한다.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// `attempt`번째 실패 뒤 기다릴 시간.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << shift)
    }
}

/// 요청 순번 발급기.
///
/// 발급된 최신 순번보다 앞선 응답은 버린다.
#[derive(Debug, Default, Clone)]
pub struct SequenceGuard {
    issued: u64,
    applied: u64,
}

impl SequenceGuard {
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// 응답을 반영해도 되면 true를 돌려주고 반영 순번을 갱신한다.
    pub fn accept(&mut self, token: u64) -> bool {
        if token < self.issued || token <= self.applied {
            return false;
        }
        self.applied = token;
        true
    }

    pub fn latest_issued(&self) -> u64 {
        self.issued
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Uninitialized,
    Loading,
    Ready,
    Error(String),
}

/// 화면에 띄울 배너 메시지.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("no insulation record is loaded")]
    NotReady,
    #[error("invalid input: {0}")]
    Validation(FieldErrors),
    #[error("material layer not found: {0}")]
    LayerNotFound(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl ControllerError {
    /// 입력 오류 또는 서버 거부를 같은 필드 오류 형태로 돌려준다.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            ControllerError::Validation(errors) => Some(errors.clone()),
            ControllerError::Remote(e) => e.rejection().map(|r| r.to_field_errors()),
            _ => None,
        }
    }
}

/// 한 건물·한 구조체 종류의 단열 기록을 관리한다.
pub struct InsulationController<S: RemoteStore> {
    store: S,
    kind: AssemblyKind,
    tr: Translator,
    retry: RetryPolicy,
    state: LoadState,
    record: Option<InsulationRecord>,
    catalog: Vec<CatalogMaterial>,
    sequence: SequenceGuard,
    notices: Vec<Notice>,
}

/// 서버가 돌려준 층에 요청한 소속을 유지한다. 서버가 `material_type`을 빠뜨려도
/// OLD로 옮겨가지 않게 한다.
fn settle_layer(mut saved: MaterialLayer, requested: &MaterialLayer) -> MaterialLayer {
    saved.membership = requested.membership;
    if saved.uuid.is_empty() {
        saved.uuid = requested.uuid.clone();
    }
    if saved.membership == Membership::Old {
        saved.cost = None;
    }
    saved
}

impl<S: RemoteStore> InsulationController<S> {
    pub fn new(store: S, kind: AssemblyKind, tr: Translator, retry: RetryPolicy) -> Self {
        Self {
            store,
            kind,
            tr,
            retry,
            state: LoadState::Uninitialized,
            record: None,
            catalog: Vec::new(),
            sequence: SequenceGuard::default(),
            notices: Vec::new(),
        }
    }

    pub fn kind(&self) -> AssemblyKind {
        self.kind
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn record(&self) -> Option<&InsulationRecord> {
        self.record.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &[CatalogMaterial] {
        &self.catalog
    }

    /// 쌓인 배너 메시지를 꺼낸다.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify_remote_failure(&mut self, err: &RemoteError) {
        let reason = err.to_string();
        self.notices
            .push(Notice::Error(self.tr.fmt(keys::NOTICE_REQUEST_FAILED, &[("reason", reason)])));
    }

    /// 순번 검사를 통과한 응답만 현재 기록으로 채택한다.
    fn adopt(&mut self, token: u64, record: InsulationRecord) -> bool {
        if !self.sequence.accept(token) {
            debug!(token, latest = self.sequence.latest_issued(), "discarding stale response");
            return false;
        }
        self.record = Some(record.normalize());
        true
    }

    fn ready_uuid(&self) -> Result<String, ControllerError> {
        match (&self.state, &self.record) {
            (LoadState::Ready, Some(r)) => Ok(r.uuid.clone()),
            _ => Err(ControllerError::NotReady),
        }
    }

    /// 재료 카탈로그를 불러온다. 실패하면 내장 목록으로 대체한다.
    pub fn load_catalog(&mut self) -> &[CatalogMaterial] {
        match self.store.available_materials(self.kind) {
            Ok(list) if !list.is_empty() => self.catalog = list,
            Ok(_) => self.catalog = builtin_catalog(),
            Err(e) => {
                warn!(error = %e, "material catalog unavailable; using built-in list");
                self.notices
                    .push(Notice::Warning(self.tr.t(keys::NOTICE_CATALOG_FALLBACK)));
                self.catalog = builtin_catalog();
            }
        }
        &self.catalog
    }

    fn fetch_with_retry(&mut self, building_uuid: &str) -> Result<Vec<InsulationRecord>, RemoteError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.store.fetch_by_building(self.kind, building_uuid) {
                Ok(list) => return Ok(list),
                Err(e) if e.is_transport() && attempt < attempts => {
                    let delay = self.retry.delay_after(attempt);
                    warn!(attempt, error = %e, ?delay, "fetch failed; retrying");
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// 건물을 선택하고 기록을 불러온다. 없으면 기본값으로 한 번만 생성한다.
    ///
    /// 조회가 전송 오류로 끝까지 실패하면 "없음"과 같이 취급해 생성을 시도한다.
    /// 이 경우 네트워크가 불안정하면 중복 기록이 생길 수 있어 경고를 남긴다.
    pub fn select_building(
        &mut self,
        building_uuid: &str,
        project_uuid: Option<&str>,
    ) -> Result<&InsulationRecord, ControllerError> {
        self.state = LoadState::Loading;
        self.record = None;
        let token = self.sequence.issue();

        let existing = match self.fetch_with_retry(building_uuid) {
            Ok(list) => list.into_iter().next(),
            Err(e) if e.is_transport() => {
                warn!(
                    building = building_uuid,
                    error = %e,
                    "fetch kept failing; falling back to record creation"
                );
                None
            }
            Err(e) => {
                self.state = LoadState::Error(e.to_string());
                self.notify_remote_failure(&e);
                return Err(e.into());
            }
        };

        let (record, notice_key) = match existing {
            Some(record) => (record, keys::NOTICE_RECORD_LOADED),
            None => {
                let draft = RecordDraft::baseline(building_uuid, project_uuid);
                match self.store.create(self.kind, &draft) {
                    Ok(record) => {
                        info!(building = building_uuid, uuid = %record.uuid, "created insulation record");
                        (record, keys::NOTICE_RECORD_CREATED)
                    }
                    Err(e) => {
                        self.state = LoadState::Error(e.to_string());
                        self.notices.push(Notice::Error(self.tr.t(keys::NOTICE_LOAD_FAILED)));
                        return Err(e.into());
                    }
                }
            }
        };

        self.adopt(token, record);
        self.state = LoadState::Ready;
        self.notices.push(Notice::Success(self.tr.t(notice_key)));
        self.record.as_ref().ok_or(ControllerError::NotReady)
    }

    /// 서버에서 기록 전체를 다시 불러온다. 실패해도 현재 값은 유지한다.
    fn refresh(&mut self, building_uuid: &str) {
        let token = self.sequence.issue();
        match self.store.fetch_by_building(self.kind, building_uuid) {
            Ok(list) => {
                if let Some(record) = list.into_iter().next() {
                    self.adopt(token, record);
                }
            }
            Err(e) => {
                warn!(error = %e, "refresh after change failed");
                self.notices
                    .push(Notice::Warning(self.tr.t(keys::NOTICE_REFRESH_FAILED)));
            }
        }
    }

    /// 서버 재계산을 요청한다. 실패해도 저장 결과는 그대로 보여준다.
    pub fn recalculate(&mut self) -> Result<(), ControllerError> {
        let uuid = self.ready_uuid()?;
        let token = self.sequence.issue();
        match self.store.recalculate(self.kind, &uuid) {
            Ok(record) => {
                self.adopt(token, record);
            }
            Err(e) => {
                warn!(error = %e, "recalculation failed; keeping saved values");
                self.notices
                    .push(Notice::Warning(self.tr.t(keys::NOTICE_RECALCULATE_FAILED)));
            }
        }
        Ok(())
    }

    /// 변경 직후 로컬 계산값을 즉시 반영하고, 서버 기록 재조회 후 재계산한다.
    fn reconcile_after_change(&mut self) {
        let kind = self.kind;
        let building = match self.record.as_mut() {
            Some(record) => {
                record.apply_local_metrics(kind);
                record.building.clone()
            }
            None => return,
        };
        self.refresh(&building);
        // 재조회한 기록의 파생값이 아직 갱신 전일 수 있어 한 번 더 맞춘다.
        if let Some(record) = self.record.as_mut() {
            record.apply_local_metrics(kind);
        }
        // ready 상태는 유지되므로 실패는 배너로만 남는다.
        let _ = self.recalculate();
    }

    fn validated(&self, form: &MaterialForm) -> Result<MaterialLayer, ControllerError> {
        let result = if self.catalog.is_empty() {
            validate_material(form, self.kind, &builtin_catalog(), &self.tr)
        } else {
            validate_material(form, self.kind, &self.catalog, &self.tr)
        };
        result.map_err(ControllerError::Validation)
    }

    /// 재료층을 추가한다. 검증에 실패하면 원격 호출 없이 필드 오류를 돌려준다.
    pub fn add_material(&mut self, form: &MaterialForm) -> Result<(), ControllerError> {
        let uuid = self.ready_uuid()?;
        let layer = self.validated(form)?;
        let token = self.sequence.issue();
        let response = self
            .store
            .add_material(self.kind, &uuid, &layer)
            .inspect_err(|e| self.notify_remote_failure(e))?;
        // 응답이 층뿐이거나 순번 검사에서 밀려나도 추가한 층은 바로 보이게 한다.
        let pending = match response {
            MaterialResponse::Record(updated) => (!self.adopt(token, updated)).then_some(layer),
            MaterialResponse::Layer(saved) => Some(settle_layer(saved, &layer)),
        };
        if let (Some(added), Some(record)) = (pending, self.record.as_mut()) {
            record.upsert_layer(added);
        }
        self.notices
            .push(Notice::Success(self.tr.t(keys::NOTICE_MATERIAL_ADDED)));
        self.reconcile_after_change();
        Ok(())
    }

    /// 기존 재료층을 수정한다. OLD/NEW 소속도 바꿀 수 있다.
    pub fn edit_material(&mut self, layer_uuid: &str, form: &MaterialForm) -> Result<(), ControllerError> {
        self.ready_uuid()?;
        if self.record.as_ref().and_then(|r| r.find_layer(layer_uuid)).is_none() {
            self.notices.push(Notice::Error(self.tr.fmt(
                keys::NOTICE_LAYER_NOT_FOUND,
                &[("uuid", layer_uuid.to_string())],
            )));
            return Err(ControllerError::LayerNotFound(layer_uuid.to_string()));
        }
        let mut layer = self.validated(form)?;
        layer.uuid = layer_uuid.to_string();
        let saved = self
            .store
            .update_material(self.kind, &layer)
            .inspect_err(|e| self.notify_remote_failure(e))?;
        let saved = settle_layer(saved, &layer);
        if let Some(record) = self.record.as_mut() {
            record.upsert_layer(saved);
        }
        self.notices
            .push(Notice::Success(self.tr.t(keys::NOTICE_MATERIAL_UPDATED)));
        self.reconcile_after_change();
        Ok(())
    }

    /// 재료층을 삭제한다.
    pub fn delete_material(&mut self, layer_uuid: &str) -> Result<(), ControllerError> {
        self.ready_uuid()?;
        self.store
            .delete_material(self.kind, layer_uuid)
            .inspect_err(|e| self.notify_remote_failure(e))?;
        if let Some(record) = self.record.as_mut() {
            record.remove_layer(layer_uuid);
        }
        self.notices
            .push(Notice::Success(self.tr.t(keys::NOTICE_MATERIAL_DELETED)));
        self.reconcile_after_change();
        Ok(())
    }

    /// 경제성 입력을 저장한다. 총비용은 로컬에서 계산해 함께 보낸다.
    pub fn save(&mut self, params: &EconomicParams) -> Result<(), ControllerError> {
        self.ready_uuid()?;
        let params = validate_economics(params, &self.tr).map_err(ControllerError::Validation)?;
        let mut outgoing = self.record.clone().ok_or(ControllerError::NotReady)?;
        outgoing.heating_hours_per_year = params.heating_hours_per_year;
        outgoing.cooling_hours_per_year = params.cooling_hours_per_year;
        outgoing.time_period_years = params.time_period_years;
        outgoing.annual_operating_costs = params.annual_operating_costs;
        outgoing.discount_rate = params.discount_rate;
        outgoing.apply_local_metrics(self.kind);

        let token = self.sequence.issue();
        let saved = self
            .store
            .update(self.kind, &outgoing)
            .inspect_err(|e| self.notify_remote_failure(e))?;
        self.adopt(token, saved);
        self.notices
            .push(Notice::Success(self.tr.t(keys::NOTICE_RECORD_SAVED)));
        self.recalculate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_tokens_are_rejected() {
        let mut guard = SequenceGuard::default();
        let first = guard.issue();
        let second = guard.issue();
        assert!(!guard.accept(first));
        assert!(guard.accept(second));
        assert!(!guard.accept(second));
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
    }
}
