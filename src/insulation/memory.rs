//! 메모리 내 원격 저장소. 서버 없이 흐름을 확인하거나 테스트할 때 쓴다.
//!
//! 호출 횟수를 세고, 지정한 호출에 전송 오류를 주입할 수 있다.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::assembly::{AssemblyKind, MaterialLayer, Membership};
use super::catalog::{builtin_catalog, CatalogMaterial};
use super::comparison::RetrofitComparison;
use super::economics::record_net_present_value;
use super::record::{InsulationRecord, RecordDraft};
use super::remote::{MaterialResponse, RemoteError, RemoteStore};

/// 호출 종류별 누적 횟수.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub fetch: u32,
    pub create: u32,
    pub update: u32,
    pub recalculate: u32,
    pub catalog: u32,
    pub add_material: u32,
    pub update_material: u32,
    pub delete_material: u32,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<HashMap<(AssemblyKind, String), InsulationRecord>>,
    next_id: Cell<u64>,
    calls: Cell<CallCounts>,
    /// 남은 fetch 실패 횟수. `u32::MAX`이면 항상 실패한다.
    failing_fetches: Cell<u32>,
    failing_creates: Cell<bool>,
    failing_recalculate: Cell<bool>,
    offline_catalog: Cell<bool>,
    /// 재료층 추가 응답으로 기록 대신 추가된 층만 돌려준다.
    layer_replies: Cell<bool>,
    /// 재계산 시 연간 편익 추정에 쓰는 에너지 단가 [€/kWh]
    energy_price_per_kwh: f64,
}

fn transport_failure(what: &str) -> RemoteError {
    RemoteError::Transport(format!("simulated network failure during {what}"))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_energy_price(0.15)
    }

    pub fn with_energy_price(energy_price_per_kwh: f64) -> Self {
        Self {
            energy_price_per_kwh,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> CallCounts {
        self.calls.get()
    }

    /// 다음 `count`번의 fetch를 전송 오류로 만든다.
    pub fn fail_next_fetches(&self, count: u32) {
        self.failing_fetches.set(count);
    }

    pub fn fail_creates(&self, fail: bool) {
        self.failing_creates.set(fail);
    }

    pub fn fail_recalculate(&self, fail: bool) {
        self.failing_recalculate.set(fail);
    }

    pub fn fail_catalog(&self, fail: bool) {
        self.offline_catalog.set(fail);
    }

    pub fn reply_with_layers(&self, enabled: bool) {
        self.layer_replies.set(enabled);
    }

    /// 기존 기록을 미리 넣어 둔다.
    pub fn seed(&self, kind: AssemblyKind, record: InsulationRecord) {
        self.records
            .borrow_mut()
            .insert((kind, record.uuid.clone()), record);
    }

    pub fn record_count(&self, kind: AssemblyKind) -> usize {
        self.records.borrow().keys().filter(|(k, _)| *k == kind).count()
    }

    fn bump(&self, f: impl FnOnce(&mut CallCounts)) {
        let mut counts = self.calls.get();
        f(&mut counts);
        self.calls.set(counts);
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("{prefix}-{id}")
    }

    fn recompute(&self, kind: AssemblyKind, record: &mut InsulationRecord) {
        record.apply_local_metrics(kind);
        let comparison = RetrofitComparison::between(
            &record.assembly(kind, Membership::Old),
            &record.assembly(kind, Membership::New),
            record.heating_hours_per_year,
            record.cooling_hours_per_year,
        );
        record.annual_benefit = comparison.estimated_annual_benefit(self.energy_price_per_kwh);
        record.net_present_value = record_net_present_value(record);
    }

    fn not_found(what: &str) -> RemoteError {
        RemoteError::Rejected {
            status: 404,
            rejection: super::remote::Rejection {
                detail: Some(format!("{what} not found")),
                fields: Default::default(),
            },
        }
    }

    fn with_record<T>(
        &self,
        kind: AssemblyKind,
        uuid: &str,
        f: impl FnOnce(&mut InsulationRecord) -> T,
    ) -> Result<T, RemoteError> {
        let mut records = self.records.borrow_mut();
        let record = records
            .get_mut(&(kind, uuid.to_string()))
            .ok_or_else(|| Self::not_found("record"))?;
        Ok(f(record))
    }

    fn with_layer_owner<T>(
        &self,
        kind: AssemblyKind,
        layer_uuid: &str,
        f: impl FnOnce(&mut InsulationRecord) -> T,
    ) -> Result<T, RemoteError> {
        let mut records = self.records.borrow_mut();
        let record = records
            .iter_mut()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, r)| r)
            .find(|r| r.find_layer(layer_uuid).is_some())
            .ok_or_else(|| Self::not_found("material layer"))?;
        Ok(f(record))
    }
}

impl RemoteStore for MemoryStore {
    fn fetch_by_building(
        &self,
        kind: AssemblyKind,
        building_uuid: &str,
    ) -> Result<Vec<InsulationRecord>, RemoteError> {
        self.bump(|c| c.fetch += 1);
        let remaining = self.failing_fetches.get();
        if remaining > 0 {
            if remaining != u32::MAX {
                self.failing_fetches.set(remaining - 1);
            }
            return Err(transport_failure("fetch"));
        }
        let mut found: Vec<InsulationRecord> = self
            .records
            .borrow()
            .iter()
            .filter(|((k, _), r)| *k == kind && r.building == building_uuid)
            .map(|(_, r)| r.clone())
            .collect();
        found.sort_by(|a, b| a.uuid.cmp(&b.uuid));
        Ok(found)
    }

    fn create(&self, kind: AssemblyKind, draft: &RecordDraft) -> Result<InsulationRecord, RemoteError> {
        self.bump(|c| c.create += 1);
        if self.failing_creates.get() {
            return Err(transport_failure("create"));
        }
        let mut record = InsulationRecord::from_draft(draft);
        record.uuid = self.fresh_id(kind.as_code());
        self.recompute(kind, &mut record);
        self.seed(kind, record.clone());
        Ok(record)
    }

    fn update(&self, kind: AssemblyKind, record: &InsulationRecord) -> Result<InsulationRecord, RemoteError> {
        self.bump(|c| c.update += 1);
        self.with_record(kind, &record.uuid, |stored| {
            let old = std::mem::take(&mut stored.old_materials);
            let new = std::mem::take(&mut stored.new_materials);
            *stored = record.clone();
            // 재료층은 전용 엔드포인트로만 바뀐다.
            stored.old_materials = old;
            stored.new_materials = new;
            stored.clone()
        })
    }

    fn recalculate(&self, kind: AssemblyKind, record_uuid: &str) -> Result<InsulationRecord, RemoteError> {
        self.bump(|c| c.recalculate += 1);
        if self.failing_recalculate.get() {
            return Err(transport_failure("recalculate"));
        }
        self.with_record(kind, record_uuid, |stored| {
            self.recompute(kind, stored);
            stored.clone()
        })
    }

    fn available_materials(&self, _kind: AssemblyKind) -> Result<Vec<CatalogMaterial>, RemoteError> {
        self.bump(|c| c.catalog += 1);
        if self.offline_catalog.get() {
            return Err(transport_failure("catalog"));
        }
        Ok(builtin_catalog())
    }

    fn add_material(
        &self,
        kind: AssemblyKind,
        record_uuid: &str,
        layer: &MaterialLayer,
    ) -> Result<MaterialResponse, RemoteError> {
        self.bump(|c| c.add_material += 1);
        let mut layer = layer.clone();
        layer.uuid = self.fresh_id("layer");
        let reply_layer = self.layer_replies.get();
        self.with_record(kind, record_uuid, |stored| {
            stored.upsert_layer(layer.clone());
            if reply_layer {
                MaterialResponse::Layer(layer)
            } else {
                MaterialResponse::Record(stored.clone())
            }
        })
    }

    fn update_material(&self, kind: AssemblyKind, layer: &MaterialLayer) -> Result<MaterialLayer, RemoteError> {
        self.bump(|c| c.update_material += 1);
        self.with_layer_owner(kind, &layer.uuid, |stored| {
            stored.upsert_layer(layer.clone());
            layer.clone()
        })
    }

    fn delete_material(&self, kind: AssemblyKind, layer_uuid: &str) -> Result<(), RemoteError> {
        self.bump(|c| c.delete_material += 1);
        self.with_layer_owner(kind, layer_uuid, |stored| {
            stored.remove_layer(layer_uuid);
        })
    }
}
