use std::time::Duration;

use approx::assert_relative_eq;
use insulation_audit_toolbox::i18n::Translator;
use insulation_audit_toolbox::insulation::controller::{
    ControllerError, InsulationController, LoadState, Notice, RetryPolicy,
};
use insulation_audit_toolbox::insulation::memory::MemoryStore;
use insulation_audit_toolbox::insulation::record::{InsulationRecord, RecordDraft};
use insulation_audit_toolbox::insulation::remote::Rejection;
use insulation_audit_toolbox::insulation::validation::{EconomicParams, MaterialForm};
use insulation_audit_toolbox::insulation::{AssemblyKind, Membership, RemoteError};

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::ZERO,
    }
}

fn controller(kind: AssemblyKind) -> InsulationController<MemoryStore> {
    InsulationController::new(MemoryStore::new(), kind, Translator::new("en"), fast_retry())
}

fn eps_form(cost: &str) -> MaterialForm {
    MaterialForm {
        material: "eps".into(),
        thickness: "5cm".into(),
        surface_area: "20".into(),
        cost: cost.into(),
        surface_type: "external_wall_outdoor".into(),
        membership: Membership::New,
    }
}

fn has_warning(notices: &[Notice]) -> bool {
    notices.iter().any(|n| matches!(n, Notice::Warning(_)))
}

#[test]
fn missing_record_is_created_exactly_once() {
    let mut c = controller(AssemblyKind::Wall);
    let record = c.select_building("b-1", Some("p-1")).expect("select");
    assert_eq!(record.building, "b-1");
    assert_eq!(record.project.as_deref(), Some("p-1"));
    assert_eq!(record.time_period_years, 20);
    assert!(matches!(c.state(), LoadState::Ready));

    // 다시 선택하면 기존 기록을 불러온다.
    c.select_building("b-1", Some("p-1")).expect("reselect");
    let calls = c.store().calls();
    assert_eq!(calls.fetch, 2);
    assert_eq!(calls.create, 1);
    assert_eq!(c.store().record_count(AssemblyKind::Wall), 1);
}

#[test]
fn persistent_fetch_failure_falls_back_to_single_create() {
    let store = MemoryStore::new();
    store.fail_next_fetches(u32::MAX);
    let mut c = InsulationController::new(store, AssemblyKind::Roof, Translator::new("en"), fast_retry());
    c.select_building("b-2", None).expect("fallback create");
    let calls = c.store().calls();
    assert_eq!(calls.fetch, 3);
    assert_eq!(calls.create, 1);
    assert!(matches!(c.state(), LoadState::Ready));
}

#[test]
fn transient_fetch_failure_finds_existing_record() {
    let store = MemoryStore::new();
    let mut existing = InsulationRecord::from_draft(&RecordDraft::baseline("b-3", None));
    existing.uuid = "wall-existing".into();
    store.seed(AssemblyKind::Wall, existing);
    store.fail_next_fetches(2);

    let mut c = InsulationController::new(store, AssemblyKind::Wall, Translator::new("en"), fast_retry());
    let record = c.select_building("b-3", None).expect("select");
    assert_eq!(record.uuid, "wall-existing");
    assert_eq!(c.store().calls().fetch, 3);
    assert_eq!(c.store().calls().create, 0);
}

#[test]
fn failed_create_puts_controller_in_error() {
    let store = MemoryStore::new();
    store.fail_creates(true);
    let mut c = InsulationController::new(store, AssemblyKind::Wall, Translator::new("en"), fast_retry());
    let err = c.select_building("b-4", None).unwrap_err();
    assert!(matches!(err, ControllerError::Remote(RemoteError::Transport(_))));
    assert!(matches!(c.state(), LoadState::Error(_)));
    assert!(c.record().is_none());
    assert!(c.take_notices().iter().any(|n| matches!(n, Notice::Error(_))));
}

#[test]
fn operations_before_selection_are_not_ready() {
    let mut c = controller(AssemblyKind::Wall);
    assert!(matches!(c.add_material(&eps_form("500")), Err(ControllerError::NotReady)));
    assert!(matches!(c.delete_material("layer-1"), Err(ControllerError::NotReady)));
    assert_eq!(c.store().calls().add_material, 0);
}

#[test]
fn new_layer_without_cost_is_rejected_locally() {
    let mut c = controller(AssemblyKind::Wall);
    c.select_building("b-5", None).unwrap();
    let err = c.add_material(&eps_form("")).unwrap_err();
    let errors = err.field_errors().expect("field errors");
    assert!(errors.contains("cost"));
    assert_eq!(c.store().calls().add_material, 0);
    assert!(c.record().unwrap().new_materials.is_empty());
}

#[test]
fn roof_rejects_wall_surface_type() {
    let mut c = controller(AssemblyKind::Roof);
    c.select_building("b-6", None).unwrap();
    let err = c.add_material(&eps_form("100")).unwrap_err();
    let errors = err.field_errors().unwrap();
    assert!(errors.contains("surface_type"));
    assert_eq!(errors.len(), 1);
}

#[test]
fn adding_a_layer_updates_derived_values() {
    let mut c = controller(AssemblyKind::Wall);
    c.select_building("b-7", None).unwrap();
    c.add_material(&eps_form("500")).expect("add");

    let record = c.record().unwrap();
    assert_eq!(record.new_materials.len(), 1);
    let layer = &record.new_materials[0];
    assert_relative_eq!(layer.thickness, 0.05);
    assert_relative_eq!(layer.thermal_conductivity, 0.035);
    assert!(layer.uuid.starts_with("layer-"));

    assert_relative_eq!(record.u_coefficient, 1.0 / (0.17 + 0.05 / 0.035), epsilon = 1e-9);
    assert_relative_eq!(record.total_cost, 500.0);
    let calls = c.store().calls();
    assert_eq!(calls.add_material, 1);
    assert_eq!(calls.recalculate, 1);
}

#[test]
fn layer_only_add_response_keeps_record_identity() {
    let store = MemoryStore::new();
    store.reply_with_layers(true);
    let mut c = InsulationController::new(store, AssemblyKind::Wall, Translator::new("en"), fast_retry());
    let uuid = c.select_building("b-15", None).unwrap().uuid.clone();

    c.add_material(&eps_form("500")).expect("add");
    let record = c.record().unwrap();
    assert_eq!(record.uuid, uuid);
    assert_eq!(record.building, "b-15");
    assert_eq!(record.new_materials.len(), 1);
    assert!(record.new_materials[0].uuid.starts_with("layer-"));
    assert_relative_eq!(record.total_cost, 500.0);

    // 재조회와 재계산은 층이 아니라 기록 기준으로 이루어진다.
    let calls = c.store().calls();
    assert_eq!(calls.fetch, 2);
    assert_eq!(calls.recalculate, 1);
    assert!(!has_warning(&c.take_notices()));
}

#[test]
fn recalculation_failure_is_not_fatal() {
    let store = MemoryStore::new();
    store.fail_recalculate(true);
    let mut c = InsulationController::new(store, AssemblyKind::Wall, Translator::new("en"), fast_retry());
    c.select_building("b-8", None).unwrap();
    c.take_notices();

    c.add_material(&eps_form("500")).expect("add still succeeds");
    let notices = c.take_notices();
    assert!(has_warning(&notices));
    assert!(notices.iter().any(|n| matches!(n, Notice::Success(_))));
    assert!(matches!(c.state(), LoadState::Ready));

    // 로컬 계산값이 반영되어 있어야 한다.
    let record = c.record().unwrap();
    assert_relative_eq!(record.total_cost, 500.0);
    assert!(record.u_coefficient < 1.0);
}

#[test]
fn edit_can_move_a_layer_to_old() {
    let mut c = controller(AssemblyKind::Wall);
    c.select_building("b-9", None).unwrap();
    c.add_material(&eps_form("500")).unwrap();
    let uuid = c.record().unwrap().new_materials[0].uuid.clone();

    let form = MaterialForm {
        thickness: "100mm".into(),
        membership: Membership::Old,
        ..eps_form("500")
    };
    c.edit_material(&uuid, &form).expect("edit");

    let record = c.record().unwrap();
    assert!(record.new_materials.is_empty());
    assert_eq!(record.old_materials.len(), 1);
    assert_eq!(record.old_materials[0].uuid, uuid);
    assert_eq!(record.old_materials[0].cost, None);
    assert_relative_eq!(record.old_materials[0].thickness, 0.1);
    assert_relative_eq!(record.total_cost, 0.0);
}

#[test]
fn edit_of_unknown_layer_fails_without_remote_call() {
    let mut c = controller(AssemblyKind::Wall);
    c.select_building("b-10", None).unwrap();
    let err = c.edit_material("missing", &eps_form("1")).unwrap_err();
    assert!(matches!(err, ControllerError::LayerNotFound(_)));
    assert_eq!(c.store().calls().update_material, 0);
}

#[test]
fn delete_removes_layer_and_recalculates() {
    let mut c = controller(AssemblyKind::Wall);
    c.select_building("b-11", None).unwrap();
    c.add_material(&eps_form("500")).unwrap();
    let uuid = c.record().unwrap().new_materials[0].uuid.clone();

    c.delete_material(&uuid).expect("delete");
    let record = c.record().unwrap();
    assert!(record.new_materials.is_empty());
    assert_relative_eq!(record.u_coefficient, 1.0 / 0.17, epsilon = 1e-9);
    assert_eq!(c.store().calls().delete_material, 1);
    assert_eq!(c.store().calls().recalculate, 2);
}

#[test]
fn delete_of_unknown_layer_surfaces_rejection() {
    let mut c = controller(AssemblyKind::Wall);
    c.select_building("b-12", None).unwrap();
    let err = c.delete_material("nope").unwrap_err();
    let errors = err.field_errors().expect("rejection maps to field errors");
    assert!(errors.contains("detail"));
}

#[test]
fn save_validates_economic_inputs() {
    let mut c = controller(AssemblyKind::Wall);
    c.select_building("b-13", None).unwrap();
    let bad = EconomicParams {
        heating_hours_per_year: 9000.0,
        cooling_hours_per_year: 100.0,
        time_period_years: 0,
        annual_operating_costs: 0.0,
        discount_rate: 5.0,
    };
    let errors = c.save(&bad).unwrap_err().field_errors().unwrap();
    assert!(errors.contains("heating_hours_per_year"));
    assert!(errors.contains("time_period_years"));
    assert_eq!(c.store().calls().update, 0);
}

#[test]
fn save_persists_inputs_and_refreshes_npv() {
    let mut c = controller(AssemblyKind::Wall);
    c.select_building("b-14", None).unwrap();
    c.add_material(&eps_form("500")).unwrap();
    let params = EconomicParams {
        heating_hours_per_year: 2000.0,
        cooling_hours_per_year: 800.0,
        time_period_years: 10,
        annual_operating_costs: 0.0,
        discount_rate: 5.0,
    };
    c.save(&params).expect("save");

    let record = c.record().unwrap();
    assert_relative_eq!(record.heating_hours_per_year, 2000.0);
    assert_eq!(record.time_period_years, 10);
    assert!(record.annual_benefit > 0.0);
    assert!(record.net_present_value > -500.0);
    assert_eq!(c.store().calls().update, 1);
}

#[test]
fn catalog_falls_back_to_builtin_list() {
    let store = MemoryStore::new();
    store.fail_catalog(true);
    let mut c = InsulationController::new(store, AssemblyKind::Wall, Translator::new("en"), fast_retry());
    assert!(!c.load_catalog().is_empty());
    assert!(has_warning(&c.take_notices()));
}

#[test]
fn rejection_body_maps_to_field_errors() {
    let body = serde_json::json!({
        "thickness": ["Ensure this value is greater than 0."],
        "non_field_errors": ["Record is locked."],
    });
    let rejection = Rejection::from_json(&body).expect("structured");
    let errors = rejection.to_field_errors();
    assert_eq!(errors.get("thickness"), Some("Ensure this value is greater than 0."));
    assert_eq!(errors.get("detail"), Some("Record is locked."));

    assert!(Rejection::from_json(&serde_json::json!("oops")).is_none());
}
