use approx::assert_relative_eq;
use insulation_audit_toolbox::i18n::Translator;
use insulation_audit_toolbox::insulation::validation::{
    validate_economics, validate_material, EconomicParams, MaterialForm,
};
use insulation_audit_toolbox::insulation::{builtin_catalog, AssemblyKind, Membership, SurfaceType};

fn form(material: &str, thickness: &str, area: &str, cost: &str, surface: &str, membership: Membership) -> MaterialForm {
    MaterialForm {
        material: material.into(),
        thickness: thickness.into(),
        surface_area: area.into(),
        cost: cost.into(),
        surface_type: surface.into(),
        membership,
    }
}

#[test]
fn roof_layer_with_units_is_normalized_to_si() {
    let tr = Translator::new("en");
    let layer = validate_material(
        &form("mineral_wool", "120mm", "215.28ft2", "1200", "external_horizontal_roof", Membership::New),
        AssemblyKind::Roof,
        &builtin_catalog(),
        &tr,
    )
    .expect("valid");
    assert_relative_eq!(layer.thickness, 0.12, epsilon = 1e-12);
    assert_relative_eq!(layer.surface_area, 20.0, epsilon = 1e-3);
    assert_relative_eq!(layer.thermal_conductivity, 0.040);
    assert_eq!(layer.cost, Some(1200.0));
    assert_eq!(layer.surface_type, Some(SurfaceType::ExternalHorizontalRoof));
}

#[test]
fn old_layer_ignores_cost() {
    let tr = Translator::new("en");
    let layer = validate_material(
        &form("brick", "0.24", "20", "not a number", "internal", Membership::Old),
        AssemblyKind::Wall,
        &builtin_catalog(),
        &tr,
    )
    .expect("cost is not checked for OLD");
    assert_eq!(layer.cost, None);
}

#[test]
fn every_bad_field_is_reported() {
    let tr = Translator::new("en");
    let errors = validate_material(
        &form("unobtainium", "-1", "0", "-5", "", Membership::New),
        AssemblyKind::Wall,
        &builtin_catalog(),
        &tr,
    )
    .unwrap_err();
    for field in ["material", "thickness", "surface_area", "cost", "surface_type"] {
        assert!(errors.contains(field), "missing error for {field}: {errors}");
    }
}

#[test]
fn unknown_unit_is_named_in_message() {
    let tr = Translator::new("en");
    let errors = validate_material(
        &form("eps", "5 furlong", "20", "1", "internal", Membership::New),
        AssemblyKind::Wall,
        &builtin_catalog(),
        &tr,
    )
    .unwrap_err();
    assert!(errors.get("thickness").unwrap().contains("furlong"));
}

#[test]
fn economics_ranges() {
    let tr = Translator::new("en");
    let ok = EconomicParams {
        heating_hours_per_year: 8760.0,
        cooling_hours_per_year: 0.0,
        time_period_years: 50,
        annual_operating_costs: 0.0,
        discount_rate: 100.0,
    };
    assert!(validate_economics(&ok, &tr).is_ok());

    let bad = EconomicParams {
        cooling_hours_per_year: -1.0,
        time_period_years: 51,
        annual_operating_costs: f64::NAN,
        discount_rate: 101.0,
        ..ok
    };
    let errors = validate_economics(&bad, &tr).unwrap_err();
    assert_eq!(errors.len(), 4);
    assert!(!errors.contains("heating_hours_per_year"));
}
