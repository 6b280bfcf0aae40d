use approx::assert_relative_eq;
use insulation_audit_toolbox::insulation::economics::{
    net_present_value, retrofit_economics, simple_payback_years, RetrofitEconomicsInput,
};
use insulation_audit_toolbox::insulation::comparison::RetrofitComparison;
use insulation_audit_toolbox::insulation::{
    hourly_losses, r_total, summarize, total_cost, u_coefficient, AssemblyKind, MaterialLayer, Membership,
    Season, SurfaceType, ThermalAssembly,
};

fn layer(thickness: f64, lambda: f64, area: f64, cost: Option<f64>, membership: Membership) -> MaterialLayer {
    MaterialLayer {
        uuid: String::new(),
        material: "test".into(),
        material_name: String::new(),
        thickness,
        thermal_conductivity: lambda,
        surface_area: area,
        cost,
        surface_type: Some(SurfaceType::ExternalWallOutdoor),
        membership,
    }
}

#[test]
fn empty_assemblies_use_surface_resistances_only() {
    assert_relative_eq!(r_total(AssemblyKind::Wall, &[]), 0.17, epsilon = 1e-12);
    assert_relative_eq!(r_total(AssemblyKind::Roof, &[]), 0.14, epsilon = 1e-12);

    // 면적 합이 0이면 손실도 0
    let roof = summarize(AssemblyKind::Roof, &[]);
    assert_relative_eq!(roof.u_coefficient, 1.0 / 0.14, epsilon = 1e-9);
    assert_eq!(roof.winter_losses_kw, 0.0);
    assert_eq!(roof.summer_losses_kw, 0.0);
}

#[test]
fn empty_assembly_values() {
    let wall = ThermalAssembly::empty(AssemblyKind::Wall, Membership::Old);
    let roof = ThermalAssembly::empty(AssemblyKind::Roof, Membership::New);
    assert!(wall.is_empty() && roof.is_empty());
    assert_relative_eq!(wall.r_total(), 0.17, epsilon = 1e-12);
    assert_relative_eq!(roof.r_total(), 0.14, epsilon = 1e-12);
    assert_relative_eq!(roof.u_coefficient(), 7.142_857, epsilon = 1e-6);
    assert_eq!(roof.hourly_losses(Season::Winter), 0.0);
    assert_eq!(wall.total_cost(), 0.0);
}

#[test]
fn stacked_assembly_matches_layer_functions() {
    let existing = ThermalAssembly::new(
        AssemblyKind::Wall,
        Membership::Old,
        vec![layer(0.24, 0.77, 20.0, None, Membership::Old)],
    );
    let upgrade = ThermalAssembly::new(
        AssemblyKind::Wall,
        Membership::New,
        vec![layer(0.05, 0.035, 20.0, Some(500.0), Membership::New)],
    );
    let after = existing.stacked_with(&upgrade);
    assert_eq!(after.layers.len(), 2);
    assert_relative_eq!(after.r_total(), 0.17 + 0.24 / 0.77 + 0.05 / 0.035, epsilon = 1e-9);
    assert_relative_eq!(after.summary().surface_area_m2, 40.0);

    let cmp = RetrofitComparison::between(&existing, &upgrade, 1000.0, 0.0);
    assert_relative_eq!(cmp.before.u_coefficient, existing.u_coefficient(), epsilon = 1e-12);
    assert_relative_eq!(cmp.after.u_coefficient, after.u_coefficient(), epsilon = 1e-12);
    assert_relative_eq!(cmp.envelope_area_m2, 20.0);
    let expected_kwh = cmp.u_reduction() * 20.0 * 17.0 / 1000.0 * 1000.0;
    assert_relative_eq!(cmp.annual_savings_kwh, expected_kwh, epsilon = 1e-9);
}

#[test]
fn single_mineral_wool_wall() {
    let layers = vec![layer(0.05, 0.04, 20.0, Some(500.0), Membership::New)];
    let kind = AssemblyKind::Wall;
    assert_relative_eq!(r_total(kind, &layers), 1.42, epsilon = 1e-9);
    assert_relative_eq!(u_coefficient(kind, &layers), 0.704_225, epsilon = 1e-6);
    assert_relative_eq!(hourly_losses(kind, &layers, Season::Winter), 0.239_437, epsilon = 1e-6);
    assert_relative_eq!(hourly_losses(kind, &layers, Season::Summer), 0.183_099, epsilon = 1e-6);
    assert_relative_eq!(total_cost(&layers), 500.0);
}

#[test]
fn u_is_reciprocal_of_r() {
    let layers = vec![
        layer(0.24, 0.77, 20.0, None, Membership::Old),
        layer(0.08, 0.035, 20.0, Some(900.0), Membership::New),
    ];
    for kind in AssemblyKind::ALL {
        let r = r_total(kind, &layers);
        assert_relative_eq!(u_coefficient(kind, &layers) * r, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn thicker_insulation_never_increases_u() {
    let mut previous = f64::INFINITY;
    for mm in [10.0, 20.0, 50.0, 100.0, 200.0] {
        let layers = vec![layer(mm / 1000.0, 0.035, 10.0, Some(1.0), Membership::New)];
        let u = u_coefficient(AssemblyKind::Roof, &layers);
        assert!(u < previous, "u={u} at {mm} mm");
        previous = u;
    }
}

#[test]
fn higher_conductivity_never_increases_r_total() {
    for kind in AssemblyKind::ALL {
        let mut previous = f64::INFINITY;
        for lambda in [0.02, 0.035, 0.04, 0.1, 0.45, 0.77, 1.5, 2.3, 50.0] {
            let layers = vec![
                layer(0.24, 0.77, 20.0, None, Membership::Old),
                layer(0.08, lambda, 20.0, Some(100.0), Membership::New),
            ];
            let r = r_total(kind, &layers);
            assert!(r <= previous, "{kind:?}: r={r} at λ={lambda} rose above {previous}");
            previous = r;
        }
    }
}

#[test]
fn winter_to_summer_ratio_is_degree_factor_ratio() {
    let layers = vec![layer(0.1, 0.04, 55.0, Some(10.0), Membership::New)];
    let winter = hourly_losses(AssemblyKind::Wall, &layers, Season::Winter);
    let summer = hourly_losses(AssemblyKind::Wall, &layers, Season::Summer);
    assert_relative_eq!(winter / summer, 17.0 / 13.0, epsilon = 1e-12);
}

#[test]
fn degenerate_values_fall_back_safely() {
    let bad_lambda = vec![layer(0.1, 0.0, 10.0, None, Membership::Old)];
    assert_relative_eq!(r_total(AssemblyKind::Wall, &bad_lambda), 0.27, epsilon = 1e-12);

    let nan_lambda = vec![layer(0.1, f64::NAN, 10.0, None, Membership::Old)];
    assert!(r_total(AssemblyKind::Wall, &nan_lambda).is_finite());

    let negative = vec![layer(-0.1, 0.04, -5.0, None, Membership::Old)];
    assert_relative_eq!(r_total(AssemblyKind::Wall, &negative), 0.17, epsilon = 1e-12);
    assert_eq!(hourly_losses(AssemblyKind::Wall, &negative, Season::Winter), 0.0);
}

#[test]
fn only_new_layers_are_costed() {
    let layers = vec![
        layer(0.24, 0.77, 20.0, Some(999.0), Membership::Old),
        layer(0.05, 0.035, 20.0, Some(500.0), Membership::New),
        layer(0.02, 0.25, 20.0, None, Membership::New),
    ];
    assert_relative_eq!(total_cost(&layers), 500.0);
}

#[test]
fn npv_and_payback() {
    let input = RetrofitEconomicsInput {
        total_cost: 1000.0,
        annual_benefit: 300.0,
        annual_operating_costs: 50.0,
        discount_rate_percent: 5.0,
        years: 10,
    };
    // 250 × 연금현가계수(5%, 10년) = 250 × 7.721735
    assert_relative_eq!(net_present_value(&input), 930.433_742, epsilon = 1e-4);
    assert_relative_eq!(simple_payback_years(&input), 4.0);

    let zero_rate = RetrofitEconomicsInput {
        discount_rate_percent: 0.0,
        ..input
    };
    assert_relative_eq!(net_present_value(&zero_rate), 1500.0, epsilon = 1e-9);

    // 기간이 길면 영구연금 현가(순편익 / r)로 수렴한다.
    let long_horizon = RetrofitEconomicsInput {
        years: 2000,
        ..input.clone()
    };
    assert_relative_eq!(net_present_value(&long_horizon), -1000.0 + 250.0 / 0.05, epsilon = 1e-6);

    let losing = RetrofitEconomicsInput {
        annual_benefit: 40.0,
        ..input
    };
    let result = retrofit_economics(&losing);
    assert!(result.npv < -1000.0);
    assert!(result.payback_years.is_infinite());
}
