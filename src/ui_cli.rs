use std::fmt::Write as _;

use crate::config::DisplayConfig;
use crate::i18n::{keys, Translator};
use crate::insulation::comparison::RetrofitComparison;
use crate::insulation::controller::Notice;
use crate::insulation::thermal::ThermalSummary;
use crate::insulation::validation::FieldErrors;
use crate::insulation::{AssemblyKind, CatalogMaterial, InsulationRecord, MaterialLayer};
use crate::scenario::ScenarioReport;
use crate::units::{
    convert_conductivity, convert_length, convert_u_value, ConductivityUnit, LengthUnit, UValueUnit,
};

fn u_text(display: &DisplayConfig, u_si: f64) -> String {
    let value = convert_u_value(u_si, UValueUnit::WPerSquareMeterK, display.u_value);
    format!("{value:.3} {}", display.u_value.symbol())
}

fn lambda_text(display: &DisplayConfig, lambda_si: f64) -> String {
    let value = convert_conductivity(lambda_si, ConductivityUnit::WPerMeterK, display.conductivity);
    format!("λ={value:.3} {}", display.conductivity.symbol())
}

fn layer_line(display: &DisplayConfig, layer: &MaterialLayer) -> String {
    let thickness = convert_length(layer.thickness, LengthUnit::Meter, display.thickness);
    let name = if layer.material_name.is_empty() {
        &layer.material
    } else {
        &layer.material_name
    };
    let mut line = format!(
        "  - {name}: {thickness:.1} {}, {}, {:.2} m²",
        display.thickness.symbol(),
        lambda_text(display, layer.thermal_conductivity),
        layer.surface_area
    );
    if let Some(surface) = layer.surface_type {
        let _ = write!(line, ", {}", surface.as_code());
    }
    if let Some(cost) = layer.cost {
        let _ = write!(line, ", {cost:.2} €");
    }
    if !layer.uuid.is_empty() {
        let _ = write!(line, " [{}]", layer.uuid);
    }
    line
}

fn layers_block(out: &mut String, tr: &Translator, display: &DisplayConfig, title_key: &str, layers: &[MaterialLayer]) {
    let _ = writeln!(out, "{}:", tr.t(title_key));
    if layers.is_empty() {
        let _ = writeln!(out, "  {}", tr.t(keys::REPORT_NO_LAYERS));
    }
    for layer in layers {
        let _ = writeln!(out, "{}", layer_line(display, layer));
    }
}

fn summary_block(out: &mut String, tr: &Translator, display: &DisplayConfig, summary: &ThermalSummary) {
    let _ = writeln!(out, "  {}: {:.3} m²K/W", tr.t(keys::REPORT_R_TOTAL), summary.r_total);
    let _ = writeln!(out, "  {}: {}", tr.t(keys::REPORT_U_VALUE), u_text(display, summary.u_coefficient));
    let _ = writeln!(out, "  {}: {:.3} kW", tr.t(keys::REPORT_WINTER_LOSS), summary.winter_losses_kw);
    let _ = writeln!(out, "  {}: {:.3} kW", tr.t(keys::REPORT_SUMMER_LOSS), summary.summer_losses_kw);
}

fn comparison_block(out: &mut String, tr: &Translator, display: &DisplayConfig, cmp: &RetrofitComparison) {
    let _ = writeln!(
        out,
        "{} → {}: U {} → {}",
        tr.t(keys::REPORT_BEFORE),
        tr.t(keys::REPORT_AFTER),
        u_text(display, cmp.before.u_coefficient),
        u_text(display, cmp.after.u_coefficient)
    );
    let _ = writeln!(out, "{}: {:.1} kWh", tr.t(keys::REPORT_SAVINGS), cmp.annual_savings_kwh);
}

fn payback_text(tr: &Translator, years: f64) -> String {
    if years.is_finite() {
        format!("{years:.1} y")
    } else {
        tr.t(keys::REPORT_NO_PAYBACK)
    }
}

/// 오프라인 시나리오 계산 결과를 문자열로 만든다.
pub fn render_scenario(tr: &Translator, display: &DisplayConfig, report: &ScenarioReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", tr.t(keys::REPORT_HEADING));
    let _ = writeln!(out, "{}: {}", tr.t(keys::REPORT_KIND), report.kind.as_code());
    layers_block(&mut out, tr, display, keys::REPORT_OLD_LAYERS, &report.old.layers);
    layers_block(&mut out, tr, display, keys::REPORT_NEW_LAYERS, &report.new.layers);
    let _ = writeln!(out, "{}:", tr.t(keys::REPORT_AFTER));
    summary_block(&mut out, tr, display, &report.combined);
    comparison_block(&mut out, tr, display, &report.comparison);
    let _ = writeln!(out, "{}: {:.2} €", tr.t(keys::REPORT_TOTAL_COST), report.total_cost);
    let _ = writeln!(out, "{}: {:.2} €", tr.t(keys::REPORT_ANNUAL_BENEFIT), report.annual_benefit);
    let _ = writeln!(out, "{}: {:.2} €", tr.t(keys::REPORT_NPV), report.economics.npv);
    let _ = writeln!(out, "{}: {}", tr.t(keys::REPORT_PAYBACK), payback_text(tr, report.economics.payback_years));
    out
}

/// 서버 기록을 문자열로 만든다. 파생값은 서버가 돌려준 값 그대로 보여준다.
pub fn render_record(tr: &Translator, display: &DisplayConfig, kind: AssemblyKind, record: &InsulationRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}] ({} {})", tr.t(keys::REPORT_RECORD), record.uuid, tr.t(keys::REPORT_KIND), kind.as_code());
    layers_block(&mut out, tr, display, keys::REPORT_OLD_LAYERS, &record.old_materials);
    layers_block(&mut out, tr, display, keys::REPORT_NEW_LAYERS, &record.new_materials);
    let _ = writeln!(out, "  {}: {}", tr.t(keys::REPORT_U_VALUE), u_text(display, record.u_coefficient));
    let _ = writeln!(out, "  {}: {:.3} kW", tr.t(keys::REPORT_WINTER_LOSS), record.winter_hourly_losses);
    let _ = writeln!(out, "  {}: {:.3} kW", tr.t(keys::REPORT_SUMMER_LOSS), record.summer_hourly_losses);
    let _ = writeln!(out, "  {}: {:.2} €", tr.t(keys::REPORT_TOTAL_COST), record.total_cost);
    let _ = writeln!(out, "  {}: {:.2} €", tr.t(keys::REPORT_ANNUAL_BENEFIT), record.annual_benefit);
    let _ = writeln!(out, "  {}: {:.2} €", tr.t(keys::REPORT_NPV), record.net_present_value);
    out
}

pub fn render_catalog(tr: &Translator, display: &DisplayConfig, catalog: &[CatalogMaterial]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", tr.t(keys::CATALOG_HEADING));
    for m in catalog {
        let _ = writeln!(
            out,
            "  {:<18} {:<32} {}  ({})",
            m.id,
            m.name,
            lambda_text(display, m.thermal_conductivity),
            m.category
        );
    }
    out
}

/// 배너 메시지를 표준 출력/오류로 내보낸다.
pub fn print_notices(tr: &Translator, notices: Vec<Notice>) {
    for notice in notices {
        match notice {
            Notice::Success(msg) => println!("✔ {msg}"),
            Notice::Warning(msg) => eprintln!("{}: {msg}", tr.t(keys::WARNING_PREFIX)),
            Notice::Error(msg) => eprintln!("{}: {msg}", tr.t(keys::ERROR_PREFIX)),
        }
    }
}

pub fn print_field_errors(tr: &Translator, errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        eprintln!("{}: {field}: {message}", tr.t(keys::ERROR_PREFIX));
    }
}
