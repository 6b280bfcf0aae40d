use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::i18n::Translator;
use crate::insulation::controller::{ControllerError, InsulationController};
use crate::insulation::http::HttpRemoteStore;
use crate::insulation::validation::{EconomicParams, MaterialForm};
use crate::insulation::{builtin_catalog, AssemblyKind, Membership, RemoteError, RemoteStore};
use crate::scenario::{Scenario, ScenarioError};
use crate::session::SessionContext;
use crate::ui_cli;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("시나리오 오류: {0}")]
    Scenario(#[from] ScenarioError),
    #[error("{0}")]
    Controller(#[from] ControllerError),
    #[error("원격 저장소 오류: {0}")]
    Remote(#[from] RemoteError),
}

#[derive(Debug, Parser)]
#[command(name = "insulation_audit_toolbox", version, about = "Wall/roof insulation retrofit calculator")]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// 표시 언어 (auto, ko, en)
    #[arg(long, global = true, default_value = "auto")]
    pub lang: String,
    /// 로그 상세도 (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 시나리오 파일로 오프라인 계산
    Calc { scenario: PathBuf },
    /// 재료 카탈로그 표시
    Materials {
        #[arg(long, value_parser = parse_kind, default_value = "wall")]
        kind: AssemblyKind,
        /// 서버 없이 내장 카탈로그만 표시
        #[arg(long)]
        offline: bool,
    },
    /// 건물의 단열 기록 조회(없으면 생성)
    Show(Target),
    /// 재료층 추가
    AddMaterial {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        layer: LayerArgs,
    },
    /// 재료층 수정
    EditMaterial {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        layer_uuid: String,
        #[command(flatten)]
        layer: LayerArgs,
    },
    /// 재료층 삭제
    DeleteMaterial {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        layer_uuid: String,
    },
    /// 경제성 입력 저장
    Save {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        economics: EconomicArgs,
    },
}

#[derive(Debug, Args)]
pub struct Target {
    #[arg(long, value_parser = parse_kind)]
    pub kind: AssemblyKind,
    #[arg(long)]
    pub building: String,
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Debug, Args)]
pub struct LayerArgs {
    /// 카탈로그 재료 식별자 또는 이름
    #[arg(long, default_value = "")]
    pub material: String,
    /// 두께 (예: 0.05, 5cm, 50mm)
    #[arg(long, default_value = "")]
    pub thickness: String,
    /// 면적 (예: 20, 215ft2)
    #[arg(long, default_value = "")]
    pub area: String,
    /// 비용 (NEW 층 필수)
    #[arg(long, default_value = "")]
    pub cost: String,
    #[arg(long, default_value = "")]
    pub surface_type: String,
    /// 개선(NEW) 층이면 지정
    #[arg(long)]
    pub new: bool,
}

impl LayerArgs {
    pub fn to_form(&self) -> MaterialForm {
        MaterialForm {
            material: self.material.clone(),
            thickness: self.thickness.clone(),
            surface_area: self.area.clone(),
            cost: self.cost.clone(),
            surface_type: self.surface_type.clone(),
            membership: if self.new { Membership::New } else { Membership::Old },
        }
    }
}

#[derive(Debug, Args)]
pub struct EconomicArgs {
    #[arg(long)]
    pub heating_hours: Option<f64>,
    #[arg(long)]
    pub cooling_hours: Option<f64>,
    #[arg(long)]
    pub years: Option<u32>,
    #[arg(long)]
    pub operating_costs: Option<f64>,
    #[arg(long)]
    pub discount_rate: Option<f64>,
}

fn parse_kind(s: &str) -> Result<AssemblyKind, String> {
    AssemblyKind::from_code(s).ok_or_else(|| format!("unknown assembly kind: {s} (wall|roof)"))
}

fn build_store(config: &Config, tr: &Translator) -> HttpRemoteStore {
    let session = SessionContext::new(config.api_token(), tr.language().as_code());
    HttpRemoteStore::new(
        &config.api.base_url,
        session,
        Duration::from_secs(config.api.timeout_secs.max(1)),
    )
}

/// 건물을 선택하고 카탈로그를 준비한 컨트롤러를 만든다.
fn open<S: RemoteStore>(
    store: S,
    config: &Config,
    tr: &Translator,
    target: &Target,
) -> Result<InsulationController<S>, AppError> {
    let mut controller = InsulationController::new(store, target.kind, tr.clone(), config.retry.policy());
    let selected = controller
        .select_building(&target.building, target.project.as_deref())
        .map(|_| ());
    if let Err(e) = selected {
        ui_cli::print_notices(tr, controller.take_notices());
        return Err(e.into());
    }
    Ok(controller)
}

fn finish<S: RemoteStore>(
    controller: &mut InsulationController<S>,
    config: &Config,
    tr: &Translator,
    outcome: Result<(), ControllerError>,
) -> Result<(), AppError> {
    if let Err(e) = &outcome {
        if let Some(errors) = e.field_errors() {
            ui_cli::print_field_errors(tr, &errors);
        }
    }
    ui_cli::print_notices(tr, controller.take_notices());
    if let Some(record) = controller.record() {
        print!("{}", ui_cli::render_record(tr, &config.display, controller.kind(), record));
    }
    outcome.map_err(AppError::from)
}

/// 선택된 하위 명령을 실행한다.
pub fn run(cli: &Cli, config: &Config, tr: &Translator) -> Result<(), AppError> {
    match &cli.command {
        Command::Calc { scenario } => {
            let scenario = Scenario::load(scenario)?;
            let report = scenario.evaluate(&builtin_catalog(), &config.economics, tr)?;
            print!("{}", ui_cli::render_scenario(tr, &config.display, &report));
            Ok(())
        }
        Command::Materials { kind, offline } => {
            let catalog = if *offline {
                builtin_catalog()
            } else {
                build_store(config, tr).available_materials(*kind)?
            };
            print!("{}", ui_cli::render_catalog(tr, &config.display, &catalog));
            Ok(())
        }
        Command::Show(target) => {
            let mut controller = open(build_store(config, tr), config, tr, target)?;
            finish(&mut controller, config, tr, Ok(()))
        }
        Command::AddMaterial { target, layer } => {
            let mut controller = open(build_store(config, tr), config, tr, target)?;
            controller.load_catalog();
            let outcome = controller.add_material(&layer.to_form());
            finish(&mut controller, config, tr, outcome)
        }
        Command::EditMaterial {
            target,
            layer_uuid,
            layer,
        } => {
            let mut controller = open(build_store(config, tr), config, tr, target)?;
            controller.load_catalog();
            let outcome = controller.edit_material(layer_uuid, &layer.to_form());
            finish(&mut controller, config, tr, outcome)
        }
        Command::DeleteMaterial { target, layer_uuid } => {
            let mut controller = open(build_store(config, tr), config, tr, target)?;
            let outcome = controller.delete_material(layer_uuid);
            finish(&mut controller, config, tr, outcome)
        }
        Command::Save { target, economics } => {
            let mut controller = open(build_store(config, tr), config, tr, target)?;
            let params = match controller.record() {
                Some(current) => EconomicParams {
                    heating_hours_per_year: economics.heating_hours.unwrap_or(current.heating_hours_per_year),
                    cooling_hours_per_year: economics.cooling_hours.unwrap_or(current.cooling_hours_per_year),
                    time_period_years: economics.years.unwrap_or(current.time_period_years),
                    annual_operating_costs: economics
                        .operating_costs
                        .unwrap_or(current.annual_operating_costs),
                    discount_rate: economics.discount_rate.unwrap_or(current.discount_rate),
                },
                None => return Err(ControllerError::NotReady.into()),
            };
            let outcome = controller.save(&params);
            finish(&mut controller, config, tr, outcome)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_material_flags() {
        let cli = Cli::try_parse_from([
            "insulation_audit_toolbox",
            "add-material",
            "--kind",
            "roof",
            "--building",
            "b-1",
            "--material",
            "eps",
            "--thickness",
            "10cm",
            "--area",
            "80",
            "--cost",
            "1200",
            "--surface-type",
            "external_horizontal_roof",
            "--new",
        ])
        .unwrap();
        match cli.command {
            Command::AddMaterial { target, layer } => {
                assert_eq!(target.kind, AssemblyKind::Roof);
                let form = layer.to_form();
                assert_eq!(form.membership, Membership::New);
                assert_eq!(form.surface_area, "80");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        let parsed = Cli::try_parse_from(["insulation_audit_toolbox", "show", "--kind", "floor", "--building", "b"]);
        assert!(parsed.is_err());
    }
}
