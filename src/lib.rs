//! 벽체/지붕 단열 개선 계산 로직을 라이브러리로 분리하여 CLI 와 테스트가 함께 쓰도록 한다.

pub mod app;
pub mod config;
pub mod i18n;
pub mod insulation;
pub mod scenario;
pub mod session;
pub mod ui_cli;
pub mod units;
