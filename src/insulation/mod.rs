//! 벽체/지붕 단열 개선 계산 모델과 원격 저장소 연동 모듈 모음.
//!
//! 계산(`assembly`, `thermal`, `comparison`, `economics`)은 순수 함수로만 구성하고,
//! 입출력은 `remote`/`http`, 상태 관리는 `controller`에 둔다.

pub mod assembly;
pub mod catalog;
pub mod comparison;
pub mod controller;
pub mod economics;
pub mod http;
pub mod memory;
pub mod record;
pub mod remote;
pub mod thermal;
pub mod validation;
mod wire;

pub use assembly::*;
pub use catalog::{builtin_catalog, find_material, CatalogMaterial};
pub use record::InsulationRecord;
pub use remote::{RemoteError, RemoteStore};
pub use thermal::*;
