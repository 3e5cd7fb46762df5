//! register-core
//!
//! Depreciation engine and register services.
//! Depends on register-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod account_code_service;
pub mod asset_service;
pub mod depreciation;
pub mod error;
pub mod family_service;
pub mod location_service;
pub mod public_api;
pub mod register_service;
pub mod report_service;
pub mod storage;
pub mod time;
mod validation;

pub use account_code_service::*;
pub use asset_service::*;
pub use depreciation::{
    generate_schedule, prorate, round_cents, AssetInput, ScheduleEntry, ScheduleMethod,
};
pub use error::CoreError;
pub use public_api::ApiScheduleRow;
pub use family_service::*;
pub use location_service::*;
pub use register_service::*;
pub use report_service::*;
pub use storage::{register_warnings, RegisterBackupInfo, RegisterStorage};
pub use time::{Clock, FixedClock};
