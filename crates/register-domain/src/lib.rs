//! register-domain
//!
//! Pure domain models (Register, Family, Location, AccountCode, Asset).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod account_code;
pub mod asset;
pub mod common;
pub mod family;
pub mod location;
pub mod register;

pub use account_code::*;
pub use asset::*;
pub use common::*;
pub use family::*;
pub use location::*;
pub use register::*;
