pub mod errors;
pub mod register_manager;
