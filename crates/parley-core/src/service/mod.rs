//! Account and model registry services.

pub mod account;
pub mod hash;
pub mod model;

pub use account::AccountService;
pub use model::ModelRegistry;
