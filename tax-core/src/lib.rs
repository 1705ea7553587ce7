pub mod calculations;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::{InvalidInputError, TaxRequest, ValidatedRequest};
