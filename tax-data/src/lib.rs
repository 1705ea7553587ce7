//! File loaders for rate schedules and tax-year configuration.

mod loader;

pub use loader::{BracketRecord, BracketTableLoader, LoaderError, TaxYearConfigLoader};
