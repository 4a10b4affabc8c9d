pub mod advisory;
pub mod config;
pub mod domain;
pub mod errors;
pub mod insights;
pub mod ledger;
pub mod seed;
pub mod session;
pub mod store;

pub use advisory::catalog::Catalog;
pub use advisory::{AdvisoryInput, AdvisoryRuntime, DeterministicAdvisoryRuntime};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::advice::{AdviceRecord, AdviceType, CategoryFilter};
pub use domain::product::Product;
pub use domain::profile::{
    BuyingStage, ConsumerProfile, Interest, Location, PainPoint, ProfileId,
};
pub use errors::{AdvisoryError, ApplicationError, DataError, VocabularyError};
pub use insights::InsightsReport;
pub use ledger::{AdviceLedger, LedgerEntry, VerificationResult};
pub use session::{AdvisorSettings, AdvisorySession};
pub use store::{ProfileStore, SaveOutcome};
