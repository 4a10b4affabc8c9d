//! Session context owning the persona store, catalog and advice ledger.
//!
//! A session is built once per run and dropped at the end of it. Mutating
//! operations take `&mut self`, so there is exactly one writer at a time.

use crate::advisory::catalog::Catalog;
use crate::advisory::{composer, AdvisoryInput, AdvisoryRuntime, DeterministicAdvisoryRuntime};
use crate::config::{AdvisorConfig, AppConfig};
use crate::domain::advice::{AdviceRecord, AdviceType, CategoryFilter};
use crate::domain::product::Product;
use crate::domain::profile::{ConsumerProfile, ProfileId};
use crate::errors::{AdvisoryError, DataError};
use crate::ledger::AdviceLedger;
use crate::seed;
use crate::store::{ProfileStore, SaveOutcome};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvisorSettings {
    pub enabled_advice_types: Vec<AdviceType>,
    pub history_limit: usize,
    pub preview_chars: usize,
}

impl AdvisorSettings {
    pub fn is_enabled(&self, advice_type: AdviceType) -> bool {
        self.enabled_advice_types.contains(&advice_type)
    }
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default().advisor)
    }
}

impl From<&AdvisorConfig> for AdvisorSettings {
    fn from(config: &AdvisorConfig) -> Self {
        Self {
            enabled_advice_types: config.enabled_advice_types.clone(),
            history_limit: config.history_limit,
            preview_chars: config.preview_chars,
        }
    }
}

pub struct AdvisorySession {
    store: ProfileStore,
    catalog: Catalog,
    ledger: AdviceLedger,
    runtime: Box<dyn AdvisoryRuntime>,
    settings: AdvisorSettings,
}

impl AdvisorySession {
    pub fn new(
        store: ProfileStore,
        catalog: Catalog,
        runtime: Box<dyn AdvisoryRuntime>,
        settings: AdvisorSettings,
    ) -> Self {
        Self { store, catalog, ledger: AdviceLedger::new(), runtime, settings }
    }

    /// Seed personas and catalog with the default rule runtime.
    pub fn with_seed_data(settings: AdvisorSettings, max_profiles: usize) -> Self {
        Self::new(
            ProfileStore::new(seed::profiles(), max_profiles),
            seed::catalog(),
            Box::new(DeterministicAdvisoryRuntime::default()),
            settings,
        )
    }

    /// Loads data files named in `config.data`, falling back to the seeds.
    pub fn from_config(config: &AppConfig) -> Result<Self, DataError> {
        let profiles = match config.data.profiles_path.as_deref() {
            Some(path) => seed::load_profiles(path)?,
            None => seed::profiles(),
        };
        let catalog = match config.data.catalog_path.as_deref() {
            Some(path) => seed::load_catalog(path)?,
            None => seed::catalog(),
        };

        Ok(Self::new(
            ProfileStore::new(profiles, config.profiles.max_profiles),
            catalog,
            Box::new(DeterministicAdvisoryRuntime::default()),
            AdvisorSettings::from(&config.advisor),
        ))
    }

    pub fn generate_advice(
        &mut self,
        profile_id: ProfileId,
        advice_type: AdviceType,
        category: CategoryFilter,
    ) -> Result<&AdviceRecord, AdvisoryError> {
        let profile = self.store.get(profile_id)?;
        let record = compose_record(
            self.runtime.as_ref(),
            &self.catalog,
            &self.settings,
            profile,
            advice_type,
            category,
        )?;
        Ok(&self.ledger.append(record).record)
    }

    /// Generates advice for a profile that has not been saved to the store.
    pub fn generate_advice_for(
        &mut self,
        profile: &ConsumerProfile,
        advice_type: AdviceType,
        category: CategoryFilter,
    ) -> Result<&AdviceRecord, AdvisoryError> {
        let record = compose_record(
            self.runtime.as_ref(),
            &self.catalog,
            &self.settings,
            profile,
            advice_type,
            category,
        )?;
        Ok(&self.ledger.append(record).record)
    }

    /// Most recent records, newest first, never including the latest one.
    pub fn ledger_recent(&self, limit: usize) -> Vec<&AdviceRecord> {
        self.ledger.recent(true, limit)
    }

    pub fn filter_and_rank_products(
        &self,
        profile_id: ProfileId,
        category: CategoryFilter,
    ) -> Result<Vec<Product>, AdvisoryError> {
        let profile = self.store.get(profile_id)?;
        Ok(self.runtime.filter_and_rank(profile, &self.catalog, category))
    }

    pub fn save_profile(&mut self, profile: ConsumerProfile) -> Result<SaveOutcome, AdvisoryError> {
        self.store.upsert(profile)
    }

    pub fn new_profile_draft(&self) -> Result<ConsumerProfile, AdvisoryError> {
        self.store.draft()
    }

    pub fn profiles(&self) -> &[ConsumerProfile] {
        self.store.list()
    }

    pub fn profile(&self, profile_id: ProfileId) -> Result<&ConsumerProfile, AdvisoryError> {
        self.store.get(profile_id)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &AdviceLedger {
        &self.ledger
    }

    pub fn settings(&self) -> &AdvisorSettings {
        &self.settings
    }
}

fn compose_record(
    runtime: &dyn AdvisoryRuntime,
    catalog: &Catalog,
    settings: &AdvisorSettings,
    profile: &ConsumerProfile,
    advice_type: AdviceType,
    category: CategoryFilter,
) -> Result<AdviceRecord, AdvisoryError> {
    // Types without a rule table surface as UnknownAdviceType from the runtime.
    if composer::has_rule_table(advice_type) && !settings.is_enabled(advice_type) {
        return Err(AdvisoryError::AdviceTypeDisabled(advice_type));
    }

    let content = runtime.generate(AdvisoryInput { profile, catalog, advice_type, category })?;
    Ok(AdviceRecord::new(advice_type, profile.id, category, content))
}
