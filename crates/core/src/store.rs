use serde::Serialize;

use crate::domain::profile::{ConsumerProfile, ProfileId};
use crate::errors::AdvisoryError;

pub const DEFAULT_MAX_PROFILES: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Created,
    Replaced,
}

/// Ordered in-memory persona store keyed by profile id.
#[derive(Clone, Debug)]
pub struct ProfileStore {
    profiles: Vec<ConsumerProfile>,
    max_profiles: usize,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_MAX_PROFILES)
    }
}

impl ProfileStore {
    pub fn new(profiles: Vec<ConsumerProfile>, max_profiles: usize) -> Self {
        Self { profiles, max_profiles }
    }

    pub fn list(&self) -> &[ConsumerProfile] {
        &self.profiles
    }

    pub fn get(&self, id: ProfileId) -> Result<&ConsumerProfile, AdvisoryError> {
        self.profiles
            .iter()
            .find(|profile| profile.id == id)
            .ok_or(AdvisoryError::ProfileNotFound(id))
    }

    /// One past the largest id in the store, or 1 when empty.
    pub fn next_id(&self) -> Result<ProfileId, AdvisoryError> {
        let max = self.profiles.iter().map(|profile| profile.id.0).max().unwrap_or(0);
        max.checked_add(1)
            .map(ProfileId)
            .ok_or(AdvisoryError::ProfileIdsExhausted(ProfileId(max)))
    }

    pub fn draft(&self) -> Result<ConsumerProfile, AdvisoryError> {
        self.next_id().map(ConsumerProfile::draft)
    }

    /// Replaces the record with the same id in place, or appends a new one.
    pub fn upsert(&mut self, profile: ConsumerProfile) -> Result<SaveOutcome, AdvisoryError> {
        if let Some(existing) = self.profiles.iter_mut().find(|existing| existing.id == profile.id)
        {
            *existing = profile;
            return Ok(SaveOutcome::Replaced);
        }

        if self.profiles.len() >= self.max_profiles {
            return Err(AdvisoryError::ProfileLimitReached { limit: self.max_profiles });
        }

        self.profiles.push(profile);
        Ok(SaveOutcome::Created)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::profile::{Interest, ProfileId};
    use crate::errors::AdvisoryError;
    use crate::seed;

    use super::{ProfileStore, SaveOutcome};

    #[test]
    fn next_id_uses_max_existing_id_plus_one() {
        let mut profiles = seed::profiles();
        profiles[1].id = ProfileId(10);
        let store = ProfileStore::new(profiles, 20);

        assert_eq!(store.next_id(), Ok(ProfileId(11)));
        assert_eq!(ProfileStore::default().next_id(), Ok(ProfileId(1)));
        assert_eq!(store.draft().map(|draft| draft.id), Ok(ProfileId(11)));
    }

    #[test]
    fn exhausted_id_space_never_reuses_an_existing_id() {
        let mut profiles = seed::profiles();
        profiles[2].id = ProfileId(u32::MAX);
        let store = ProfileStore::new(profiles, 20);

        assert_eq!(store.next_id(), Err(AdvisoryError::ProfileIdsExhausted(ProfileId(u32::MAX))));
        assert!(store.draft().is_err());
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get(ProfileId(u32::MAX)).map(|profile| profile.name.as_str()),
            Ok("Maria Rodriguez")
        );
    }

    #[test]
    fn upsert_replaces_full_record_in_place() {
        let mut store = ProfileStore::new(seed::profiles(), 20);
        let mut updated = store.get(ProfileId(2)).expect("seed profile").clone();
        updated.interests = vec![Interest::Reading];
        updated.name = "Jamie Wilson".to_string();

        let outcome = store.upsert(updated.clone()).expect("replace");

        assert_eq!(outcome, SaveOutcome::Replaced);
        assert_eq!(store.len(), 3);
        assert_eq!(store.list()[1], updated);
    }

    #[test]
    fn upsert_appends_new_profiles_until_limit() {
        let mut store = ProfileStore::new(seed::profiles(), 4);

        let mut draft = store.draft().expect("draft");
        draft.name = "Noor".to_string();
        assert_eq!(store.upsert(draft).expect("append"), SaveOutcome::Created);
        assert_eq!(store.list().last().map(|p| p.id), Some(ProfileId(4)));

        let error = store.upsert(store.draft().expect("draft")).expect_err("store full");
        assert_eq!(error, AdvisoryError::ProfileLimitReached { limit: 4 });
    }

    #[test]
    fn get_reports_missing_profile() {
        let store = ProfileStore::new(seed::profiles(), 20);
        assert_eq!(store.get(ProfileId(99)), Err(AdvisoryError::ProfileNotFound(ProfileId(99))));
    }
}
