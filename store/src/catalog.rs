//! Read-only mission catalog.
//!
//! Missions are static content: loaded once at startup, never mutated by
//! the bounty pipeline.

use rand::seq::SliceRandom;
use seek_types::{Mission, MissionId, Tier};
use std::collections::HashMap;

use crate::error::StoreError;

pub struct MissionCatalog {
    missions: HashMap<MissionId, Mission>,
    by_tier: HashMap<Tier, Vec<MissionId>>,
}

impl MissionCatalog {
    pub fn new(entries: Vec<Mission>) -> Self {
        let mut missions = HashMap::new();
        let mut by_tier: HashMap<Tier, Vec<MissionId>> = HashMap::new();
        for mission in entries {
            by_tier
                .entry(mission.tier)
                .or_default()
                .push(mission.id.clone());
            missions.insert(mission.id.clone(), mission);
        }
        Self { missions, by_tier }
    }

    pub fn get(&self, id: &MissionId) -> Result<&Mission, StoreError> {
        self.missions
            .get(id)
            .ok_or_else(|| StoreError::MissionNotFound(id.to_string()))
    }

    /// Pick a random mission for the requested tier. The pick itself is the
    /// hidden target assignment, so it happens server-side only.
    pub fn pick_for_tier(&self, tier: Tier) -> Option<&Mission> {
        let ids = self.by_tier.get(&tier)?;
        let id = ids.choose(&mut rand::rngs::OsRng)?;
        self.missions.get(id)
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    /// Built-in starter catalog used by the dev network and tests.
    pub fn builtin() -> Self {
        fn mission(id: &str, tier: Tier, desc: &str, keywords: &[&str], difficulty: u8) -> Mission {
            Mission {
                id: MissionId::new(id),
                tier,
                description: desc.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
                difficulty,
            }
        }

        Self::new(vec![
            mission(
                "m-red-hydrant",
                Tier::One,
                "a red fire hydrant",
                &["fire hydrant", "hydrant"],
                1,
            ),
            mission(
                "m-park-bench",
                Tier::One,
                "a wooden park bench",
                &["bench", "park bench"],
                1,
            ),
            mission(
                "m-stop-sign",
                Tier::One,
                "a stop sign",
                &["stop sign", "road sign"],
                2,
            ),
            mission(
                "m-blue-mailbox",
                Tier::Two,
                "a blue public mailbox",
                &["mailbox", "postbox"],
                2,
            ),
            mission(
                "m-fountain",
                Tier::Two,
                "a public water fountain",
                &["fountain", "water fountain"],
                3,
            ),
            mission(
                "m-street-mural",
                Tier::Two,
                "a painted street mural",
                &["mural", "street art", "graffiti"],
                3,
            ),
            mission(
                "m-yellow-taxi",
                Tier::Three,
                "a yellow taxi cab",
                &["taxi", "cab", "yellow car"],
                4,
            ),
            mission(
                "m-telescope",
                Tier::Three,
                "a coin-operated sightseeing telescope",
                &["telescope", "viewer", "binoculars"],
                5,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_tier() {
        let catalog = MissionCatalog::builtin();
        for tier in [Tier::One, Tier::Two, Tier::Three] {
            assert!(catalog.pick_for_tier(tier).is_some());
        }
    }

    #[test]
    fn pick_respects_tier() {
        let catalog = MissionCatalog::builtin();
        for _ in 0..20 {
            let m = catalog.pick_for_tier(Tier::Three).unwrap();
            assert_eq!(m.tier, Tier::Three);
        }
    }

    #[test]
    fn unknown_mission_is_an_error() {
        let catalog = MissionCatalog::builtin();
        assert!(matches!(
            catalog.get(&MissionId::new("m-nope")),
            Err(StoreError::MissionNotFound(_))
        ));
    }

    #[test]
    fn empty_tier_yields_none() {
        let catalog = MissionCatalog::new(vec![]);
        assert!(catalog.pick_for_tier(Tier::One).is_none());
    }
}
