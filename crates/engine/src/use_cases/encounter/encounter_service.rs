//! Encounter candidate selection.

use std::cmp::Ordering;

use playtogether_domain::Monster;

/// Which environments a candidate must appear in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnvironmentFilter {
    /// No restriction
    #[default]
    Any,
    /// Only creatures with no listed environment
    Unlisted,
    /// Creatures listing this environment (case-insensitive)
    Named(String),
}

impl EnvironmentFilter {
    fn matches(&self, monster: &Monster) -> bool {
        match self {
            EnvironmentFilter::Any => true,
            EnvironmentFilter::Unlisted => monster.environments.is_empty(),
            EnvironmentFilter::Named(env) => monster.lives_in(env),
        }
    }
}

/// Filter for encounter candidates.
#[derive(Debug, Clone, Default)]
pub struct EncounterFilter {
    pub environment: EnvironmentFilter,
    /// Highest challenge rating a candidate may have.
    pub max_challenge_rating: f64,
    /// Maximum results to return.
    pub limit: Option<usize>,
}

impl EncounterFilter {
    /// Check if a monster matches this filter.
    pub fn matches_monster(&self, monster: &Monster) -> bool {
        monster.challenge_rating.monster() <= self.max_challenge_rating
            && self.environment.matches(monster)
    }
}

/// Monsters matching the filter, strongest first, then by name.
pub fn select_candidates<'a>(monsters: &'a [Monster], filter: &EncounterFilter) -> Vec<&'a Monster> {
    let mut matching: Vec<&Monster> = monsters
        .iter()
        .filter(|m| filter.matches_monster(m))
        .collect();
    matching.sort_by(|a, b| {
        b.challenge_rating
            .monster()
            .partial_cmp(&a.challenge_rating.monster())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    match filter.limit {
        Some(limit) => matching.into_iter().take(limit).collect(),
        None => matching,
    }
}

/// Holds an imported bestiary for repeated candidate queries.
#[derive(Debug, Clone, Default)]
pub struct EncounterService {
    monsters: Vec<Monster>,
}

impl EncounterService {
    pub fn new(monsters: Vec<Monster>) -> Self {
        Self { monsters }
    }

    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    pub fn candidates(&self, filter: &EncounterFilter) -> Vec<&Monster> {
        select_candidates(&self.monsters, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playtogether_domain::{AbilityScores, ChallengeRating};

    fn monster(name: &str, cr: f64, environments: &[&str]) -> Monster {
        let mut m = Monster::new(
            name,
            "MM",
            AbilityScores::new(10, 10, 10, 10, 10, 10),
            ChallengeRating::new(cr),
        )
        .expect("valid monster");
        m.environments = environments.iter().map(|e| e.to_string()).collect();
        m
    }

    fn bestiary() -> EncounterService {
        EncounterService::new(vec![
            monster("Goblin", 0.25, &["forest", "hill"]),
            monster("Owlbear", 3.0, &["forest"]),
            monster("Brown Bear", 1.0, &["Forest", "hill"]),
            monster("Black Bear", 0.5, &["forest"]),
            monster("Adult Red Dragon", 17.0, &["mountain"]),
            monster("Lemure", 0.0, &[]),
        ])
    }

    fn names(found: Vec<&Monster>) -> Vec<&str> {
        found.into_iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn filters_by_environment_and_rating() {
        let service = bestiary();
        let filter = EncounterFilter {
            environment: EnvironmentFilter::Named("forest".into()),
            max_challenge_rating: 1.0,
            limit: None,
        };
        assert_eq!(
            names(service.candidates(&filter)),
            ["Brown Bear", "Black Bear", "Goblin"]
        );
    }

    #[test]
    fn equal_ratings_sort_by_name() {
        let service = EncounterService::new(vec![
            monster("Wolf", 0.25, &[]),
            monster("Bandit", 0.125, &[]),
            monster("Skeleton", 0.25, &[]),
        ]);
        let filter = EncounterFilter {
            max_challenge_rating: 1.0,
            ..Default::default()
        };
        assert_eq!(
            names(service.candidates(&filter)),
            ["Skeleton", "Wolf", "Bandit"]
        );
    }

    #[test]
    fn unlisted_environment_and_limit() {
        let service = bestiary();
        let filter = EncounterFilter {
            environment: EnvironmentFilter::Unlisted,
            max_challenge_rating: 30.0,
            limit: None,
        };
        assert_eq!(names(service.candidates(&filter)), ["Lemure"]);

        let filter = EncounterFilter {
            max_challenge_rating: 30.0,
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(
            names(service.candidates(&filter)),
            ["Adult Red Dragon", "Owlbear"]
        );
        assert_eq!(service.monster_count(), 6);
    }
}
