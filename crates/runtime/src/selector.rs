//! Weighted tip selection.
//!
//! Each category carries a multiplier derived from [`ContextFacts`].  The
//! selection pool repeats a category's whole tip list `floor(weight)` times,
//! so a weight below 1.0 removes the category from the pool entirely.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::{IndexedRandom, IteratorRandom};

use tipline_config::DEFAULT_TIP;
use tipline_core::{Category, CommandCategory, ContextFacts, all_tips};

/// Boost for version-control tips inside a repository checkout.
pub const REPO_WEIGHT: f64 = 3.0;
/// Extra boost when the last shell command was a version-control command.
pub const RECENT_VCS_WEIGHT: f64 = 2.0;
/// Boost for OS tips after a container command.
pub const RECENT_CONTAINER_OS_WEIGHT: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    weights: BTreeMap<Category, f64>,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            weights: Category::ALL.into_iter().map(|c| (c, 1.0)).collect(),
        }
    }
}

impl WeightTable {
    pub fn from_facts(facts: &ContextFacts) -> Self {
        let mut table = Self::default();
        if facts.in_repo_directory {
            table.scale(Category::VersionControl, REPO_WEIGHT);
        }
        match facts.recent_command {
            Some(CommandCategory::VersionControl) => {
                table.scale(Category::VersionControl, RECENT_VCS_WEIGHT);
            }
            Some(CommandCategory::Container) => {
                table.scale(Category::OsTips, RECENT_CONTAINER_OS_WEIGHT);
            }
            _ => {}
        }
        table
    }

    pub fn weight(&self, category: Category) -> f64 {
        self.weights.get(&category).copied().unwrap_or(1.0)
    }

    /// How many copies of the category's list go into the pool.
    pub fn repetitions(&self, category: Category) -> usize {
        self.weight(category).floor().max(0.0) as usize
    }

    pub fn scale(&mut self, category: Category, factor: f64) {
        *self.weights.entry(category).or_insert(1.0) *= factor;
    }

    /// The concatenated selection pool in [`Category::ALL`] order.
    pub fn pool(&self) -> Vec<&'static str> {
        Category::ALL
            .into_iter()
            .flat_map(|category| {
                let tips = category.tips();
                std::iter::repeat_n(tips, self.repetitions(category)).flatten().copied()
            })
            .collect()
    }
}

/// Draw one tip, weighted by `facts`.  Falls back to a uniform draw when the
/// weighted pool is empty.
pub fn pick_weighted<R: Rng + ?Sized>(facts: &ContextFacts, rng: &mut R) -> &'static str {
    let pool = WeightTable::from_facts(facts).pool();
    pool.choose(rng).copied().unwrap_or_else(|| pick_uniform(rng))
}

/// Uniform draw over every tip in the catalog, each counted once.
pub fn pick_uniform<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    all_tips().choose(rng).unwrap_or(DEFAULT_TIP)
}

/// Weighted draw when context is available, uniform otherwise.
pub fn select_tip<R: Rng + ?Sized>(facts: Option<&ContextFacts>, rng: &mut R) -> &'static str {
    match facts {
        Some(facts) => pick_weighted(facts, rng),
        None => pick_uniform(rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tipline_core::{ProjectKind, category_of};

    fn repo_after_git() -> ContextFacts {
        ContextFacts {
            in_repo_directory: true,
            recent_command: Some(CommandCategory::VersionControl),
            ..ContextFacts::default()
        }
    }

    #[test]
    fn default_weights_are_one() {
        let table = WeightTable::from_facts(&ContextFacts::default());
        for category in Category::ALL {
            assert_eq!(table.weight(category), 1.0);
            assert_eq!(table.repetitions(category), 1);
        }
        assert_eq!(table.pool().len(), all_tips().count());
    }

    #[test]
    fn repo_and_recent_git_compound_to_six() {
        let table = WeightTable::from_facts(&repo_after_git());
        assert_eq!(table.weight(Category::VersionControl), 6.0);
        assert_eq!(table.weight(Category::OsTips), 1.0);
    }

    #[test]
    fn repo_alone_is_three() {
        let facts = ContextFacts {
            in_repo_directory: true,
            ..ContextFacts::default()
        };
        assert_eq!(WeightTable::from_facts(&facts).weight(Category::VersionControl), 3.0);
    }

    #[test]
    fn container_command_boosts_os_tips_but_truncates_to_one_copy() {
        let facts = ContextFacts {
            recent_command: Some(CommandCategory::Container),
            ..ContextFacts::default()
        };
        let table = WeightTable::from_facts(&facts);
        assert_eq!(table.weight(Category::OsTips), 1.5);
        assert_eq!(table.repetitions(Category::OsTips), 1);
    }

    #[test]
    fn project_kinds_do_not_change_weights() {
        let mut facts = ContextFacts::default();
        facts.project_kinds.insert(ProjectKind::PythonLike);
        facts.project_kinds.insert(ProjectKind::ContainerLike);
        assert_eq!(WeightTable::from_facts(&facts), WeightTable::default());
    }

    #[test]
    fn fractional_weight_delists_category() {
        let mut table = WeightTable::default();
        table.scale(Category::AssistantTips, 0.5);
        assert_eq!(table.repetitions(Category::AssistantTips), 0);
        let pool = table.pool();
        assert!(
            Category::AssistantTips
                .tips()
                .iter()
                .all(|tip| !pool.contains(tip))
        );
    }

    #[test]
    fn empty_pool_falls_back_to_uniform() {
        let mut table = WeightTable::default();
        for category in Category::ALL {
            table.scale(category, 0.0);
        }
        assert!(table.pool().is_empty());

        let mut rng = StdRng::seed_from_u64(1);
        let tip = pick_uniform(&mut rng);
        assert!(category_of(tip).is_some());
    }

    #[test]
    fn every_draw_comes_from_the_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        let contexts = [ContextFacts::default(), repo_after_git()];
        for facts in &contexts {
            for _ in 0..200 {
                let tip = select_tip(Some(facts), &mut rng);
                assert!(!tip.trim().is_empty());
                assert!(category_of(tip).is_some(), "unknown tip {tip:?}");
            }
        }
        for _ in 0..200 {
            assert!(category_of(select_tip(None, &mut rng)).is_some());
        }
    }

    #[test]
    fn version_control_frequency_converges_to_six_times_baseline() {
        let mut rng = StdRng::seed_from_u64(42);
        let facts = repo_after_git();
        let draws = 20_000;

        let vcs_hits = (0..draws)
            .filter(|_| category_of(pick_weighted(&facts, &mut rng)) == Some(Category::VersionControl))
            .count();
        let other_hits = draws - vcs_hits;

        let vcs_size = Category::VersionControl.tips().len() as f64;
        let other_size = (all_tips().count() as f64) - vcs_size;

        // per-tip hit rate ratio
        let ratio = (vcs_hits as f64 / vcs_size) / (other_hits as f64 / other_size);
        assert!(
            (5.0..7.0).contains(&ratio),
            "expected ~6x per-tip rate, got {ratio:.2}"
        );
    }
}
