//! Parameters of the evolutionary loop, with presets sized by the number
//! of candidate sites.

use super::selection::Selection;
use crate::error::SolveError;

/// Genetic algorithm parameters.
///
/// Deserializes with every field optional, so a JSON config only needs the
/// keys it overrides. [`validate`](Self::validate) runs before any
/// population is built.
///
/// # Defaults
///
/// ```
/// use u_mclp::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 60);
/// assert_eq!(config.max_generations, 200);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_mclp::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::Tournament(5))
///     .with_elite_count(2)
///     .with_mutation_rate(0.1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GaConfig {
    /// Candidates per generation; at least 2.
    pub population_size: usize,

    pub max_generations: usize,

    pub selection: Selection,

    /// Candidates carried over unchanged each generation. Must stay below
    /// `population_size`.
    pub elite_count: usize,

    /// Chance that a parent pair is recombined; otherwise both parents are
    /// copied into the offspring.
    pub crossover_rate: f64,

    /// Mutation rate passed to [`GaProblem::mutate`](super::GaProblem::mutate)
    /// (0.0–1.0). For bit-vector problems this is the per-gene flip
    /// probability.
    pub mutation_rate: f64,

    /// Stop after this many generations without a covered-demand gain.
    /// 0 never stops early.
    pub plateau_patience: usize,

    /// A gain smaller than `convergence_threshold × |old best|` still counts
    /// as a stagnant generation. 0.0 accepts any gain.
    pub convergence_threshold: f64,

    /// Evaluate offspring on the rayon pool (needs the `parallel` feature).
    /// Results do not depend on it.
    pub parallel: bool,

    /// `None` draws a fresh seed per run.
    pub seed: Option<u64>,

    /// Checked between generations, so a run may overshoot by one
    /// generation. Also bounds exact search.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 60,
            max_generations: 200,
            selection: Selection::default(),
            elite_count: 1,
            crossover_rate: 0.9,
            mutation_rate: 0.05,
            plateau_patience: 40,
            convergence_threshold: 0.0,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    /// Clamped to `[0, 1]`.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_plateau_patience(mut self, generations: usize) -> Self {
        self.plateau_patience = generations;
        self
    }

    /// Negative values are raised to 0.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold.max(0.0);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Shorthand for `with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Small instances or interactive use: 30 candidates, 80 generations,
    /// patience 15, 2 s cap.
    pub fn fast() -> Self {
        Self {
            population_size: 30,
            max_generations: 80,
            plateau_patience: 15,
            time_limit_ms: Some(2_000),
            ..Self::default()
        }
    }

    /// Same population and horizon as the default, capped at 10 s.
    pub fn balanced() -> Self {
        Self {
            population_size: 60,
            max_generations: 200,
            plateau_patience: 40,
            time_limit_ms: Some(10_000),
            ..Self::default()
        }
    }

    /// Hundreds of candidate sites: 120 candidates, 500 generations,
    /// patience 80, 30 s cap.
    pub fn quality() -> Self {
        Self {
            population_size: 120,
            max_generations: 500,
            plateau_patience: 80,
            time_limit_ms: Some(30_000),
            ..Self::default()
        }
    }

    /// Picks [`fast`](Self::fast) below 50 candidate sites,
    /// [`balanced`](Self::balanced) below 200, [`quality`](Self::quality)
    /// otherwise.
    pub fn auto_select(site_count: usize) -> Self {
        if site_count < 50 {
            Self::fast()
        } else if site_count < 200 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`SolveError::InvalidConfig`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.population_size < 2 {
            return Err(invalid("population_size must be at least 2"));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations must be at least 1"));
        }
        if self.elite_count >= self.population_size {
            return Err(invalid("elite_count must be smaller than population_size"));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(invalid("crossover_rate must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid("mutation_rate must be within [0, 1]"));
        }
        if self.convergence_threshold.is_nan() || self.convergence_threshold < 0.0 {
            return Err(invalid("convergence_threshold must be non-negative"));
        }
        if let Selection::Tournament(0) = self.selection {
            return Err(invalid("tournament size must be at least 1"));
        }
        if self.time_limit_ms == Some(0) {
            return Err(invalid("time_limit_ms must be positive or None"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> SolveError {
    SolveError::InvalidConfig(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 60);
        assert_eq!(config.max_generations, 200);
        assert_eq!(config.selection, Selection::Tournament(3));
        assert_eq!(config.elite_count, 1);
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert_eq!(config.plateau_patience, 40);
        assert!((config.convergence_threshold - 0.0).abs() < 1e-15);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.time_limit_ms.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(200)
            .with_max_generations(1000)
            .with_selection(Selection::Rank)
            .with_elite_count(4)
            .with_crossover_rate(0.8)
            .with_mutation_rate(0.02)
            .with_plateau_patience(100)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 200);
        assert_eq!(config.max_generations, 1000);
        assert_eq!(config.selection, Selection::Rank);
        assert_eq!(config.elite_count, 4);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.02).abs() < 1e-10);
        assert_eq!(config.plateau_patience, 100);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert!(matches!(
            config.validate(),
            Err(SolveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = GaConfig::default().with_max_generations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_elite_too_high() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elite_count(10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_elites_allowed() {
        let config = GaConfig::default().with_elite_count(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rates_set_directly() {
        let mut config = GaConfig::default();
        config.mutation_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = GaConfig::default();
        config.crossover_rate = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_tournament() {
        let config = GaConfig::default().with_tournament_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0);

        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_zero_time_limit() {
        let config = GaConfig::default().with_time_limit_ms(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_convergence_threshold_clamps_negative() {
        let config = GaConfig::default().with_convergence_threshold(-0.5);
        assert!((config.convergence_threshold - 0.0).abs() < 1e-15);
    }

    // ---- Presets ----

    #[test]
    fn test_presets_validate() {
        for config in [GaConfig::fast(), GaConfig::balanced(), GaConfig::quality()] {
            assert!(config.validate().is_ok());
            assert!(config.time_limit_ms.is_some());
        }
    }

    #[test]
    fn test_preset_chainable() {
        let config = GaConfig::fast().with_population_size(75).with_seed(42);
        assert_eq!(config.population_size, 75);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.time_limit_ms, Some(2_000));
    }

    #[test]
    fn test_auto_select_boundaries() {
        assert_eq!(GaConfig::auto_select(49).population_size, 30);
        assert_eq!(GaConfig::auto_select(50).population_size, 60);
        assert_eq!(GaConfig::auto_select(199).population_size, 60);
        assert_eq!(GaConfig::auto_select(200).population_size, 120);
    }

    #[test]
    fn test_with_tournament_size() {
        let config = GaConfig::default().with_tournament_size(5);
        assert_eq!(config.selection, Selection::Tournament(5));
    }
}
