//! Request → validated instance → coverage → search → result.

use super::candidate::Candidate;
use super::config::{SolverConfig, Strategy};
use super::exact::BranchAndBound;
use super::problem::CoveringProblem;
use crate::coverage::build_coverage;
use crate::error::SolveError;
use crate::ga::{GaRunner, Individual, Termination};
use crate::model::{assemble, next_run_id, Instance, OptimizationRequest, OptimizationResult};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;

/// Why a solve stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The request had no candidate facilities.
    NoCandidates,
    /// Exact search explored the whole tree; the result is optimal.
    Exhausted,
    /// The GA ran all configured generations.
    MaxGenerations,
    /// The GA best fitness stopped improving.
    Plateau,
    /// The caller raised the cancellation flag.
    Cancelled,
    /// The wall-clock limit was reached.
    TimeLimit,
}

impl From<Termination> for StopReason {
    fn from(t: Termination) -> Self {
        match t {
            Termination::MaxGenerations => StopReason::MaxGenerations,
            Termination::Plateau => StopReason::Plateau,
            Termination::Cancelled => StopReason::Cancelled,
            Termination::TimeLimit => StopReason::TimeLimit,
        }
    }
}

/// The response plus diagnostics about how it was obtained.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// The response contract.
    pub result: OptimizationResult,
    /// Engine that produced the result ([`Strategy::Auto`] is resolved).
    /// `None` when no engine ran because there were no candidates.
    pub strategy: Option<Strategy>,
    /// Why the search stopped.
    pub stop: StopReason,
    /// GA generations executed (0 for exact search).
    pub generations: usize,
    /// Fitness evaluations (GA) or search-tree nodes (exact).
    pub evaluations: u64,
    /// Seed of the GA generator, if the GA ran.
    pub seed: Option<u64>,
    /// Wall-clock time spent after validation.
    pub elapsed: Duration,
    /// Set to [`SolveError::DegenerateInput`] when the request had nothing
    /// to optimize.
    pub notice: Option<SolveError>,
}

/// Maximal Covering Location solver.
///
/// Holds only configuration; every call to [`solve`](Solver::solve) builds
/// its own coverage matrix, population and generator, so one `Solver` can
/// serve concurrent requests from several threads.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

struct Search {
    best: Candidate,
    trajectory: Vec<f64>,
    stop: StopReason,
    generations: usize,
    evaluations: u64,
    seed: Option<u64>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves a request under a fresh run id.
    ///
    /// # Errors
    ///
    /// Input shape/range errors, [`SolveError::InvalidConfig`], or
    /// [`SolveError::SolverInternal`]. Empty `facilities` is not an error.
    pub fn solve(&self, request: &OptimizationRequest) -> Result<SolveReport, SolveError> {
        self.solve_with(request, next_run_id(), None)
    }

    /// Solves a request under `run_id`, stopping early if `cancel` is raised.
    ///
    /// Validation runs to completion before anything else is allocated.
    #[instrument(
        skip_all,
        fields(
            run_id = run_id,
            points = request.points.len(),
            facilities = request.facilities.len()
        )
    )]
    pub fn solve_with(
        &self,
        request: &OptimizationRequest,
        run_id: u64,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SolveReport, SolveError> {
        self.config.validate()?;
        let instance = request.validate().inspect_err(|err| {
            tracing::info!(%err, "request rejected");
        })?;

        let started = Instant::now();

        if instance.facilities().is_empty() {
            tracing::warn!("request has no candidate facilities");
            return Ok(SolveReport {
                result: assemble(&Candidate::empty(0), vec![0.0], &[], run_id),
                strategy: None,
                stop: StopReason::NoCandidates,
                generations: 0,
                evaluations: 0,
                seed: None,
                elapsed: started.elapsed(),
                notice: Some(SolveError::DegenerateInput(
                    "facilities is empty; nothing to open".into(),
                )),
            });
        }

        if !instance.total_demand().is_finite() {
            return Err(SolveError::SolverInternal(
                "total demand overflows f64".into(),
            ));
        }

        let strategy = self
            .config
            .resolve_strategy(instance.facilities().len(), instance.effective_budget());
        tracing::debug!(?strategy, budget = instance.max_facilities(), "search starting");

        let search = match strategy {
            Strategy::Exact => self.run_exact(&instance, started, cancel)?,
            Strategy::Genetic | Strategy::Auto => self.run_genetic(&instance, cancel)?,
        };

        check_invariants(&search.best, &instance)?;

        let result = assemble(&search.best, search.trajectory, instance.facilities(), run_id);
        let elapsed = started.elapsed();

        tracing::info!(
            fitness = result.fitness,
            open = result.solution.len(),
            stop = ?search.stop,
            elapsed_ms = elapsed.as_millis() as u64,
            "solve finished"
        );

        Ok(SolveReport {
            result,
            strategy: Some(strategy),
            stop: search.stop,
            generations: search.generations,
            evaluations: search.evaluations,
            seed: search.seed,
            elapsed,
            notice: None,
        })
    }

    fn run_exact(
        &self,
        instance: &Instance,
        started: Instant,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Search, SolveError> {
        let coverage = build_coverage(
            instance.points(),
            instance.demands(),
            instance.facilities(),
            instance.coverage_radius(),
        )?;
        let deadline = self
            .config
            .ga
            .time_limit_ms
            .map(|ms| started + Duration::from_millis(ms));

        let outcome = BranchAndBound::new(&coverage, instance.demands(), instance.max_facilities())
            .with_deadline(deadline)
            .with_cancel(cancel.as_deref())
            .solve();

        let fitness = outcome.best.fitness();
        Ok(Search {
            best: outcome.best,
            trajectory: vec![fitness],
            stop: outcome
                .interrupted
                .map_or(StopReason::Exhausted, StopReason::from),
            generations: 0,
            evaluations: outcome.nodes,
            seed: None,
        })
    }

    fn run_genetic(
        &self,
        instance: &Instance,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Search, SolveError> {
        let coverage = build_coverage(
            instance.points(),
            instance.demands(),
            instance.facilities(),
            instance.coverage_radius(),
        )?;
        let problem = CoveringProblem::new(
            &coverage,
            instance.demands(),
            instance.max_facilities(),
            self.config.repair,
        );

        let outcome = GaRunner::run_with_cancel(&problem, &self.config.ga, cancel)?;
        let mut best = outcome.best;
        let mut trajectory = outcome.fitness_history;

        if self.config.polish && problem.polish(&mut best) {
            tracing::debug!(
                from = trajectory.last().copied(),
                to = best.fitness(),
                "local search improved the ga best"
            );
            trajectory.push(best.fitness());
        }

        Ok(Search {
            best,
            trajectory,
            stop: outcome.termination.into(),
            generations: outcome.generations,
            evaluations: outcome.evaluations as u64,
            seed: Some(outcome.seed),
        })
    }
}

fn check_invariants(best: &Candidate, instance: &Instance) -> Result<(), SolveError> {
    if best.open_count() > instance.max_facilities() {
        return Err(SolveError::SolverInternal(format!(
            "best candidate opens {} facilities, budget is {}",
            best.open_count(),
            instance.max_facilities()
        )));
    }
    if !best.fitness().is_finite() {
        return Err(SolveError::SolverInternal(format!(
            "best candidate has non-finite fitness {}",
            best.fitness()
        )));
    }
    Ok(())
}

/// Solves a request with the default configuration.
///
/// ```
/// use u_mclp::{solve, OptimizationRequest};
///
/// let request = OptimizationRequest::new(
///     vec![(0.0, 0.0), (1.0, 0.0), (5.0, 5.0)],
///     vec![1.0, 2.0, 3.0],
///     vec![0, 1, 2],
///     1,
///     1.5,
/// );
/// let result = solve(&request).unwrap();
/// assert_eq!(result.solution, vec![0]);
/// assert_eq!(result.fitness, 3.0);
/// ```
pub fn solve(request: &OptimizationRequest) -> Result<OptimizationResult, SolveError> {
    Solver::default().solve(request).map(|report| report.result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::GaConfig;
    use crate::mclp::RepairStrategy;

    fn scenario() -> OptimizationRequest {
        OptimizationRequest::new(
            vec![(0.0, 0.0), (1.0, 0.0), (5.0, 5.0)],
            vec![1.0, 2.0, 3.0],
            vec![0, 1, 2],
            1,
            1.5,
        )
    }

    fn genetic(seed: u64) -> Solver {
        Solver::new(
            SolverConfig::default()
                .with_strategy(Strategy::Genetic)
                .with_ga(GaConfig::default().with_seed(seed).with_parallel(false)),
        )
    }

    #[test]
    fn test_scenario_exact() {
        let solver = Solver::new(SolverConfig::default().with_strategy(Strategy::Exact));
        let report = solver.solve(&scenario()).unwrap();

        assert_eq!(report.strategy, Some(Strategy::Exact));
        assert_eq!(report.stop, StopReason::Exhausted);
        assert_eq!(report.result.solution, vec![0]);
        assert_eq!(report.result.fitness, 3.0);
        assert_eq!(report.result.target, vec![3.0]);
        assert!(report.notice.is_none());
    }

    #[test]
    fn test_scenario_genetic() {
        let report = genetic(42).solve(&scenario()).unwrap();

        assert_eq!(report.strategy, Some(Strategy::Genetic));
        assert_eq!(report.result.solution, vec![0]);
        assert_eq!(report.result.fitness, 3.0);
        assert_eq!(report.seed, Some(42));
        assert!(report.result.target.len() >= report.generations + 1);
    }

    #[test]
    fn test_auto_uses_exact_for_small() {
        let report = Solver::default().solve(&scenario()).unwrap();
        assert_eq!(report.strategy, Some(Strategy::Exact));
    }

    #[test]
    fn test_degenerate_request() {
        let mut req = scenario();
        req.facilities.clear();
        let report = genetic(1).solve(&req).unwrap();

        assert!(report.result.solution.is_empty());
        assert_eq!(report.result.fitness, 0.0);
        assert_eq!(report.stop, StopReason::NoCandidates);
        assert_eq!(report.strategy, None);
        assert!(matches!(
            report.notice,
            Some(SolveError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_validation_errors_surface() {
        let mut req = scenario();
        req.max_facilities = 0;
        assert!(matches!(
            Solver::default().solve(&req),
            Err(SolveError::InputRange(_))
        ));

        let mut req = scenario();
        req.facilities = vec![0, 0];
        assert!(matches!(
            Solver::default().solve(&req),
            Err(SolveError::InputShape(_))
        ));
    }

    #[test]
    fn test_invalid_config() {
        let solver = Solver::new(
            SolverConfig::default().with_ga(GaConfig::default().with_population_size(0)),
        );
        assert!(matches!(
            solver.solve(&scenario()),
            Err(SolveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_demand_overflow_is_internal() {
        let req = OptimizationRequest::new(
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![f64::MAX, f64::MAX],
            vec![0, 1],
            1,
            1.0,
        );
        let err = Solver::default().solve(&req).unwrap_err();
        assert!(matches!(err, SolveError::SolverInternal(_)));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn test_radius_zero_coincident() {
        let req = OptimizationRequest::new(
            vec![(2.0, 2.0), (2.0, 2.1), (9.0, 9.0)],
            vec![5.0, 7.0, 1.0],
            vec![0],
            1,
            0.0,
        );
        let result = solve(&req).unwrap();
        assert_eq!(result.solution, vec![0]);
        assert_eq!(result.fitness, 5.0);
    }

    #[test]
    fn test_genetic_with_least_marginal_repair() {
        let solver = Solver::new(
            SolverConfig::default()
                .with_strategy(Strategy::Genetic)
                .with_repair(RepairStrategy::DropLeastMarginal)
                .with_ga(GaConfig::default().with_seed(3).with_parallel(false)),
        );
        let report = solver.solve(&scenario()).unwrap();
        assert_eq!(report.result.solution, vec![0]);
    }

    #[test]
    fn test_cancelled_genetic_returns_initial_best() {
        let flag = Arc::new(AtomicBool::new(true));
        let report = genetic(8).solve_with(&scenario(), 99, Some(flag)).unwrap();

        assert_eq!(report.stop, StopReason::Cancelled);
        assert_eq!(report.result.id, 99);
        assert_eq!(report.generations, 0);
        assert_eq!(report.result.target.len(), 1);
        assert!(report.result.solution.len() <= 1);
    }

    #[test]
    fn test_genetic_never_below_greedy() {
        // Sites every unit along a line; each covers its neighbours.
        let n = 40;
        let points: Vec<(f64, f64)> = (0..n).map(|i| (i as f64, 0.0)).collect();
        let demands: Vec<f64> = (0..n).map(|i| ((i * 7) % 5 + 1) as f64).collect();
        let facilities: Vec<i64> = (0..n as i64).collect();

        for k in [3usize, 6, 9] {
            let req = OptimizationRequest::new(
                points.clone(),
                demands.clone(),
                facilities.clone(),
                k as i64,
                1.0,
            );
            let instance = req.validate().unwrap();
            let coverage = build_coverage(
                instance.points(),
                instance.demands(),
                instance.facilities(),
                1.0,
            )
            .unwrap();
            let greedy = CoveringProblem::new(
                &coverage,
                instance.demands(),
                k,
                RepairStrategy::DropHighest,
            )
            .greedy();

            let report = genetic(11).solve(&req).unwrap();
            assert!(report.result.fitness >= greedy.fitness());
            assert!(report.result.solution.len() <= k);
        }
    }

    #[test]
    fn test_polish_disabled_keeps_ga_trajectory() {
        let solver = Solver::new(
            SolverConfig::default()
                .with_strategy(Strategy::Genetic)
                .with_polish(false)
                .with_ga(GaConfig::default().with_seed(5).with_parallel(false)),
        );
        let report = solver.solve(&scenario()).unwrap();
        assert_eq!(report.result.target.len(), report.generations + 1);
    }

    mod span {
        use super::*;
        use std::sync::Mutex;
        use tracing::field::{Field, Visit};
        use tracing::span::{Attributes, Id, Record};
        use tracing::{Event, Metadata, Subscriber};

        struct RunIdCapture(Arc<Mutex<Option<u64>>>);

        struct RunIdVisitor<'a>(&'a Mutex<Option<u64>>);

        impl Visit for RunIdVisitor<'_> {
            fn record_u64(&mut self, field: &Field, value: u64) {
                if field.name() == "run_id" {
                    *self.0.lock().unwrap() = Some(value);
                }
            }

            fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
        }

        impl Subscriber for RunIdCapture {
            fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
                true
            }

            fn new_span(&self, span: &Attributes<'_>) -> Id {
                span.record(&mut RunIdVisitor(&self.0));
                Id::from_u64(1)
            }

            fn record(&self, _span: &Id, _values: &Record<'_>) {}

            fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

            fn event(&self, _event: &Event<'_>) {}

            fn enter(&self, _span: &Id) {}

            fn exit(&self, _span: &Id) {}
        }

        #[test]
        fn test_solve_span_carries_run_id() {
            let seen = Arc::new(Mutex::new(None));
            let subscriber = RunIdCapture(Arc::clone(&seen));

            tracing::subscriber::with_default(subscriber, || {
                Solver::default()
                    .solve_with(&scenario(), 4242, None)
                    .unwrap();
            });

            assert_eq!(*seen.lock().unwrap(), Some(4242));
        }
    }
}
