//! End-to-end rostering tests
//!
//! Every scenario runs against each backend compiled into this build.

use nurse_roster::infrastructure::{run_generate, run_solve, tables, RosterConfig};
use nurse_roster::{
    CoverageRequirement, Day, GeneratorConfig, ModelBuilder, Nurse, Preference, PreferenceType,
    RosterError, RosterInput, RosterService, RunError, ScenarioGenerator, Shift, SkillLevel,
    SolverBackend, SolverConfig, SolverFactory,
};
use std::path::PathBuf;

const EPS: f64 = 1e-6;

fn backends() -> Vec<SolverBackend> {
    let backends = SolverFactory::available_backends();
    assert!(!backends.is_empty(), "no solver backend compiled in");
    backends
}

fn service(backend: SolverBackend) -> RosterService {
    let config = SolverConfig::default()
        .with_backend(backend)
        .with_time_limit(30.0)
        .with_threads(2);
    RosterService::from_config(config).unwrap()
}

/// N1 senior, N2 junior, N3 icu; Monday morning needs two nurses, one senior-like
fn small_input(preferences: Vec<Preference>) -> RosterInput {
    RosterInput::new(
        vec![
            Nurse::new(1, "N1", SkillLevel::Senior),
            Nurse::new(2, "N2", SkillLevel::Junior),
            Nurse::new(3, "N3", SkillLevel::Icu),
        ],
        vec![CoverageRequirement::new(Day::Mon, Shift::Morning, 2).with_senior(1)],
        preferences,
    )
}

/// Fresh scratch directory under the system temp dir
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "nurse-roster-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

// ============ Small instances ============

#[test]
fn test_minimal_coverage_with_senior() {
    for backend in backends() {
        let input = small_input(vec![]);
        let solution = service(backend).solve(&input).unwrap();

        let assigned: Vec<_> = solution.schedule.assigned().collect();
        assert!(assigned.len() >= 2, "{}", backend);
        assert!(assigned.iter().any(|r| r.skill_level.is_senior_like()));
        assert!(solution.objective.abs() < EPS);
        assert!(solution.violated_preferences.is_empty());
        assert!(solution.schedule.violations(&input).is_empty());
    }
}

#[test]
fn test_want_preference_is_honoured() {
    for backend in backends() {
        let input = small_input(vec![Preference::want(2, Day::Mon, Shift::Morning, 3)]);
        let solution = service(backend).solve(&input).unwrap();

        assert!(solution.schedule.is_assigned(2, Day::Mon, Shift::Morning), "{}", backend);
        assert!(solution
            .schedule
            .assigned()
            .any(|r| r.skill_level.is_senior_like()));
        assert!(solution.objective.abs() < EPS);
    }
}

#[test]
fn test_unavoidable_avoid_preference_costs_its_weight() {
    for backend in backends() {
        // one senior-like nurse has to work, the cheaper avoid is broken
        let input = small_input(vec![
            Preference::avoid(1, Day::Mon, Shift::Morning, 2),
            Preference::avoid(3, Day::Mon, Shift::Morning, 3),
        ]);
        let solution = service(backend).solve(&input).unwrap();

        assert!(solution.schedule.is_assigned(1, Day::Mon, Shift::Morning), "{}", backend);
        assert!(!solution.schedule.is_assigned(3, Day::Mon, Shift::Morning));
        assert!((solution.objective - 2.0).abs() < EPS);
        assert_eq!(
            solution.violated_preferences,
            vec![Preference::avoid(1, Day::Mon, Shift::Morning, 2)]
        );
    }
}

#[test]
fn test_penalty_variables_track_assignments() {
    let input = small_input(vec![
        Preference::want(3, Day::Mon, Shift::Morning, 1),
        Preference::avoid(2, Day::Mon, Shift::Morning, 4),
        Preference::want(2, Day::Mon, Shift::Morning, 2),
    ]);
    let model = ModelBuilder::new(&input).build();

    for backend in backends() {
        let solver = SolverFactory::create_from_backend(backend).unwrap();
        let solution = solver.solve(&model.problem).unwrap();
        assert!(solution.is_feasible(), "{}", backend);

        let values = &solution.variable_values;
        for penalty in &model.penalties {
            let x = values[penalty.assignment];
            let p = values[penalty.variable];
            match penalty.preference.preference_type {
                PreferenceType::Avoid => assert!((p - x).abs() < EPS),
                PreferenceType::Want => assert!((p + x - 1.0).abs() < EPS),
            }
        }
        // N2 wants and avoids the same slot, so one of the two is always paid
        let objective = model.problem.objective_value(values);
        assert!((objective - 2.0).abs() < EPS, "{}: {}", backend, objective);
    }
}

#[test]
fn test_total_above_headcount_is_infeasible() {
    for backend in backends() {
        let input = RosterInput::new(
            vec![
                Nurse::new(1, "N1", SkillLevel::Senior),
                Nurse::new(2, "N2", SkillLevel::Junior),
            ],
            vec![CoverageRequirement::new(Day::Tue, Shift::Night, 3)],
            vec![],
        );
        let err = service(backend).solve(&input).unwrap_err();
        assert!(
            matches!(err, RosterError::NoFeasibleSolution { .. }),
            "{}: {}",
            backend,
            err
        );
    }
}

#[test]
fn test_solving_twice_gives_same_objective() {
    for backend in backends() {
        let input = small_input(vec![
            Preference::avoid(1, Day::Mon, Shift::Morning, 5),
            Preference::want(3, Day::Mon, Shift::Morning, 1),
        ]);
        let first = service(backend).solve(&input).unwrap();
        let second = service(backend).solve(&input).unwrap();
        assert!((first.objective - second.objective).abs() < EPS);
        assert_eq!(first.summary, second.summary);
    }
}

// ============ Generated scenarios ============

#[test]
fn test_generated_week_has_no_violations() {
    let mut scenario = ScenarioGenerator::new(GeneratorConfig {
        nurse_count: 24,
        seed: 5,
        ..GeneratorConfig::default()
    })
    .generate();
    // enough icu and senior staff for every tier minimum
    for nurse in scenario.nurses.iter_mut().take(3) {
        nurse.skill_level = SkillLevel::Icu;
    }
    for nurse in scenario.nurses.iter_mut().skip(3).take(3) {
        nurse.skill_level = SkillLevel::Senior;
    }
    let input = scenario.into_input();

    for backend in backends() {
        let solution = service(backend).solve(&input).unwrap();
        assert!(solution.schedule.violations(&input).is_empty(), "{}", backend);
        assert_eq!(solution.coverage.len(), 21);
        for slot in &solution.coverage {
            assert!(slot.assigned >= slot.required_total.unwrap_or(0));
        }
        let stats = solution.schedule.stats().unwrap();
        let working = solution
            .schedule
            .shifts_per_nurse()
            .iter()
            .filter(|&&(_, c)| c > 0)
            .count();
        assert_eq!(stats.count, working);
        assert!(stats.min >= 1.0);
        assert!(stats.max <= 7.0);
    }
}

// ============ Pipeline ============

#[test]
fn test_pipeline_writes_solution() {
    let backend = backends()[0];
    let mut config = RosterConfig::default();
    config.data_dir = scratch_dir("pipeline");
    config.scenario.nurse_count = 30;
    config.scenario.seed = 9;
    config.solver = config.solver.with_backend(backend).with_time_limit(30.0);

    let mut scenario = run_generate(&config).unwrap();
    for nurse in scenario.nurses.iter_mut().take(4) {
        nurse.skill_level = SkillLevel::Icu;
    }
    tables::save_scenario(&config.data_dir, &scenario).unwrap();

    let solution = run_solve(&config).unwrap();
    let written = tables::load_schedule(&config.solution_path()).unwrap();
    assert_eq!(written, solution.schedule);
    assert_eq!(written.rows().len(), 30 * 7 * 3);

    let _ = std::fs::remove_dir_all(&config.data_dir);
}

#[test]
fn test_infeasible_run_writes_no_solution() {
    let backend = backends()[0];
    let mut config = RosterConfig::default();
    config.data_dir = scratch_dir("infeasible");
    config.solver = config.solver.with_backend(backend).with_time_limit(10.0);

    let scenario = nurse_roster::Scenario {
        nurses: vec![
            Nurse::new(0, "Nurse_1", SkillLevel::Junior),
            Nurse::new(1, "Nurse_2", SkillLevel::Junior),
        ],
        coverage: vec![CoverageRequirement::new(Day::Wed, Shift::Afternoon, 2).with_senior(1)],
        preferences: vec![],
    };
    tables::save_scenario(&config.data_dir, &scenario).unwrap();

    let err = run_solve(&config).unwrap_err();
    assert!(matches!(
        err,
        RunError::Roster(RosterError::NoFeasibleSolution { .. })
    ));
    assert!(!config.solution_path().exists());

    let _ = std::fs::remove_dir_all(&config.data_dir);
}
