use natops_perf::config::PolicyConfig;
use natops_perf::constants::FT_PER_NM;
use natops_perf::envelope::{
    EnvelopeError, EnvelopeRequest, EnvelopeStatus, PowerSetting, solve_envelope, weight_range,
};
use natops_perf::{Configuration, PerformanceEngine, PerformanceError};

fn engine() -> PerformanceEngine {
    PerformanceEngine::load("data").expect("bundled dataset")
}

fn policy(allow_ab: bool) -> PolicyConfig {
    let mut policy = PolicyConfig::default();
    policy.policy.allow_ab = allow_ab;
    policy
}

#[test]
fn clean_sixty_thousand_pounds_at_sea_level_derates() {
    let engine = engine();
    let request = EnvelopeRequest::new(60_000.0, 0.0, 0.25, Configuration::Clean);
    let result = engine.solver().solve(&request, &policy(true)).unwrap();

    assert_eq!(result.status, EnvelopeStatus::Normal);
    assert_eq!(result.floor_pct, 85.0);
    match result.setting {
        PowerSetting::Derate(pct) => assert!((85.0..100.0).contains(&pct)),
        other => panic!("expected a derate, got {other}"),
    }
    assert!(result.aeo_gradient_ft_nm >= 300.0);
    assert!(result.oei_gradient_ft_nm >= 200.0);
    assert_eq!(result.sweep_deg, 20.0);

    let mil = engine
        .deck()
        .evaluate(0.0, 0.25, PowerSetting::Mil)
        .unwrap()
        .thrust_lbf;
    assert_eq!(result.thrust_lbf, (mil * result.rpm_pct / 99.0).round());
}

#[test]
fn solver_never_starts_below_the_configuration_floor() {
    let engine = engine();
    for configuration in Configuration::ALL {
        let request = EnvelopeRequest::new(50_000.0, 0.0, 0.25, configuration);
        let result = engine.solve(&request).unwrap();
        let floor = engine.policy().floor_pct_for_configuration(configuration);
        assert_eq!(result.floor_pct, floor);
        for trial in &result.trials {
            if let PowerSetting::Derate(pct) = trial.setting {
                assert!(pct >= floor, "{configuration}: trial {pct} below floor {floor}");
            }
        }
        assert!(result.rpm_pct >= floor);
    }
}

#[test]
fn afterburner_is_never_used_when_forbidden() {
    let engine = engine();
    let request = EnvelopeRequest::new(70_000.0, 0.0, 0.2, Configuration::Full);
    let result = engine.solver().solve(&request, &policy(false)).unwrap();

    assert_eq!(result.status, EnvelopeStatus::Unsafe);
    assert!(!result.status.is_dispatchable());
    assert_eq!(result.setting, PowerSetting::Mil);
    assert!(result.trials.iter().all(|t| !t.setting.is_afterburner()));
    assert!(result.oei_gradient_ft_nm < 200.0);
}

#[test]
fn escalates_to_afterburner_when_permitted() {
    let engine = engine();
    let request = EnvelopeRequest::new(70_000.0, 0.0, 0.2, Configuration::Full);
    let result = engine.solver().solve(&request, &policy(true)).unwrap();

    assert_eq!(result.status, EnvelopeStatus::Escalated);
    assert_eq!(result.setting, PowerSetting::Afterburner);
    assert!(result.aeo_gradient_ft_nm >= 200.0);
    let last = result.trials.last().unwrap();
    assert!(last.setting.is_afterburner());
}

#[test]
fn weak_afterburner_result_is_unsafe() {
    let engine = engine();
    let mut policy = policy(true);
    policy.safety.ab_gradient_floor_ft_nm = 10_000.0;
    let request = EnvelopeRequest::new(70_000.0, 0.0, 0.2, Configuration::Full);
    let result = engine.solver().solve(&request, &policy).unwrap();
    assert_eq!(result.status, EnvelopeStatus::Unsafe);
    assert_eq!(result.setting, PowerSetting::Afterburner);
}

#[test]
fn floor_at_mil_collapses_the_ladder() {
    let engine = engine();
    let request = EnvelopeRequest::new(60_000.0, 0.0, 0.2, Configuration::Full);

    let mut no_ab = policy(false);
    no_ab.floors.insert(Configuration::Full, 99.0);
    let result = engine.solver().solve(&request, &no_ab).unwrap();
    assert_eq!(result.trials.len(), 1);
    assert_eq!(result.setting, PowerSetting::Mil);
    assert_eq!(result.status, EnvelopeStatus::Caution);

    let mut with_ab = no_ab.clone();
    with_ab.policy.allow_ab = true;
    let result = engine.solver().solve(&request, &with_ab).unwrap();
    assert_eq!(result.status, EnvelopeStatus::Normal);
}

#[test]
fn floor_above_mil_nominal_searches_up_to_full_rpm() {
    let engine = engine();
    let request = EnvelopeRequest::new(50_000.0, 0.0, 0.25, Configuration::Clean);

    let mut full_rpm = policy(false);
    full_rpm.floors.insert(Configuration::Clean, 100.0);
    let result = engine.solver().solve(&request, &full_rpm).unwrap();
    assert_eq!(result.floor_pct, 100.0);
    assert_eq!(result.setting, PowerSetting::Derate(100.0));
    assert_eq!(result.rpm_pct, 100.0);
    assert_eq!(result.status, EnvelopeStatus::Caution);
    assert_eq!(result.trials.len(), 1);

    let mut partial = policy(true);
    partial.floors.insert(Configuration::Clean, 99.5);
    let result = engine.solver().solve(&request, &partial).unwrap();
    assert_eq!(result.setting, PowerSetting::Derate(99.5));
    assert_eq!(result.status, EnvelopeStatus::Normal);

    let heavy = EnvelopeRequest::new(70_000.0, 0.0, 0.2, Configuration::Full);
    let mut full_flap = policy(false);
    full_flap.floors.insert(Configuration::Full, 100.0);
    let result = engine.solver().solve(&heavy, &full_flap).unwrap();
    assert!(result.rpm_pct >= 100.0);
    assert!(result.trials.iter().all(|t| t.rpm_pct >= 100.0));
    assert!(result.trials.iter().all(|t| !t.setting.is_afterburner()));
}

#[test]
fn fine_rpm_steps_keep_the_ladder_bounded() {
    let engine = engine();
    let mut fine = policy(false);
    fine.policy.rpm_step_pct = 0.1;
    let request = EnvelopeRequest::new(70_000.0, 0.0, 0.2, Configuration::Full);
    let result = engine.solver().solve(&request, &fine).unwrap();
    // 96.0 through 98.9 in tenths, then MIL.
    assert_eq!(result.trials.len(), 31);

    fine.policy.rpm_step_pct = 1e-4;
    assert!(matches!(
        engine.solver().solve(&request, &fine),
        Err(EnvelopeError::Policy(_))
    ));
}

#[test]
fn heavier_aircraft_never_needs_less_power() {
    let engine = engine();
    let policy = policy(true);
    let mil = engine.deck().mil_nominal_rpm_pct();
    for configuration in Configuration::ALL {
        let base = EnvelopeRequest::new(50_000.0, 0.0, 0.2, configuration);
        let results = natops_perf::envelope::sweep_weights(
            &engine.solver(),
            &base,
            &weight_range(50_000.0, 74_000.0, 2_000.0),
            &policy,
        )
        .unwrap();
        assert_eq!(results.len(), 13);
        for pair in results.windows(2) {
            assert!(
                pair[1].setting.escalation_rank(mil) >= pair[0].setting.escalation_rank(mil),
                "{configuration}: {} at {} then {} at {}",
                pair[0].setting,
                pair[0].request.weight_lbf,
                pair[1].setting,
                pair[1].request.weight_lbf
            );
        }
    }
}

#[test]
fn gradients_follow_thrust_minus_drag_over_weight() {
    let engine = engine();
    let request = EnvelopeRequest::new(65_000.0, 5_000.0, 0.25, Configuration::Maneuver);
    let result = engine.solve(&request).unwrap();
    for trial in &result.trials {
        let aeo = (trial.thrust_lbf - trial.drag_lbf) / 65_000.0 * FT_PER_NM;
        let oei = (0.5 * trial.thrust_lbf - trial.drag_lbf) / 65_000.0 * FT_PER_NM;
        assert!((trial.aeo_gradient_ft_nm - aeo).abs() < 1e-9);
        assert!((trial.oei_gradient_ft_nm - oei).abs() < 1e-9);
        assert!(trial.oei_gradient_ft_nm < trial.aeo_gradient_ft_nm);
    }
}

#[test]
fn derated_fuel_flow_respects_policy_bounds() {
    let engine = engine();
    let mut policy = policy(false);
    policy.fuel_flow.max_mil_ff_pph = Some(5_000.0);
    let request = EnvelopeRequest::new(60_000.0, 0.0, 0.25, Configuration::Clean);
    let result = engine.solver().solve(&request, &policy).unwrap();
    assert!(matches!(result.setting, PowerSetting::Derate(_)));
    assert_eq!(result.fuel_flow_pph, 5_000.0);
}

#[test]
fn explicit_sweep_overrides_the_schedule() {
    let engine = engine();
    let auto = EnvelopeRequest::new(45_000.0, 0.0, 0.3, Configuration::Clean);
    let swept = auto.with_sweep(55.0);
    let auto_result = engine.solve(&auto).unwrap();
    let swept_result = engine.solve(&swept).unwrap();
    assert_eq!(auto_result.sweep_deg, 20.0);
    assert_eq!(swept_result.sweep_deg, 55.0);
    assert!(swept_result.drag_lbf > auto_result.drag_lbf);
}

#[test]
fn one_shot_wrapper_matches_the_solver() {
    let engine = engine();
    let policy = engine.policy().clone();
    let wrapped = solve_envelope(
        engine.deck(),
        engine.aero(),
        60_000.0,
        0.0,
        0.25,
        Configuration::Clean,
        &policy,
    )
    .unwrap();
    let direct = engine
        .solve(&EnvelopeRequest::new(60_000.0, 0.0, 0.25, Configuration::Clean))
        .unwrap();
    assert_eq!(wrapped, direct);
}

#[test]
fn invalid_inputs_are_errors_not_statuses() {
    let engine = engine();
    let bad_weight = EnvelopeRequest::new(0.0, 0.0, 0.25, Configuration::Clean);
    assert!(matches!(
        engine.solve(&bad_weight),
        Err(PerformanceError::Envelope(EnvelopeError::InvalidCondition(_)))
    ));

    let mut stalled = policy(false);
    stalled.policy.rpm_step_pct = 0.0;
    let request = EnvelopeRequest::new(60_000.0, 0.0, 0.25, Configuration::Clean);
    assert!(matches!(
        engine.solver().solve(&request, &stalled),
        Err(EnvelopeError::Policy(_))
    ));
}

#[test]
fn auto_configuration_sweep_follows_the_flap_schedule() {
    let engine = engine().with_policy(policy(true));
    let base = EnvelopeRequest::new(50_000.0, 0.0, 0.2, Configuration::Clean);
    let results = engine
        .sweep(&base, &[50_000.0, 60_000.0, 70_000.0], true)
        .unwrap();
    let configurations: Vec<_> = results.iter().map(|r| r.request.configuration).collect();
    assert_eq!(
        configurations,
        vec![
            Configuration::Clean,
            Configuration::Maneuver,
            Configuration::Full
        ]
    );
}

#[test]
fn weight_range_is_inclusive() {
    assert_eq!(
        weight_range(50_000.0, 54_000.0, 2_000.0),
        vec![50_000.0, 52_000.0, 54_000.0]
    );
    assert_eq!(weight_range(50_000.0, 53_000.0, 2_000.0).len(), 2);
    assert!(weight_range(54_000.0, 50_000.0, 2_000.0).is_empty());
    assert!(weight_range(50_000.0, 54_000.0, 0.0).is_empty());
}
