use regbus_sim::SimError;

use super::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn all_maps() -> Vec<PinMap> {
    PinMap::preset_names()
        .into_iter()
        .map(|name| PinMap::preset(name).unwrap())
        .collect()
}

#[test]
fn fixed_scenarios_pass_on_every_preset() {
    init_logger();
    for map in all_maps() {
        run(Scenario::RoundTrip, map).unwrap();
        run(Scenario::Independent, map).unwrap();
        run(Scenario::Priority, map).unwrap();
    }
}

#[test]
fn driver_uses_full_field_width() {
    init_logger();
    let map = PinMap::preset("wide3").unwrap();
    let driver = reset_driver(map).unwrap();
    assert_eq!(driver.device().controller().store().len(), 8);
    assert!(!driver.done());
}

#[test]
fn soak_is_deterministic_per_seed() {
    init_logger();
    let map = PinMap::default();
    let first = run_soak(map, 7, 300).unwrap();
    let second = run_soak(map, 7, 300).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.writes + first.reads + first.resets, 300);
    assert!(first.writes > 0 && first.reads > 0);
}

#[test]
fn soak_passes_on_every_preset() {
    init_logger();
    for (seed, map) in all_maps().into_iter().enumerate() {
        run(
            Scenario::Soak {
                seed: seed as u64,
                transactions: 200,
            },
            map,
        )
        .unwrap();
    }
}

#[test]
fn bundled_script_runs() {
    init_logger();
    let report = run_script_text(PinMap::default(), DEFAULT_SCRIPT).unwrap();
    assert!(report.transactions >= 5);
    assert!(report.checks >= 3);
}

#[test]
fn script_failure_reaches_the_caller() {
    init_logger();
    let err = run(
        Scenario::Script("write 1 0x10\nread 1 expect 0x11\n".to_string()),
        PinMap::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<SimError>(),
        Some(&SimError::Mismatch {
            addr: 1,
            expected: 0x11,
            actual: 0x10,
        })
    );
}

#[test]
fn malformed_script_is_rejected_before_running() {
    init_logger();
    let err = run(Scenario::Script("write".to_string()), PinMap::default()).unwrap_err();
    assert!(err.to_string().starts_with("line 1:"), "{err}");
}
