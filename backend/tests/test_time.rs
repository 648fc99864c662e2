//! Tests for TimeManager

use wealth_simulator_core_rs::TimeManager;

#[test]
fn test_time_manager_new() {
    let time = TimeManager::new(50, 25);
    assert_eq!(time.current_tick(), 0);
    assert_eq!(time.remaining_ticks(), 50);
    assert!(!time.is_finished());
}

#[test]
fn test_advance_tick_returns_new_tick() {
    let mut time = TimeManager::new(50, 25);

    assert_eq!(time.advance_tick(), 1);
    assert_eq!(time.advance_tick(), 2);
    assert_eq!(time.current_tick(), 2);
    assert_eq!(time.remaining_ticks(), 48);
}

#[test]
fn test_tax_ticks_fall_on_interval_multiples() {
    let mut time = TimeManager::new(900, 300);
    let mut taxed = Vec::new();

    while !time.is_finished() {
        let tick = time.advance_tick();
        if time.is_tax_tick() {
            taxed.push(tick);
        }
    }

    assert_eq!(taxed, vec![300, 600, 900]);
}

#[test]
fn test_interval_of_one_taxes_every_tick() {
    let mut time = TimeManager::new(3, 1);
    for _ in 0..3 {
        time.advance_tick();
        assert!(time.is_tax_tick());
    }
    assert!(time.is_finished());
}

#[test]
fn test_finished_exactly_at_budget() {
    let mut time = TimeManager::new(2, 1);
    time.advance_tick();
    assert!(!time.is_finished());
    time.advance_tick();
    assert!(time.is_finished());
    assert_eq!(time.remaining_ticks(), 0);
}
