//! Behaviour of the timer registry as seen by instrumented code
//!
//! Covers the start/stop rules for both addressing modes, report formatting
//! and the stub variants.

use splits_core::{
    AddressingMode, BufferSink, Instrument, ManualClock, StubTimer, TimerError, TimerRegistry,
    create_stub, create_timer,
};
use std::sync::Once;
use std::thread;
use std::time::Duration;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "splits_core=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

fn manual_registry() -> (TimerRegistry<ManualClock>, ManualClock) {
    init_tracing();
    let clock = ManualClock::new();
    (TimerRegistry::with_clock(clock.clone()), clock)
}

#[test]
fn test_sequential_round_trip_with_real_clock() -> anyhow::Result<()> {
    init_tracing();
    let mut timers = TimerRegistry::new();

    for _ in 0..3 {
        timers.start("sleep")?;
        thread::sleep(Duration::from_millis(15));
        timers.stop("sleep")?;
    }

    let summaries = timers.summaries();
    let summary = &summaries[0];
    assert_eq!(summary.count, 3);
    assert_eq!(summary.running, 0);
    assert!(summary.total_ms >= 45, "total was {}ms", summary.total_ms);
    assert!(timers.report().contains("*   sleep: 3 x "));
    Ok(())
}

#[test]
fn test_keyed_round_trip() -> anyhow::Result<()> {
    let (mut timers, clock) = manual_registry();

    timers.start_id("request", "id1")?;
    clock.advance_ms(10);
    timers.stop_id("request", "id1")?;
    timers.start_id("request", "id2")?;
    clock.advance_ms(20);
    timers.stop_id("request", "id2")?;

    assert_eq!(timers.summaries()[0].count, 2);
    assert_eq!(timers.report(), "TIMER RESULTS:\n*   request: 2 x 15ms = 30ms\n");
    Ok(())
}

#[test]
fn test_overlapping_ids() -> anyhow::Result<()> {
    let (mut timers, clock) = manual_registry();

    timers.start_id("download", "a")?;
    clock.advance_ms(100);
    timers.start_id("download", "b")?;
    clock.advance_ms(50);
    timers.stop_id("download", "a")?;
    clock.advance_ms(25);
    timers.stop_id("download", "b")?;

    assert_eq!(timers.elapsed_id("download", "a"), Some(Duration::from_millis(150)));
    assert_eq!(timers.elapsed_id("download", "b"), Some(Duration::from_millis(75)));
    assert!(timers.report().contains("*   download: 2 x 113ms = 225ms"));
    Ok(())
}

#[test]
fn test_mode_is_fixed_by_first_start() {
    let (mut timers, _clock) = manual_registry();

    timers.start("k").unwrap();
    let err = timers.start_id("k", "req-7").unwrap_err();
    assert_eq!(err.id(), Some("req-7"));
    assert!(err.to_string().contains("id [req-7]"));
    assert_eq!(
        err,
        TimerError::ModeConflict {
            key: "k".to_string(),
            id: Some("req-7".to_string()),
            established: AddressingMode::Sequential,
            attempted: AddressingMode::Keyed,
        }
    );

    timers.start_id("j", "id").unwrap();
    let err = timers.start("j").unwrap_err();
    assert_eq!(err.kind(), "mode_conflict");
    assert_eq!(err.id(), None);
    assert_eq!(timers.mode("j"), Some(AddressingMode::Keyed));
}

#[test]
fn test_double_start_is_rejected() {
    let (mut timers, _clock) = manual_registry();

    timers.start("k").unwrap();
    let err = timers.start("k").unwrap_err();
    assert!(matches!(err, TimerError::UnstoppedTimer { ref key, id: None } if key == "k"));

    timers.start_id("k2", "a").unwrap();
    timers.stop_id("k2", "a").unwrap();
    let err = timers.start_id("k2", "a").unwrap_err();
    assert_eq!(err, TimerError::DuplicateId { key: "k2".to_string(), id: "a".to_string() });

    timers.start_id("k3", "a").unwrap();
    let err = timers.start_id("k3", "a").unwrap_err();
    assert_eq!(err.kind(), "unstopped_timer");
    assert_eq!(err.id(), Some("a"));
}

#[test]
fn test_stop_without_start_is_rejected() {
    let (mut timers, _clock) = manual_registry();

    assert_eq!(timers.stop("k").unwrap_err(), TimerError::not_started("k", None));
    assert_eq!(timers.stop_id("k", "a").unwrap_err(), TimerError::not_started("k", Some("a")));

    timers.start("k").unwrap();
    timers.stop("k").unwrap();
    assert_eq!(timers.stop("k").unwrap_err().kind(), "not_started");

    timers.start_id("j", "a").unwrap();
    timers.stop_id("j", "a").unwrap();
    assert_eq!(timers.stop_id("j", "a").unwrap_err().kind(), "not_started");
    assert_eq!(timers.stop_id("j", "b").unwrap_err().kind(), "not_started");

    // wrong mode on stop reports a missing interval
    assert_eq!(timers.stop("j").unwrap_err().kind(), "not_started");
    assert_eq!(timers.stop_id("k", "a").unwrap_err().kind(), "not_started");
}

#[test]
fn test_sequential_restart_after_stop() -> anyhow::Result<()> {
    let (mut timers, clock) = manual_registry();

    timers.start("step")?;
    clock.advance_ms(1);
    timers.stop("step")?.start("step")?;
    assert!(timers.is_running("step"));
    assert_eq!(timers.intervals("step").map(|intervals| intervals.len()), Some(2));
    Ok(())
}

#[test]
fn test_report_is_idempotent() -> anyhow::Result<()> {
    let (mut timers, clock) = manual_registry();
    timers.start("a")?;
    clock.advance_ms(3);
    timers.stop("a")?.start_id("b", "x")?;

    let first = timers.report();
    let second = timers.report();
    assert_eq!(first, second);
    assert_eq!(timers.to_string(), first);
    assert_eq!(format!("{timers:?}"), first);
    assert_eq!(timers.inspect(), first);
    Ok(())
}

#[test]
fn test_empty_registry_reports_sentinel() {
    let timers = TimerRegistry::new();
    assert_eq!(timers.report(), "NO TIMERS TO OUTPUT");
    assert_eq!(create_timer().report(), "NO TIMERS TO OUTPUT");
}

#[test]
fn test_report_format_and_order() -> anyhow::Result<()> {
    let (mut timers, clock) = manual_registry();

    timers.start("load")?;
    clock.advance_ms(1200);
    timers.stop("load")?;

    timers.start("parse")?;
    clock.advance_ms(12_345);
    timers.stop("parse")?;

    timers.start("load")?;
    clock.advance_ms(1400);
    timers.stop("load")?;

    timers.start_id("pending", "p")?;

    assert_eq!(
        timers.report(),
        "TIMER RESULTS:\n\
         *   load: 2 x 1,300ms = 2,600ms\n\
         *   parse: 12,345ms\n\
         *   pending: 0ms\n"
    );
    Ok(())
}

#[test]
fn test_stub_never_fails() {
    let mut stub = StubTimer::new();
    stub.stop("a").unwrap();
    stub.stop_id("a", "b").unwrap();
    stub.start("a").unwrap().start("a").unwrap().start_id("a", "x").unwrap();
    stub.log();
    assert_eq!(stub.report(), "");
    assert!(Instrument::is_stub(&stub));

    let mut timer = create_stub();
    timer.stop("x").unwrap().log();
    assert_eq!(timer.report(), "");
}

#[test]
fn test_converting_to_stub_discards_data() -> anyhow::Result<()> {
    let sink = BufferSink::new();
    let clock = ManualClock::new();
    let registry = TimerRegistry::with_clock(clock.clone()).with_sink(sink.clone());
    let mut timer = splits_core::Timer::from(registry);

    timer.start("a")?;
    clock.advance_ms(2);
    timer.stop("a")?.log();
    assert_eq!(sink.len(), 1);

    timer.stub().start("a")?.start("a")?.log();
    assert!(timer.is_stub());
    assert_eq!(timer.report(), "");
    assert_eq!(sink.len(), 1);
    Ok(())
}

#[test]
fn test_into_stub_by_value() {
    let mut timers = TimerRegistry::new();
    timers.start("a").unwrap();
    let mut stub = timers.into_stub();
    stub.stop("a").unwrap().stop("a").unwrap();
    assert_eq!(stub.report(), "");
}
