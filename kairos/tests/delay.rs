use kairos::{PromiseError, PromiseState, ThreadPool};
use std::time::{Duration, Instant};

#[test]
fn test_delay_waits_at_least_duration() {
    let pool = ThreadPool::new(1).unwrap();
    let start = Instant::now();

    let promise = pool.delay("tick", Duration::from_millis(100));

    assert!(
        start.elapsed() < Duration::from_millis(100),
        "delay must not block the caller"
    );
    assert_eq!(promise.state(), PromiseState::Pending);

    assert_eq!(promise.wait().unwrap(), "tick");
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[test]
fn test_delay_fires_in_deadline_order() {
    let pool = ThreadPool::new(1).unwrap();

    let late = pool.delay(2, Duration::from_millis(80));
    let early = pool.delay(1, Duration::from_millis(20));

    let early_at = {
        early.wait().unwrap();
        Instant::now()
    };
    assert_eq!(late.state(), PromiseState::Pending, "Later deadline has not fired yet");

    late.wait().unwrap();
    assert!(Instant::now() > early_at);
}

#[test]
fn test_delay_continuation_runs_on_worker() {
    let pool = ThreadPool::new(1).unwrap();

    let name = pool
        .delay((), Duration::from_millis(10))
        .map(|()| std::thread::current().name().map(str::to_owned))
        .wait()
        .unwrap();

    assert_eq!(name.as_deref(), Some("kairos-worker-0"));
}

#[test]
fn test_delay_abandoned_on_pool_drop() {
    let pool = ThreadPool::new(1).unwrap();

    let promise = pool.delay(0u8, Duration::from_secs(60));
    drop(pool);

    assert!(matches!(promise.wait(), Err(PromiseError::Abandoned)));
}

#[test]
fn test_delay_unbounded_duration_stays_pending() {
    let pool = ThreadPool::new(1).unwrap();

    let promise = pool.delay("never", Duration::MAX);
    std::thread::sleep(Duration::from_millis(20));

    assert_eq!(promise.state(), PromiseState::Pending);

    drop(pool);
    assert!(matches!(promise.wait(), Err(PromiseError::Abandoned)));
}
