use kairos::tools::{Retry, retry};
use kairos::{Promise, PromiseError, ThreadPool};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[test]
fn test_retry_succeeds_on_third_attempt() {
    let pool = ThreadPool::new(2).unwrap();
    let attempts = Arc::new(AtomicUsize::new(0));

    let handle = pool.handle();
    let counter = attempts.clone();
    let result = retry(3, move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        handle.try_spawn(move || {
            if n < 2 {
                Err(PromiseError::msg("fail"))
            } else {
                Ok(42)
            }
        })
    })
    .wait();

    assert_eq!(result.unwrap(), 42);
    assert_eq!(attempts.load(Ordering::SeqCst), 3, "Factory called exactly 3 times");
}

#[test]
fn test_retry_stops_at_first_success() {
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = attempts.clone();
    let result = retry(5, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Promise::resolved("ok")
    })
    .wait();

    assert_eq!(result.unwrap(), "ok");
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_retry_fails_after_limit() {
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = attempts.clone();
    let result = retry(4, move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        Promise::<u8>::rejected(PromiseError::msg(format!("attempt {}", n + 1)))
    })
    .wait();

    assert!(
        matches!(result, Err(PromiseError::Message(m)) if m == "attempt 4"),
        "The last failure is propagated"
    );
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[test]
fn test_retry_many_synchronous_failures() {
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = attempts.clone();
    let result = retry(100_000, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Promise::<u32>::rejected(PromiseError::msg("busy"))
    })
    .wait();

    assert!(matches!(result, Err(PromiseError::Message(m)) if m == "busy"));
    assert_eq!(attempts.load(Ordering::SeqCst), 100_000);
}

#[test]
fn test_retry_mixes_settled_and_pending_attempts() {
    let pool = ThreadPool::new(2).unwrap();
    let handle = pool.handle();
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = attempts.clone();
    let result = retry(5_000, move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        match n {
            4_999 => Promise::resolved(n),
            n if n % 1_000 == 0 => handle.try_spawn(|| Err(PromiseError::msg("slow failure"))),
            _ => Promise::rejected(PromiseError::msg("fast failure")),
        }
    })
    .wait();

    assert_eq!(result.unwrap(), 4_999);
    assert_eq!(attempts.load(Ordering::SeqCst), 4_999);
}

#[test]
fn test_retry_factory_panic_counts_as_failure() {
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = attempts.clone();
    let result = retry(2, move || {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("factory panicked");
        }
        Promise::resolved(7)
    })
    .wait();

    assert_eq!(result.unwrap(), 7);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_retry_with_interval() {
    let pool = ThreadPool::new(2).unwrap();
    let interval = Duration::from_millis(30);
    let starts = Arc::new(Mutex::new(Vec::new()));

    let log = starts.clone();
    let result = Retry::new(3, move || {
        let mut log = log.lock().unwrap();
        log.push(Instant::now());
        if log.len() < 3 {
            Promise::rejected(PromiseError::msg("busy"))
        } else {
            Promise::resolved(77)
        }
    })
    .with_interval(&pool.handle(), interval)
    .start()
    .wait();

    assert_eq!(result.unwrap(), 77);

    let starts = starts.lock().unwrap();
    assert_eq!(starts.len(), 3);
    for pair in starts.windows(2) {
        assert!(
            pair[1].duration_since(pair[0]) >= interval,
            "Attempts must be spaced by the interval"
        );
    }
}

#[test]
#[should_panic(expected = "max_attempts must be > 0")]
fn test_retry_zero_attempts_panics() {
    let _ = retry(0, || Promise::resolved(()));
}
