use kairos::runtime::worker_id;
use kairos::{BuildError, PoolBuilder, PoolHandle, PromiseError, ThreadPool};
use std::error::Error;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, mpsc};
use std::thread;
use std::time::Duration;

#[test]
fn test_pool_runs_every_task_exactly_once() {
    let runs: Arc<Vec<AtomicUsize>> = Arc::new((0..200).map(|_| AtomicUsize::new(0)).collect());

    let pool = ThreadPool::new(4).unwrap();
    for i in 0..200 {
        let runs = runs.clone();
        pool.enqueue_task(move || {
            thread::sleep(Duration::from_micros(100));
            runs[i].fetch_add(1, Ordering::SeqCst);
        });
    }
    drop(pool);

    for (i, count) in runs.iter().enumerate() {
        assert_eq!(count.load(Ordering::SeqCst), 1, "Task {} should run exactly once", i);
    }
}

#[test]
fn test_pool_idle_detection() {
    let pool = ThreadPool::new(2).unwrap();
    assert!(pool.is_idle(), "A fresh pool is idle");

    pool.enqueue_task(|| thread::sleep(Duration::from_millis(50)));
    assert!(!pool.is_idle(), "Pool is busy right after an enqueue");

    pool.wait_idle();
    assert!(pool.is_idle(), "Pool is idle once every task finished");
    assert_eq!(pool.active_tasks(), 0);
    assert_eq!(pool.queue_size(), 0);
}

#[test]
fn test_pool_queue_size_reports_backlog() {
    let pool = ThreadPool::new(1).unwrap();
    let (release, gate) = mpsc::channel::<()>();
    let (started_tx, started) = mpsc::channel::<()>();

    pool.enqueue_task(move || {
        started_tx.send(()).unwrap();
        gate.recv().unwrap();
    });
    started.recv().unwrap();

    for _ in 0..3 {
        pool.enqueue_task(|| {});
    }

    assert_eq!(pool.active_tasks(), 1);
    assert_eq!(pool.queue_size(), 3);

    release.send(()).unwrap();
    pool.wait_idle();
    assert_eq!(pool.queue_size(), 0);
}

#[test]
fn test_pool_nested_scheduling() {
    let pool = ThreadPool::new(2).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    let handle = pool.handle();
    let outer = counter.clone();
    pool.enqueue_task(move || {
        for _ in 0..5 {
            let counter = outer.clone();
            handle.enqueue_task(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
    });

    let inner = counter.clone();
    pool.enqueue_task(move || {
        let current = PoolHandle::current().expect("tasks run inside a pool context");
        current.enqueue_task(move || {
            inner.fetch_add(10, Ordering::SeqCst);
        });
    });

    drop(pool);

    assert_eq!(counter.load(Ordering::SeqCst), 15);
}

#[test]
fn test_pool_context_outside_worker() {
    assert!(PoolHandle::current().is_none());
    assert!(worker_id().is_none());
}

#[test]
fn test_pool_worker_id_and_thread_names() {
    let pool = PoolBuilder::new()
        .worker_threads(3)
        .thread_name("assets")
        .build()
        .unwrap();

    let barrier = Arc::new(Barrier::new(3));
    let seen: Vec<_> = (0..3)
        .map(|_| {
            let barrier = barrier.clone();
            pool.spawn(move || {
                barrier.wait();
                (
                    worker_id(),
                    thread::current().name().map(str::to_owned),
                )
            })
        })
        .collect();

    let mut ids = Vec::new();
    for promise in seen {
        let (id, name) = promise.wait().unwrap();
        let id = id.expect("worker id is set on pool threads");
        assert!(id < 3);
        assert_eq!(name, Some(format!("assets-{}", id)));
        ids.push(id);
    }

    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2], "Each task ran on its own worker");
}

#[test]
fn test_pool_zero_workers_rejected() {
    let result = PoolBuilder::new().worker_threads(0).build();

    assert!(matches!(result, Err(BuildError::ZeroWorkers)));
}

#[test]
fn test_pool_spawn_error_names_thread() {
    let error = BuildError::Spawn {
        thread: "loader-3".to_owned(),
        source: io::Error::other("resource limit"),
    };

    assert_eq!(error.to_string(), "failed to spawn loader-3");
    assert_eq!(error.source().map(|source| source.to_string()).as_deref(), Some("resource limit"));
}

#[test]
fn test_pool_spawn_returns_value() {
    let pool = ThreadPool::new(2).unwrap();

    assert_eq!(pool.spawn(|| 6 * 7).wait().unwrap(), 42);
    assert_eq!(pool.worker_count(), 2);
}

#[test]
fn test_pool_try_spawn_captures_error_and_panic() {
    let pool = ThreadPool::new(2).unwrap();

    let failed = pool.try_spawn(|| Err::<u8, _>(PromiseError::msg("no such file")));
    let panicked = pool.spawn(|| -> u8 { panic!("decoder exploded") });

    assert!(matches!(failed.wait(), Err(PromiseError::Message(m)) if m == "no such file"));
    assert!(matches!(panicked.wait(), Err(PromiseError::Panicked(m)) if m == "decoder exploded"));

    assert_eq!(pool.spawn(|| 1).wait().unwrap(), 1, "Workers survive captured panics");
}

#[test]
fn test_pool_raw_task_panic_kills_only_its_worker() {
    let pool = ThreadPool::new(2).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    pool.enqueue_task(|| panic!("raw task panic"));
    pool.wait_idle();
    assert!(pool.is_idle(), "Counters stay consistent after a raw task panic");

    for _ in 0..10 {
        let counter = counter.clone();
        pool.enqueue_task(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }
    drop(pool);

    assert_eq!(counter.load(Ordering::SeqCst), 10);
}

#[test]
fn test_pool_runs_tasks_enqueued_during_shutdown() {
    let pool = ThreadPool::new(1).unwrap();
    let handle = pool.handle();
    let counter = Arc::new(AtomicUsize::new(0));

    let late = counter.clone();
    pool.enqueue_task(move || {
        thread::sleep(Duration::from_millis(50));
        handle.enqueue_task(move || {
            late.fetch_add(1, Ordering::SeqCst);
        });
    });
    drop(pool);

    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_pool_handle_after_drop_abandons_work() {
    let pool = ThreadPool::new(1).unwrap();
    let handle = pool.handle();
    drop(pool);

    let promise = handle.spawn(|| 5);

    assert!(matches!(promise.wait(), Err(PromiseError::Abandoned)));
    assert!(handle.is_idle());
}

#[test]
fn test_pool_submissions_racing_drop_always_settle() {
    for _ in 0..50 {
        let pool = ThreadPool::new(2).unwrap();
        let handle = pool.handle();
        let start = Arc::new(Barrier::new(5));

        let submitters: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                let start = start.clone();
                thread::spawn(move || {
                    start.wait();
                    (0..200).map(|i| handle.spawn(move || i)).collect::<Vec<_>>()
                })
            })
            .collect();

        start.wait();
        drop(pool);

        for submitter in submitters {
            for promise in submitter.join().unwrap() {
                assert!(
                    matches!(promise.wait(), Ok(_) | Err(PromiseError::Abandoned)),
                    "Every submission either runs or is abandoned"
                );
            }
        }

        handle.wait_idle();
        assert!(handle.is_idle());
        assert_eq!(handle.queue_size(), 0);
    }
}

#[test]
fn test_pool_sequential_pools() {
    for n in 1..=4 {
        let pool = ThreadPool::new(n).unwrap();
        assert_eq!(pool.spawn(move || n * 10).wait().unwrap(), n * 10);
        drop(pool);
    }
}
