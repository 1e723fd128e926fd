//! Worker Pool Tests
//!
//! These tests verify:
//! - Jobs run on pool threads
//! - Work beyond the pool size queues instead of being rejected
//! - A panicking job does not take its worker down
//! - Drop drains the queue

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use calcd::network::WorkerPool;
use calcd::CalcError;
use crossbeam::channel;

#[test]
fn test_pool_rejects_zero_size() {
    assert!(matches!(WorkerPool::new(0), Err(CalcError::Config(_))));
}

#[test]
fn test_pool_reports_size() {
    let pool = WorkerPool::new(3).unwrap();
    assert_eq!(pool.size(), 3);
}

#[test]
fn test_pool_runs_jobs_on_named_threads() {
    let pool = WorkerPool::new(2).unwrap();
    let (tx, rx) = channel::unbounded();

    pool.execute(move || {
        let name = std::thread::current().name().map(str::to_string);
        tx.send(name).unwrap();
    })
    .unwrap();

    let name = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
    assert!(name.starts_with("calcd-worker-"), "thread name {}", name);
}

#[test]
fn test_pool_runs_workers_in_parallel() {
    let pool = WorkerPool::new(2).unwrap();
    let barrier = Arc::new(Barrier::new(3));

    // Both jobs block until the other one (and the test) arrives
    for _ in 0..2 {
        let barrier = Arc::clone(&barrier);
        pool.execute(move || {
            barrier.wait();
        })
        .unwrap();
    }

    barrier.wait();
}

#[test]
fn test_pool_queues_when_saturated() {
    let pool = WorkerPool::new(2).unwrap();
    let (release_tx, release_rx) = channel::unbounded::<()>();
    let done = Arc::new(AtomicUsize::new(0));

    for _ in 0..10 {
        let release_rx = release_rx.clone();
        let done = Arc::clone(&done);
        pool.execute(move || {
            release_rx.recv().unwrap();
            done.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    for _ in 0..10 {
        release_tx.send(()).unwrap();
    }

    drop(pool);
    assert_eq!(done.load(Ordering::SeqCst), 10);
}

#[test]
fn test_pool_survives_panicking_job() {
    let pool = WorkerPool::new(2).unwrap();
    let (tx, rx) = channel::unbounded();

    for _ in 0..4 {
        pool.execute(|| panic!("job failure")).unwrap();
    }
    pool.execute(move || tx.send(42).unwrap()).unwrap();

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
}

#[test]
fn test_pool_drop_drains_queue() {
    let counter = Arc::new(AtomicUsize::new(0));

    {
        let pool = WorkerPool::new(2).unwrap();
        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
    }

    assert_eq!(counter.load(Ordering::SeqCst), 100);
}
