//! A small, fixed-size fork-join thread pool: `std::thread` workers pulling
//! from a shared job queue, one `std::sync::mpsc` channel carrying results
//! back tagged by index so they can be reassembled in submission order
//! regardless of completion order. Not a general-purpose executor -- jobs
//! run once, to completion, and the pool itself doesn't outlive a single
//! `map` call.
//!
//! `threads <= 1` (or fewer than two jobs) takes a sequential fast path
//! and never spawns a thread, so single-threaded callers pay no pool
//! overhead and get fully deterministic ordering for free.

use std::collections::VecDeque;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

pub struct WorkerPool {
  threads: usize,
}

impl WorkerPool {
  pub fn new(threads: usize) -> Self {
    Self {
      threads: threads.max(1),
    }
  }

  /// Runs every job in `jobs`, returning their results in the same order
  /// the jobs were submitted.
  pub fn map<T, F>(&self, jobs: Vec<F>) -> Vec<T>
  where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
  {
    let n = jobs.len();
    if self.threads <= 1 || n <= 1 {
      return jobs.into_iter().map(|job| job()).collect();
    }

    let queue: Arc<Mutex<VecDeque<(usize, F)>>> =
      Arc::new(Mutex::new(jobs.into_iter().enumerate().collect()));
    let (tx, rx) = mpsc::channel::<(usize, T)>();
    let worker_count = self.threads.min(n);

    let handles: Vec<_> = (0..worker_count)
      .map(|_| {
        let queue = Arc::clone(&queue);
        let tx = tx.clone();
        thread::spawn(move || loop {
          let next = queue.lock().unwrap().pop_front();
          match next {
            Some((idx, job)) => {
              let result = job();
              if tx.send((idx, result)).is_err() {
                break;
              }
            }
            None => break,
          }
        })
      })
      .collect();
    drop(tx);

    let mut results: Vec<Option<T>> = (0..n).map(|_| None).collect();
    for (idx, result) in rx {
      results[idx] = Some(result);
    }
    for handle in handles {
      let _ = handle.join();
    }
    results.into_iter().map(|r| r.expect("every job reports a result")).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sequential_fast_path_preserves_order() {
    let pool = WorkerPool::new(1);
    let jobs: Vec<_> = (0..10).map(|i| move || i * 2).collect();
    assert_eq!(pool.map(jobs), (0..10).map(|i| i * 2).collect::<Vec<_>>());
  }

  #[test]
  fn test_parallel_preserves_order() {
    let pool = WorkerPool::new(4);
    let jobs: Vec<_> = (0..50)
      .map(|i| {
        move || {
          if i % 7 == 0 {
            thread::yield_now();
          }
          i * i
        }
      })
      .collect();
    assert_eq!(pool.map(jobs), (0..50).map(|i| i * i).collect::<Vec<_>>());
  }

  #[test]
  fn test_empty_jobs() {
    let pool = WorkerPool::new(4);
    let jobs: Vec<Box<dyn FnOnce() -> i32 + Send>> = Vec::new();
    assert_eq!(pool.map(jobs), Vec::<i32>::new());
  }
}
