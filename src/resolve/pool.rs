//! Bounded worker pool for independent resolution jobs.
//!
//! Jobs are handed out by index from a shared counter to at most `workers`
//! scoped threads; results come back over a channel tagged with their index
//! so the caller can restore input order.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

/// Run `work` over every item on up to `workers` threads.
///
/// Returns one slot per item in input order. With `fail_fast`, the first
/// failure stops workers from starting further items; slots for items that
/// never ran are `None`.
pub fn run<T, R, E, F>(
    items: &[T],
    workers: usize,
    fail_fast: bool,
    work: F,
) -> Vec<Option<Result<R, E>>>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync,
{
    let mut slots: Vec<Option<Result<R, E>>> = items.iter().map(|_| None).collect();
    if items.is_empty() {
        return slots;
    }

    let next = AtomicUsize::new(0);
    let cancelled = AtomicBool::new(false);
    let (tx, rx) = mpsc::channel();
    let workers = workers.clamp(1, items.len());

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let (next, cancelled, work) = (&next, &cancelled, &work);
            scope.spawn(move || loop {
                if cancelled.load(Ordering::SeqCst) {
                    break;
                }
                let index = next.fetch_add(1, Ordering::SeqCst);
                let Some(item) = items.get(index) else {
                    break;
                };
                let result = work(item);
                if fail_fast && result.is_err() {
                    cancelled.store(true, Ordering::SeqCst);
                }
                if tx.send((index, result)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        for (index, result) in rx {
            slots[index] = Some(result);
        }
    });

    slots
}
