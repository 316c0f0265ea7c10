//! Bounded candidate queue and the single producer that feeds it.

use crate::search::cancel::CancellationToken;
use crate::search::error::SearchError;
use crossbeam_channel::{Receiver, SendTimeoutError, Sender, bounded};
use std::time::Duration;

/// Producer end of the candidate queue.
pub struct GeneratorChannel {
    pub to_workers: Sender<u64>,
    pub cancel: CancellationToken,
}

/// Consumer end of the candidate queue, one per worker.
pub struct WorkerChannel {
    pub from_generator: Receiver<u64>,
    pub cancel: CancellationToken,
}

/// Create the queue between one generator and `num_workers` workers.
pub fn create_channels(
    capacity: usize,
    num_workers: usize,
    cancel: &CancellationToken,
) -> (GeneratorChannel, Vec<WorkerChannel>) {
    let (tx, rx) = bounded(capacity);

    let workers = (0..num_workers)
        .map(|_| WorkerChannel {
            from_generator: rx.clone(),
            cancel: cancel.clone(),
        })
        .collect();

    let generator = GeneratorChannel {
        to_workers: tx,
        cancel: cancel.clone(),
    };

    (generator, workers)
}

/// Push consecutive odd integers starting at `first` until cancelled.
///
/// Blocks while the queue is full, waking at least every `poll` to observe
/// cancellation. Returns the number of candidates enqueued. Stops cleanly if
/// every worker has hung up.
pub fn run_generator(
    channel: GeneratorChannel,
    first: u64,
    poll: Duration,
) -> Result<u64, SearchError> {
    let mut next = first;
    let mut produced = 0u64;

    while !channel.cancel.is_cancelled() {
        match channel.to_workers.send_timeout(next, poll) {
            Ok(()) => {
                produced += 1;
                next = next
                    .checked_add(2)
                    .ok_or(SearchError::CandidateOverflow { last: next })?;
            }
            Err(SendTimeoutError::Timeout(_)) => continue,
            Err(SendTimeoutError::Disconnected(_)) => break,
        }
    }

    Ok(produced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_create_channels() {
        let cancel = CancellationToken::new();
        let (generator, workers) = create_channels(4, 3, &cancel);

        assert_eq!(workers.len(), 3);
        generator.to_workers.send(11).unwrap();
        assert_eq!(workers[2].from_generator.recv().unwrap(), 11);
    }

    #[test]
    fn test_generator_emits_increasing_odds() {
        let cancel = CancellationToken::new();
        let (generator, workers) = create_channels(8, 1, &cancel);
        let poll = Duration::from_millis(10);

        let handle = thread::spawn(move || run_generator(generator, 101, poll));

        let received: Vec<u64> = (0..20)
            .map(|_| workers[0].from_generator.recv().unwrap())
            .collect();
        cancel.cancel();
        // Drain so a blocked send can observe cancellation
        while workers[0].from_generator.try_recv().is_ok() {}
        let produced = handle.join().unwrap().unwrap();

        let expected: Vec<u64> = (0..20).map(|i| 101 + 2 * i).collect();
        assert_eq!(received, expected);
        assert!(produced >= 20);
    }

    #[test]
    fn test_generator_respects_capacity() {
        let cancel = CancellationToken::new();
        let (generator, workers) = create_channels(5, 1, &cancel);
        let poll = Duration::from_millis(10);

        let handle = thread::spawn(move || run_generator(generator, 1, poll));
        thread::sleep(Duration::from_millis(100));
        assert_eq!(workers[0].from_generator.len(), 5);

        cancel.cancel();
        let produced = handle.join().unwrap().unwrap();
        assert_eq!(produced, 5);
    }

    #[test]
    fn test_generator_stops_when_workers_hang_up() {
        let cancel = CancellationToken::new();
        let (generator, workers) = create_channels(2, 1, &cancel);
        drop(workers);
        let produced = run_generator(generator, 3, Duration::from_millis(10)).unwrap();
        assert_eq!(produced, 0);
    }

    #[test]
    fn test_generator_reports_overflow() {
        let cancel = CancellationToken::new();
        let (generator, workers) = create_channels(4, 1, &cancel);
        let result = run_generator(generator, u64::MAX - 2, Duration::from_millis(10));
        assert_eq!(
            result,
            Err(SearchError::CandidateOverflow { last: u64::MAX })
        );
        assert_eq!(workers[0].from_generator.len(), 2);
    }
}
