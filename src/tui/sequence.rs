//! Drives a queue of items one at a time, counting successes and failures.
//!
//! `Running(0) -> Running(1) -> ... -> Done`. The caller hands off the item
//! returned by `start`/`record` and reports its outcome with `record`. There
//! are no retries and no skips; once done, further reports are ignored.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence<T> {
    items: Vec<T>,
    current: usize,
    succeeded: usize,
    failed: usize,
    started: bool,
    done: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Step<'a, T> {
    /// Run this item next.
    Run(&'a T),
    /// The sequence just finished. Returned exactly once.
    Done,
    /// Nothing to do: not started yet, or already finished.
    Idle,
}

impl<T> Sequence<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            current: 0,
            succeeded: 0,
            failed: 0,
            started: false,
            done: false,
        }
    }

    pub fn start(&mut self) -> Step<'_, T> {
        if self.started {
            return Step::Idle;
        }
        self.started = true;
        self.advance()
    }

    /// Report the outcome of the item returned last.
    pub fn record(&mut self, ok: bool) -> Step<'_, T> {
        if !self.started || self.done {
            return Step::Idle;
        }
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.current += 1;
        self.advance()
    }

    fn advance(&mut self) -> Step<'_, T> {
        match self.items.get(self.current) {
            Some(item) => Step::Run(item),
            None => {
                self.done = true;
                Step::Done
            }
        }
    }

    pub fn current(&self) -> Option<&T> {
        if self.done {
            None
        } else {
            self.items.get(self.current)
        }
    }

    /// Zero-based index of the running item (== len once done).
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Run a sequence to completion with the given outcomes, returning the
    /// order in which items were handed out.
    fn drive(items: Vec<u32>, outcomes: &[bool]) -> (Sequence<u32>, Vec<u32>, usize) {
        let mut seq = Sequence::new(items);
        let mut ran = Vec::new();
        let mut dones = 0;
        let mut step_item = match seq.start() {
            Step::Run(i) => Some(*i),
            Step::Done => {
                dones += 1;
                None
            }
            Step::Idle => None,
        };
        let mut k = 0;
        while let Some(item) = step_item {
            ran.push(item);
            let ok = outcomes.get(k).copied().unwrap_or(true);
            k += 1;
            step_item = match seq.record(ok) {
                Step::Run(i) => Some(*i),
                Step::Done => {
                    dones += 1;
                    None
                }
                Step::Idle => None,
            };
        }
        (seq, ran, dones)
    }

    #[test]
    fn empty_queue_is_done_immediately() {
        let (seq, ran, dones) = drive(vec![], &[]);
        assert!(ran.is_empty());
        assert_eq!(dones, 1);
        assert_eq!((seq.succeeded(), seq.failed()), (0, 0));
    }

    #[test]
    fn single_failure() {
        let (seq, ran, _) = drive(vec![1], &[false]);
        assert_eq!(ran, vec![1]);
        assert_eq!((seq.succeeded(), seq.failed()), (0, 1));
        assert!(seq.is_done());
    }

    #[test]
    fn middle_failure_still_runs_everything_in_order() {
        let (seq, ran, _) = drive(vec![1, 2, 3], &[true, false, true]);
        assert_eq!(ran, vec![1, 2, 3]);
        assert_eq!((seq.succeeded(), seq.failed()), (2, 1));
    }

    #[test]
    fn reports_after_done_are_ignored() {
        let (mut seq, _, _) = drive(vec![1], &[true]);
        assert_eq!(seq.record(false), Step::Idle);
        assert_eq!((seq.succeeded(), seq.failed()), (1, 0));
    }

    proptest! {
        #[test]
        fn counts_add_up_exactly_once_done(outcomes in proptest::collection::vec(any::<bool>(), 0..20)) {
            let items: Vec<u32> = (0..outcomes.len() as u32).collect();
            let (seq, ran, dones) = drive(items.clone(), &outcomes);
            prop_assert_eq!(ran, items);
            prop_assert_eq!(dones, 1);
            prop_assert!(seq.is_done());
            prop_assert_eq!(seq.succeeded() + seq.failed(), outcomes.len());
            prop_assert_eq!(seq.failed(), outcomes.iter().filter(|ok| !**ok).count());
        }
    }
}
