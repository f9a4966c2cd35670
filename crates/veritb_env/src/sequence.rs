//! Stimulus sources.
//!
//! A [`Sequence`] is a lazy generator of transactions. [`start_sequence`]
//! pulls from it one item at a time and blocks on the sequencer for each, so
//! the next transaction is only produced after the driver has consumed the
//! previous one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use veritb_common::BitWidth;

use crate::error::HarnessError;
use crate::sequencer::SequencerHandle;
use crate::transaction::{AdderInputs, Transaction};

/// A source of stimulus transactions.
pub trait Sequence: Send {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Produces the next transaction, or `None` when the sequence is exhausted.
    fn next_transaction(&mut self) -> Option<Transaction>;

    /// The seed that reproduces this sequence, for randomized sources.
    fn seed(&self) -> Option<u64> {
        None
    }
}

/// Runs `seq` to exhaustion against the sequencer.
///
/// Returns the number of transactions that were driven.
pub async fn start_sequence(
    seq: &mut dyn Sequence,
    sequencer: &SequencerHandle,
) -> Result<usize, HarnessError> {
    let mut sent = 0usize;
    while let Some(txn) = seq.next_transaction() {
        tracing::debug!(sequence = seq.name(), %txn, "start item");
        sequencer.execute(txn).await?;
        sent += 1;
    }
    tracing::info!(sequence = seq.name(), sent, "sequence finished");
    Ok(sent)
}

/// `count` transactions with uniformly random operands and carry-in.
#[derive(Debug)]
pub struct RandomSequence {
    width: BitWidth,
    remaining: usize,
    seed: u64,
    rng: StdRng,
}

impl RandomSequence {
    /// Creates a random sequence. Without an explicit seed one is drawn from
    /// entropy and reported through [`Sequence::seed`].
    pub fn new(width: BitWidth, count: usize, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            width,
            remaining: count,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sequence for RandomSequence {
    fn name(&self) -> &str {
        "random"
    }

    fn next_transaction(&mut self) -> Option<Transaction> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let max = self.width.max_value();
        Some(Transaction::new(AdderInputs {
            a: self.rng.gen_range(0..=max),
            b: self.rng.gen_range(0..=max),
            cin: self.rng.gen(),
        }))
    }

    fn seed(&self) -> Option<u64> {
        Some(self.seed)
    }
}

/// A fixed list of transactions, emitted in order.
#[derive(Debug, Clone)]
pub struct DirectedSequence {
    cases: VecDeque<AdderInputs>,
}

impl DirectedSequence {
    /// Creates a directed sequence from literal stimulus.
    pub fn new(cases: impl IntoIterator<Item = AdderInputs>) -> Self {
        Self {
            cases: cases.into_iter().collect(),
        }
    }

    /// The named corner cases for an adder of the given width:
    ///
    /// 1. all-zero operands, no carry-in
    /// 2. all-ones operands with carry-in
    /// 3. all-ones operands without carry-in
    /// 4. a simple addition with no carry (`5 + 3` at 4 bits)
    /// 5. a carry-out from the top bit alone (`8 + 8` at 4 bits)
    pub fn corner_cases(width: BitWidth) -> Self {
        let max = width.max_value();
        let top = 1u64 << (width.bits() - 1);
        let case = |a, b, cin| AdderInputs { a, b, cin };
        Self::new([
            case(0, 0, false),
            case(max, max, true),
            case(max, max, false),
            case(max / 3, max / 5, false),
            case(top, top, false),
        ])
    }

    /// Transactions left to emit.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns `true` if nothing is left to emit.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl Sequence for DirectedSequence {
    fn name(&self) -> &str {
        "directed"
    }

    fn next_transaction(&mut self) -> Option<Transaction> {
        self.cases.pop_front().map(Transaction::new)
    }
}
