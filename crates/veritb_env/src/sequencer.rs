//! Hand-off between stimulus sources and the driver.
//!
//! The sequencer is a rendezvous: [`SequencerHandle::execute`] blocks the
//! calling source until the driver has pulled the item *and* reported it
//! done, so each source has at most one transaction in flight. Any number of
//! sources may share the driver through cloned handles; their items are
//! served in the order the sources submitted them.

use tokio::sync::{mpsc, oneshot};

use crate::error::HarnessError;
use crate::transaction::Transaction;

/// A transaction on its way from a source to the driver.
#[derive(Debug)]
pub struct SequenceItem {
    txn: Transaction,
    done: oneshot::Sender<()>,
}

impl SequenceItem {
    /// The transaction to drive.
    pub fn transaction(&self) -> &Transaction {
        &self.txn
    }

    /// Tells the submitting source that the driver has finished with the item.
    pub fn item_done(self) {
        // The source may have been cancelled; nobody is left to notify then.
        let _ = self.done.send(());
    }
}

/// Driver-side end of the hand-off.
#[derive(Debug)]
pub struct Sequencer {
    rx: mpsc::Receiver<SequenceItem>,
}

/// Source-side end of the hand-off.
#[derive(Debug, Clone)]
pub struct SequencerHandle {
    tx: mpsc::Sender<SequenceItem>,
}

impl Sequencer {
    /// Creates a sequencer and the first handle onto it.
    pub fn new() -> (Sequencer, SequencerHandle) {
        let (tx, rx) = mpsc::channel(1);
        (Sequencer { rx }, SequencerHandle { tx })
    }

    /// Waits for the next item. Returns `None` once every handle is gone.
    pub async fn next(&mut self) -> Option<SequenceItem> {
        self.rx.recv().await
    }
}

impl SequencerHandle {
    /// Submits one transaction and waits until the driver calls
    /// [`SequenceItem::item_done`] for it.
    pub async fn execute(&self, txn: Transaction) -> Result<(), HarnessError> {
        let (done, finished) = oneshot::channel();
        self.tx
            .send(SequenceItem { txn, done })
            .await
            .map_err(|_| HarnessError::SequencerClosed)?;
        finished.await.map_err(|_| HarnessError::SequencerClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::AdderInputs;

    fn txn(a: u64) -> Transaction {
        Transaction::new(AdderInputs { a, b: 0, cin: false })
    }

    #[tokio::test]
    async fn execute_waits_for_item_done() {
        let (mut sequencer, handle) = Sequencer::new();
        let source = tokio::spawn(async move { handle.execute(txn(7)).await });

        let item = sequencer.next().await.unwrap();
        assert_eq!(item.transaction().inputs().a, 7);
        tokio::task::yield_now().await;
        assert!(!source.is_finished());

        item.item_done();
        source.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn items_arrive_in_submission_order() {
        let (mut sequencer, handle) = Sequencer::new();
        let source = tokio::spawn(async move {
            for a in 0..4 {
                handle.execute(txn(a)).await?;
            }
            Ok::<_, HarnessError>(())
        });

        let mut seen = Vec::new();
        while let Some(item) = sequencer.next().await {
            seen.push(item.transaction().inputs().a);
            item.item_done();
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
        source.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn dropped_item_reports_closed() {
        let (mut sequencer, handle) = Sequencer::new();
        let source = tokio::spawn(async move { handle.execute(txn(1)).await });
        let item = sequencer.next().await.unwrap();
        drop(item);
        let err = source.await.unwrap().unwrap_err();
        assert!(matches!(err, HarnessError::SequencerClosed));
    }

    #[tokio::test]
    async fn dropped_sequencer_reports_closed() {
        let (sequencer, handle) = Sequencer::new();
        drop(sequencer);
        let err = handle.execute(txn(1)).await.unwrap_err();
        assert!(matches!(err, HarnessError::SequencerClosed));
    }
}
