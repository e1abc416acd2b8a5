use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use super::{LabelError, LabelGenerator, LabelUpdater};
use crate::store::Shipment;

/// Final state of one background label job.
#[derive(Debug)]
pub enum LabelOutcome {
    /// The label was written and its reference attached to the shipment.
    Attached { shipment_id: Uuid, reference: String },
    /// The label was written but the shipment could not be updated.
    Orphaned { shipment_id: Uuid, reference: String },
    /// Rendering or writing failed; the shipment keeps no label reference.
    Failed {
        shipment_id: Uuid,
        error: LabelError,
    },
}

impl LabelOutcome {
    pub fn shipment_id(&self) -> Uuid {
        match self {
            Self::Attached { shipment_id, .. }
            | Self::Orphaned { shipment_id, .. }
            | Self::Failed { shipment_id, .. } => *shipment_id,
        }
    }
}

/// Detached label generation.
///
/// Each submitted shipment gets its own task that generates the label, applies
/// the reference and reports a [`LabelOutcome`] on the channel returned by
/// [`LabelPipeline::new`]. Nothing is retried.
#[derive(Clone)]
pub struct LabelPipeline {
    generator: Arc<LabelGenerator>,
    updater: LabelUpdater,
    outcomes: mpsc::UnboundedSender<LabelOutcome>,
}

impl LabelPipeline {
    pub fn new(
        generator: LabelGenerator,
        updater: LabelUpdater,
    ) -> (Self, mpsc::UnboundedReceiver<LabelOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        let pipeline = Self {
            generator: Arc::new(generator),
            updater,
            outcomes,
        };
        (pipeline, receiver)
    }

    /// Start generating the label for `shipment` without waiting for it.
    pub fn submit(&self, shipment: Shipment) -> JoinHandle<()> {
        let generator = Arc::clone(&self.generator);
        let updater = self.updater.clone();
        let outcomes = self.outcomes.clone();

        tokio::spawn(async move {
            let outcome = run_job(&generator, &updater, &shipment).await;
            if outcomes.send(outcome).is_err() {
                debug!(shipment_id = %shipment.id, "Label outcome receiver closed");
            }
        })
    }
}

async fn run_job(
    generator: &LabelGenerator,
    updater: &LabelUpdater,
    shipment: &Shipment,
) -> LabelOutcome {
    let shipment_id = shipment.id;
    let handle = match generator.generate(shipment).await {
        Ok(handle) => handle,
        Err(error) => return LabelOutcome::Failed { shipment_id, error },
    };

    if updater.apply(shipment_id, &handle.reference).await {
        LabelOutcome::Attached {
            shipment_id,
            reference: handle.reference,
        }
    } else {
        LabelOutcome::Orphaned {
            shipment_id,
            reference: handle.reference,
        }
    }
}
