use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::labels::LabelOutcome;

/// Log the outcome of every background label job.
///
/// Label failures happen after the creation response was sent, so this is
/// the only place they surface.
pub async fn consume_label_outcomes(mut outcomes: mpsc::UnboundedReceiver<LabelOutcome>) {
    info!("Starting label outcome consumer");

    while let Some(outcome) = outcomes.recv().await {
        match outcome {
            LabelOutcome::Attached {
                shipment_id,
                reference,
            } => {
                debug!(%shipment_id, %reference, "Label ready");
            }
            LabelOutcome::Orphaned {
                shipment_id,
                reference,
            } => {
                warn!(%shipment_id, %reference, "Label written but shipment was not updated");
            }
            LabelOutcome::Failed { shipment_id, error } => {
                error!(%shipment_id, error = %error, "Label generation failed");
            }
        }
    }

    info!("Label outcome consumer stopped");
}
