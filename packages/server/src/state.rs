use std::sync::Arc;

use common::storage::LabelStore;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::labels::{
    DocumentMerger, LabelGenerator, LabelOutcome, LabelPipeline, LabelUpdater,
};
use crate::store::ShipmentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ShipmentStore>,
    pub labels: Arc<dyn LabelStore>,
    pub pipeline: LabelPipeline,
    pub merger: Arc<DocumentMerger>,
    pub config: AppConfig,
}

impl AppState {
    /// Wire the label pipeline and merger around the given stores.
    ///
    /// The returned receiver carries the outcome of every background label
    /// job and must be drained, usually by
    /// [`consume_label_outcomes`](crate::consumers::consume_label_outcomes).
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ShipmentStore>,
        labels: Arc<dyn LabelStore>,
    ) -> (Self, mpsc::UnboundedReceiver<LabelOutcome>) {
        let generator =
            LabelGenerator::new(labels.clone(), config.labels.public_base_url.clone());
        let (pipeline, outcomes) = LabelPipeline::new(generator, LabelUpdater::new(store.clone()));
        let merger = Arc::new(DocumentMerger::new(
            labels.clone(),
            store.clone(),
            config.labels.merge_selection,
            config.labels.merged_name.clone(),
        ));

        let state = Self {
            store,
            labels,
            pipeline,
            merger,
            config,
        };
        (state, outcomes)
    }
}
