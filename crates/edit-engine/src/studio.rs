//! Draft owner: applies edits and commits drafts atomically.

use std::sync::Arc;

use makeitmeme_common::clock::Clock;
use makeitmeme_common::error::{MemeError, MemeResult};
use makeitmeme_feed_model::{suggested_artifact_name, ArtifactRef, AssetId};
use makeitmeme_host_core::{AssetSource, PersistenceSink};
use makeitmeme_render_engine::CompositionPipeline;

use crate::picker::{AssetPicker, RandomPicker};
use crate::session::{EditCommand, EditOutcome, EditSession, SessionState};

/// Holds the current draft and the capabilities needed to commit it.
pub struct MemeStudio {
    assets: Arc<dyn AssetSource>,
    pipeline: CompositionPipeline,
    sink: Arc<dyn PersistenceSink>,
    clock: Arc<dyn Clock>,
    picker: Box<dyn AssetPicker>,
    session: EditSession,
}

impl MemeStudio {
    /// Start a fresh draft on a randomly chosen catalog asset.
    pub fn new(
        assets: Arc<dyn AssetSource>,
        pipeline: CompositionPipeline,
        sink: Arc<dyn PersistenceSink>,
        clock: Arc<dyn Clock>,
    ) -> MemeResult<Self> {
        Self::with_picker(assets, pipeline, sink, clock, Box::new(RandomPicker::new()))
    }

    pub fn with_picker(
        assets: Arc<dyn AssetSource>,
        pipeline: CompositionPipeline,
        sink: Arc<dyn PersistenceSink>,
        clock: Arc<dyn Clock>,
        mut picker: Box<dyn AssetPicker>,
    ) -> MemeResult<Self> {
        let pool = assets.ids();
        let initial = picker
            .pick(&pool)
            .cloned()
            .ok_or_else(|| MemeError::config("asset catalog is empty"))?;

        tracing::info!(asset = %initial, catalog = pool.len(), "Draft started");
        Ok(Self {
            assets,
            pipeline,
            sink,
            clock,
            picker,
            session: EditSession::new(initial),
        })
    }

    /// Replace the current draft, e.g. to resume one on a known asset.
    pub fn resume(&mut self, session: EditSession) -> MemeResult<()> {
        if !self.assets.contains(session.asset_id()) {
            return Err(MemeError::AssetNotFound {
                id: session.asset_id().to_string(),
            });
        }
        self.session = session;
        Ok(())
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// The candidate pool swaps draw from.
    pub fn pool(&self) -> Vec<AssetId> {
        self.assets.ids()
    }

    pub fn set_top_text(&mut self, text: impl Into<String>) {
        self.session = self.session.with_top_text(text);
    }

    pub fn set_bottom_text(&mut self, text: impl Into<String>) {
        self.session = self.session.with_bottom_text(text);
    }

    pub fn request_swap(&mut self) -> MemeResult<EditOutcome> {
        self.apply(EditCommand::RequestSwap)
    }

    /// Apply one command to the draft.
    pub fn apply(&mut self, command: EditCommand) -> MemeResult<EditOutcome> {
        let pool = self.assets.ids();
        let (session, result) = self.session.apply(command, &pool, self.picker.as_mut());
        match &result {
            Ok(EditOutcome::Swapped { from, to }) => {
                tracing::debug!(%from, %to, remaining = session.edits_remaining(), "Asset swapped");
            }
            Ok(EditOutcome::TextUpdated) => {}
            Err(e) => {
                tracing::debug!(error = %e, asset = %self.session.asset_id(), "Edit rejected");
            }
        }
        self.session = session;
        result
    }

    /// Render and persist the draft.
    ///
    /// On success the studio moves on to a fresh draft and the saved
    /// artifact is returned. On any failure the draft is left exactly as it
    /// was so the caller can retry.
    pub async fn commit(&mut self) -> MemeResult<ArtifactRef> {
        let draft = self.session.clone();
        let asset = self.assets.load(draft.asset_id())?;

        let pipeline = self.pipeline.clone();
        let (top, bottom) = (draft.top_text().to_string(), draft.bottom_text().to_string());
        let rendered = tokio::task::spawn_blocking(move || pipeline.render(&asset, &top, &bottom))
            .await
            .map_err(|e| MemeError::encode(format!("Render task failed: {e}")))??;

        let name = suggested_artifact_name(self.clock.now_ms());
        let artifact = self
            .sink
            .save(&rendered, &name)
            .await
            .map_err(|e| match e {
                MemeError::Save { .. } => e,
                other => MemeError::save(other.to_string()),
            })?;

        // The artifact is already durable; indexing is best effort.
        if let Err(e) = self.sink.notify_index(&artifact).await {
            tracing::warn!(artifact = %artifact, error = %e, "Failed to index artifact");
        }

        let pool = self.assets.ids();
        self.session = draft.next_after_commit(&pool, self.picker.as_mut());

        tracing::info!(
            artifact = %artifact,
            committed_asset = %draft.asset_id(),
            next_asset = %self.session.asset_id(),
            bytes = rendered.len(),
            "Draft committed"
        );
        Ok(artifact)
    }
}
