//! Submit mediation for the single open edit session.
//!
//! `AssetEditor` owns the loading flag. While a submit is outstanding further
//! submits are ignored and edits are rejected; a response that arrives after
//! its session was closed or replaced is dropped.

use crossbeam_channel::Sender;
use shared::{
    domain::Asset,
    error::StoreError,
    protocol::PatchRequest,
};
use tracing::{debug, error, info};

use crate::{
    edit_session::{CommitDiff, EditField, EditSession},
    error::EditorError,
    events::{emit, HostEvent, SaveError},
    AssetStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

#[derive(Debug)]
struct ActiveSession {
    token: SessionToken,
    session: EditSession,
    loading: bool,
    last_error: Option<SaveError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmit {
    pub token: SessionToken,
    pub request: PatchRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStart {
    /// No session is open or a submit is already outstanding.
    Ignored,
    /// The draft matched the baseline; the session has been closed.
    Unchanged,
    Dispatch(PendingSubmit),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored,
    Closed,
    Saved(Asset),
    Failed(SaveError),
    /// The response belongs to a session that is no longer open.
    Stale,
}

pub struct AssetEditor {
    events: Sender<HostEvent>,
    active: Option<ActiveSession>,
    next_token: u64,
}

impl AssetEditor {
    pub fn new(events: Sender<HostEvent>) -> Self {
        Self {
            events,
            active: None,
            next_token: 1,
        }
    }

    /// Opens a session for `asset`, replacing any session already open.
    /// Unsaved edits of the replaced session are discarded.
    pub fn open(&mut self, asset: &Asset) -> SessionToken {
        if let Some(previous) = self.active.take() {
            if previous.session.is_dirty() {
                info!(
                    asset_id = %previous.session.asset_id(),
                    replaced_by = %asset.id,
                    "discarding unsaved edits of replaced session"
                );
            }
        }

        let token = SessionToken(self.next_token);
        self.next_token += 1;
        self.active = Some(ActiveSession {
            token,
            session: EditSession::open(asset),
            loading: false,
            last_error: None,
        });
        debug!(asset_id = %asset.id, "opened edit session");
        token
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.active.as_ref().map(|active| &active.session)
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.active.as_ref().map(|active| active.token)
    }

    pub fn is_loading(&self) -> bool {
        self.active.as_ref().is_some_and(|active| active.loading)
    }

    pub fn is_dirty(&self) -> bool {
        self.session().is_some_and(EditSession::is_dirty)
    }

    /// Save button enablement: open, dirty and not loading.
    pub fn can_save(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.loading && active.session.is_dirty())
    }

    pub fn last_error(&self) -> Option<&SaveError> {
        self.active
            .as_ref()
            .and_then(|active| active.last_error.as_ref())
    }

    pub fn update(&mut self, field: EditField, value: impl Into<String>) -> Result<(), EditorError> {
        let active = self.active.as_mut().ok_or(EditorError::NoSession)?;
        if active.loading {
            return Err(EditorError::SubmitInFlight(active.session.asset_id().clone()));
        }
        active.session.update(field, value);
        Ok(())
    }

    /// Closes the session without saving. Any outstanding response for it
    /// will be reported as stale.
    pub fn on_close(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        debug!(
            asset_id = %active.session.asset_id(),
            in_flight = active.loading,
            "closed edit session"
        );
        emit(
            &self.events,
            HostEvent::EditorClosed {
                asset_id: active.session.asset_id().clone(),
            },
        );
    }

    /// Destroys the session after a successful save and notifies the host.
    pub fn on_save_complete(&mut self, saved: Asset) {
        self.active = None;
        info!(asset_id = %saved.id, "asset metadata saved");
        emit(&self.events, HostEvent::SaveComplete(saved));
    }

    /// Starts a submit. The returned payload reflects the draft exactly as it
    /// stands now; the session stays loading until `finish_submit`.
    pub fn begin_submit(&mut self) -> SubmitStart {
        let Some(active) = self.active.as_mut() else {
            return SubmitStart::Ignored;
        };
        if active.loading {
            debug!(
                asset_id = %active.session.asset_id(),
                "ignoring submit while another is in flight"
            );
            return SubmitStart::Ignored;
        }

        match active.session.commit_diff() {
            CommitDiff::Unchanged => {
                self.on_close();
                SubmitStart::Unchanged
            }
            CommitDiff::Patch(set) => {
                active.loading = true;
                active.last_error = None;
                let request = PatchRequest {
                    id: active.session.asset_id().clone(),
                    set,
                };
                debug!(
                    asset_id = %request.id,
                    alt = %request.set.alt,
                    title = %request.set.title,
                    tags = ?request.set.tags,
                    "dispatching patch"
                );
                SubmitStart::Dispatch(PendingSubmit {
                    token: active.token,
                    request,
                })
            }
        }
    }

    pub fn finish_submit(
        &mut self,
        token: SessionToken,
        result: Result<Asset, StoreError>,
    ) -> SubmitOutcome {
        let Some(active) = self.active.as_mut().filter(|active| active.token == token) else {
            debug!(?token, "dropping response for a session that is no longer open");
            return SubmitOutcome::Stale;
        };

        match result {
            Ok(saved) => {
                self.on_save_complete(saved.clone());
                SubmitOutcome::Saved(saved)
            }
            Err(err) => {
                let asset_id = active.session.asset_id().clone();
                error!(asset_id = %asset_id, error = %err, "failed to persist asset metadata");
                let save_error = SaveError::from_store_error(&err);
                active.loading = false;
                active.last_error = Some(save_error.clone());
                emit(
                    &self.events,
                    HostEvent::SaveFailed {
                        asset_id,
                        error: save_error.clone(),
                    },
                );
                SubmitOutcome::Failed(save_error)
            }
        }
    }

    /// Runs a whole submit against `store`: begin, patch, finish.
    pub async fn submit(&mut self, store: &dyn AssetStore) -> SubmitOutcome {
        let pending = match self.begin_submit() {
            SubmitStart::Ignored => return SubmitOutcome::Ignored,
            SubmitStart::Unchanged => return SubmitOutcome::Closed,
            SubmitStart::Dispatch(pending) => pending,
        };
        let result = store.patch(&pending.request.id, &pending.request.set).await;
        self.finish_submit(pending.token, result)
    }
}
