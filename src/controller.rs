//! Per-view controller: store + gateway + edit session
//!
//! The controller owns the authoritative collection for one view and is the
//! only place that reconciles it after gateway calls. It holds transient,
//! UI-local state (search term, status filter, the edit-session draft) and
//! translates UI events into gateway calls. Gateway failures are converted
//! into dismissible messages while the user's in-progress edits are kept.

use tracing::{debug, warn};

use crate::errors::CrmError;
use crate::gateway::Gateway;
use crate::model::{Activity, Record};
use crate::query::{filter_records, StatusFilter};
use crate::session::{EditSession, SessionKind};
use crate::store::{CollectionStore, Snapshot};

pub struct EntityController<R: Record, G: Gateway<R>> {
    store: CollectionStore<R>,
    gateway: G,
    session: EditSession<R>,
    search: String,
    status: StatusFilter,
    loading: bool,
    /// Delete-in-progress guard, by record id.
    deleting: Option<i64>,
    last_error: Option<String>,
}

impl<R: Record, G: Gateway<R>> EntityController<R, G> {
    pub fn new(gateway: G) -> Self {
        Self {
            store: CollectionStore::new(),
            gateway,
            session: EditSession::new(),
            search: String::new(),
            status: StatusFilter::All,
            loading: false,
            deleting: None,
            last_error: None,
        }
    }

    pub fn store(&self) -> &CollectionStore<R> {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn session(&self) -> &EditSession<R> {
        &self.session
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Dismissible message from the last failed list or delete, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.status = status;
    }

    /// The filtered view of the store. Pure: the store itself is untouched.
    pub fn visible(&self) -> Vec<R> {
        filter_records(&self.store.snapshot(), &self.status, &self.search)
    }

    /// Fetch the full collection and replace the store. A refresh already in
    /// flight makes this a no-op.
    pub async fn refresh(&mut self) -> Result<(), CrmError> {
        if self.loading {
            debug!(entity = R::ENTITY, "refresh already in flight");
            return Ok(());
        }
        self.loading = true;
        let result = self.gateway.list().await;
        self.loading = false;

        match result {
            Ok(records) => {
                self.store.replace_all(R::reorder(records));
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                warn!(entity = R::ENTITY, error = %err, "refresh failed");
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Open the modal with a fresh creation draft.
    pub fn begin_create(&mut self, draft: R) {
        self.session.open_create(draft);
    }

    /// Open the modal on an independent copy of the stored record.
    pub fn begin_edit(&mut self, id: i64) -> Result<(), CrmError> {
        match self.store.get(id) {
            Some(copy) => {
                self.session.open_edit(copy);
                Ok(())
            }
            None => Err(crate::errors::NotFoundError::new(R::ENTITY, id).into()),
        }
    }

    /// Mutable access to the session draft for form edits.
    pub fn draft_mut(&mut self) -> Option<&mut R> {
        self.session.draft_mut()
    }

    /// Leave the modal via cancel: the draft is discarded.
    pub fn cancel_edit(&mut self) {
        self.session.cancel();
    }

    /// Submit the session draft through the gateway. A no-op when the modal
    /// is closed or a save is already in flight; only a successful response
    /// closes the modal and reconciles the store.
    pub async fn save(&mut self) -> Result<(), CrmError> {
        let Some((kind, draft)) = self.session.begin_save() else {
            debug!(entity = R::ENTITY, "save ignored: closed or in flight");
            return Ok(());
        };

        let result = match kind {
            SessionKind::Create => self.gateway.create(&draft).await,
            SessionKind::Edit => self.gateway.update(&draft).await,
        };

        match result {
            Ok(saved) => {
                self.store.upsert(saved);
                self.resort();
                self.session.finish_save_ok();
                Ok(())
            }
            Err(err) => {
                warn!(entity = R::ENTITY, error = %err, "save failed");
                self.session.finish_save_err(err.to_string());
                if err.is_not_found() {
                    self.resync().await;
                }
                Err(err)
            }
        }
    }

    /// Delete by id. A second invocation while the same delete is in flight
    /// is a no-op.
    pub async fn delete(&mut self, id: i64) -> Result<(), CrmError> {
        if self.deleting == Some(id) {
            debug!(entity = R::ENTITY, id, "delete already in flight");
            return Ok(());
        }
        self.deleting = Some(id);
        let result = self.gateway.delete(id).await;
        self.deleting = None;

        match result {
            Ok(()) => {
                self.store.remove(id);
                Ok(())
            }
            Err(err) => {
                warn!(entity = R::ENTITY, id, error = %err, "delete failed");
                self.last_error = Some(err.to_string());
                if err.is_not_found() {
                    // The local cache was stale; drop the ghost and resync.
                    self.store.remove(id);
                    self.resync().await;
                }
                Err(err)
            }
        }
    }

    fn resort(&self) {
        if R::ORDERED {
            let items = self.store.snapshot().to_vec();
            self.store.replace_all(R::reorder(items));
        }
    }

    /// Refetch after a vanished-id failure. Best effort: a failing resync
    /// keeps the current store.
    async fn resync(&mut self) {
        match self.gateway.list().await {
            Ok(records) => {
                self.store.replace_all(R::reorder(records));
            }
            Err(err) => warn!(entity = R::ENTITY, error = %err, "resync failed"),
        }
    }

    /// Current snapshot, unfiltered.
    pub fn snapshot(&self) -> Snapshot<R> {
        self.store.snapshot()
    }
}

impl<G: Gateway<Activity>> EntityController<Activity, G> {
    /// Mark an activity as completed through the normal update path.
    pub async fn mark_complete(&mut self, id: i64) -> Result<(), CrmError> {
        let Some(activity) = self.store.get(id) else {
            return Err(crate::errors::NotFoundError::new(Activity::ENTITY, id).into());
        };
        let completed = activity.completed();
        let saved = self.gateway.update(&completed).await?;
        self.store.upsert(saved);
        self.resort();
        Ok(())
    }
}
