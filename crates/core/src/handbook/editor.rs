//! Draft editor for the company handbook
//!
//! The server copy is authoritative; the operator edits a local draft. The
//! two diverge only while `dirty` is set, and `dirty` clears only when a save
//! round-trip (update then reload) succeeds.

use std::sync::Arc;

use console_domain::{ConsoleError, ConsoleResult, HandbookData};
use parking_lot::Mutex;
use tracing::{info, instrument};

use crate::backend::AgentBackend;
use crate::mutation::{BusySet, MutationTarget};

const SAVE: &str = "handbook:save";
const VALIDATE: &str = "handbook:validate";

/// Editor state as seen by renderers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandbookState {
    /// Last copy fetched from the server, if any.
    pub server: Option<HandbookData>,
    pub draft: String,
    pub dirty: bool,
    /// Bumped by every load and edit.
    pub revision: u64,
}

pub struct HandbookEditor {
    backend: Arc<dyn AgentBackend>,
    busy: BusySet,
    state: Mutex<HandbookState>,
}

impl HandbookEditor {
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self { backend, busy: BusySet::new(), state: Mutex::new(HandbookState::default()) }
    }

    pub fn state(&self) -> HandbookState {
        self.state.lock().clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    pub fn is_saving(&self) -> bool {
        self.busy.is_busy(&MutationTarget::item(SAVE))
    }

    pub fn is_validating(&self) -> bool {
        self.busy.is_busy(&MutationTarget::item(VALIDATE))
    }

    /// Fetch the server copy and reset the draft to it.
    ///
    /// An edit made while the fetch is in flight wins: only the server copy
    /// is replaced and the newer draft stays dirty.
    #[instrument(skip(self))]
    pub async fn load(&self) -> ConsoleResult<HandbookState> {
        let revision = self.state.lock().revision;
        let data = self.backend.handbook().await?;

        let mut state = self.state.lock();
        if state.revision == revision {
            state.draft = data.content.clone();
            state.dirty = false;
            state.revision += 1;
        } else {
            info!("Draft changed during load, keeping newer edits");
        }
        state.server = Some(data);
        Ok(state.clone())
    }

    /// Replace the draft and mark it dirty.
    pub fn edit(&self, content: impl Into<String>) {
        let mut state = self.state.lock();
        state.draft = content.into();
        state.dirty = true;
        state.revision += 1;
    }

    /// Upload the draft, then reload the server copy.
    ///
    /// If the draft was edited while the save was in flight, the newer draft
    /// and its dirty flag are kept. A failed reload leaves the draft dirty.
    #[instrument(skip(self))]
    pub async fn save(&self) -> ConsoleResult<String> {
        let (draft, revision) = {
            let state = self.state.lock();
            if !state.dirty {
                return Err(ConsoleError::invalid_transition("handbook has no unsaved changes"));
            }
            (state.draft.clone(), state.revision)
        };

        let _guard = self.busy.try_acquire(MutationTarget::item(SAVE))?;
        let response = self.backend.update_handbook(&draft).await?;
        let data = self.backend.handbook().await?;

        let mut state = self.state.lock();
        if state.revision == revision {
            state.draft = data.content.clone();
            state.dirty = false;
        } else {
            info!("Draft changed during save, keeping newer edits");
        }
        state.server = Some(data);
        Ok(response.message)
    }

    /// Ask the server to validate its copy.
    ///
    /// Only the validation results of the stored server copy change; the
    /// draft and dirty flag are untouched. Before the first load there is
    /// nothing to validate against, so the request is refused.
    #[instrument(skip(self))]
    pub async fn validate(&self) -> ConsoleResult<HandbookData> {
        if self.state.lock().server.is_none() {
            return Err(ConsoleError::invalid_transition("handbook has not been loaded yet"));
        }

        let _guard = self.busy.try_acquire(MutationTarget::item(VALIDATE))?;
        let data = self.backend.validate_handbook().await?;

        let mut state = self.state.lock();
        if let Some(server) = state.server.as_mut() {
            server.validation = data.validation.clone();
            server.is_complete = data.is_complete;
        }
        Ok(data)
    }
}
