//! Modal edit-session state machine
//!
//! `Closed → Open(Create draft) | Open(Edit copy) → Closed`. The draft is an
//! independent copy: mutations during editing never touch the store's record
//! until a save succeeds. Cancel discards unconditionally; a failed save
//! keeps the session open with the user's edits intact and records a
//! dismissible error message.

/// How the open session was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Creating a new record (draft has no server id yet)
    Create,
    /// Editing an independent copy of an existing record
    Edit,
}

#[derive(Debug, Clone)]
enum State<R> {
    Closed,
    Open { kind: SessionKind, draft: R },
}

/// Per-view edit session with a save/delete-in-progress guard.
#[derive(Debug, Clone)]
pub struct EditSession<R> {
    state: State<R>,
    in_flight: bool,
    error: Option<String>,
}

impl<R> EditSession<R> {
    pub fn new() -> Self {
        Self {
            state: State::Closed,
            in_flight: false,
            error: None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn kind(&self) -> Option<SessionKind> {
        match &self.state {
            State::Open { kind, .. } => Some(*kind),
            State::Closed => None,
        }
    }

    /// Dismissible message from the last failed save, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Open the modal with a fresh creation draft. Replaces any previous
    /// closed state; ignored while a save is in flight.
    pub fn open_create(&mut self, draft: R) {
        if self.in_flight {
            return;
        }
        self.state = State::Open {
            kind: SessionKind::Create,
            draft,
        };
        self.error = None;
    }

    /// Open the modal on an independent copy of an existing record.
    pub fn open_edit(&mut self, copy: R) {
        if self.in_flight {
            return;
        }
        self.state = State::Open {
            kind: SessionKind::Edit,
            draft: copy,
        };
        self.error = None;
    }

    /// The in-progress draft, if the modal is open.
    pub fn draft(&self) -> Option<&R> {
        match &self.state {
            State::Open { draft, .. } => Some(draft),
            State::Closed => None,
        }
    }

    /// Mutable access to the draft for form edits.
    pub fn draft_mut(&mut self) -> Option<&mut R> {
        match &mut self.state {
            State::Open { draft, .. } => Some(draft),
            State::Closed => None,
        }
    }

    /// Leave via cancel: the copy is discarded unconditionally.
    pub fn cancel(&mut self) {
        if self.in_flight {
            return;
        }
        self.state = State::Closed;
        self.error = None;
    }

    /// Claim the in-flight flag for a save. Returns the draft to submit, or
    /// `None` when the session is closed or another save is already in
    /// flight (the double-submission guard: the second invocation is a
    /// no-op).
    pub fn begin_save(&mut self) -> Option<(SessionKind, R)>
    where
        R: Clone,
    {
        if self.in_flight {
            return None;
        }
        match &self.state {
            State::Open { kind, draft } => {
                self.in_flight = true;
                Some((*kind, draft.clone()))
            }
            State::Closed => None,
        }
    }

    /// A save succeeded: close the modal and clear the flag.
    pub fn finish_save_ok(&mut self) {
        self.in_flight = false;
        self.state = State::Closed;
        self.error = None;
    }

    /// A save failed: keep the modal open with the edits intact and surface
    /// the error.
    pub fn finish_save_err(&mut self, message: impl Into<String>) {
        self.in_flight = false;
        self.error = Some(message.into());
    }
}

impl<R> Default for EditSession<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_takes_an_independent_copy() {
        let original = "original".to_string();
        let mut session = EditSession::new();
        session.open_edit(original.clone());

        *session.draft_mut().unwrap() = "edited".to_string();
        assert_eq!(original, "original");
        assert_eq!(session.draft().unwrap(), "edited");
    }

    #[test]
    fn cancel_discards_unconditionally() {
        let mut session = EditSession::new();
        session.open_create("draft".to_string());
        session.cancel();
        assert!(!session.is_open());
        assert!(session.draft().is_none());
    }

    #[test]
    fn second_save_is_a_no_op_while_in_flight() {
        let mut session = EditSession::new();
        session.open_edit("copy".to_string());

        let first = session.begin_save();
        assert!(first.is_some());
        assert!(session.is_in_flight());

        // Rapid second invocation on the same in-flight session.
        assert!(session.begin_save().is_none());

        session.finish_save_ok();
        assert!(!session.is_in_flight());
        assert!(!session.is_open());
    }

    #[test]
    fn failed_save_keeps_edits_and_surfaces_error() {
        let mut session = EditSession::new();
        session.open_edit("edited".to_string());
        session.begin_save().unwrap();
        session.finish_save_err("server returned 500");

        assert!(session.is_open());
        assert_eq!(session.draft().unwrap(), "edited");
        assert_eq!(session.error(), Some("server returned 500"));

        session.dismiss_error();
        assert_eq!(session.error(), None);
    }

    #[test]
    fn save_on_closed_session_is_a_no_op() {
        let mut session: EditSession<String> = EditSession::new();
        assert!(session.begin_save().is_none());
    }
}
