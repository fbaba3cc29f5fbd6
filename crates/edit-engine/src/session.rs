//! The draft and its edit budget.

use makeitmeme_common::error::{MemeError, MemeResult};
use makeitmeme_feed_model::AssetId;
use serde::Serialize;

use crate::picker::AssetPicker;

/// Number of base-image swaps a fresh draft may spend.
pub const MAX_EDITS: u8 = 5;

/// Lifecycle position of a draft, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Full budget and no captions yet.
    Fresh,
    /// Captions set or budget partly spent.
    Editing,
    /// Budget spent. Captions can still change; swaps are rejected.
    Locked,
}

/// A user-issued change to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    SetTopText(String),
    SetBottomText(String),
    RequestSwap,
}

/// What an accepted command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    TextUpdated,
    Swapped { from: AssetId, to: AssetId },
}

/// An in-progress meme draft.
///
/// Values are immutable: every transition returns a new session, leaving
/// `self` untouched, so a rejected command can never leak a partial
/// update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditSession {
    asset_id: AssetId,
    top_text: String,
    bottom_text: String,
    edits_remaining: u8,
}

impl EditSession {
    /// Start a fresh draft on `asset_id`.
    pub fn new(asset_id: AssetId) -> Self {
        Self {
            asset_id,
            top_text: String::new(),
            bottom_text: String::new(),
            edits_remaining: MAX_EDITS,
        }
    }

    pub fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    pub fn top_text(&self) -> &str {
        &self.top_text
    }

    pub fn bottom_text(&self) -> &str {
        &self.bottom_text
    }

    pub fn edits_remaining(&self) -> u8 {
        self.edits_remaining
    }

    pub fn state(&self) -> SessionState {
        if self.edits_remaining == 0 {
            SessionState::Locked
        } else if self.edits_remaining == MAX_EDITS
            && self.top_text.is_empty()
            && self.bottom_text.is_empty()
        {
            SessionState::Fresh
        } else {
            SessionState::Editing
        }
    }

    pub fn with_top_text(&self, text: impl Into<String>) -> Self {
        Self {
            top_text: text.into(),
            ..self.clone()
        }
    }

    pub fn with_bottom_text(&self, text: impl Into<String>) -> Self {
        Self {
            bottom_text: text.into(),
            ..self.clone()
        }
    }

    /// Spend one unit of budget on a different base image from `pool`.
    ///
    /// Captions are cleared since they were written for the old image.
    pub fn request_swap(
        &self,
        pool: &[AssetId],
        picker: &mut dyn AssetPicker,
    ) -> MemeResult<(Self, EditOutcome)> {
        if self.edits_remaining == 0 {
            return Err(MemeError::BudgetExhausted);
        }

        let candidates: Vec<AssetId> = pool
            .iter()
            .filter(|id| **id != self.asset_id)
            .cloned()
            .collect();
        let next = picker
            .pick(&candidates)
            .cloned()
            .ok_or(MemeError::NoAlternative)?;

        let outcome = EditOutcome::Swapped {
            from: self.asset_id.clone(),
            to: next.clone(),
        };
        let session = Self {
            asset_id: next,
            top_text: String::new(),
            bottom_text: String::new(),
            edits_remaining: self.edits_remaining - 1,
        };
        Ok((session, outcome))
    }

    /// Pure transition function. On error the returned session is an
    /// unchanged copy of `self`.
    pub fn apply(
        &self,
        command: EditCommand,
        pool: &[AssetId],
        picker: &mut dyn AssetPicker,
    ) -> (Self, MemeResult<EditOutcome>) {
        match command {
            EditCommand::SetTopText(text) => (self.with_top_text(text), Ok(EditOutcome::TextUpdated)),
            EditCommand::SetBottomText(text) => {
                (self.with_bottom_text(text), Ok(EditOutcome::TextUpdated))
            }
            EditCommand::RequestSwap => match self.request_swap(pool, picker) {
                Ok((session, outcome)) => (session, Ok(outcome)),
                Err(e) => (self.clone(), Err(e)),
            },
        }
    }

    /// The fresh draft that follows a successful commit: full budget, no
    /// captions, and a base image other than the committed one when the
    /// pool allows it.
    pub fn next_after_commit(&self, pool: &[AssetId], picker: &mut dyn AssetPicker) -> Self {
        let candidates: Vec<AssetId> = pool
            .iter()
            .filter(|id| **id != self.asset_id)
            .cloned()
            .collect();
        let next = picker
            .pick(&candidates)
            .cloned()
            .unwrap_or_else(|| self.asset_id.clone());
        Self::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::FirstPicker;

    fn pool() -> Vec<AssetId> {
        ["m1", "m2", "m3"].into_iter().map(AssetId::from).collect()
    }

    #[test]
    fn test_new_session_is_fresh() {
        let session = EditSession::new("m1".into());
        assert_eq!(session.edits_remaining(), MAX_EDITS);
        assert_eq!(session.state(), SessionState::Fresh);
    }

    #[test]
    fn test_text_edits_are_free() {
        let session = EditSession::new("m1".into())
            .with_top_text("top")
            .with_bottom_text("bottom");
        assert_eq!(session.edits_remaining(), MAX_EDITS);
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(session.top_text(), "top");
        assert_eq!(session.bottom_text(), "bottom");
    }

    #[test]
    fn test_swap_picks_other_asset_and_clears_text() {
        let session = EditSession::new("m1".into()).with_top_text("old");
        let (next, outcome) = session.request_swap(&pool(), &mut FirstPicker).unwrap();

        assert_eq!(next.asset_id().as_str(), "m2");
        assert_eq!(next.edits_remaining(), MAX_EDITS - 1);
        assert!(next.top_text().is_empty());
        assert_eq!(
            outcome,
            EditOutcome::Swapped {
                from: "m1".into(),
                to: "m2".into()
            }
        );
        // The receiver is untouched.
        assert_eq!(session.top_text(), "old");
    }

    #[test]
    fn test_swap_without_alternative_fails() {
        let session = EditSession::new("m1".into());
        let only_self = vec![AssetId::from("m1")];
        assert!(matches!(
            session.request_swap(&only_self, &mut FirstPicker),
            Err(MemeError::NoAlternative)
        ));
        assert!(matches!(
            session.request_swap(&[], &mut FirstPicker),
            Err(MemeError::NoAlternative)
        ));
    }

    #[test]
    fn test_locked_session_rejects_swap_but_accepts_text() {
        let mut session = EditSession::new("m1".into());
        for _ in 0..MAX_EDITS {
            session = session.request_swap(&pool(), &mut FirstPicker).unwrap().0;
        }
        assert_eq!(session.state(), SessionState::Locked);

        let (same, result) = session.apply(EditCommand::RequestSwap, &pool(), &mut FirstPicker);
        assert!(matches!(result, Err(MemeError::BudgetExhausted)));
        assert_eq!(same, session);

        let (texted, result) =
            session.apply(EditCommand::SetTopText("still".into()), &pool(), &mut FirstPicker);
        assert!(matches!(result, Ok(EditOutcome::TextUpdated)));
        assert_eq!(texted.top_text(), "still");
        assert_eq!(texted.state(), SessionState::Locked);
    }

    #[test]
    fn test_next_after_commit_resets_budget() {
        let session = EditSession::new("m1".into())
            .request_swap(&pool(), &mut FirstPicker)
            .unwrap()
            .0
            .with_bottom_text("x");
        let next = session.next_after_commit(&pool(), &mut FirstPicker);
        assert_eq!(next.state(), SessionState::Fresh);
        assert_ne!(next.asset_id(), session.asset_id());
    }

    #[test]
    fn test_next_after_commit_keeps_asset_without_alternative() {
        let session = EditSession::new("m1".into()).with_top_text("x");
        let next = session.next_after_commit(&[AssetId::from("m1")], &mut FirstPicker);
        assert_eq!(next, EditSession::new("m1".into()));
    }
}
