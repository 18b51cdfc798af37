//! Confirmation dialog and row menu state for a list view.
//!
//! A view has exactly one [`DialogState`], so two dialogs can never be open at
//! once, and one [`RowMenu`], so at most one row's action menu is open.

use crate::error::{CatalogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    /// Waiting for the user to confirm or cancel
    Open,
    /// Confirmed; the bound action is in flight
    Confirming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState<A> {
    Closed,
    Confirm {
        action: A,
        /// Row id the action applies to
        target: String,
        phase: DialogPhase,
    },
}

impl<A> Default for DialogState<A> {
    fn default() -> Self {
        DialogState::Closed
    }
}

/// How the dialog buttons render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogControls {
    pub confirm_enabled: bool,
    pub confirm_loading: bool,
    pub cancel_enabled: bool,
}

impl<A: Clone> DialogState<A> {
    /// Open a confirmation for `action` on `target`.
    pub fn open(&mut self, action: A, target: impl Into<String>) -> Result<()> {
        if !self.is_closed() {
            return Err(CatalogError::DialogBusy);
        }
        *self = DialogState::Confirm {
            action,
            target: target.into(),
            phase: DialogPhase::Open,
        };
        Ok(())
    }

    /// Move from `Open` to `Confirming`, handing out the action to run.
    /// Returns `None` in any other state, so an action is handed out once.
    pub fn confirm(&mut self) -> Option<(A, String)> {
        match self {
            DialogState::Confirm {
                action,
                target,
                phase,
            } if *phase == DialogPhase::Open => {
                *phase = DialogPhase::Confirming;
                Some((action.clone(), target.clone()))
            }
            _ => None,
        }
    }

    /// Outcome of the confirmed action: success closes, failure re-opens so
    /// the user can retry or cancel.
    pub fn resolve(&mut self, success: bool) {
        if let DialogState::Confirm { phase, .. } = self
            && *phase == DialogPhase::Confirming
        {
            if success {
                *self = DialogState::Closed;
            } else {
                *phase = DialogPhase::Open;
            }
        }
    }

    /// Dismiss without side effects. Refused while the action is in flight.
    pub fn cancel(&mut self) -> bool {
        match self {
            DialogState::Confirm {
                phase: DialogPhase::Open,
                ..
            } => {
                *self = DialogState::Closed;
                true
            }
            _ => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, DialogState::Closed)
    }

    pub fn is_confirming(&self) -> bool {
        matches!(
            self,
            DialogState::Confirm {
                phase: DialogPhase::Confirming,
                ..
            }
        )
    }

    pub fn action(&self) -> Option<&A> {
        match self {
            DialogState::Confirm { action, .. } => Some(action),
            DialogState::Closed => None,
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            DialogState::Confirm { target, .. } => Some(target),
            DialogState::Closed => None,
        }
    }

    pub fn controls(&self) -> Option<DialogControls> {
        match self {
            DialogState::Closed => None,
            DialogState::Confirm { phase, .. } => Some(DialogControls {
                confirm_enabled: true,
                confirm_loading: *phase == DialogPhase::Confirming,
                cancel_enabled: *phase == DialogPhase::Open,
            }),
        }
    }
}

/// The one row whose action menu is open, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMenu {
    open: Option<String>,
}

impl RowMenu {
    pub fn open(&mut self, row_id: impl Into<String>) {
        self.open = Some(row_id.into());
    }

    /// Open the menu for `row_id`, or close it if it is already open.
    pub fn toggle(&mut self, row_id: &str) {
        if self.is_open(row_id) {
            self.open = None;
        } else {
            self.open = Some(row_id.to_string());
        }
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self, row_id: &str) -> bool {
        self.open.as_deref() == Some(row_id)
    }

    pub fn open_row(&self) -> Option<&str> {
        self.open.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Action {
        Approve,
        Delete,
    }

    #[test]
    fn test_open_confirm_success_closes() {
        let mut dialog = DialogState::default();
        dialog.open(Action::Approve, "o1").unwrap();
        assert_eq!(dialog.confirm(), Some((Action::Approve, "o1".to_string())));
        assert!(dialog.is_confirming());
        dialog.resolve(true);
        assert!(dialog.is_closed());
    }

    #[test]
    fn test_second_dialog_is_refused() {
        let mut dialog = DialogState::default();
        dialog.open(Action::Approve, "o1").unwrap();
        assert!(matches!(
            dialog.open(Action::Delete, "o2"),
            Err(CatalogError::DialogBusy)
        ));
        assert_eq!(dialog.action(), Some(&Action::Approve));
    }

    #[test]
    fn test_action_is_handed_out_once() {
        let mut dialog = DialogState::default();
        dialog.open(Action::Delete, "d1").unwrap();
        assert!(dialog.confirm().is_some());
        assert!(dialog.confirm().is_none());
    }

    #[test]
    fn test_failure_returns_to_open() {
        let mut dialog = DialogState::default();
        dialog.open(Action::Approve, "o1").unwrap();
        dialog.confirm();
        dialog.resolve(false);
        assert_eq!(
            dialog,
            DialogState::Confirm {
                action: Action::Approve,
                target: "o1".to_string(),
                phase: DialogPhase::Open
            }
        );
        assert!(dialog.cancel());
        assert!(dialog.is_closed());
    }

    #[test]
    fn test_cancel_refused_while_confirming() {
        let mut dialog = DialogState::default();
        dialog.open(Action::Approve, "o1").unwrap();
        dialog.confirm();
        assert!(!dialog.cancel());
        assert_eq!(
            dialog.controls(),
            Some(DialogControls {
                confirm_enabled: true,
                confirm_loading: true,
                cancel_enabled: false,
            })
        );
    }

    #[test]
    fn test_row_menu_holds_one_row() {
        let mut menu = RowMenu::default();
        menu.open("a");
        menu.open("b");
        assert!(!menu.is_open("a"));
        assert!(menu.is_open("b"));
        menu.toggle("b");
        assert_eq!(menu.open_row(), None);
        menu.toggle("c");
        assert_eq!(menu.open_row(), Some("c"));
        menu.close();
        assert_eq!(menu.open_row(), None);
    }
}
