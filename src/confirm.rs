//! Confirmation gate for destructive actions
//!
//! An action is staged first and only handed back to the caller on an
//! explicit confirm. Cancelling is a plain state reset.

/// What a staged action applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmTarget {
    Single { id: String, label: String },
    Bulk { ids: Vec<String> },
}

impl ConfirmTarget {
    pub fn ids(&self) -> Vec<String> {
        match self {
            ConfirmTarget::Single { id, .. } => vec![id.clone()],
            ConfirmTarget::Bulk { ids } => ids.clone(),
        }
    }
}

/// Pending action that requires confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub target: ConfirmTarget,
    pub message: String,
    pub destructive: bool,
    pub selected_yes: bool,
}

impl PendingAction {
    /// Destructive delete of `target`, focused on "No"
    pub fn delete(target: ConfirmTarget, singular: &str, plural: &str) -> Self {
        let message = match &target {
            ConfirmTarget::Single { label, .. } => format!("Delete {} '{}'?", singular, label),
            ConfirmTarget::Bulk { ids } if ids.len() == 1 => {
                format!("Delete 1 selected {}?", singular)
            }
            ConfirmTarget::Bulk { ids } => format!("Delete {} selected {}?", ids.len(), plural),
        };
        Self {
            target,
            message,
            destructive: true,
            selected_yes: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfirmationGate {
    #[default]
    Idle,
    Staged(PendingAction),
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `action`, replacing anything already staged
    pub fn stage(&mut self, action: PendingAction) {
        tracing::debug!("Staged: {}", action.message);
        *self = ConfirmationGate::Staged(action);
    }

    /// Hand back the staged target; nothing happens from `Idle`
    pub fn confirm(&mut self) -> Option<ConfirmTarget> {
        match std::mem::take(self) {
            ConfirmationGate::Staged(action) => {
                tracing::debug!("Confirmed: {}", action.message);
                Some(action.target)
            }
            ConfirmationGate::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        if let ConfirmationGate::Staged(action) = std::mem::take(self) {
            tracing::debug!("Cancelled: {}", action.message);
        }
    }

    pub fn is_staged(&self) -> bool {
        matches!(self, ConfirmationGate::Staged(_))
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        match self {
            ConfirmationGate::Staged(action) => Some(action),
            ConfirmationGate::Idle => None,
        }
    }

    /// Move the dialog focus between Yes and No
    pub fn set_selected_yes(&mut self, yes: bool) {
        if let ConfirmationGate::Staged(action) = self {
            action.selected_yes = yes;
        }
    }
}
