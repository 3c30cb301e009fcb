//! User-facing failure notices
//!
//! Screens show one generic line per failed action; the error itself goes
//! to the log. Opening a tab is the exception and shows what the backend
//! said (e.g. the table already has an open tab).

use std::fmt;

use crate::ClientError;

/// Store operation that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SignIn,
    SignUp,
    AddMenuItem,
    DeleteMenuItem,
    OpenTab,
    AddItem,
    UpdateStatus,
    CloseTab,
}

impl Action {
    fn generic_message(self) -> &'static str {
        match self {
            Self::SignIn => "Could not sign in. Check your credentials.",
            Self::SignUp => "Could not create the account.",
            Self::AddMenuItem => "Could not add the menu item.",
            Self::DeleteMenuItem => "Could not delete the menu item.",
            Self::OpenTab => "Could not open the tab.",
            Self::AddItem => "Could not add the item to the tab.",
            Self::UpdateStatus => "Could not update the item status.",
            Self::CloseTab => "Could not close the tab.",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SignIn => "sign_in",
            Self::SignUp => "sign_up",
            Self::AddMenuItem => "add_menu_item",
            Self::DeleteMenuItem => "delete_menu_item",
            Self::OpenTab => "open_tab",
            Self::AddItem => "add_item_to_tab",
            Self::UpdateStatus => "update_item_status",
            Self::CloseTab => "close_tab",
        })
    }
}

/// Text for the blocking alert shown after `action` failed with `err`.
pub fn alert_message(action: Action, err: &ClientError) -> String {
    if action == Action::OpenTab
        && let Some(server) = err.server_message()
    {
        return server.to_string();
    }
    action.generic_message().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_tab_shows_server_message() {
        let err = ClientError::Validation("Mesa 5 já possui uma comanda aberta".into());
        assert_eq!(
            alert_message(Action::OpenTab, &err),
            "Mesa 5 já possui uma comanda aberta"
        );
    }

    #[test]
    fn test_other_actions_stay_generic() {
        let err = ClientError::Validation("quantidade inválida".into());
        assert_eq!(
            alert_message(Action::AddItem, &err),
            "Could not add the item to the tab."
        );

        let err = ClientError::Api {
            status: 502,
            message: None,
        };
        assert_eq!(alert_message(Action::OpenTab, &err), "Could not open the tab.");
    }
}
