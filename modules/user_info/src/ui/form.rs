use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use crate::contract::error::UserInfoError;
use crate::contract::model::UserInfo;
use crate::domain::store::UserInfoStore;
use crate::domain::validate::{validate_user_info, FieldError};
use crate::ui::nav::Navigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

#[derive(Error, Debug)]
pub enum FormError {
    #[error("validation failed: {}", join_errors(.0))]
    Invalid(Vec<FieldError>),
    #[error(transparent)]
    Remote(#[from] UserInfoError),
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Controller for the create/edit form.
pub struct FormController {
    store: UserInfoStore,
    nav: Arc<dyn Navigator>,
    return_to: String,
    mode: FormMode,
}

impl FormController {
    pub fn new(
        store: UserInfoStore,
        nav: Arc<dyn Navigator>,
        return_to: impl Into<String>,
        mode: FormMode,
    ) -> Self {
        Self {
            store,
            nav,
            return_to: return_to.into(),
            mode,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Prepare the form: reset state for a new record, load for an edit.
    pub async fn open(&self) -> Result<Option<UserInfo>, UserInfoError> {
        match self.mode {
            FormMode::Create => {
                self.store.reset();
                Ok(None)
            }
            FormMode::Edit(id) => self.store.fetch_one(id).await.map(Some),
        }
    }

    /// Validate the draft against every field constraint, submit it, and
    /// navigate back to the list on success. Invalid drafts never reach the
    /// wire.
    #[instrument(name = "user_info.form.save", skip_all, fields(mode = ?self.mode))]
    pub async fn save(&self, mut draft: UserInfo) -> Result<UserInfo, FormError> {
        validate_user_info(&draft).map_err(FormError::Invalid)?;
        let saved = match self.mode {
            FormMode::Create => {
                draft.id = None;
                self.store.create(draft).await?
            }
            FormMode::Edit(id) => {
                draft.id = Some(id);
                self.store.update(draft).await?
            }
        };
        self.nav.navigate(self.return_to.clone());
        Ok(saved)
    }
}
