//! Theme router: `/profile/{user_id}` hands over to the themed page.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::instrument;

use cardfolio_core::UserId;

use crate::navigation::Route;
use crate::resolver::resolve_theme;
use crate::state::AppState;

/// Look up the account's theme and redirect to its page.
///
/// Always redirects; lookup failures fall back to the standard theme.
#[instrument(skip(state))]
pub async fn redirect(State(state): State<AppState>, Path(user_id): Path<String>) -> Redirect {
    let theme = resolve_theme(state.backend(), &UserId::new(user_id.as_str())).await;
    Route::profile(theme, user_id).redirect()
}
