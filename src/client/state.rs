use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::dto::PublicUser;
use crate::client::page::Page;

/// Everything the client remembers between events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    pub current_user: Option<PublicUser>,
    pub current_page: Page,
}

impl ClientState {
    /// Rebuilds state from a persisted "current user" marker. A corrupt
    /// marker is ignored.
    pub fn restore(marker: Option<&str>) -> Self {
        let current_user = marker.and_then(|m| match serde_json::from_str(m) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "discarding unreadable user marker");
                None
            }
        });
        Self { current_user, current_page: Page::MovieList }
    }

    /// The marker to persist for the current user, if any.
    pub fn marker(&self) -> Option<String> {
        self.current_user
            .as_ref()
            .and_then(|u| serde_json::to_string(u).ok())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_round_trips_user() {
        let state = ClientState {
            current_user: Some(PublicUser { id: 4, login: "ann".into() }),
            current_page: Page::UserProfile,
        };
        let restored = ClientState::restore(state.marker().as_deref());
        assert_eq!(restored.current_user, state.current_user);
        assert_eq!(restored.current_page, Page::MovieList);
    }

    #[test]
    fn corrupt_marker_means_signed_out() {
        assert!(!ClientState::restore(Some("{nope")).is_signed_in());
        assert!(!ClientState::restore(None).is_signed_in());
    }
}
