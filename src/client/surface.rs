//! A `Surface` that keeps the whole page as markup, for rendering the client
//! outside a browser (server-side snapshots, terminals, tests).

use maud::{html, Markup, PreEscaped};

use crate::auth::dto::PublicUser;
use crate::client::{
    controller::{AlertKind, Surface},
    page::Region,
};

#[derive(Default)]
pub struct HtmlSurface {
    visible: Option<(Region, String)>,
    alert: Option<(AlertKind, String)>,
    user: Option<PublicUser>,
    marker: Option<String>,
}

impl HtmlSurface {
    pub fn visible_region(&self) -> Option<Region> {
        self.visible.as_ref().map(|(r, _)| *r)
    }

    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    /// Every region as a `section`; all but the visible one carry `hidden`.
    pub fn document(&self) -> Markup {
        html! {
            nav {
                @if let Some(user) = &self.user {
                    span #current-user { (user.login) }
                    a href="profile.html" data-page="profile" { "Profile" }
                    a href="add-movie.html" data-page="add-movie" { "Add movie" }
                    button type="button" data-action="logout" { "Log out" }
                } @else {
                    a href="login.html" data-page="login" { "Log in" }
                }
            }
            @if let Some((kind, message)) = &self.alert {
                div.alert.(alert_class(*kind)) { (message) }
            }
            @for region in Region::ALL {
                @match &self.visible {
                    Some((shown, body)) if *shown == region => {
                        section id=(region.element_id()) { (PreEscaped(body.as_str())) }
                    }
                    _ => {
                        section id=(region.element_id()) hidden {}
                    }
                }
            }
        }
    }
}

fn alert_class(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Success => "alert-success",
        AlertKind::Error => "alert-error",
    }
}

impl Surface for HtmlSurface {
    fn hide_all(&mut self) {
        self.visible = None;
    }

    fn show(&mut self, region: Region, content: Markup) {
        self.visible = Some((region, content.into_string()));
    }

    fn alert(&mut self, kind: AlertKind, message: &str) {
        self.alert = Some((kind, message.to_string()));
    }

    fn reflect_user(&mut self, user: Option<&PublicUser>) {
        self.user = user.cloned();
    }

    fn persist_marker(&mut self, marker: Option<String>) {
        self.marker = marker;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::build_app,
        client::{api::ApiClient, controller::Controller, page::Page, transport::InProcessTransport},
        state::AppState,
    };

    #[tokio::test]
    async fn only_the_current_region_is_unhidden() {
        let transport = InProcessTransport::new(build_app(AppState::fake()));
        let mut c = Controller::new(ApiClient::new(transport), HtmlSurface::default(), None);
        c.navigate(Page::UserProfile).await;

        assert_eq!(c.surface().visible_region(), Some(Region::Login));
        let doc = c.surface().document().into_string();
        for region in Region::ALL {
            let id = region.element_id();
            let open = if region == Region::Login {
                format!(r#"<section id="{id}">"#)
            } else {
                format!(r#"<section id="{id}" hidden>"#)
            };
            assert!(doc.contains(&open), "{id} in {doc}");
        }
        assert!(doc.contains("login-form"));
        assert!(doc.contains(r#"data-page="login""#));
    }

    #[test]
    fn alert_text_is_escaped() {
        let mut s = HtmlSurface::default();
        s.alert(AlertKind::Error, "<img src=x>");
        let doc = s.document().into_string();
        assert!(doc.contains("alert-error"));
        assert!(doc.contains("&lt;img src=x&gt;"));
    }
}
