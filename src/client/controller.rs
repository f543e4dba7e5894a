use maud::Markup;
use tracing::{debug, warn};

use crate::{
    auth::dto::{LoginRequest, PublicUser, RegisterRequest},
    client::{
        api::{ApiClient, ClientError},
        page::{AuthForm, Page, Region},
        state::ClientState,
        transport::Transport,
        view,
    },
    movies::dto::AddMovieRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

/// Whatever displays the client: a browser DOM, a terminal, a test recorder.
pub trait Surface {
    /// Hides every page region.
    fn hide_all(&mut self);
    /// Makes `region` visible with `content` as its body.
    fn show(&mut self, region: Region, content: Markup);
    fn alert(&mut self, kind: AlertKind, message: &str);
    /// Toggles signed-in/signed-out chrome (nav links, login badge).
    fn reflect_user(&mut self, user: Option<&PublicUser>);
    /// Stores or clears the persisted current-user marker.
    fn persist_marker(&mut self, marker: Option<String>);
}

/// A submitted form, already read into typed fields.
#[derive(Debug, Clone)]
pub enum Form {
    Login(LoginRequest),
    Register { request: RegisterRequest, password_confirm: String },
    AddMovie(AddMovieRequest),
}

/// Coordinates navigation, dispatcher calls, and rendering.
///
/// The guard on profile/add-movie is a convenience only; the server rejects
/// those calls on its own when there is no session.
pub struct Controller<T, S> {
    api: ApiClient<T>,
    surface: S,
    state: ClientState,
}

impl<T: Transport, S: Surface> Controller<T, S> {
    pub fn new(api: ApiClient<T>, mut surface: S, marker: Option<&str>) -> Self {
        let state = ClientState::restore(marker);
        surface.reflect_user(state.current_user.as_ref());
        Self { api, surface, state }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Renders whatever page the state points at.
    pub async fn reload(&mut self) {
        self.navigate(self.state.current_page).await;
    }

    pub async fn navigate(&mut self, page: Page) {
        let mut target = page;
        // a render may redirect (guard, expired session); follow until one sticks
        while let Some(next) = self.render(target).await {
            debug!(from = target.slug(), to = next.slug(), "redirect");
            target = next;
        }
    }

    /// Follows a `data-page` link or a `*.html` href.
    pub async fn follow_link(&mut self, slug: &str, id: Option<i64>) {
        self.navigate(Page::from_slug(slug, id)).await;
    }

    /// Handles a `data-action` click.
    pub async fn action(&mut self, action: &str) {
        match action {
            "logout" => self.logout().await,
            "show-register" => self.navigate(Page::LoginPanel { form: AuthForm::Register }).await,
            "show-login" => self.navigate(Page::LOGIN).await,
            other => warn!(action = other, "unknown action"),
        }
    }

    async fn render(&mut self, page: Page) -> Option<Page> {
        if page.requires_user() && !self.state.is_signed_in() {
            return Some(Page::LOGIN);
        }
        self.state.current_page = page;
        self.surface.hide_all();

        let region = page.region();
        let content = match page {
            Page::MovieList => match self.api.movies().await {
                Ok(movies) => view::movie_list(&movies),
                Err(e) => return self.failed(region, "Could not load movies", e),
            },
            Page::MovieDetail { id: None } => view::missing_movie("No movie selected"),
            Page::MovieDetail { id: Some(id) } => match self.api.movie(id).await {
                Ok(movie) => view::movie_detail(&movie),
                Err(ClientError::Rejected { message, .. }) => view::missing_movie(&message),
                Err(e) => return self.failed(region, "Could not load the movie", e),
            },
            Page::LoginPanel { form } => view::login_panel(form),
            Page::UserProfile => {
                let Some(user) = self.state.current_user.clone() else {
                    return Some(Page::LOGIN);
                };
                match self.api.user_movies().await {
                    Ok(movies) => view::user_profile(&user, &movies),
                    Err(e) if e.is_unauthorized() => return Some(self.session_lost()),
                    Err(e) => return self.failed(region, "Could not load your movies", e),
                }
            }
            Page::AddMovie => view::add_movie_form(),
        };

        self.surface.show(region, content);
        None
    }

    fn failed(&mut self, region: Region, message: &str, e: ClientError) -> Option<Page> {
        warn!(error = %e, "page load failed");
        self.surface.show(region, Markup::default());
        self.surface.alert(AlertKind::Error, message);
        None
    }

    /// The server no longer knows our session: drop the stale marker.
    fn session_lost(&mut self) -> Page {
        self.set_user(None);
        self.surface.alert(AlertKind::Error, "Your session has expired. Please log in again.");
        Page::LOGIN
    }

    fn set_user(&mut self, user: Option<PublicUser>) {
        self.state.current_user = user;
        self.surface.persist_marker(self.state.marker());
        self.surface.reflect_user(self.state.current_user.as_ref());
    }

    pub async fn submit(&mut self, form: Form) {
        match form {
            Form::Login(req) => self.login(req).await,
            Form::Register { request, password_confirm } => {
                self.register(request, password_confirm).await
            }
            Form::AddMovie(req) => self.add_movie(req).await,
        }
    }

    async fn login(&mut self, req: LoginRequest) {
        match self.api.login(&req).await {
            Ok(user) => {
                self.set_user(Some(user));
                self.surface.alert(AlertKind::Success, "Logged in successfully!");
                self.navigate(Page::MovieList).await;
            }
            Err(ClientError::Rejected { .. }) => {
                self.surface.alert(AlertKind::Error, "Login failed! Check your credentials.");
            }
            Err(e) => {
                warn!(error = %e, "login call failed");
                self.surface.alert(AlertKind::Error, "Login error!");
            }
        }
    }

    async fn register(&mut self, req: RegisterRequest, password_confirm: String) {
        if req.password != password_confirm {
            self.surface.alert(AlertKind::Error, "Passwords do not match!");
            return;
        }
        match self.api.register(&req).await {
            Ok(()) => {
                self.surface
                    .alert(AlertKind::Success, "Registration successful! You can log in now.");
                self.navigate(Page::LOGIN).await;
            }
            Err(ClientError::Rejected { .. }) => {
                self.surface.alert(
                    AlertKind::Error,
                    "Registration failed! Login or email already exists.",
                );
            }
            Err(e) => {
                warn!(error = %e, "register call failed");
                self.surface.alert(AlertKind::Error, "Registration error!");
            }
        }
    }

    async fn add_movie(&mut self, req: AddMovieRequest) {
        match self.api.add_movie(&req).await {
            Ok(movie) => {
                debug!(movie_id = movie.id, "movie added");
                self.surface.alert(AlertKind::Success, "Movie added!");
                self.navigate(Page::UserProfile).await;
            }
            Err(e) if e.is_unauthorized() => {
                let next = self.session_lost();
                self.navigate(next).await;
            }
            Err(e) => {
                warn!(error = %e, "add movie failed");
                self.surface.alert(AlertKind::Error, "Could not add the movie!");
            }
        }
    }

    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "logout call failed");
            return;
        }
        self.set_user(None);
        self.surface.alert(AlertKind::Success, "Logged out!");
        self.navigate(Page::MovieList).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::build_app, client::transport::InProcessTransport, state::AppState};

    #[derive(Default)]
    struct Recorder {
        visible: Option<(Region, String)>,
        alerts: Vec<(AlertKind, String)>,
        user: Option<PublicUser>,
        marker: Option<String>,
        shows: usize,
    }

    impl Surface for Recorder {
        fn hide_all(&mut self) {
            self.visible = None;
        }
        fn show(&mut self, region: Region, content: Markup) {
            assert!(self.visible.is_none(), "two regions visible");
            self.visible = Some((region, content.into_string()));
            self.shows += 1;
        }
        fn alert(&mut self, kind: AlertKind, message: &str) {
            self.alerts.push((kind, message.to_string()));
        }
        fn reflect_user(&mut self, user: Option<&PublicUser>) {
            self.user = user.cloned();
        }
        fn persist_marker(&mut self, marker: Option<String>) {
            self.marker = marker;
        }
    }

    impl Recorder {
        fn region(&self) -> Option<Region> {
            self.visible.as_ref().map(|(r, _)| *r)
        }
        fn html(&self) -> &str {
            self.visible.as_ref().map(|(_, h)| h.as_str()).unwrap_or("")
        }
        fn last_alert(&self) -> Option<&(AlertKind, String)> {
            self.alerts.last()
        }
    }

    fn controller(marker: Option<&str>) -> Controller<InProcessTransport, Recorder> {
        let transport = InProcessTransport::new(build_app(AppState::fake()));
        Controller::new(ApiClient::new(transport), Recorder::default(), marker)
    }

    fn register_form(login: &str, password: &str, confirm: &str) -> Form {
        Form::Register {
            request: RegisterRequest {
                login: login.into(),
                password: password.into(),
                email: format!("{login}@x.com"),
            },
            password_confirm: confirm.into(),
        }
    }

    fn login_form(login: &str, password: &str) -> Form {
        Form::Login(LoginRequest { login: login.into(), password: password.into() })
    }

    #[tokio::test]
    async fn starts_on_movie_list() {
        let mut c = controller(None);
        c.reload().await;
        assert_eq!(c.surface().region(), Some(Region::Movies));
        assert_eq!(c.state().current_page, Page::MovieList);
    }

    #[tokio::test]
    async fn guarded_pages_redirect_to_login() {
        let mut c = controller(None);
        c.navigate(Page::UserProfile).await;
        assert_eq!(c.surface().region(), Some(Region::Login));
        assert_eq!(c.state().current_page, Page::LOGIN);

        c.follow_link("add-movie", None).await;
        assert_eq!(c.surface().region(), Some(Region::Login));
        assert!(c.surface().html().contains("login-form"));
    }

    #[tokio::test]
    async fn mismatched_passwords_never_reach_the_server() {
        let mut c = controller(None);
        c.submit(register_form("ann", "p1", "p2")).await;
        assert_eq!(
            c.surface().last_alert(),
            Some(&(AlertKind::Error, "Passwords do not match!".to_string()))
        );
        // nothing was registered, so login fails
        c.submit(login_form("ann", "p1")).await;
        assert!(!c.state().is_signed_in());
    }

    #[tokio::test]
    async fn full_session_flow() {
        let mut c = controller(None);

        c.action("show-register").await;
        assert!(c.surface().html().contains("register-form"));

        c.submit(register_form("ann", "p1", "p1")).await;
        assert_eq!(c.state().current_page, Page::LOGIN);
        assert_eq!(c.surface().last_alert().unwrap().0, AlertKind::Success);

        c.submit(login_form("ann", "wrong")).await;
        assert!(!c.state().is_signed_in());
        assert_eq!(c.surface().last_alert().unwrap().0, AlertKind::Error);

        c.submit(login_form("ann", "p1")).await;
        assert_eq!(c.state().current_user.as_ref().unwrap().login, "ann");
        assert!(c.surface().marker.as_deref().unwrap().contains("\"ann\""));
        assert_eq!(c.surface().user.as_ref().unwrap().login, "ann");
        assert_eq!(c.surface().region(), Some(Region::Movies));

        c.navigate(Page::AddMovie).await;
        assert_eq!(c.surface().region(), Some(Region::AddMovie));

        c.submit(Form::AddMovie(AddMovieRequest {
            title: "<b>Alien</b>".into(),
            description: "In space".into(),
            image_path: None,
        }))
        .await;
        assert_eq!(c.state().current_page, Page::UserProfile);
        assert!(c.surface().html().contains("&lt;b&gt;Alien&lt;/b&gt;"));
        assert!(!c.surface().html().contains("<b>Alien"));

        c.navigate(Page::MovieDetail { id: Some(1) }).await;
        assert!(c.surface().html().contains("In space"));

        c.action("logout").await;
        assert!(!c.state().is_signed_in());
        assert_eq!(c.surface().marker, None);
        assert_eq!(c.surface().user, None);
        assert_eq!(c.state().current_page, Page::MovieList);
    }

    #[tokio::test]
    async fn stale_marker_is_dropped_when_server_has_no_session() {
        let marker = r#"{"id":5,"login":"ghost"}"#;
        let mut c = controller(Some(marker));
        assert!(c.state().is_signed_in());

        c.navigate(Page::UserProfile).await;
        assert!(!c.state().is_signed_in());
        assert_eq!(c.surface().marker, None);
        assert_eq!(c.surface().region(), Some(Region::Login));
    }

    #[tokio::test]
    async fn missing_movie_shows_message() {
        let mut c = controller(None);
        c.navigate(Page::MovieDetail { id: Some(42) }).await;
        assert_eq!(c.surface().region(), Some(Region::MovieDetail));
        assert!(c.surface().html().contains("Movie not found"));

        c.navigate(Page::MovieDetail { id: None }).await;
        assert!(c.surface().html().contains("No movie selected"));
    }
}
