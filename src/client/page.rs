use serde::{Deserialize, Serialize};

/// Which of the two forms the login panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthForm {
    Login,
    Register,
}

/// The closed set of logical pages the client can be on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "kebab-case")]
pub enum Page {
    #[default]
    MovieList,
    MovieDetail { id: Option<i64> },
    LoginPanel { form: AuthForm },
    UserProfile,
    AddMovie,
}

/// DOM region a page renders into. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Movies,
    MovieDetail,
    Login,
    Profile,
    AddMovie,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Movies,
        Region::MovieDetail,
        Region::Login,
        Region::Profile,
        Region::AddMovie,
    ];

    /// Element id of the region's section.
    pub fn element_id(self) -> &'static str {
        match self {
            Region::Movies => "movies-page",
            Region::MovieDetail => "movie-detail-page",
            Region::Login => "login-page",
            Region::Profile => "profile-page",
            Region::AddMovie => "add-movie-page",
        }
    }
}

impl Page {
    pub const LOGIN: Page = Page::LoginPanel { form: AuthForm::Login };

    /// Resolves a navigation slug (`data-page` value or `*.html` stem).
    /// Unknown slugs land on the movie list.
    pub fn from_slug(slug: &str, id: Option<i64>) -> Page {
        match slug.trim_end_matches(".html") {
            "movie" => Page::MovieDetail { id },
            "login" => Page::LOGIN,
            "register" => Page::LoginPanel { form: AuthForm::Register },
            "profile" => Page::UserProfile,
            "add-movie" => Page::AddMovie,
            _ => Page::MovieList,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Page::MovieList => "movies",
            Page::MovieDetail { .. } => "movie",
            Page::LoginPanel { form: AuthForm::Login } => "login",
            Page::LoginPanel { form: AuthForm::Register } => "register",
            Page::UserProfile => "profile",
            Page::AddMovie => "add-movie",
        }
    }

    pub fn region(self) -> Region {
        match self {
            Page::MovieList => Region::Movies,
            Page::MovieDetail { .. } => Region::MovieDetail,
            Page::LoginPanel { .. } => Region::Login,
            Page::UserProfile => Region::Profile,
            Page::AddMovie => Region::AddMovie,
        }
    }

    /// Pages the client refuses to show without a signed-in user.
    pub fn requires_user(self) -> bool {
        matches!(self, Page::UserProfile | Page::AddMovie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_resolve_and_unknown_falls_back() {
        assert_eq!(Page::from_slug("movie", Some(3)), Page::MovieDetail { id: Some(3) });
        assert_eq!(Page::from_slug("profile.html", None), Page::UserProfile);
        assert_eq!(Page::from_slug("whatever", None), Page::MovieList);
        for page in [Page::MovieList, Page::LOGIN, Page::UserProfile, Page::AddMovie] {
            assert_eq!(Page::from_slug(page.slug(), None), page);
        }
    }

    #[test]
    fn only_profile_and_add_movie_are_guarded() {
        assert!(Page::UserProfile.requires_user());
        assert!(Page::AddMovie.requires_user());
        assert!(!Page::MovieList.requires_user());
        assert!(!Page::MovieDetail { id: None }.requires_user());
        assert!(!Page::LOGIN.requires_user());
    }
}
