use serde::{Deserialize, Serialize};

use crate::movies::repo_types::{Movie, NewMovie};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMovieRequest {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

impl From<AddMovieRequest> for NewMovie {
    fn from(r: AddMovieRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            image_path: r.image_path.unwrap_or_default(),
        }
    }
}

/// `?id=` on `/api/movie`; kept as text so a non-numeric id is ours to reject.
#[derive(Debug, Deserialize)]
pub struct MovieQuery {
    pub id: Option<String>,
}

impl MovieQuery {
    pub fn movie_id(&self) -> Option<i64> {
        self.id.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviesPayload {
    pub movies: Vec<Movie>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePayload {
    pub movie: Movie,
}
