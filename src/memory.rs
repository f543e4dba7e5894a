//! In-process catalog with the same observable behaviour as the Postgres one:
//! unique login/email, newest-first ordering, left-joined authors.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::{
    auth::repo_types::{NewUser, User},
    db::Catalog,
    error::StoreError,
    movies::repo_types::{Movie, NewMovie},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    movies: Vec<Movie>,
    next_user_id: i64,
    next_movie_id: i64,
}

impl Tables {
    fn with_author(&self, mut movie: Movie) -> Movie {
        movie.author = movie
            .user_id
            .and_then(|uid| self.users.iter().find(|u| u.id == uid))
            .map(|u| u.login.clone());
        movie
    }

    fn newest_first<'a>(&self, movies: impl Iterator<Item = &'a Movie>) -> Vec<Movie> {
        let mut out: Vec<Movie> = movies.map(|m| self.with_author(m.clone())).collect();
        out.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        out
    }
}

#[derive(Default)]
pub struct MemoryCatalog {
    tables: RwLock<Tables>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a user; their movies stay, orphaned (`user_id` cleared).
    pub async fn remove_user(&self, user_id: i64) -> bool {
        let mut t = self.tables.write().await;
        let before = t.users.len();
        t.users.retain(|u| u.id != user_id);
        for m in t.movies.iter_mut().filter(|m| m.user_id == Some(user_id)) {
            m.user_id = None;
        }
        t.users.len() != before
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.login == login).cloned())
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.login == new.login || u.email == new.email) {
            return Err(StoreError::Duplicate);
        }
        t.next_user_id += 1;
        let user = User {
            id: t.next_user_id,
            login: new.login,
            email: new.email,
            password_hash: new.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.newest_first(t.movies.iter()))
    }

    async fn list_movies_by_owner(&self, user_id: i64) -> Result<Vec<Movie>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.newest_first(t.movies.iter().filter(|m| m.user_id == Some(user_id))))
    }

    async fn find_movie(&self, movie_id: i64) -> Result<Option<Movie>, StoreError> {
        let t = self.tables.read().await;
        Ok(t
            .movies
            .iter()
            .find(|m| m.id == movie_id)
            .map(|m| t.with_author(m.clone())))
    }

    async fn insert_movie(&self, owner: i64, new: NewMovie) -> Result<Movie, StoreError> {
        let mut t = self.tables.write().await;
        t.next_movie_id += 1;
        let movie = Movie {
            id: t.next_movie_id,
            title: new.title,
            description: new.description,
            image_path: Some(new.image_path),
            user_id: Some(owner),
            created_at: OffsetDateTime::now_utc(),
            author: None,
        };
        t.movies.push(movie.clone());
        Ok(t.with_author(movie))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(login: &str, email: &str) -> NewUser {
        NewUser { login: login.into(), email: email.into(), password_hash: "h".into() }
    }

    fn new_movie(title: &str) -> NewMovie {
        NewMovie { title: title.into(), description: "d".into(), image_path: String::new() }
    }

    #[tokio::test]
    async fn login_and_email_are_unique() {
        let c = MemoryCatalog::new();
        c.create_user(new_user("ann", "a@x.com")).await.unwrap();
        assert!(matches!(
            c.create_user(new_user("ann", "other@x.com")).await,
            Err(StoreError::Duplicate)
        ));
        assert!(matches!(
            c.create_user(new_user("bob", "a@x.com")).await,
            Err(StoreError::Duplicate)
        ));
    }

    #[tokio::test]
    async fn movies_come_back_newest_first() {
        let c = MemoryCatalog::new();
        let ann = c.create_user(new_user("ann", "a@x.com")).await.unwrap();
        for title in ["one", "two", "three"] {
            c.insert_movie(ann.id, new_movie(title)).await.unwrap();
        }
        let titles: Vec<_> = c.list_movies().await.unwrap().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, ["three", "two", "one"]);
    }

    #[tokio::test]
    async fn owner_filter_and_orphaned_author() {
        let c = MemoryCatalog::new();
        let ann = c.create_user(new_user("ann", "a@x.com")).await.unwrap();
        let bob = c.create_user(new_user("bob", "b@x.com")).await.unwrap();
        let m = c.insert_movie(ann.id, new_movie("Alien")).await.unwrap();
        c.insert_movie(bob.id, new_movie("Heat")).await.unwrap();

        assert_eq!(m.author.as_deref(), Some("ann"));
        assert_eq!(c.list_movies_by_owner(ann.id).await.unwrap().len(), 1);

        assert!(c.remove_user(ann.id).await);
        let orphan = c.find_movie(m.id).await.unwrap().unwrap();
        assert_eq!(orphan.author, None);
        assert_eq!(orphan.user_id, None);
        assert_eq!(c.list_movies().await.unwrap().len(), 2);
    }
}
