//! Markup for each page region. Every interpolated value goes through maud,
//! which escapes text and attribute values by default.

use maud::{html, Markup};
use time::macros::format_description;

use crate::auth::dto::PublicUser;
use crate::client::page::AuthForm;
use crate::movies::repo_types::Movie;

const EXCERPT_CHARS: usize = 150;

fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn detail_href(movie: &Movie) -> String {
    format!("movie.html?id={}", movie.id)
}

fn poster(movie: &Movie) -> Markup {
    html! {
        @match movie.image_path.as_deref().filter(|p| !p.is_empty()) {
            Some(src) => {
                img.movie-image src=(src) alt=(movie.title);
            }
            None => {
                div.movie-image.no-image { "No image" }
            }
        }
    }
}

fn movie_card(movie: &Movie, with_author: bool) -> Markup {
    html! {
        div.movie-card {
            (poster(movie))
            div.movie-info {
                h3.movie-title { (movie.title) }
                p.movie-description { (excerpt(&movie.description)) }
                @if with_author {
                    p.movie-author { "Added by: " (movie.author.as_deref().unwrap_or("unknown")) }
                }
                a.btn.btn-primary href=(detail_href(movie)) data-page="movie" { "See more" }
            }
        }
    }
}

pub fn movie_list(movies: &[Movie]) -> Markup {
    html! {
        div #movies-container {
            @for movie in movies {
                (movie_card(movie, true))
            }
        }
    }
}

pub fn movie_detail(movie: &Movie) -> Markup {
    let added = movie
        .created_at
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default();
    html! {
        div.movie-detail {
            (poster(movie))
            h1 { (movie.title) }
            p { strong { "Description: " } (movie.description) }
            p { strong { "Author: " } (movie.author.as_deref().unwrap_or("unknown")) }
            p { strong { "Added on: " } (added) }
            a.btn.btn-primary href="movies.html" data-page="movies" { "Back to the list" }
        }
    }
}

pub fn missing_movie(message: &str) -> Markup {
    html! {
        div.movie-detail {
            p.empty { (message) }
            a.btn.btn-primary href="movies.html" data-page="movies" { "Back to the list" }
        }
    }
}

pub fn user_profile(user: &PublicUser, movies: &[Movie]) -> Markup {
    html! {
        h2 { "Profile of " span #user-login { (user.login) } }
        div #user-movies-container {
            @if movies.is_empty() {
                p.empty { "You have not added any movies yet." }
            } @else {
                @for movie in movies {
                    (movie_card(movie, false))
                }
            }
        }
    }
}

pub fn login_panel(which: AuthForm) -> Markup {
    html! {
        @match which {
            AuthForm::Login => {
                form #login-form data-form="login" {
                    input type="text" name="login" placeholder="Login" required;
                    input type="password" name="password" placeholder="Password" required;
                    button.btn.btn-primary type="submit" { "Log in" }
                    button.btn.btn-link type="button" data-action="show-register" { "Create an account" }
                }
            }
            AuthForm::Register => {
                form #register-form data-form="register" {
                    input type="text" name="login" placeholder="Login" required;
                    input type="email" name="email" placeholder="Email" required;
                    input type="password" name="password" placeholder="Password" required;
                    input type="password" name="password_confirm" placeholder="Repeat password" required;
                    button.btn.btn-primary type="submit" { "Register" }
                    button.btn.btn-link type="button" data-action="show-login" { "I already have an account" }
                }
            }
        }
    }
}

pub fn add_movie_form() -> Markup {
    html! {
        form #add-movie-form data-form="add-movie" {
            input type="text" name="title" placeholder="Title" required;
            textarea name="description" placeholder="Description" required {}
            input type="text" name="image_path" placeholder="Image URL (optional)";
            button.btn.btn-primary type="submit" { "Add movie" }
        }
    }
}
