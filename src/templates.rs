use jiff::Timestamp;
use maud::{DOCTYPE, Markup, html};

use crate::{
    form::MovieForm,
    models::{Language, LanguageFilter, Movie},
    pages::{
        admin::{AdminPage, AdminView, FormState},
        home::HomePage,
    },
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const DATASTAR_CDN: &str =
    "https://cdn.jsdelivr.net/npm/@sudodevnull/datastar@0.19.9/dist/datastar.js";

/// Whether a card offers edit and delete controls.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CardMode {
    Public,
    Admin,
}

pub fn home_page(filter: LanguageFilter) -> String {
    let url = format!("/home/movies?language={}", urlencoding::encode(filter.query_value()));

    page(
        "CineHub",
        html! {
            div id="content" data-init=(format!("@get('{}')", url)) {
                (hero(filter))
                div class="max-w-6xl mx-auto px-6 py-10" {
                    (loading_indicator())
                }
            }
        },
    )
}

pub fn home_fragment(home: &HomePage) -> String {
    content_div(html! {
        (hero(home.selected_language()))
        div class="max-w-6xl mx-auto px-6 py-10" {
            @if home.is_loading() {
                (loading_indicator())
            }
            @if let Some(error) = home.error() {
                (error_banner(error))
            }
            @if let Some(movies) = home.visible_movies() {
                @if movies.is_empty() {
                    p class="text-center text-gray-600" { "No movies found. Check back soon!" }
                } @else {
                    h2 class="text-2xl font-bold text-gray-900" { (home.section_title()) }
                    div class="mt-6 grid gap-6 sm:grid-cols-2 lg:grid-cols-3" {
                        @for movie in movies {
                            (movie_card(movie, CardMode::Public))
                        }
                    }
                }
            }
        }
    })
}

pub fn admin_page_loading() -> String {
    page(
        "Admin Panel",
        html! {
            div id="content" data-init="@get('/admin/movies')" {
                (admin_header())
                div class="max-w-6xl mx-auto px-6 py-10" {
                    (loading_indicator())
                }
            }
        },
    )
}

pub fn admin_page(admin: &AdminPage, now: Timestamp) -> String {
    page("Admin Panel", html! { div id="content" { (admin_body(admin, now)) } })
}

pub fn admin_fragment(admin: &AdminPage, now: Timestamp) -> String {
    content_div(admin_body(admin, now))
}

pub fn error_fragment(message: &str) -> String {
    content_div(html! {
        div class="max-w-2xl mx-auto px-6 py-12" {
            (error_card(message))
        }
    })
}

pub fn error_page(message: String) -> String {
    page(
        "Error",
        html! {
            div class="max-w-xl mx-auto px-6 py-16" {
                (error_card(&message))
            }
        },
    )
}

pub fn not_found_page() -> String {
    page(
        "Not Found",
        html! {
            div class="max-w-xl mx-auto px-6 py-16 text-center" {
                h1 class="text-4xl font-bold text-gray-900" { "404" }
                p class="mt-4 text-gray-600" { "This page does not exist." }
                a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back to movies" }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
                script type="module" src=(DATASTAR_CDN) {}
            }
            body class="min-h-screen flex flex-col bg-gray-50" {
                (navbar())
                main class="flex-1" { (body) }
                (footer())
            }
        }
    }
    .into_string()
}

fn content_div(inner: Markup) -> String {
    html! { div id="content" { (inner) } }.into_string()
}

fn navbar() -> Markup {
    html! {
        nav class="bg-gray-900 text-white" {
            div class="max-w-6xl mx-auto px-6 py-4 flex items-center justify-between" {
                a class="flex items-center gap-2" href="/" {
                    span class="text-2xl" { "🎬" }
                    span class="text-xl font-bold" { "CineHub" }
                }
                ul class="flex items-center gap-6" {
                    li { a class="hover:text-gray-300" href="/" { "Home" } }
                    li {
                        details class="relative" {
                            summary class="cursor-pointer hover:text-gray-300" { "Movies" }
                            div class="absolute right-0 mt-2 w-44 rounded-md bg-white py-2 text-gray-800 shadow-lg" {
                                @for lang in Language::ALL {
                                    a class="block px-4 py-1 hover:bg-gray-100" href=(format!("/?language={}", lang.as_str())) {
                                        (lang.icon()) " " (lang.label())
                                    }
                                }
                                a class="block px-4 py-1 hover:bg-gray-100" href="/?language=all" { "📽️ All Movies" }
                            }
                        }
                    }
                    li { a class="hover:text-gray-300" href="/admin" { "Admin" } }
                }
            }
        }
    }
}

fn footer() -> Markup {
    html! {
        footer class="bg-gray-900 text-gray-300" {
            div class="max-w-6xl mx-auto px-6 py-10 grid gap-8 md:grid-cols-3" {
                div {
                    h3 class="font-semibold text-white" { "About" }
                    p class="mt-2 text-sm" { "Your ultimate movie destination for Marathi, Hindi, and Punjabi films." }
                }
                div {
                    h3 class="font-semibold text-white" { "Quick Links" }
                    ul class="mt-2 space-y-1 text-sm" {
                        li { a href="/" { "Home" } }
                        li { a href="/admin" { "Admin Panel" } }
                        li { a href="/?language=all" { "Browse Movies" } }
                    }
                }
                div {
                    h3 class="font-semibold text-white" { "Follow Us" }
                    div class="mt-2 flex gap-4 text-sm" {
                        a href="#facebook" { "Facebook" }
                        a href="#twitter" { "Twitter" }
                        a href="#instagram" { "Instagram" }
                    }
                }
            }
            div class="border-t border-gray-800" {
                div class="max-w-6xl mx-auto px-6 py-4 flex flex-wrap justify-between gap-2 text-xs" {
                    p { "🏢 © 2024 Rahul Corp. All rights reserved." }
                    p { "CineHub ™ - Your Entertainment Platform" }
                }
            }
        }
    }
}

fn hero(filter: LanguageFilter) -> Markup {
    html! {
        div class="bg-gradient-to-r from-gray-900 to-gray-700 text-white" {
            div class="max-w-6xl mx-auto px-6 py-14 text-center" {
                h1 class="text-4xl font-bold" { "Welcome to CineHub" }
                p class="mt-3 text-gray-200" { "Your entertainment destination for Marathi, Hindi & Punjabi Movies" }
                @if filter != LanguageFilter::All {
                    button class="mt-6 rounded-md bg-white px-4 py-2 font-semibold text-gray-900 hover:bg-gray-200" type="button" data-on:click="@get('/home/movies?language=all')" {
                        "Clear Filter"
                    }
                }
            }
        }
    }
}

fn admin_header() -> Markup {
    html! {
        div class="bg-gray-800 text-white" {
            div class="max-w-6xl mx-auto px-6 py-10" {
                h1 class="text-3xl font-bold" { "Admin Panel" }
                p class="mt-2 text-gray-300" { "Manage your movie collection" }
            }
        }
    }
}

fn admin_body(admin: &AdminPage, now: Timestamp) -> Markup {
    html! {
        (admin_header())
        div class="max-w-6xl mx-auto px-6 py-10 space-y-6" {
            @if let Some(message) = admin.success_message(now) {
                div class="rounded-md border border-green-300 bg-green-50 p-4 text-green-800" data-init="setTimeout(() => el.remove(), 3000)" {
                    (message)
                }
            }
            @if let Some(error) = admin.error() {
                (error_banner(error))
            }
            @if let Some(movie) = admin.pending_delete() {
                (delete_confirmation(movie))
            }

            @match admin.view() {
                AdminView::Form(state) => (movie_form(state)),
                AdminView::List => {
                    form method="post" action="/admin/form/new" {
                        button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "+ Add New Movie" }
                    }
                    @if admin.is_loading() {
                        (loading_indicator())
                    } @else if admin.movies().is_empty() {
                        p class="text-center text-gray-600" { "No movies yet. Add your first movie!" }
                    } @else {
                        h2 class="text-2xl font-bold text-gray-900" { (admin.section_title()) }
                        div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3" {
                            @for movie in admin.movies() {
                                (movie_card(movie, CardMode::Admin))
                            }
                        }
                    }
                },
            }
        }
    }
}

pub fn movie_card(movie: &Movie, mode: CardMode) -> Markup {
    let id = urlencoding::encode(movie.id.as_str());

    html! {
        div class="overflow-hidden rounded-lg bg-white shadow" {
            div class="relative aspect-[2/3] bg-gray-200" {
                img class="h-full w-full object-cover" src=[movie.image_url.as_deref()] alt=(movie.title);
                @if let Some(url) = &movie.url {
                    a class="absolute bottom-3 left-3 rounded-md bg-red-600 px-3 py-1 text-sm font-semibold text-white hover:bg-red-700" href=(url) target="_blank" rel="noopener noreferrer" {
                        "▶ Watch Now"
                    }
                }
            }
            div class="p-4" {
                h3 class="text-lg font-semibold text-gray-900" { (movie.title) }
                p class="mt-1 text-sm text-gray-600" { (movie.language.icon()) " " (movie.language.label()) }
                p class="mt-1 text-sm text-gray-500" { (movie.release_date.strftime("%-d %B %Y")) }
                @if mode == CardMode::Admin {
                    div class="mt-4 flex gap-2" {
                        form method="post" action=(format!("/admin/form/edit/{id}")) {
                            button class="rounded-md bg-gray-100 px-3 py-1 text-sm hover:bg-gray-200" type="submit" { "Edit" }
                        }
                        form method="post" action=(format!("/admin/movies/{id}/delete")) {
                            button class="rounded-md bg-red-50 px-3 py-1 text-sm text-red-700 hover:bg-red-100" type="submit" { "Delete" }
                        }
                    }
                }
            }
        }
    }
}

fn movie_form(state: &FormState) -> Markup {
    let form: &MovieForm = &state.form;
    let editing = state.editing.is_some();

    html! {
        div class="rounded-lg bg-white p-8 shadow" {
            h2 class="text-2xl font-bold text-gray-900" {
                @if editing { "Edit Movie" } @else { "Add New Movie" }
            }
            @if let Some(alert) = &state.alert {
                div class="mt-4 rounded-md border border-yellow-300 bg-yellow-50 p-3 text-yellow-800" role="alert" { (alert) }
            }
            form class="mt-6 space-y-5" method="post" action="/admin/form" {
                div {
                    label class="block text-sm font-medium text-gray-700" for="title" { "Movie Title *" }
                    input class=(INPUT_CLASS) type="text" id="title" name="title" value=(form.title) placeholder="Enter movie title";
                }
                div {
                    label class="block text-sm font-medium text-gray-700" for="language" { "Language *" }
                    select class=(INPUT_CLASS) id="language" name="language" {
                        @for lang in Language::ALL {
                            option value=(lang.as_str()) selected[form.language.eq_ignore_ascii_case(lang.as_str())] {
                                (lang.icon()) " " (lang.label())
                            }
                        }
                    }
                }
                div {
                    label class="block text-sm font-medium text-gray-700" for="url" { "Movie URL" }
                    input class=(INPUT_CLASS) type="url" id="url" name="url" value=(form.url) placeholder="https://example.com/movie";
                }
                div {
                    label class="block text-sm font-medium text-gray-700" for="image_url" { "Image URL" }
                    input class=(INPUT_CLASS) type="url" id="image_url" name="image_url" value=(form.image_url) placeholder="https://example.com/image.jpg";
                }
                div {
                    label class="block text-sm font-medium text-gray-700" for="release_date" { "Release Date" }
                    input class=(INPUT_CLASS) type="date" id="release_date" name="release_date" value=(form.release_date);
                }
                div class="flex gap-3" {
                    button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" {
                        @if editing { "Update Movie" } @else { "Add Movie" }
                    }
                    button class="rounded-md bg-gray-100 px-4 py-2 text-gray-800 hover:bg-gray-200" type="submit" formaction="/admin/form/cancel" {
                        "Cancel"
                    }
                }
            }
        }
    }
}

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";

fn delete_confirmation(movie: &Movie) -> Markup {
    html! {
        div class="rounded-lg border border-red-200 bg-white p-6 shadow" role="alertdialog" {
            p class="font-semibold text-gray-900" { "Are you sure you want to delete this movie?" }
            p class="mt-1 text-sm text-gray-600" { (movie.title) }
            div class="mt-4 flex gap-3" {
                form method="post" action="/admin/delete/confirm" {
                    button class="rounded-md bg-red-600 px-4 py-2 font-semibold text-white hover:bg-red-700" type="submit" { "Delete" }
                }
                form method="post" action="/admin/delete/cancel" {
                    button class="rounded-md bg-gray-100 px-4 py-2 text-gray-800 hover:bg-gray-200" type="submit" { "Cancel" }
                }
            }
        }
    }
}

fn loading_indicator() -> Markup {
    html! {
        div class="py-10 text-center" {
            div class="mx-auto h-10 w-10 rounded-full border-4 border-blue-200 border-t-blue-600 animate-spin" {}
            p class="mt-4 text-gray-600" { "Loading movies..." }
        }
    }
}

fn error_banner(message: &str) -> Markup {
    html! {
        div class="rounded-md border border-red-300 bg-red-50 p-4 text-red-800" { (message) }
    }
}

fn error_card(message: &str) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-8" {
            h1 class="text-2xl font-bold text-gray-900" { "Error" }
            p class="mt-4 text-gray-700" { (message) }
            a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
        }
    }
}
