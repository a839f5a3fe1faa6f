use jiff::civil::Date;
use serde::Deserialize;

use crate::models::{Language, Movie, MovieInput, parse_iso_date};

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingRequired,
    #[error("Release date must be a valid date (YYYY-MM-DD)")]
    InvalidDate,
}

/// Raw field values of the movie editor, exactly as submitted.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct MovieForm {
    pub title: String,
    pub language: String,
    pub url: String,
    pub image_url: String,
    pub release_date: String,
}

impl MovieForm {
    pub fn blank(today: Date) -> Self {
        Self {
            title: String::new(),
            language: Language::Marathi.as_str().to_string(),
            url: String::new(),
            image_url: String::new(),
            release_date: today.to_string(),
        }
    }

    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            language: movie.language.as_str().to_string(),
            url: movie.url.clone().unwrap_or_default(),
            image_url: movie.image_url.clone().unwrap_or_default(),
            release_date: movie.release_date.to_string(),
        }
    }

    /// Submit-time validation. An empty release date falls back to `today`.
    pub fn validate(&self, today: Date) -> Result<MovieInput, FormError> {
        let title = self.title.trim();
        if title.is_empty() || self.language.trim().is_empty() {
            return Err(FormError::MissingRequired);
        }
        let language: Language = self.language.parse().map_err(|_| FormError::MissingRequired)?;

        let release_date = match self.release_date.trim() {
            "" => today,
            raw => parse_iso_date(raw).map_err(|_| FormError::InvalidDate)?,
        };

        Ok(MovieInput {
            title: title.to_string(),
            language,
            url: non_empty(&self.url),
            image_url: non_empty(&self.image_url),
            release_date,
        })
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let s = raw.trim();
    (!s.is_empty()).then(|| s.to_string())
}
