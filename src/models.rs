use std::{fmt, str::FromStr};

use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier assigned by the remote store. Opaque to the client: the API
/// may send it as a number or a string.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MovieId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Marathi,
    Hindi,
    Punjabi,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Marathi, Language::Hindi, Language::Punjabi];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Marathi => "marathi",
            Language::Hindi => "hindi",
            Language::Punjabi => "punjabi",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Marathi => "Marathi",
            Language::Hindi => "Hindi",
            Language::Punjabi => "Punjabi",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Language::Marathi => "🎭",
            Language::Hindi => "🎬",
            Language::Punjabi => "🎪",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown language `{0}`")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLanguage(wanted.to_string()))
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Language scope of a listing. `All` is the unfiltered collection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LanguageFilter {
    #[default]
    All,
    Only(Language),
}

impl LanguageFilter {
    /// Missing, empty and `all` all mean the unfiltered collection.
    pub fn parse(raw: Option<&str>) -> Result<Self, UnknownLanguage> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::All),
            Some(s) if s.eq_ignore_ascii_case("all") => Ok(Self::All),
            Some(s) => s.parse().map(Self::Only),
        }
    }

    pub fn language(self) -> Option<Language> {
        match self {
            Self::All => None,
            Self::Only(lang) => Some(lang),
        }
    }

    pub fn matches(self, movie: &Movie) -> bool {
        self.language().is_none_or(|lang| movie.language == lang)
    }

    pub fn query_value(self) -> &'static str {
        self.language().map_or("all", Language::as_str)
    }

    pub fn section_title(self) -> String {
        match self {
            Self::All => "Latest Movies".to_string(),
            Self::Only(lang) => format!("{} Movies", lang.label()),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub language: Language,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "iso_date")]
    pub release_date: Date,
}

/// Request body for create and full-record update. Never carries an id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieInput {
    pub title: String,
    pub language: Language,
    #[serde(serialize_with = "none_as_empty")]
    pub url: Option<String>,
    #[serde(serialize_with = "none_as_empty")]
    pub image_url: Option<String>,
    pub release_date: Date,
}

#[cfg(test)]
impl Movie {
    pub fn to_input(&self) -> MovieInput {
        MovieInput {
            title: self.title.clone(),
            language: self.language,
            url: self.url.clone(),
            image_url: self.image_url.clone(),
            release_date: self.release_date,
        }
    }
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

fn none_as_empty<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

// Records whose date was defaulted server-side carry a full date-time.
fn iso_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_iso_date(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_iso_date(raw: &str) -> Result<Date, jiff::Error> {
    let trimmed = raw.trim();
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    date_part.parse()
}
