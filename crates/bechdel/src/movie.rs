use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::entities::decode_entities;

/// One row returned by the title-search provider.
///
/// The public API serializes every number as a string (`"year":"1979"`), so
/// numeric fields accept both forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Title as sent by the provider, possibly HTML-escaped.
    pub title: String,
    #[serde(deserialize_with = "de_lenient_u16")]
    pub year: u16,
    #[serde(default, deserialize_with = "de_lenient_opt_u8")]
    pub rating: Option<u8>,
    #[serde(default, rename = "imdbid", skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_opt_u64")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "de_lenient_bool")]
    pub dubious: bool,
}

impl MovieRecord {
    pub fn new(title: impl Into<String>, year: u16) -> Self {
        Self {
            title: title.into(),
            year,
            rating: None,
            imdb_id: None,
            id: None,
            dubious: false,
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn display_title(&self) -> String {
        decode_entities(&self.title).into_owned()
    }
}

/// A search result offered to the user before confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Raw provider title; this is what gets confirmed.
    pub title: String,
    /// Decoded title used for display and comparison.
    pub display_title: String,
    pub year: u16,
}

impl Candidate {
    pub fn new(title: impl Into<String>, year: u16) -> Self {
        let title = title.into();
        let display_title = decode_entities(&title).into_owned();
        Self {
            title,
            display_title,
            year,
        }
    }
}

impl From<&MovieRecord> for Candidate {
    fn from(record: &MovieRecord) -> Self {
        Candidate::new(record.title.clone(), record.year)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_title, self.year)
    }
}

/// Parses a provider response body into movie rows.
pub fn parse_movies(body: &str) -> Result<Vec<MovieRecord>, serde_json::Error> {
    serde_json::from_str(body)
}

enum Lenient {
    Number(u64),
    Missing,
}

struct LenientNumberVisitor;

impl<'de> Visitor<'de> for LenientNumberVisitor {
    type Value = Lenient;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Lenient, E> {
        Ok(Lenient::Number(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Lenient, E> {
        u64::try_from(value)
            .map(Lenient::Number)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Lenient, E> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Lenient::Missing);
        }
        trimmed
            .parse::<u64>()
            .map(Lenient::Number)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Lenient, E> {
        Ok(Lenient::Missing)
    }

    fn visit_none<E: de::Error>(self) -> Result<Lenient, E> {
        Ok(Lenient::Missing)
    }
}

fn de_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Lenient, D::Error> {
    deserializer.deserialize_any(LenientNumberVisitor)
}

fn de_lenient_u16<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    match de_lenient(deserializer)? {
        Lenient::Number(value) => u16::try_from(value)
            .map_err(|_| de::Error::custom(format!("year out of range: {value}"))),
        Lenient::Missing => Err(de::Error::custom("missing year")),
    }
}

fn de_lenient_opt_u8<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    match de_lenient(deserializer)? {
        Lenient::Number(value) => u8::try_from(value)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("rating out of range: {value}"))),
        Lenient::Missing => Ok(None),
    }
}

fn de_lenient_opt_u64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    match de_lenient(deserializer)? {
        Lenient::Number(value) => Ok(Some(value)),
        Lenient::Missing => Ok(None),
    }
}

fn de_lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(u64),
        Text(String),
        Null,
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Number(value) => value != 0,
        Flag::Text(value) => matches!(value.trim(), "1" | "true"),
        Flag::Null => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_encoded_numbers() {
        let body = r#"[{"visible":"1","date":"2008-07-21 00:00:00","submitterid":"1","rating":"3","dubious":"0","imdbid":"0078748","id":"20","title":"Alien","year":"1979"}]"#;
        let movies = parse_movies(body).expect("parse");
        assert_eq!(movies.len(), 1);
        let alien = &movies[0];
        assert_eq!(alien.title, "Alien");
        assert_eq!(alien.year, 1979);
        assert_eq!(alien.rating, Some(3));
        assert_eq!(alien.imdb_id.as_deref(), Some("0078748"));
        assert_eq!(alien.id, Some(20));
        assert!(!alien.dubious);
    }

    #[test]
    fn parses_plain_numbers_and_missing_fields() {
        let body = r#"[{"title":"Up","year":2009},{"title":"Heat","year":1995,"rating":1,"dubious":true,"id":null}]"#;
        let movies = parse_movies(body).expect("parse");
        assert_eq!(movies[0], MovieRecord::new("Up", 2009));
        assert_eq!(movies[1].rating, Some(1));
        assert!(movies[1].dubious);
        assert_eq!(movies[1].id, None);
    }

    #[test]
    fn rejects_rows_without_a_usable_year() {
        assert!(parse_movies(r#"[{"title":"Up","year":"soon"}]"#).is_err());
        assert!(parse_movies(r#"[{"title":"Up","year":""}]"#).is_err());
        assert!(parse_movies(r#"[{"title":"Up"}]"#).is_err());
    }

    #[test]
    fn empty_array_is_no_results() {
        assert!(parse_movies("[]").expect("parse").is_empty());
    }

    #[test]
    fn candidate_decodes_title_once() {
        let candidate = Candidate::from(&MovieRecord::new("Ghostbusters &amp; Friends", 2016));
        assert_eq!(candidate.title, "Ghostbusters &amp; Friends");
        assert_eq!(candidate.display_title, "Ghostbusters & Friends");
        assert_eq!(candidate.to_string(), "Ghostbusters & Friends (2016)");
    }
}
