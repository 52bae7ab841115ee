//! Article module - annotated headlines from the upstream pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// News sites the scrapers collect headlines from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewsSource {
    /// adaderana.lk
    #[serde(rename = "Ada Derana", alias = "ada_derana")]
    AdaDerana,

    /// dailymirror.lk
    #[serde(rename = "Daily Mirror", alias = "daily_mirror")]
    DailyMirror,

    /// newsfirst.lk
    #[serde(rename = "News First", alias = "news_first")]
    NewsFirst,

    /// colombogazette.com
    #[serde(rename = "Colombo Gazette", alias = "colombo_gazette")]
    ColomboGazette,
}

impl NewsSource {
    /// Display name of the site
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsSource::AdaDerana => "Ada Derana",
            NewsSource::DailyMirror => "Daily Mirror",
            NewsSource::NewsFirst => "News First",
            NewsSource::ColomboGazette => "Colombo Gazette",
        }
    }
}

impl fmt::Display for NewsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headline sentiment as scored upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Positive tone
    Positive,
    /// Negative tone
    Negative,
    /// Neither
    Neutral,
}

impl Sentiment {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Topic assigned by the upstream keyword classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// Parliament, ministers, elections
    #[serde(rename = "Politics & Government")]
    Politics,
    /// Trade, rupee, inflation, budget
    #[serde(rename = "Economy & Business")]
    Economy,
    /// Cricket and the rest
    #[serde(rename = "Sports")]
    Sports,
    /// Hospitals, disease, vaccines
    #[serde(rename = "Health")]
    Health,
    /// Digital, cyber, software
    #[serde(rename = "Technology")]
    Technology,
    /// Film, music, culture
    #[serde(rename = "Entertainment")]
    Entertainment,
    /// Police, courts, arrests
    #[serde(rename = "Crime & Law")]
    CrimeAndLaw,
    /// Foreign affairs, diplomacy
    #[serde(rename = "International")]
    International,
    /// Schools and universities
    #[serde(rename = "Education")]
    Education,
    /// Climate, weather, disasters
    #[serde(rename = "Environment")]
    Environment,
}

impl Topic {
    /// Display name of the topic
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Politics => "Politics & Government",
            Topic::Economy => "Economy & Business",
            Topic::Sports => "Sports",
            Topic::Health => "Health",
            Topic::Technology => "Technology",
            Topic::Entertainment => "Entertainment",
            Topic::CrimeAndLaw => "Crime & Law",
            Topic::International => "International",
            Topic::Education => "Education",
            Topic::Environment => "Environment",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a named entity
///
/// Accepts the short labels emitted by common NER models as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// People
    #[serde(alias = "PERSON")]
    Person,
    /// Companies, agencies, parties
    #[serde(alias = "ORG")]
    Organization,
    /// Countries, cities, places
    #[serde(alias = "GPE", alias = "LOC")]
    Location,
    /// Dates and periods
    #[serde(alias = "DATE")]
    Date,
    /// Anything else
    #[serde(other)]
    Other,
}

/// A named entity mentioned in an article
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Surface text
    pub text: String,
    /// Entity kind
    pub kind: EntityKind,
}

impl Entity {
    /// Create an entity
    pub fn new(text: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// An annotated news article
///
/// Supplied fully formed by the upstream analysis pipeline. The risk agent
/// only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Headline text; empty when upstream had none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Canonical article URL
    pub url: String,

    /// Site the headline was scraped from
    pub source: NewsSource,

    /// Publication time
    pub published_at: DateTime<Utc>,

    /// Teaser or first paragraph, when the scraper captured one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Headline sentiment
    #[serde(default)]
    pub sentiment: Option<Sentiment>,

    /// Named entities
    #[serde(default)]
    pub entities: BTreeSet<Entity>,

    /// Topic classification
    #[serde(default)]
    pub topic: Option<Topic>,
}

impl Article {
    /// Create an article with no annotations
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        source: NewsSource,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source,
            published_at,
            description: None,
            sentiment: None,
            entities: BTreeSet::new(),
            topic: None,
        }
    }

    /// Set the sentiment
    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Set the topic
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self
    }

    /// Add an entity
    pub fn with_entity(mut self, text: impl Into<String>, kind: EntityKind) -> Self {
        self.entities.insert(Entity::new(text, kind));
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Stable identifier derived from the URL
    ///
    /// The same URL always yields the same id, across runs and machines.
    pub fn id(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_URL, self.url.as_bytes())
    }

    /// Whether the headline carries any text at all
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Entity surface texts in sorted order
    pub fn entity_texts(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.text.clone()).collect()
    }
}

/// Read a missing-or-null string field as ""
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Article {
        Article::new(
            "Mass protests erupt in Colombo",
            "https://www.adaderana.lk/news/1",
            NewsSource::AdaDerana,
            Utc.with_ymd_and_hms(2024, 2, 9, 10, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_id_is_stable() {
        let a = sample();
        let b = sample().with_topic(Topic::Politics);
        assert_eq!(a.id(), b.id());

        let mut c = sample();
        c.url = "https://www.adaderana.lk/news/2".to_string();
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_has_title() {
        assert!(sample().has_title());
        let mut a = sample();
        a.title = "   ".to_string();
        assert!(!a.has_title());
    }

    #[test]
    fn test_entities_are_a_set() {
        let a = sample()
            .with_entity("Colombo", EntityKind::Location)
            .with_entity("Colombo", EntityKind::Location)
            .with_entity("IMF", EntityKind::Organization);
        assert_eq!(a.entities.len(), 2);
        assert_eq!(a.entity_texts(), vec!["Colombo".to_string(), "IMF".to_string()]);
    }

    #[test]
    fn test_deserialize_upstream_record() {
        let json = r#"{
            "title": "Cabinet reshuffle expected",
            "url": "https://www.dailymirror.lk/x",
            "source": "daily_mirror",
            "published_at": "2024-02-09T10:30:00Z",
            "sentiment": "neutral",
            "entities": [{"text": "Cabinet", "kind": "ORG"}, {"text": "Kandy", "kind": "GPE"}],
            "topic": "Politics & Government"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.source, NewsSource::DailyMirror);
        assert_eq!(article.sentiment, Some(Sentiment::Neutral));
        assert_eq!(article.topic, Some(Topic::Politics));
        assert!(article.entities.contains(&Entity::new("Kandy", EntityKind::Location)));
        assert!(article.description.is_none());
    }

    #[test]
    fn test_deserialize_without_annotations() {
        let json = r#"{
            "title": "Local bakery wins regional award",
            "url": "https://colombogazette.com/2026/01/01/bakery",
            "source": "Colombo Gazette",
            "published_at": "2026-01-01T08:00:00Z"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert!(article.sentiment.is_none());
        assert!(article.entities.is_empty());
        assert!(article.topic.is_none());
    }

    #[test]
    fn test_deserialize_without_title() {
        let json = r#"[
            {"url": "https://x.lk/1", "source": "Ada Derana", "published_at": "2024-02-09T10:30:00Z"},
            {"title": null, "url": "https://x.lk/2", "source": "News First", "published_at": "2024-02-09T10:30:00Z"},
            {"title": "Riot in Kandy", "url": "https://x.lk/3", "source": "News First", "published_at": "2024-02-09T10:30:00Z"}
        ]"#;
        let articles: Vec<Article> = serde_json::from_str(json).unwrap();
        assert_eq!(articles.len(), 3);
        assert!(!articles[0].has_title());
        assert!(!articles[1].has_title());
        assert_eq!(articles[2].title, "Riot in Kandy");
    }

    #[test]
    fn test_unknown_entity_kind_maps_to_other() {
        let json = r#"{"text": "Rs. 500", "kind": "MONEY"}"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.kind, EntityKind::Other);
    }
}
