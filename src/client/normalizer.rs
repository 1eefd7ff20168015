use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown in place of any field the listing did not provide.
pub const NO_VALUE: &str = "No job to display";

/// A job as returned by the listing API. Every path is optional and read
/// leniently: a value of the wrong JSON type counts as absent instead of
/// failing the whole record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExternalJob {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ExternalId>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub company: Option<Named>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub categories: Vec<Named>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub levels: Vec<Named>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub locations: Vec<Named>,
    #[serde(default, deserialize_with = "lenient")]
    pub refs: Option<Refs>,
}

/// Listing ids come back as numbers from some endpoints and strings from others.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Text(String),
    Number(serde_json::Number),
}

impl std::fmt::Display for ExternalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExternalId::Text(s) => f.write_str(s),
            ExternalId::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Refs {
    #[serde(default, deserialize_with = "lenient")]
    pub landing_page: Option<String>,
}

/// Flat view model of one search result. No field is ever empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub job_id: String,
    pub name: String,
    pub company: String,
    pub category: String,
    pub level: String,
    pub location: String,
    pub link: String,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

fn or_placeholder(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(NO_VALUE)
        .to_string()
}

fn first_name(items: &[Named]) -> String {
    or_placeholder(items.first().and_then(|n| n.name.as_deref()))
}

/// Map a raw listing onto [`Job`], field by field.
pub fn normalize(raw: &RawExternalJob) -> Job {
    let job_id = raw.id.as_ref().map(ExternalId::to_string);
    Job {
        job_id: or_placeholder(job_id.as_deref()),
        name: or_placeholder(raw.name.as_deref()),
        company: or_placeholder(raw.company.as_ref().and_then(|c| c.name.as_deref())),
        category: first_name(&raw.categories),
        level: first_name(&raw.levels),
        location: first_name(&raw.locations),
        link: or_placeholder(raw.refs.as_ref().and_then(|r| r.landing_page.as_deref())),
    }
}
