use serde::Deserialize;

/// A raw item record from the Hacker News v0 API.
///
/// The API omits fields that do not apply to an item (jobs have no
/// descendants, self posts have no url, and so on), so everything except
/// the id falls back to a default. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    pub id: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub descendants: i64,
}

/// An item plus the host shown next to its title, derived once when the
/// item is resolved and never touched again.
#[derive(Debug, Clone)]
pub struct Story {
    pub item: Item,
    pub host: String,
}

impl Story {
    pub fn from_item(item: Item) -> Self {
        let host = host_of(&item.url);
        Self { item, host }
    }
}

// Hostname of the link, with one leading "www." stripped. An empty or
// unparseable url yields an empty host rather than an error; a missing
// host never blocks rendering the story.
fn host_of(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}
