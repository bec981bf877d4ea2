use quick_xml::de::from_str;
use quick_xml::DeError;
use serde::Deserialize;

/// One podcast channel: a header title plus an ordered run of episodes.
///
/// Immutable after parsing; the controller owns it for the whole session and
/// episodes are addressed by their position in `items`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "item", default)]
    pub items: Vec<Item>,
}

/// One episode/news entry as it appears in the feed.
///
/// `pub_date` stays raw text here — display formatting parses it loosely and
/// falls back to the raw string, so nothing is lost by deferring.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "pubDate", default)]
    pub pub_date: String,
    #[serde(default)]
    pub description: String,
    pub enclosure: Option<Enclosure>,
}

/// The embedded reference to an item's playable audio resource.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Enclosure {
    #[serde(rename = "@url")]
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: Channel,
}

impl Item {
    /// The playable media locator, when the item carries one.
    pub fn enclosure_url(&self) -> Option<&str> {
        self.enclosure.as_ref().map(|e| e.url.as_str())
    }
}

/// Parses RSS XML text into a [`Channel`].
///
/// Only the fields the player consumes are mapped (`title`, `pubDate`,
/// `description`, `enclosure@url`); everything else in the document is
/// ignored. Malformed XML surfaces as a single parse error for the caller
/// to collapse into its generic failure state.
pub fn parse_channel(xml: &str) -> Result<Channel, DeError> {
    let doc: RssDocument = from_str(xml)?;
    Ok(doc.channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>每天10分钟新闻</title>
    <item>
      <title>Episode one</title>
      <pubDate>Wed, 04 Jun 2025 22:30:00 +0800</pubDate>
      <description><![CDATA[First<br/>line查看节目原文及链接junk]]></description>
      <enclosure url="https://cdn.example.com/ep1.mp3" type="audio/mpeg" length="123"/>
    </item>
    <item>
      <title>Episode two</title>
      <pubDate>Tue, 03 Jun 2025 22:30:00 +0800</pubDate>
      <description>Second body</description>
      <enclosure url="https://cdn.example.com/ep2.mp3" type="audio/mpeg" length="456"/>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_channel_and_items() {
        let channel = parse_channel(SAMPLE).unwrap();
        assert_eq!(channel.title, "每天10分钟新闻");
        assert_eq!(channel.items.len(), 2);

        let first = &channel.items[0];
        assert_eq!(first.title, "Episode one");
        assert_eq!(first.pub_date, "Wed, 04 Jun 2025 22:30:00 +0800");
        assert!(first.description.contains("<br/>"));
        assert_eq!(
            first.enclosure_url(),
            Some("https://cdn.example.com/ep1.mp3")
        );
    }

    #[test]
    fn test_parse_item_without_enclosure() {
        let xml = r#"<rss><channel><title>t</title>
            <item><title>no audio</title></item>
        </channel></rss>"#;
        let channel = parse_channel(xml).unwrap();
        assert_eq!(channel.items.len(), 1);
        assert_eq!(channel.items[0].enclosure_url(), None);
        assert_eq!(channel.items[0].pub_date, "");
    }

    #[test]
    fn test_parse_empty_channel() {
        let channel = parse_channel("<rss><channel><title>t</title></channel></rss>").unwrap();
        assert!(channel.items.is_empty());
    }

    #[test]
    fn test_parse_malformed_xml_is_an_error() {
        assert!(parse_channel("this is not xml").is_err());
        assert!(parse_channel("<rss><channel>").is_err());
    }
}
