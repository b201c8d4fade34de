use std::collections::HashMap;

use crate::model::Condition;

/// Icon and background video shown next to a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    pub icon: String,
    pub video: String,
}

impl MediaEntry {
    pub fn new(icon: impl Into<String>, video: impl Into<String>) -> Self {
        Self { icon: icon.into(), video: video.into() }
    }

    /// Embed URL that starts muted, skips the intro and plays on load.
    pub fn autoplay_url(&self) -> String {
        let embed = self.video.replace("youtu.be/", "www.youtube.com/embed/");
        let sep = if embed.contains('?') { '&' } else { '?' };
        format!("{embed}{sep}autoplay=1&start=5&mute=1")
    }
}

/// Condition label to media lookup, with a Default entry for anything unlisted.
#[derive(Debug, Clone)]
pub struct MediaCatalog {
    entries: HashMap<String, MediaEntry>,
    fallback: MediaEntry,
}

impl MediaCatalog {
    pub fn new(fallback: MediaEntry) -> Self {
        Self { entries: HashMap::new(), fallback }
    }

    pub fn with_entry(mut self, label: &str, entry: MediaEntry) -> Self {
        self.entries.insert(label.to_string(), entry);
        self
    }

    pub fn lookup(&self, condition: &Condition) -> &MediaEntry {
        self.entries.get(condition.label()).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &MediaEntry {
        &self.fallback
    }
}

impl Default for MediaCatalog {
    fn default() -> Self {
        let yt = |id: &str| format!("https://www.youtube.com/embed/{id}");

        MediaCatalog::new(MediaEntry::new("🌈", yt("QVGwC-tywO4")))
            .with_entry("Clear", MediaEntry::new("☀️", yt("0_jNjpVxUt0")))
            .with_entry("Clouds", MediaEntry::new("☁️", yt("Jptq6mUa5IE")))
            .with_entry("Rain", MediaEntry::new("🌧️", yt("SnUBb-FAlCY")))
            .with_entry("Drizzle", MediaEntry::new("🌦️", yt("lSMVVLR9KIs")))
            .with_entry("Thunderstorm", MediaEntry::new("⛈️", yt("aPoXzzo2cSc")))
            .with_entry("Snow", MediaEntry::new("❄️", yt("7BrIJrjxVxA")))
            .with_entry("Mist", MediaEntry::new("🌫️", yt("w3PDyTWlStk")))
    }
}

/// Provider-hosted icon for an OpenWeather icon code such as `10d`.
pub fn icon_url(code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{code}@2x.png")
}
