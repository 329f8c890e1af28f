use std::collections::HashMap;
use std::time::Duration;

use zbus::zvariant::{Array, OwnedValue};

/// A structured view of an MPRIS2 `Metadata_Map`.
///
/// * [MPRIS2 `Metadata_Map` type][metadata_map]
/// * [MPRIS v2 metadata guidelines][metadata_guidelines]
///
/// [metadata_map]: https://specifications.freedesktop.org/mpris-spec/latest/Track_List_Interface.html#Mapping:Metadata_Map
/// [metadata_guidelines]: https://www.freedesktop.org/wiki/Specifications/mpris-spec/metadata/
#[derive(Debug, Default, Clone)]
pub struct Metadata {
    values: HashMap<String, OwnedValue>,
}

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&OwnedValue> {
        self.values.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.downcast_ref::<&str>().ok())
    }

    fn get_strings(&self, key: &str) -> Option<Vec<String>> {
        self.get(key)
            .and_then(|v| v.downcast_ref::<Array>().ok())
            .and_then(|v| Vec::<String>::try_from(v).ok())
    }

    /// Based on `mpris:trackid`
    /// > A unique identity for this track within the context of an MPRIS object.
    pub fn track_id(&self) -> Option<&str> {
        self.get_str("mpris:trackid")
    }

    /// Based on `xesam:album`
    pub fn album_name(&self) -> Option<&str> {
        self.get_str("xesam:album")
    }

    /// Based on `xesam:artist`
    pub fn artists(&self) -> Option<Vec<String>> {
        self.get_strings("xesam:artist")
    }

    /// Based on `xesam:genre`
    pub fn genres(&self) -> Option<Vec<String>> {
        self.get_strings("xesam:genre")
    }

    /// Year part of `xesam:contentCreated`, an ISO 8601 date.
    pub fn year(&self) -> Option<u64> {
        self.get_str("xesam:contentCreated")
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }

    /// Based on `mpris:length`, in microseconds.
    pub fn length(&self) -> Option<Duration> {
        self.get("mpris:length").and_then(|v| {
            if let Ok(val) = v.downcast_ref::<u64>() {
                Some(Duration::from_micros(val))
            } else if let Ok(val) = v.downcast_ref::<i64>() {
                u64::try_from(val).ok().map(Duration::from_micros)
            } else {
                None
            }
        })
    }

    /// Based on `xesam:title`
    pub fn title(&self) -> Option<&str> {
        self.get_str("xesam:title")
    }

    /// Based on `xesam:url`
    pub fn url(&self) -> Option<&str> {
        self.get_str("xesam:url")
    }

    /// Rhythmbox's `rhythmbox:streamTitle`, only present for radio streams
    /// that announce what they are playing.
    pub fn stream_title(&self) -> Option<&str> {
        self.get_str("rhythmbox:streamTitle")
    }
}

impl From<HashMap<String, OwnedValue>> for Metadata {
    fn from(values: HashMap<String, OwnedValue>) -> Self {
        Metadata { values }
    }
}
