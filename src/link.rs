//! Store URL recognition
//!
//! Turns web-store and web-player URLs into typed item references. An input
//! that matches none of the known shapes is classified as
//! [`LinkKind::Unrecognized`] rather than rejected, so callers can report it
//! as part of normal job handling.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of catalog item a URL refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    /// A single track
    Track,
    /// A full album
    Album,
    /// An artist discography
    Artist,
    /// A label discography
    Label,
    /// The authenticated user's favorites (albums, artists or tracks)
    UserFavorites,
    /// A playlist
    Playlist,
    /// Input that matched none of the known URL shapes
    Unrecognized,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkKind::Track => "track",
            LinkKind::Album => "album",
            LinkKind::Artist => "artist",
            LinkKind::Label => "label",
            LinkKind::UserFavorites => "user favorites",
            LinkKind::Playlist => "playlist",
            LinkKind::Unrecognized => "unrecognized",
        };
        write!(f, "{s}")
    }
}

/// A typed reference to a downloadable catalog item.
///
/// For [`LinkKind::UserFavorites`] the id keeps the favorites sub-path
/// (`library/favorites/albums`, `.../artists` or `.../tracks`), which the
/// orchestrator uses to pick the favorites flavor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLink {
    /// The recognized item kind
    pub kind: LinkKind,
    /// The catalog item id captured from the URL (empty when unrecognized)
    pub id: String,
    /// The input URL as given
    pub source_url: String,
}

impl ItemLink {
    /// Parse a store or player URL into an item reference.
    ///
    /// Patterns are tried most specific first; the `interpreter` page alias
    /// is folded into [`LinkKind::Artist`]. Never fails: anything that does
    /// not match comes back as [`LinkKind::Unrecognized`] with an empty id.
    pub fn parse(url: &str) -> Self {
        let url = url.trim();
        let patterns = link_patterns();

        for pattern in patterns.iter() {
            if let Some(caps) = pattern.captures(url) {
                let type_token = caps.name("kind").map(|m| m.as_str()).unwrap_or_default();
                let id = caps.name("id").map(|m| m.as_str()).unwrap_or_default();
                if let Some(kind) = kind_from_token(type_token) {
                    return Self {
                        kind,
                        id: id.to_string(),
                        source_url: url.to_string(),
                    };
                }
            }
        }

        Self {
            kind: LinkKind::Unrecognized,
            id: String::new(),
            source_url: url.to_string(),
        }
    }

    /// Whether this reference points at something downloadable.
    pub fn is_recognized(&self) -> bool {
        self.kind != LinkKind::Unrecognized
    }
}

fn kind_from_token(token: &str) -> Option<LinkKind> {
    match token {
        "track" => Some(LinkKind::Track),
        "album" => Some(LinkKind::Album),
        "artist" | "interpreter" => Some(LinkKind::Artist),
        "label" => Some(LinkKind::Label),
        "user" => Some(LinkKind::UserFavorites),
        "playlist" => Some(LinkKind::Playlist),
        _ => None,
    }
}

/// Ordered URL patterns, most specific first.
///
/// 1. Player favorites pages keep the whole favorites sub-path as the id.
/// 2. Store and player item pages, with an optional locale segment and any
///    number of slug segments before the id.
fn link_patterns() -> Vec<Regex> {
    // The patterns are fixed literals; compilation cannot fail.
    vec![
        Regex::new(
            r"^https?://[^/]+/(?P<kind>user)/(?P<id>library/favorites/(?:albums|artists|tracks))/?$",
        )
        .unwrap(),
        Regex::new(
            r"^https?://[^/]+/(?:[a-z]{2}-[a-z]{2}/)?(?P<kind>album|track|artist|label|playlist|interpreter)/(?:[^/]+/)*?(?P<id>[A-Za-z0-9]+)/?$",
        )
        .unwrap(),
    ]
}
