use base64::{Engine, engine::general_purpose::URL_SAFE};
use chrono::{DateTime, Utc};
use rand::{TryRngCore, rngs::OsRng};

use crate::types::{Image, SavedTrack};

/// Size in pixels of the thumbnail the grid prefers.
pub const THUMBNAIL_SIZE: u32 = 64;

/// Generates a random OAuth `state` value.
///
/// 16 bytes straight from the operating system RNG, URL-safe base64
/// encoded (24 characters including padding).
pub fn generate_state() -> Result<String, String> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| e.to_string())?;
    Ok(URL_SAFE.encode(bytes))
}

/// Picks the album image shown next to a track.
///
/// An exact 64x64 image wins; otherwise the last image is used, since
/// Spotify orders images from largest to smallest. Returns `None` when the
/// album has no images at all.
pub fn select_album_image(images: &[Image]) -> Option<&str> {
    images
        .iter()
        .find(|img| img.height == Some(THUMBNAIL_SIZE) && img.width == Some(THUMBNAIL_SIZE))
        .or_else(|| images.last())
        .map(|img| img.url.as_str())
}

/// Returns the URI of the track as the user saved it.
///
/// When Spotify relinks a track for the user's market, `linked_from` holds
/// the original track. Its URI stays stable across markets.
pub fn stable_track_uri(track: &SavedTrack) -> &str {
    track
        .linked_from
        .as_ref()
        .and_then(|linked| linked.uri.as_deref())
        .filter(|uri| !uri.is_empty())
        .unwrap_or(&track.uri)
}

/// Looks up a cookie value in a raw `Cookie` request header.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}

pub fn format_expiry(expiry: DateTime<Utc>) -> String {
    expiry.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

pub fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Replaces every `{{ name }}` placeholder with its value.
///
/// Unknown placeholders are left untouched. Values are inserted verbatim,
/// callers only pass fixed strings.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after[..end].trim();
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}
