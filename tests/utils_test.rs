use bangerid::spotify::tracks::normalize_tracks;
use bangerid::types::{
    Image, LinkedFrom, PlaybackState, SavedTrack, SavedTrackItem, TokenResponse,
};
use bangerid::utils::*;
use chrono::{Duration, TimeZone, Utc};

// Helper function to create a test image
fn image(url: &str, size: u32) -> Image {
    Image {
        url: url.to_string(),
        height: Some(size),
        width: Some(size),
    }
}

// Helper function to create a saved track item
fn saved_item(uri: &str, linked_uri: Option<&str>, artists: &[&str], images: Vec<Image>) -> SavedTrackItem {
    let json = serde_json::json!({
        "added_at": "2024-01-01T00:00:00Z",
        "track": {
            "uri": uri,
            "name": format!("name of {}", uri),
            "artists": artists.iter().map(|a| serde_json::json!({ "name": a })).collect::<Vec<_>>(),
            "album": { "images": [] }
        }
    });
    let mut item: SavedTrackItem = serde_json::from_value(json).unwrap();
    item.track.linked_from = linked_uri.map(|uri| LinkedFrom {
        id: None,
        uri: Some(uri.to_string()),
    });
    item.track.album.images = images;
    item
}

fn track(item: &SavedTrackItem) -> &SavedTrack {
    &item.track
}

#[test]
fn test_generate_state() {
    let state = generate_state().unwrap();

    // 16 bytes in padded base64 are 24 characters
    assert_eq!(state.len(), 24);

    // Should only contain URL-safe characters
    assert!(
        state
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '=')
    );

    // Two generated states should be different
    assert_ne!(state, generate_state().unwrap());
}

#[test]
fn test_select_album_image_prefers_64() {
    let images = vec![image("big", 640), image("small", 64), image("medium", 300)];
    assert_eq!(select_album_image(&images), Some("small"));
}

#[test]
fn test_select_album_image_falls_back_to_last() {
    let images = vec![image("big", 640), image("medium", 300)];
    assert_eq!(select_album_image(&images), Some("medium"));

    let single = vec![image("only", 640)];
    assert_eq!(select_album_image(&single), Some("only"));
}

#[test]
fn test_select_album_image_requires_both_dimensions() {
    let images = vec![
        Image {
            url: "wide".to_string(),
            height: Some(64),
            width: Some(128),
        },
        image("last", 300),
    ];
    assert_eq!(select_album_image(&images), Some("last"));

    let unsized_images = vec![Image {
        url: "unknown".to_string(),
        height: None,
        width: None,
    }];
    assert_eq!(select_album_image(&unsized_images), Some("unknown"));
}

#[test]
fn test_select_album_image_empty() {
    assert_eq!(select_album_image(&[]), None);
}

#[test]
fn test_stable_track_uri() {
    let relinked = saved_item("spotify:track:new", Some("spotify:track:old"), &["A"], vec![]);
    assert_eq!(stable_track_uri(track(&relinked)), "spotify:track:old");

    let plain = saved_item("spotify:track:plain", None, &["A"], vec![]);
    assert_eq!(stable_track_uri(track(&plain)), "spotify:track:plain");

    let empty_link = saved_item("spotify:track:x", Some(""), &["A"], vec![]);
    assert_eq!(stable_track_uri(track(&empty_link)), "spotify:track:x");
}

#[test]
fn test_playing_item_keeps_relinked_uri() {
    let json = serde_json::json!({
        "is_playing": true,
        "progress_ms": 1000,
        "item": {
            "uri": "spotify:track:new",
            "name": "Relinked",
            "duration_ms": 200000,
            "linked_from": { "id": "old", "uri": "spotify:track:old" }
        }
    });
    let state: PlaybackState = serde_json::from_value(json).unwrap();
    let item = state.item.as_ref().unwrap();
    assert_eq!(item.stable_uri(), "spotify:track:old");

    // the page compares the forwarded state against the grid's stable URIs
    let forwarded = serde_json::to_value(&state).unwrap();
    assert_eq!(forwarded["item"]["linked_from"]["uri"], "spotify:track:old");
    assert_eq!(forwarded["item"]["uri"], "spotify:track:new");
}

#[test]
fn test_playing_item_without_relink() {
    let json = r#"{"is_playing":true,"item":{"uri":"spotify:track:1","name":"One"}}"#;
    let state: PlaybackState = serde_json::from_str(json).unwrap();
    let item = state.item.unwrap();

    assert_eq!(item.stable_uri(), "spotify:track:1");
    assert!(item.linked_from.is_none());
}

#[test]
fn test_normalize_tracks() {
    let items = vec![
        saved_item(
            "spotify:track:1",
            Some("spotify:track:orig"),
            &["Main", "Feat"],
            vec![image("640", 640), image("64", 64)],
        ),
        saved_item("spotify:track:2", None, &[], vec![image("300", 300)]),
        saved_item("spotify:track:3", None, &["Nobody"], vec![]),
    ];

    let tracks = normalize_tracks(&items);

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].id, "spotify:track:orig");
    assert_eq!(tracks[0].artist, "Main");
    assert_eq!(tracks[0].album_image, "64");
    assert_eq!(tracks[0].name, "name of spotify:track:1");

    assert_eq!(tracks[1].id, "spotify:track:2");
    assert_eq!(tracks[1].artist, "");
    assert_eq!(tracks[1].album_image, "300");
}

#[test]
fn test_find_cookie() {
    let header = "theme=dark; spotify_access_token=abc123; spotify_token_expiry=\"2030-01-01T00:00:00Z\"";

    assert_eq!(find_cookie(header, "spotify_access_token"), Some("abc123"));
    assert_eq!(find_cookie(header, "theme"), Some("dark"));
    assert_eq!(
        find_cookie(header, "spotify_token_expiry"),
        Some("2030-01-01T00:00:00Z")
    );
    assert_eq!(find_cookie(header, "spotify_refresh_token"), None);
    assert_eq!(find_cookie("", "theme"), None);
}

#[test]
fn test_find_cookie_keeps_base64_padding() {
    let header = "a=b==; c=d";
    assert_eq!(find_cookie(header, "a"), Some("b=="));
}

#[test]
fn test_expiry_roundtrip() {
    let expiry = Utc.with_ymd_and_hms(2030, 5, 17, 12, 30, 0).unwrap();

    let formatted = format_expiry(expiry);
    assert_eq!(formatted, "2030-05-17T12:30:00Z");
    assert_eq!(parse_expiry(&formatted), Some(expiry));
}

#[test]
fn test_parse_expiry_with_offset() {
    let parsed = parse_expiry("2030-05-17T14:30:00+02:00").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 5, 17, 12, 30, 0).unwrap());
}

#[test]
fn test_parse_expiry_invalid() {
    assert_eq!(parse_expiry("tomorrow"), None);
    assert_eq!(parse_expiry(""), None);
}

#[test]
fn test_render_template() {
    let template = "<body data-x=\"{{ logged_in }}\"><p {{login_hidden}}>hi</p>{{ unknown }}</body>";
    let rendered = render_template(
        template,
        &[("logged_in", "true"), ("login_hidden", "hidden")],
    );

    assert_eq!(
        rendered,
        "<body data-x=\"true\"><p hidden>hi</p>{{ unknown }}</body>"
    );
}

#[test]
fn test_render_template_unterminated() {
    let rendered = render_template("a {{ b", &[("b", "x")]);
    assert_eq!(rendered, "a {{ b");
}

#[test]
fn test_token_response_into_token() {
    let json = r#"{"access_token":"a","token_type":"Bearer","expires_in":3600}"#;
    let response: TokenResponse = serde_json::from_str(json).unwrap();
    let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

    let token = response.into_token(now);

    assert_eq!(token.access_token, "a");
    assert_eq!(token.refresh_token, "");
    assert_eq!(token.expiry, now + Duration::hours(1));
}
