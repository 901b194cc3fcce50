use std::fmt::Write;

use chrono::{DateTime, NaiveDateTime};
use curator_core::{
    Curation, CurationRowView, Enrichable, FeedStatus, FeedViewModel, LinkPreview, Playlist,
    PlaylistItemType, Profile, SecondaryResourceEnricher, ViewState,
};

pub fn render_feed(view: &FeedViewModel) -> String {
    let mut out = String::new();

    match &view.profile {
        ViewState::Loaded(profile) => {
            out.push_str(&render_profile(profile));
            if view.is_own_profile {
                out.push_str("(this is you)\n");
            }
        }
        ViewState::Error(message) => {
            let _ = writeln!(out, "Profile unavailable: {message}");
        }
        ViewState::Idle | ViewState::Loading => {
            if let Some(author) = &view.author {
                let _ = writeln!(out, "@{author}");
            }
        }
    }
    out.push('\n');

    match &view.feed {
        FeedStatus::Error(message) => {
            let _ = writeln!(out, "Could not load curations: {message}");
            return out;
        }
        FeedStatus::Idle | FeedStatus::Loading => {
            out.push_str("Loading curations...\n");
            return out;
        }
        FeedStatus::Loaded if view.curations.is_empty() => {
            out.push_str("No curations yet.\n");
        }
        FeedStatus::Loaded => {
            for row in &view.curations {
                out.push_str(&format_row(row));
            }
        }
    }

    if let Some(message) = &view.load_more_error {
        let _ = writeln!(out, "Could not load more: {message}");
    } else if view.has_more {
        out.push_str("More curations available (use --pages).\n");
    }
    out
}

pub fn render_profile(profile: &Profile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (@{})", profile.display_name(), profile.username);
    if let Some(intro) = profile.introduction.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "{intro}");
    }
    let _ = writeln!(
        out,
        "{} curations | {} followers | {} following",
        profile.curation_count, profile.follower_count, profile.following_count
    );
    out
}

fn format_row(row: &CurationRowView) -> String {
    let mut out = String::new();
    let date = row
        .created_at
        .as_deref()
        .map(format_date)
        .unwrap_or_default();
    let _ = writeln!(out, "[#{}] {} {}", row.id, row.title, date);
    if !row.content.is_empty() {
        let _ = writeln!(out, "    {}", row.content);
    }
    if !row.tags.is_empty() {
        let tags: Vec<String> = row.tags.iter().map(|t| format!("#{t}")).collect();
        let _ = writeln!(out, "    {}", tags.join(" "));
    }
    for link in &row.links {
        out.push_str(&format_link(&link.url, link.preview.as_ref()));
    }
    let _ = writeln!(
        out,
        "    {} likes, {} comments",
        row.like_count, row.comment_count
    );
    out
}

fn format_link(url: &str, preview: Option<&LinkPreview>) -> String {
    match preview.and_then(|p| p.title.as_deref()) {
        Some(title) => format!("    - {title} <{url}>\n"),
        None => format!("    - <{url}>\n"),
    }
}

/// Backend timestamps come with or without an offset; anything else is shown as-is.
fn format_date(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d").to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn render_playlists(heading: &str, playlists: &[Playlist]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{heading} ({})", playlists.len());
    for playlist in playlists {
        let visibility = if playlist.is_public { "" } else { " [private]" };
        let _ = writeln!(
            out,
            "[#{}] {}{} - {} items",
            playlist.id,
            playlist.title,
            visibility,
            playlist.items.len()
        );
    }
    out
}

/// Untitled link items fall back to their preview's title, then the url.
pub fn render_playlist(playlist: &Playlist, enricher: &SecondaryResourceEnricher) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [#{}]", playlist.title, playlist.id);
    if !playlist.description.is_empty() {
        let _ = writeln!(out, "{}", playlist.description);
    }
    let playlist_id = playlist.item_id();
    for (position, item) in playlist.ordered_items().iter().enumerate() {
        let kind = match item.item_type {
            PlaylistItemType::Link => "link",
            PlaylistItemType::Curation => "curation",
        };
        let preview_title = item
            .url
            .as_deref()
            .and_then(|url| enricher.preview(&playlist_id, url))
            .and_then(|preview| preview.title.as_deref());
        let label = item
            .title
            .as_deref()
            .or(preview_title)
            .or(item.url.as_deref())
            .unwrap_or("(untitled)");
        let _ = writeln!(out, "{:>3}. {label} ({kind})", position + 1);
    }
    out
}

pub fn render_curation(curation: &Curation, enricher: &SecondaryResourceEnricher) -> String {
    let mut out = String::new();
    let id = curation.item_id();
    let date = curation
        .created_at
        .as_deref()
        .map(format_date)
        .unwrap_or_default();
    let _ = writeln!(out, "{} [#{}] {}", curation.title, curation.id, date);
    if let Some(author) = &curation.member {
        let _ = writeln!(out, "by @{}", author.username);
    }
    if !curation.content.is_empty() {
        let _ = writeln!(out, "\n{}\n", curation.content);
    }
    for link in curation.links() {
        let preview = enricher.preview(&id, link);
        out.push_str(&format_link(link, preview));
        if let Some(description) = preview.and_then(|p| p.description.as_deref()) {
            let _ = writeln!(out, "      {description}");
        }
    }
    let _ = writeln!(
        out,
        "{} likes, {} comments",
        curation.like_count, curation.comment_count
    );
    out
}
