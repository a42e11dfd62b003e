//! Text rendering for the story page, the home feed and instant previews.

use std::fmt::Write as _;

use phi_core::{Entity, FeedPage, InstantPreview, Story};

/// Renders a story page. With `chat_open` a chat sidebar placeholder is
/// appended, mirroring the sidebar toggle on the story route.
#[must_use]
pub fn render_story(story: &Story, chat_open: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", display_title(&story.title));
    if let Some(description) = &story.description {
        let _ = writeln!(out, "{description}");
    }
    let _ = writeln!(out);

    if let Some(category) = &story.category {
        let _ = writeln!(out, "Category: {category}");
    }
    if let Some(health) = &story.health_indicator {
        let _ = writeln!(out, "Health: {health}");
    }
    if let Some(confidence) = story.confidence {
        let _ = writeln!(out, "Confidence: {:.0}%", confidence * 100.0);
    }
    if let Some(revision) = story.revision {
        let _ = writeln!(out, "Revision: {revision}");
    }
    if let Some(score) = story.tcf_score {
        let _ = writeln!(out, "Score: {score:.1}");
    }
    let _ = writeln!(
        out,
        "Claims: {}  Sources: {}",
        story.claim_count, story.artifact_count
    );

    render_entities(&mut out, "People", &story.entities.people);
    render_entities(&mut out, "Organizations", &story.entities.organizations);
    render_entities(&mut out, "Locations", &story.entities.locations);

    if !story.related_stories.is_empty() {
        let _ = writeln!(out, "\nRelated:");
        for related in &story.related_stories {
            let title = related.title.as_deref().unwrap_or("untitled");
            let _ = writeln!(out, "  - {title} (/stories/{})", related.id);
        }
    }

    if chat_open {
        let _ = writeln!(out, "\n[chat] Ask about this story");
    }
    out
}

fn render_entities(out: &mut String, label: &str, entities: &[Entity]) {
    let names: Vec<&str> = entities.iter().filter_map(|e| e.name.as_deref()).collect();
    if !names.is_empty() {
        let _ = writeln!(out, "{label}: {}", names.join(", "));
    }
}

fn display_title(title: &str) -> &str {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        "Untitled story"
    } else {
        trimmed
    }
}

/// Renders one feed page as a ranked list.
#[must_use]
pub fn render_feed(page: &FeedPage) -> String {
    if page.stories.is_empty() {
        return "no stories yet\n".to_string();
    }
    let mut out = String::new();
    for (rank, item) in page.stories.iter().enumerate() {
        let position = page.offset as usize + rank + 1;
        let score = item
            .tcf_score
            .map_or_else(|| "\u{2014}".to_string(), |s| format!("{s:.1}"));
        let _ = writeln!(
            out,
            "{position:>3}. [{score:>5}] {}  (/stories/{})",
            display_title(&item.title),
            item.id
        );
    }
    out
}

/// Renders the pre-submission preview for a URL.
#[must_use]
pub fn render_instant_preview(preview: &InstantPreview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", preview.title);
    if let Some(description) = &preview.description {
        let _ = writeln!(out, "{description}");
    }
    if let Some(site) = &preview.site_name {
        let _ = writeln!(out, "Site: {site}");
    }
    if let Some(words) = preview.word_count {
        let _ = writeln!(out, "Word Count: {words} words");
    }
    if preview.is_rogue {
        let _ = writeln!(out, "Note: this site usually blocks extraction");
    }
    let _ = writeln!(
        out,
        "Preview: {}",
        if preview.is_cached { "cached" } else { "not yet extracted" }
    );
    out
}

#[cfg(test)]
mod tests {
    use phi_core::{FeedItem, RelatedStory, StoryEntities};

    use super::*;

    fn story() -> Story {
        Story {
            id: "st-1".into(),
            title: "Harbour strike enters second week".into(),
            description: Some("Dock workers continue action".into()),
            category: Some("Labour".into()),
            health_indicator: Some("growing".into()),
            confidence: Some(0.82),
            revision: Some(3),
            claim_count: 4,
            artifact_count: 2,
            entities: StoryEntities {
                people: vec![Entity {
                    name: Some("A. Person".into()),
                    ..Entity::default()
                }],
                ..StoryEntities::default()
            },
            related_stories: vec![RelatedStory {
                id: "st-2".into(),
                title: Some("Port closures".into()),
                match_score: Some(0.8),
            }],
            ..Story::default()
        }
    }

    #[test]
    fn story_render_includes_counts_and_entities() {
        let text = render_story(&story(), false);
        assert!(text.starts_with("Harbour strike enters second week\n"));
        assert!(text.contains("Category: Labour"));
        assert!(text.contains("Confidence: 82%"));
        assert!(text.contains("Revision: 3"));
        assert!(text.contains("Claims: 4  Sources: 2"));
        assert!(text.contains("People: A. Person"));
        assert!(!text.contains("Organizations:"));
        assert!(text.contains("Port closures (/stories/st-2)"));
        assert!(!text.contains("[chat]"));
    }

    #[test]
    fn story_render_shows_chat_when_open() {
        assert!(render_story(&story(), true).contains("[chat]"));
    }

    #[test]
    fn feed_ranks_continue_from_offset() {
        let page = FeedPage {
            count: 2,
            offset: 20,
            limit: 20,
            stories: vec![
                FeedItem {
                    id: "a".into(),
                    title: "First".into(),
                    tcf_score: Some(91.25),
                    ..FeedItem::default()
                },
                FeedItem {
                    id: "b".into(),
                    title: "Second".into(),
                    ..FeedItem::default()
                },
            ],
        };
        let text = render_feed(&page);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with(" 21. [ 91.2]") || lines[0].starts_with(" 21. [ 91.3]"));
        assert!(lines[1].contains("22."));
        assert!(lines[1].contains("Second"));
    }

    #[test]
    fn blank_titles_render_as_untitled() {
        let story = Story {
            id: "st-7".into(),
            ..Story::default()
        };
        assert!(render_story(&story, false).starts_with("Untitled story\n"));

        let page = FeedPage {
            stories: vec![FeedItem {
                id: "st-7".into(),
                ..FeedItem::default()
            }],
            ..FeedPage::default()
        };
        assert!(render_feed(&page).contains("Untitled story  (/stories/st-7)"));
    }

    #[test]
    fn empty_feed_has_message() {
        assert_eq!(render_feed(&FeedPage::default()), "no stories yet\n");
    }

    #[test]
    fn instant_preview_flags_rogue_sites() {
        let preview = InstantPreview {
            url: "https://wsj.com/x".into(),
            title: "Preview not available".into(),
            is_rogue: true,
            ..InstantPreview::default()
        };
        let text = render_instant_preview(&preview);
        assert!(text.contains("usually blocks extraction"));
        assert!(text.contains("not yet extracted"));
    }
}
