//! Panel renderer
//!
//! Draws a feed into the injected panel element and controls its visibility.

use crate::consts::panel_consts::{CONTENT_ID, OPEN_CLASS, text};
use crate::events::{Event, EventSink, EventType};
use crate::feed::{UpdateEntry, UpdateFeed};
use crate::logging::LogLevel;
use crate::page::{ElementHandle, escape_html};

pub struct Renderer {
    panel: Option<ElementHandle>,
    events: EventSink,
}

impl Renderer {
    pub fn new(panel: Option<ElementHandle>, events: EventSink) -> Self {
        Self { panel, events }
    }

    /// Replaces the panel contents with the feed, or the placeholder when empty.
    pub async fn render(&self, feed: &UpdateFeed) {
        let Some(panel) = &self.panel else {
            return;
        };
        let markup = panel_markup(feed);
        panel.update(|element| element.inner_html = markup).await;

        self.events.emit(Event::renderer_with_level(
            format!("Rendered {} card(s)", feed.len()),
            EventType::Success,
            LogLevel::Debug,
        ));
    }

    pub async fn open(&self) {
        self.set_open(true).await;
    }

    pub async fn close(&self) {
        self.set_open(false).await;
    }

    /// Flips visibility. Returns the new state, always closed without a panel.
    pub async fn toggle(&self) -> bool {
        if self.panel.is_none() {
            return false;
        }
        let open = !self.is_open().await;
        self.set_open(open).await;
        open
    }

    pub async fn is_open(&self) -> bool {
        match &self.panel {
            Some(panel) => panel.update(|element| element.has_class(OPEN_CLASS)).await,
            None => false,
        }
    }

    pub async fn set_open(&self, open: bool) {
        let Some(panel) = &self.panel else {
            return;
        };
        let changed = panel
            .update(|element| {
                let was_open = element.has_class(OPEN_CLASS);
                if open {
                    element.add_class(OPEN_CLASS);
                } else {
                    element.remove_class(OPEN_CLASS);
                }
                element.visible = open;
                was_open != open
            })
            .await;

        if changed {
            self.events.emit(Event::renderer_with_level(
                format!("Panel {}", if open { "opened" } else { "closed" }),
                EventType::StateChange,
                LogLevel::Debug,
            ));
        }
    }
}

/// Inner markup of the panel: header, then the cards or the placeholder.
pub fn panel_markup(feed: &UpdateFeed) -> String {
    let body = if feed.is_empty() {
        escape_html(text::NO_UPDATES)
    } else {
        feed.updates.iter().map(card_markup).collect::<String>()
    };
    format!(
        r#"{}<div id="{}">{}</div>"#,
        header_markup(),
        CONTENT_ID,
        body
    )
}

fn header_markup() -> String {
    format!(
        r#"<div class="header"><div class="title">{}</div><button class="dismiss" data-action="toggle-updates-panel">{}</button></div>"#,
        escape_html(text::PANEL_TITLE),
        escape_html(text::DISMISS)
    )
}

fn card_markup(entry: &UpdateEntry) -> String {
    let notes = entry
        .notes
        .iter()
        .map(|note| format!("<li>{}</li>", escape_html(note)))
        .collect::<String>();
    format!(
        r#"<div class="card"><div class="card-title">{}</div><ul>{}</ul></div>"#,
        escape_html(&entry.heading()),
        notes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    fn v6_feed() -> UpdateFeed {
        UpdateFeed::new(vec![UpdateEntry::new(
            "v6",
            "2024-01-01",
            vec!["fix A".to_string()],
        )])
    }

    fn renderer(page: &Page) -> Renderer {
        Renderer::new(page.panel(), EventSink::disabled())
    }

    #[tokio::test]
    async fn test_single_entry_renders_one_card() {
        let page = Page::standard();
        renderer(&page).render(&v6_feed()).await;

        let html = page.panel().unwrap().snapshot().await.inner_html;
        assert_eq!(html.matches(r#"class="card""#).count(), 1);
        assert!(html.contains(r#"<div class="card-title">v6 — 2024-01-01</div>"#));
        assert_eq!(html.matches("<li>").count(), 1);
        assert!(html.contains("<li>fix A</li>"));
        assert!(!html.contains(text::NO_UPDATES));
    }

    #[tokio::test]
    async fn test_cards_follow_feed_order() {
        let feed = UpdateFeed::new(vec![
            UpdateEntry::new("v6", "2024-01-01", vec![]),
            UpdateEntry::new("v5", "2023-12-01", vec!["a".to_string(), "b".to_string()]),
        ]);
        let markup = panel_markup(&feed);

        let v6 = markup.find("v6 — 2024-01-01").unwrap();
        let v5 = markup.find("v5 — 2023-12-01").unwrap();
        assert!(v6 < v5);
        assert!(markup.contains("<ul></ul>"));
        assert!(markup.contains("<ul><li>a</li><li>b</li></ul>"));
    }

    #[tokio::test]
    async fn test_empty_feed_renders_placeholder_with_header() {
        let page = Page::standard();
        renderer(&page).render(&UpdateFeed::empty()).await;

        let html = page.panel().unwrap().snapshot().await.inner_html;
        assert!(html.contains(text::PANEL_TITLE));
        assert!(html.contains(r#"class="dismiss""#));
        assert!(html.contains(&format!(
            r#"<div id="{}">{}</div>"#,
            CONTENT_ID,
            text::NO_UPDATES
        )));
        assert!(!html.contains("card"));
    }

    #[test]
    fn test_entry_text_is_escaped() {
        let feed = UpdateFeed::new(vec![UpdateEntry::new(
            "<v7>",
            "2024-02-01",
            vec!["<script>alert(1)</script>".to_string()],
        )]);
        let markup = panel_markup(&feed);
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;v7&gt; — 2024-02-01"));
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let page = Page::standard();
        let renderer = renderer(&page);

        renderer.open().await;
        renderer.open().await;

        assert!(renderer.is_open().await);
        let panel = page.panel().unwrap().snapshot().await;
        assert!(panel.visible);
        assert_eq!(panel.classes, vec![OPEN_CLASS]);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let page = Page::standard();
        let renderer = renderer(&page);

        renderer.open().await;
        renderer.close().await;
        renderer.close().await;

        assert!(!renderer.is_open().await);
        assert!(!page.panel().unwrap().snapshot().await.visible);
    }

    #[tokio::test]
    async fn test_toggle_flips_state() {
        let page = Page::standard();
        let renderer = renderer(&page);

        assert!(renderer.toggle().await);
        assert!(!renderer.toggle().await);
        assert!(!renderer.is_open().await);
    }

    #[tokio::test]
    async fn test_missing_panel_is_noop() {
        let renderer = Renderer::new(None, EventSink::disabled());
        renderer.render(&v6_feed()).await;
        renderer.open().await;
        assert!(!renderer.toggle().await);
        assert!(!renderer.is_open().await);
    }
}
