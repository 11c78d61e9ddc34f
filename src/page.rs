//! Page elements
//!
//! A minimal stand-in for the hosting document: the panel and toast are
//! elements owned by a [`Page`] and handed out as shared handles. A page built
//! without one of them gives out `None`, and everything downstream treats that
//! as a silent no-op.

use crate::consts::panel_consts::{PANEL_ID, TOAST_ID};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub id: String,
    /// Markup children. Takes precedence over `text` when both are set.
    pub inner_html: String,
    pub text: String,
    pub visible: bool,
    pub classes: Vec<String>,
    /// Hint for the hosting page to hide the element again after this long.
    pub dismiss_after_ms: Option<u64>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Outer markup, with visibility expressed as an inline `display` style.
    pub fn to_html(&self) -> String {
        let class_attr = if self.classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, escape_html(&self.classes.join(" ")))
        };
        let dismiss_attr = self
            .dismiss_after_ms
            .map(|ms| format!(r#" data-dismiss-ms="{}""#, ms))
            .unwrap_or_default();
        let display = if self.visible { "block" } else { "none" };
        let body = if self.inner_html.is_empty() {
            escape_html(&self.text)
        } else {
            self.inner_html.clone()
        };

        format!(
            r#"<div id="{}"{}{} style="display:{}">{}</div>"#,
            escape_html(&self.id),
            class_attr,
            dismiss_attr,
            display,
            body
        )
    }
}

/// Shared, injectable reference to one element.
#[derive(Debug, Clone)]
pub struct ElementHandle {
    inner: Arc<Mutex<Element>>,
}

impl ElementHandle {
    pub fn new(element: Element) -> Self {
        Self {
            inner: Arc::new(Mutex::new(element)),
        }
    }

    /// Runs `f` with exclusive access to the element.
    pub async fn update<R>(&self, f: impl FnOnce(&mut Element) -> R) -> R {
        let mut element = self.inner.lock().await;
        f(&mut element)
    }

    pub async fn snapshot(&self) -> Element {
        self.inner.lock().await.clone()
    }
}

/// The elements the panel and toast render into.
#[derive(Debug, Clone, Default)]
pub struct Page {
    panel: Option<ElementHandle>,
    toast: Option<ElementHandle>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with both elements under their default ids.
    #[allow(unused)]
    pub fn standard() -> Self {
        Self::new().with_panel(PANEL_ID).with_toast(TOAST_ID)
    }

    pub fn with_panel(mut self, id: &str) -> Self {
        self.panel = Some(ElementHandle::new(Element::new(id)));
        self
    }

    pub fn with_toast(mut self, id: &str) -> Self {
        self.toast = Some(ElementHandle::new(Element::new(id)));
        self
    }

    pub fn panel(&self) -> Option<ElementHandle> {
        self.panel.clone()
    }

    pub fn toast(&self) -> Option<ElementHandle> {
        self.toast.clone()
    }

    /// Markup of every present element. A hidden toast is left out entirely.
    pub async fn to_html(&self) -> String {
        let mut parts = Vec::new();
        if let Some(panel) = &self.panel {
            parts.push(panel.snapshot().await.to_html());
        }
        if let Some(toast) = &self.toast {
            let toast = toast.snapshot().await;
            if toast.visible {
                parts.push(toast.to_html());
            }
        }
        parts.join("\n")
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
