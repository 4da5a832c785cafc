//! Result renderer: turns the finished plan text into sanitized HTML.
//!
//! The plan arrives as Markdown from an untrusted upstream, so the rendered
//! markup always goes through ammonia's allow-list before display.

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// Headings of the plan's standard sections, shown with `section-heading`.
pub const SECTION_HEADINGS: &[&str] = &[
    "Vision",
    "Key Goals",
    "Personal Motivation",
    "Action Plan",
    "Milestones",
    "Resources and Tools",
    "Support System",
    "Encouragement",
];

const SECTION_HEADING_CLASS: &str = "section-heading";

/// What to put on screen for a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayTree {
    /// Sanitized HTML rendered from Markdown.
    Formatted { html: String },
    /// Raw text for when formatting produced nothing usable.
    Plain { text: String },
}

impl DisplayTree {
    /// Markup for this tree. Plain text is escaped and preformatted.
    pub fn to_html(&self) -> String {
        match self {
            Self::Formatted { html } => html.clone(),
            Self::Plain { text } => format!("<pre>{}</pre>", ammonia::clean_text(text)),
        }
    }

    pub fn is_formatted(&self) -> bool {
        matches!(self, Self::Formatted { .. })
    }
}

/// Render a resolution plan.
pub fn render(text: &str) -> DisplayTree {
    if text.trim().is_empty() {
        tracing::warn!("Empty resolution text, rendering as plain");
        return DisplayTree::Plain {
            text: text.to_string(),
        };
    }

    let source = text.replace("\\*", "*");
    let markup = to_markup(&source);
    let cleaned = ammonia::Builder::default()
        .add_allowed_classes("h3", &[SECTION_HEADING_CLASS])
        .clean(&markup)
        .to_string();

    if !has_visible_text(&cleaned) {
        tracing::warn!(len = text.len(), "Formatted resolution had no visible content");
        return DisplayTree::Plain {
            text: text.to_string(),
        };
    }

    tracing::debug!(html_len = cleaned.len(), "Resolution rendered");
    DisplayTree::Formatted { html: cleaned }
}

fn to_markup(source: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut events: Vec<Event<'_>> = Parser::new_ext(source, options)
        .map(|event| match event {
            Event::SoftBreak => Event::HardBreak,
            other => other,
        })
        .collect();

    promote_section_headings(&mut events);

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Rewrite headings naming a plan section as `<h3 class="section-heading">`.
fn promote_section_headings(events: &mut [Event<'_>]) {
    let mut i = 0;
    while i < events.len() {
        if !matches!(events[i], Event::Start(Tag::Heading { .. })) {
            i += 1;
            continue;
        }
        let Some(len) = events[i..]
            .iter()
            .position(|e| matches!(e, Event::End(TagEnd::Heading(_))))
        else {
            break;
        };
        let end = i + len;

        let mut title = String::new();
        for event in &events[i + 1..end] {
            if let Event::Text(t) | Event::Code(t) = event {
                title.push_str(t);
            }
        }
        let title = title.trim().trim_end_matches(':').trim();

        if SECTION_HEADINGS.contains(&title) {
            events[i] = Event::Start(Tag::Heading {
                level: HeadingLevel::H3,
                id: None,
                classes: vec![CowStr::Borrowed(SECTION_HEADING_CLASS)],
                attrs: Vec::new(),
            });
            events[end] = Event::End(TagEnd::Heading(HeadingLevel::H3));
        }
        i = end + 1;
    }
}

fn has_visible_text(html: &str) -> bool {
    !ammonia::Builder::empty()
        .clean(html)
        .to_string()
        .trim()
        .is_empty()
}
