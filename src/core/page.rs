//! Landing page definition: parsing the plain-text page format.
//!
//! ```text
//! ! Brand
//! # Hero title
//! Hero copy, one paragraph per blank-line-separated block.
//! ## features | Features
//! Paragraph text.
//! * A card
//! ```
//!
//! `//` lines are comments.  Nav entries are derived: a `#home` link for the
//! hero followed by one link per section, in page order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Built-in page used when no file is given.
const DEMO_PAGE: &str = "\
! Northwind Studio
# Build calmer software
We design and ship focused tools for small teams.
Scroll down to see what we do, or jump straight to a section from the menu.

## about | About
Northwind is a three-person studio working out of a converted boathouse.
We take on a handful of projects a year and see each one through.

* Founded 2016
* Fully remote since 2020
* Clients in nine countries

## services | Services
Every engagement starts with a week of listening.

* Product discovery and prototyping
* Interface design systems
* Performance audits for web and native apps
* Long-term maintenance retainers

## work | Work
A few things we are proud of.

* Tidewater: offline-first field notes for marine biologists
* Ledgerly: bookkeeping for people who hate bookkeeping
* Signal Hill: a status page that tells the truth

## contact | Contact
Drop us a line at hello@northwind.example and we will reply within two days.

* hello@northwind.example
* +1 555 0100
";

/// Element ids the page chrome already uses.
const RESERVED_IDS: &[&str] = &[
    Page::HERO_ID,
    "header",
    "nav-toggle",
    "nav-menu",
    "hero-content",
    "hero-title",
];

// ───────────────────────────────────────── errors ────────────

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read page file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("page has no hero title (a line starting with `# `)")]
    MissingHeroTitle,
    #[error("line {line}: hero title defined twice")]
    DuplicateHeroTitle { line: usize },
    #[error("line {line}: content before the hero title")]
    ContentBeforeHero { line: usize },
    #[error("line {line}: malformed section header `{text}` (expected `## id | Label`)")]
    MalformedSection { line: usize, text: String },
    #[error("line {line}: section id `{id}` is already in use")]
    DuplicateSection { line: usize, id: String },
}

// ───────────────────────────────────────── model ─────────────

/// A piece of section content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    Card(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hero {
    pub title: String,
    pub body: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDef {
    pub id: String,
    pub label: String,
    pub blocks: Vec<Block>,
}

impl SectionDef {
    pub fn cards(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Card(text) => Some(text.as_str()),
            Block::Paragraph(_) => None,
        })
    }
}

/// One navigation menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: String,
    /// Fragment target, e.g. `"#about"`.
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub brand: String,
    pub hero: Hero,
    pub sections: Vec<SectionDef>,
}

impl Page {
    /// Element id the hero is published under.
    pub const HERO_ID: &'static str = "home";

    pub fn demo() -> Result<Self, PageError> {
        Self::parse(DEMO_PAGE)
    }

    pub fn load(path: &Path) -> Result<Self, PageError> {
        let contents = std::fs::read_to_string(path).map_err(|source| PageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn nav_entries(&self) -> Vec<NavEntry> {
        let mut out = vec![NavEntry {
            label: "Home".into(),
            href: format!("#{}", Self::HERO_ID),
        }];
        out.extend(self.sections.iter().map(|s| NavEntry {
            label: s.label.clone(),
            href: format!("#{}", s.id),
        }));
        out
    }

    pub fn parse(source: &str) -> Result<Self, PageError> {
        let mut brand = String::new();
        let mut title: Option<String> = None;
        let mut hero_body: Vec<String> = Vec::new();
        let mut sections: Vec<SectionDef> = Vec::new();
        let mut seen_ids: HashSet<String> = RESERVED_IDS.iter().map(|id| id.to_string()).collect();
        // Paragraph being accumulated from consecutive text lines.
        let mut para = String::new();

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.starts_with("//") {
                continue;
            }
            if line.is_empty() {
                flush_paragraph(&mut para, &mut sections, &mut hero_body);
                continue;
            }

            if let Some(rest) = line.strip_prefix("! ") {
                brand = rest.trim().to_string();
                continue;
            }

            if let Some(rest) = line.strip_prefix("## ") {
                flush_paragraph(&mut para, &mut sections, &mut hero_body);
                if title.is_none() {
                    return Err(PageError::ContentBeforeHero { line: line_no });
                }
                let (id, label) = parse_section_header(rest).ok_or_else(|| {
                    PageError::MalformedSection {
                        line: line_no,
                        text: line.to_string(),
                    }
                })?;
                if !seen_ids.insert(id.clone()) {
                    return Err(PageError::DuplicateSection { line: line_no, id });
                }
                sections.push(SectionDef {
                    id,
                    label,
                    blocks: Vec::new(),
                });
                continue;
            }

            if let Some(rest) = line.strip_prefix("# ") {
                if title.is_some() {
                    return Err(PageError::DuplicateHeroTitle { line: line_no });
                }
                title = Some(rest.trim().to_string());
                continue;
            }

            if title.is_none() {
                return Err(PageError::ContentBeforeHero { line: line_no });
            }

            if let Some(card) = line.strip_prefix("* ") {
                flush_paragraph(&mut para, &mut sections, &mut hero_body);
                match sections.last_mut() {
                    Some(section) => section.blocks.push(Block::Card(card.trim().to_string())),
                    // Hero has no cards; keep the text as copy.
                    None => hero_body.push(card.trim().to_string()),
                }
                continue;
            }

            if !para.is_empty() {
                para.push(' ');
            }
            para.push_str(line);
        }
        flush_paragraph(&mut para, &mut sections, &mut hero_body);

        let title = title.ok_or(PageError::MissingHeroTitle)?;
        Ok(Self {
            brand,
            hero: Hero {
                title,
                body: hero_body,
            },
            sections,
        })
    }
}

fn flush_paragraph(para: &mut String, sections: &mut [SectionDef], hero_body: &mut Vec<String>) {
    if para.is_empty() {
        return;
    }
    let text = std::mem::take(para);
    match sections.last_mut() {
        Some(section) => section.blocks.push(Block::Paragraph(text)),
        None => hero_body.push(text),
    }
}

/// `"about | About us"` → `("about", "About us")`.  A missing label falls
/// back to the id.
fn parse_section_header(rest: &str) -> Option<(String, String)> {
    let (id, label) = match rest.split_once('|') {
        Some((id, label)) => (id.trim(), label.trim()),
        None => (rest.trim(), ""),
    };
    let valid_id = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_id {
        return None;
    }
    let label = if label.is_empty() { id } else { label };
    Some((id.to_string(), label.to_string()))
}
