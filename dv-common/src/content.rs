//! Pages and the portfolio catalogue
//!
//! Copy text lives in the site shell; this module only holds the page list
//! and the video URLs, which go through the resolver before rendering.

use serde::{Deserialize, Serialize};

use crate::video::{self, EmbedDescriptor};

/// The four site pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Home,
    About,
    Experience,
    Contact,
}

impl Page {
    /// Parse a page slug; anything unknown lands on the home page
    pub fn from_slug(slug: &str) -> Self {
        match slug.trim().trim_matches('/').to_lowercase().as_str() {
            "about" => Page::About,
            "experience" | "work" => Page::Experience,
            "contact" => Page::Contact,
            _ => Page::Home,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::About => "about",
            Page::Experience => "experience",
            Page::Contact => "contact",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About",
            Page::Experience => "My Work",
            Page::Contact => "Contact",
        }
    }

    pub fn all() -> &'static [Page] {
        &[Page::Home, Page::About, Page::Experience, Page::Contact]
    }
}

/// Portfolio grouping on the experience page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkCategory {
    Shortform,
    Longform,
    Highlights,
}

impl WorkCategory {
    pub fn all() -> &'static [WorkCategory] {
        &[
            WorkCategory::Shortform,
            WorkCategory::Longform,
            WorkCategory::Highlights,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WorkCategory::Shortform => "Shortform",
            WorkCategory::Longform => "Longform",
            WorkCategory::Highlights => "Highlights",
        }
    }
}

/// One catalogue entry; an empty URL means the video is not out yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Work {
    pub title: &'static str,
    pub url: &'static str,
    pub category: WorkCategory,
}

/// Works shown on the home page
pub static FEATURED: &[Work] = &[
    Work {
        title: "iiisAndmaniii Short Form Reel",
        url: "https://www.youtube.com/shorts/s97VTmWW8uU",
        category: WorkCategory::Shortform,
    },
    Work {
        title: "Skiourakic Bingo Challenge",
        url: "https://www.youtube.com/watch?v=oVif9j-DyrQ",
        category: WorkCategory::Longform,
    },
    Work {
        title: "Preview for @/FortniteCompetitive",
        url: "https://youtu.be/4EUAtuRWlPk",
        category: WorkCategory::Highlights,
    },
];

/// Full experience-page catalogue
pub static EXPERIENCE: &[Work] = &[
    Work {
        title: "ThriveEsports - Loadout Video",
        url: "https://www.youtube.com/shorts/hXNxZlzDl7c",
        category: WorkCategory::Shortform,
    },
    Work {
        title: "iiisAndmaniii Short Form Reel",
        url: "https://www.youtube.com/shorts/s97VTmWW8uU",
        category: WorkCategory::Shortform,
    },
    Work {
        title: "Southside Roleplay Ad",
        url: "https://youtube.com/shorts/RQhwNwBKOSM",
        category: WorkCategory::Shortform,
    },
    Work {
        title: "Valify Video - NOT POSTED YET",
        url: "",
        category: WorkCategory::Longform,
    },
    Work {
        title: "Skiourakic Bingo Challenge",
        url: "https://www.youtube.com/watch?v=oVif9j-DyrQ",
        category: WorkCategory::Longform,
    },
    Work {
        title: "Επαιξα 1V1 με τον @McpcmStavros...",
        url: "https://www.youtube.com/watch?v=ceCb8VJQLz8",
        category: WorkCategory::Longform,
    },
    Work {
        title: "FN Preview (Seryx Style)",
        url: "https://youtu.be/4EUAtuRWlPk",
        category: WorkCategory::Highlights,
    },
    Work {
        title: "FN Preview (Old Zerox Style)",
        url: "https://www.youtube.com/watch?v=GmuX2Q4SbyU",
        category: WorkCategory::Highlights,
    },
];

/// A work together with its render descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedWork {
    pub title: String,
    pub category: WorkCategory,
    pub video_id: Option<String>,
    pub embed: EmbedDescriptor,
}

impl ResolvedWork {
    pub fn from_work(work: &Work) -> Self {
        let source = video::resolve(work.url);
        Self {
            title: work.title.to_string(),
            category: work.category,
            video_id: source.id().map(str::to_string),
            embed: video::build(&source, work.title),
        }
    }
}

/// Experience-page section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub category: WorkCategory,
    pub name: &'static str,
    pub works: Vec<ResolvedWork>,
}

/// Every experience section, in display order, with resolved embeds
pub fn resolved_sections() -> Vec<Section> {
    WorkCategory::all()
        .iter()
        .map(|category| Section {
            category: *category,
            name: category.display_name(),
            works: EXPERIENCE
                .iter()
                .filter(|work| work.category == *category)
                .map(ResolvedWork::from_work)
                .collect(),
        })
        .collect()
}

/// Home-page featured works with resolved embeds
pub fn resolved_featured() -> Vec<ResolvedWork> {
    FEATURED.iter().map(ResolvedWork::from_work).collect()
}
