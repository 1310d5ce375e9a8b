//! Output rows and the positional row builder
//!
//! Every output row is a fixed sequence of 9-cell groups, one per
//! publisher column followed by one per gallery column:
//!
//! | offset | cell |
//! |---|---|
//! | 1 | date |
//! | 2 | content type |
//! | 3 | URL |
//! | 4..=9 | score, CLS, LCP, speed index, TBT, FCP |

mod builder;
mod window;

use std::fmt;

pub use builder::{build_rows, RowBatch, RowPlan};
pub use window::DedupWindow;

/// Cells per group
pub const GROUP_WIDTH: usize = 9;

/// Metric cells at the end of each group
pub const METRIC_COUNT: usize = 6;

/// 1-based offset of the first metric cell (the score) within a group
pub const SCORE_OFFSET: usize = 4;

/// Content category of a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Article,
    Video,
    Gallery,
}

impl ContentType {
    /// Passes the row builder makes, in order
    pub const PASSES: [ContentType; 2] = [ContentType::Article, ContentType::Video];

    /// Label written to the content-type cell
    pub fn label(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Video => "video",
            Self::Gallery => "gallery",
        }
    }

    /// Parses a content-type cell
    ///
    /// Accepts the current labels and the older `nota` / `img` spellings,
    /// ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "article" | "nota" => Some(Self::Article),
            "video" => Some(Self::Video),
            "gallery" | "img" => Some(Self::Gallery),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One 9-cell group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Group {
    Blank,
    Filled {
        date: String,
        content_type: ContentType,
        url: String,
    },
}

impl Group {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Blank => None,
            Self::Filled { url, .. } => Some(url),
        }
    }

    /// The group's cells, metrics left empty
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![String::new(); GROUP_WIDTH];
        if let Self::Filled {
            date,
            content_type,
            url,
        } = self
        {
            cells[0] = date.clone();
            cells[1] = content_type.label().to_string();
            cells[2] = url.clone();
        }
        cells
    }
}

/// A full output row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    groups: Vec<Group>,
}

impl Row {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// True when no group carries a URL
    pub fn is_blank(&self) -> bool {
        self.groups.iter().all(Group::is_blank)
    }

    /// URLs of the filled groups, left to right
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().filter_map(Group::url)
    }

    /// Flattened cells, `GROUP_WIDTH` per group
    pub fn cells(&self) -> Vec<String> {
        self.groups.iter().flat_map(Group::cells).collect()
    }
}
