//! Notebook records: notes, research, bookmarks, drawings and reading progress.
//!
//! Field names serialize in camelCase, matching the backup file format.

use serde::{Deserialize, Serialize};

/// Current time as Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A free-text note attached to a verse. `id` is the verse reference (`gen:1:1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A saved AI question and answer about a verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Research {
    pub id: String,
    pub verse_id: String,
    pub question: String,
    pub answer: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub verse_id: String,
    pub created_at: i64,
}

/// Last chapter viewed in a book. One record per book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingProgress {
    pub book_id: String,
    pub chapter: u32,
    pub timestamp: i64,
}

/// Freehand annotations for a chapter. `id` is the chapter key (`gen:1`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: String,
    pub strokes: Vec<Stroke>,
}

impl Drawing {
    /// Every coordinate, pressure and width must be finite; JSON has no NaN or infinity.
    pub fn check(&self) -> Result<(), String> {
        for (i, stroke) in self.strokes.iter().enumerate() {
            if !stroke.width.is_finite() {
                return Err(format!("stroke {i}: width must be finite"));
            }
            for point in &stroke.points {
                let finite = point.x.is_finite() && point.y.is_finite() && point.pressure.is_none_or(f64::is_finite);
                if !finite {
                    return Err(format!("stroke {i}: point coordinates must be finite"));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: String,
    pub width: f64,
    pub tool: Tool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Pen,
    Marker,
    Highlighter,
    Eraser,
}
