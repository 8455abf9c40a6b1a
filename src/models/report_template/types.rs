use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Page orientation for a report template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub const OPTIONS: [(&'static str, &'static str); 2] =
        [("portrait", "Portrait"), ("landscape", "Landscape")];

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
            Orientation::Landscape => "Landscape",
        }
    }
}

/// Paper size for a report template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    pub const OPTIONS: [(&'static str, &'static str); 2] = [("a4", "A4"), ("letter", "US Letter")];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageSize::A4 => "a4",
            PageSize::Letter => "letter",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "US Letter",
        }
    }
}

/// The three independently ordered section partitions of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SectionType {
    Header,
    Body,
    Footer,
}

impl SectionType {
    pub const ALL: [SectionType; 3] = [SectionType::Header, SectionType::Body, SectionType::Footer];

    pub const OPTIONS: [(&'static str, &'static str); 3] =
        [("header", "Header"), ("body", "Body"), ("footer", "Footer")];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Header => "header",
            SectionType::Body => "body",
            SectionType::Footer => "footer",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionType::Header => "Header",
            SectionType::Body => "Body",
            SectionType::Footer => "Footer",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(SectionType::Header),
            "body" => Ok(SectionType::Body),
            "footer" => Ok(SectionType::Footer),
            _ => Err(()),
        }
    }
}

/// A report-layout definition with page setup metadata.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportTemplate {
    pub id: i64,
    pub name: String,
    pub context: String,
    pub orientation: Orientation,
    pub page_size: PageSize,
    pub margin_x: f64,
    pub margin_y: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Row shape for the template list page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateListItem {
    pub id: i64,
    pub name: String,
    pub context: String,
    pub orientation: Orientation,
    pub page_size: PageSize,
    pub section_count: i64,
}

/// A named, ordered content block within one template partition.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateSection {
    pub id: i64,
    pub template_id: i64,
    pub section_type: SectionType,
    pub name: String,
    pub sequence_number: i64,
}

/// A reusable section definition offered when adding sections.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PrototypeSection {
    pub id: i64,
    pub name: String,
    pub section_type: SectionType,
    pub description: String,
}

/// Fields accepted by the template edit form. Context is read-only and
/// deliberately absent.
#[derive(Debug, Clone)]
pub struct TemplateUpdate {
    pub name: String,
    pub orientation: Orientation,
    pub page_size: PageSize,
    pub margin_x: f64,
    pub margin_y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_type_round_trips_through_str() {
        for st in SectionType::ALL {
            assert_eq!(st.as_str().parse::<SectionType>(), Ok(st));
        }
        assert!("sidebar".parse::<SectionType>().is_err());
    }

    #[test]
    fn enum_labels_match_options() {
        assert_eq!(Orientation::Portrait.label(), "Portrait");
        assert_eq!(PageSize::Letter.label(), "US Letter");
        assert_eq!(SectionType::Body.title(), "Body");
    }
}
