//! Site content documents.
//!
//! Each page of the site reads one JSON document from the content store. Field
//! names are camelCase on the wire and every field is optional on input so
//! partially filled documents still load.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::FolioError;

/// Key under which a document is kept in the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKey {
    Home,
    Resume,
    Contact,
}

impl ContentKey {
    pub const ALL: [ContentKey; 3] = [ContentKey::Home, ContentKey::Resume, ContentKey::Contact];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKey::Home => "home",
            ContentKey::Resume => "resume",
            ContentKey::Contact => "contact",
        }
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKey {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(ContentKey::Home),
            "resume" => Ok(ContentKey::Resume),
            "contact" => Ok(ContentKey::Contact),
            other => Err(FolioError::NotFound(format!(
                "Content document '{}' does not exist",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta_primary: String,
    pub cta_secondary: String,
    pub stats: Vec<Stat>,
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub icon: SocialIcon,
    pub url: String,
}

/// Icon shown next to a social link. `Unset` is stored as an empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialIcon {
    #[default]
    #[serde(rename = "")]
    Unset,
    Linkedin,
    Twitter,
    Facebook,
    Instagram,
    Github,
    Website,
    Email,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeContent {
    pub summary: String,
    pub experience: Vec<Experience>,
    pub case_study: CaseStudy,
    pub education: Vec<Education>,
    pub skills: Skills,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub period: String,
    pub location: String,
    pub description: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseStudy {
    pub role: String,
    pub company: String,
    pub period: String,
    pub location: String,
    pub summary: String,
    pub problem: String,
    pub solution: String,
    pub results: Vec<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<Skill>,
    pub professional: Vec<Skill>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub name: String,
    /// Proficiency as entered in the admin form, usually a percentage.
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactContent {
    pub email: String,
    pub phone: String,
    pub location: String,
    pub map_embed_url: String,
}
