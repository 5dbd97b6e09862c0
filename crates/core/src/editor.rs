//! # Content Editing
//!
//! Structured edits for the site content documents. Documents are treated as
//! values: every edit consumes a document and returns the updated one, so a
//! failed edit never leaves a half-modified document behind. List edits
//! address items by index, mirroring the add/remove/update controls of the
//! admin form.
//!
//! Edits deserialize from JSON, for example:
//!
//! ```json
//! { "target": "stats", "edit": { "op": "add", "value": { "value": "10+", "label": "Years" } } }
//! { "target": "achievements", "edit": { "index": 0, "edit": { "op": "remove", "index": 2 } } }
//! { "target": "field", "edit": { "field": "title", "value": "Hello" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    errors::{FolioError, FolioResult},
    models::content::{
        ContactContent, Education, Experience, HomeContent, ResumeContent, Skill, SocialLink, Stat,
    },
};

/// Add, replace or remove one element of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListEdit<T> {
    Add { value: T },
    Update { index: usize, value: T },
    Remove { index: usize },
}

impl<T> ListEdit<T> {
    pub fn apply(self, mut items: Vec<T>) -> FolioResult<Vec<T>> {
        match self {
            ListEdit::Add { value } => items.push(value),
            ListEdit::Update { index, value } => {
                let len = items.len();
                let slot = items.get_mut(index).ok_or_else(|| out_of_range(index, len))?;
                *slot = value;
            }
            ListEdit::Remove { index } => {
                if index >= items.len() {
                    return Err(out_of_range(index, items.len()));
                }
                items.remove(index);
            }
        }
        Ok(items)
    }
}

/// A list edit applied to the list held by the `index`-th element of an outer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedEdit<T> {
    pub index: usize,
    pub edit: ListEdit<T>,
}

/// Replaces a scalar text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEdit<F> {
    pub field: F,
    pub value: String,
}

fn out_of_range(index: usize, len: usize) -> FolioError {
    FolioError::Validation(format!("Index {} is out of range for a list of {} items", index, len))
}

/// A content document that can be changed through typed edit operations.
pub trait Editable: Sized {
    type Edit;

    fn apply(self, edit: Self::Edit) -> FolioResult<Self>;

    /// Applies edits in order; the first failure discards the whole batch.
    fn apply_all<I>(self, edits: I) -> FolioResult<Self>
    where
        I: IntoIterator<Item = Self::Edit>,
    {
        edits.into_iter().try_fold(self, Self::apply)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HomeField {
    Title,
    Subtitle,
    Description,
    CtaPrimary,
    CtaSecondary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", content = "edit", rename_all = "snake_case")]
pub enum HomeEdit {
    Field(FieldEdit<HomeField>),
    Stats(ListEdit<Stat>),
    SocialLinks(ListEdit<SocialLink>),
}

impl Editable for HomeContent {
    type Edit = HomeEdit;

    fn apply(self, edit: HomeEdit) -> FolioResult<Self> {
        Ok(match edit {
            HomeEdit::Field(FieldEdit { field, value }) => match field {
                HomeField::Title => Self { title: value, ..self },
                HomeField::Subtitle => Self { subtitle: value, ..self },
                HomeField::Description => Self { description: value, ..self },
                HomeField::CtaPrimary => Self { cta_primary: value, ..self },
                HomeField::CtaSecondary => Self { cta_secondary: value, ..self },
            },
            HomeEdit::Stats(edit) => {
                let stats = edit.apply(self.stats)?;
                Self { stats, ..self }
            }
            HomeEdit::SocialLinks(edit) => {
                let social_links = edit.apply(self.social_links)?;
                Self { social_links, ..self }
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaseStudyField {
    Role,
    Company,
    Period,
    Location,
    Summary,
    Problem,
    Solution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", content = "edit", rename_all = "snake_case")]
pub enum ResumeEdit {
    Summary(String),
    Experience(ListEdit<Experience>),
    Achievements(NestedEdit<String>),
    Education(ListEdit<Education>),
    TechnicalSkills(ListEdit<Skill>),
    ProfessionalSkills(ListEdit<Skill>),
    Certifications(ListEdit<String>),
    CaseStudyField(FieldEdit<CaseStudyField>),
    CaseStudyResults(ListEdit<String>),
    CaseStudySkills(ListEdit<String>),
}

impl Editable for ResumeContent {
    type Edit = ResumeEdit;

    fn apply(self, edit: ResumeEdit) -> FolioResult<Self> {
        let mut resume = self;
        match edit {
            ResumeEdit::Summary(summary) => resume.summary = summary,
            ResumeEdit::Experience(edit) => resume.experience = edit.apply(resume.experience)?,
            ResumeEdit::Achievements(NestedEdit { index, edit }) => {
                let len = resume.experience.len();
                let entry = resume
                    .experience
                    .get_mut(index)
                    .ok_or_else(|| out_of_range(index, len))?;
                entry.achievements = edit.apply(std::mem::take(&mut entry.achievements))?;
            }
            ResumeEdit::Education(edit) => resume.education = edit.apply(resume.education)?,
            ResumeEdit::TechnicalSkills(edit) => {
                resume.skills.technical = edit.apply(resume.skills.technical)?
            }
            ResumeEdit::ProfessionalSkills(edit) => {
                resume.skills.professional = edit.apply(resume.skills.professional)?
            }
            ResumeEdit::Certifications(edit) => {
                resume.certifications = edit.apply(resume.certifications)?
            }
            ResumeEdit::CaseStudyField(FieldEdit { field, value }) => {
                let case_study = &mut resume.case_study;
                match field {
                    CaseStudyField::Role => case_study.role = value,
                    CaseStudyField::Company => case_study.company = value,
                    CaseStudyField::Period => case_study.period = value,
                    CaseStudyField::Location => case_study.location = value,
                    CaseStudyField::Summary => case_study.summary = value,
                    CaseStudyField::Problem => case_study.problem = value,
                    CaseStudyField::Solution => case_study.solution = value,
                }
            }
            ResumeEdit::CaseStudyResults(edit) => {
                resume.case_study.results = edit.apply(resume.case_study.results)?
            }
            ResumeEdit::CaseStudySkills(edit) => {
                resume.case_study.skills = edit.apply(resume.case_study.skills)?
            }
        }
        Ok(resume)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactField {
    Email,
    Phone,
    Location,
    MapEmbedUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", content = "edit", rename_all = "snake_case")]
pub enum ContactEdit {
    Field(FieldEdit<ContactField>),
}

impl Editable for ContactContent {
    type Edit = ContactEdit;

    fn apply(self, edit: ContactEdit) -> FolioResult<Self> {
        let ContactEdit::Field(FieldEdit { field, value }) = edit;
        Ok(match field {
            ContactField::Email => Self { email: value, ..self },
            ContactField::Phone => Self { phone: value, ..self },
            ContactField::Location => Self { location: value, ..self },
            ContactField::MapEmbedUrl => Self { map_embed_url: value, ..self },
        })
    }
}
