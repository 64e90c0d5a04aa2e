// Cohort selection: which documents belong together.
//
// CohortFilter is a conjunction of optional metadata constraints; an unset
// field is a wildcard. GroupBy names the metadata field that partitions a
// collection, and CohortKey is the value of that field for one partition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentMetadata, DocumentRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortFilter {
    pub group: Option<u32>,
    pub course: Option<u8>,
    pub faculty: Option<String>,
    pub department: Option<String>,
    pub author: Option<String>,
}

impl CohortFilter {
    pub fn group(group: u32) -> Self {
        Self {
            group: Some(group),
            ..Default::default()
        }
    }

    pub fn author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Default::default()
        }
    }

    /// True when every set constraint equals the document's value. A document
    /// lacking a constrained field never matches.
    pub fn matches(&self, metadata: &DocumentMetadata) -> bool {
        fn check<T: PartialEq>(want: &Option<T>, have: &Option<T>) -> bool {
            match want {
                None => true,
                Some(w) => have.as_ref() == Some(w),
            }
        }

        check(&self.group, &metadata.group)
            && check(&self.course, &metadata.course)
            && check(&self.faculty, &metadata.faculty)
            && check(&self.department, &metadata.department)
            && self.author.as_ref().map_or(true, |a| *a == metadata.author)
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for CohortFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            return write!(f, "all documents");
        }
        let mut parts = Vec::new();
        if let Some(g) = self.group {
            parts.push(format!("group={g}"));
        }
        if let Some(c) = self.course {
            parts.push(format!("course={c}"));
        }
        if let Some(fac) = &self.faculty {
            parts.push(format!("faculty={fac}"));
        }
        if let Some(d) = &self.department {
            parts.push(format!("department={d}"));
        }
        if let Some(a) = &self.author {
            parts.push(format!("author={a}"));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Metadata field used to partition a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Author,
    Group,
    Course,
    Faculty,
    Department,
}

impl GroupBy {
    /// The partition key for `record`, or None if it lacks the field.
    pub fn key_of(&self, record: &DocumentRecord) -> Option<CohortKey> {
        let m = &record.metadata;
        match self {
            GroupBy::Author => Some(CohortKey::Author(m.author.clone())),
            GroupBy::Group => m.group.map(CohortKey::Group),
            GroupBy::Course => m.course.map(CohortKey::Course),
            GroupBy::Faculty => m.faculty.clone().map(CohortKey::Faculty),
            GroupBy::Department => m.department.clone().map(CohortKey::Department),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Author => "author",
            GroupBy::Group => "group",
            GroupBy::Course => "course",
            GroupBy::Faculty => "faculty",
            GroupBy::Department => "department",
        }
    }
}

impl FromStr for GroupBy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "author" => Ok(GroupBy::Author),
            "group" => Ok(GroupBy::Group),
            "course" => Ok(GroupBy::Course),
            "faculty" => Ok(GroupBy::Faculty),
            "department" => Ok(GroupBy::Department),
            other => anyhow::bail!(
                "Unknown grouping '{other}' (expected author, group, course, faculty or department)"
            ),
        }
    }
}

/// Value of the grouping field for one partition.
///
/// All keys produced by one GroupBy share a variant, so ordering is by the
/// field's natural order (numeric for group and course).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CohortKey {
    Author(String),
    Group(u32),
    Course(u8),
    Faculty(String),
    Department(String),
}

impl fmt::Display for CohortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CohortKey::Author(a) => write!(f, "{a}"),
            CohortKey::Group(g) => write!(f, "{g}"),
            CohortKey::Course(c) => write!(f, "{c}"),
            CohortKey::Faculty(fac) => write!(f, "{fac}"),
            CohortKey::Department(d) => write!(f, "{d}"),
        }
    }
}
