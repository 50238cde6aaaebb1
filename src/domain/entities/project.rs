//! Upstream project identities and the ordered registry of configured projects.

use std::fmt;

use crate::domain::errors::RegistryError;

/// Separator between project slugs in the configuration string.
pub const PROJECT_SEPARATOR: char = ';';

/// Identity of one upstream CI project: `(owner, project slug)`.
///
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId {
    owner: String,
    slug: String,
}

impl ProjectId {
    pub fn new(owner: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            slug: slug.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.slug)
    }
}

/// Ordered list of configured projects for a single owner.
///
/// Built once at startup and shared read-only. Registry order drives both
/// the refresh fan-out and the first-match rule of [`Self::match_slug`].
/// Always holds at least one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRegistry {
    owner: String,
    projects: Vec<String>,
}

impl ProjectRegistry {
    /// Creates a registry from an owner and an ordered list of project slugs.
    ///
    /// Blank slugs are dropped and surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::EmptyOwner`] if `owner` is blank
    /// - [`RegistryError::NoProjects`] if no project slug remains
    pub fn new<I, S>(owner: impl Into<String>, projects: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let owner = owner.into().trim().to_string();
        if owner.is_empty() {
            return Err(RegistryError::EmptyOwner);
        }

        let projects: Vec<String> = projects
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if projects.is_empty() {
            return Err(RegistryError::NoProjects);
        }

        Ok(Self { owner, projects })
    }

    /// Parses a `;`-separated project list, e.g. `"coredns-custom-build;v2ray-build"`.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn parse(owner: impl Into<String>, raw_projects: &str) -> Result<Self, RegistryError> {
        Self::new(owner, raw_projects.split(PROJECT_SEPARATOR))
    }

    /// The display identity shared by every configured project.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Project slugs in registry order.
    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    /// Project identities in registry order.
    pub fn ids(&self) -> impl Iterator<Item = ProjectId> + '_ {
        self.projects
            .iter()
            .map(|slug| ProjectId::new(self.owner.clone(), slug.clone()))
    }

    /// Picks the project a slug token belongs to.
    ///
    /// Returns the first project (registry order) whose slug starts with
    /// `token`, or the first registered project when nothing matches.
    pub fn match_slug(&self, token: &str) -> &str {
        self.projects
            .iter()
            .find(|p| p.starts_with(token))
            .or_else(|| self.projects.first())
            .map_or("", String::as_str)
    }
}
