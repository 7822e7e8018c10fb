//! Who an actor acts as when a policy is evaluated.
//!
//! An authenticated e-person acts as itself, each of its groups,
//! `authenticated` and `all`. Anonymous requests act as `unauthenticated`
//! and `all`. Access is granted if any of them is allowed.

use super::depot::AuthenticatedUser;

/// The `sub` of a Casbin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    /// An e-person or group.
    Principal(uuid::Uuid),
    Unauthenticated,
    Authenticated,
    All,
}

impl Subject {
    #[must_use]
    pub fn casbin_subject(self) -> String {
        match self {
            Self::Principal(id) => format!("principal:{id}"),
            Self::Unauthenticated => "unauthenticated".to_string(),
            Self::Authenticated => "authenticated".to_string(),
            Self::All => "all".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedSubjects(Vec<Subject>);

impl ExpandedSubjects {
    #[must_use]
    pub fn new(eperson_id: uuid::Uuid, group_ids: impl IntoIterator<Item = uuid::Uuid>) -> Self {
        let subjects = std::iter::once(eperson_id)
            .chain(group_ids)
            .map(Subject::Principal)
            .chain([Subject::Authenticated, Subject::All])
            .collect();
        Self(subjects)
    }

    #[must_use]
    pub fn unauthenticated_only() -> Self {
        Self(vec![Subject::Unauthenticated, Subject::All])
    }

    #[must_use]
    pub fn from_user(user: &AuthenticatedUser) -> Self {
        Self::new(user.id, user.group_ids.iter().copied())
    }

    #[must_use]
    pub fn contains(&self, subject: &Subject) -> bool {
        self.0.contains(subject)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Subject] {
        &self.0
    }
}
