//! Resource paths for authorization.
//!
//! Every addressable object maps to a path such as `/items/{uuid}`; policies
//! match these paths with globs.

use vellum_core::types::DsoType;

/// Path of a repository object as seen by the policy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    dso_type: DsoType,
    id: Option<uuid::Uuid>,
}

impl ResourcePath {
    #[must_use]
    pub const fn site() -> Self {
        Self {
            dso_type: DsoType::Site,
            id: None,
        }
    }

    #[must_use]
    pub const fn community(id: uuid::Uuid) -> Self {
        Self::of(DsoType::Community, id)
    }

    #[must_use]
    pub const fn collection(id: uuid::Uuid) -> Self {
        Self::of(DsoType::Collection, id)
    }

    #[must_use]
    pub const fn item(id: uuid::Uuid) -> Self {
        Self::of(DsoType::Item, id)
    }

    #[must_use]
    pub const fn bitstream(id: uuid::Uuid) -> Self {
        Self::of(DsoType::Bitstream, id)
    }

    const fn of(dso_type: DsoType, id: uuid::Uuid) -> Self {
        Self {
            dso_type,
            id: Some(id),
        }
    }

    #[must_use]
    pub const fn dso_type(&self) -> DsoType {
        self.dso_type
    }

    /// ## Summary
    /// Renders the path used in Casbin requests, e.g. `/bitstreams/{uuid}`.
    #[must_use]
    pub fn to_resource_path(&self) -> String {
        match self.id {
            Some(id) => format!("/{}/{id}", self.dso_type.path_segment()),
            None => format!("/{}", self.dso_type.path_segment()),
        }
    }
}

impl std::fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_resource_path())
    }
}
