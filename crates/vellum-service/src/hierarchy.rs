//! Materialises the community/collection tree for listings and scoping.
//!
//! Every call builds its own [`HierarchyIndex`]; nothing is cached between
//! requests. The store is not trusted to be acyclic: a community reached
//! again while it is still being expanded fails with `StructuralCycle`.

use std::collections::{HashMap, HashSet};

use vellum_db::model::container::{Collection, Community};
use vellum_db::store::RepositoryStore;

use crate::error::{ServiceError, ServiceResult};

/// Depth-first view of part of the container hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyIndex {
    roots: Vec<uuid::Uuid>,
    order: Vec<uuid::Uuid>,
    children_of: HashMap<uuid::Uuid, Vec<uuid::Uuid>>,
    collections_of: HashMap<uuid::Uuid, Vec<uuid::Uuid>>,
    communities: HashMap<uuid::Uuid, Community>,
    collections: HashMap<uuid::Uuid, Collection>,
}

impl HierarchyIndex {
    #[must_use]
    pub fn roots(&self) -> &[uuid::Uuid] {
        &self.roots
    }

    /// Communities in depth-first pre-order.
    #[must_use]
    pub fn visit_order(&self) -> &[uuid::Uuid] {
        &self.order
    }

    #[must_use]
    pub fn children_of(&self, id: uuid::Uuid) -> &[uuid::Uuid] {
        self.children_of.get(&id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn collections_of(&self, id: uuid::Uuid) -> &[uuid::Uuid] {
        self.collections_of.get(&id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn community(&self, id: uuid::Uuid) -> Option<&Community> {
        self.communities.get(&id)
    }

    #[must_use]
    pub fn collection(&self, id: uuid::Uuid) -> Option<&Collection> {
        self.collections.get(&id)
    }

    /// Every expanded community id; equal to the key set of both child maps.
    pub fn community_ids(&self) -> impl Iterator<Item = uuid::Uuid> + '_ {
        self.order.iter().copied()
    }

    /// ## Summary
    /// All reachable collections in traversal order, each listed once.
    #[must_use]
    pub fn collection_ids(&self) -> Vec<uuid::Uuid> {
        let mut seen = HashSet::new();
        self.order
            .iter()
            .flat_map(|id| self.collections_of(*id))
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

enum Frame {
    Enter(Community),
    Exit(uuid::Uuid),
}

pub struct HierarchyBuilder<'a> {
    store: &'a dyn RepositoryStore,
}

impl<'a> HierarchyBuilder<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn RepositoryStore) -> Self {
        Self { store }
    }

    /// ## Summary
    /// Builds the index below every top-level community.
    ///
    /// ## Errors
    /// `StructuralCycle` if a community is its own descendant, or a collaborator error.
    #[tracing::instrument(skip(self))]
    pub async fn build_all(&self) -> ServiceResult<HierarchyIndex> {
        let roots = self.store.top_communities().await?;
        self.build(roots).await
    }

    /// ## Summary
    /// Builds the index for the sub-tree rooted at one community.
    ///
    /// ## Errors
    /// `NotFound` if the community does not exist, `StructuralCycle`, or a
    /// collaborator error.
    #[tracing::instrument(skip(self))]
    pub async fn build_from(&self, community_id: uuid::Uuid) -> ServiceResult<HierarchyIndex> {
        let root = self
            .store
            .community(community_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("community {community_id}")))?;
        self.build(vec![root]).await
    }

    /// ## Summary
    /// Depth-first pre-order traversal from `roots`, in the given order.
    ///
    /// A community reachable through two parents is expanded once.
    ///
    /// ## Errors
    /// `StructuralCycle` on re-entering a community that is still being
    /// expanded, or a collaborator error from the store.
    pub async fn build(&self, roots: Vec<Community>) -> ServiceResult<HierarchyIndex> {
        let mut index = HierarchyIndex::default();
        let mut visiting: HashSet<uuid::Uuid> = HashSet::new();
        let mut stack: Vec<Frame> = Vec::new();

        for root in roots.into_iter().rev() {
            stack.push(Frame::Enter(root));
        }

        while let Some(frame) = stack.pop() {
            let community = match frame {
                Frame::Exit(id) => {
                    visiting.remove(&id);
                    continue;
                }
                Frame::Enter(community) => community,
            };
            let id = community.id;

            if visiting.contains(&id) {
                tracing::error!(community_id = %id, "Community hierarchy contains a cycle");
                return Err(ServiceError::StructuralCycle { id });
            }
            if index.communities.contains_key(&id) {
                tracing::trace!(community_id = %id, "Community already expanded");
                continue;
            }

            let children = self.store.community_children(id).await?;

            if visiting.is_empty() {
                index.roots.push(id);
            }
            visiting.insert(id);
            index.order.push(id);
            index.communities.insert(id, community);
            index.children_of.insert(
                id,
                children.sub_communities.iter().map(|c| c.id).collect(),
            );
            index
                .collections_of
                .insert(id, children.collections.iter().map(|c| c.id).collect());
            for collection in children.collections {
                index.collections.entry(collection.id).or_insert(collection);
            }

            stack.push(Frame::Exit(id));
            for child in children.sub_communities.into_iter().rev() {
                stack.push(Frame::Enter(child));
            }
        }

        tracing::debug!(
            roots = index.roots.len(),
            communities = index.order.len(),
            collections = index.collections.len(),
            "Hierarchy built"
        );
        Ok(index)
    }
}
