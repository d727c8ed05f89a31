//! Behavioral profiles shared by many agents, and their registry.

use rwca_core::{AgentTypeId, WorldError, WorldResult};

use crate::store::Map;

/// Name under which [`AgentType::default`] is registered in every new world.
pub const DEFAULT_AGENT_TYPE_NAME: &str = "Default AgentType";

/// Immutable behavioral profile: body radius, look-ahead horizons, neighbor
/// search bounds, and speed cap.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentType {
    /// Assigned by [`AgentTypeRegistry::add`]; any value set by the caller is
    /// overwritten.
    pub id: AgentTypeId,
    pub name: String,
    /// Body radius.  Also the goal tolerance: an agent within `radius` of its
    /// goal has reached it.
    pub radius: f64,
    pub time_horizon_agent: f64,
    pub time_horizon_obstacle: f64,
    pub time_horizon_wall: f64,
    /// Soft cap on each neighbor list, enforced by the neighbor search.
    pub max_neighbors: usize,
    /// Neighbor search radius.
    pub neighbor_dist: f64,
    pub max_speed: f64,
}

impl AgentType {
    /// The default walker profile under a different name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for AgentType {
    /// A pedestrian-scale walker.
    fn default() -> Self {
        Self {
            id: AgentTypeId::INVALID,
            name: DEFAULT_AGENT_TYPE_NAME.to_owned(),
            radius: 1.0,
            time_horizon_agent: 5.0,
            time_horizon_obstacle: 5.0,
            time_horizon_wall: 10.0,
            max_neighbors: 100,
            neighbor_dist: 10.0,
            max_speed: 5.0,
        }
    }
}

// ── AgentTypeRegistry ─────────────────────────────────────────────────────────

/// Catalog of [`AgentType`]s keyed by [`AgentTypeId`], with a secondary name
/// index.
///
/// Ids are sequential (the registry's size at insertion time) and profiles
/// are never removed, so an `AgentTypeId` held by an agent stays valid for
/// the lifetime of the world.  The name index is last-write-wins: adding a
/// second profile under an existing name repoints the name, while the older
/// profile stays reachable by id.
#[derive(Clone, Debug, Default)]
pub struct AgentTypeRegistry {
    types:   Vec<AgentType>,
    by_name: Map<String, AgentTypeId>,
}

impl AgentTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding only [`AgentType::default`] as id 0.
    pub fn with_default() -> Self {
        let default = AgentType {
            id: AgentTypeId(0),
            ..AgentType::default()
        };
        let mut by_name = Map::default();
        by_name.insert(default.name.clone(), default.id);
        Self {
            types: vec![default],
            by_name,
        }
    }

    /// Register `agent_type` and return its freshly assigned id.
    pub fn add(&mut self, mut agent_type: AgentType) -> WorldResult<AgentTypeId> {
        let id = AgentTypeId::try_from(self.types.len())
            .ok()
            .filter(|&id| id != AgentTypeId::INVALID)
            .ok_or(WorldError::IdSpaceExhausted("agent type"))?;
        agent_type.id = id;
        if let Some(shadowed) = self.by_name.insert(agent_type.name.clone(), id) {
            tracing::debug!(name = %agent_type.name, %shadowed, %id, "agent type name rebound");
        }
        self.types.push(agent_type);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: AgentTypeId) -> Option<&AgentType> {
        self.types.get(id.index())
    }

    /// The profile most recently registered under `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&AgentType> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    pub fn id_of(&self, name: &str) -> Option<AgentTypeId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, id: AgentTypeId) -> bool {
        id.index() < self.types.len()
    }

    /// All profiles in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentType> + '_ {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
