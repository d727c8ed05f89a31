//! Unit tests for rwca-world.

#[cfg(test)]
mod helpers {
    use rwca_core::Vec3;

    pub fn p(x: f64, y: f64) -> Vec3 {
        Vec3::new(x, y, 0.0)
    }

    /// Counter-clockwise unit square.
    pub fn unit_square() -> Vec<Vec3> {
        vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]
    }

    /// Counter-clockwise L with one reflex corner at (1, 1) (index 3).
    pub fn l_shape() -> Vec<Vec3> {
        vec![
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 2.0),
            p(0.0, 2.0),
        ]
    }
}

// ── EntityStore ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use rwca_core::{AgentId, WorldError};

    use crate::EntityStore;

    #[test]
    fn insert_allocates_sequential_ids() {
        let mut store: EntityStore<AgentId, &str> = EntityStore::new();
        assert_eq!(store.insert_with(|_| "a").unwrap(), AgentId(0));
        assert_eq!(store.insert_with(|_| "b").unwrap(), AgentId(1));
        assert_eq!(store.next_id(), AgentId(2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn builder_receives_allocated_id() {
        let mut store: EntityStore<AgentId, AgentId> = EntityStore::new();
        let id = store.insert_with(|id| id).unwrap();
        assert_eq!(store.get(id), Some(&id));
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut store: EntityStore<AgentId, u8> = EntityStore::new();
        let a = store.insert_with(|_| 1).unwrap();
        assert_eq!(store.remove(a), Some(1));
        let b = store.insert_with(|_| 2).unwrap();
        assert_ne!(a, b);
        assert_eq!(b, AgentId(1));
        assert!(store.get(a).is_none());
    }

    #[test]
    fn set_only_replaces_existing() {
        let mut store: EntityStore<AgentId, u8> = EntityStore::new();
        let a = store.insert_with(|_| 1).unwrap();
        assert_eq!(store.set(a, 5), Ok(1));
        assert_eq!(store.get(a), Some(&5));

        assert_eq!(store.set(AgentId(9), 7), Err(7));
        assert!(!store.contains(AgentId(9)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), AgentId(1));
    }

    #[test]
    fn list_ids_sorted_regardless_of_insertion_history() {
        let mut store: EntityStore<AgentId, u32> = EntityStore::new();
        for i in 0..50 {
            store.insert_with(|_| i).unwrap();
        }
        for i in (0..50).step_by(3) {
            store.remove(AgentId(i));
        }
        let ids = store.list_ids();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids.len(), store.len());
        assert!(ids.iter().all(|&id| store.contains(id)));
    }

    #[test]
    fn iter_is_ascending() {
        let mut store: EntityStore<AgentId, u32> = EntityStore::new();
        for i in 0..20 {
            store.insert_with(|_| i * 10).unwrap();
        }
        let pairs: Vec<_> = store.iter().map(|(id, v)| (id.0, *v)).collect();
        assert_eq!(pairs.len(), 20);
        assert!(pairs.iter().all(|&(id, v)| v == id * 10));
        assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn reserve_is_contiguous() {
        let mut store: EntityStore<AgentId, u8> = EntityStore::new();
        store.insert_with(|_| 0).unwrap();
        let first = store.reserve(4).unwrap();
        assert_eq!(first, AgentId(1));
        assert_eq!(store.next_id(), AgentId(5));
        store.insert_reserved(AgentId(3), 3);
        assert_eq!(store.list_ids(), vec![AgentId(0), AgentId(3)]);
    }

    #[test]
    fn exhausted_id_space_is_an_error() {
        let mut store: EntityStore<AgentId, u8> = EntityStore::new();
        store.reserve(u32::MAX - 1).unwrap();
        assert_eq!(store.next_id(), AgentId(u32::MAX - 1));
        assert!(store.insert_with(|_| 0).is_ok());
        assert_eq!(
            store.insert_with(|_| 0),
            Err(WorldError::IdSpaceExhausted("agent"))
        );
    }
}

// ── Agent types ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod agent_types {
    use rwca_core::AgentTypeId;

    use crate::{AgentType, AgentTypeRegistry, DEFAULT_AGENT_TYPE_NAME};

    #[test]
    fn default_profile_values() {
        let t = AgentType::default();
        assert_eq!(t.name, DEFAULT_AGENT_TYPE_NAME);
        assert_eq!(t.radius, 1.0);
        assert_eq!(t.time_horizon_agent, 5.0);
        assert_eq!(t.time_horizon_obstacle, 5.0);
        assert_eq!(t.time_horizon_wall, 10.0);
        assert_eq!(t.max_neighbors, 100);
        assert_eq!(t.neighbor_dist, 10.0);
        assert_eq!(t.max_speed, 5.0);
    }

    #[test]
    fn ids_follow_registry_size() {
        let mut reg = AgentTypeRegistry::new();
        assert_eq!(reg.add(AgentType::named("a")).unwrap(), AgentTypeId(0));
        assert_eq!(reg.add(AgentType::named("b")).unwrap(), AgentTypeId(1));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(AgentTypeId(1)).unwrap().name, "b");
        assert_eq!(reg.get(AgentTypeId(1)).unwrap().id, AgentTypeId(1));
    }

    #[test]
    fn caller_supplied_id_is_overwritten() {
        let mut reg = AgentTypeRegistry::with_default();
        let t = AgentType { id: AgentTypeId(77), ..AgentType::named("x") };
        assert_eq!(reg.add(t).unwrap(), AgentTypeId(1));
        assert!(reg.get(AgentTypeId(77)).is_none());
    }

    #[test]
    fn name_collision_last_write_wins() {
        let mut reg = AgentTypeRegistry::new();
        let first = reg.add(AgentType { radius: 0.5, ..AgentType::named("walker") }).unwrap();
        let second = reg.add(AgentType { radius: 0.8, ..AgentType::named("walker") }).unwrap();
        assert_ne!(first, second);
        assert_eq!(reg.get_by_name("walker").unwrap().radius, 0.8);
        assert_eq!(reg.id_of("walker"), Some(second));
        // The shadowed profile is still reachable by id.
        assert_eq!(reg.get(first).unwrap().radius, 0.5);
    }

    #[test]
    fn with_default_registers_id_zero() {
        let reg = AgentTypeRegistry::with_default();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.id_of(DEFAULT_AGENT_TYPE_NAME), Some(AgentTypeId(0)));
        assert!(reg.contains(AgentTypeId(0)));
        assert!(!reg.contains(AgentTypeId(1)));
    }

    #[test]
    fn unknown_name_is_none() {
        let reg = AgentTypeRegistry::with_default();
        assert!(reg.get_by_name("nobody").is_none());
    }
}

// ── Agent state machine ───────────────────────────────────────────────────────

#[cfg(test)]
mod agent_lifecycle {
    use rwca_core::{AgentId, AgentTypeId, Vec3};

    use crate::{Agent, AgentStatus};

    fn agent_at(position: Vec3, goal: Vec3) -> Agent {
        Agent::new(AgentId(0), AgentTypeId(0), position, Vec3::ZERO, Vec3::ZERO, goal)
    }

    #[test]
    fn new_agent_starts_created_and_still() {
        let a = Agent::empty(AgentId(4));
        assert_eq!(a.id, AgentId(4));
        assert_eq!(a.status, AgentStatus::Created);
        assert_eq!(a.next_velocity, Vec3::ZERO);
        assert!(a.agent_neighbors.is_empty() && a.orca_lines.is_empty());
    }

    #[test]
    fn statuses_are_ordered() {
        assert!(AgentStatus::Created < AgentStatus::Moving);
        assert!(AgentStatus::Moving < AgentStatus::GoalReached);
        assert!(AgentStatus::GoalReached < AgentStatus::ToBeDeleted);
        assert_eq!(AgentStatus::GoalReached.as_u8(), 2);
        assert_eq!(AgentStatus::ToBeDeleted.to_string(), "to_be_deleted");
    }

    #[test]
    fn mark_moving_only_from_created() {
        let mut a = Agent::empty(AgentId(0));
        a.mark_moving();
        assert_eq!(a.status, AgentStatus::Moving);

        a.status = AgentStatus::GoalReached;
        a.mark_moving();
        assert_eq!(a.status, AgentStatus::GoalReached);
    }

    #[test]
    fn goal_at_position_is_reached() {
        let mut a = agent_at(Vec3::ZERO, Vec3::ZERO);
        assert!(a.is_reached_goal(1.0));
        assert_eq!(a.status, AgentStatus::GoalReached);
    }

    #[test]
    fn distant_goal_is_not_reached() {
        let mut a = agent_at(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0));
        assert!(!a.is_reached_goal(1.0));
        assert_eq!(a.status, AgentStatus::Created);

        a.mark_moving();
        assert!(!a.is_reached_goal(1.0));
        assert_eq!(a.status, AgentStatus::Moving);
    }

    #[test]
    fn boundary_distance_counts_as_reached() {
        let mut a = agent_at(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0));
        assert!(a.is_reached_goal(2.0));
        assert_eq!(a.status, AgentStatus::GoalReached);
    }

    #[test]
    fn just_outside_radius_is_not_reached() {
        let mut a = agent_at(Vec3::ZERO, Vec3::new(0.0, 2.0 + 1e-9, 0.0));
        assert!(!a.is_reached_goal(2.0));
    }

    #[test]
    fn reached_is_monotonic() {
        let mut a = agent_at(Vec3::ZERO, Vec3::ZERO);
        assert!(a.is_reached_goal(1.0));
        a.position = Vec3::new(100.0, 0.0, 0.0);
        assert!(a.is_reached_goal(1.0));
        assert_eq!(a.status, AgentStatus::GoalReached);
    }

    #[test]
    fn deleted_agent_counts_as_reached_and_stays_deleted() {
        let mut a = agent_at(Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0));
        a.mark_to_be_deleted();
        assert!(a.is_reached_goal(1.0));
        assert_eq!(a.status, AgentStatus::ToBeDeleted);
    }

    #[test]
    fn clear_solver_scratch_empties_lists() {
        let mut a = Agent::empty(AgentId(0));
        a.agent_neighbors.push(crate::AgentNeighbor { dist_sq: 1.0, agent: AgentId(1) });
        a.orca_lines.push(crate::OrcaLine { point: Vec3::ZERO, direction: Vec3::X });
        a.clear_solver_scratch();
        assert!(a.agent_neighbors.is_empty());
        assert!(a.orca_lines.is_empty());
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod obstacles {
    use rwca_core::{ObstacleId, Vec3};

    use crate::{Obstacle, UNIT_CUBE};

    #[test]
    fn unit_cube_has_eight_corners() {
        let o = Obstacle::unit_cube(ObstacleId(0), Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO);
        assert_eq!(o.shape.len(), 8);
        assert!(o.shape.iter().all(|c| c.abs() == Vec3::splat(0.5)));
        assert_eq!(o.shape, UNIT_CUBE.to_vec());
    }

    #[test]
    fn world_points_are_translated() {
        let o = Obstacle::unit_cube(ObstacleId(0), Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO);
        let xs: Vec<f64> = o.world_points().map(|p| p.x).collect();
        assert!(xs.iter().all(|&x| x == 2.5 || x == 3.5));
    }

    #[test]
    fn bounding_radius() {
        let o = Obstacle::unit_cube(ObstacleId(0), Vec3::ZERO, Vec3::ZERO);
        assert!((o.bounding_radius() - 0.75f64.sqrt()).abs() < 1e-12);
        assert_eq!(Obstacle::empty(ObstacleId(1)).bounding_radius(), 0.0);
    }
}

// ── Wall topology ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod topology {
    use rwca_core::{Vec3, WallId, WallVertexId, WorldError};

    use super::helpers::{l_shape, p, unit_square};
    use crate::build_chain;

    #[test]
    fn square_is_convex_everywhere() {
        let chain = build_chain(WallId(0), WallVertexId(0), &unit_square()).unwrap();
        assert_eq!(chain.len(), 4);
        assert!(chain.iter().all(|v| v.is_convex));
    }

    #[test]
    fn square_unit_dirs_follow_edges() {
        let pts = unit_square();
        let chain = build_chain(WallId(0), WallVertexId(0), &pts).unwrap();
        let expected = [p(1.0, 0.0), p(0.0, 1.0), p(-1.0, 0.0), p(0.0, -1.0)];
        for (i, v) in chain.iter().enumerate() {
            assert_eq!(v.unit_dir, expected[i], "vertex {i}");
            let edge = (pts[(i + 1) % pts.len()] - pts[i]).normalize();
            assert!((v.unit_dir - edge).length() < 1e-12);
        }
    }

    #[test]
    fn links_wrap_around() {
        let chain = build_chain(WallId(3), WallVertexId(10), &unit_square()).unwrap();
        let ids: Vec<_> = chain.iter().map(|v| v.id.0).collect();
        assert_eq!(ids, vec![10, 11, 12, 13]);
        assert_eq!(chain[0].prev, WallVertexId(13));
        assert_eq!(chain[3].next, WallVertexId(10));
        assert_eq!(chain[1].prev, WallVertexId(10));
        assert_eq!(chain[1].next, WallVertexId(12));
        assert!(chain.iter().all(|v| v.wall == WallId(3)));
    }

    #[test]
    fn concave_corner_is_reflex() {
        let chain = build_chain(WallId(0), WallVertexId(0), &l_shape()).unwrap();
        let convex: Vec<bool> = chain.iter().map(|v| v.is_convex).collect();
        assert_eq!(convex, vec![true, true, true, false, true, true]);
    }

    #[test]
    fn clockwise_square_is_reflex_everywhere() {
        let pts = vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        let chain = build_chain(WallId(0), WallVertexId(0), &pts).unwrap();
        assert!(chain.iter().all(|v| !v.is_convex));
    }

    #[test]
    fn collinear_vertices_count_as_convex() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)];
        let chain = build_chain(WallId(0), WallVertexId(0), &pts).unwrap();
        assert!(chain.iter().all(|v| v.is_convex));
    }

    #[test]
    fn segment_is_convex_at_both_ends() {
        let pts = vec![p(0.0, 0.0), p(4.0, 0.0)];
        let chain = build_chain(WallId(0), WallVertexId(0), &pts).unwrap();
        assert_eq!(chain.len(), 2);
        assert!(chain.iter().all(|v| v.is_convex));
        assert_eq!(chain[0].unit_dir, p(1.0, 0.0));
        assert_eq!(chain[1].unit_dir, p(-1.0, 0.0));
        assert_eq!(chain[0].next, chain[1].id);
        assert_eq!(chain[0].prev, chain[1].id);
    }

    #[test]
    fn repeated_point_gets_zero_direction() {
        let pts = vec![p(0.0, 0.0), p(0.0, 0.0), p(1.0, 1.0)];
        let chain = build_chain(WallId(0), WallVertexId(0), &pts).unwrap();
        assert_eq!(chain[0].unit_dir, Vec3::ZERO);
        assert!(!chain[0].unit_dir.is_nan());
    }

    #[test]
    fn too_few_points_rejected() {
        assert_eq!(
            build_chain(WallId(0), WallVertexId(0), &[]),
            Err(WorldError::TooFewWallVertices { got: 0 })
        );
        assert_eq!(
            build_chain(WallId(0), WallVertexId(0), &[p(1.0, 1.0)]),
            Err(WorldError::TooFewWallVertices { got: 1 })
        );
    }

    #[test]
    fn id_range_overflow_rejected() {
        let result = build_chain(WallId(0), WallVertexId(u32::MAX - 2), &unit_square());
        assert_eq!(result, Err(WorldError::IdSpaceExhausted("wall vertex")));
    }
}

// ── World: stores ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod world_stores {
    use rwca_core::{AgentId, AgentTypeId, ObstacleId, Vec3, WallId, WallVertexId, WorldError};

    use super::helpers::{p, unit_square};
    use crate::{Agent, AgentStatus, AgentType, Obstacle, World, WorldConfig};

    fn add_default_agent(world: &mut World) -> AgentId {
        world
            .add_agent(AgentTypeId(0), Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::X)
            .unwrap()
    }

    #[test]
    fn new_world_has_default_type() {
        let world = World::new(0, 0.1);
        assert_eq!(world.agent_types().len(), 1);
        assert_eq!(world.agent_type(AgentTypeId(0)).unwrap().radius, 1.0);
        assert!(world.agent_type_by_name("Default AgentType").is_some());
        assert_eq!(world.clock.time_step_secs(), 0.1);
    }

    #[test]
    fn from_config_registers_extra_types() {
        let config = WorldConfig {
            start_unix_nanos: 5_000_000_000,
            time_step_secs: 0.05,
            agent_types: vec![AgentType::named("cart"), AgentType::named("runner")],
        };
        let world = World::from_config(&config).unwrap();
        assert_eq!(world.agent_types().len(), 3);
        assert_eq!(world.agent_types().id_of("runner"), Some(AgentTypeId(2)));
        assert_eq!(world.clock.current_unix_secs(), 5);
    }

    #[test]
    fn add_agent_type_id_is_registry_size() {
        let mut world = World::default();
        let id = world
            .add_agent_type(AgentType { radius: 0.4, ..AgentType::named("child") })
            .unwrap();
        assert_eq!(id, AgentTypeId(1));
    }

    #[test]
    fn add_and_get_agent() {
        let mut world = World::default();
        let a = add_default_agent(&mut world);
        let b = add_default_agent(&mut world);
        assert_eq!((a, b), (AgentId(0), AgentId(1)));
        let agent = world.get_agent(b).unwrap();
        assert_eq!(agent.id, b);
        assert_eq!(agent.goal, Vec3::X);
        assert_eq!(agent.status, AgentStatus::Created);
    }

    #[test]
    fn add_agent_with_unknown_type_consumes_no_id() {
        let mut world = World::default();
        let err = world
            .add_agent(AgentTypeId(9), Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO)
            .unwrap_err();
        assert_eq!(err, WorldError::AgentTypeNotFound(AgentTypeId(9)));
        assert!(world.list_agent_ids().is_empty());
        assert_eq!(add_default_agent(&mut world), AgentId(0));
    }

    #[test]
    fn get_missing_agent_is_none() {
        let world = World::default();
        assert!(world.get_agent(AgentId(3)).is_none());
    }

    #[test]
    fn set_agent_replaces_existing_only() {
        let mut world = World::default();
        let a = add_default_agent(&mut world);

        let mut replacement = Agent::empty(AgentId(40));
        replacement.position = Vec3::new(7.0, 0.0, 0.0);
        world.set_agent(a, replacement.clone()).unwrap();
        let stored = world.get_agent(a).unwrap();
        assert_eq!(stored.position.x, 7.0);
        assert_eq!(stored.id, a, "id field is forced to the key");

        assert_eq!(
            world.set_agent(AgentId(5), replacement),
            Err(WorldError::AgentNotFound(AgentId(5)))
        );
        assert_eq!(world.list_agent_ids(), vec![a]);
    }

    #[test]
    fn set_agent_rejects_unknown_type() {
        let mut world = World::default();
        let a = add_default_agent(&mut world);
        let mut bad = Agent::empty(a);
        bad.agent_type = AgentTypeId(12);
        bad.position = Vec3::splat(9.0);
        assert!(world.set_agent(a, bad).is_err());
        assert_eq!(world.get_agent(a).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn remove_agent_is_soft() {
        let mut world = World::default();
        let a = add_default_agent(&mut world);
        world.remove_agent(a).unwrap();
        assert_eq!(world.get_agent(a).unwrap().status, AgentStatus::ToBeDeleted);
        assert_eq!(world.list_agent_ids(), vec![a]);
    }

    #[test]
    fn remove_missing_agent_fails_without_change() {
        let mut world = World::default();
        let a = add_default_agent(&mut world);
        assert_eq!(world.remove_agent(AgentId(8)), Err(WorldError::AgentNotFound(AgentId(8))));
        assert_eq!(world.list_agent_ids(), vec![a]);
        assert_eq!(world.get_agent(a).unwrap().status, AgentStatus::Created);
    }

    #[test]
    fn purge_drops_deleted_and_keeps_ids_retired() {
        let mut world = World::default();
        let a = add_default_agent(&mut world);
        let b = add_default_agent(&mut world);
        world.remove_agent(a).unwrap();
        assert_eq!(world.purge_deleted_agents(), 1);
        assert_eq!(world.list_agent_ids(), vec![b]);
        assert!(world.get_agent(a).is_none());
        assert_eq!(add_default_agent(&mut world), AgentId(2));
        assert_eq!(world.purge_deleted_agents(), 0);
    }

    #[test]
    fn obstacle_crud() {
        let mut world = World::default();
        let o = world
            .add_obstacle(p(1.0, 1.0), vec![p(0.0, 0.0), p(1.0, 0.0)], p(0.5, 0.0))
            .unwrap();
        let cube = world.add_unit_obstacle(p(4.0, 0.0), Vec3::ZERO).unwrap();
        assert_eq!((o, cube), (ObstacleId(0), ObstacleId(1)));
        assert_eq!(world.get_obstacle(cube).unwrap().shape.len(), 8);

        let moved = Obstacle::empty(ObstacleId(99));
        world.set_obstacle(o, moved).unwrap();
        assert_eq!(world.get_obstacle(o).unwrap().id, o);
        assert!(world.get_obstacle(o).unwrap().shape.is_empty());
        assert!(world.set_obstacle(ObstacleId(7), Obstacle::empty(ObstacleId(7))).is_err());

        world.remove_obstacle(o).unwrap();
        assert!(world.get_obstacle(o).is_none());
        assert_eq!(world.remove_obstacle(o), Err(WorldError::ObstacleNotFound(o)));
        assert_eq!(world.list_obstacle_ids(), vec![cube]);
        assert_eq!(world.add_unit_obstacle(Vec3::ZERO, Vec3::ZERO).unwrap(), ObstacleId(2));
    }

    #[test]
    fn add_wall_inserts_wall_and_vertices() {
        let mut world = World::default();
        let w = world.add_wall(&unit_square()).unwrap();
        assert_eq!(w, WallId(0));
        let wall = world.get_wall(w).unwrap();
        assert_eq!(wall.head, WallVertexId(0));
        assert_eq!(wall.len(), 4);
        assert_eq!(wall.vertices, unit_square());
        assert_eq!(world.list_wall_vertex_ids().len(), 4);
    }

    #[test]
    fn second_wall_continues_vertex_ids() {
        let mut world = World::default();
        world.add_wall(&unit_square()).unwrap();
        let w = world.add_wall(&[p(5.0, 0.0), p(6.0, 0.0)]).unwrap();
        let wall = world.get_wall(w).unwrap();
        assert_eq!(wall.head, WallVertexId(4));
        assert_eq!(
            wall.vertex_ids().collect::<Vec<_>>(),
            vec![WallVertexId(4), WallVertexId(5)]
        );
        assert!(wall.is_segment());
    }

    #[test]
    fn degenerate_walls_rejected_without_consuming_ids() {
        let mut world = World::default();
        assert_eq!(world.add_wall(&[]), Err(WorldError::TooFewWallVertices { got: 0 }));
        assert_eq!(
            world.add_wall(&[p(1.0, 1.0)]),
            Err(WorldError::TooFewWallVertices { got: 1 })
        );
        assert!(world.list_wall_ids().is_empty());
        assert!(world.list_wall_vertex_ids().is_empty());
        assert_eq!(world.walls().next_id(), WallId(0));
        assert_eq!(world.wall_vertices().next_id(), WallVertexId(0));
    }

    #[test]
    fn remove_wall_erases_its_vertex_range_only() {
        let mut world = World::default();
        let a = world.add_wall(&unit_square()).unwrap();
        let b = world.add_wall(&[p(5.0, 0.0), p(6.0, 0.0), p(6.0, 1.0)]).unwrap();
        world.remove_wall(a).unwrap();

        assert!(world.get_wall(a).is_none());
        assert_eq!(world.list_wall_ids(), vec![b]);
        assert_eq!(
            world.list_wall_vertex_ids(),
            vec![WallVertexId(4), WallVertexId(5), WallVertexId(6)]
        );
        assert!((0..4).all(|i| world.get_wall_vertex(WallVertexId(i)).is_none()));
        assert_eq!(world.wall_chain(b).unwrap().count(), 3);
    }

    #[test]
    fn remove_missing_wall_fails_without_change() {
        let mut world = World::default();
        let a = world.add_wall(&unit_square()).unwrap();
        assert_eq!(world.remove_wall(WallId(3)), Err(WorldError::WallNotFound(WallId(3))));
        assert_eq!(world.list_wall_ids(), vec![a]);
        assert_eq!(world.list_wall_vertex_ids().len(), 4);
    }

    #[test]
    fn removed_wall_ids_are_not_reused() {
        let mut world = World::default();
        let a = world.add_wall(&unit_square()).unwrap();
        world.remove_wall(a).unwrap();
        let b = world.add_wall(&unit_square()).unwrap();
        assert_eq!(b, WallId(1));
        assert_eq!(world.get_wall(b).unwrap().head, WallVertexId(4));
    }

    #[test]
    fn wall_chain_for_missing_wall_is_error() {
        let world = World::default();
        assert!(world.wall_chain(WallId(0)).is_err());
    }

    #[test]
    fn list_ids_ascending_for_every_store() {
        let mut world = World::default();
        for i in 0..10 {
            add_default_agent(&mut world);
            world.add_unit_obstacle(p(i as f64, 0.0), Vec3::ZERO).unwrap();
            world.add_wall(&[p(i as f64, 0.0), p(i as f64, 1.0)]).unwrap();
        }
        world.remove_obstacle(ObstacleId(4)).unwrap();
        world.remove_wall(WallId(6)).unwrap();

        let strictly_ascending = |v: &[u32]| v.windows(2).all(|w| w[0] < w[1]);
        let agents: Vec<u32> = world.list_agent_ids().iter().map(|i| i.0).collect();
        let obstacles: Vec<u32> = world.list_obstacle_ids().iter().map(|i| i.0).collect();
        let walls: Vec<u32> = world.list_wall_ids().iter().map(|i| i.0).collect();
        assert!(strictly_ascending(&agents) && agents.len() == 10);
        assert!(strictly_ascending(&obstacles) && obstacles.len() == 9);
        assert!(strictly_ascending(&walls) && walls.len() == 9);
        assert!(!obstacles.contains(&4));
        assert!(!walls.contains(&6));
    }
}

// ── World: topology through the store ─────────────────────────────────────────

#[cfg(test)]
mod world_topology {
    use rwca_core::WallVertexId;

    use super::helpers::{l_shape, unit_square};
    use crate::World;

    #[test]
    fn chain_walk_visits_every_vertex_once() {
        let mut world = World::default();
        let w = world.add_wall(&l_shape()).unwrap();
        let ids: Vec<WallVertexId> = world.wall_chain(w).unwrap().map(|v| v.id).collect();
        assert_eq!(ids, world.get_wall(w).unwrap().vertex_ids().collect::<Vec<_>>());
    }

    #[test]
    fn n_hops_return_to_start_from_any_vertex() {
        let mut world = World::default();
        let w = world.add_wall(&unit_square()).unwrap();
        let wall = world.get_wall(w).unwrap().clone();
        for start in wall.vertex_ids() {
            let mut cursor = start;
            for _ in 0..wall.len() {
                cursor = world.get_wall_vertex(cursor).unwrap().next;
            }
            assert_eq!(cursor, start);
        }
    }

    #[test]
    fn links_are_mutual_inverses() {
        let mut world = World::default();
        let w = world.add_wall(&l_shape()).unwrap();
        for v in world.wall_chain(w).unwrap() {
            let next = world.get_wall_vertex(v.next).unwrap();
            let prev = world.get_wall_vertex(v.prev).unwrap();
            assert_eq!(next.prev, v.id);
            assert_eq!(prev.next, v.id);
        }
    }

    #[test]
    fn unit_square_scenario() {
        let mut world = World::new(0, 0.1);
        let pts = unit_square();
        let w = world.add_wall(&pts).unwrap();
        let chain: Vec<_> = world.wall_chain(w).unwrap().cloned().collect();
        assert_eq!(chain.len(), 4);
        for (i, v) in chain.iter().enumerate() {
            assert!(v.is_convex, "vertex {i}");
            let edge = (pts[(i + 1) % 4] - pts[i]).normalize();
            assert!((v.unit_dir - edge).length() < 1e-12, "vertex {i}");
        }
    }
}

// ── World: goal tracking ──────────────────────────────────────────────────────

#[cfg(test)]
mod world_goals {
    use rwca_core::{AgentId, AgentTypeId, Vec3, WorldError};

    use crate::{AgentStatus, AgentType, World};

    #[test]
    fn agent_on_goal_reaches_immediately() {
        let mut world = World::new(0, 0.1);
        let t = world.add_agent_type(AgentType { radius: 1.0, ..AgentType::named("unit") }).unwrap();
        let a = world.add_agent(t, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO).unwrap();
        assert!(world.is_reached_goal(a).unwrap());
        assert_eq!(world.get_agent(a).unwrap().status.as_u8(), 2);
    }

    #[test]
    fn agent_far_from_goal_does_not_reach() {
        let mut world = World::new(0, 0.1);
        let t = world.add_agent_type(AgentType { radius: 1.0, ..AgentType::named("unit") }).unwrap();
        let a = world
            .add_agent(t, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0))
            .unwrap();
        assert!(!world.is_reached_goal(a).unwrap());
        assert!(world.get_agent(a).unwrap().status.as_u8() < 2);
    }

    #[test]
    fn goal_uses_the_agents_own_radius() {
        let mut world = World::default();
        let big = world.add_agent_type(AgentType { radius: 3.0, ..AgentType::named("big") }).unwrap();
        let goal = Vec3::new(2.5, 0.0, 0.0);
        let small = world.add_agent(AgentTypeId(0), Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, goal).unwrap();
        let large = world.add_agent(big, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, goal).unwrap();

        assert!(!world.is_reached_goal(small).unwrap());
        assert_eq!(world.get_agent(small).unwrap().status, AgentStatus::Created);
        assert!(world.is_reached_goal(large).unwrap());
        assert_eq!(world.get_agent(large).unwrap().status, AgentStatus::GoalReached);
    }

    #[test]
    fn default_agent_type_id_is_not_registered() {
        let mut world = World::default();
        let result = world.add_agent(AgentTypeId::default(), Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);
        assert_eq!(result, Err(WorldError::AgentTypeNotFound(AgentTypeId::INVALID)));
        assert!(world.agents().is_empty());
    }

    #[test]
    fn missing_agent_goal_check_is_error() {
        let mut world = World::default();
        assert_eq!(world.is_reached_goal(AgentId(0)), Err(WorldError::AgentNotFound(AgentId(0))));
    }

    #[test]
    fn empty_world_is_finished() {
        assert!(World::default().is_finished());
    }

    #[test]
    fn finished_only_when_all_agents_arrive() {
        let mut world = World::default();
        let t = world.agent_types().id_of("Default AgentType").unwrap();
        let a = world.add_agent(t, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO).unwrap();
        let b = world
            .add_agent(t, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0))
            .unwrap();
        assert!(!world.is_finished());
        assert_eq!(world.get_agent(a).unwrap().status, AgentStatus::GoalReached);

        world.get_agent_mut(b).unwrap().position = Vec3::new(9.5, 0.0, 0.0);
        assert!(world.is_finished());
        assert_eq!(world.get_agent(b).unwrap().status, AgentStatus::GoalReached);
    }

    #[test]
    fn is_finished_short_circuits_in_id_order() {
        let mut world = World::default();
        let t = world.agent_types().id_of("Default AgentType").unwrap();
        let far = Vec3::new(10.0, 0.0, 0.0);
        let first = world.add_agent(t, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, far).unwrap();
        let second = world.add_agent(t, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO).unwrap();
        assert!(!world.is_finished());
        assert_eq!(world.get_agent(first).unwrap().status, AgentStatus::Created);
        // Never evaluated: the scan stopped at `first`.
        assert_eq!(world.get_agent(second).unwrap().status, AgentStatus::Created);
    }

    #[test]
    fn deleted_agents_count_as_finished() {
        let mut world = World::default();
        let t = world.agent_types().id_of("Default AgentType").unwrap();
        let a = world
            .add_agent(t, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0))
            .unwrap();
        assert!(!world.is_finished());
        world.remove_agent(a).unwrap();
        assert!(world.is_finished());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;
    use rwca_core::Vec3;

    use crate::World;

    fn polygon() -> impl Strategy<Value = Vec<Vec3>> {
        prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..24)
            .prop_map(|pts| pts.into_iter().map(|(x, y)| Vec3::new(x, y, 0.0)).collect())
    }

    proptest! {
        #[test]
        fn chain_is_circular_and_doubly_linked(pts in polygon()) {
            let mut world = World::default();
            let w = world.add_wall(&pts).unwrap();
            let wall = world.get_wall(w).unwrap().clone();
            let n = pts.len();

            prop_assert_eq!(world.wall_chain(w).unwrap().count(), n);
            prop_assert_eq!(world.list_wall_vertex_ids().len(), n);

            for start in wall.vertex_ids() {
                let mut cursor = start;
                for step in 0..n {
                    let v = world.get_wall_vertex(cursor).unwrap();
                    prop_assert_eq!(world.get_wall_vertex(v.next).unwrap().prev, v.id);
                    prop_assert_eq!(world.get_wall_vertex(v.prev).unwrap().next, v.id);
                    cursor = v.next;
                    if step + 1 < n {
                        prop_assert_ne!(cursor, start);
                    }
                }
                prop_assert_eq!(cursor, start);
            }
        }

        #[test]
        fn segments_are_always_convex(a in (-50.0f64..50.0, -50.0f64..50.0), b in (-50.0f64..50.0, -50.0f64..50.0)) {
            let mut world = World::default();
            let w = world
                .add_wall(&[Vec3::new(a.0, a.1, 0.0), Vec3::new(b.0, b.1, 0.0)])
                .unwrap();
            prop_assert!(world.wall_chain(w).unwrap().all(|v| v.is_convex));
        }

        #[test]
        fn removal_clears_exactly_the_vertex_range(first in polygon(), second in polygon()) {
            let mut world = World::default();
            let a = world.add_wall(&first).unwrap();
            let b = world.add_wall(&second).unwrap();
            let range: Vec<_> = world.get_wall(a).unwrap().vertex_ids().collect();
            world.remove_wall(a).unwrap();
            prop_assert!(range.iter().all(|&id| world.get_wall_vertex(id).is_none()));
            prop_assert_eq!(world.list_wall_vertex_ids().len(), second.len());
            prop_assert_eq!(world.wall_chain(b).unwrap().count(), second.len());
        }
    }
}
