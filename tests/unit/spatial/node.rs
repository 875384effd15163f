//! Tests for search node construction, neighbor iteration and cost recomputation

#[cfg(test)]
mod tests {
    use greedywall::spatial::grid::{CellType, TileGrid};
    use greedywall::spatial::node::{
        EDGE_OFFSETS, NEIGHBOR_OFFSETS, NodeField, SearchNode, derive_priority,
        manhattan_distance, offset_position,
    };

    fn field(map: &str) -> NodeField {
        let grid: TileGrid = map.parse().expect("valid map");
        NodeField::build_from_grid(&grid).expect("field")
    }

    // Tests offsets that leave the grid on either side
    // Verified by wrapping negative coordinates
    #[test]
    fn test_offset_position_clips_to_grid() {
        assert_eq!(offset_position([0, 0], [-1, 0], 3, 3), None);
        assert_eq!(offset_position([2, 1], [1, 0], 3, 3), None);
        assert_eq!(offset_position([1, 1], [1, -1], 3, 3), Some([2, 0]));
    }

    // Tests the distance and priority formulas
    // Verified by adding the constant instead of multiplying
    #[test]
    fn test_priority_scales_distance_and_exposure() {
        assert_eq!(manhattan_distance([1, 4], [3, 1]), 5);
        assert_eq!(derive_priority(3, 2, 5), 16);
        assert_eq!(derive_priority(7, 0, 8), 0);
        assert_eq!(derive_priority(i32::MAX, 2, 1), i32::MAX);
    }

    // Tests that a leftover wall is read back as grass
    // Verified by keeping the wall type in the snapshot
    #[test]
    fn test_new_node_treats_wall_as_grass() {
        let node = SearchNode::new([1, 2], CellType::Wall);

        assert_eq!(node.cell_type, CellType::Grass);
        assert!(node.is_buildable());
        assert!(!node.listed && !node.interior);
        assert!(!SearchNode::new([0, 0], CellType::Building).is_buildable());
    }

    // Tests neighbor order and clipping at a corner
    // Verified by iterating dy in the outer loop
    #[test]
    fn test_neighbors_follow_offset_order() {
        let nodes = field("...\n...\n...\n");

        let corner: Vec<_> = nodes.neighbors([0, 0], &NEIGHBOR_OFFSETS).collect();
        assert_eq!(corner, vec![[0, 1], [1, 0], [1, 1]]);

        let center: Vec<_> = nodes.neighbors([1, 1], &NEIGHBOR_OFFSETS).collect();
        assert_eq!(center.first(), Some(&[0, 0]));
        assert_eq!(center.get(1), Some(&[0, 1]));
        assert_eq!(center.len(), 8);

        let edges: Vec<_> = nodes.neighbors([1, 1], &EDGE_OFFSETS).collect();
        assert_eq!(edges, vec![[0, 1], [1, 0], [1, 2], [2, 1]]);
    }

    // Tests exposure ignores rocks and listed cells
    // Verified by counting rock neighbors
    #[test]
    fn test_exposure_counts_open_terrain() {
        let mut nodes = field("R..\n...\n..B\n");
        assert_eq!(nodes.exposure_at([1, 1]), 7);

        if let Some(node) = nodes.get_mut([2, 1]) {
            node.listed = true;
        }
        assert_eq!(nodes.exposure_at([1, 1]), 6);
        assert_eq!(nodes.exposure_at([0, 0]), 3);
    }

    // Tests cost fields after a rescan around a start cell
    // Verified by skipping the clearance check
    #[test]
    fn test_recompute_zeroes_clearance_and_obstacles() {
        let mut nodes = field(".....\n.....\n..B..\n.....\nR....\n");
        if let Some(start) = nodes.get_mut([2, 2]) {
            start.listed = true;
        }
        nodes.recompute_costs([2, 2], 2, 3);

        let near = nodes.get([2, 1]).expect("in bounds");
        assert_eq!(near.distance_to_start, 1);
        assert_eq!((near.structural_constant, near.priority), (0, 0));

        let building = nodes.get([2, 2]).expect("in bounds");
        assert_eq!(building.priority, 0);

        let rock = nodes.get([0, 4]).expect("in bounds");
        assert_eq!((rock.structural_constant, rock.priority), (0, 0));

        let corner = nodes.get([0, 0]).expect("in bounds");
        assert_eq!(corner.distance_to_start, 4);
        assert_eq!(corner.structural_constant, 3);
        assert_eq!(corner.exposure_cost, 3);
        assert_eq!(corner.priority, 3 * (4 + 3));

        let diagonal = nodes.get([1, 1]).expect("in bounds");
        assert_eq!(diagonal.exposure_cost, 7);
        assert_eq!(diagonal.priority, 3 * (2 + 7));
    }

    // Tests that connecting two cells bumps both counters
    // Verified by incrementing only the neighbor
    #[test]
    fn test_connect_increments_both_sides() {
        let mut nodes = field("...\n...\n");
        nodes.connect([0, 0], [1, 0]);
        nodes.connect([0, 0], [0, 1]);

        assert_eq!(nodes.get([0, 0]).map(|n| n.neighbor_count), Some(2));
        assert_eq!(nodes.get([1, 0]).map(|n| n.neighbor_count), Some(1));
        assert_eq!(nodes.get([2, 1]).map(|n| n.neighbor_count), Some(0));
        assert_eq!((nodes.width(), nodes.height()), (3, 2));
        assert_eq!(nodes.iter().count(), 6);
    }
}
