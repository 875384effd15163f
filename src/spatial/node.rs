//! Per-cell search records and the cost model that orders the frontier

use ndarray::Array2;

use crate::io::error::{Result, WallError};
use crate::spatial::grid::{CellType, TileHost};

/// All 8 neighbor offsets, `dx` outer and `dy` inner
///
/// The order is the order in which an expansion appends new frontier nodes,
/// which in turn breaks ties between equal priorities.
pub const NEIGHBOR_OFFSETS: [[isize; 2]; 8] = [
    [-1, -1],
    [-1, 0],
    [-1, 1],
    [0, -1],
    [0, 1],
    [1, -1],
    [1, 0],
    [1, 1],
];

/// Offsets with `|dx - dy| == 1`: the four cells sharing an edge
pub const EDGE_OFFSETS: [[isize; 2]; 4] = [[-1, 0], [0, -1], [0, 1], [1, 0]];

/// Apply an offset, returning `None` if the result leaves a `width × height` grid
pub fn offset_position(
    pos: [usize; 2],
    offset: [isize; 2],
    width: usize,
    height: usize,
) -> Option<[usize; 2]> {
    let x = pos[0].checked_add_signed(offset[0])?;
    let y = pos[1].checked_add_signed(offset[1])?;
    (x < width && y < height).then_some([x, y])
}

/// Manhattan distance between two cells, saturated to `i32`
pub fn manhattan_distance(a: [usize; 2], b: [usize; 2]) -> i32 {
    let distance = a[0].abs_diff(b[0]) + a[1].abs_diff(b[1]);
    i32::try_from(distance).unwrap_or(i32::MAX)
}

/// Ordering key of a frontier node; lower values are expanded first
///
/// Zero whenever the structural constant is zero, so clearance-zone and
/// non-grass nodes are absorbed into the interior before any wall candidate.
pub const fn derive_priority(
    distance_to_start: i32,
    structural_constant: i32,
    exposure_cost: i32,
) -> i32 {
    structural_constant.saturating_mul(distance_to_start.saturating_add(exposure_cost))
}

/// Search bookkeeping for one grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    /// Grid coordinate `[x, y]`, also the link back to the host cell
    pub position: [usize; 2],
    /// Terrain at snapshot time
    pub cell_type: CellType,
    /// Has entered the open list at some point
    pub listed: bool,
    /// Has been expanded, or is the start node
    pub interior: bool,
    /// Interior edge-adjacency counter; zero means not yet expandable
    pub neighbor_count: u32,
    /// Manhattan distance to the start node
    pub distance_to_start: i32,
    /// Zero inside the clearance radius or off grass, the configured constant elsewhere
    pub structural_constant: i32,
    /// Unlisted, non-rock cells among the 8 neighbors
    pub exposure_cost: i32,
    /// Derived ordering key
    pub priority: i32,
}

impl SearchNode {
    /// Fresh node; a wall left over from an earlier run counts as grass
    pub const fn new(position: [usize; 2], cell_type: CellType) -> Self {
        let cell_type = match cell_type {
            CellType::Wall => CellType::Grass,
            other => other,
        };
        Self {
            position,
            cell_type,
            listed: false,
            interior: false,
            neighbor_count: 0,
            distance_to_start: 0,
            structural_constant: 0,
            exposure_cost: 0,
            priority: 0,
        }
    }

    /// Plain terrain that may carry a wall segment
    pub fn is_buildable(&self) -> bool {
        self.cell_type == CellType::Grass
    }
}

/// Snapshot of the host grid as search nodes, indexed by `[x, y]`
#[derive(Debug, Clone)]
pub struct NodeField {
    nodes: Array2<SearchNode>,
}

impl NodeField {
    /// Build one node per host cell
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects a coordinate inside its own bounds
    pub fn build_from_grid<H: TileHost + ?Sized>(host: &H) -> Result<Self> {
        let (width, height) = (host.width(), host.height());
        let mut nodes = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                nodes.push(SearchNode::new([x, y], host.cell_type(x, y)?));
            }
        }

        let nodes = Array2::from_shape_vec((width, height), nodes).map_err(|e| {
            WallError::InvalidSourceData {
                reason: format!("Node field shape mismatch: {e}"),
            }
        })?;
        Ok(Self { nodes })
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.nodes.dim().0
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.nodes.dim().1
    }

    /// Node at a position
    pub fn get(&self, pos: [usize; 2]) -> Option<&SearchNode> {
        self.nodes.get(pos)
    }

    /// Mutable node at a position
    pub fn get_mut(&mut self, pos: [usize; 2]) -> Option<&mut SearchNode> {
        self.nodes.get_mut(pos)
    }

    /// All nodes in `x`-major order
    pub fn iter(&self) -> impl Iterator<Item = &SearchNode> {
        self.nodes.iter()
    }

    /// In-bounds positions around `pos` for the given offsets, in offset order
    pub fn neighbors<'a>(
        &self,
        pos: [usize; 2],
        offsets: &'a [[isize; 2]],
    ) -> impl Iterator<Item = [usize; 2]> + use<'a> {
        let (width, height) = self.nodes.dim();
        offsets
            .iter()
            .filter_map(move |&offset| offset_position(pos, offset, width, height))
    }

    /// Count of 8-neighbors that are neither listed nor rock
    pub fn exposure_at(&self, pos: [usize; 2]) -> i32 {
        let exposed = self
            .neighbors(pos, &NEIGHBOR_OFFSETS)
            .filter(|&neighbor| {
                self.get(neighbor)
                    .is_some_and(|node| !node.listed && node.cell_type != CellType::Rock)
            })
            .count();
        i32::try_from(exposed).unwrap_or(i32::MAX)
    }

    /// Rescan every node: distance to `start`, structural constant, exposure and priority
    pub fn recompute_costs(&mut self, start: [usize; 2], min_clearance: i32, constant: i32) {
        let (width, height) = self.nodes.dim();
        for x in 0..width {
            for y in 0..height {
                let pos = [x, y];
                let distance = manhattan_distance(pos, start);
                let buildable = self.get(pos).is_some_and(SearchNode::is_buildable);
                let exposure =
                    (distance >= min_clearance && buildable).then(|| self.exposure_at(pos));

                if let Some(node) = self.nodes.get_mut(pos) {
                    node.distance_to_start = distance;
                    match exposure {
                        Some(exposure) => {
                            node.structural_constant = constant;
                            node.exposure_cost = exposure;
                            node.priority = derive_priority(distance, constant, exposure);
                        }
                        None => {
                            node.structural_constant = 0;
                            node.priority = 0;
                        }
                    }
                }
            }
        }
    }

    /// Record that `pos` and `neighbor` touch while `pos` is interior
    pub fn connect(&mut self, pos: [usize; 2], neighbor: [usize; 2]) {
        if let Some(node) = self.nodes.get_mut(neighbor) {
            node.neighbor_count += 1;
        }
        if let Some(node) = self.nodes.get_mut(pos) {
            node.neighbor_count += 1;
        }
    }
}
