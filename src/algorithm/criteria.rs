//! Wall validity predicate evaluated after every expansion

use crate::algorithm::frontier::Frontier;
use crate::io::configuration::MAX_SEGMENT_DEGREE;
use crate::spatial::grid::CellType;
use crate::spatial::node::NodeField;

/// Why the current open list does not form a wall yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    /// A building is still outside the interior
    BuildingOutside([usize; 2]),
    /// A node inside the clearance radius is still outside the interior
    ClearanceViolated([usize; 2]),
    /// The interior reaches the map edge, where no segment can close it off
    InteriorOnBorder([usize; 2]),
    /// The open list is empty, so there is nothing to commit
    NoSegments,
    /// A segment touches more than two other segments
    SegmentBranches([usize; 2]),
}

/// Outcome of checking the frontier against the wall criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The open list reached the segment limit; the run must stop
    Abort {
        /// Current open list size
        segments: usize,
        /// Configured maximum
        limit: usize,
    },
    /// Not a wall yet; keep expanding
    Incomplete(Shortfall),
    /// The open list encloses every building and is a simple chain clear of the map edge
    Candidate,
}

/// Check the open list against the segment limit, containment, clearance and degree rules
///
/// Open-list membership stands in for "is a wall segment". An interior that
/// touches the map edge is never enclosed, so such a search keeps expanding
/// until its open list runs out.
pub fn evaluate(
    nodes: &NodeField,
    frontier: &Frontier,
    min_clearance: i32,
    max_wall_tiles: usize,
) -> Verdict {
    if frontier.open_len() >= max_wall_tiles {
        return Verdict::Abort {
            segments: frontier.open_len(),
            limit: max_wall_tiles,
        };
    }

    let (width, height) = (nodes.width(), nodes.height());
    for node in nodes.iter() {
        if node.interior {
            let [x, y] = node.position;
            if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                return Verdict::Incomplete(Shortfall::InteriorOnBorder(node.position));
            }
            continue;
        }
        if node.cell_type == CellType::Building {
            return Verdict::Incomplete(Shortfall::BuildingOutside(node.position));
        }
        if node.distance_to_start < min_clearance {
            return Verdict::Incomplete(Shortfall::ClearanceViolated(node.position));
        }
    }

    if frontier.is_open_empty() {
        return Verdict::Incomplete(Shortfall::NoSegments);
    }

    if let Some(&branching) = frontier
        .open()
        .iter()
        .find(|&&pos| frontier.open_degree(pos) > MAX_SEGMENT_DEGREE)
    {
        return Verdict::Incomplete(Shortfall::SegmentBranches(branching));
    }

    Verdict::Candidate
}
