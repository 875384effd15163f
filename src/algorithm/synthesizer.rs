use std::fmt;

use tracing::{debug, info, trace};

use crate::algorithm::criteria::{Verdict, evaluate};
use crate::algorithm::frontier::Frontier;
use crate::io::configuration::{
    DEFAULT_FUTURE_STEPS, DEFAULT_MAX_WALL_TILES, DEFAULT_MIN_WALL_DISTANCE,
    DEFAULT_STRUCTURAL_CONSTANT, START_NEIGHBOR_SEED,
};
use crate::io::error::{Result, WallError, invalid_parameter};
use crate::spatial::grid::{BoundingBox, CellType, Highlight, TileHost};
use crate::spatial::node::{EDGE_OFFSETS, NEIGHBOR_OFFSETS, NodeField};

/// Parameters of a synthesis run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallConfig {
    /// Minimum Manhattan distance from the start node to any wall segment
    pub min_wall_distance: i32,
    /// Open list size at which the run is aborted
    pub max_wall_tiles: usize,
    /// Weight of distance and exposure in the frontier priority
    pub structural_constant: i32,
    /// Valid steps to keep searching after the first wall is found
    pub future_steps: usize,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            min_wall_distance: DEFAULT_MIN_WALL_DISTANCE,
            max_wall_tiles: DEFAULT_MAX_WALL_TILES,
            structural_constant: DEFAULT_STRUCTURAL_CONSTANT,
            future_steps: DEFAULT_FUTURE_STEPS,
        }
    }
}

impl WallConfig {
    /// Check every parameter range
    ///
    /// # Errors
    ///
    /// Returns [`WallError::InvalidParameter`] for a negative clearance, a zero
    /// segment limit or a non-positive structural constant
    pub fn validate(&self) -> Result<()> {
        if self.min_wall_distance < 0 {
            return Err(invalid_parameter(
                "min_wall_distance",
                &self.min_wall_distance,
                &"must not be negative",
            ));
        }
        if self.max_wall_tiles == 0 {
            return Err(invalid_parameter(
                "max_wall_tiles",
                &self.max_wall_tiles,
                &"must be greater than zero",
            ));
        }
        if self.structural_constant <= 0 {
            return Err(invalid_parameter(
                "structural_constant",
                &self.structural_constant,
                &"must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Why a run ended without a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The grid holds no building cells
    NoBuildings,
    /// The diagonal probe from the building center only found rock
    NoValidStart,
    /// The open list emptied before a wall was found
    OpenListExhausted,
    /// Every open node is still disconnected from the interior
    NoConnectedCandidate,
    /// The open list reached the segment limit
    TooManyWallSegments {
        /// Open list size when the run stopped
        segments: usize,
        /// Configured maximum
        limit: usize,
    },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBuildings => write!(f, "No buildings found"),
            Self::NoValidStart => write!(f, "No valid start node"),
            Self::OpenListExhausted => write!(
                f,
                "No wall found: buildings touch the map edge or are sealed off by rock"
            ),
            Self::NoConnectedCandidate => {
                write!(f, "No wall found: no connected expansion candidate left")
            }
            Self::TooManyWallSegments { segments, limit } => {
                write!(f, "Too many wall segments ({segments}, limit {limit})")
            }
        }
    }
}

/// Result of a driver call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The run is still searching
    Continue,
    /// The run ended without a wall; the grid holds no wall cells
    Failed(FailureReason),
    /// The wall was written to the grid; carries its segment count
    Finished(usize),
}

impl RunStatus {
    /// Whether the run has ended
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// Lifecycle of a synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynthesisState {
    /// No run in progress
    #[default]
    Idle,
    /// Locating the start node and snapshotting the grid
    Initializing,
    /// Waiting for the next step
    Stepping,
    /// Checking the frontier against the wall criteria
    Evaluating,
    /// The wall has been committed
    Finished,
}

impl SynthesisState {
    /// Lowercase name used in error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::Stepping => "stepping",
            Self::Evaluating => "evaluating",
            Self::Finished => "finished",
        }
    }
}

/// Counters describing the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SynthesisStats {
    /// Expansions performed
    pub steps: usize,
    /// Expanded nodes
    pub interior: usize,
    /// Nodes on the open list
    pub frontier: usize,
    /// Size of the best wall found so far
    pub best: Option<usize>,
}

impl fmt::Display for SynthesisStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} steps, interior {}, frontier {}",
            self.steps, self.interior, self.frontier
        )?;
        if let Some(best) = self.best {
            write!(f, ", best wall {best}")?;
        }
        Ok(())
    }
}

/// Incremental best-first wall builder
///
/// Grows an interior region outward from the center of the buildings. The
/// open list around that region is the wall under construction; once it
/// encloses every building, keeps clear of the start node and forms a simple
/// chain, it is recorded. After `future_steps` further valid steps the
/// smallest recorded wall is written to the host.
///
/// One [`step`](Self::step) performs one expansion followed by a full-grid
/// cost rescan, so the caller decides the pace (single-step, per-tick budget
/// or run to completion).
#[derive(Debug, Clone)]
pub struct WallSynthesizer {
    config: WallConfig,
    state: SynthesisState,
    nodes: Option<NodeField>,
    frontier: Frontier,
    start: Option<[usize; 2]>,
    remaining_lookahead: usize,
    steps: usize,
}

impl WallSynthesizer {
    /// Create an idle synthesizer
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn new(config: WallConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: SynthesisState::Idle,
            nodes: None,
            frontier: Frontier::new(0, 0),
            start: None,
            remaining_lookahead: config.future_steps,
            steps: 0,
        })
    }

    /// Configuration used for every run
    pub const fn config(&self) -> &WallConfig {
        &self.config
    }

    /// Current lifecycle state
    pub const fn state(&self) -> SynthesisState {
        self.state
    }

    /// Expansions performed in the current run
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Start node of the current run
    pub const fn start_position(&self) -> Option<[usize; 2]> {
        self.start
    }

    /// Node snapshot of the current run
    pub const fn nodes(&self) -> Option<&NodeField> {
        self.nodes.as_ref()
    }

    /// Open list in its current order
    pub fn open_positions(&self) -> &[[usize; 2]] {
        self.frontier.open()
    }

    /// Expanded nodes in expansion order
    pub fn closed_positions(&self) -> &[[usize; 2]] {
        self.frontier.closed()
    }

    /// Smallest valid wall found so far
    pub fn best_snapshot(&self) -> Option<&[[usize; 2]]> {
        self.frontier.best_snapshot()
    }

    /// Counters for the current run
    pub fn stats(&self) -> SynthesisStats {
        SynthesisStats {
            steps: self.steps,
            interior: self.frontier.closed().len(),
            frontier: self.frontier.open_len(),
            best: self.frontier.best_snapshot().map(<[[usize; 2]]>::len),
        }
    }

    /// Start a new run and perform its first step
    ///
    /// Buildings and the start node are located before the host is touched,
    /// so the two precondition failures leave the grid exactly as it was.
    /// Otherwise walls from earlier runs are reverted to grass first.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects a coordinate inside its own bounds
    pub fn initialize<H: TileHost + ?Sized>(&mut self, host: &mut H) -> Result<RunStatus> {
        self.clear_run();
        self.state = SynthesisState::Initializing;

        let mut buildings = Vec::new();
        for x in 0..host.width() {
            for y in 0..host.height() {
                if host.cell_type(x, y)? == CellType::Building {
                    buildings.push([x, y]);
                }
            }
        }

        let Some(bounds) = BoundingBox::around(buildings) else {
            self.state = SynthesisState::Idle;
            info!("{}", FailureReason::NoBuildings);
            return Ok(RunStatus::Failed(FailureReason::NoBuildings));
        };

        let Some(start) = Self::locate_start(host, bounds.center())? else {
            self.state = SynthesisState::Idle;
            info!("{}", FailureReason::NoValidStart);
            return Ok(RunStatus::Failed(FailureReason::NoValidStart));
        };

        self.reset(host)?;
        self.state = SynthesisState::Initializing;

        let mut nodes = NodeField::build_from_grid(host)?;
        if let Some(node) = nodes.get_mut(start) {
            node.listed = true;
            node.interior = true;
            node.neighbor_count = START_NEIGHBOR_SEED;
        }
        nodes.recompute_costs(
            start,
            self.config.min_wall_distance,
            self.config.structural_constant,
        );

        self.frontier = Frontier::new(host.width(), host.height());
        self.frontier.push_open(start);
        host.highlight(start[0], start[1], Highlight::Start);

        self.nodes = Some(nodes);
        self.start = Some(start);
        self.remaining_lookahead = self.config.future_steps;
        self.state = SynthesisState::Stepping;
        debug!(?start, ?bounds, "wall synthesis started");

        self.step(host)
    }

    /// Perform one expansion and evaluate the wall criteria
    ///
    /// # Errors
    ///
    /// Returns [`WallError::InvalidState`] unless a run is in progress, or an
    /// error if the host rejects a coordinate inside its own bounds
    pub fn step<H: TileHost + ?Sized>(&mut self, host: &mut H) -> Result<RunStatus> {
        if self.state != SynthesisState::Stepping {
            return Err(WallError::InvalidState {
                operation: "step",
                state: self.state.name(),
            });
        }

        let Some(nodes) = self.nodes.as_ref() else {
            return Err(WallError::InvalidState {
                operation: "step",
                state: "missing its node snapshot",
            });
        };

        if self.frontier.is_open_empty() {
            return self.fail(host, FailureReason::OpenListExhausted);
        }

        self.frontier.sort_open(nodes);
        let Some(next) = self.frontier.take_candidate(nodes) else {
            return self.fail(host, FailureReason::NoConnectedCandidate);
        };

        if let Some(node) = self.nodes.as_mut().and_then(|nodes| nodes.get_mut(next)) {
            node.interior = true;
        }
        host.highlight(next[0], next[1], Highlight::Closed);
        self.expand(host, next);
        self.steps += 1;
        trace!(step = self.steps, ?next, open = self.frontier.open_len(), "expanded");

        self.check_criteria(host)
    }

    /// Run up to `budget` steps, stopping early at a terminal status
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::step`]
    pub fn run_steps<H: TileHost + ?Sized>(
        &mut self,
        host: &mut H,
        budget: usize,
    ) -> Result<RunStatus> {
        let mut status = RunStatus::Continue;
        for _ in 0..budget {
            status = self.step(host)?;
            if status.is_terminal() {
                break;
            }
        }
        Ok(status)
    }

    /// Initialize unless a run is in progress, then step until the run ends
    ///
    /// Terminates because every step closes a distinct node.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::initialize`] and [`Self::step`]
    pub fn run_to_completion<H: TileHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<RunStatus> {
        let mut status = if self.state == SynthesisState::Stepping {
            RunStatus::Continue
        } else {
            self.initialize(host)?
        };
        while status == RunStatus::Continue {
            status = self.step(host)?;
        }
        Ok(status)
    }

    /// Abandon the run, clear highlights and revert every wall cell to grass
    ///
    /// Safe to call in any state and idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects a coordinate inside its own bounds
    pub fn reset<H: TileHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        Self::revert_host(host)?;
        self.clear_run();
        Ok(())
    }

    fn revert_host<H: TileHost + ?Sized>(host: &mut H) -> Result<()> {
        for x in 0..host.width() {
            for y in 0..host.height() {
                host.highlight(x, y, Highlight::None);
                if host.cell_type(x, y)? == CellType::Wall {
                    host.set_cell_type(x, y, CellType::Grass)?;
                }
            }
        }
        Ok(())
    }

    fn clear_run(&mut self) {
        self.frontier.clear();
        self.nodes = None;
        self.start = None;
        self.steps = 0;
        self.remaining_lookahead = self.config.future_steps;
        self.state = SynthesisState::Idle;
    }

    // The probe walks the diagonal from the center until it leaves the grid
    fn locate_start<H: TileHost + ?Sized>(
        host: &H,
        center: [usize; 2],
    ) -> Result<Option<[usize; 2]>> {
        let mut candidate = center;
        while candidate[0] < host.width() && candidate[1] < host.height() {
            if host.cell_type(candidate[0], candidate[1])? != CellType::Rock {
                return Ok(Some(candidate));
            }
            candidate = [candidate[0] + 1, candidate[1] + 1];
        }
        Ok(None)
    }

    fn expand<H: TileHost + ?Sized>(&mut self, host: &mut H, pos: [usize; 2]) {
        let Some(nodes) = self.nodes.as_mut() else {
            return;
        };

        for neighbor in nodes.neighbors(pos, &NEIGHBOR_OFFSETS) {
            let Some(node) = nodes.get_mut(neighbor) else {
                continue;
            };
            if !node.listed && node.cell_type != CellType::Rock {
                node.listed = true;
                self.frontier.push_open(neighbor);
                host.highlight(neighbor[0], neighbor[1], Highlight::Open);
            }
        }

        let interior = nodes.get(pos).is_some_and(|node| node.interior);
        if interior {
            for neighbor in nodes.neighbors(pos, &EDGE_OFFSETS) {
                nodes.connect(pos, neighbor);
            }
        }

        if let Some(start) = self.start {
            nodes.recompute_costs(
                start,
                self.config.min_wall_distance,
                self.config.structural_constant,
            );
        }
    }

    fn check_criteria<H: TileHost + ?Sized>(&mut self, host: &mut H) -> Result<RunStatus> {
        self.state = SynthesisState::Evaluating;
        let Some(nodes) = self.nodes.as_ref() else {
            return self.fail(host, FailureReason::OpenListExhausted);
        };

        match evaluate(
            nodes,
            &self.frontier,
            self.config.min_wall_distance,
            self.config.max_wall_tiles,
        ) {
            Verdict::Abort { segments, limit } => {
                self.fail(host, FailureReason::TooManyWallSegments { segments, limit })
            }
            Verdict::Incomplete(shortfall) => {
                trace!(?shortfall, "not a wall yet");
                self.state = SynthesisState::Stepping;
                Ok(RunStatus::Continue)
            }
            Verdict::Candidate => {
                if self.frontier.record_candidate() {
                    debug!(
                        segments = self.frontier.open_len(),
                        step = self.steps,
                        "recorded wall"
                    );
                }
                self.remaining_lookahead = self.remaining_lookahead.saturating_sub(1);
                if self.remaining_lookahead == 0 {
                    self.finish(host)
                } else {
                    self.state = SynthesisState::Stepping;
                    Ok(RunStatus::Continue)
                }
            }
        }
    }

    fn finish<H: TileHost + ?Sized>(&mut self, host: &mut H) -> Result<RunStatus> {
        let wall = self
            .frontier
            .best_snapshot()
            .map(<[[usize; 2]]>::to_vec)
            .unwrap_or_default();
        for &[x, y] in &wall {
            host.set_cell_type(x, y, CellType::Wall)?;
        }
        for x in 0..host.width() {
            for y in 0..host.height() {
                host.highlight(x, y, Highlight::None);
            }
        }

        self.state = SynthesisState::Finished;
        info!(steps = self.steps, segments = wall.len(), "wall committed");
        Ok(RunStatus::Finished(wall.len()))
    }

    // Counters and lists survive until the next initialize so callers can report them
    fn fail<H: TileHost + ?Sized>(
        &mut self,
        host: &mut H,
        reason: FailureReason,
    ) -> Result<RunStatus> {
        info!(steps = self.steps, "{reason}");
        Self::revert_host(host)?;
        self.state = SynthesisState::Idle;
        Ok(RunStatus::Failed(reason))
    }
}
