//! Declarative fleet configuration: archetypes, itineraries, trailers.
//!
//! Everything here refers to operations by *name*.  Names are resolved to
//! [`Gate`](crate::Gate)s when a [`Vehicle`](crate::Vehicle) is built, so the
//! same specs survive a scheduler reload on variant switch.

use apron_core::Point;

// ── Archetype ─────────────────────────────────────────────────────────────────

/// Performance and map access shared by every vehicle of one kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Archetype {
    pub name: String,
    /// Grid used for outbound legs.
    pub outbound_grid: String,
    /// Grid used for the return leg.
    pub return_grid: String,
    /// Metres per second.
    pub max_speed: f32,
    /// Metres per second squared when gaining speed.
    pub acceleration: f32,
    /// Metres per second squared when shedding speed.
    pub braking: f32,
    /// Full steering authority at any speed (small robots).
    pub agile: bool,
    /// Arrival gate lead for intermediate waypoints; `None` uses the config default.
    pub gate_lead: Option<f32>,
    /// Length of the straight final approach, in apron units.
    pub straighten: f32,
    pub trailers: Vec<TrailerSpec>,
}

impl Archetype {
    /// A 2 m/s vehicle on grid `grid` with a 200-unit straight approach.
    pub fn new(name: impl Into<String>, grid: impl Into<String>) -> Self {
        let grid = grid.into();
        Self {
            name: name.into(),
            outbound_grid: grid.clone(),
            return_grid: grid,
            max_speed: 2.0,
            acceleration: 1.0,
            braking: 3.0,
            agile: false,
            gate_lead: None,
            straighten: 200.0,
            trailers: Vec::new(),
        }
    }

    pub fn with_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_return_grid(mut self, grid: impl Into<String>) -> Self {
        self.return_grid = grid.into();
        self
    }

    pub fn with_straighten(mut self, straighten: f32) -> Self {
        self.straighten = straighten;
        self
    }

    pub fn agile(mut self, gate_lead: f32) -> Self {
        self.agile = true;
        self.gate_lead = Some(gate_lead);
        self
    }

    pub fn with_trailer(mut self, trailer: TrailerSpec) -> Self {
        self.trailers.push(trailer);
        self
    }
}

// ── Trailers ──────────────────────────────────────────────────────────────────

/// One towed trailer.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailerSpec {
    /// Distance between the tow point and the trailer centre.
    pub link: f32,
    /// Heading lag factor per (m/s · s) of tow motion.
    pub responsiveness: f32,
    pub drop: Option<DropSpec>,
}

impl TrailerSpec {
    pub fn new(link: f32) -> Self {
        Self { link, responsiveness: 0.6, drop: None }
    }

    pub fn dropped(mut self, drop: DropSpec) -> Self {
        self.drop = Some(drop);
        self
    }
}

/// Detach a trailer at a service position and collect it later.
#[derive(Clone, Debug, PartialEq)]
pub struct DropSpec {
    /// Zero-based leg after whose arrival the trailer may be released.
    pub after_leg: usize,
    /// Release once this operation is ready.
    pub release: String,
    /// Reattach once this operation is completed.
    pub recall: String,
    /// Where the trailer is parked.
    pub target: Point,
    pub target_heading: f32,
    /// Seconds taken by each of the detach and reattach moves.
    pub duration: f64,
}

// ── Legs ──────────────────────────────────────────────────────────────────────

/// Which archetype grid a leg plans on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LegKind {
    #[default]
    Outbound,
    Return,
}

/// One itinerary leg.
#[derive(Clone, Debug, PartialEq)]
pub struct LegSpec {
    pub goal: Point,
    pub heading: Option<f32>,
    /// Seconds to dwell after arrival before the next leg may start.
    pub wait: f64,
    pub reverse: bool,
    /// Force position and heading onto the declared goal on arrival.
    pub snap: bool,
    /// Leg waits until this operation is ready.
    pub start_gate: Option<String>,
    /// Leg waits until this operation is completed.
    pub end_gate: Option<String>,
    pub kind: LegKind,
}

impl LegSpec {
    pub fn to(goal: Point) -> Self {
        Self {
            goal,
            heading: None,
            wait: 0.0,
            reverse: false,
            snap: true,
            start_gate: None,
            end_gate: None,
            kind: LegKind::Outbound,
        }
    }

    pub fn facing(mut self, heading: f32) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn waiting(mut self, secs: f64) -> Self {
        self.wait = secs;
        self
    }

    pub fn reversing(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn without_snap(mut self) -> Self {
        self.snap = false;
        self
    }

    pub fn when_ready(mut self, op: impl Into<String>) -> Self {
        self.start_gate = Some(op.into());
        self
    }

    pub fn when_completed(mut self, op: impl Into<String>) -> Self {
        self.end_gate = Some(op.into());
        self
    }

    pub fn returning(mut self) -> Self {
        self.kind = LegKind::Return;
        self
    }
}

// ── VehicleSpec ───────────────────────────────────────────────────────────────

/// A vehicle's starting pose and ordered itinerary.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleSpec {
    pub name: String,
    pub archetype: String,
    pub start: Point,
    pub start_heading: f32,
    pub legs: Vec<LegSpec>,
}

impl VehicleSpec {
    pub fn new(name: impl Into<String>, archetype: impl Into<String>, start: Point, start_heading: f32) -> Self {
        Self {
            name: name.into(),
            archetype: archetype.into(),
            start,
            start_heading,
            legs: Vec::new(),
        }
    }

    pub fn leg(mut self, leg: LegSpec) -> Self {
        self.legs.push(leg);
        self
    }

    /// Append the closing leg back to a depot, gated on `end_gate` completing.
    pub fn returning_to(mut self, depot: Point, end_gate: &str, reverse: bool) -> Self {
        let mut leg = LegSpec::to(depot).when_completed(end_gate).returning();
        leg.reverse = reverse;
        self.legs.push(leg);
        self
    }
}
