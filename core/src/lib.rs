#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pixel Rail engine.
//!
//! This crate defines the message surface that connects drivers, the
//! authoritative state, and pure systems. Drivers submit [`Command`] values
//! describing desired actions, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing exactly
//! what happened. The generator and validator systems consume grids and
//! decks built from the leaf types declared here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Pixel Rail.";

/// Commands that express every permissible action on a running level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Launches the shooter at the head of the given deck queue.
    LaunchFromQueue {
        /// Zero-based index of the deck queue to draw from.
        queue: usize,
    },
    /// Relaunches the shooter parked in the given waiting slot.
    LaunchFromWaiting {
        /// Zero-based index of the waiting slot to draw from.
        slot: usize,
    },
    /// Launches one shooter following the fresh-before-recycled policy.
    AutoLaunch,
    /// Advances the simulation by exactly one discrete step.
    Tick,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that a shooter entered the rail.
    ShooterLaunched {
        /// Shooter that now travels the rail.
        shooter: ShooterId,
        /// Where the shooter was drawn from.
        source: LaunchSource,
    },
    /// Reports that a launch request could not be honoured.
    LaunchRejected {
        /// Source named by the request.
        source: LaunchSource,
        /// Specific reason the launch failed.
        reason: LaunchError,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick counter after the advance.
        tick: u64,
    },
    /// Confirms that a shooter cleared a pixel matching its color.
    PixelRemoved {
        /// Shooter that fired.
        shooter: ShooterId,
        /// Cell that was emptied.
        cell: CellCoord,
        /// Color of the removed pixel.
        color: Color,
    },
    /// Reports that a shooter's ray met a pixel of a different color.
    ShooterBlocked {
        /// Shooter whose ray was blocked.
        shooter: ShooterId,
        /// First filled cell on the ray.
        cell: CellCoord,
        /// Color of the blocking pixel.
        color: Color,
    },
    /// Reports that a shooter finished a full lap of the rail.
    LapCompleted {
        /// Shooter that completed the lap.
        shooter: ShooterId,
        /// Where the shooter went afterwards.
        outcome: LapOutcome,
    },
    /// Announces that the last pixel left the grid.
    GridCleared,
}

/// Location a launch draws its shooter from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaunchSource {
    /// A deck queue addressed by index.
    Queue {
        /// Zero-based queue index.
        index: usize,
    },
    /// A waiting slot addressed by index.
    Waiting {
        /// Zero-based slot index.
        index: usize,
    },
    /// The automatic launch policy; only reported when it launches nothing.
    Auto,
}

/// Reasons a launch request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaunchError {
    /// The rail already carries as many shooters as its capacity allows.
    RailFull,
    /// The addressed queue or slot holds no shooter.
    EmptySource,
    /// The addressed queue or slot does not exist.
    UnknownSource,
    /// Neither the deck nor the waiting area holds a shooter.
    NothingToLaunch,
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RailFull => write!(f, "rail is at capacity"),
            Self::EmptySource => write!(f, "source holds no shooter"),
            Self::UnknownSource => write!(f, "source does not exist"),
            Self::NothingToLaunch => write!(f, "no shooter is available"),
        }
    }
}

/// Destination of a shooter that completed a lap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LapOutcome {
    /// The shooter ran out of ammo and left the game.
    Discarded,
    /// The shooter still had ammo and moved into a waiting slot.
    Parked {
        /// Slot the shooter now occupies.
        slot: usize,
    },
    /// The shooter still had ammo but every waiting slot was taken.
    Stalled,
}

/// Behaviour of a shooter whose ray meets a pixel of another color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Hold fire at that position and keep checking later positions.
    #[default]
    SkipAndContinue,
    /// Stop firing for the remainder of the current lap.
    DryForLap,
}

/// Closed palette of pixel and shooter colors.
///
/// The declaration order defines the total order used for deterministic
/// iteration.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Red pixels.
    Red,
    /// Orange pixels.
    Orange,
    /// Yellow pixels.
    Yellow,
    /// Green pixels.
    Green,
    /// Cyan pixels.
    Cyan,
    /// Blue pixels.
    Blue,
    /// Purple pixels.
    Purple,
    /// Pink pixels.
    Pink,
    /// White pixels.
    White,
    /// Black pixels.
    Black,
}

impl Color {
    /// Every palette entry in canonical order.
    pub const ALL: [Color; 10] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Cyan,
        Color::Blue,
        Color::Purple,
        Color::Pink,
        Color::White,
        Color::Black,
    ];

    /// Position of the color within [`Color::ALL`].
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a palette entry by its canonical index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lower-case display name of the color.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Cyan => "cyan",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cardinal directions a shooter can fire in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

/// Edge of the grid a rail position runs along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RailSide {
    /// Above the first row, firing south.
    Top,
    /// Right of the last column, firing west.
    Right,
    /// Below the last row, firing north.
    Bottom,
    /// Left of the first column, firing east.
    Left,
}

impl RailSide {
    /// Direction a shooter on this side fires in.
    #[must_use]
    pub const fn inward(self) -> Direction {
        match self {
            Self::Top => Direction::South,
            Self::Right => Direction::West,
            Self::Bottom => Direction::North,
            Self::Left => Direction::East,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighboring cell one step in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant;
    /// upper bounds are the caller's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

/// Unique identifier assigned to a shooter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShooterId(u32);

impl ShooterId {
    /// Creates a new shooter identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// A shooter: identity, color and the rounds it has left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shooter {
    id: ShooterId,
    color: Color,
    ammo: u32,
}

impl Shooter {
    /// Creates a shooter carrying `ammo` rounds of `color`.
    #[must_use]
    pub const fn new(id: ShooterId, color: Color, ammo: u32) -> Self {
        Self { id, color, ammo }
    }

    /// Identifier assigned when the shooter was created.
    #[must_use]
    pub const fn id(&self) -> ShooterId {
        self.id
    }

    /// Color of pixels this shooter can remove.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Rounds remaining.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Reports whether the shooter has run dry of ammo.
    #[must_use]
    pub const fn is_spent(&self) -> bool {
        self.ammo == 0
    }

    /// Consumes one round, returning `false` when none were left.
    pub fn spend_round(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }
}
