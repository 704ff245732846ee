/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/

/// Travel sense of an elevator. `Idle` means it has no committed direction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

/// Direction a waiting passenger wants to travel in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HallCall {
    Up,
    Down,
}

impl Direction {
    pub fn hall_call(&self) -> Option<HallCall> {
        match *self {
            Direction::Up => Some(HallCall::Up),
            Direction::Down => Some(HallCall::Down),
            Direction::Idle => None,
        }
    }
}

impl From<HallCall> for Direction {
    fn from(call: HallCall) -> Self {
        match call {
            HallCall::Up => Direction::Up,
            HallCall::Down => Direction::Down,
        }
    }
}

impl HallCall {
    /// Classifies a trip, `None` when source and target are the same floor.
    pub fn for_trip(source: u8, target: u8) -> Option<HallCall> {
        if target > source {
            Some(HallCall::Up)
        } else if target < source {
            Some(HallCall::Down)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Idle => write!(f, "idle"),
        }
    }
}

/// Point-in-time view of one elevator, published by its own worker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ElevatorStatus {
    pub id: usize,
    pub floor: u8,
    pub direction: Direction,
    pub route: Vec<u8>,
    pub boarded: u64,
}

impl ElevatorStatus {
    pub fn new(id: usize, floor: u8) -> ElevatorStatus {
        ElevatorStatus {
            id,
            floor,
            direction: Direction::Idle,
            route: Vec::new(),
            boarded: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.direction == Direction::Idle && self.route.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FloorSnapshot {
    pub floor: u8,
    pub elevators: Vec<usize>,
    pub down: BTreeSet<u8>,
    pub up: BTreeSet<u8>,
}

/// Floors are ordered from the top floor down.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BuildingSnapshot {
    pub floors: Vec<FloorSnapshot>,
    pub elevators: Vec<ElevatorStatus>,
}

impl BuildingSnapshot {
    pub fn pending_requests(&self) -> usize {
        self.floors
            .iter()
            .map(|floor| floor.down.len() + floor.up.len())
            .sum()
    }
}
