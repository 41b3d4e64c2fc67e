//! Seat identifiers on floats.
//!
//! A seat assignment stores its seat as a string: either a plain seat number
//! (`"12"`, occupied by the member of the assignment) or a seat number plus
//! the id of one of the member's relatives (`"12_p7"`). [`SeatRef`] parses and
//! prints that encoding; [`Occupant`] is the person it resolves to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who sits in a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "id")]
pub enum Occupant {
    /// The member (socio) of the assignment
    #[serde(rename = "socio")]
    Member(i64),
    /// A relative (pariente) of that member
    #[serde(rename = "pariente")]
    Relative(i64),
}

/// Parsed form of the stored `sitio` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatRef {
    pub seat: u32,
    pub relative: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identificador de sitio inválido: {0:?}")]
pub struct SeatParseError(pub String);

impl SeatRef {
    pub fn member(seat: u32) -> Self {
        Self { seat, relative: None }
    }

    pub fn relative(seat: u32, pariente_id: i64) -> Self {
        Self {
            seat,
            relative: Some(pariente_id),
        }
    }

    /// Resolve the occupant given the member that owns the assignment
    pub fn occupant(&self, socio_id: i64) -> Occupant {
        match self.relative {
            Some(pariente_id) => Occupant::Relative(pariente_id),
            None => Occupant::Member(socio_id),
        }
    }
}

impl FromStr for SeatRef {
    type Err = SeatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SeatParseError(s.to_string());
        let s_trim = s.trim();
        match s_trim.split_once("_p") {
            Some((seat, pariente)) => {
                let seat = seat.parse::<u32>().map_err(|_| err())?;
                let pariente = pariente.parse::<i64>().map_err(|_| err())?;
                Ok(SeatRef::relative(seat, pariente))
            }
            None => s_trim.parse::<u32>().map(SeatRef::member).map_err(|_| err()),
        }
    }
}

impl fmt::Display for SeatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relative {
            Some(pariente_id) => write!(f, "{}_p{}", self.seat, pariente_id),
            None => write!(f, "{}", self.seat),
        }
    }
}
