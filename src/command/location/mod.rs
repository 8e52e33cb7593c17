//! ### Assisted location (extended command set)
//!
//! `#AGPSSND` asks the network for a position fix. The result arrives later
//! as the `#AGPSRING` unsolicited result code.
use atat::atat_derive::AtatCmd;

use super::NoResponse;
use crate::error::Error;
use crate::scan::Scanner;

/// Status code of a successful fix.
pub const LOCATION_OK: u16 = 200;

/// Position fix in decimal degrees, altitude in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Location {
    pub latitude: f32,
    pub longitude: f32,
    pub altitude: f32,
}

/// Content of one `#AGPSRING` report.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocationReport {
    pub status: u16,
    pub location: Option<Location>,
}

/// Assisted location request #AGPSSND
#[derive(Clone, AtatCmd)]
#[at_cmd("#AGPSSND", NoResponse, timeout_ms = 150000)]
pub struct RequestLocation;

/// `#AGPSRING: <status>[,<lat>,<lon>,<alt>[,...]]`
pub fn parse_location_report(line: &[u8]) -> Result<LocationReport, Error> {
    let mut s = Scanner::new(line);
    s.literal("#AGPSRING: ")?;
    let status = s.int()?;
    let location = if status == LOCATION_OK {
        s.literal(",")?;
        let latitude = s.float()?;
        s.literal(",")?;
        let longitude = s.float()?;
        s.literal(",")?;
        let altitude = s.float()?;
        Some(Location {
            latitude,
            longitude,
            altitude,
        })
    } else {
        None
    };
    Ok(LocationReport { status, location })
}
