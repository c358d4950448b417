use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::reading::timestamp_format;

/// A station as listed on the upstream directory page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Station {
    /// Identifier used in the `x=` query of the station pages
    #[validate(length(min = 1))]
    pub id: String,

    /// Display name, also the station column of every reading
    #[validate(length(min = 1))]
    pub name: String,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Latest reading time seen for a station, one row of the status file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationStatus {
    #[serde(rename = "estacion")]
    pub station: String,

    #[serde(rename = "fecha_ultima_actualizacion", with = "timestamp_format")]
    pub last_update: DateTime<FixedOffset>,
}

impl StationStatus {
    pub fn new(station: impl Into<String>, last_update: DateTime<FixedOffset>) -> Self {
        Self {
            station: station.into(),
            last_update,
        }
    }
}
