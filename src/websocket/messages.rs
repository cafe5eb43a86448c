//! WebSocket Message Types
//!
//! Defines the message types exchanged between the dashboard page and
//! the server over the interaction socket.

use serde::{Deserialize, Serialize};

use crate::chart::Figure;
use crate::dataset::District;
use crate::view::{SchoolMap, SCHOOL_MAP_SLOT};

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The district dropdown changed
    Select {
        /// Selected district name; empty or absent clears the filter
        #[serde(default)]
        value: Option<String>,
    },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
    /// A new figure for an output slot
    Figure {
        /// Page slot the figure replaces
        slot: &'static str,
        /// Selected district, null when unfiltered
        district: Option<District>,
        /// Number of schools matching the filter
        schools: usize,
        figure: Figure,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}

impl From<SchoolMap> for ServerMessage {
    fn from(map: SchoolMap) -> Self {
        ServerMessage::Figure {
            slot: SCHOOL_MAP_SLOT,
            district: map.district,
            schools: map.schools,
            figure: map.figure,
        }
    }
}
