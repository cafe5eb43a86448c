//! WebSocket Interaction Channel
//!
//! Carries the district filter between the dashboard page and its
//! server-side view session.
//!
//! ## Architecture
//!
//! - **SessionHub**: Tracks open sessions and delivers messages to them
//! - **Handler**: Handles WebSocket upgrade and runs one `ViewSession` per connection
//! - **Messages**: Defines client and server message formats
//!
//! ## Protocol
//!
//! On connect the server sends `connected` followed by a `figure` for the
//! unfiltered school map. Each `select` naming a district (or clearing the
//! filter with an empty value) is answered with a new `figure`; unknown
//! district names are ignored.
//!
//! ## Example
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:8050/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'select', value: 'Mitte'}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'figure') Plotly.react(msg.slot, msg.figure);
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{HubConfig, HubError, SessionHub, SessionStats};
pub use messages::{ClientMessage, ServerMessage};
