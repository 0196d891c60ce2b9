//! Plain data row types written by output backends.

use ap_core::SimTime;
use ap_engine::{Notification, WaitingSpot};

/// `location` value of rows that have no gate, queue or slot.
pub const NO_LOCATION: u32 = u32::MAX;

/// One model notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRow {
    pub time:     f64,
    /// `entered_service`, `queued`, `held`, `diverted` or `departed`.
    pub event:    &'static str,
    pub entity:   u32,
    /// Gate index for service rows, queue or slot index for waiting rows,
    /// [`NO_LOCATION`] for diversions.
    pub location: u32,
    /// Position from the queue head; `0` for every other row.
    pub position: u32,
}

impl EventRow {
    pub fn from_notification(now: SimTime, notification: &Notification) -> Self {
        let (event, location, position) = match *notification {
            Notification::EnteredService { server, .. } => ("entered_service", server.0, 0),
            Notification::Enqueued { spot: WaitingSpot::Queue(q), position, .. } => {
                ("queued", q.0, position as u32)
            }
            Notification::Enqueued { spot: WaitingSpot::Hold(s), .. } => ("held", s.0, 0),
            Notification::Diverted { .. } => ("diverted", NO_LOCATION, 0),
            Notification::Departed { server, .. } => ("departed", server.0, 0),
        };
        Self {
            time: now.as_f64(),
            event,
            entity: notification.entity().0,
            location,
            position,
        }
    }
}
