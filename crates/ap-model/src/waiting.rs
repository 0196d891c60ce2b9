//! The waiting area: either parallel FIFO queues or a pool of hold slots.

use std::collections::VecDeque;

use ap_core::{EntityId, QueueId, SlotId, WaitingConfig};
use ap_engine::WaitingSpot;

/// Entities that found every gate busy.
#[derive(Debug, Clone)]
pub enum WaitingArea {
    /// Parallel FIFO queues.  Arrivals join the shortest queue (lowest
    /// index on ties).  `capacity` bounds each queue.
    Queues {
        lanes:    Vec<VecDeque<EntityId>>,
        capacity: Option<usize>,
    },

    /// Fixed hold slots, filled first-fit by index.
    Holds {
        slots:          Vec<Option<EntityId>>,
        retry_interval: f64,
    },
}

impl WaitingArea {
    pub fn from_config(config: &WaitingConfig) -> Self {
        match *config {
            WaitingConfig::Queues { count, capacity } => WaitingArea::Queues {
                lanes: vec![VecDeque::new(); count],
                capacity,
            },
            WaitingConfig::Holds { slots, retry_interval } => WaitingArea::Holds {
                slots: vec![None; slots],
                retry_interval,
            },
        }
    }

    /// Place `entity`.  Returns the spot and its 0-based position there, or
    /// `None` when there is no room (the caller diverts the entity).
    pub fn admit(&mut self, entity: EntityId) -> Option<(WaitingSpot, usize)> {
        match self {
            WaitingArea::Queues { lanes, capacity } => {
                let (index, lane) = lanes
                    .iter_mut()
                    .enumerate()
                    .min_by_key(|(i, lane)| (lane.len(), *i))?;
                if capacity.is_some_and(|cap| lane.len() >= cap) {
                    return None;
                }
                lane.push_back(entity);
                let queue = QueueId(index as u32);
                Some((WaitingSpot::Queue(queue), lane.len() - 1))
            }
            WaitingArea::Holds { slots, .. } => {
                let index = slots.iter().position(Option::is_none)?;
                slots[index] = Some(entity);
                Some((WaitingSpot::Hold(SlotId(index as u32)), 0))
            }
        }
    }

    /// Take `entity` out of `spot`.  Returns `false` if it was not there.
    pub fn remove(&mut self, entity: EntityId, spot: WaitingSpot) -> bool {
        match (self, spot) {
            (WaitingArea::Queues { lanes, .. }, WaitingSpot::Queue(q)) => {
                let Some(lane) = lanes.get_mut(q.index()) else {
                    return false;
                };
                match lane.iter().position(|&e| e == entity) {
                    Some(pos) => lane.remove(pos).is_some(),
                    None => false,
                }
            }
            (WaitingArea::Holds { slots, .. }, WaitingSpot::Hold(s)) => match slots.get_mut(s.index()) {
                Some(slot) if *slot == Some(entity) => {
                    *slot = None;
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Every waiting entity, queues in index order and front to back, or
    /// holds in slot order.  This is also the observation order offered to
    /// a decision maker.
    pub fn entries(&self) -> Vec<(WaitingSpot, EntityId)> {
        match self {
            WaitingArea::Queues { lanes, .. } => lanes
                .iter()
                .enumerate()
                .flat_map(|(i, lane)| {
                    lane.iter().map(move |&e| (WaitingSpot::Queue(QueueId(i as u32)), e))
                })
                .collect(),
            WaitingArea::Holds { slots, .. } => slots
                .iter()
                .enumerate()
                .filter_map(|(i, slot)| slot.map(|e| (WaitingSpot::Hold(SlotId(i as u32)), e)))
                .collect(),
        }
    }

    /// Head of the queue with the most waiting entities (lowest index on
    /// ties).  `None` for holds or when every queue is empty.
    pub fn longest_queue_head(&self) -> Option<(WaitingSpot, EntityId)> {
        let WaitingArea::Queues { lanes, .. } = self else {
            return None;
        };
        let mut best: Option<(usize, &VecDeque<EntityId>)> = None;
        for (i, lane) in lanes.iter().enumerate() {
            if best.is_none_or(|(_, b)| lane.len() > b.len()) {
                best = Some((i, lane));
            }
        }
        let (index, lane) = best?;
        lane.front().map(|&e| (WaitingSpot::Queue(QueueId(index as u32)), e))
    }

    /// Number of waiting entities.
    pub fn len(&self) -> usize {
        match self {
            WaitingArea::Queues { lanes, .. } => lanes.iter().map(VecDeque::len).sum(),
            WaitingArea::Holds { slots, .. } => slots.iter().filter(|s| s.is_some()).count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of each queue (or `0`/`1` occupancy of each hold slot).
    pub fn lane_lengths(&self) -> Vec<usize> {
        match self {
            WaitingArea::Queues { lanes, .. } => lanes.iter().map(VecDeque::len).collect(),
            WaitingArea::Holds { slots, .. } => slots.iter().map(|s| s.is_some() as usize).collect(),
        }
    }

    /// Retry interval of hold slots; `None` for queues.
    pub fn retry_interval(&self) -> Option<f64> {
        match *self {
            WaitingArea::Holds { retry_interval, .. } => Some(retry_interval),
            WaitingArea::Queues { .. } => None,
        }
    }
}
