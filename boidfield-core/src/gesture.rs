use crate::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressState {
    Idle,
    Pending { origin: Vector2D, deadline: f64 },
    Fired,
    Canceled,
}

/// Press-and-hold detector driven by the tick clock instead of a timer.
///
/// A press arms it; moving past `slop` pixels or releasing before the
/// deadline cancels it; the first `poll` at or after the deadline fires once.
#[derive(Debug, Clone)]
pub struct LongPress {
    state: PressState,
    duration: f64,
    slop: f64,
}

impl LongPress {
    pub fn new(duration: f64, slop: f64) -> Self {
        Self {
            state: PressState::Idle,
            duration,
            slop,
        }
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    pub fn press(&mut self, origin: Vector2D, now: f64) {
        self.state = PressState::Pending {
            origin,
            deadline: now + self.duration,
        };
    }

    pub fn moved(&mut self, position: Vector2D) {
        if let PressState::Pending { origin, .. } = self.state {
            if origin.distance(&position) > self.slop {
                self.state = PressState::Canceled;
            }
        }
    }

    pub fn release(&mut self) {
        if let PressState::Pending { .. } = self.state {
            self.state = PressState::Canceled;
        }
    }

    pub fn poll(&mut self, now: f64) -> Option<Vector2D> {
        match self.state {
            PressState::Pending { origin, deadline } if now >= deadline => {
                self.state = PressState::Fired;
                Some(origin)
            }
            _ => None,
        }
    }
}
