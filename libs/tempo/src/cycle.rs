use crate::time::Time;

/// Timing of one scheduling tick, handed to every module's `process`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cycle {
    current_time: Time,
    previous_time: Time,
}

impl Cycle {
    pub fn new(current_time: Time, previous_time: Time) -> Self {
        Cycle {
            current_time,
            previous_time,
        }
    }

    pub fn update_time(&self) -> Time {
        self.current_time
    }

    pub fn previous_time(&self) -> Time {
        self.previous_time
    }

    pub fn update_dt(&self) -> Time {
        self.current_time - self.previous_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dt() {
        let cycle = Cycle::new(Time::new(1.5), Time::new(1.0));
        assert_eq!(cycle.update_dt(), Time::new(0.5));
        assert_eq!(cycle.update_time(), Time::new(1.5));
        assert_eq!(cycle.previous_time(), Time::new(1.0));
    }
}
