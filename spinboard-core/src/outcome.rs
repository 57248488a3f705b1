use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentColor {
    Green,
    Red,
    Black,
}

/// One wheel segment: the label reported to the scoring service and its
/// display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub label: &'static str,
    pub color: SegmentColor,
}

const fn segment(label: &'static str, color: SegmentColor) -> Segment {
    Segment { label, color }
}

pub const WHEEL_SIZE: usize = 16;

/// Segments in wheel order.
pub const WHEEL: [Segment; WHEEL_SIZE] = [
    segment("0", SegmentColor::Green),
    segment("32", SegmentColor::Red),
    segment("15", SegmentColor::Black),
    segment("19", SegmentColor::Red),
    segment("4", SegmentColor::Black),
    segment("21", SegmentColor::Red),
    segment("2", SegmentColor::Black),
    segment("25", SegmentColor::Red),
    segment("17", SegmentColor::Black),
    segment("34", SegmentColor::Red),
    segment("6", SegmentColor::Black),
    segment("27", SegmentColor::Red),
    segment("13", SegmentColor::Black),
    segment("36", SegmentColor::Red),
    segment("11", SegmentColor::Black),
    segment("30", SegmentColor::Red),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub index: usize,
    pub value: String,
}

impl Outcome {
    pub fn from_index(index: usize) -> Option<Self> {
        WHEEL.get(index).map(|segment| Self {
            index,
            value: segment.label.to_string(),
        })
    }

    /// Wheel segment for this outcome, `None` if `index` is off the wheel.
    pub fn segment(&self) -> Option<Segment> {
        WHEEL.get(self.index).copied()
    }
}

/// Anything able to decide where the wheel lands.
pub trait OutcomeSource: Send + Sync {
    fn next(&self) -> Outcome;
}

/// Uniform draw over the wheel using the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOutcomes;

impl OutcomeSource for RandomOutcomes {
    fn next(&self) -> Outcome {
        let index = rand::thread_rng().gen_range(0..WHEEL_SIZE);
        Outcome {
            index,
            value: WHEEL[index].label.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_outcomes_match_catalog() {
        let source = RandomOutcomes;
        for _ in 0..1000 {
            let outcome = source.next();
            assert!(outcome.index < WHEEL_SIZE);
            assert_eq!(outcome.value, WHEEL[outcome.index].label);
        }
    }

    #[test]
    fn test_from_index() {
        let outcome = Outcome::from_index(5).unwrap();
        assert_eq!(outcome.value, "21");
        assert_eq!(outcome.segment().unwrap().color, SegmentColor::Red);
        assert_eq!(
            Outcome::from_index(0).unwrap().segment().unwrap().color,
            SegmentColor::Green
        );
        assert!(Outcome::from_index(WHEEL_SIZE).is_none());
    }

    #[test]
    fn test_deserialized_outcome_off_the_wheel() {
        let outcome: Outcome = serde_json::from_str(r#"{"index":16,"value":"99"}"#).unwrap();
        assert!(outcome.segment().is_none());
    }
}
