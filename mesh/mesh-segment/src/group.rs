//! Triangle groups and the region decision table.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::vertex::VertexRegion;

/// The part of the tube a source triangle is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TriangleGroup {
    /// Start cap, drawn once at frame 0.
    Start,
    /// Repeating unit, drawn once per segment.
    Middle,
    /// End cap, drawn once at the last frame.
    End,
}

impl TriangleGroup {
    /// Groups in source-buffer order.
    pub const BUFFER_ORDER: [Self; 3] = [Self::Middle, Self::Start, Self::End];

    /// How many segment lengths the authored geometry of this group sits
    /// past the segment origin.
    #[must_use]
    pub fn segment_offset(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Middle => 1.0,
            Self::End => 2.0,
        }
    }

    /// Classify a triangle from the regions its vertices touch.
    ///
    /// | A | B | C | group  |
    /// |---|---|---|--------|
    /// | ✓ | ✓ |   | Start  |
    /// | ✓ |   |   | Start  |
    /// |   | ✓ | ✓ | End    |
    /// |   |   | ✓ | End    |
    /// |   | ✓ |   | Middle |
    ///
    /// Every other combination returns `None`.
    #[must_use]
    pub fn classify(touches: RegionTouches) -> Option<Self> {
        match (touches.start, touches.seam, touches.end) {
            (true, _, false) => Some(Self::Start),
            (false, _, true) => Some(Self::End),
            (false, true, false) => Some(Self::Middle),
            _ => None,
        }
    }
}

impl fmt::Display for TriangleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        })
    }
}

/// Which regions the three vertices of a triangle touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionTouches {
    /// Some vertex is in region A.
    pub start: bool,
    /// Some vertex is in region B.
    pub seam: bool,
    /// Some vertex is in region C.
    pub end: bool,
}

impl RegionTouches {
    /// Collect touches from a set of vertex regions.
    #[must_use]
    pub fn from_regions(regions: impl IntoIterator<Item = VertexRegion>) -> Self {
        regions
            .into_iter()
            .fold(Self::default(), |mut touches, region| {
                match region {
                    VertexRegion::Start => touches.start = true,
                    VertexRegion::Seam => touches.seam = true,
                    VertexRegion::End => touches.end = true,
                }
                touches
            })
    }
}

impl fmt::Display for RegionTouches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: Vec<String> = [
            (self.start, VertexRegion::Start),
            (self.seam, VertexRegion::Seam),
            (self.end, VertexRegion::End),
        ]
        .iter()
        .filter(|(touched, _)| *touched)
        .map(|(_, region)| region.to_string())
        .collect();

        if letters.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&letters.join("+"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touches(start: bool, seam: bool, end: bool) -> RegionTouches {
        RegionTouches { start, seam, end }
    }

    #[test]
    fn decision_table() {
        assert_eq!(TriangleGroup::classify(touches(true, true, false)), Some(TriangleGroup::Start));
        assert_eq!(TriangleGroup::classify(touches(true, false, false)), Some(TriangleGroup::Start));
        assert_eq!(TriangleGroup::classify(touches(false, true, true)), Some(TriangleGroup::End));
        assert_eq!(TriangleGroup::classify(touches(false, false, true)), Some(TriangleGroup::End));
        assert_eq!(TriangleGroup::classify(touches(false, true, false)), Some(TriangleGroup::Middle));
    }

    #[test]
    fn unmatched_patterns() {
        assert_eq!(TriangleGroup::classify(touches(true, false, true)), None);
        assert_eq!(TriangleGroup::classify(touches(true, true, true)), None);
        assert_eq!(TriangleGroup::classify(touches(false, false, false)), None);
    }

    #[test]
    fn touches_from_regions() {
        let t = RegionTouches::from_regions([
            VertexRegion::Start,
            VertexRegion::Start,
            VertexRegion::Seam,
        ]);
        assert_eq!(t, touches(true, true, false));
        assert_eq!(t.to_string(), "A+B");
        assert_eq!(RegionTouches::default().to_string(), "none");
    }

    #[test]
    fn segment_offsets() {
        assert_eq!(TriangleGroup::Start.segment_offset(), 0.0);
        assert_eq!(TriangleGroup::Middle.segment_offset(), 1.0);
        assert_eq!(TriangleGroup::End.segment_offset(), 2.0);
    }
}
