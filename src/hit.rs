//! Hit-testing against media objects and their corner handles.
//!
//! Strokes are never hit: they are non-evented by construction, and the
//! test only considers objects whose `evented` flag is set.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{DocStore, ObjectId};
use crate::geom::{Point, Rect};

/// Which part of an object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Corner(Corner),
}

/// Corner handle positions. Edge and rotate handles do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Nw,
    Ne,
    Se,
    Sw,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Se, Corner::Sw];

    /// Location of this corner on `rect`.
    #[must_use]
    pub fn of(self, rect: &Rect) -> Point {
        let [nw, ne, se, sw] = rect.corners();
        match self {
            Self::Nw => nw,
            Self::Ne => ne,
            Self::Se => se,
            Self::Sw => sw,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Corner {
        match self {
            Self::Nw => Self::Se,
            Self::Ne => Self::Sw,
            Self::Se => Self::Nw,
            Self::Sw => Self::Ne,
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Find what lies under `pt`.
///
/// The selected object's corner handles are checked first so a handle that
/// overlaps another object still wins. Bodies are checked top-most first.
#[must_use]
pub fn hit_test(pt: Point, doc: &DocStore, selected_id: Option<ObjectId>) -> Option<Hit> {
    if let Some(sel) = selected_id.and_then(|id| doc.get(&id)) {
        if sel.evented && sel.controls.corners {
            let bounds = sel.bounds();
            for corner in Corner::ALL {
                if corner.of(&bounds).distance(pt) <= HANDLE_RADIUS_PX {
                    return Some(Hit { object_id: sel.id, part: HitPart::Corner(corner) });
                }
            }
        }
    }

    doc.objects()
        .iter()
        .rev()
        .filter(|o| o.evented && o.kind.is_media())
        .find(|o| o.bounds().contains(pt))
        .map(|o| Hit { object_id: o.id, part: HitPart::Body })
}
