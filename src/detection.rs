use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltwh};

/// Object class id for people, the only class this pipeline consumes.
pub const PERSON_CLASS: i32 = 0;

/// Contains (x,y) of the left-top corner and (width,height) of the bbox
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(rename = "p")]
    pub confidence: f32,
    #[serde(rename = "c")]
    pub class: i32,
}

impl Detection {
    pub fn new(bbox: BBox<Ltwh>, confidence: f32, class: i32) -> Self {
        Self {
            x: bbox.left(),
            y: bbox.top(),
            w: bbox.width(),
            h: bbox.height(),
            confidence,
            class,
        }
    }

    #[inline(always)]
    pub fn bbox(&self) -> BBox<Ltwh> {
        BBox::ltwh(self.x, self.y, self.w, self.h)
    }

    pub fn iou(&self, other: &Detection) -> f32 {
        let b1_area = self.w * self.h;
        let b2_area = other.w * other.h;

        let i_xmin = self.x.max(other.x);
        let i_xmax = (self.x + self.w).min(other.x + other.w);
        let i_ymin = self.y.max(other.y);
        let i_ymax = (self.y + self.h).min(other.y + other.h);
        let i_area = (i_xmax - i_xmin).max(0.) * (i_ymax - i_ymin).max(0.);

        let union = b1_area + b2_area - i_area;
        if union <= 0. {
            return 0.;
        }

        i_area / union
    }
}
