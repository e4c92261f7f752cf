//! Pointer tracking state of the overlay canvas.

/// Whether pointer movement currently drives the blend ratio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackingState {
    #[default]
    Tracking,
    Frozen,
}

/// CSS border shown for each state; the only visible sign of a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Border {
    pub style: &'static str,
    pub color: &'static str,
}

impl TrackingState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Tracking => Self::Frozen,
            Self::Frozen => Self::Tracking,
        }
    }

    pub fn accepts_pointer(self) -> bool {
        self == Self::Tracking
    }

    pub fn border(self) -> Border {
        match self {
            Self::Tracking => Border { style: "double", color: "grey" },
            Self::Frozen => Border { style: "solid", color: "blue" },
        }
    }
}

/// Horizontal pointer position as a blend ratio.
///
/// Normalised by the canvas backing width, not its CSS box, so the value can
/// overshoot `[0, 1]` slightly at the edges. The blend curves saturate there.
pub fn pointer_ratio(client_x: f64, rect_left: f64, canvas_width: u32) -> f32 {
    if canvas_width == 0 {
        return 0.5;
    }
    ((client_x - rect_left) / f64::from(canvas_width)) as f32
}
