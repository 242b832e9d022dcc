//! Viewport width and scoped resize subscriptions.
//!
//! The event loop owns a `ViewportSource` and pushes every new width into it.
//! A mounted view holds exactly one `ResizeSubscription`; dropping the view
//! drops the subscription, which releases the listener.

use tokio::sync::watch;

/// Below this width (in px) views switch to their compact layout.
pub const COMPACT_BREAKPOINT_PX: u32 = 900;

/// Horizontal size of one terminal cell, in px, for breakpoint purposes.
pub const CELL_WIDTH_PX: u32 = 8;

/// Terminal width in columns, expressed in px.
pub fn width_px_from_columns(columns: u16) -> u32 {
    u32::from(columns) * CELL_WIDTH_PX
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Compact,
    Wide,
}

impl SizeClass {
    pub fn from_width_px(width_px: u32) -> Self {
        if width_px < COMPACT_BREAKPOINT_PX {
            SizeClass::Compact
        } else {
            SizeClass::Wide
        }
    }

    /// Pie outer radius as a fraction of the largest radius that fits.
    pub fn pie_radius_ratio(self) -> f64 {
        match self {
            SizeClass::Compact => 0.7,
            SizeClass::Wide => 0.9,
        }
    }

    pub fn cards_per_row(self) -> usize {
        match self {
            SizeClass::Compact => 2,
            SizeClass::Wide => 4,
        }
    }
}

pub struct ViewportSource {
    width: watch::Sender<u32>,
}

impl ViewportSource {
    pub fn new(width_px: u32) -> Self {
        let (width, _rx) = watch::channel(width_px);
        Self { width }
    }

    /// Publish a new width; listeners are only woken when it actually changed.
    pub fn set_width(&self, width_px: u32) {
        self.width.send_if_modified(|w| {
            if *w == width_px {
                return false;
            }
            *w = width_px;
            true
        });
    }

    pub fn width_px(&self) -> u32 {
        *self.width.borrow()
    }

    pub fn subscribe(&self) -> ResizeSubscription {
        ResizeSubscription {
            rx: self.width.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.width.receiver_count()
    }
}

/// A live resize listener; released on drop.
pub struct ResizeSubscription {
    rx: watch::Receiver<u32>,
}

impl ResizeSubscription {
    pub fn size_class(&self) -> SizeClass {
        SizeClass::from_width_px(*self.rx.borrow())
    }

    /// The new size class if the width changed since the last call.
    pub fn changed(&mut self) -> Option<SizeClass> {
        if !self.rx.has_changed().unwrap_or(false) {
            return None;
        }
        let width = *self.rx.borrow_and_update();
        Some(SizeClass::from_width_px(width))
    }
}
