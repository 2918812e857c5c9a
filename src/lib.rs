//! Full-screen click-through screen dimmer for X11.
//!
//! Puts up a single override-redirect, desktop-typed window covering the whole
//! screen, writes `_NET_WM_WINDOW_OPACITY` so a compositing window manager
//! blends it over everything beneath, and empties its input shape so clicks
//! pass through. Ships as two binaries differing only in darkness-level
//! granularity: `dusk` (20 linear levels) and `dusk-steps` (5 fixed steps).

pub mod opacity;
pub mod overlay;
