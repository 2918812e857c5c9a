//! Overlay window lifecycle: create, tag, shape, map, hold, tear down.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::shape::ConnectionExt as _;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ClipOrdering, ConnectionExt, CreateWindowAux, PropMode, Window, WindowClass,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::opacity::OpacityScale;

/// How long the overlay stays up before the process tears it down.
pub const HOLD_DURATION: Duration = Duration::from_secs(3600);

/// Holds all interned atoms the overlay needs
#[derive(Debug)]
pub struct Atoms {
    pub net_wm_window_type: Atom,
    pub net_wm_window_type_desktop: Atom,
    pub net_wm_window_opacity: Atom,
}

impl Atoms {
    /// Intern all required atoms
    pub fn new<C: Connection>(conn: &C) -> Result<Self> {
        // Helper to intern a single atom
        let intern = |name: &str| -> Result<Atom> {
            Ok(conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
        };

        Ok(Self {
            net_wm_window_type: intern("_NET_WM_WINDOW_TYPE")?,
            net_wm_window_type_desktop: intern("_NET_WM_WINDOW_TYPE_DESKTOP")?,
            net_wm_window_opacity: intern("_NET_WM_WINDOW_OPACITY")?,
        })
    }
}

/// A mapped full-screen overlay window. Owns its X11 connection; dropping it
/// destroys the window and closes the connection on every exit path.
pub struct Overlay {
    conn: RustConnection,
    window: Window,
}

impl Overlay {
    /// Connect to the X server and put up the overlay with the given opacity.
    ///
    /// Connection failure is the one error with no cleanup to do; everything
    /// after it aborts on first error with the window reclaimed by Drop.
    pub fn create(opacity: u32) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)
            .context("Failed to connect to X server")?;

        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let width = screen.width_in_pixels;
        let height = screen.height_in_pixels;
        info!("Connected to X server, screen {}, root window {}", screen_num, root);
        info!("Screen size: {}x{}", width, height);

        // Full-screen, undecorated, unmanaged by the WM
        let window = conn.generate_id()?;
        conn.create_window(
            screen.root_depth,
            window,
            root,
            0,
            0,
            width,
            height,
            0,
            WindowClass::INPUT_OUTPUT,
            0,
            &CreateWindowAux::new()
                .override_redirect(1)
                .background_pixel(screen.black_pixel),
        )
        .context("Failed to create overlay window")?;

        let atoms = Atoms::new(&conn)?;

        // Desktop type keeps the overlay as background-level, non-focusable chrome
        conn.change_property32(
            PropMode::REPLACE,
            window,
            atoms.net_wm_window_type,
            AtomEnum::ATOM,
            &[atoms.net_wm_window_type_desktop],
        )
        .context("Failed to set window type")?;

        // The compositor alpha-blends the window against whatever is beneath it
        conn.change_property32(
            PropMode::REPLACE,
            window,
            atoms.net_wm_window_opacity,
            AtomEnum::CARDINAL,
            &[opacity],
        )
        .context("Failed to set window opacity")?;
        debug!("Overlay window 0x{:x}, opacity 0x{:08x}", window, opacity);

        // Empty input shape so pointer and keyboard events pass through to
        // the windows beneath. Missing extension is not fatal; the overlay
        // just stays input-opaque.
        if Self::have_shape(&conn)? {
            use x11rb::protocol::shape::{SK, SO};

            conn.shape_rectangles(
                SO::SET,
                SK::INPUT,
                ClipOrdering::UNSORTED,
                window,
                0,
                0,
                &[],
            )
            .context("Failed to clear input shape")?;
        } else {
            warn!("Shape extension unavailable; overlay will block clicks");
        }

        conn.map_window(window).context("Failed to map overlay window")?;
        conn.flush()?;

        // Round-trip so the map has been processed before the hold begins
        conn.get_input_focus()?
            .reply()
            .context("Failed to sync with X server")?;

        Ok(Self { conn, window })
    }

    /// Detect the Shape extension
    fn have_shape(conn: &RustConnection) -> Result<bool> {
        let extension = conn.query_extension(b"SHAPE")?;
        if let Ok(reply) = extension.reply() {
            if reply.present {
                if let Ok(version) = conn.shape_query_version()?.reply() {
                    debug!(
                        "Shape extension version: {}.{}",
                        version.major_version, version.minor_version
                    );
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Block for the overlay's entire visible lifetime.
    pub fn hold(&self, duration: Duration) {
        debug!("Holding overlay for {:?}", duration);
        std::thread::sleep(duration);
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        let _ = self.conn.destroy_window(self.window);
        let _ = self.conn.flush();
    }
}

/// Shared entry point for both dimmer binaries: resolve the effective level,
/// put up the overlay, hold for an hour, tear down.
///
/// Connecting is the first fallible step, so an unreachable display reports
/// the error and exits with status 1 before any window exists; stdout stays
/// silent on the success path.
pub fn run(scale: OpacityScale, level_arg: Option<i64>) -> Result<()> {
    let level = match level_arg {
        Some(raw) => scale.clamp_level(raw),
        None => scale.default_level(),
    };
    let opacity = scale.opacity(level);
    info!(
        "Darkness level {} of {} (opacity 0x{:08x})",
        level,
        scale.max_level(),
        opacity
    );

    let overlay = Overlay::create(opacity)?;
    overlay.hold(HOLD_DURATION);

    info!("Hold period over, tearing down overlay");
    Ok(())
}
