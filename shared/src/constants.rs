//! Centralized constants for the gbhost loader.
//!
//! Single source of truth for values shared by the loader core and the
//! launcher binary.

/// Resources fetched at startup, in fetch order.
///
/// The same list, in the same order, is the argument vector handed to the
/// runtime entry point.
pub const DEFAULT_RESOURCES: [&str; 2] = ["bootRom.gb", "tetris.gb"];

/// Directory at which fetched resources are registered in the runtime filesystem.
pub const ROOT_DIR: &str = "/";

/// Markup appended after every line written to the display buffer.
pub const LINE_BREAK: &str = "<br>";

/// Separator substituted for each run of `'` / `;` in a display line.
pub const DISPLAY_SEPARATOR: &str = " - ";

/// Base URL resources are resolved against when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

/// Program name reported in the runtime's usage message.
pub const PROGRAM_NAME: &str = "gb-emulator";
