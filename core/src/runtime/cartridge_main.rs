//! Default entry point: validate and identify the boot ROM and game ROM.

use gbhost_shared::cartridge::{self, CartridgeHeader};
use gbhost_shared::PROGRAM_NAME;

use super::{EXIT_FAILURE, EXIT_SUCCESS, EntryPoint, OutputSink};
use crate::vfs::Vfs;

/// Entry point taking `[boot_rom_file] [game_rom_file]`.
///
/// Reads both files from the runtime filesystem, checks the boot ROM size,
/// parses the game's cartridge header, and reports what it found. Lines
/// meant for the page start with `"`; everything else is diagnostic.
#[derive(Debug, Default)]
pub struct CartridgeMain {
    header: Option<CartridgeHeader>,
}

impl CartridgeMain {
    /// Create the entry point
    pub fn new() -> Self {
        Self::default()
    }

    /// Header of the game ROM from the last successful run
    pub fn header(&self) -> Option<&CartridgeHeader> {
        self.header.as_ref()
    }
}

impl EntryPoint for CartridgeMain {
    fn main(&mut self, fs: &Vfs, args: &[String], out: &dyn OutputSink) -> i32 {
        let [boot_name, game_name, ..] = args else {
            out.print_err(&format!(
                "Usage: {} [boot_rom_file] [game_rom_file]",
                PROGRAM_NAME
            ));
            return EXIT_FAILURE;
        };

        let Some(boot_rom) = read_rom(fs, boot_name, out) else {
            return EXIT_FAILURE;
        };
        if let Err(e) = cartridge::validate_boot_rom(boot_rom) {
            out.print_err(&format!("{}: {}", boot_name, e));
            return EXIT_FAILURE;
        }

        let Some(game_rom) = read_rom(fs, game_name, out) else {
            return EXIT_FAILURE;
        };
        let header = match CartridgeHeader::parse(game_rom) {
            Ok(header) => header,
            Err(e) => {
                out.print_err(&format!("{}: {}", game_name, e));
                return EXIT_FAILURE;
            }
        };

        let title = if header.title.is_empty() {
            "(untitled)"
        } else {
            header.title.as_str()
        };

        out.print(&format!("\"Boot ROM;{} bytes", boot_rom.len()));
        out.print(&format!("\"Cartridge;{}", title));
        out.print(&format!("\"ROM size;{} KiB", header.rom_size / 1024));
        out.print(&format!(
            "cartridge type 0x{:02X} ({}), header checksum 0x{:02X} ({})",
            header.cartridge_type,
            header.cartridge_type_name().unwrap_or("unknown"),
            header.header_checksum,
            if header.checksum_valid { "ok" } else { "mismatch" }
        ));
        if game_rom.len() != header.rom_size {
            out.print_err(&format!(
                "{}: file is {} bytes but header declares {}",
                game_name,
                game_rom.len(),
                header.rom_size
            ));
        }

        self.header = Some(header);
        EXIT_SUCCESS
    }
}

fn read_rom<'a>(fs: &'a Vfs, name: &str, out: &dyn OutputSink) -> Option<&'a [u8]> {
    match fs.read(name) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            out.print_err(&format!("{}: {}", name, e.reason()));
            None
        }
    }
}
