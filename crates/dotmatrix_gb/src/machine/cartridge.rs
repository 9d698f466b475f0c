const TITLE_START: usize = 0x134;
const TITLE_END: usize = 0x143;
const CARTRIDGE_TYPE: usize = 0x147;
const ROM_SIZE: usize = 0x148;
const HEADER_CHECKSUM: usize = 0x14D;

/// The fields of the cartridge header the loader reports.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CartridgeHeader {
    pub title: String,
    pub cartridge_type: u8,
    pub rom_size: u8,
    pub header_checksum: u8,
    /// Checksum computed over 0x134–0x14C.
    pub computed_checksum: u8,
}

impl CartridgeHeader {
    /// Parse the header, or `None` when the image is too short to hold one.
    pub fn parse(program: &[u8]) -> Option<Self> {
        if program.len() <= HEADER_CHECKSUM {
            return None;
        }

        let title = program[TITLE_START..=TITLE_END]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
            .collect::<String>()
            .trim_end()
            .to_string();

        let computed_checksum = program[TITLE_START..HEADER_CHECKSUM]
            .iter()
            .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1));

        Some(Self {
            title,
            cartridge_type: program[CARTRIDGE_TYPE],
            rom_size: program[ROM_SIZE],
            header_checksum: program[HEADER_CHECKSUM],
            computed_checksum,
        })
    }

    #[inline]
    pub fn checksum_ok(&self) -> bool {
        self.header_checksum == self.computed_checksum
    }

    /// ROM-only cartridges (types 0x00, 0x08, 0x09) fit the fixed window;
    /// anything else expects a memory bank controller.
    pub fn is_banked(&self) -> bool {
        !matches!(self.cartridge_type, 0x00 | 0x08 | 0x09)
    }

    /// ROM size in bytes as declared by the header.
    pub fn rom_bytes(&self) -> Option<usize> {
        match self.rom_size {
            0x00..=0x08 => Some(0x8000 << self.rom_size),
            _ => None,
        }
    }
}
