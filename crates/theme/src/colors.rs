/// 8-bit RGBA colour as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const DARK:  Self = Self::rgb(0x1e, 0x1e, 0x2e);
    pub const WHITE: Self = Self::rgb(0xcd, 0xd6, 0xf4);
    pub const GREY:  Self = Self::rgb(0x45, 0x47, 0x5a);
    pub const RED:   Self = Self::rgb(0xf3, 0x8b, 0xa8);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: u8::MAX }
    }

    /// `#RRGGBB` or `#RRGGBBAA`, leading `#` optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let packed = u32::from_str_radix(digits, 16).ok()?;
        let [r, g, b, a] = if digits.len() == 6 {
            (packed << 8 | 0xff).to_be_bytes()
        } else {
            packed.to_be_bytes()
        };
        Some(Self { r, g, b, a })
    }

    /// Same colour at half opacity.
    pub const fn faded(self) -> Self {
        Self { a: self.a / 2, ..self }
    }
}

impl From<Color> for iced::Color {
    fn from(c: Color) -> Self {
        iced::Color::from_rgba8(c.r, c.g, c.b, f32::from(c.a) / 255.0)
    }
}
