/// The accent color of the desktop, split into its channels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct AccentColor {
	pub alpha: u8,
	pub red: u8,
	pub green: u8,
	pub blue: u8,
}
impl AccentColor {
	pub const fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
		Self { alpha, red, green, blue }
	}

	/// Unpacks a color in the `0xAARRGGBB` form used by the compositor.
	///
	/// The alpha channel is kept as-is.
	pub const fn from_argb(packed: u32) -> Self {
		let [alpha, red, green, blue] = packed.to_be_bytes();
		Self { alpha, red, green, blue }
	}

	/// Packs this color into the `0xAARRGGBB` form used by the compositor.
	pub const fn to_argb(self) -> u32 {
		u32::from_be_bytes([self.alpha, self.red, self.green, self.blue])
	}

	/// This same color, fully opaque.
	pub const fn opaque(self) -> Self {
		Self { alpha: 0xFF, ..self }
	}
}
impl From<u32> for AccentColor {
	fn from(packed: u32) -> Self {
		Self::from_argb(packed)
	}
}
impl From<AccentColor> for u32 {
	fn from(color: AccentColor) -> Self {
		color.to_argb()
	}
}
impl std::fmt::Display for AccentColor {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "#{:08X}", self.to_argb())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn channels_round_trip() {
		let color = AccentColor::new(0x12, 0x34, 0x56, 0x78);
		assert_eq!(color.to_argb(), 0x1234_5678);
		assert_eq!(AccentColor::from_argb(color.to_argb()), color);
	}

	#[test]
	fn alpha_is_not_forced_opaque() {
		let color = AccentColor::from_argb(0x6B74_B8FC);
		assert_eq!(color, AccentColor::new(0x6B, 0x74, 0xB8, 0xFC));
		assert_eq!(AccentColor::from_argb(0x0000_0000).alpha, 0);
	}

	#[test]
	fn opaque_only_touches_alpha() {
		let color = AccentColor::new(0x40, 1, 2, 3).opaque();
		assert_eq!(color, AccentColor::new(0xFF, 1, 2, 3));
	}

	#[test]
	fn display_is_hex_argb() {
		assert_eq!(AccentColor::new(0xC4, 0x00, 0x63, 0xB1).to_string(), "#C40063B1");
	}
}
