use crate::platform::Compositor;

/// First build of Windows 10 1803, the release acrylic blur is usable from.
pub const WINDOWS_10_1803: u32 = 17134;

/// The version of the operating system.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct OsVersion {
	/// The major version number of the operating system.
	pub major: u32,
	/// The minor version number of the operating system.
	pub minor: u32,
	/// The build number of the operating system.
	///
	/// In some versions of Windows, notably 10 and 11, the major and minor
	/// versions are not enough to determine available functionality.
	pub build: u32,
}
impl OsVersion {
	pub const fn new(major: u32, minor: u32, build: u32) -> Self {
		Self { major, minor, build }
	}

	/// Whether the legacy, Aero Glass style, blur behind is available.
	///
	/// Vista and 7 (6.0 and 6.1) have it. Windows 8 and 8.1 (6.2 and 6.3)
	/// removed it, and whatever `DwmEnableBlurBehindWindow` does there does not
	/// look like glass. Releases outside of the 6.x family are not excluded.
	pub const fn supports_legacy_blur(&self) -> bool {
		!(self.major == 6 && self.minor > 1)
	}

	/// Whether the acrylic accent policy is available.
	///
	/// Only the Windows 10 implementation from 1803 onwards is supported.
	pub const fn supports_acrylic_blur(&self) -> bool {
		self.major == 10 && self.build >= WINDOWS_10_1803
	}

	/// Every capability of this version at once.
	pub const fn capabilities(&self) -> Capabilities {
		Capabilities {
			legacy_blur: self.supports_legacy_blur(),
			acrylic_blur: self.supports_acrylic_blur()
		}
	}
}
impl std::fmt::Display for OsVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}.{}.{}", self.major, self.minor, self.build)
	}
}

/// Snapshot of the compositor effects available at some point in time.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Capabilities {
	/// See [`OsVersion::supports_legacy_blur`].
	pub legacy_blur: bool,
	/// See [`OsVersion::supports_acrylic_blur`].
	pub acrylic_blur: bool,
}

/// Queries the live version of the system, warning when there is none.
fn live_version<C: Compositor + ?Sized>(compositor: &C) -> Option<OsVersion> {
	let version = compositor.os_version();
	if version.is_none() {
		log::warn!(
			"The operating system version is not available. Compositor \
			 effects will be treated as unsupported.");
	}
	version
}

/// Whether the system the process is running on right now supports the legacy
/// blur behind. Unknown versions support nothing.
pub fn supports_legacy_blur<C: Compositor + ?Sized>(compositor: &C) -> bool {
	live_version(compositor)
		.map(|version| version.supports_legacy_blur())
		.unwrap_or(false)
}

/// Whether the system the process is running on right now supports the
/// acrylic blur. Unknown versions support nothing.
pub fn supports_acrylic_blur<C: Compositor + ?Sized>(compositor: &C) -> bool {
	live_version(compositor)
		.map(|version| version.supports_acrylic_blur())
		.unwrap_or(false)
}

/// Both capabilities of the running system, from a single version query.
pub fn detect<C: Compositor + ?Sized>(compositor: &C) -> Capabilities {
	live_version(compositor)
		.map(|version| version.capabilities())
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn legacy_blur_window() {
		assert!(OsVersion::new(6, 0, 6002).supports_legacy_blur());
		assert!(OsVersion::new(6, 1, 7601).supports_legacy_blur());
		assert!(!OsVersion::new(6, 2, 9200).supports_legacy_blur());
		assert!(!OsVersion::new(6, 3, 9600).supports_legacy_blur());
		assert!(!OsVersion::new(6, 4, 0).supports_legacy_blur());

		/* Outside of the 6.x family, nothing is excluded. */
		assert!(OsVersion::new(5, 1, 2600).supports_legacy_blur());
		assert!(OsVersion::new(10, 0, 19045).supports_legacy_blur());
	}

	#[test]
	fn acrylic_blur_floor() {
		assert!(!OsVersion::new(10, 0, 17133).supports_acrylic_blur());
		assert!(OsVersion::new(10, 0, 17134).supports_acrylic_blur());
		assert!(OsVersion::new(10, 0, 22631).supports_acrylic_blur());

		assert!(!OsVersion::new(6, 1, 17134).supports_acrylic_blur());
		assert!(!OsVersion::new(11, 0, 30000).supports_acrylic_blur());
	}

	#[test]
	fn capabilities_of_known_releases() {
		assert_eq!(
			OsVersion::new(6, 1, 7601).capabilities(),
			Capabilities { legacy_blur: true, acrylic_blur: false });
		assert_eq!(
			OsVersion::new(6, 3, 9600).capabilities(),
			Capabilities { legacy_blur: false, acrylic_blur: false });
		assert_eq!(
			OsVersion::new(10, 0, 19045).capabilities(),
			Capabilities { legacy_blur: true, acrylic_blur: true });
	}

	#[test]
	fn version_display() {
		assert_eq!(OsVersion::new(10, 0, 17134).to_string(), "10.0.17134");
	}
}
