use crate::capability::{self, Capabilities};
use crate::color::AccentColor;
use crate::native::{
	AccentPolicy, BlurBehind, HeapBlock, WindowCompositionAttribute,
	WindowCompositionAttributeData, DWMFLIP3D_EXCLUDEBELOW, DWMWA_EXCLUDED_FROM_PEEK,
	DWMWA_FLIP3D_POLICY};
use crate::platform::{Compositor, WindowHandle};

/// Knobs controlling how strictly the compositor's answers are interpreted.
///
/// The defaults reproduce the behavior the sidebar has always had.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct EffectsConfig {
	/// Whether a rejected acrylic accent request fails [`EffectController::set_blur`].
	///
	/// When unset, the answer of `SetWindowCompositionAttribute` is only
	/// logged, and only the legacy blur call decides the outcome.
	pub check_accent_result: bool,
	/// Whether the opaque blend flag reported alongside the colorization color
	/// forces the alpha of [`EffectController::colorization_color`] to opaque.
	///
	/// When unset, the flag is read and ignored.
	pub merge_opaque_blend: bool,
}
impl EffectsConfig {
	pub fn with_check_accent_result(mut self, check: bool) -> Self {
		self.check_accent_result = check;
		self
	}

	pub fn with_merge_opaque_blend(mut self, merge: bool) -> Self {
		self.merge_opaque_blend = merge;
		self
	}
}

/// Applies compositor effects to windows.
///
/// The controller keeps no per-window state. Every request is decided from the
/// capabilities of the system at the time it is made.
pub struct EffectController<C: Compositor> {
	compositor: C,
	config: EffectsConfig,
}
impl<C: Compositor> EffectController<C> {
	/// Creates a controller with the default configuration.
	pub fn new(compositor: C) -> Self {
		Self::with_config(compositor, EffectsConfig::default())
	}

	pub fn with_config(compositor: C, config: EffectsConfig) -> Self {
		Self { compositor, config }
	}

	pub fn compositor(&self) -> &C {
		&self.compositor
	}

	pub fn config(&self) -> &EffectsConfig {
		&self.config
	}

	/// The effects the system currently supports.
	pub fn capabilities(&self) -> Capabilities {
		capability::detect(&self.compositor)
	}

	/// Whether the legacy blur is currently supported.
	pub fn supports_legacy_blur(&self) -> bool {
		capability::supports_legacy_blur(&self.compositor)
	}

	/// Whether the acrylic blur is currently supported.
	pub fn supports_acrylic_blur(&self) -> bool {
		capability::supports_acrylic_blur(&self.compositor)
	}

	/// Blurs the background of the given window.
	pub fn enable_blur(&self, window: WindowHandle) -> bool {
		self.set_blur(window, true)
	}

	/// Removes the background blur from the given window.
	pub fn disable_blur(&self, window: WindowHandle) -> bool {
		self.set_blur(window, false)
	}

	/// Turns the background blur of the given window on or off.
	///
	/// Both the acrylic accent and the legacy blur behind are requested, each
	/// only if the system supports it. A system supporting neither is left
	/// alone and reported as a success. Only a failed legacy blur request makes
	/// this function return `false`, unless
	/// [`EffectsConfig::check_accent_result`] is set.
	pub fn set_blur(&self, window: WindowHandle, enabled: bool) -> bool {
		if self.supports_acrylic_blur() {
			let accepted = self.set_acrylic_accent(window, enabled);
			if !accepted {
				log::warn!(
					"The compositor rejected the acrylic accent policy for \
					 window 0x{:x}.",
					window.raw());
				if self.config.check_accent_result {
					return false
				}
			}
		}

		if self.supports_legacy_blur() {
			let blur = BlurBehind::whole_window(enabled);
			let status = self.compositor.enable_blur_behind_window(window, &blur);
			if status != 0 {
				log::debug!(
					"DwmEnableBlurBehindWindow failed for window 0x{:x}: 0x{:08x}",
					window.raw(),
					status);
				return false
			}
		}

		true
	}

	/// Hands the acrylic accent policy over to the compositor.
	///
	/// The policy lives in a block of its own for exactly the duration of the
	/// call, and the block is released whatever the compositor answers.
	fn set_acrylic_accent(&self, window: WindowHandle, enabled: bool) -> bool {
		let policy = HeapBlock::new(AccentPolicy::acrylic(enabled));
		let mut request = WindowCompositionAttributeData {
			attribute: WindowCompositionAttribute::AccentPolicy,
			data: policy.as_mut_ptr(),
			data_size: policy.size()
		};

		log::debug!(
			"Setting accent policy {:?} on window 0x{:x}",
			policy.get().state,
			window.raw());

		/* SAFETY: The request points to the policy block, which holds a whole
		 * accent policy and outlives the call. */
		let accepted = unsafe {
			self.compositor.set_window_composition_attribute(window, &mut request)
		};

		drop(policy);
		accepted
	}

	/// Keeps the window visible while Aero Peek is showing the desktop.
	pub fn exclude_from_peek(&self, window: WindowHandle) {
		self.set_attribute(window, DWMWA_EXCLUDED_FROM_PEEK, 1);
	}

	/// Keeps the window out of the Flip3D stack, below the flipped windows.
	pub fn exclude_from_flip3d(&self, window: WindowHandle) {
		self.set_attribute(window, DWMWA_FLIP3D_POLICY, DWMFLIP3D_EXCLUDEBELOW);
	}

	fn set_attribute(&self, window: WindowHandle, attribute: u32, value: u32) {
		let status = self.compositor.set_window_attribute(window, attribute, &value);
		if status != 0 {
			/* These attributes are cosmetic. */
			log::debug!(
				"DwmSetWindowAttribute({}) failed for window 0x{:x}: 0x{:08x}",
				attribute,
				window.raw(),
				status);
		}
	}

	/// The current accent color of the desktop.
	pub fn colorization_color(&self) -> AccentColor {
		let (packed, opaque) = self.compositor.colorization_color();
		let color = AccentColor::from_argb(packed);

		if opaque && self.config.merge_opaque_blend {
			color.opaque()
		} else {
			color
		}
	}
}
