#[cfg(windows)]
fn main() {
	use sidebar_compositor::platform::windows::WindowsCompositor;
	use sidebar_compositor::{ColorizationEvents, CompositorEventBridge, EffectController, WindowHandle};
	use winapi::shared::basetsd::{DWORD_PTR, UINT_PTR};
	use winapi::shared::minwindef::{LPARAM, LRESULT, UINT, WPARAM};
	use winapi::shared::windef::HWND;
	use winapi::um::commctrl::{DefSubclassProc, SetWindowSubclass};

	type Bridge = CompositorEventBridge<'static, WindowsCompositor>;

	/* Every message the window gets goes through the bridge first, and then on
	 * to whatever winit would have done with it. */
	unsafe extern "system" fn subclass_proc(
		hwnd: HWND,
		msg: UINT,
		wparam: WPARAM,
		lparam: LPARAM,
		_id: UINT_PTR,
		data: DWORD_PTR) -> LRESULT {

		let bridge = &*(data as *const Bridge);
		bridge.window_proc(WindowHandle::from_ptr(hwnd as *mut _), msg, wparam, lparam);

		DefSubclassProc(hwnd, msg, wparam, lparam)
	}

	let event_loop = winit::event_loop::EventLoop::new();
	let window = winit::window::WindowBuilder::new()
		.with_title("Sidebar")
		.with_resizable(true)
		.with_decorations(true)
		.with_transparent(true)
		.with_inner_size(winit::dpi::PhysicalSize::new(150, 600))
		.build(&event_loop).unwrap();
	let handle = WindowHandle::from_window(&window).unwrap();

	let effects: &'static _ = Box::leak(Box::new(
		EffectController::new(WindowsCompositor::new())));
	let events: &'static _ = Box::leak(Box::new(ColorizationEvents::new()));
	let bridge: &'static Bridge = Box::leak(Box::new(
		CompositorEventBridge::new(effects, events)));

	println!("Capabilities: {:?}", effects.capabilities());
	println!("Accent color: {}", effects.colorization_color());

	let tile = events.subscribe(move || {
		println!("Accent color changed to {}", effects.colorization_color());
	});

	if !effects.enable_blur(handle) {
		println!("Blur could not be enabled, waiting for the next composition change.");
	}
	effects.exclude_from_peek(handle);
	effects.exclude_from_flip3d(handle);

	unsafe {
		SetWindowSubclass(
			handle.as_ptr() as HWND,
			Some(subclass_proc),
			1,
			bridge as *const Bridge as DWORD_PTR);
	}

	event_loop.run(move |event, _, flow| {
		*flow = winit::event_loop::ControlFlow::Wait;
		match event {
			winit::event::Event::WindowEvent { window_id, event }
			if window_id == window.id() => match event {

				winit::event::WindowEvent::CloseRequested => {
					events.unsubscribe(tile);
					*flow = winit::event_loop::ControlFlow::Exit
				},
				_ => {}
			},
			_ => {}
		}
	})
}

#[cfg(not(windows))]
fn main() {
	eprintln!("The sidebar host only runs on Windows.");
}
