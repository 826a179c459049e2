//=============================================================================
// File: src/hooks/use_is_mobile.rs
//=============================================================================

use dioxus::prelude::*;

use crate::app_state::AppState;
use crate::ViewMode;

// Conditionally export the viewport query for the target platform.

#[cfg(target_arch = "wasm32")]
use self::wasm32::use_narrow_viewport;

#[cfg(all(feature = "dioxus-desktop", not(target_arch = "wasm32")))]
use self::desktop::use_narrow_viewport;

#[cfg(all(not(target_arch = "wasm32"), not(feature = "dioxus-desktop")))]
use self::fallback::use_narrow_viewport;

/// Returns `true` when rows should use the mobile layout: either the viewport
/// is at most the configured breakpoint wide, or the mobile view is being
/// simulated.
pub fn use_is_mobile() -> bool {
    let max_width = use_context::<AppState>().config.mobile_max_width_px;
    let is_narrow = use_narrow_viewport(max_width);
    let view_mode = try_use_context::<Signal<ViewMode>>();

    let simulated = view_mode.is_some_and(|mode| mode() == ViewMode::Mobile);
    is_narrow() || simulated
}

fn media_query(max_width_px: u32) -> String {
    format!("(max-width: {}px)", max_width_px)
}

/// # Desktop Implementation
/// Watches the media query inside the webview and streams every change back.
#[cfg(all(feature = "dioxus-desktop", not(target_arch = "wasm32")))]
mod desktop {
    use dioxus::prelude::*;
    use dioxus_desktop::DesktopContext;

    pub fn use_narrow_viewport(max_width_px: u32) -> Signal<bool> {
        let mut is_narrow = use_signal(|| false);
        // absent when rendered outside a desktop window, e.g. in tests.
        let has_window = use_hook(|| try_consume_context::<DesktopContext>().is_some());

        use_future(move || async move {
            if !has_window {
                return;
            }
            let js_code = format!(
                r#"
                const query = window.matchMedia('{}');
                dioxus.send(query.matches);
                query.addEventListener('change', (event) => dioxus.send(event.matches));
                await new Promise(() => {{}});
                "#,
                super::media_query(max_width_px)
            );
            let mut eval = document::eval(&js_code);
            while let Ok(narrow) = eval.recv::<bool>().await {
                is_narrow.set(narrow);
            }
        });

        is_narrow
    }
}

/// # WebAssembly (WASM) Implementation
/// Queries `window.matchMedia` through `web_sys` and follows its `change`
/// events.
#[cfg(target_arch = "wasm32")]
mod wasm32 {
    use std::rc::Rc;

    use dioxus::prelude::*;
    use wasm_bindgen::prelude::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::MediaQueryList;
    use web_sys::MediaQueryListEvent;

    /// Keeps the change handler alive and detaches it when dropped.
    struct ChangeListener {
        list: MediaQueryList,
        _on_change: Closure<dyn FnMut(MediaQueryListEvent)>,
    }

    impl Drop for ChangeListener {
        fn drop(&mut self) {
            self.list.set_onchange(None);
        }
    }

    pub fn use_narrow_viewport(max_width_px: u32) -> Signal<bool> {
        let list = use_hook(|| {
            web_sys::window()
                .and_then(|window| window.match_media(&super::media_query(max_width_px)).ok())
                .flatten()
        });
        let mut is_narrow = use_signal(|| list.as_ref().is_some_and(MediaQueryList::matches));

        use_hook(move || {
            list.map(|list| {
                let on_change =
                    Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
                        is_narrow.set(event.matches());
                    });
                list.set_onchange(Some(on_change.as_ref().unchecked_ref()));
                Rc::new(ChangeListener {
                    list,
                    _on_change: on_change,
                })
            })
        });

        is_narrow
    }
}

/// # Fallback/Server Implementation
/// Without a viewport to query, assume a wide screen.
#[cfg(all(not(target_arch = "wasm32"), not(feature = "dioxus-desktop")))]
mod fallback {
    use dioxus::prelude::*;

    pub fn use_narrow_viewport(_max_width_px: u32) -> Signal<bool> {
        use_signal(|| false)
    }
}
