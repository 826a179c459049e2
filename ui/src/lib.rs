// The client-side Dioxus application logic.

use dioxus::prelude::*;

mod app_state;
pub mod compat;
mod components;
pub mod hooks;

use api::config::DashboardConfig;
use app_state::AppState;
use components::deposit_panel::DepositPanel;
use components::pico::Button;
use components::pico::ButtonType;
use components::pico::Card;
use components::pico::Container;
use hooks::use_block_watcher::use_block_watcher;
use hooks::use_chain_checker::ChainStatus;

const PICO_CSS: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.cyan.min.css";

/// Enum to represent the current view mode (for simulation).
#[derive(Clone, PartialEq, Default)]
enum ViewMode {
    #[default]
    Desktop,
    Mobile,
}

//=============================================================================
// MAIN APPLICATION COMPONENT (Client-side)
//=============================================================================

#[allow(non_snake_case)]
pub fn App() -> Element {
    let responsive_css = r#"
    * { box-sizing: border-box; }

    .app-main-container header {
        padding: 0 1rem;
        --pico-nav-element-spacing-vertical: 0.5rem;
    }

    /* --- DEPOSIT ROWS --- */
    .value-row th { font-weight: normal; color: var(--pico-muted-color); }
    .value-row td { white-space: nowrap; text-align: right; }
    .value-row__icon { vertical-align: middle; margin: 0 0.35rem; }
    .value-row--regular { font-size: 1rem; }
    .value-row--small { font-size: 0.8rem; }
    .deposit-panel__actions td { text-align: right; border-bottom: none; }
    .deposit-panel__error { margin: 0.5rem 0 0; color: var(--pico-del-color); }

    .connection-banner {
        padding: 0.5rem 1rem;
        margin-bottom: 1rem;
        border-left: 4px solid var(--pico-del-color);
        background-color: var(--pico-card-background-color);
    }

    /* --- Mobile Styles --- */
    .mobile-view-wrapper { display: flex; justify-content: center; align-items: flex-start; padding-top: 2rem; min-height: 100vh; background-color: var(--muted-border-color); }
    .mobile-view-content { width: 100%; max-width: 400px; height: 800px; border-radius: 1.5rem; overflow-y: auto; padding: 1rem; border: 4px solid #374151; box-shadow: 0 10px 40px rgba(0,0,0,0.25); background-color: var(--card-background-color); }
"#;

    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Stylesheet {
            href: PICO_CSS,
        }
        style {
            "{responsive_css}"
        }
        Dashboard {}
    }
}

/// Owns the shared state, the block watcher and one card per tracked deposit.
#[component]
fn Dashboard() -> Element {
    // Provide the stable, non-reactive AppState.
    let app_state = use_context_provider(|| AppState::new(DashboardConfig::from_env()));
    let status = use_context_provider(|| Signal::new(ChainStatus::Connected));
    let mut view_mode = use_context_provider(|| Signal::new(ViewMode::default()));

    use_block_watcher();

    let config = &app_state.config;
    let (wrapper_class, content_class) = if view_mode() == ViewMode::Mobile {
        ("mobile-view-wrapper", "mobile-view-content")
    } else {
        ("app-main-container", "")
    };

    rsx! {
        div {
            class: "{wrapper_class}",
            div {
                class: "{content_class}",
                Container {
                    header {
                        nav {
                            ul {
                                li { strong { "Deposits" } }
                            }
                            ul {
                                // Conditionally render the button based on the environment variable.
                                if option_env!("VIEW_MODE_TOGGLE") == Some("1") {
                                    li {
                                        Button {
                                            button_type: ButtonType::Contrast,
                                            outline: true,
                                            on_click: move |_| {
                                                let next = if view_mode() == ViewMode::Mobile {
                                                    ViewMode::Desktop
                                                } else {
                                                    ViewMode::Mobile
                                                };
                                                view_mode.set(next);
                                            },
                                            if view_mode() == ViewMode::Mobile { "Desktop View" } else { "Mobile View" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    if let ChainStatus::Disconnected(reason) = &*status.read() {
                        div {
                            class: "connection-banner",
                            role: "alert",
                            "Not connected to the chain node: {reason}"
                        }
                    }
                    for id in config.deposit_ids.iter().copied() {
                        Card {
                            key: "{id}",
                            h4 { "Deposit #{id}" }
                            table {
                                tbody {
                                    DepositPanel {
                                        reward_token_address: config.reward_token_address,
                                        pool_address: config.pool_address,
                                        reward_text: config.reward_text.clone(),
                                        reward_token_image: config.reward_image.clone(),
                                        deposit_id: id,
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
