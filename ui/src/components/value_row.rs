use dioxus::prelude::*;

/// One labelled table row: the value, the token's icon and its symbol.
///
/// On mobile the symbol is left out and the value uses a smaller type scale.
/// With `is_dropdown` the value cell is replaced by a selector.
#[component]
pub fn ValueRow(
    label: String,
    value: String,
    token: String,
    img: String,
    is_mobile: bool,
    #[props(default)] is_dropdown: bool,
) -> Element {
    let scale = if is_mobile { "small" } else { "regular" };

    rsx! {
        tr { class: "value-row",
            th { scope: "row", class: "value-row__label value-row--{scale}", "{label}" }
            if is_dropdown {
                td {
                    select {
                        option { "Select dropdown" }
                        option { "With options" }
                    }
                }
            } else {
                td {
                    span { class: "value-row__value value-row--{scale}", "{value}" }
                    img {
                        class: "value-row__icon",
                        src: "{img}",
                        alt: "",
                        width: "24",
                        height: "24",
                    }
                    if !is_mobile {
                        span { class: "value-row__token", "{token}" }
                    }
                }
            }
        }
    }
}
