use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub dark: bool,
    pub body_bg: &'static str,
    pub text_color: &'static str,
    pub card_bg: &'static str,
    pub card_shadow: &'static str,
    pub tab_bg: &'static str,
    pub tab_text: &'static str,
}

impl Theme {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Theme {
                dark,
                body_bg: "#0b1020",
                text_color: "#e5e7eb",
                card_bg: "#1f2937",
                card_shadow: "0 4px 30px rgba(0,0,0,0.45)",
                tab_bg: "#6d28d9",
                tab_text: "white",
            }
        } else {
            Theme {
                dark,
                body_bg: "#f9f9fb",
                text_color: "#111827",
                card_bg: "white",
                card_shadow: "0 4px 30px rgba(0,0,0,0.12)",
                tab_bg: "#e0f2fe",
                tab_text: "#0f172a",
            }
        }
    }
}
