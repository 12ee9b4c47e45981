//! UI collaborator
//!
//! The game pushes state changes out through [`UiSink`]; it never reads UI
//! state back. The only signal flowing the other way is the advance
//! confirmation, which the host delivers by calling
//! `Game::resume_after_message`.

use serde::{Deserialize, Serialize};

pub trait UiSink {
    /// Show the message panel. With `requires_advance` the panel waits for
    /// the player to confirm before the next level starts.
    fn show_message(&mut self, text: &str, requires_advance: bool);
    fn hide_message(&mut self);
    fn update_level(&mut self, current: u32, max: u32);
    fn show_final_screen(&mut self);
    fn show_game_screen(&mut self);
}

/// One recorded UI call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum UiEvent {
    ShowMessage { text: String, requires_advance: bool },
    HideMessage,
    UpdateLevel { current: u32, max: u32 },
    ShowFinalScreen,
    ShowGameScreen,
}

/// In-memory UI used by tests and the native demo
#[derive(Debug, Default, Clone)]
pub struct RecordingUi {
    pub events: Vec<UiEvent>,
    pub awaiting_advance: bool,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_message(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            UiEvent::ShowMessage { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn count(&self, matches: impl Fn(&UiEvent) -> bool) -> usize {
        self.events.iter().filter(|e| matches(e)).count()
    }

    /// Levels announced through `update_level`, in order
    pub fn levels(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::UpdateLevel { current, .. } => Some(*current),
                _ => None,
            })
            .collect()
    }
}

impl UiSink for RecordingUi {
    fn show_message(&mut self, text: &str, requires_advance: bool) {
        self.awaiting_advance = requires_advance;
        self.events.push(UiEvent::ShowMessage {
            text: text.to_owned(),
            requires_advance,
        });
    }

    fn hide_message(&mut self) {
        self.awaiting_advance = false;
        self.events.push(UiEvent::HideMessage);
    }

    fn update_level(&mut self, current: u32, max: u32) {
        self.events.push(UiEvent::UpdateLevel { current, max });
    }

    fn show_final_screen(&mut self) {
        self.events.push(UiEvent::ShowFinalScreen);
    }

    fn show_game_screen(&mut self) {
        self.events.push(UiEvent::ShowGameScreen);
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomUi;

#[cfg(target_arch = "wasm32")]
mod dom {
    use web_sys::{Document, Element};

    use super::UiSink;

    const SCREENS: [&str; 4] = ["main-menu", "game-screen", "victory-screen", "final-screen"];

    /// Message panel, level counter and screen switching on the page's DOM
    pub struct DomUi {
        document: Document,
        awaiting_advance: bool,
    }

    impl DomUi {
        pub fn new(document: Document) -> Self {
            Self {
                document,
                awaiting_advance: false,
            }
        }

        /// Consume a pending advance request; true if one was pending
        pub fn take_advance(&mut self) -> bool {
            std::mem::replace(&mut self.awaiting_advance, false)
        }

        fn element(&self, id: &str) -> Option<Element> {
            let el = self.document.get_element_by_id(id);
            if el.is_none() {
                log::warn!("missing #{id}");
            }
            el
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let classes = el.class_list();
                let _ = if hidden {
                    classes.add_1("hidden")
                } else {
                    classes.remove_1("hidden")
                };
            }
        }

        fn show_only(&self, id: &str) {
            for screen in SCREENS {
                self.set_hidden(screen, screen != id);
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.element(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    impl UiSink for DomUi {
        fn show_message(&mut self, text: &str, requires_advance: bool) {
            self.set_text("message-text", text);
            self.set_hidden("message-panel", false);
            self.awaiting_advance = requires_advance;
            let label = if requires_advance {
                "Presiona ENTER para continuar"
            } else {
                "Continuar"
            };
            if let Some(btn) = self.document.get_element_by_id("close-message-btn") {
                btn.set_text_content(Some(label));
            }
        }

        fn hide_message(&mut self) {
            self.set_hidden("message-panel", true);
            self.awaiting_advance = false;
            if let Some(btn) = self.document.get_element_by_id("close-message-btn") {
                btn.set_text_content(Some("Continuar"));
            }
        }

        fn update_level(&mut self, current: u32, max: u32) {
            self.set_text("counter-text", &format!("Nivel {current} / {max}"));
        }

        fn show_final_screen(&mut self) {
            self.show_only("final-screen");
        }

        fn show_game_screen(&mut self) {
            self.show_only("game-screen");
        }
    }
}
