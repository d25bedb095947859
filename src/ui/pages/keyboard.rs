//! Keyboard Page - Choose the keyboard layout

use super::{heading, page_body};
use crate::page_table::PageId;
use crate::ui::app::SetupApplication;
use crate::ui::page::{Page, PageContent};
use adw::prelude::*;
use gtk::glib;
use std::cell::OnceCell;

/// XKB layouts offered, with display names
pub const LAYOUTS: &[(&str, &str)] = &[
    ("us", "English (US)"),
    ("gb", "English (UK)"),
    ("de", "German"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("br", "Portuguese (Brazil)"),
];

pub struct KeyboardPage {
    app: glib::WeakRef<SetupApplication>,
    dropdown: OnceCell<gtk::DropDown>,
}

impl KeyboardPage {
    pub fn new(app: &SetupApplication) -> Self {
        Self {
            app: app.downgrade(),
            dropdown: OnceCell::new(),
        }
    }

    fn selected_layout(&self) -> Option<&'static str> {
        let index = self.dropdown.get()?.selected();
        LAYOUTS.get(index as usize).map(|(layout, _)| *layout)
    }
}

impl PageContent for KeyboardPage {
    fn id(&self) -> PageId {
        PageId::Keyboard
    }

    fn build(&self, page: &Page) -> gtk::Widget {
        let body = page_body();
        body.append(&heading("Typing"));

        let names: Vec<&str> = LAYOUTS.iter().map(|(_, name)| *name).collect();
        let dropdown = gtk::DropDown::from_strings(&names);
        dropdown.set_halign(gtk::Align::Center);

        let data = self.app.upgrade().map(|app| app.data()).unwrap_or_default();
        let preferred = data
            .keyboard_layout
            .as_deref()
            .or_else(|| data.language.as_deref().and_then(layout_for_language));
        if let Some(index) = preferred.and_then(|layout| LAYOUTS.iter().position(|(l, _)| *l == layout)) {
            dropdown.set_selected(index as u32);
        }

        let hint = gtk::Label::builder()
            .label("Select your keyboard layout or an input method.")
            .css_classes(["dim-label"])
            .build();

        body.append(&hint);
        body.append(&dropdown);

        let _ = self.dropdown.set(dropdown);
        page.set_complete(true);

        body.upcast()
    }

    fn locale_changed(&self, page: &Page) {
        page.set_title("Typing");
    }

    fn save_data(&self, _page: &Page) {
        let (Some(app), Some(layout)) = (self.app.upgrade(), self.selected_layout()) else {
            return;
        };
        app.update_data(|data| data.keyboard_layout = Some(layout.to_string()));
    }
}

/// Layout matching the territory of a locale, e.g. `de_DE.UTF-8` -> `de`
fn layout_for_language(language: &str) -> Option<&'static str> {
    let bare = language.split(['.', '@']).next()?;
    let territory = bare.split('_').nth(1)?.to_lowercase();

    LAYOUTS
        .iter()
        .map(|(layout, _)| *layout)
        .find(|layout| *layout == territory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_for_language() {
        assert_eq!(layout_for_language("de_DE.UTF-8"), Some("de"));
        assert_eq!(layout_for_language("pt_BR"), Some("br"));
        assert_eq!(layout_for_language("en_GB.UTF-8"), Some("gb"));
    }

    #[test]
    fn test_layout_for_unknown_language() {
        assert_eq!(layout_for_language("ja_JP.UTF-8"), None);
        assert_eq!(layout_for_language("C"), None);
    }
}
