//! Language Page - First page, picks the session language
//!
//! Changing the language rebuilds every page after this one.

use super::{heading, page_body};
use crate::page_table::PageId;
use crate::tutorial;
use crate::ui::app::SetupApplication;
use crate::ui::page::{Page, PageContent};
use adw::prelude::*;
use gtk::{gio, glib};
use std::cell::RefCell;
use std::rc::Rc;

/// Languages offered on the first page
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en_US.UTF-8", "English (United States)"),
    ("en_GB.UTF-8", "English (United Kingdom)"),
    ("de_DE.UTF-8", "Deutsch"),
    ("es_ES.UTF-8", "Español"),
    ("fr_FR.UTF-8", "Français"),
    ("pt_BR.UTF-8", "Português (Brasil)"),
];

pub struct LanguagePage {
    app: glib::WeakRef<SetupApplication>,
    selected: Rc<RefCell<Option<String>>>,
}

impl LanguagePage {
    pub fn new(app: &SetupApplication) -> Self {
        Self {
            app: app.downgrade(),
            selected: Rc::new(RefCell::new(None)),
        }
    }
}

impl PageContent for LanguagePage {
    fn id(&self) -> PageId {
        PageId::Language
    }

    fn build(&self, page: &Page) -> gtk::Widget {
        let body = page_body();
        body.append(&heading("Welcome!"));

        let list = gtk::ListBox::builder()
            .selection_mode(gtk::SelectionMode::Single)
            .css_classes(["boxed-list"])
            .build();

        for (code, name) in LANGUAGES {
            let row = adw::ActionRow::builder()
                .title(*name)
                .subtitle(*code)
                .build();
            list.append(&row);
        }

        let selected = self.selected.clone();
        list.connect_row_selected(glib::clone!(
            @weak page =>
            move |_, row| {
                let choice = row
                    .and_then(|row| usize::try_from(row.index()).ok())
                    .and_then(|index| LANGUAGES.get(index))
                    .map(|(code, _)| code.to_string());

                page.set_complete(choice.is_some());
                *selected.borrow_mut() = choice;
            }
        ));

        let current = self
            .app
            .upgrade()
            .and_then(|app| app.data().language)
            .unwrap_or_else(tutorial::current_language);
        let index = initial_index(&current);
        list.select_row(list.row_at_index(index as i32).as_ref());

        let scroll = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hscrollbar_policy(gtk::PolicyType::Never)
            .child(&list)
            .build();
        body.append(&scroll);

        body.upcast()
    }

    fn apply(&self, _page: &Page, _cancellable: &gio::Cancellable) -> bool {
        let choice = self.selected.borrow().clone();
        if let (Some(app), Some(language)) = (self.app.upgrade(), choice) {
            app.set_language(&language);
        }
        false
    }

    fn locale_changed(&self, page: &Page) {
        page.set_title("Welcome");
    }
}

/// Row to preselect for the given locale or bare language name
fn initial_index(current: &str) -> usize {
    let bare = current.split('.').next().unwrap_or_default();

    LANGUAGES
        .iter()
        .position(|(code, _)| *code == current)
        .or_else(|| LANGUAGES.iter().position(|(code, _)| code.starts_with(bare)))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_index_exact_match() {
        assert_eq!(initial_index("de_DE.UTF-8"), 2);
    }

    #[test]
    fn test_initial_index_bare_language() {
        assert_eq!(initial_index("pt_BR"), 5);
        assert_eq!(initial_index("fr_FR.ISO-8859-1"), 4);
    }

    #[test]
    fn test_initial_index_falls_back_to_first() {
        assert_eq!(initial_index("ja_JP.UTF-8"), 0);
        assert_eq!(initial_index(""), 0);
    }
}
