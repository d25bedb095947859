//! Setup Pages - Individual pages of the first-boot wizard
//!
//! Each page is a `PageContent` plugged into a generic `Page`. Pages
//! record their choices in the application's setup data and otherwise
//! stay out of the assistant's way.

mod account;
mod eula;
mod keyboard;
mod language;
mod location;
mod network;
mod summary;

pub use account::{validate_username, UsernameError};

use crate::page_table::PageId;
use crate::ui::app::SetupApplication;
use crate::ui::page::{Page, PageContent};
use std::rc::Rc;

/// Construct the page registered for `id`
pub fn create(id: PageId, app: &SetupApplication) -> Page {
    let content: Rc<dyn PageContent> = match id {
        PageId::Language => Rc::new(language::LanguagePage::new(app)),
        PageId::Keyboard => Rc::new(keyboard::KeyboardPage::new(app)),
        PageId::Eula => Rc::new(eula::EulaPage::new(app)),
        PageId::Network => Rc::new(network::NetworkPage::new()),
        PageId::Account => Rc::new(account::AccountPage::new(app)),
        PageId::Location => Rc::new(location::LocationPage::new(app)),
        PageId::Summary => Rc::new(summary::SummaryPage::new(app)),
    };

    Page::new(content)
}

/// Vertical container every page body starts from
pub(crate) fn page_body() -> gtk::Box {
    gtk::Box::builder()
        .orientation(gtk::Orientation::Vertical)
        .spacing(12)
        .vexpand(true)
        .margin_start(24)
        .margin_end(24)
        .margin_top(16)
        .margin_bottom(16)
        .build()
}

/// Title label shown at the top of a page body
pub(crate) fn heading(text: &str) -> gtk::Label {
    gtk::Label::builder()
        .label(text)
        .css_classes(["title-1"])
        .halign(gtk::Align::Center)
        .build()
}
