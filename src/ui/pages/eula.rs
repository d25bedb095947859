//! EULA Page - License terms the user has to accept
//!
//! Vendors ship the agreement at `EULA_PATH`; a generic notice is shown
//! when it is missing.

use super::{heading, page_body};
use crate::page_table::PageId;
use crate::ui::app::SetupApplication;
use crate::ui::page::{Page, PageContent};
use adw::prelude::*;
use gtk::glib;
use std::cell::OnceCell;
use std::path::Path;

/// Location of the vendor's license agreement
pub const EULA_PATH: &str = "/usr/share/initial-setup/eula.txt";

const FALLBACK_EULA: &str = "This system is provided under the terms of the licenses \
of its individual components. See /usr/share/licenses for details.";

pub struct EulaPage {
    app: glib::WeakRef<SetupApplication>,
    accept: OnceCell<gtk::CheckButton>,
}

impl EulaPage {
    pub fn new(app: &SetupApplication) -> Self {
        Self {
            app: app.downgrade(),
            accept: OnceCell::new(),
        }
    }

    fn is_accepted(&self) -> bool {
        self.accept.get().map_or(false, |check| check.is_active())
    }
}

fn load_eula(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => FALLBACK_EULA.to_string(),
        Err(e) => {
            tracing::debug!("No license agreement at {}: {}", path.display(), e);
            FALLBACK_EULA.to_string()
        }
    }
}

impl PageContent for EulaPage {
    fn id(&self) -> PageId {
        PageId::Eula
    }

    fn build(&self, page: &Page) -> gtk::Widget {
        let body = page_body();
        body.append(&heading("License Agreement"));

        let text_view = gtk::TextView::builder()
            .editable(false)
            .cursor_visible(false)
            .wrap_mode(gtk::WrapMode::Word)
            .vexpand(true)
            .top_margin(12)
            .bottom_margin(12)
            .left_margin(12)
            .right_margin(12)
            .build();
        text_view.buffer().set_text(&load_eula(Path::new(EULA_PATH)));

        let scroll = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .min_content_height(200)
            .css_classes(["card"])
            .child(&text_view)
            .build();

        let accept = gtk::CheckButton::builder()
            .label("I have read and agree to the terms")
            .halign(gtk::Align::Start)
            .margin_top(8)
            .build();

        accept.connect_toggled(glib::clone!(
            @weak page =>
            move |check| {
                page.set_complete(check.is_active());
            }
        ));

        body.append(&scroll);
        body.append(&accept);

        let accepted = self
            .app
            .upgrade()
            .map_or(false, |app| app.data().eula_accepted);
        accept.set_active(accepted);
        page.set_complete(accepted);

        let _ = self.accept.set(accept);

        body.upcast()
    }

    fn locale_changed(&self, page: &Page) {
        page.set_title("License Agreement");
    }

    fn save_data(&self, _page: &Page) {
        let accepted = self.is_accepted();
        if let Some(app) = self.app.upgrade() {
            app.update_data(|data| data.eula_accepted = accepted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_eula_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eula.txt");
        std::fs::write(&path, "Be excellent to each other.").unwrap();

        assert_eq!(load_eula(&path), "Be excellent to each other.");
    }

    #[test]
    fn test_load_eula_fallback() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_eula(&dir.path().join("missing.txt")), FALLBACK_EULA);

        let blank = dir.path().join("blank.txt");
        std::fs::write(&blank, "  \n").unwrap();
        assert_eq!(load_eula(&blank), FALLBACK_EULA);
    }
}
