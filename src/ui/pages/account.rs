//! Account Page - Full name and username of the first user
//!
//! The username is validated as it is typed. Leaving the page checks in
//! the background that no account with that name exists yet.

use super::{heading, page_body};
use crate::page_table::PageId;
use crate::session::{SETUP_USER, SHARED_USER};
use crate::ui::app::SetupApplication;
use crate::ui::page::{Page, PageContent};
use adw::prelude::*;
use gtk::{gio, glib};
use std::cell::OnceCell;
use std::rc::Rc;
use thiserror::Error;

pub const MAX_USERNAME_LEN: usize = 32;

const RESERVED_USERNAMES: &[&str] = &["root", "daemon", "bin", "sys", "nobody", SETUP_USER, SHARED_USER];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("The username cannot be empty.")]
    Empty,

    #[error("The username is too long.")]
    TooLong,

    #[error("The username must start with a lowercase letter.")]
    InvalidStart,

    #[error("The username cannot contain '{0}'.")]
    InvalidCharacter(char),

    #[error("That username is reserved by the system.")]
    Reserved,

    #[error("An account with that username already exists.")]
    Taken,
}

/// Check a username against the rules for local accounts
pub fn validate_username(username: &str) -> Result<(), UsernameError> {
    let mut chars = username.chars();

    match chars.next() {
        None => return Err(UsernameError::Empty),
        Some(first) if !(first.is_ascii_lowercase() || first == '_') => {
            return Err(UsernameError::InvalidStart)
        }
        Some(_) => {}
    }

    if username.len() > MAX_USERNAME_LEN {
        return Err(UsernameError::TooLong);
    }

    if let Some(bad) = chars.find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')) {
        return Err(UsernameError::InvalidCharacter(bad));
    }

    if RESERVED_USERNAMES.contains(&username) {
        return Err(UsernameError::Reserved);
    }

    Ok(())
}

/// Username suggested for a full name: its first word, lowercased
fn suggest_username(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The typed username, or the suggestion when nothing was typed
fn effective_username(full_name: &str, typed: &str) -> String {
    let typed = typed.trim();
    if typed.is_empty() {
        suggest_username(full_name)
    } else {
        typed.to_string()
    }
}

struct Widgets {
    full_name: gtk::Entry,
    username: gtk::Entry,
    error: gtk::Label,
}

impl Widgets {
    fn username(&self) -> String {
        effective_username(&self.full_name.text(), &self.username.text())
    }

    fn show_error(&self, error: Option<&UsernameError>) {
        match error {
            Some(error) => {
                self.error.set_label(&error.to_string());
                self.error.set_visible(true);
            }
            None => self.error.set_visible(false),
        }
    }

    fn refresh(&self, page: &Page) {
        let full_name = self.full_name.text();
        let username = self.username();
        self.username.set_placeholder_text(Some(&suggest_username(&full_name)));

        let validation = validate_username(&username);
        let typed = !self.username.text().trim().is_empty();
        self.show_error(validation.as_ref().err().filter(|_| typed));

        page.set_complete(!full_name.trim().is_empty() && validation.is_ok());
    }
}

pub struct AccountPage {
    app: glib::WeakRef<SetupApplication>,
    widgets: OnceCell<Rc<Widgets>>,
}

impl AccountPage {
    pub fn new(app: &SetupApplication) -> Self {
        Self {
            app: app.downgrade(),
            widgets: OnceCell::new(),
        }
    }
}

impl PageContent for AccountPage {
    fn id(&self) -> PageId {
        PageId::Account
    }

    fn build(&self, page: &Page) -> gtk::Widget {
        let body = page_body();
        body.append(&heading("About You"));

        let data = self.app.upgrade().map(|app| app.data()).unwrap_or_default();

        let full_name = gtk::Entry::builder()
            .placeholder_text("Full Name")
            .text(data.full_name.unwrap_or_default())
            .build();
        let username = gtk::Entry::builder()
            .text(data.username.unwrap_or_default())
            .build();
        let error = gtk::Label::builder()
            .css_classes(["error"])
            .halign(gtk::Align::Start)
            .visible(false)
            .build();

        let form = gtk::Box::builder()
            .orientation(gtk::Orientation::Vertical)
            .spacing(8)
            .halign(gtk::Align::Center)
            .width_request(320)
            .build();
        form.append(&gtk::Label::builder().label("Full Name").halign(gtk::Align::Start).build());
        form.append(&full_name);
        form.append(&gtk::Label::builder().label("Username").halign(gtk::Align::Start).build());
        form.append(&username);
        form.append(&error);
        body.append(&form);

        let widgets = Rc::new(Widgets {
            full_name,
            username,
            error,
        });

        for entry in [&widgets.full_name, &widgets.username] {
            entry.connect_changed(glib::clone!(
                @weak page, @weak widgets =>
                move |_| {
                    widgets.refresh(&page);
                }
            ));
        }

        widgets.refresh(page);
        let _ = self.widgets.set(widgets);

        body.upcast()
    }

    fn apply(&self, page: &Page, cancellable: &gio::Cancellable) -> bool {
        let Some(widgets) = self.widgets.get().cloned() else {
            return false;
        };

        let username = widgets.username();
        let page = page.downgrade();
        let cancellable = cancellable.clone();

        glib::MainContext::default().spawn_local(async move {
            let lookup = username.clone();
            let taken = gio::spawn_blocking(move || matches!(pwd::Passwd::from_name(&lookup), Ok(Some(_))))
                .await
                .unwrap_or(false);

            let Some(page) = page.upgrade() else {
                return;
            };

            let valid = if cancellable.is_cancelled() {
                tracing::debug!("Account check for {} cancelled", username);
                false
            } else if taken {
                widgets.show_error(Some(&UsernameError::Taken));
                false
            } else {
                true
            };

            if let Err(e) = page.apply_complete(valid) {
                tracing::warn!("Account page apply: {}", e);
            }
        });

        true
    }

    fn locale_changed(&self, page: &Page) {
        page.set_title("About You");
    }

    fn save_data(&self, _page: &Page) {
        let (Some(app), Some(widgets)) = (self.app.upgrade(), self.widgets.get()) else {
            return;
        };

        let full_name = widgets.full_name.text().trim().to_string();
        let username = widgets.username();
        app.update_data(|data| {
            data.full_name = Some(full_name).filter(|name| !name.is_empty());
            data.username = Some(username).filter(|name| validate_username(name).is_ok());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert_eq!(validate_username("ada"), Ok(()));
        assert_eq!(validate_username("_svc-1"), Ok(()));
    }

    #[test]
    fn test_invalid_usernames() {
        assert_eq!(validate_username(""), Err(UsernameError::Empty));
        assert_eq!(validate_username("1ada"), Err(UsernameError::InvalidStart));
        assert_eq!(validate_username("Ada"), Err(UsernameError::InvalidStart));
        assert_eq!(validate_username("ada lovelace"), Err(UsernameError::InvalidCharacter(' ')));
        assert_eq!(validate_username(&"a".repeat(33)), Err(UsernameError::TooLong));
    }

    #[test]
    fn test_reserved_usernames() {
        assert_eq!(validate_username("root"), Err(UsernameError::Reserved));
        assert_eq!(validate_username(SETUP_USER), Err(UsernameError::Reserved));
    }

    #[test]
    fn test_suggest_username() {
        assert_eq!(suggest_username("Ada Lovelace"), "ada");
        assert_eq!(suggest_username("  O'Brien Smith"), "obrien");
        assert_eq!(suggest_username(""), "");
    }

    #[test]
    fn test_effective_username_prefers_typed_name() {
        assert_eq!(effective_username("Ada Lovelace", ""), "ada");
        assert_eq!(effective_username("Ada Lovelace", " countess "), "countess");
    }
}
