//! Summary Page - Last page, reviews the choices and finishes setup
//!
//! Being the last visible page, the assistant hides Back/Next here; the
//! page brings its own "Start Using" button in the action area instead.

use super::{heading, page_body};
use crate::page_table::PageId;
use crate::session::SetupData;
use crate::ui::app::SetupApplication;
use crate::ui::page::{Page, PageContent};
use adw::prelude::*;
use gtk::glib;
use std::cell::OnceCell;

pub struct SummaryPage {
    app: glib::WeakRef<SetupApplication>,
    rows: OnceCell<gtk::ListBox>,
    start_button: gtk::Button,
}

impl SummaryPage {
    pub fn new(app: &SetupApplication) -> Self {
        let start_button = gtk::Button::builder()
            .label("_Start Using")
            .use_underline(true)
            .css_classes(["pill", "suggested-action"])
            .build();

        start_button.connect_clicked(glib::clone!(
            @weak app =>
            move |_| {
                app.finish();
            }
        ));

        Self {
            app: app.downgrade(),
            rows: OnceCell::new(),
            start_button,
        }
    }
}

/// Label/value pairs shown in the review list
fn summary_lines(data: &SetupData) -> Vec<(&'static str, String)> {
    let or_default = |value: &Option<String>| {
        value.clone().unwrap_or_else(|| "Not set".to_string())
    };

    vec![
        ("Language", or_default(&data.language)),
        ("Keyboard", or_default(&data.keyboard_layout)),
        ("Full Name", or_default(&data.full_name)),
        ("Username", or_default(&data.username)),
        ("Time Zone", or_default(&data.timezone)),
        (
            "License",
            if data.eula_accepted { "Accepted" } else { "Not accepted" }.to_string(),
        ),
    ]
}

impl PageContent for SummaryPage {
    fn id(&self) -> PageId {
        PageId::Summary
    }

    fn build(&self, page: &Page) -> gtk::Widget {
        let body = page_body();
        body.set_valign(gtk::Align::Center);
        body.append(&heading("Ready to Go"));

        let rows = gtk::ListBox::builder()
            .selection_mode(gtk::SelectionMode::None)
            .css_classes(["boxed-list"])
            .halign(gtk::Align::Center)
            .width_request(360)
            .build();
        body.append(&rows);

        let _ = self.rows.set(rows);
        page.set_complete(true);

        body.upcast()
    }

    fn shown(&self, _page: &Page) {
        let (Some(app), Some(rows)) = (self.app.upgrade(), self.rows.get()) else {
            return;
        };

        app.collect_data();

        while let Some(child) = rows.first_child() {
            rows.remove(&child);
        }

        for (title, value) in summary_lines(&app.data()) {
            let row = adw::ActionRow::builder()
                .title(title)
                .subtitle(value)
                .build();
            rows.append(&row);
        }
    }

    fn locale_changed(&self, page: &Page) {
        page.set_title("Setup Complete");
    }

    fn action_widget(&self) -> Option<gtk::Widget> {
        Some(self.start_button.clone().upcast())
    }

    fn hides_window_controls(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines() {
        let data = SetupData {
            language: Some("de_DE.UTF-8".to_string()),
            username: Some("ada".to_string()),
            eula_accepted: true,
            ..Default::default()
        };

        let lines = summary_lines(&data);
        assert_eq!(lines[0], ("Language", "de_DE.UTF-8".to_string()));
        assert_eq!(lines[1], ("Keyboard", "Not set".to_string()));
        assert_eq!(lines[3], ("Username", "ada".to_string()));
        assert_eq!(lines[5], ("License", "Accepted".to_string()));
    }
}
