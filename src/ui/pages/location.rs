//! Location Page - Time zone selection

use super::{heading, page_body};
use crate::page_table::PageId;
use crate::ui::app::SetupApplication;
use crate::ui::page::{Page, PageContent};
use adw::prelude::*;
use gtk::glib;
use std::cell::OnceCell;

pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Time zones offered when no zone database is readable
const FALLBACK_TIMEZONES: &[&str] = &[
    "UTC",
    "America/New_York",
    "America/Sao_Paulo",
    "Europe/Berlin",
    "Europe/London",
    "Europe/Madrid",
    "Europe/Paris",
];

/// tzdata's list of canonical zones
const ZONE_TAB: &str = "/usr/share/zoneinfo/zone1970.tab";

pub struct LocationPage {
    app: glib::WeakRef<SetupApplication>,
    zones: Vec<String>,
    dropdown: OnceCell<gtk::DropDown>,
}

impl LocationPage {
    pub fn new(app: &SetupApplication) -> Self {
        let zones = std::fs::read_to_string(ZONE_TAB)
            .map(|contents| parse_zone_tab(&contents))
            .unwrap_or_default();

        Self {
            app: app.downgrade(),
            zones: if zones.is_empty() {
                FALLBACK_TIMEZONES.iter().map(|zone| zone.to_string()).collect()
            } else {
                zones
            },
            dropdown: OnceCell::new(),
        }
    }

    fn selected_zone(&self) -> Option<&str> {
        let index = self.dropdown.get()?.selected();
        self.zones.get(index as usize).map(String::as_str)
    }
}

/// Zone names from a `zone1970.tab`-style file, sorted, with UTC first
fn parse_zone_tab(contents: &str) -> Vec<String> {
    let mut zones: Vec<String> = contents
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| line.split('\t').nth(2))
        .map(str::to_string)
        .collect();

    zones.sort();
    zones.dedup();
    zones.insert(0, DEFAULT_TIMEZONE.to_string());
    zones
}

impl PageContent for LocationPage {
    fn id(&self) -> PageId {
        PageId::Location
    }

    fn build(&self, page: &Page) -> gtk::Widget {
        let body = page_body();
        body.append(&heading("Time Zone"));

        let names: Vec<&str> = self.zones.iter().map(String::as_str).collect();
        let dropdown = gtk::DropDown::from_strings(&names);
        dropdown.set_halign(gtk::Align::Center);
        dropdown.set_enable_search(true);

        let current = self
            .app
            .upgrade()
            .and_then(|app| app.data().timezone)
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        if let Some(index) = self.zones.iter().position(|zone| *zone == current) {
            dropdown.set_selected(index as u32);
        }

        body.append(&dropdown);
        let _ = self.dropdown.set(dropdown);
        page.set_complete(true);

        body.upcast()
    }

    fn locale_changed(&self, page: &Page) {
        page.set_title("Time Zone");
    }

    fn save_data(&self, _page: &Page) {
        let (Some(app), Some(zone)) = (self.app.upgrade(), self.selected_zone()) else {
            return;
        };
        let zone = zone.to_string();
        app.update_data(|data| data.timezone = Some(zone));
    }
}
