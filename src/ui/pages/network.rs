//! Network Page - Shows connectivity before account setup
//!
//! Configuring connections is left to the desktop's network tools; the
//! page only reports whether the system is online and lets the user skip.

use super::{heading, page_body};
use crate::page_table::PageId;
use crate::ui::page::{Page, PageContent};
use adw::prelude::*;
use gtk::{gio, glib};
use std::cell::OnceCell;

const SKIP_LABEL: &str = "_Skip";

/// A `network-changed` handler on a monitor, disconnected when dropped
struct MonitorHandler {
    monitor: gio::NetworkMonitor,
    id: Option<glib::SignalHandlerId>,
}

impl MonitorHandler {
    fn connect<F: Fn(bool) + 'static>(monitor: gio::NetworkMonitor, f: F) -> Self {
        let id = monitor.connect_network_changed(move |_, available| f(available));
        Self {
            monitor,
            id: Some(id),
        }
    }
}

impl Drop for MonitorHandler {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.monitor.disconnect(id);
        }
    }
}

#[derive(Default)]
pub struct NetworkPage {
    // The default monitor is process-wide and outlives rebuilt pages.
    handler: OnceCell<MonitorHandler>,
}

impl NetworkPage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn update_status(page: &Page, status: &adw::StatusPage, available: bool) {
    if available {
        status.set_icon_name(Some("network-wireless-symbolic"));
        status.set_title("Connected");
        status.set_description(Some("This computer is connected to the internet."));
        page.set_forward_text(None);
    } else {
        status.set_icon_name(Some("network-offline-symbolic"));
        status.set_title("Offline");
        status.set_description(Some(
            "Connecting lets you set the time automatically and find your location.",
        ));
        page.set_forward_text(Some(SKIP_LABEL));
    }
}

impl PageContent for NetworkPage {
    fn id(&self) -> PageId {
        PageId::Network
    }

    fn build(&self, page: &Page) -> gtk::Widget {
        let body = page_body();
        body.append(&heading("Network"));

        let status = adw::StatusPage::builder().vexpand(true).build();
        body.append(&status);

        let monitor = gio::NetworkMonitor::default();
        update_status(page, &status, monitor.is_network_available());

        let handler = MonitorHandler::connect(monitor, glib::clone!(
            @weak page, @weak status =>
            move |available: bool| {
                tracing::debug!("Network availability changed: {}", available);
                update_status(&page, &status, available);
            }
        ));
        let _ = self.handler.set(handler);

        page.set_complete(true);

        body.upcast()
    }

    fn locale_changed(&self, page: &Page) {
        page.set_title("Network");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_monitor_handler_disconnects_on_drop() {
        let monitor = gio::NetworkMonitor::default();
        let seen = Rc::new(());

        let captured = seen.clone();
        let handler = MonitorHandler::connect(monitor, move |_| {
            let _seen = Rc::clone(&captured);
        });
        assert_eq!(Rc::strong_count(&seen), 2);

        drop(handler);
        assert_eq!(Rc::strong_count(&seen), 1);
    }
}
