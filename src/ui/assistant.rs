//! Assistant - Paged container driving the setup flow
//!
//! Hosts the setup pages in a `GtkStack` and owns the action bar below
//! it: the current page's action widget, the progress dots and the
//! Back/Next buttons. Ordering and stepping live in `PageSequence`; this
//! widget keeps the on-screen state in sync with it.

use crate::navigation::{Direction, PageSequence};
use crate::ui::page::Page;
use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;
use std::cell::RefCell;
use std::collections::HashMap;

const NEXT_LABEL: &str = "_Next";
const BACK_LABEL: &str = "_Back";

/// Widgets of the action bar
#[derive(Debug, Clone)]
pub struct Widgets {
    pub stack: gtk::Stack,
    pub back: gtk::Button,
    pub forward: gtk::Button,
    pub progress_indicator: gtk::Box,
    pub page_action_area: gtk::Box,
}

mod imp {
    use super::*;
    use std::sync::OnceLock;

    #[derive(Default)]
    pub struct Assistant {
        pub pages: RefCell<PageSequence<Page>>,
        pub widgets: RefCell<Option<Widgets>>,
        pub page_handlers: RefCell<HashMap<Page, glib::SignalHandlerId>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for Assistant {
        const NAME: &'static str = "SetupAssistant";
        type Type = super::Assistant;
        type ParentType = gtk::Box;
    }

    impl ObjectImpl for Assistant {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_ui();
        }

        fn properties() -> &'static [glib::ParamSpec] {
            static PROPERTIES: OnceLock<Vec<glib::ParamSpec>> = OnceLock::new();
            PROPERTIES.get_or_init(|| {
                vec![glib::ParamSpecString::builder("title")
                    .read_only()
                    .build()]
            })
        }

        fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
            match pspec.name() {
                "title" => self.obj().title().to_value(),
                name => {
                    tracing::warn!("Invalid property on assistant: {}", name);
                    pspec.default_value().clone()
                }
            }
        }

        fn signals() -> &'static [glib::subclass::Signal] {
            static SIGNALS: OnceLock<Vec<glib::subclass::Signal>> = OnceLock::new();
            SIGNALS.get_or_init(|| {
                vec![
                    // A new page became current, before it is shown
                    glib::subclass::Signal::builder("prepare")
                        .param_types([Page::static_type()])
                        .build(),
                    // The current page is being left forwards
                    glib::subclass::Signal::builder("next-page")
                        .param_types([Page::static_type()])
                        .build(),
                ]
            })
        }

        fn dispose(&self) {
            for (page, handler) in self.page_handlers.borrow_mut().drain() {
                page.disconnect(handler);
            }
        }
    }

    impl WidgetImpl for Assistant {}
    impl BoxImpl for Assistant {}
}

glib::wrapper! {
    pub struct Assistant(ObjectSubclass<imp::Assistant>)
        @extends gtk::Box, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Orientable;
}

impl Assistant {
    pub fn new() -> Self {
        glib::Object::builder()
            .property("orientation", gtk::Orientation::Vertical)
            .property("spacing", 20)
            .property("vexpand", true)
            .build()
    }

    fn setup_ui(&self) {
        let stack = gtk::Stack::builder()
            .hexpand(true)
            .vexpand(true)
            .transition_duration(250)
            .build();

        let back = gtk::Button::builder()
            .use_underline(true)
            .css_classes(["pill"])
            .build();

        let forward = gtk::Button::builder()
            .use_underline(true)
            .css_classes(["pill", "suggested-action"])
            .build();

        let navigation = gtk::Box::builder()
            .orientation(gtk::Orientation::Horizontal)
            .spacing(6)
            .homogeneous(true)
            .halign(gtk::Align::End)
            .hexpand(true)
            .build();
        navigation.append(&back);
        navigation.append(&forward);

        let progress_indicator = gtk::Box::builder()
            .orientation(gtk::Orientation::Horizontal)
            .halign(gtk::Align::Center)
            .css_classes(["progress-dots"])
            .build();

        let page_action_area = gtk::Box::builder()
            .orientation(gtk::Orientation::Horizontal)
            .halign(gtk::Align::Start)
            .build();

        let action_area = gtk::CenterBox::builder()
            .css_classes(["action-area"])
            .build();
        action_area.set_start_widget(Some(&page_action_area));
        action_area.set_center_widget(Some(&progress_indicator));
        action_area.set_end_widget(Some(&navigation));

        forward.connect_clicked(glib::clone!(
            @weak self as assistant =>
            move |_| {
                assistant.next_page();
            }
        ));

        back.connect_clicked(glib::clone!(
            @weak self as assistant =>
            move |_| {
                assistant.previous_page();
            }
        ));

        self.append(&stack);
        self.append(&action_area);

        *self.imp().widgets.borrow_mut() = Some(Widgets {
            stack,
            back,
            forward,
            progress_indicator,
            page_action_area,
        });

        self.locale_changed();
        self.update_navigation_buttons();
    }

    fn widgets(&self) -> Option<Widgets> {
        self.imp().widgets.borrow().clone()
    }

    /// The Next button, so the window can make it its default widget
    pub fn forward_button(&self) -> Option<gtk::Button> {
        self.widgets().map(|widgets| widgets.forward)
    }

    pub fn current_page(&self) -> Option<Page> {
        self.imp().pages.borrow().current().cloned()
    }

    pub fn pages(&self) -> Vec<Page> {
        self.imp().pages.borrow().iter().cloned().collect()
    }

    /// Title of the current page, empty without one
    pub fn title(&self) -> String {
        self.current_page().map(|page| page.title()).unwrap_or_default()
    }

    /// Append a page to the end of the flow
    pub fn add_page(&self, page: &Page) {
        if !self.imp().pages.borrow_mut().push(page.clone()) {
            tracing::warn!("Page {:?} was already added", page.id());
            return;
        }

        if let Some(widgets) = self.widgets() {
            widgets.stack.add_child(page);
        }

        let handler = page.connect_notify_local(
            None,
            glib::clone!(@weak self as assistant => move |page, pspec| {
                assistant.page_notify(page, pspec.name());
            }),
        );
        self.imp()
            .page_handlers
            .borrow_mut()
            .insert(page.clone(), handler);

        match self.current_page() {
            None if page.is_visible() => self.switch_to(None, page),
            Some(current) => {
                let follows_current = self.imp().pages.borrow().next_shown(&current) == Some(page);
                if follows_current {
                    self.update_navigation_buttons();
                }
            }
            None => {}
        }

        self.update_progress_indicator();
    }

    /// Remove a page from the flow
    pub fn remove_page(&self, page: &Page) {
        if self.imp().pages.borrow_mut().remove(page).is_none() {
            return;
        }

        self.detach(page);
        self.update_navigation_buttons();
        self.update_progress_indicator();
    }

    /// Remove every page after `page`
    pub fn remove_pages_after(&self, page: &Page) {
        let removed = self.imp().pages.borrow_mut().truncate_after(page);
        if removed.is_empty() {
            return;
        }

        tracing::debug!("Removing {} pages after {:?}", removed.len(), page.id());
        for removed_page in &removed {
            self.detach(removed_page);
        }

        self.update_navigation_buttons();
        self.update_progress_indicator();
    }

    fn detach(&self, page: &Page) {
        page.apply_cancel();

        if let Some(handler) = self.imp().page_handlers.borrow_mut().remove(page) {
            page.disconnect(handler);
        }

        if let Some(widgets) = self.widgets() {
            widgets.stack.remove(page);
        }
    }

    /// Leave the current page forwards once it has applied successfully
    pub fn next_page(&self) {
        let Some(page) = self.current_page() else {
            return;
        };

        if page.is_applying() {
            tracing::debug!("Page {:?} is still applying", page.id());
            return;
        }

        if self.imp().pages.borrow().next_shown(&page).is_none() {
            tracing::warn!("No page after {:?}", page.id());
            return;
        }

        self.emit_by_name::<()>("next-page", &[&page]);

        let result = page.apply_begin(glib::clone!(
            @weak self as assistant =>
            move |page: &Page, valid: bool| {
                assistant.apply_finished(page, valid);
            }
        ));

        if let Err(e) = result {
            tracing::warn!("Could not apply page {:?}: {}", page.id(), e);
        }
    }

    fn apply_finished(&self, page: &Page, valid: bool) {
        if !valid {
            tracing::debug!("Page {:?} rejected its input", page.id());
            return;
        }

        // The user may have gone back while the page was applying.
        if self.current_page().as_ref() != Some(page) {
            return;
        }

        // Looked up now: applying a page may rebuild the pages after it.
        let next = self.imp().pages.borrow().next_shown(page).cloned();
        match next {
            Some(next) => self.switch_to(Some(Direction::Next), &next),
            None => tracing::debug!("Page {:?} is the last page", page.id()),
        }
    }

    /// Go back to the previous shown page, abandoning any pending apply
    pub fn previous_page(&self) {
        let Some(page) = self.current_page() else {
            return;
        };

        page.apply_cancel();

        let previous = self.imp().pages.borrow().previous_shown(&page).cloned();
        match previous {
            Some(previous) => self.switch_to(Some(Direction::Previous), &previous),
            None => tracing::warn!("No page before {:?}", page.id()),
        }
    }

    fn switch_to(&self, direction: Option<Direction>, page: &Page) {
        if let Some(widgets) = self.widgets() {
            widgets.stack.set_transition_type(match direction {
                Some(Direction::Next) => gtk::StackTransitionType::SlideLeft,
                Some(Direction::Previous) => gtk::StackTransitionType::SlideRight,
                None => gtk::StackTransitionType::None,
            });
            widgets.stack.set_visible_child(page);
        }

        self.current_page_changed(page);
    }

    fn current_page_changed(&self, page: &Page) {
        if !self.imp().pages.borrow_mut().set_current(page) {
            return;
        }

        tracing::info!("Showing page {:?}", page.id());

        self.notify("title");
        self.prepare();
        self.emit_by_name::<()>("prepare", &[page]);
        page.shown();
    }

    fn prepare(&self) {
        self.update_action_widget();
        self.update_navigation_buttons();
        self.update_progress_indicator();
    }

    fn page_notify(&self, page: &Page, property: &str) {
        let is_current = self.current_page().as_ref() == Some(page);

        match property {
            "visible" => {
                self.update_navigation_buttons();
                self.update_progress_indicator();
            }
            "title" if is_current => self.notify("title"),
            _ if is_current => self.update_navigation_buttons(),
            _ => {}
        }
    }

    fn update_action_widget(&self) {
        let Some(widgets) = self.widgets() else {
            return;
        };

        let area = &widgets.page_action_area;
        while let Some(child) = area.first_child() {
            area.remove(&child);
        }

        if let Some(action) = self.current_page().and_then(|page| page.action_widget()) {
            area.append(&action);
        }
    }

    fn update_navigation_buttons(&self) {
        let Some(widgets) = self.widgets() else {
            return;
        };
        let buttons = self.imp().pages.borrow().buttons();

        widgets.back.set_visible(buttons.back_visible);
        widgets.back.set_sensitive(buttons.back_sensitive);
        widgets.forward.set_visible(buttons.forward_visible);
        widgets.forward.set_sensitive(buttons.forward_sensitive);

        let label = self
            .current_page()
            .and_then(|page| page.forward_text())
            .unwrap_or_else(|| NEXT_LABEL.to_string());
        widgets.forward.set_label(&label);
    }

    fn update_progress_indicator(&self) {
        let Some(widgets) = self.widgets() else {
            return;
        };

        let indicator = &widgets.progress_indicator;
        while let Some(child) = indicator.first_child() {
            indicator.remove(&child);
        }

        let dots = self.imp().pages.borrow().progress();
        for is_current in dots {
            let dot = gtk::Label::new(Some("•"));
            if !is_current {
                dot.add_css_class("dim-label");
            }
            indicator.append(&dot);
        }
    }

    /// Refresh the button labels and let every page retranslate itself
    pub fn locale_changed(&self) {
        if let Some(widgets) = self.widgets() {
            widgets.back.set_label(BACK_LABEL);
            widgets.back.set_use_underline(true);
        }
        self.update_navigation_buttons();

        for page in self.pages() {
            page.locale_changed();
        }
    }
}

impl Default for Assistant {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_table::PageId;
    use crate::ui::page::PageContent;
    use std::rc::Rc;

    struct BlankPage(PageId);

    impl PageContent for BlankPage {
        fn id(&self) -> PageId {
            self.0
        }

        fn build(&self, page: &Page) -> gtk::Widget {
            page.set_complete(true);
            gtk::Label::new(None).upcast()
        }
    }

    #[test]
    fn test_assistant_walks_pages_through_its_buttons() {
        // Needs a display; nothing to check without one.
        if gtk::init().is_err() {
            return;
        }

        let assistant = Assistant::new();
        let forward = assistant.forward_button().unwrap();

        let first = Page::new(Rc::new(BlankPage(PageId::Language)));
        let last = Page::new(Rc::new(BlankPage(PageId::Summary)));
        assistant.add_page(&first);
        assistant.add_page(&last);

        assert_eq!(assistant.current_page(), Some(first.clone()));
        assert!(forward.is_visible());
        assert!(forward.is_sensitive());

        assistant.next_page();
        assert_eq!(assistant.current_page(), Some(last.clone()));
        assert!(!forward.is_visible());

        assistant.remove_pages_after(&first);
        assert_eq!(assistant.current_page(), None);
        assert_eq!(assistant.pages(), vec![first]);
    }
}
