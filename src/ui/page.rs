//! Setup Page - Common base for every page shown by the assistant
//!
//! A `Page` owns the state the assistant cares about (title, completion,
//! the apply lifecycle) and delegates everything page-specific to a
//! `PageContent` implementation.

use crate::apply::{ApplyError, ApplyState};
use crate::navigation::NavigationEntry;
use crate::page_table::PageId;
use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::{gio, glib};
use std::cell::{Cell, OnceCell, RefCell};
use std::rc::Rc;

/// Page-specific behaviour plugged into a [`Page`]
pub trait PageContent {
    fn id(&self) -> PageId;

    /// Build the page body. Called once, while the page is constructed.
    fn build(&self, page: &Page) -> gtk::Widget;

    /// Apply the page's settings before the assistant moves on.
    ///
    /// Return `false` when there is nothing to wait for; the apply then
    /// completes immediately as valid. Return `true` to finish later via
    /// [`Page::apply_complete`], honouring `cancellable`.
    fn apply(&self, _page: &Page, _cancellable: &gio::Cancellable) -> bool {
        false
    }

    fn locale_changed(&self, _page: &Page) {}

    /// Commit the page's choices into the shared setup data
    fn save_data(&self, _page: &Page) {}

    /// The page has just become the current page
    fn shown(&self, _page: &Page) {}

    /// Extra widget placed in the assistant's action area
    fn action_widget(&self) -> Option<gtk::Widget> {
        None
    }

    fn hides_forward_button(&self) -> bool {
        false
    }

    fn hides_backward_button(&self) -> bool {
        false
    }

    fn hides_window_controls(&self) -> bool {
        false
    }
}

mod imp {
    use super::*;
    use std::sync::OnceLock;

    #[derive(Default)]
    pub struct Page {
        pub content: OnceCell<Rc<dyn PageContent>>,
        pub title: RefCell<String>,
        pub forward_text: RefCell<Option<String>>,
        pub complete: Cell<bool>,
        pub apply: RefCell<ApplyState>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for Page {
        const NAME: &'static str = "SetupPage";
        type Type = super::Page;
        type ParentType = gtk::Box;
    }

    impl ObjectImpl for Page {
        fn properties() -> &'static [glib::ParamSpec] {
            static PROPERTIES: OnceLock<Vec<glib::ParamSpec>> = OnceLock::new();
            PROPERTIES.get_or_init(|| {
                vec![
                    glib::ParamSpecString::builder("title")
                        .explicit_notify()
                        .build(),
                    glib::ParamSpecString::builder("forward-text")
                        .explicit_notify()
                        .build(),
                    glib::ParamSpecBoolean::builder("complete")
                        .explicit_notify()
                        .build(),
                    glib::ParamSpecBoolean::builder("applying")
                        .read_only()
                        .build(),
                ]
            })
        }

        fn set_property(&self, _id: usize, value: &glib::Value, pspec: &glib::ParamSpec) {
            let page = self.obj();
            match pspec.name() {
                "title" => {
                    let title: Option<String> = value.get().unwrap_or_default();
                    page.set_title(title.as_deref().unwrap_or_default());
                }
                "forward-text" => {
                    let text: Option<String> = value.get().unwrap_or_default();
                    page.set_forward_text(text.as_deref());
                }
                "complete" => page.set_complete(value.get().unwrap_or_default()),
                name => tracing::warn!("Invalid property on page: {}", name),
            }
        }

        fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
            let page = self.obj();
            match pspec.name() {
                "title" => page.title().to_value(),
                "forward-text" => page.forward_text().to_value(),
                "complete" => page.is_complete().to_value(),
                "applying" => page.is_applying().to_value(),
                name => {
                    tracing::warn!("Invalid property on page: {}", name);
                    pspec.default_value().clone()
                }
            }
        }

        fn dispose(&self) {
            self.apply.borrow().cancel();
        }
    }

    impl WidgetImpl for Page {}
    impl BoxImpl for Page {}
}

glib::wrapper! {
    pub struct Page(ObjectSubclass<imp::Page>)
        @extends gtk::Box, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Orientable;
}

impl Page {
    pub fn new(content: Rc<dyn PageContent>) -> Self {
        let page: Self = glib::Object::builder()
            .property("orientation", gtk::Orientation::Vertical)
            .property("hexpand", true)
            .property("vexpand", true)
            .build();

        let _ = page.imp().content.set(content.clone());

        let body = content.build(&page);
        page.append(&body);
        page.locale_changed();

        page
    }

    fn content(&self) -> Option<Rc<dyn PageContent>> {
        self.imp().content.get().cloned()
    }

    pub fn id(&self) -> Option<PageId> {
        self.content().map(|content| content.id())
    }

    pub fn title(&self) -> String {
        self.imp().title.borrow().clone()
    }

    pub fn set_title(&self, title: &str) {
        *self.imp().title.borrow_mut() = title.to_string();
        self.notify("title");
    }

    pub fn forward_text(&self) -> Option<String> {
        self.imp().forward_text.borrow().clone()
    }

    /// Override the label of the assistant's Next button; `None` restores it
    pub fn set_forward_text(&self, text: Option<&str>) {
        *self.imp().forward_text.borrow_mut() = text.map(str::to_string);
        self.notify("forward-text");
    }

    pub fn is_complete(&self) -> bool {
        self.imp().complete.get()
    }

    pub fn set_complete(&self, complete: bool) {
        self.imp().complete.set(complete);
        self.notify("complete");
    }

    pub fn is_applying(&self) -> bool {
        self.imp().apply.borrow().is_applying()
    }

    /// Start applying the page; `callback` runs once with the outcome.
    pub fn apply_begin<F>(&self, callback: F) -> Result<(), ApplyError>
    where
        F: FnOnce(&Page, bool) + 'static,
    {
        // Held weakly so a removed page can still be disposed mid-apply.
        let page = self.downgrade();
        let cancellable = self
            .imp()
            .apply
            .borrow_mut()
            .begin(Box::new(move |valid| {
                if let Some(page) = page.upgrade() {
                    callback(&page, valid);
                }
            }))?;

        self.notify("applying");

        let deferred = self
            .content()
            .map_or(false, |content| content.apply(self, &cancellable));

        if !deferred {
            // Nothing to wait for; finish straight away to avoid flicker.
            self.apply_complete(true)?;
        }

        Ok(())
    }

    /// Report the outcome of an apply started by [`Page::apply_begin`]
    pub fn apply_complete(&self, valid: bool) -> Result<(), ApplyError> {
        let callback = self.imp().apply.borrow_mut().finish()?;
        self.notify("applying");

        if let Some(callback) = callback {
            callback(valid);
        }

        Ok(())
    }

    pub fn apply_cancel(&self) {
        if self.imp().apply.borrow().cancel() {
            tracing::debug!("Cancelled apply of page {:?}", self.id());
        }
    }

    pub fn locale_changed(&self) {
        if let Some(content) = self.content() {
            content.locale_changed(self);
        }
    }

    pub fn save_data(&self) {
        if let Some(content) = self.content() {
            content.save_data(self);
        }
    }

    pub fn shown(&self) {
        if let Some(content) = self.content() {
            content.shown(self);
        }
    }

    pub fn action_widget(&self) -> Option<gtk::Widget> {
        self.content().and_then(|content| content.action_widget())
    }

    pub fn hides_forward_button(&self) -> bool {
        self.content().map_or(false, |content| content.hides_forward_button())
    }

    pub fn hides_backward_button(&self) -> bool {
        self.content().map_or(false, |content| content.hides_backward_button())
    }

    pub fn hides_window_controls(&self) -> bool {
        self.content().map_or(false, |content| content.hides_window_controls())
    }
}

impl NavigationEntry for Page {
    fn is_shown(&self) -> bool {
        self.is_visible()
    }

    fn is_complete(&self) -> bool {
        Page::is_complete(self)
    }

    fn is_applying(&self) -> bool {
        Page::is_applying(self)
    }

    fn hides_forward(&self) -> bool {
        self.hides_forward_button()
    }

    fn hides_backward(&self) -> bool {
        self.hides_backward_button()
    }
}
