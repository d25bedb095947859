//! Setup Application - GTK4 application driving the wizard
//!
//! Owns the setup mode, the choices collected so far and the window with
//! the assistant. Pages reach back here to change the language, rebuild
//! the remaining flow and finish setup.

use crate::config::SkipList;
use crate::page_table::{self, SetupMode};
use crate::session::{self, SetupData};
use crate::ui::assistant::Assistant;
use crate::ui::pages;
use crate::ui::window::SetupWindow;
use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::{gio, glib};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

/// Application ID for the setup wizard
const APP_ID: &str = "org.initialsetup.Setup";

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct SetupApplication {
        pub mode: Cell<SetupMode>,
        pub skip_file: RefCell<PathBuf>,
        pub data: RefCell<SetupData>,
        pub window: glib::WeakRef<SetupWindow>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for SetupApplication {
        const NAME: &'static str = "SetupApplication";
        type Type = super::SetupApplication;
        type ParentType = adw::Application;
    }

    impl ObjectImpl for SetupApplication {}

    impl ApplicationImpl for SetupApplication {
        fn activate(&self) {
            let app = self.obj();

            if let Some(window) = self.window.upgrade() {
                window.present();
                return;
            }

            let window = SetupWindow::new(&app);
            self.window.set(Some(&window));

            app.rebuild_pages();
            window.present();
        }

        fn startup(&self) {
            self.parent_startup();

            let css_provider = gtk::CssProvider::new();
            css_provider.load_from_data(include_str!("styles.css"));

            match gtk::gdk::Display::default() {
                Some(display) => {
                    gtk::style_context_add_provider_for_display(
                        &display,
                        &css_provider,
                        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
                    );
                }
                None => {
                    tracing::warn!("No display available. CSS styling will not be applied.");
                }
            }

            let app = self.obj();
            app.setup_actions();
        }
    }

    impl GtkApplicationImpl for SetupApplication {}
    impl AdwApplicationImpl for SetupApplication {}
}

glib::wrapper! {
    pub struct SetupApplication(ObjectSubclass<imp::SetupApplication>)
        @extends adw::Application, gtk::Application, gio::Application,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl SetupApplication {
    pub fn new(mode: SetupMode, skip_file: &Path) -> Self {
        let app: Self = glib::Object::builder()
            .property("application-id", APP_ID)
            .property("flags", gio::ApplicationFlags::FLAGS_NONE)
            .build();

        let imp = app.imp();
        imp.mode.set(mode);
        *imp.skip_file.borrow_mut() = skip_file.to_path_buf();

        app
    }

    fn setup_actions(&self) {
        let quit_action = gio::SimpleAction::new("quit", None);
        quit_action.connect_activate(glib::clone!(
            @weak self as app =>
            move |_, _| {
                app.quit();
            }
        ));
        self.add_action(&quit_action);

        self.set_accels_for_action("app.quit", &["<Ctrl>q"]);
    }

    pub fn mode(&self) -> SetupMode {
        self.imp().mode.get()
    }

    pub fn assistant(&self) -> Option<Assistant> {
        self.imp().window.upgrade().map(|window| window.assistant())
    }

    /// Snapshot of the choices collected so far
    pub fn data(&self) -> SetupData {
        self.imp().data.borrow().clone()
    }

    pub fn update_data<F: FnOnce(&mut SetupData)>(&self, update: F) {
        update(&mut self.imp().data.borrow_mut());
    }

    /// Throw away every page after the current one and construct the rest
    /// of the flow again from the page table.
    pub fn rebuild_pages(&self) {
        let Some(assistant) = self.assistant() else {
            tracing::debug!("No assistant yet, nothing to rebuild");
            return;
        };

        let skip = SkipList::load_or_default(&self.imp().skip_file.borrow());

        let after = match assistant.current_page() {
            Some(current) => {
                assistant.remove_pages_after(&current);
                current.id()
            }
            None => None,
        };

        let ids = page_table::plan(self.mode(), &skip, after);
        tracing::info!(
            "Building pages: {}",
            ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
        );

        for id in ids {
            assistant.add_page(&pages::create(id, self));
        }
    }

    /// Record the chosen language and refresh everything that depends on it
    pub fn set_language(&self, language: &str) {
        let changed = self.imp().data.borrow().language.as_deref() != Some(language);
        if !changed {
            return;
        }

        tracing::info!("Language changed to {}", language);
        self.update_data(|data| data.language = Some(language.to_string()));

        if let Some(assistant) = self.assistant() {
            assistant.locale_changed();
        }
        self.rebuild_pages();
    }

    /// Ask every page to commit its choices into the setup data
    pub fn collect_data(&self) {
        if let Some(assistant) = self.assistant() {
            for page in assistant.pages() {
                page.save_data();
            }
        }
    }

    /// Persist the choices, mark setup as done and quit
    pub fn finish(&self) {
        self.collect_data();

        match session::save_choices(&self.data()) {
            Ok(path) => tracing::info!("Saved setup choices to {}", path.display()),
            Err(e) => tracing::warn!("{:#}", e),
        }

        session::mark_setup_done();
        self.quit();
    }

    pub fn run(&self) -> glib::ExitCode {
        // Command-line flags are handled by clap before GTK starts.
        ApplicationExtManual::run_with_args::<&str>(self, &[])
    }
}
