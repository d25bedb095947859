//! Setup Window - Frameless window hosting the assistant
//!
//! The whole window is draggable through a GtkWindowHandle. The header
//! shows the current page's title and a close button that pages can hide.

use crate::ui::app::SetupApplication;
use crate::ui::assistant::Assistant;
use crate::ui::page::Page;
use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;

mod imp {
    use super::*;

    #[derive(gtk::CompositeTemplate, Default)]
    #[template(string = r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <interface>
            <template class="SetupWindow" parent="AdwApplicationWindow">
                <property name="default-width">900</property>
                <property name="default-height">640</property>
                <property name="decorated">false</property>
                <style>
                    <class name="setup-window"/>
                </style>
                <property name="content">
                    <object class="GtkWindowHandle">
                        <property name="child">
                            <object class="GtkBox" id="main_box">
                                <property name="orientation">vertical</property>
                                <property name="margin-start">24</property>
                                <property name="margin-end">24</property>
                                <property name="margin-top">16</property>
                                <property name="margin-bottom">24</property>

                                <!-- Page title and window controls -->
                                <child>
                                    <object class="GtkCenterBox" id="header_box">
                                        <property name="margin-bottom">12</property>
                                        <property name="center-widget">
                                            <object class="GtkLabel" id="title_label">
                                                <style>
                                                    <class name="title-2"/>
                                                </style>
                                            </object>
                                        </property>
                                        <property name="end-widget">
                                            <object class="GtkButton" id="close_button">
                                                <property name="icon-name">window-close-symbolic</property>
                                                <property name="valign">center</property>
                                                <property name="tooltip-text">Close</property>
                                                <style>
                                                    <class name="circular"/>
                                                    <class name="flat"/>
                                                </style>
                                            </object>
                                        </property>
                                    </object>
                                </child>

                                <!-- Assistant area -->
                                <child>
                                    <object class="GtkBox" id="content_box">
                                        <property name="orientation">vertical</property>
                                        <property name="vexpand">true</property>
                                        <property name="valign">fill</property>
                                    </object>
                                </child>
                            </object>
                        </property>
                    </object>
                </property>
            </template>
        </interface>
    "#)]
    pub struct SetupWindow {
        #[template_child]
        pub content_box: TemplateChild<gtk::Box>,

        #[template_child]
        pub title_label: TemplateChild<gtk::Label>,

        #[template_child]
        pub close_button: TemplateChild<gtk::Button>,

        pub assistant: Assistant,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for SetupWindow {
        const NAME: &'static str = "SetupWindow";
        type Type = super::SetupWindow;
        type ParentType = adw::ApplicationWindow;

        fn class_init(klass: &mut Self::Class) {
            klass.bind_template();
        }

        fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
            obj.init_template();
        }
    }

    impl ObjectImpl for SetupWindow {
        fn constructed(&self) {
            self.parent_constructed();

            let window = self.obj();

            self.close_button.connect_clicked(glib::clone!(
                @weak window =>
                move |_| {
                    window.close();
                }
            ));

            self.content_box.append(&self.assistant);
            if let Some(forward) = self.assistant.forward_button() {
                window.set_default_widget(Some(&forward));
            }

            self.assistant
                .bind_property("title", &*self.title_label, "label")
                .sync_create()
                .build();

            self.assistant.connect_local(
                "prepare",
                false,
                glib::clone!(@weak window => @default-return None, move |values: &[glib::Value]| {
                    if let Ok(page) = values[1].get::<Page>() {
                        window.imp().close_button.set_visible(!page.hides_window_controls());
                    }
                    None
                }),
            );
        }
    }

    impl WidgetImpl for SetupWindow {}
    impl WindowImpl for SetupWindow {}
    impl ApplicationWindowImpl for SetupWindow {}
    impl AdwApplicationWindowImpl for SetupWindow {}
}

glib::wrapper! {
    pub struct SetupWindow(ObjectSubclass<imp::SetupWindow>)
        @extends adw::ApplicationWindow, gtk::ApplicationWindow, gtk::Window, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Native, gtk::Root, gtk::ShortcutManager;
}

impl SetupWindow {
    pub fn new(app: &SetupApplication) -> Self {
        glib::Object::builder()
            .property("application", app)
            .build()
    }

    pub fn assistant(&self) -> Assistant {
        self.imp().assistant.clone()
    }
}
