use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::menu::{self, ItemSkin};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::timers::GlibTimers;
use crate::gui::{background, effects, window};
use crate::sys::haptics::{self, HapticsError};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use smartmenu::gesture::TimerId;
use smartmenu::{Point, PointerId, Response, SmartTable, Viewport};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

pub struct AppModel {
    pub table: Rc<RefCell<SmartTable>>,
    pub config: Rc<RefCell<Config>>,
    pub skins: Rc<RefCell<Vec<ItemSkin>>>,
    pub timers: GlibTimers,
    pub drawing_area: gtk::DrawingArea,
    ticking: Rc<Cell<bool>>,
}

#[derive(Debug)]
pub enum AppMsg {
    PointerDown(PointerId, Point),
    PointerMove(PointerId, Point),
    PointerUp(PointerId, Point),
    PointerLeave,
    Resize(i32, i32),
    LongPressElapsed(TimerId),
    Dismiss,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

/// Touch input arrives with an event sequence, mouse input without one.
fn pointer_of(gesture: &gtk::GestureDrag) -> PointerId {
    if gesture.current_sequence().is_some() {
        PointerId::TOUCH
    } else {
        PointerId::MOUSE
    }
}

fn drag_point(gesture: &gtk::GestureDrag, offset_x: f64, offset_y: f64) -> Option<Point> {
    gesture
        .start_point()
        .map(|(x, y)| Point::new(x + offset_x, y + offset_y))
}

pub struct AppInit {
    pub config: Config,
    pub windowed: bool,
    pub events: async_channel::Receiver<AppEvent>,
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Smart Table"),
            add_css_class: "smart-table-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Dismiss);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "smart-table-surface",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::EventControllerMotion {
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::PointerLeave);
                    }
                },

                add_controller = gtk::GestureDrag {
                    set_button: 0, // Listen to all buttons
                    set_touch_only: false,
                    connect_drag_begin[sender] => move |gesture, x, y| {
                        sender.input(AppMsg::PointerDown(pointer_of(gesture), Point::new(x, y)));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some(p) = drag_point(gesture, dx, dy) {
                            sender.input(AppMsg::PointerMove(pointer_of(gesture), p));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, dx, dy| {
                        if let Some(p) = drag_point(gesture, dx, dy) {
                            sender.input(AppMsg::PointerUp(pointer_of(gesture), p));
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            config,
            windowed,
            events,
        } = init;

        theme::load_css();
        window::init_kiosk(&root, &config.kiosk, windowed);

        let timer_sender = sender.input_sender().clone();
        let timers = GlibTimers::new(move |id| timer_sender.emit(AppMsg::LongPressElapsed(id)));

        let model = AppModel {
            table: Rc::new(RefCell::new(SmartTable::new(Viewport::default()))),
            skins: Rc::new(RefCell::new(menu::skins(&config))),
            config: Rc::new(RefCell::new(config)),
            timers,
            drawing_area: gtk::DrawingArea::default(),
            ticking: Rc::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let (table, skins, config) = (
            model.table.clone(),
            model.skins.clone(),
            model.config.clone(),
        );
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let (width, height) = (width as f64, height as f64);
                let now = Instant::now();
                let table = table.borrow();

                let result = background::draw(cr, width, height)
                    .and_then(|_| effects::draw(cr, &table.effects().sample(now), &colors))
                    .and_then(|_| menu::draw(cr, &table, &skins.borrow(), &colors, now))
                    .and_then(|_| {
                        let config = config.borrow();
                        if config.kiosk.show_hint && !table.menu().visible() {
                            menu::view::draw_hint(cr, &config.kiosk.hint, width, height, &colors)
                        } else {
                            Ok(())
                        }
                    });
                if let Err(e) = result {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        let now = Instant::now();
        let response = match msg {
            AppMsg::PointerDown(pointer, p) => {
                self.table
                    .borrow_mut()
                    .pointer_down(pointer, p, now, &mut self.timers)
            }
            AppMsg::PointerMove(pointer, p) => self.table.borrow_mut().pointer_move(pointer, p),
            AppMsg::PointerUp(pointer, p) => {
                self.table
                    .borrow_mut()
                    .pointer_up(pointer, p, now, &mut self.timers)
            }
            AppMsg::PointerLeave => self.table.borrow_mut().pointer_leave(now, &mut self.timers),
            AppMsg::Resize(width, height) => self
                .table
                .borrow_mut()
                .set_viewport(Viewport::new(width as f64, height as f64)),
            AppMsg::LongPressElapsed(id) => self.table.borrow_mut().timer_elapsed(id, now),
            AppMsg::Dismiss => self.table.borrow_mut().close(now, &mut self.timers),
            AppMsg::ConfigReload => self.reload_config(),
        };
        self.respond(response);
    }
}

impl AppModel {
    fn respond(&mut self, response: Response) {
        if let Some(duration) = response.haptic {
            self.pulse(duration);
        }
        if response.should_redraw || self.table.borrow().is_animating(Instant::now()) {
            self.drawing_area.queue_draw();
            self.start_ticking();
        }
    }

    fn pulse(&self, duration: std::time::Duration) {
        let config = self.config.borrow();
        if !config.haptics.enabled {
            return;
        }
        match haptics::pulse(duration, config.haptics.command.as_ref()) {
            Ok(()) => {}
            Err(HapticsError::NotConfigured) => log::debug!("Haptic pulse skipped: no command"),
            Err(e) => log::warn!("{}", e),
        }
    }

    /// Redraws every frame until nothing is animating.
    fn start_ticking(&self) {
        if self.ticking.replace(true) {
            return;
        }
        let table = self.table.clone();
        let ticking = self.ticking.clone();
        self.drawing_area.add_tick_callback(move |area, _clock| {
            let animating = table.borrow_mut().tick(Instant::now());
            area.queue_draw();
            if animating {
                glib::ControlFlow::Continue
            } else {
                ticking.set(false);
                glib::ControlFlow::Break
            }
        });
    }

    fn reload_config(&mut self) -> Response {
        match config::load_config() {
            Ok(new_config) => {
                *self.skins.borrow_mut() = menu::skins(&new_config);
                *self.config.borrow_mut() = new_config;
                log::info!("Configuration reloaded");
                Response {
                    should_redraw: true,
                    haptic: None,
                }
            }
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                Response::default()
            }
        }
    }
}
