//! DOM bootstrap: finds the widget's elements, creates the controller once
//! the source scan is available and wires the radio buttons.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Event, EventTarget, HtmlCanvasElement, HtmlInputElement, MouseEvent,
    WebGl2RenderingContext as GL,
};

use crate::cancel::{LoadGeneration, LoadTicket};
use crate::config::{self, OverlayConfig, Variant};
use crate::error::OverlayError;
use crate::homography::Homography;
use crate::pair;

use super::loader::{self, PairElements};
use super::overlay::{has_loaded_source, OverlayController};
use super::render;

/// One overlay canvas with its images and the controller driving it.
pub struct Widget {
    gl: GL,
    canvas: HtmlCanvasElement,
    config: OverlayConfig,
    elements: PairElements,
    controller: RefCell<Option<OverlayController>>,
    loads: LoadGeneration,
}

/// Run [`setup`] once the DOM is parsed.
pub fn bootstrap() -> Result<(), JsValue> {
    let document = document()?;
    if document.ready_state() == "loading" {
        listen(&document, "DOMContentLoaded", |_| {
            if let Err(e) = setup() {
                log::error!("overlay setup failed: {e}");
            }
        })?;
    } else {
        setup()?;
    }
    Ok(())
}

/// Build the widget for the page's `overlay` canvas, if there is one.
pub fn setup() -> Result<Option<Rc<Widget>>, OverlayError> {
    let document = document()?;
    let Some(canvas) = document.get_element_by_id(config::CANVAS_ID) else {
        log::info!("no #{} canvas on this page", config::CANVAS_ID);
        return Ok(None);
    };
    let canvas: HtmlCanvasElement = canvas
        .dyn_into()
        .map_err(|_| OverlayError::MissingElement(config::CANVAS_ID))?;

    let mut config =
        OverlayConfig::from_attributes(|name| canvas.get_attribute(&format!("data-{name}")))?;
    if config.page_id.is_none() {
        config.page_id = global_page_id();
    }

    let elements = PairElements {
        source: element(&document, config::SOURCE_IMAGE_ID)?,
        target: element(&document, config::TARGET_IMAGE_ID)?,
        source_link: element(&document, config::SOURCE_LINK_ID).ok(),
        target_link: element(&document, config::TARGET_LINK_ID).ok(),
    };
    let gl = render::context(&canvas)?;

    let widget = Rc::new(Widget {
        gl,
        canvas,
        config,
        elements,
        controller: RefCell::new(None),
        loads: LoadGeneration::new(),
    });
    Widget::wire(&widget, &document)?;
    Ok(Some(widget))
}

impl Widget {
    fn wire(this: &Rc<Self>, document: &Document) -> Result<(), OverlayError> {
        let w = Rc::clone(this);
        listen(&this.canvas, "mousemove", move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else { return };
            if let Some(controller) = w.controller.borrow_mut().as_mut() {
                controller.handle_pointer_move(event);
            }
        })?;

        let w = Rc::clone(this);
        listen(&this.canvas, "click", move |_| {
            if let Some(controller) = w.controller.borrow_mut().as_mut() {
                if let Err(e) = controller.handle_click() {
                    log::error!("toggle failed: {e}");
                }
            }
        })?;

        match this.config.variant {
            Variant::Aligned => this.wire_aligned()?,
            Variant::Projective => this.wire_projective()?,
        }

        let radios = document.get_elements_by_name(config::RADIO_GROUP);
        for i in 0..radios.length() {
            let Some(radio) = radios
                .get(i)
                .and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };
            let w = Rc::clone(this);
            listen(&radio, "click", move |event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                if input.checked() {
                    w.select(&input.value());
                }
            })?;
        }
        Ok(())
    }

    fn wire_aligned(self: &Rc<Self>) -> Result<(), OverlayError> {
        let w = Rc::clone(self);
        listen(&self.elements.source, "load", move |_| w.init(None))?;

        let w = Rc::clone(self);
        listen(&self.elements.target, "load", move |_| {
            // Before init the target is picked up by `init` itself.
            if let Some(controller) = w.controller.borrow_mut().as_mut() {
                if let Err(e) = controller.update_overlay(&w.elements.target) {
                    log::error!("target update failed: {e}");
                }
            }
        })?;

        if has_loaded_source(&self.elements.source) {
            self.init(None);
        }
        Ok(())
    }

    fn wire_projective(self: &Rc<Self>) -> Result<(), OverlayError> {
        let w = Rc::clone(self);
        listen(&self.elements.source, "load", move |_| {
            // A pair load sets the source itself and initialises once both
            // scans have arrived.
            if w.controller.borrow().is_none() && !w.loads.in_flight() {
                w.init(Some(Homography::PLACEHOLDER));
            }
        })?;

        if has_loaded_source(&self.elements.source) {
            self.init(Some(Homography::PLACEHOLDER));
        }
        Ok(())
    }

    /// (Re)create the controller. On failure the previous one stays.
    pub fn init(&self, homography: Option<Homography>) {
        match OverlayController::init(
            self.gl.clone(),
            self.canvas.clone(),
            &self.elements.source,
            &self.elements.target,
            homography,
        ) {
            Ok(controller) => *self.controller.borrow_mut() = Some(controller),
            Err(e) => log::error!("overlay init failed: {e}"),
        }
    }

    /// React to a radio button selection.
    pub fn select(self: &Rc<Self>, value: &str) {
        match self.config.variant {
            Variant::Aligned => match &self.config.page_id {
                Some(page_id) => {
                    let url = pair::match_url(&self.config.match_root, page_id, value);
                    self.elements.target.set_src(&url);
                }
                None => log::error!("{}", OverlayError::MissingPageId),
            },
            Variant::Projective => {
                let ticket = self.begin_load();
                let w = Rc::clone(self);
                let id = value.to_owned();
                wasm_bindgen_futures::spawn_local(async move {
                    match loader::load_page_pair(&w.config, &id, &w.elements, &ticket).await {
                        Ok(Some(h)) if ticket.is_current() => w.init(Some(h)),
                        Ok(_) => {}
                        Err(e) => log::error!("page pair {id} failed: {e}"),
                    }
                });
            }
        }
    }

    /// Supersede any pending pair load; the widget counts as loading until
    /// the returned ticket is dropped.
    pub fn begin_load(&self) -> LoadTicket {
        self.loads.begin()
    }

    pub fn has_controller(&self) -> bool {
        self.controller.borrow().is_some()
    }
}

fn document() -> Result<Document, OverlayError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or(OverlayError::Js("no document".to_owned()))
}

fn element<T: JsCast>(document: &Document, id: &'static str) -> Result<T, OverlayError> {
    document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<T>().ok())
        .ok_or(OverlayError::MissingElement(id))
}

/// `pageId` global set by the page template, string or number.
fn global_page_id() -> Option<String> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str("pageId")).ok()?;
    value
        .as_string()
        .or_else(|| value.as_f64().map(|n| n.to_string()))
}

/// Attach `handler` for `event` for the lifetime of the page.
fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), OverlayError>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
