use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Promise};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlAnchorElement, HtmlImageElement, Response};

use crate::cancel::LoadTicket;
use crate::config::OverlayConfig;
use crate::error::OverlayError;
use crate::homography::Homography;
use crate::pair::{self, Citation, PagePair};

/// DOM elements a page-pair load writes into.
#[derive(Clone)]
pub struct PairElements {
    pub source: HtmlImageElement,
    pub target: HtmlImageElement,
    pub source_link: Option<HtmlAnchorElement>,
    pub target_link: Option<HtmlAnchorElement>,
}

/// Point `image` at `url`; the promise settles on the element's next
/// `load` (resolve) or `error` (reject with [`OverlayError::ImageLoad`]).
///
/// The listener detaches itself after the first event, so a load that is
/// superseded on the same element still settles with the newer image.
pub fn load_image(image: &HtmlImageElement, url: &str) -> Promise {
    Promise::new(&mut |resolve: Function, reject: Function| {
        // Holds the listener so it can remove itself once it has fired.
        let slot: Rc<RefCell<Option<Closure<dyn FnMut(Event)>>>> = Rc::new(RefCell::new(None));
        let handler = {
            let slot = Rc::clone(&slot);
            let image = image.clone();
            let url = url.to_owned();
            Closure::wrap(Box::new(move |event: Event| {
                let Some(listener) = slot.borrow_mut().take() else { return };
                for name in IMAGE_EVENTS {
                    let _ = image.remove_event_listener_with_callback(
                        name,
                        listener.as_ref().unchecked_ref(),
                    );
                }
                if event.type_() == "load" {
                    let _ = resolve.call1(&JsValue::NULL, &image);
                } else {
                    let err: JsValue = OverlayError::ImageLoad(url.clone()).into();
                    let _ = reject.call1(&JsValue::NULL, &err);
                }
            }) as Box<dyn FnMut(Event)>)
        };
        *slot.borrow_mut() = Some(handler);
        if let Some(listener) = slot.borrow().as_ref() {
            for name in IMAGE_EVENTS {
                let callback = listener.as_ref().unchecked_ref();
                if let Err(e) = image.add_event_listener_with_callback(name, callback) {
                    let _ = reject.call1(&JsValue::NULL, &e);
                    return;
                }
            }
        }
        image.set_src(url);
    })
}

const IMAGE_EVENTS: [&str; 2] = ["load", "error"];

/// Load both images concurrently and wait for both; the first failure
/// rejects the whole join.
pub async fn load_both(
    source: &HtmlImageElement,
    source_url: &str,
    target: &HtmlImageElement,
    target_url: &str,
) -> Result<(), OverlayError> {
    let loads = Array::of2(&load_image(source, source_url), &load_image(target, target_url));
    JsFuture::from(Promise::all(&loads)).await?;
    Ok(())
}

pub async fn fetch_page_pair(url: &str) -> Result<PagePair, OverlayError> {
    let window = web_sys::window().ok_or(OverlayError::Js("no window".to_owned()))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(OverlayError::Http {
            url: url.to_owned(),
            status: response.status(),
        });
    }
    let body = JsFuture::from(response.text()?).await?;
    let body = body
        .as_string()
        .ok_or_else(|| OverlayError::Js(format!("non-text body from {url}")))?;
    PagePair::from_json(&body)
}

/// Fetch pair `id`, load both scans, refresh the citation links and return
/// the homography.
///
/// `Ok(None)` means a newer selection superseded this one; nothing past the
/// superseding point has been applied.
pub async fn load_page_pair(
    config: &OverlayConfig,
    id: &str,
    elements: &PairElements,
    ticket: &LoadTicket,
) -> Result<Option<Homography>, OverlayError> {
    let url = pair::pair_url(&config.pagepair_url, id);
    log::info!("loading page pair {id}");
    let pair = fetch_page_pair(&url).await?;
    if !ticket.is_current() {
        log::debug!("page pair {id} superseded before image load");
        return Ok(None);
    }

    load_both(
        &elements.source,
        &pair.source_url(&config.image_root),
        &elements.target,
        &pair.target_url(&config.image_root),
    )
    .await?;
    if !ticket.is_current() {
        log::debug!("page pair {id} superseded after image load");
        return Ok(None);
    }

    if let Some(link) = &elements.source_link {
        set_link(link, &pair.source_citation(&config.book_url));
    }
    if let Some(link) = &elements.target_link {
        set_link(link, &pair.target_citation(&config.book_url));
    }
    log::info!("page pair {id} loaded");
    Ok(Some(pair.homography))
}

fn set_link(link: &HtmlAnchorElement, citation: &Citation) {
    link.set_href(&citation.href);
    link.set_text_content(Some(&citation.text));
}
