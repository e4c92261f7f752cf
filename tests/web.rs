#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{
    HtmlCanvasElement, HtmlImageElement, MouseEvent, MouseEventInit, WebGl2RenderingContext as GL,
};

use overlay_wasm::blend::{blend, Rgba, NEUTRAL_GREY};
use overlay_wasm::homography::{Homography, TargetLookup};
use overlay_wasm::tracking::{pointer_ratio, TrackingState};
use overlay_wasm::wasm::{loader, overlay::OverlayController, page, render};

wasm_bindgen_test_configure!(run_in_browser);

const PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";
const BROKEN: &str = "data:image/png;base64,AAAA";
// 1x1 RGB scans: (200, 40, 10) and (20, 180, 250).
const SOURCE_RGB: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVR42mM4ocEFAAK2APs3xv+gAAAAAElFTkSuQmCC";
const TARGET_RGB: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVR42mMQ2fILAAKiAcP47QnyAAAAAElFTkSuQmCC";

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn image() -> HtmlImageElement {
    document()
        .create_element("img")
        .unwrap()
        .dyn_into::<HtmlImageElement>()
        .unwrap()
}

fn canvas() -> HtmlCanvasElement {
    let canvas = document()
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(64);
    canvas.set_height(32);
    document().body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test(async)]
async fn image_load_resolves() {
    let img = image();
    JsFuture::from(loader::load_image(&img, PIXEL)).await.unwrap();
    assert_eq!(img.natural_width(), 1);
}

#[wasm_bindgen_test(async)]
async fn superseded_load_still_settles() {
    let img = image();
    let older = JsFuture::from(loader::load_image(&img, SOURCE_RGB));
    let newer = JsFuture::from(loader::load_image(&img, PIXEL));
    newer.await.unwrap();
    older.await.unwrap();
    assert!(img.current_src().starts_with("data:image/png"));
}

#[wasm_bindgen_test(async)]
async fn join_waits_for_both() {
    let (a, b) = (image(), image());
    loader::load_both(&a, PIXEL, &b, PIXEL).await.unwrap();
    assert!(a.complete() && b.complete());
}

#[wasm_bindgen_test(async)]
async fn join_rejects_if_either_fails() {
    let (a, b) = (image(), image());
    let err = loader::load_both(&a, PIXEL, &b, BROKEN).await.unwrap_err();
    assert!(err.to_string().contains("failed to load image"), "{err}");
}

#[wasm_bindgen_test(async)]
async fn fetches_page_pair_json() {
    let body = r#"{"firstbook":1,"firstpage":2,"secondbook":3,"secondpage":4,
        "first":"1_2.png","second":"3_4.png","homography":[1,0,0,0,1,0,0,0,1]}"#;
    let url = format!(
        "data:application/json,{}",
        String::from(js_sys::encode_uri_component(body))
    );
    let pair = loader::fetch_page_pair(&url).await.unwrap();
    assert_eq!(pair.second, "3_4.png");
    assert_eq!(pair.homography, Homography::IDENTITY);
}

#[wasm_bindgen_test(async)]
async fn controller_toggles_border() {
    let canvas = canvas();
    let gl = render::context(&canvas).unwrap();
    let (src, dst) = (image(), image());
    JsFuture::from(loader::load_image(&src, PIXEL)).await.unwrap();

    let mut controller = OverlayController::init(gl, canvas.clone(), &src, &dst, None).unwrap();
    assert!(!controller.has_target());
    assert_eq!(controller.ratio(), 0.5);
    let style = canvas.style();
    let initial = style.get_property_value("border-style").unwrap();

    controller.handle_click().unwrap();
    assert_eq!(controller.state(), TrackingState::Frozen);
    assert_eq!(style.get_property_value("border-color").unwrap(), "blue");

    controller.handle_click().unwrap();
    assert_eq!(controller.state(), TrackingState::Tracking);
    assert_eq!(style.get_property_value("border-style").unwrap(), initial);
}

#[wasm_bindgen_test(async)]
async fn update_binds_target_and_resets_ratio() {
    let canvas = canvas();
    let gl = render::context(&canvas).unwrap();
    let (src, dst) = (image(), image());
    loader::load_both(&src, PIXEL, &dst, PIXEL).await.unwrap();

    let mut controller =
        OverlayController::init(gl, canvas, &src, &image(), Some(Homography::PLACEHOLDER)).unwrap();
    controller.set_ratio(0.9);
    controller.update_overlay(&dst).unwrap();
    assert!(controller.has_target());
    assert_eq!(controller.ratio(), 0.5);
}

fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    Rgba::opaque(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
}

fn pixel_canvas() -> HtmlCanvasElement {
    let canvas = canvas();
    canvas.set_width(1);
    canvas.set_height(1);
    canvas
}

fn read_pixel(gl: &GL) -> [u8; 4] {
    let mut buf = [0u8; 4];
    gl.read_pixels_with_opt_u8_array(0, 0, 1, 1, GL::RGBA, GL::UNSIGNED_BYTE, Some(&mut buf))
        .unwrap();
    buf
}

fn assert_close(got: [u8; 4], want: Rgba) {
    let want = [want.r, want.g, want.b, want.a].map(|c| (c * 255.0).round());
    for (g, w) in got.iter().zip(want) {
        assert!((f32::from(*g) - w).abs() <= 3.0, "got {got:?} want {want:?}");
    }
}

async fn solid_pair() -> (HtmlImageElement, HtmlImageElement) {
    let (src, dst) = (image(), image());
    loader::load_both(&src, SOURCE_RGB, &dst, TARGET_RGB).await.unwrap();
    (src, dst)
}

#[wasm_bindgen_test(async)]
async fn drawn_blend_matches_cpu_blend() {
    let canvas = pixel_canvas();
    let gl = render::context(&canvas).unwrap();
    let (src, dst) = solid_pair().await;

    let mut controller = OverlayController::init(gl.clone(), canvas, &src, &dst, None).unwrap();
    for ratio in [0.0, 0.5, 1.0] {
        controller.set_ratio(ratio);
        assert_close(read_pixel(&gl), blend(rgb(200, 40, 10), rgb(20, 180, 250), ratio));
    }
}

#[wasm_bindgen_test(async)]
async fn drawn_source_without_target() {
    let canvas = pixel_canvas();
    let gl = render::context(&canvas).unwrap();
    let (src, _) = solid_pair().await;

    let mut controller = OverlayController::init(gl.clone(), canvas, &src, &image(), None).unwrap();
    controller.set_ratio(0.8);
    assert_close(read_pixel(&gl), rgb(200, 40, 10));
}

#[wasm_bindgen_test(async)]
async fn drawn_warp_is_grey_out_of_bounds() {
    let canvas = pixel_canvas();
    let gl = render::context(&canvas).unwrap();
    let (src, dst) = solid_pair().await;

    // The single fragment sits at UV (0.5, 0.5).
    for (shift, expected) in [
        (0.25, TargetLookup::Sample([0.75, 0.5])),
        (0.75, TargetLookup::Grey),
    ] {
        let h = Homography::new([1.0, 0.0, shift, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(h.lookup([0.5, 0.5]), expected);
        let want_dst = match expected {
            TargetLookup::Sample(_) => rgb(20, 180, 250),
            TargetLookup::Grey => NEUTRAL_GREY,
        };

        let controller =
            OverlayController::init(gl.clone(), canvas.clone(), &src, &dst, Some(h)).unwrap();
        assert_close(read_pixel(&gl), blend(rgb(200, 40, 10), want_dst, controller.ratio()));
    }
}

#[wasm_bindgen_test(async)]
async fn frozen_controller_ignores_pointer() {
    let canvas = canvas();
    let gl = render::context(&canvas).unwrap();
    let (src, dst) = solid_pair().await;
    let mut controller = OverlayController::init(gl, canvas.clone(), &src, &dst, None).unwrap();

    let x = canvas.get_bounding_client_rect().left().round() as i32 + 48;
    let moved = || {
        let init = MouseEventInit::new();
        init.set_client_x(x);
        MouseEvent::new_with_mouse_event_init_dict("mousemove", &init).unwrap()
    };

    controller.handle_click().unwrap();
    controller.handle_pointer_move(&moved());
    assert_eq!(controller.ratio(), 0.5);

    controller.handle_click().unwrap();
    controller.handle_pointer_move(&moved());
    let want = pointer_ratio(f64::from(x), canvas.get_bounding_client_rect().left(), canvas.width());
    assert_eq!(controller.ratio(), want);
    assert_ne!(controller.ratio(), 0.5);
}

#[wasm_bindgen_test(async)]
async fn failed_pair_load_leaves_overlay_uninitialised() {
    let doc = document();
    let body = doc.body().unwrap();
    let canvas = doc.create_element("canvas").unwrap();
    canvas.set_id("overlay");
    canvas.set_attribute("data-variant", "projective").unwrap();
    let src = image();
    src.set_id("sourceimage");
    let dst = image();
    dst.set_id("targetimage");
    let elements: [&web_sys::Element; 3] = [&canvas, &src, &dst];
    for el in elements {
        body.append_child(el).unwrap();
    }

    let widget = page::setup().unwrap().expect("overlay canvas on the page");
    assert!(!widget.has_controller());

    // A pair load sets both scans; the target fails.
    let ticket = widget.begin_load();
    let source = JsFuture::from(loader::load_image(&src, PIXEL));
    let target = JsFuture::from(loader::load_image(&dst, BROKEN));
    source.await.unwrap();
    assert!(target.await.is_err());
    assert!(!widget.has_controller());
    drop(ticket);

    // Outside a pair load a newly shown source gets the placeholder overlay.
    JsFuture::from(loader::load_image(&src, SOURCE_RGB)).await.unwrap();
    assert!(widget.has_controller());

    for el in elements {
        el.remove();
    }
}
