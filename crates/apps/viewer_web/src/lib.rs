use std::cell::RefCell;
use std::rc::Rc;

use console_error_panic_hook::set_once;
use formats::ViewerSettings;
use js_sys::{JSON, Reflect};
use layers::{MapApp, UrlSelection};
use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlScriptElement, Window};

mod gmaps;
mod http;
mod logging;
mod page;
mod surface;

use gmaps::{Map, js_object, lat_lng_literal, sdk_loaded};
use http::HttpGroupSource;
use page::{MAP_SELECTOR, NOTICE_SELECTOR, PageContext, PageError};
use surface::{GoogleMapSurface, SharedApp};

/// Global the page may set to [`ViewerSettings`], as an object or JSON text.
const CONFIG_GLOBAL: &str = "__mapViewerConfig";
/// Global callback the SDK script invokes once loaded.
const READY_CALLBACK: &str = "__mapViewerReady";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let (settings, config_error) = read_settings(&window);
    logging::init(&settings.log_filter);
    if let Some(err) = config_error {
        warn!("{err}; using default settings");
    }

    let selection = UrlSelection::from_href(&window.location().href()?);

    if sdk_loaded(&window) {
        boot(&window, settings, selection);
        return Ok(());
    }

    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    inject_sdk(&window, &document, settings, selection)
}

fn read_settings(window: &Window) -> (ViewerSettings, Option<formats::FormatError>) {
    // Either a JSON string or a plain object.
    let raw = Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .and_then(|v| match v.as_string() {
            Some(text) => Some(text),
            None => JSON::stringify(&v).ok().and_then(|s| s.as_string()),
        })
        .unwrap_or_default();
    match ViewerSettings::from_json_str(&raw) {
        Ok(settings) => (settings, None),
        Err(err) => (ViewerSettings::default(), Some(err)),
    }
}

/// Loads the SDK script with a ready callback that boots the viewer.
fn inject_sdk(
    window: &Window,
    document: &Document,
    settings: ViewerSettings,
    selection: UrlSelection,
) -> Result<(), JsValue> {
    let src = settings.sdk_script_url(READY_CALLBACK);
    let ready_window = window.clone();
    let on_ready = Closure::once_into_js(move || {
        if sdk_loaded(&ready_window) {
            boot(&ready_window, settings, selection);
        } else {
            error!("map SDK signalled ready without the marker library");
        }
    });
    Reflect::set(window, &JsValue::from_str(READY_CALLBACK), &on_ready)?;

    let script: HtmlScriptElement = document.create_element("script")?.dyn_into()?;
    script.set_src(&src);
    script.set_async(true);
    let on_error = Closure::once_into_js(move || {
        error!("map SDK failed to load; the map stays empty");
    });
    script.set_onerror(Some(on_error.unchecked_ref()));

    let head = document.head().ok_or_else(|| JsValue::from_str("no <head>"))?;
    head.append_child(&script)?;
    info!("loading map SDK");
    Ok(())
}

fn boot(window: &Window, settings: ViewerSettings, selection: UrlSelection) {
    if let Err(err) = try_boot(window, settings, selection) {
        error!("map viewer failed to start: {err}");
    }
}

fn try_boot(
    window: &Window,
    settings: ViewerSettings,
    selection: UrlSelection,
) -> Result<(), PageError> {
    let document = window
        .document()
        .ok_or_else(|| PageError::Js("no document".to_string()))?;
    let Some(container) = page::find_html(&document, MAP_SELECTOR) else {
        info!("no map container on this page");
        return Ok(());
    };
    page::size_map(&container, settings.aspect_ratio);
    page::watch_resize(window, container.clone(), settings.aspect_ratio)?;

    let (configs, controls): (Vec<_>, Vec<_>) = page::read_groups(&document)?.into_iter().unzip();

    let map = Map::new(
        &container,
        &js_object(&[
            ("center", lat_lng_literal(foundation::LatLng::new(0.0, 0.0)).into()),
            ("zoom", settings.initial_zoom.into()),
            ("mapId", settings.map_id.as_str().into()),
        ]),
    );

    let source = Rc::new(HttpGroupSource::new(settings.clone()));
    let mut initial = None;
    let app: SharedApp = Rc::new_cyclic(|weak| {
        let surface = GoogleMapSurface::new(map, weak.clone());
        let (app, ticket) = MapApp::bootstrap(surface, settings, configs, selection);
        initial = ticket;
        RefCell::new(app)
    });

    let ctx = PageContext {
        app,
        source,
        controls: Rc::new(controls),
        notice: page::find_html(&document, NOTICE_SELECTOR),
    };
    ctx.wire_toggles()?;
    if let Some(ticket) = initial {
        ctx.spawn_load(ticket);
    }
    ctx.refresh();
    Ok(())
}
