//! Page markup glue: group controls, map container sizing and notices.

use std::rc::Rc;

use foundation::GroupIndex;
use formats::GroupConfig;
use layers::{LoadOutcome, run_load};
use runtime::NoticeLevel;
use streaming::LoadTicket;
use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlElement, Window};

use crate::http::HttpGroupSource;
use crate::surface::SharedApp;

pub const GROUP_SELECTOR: &str = ".map-group";
pub const MAP_SELECTOR: &str = ".map";
pub const NOTICE_SELECTOR: &str = ".map-notice";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    MissingAttribute(&'static str),
    BadAttribute { attribute: &'static str, value: String },
    MissingToggle(u32),
    Js(String),
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::MissingAttribute(attribute) => write!(f, "missing {attribute}"),
            PageError::BadAttribute { attribute, value } => {
                write!(f, "invalid {attribute}: {value:?}")
            }
            PageError::MissingToggle(index) => write!(f, "group {index} has no toggle link"),
            PageError::Js(msg) => write!(f, "DOM error: {msg}"),
        }
    }
}

impl std::error::Error for PageError {}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        PageError::Js(format!("{value:?}"))
    }
}

/// DOM handles for one group's toggle affordance.
#[derive(Debug, Clone)]
pub struct GroupControl {
    pub index: GroupIndex,
    pub toggle: HtmlElement,
    pub color_icon: Option<HtmlElement>,
    pub gray_icon: Option<HtmlElement>,
}

/// Builds a group configuration from `.map-group` data attributes.
pub fn parse_group_attrs(
    index: Option<&str>,
    color: Option<&str>,
    name: Option<&str>,
) -> Result<GroupConfig, PageError> {
    let raw = index.ok_or(PageError::MissingAttribute("data-index"))?;
    let index = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| PageError::BadAttribute {
            attribute: "data-index",
            value: raw.to_string(),
        })?;
    let color = color.map(str::trim).filter(|c| !c.is_empty()).unwrap_or_default();
    Ok(GroupConfig::new(index, name.unwrap_or_default().trim(), color))
}

/// Reads every group on the page in markup order. Groups with broken markup
/// are logged and skipped.
pub fn read_groups(document: &Document) -> Result<Vec<(GroupConfig, GroupControl)>, PageError> {
    let nodes = document.query_selector_all(GROUP_SELECTOR)?;
    let mut groups = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        match read_group(&element) {
            Ok(group) => groups.push(group),
            Err(err) => warn!("skipping map group #{i}: {err}"),
        }
    }
    Ok(groups)
}

fn read_group(element: &Element) -> Result<(GroupConfig, GroupControl), PageError> {
    let config = parse_group_attrs(
        element.get_attribute("data-index").as_deref(),
        element.get_attribute("data-color").as_deref(),
        element.get_attribute("data-name").as_deref(),
    )?;
    let toggle = html_child(element, "a")?.ok_or(PageError::MissingToggle(config.index))?;
    let control = GroupControl {
        index: config.group_index(),
        color_icon: html_child(&toggle, ".map-color-icon")?,
        gray_icon: html_child(&toggle, ".map-gray-icon")?,
        toggle,
    };
    Ok((config, control))
}

fn html_child(parent: &Element, selector: &str) -> Result<Option<HtmlElement>, PageError> {
    Ok(parent
        .query_selector(selector)?
        .and_then(|e| e.dyn_into::<HtmlElement>().ok()))
}

pub fn find_html(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

/// Container height for a given width.
pub fn map_height(width: f64, aspect_ratio: f64) -> f64 {
    (width * aspect_ratio).round().max(0.0)
}

pub fn size_map(container: &HtmlElement, aspect_ratio: f64) {
    let height = map_height(container.client_width() as f64, aspect_ratio);
    if let Err(err) = container
        .style()
        .set_property("height", &format!("{height}px"))
    {
        warn!("could not size map container: {err:?}");
    }
}

/// Keeps the map container at `aspect_ratio` as the window resizes.
pub fn watch_resize(
    window: &Window,
    container: HtmlElement,
    aspect_ratio: f64,
) -> Result<(), PageError> {
    let closure = Closure::wrap(Box::new(move |_: Event| {
        size_map(&container, aspect_ratio);
    }) as Box<dyn FnMut(Event)>);
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget(); // Lives as long as the page.
    Ok(())
}

/// Everything a DOM callback needs to drive the map.
#[derive(Clone)]
pub struct PageContext {
    pub app: SharedApp,
    pub source: Rc<HttpGroupSource>,
    pub controls: Rc<Vec<GroupControl>>,
    pub notice: Option<HtmlElement>,
}

impl PageContext {
    /// Hooks a click handler onto every group's toggle link.
    pub fn wire_toggles(&self) -> Result<(), PageError> {
        for control in self.controls.iter() {
            let ctx = self.clone();
            let index = control.index;
            let closure = Closure::wrap(Box::new(move |event: Event| {
                event.prevent_default();
                ctx.toggle(index);
            }) as Box<dyn FnMut(Event)>);
            control
                .toggle
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    pub fn toggle(&self, index: GroupIndex) {
        let toggled = match self.app.try_borrow_mut() {
            Ok(mut app) => app.toggle_group(index),
            Err(_) => {
                warn!("map busy; ignoring toggle of group {index}");
                return;
            }
        };
        match toggled {
            Ok(Some(ticket)) => self.spawn_load(ticket),
            Ok(None) => {}
            Err(err) => error!("{err}"),
        }
        self.refresh();
    }

    /// Runs a reserved load on the event loop.
    pub fn spawn_load(&self, ticket: LoadTicket) {
        let ctx = self.clone();
        spawn_local(async move {
            let source = ctx.source.as_ref();
            let outcome = run_load(&*ctx.app, source, ticket).await;
            debug!("group {} finished: {outcome:?}", ticket.group());
            if matches!(outcome, LoadOutcome::Loaded { .. }) {
                ctx.clear_notice();
            }
            ctx.refresh();
        });
    }

    /// Brings the page in line with the app: affordances and notices.
    pub fn refresh(&self) {
        self.sync_affordances();
        self.flush_notices();
    }

    fn sync_affordances(&self) {
        let Ok(app) = self.app.try_borrow() else {
            return;
        };
        for control in self.controls.iter() {
            let active = app.is_active(control.index);
            if let Err(err) = control.toggle.class_list().toggle_with_force("active", active) {
                warn!("could not mark group {} toggle: {err:?}", control.index);
            }
            set_shown(control.color_icon.as_ref(), active);
            set_shown(control.gray_icon.as_ref(), !active);
        }
    }

    fn flush_notices(&self) {
        let notices = match self.app.try_borrow_mut() {
            Ok(mut app) => app.drain_notices(),
            Err(_) => return,
        };
        let Some(element) = &self.notice else {
            for notice in notices {
                match notice.level {
                    NoticeLevel::Error => error!("{}", notice.message),
                    NoticeLevel::Warning => warn!("{}", notice.message),
                    NoticeLevel::Info => info!("{}", notice.message),
                }
            }
            return;
        };
        if notices.is_empty() {
            return;
        }
        let shown = element.text_content().unwrap_or_default();
        let text = notice_text(&shown, notices.iter().map(|n| n.message.as_str()));
        element.set_text_content(Some(&text));
        set_style(element, "white-space", "pre-line");
        set_shown(Some(element), true);
    }

    /// Empties and hides the notice element.
    fn clear_notice(&self) {
        if let Some(element) = &self.notice {
            element.set_text_content(None);
            set_shown(Some(element), false);
        }
    }
}

/// Notice text after `incoming` messages are added below what is already shown.
/// A message already on screen is not repeated.
pub fn notice_text<'a>(shown: &str, incoming: impl IntoIterator<Item = &'a str>) -> String {
    let mut text = shown.trim().to_string();
    for message in incoming {
        if text.lines().any(|line| line == message) {
            continue;
        }
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(message);
    }
    text
}

fn set_shown(element: Option<&HtmlElement>, shown: bool) {
    if let Some(element) = element {
        set_style(element, "display", if shown { "" } else { "none" });
    }
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = element.style().set_property(property, value) {
        warn!("could not set {property} on {}: {err:?}", element.class_name());
    }
}

#[cfg(test)]
mod tests {
    use super::{PageError, map_height, notice_text, parse_group_attrs};
    use formats::GroupConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn group_attrs_are_trimmed() {
        let config = parse_group_attrs(Some(" 3 "), Some("#cc3300"), Some(" Alps ")).unwrap();
        assert_eq!(config, GroupConfig::new(3, "Alps", "#cc3300"));
    }

    #[test]
    fn name_and_color_are_optional() {
        let config = parse_group_attrs(Some("0"), None, None).unwrap();
        assert_eq!(config.label(), "group 0");
        assert_eq!(config.color, "");
    }

    #[test]
    fn bad_index_is_rejected() {
        assert_eq!(
            parse_group_attrs(Some("x1"), None, None),
            Err(PageError::BadAttribute {
                attribute: "data-index",
                value: "x1".to_string(),
            })
        );
        assert_eq!(
            parse_group_attrs(None, Some("#fff"), None),
            Err(PageError::MissingAttribute("data-index"))
        );
    }

    #[test]
    fn height_follows_aspect_ratio() {
        assert_eq!(map_height(800.0, 0.75), 600.0);
        assert_eq!(map_height(333.0, 0.75), 250.0);
    }

    #[test]
    fn notices_accumulate_without_repeats() {
        let text = notice_text("", ["Could not load Alps.", "Could not load Alps."]);
        assert_eq!(text, "Could not load Alps.");

        let text = notice_text(&text, ["Could not load Pyrenees."]);
        assert_eq!(text, "Could not load Alps.\nCould not load Pyrenees.");
    }

    #[test]
    fn cleared_notice_starts_fresh() {
        assert_eq!(notice_text("  ", ["Retry failed."]), "Retry failed.");
        assert_eq!(notice_text("", std::iter::empty()), "");
    }
}
