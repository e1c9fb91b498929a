//! DOM wiring for the synchroniser and the admin form helpers.
//!
//! Only compiled for `wasm32`. Everything here translates browser callbacks
//! into calls on [`UrlStateSynchronizer`], [`PermissionFields`], and the
//! upload router; no state merging happens in this module. Callbacks live for
//! the lifetime of the page, so their closures are leaked with
//! [`Closure::forget`].

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CustomEvent, Document, DragEvent, Element, Event, File, FileList, FileReader, HtmlElement,
    HtmlInputElement, HtmlTextAreaElement, MutationObserver, MutationObserverInit,
    MutationRecord, Window,
};

use crate::admin::permissions::{CUSTOM_PERMISSIONS_CHECKBOX, PermissionFields};
use crate::admin::upload::{
    self, CSV_FILE_INPUT, DroppedFile, HTML_TEMPLATE_FIELD, TEMPLATE_FILE_INPUT,
    TEMPLATE_VALIDATION, TemplateValidation, UploadEffect, UploadForm,
};
use crate::filter::{FILTER_EVENT, FilterChange, FilterDescriptor, FilterValue};
use crate::sort::{AttributeMutation, DIRECTION_PARAM, OBSERVED_ATTRIBUTES, SORT_PARAM, SortState};
use crate::sync::{FILTER_ELEMENT, History, Page, TABLE_ELEMENT, UrlStateSynchronizer};

type SharedSynchronizer = Rc<RefCell<UrlStateSynchronizer<BrowserHistory>>>;

/// `window.history` with the last location this page pushed.
///
/// The fallback is only used when `location.href` cannot be read or parsed.
#[derive(Debug)]
struct BrowserHistory {
    window: Window,
    last_known: Url,
}

impl History for BrowserHistory {
    fn location(&self) -> Url {
        read_href(&self.window).unwrap_or_else(|| self.last_known.clone())
    }

    fn push_state(&mut self, url: &Url) {
        let pushed = self.window.history().and_then(|history| {
            history.push_state_with_url(&Object::new(), "", Some(url.as_str()))
        });
        if let Err(error) = pushed {
            tracing::debug!("history.pushState failed: {error:?}");
            return;
        }
        self.last_known = url.clone();
    }
}

fn read_href(window: &Window) -> Option<Url> {
    let href = window.location().href().ok()?;
    Url::parse(&href).ok()
}

struct DocumentPage<'a>(&'a Document);

impl Page for DocumentPage<'_> {
    fn contains(&self, selector: &str) -> bool {
        self.0.query_selector(selector).ok().flatten().is_some()
    }
}

/// Wires every behaviour once the document has loaded.
///
/// # Errors
///
/// Returns the underlying DOM exception when no window or document exists or
/// the load listener cannot be attached.
#[wasm_bindgen]
pub fn install() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document available"))?;

    let on_ready = Closure::<dyn FnMut()>::new(move || wire(&window));
    document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
    on_ready.forget();
    Ok(())
}

/// Wires each behaviour on its own; one failing does not stop the rest.
fn wire(window: &Window) {
    let Some(document) = window.document() else {
        tracing::debug!("no document available");
        return;
    };
    report("table synchronisation", wire_table(window, &document));
    report("permission toggle", wire_permissions(&document));
    report("upload handling", wire_uploads(&document));
}

fn wire_table(window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(initial) = read_href(window) else {
        return Ok(());
    };
    let synchronizer = UrlStateSynchronizer::new(BrowserHistory {
        window: window.clone(),
        last_known: initial,
    });
    let installation = synchronizer.install(&DocumentPage(document));
    let shared: SharedSynchronizer = Rc::new(RefCell::new(synchronizer));

    if installation.filter_listener
        && let Some(filters) = document.query_selector(FILTER_ELEMENT)?
    {
        listen_for_filters(&filters, Rc::clone(&shared))?;
    }

    if installation.sort_observer
        && let Some(table) = document.query_selector(TABLE_ELEMENT)?
    {
        hydrate_sort(&table, &shared.borrow().hydrate().sort())?;
        observe_sort(&table, shared)?;
    }
    Ok(())
}

fn listen_for_filters(filters: &Element, synchronizer: SharedSynchronizer) -> Result<(), JsValue> {
    let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(custom) = event.dyn_ref::<CustomEvent>() else {
            return;
        };
        match decode_detail(&custom.detail()) {
            Ok(change) => {
                synchronizer.borrow_mut().on_filter_changed(&change);
            }
            Err(error) => tracing::debug!("ignoring filter event: {error:?}"),
        }
    });
    filters.add_event_listener_with_callback(FILTER_EVENT, listener.as_ref().unchecked_ref())?;
    listener.forget();
    Ok(())
}

/// Decodes the event detail key by key, in `Object.keys` order.
///
/// A descriptor that is not an object, or lacks a `values` array, carries
/// no values. Entries are converted with `String(value)` unless they are
/// `null` or `undefined`.
fn decode_detail(detail: &JsValue) -> Result<FilterChange, JsValue> {
    let Some(payload) = detail.dyn_ref::<Object>() else {
        return Err(JsValue::from_str("filter event detail is not an object"));
    };
    let stringify: Function =
        Reflect::get(&js_sys::global(), &JsValue::from_str("String"))?.dyn_into()?;

    let mut change = FilterChange::new();
    for key in Object::keys(payload).iter() {
        let Some(name) = key.as_string() else {
            continue;
        };
        let descriptor = Reflect::get(payload, &key)?;
        change = change.with_filter(&name, decode_descriptor(&descriptor, &stringify)?);
    }
    Ok(change)
}

fn decode_descriptor(
    descriptor: &JsValue,
    stringify: &Function,
) -> Result<FilterDescriptor, JsValue> {
    if !descriptor.is_object() && !descriptor.is_function() {
        return Ok(FilterDescriptor::default());
    }
    let candidates = Reflect::get(descriptor, &JsValue::from_str("values"))?;
    if !Array::is_array(&candidates) {
        return Ok(FilterDescriptor::default());
    }

    let mut values = Vec::new();
    for candidate in candidates.unchecked_into::<Array>().iter() {
        if candidate.is_null() || candidate.is_undefined() {
            values.push(FilterValue::Missing);
            continue;
        }
        let text = stringify.call1(&JsValue::UNDEFINED, &candidate)?;
        values.push(text.as_string().map_or(FilterValue::Missing, FilterValue::Text));
    }
    Ok(FilterDescriptor::new(values))
}

/// Writes sort parameters from the URL onto the table before it is observed.
fn hydrate_sort(table: &Element, state: &SortState) -> Result<(), JsValue> {
    if let Some(sort) = state.sort() {
        table.set_attribute(SORT_PARAM, sort)?;
    }
    if let Some(direction) = state.direction() {
        table.set_attribute(DIRECTION_PARAM, direction)?;
    }
    Ok(())
}

fn observe_sort(table: &Element, synchronizer: SharedSynchronizer) -> Result<(), JsValue> {
    let observed = table.clone();
    let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
        move |records: Array, _observer: MutationObserver| {
            let mutations: Vec<AttributeMutation> = records
                .iter()
                .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
                .filter(|record| record.type_() == "attributes")
                .filter_map(|record| record.attribute_name())
                .map(AttributeMutation::new)
                .collect();
            synchronizer
                .borrow_mut()
                .on_attribute_mutations(&mutations, || read_sort_attributes(&observed));
        },
    );

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_attributes(true);
    let filter: Array = OBSERVED_ATTRIBUTES
        .iter()
        .map(|&name| JsValue::from_str(name))
        .collect();
    options.set_attribute_filter(&filter);
    observer.observe_with_options(table, &options)?;
    callback.forget();
    Ok(())
}

fn read_sort_attributes(table: &Element) -> SortState {
    SortState::new(
        table.get_attribute(SORT_PARAM).as_deref(),
        table.get_attribute(DIRECTION_PARAM).as_deref(),
    )
}

fn wire_permissions(document: &Document) -> Result<(), JsValue> {
    let Some(checkbox) = query_as::<HtmlInputElement>(document, CUSTOM_PERMISSIONS_CHECKBOX)?
    else {
        return Ok(());
    };

    let mut fields = PermissionFields::on_load(checkbox.checked());
    if !fields.is_visible() {
        apply_visibility(document, fields)?;
    }

    let owned = document.clone();
    let on_change = Closure::<dyn FnMut()>::new(move || {
        fields.toggle();
        if let Err(error) = apply_visibility(&owned, fields) {
            tracing::debug!("failed to toggle permission fields: {error:?}");
        }
    });
    checkbox.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    on_change.forget();
    Ok(())
}

fn apply_visibility(document: &Document, fields: PermissionFields) -> Result<(), JsValue> {
    for (selector, visible) in fields.field_visibility() {
        let nodes = document.query_selector_all(selector)?;
        for index in 0..nodes.length() {
            let Some(element) = nodes
                .item(index)
                .and_then(|node| node.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            element
                .style()
                .set_property("display", if visible { "" } else { "none" })?;
        }
    }
    Ok(())
}

fn wire_uploads(document: &Document) -> Result<(), JsValue> {
    for name in ["dragenter", "dragover"] {
        let suppress = Closure::<dyn FnMut(Event)>::new(|event: Event| event.prevent_default());
        document.add_event_listener_with_callback(name, suppress.as_ref().unchecked_ref())?;
        suppress.forget();
    }

    let owned = document.clone();
    let on_drop = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        let Some(files) = event
            .dyn_ref::<DragEvent>()
            .and_then(DragEvent::data_transfer)
            .and_then(|transfer| transfer.files())
        else {
            return;
        };
        let form = UploadForm::detect(&DocumentPage(&owned));
        if let Some(effect) = upload::on_drop(form, &file_names(&files)) {
            report("upload handling", apply_upload(&owned, &effect, &files));
        }
    });
    document.add_event_listener_with_callback("drop", on_drop.as_ref().unchecked_ref())?;
    on_drop.forget();

    listen_for_file_input(document, TEMPLATE_FILE_INPUT, upload::on_template_selected)?;
    listen_for_file_input(document, CSV_FILE_INPUT, upload::on_csv_selected)
}

fn listen_for_file_input(
    document: &Document,
    selector: &str,
    route: fn(&[DroppedFile]) -> Option<UploadEffect>,
) -> Result<(), JsValue> {
    let Some(input) = query_as::<HtmlInputElement>(document, selector)? else {
        return Ok(());
    };

    let owned = document.clone();
    let observed = input.clone();
    let on_change = Closure::<dyn FnMut()>::new(move || {
        let Some(files) = observed.files() else {
            return;
        };
        if let Some(effect) = route(&file_names(&files)) {
            report("upload handling", apply_upload(&owned, &effect, &files));
        }
    });
    input.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    on_change.forget();
    Ok(())
}

fn file_names(files: &FileList) -> Vec<DroppedFile> {
    (0..files.length())
        .filter_map(|index| files.get(index))
        .map(|file| DroppedFile::new(file.name()))
        .collect()
}

fn apply_upload(document: &Document, effect: &UploadEffect, files: &FileList) -> Result<(), JsValue> {
    for (selector, text) in effect.field_updates() {
        write_field(document, selector, text)?;
    }

    match effect {
        UploadEffect::CsvSelected {
            assign_files: true, ..
        } => {
            if let Some(input) = query_as::<HtmlInputElement>(document, CSV_FILE_INPUT)? {
                input.set_files(Some(files));
            }
        }
        UploadEffect::CsvSelected { .. } => {}
        UploadEffect::ReadTemplate { reset_input, .. } => {
            if let Some(file) = files.get(0) {
                read_template(document, &file)?;
            }
            if *reset_input
                && let Some(input) = query_as::<HtmlInputElement>(document, TEMPLATE_FILE_INPUT)?
            {
                input.set_value("");
            }
        }
    }
    Ok(())
}

fn read_template(document: &Document, file: &File) -> Result<(), JsValue> {
    let reader = FileReader::new()?;
    let loaded = reader.clone();
    let owned = document.clone();
    let on_load = Closure::<dyn FnMut()>::new(move || {
        let Some(text) = loaded.result().ok().and_then(|result| result.as_string()) else {
            return;
        };
        report("template loading", write_field(&owned, HTML_TEMPLATE_FIELD, &text));
        report("template validation", validate_template(&TEMPLATE_VALIDATION));
    });
    reader.set_onload(Some(on_load.as_ref().unchecked_ref()));
    on_load.forget();
    reader.read_as_text(file)
}

/// Validates the template group through the page's Parsley instance, with
/// the success class swapped out for the duration of the call.
fn validate_template(validation: &TemplateValidation) -> Result<(), JsValue> {
    let global = js_sys::global();
    let config = Reflect::get(&global, &JsValue::from_str("ParsleyConfig"))?;
    let success_key = JsValue::from_str("successClass");
    if config.is_object() {
        Reflect::set(&config, &success_key, &JsValue::from_str(validation.success_class))?;
    }

    let outcome = run_parsley(&global, validation);

    if config.is_object() {
        Reflect::delete_property(config.unchecked_ref::<Object>(), &success_key)?;
    }
    outcome
}

fn run_parsley(global: &Object, validation: &TemplateValidation) -> Result<(), JsValue> {
    let jquery: Function = Reflect::get(global, &JsValue::from_str("$"))?.dyn_into()?;
    let form = jquery.call1(&JsValue::NULL, &JsValue::from_str(validation.form))?;
    let parsley: Function = Reflect::get(&form, &JsValue::from_str("parsley"))?.dyn_into()?;
    let instance = parsley.call0(&form)?;
    let validate: Function = Reflect::get(&instance, &JsValue::from_str("validate"))?.dyn_into()?;

    let options = Object::new();
    Reflect::set(
        &options,
        &JsValue::from_str("group"),
        &JsValue::from_str(validation.group),
    )?;
    validate.call1(&instance, &options)?;
    Ok(())
}

/// Writes `text` as the value of form controls or the text of anything else.
fn write_field(document: &Document, selector: &str, text: &str) -> Result<(), JsValue> {
    let Some(element) = document.query_selector(selector)? else {
        return Ok(());
    };
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.set_value(text);
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(text);
    } else {
        element.set_text_content(Some(text));
    }
    Ok(())
}

fn query_as<T: JsCast>(document: &Document, selector: &str) -> Result<Option<T>, JsValue> {
    Ok(document
        .query_selector(selector)?
        .and_then(|element| element.dyn_into::<T>().ok()))
}

fn report(context: &str, result: Result<(), JsValue>) {
    if let Err(error) = result {
        tracing::debug!("{context} failed: {error:?}");
    }
}
