//! Style projector
//!
//! Projects one traversal ratio onto an element's declared property map and
//! writes the resulting inline styles through the host. Transform functions
//! accumulate into a single transform string, written once per tick under
//! the capability-probed property name with the GPU hint prepended.

use drift_core::geometry::Axis;
use drift_core::value::{
    display_opacity, format_number, is_transform_function, scale_text, PropertyMap, PropertyValue,
};

use crate::host::{ElementRef, ScrollHost, StyleCapabilities};

/// Property map used when an element declares none: a full-span translate
/// along the traversal axis.
pub fn default_properties(axis: Axis) -> PropertyMap {
    let name = if axis.is_horizontal() {
        "translateX"
    } else {
        "translateY"
    };
    let mut map = PropertyMap::new();
    map.insert(name.to_owned(), PropertyValue::Text("100%".to_owned()));
    map
}

/// Project `ratio` onto `properties` and write the element's styles.
///
/// `axis` selects the default translate direction for elements without a
/// declared map. Numbers scale directly, strings scale their embedded
/// numeric tokens, and `opacity` runs through the symmetric fade before
/// being written, however it was declared.
pub fn project(
    host: &dyn ScrollHost,
    capabilities: &StyleCapabilities,
    element: ElementRef,
    properties: Option<&PropertyMap>,
    ratio: f32,
    axis: Axis,
) {
    let default_map;
    let properties = match properties {
        Some(map) => map,
        None => {
            default_map = default_properties(axis);
            &default_map
        }
    };

    let mut transforms = String::new();
    let mut push_transform = |name: &str, value: &str| {
        if !transforms.is_empty() {
            transforms.push(' ');
        }
        transforms.push_str(name);
        transforms.push('(');
        transforms.push_str(value);
        transforms.push(')');
    };

    for (name, value) in properties {
        match value {
            PropertyValue::Number(number) => {
                let scaled = number * ratio;
                if is_transform_function(name) {
                    push_transform(name, &format_number(scaled));
                } else if name == "opacity" {
                    let displayed = display_opacity(scaled, ratio);
                    host.set_style(element, "opacity", &format_number(displayed));
                } else {
                    host.set_style(element, name, &format_number(scaled));
                }
            }
            PropertyValue::Text(text) => {
                let scaled = scale_text(text, ratio);
                if is_transform_function(name) {
                    push_transform(name, &scaled);
                } else if name == "opacity" {
                    // The fade keys on the property name, not the declared
                    // type. A scaled value with no numeric reading is
                    // written untouched.
                    match scaled.parse::<f32>() {
                        Ok(number) => {
                            let displayed = display_opacity(number, ratio);
                            host.set_style(element, "opacity", &format_number(displayed));
                        }
                        Err(_) => host.set_style(element, name, &scaled),
                    }
                } else {
                    host.set_style(element, name, &scaled);
                }
            }
        }
    }

    if !transforms.is_empty() {
        let value = format!("{}{}", capabilities.gpu_hint, transforms);
        host.set_style(element, &capabilities.transform_property, &value);
    }
}
