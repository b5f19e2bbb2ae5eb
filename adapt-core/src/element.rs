//! Canvas elements - the layers a layout is made of.
//!
//! Elements are kept close to their stored JSON shape: the fields the
//! adaptation engine reads are typed, everything else rides along in
//! [`CanvasElement::extra`] and is written back untouched.

use std::borrow::Borrow;
use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::position::Bounds;

/// Shape sub-tag of an SVG container.
pub const SVG_CONTAINER: &str = "svg-container";

/// Shape sub-tag of a rounded rectangle.
pub const ROUNDED_RECT: &str = "rounded-rect";

/// Identifier of an element within a document's element collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create an element ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `dataType` discriminant of a stored element.
///
/// Unknown tags are kept verbatim in [`DataType::Other`] so they survive a
/// read/write cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    /// Text container.
    Text,
    /// Raster image container.
    Image,
    /// Vector shape, refined by the `type` sub-tag.
    Shape,
    /// Group of sibling elements.
    Group,
    /// The canvas background box.
    CreativeBox,
    /// Audio track.
    Audio,
    /// Video layer.
    Video,
    /// Any other tag, e.g. `CANVAS_MASK`.
    Other(String),
}

impl DataType {
    /// The stored tag string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "TEXT",
            Self::Image => "IMAGE",
            Self::Shape => "SHAPE",
            Self::Group => "GROUP",
            Self::CreativeBox => "CREATIVE_BOX",
            Self::Audio => "AUDIO",
            Self::Video => "VIDEO",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for DataType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "TEXT" => Self::Text,
            "IMAGE" => Self::Image,
            "SHAPE" => Self::Shape,
            "GROUP" => Self::Group,
            "CREATIVE_BOX" => Self::CreativeBox,
            "AUDIO" => Self::Audio,
            "VIDEO" => Self::Video,
            _ => Self::Other(tag),
        }
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved element kind used as the adaptation dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `TEXT`.
    Text,
    /// `IMAGE`.
    Image,
    /// `SHAPE` with `type = "svg-container"`.
    SvgContainer,
    /// `SHAPE` with `type = "rounded-rect"`.
    RoundedRect,
    /// Any other `SHAPE`, sized through `scaleX`/`scaleY`.
    Path,
    /// `GROUP`.
    Group,
    /// `CREATIVE_BOX`.
    CreativeBox,
    /// `AUDIO`.
    Audio,
    /// `VIDEO`.
    Video,
    /// Any tag the engine has no handler for.
    Unhandled,
}

/// Per-corner radius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Radius {
    /// Top-left corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tl: Option<f64>,
    /// Top-right corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tr: Option<f64>,
    /// Bottom-left corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bl: Option<f64>,
    /// Bottom-right corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub br: Option<f64>,
    /// Keys the engine does not read.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Inner spacing of a text box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    /// Shorthand for all sides, carried through as is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<f64>,
    /// Top side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    /// Right side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    /// Bottom side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    /// Left side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    /// Keys the engine does not read.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Element outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    /// Outline color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// `solid` or `dashed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Top side width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    /// Right side width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    /// Bottom side width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    /// Left side width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    /// `center`, `inside` or `outside`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Dash length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_width: Option<f64>,
    /// Gap between dashes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_gap: Option<f64>,
    /// Dash line cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_cap: Option<String>,
    /// Stroke color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Stroke width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Stroke dash pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dash_array: Option<Vec<f64>>,
    /// Keys the engine does not read.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An inline style run of a text element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordStyle {
    /// Style payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<WordStyleData>,
    /// Fields of the run the engine does not read.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of a [`WordStyle`] run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordStyleData {
    /// Style properties of the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<WordStyleProps>,
    /// Fields of the payload the engine does not read.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Style properties of a [`WordStyle`] run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStyleProps {
    /// Font size, in `font_size_unit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// `px` or `%`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_unit: Option<String>,
    /// Style properties the engine does not read.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stored canvas element.
///
/// Typed fields are filled only when the stored value has the expected
/// shape. A value of any other shape stays in [`CanvasElement::extra`] under
/// its own key, so it is written back exactly as it was read. When a typed
/// field is set, it takes precedence over a raw value with the same key.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasElement {
    /// Element kind tag (`dataType`).
    pub data_type: DataType,
    /// Sub-tag (`type`); refines `SHAPE` elements.
    pub shape_type: Option<String>,

    /// X position (pixels from left).
    pub left: Option<f64>,
    /// Y position (pixels from top).
    pub top: Option<f64>,
    /// Unscaled width.
    pub width: Option<f64>,
    /// Unscaled height.
    pub height: Option<f64>,
    /// Rotation in degrees.
    pub angle: Option<f64>,
    /// Horizontal scale (`scaleX`).
    pub scale_x: Option<f64>,
    /// Vertical scale (`scaleY`).
    pub scale_y: Option<f64>,

    /// Text font size.
    pub font_size: Option<f64>,
    /// Text word spacing.
    pub word_spacing: Option<f64>,
    /// Text auto-fit `[min, max]` font size bounds.
    pub auto_fit_sizes: Option<Vec<Option<f64>>>,
    /// Inline style runs of a text element.
    pub word_style: Option<Vec<WordStyle>>,
    /// Text padding.
    pub padding: Option<Padding>,
    /// Corner radius.
    pub corner_radius: Option<Radius>,
    /// Outline.
    pub border: Option<Border>,

    /// Zoom of the image inside its container.
    pub image_scale: Option<f64>,
    /// Horizontal offset of the image inside its container.
    pub image_left: Option<f64>,
    /// Vertical offset of the image inside its container.
    pub image_top: Option<f64>,

    /// Child element IDs of a group.
    pub objects: Option<Vec<ElementId>>,
    /// Set when this element sits inside a group.
    pub group_path: Option<Value>,

    /// Every stored field the engine does not read, or could not read.
    pub extra: Map<String, Value>,
}

impl CanvasElement {
    /// Create an element of the given kind with no geometry.
    #[must_use]
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            shape_type: None,
            left: None,
            top: None,
            width: None,
            height: None,
            angle: None,
            scale_x: None,
            scale_y: None,
            font_size: None,
            word_spacing: None,
            auto_fit_sizes: None,
            word_style: None,
            padding: None,
            corner_radius: None,
            border: None,
            image_scale: None,
            image_left: None,
            image_top: None,
            objects: None,
            group_path: None,
            extra: Map::new(),
        }
    }

    /// Set position and unscaled extent.
    #[must_use]
    pub fn with_frame(mut self, left: f64, top: f64, width: f64, height: f64) -> Self {
        self.left = Some(left);
        self.top = Some(top);
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the scale pair.
    #[must_use]
    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = Some(scale_x);
        self.scale_y = Some(scale_y);
        self
    }

    /// Set the shape sub-tag.
    #[must_use]
    pub fn with_shape_type(mut self, shape_type: impl Into<String>) -> Self {
        self.shape_type = Some(shape_type.into());
        self
    }

    /// Set the child IDs of a group.
    #[must_use]
    pub fn with_objects<I, S>(mut self, objects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ElementId>,
    {
        self.objects = Some(objects.into_iter().map(Into::into).collect());
        self
    }

    /// Resolve the dispatch kind from `dataType` and the shape sub-tag.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self.data_type {
            DataType::Text => ElementKind::Text,
            DataType::Image => ElementKind::Image,
            DataType::Shape => match self.shape_type.as_deref() {
                Some(SVG_CONTAINER) => ElementKind::SvgContainer,
                Some(ROUNDED_RECT) => ElementKind::RoundedRect,
                _ => ElementKind::Path,
            },
            DataType::Group => ElementKind::Group,
            DataType::CreativeBox => ElementKind::CreativeBox,
            DataType::Audio => ElementKind::Audio,
            DataType::Video => ElementKind::Video,
            DataType::Other(_) => ElementKind::Unhandled,
        }
    }

    /// Whether this is a group that itself belongs to another group.
    #[must_use]
    pub fn is_nested_group(&self) -> bool {
        self.data_type == DataType::Group && self.group_path.is_some()
    }

    /// Child IDs of a group; empty for every other kind.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        self.objects.as_deref().unwrap_or_default()
    }

    /// Overwrite position and extent.
    pub(crate) fn set_bounds(&mut self, bounds: Bounds) {
        self.left = Some(bounds.left);
        self.top = Some(bounds.top);
        self.width = Some(bounds.width);
        self.height = Some(bounds.height);
    }

    /// Scale position and extent independently per axis.
    pub(crate) fn skew_box(&mut self, width_ratio: f64, height_ratio: f64) {
        self.left = self.left.map(|v| v * width_ratio);
        self.top = self.top.map(|v| v * height_ratio);
        self.width = self.width.map(|v| v * width_ratio);
        self.height = self.height.map(|v| v * height_ratio);
    }

    /// Scale position and extent uniformly.
    pub(crate) fn scale_box(&mut self, ratio: f64) {
        self.skew_box(ratio, ratio);
    }
}

impl Serialize for CanvasElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let mut written = Vec::with_capacity(24);
        let mut put = Writer {
            map: &mut map,
            written: &mut written,
        };

        put.entry("dataType", Some(&self.data_type))?;
        put.entry("type", self.shape_type.as_ref())?;
        put.entry("left", self.left.as_ref())?;
        put.entry("top", self.top.as_ref())?;
        put.entry("width", self.width.as_ref())?;
        put.entry("height", self.height.as_ref())?;
        put.entry("angle", self.angle.as_ref())?;
        put.entry("scaleX", self.scale_x.as_ref())?;
        put.entry("scaleY", self.scale_y.as_ref())?;
        put.entry("fontSize", self.font_size.as_ref())?;
        put.entry("wordSpacing", self.word_spacing.as_ref())?;
        put.entry("autoFitSizes", self.auto_fit_sizes.as_ref())?;
        put.entry("wordStyle", self.word_style.as_ref())?;
        put.entry("padding", self.padding.as_ref())?;
        put.entry("cornerRadius", self.corner_radius.as_ref())?;
        put.entry("border", self.border.as_ref())?;
        put.entry("imageScale", self.image_scale.as_ref())?;
        put.entry("imageLeft", self.image_left.as_ref())?;
        put.entry("imageTop", self.image_top.as_ref())?;
        put.entry("objects", self.objects.as_ref())?;
        put.entry("groupPath", self.group_path.as_ref())?;

        for (key, value) in &self.extra {
            if !written.iter().any(|typed| *typed == key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

/// Writes the set typed fields and remembers their keys.
struct Writer<'a, M> {
    map: &'a mut M,
    written: &'a mut Vec<&'static str>,
}

impl<M: SerializeMap> Writer<'_, M> {
    fn entry<T: Serialize + ?Sized>(&mut self, key: &'static str, value: Option<&T>) -> Result<(), M::Error> {
        if let Some(value) = value {
            self.map.serialize_entry(key, value)?;
            self.written.push(key);
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for CanvasElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let data_type = match fields.remove("dataType") {
            Some(Value::String(tag)) => DataType::from(tag),
            Some(other) => {
                return Err(D::Error::custom(format!("dataType must be a string, got {other}")));
            }
            None => return Err(D::Error::missing_field("dataType")),
        };

        Ok(Self {
            data_type,
            shape_type: take_as(&mut fields, "type"),
            left: take_number(&mut fields, "left"),
            top: take_number(&mut fields, "top"),
            width: take_number(&mut fields, "width"),
            height: take_number(&mut fields, "height"),
            angle: take_number(&mut fields, "angle"),
            scale_x: take_number(&mut fields, "scaleX"),
            scale_y: take_number(&mut fields, "scaleY"),
            font_size: take_number(&mut fields, "fontSize"),
            word_spacing: take_number(&mut fields, "wordSpacing"),
            auto_fit_sizes: take_number_list(&mut fields, "autoFitSizes"),
            word_style: take_as(&mut fields, "wordStyle"),
            padding: take_as(&mut fields, "padding"),
            corner_radius: take_as(&mut fields, "cornerRadius"),
            border: take_as(&mut fields, "border"),
            image_scale: take_number(&mut fields, "imageScale"),
            image_left: take_number(&mut fields, "imageLeft"),
            image_top: take_number(&mut fields, "imageTop"),
            objects: take_as(&mut fields, "objects"),
            group_path: take_present(&mut fields, "groupPath"),
            extra: fields,
        })
    }
}

/// Move a JSON number out of `fields`; anything else stays put.
fn take_number(fields: &mut Map<String, Value>, key: &str) -> Option<f64> {
    let number = fields.get(key)?.as_f64()?;
    fields.remove(key);
    Some(number)
}

/// Move an array of numbers (or nulls) out of `fields`.
fn take_number_list(fields: &mut Map<String, Value>, key: &str) -> Option<Vec<Option<f64>>> {
    let Value::Array(items) = fields.get(key)? else {
        return None;
    };
    let numbers = items
        .iter()
        .map(|item| match item {
            Value::Null => Some(None),
            other => other.as_f64().map(Some),
        })
        .collect::<Option<Vec<_>>>()?;
    fields.remove(key);
    Some(numbers)
}

/// Move a value out of `fields` if it reads as `T`.
fn take_as<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Option<T> {
    let parsed = T::deserialize(fields.get(key)?).ok()?;
    fields.remove(key);
    Some(parsed)
}

/// Move a non-null value out of `fields`.
fn take_present(fields: &mut Map<String, Value>, key: &str) -> Option<Value> {
    if fields.get(key)?.is_null() {
        return None;
    }
    fields.remove(key)
}
