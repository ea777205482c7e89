//! Clipboard and drag-and-drop data exchange
//!
//! A [`DataSource`] is implemented by the application and answers for data it
//! offers. A [`DataOffer`] is implemented by a backend and lets the application
//! fetch data from a remote source; the answer arrives through a callback once
//! the native round trip completes.

use std::fmt;
use std::time::SystemTime;

use smallvec::SmallVec;

/// Small integer tag naming a data format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataType(pub u32);

impl DataType {
    pub const NONE: DataType = DataType(0);
    pub const RAW: DataType = DataType(1);
    pub const TEXT: DataType = DataType(2);
    /// Decoded image (see [`ImageData`])
    pub const IMAGE: DataType = DataType(3);
    /// List of file paths or uris
    pub const FILE_PATHS: DataType = DataType(4);
    pub const TIME_POINT: DataType = DataType(5);

    // Encoded formats. Backends may add their own above these.
    pub const PNG: DataType = DataType(10);
    pub const JPEG: DataType = DataType(11);
    pub const GIF: DataType = DataType(12);
    pub const BMP: DataType = DataType(13);
    pub const SVG: DataType = DataType(14);
    pub const MP3: DataType = DataType(20);
    pub const MP4: DataType = DataType(21);
    pub const HTML: DataType = DataType(30);
    pub const XML: DataType = DataType(31);
    pub const JSON: DataType = DataType(32);

    /// Common mime type for this data type, if there is one
    pub fn mime_type(self) -> Option<&'static str> {
        match self {
            DataType::RAW => Some("application/octet-stream"),
            DataType::TEXT => Some("text/plain;charset=utf-8"),
            DataType::FILE_PATHS => Some("text/uri-list"),
            DataType::PNG => Some("image/png"),
            DataType::JPEG => Some("image/jpeg"),
            DataType::GIF => Some("image/gif"),
            DataType::BMP => Some("image/bmp"),
            DataType::SVG => Some("image/svg+xml"),
            DataType::MP3 => Some("audio/mpeg"),
            DataType::MP4 => Some("video/mp4"),
            DataType::HTML => Some("text/html"),
            DataType::XML => Some("text/xml"),
            DataType::JSON => Some("application/json"),
            _ => None,
        }
    }

    /// Reverse of [`DataType::mime_type`]
    pub fn from_mime_type(mime: &str) -> Option<DataType> {
        let essence = mime.split(';').next().unwrap_or(mime).trim();
        match essence {
            "text/plain" | "UTF8_STRING" | "STRING" | "TEXT" => Some(DataType::TEXT),
            "application/octet-stream" => Some(DataType::RAW),
            "text/uri-list" => Some(DataType::FILE_PATHS),
            "image/png" => Some(DataType::PNG),
            "image/jpeg" => Some(DataType::JPEG),
            "image/gif" => Some(DataType::GIF),
            "image/bmp" => Some(DataType::BMP),
            "image/svg+xml" => Some(DataType::SVG),
            "audio/mpeg" => Some(DataType::MP3),
            "video/mp4" => Some(DataType::MP4),
            "text/html" => Some(DataType::HTML),
            "text/xml" => Some(DataType::XML),
            "application/json" => Some(DataType::JSON),
            _ => None,
        }
    }
}

/// Ordered set of data types, most preferred first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataTypes {
    types: SmallVec<[DataType; 4]>,
}

impl DataTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type, returns false if it was already present
    pub fn add(&mut self, ty: DataType) -> bool {
        if self.contains(ty) {
            return false;
        }
        self.types.push(ty);
        true
    }

    /// Remove a type, returns false if it was not present
    pub fn remove(&mut self, ty: DataType) -> bool {
        match self.types.iter().position(|t| *t == ty) {
            Some(index) => {
                self.types.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, ty: DataType) -> bool {
        self.types.contains(&ty)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = DataType> + '_ {
        self.types.iter().copied()
    }

    /// First type of `self` that `other` also contains
    pub fn first_shared(&self, other: &DataTypes) -> Option<DataType> {
        self.iter().find(|ty| other.contains(*ty))
    }
}

impl FromIterator<DataType> for DataTypes {
    fn from_iter<I: IntoIterator<Item = DataType>>(iter: I) -> Self {
        let mut types = DataTypes::new();
        for ty in iter {
            types.add(ty);
        }
        types
    }
}

/// Uncompressed image payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// Bytes per row
    pub stride: u32,
    /// RGBA8 pixels
    pub pixels: Vec<u8>,
}

/// Type-erased data container exchanged between sources and offers
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DataValue {
    /// No data; also what failed requests resolve to
    #[default]
    Empty,
    Text(String),
    Raw(Vec<u8>),
    Image(ImageData),
    FilePaths(Vec<String>),
    TimePoint(SystemTime),
}

impl DataValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, DataValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Callback receiving the result of an asynchronous data request
pub type DataCallback = Box<dyn FnOnce(DataValue) + Send>;

/// Application-side provider of clipboard or drag-and-drop data
pub trait DataSource: Send + Sync {
    /// Types this source can provide
    fn types(&self) -> DataTypes;

    /// Data converted to `ty`. Returns [`DataValue::Empty`] when it can't.
    fn data(&self, ty: DataType) -> DataValue;
}

/// Backend-side handle to data offered by some (possibly remote) source
pub trait DataOffer: Send + Sync {
    /// Types the remote source announced
    fn types(&self) -> DataTypes;

    /// Request data as `ty`.
    ///
    /// `callback` runs exactly once. If the request fails it receives
    /// [`DataValue::Empty`].
    fn data(&self, ty: DataType, callback: DataCallback);
}

impl fmt::Debug for dyn DataOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataOffer")
            .field("types", &self.types())
            .finish()
    }
}

impl fmt::Debug for dyn DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("types", &self.types())
            .finish()
    }
}
