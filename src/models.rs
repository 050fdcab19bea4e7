// src/models.rs
use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::InmueblarError;

/// Raw image bytes plus the MIME type declared for them. Immutable once
/// built; replaced wholesale on a new upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl EncodedImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Renders the image as a `data:<mime>;base64,<payload>` reference, the
    /// form the front-end keeps in state and feeds to an `<img>` tag.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.data)
        )
    }

    /// Parses a data URI back into bytes. Stripping the prefix and decoding
    /// must recover exactly the payload that was encoded.
    pub fn from_data_uri(uri: &str) -> Result<Self, InmueblarError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| InmueblarError::Image("not a data URI".to_string()))?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| InmueblarError::Image("data URI is not base64 encoded".to_string()))?;
        let data = general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| InmueblarError::Image(format!("invalid base64 payload: {e}")))?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }

    pub fn base64_payload(&self) -> String {
        general_purpose::STANDARD.encode(&self.data)
    }
}

impl Serialize for EncodedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

impl<'de> Deserialize<'de> for EncodedImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        Self::from_data_uri(&uri).map_err(D::Error::custom)
    }
}

/// What the state holds as "the image": either bytes the user uploaded, or
/// a remote URL (the demo placeholder). On the wire both are the display
/// string the front-end renders directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Inline(EncodedImage),
    Remote(String),
}

impl ImageSource {
    pub fn display_ref(&self) -> String {
        match self {
            ImageSource::Inline(image) => image.to_data_uri(),
            ImageSource::Remote(url) => url.clone(),
        }
    }

    pub fn parse(value: &str) -> Result<Self, InmueblarError> {
        if value.starts_with("data:") {
            Ok(ImageSource::Inline(EncodedImage::from_data_uri(value)?))
        } else {
            Ok(ImageSource::Remote(value.to_string()))
        }
    }

    pub fn as_inline(&self) -> Option<&EncodedImage> {
        match self {
            ImageSource::Inline(image) => Some(image),
            ImageSource::Remote(_) => None,
        }
    }
}

impl Serialize for ImageSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display_ref())
    }
}

impl<'de> Deserialize<'de> for ImageSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Urgency of a renovation item. Wire names are the Spanish values the
/// analysis schema constrains the model to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "Baja")]
    Low,
    #[serde(rename = "Media")]
    Medium,
    #[serde(rename = "Alta")]
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenovationItem {
    pub category: String,
    pub description: String,
    #[serde(rename = "estimatedCostARS")]
    pub estimated_cost_ars: f64,
    #[serde(rename = "estimatedCostUSD")]
    pub estimated_cost_usd: f64,
    pub urgency: Urgency,
}

/// Structured result of the analysis call. Totals are whatever the service
/// reported; they are never recomputed from the items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub items: Vec<RenovationItem>,
    #[serde(rename = "totalCostARS")]
    pub total_cost_ars: f64,
    #[serde(rename = "totalCostUSD")]
    pub total_cost_usd: f64,
    pub summary: String,
}

/// Which editing instruction the transformation call sends. `Original` means
/// no transformation at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformationStyle {
    #[default]
    Original,
    #[serde(alias = "Reparar Humedad y Paredes")]
    FixHumidity,
    #[serde(alias = "Interior Moderno")]
    Modern,
    #[serde(alias = "Estilo Escandinavo")]
    Scandinavian,
    #[serde(alias = "Estilo Industrial")]
    Industrial,
    #[serde(alias = "Minimalista")]
    Minimalist,
}

impl TransformationStyle {
    pub const ALL: [TransformationStyle; 6] = [
        TransformationStyle::Original,
        TransformationStyle::FixHumidity,
        TransformationStyle::Modern,
        TransformationStyle::Scandinavian,
        TransformationStyle::Industrial,
        TransformationStyle::Minimalist,
    ];

    /// Display label shown to the user, as the front-end names the styles.
    pub fn label(&self) -> &'static str {
        match self {
            TransformationStyle::Original => "Original",
            TransformationStyle::FixHumidity => "Reparar Humedad y Paredes",
            TransformationStyle::Modern => "Interior Moderno",
            TransformationStyle::Scandinavian => "Estilo Escandinavo",
            TransformationStyle::Industrial => "Estilo Industrial",
            TransformationStyle::Minimalist => "Minimalista",
        }
    }
}

/// One entry of the mock professional directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub profession: String,
    pub rating: f32,
    pub location: String,
    pub image_url: String,
    #[serde(default)]
    pub is_promoted: bool,
}

/// The whole per-session state snapshot. Every transition replaces it
/// atomically; it is never partially updated in place.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub original_image: Option<ImageSource>,
    pub generated_image: Option<EncodedImage>,
    pub analyzing: bool,
    pub generating: bool,
    pub analysis: Option<CostAnalysis>,
    pub selected_style: TransformationStyle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppState {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            original_image: None,
            generated_image: None,
            analyzing: false,
            generating: false,
            analysis: None,
            selected_style: TransformationStyle::Original,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
