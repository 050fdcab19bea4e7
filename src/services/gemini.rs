// src/services/gemini.rs
//
// Adapter between the domain and the generative AI HTTP service. Stateless;
// one attempt per call, no retries, no timeout. Any failure collapses into a
// single error per operation, as the caller only distinguishes "analysis
// failed" from "transformation failed".

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde_json::{Value, json};

use crate::errors::InmueblarError;
use crate::models::{CostAnalysis, EncodedImage, TransformationStyle};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const ANALYSIS_PROMPT: &str = "\
Actúa como un contratista experto y perito arquitecto en Argentina (CABA/GBA). \
Analiza esta imagen con precisión técnica. Identifica patologías constructivas \
(humedad de cimientos, descascaramiento, fisuras, pisos antiguos) y oportunidades \
de valorización.\n\n\
Genera un presupuesto de obra DETALLADO (\"Presupuesto Inteligente\"). \
Para cada ítem, escribe una descripción técnica completa (ej: no digas \"pintar pared\", \
di \"Tratamiento antihumedad, enduido completo y aplicación de látex interior lavable \
primera marca\").\n\n\
Calcula costos REALISTAS de mercado (Materiales + Mano de Obra) en Argentina.\n\n\
Devuelve la respuesta EXCLUSIVAMENTE en formato JSON.";

/// Seam between the controller and the external service; lets tests stand in
/// a scripted gateway.
#[async_trait]
pub trait RenovationAi: Send + Sync {
    async fn analyze(&self, image: &EncodedImage) -> Result<CostAnalysis, InmueblarError>;

    async fn transform(
        &self,
        image: &EncodedImage,
        style: TransformationStyle,
    ) -> Result<EncodedImage, InmueblarError>;
}

pub struct GeminiService {
    api_key: String,
    analysis_model: String,
    editing_model: String,
    client: Client,
}

impl GeminiService {
    pub fn new(api_key: String, analysis_model: String, editing_model: String) -> Self {
        Self {
            api_key,
            analysis_model,
            editing_model,
            client: Client::new(),
        }
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &Value,
    ) -> Result<Value, reqwest::Error> {
        self.client
            .post(format!("{GEMINI_ENDPOINT}/{model}:generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl RenovationAi for GeminiService {
    async fn analyze(&self, image: &EncodedImage) -> Result<CostAnalysis, InmueblarError> {
        if self.api_key.is_empty() {
            return Err(InmueblarError::Analysis(
                "GEMINI_API_KEY is not configured".to_string(),
            ));
        }

        let mut body = content_body(image, ANALYSIS_PROMPT);
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": analysis_schema(),
        });

        let result = self
            .generate_content(&self.analysis_model, &body)
            .await
            .map_err(|e| InmueblarError::Analysis(format!("analysis request failed: {e}")))?;

        let text = candidate_text(&result).ok_or_else(|| {
            InmueblarError::Analysis("no text payload in analysis response".to_string())
        })?;

        parse_cost_analysis(text)
    }

    async fn transform(
        &self,
        image: &EncodedImage,
        style: TransformationStyle,
    ) -> Result<EncodedImage, InmueblarError> {
        let Some(instruction) = editing_prompt(style) else {
            // Original is not a transformation; hand the input straight back.
            return Ok(image.clone());
        };

        if self.api_key.is_empty() {
            return Err(InmueblarError::Transformation(
                "GEMINI_API_KEY is not configured".to_string(),
            ));
        }

        let body = content_body(image, instruction);
        let result = self
            .generate_content(&self.editing_model, &body)
            .await
            .map_err(|e| {
                InmueblarError::Transformation(format!("transformation request failed: {e}"))
            })?;

        extract_inline_image(&result).ok_or_else(|| {
            InmueblarError::Transformation("no image payload in response".to_string())
        })
    }
}

/// Fixed editing instruction for each style. `Original` has none.
pub fn editing_prompt(style: TransformationStyle) -> Option<&'static str> {
    use TransformationStyle::*;
    let instruction = match style {
        Original => return None,
        FixHumidity => {
            "Corrige la humedad de las paredes, repara grietas y pinta las paredes de blanco \
             inmaculado. Mantén la estructura original y los muebles. Iluminación natural y \
             limpia. Calidad fotorrealista 4k."
        }
        Modern => {
            "Rediseña esta habitación con un estilo interior moderno y lujoso. Muebles \
             contemporáneos, iluminación cálida, paleta de colores neutros. Calidad \
             fotorrealista 4k, revista de arquitectura."
        }
        Scandinavian => {
            "Rediseña esta habitación con estilo escandinavo (nórdico). Mucha madera clara, \
             blanco, plantas, minimalismo acogedor. Calidad fotorrealista 4k."
        }
        Industrial => {
            "Rediseña esta habitación con estilo industrial. Paredes de ladrillo visto, \
             conductos visibles, metal negro, cuero, madera rústica. Calidad fotorrealista 4k."
        }
        Minimalist => {
            "Rediseña esta habitación con estilo minimalista extremo. Espacios abiertos, pocos \
             muebles, líneas limpias, colores monocromáticos. Calidad fotorrealista 4k."
        }
    };
    Some(instruction)
}

fn content_body(image: &EncodedImage, instruction: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                {
                    "inlineData": {
                        "mimeType": image.mime_type,
                        "data": image.base64_payload(),
                    }
                },
                { "text": instruction }
            ]
        }]
    })
}

/// Response schema the analysis call constrains the model to.
fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": {
                            "type": "STRING",
                            "description": "Categoría Técnica (ej: Albañilería Gruesa, Revestimientos, Instalaciones)"
                        },
                        "description": {
                            "type": "STRING",
                            "description": "Descripción técnica detallada del trabajo y materiales a utilizar"
                        },
                        "estimatedCostARS": {
                            "type": "NUMBER",
                            "description": "Costo total en Pesos Argentinos"
                        },
                        "estimatedCostUSD": {
                            "type": "NUMBER",
                            "description": "Costo total en Dólares"
                        },
                        "urgency": { "type": "STRING", "enum": ["Baja", "Media", "Alta"] }
                    }
                }
            },
            "totalCostARS": { "type": "NUMBER" },
            "totalCostUSD": { "type": "NUMBER" },
            "summary": {
                "type": "STRING",
                "description": "Dictamen técnico profesional del estado general (max 30 palabras)"
            }
        }
    })
}

/// First text part of the first candidate, if any.
fn candidate_text(response: &Value) -> Option<&str> {
    response["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .find_map(|part| part["text"].as_str())
}

/// The returned text must parse strictly as a `CostAnalysis`; anything else
/// is an analysis failure.
pub fn parse_cost_analysis(text: &str) -> Result<CostAnalysis, InmueblarError> {
    serde_json::from_str(text)
        .map_err(|e| InmueblarError::Analysis(format!("unparsable analysis payload: {e}")))
}

/// Scans the candidate parts for inline image data and decodes it.
pub fn extract_inline_image(response: &Value) -> Option<EncodedImage> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;

    parts.iter().find_map(|part| {
        let inline = &part["inlineData"];
        let payload = inline["data"].as_str()?;
        let data = general_purpose::STANDARD.decode(payload).ok()?;
        let mime_type = inline["mimeType"].as_str().unwrap_or("image/jpeg");
        Some(EncodedImage::new(mime_type, data))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_style_has_no_instruction() {
        assert!(editing_prompt(TransformationStyle::Original).is_none());
    }

    #[test]
    fn each_restyle_has_a_distinct_instruction() {
        let prompts: Vec<_> = TransformationStyle::ALL
            .iter()
            .filter_map(|s| editing_prompt(*s))
            .collect();
        assert_eq!(prompts.len(), 5);
        for (i, a) in prompts.iter().enumerate() {
            for b in &prompts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn request_body_carries_inline_image_and_instruction() {
        let image = EncodedImage::new("image/png", vec![1, 2, 3]);
        let body = content_body(&image, "instrucción");
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(
            parts[0]["inlineData"]["data"].as_str().unwrap(),
            image.base64_payload()
        );
        assert_eq!(parts[1]["text"], "instrucción");
    }

    #[test]
    fn parses_schema_conforming_analysis() {
        let text = r#"{
            "items": [
                {
                    "category": "Albañilería",
                    "description": "Revoque nuevo",
                    "estimatedCostARS": 850000,
                    "estimatedCostUSD": 850,
                    "urgency": "Alta"
                }
            ],
            "totalCostARS": 850000,
            "totalCostUSD": 850,
            "summary": "Humedad de cimientos a tratar primero."
        }"#;

        let analysis = parse_cost_analysis(text).unwrap();
        assert_eq!(analysis.items.len(), 1);
        assert_eq!(analysis.total_cost_usd, 850.0);
    }

    #[test]
    fn rejects_non_json_and_off_schema_payloads() {
        assert!(matches!(
            parse_cost_analysis("the room needs paint"),
            Err(InmueblarError::Analysis(_))
        ));
        // Valid JSON, wrong shape.
        assert!(parse_cost_analysis(r#"{"items": "none"}"#).is_err());
        // Urgency outside the closed set.
        assert!(
            parse_cost_analysis(
                r#"{"items":[{"category":"x","description":"y",
                    "estimatedCostARS":1,"estimatedCostUSD":1,"urgency":"Critical"}],
                    "totalCostARS":1,"totalCostUSD":1,"summary":"z"}"#
            )
            .is_err()
        );
    }

    #[test]
    fn finds_inline_image_among_mixed_parts() {
        let payload = general_purpose::STANDARD.encode([0xff, 0xd8, 0xff]);
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Listo, aquí está la imagen." },
                        { "inlineData": { "mimeType": "image/png", "data": payload } }
                    ]
                }
            }]
        });

        let image = extract_inline_image(&response).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, vec![0xff, 0xd8, 0xff]);
    }

    #[test]
    fn text_only_response_yields_no_image() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "no puedo" }] } }]
        });
        assert!(extract_inline_image(&response).is_none());
        assert!(extract_inline_image(&json!({})).is_none());
    }

    #[test]
    fn candidate_text_picks_first_text_part() {
        let response = json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "" } },
                { "text": "{}" }
            ] } }]
        });
        assert_eq!(candidate_text(&response), Some("{}"));
    }
}
