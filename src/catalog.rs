// src/catalog.rs
//
// Static content the service ships: the demo budget shown without spending
// API quota, its placeholder photo, and the mock professional directory.

use crate::models::{CostAnalysis, Provider, RenovationItem, Urgency};

/// Placeholder photo used when the demo budget is loaded with no upload
/// present.
pub const DEMO_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1513694203232-719a280e022f?q=80&w=1000&auto=format&fit=crop";

/// Fixed "Presupuesto Inteligente" sample. Loaded synchronously, no network.
pub fn demo_analysis() -> CostAnalysis {
    CostAnalysis {
        items: vec![
            RenovationItem {
                category: "Albañilería y Paredes".to_string(),
                description: "Picado de revoque en sector con humedad ascendente (12m²), \
                              tratamiento con bloqueador hidrófugo inyectable y revoque nuevo \
                              completo con terminación fina."
                    .to_string(),
                estimated_cost_ars: 850_000.0,
                estimated_cost_usd: 850.0,
                urgency: Urgency::High,
            },
            RenovationItem {
                category: "Pisos y Revestimientos".to_string(),
                description: "Pulido integral de parquet de Roble de Eslavonia existente y \
                              aplicación de 3 manos de laca poliuretánica satinada de alto \
                              tránsito (Plastificado)."
                    .to_string(),
                estimated_cost_ars: 420_000.0,
                estimated_cost_usd: 420.0,
                urgency: Urgency::Medium,
            },
            RenovationItem {
                category: "Pintura General".to_string(),
                description: "Aplicación de enduido completo en muros y cielorrasos para alisar \
                              imperfecciones, lijado y 2 manos de látex interior lavable premium \
                              (Alba/Sherwin)."
                    .to_string(),
                estimated_cost_ars: 380_000.0,
                estimated_cost_usd: 380.0,
                urgency: Urgency::Medium,
            },
            RenovationItem {
                category: "Electricidad".to_string(),
                description: "Reemplazo de 8 cajas de tomas y puntos por línea moderna (Cambre \
                              Siglo XXII). Verificación de cableado y puesta a tierra."
                    .to_string(),
                estimated_cost_ars: 150_000.0,
                estimated_cost_usd: 150.0,
                urgency: Urgency::Low,
            },
        ],
        total_cost_ars: 1_800_000.0,
        total_cost_usd: 1_800.0,
        summary: "La propiedad tiene excelente potencial. La inversión principal debe enfocarse \
                  en resolver la humedad de cimientos antes de cualquier tratamiento estético. \
                  El piso de roble es recuperable y aumentará significativamente el valor de \
                  tasación."
            .to_string(),
    }
}

/// Mock directory of professionals in Argentina.
pub fn providers() -> Vec<Provider> {
    fn provider(
        id: &str,
        name: &str,
        profession: &str,
        rating: f32,
        location: &str,
        promoted: bool,
    ) -> Provider {
        Provider {
            id: id.to_string(),
            name: name.to_string(),
            profession: profession.to_string(),
            rating,
            location: location.to_string(),
            image_url: format!("https://picsum.photos/60/60?random={id}"),
            is_promoted: promoted,
        }
    }

    vec![
        provider("1", "Carlos Gomez", "Albañilería y Pintura", 4.8, "Palermo, CABA", true),
        provider("2", "Estudio Arquitectura BA", "Arquitectura", 5.0, "Recoleta, CABA", true),
        provider("3", "ElectroSol", "Electricidad", 4.5, "Córdoba Capital", false),
        provider("4", "Muebles & Diseño", "Interiorismo", 4.9, "San Isidro, GBA", false),
        provider("5", "Plomería Total", "Plomería", 4.2, "Rosario, SF", false),
        provider("6", "Pisos Brillantes", "Pulido de Pisos", 4.7, "Belgrano, CABA", false),
        provider("7", "Gasistas Matriculados", "Gasista", 4.6, "La Plata, PBA", false),
    ]
}

/// Directory filtering: free-text match on name or location, optional exact
/// profession match. An absent or "Todos" profession matches everything.
pub fn filter_providers(
    providers: &[Provider],
    search: Option<&str>,
    profession: Option<&str>,
) -> Vec<Provider> {
    let needle = search.unwrap_or("").trim().to_lowercase();

    providers
        .iter()
        .filter(|p| {
            let matches_search = needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.location.to_lowercase().contains(&needle);
            let matches_profession = match profession {
                None | Some("Todos") | Some("") => true,
                Some(wanted) => p.profession == wanted,
            };
            matches_search && matches_profession
        })
        .cloned()
        .collect()
}
