#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod config;
pub mod export;
pub mod frame;
pub mod geom;

use std::fmt;

use app::AppState;
use export::StlFormat;
use frame::{Frame, FrameParameters, FrameStyle, Piece, RawFrameInput, StyleMaterial};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    log::set_logger(&DEFAULT_LOGGER).expect("error initializing logger");
    log::set_max_level(LevelFilter::Debug);
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct MaterialExport {
    name: &'static str,
    color: [f64; 3],
    color_hex: String,
    roughness: f64,
    metalness: f64,
}

impl From<&StyleMaterial> for MaterialExport {
    fn from(material: &StyleMaterial) -> Self {
        Self {
            name: material.name,
            color: material.color,
            color_hex: material.color_hex(),
            roughness: material.roughness,
            metalness: material.metalness,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct PieceGeometry {
    id: String,
    structural: bool,
    vertices: Vec<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normals: Option<Vec<[f64; 3]>>,
    indices: Vec<u32>,
    material: MaterialExport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeometryResponse {
    style: FrameStyle,
    pieces: Vec<PieceGeometry>,
    vertex_count: usize,
    triangle_count: usize,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
struct BoundsExport {
    min: [f64; 3],
    max: [f64; 3],
    center: [f64; 3],
    size: [f64; 3],
}

#[derive(Debug, Serialize)]
struct StyleExport {
    name: &'static str,
    material: MaterialExport,
}

/// Publieke ingang voor de webapplicatie.
#[wasm_bindgen]
pub struct FrameEngine {
    state: AppState,
}

#[wasm_bindgen]
impl FrameEngine {
    /// Bouw een engine met een frame op basis van de standaardwaarden.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<FrameEngine, JsValue> {
        let state = AppState::new().map_err(to_js_error)?;
        Ok(FrameEngine { state })
    }

    /// Bouw het frame direct opnieuw op met de gegeven invoer.
    #[wasm_bindgen]
    pub fn rebuild(&mut self, input: JsValue) -> Result<(), JsValue> {
        let input = parse_input(input)?;
        self.state.rebuild_now(&input).map_err(to_js_error)?;
        debug_log!("frame opnieuw opgebouwd: {} stukken", self.state.frame().pieces().len());
        Ok(())
    }

    /// Plan een herberekening; eerdere, nog niet uitgevoerde invoer vervalt.
    #[wasm_bindgen]
    pub fn request_rebuild(&mut self, input: JsValue, now_ms: f64) -> Result<(), JsValue> {
        let input = parse_input(input)?;
        self.state.request_rebuild(input, now_ms);
        Ok(())
    }

    /// Voer een geplande herberekening uit zodra de wachttijd verstreken is.
    /// Geeft `true` terug als het frame vervangen is.
    #[wasm_bindgen]
    pub fn poll(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        self.state.poll(now_ms).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn has_pending(&self) -> bool {
        self.state.has_pending()
    }

    /// Zet alle parameters terug naar de standaardwaarden.
    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.state.reset().map_err(to_js_error)?;
        Ok(())
    }

    /// Genormaliseerde parameters van het huidige frame.
    #[wasm_bindgen]
    pub fn get_parameters(&self) -> Result<JsValue, JsValue> {
        to_js_value(self.state.frame().parameters())
    }

    /// Afgeleide maten van het huidige frame.
    #[wasm_bindgen]
    pub fn get_dimensions(&self) -> Result<JsValue, JsValue> {
        to_js_value(self.state.frame().dimensions())
    }

    /// Alle geplaatste stukken met hun mesh en materiaal.
    #[wasm_bindgen]
    pub fn get_geometry(&self) -> Result<JsValue, JsValue> {
        to_js_value(&geometry_response(self.state.frame()))
    }

    /// Omhullende doos van het frame, of `null` als het frame leeg is.
    #[wasm_bindgen]
    pub fn get_bounding_box(&self) -> Result<JsValue, JsValue> {
        to_js_value(&bounds(self.state.frame()))
    }

    /// Camerapositie die het hele frame in beeld brengt.
    #[wasm_bindgen]
    pub fn fit_view(&self, fov_degrees: f64) -> Result<JsValue, JsValue> {
        let fit = self
            .state
            .frame()
            .camera_fit(fov_degrees)
            .ok_or_else(|| js_error("frame heeft geen geometrie"))?;
        to_js_value(&fit)
    }

    /// Beschikbare stijlen met hun materiaal.
    #[wasm_bindgen]
    pub fn get_styles(&self) -> Result<JsValue, JsValue> {
        to_js_value(&style_catalog())
    }

    /// Exporteer de dragende stukken als zip met één STL per stuk.
    ///
    /// Zonder invoer worden de parameters van het huidige frame gebruikt;
    /// het getoonde frame zelf wordt niet aangeraakt.
    #[wasm_bindgen]
    pub fn export_archive(&self, input: JsValue, ascii: bool) -> Result<Vec<u8>, JsValue> {
        let params = if input.is_undefined() || input.is_null() {
            *self.state.frame().parameters()
        } else {
            parse_input(input)?.to_parameters()
        };
        let format = if ascii { StlFormat::Ascii } else { StlFormat::Binary };
        export::export_archive(params, format).map_err(to_js_error)
    }
}

fn parse_input(input: JsValue) -> Result<RawFrameInput, JsValue> {
    if input.is_undefined() || input.is_null() {
        return Ok(RawFrameInput::default());
    }
    serde_wasm_bindgen::from_value(input).map_err(to_js_error)
}

fn to_js_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsError::new(&err.to_string()).into())
}

fn geometry_response(frame: &Frame) -> GeometryResponse {
    let material = MaterialExport::from(&frame.parameters().style.policy().material);
    let pieces = frame
        .pieces()
        .iter()
        .map(|piece| piece_geometry(piece, &material))
        .collect();
    GeometryResponse {
        style: frame.parameters().style,
        pieces,
        vertex_count: frame.vertex_count(),
        triangle_count: frame.triangle_count(),
    }
}

fn piece_geometry(piece: &Piece, material: &MaterialExport) -> PieceGeometry {
    let placed = piece.placed_mesh();
    PieceGeometry {
        id: piece.role.to_string(),
        structural: piece.role.is_structural(),
        vertices: placed.positions,
        normals: placed.normals,
        indices: placed.indices,
        material: material.clone(),
    }
}

fn bounds(frame: &Frame) -> Option<BoundsExport> {
    frame.bounding_box().map(|bbox| BoundsExport {
        min: bbox.min.to_array(),
        max: bbox.max.to_array(),
        center: bbox.center().to_array(),
        size: bbox.size().to_array(),
    })
}

fn style_catalog() -> Vec<StyleExport> {
    FrameStyle::ALL
        .iter()
        .map(|style| StyleExport {
            name: style.name(),
            material: MaterialExport::from(&style.policy().material),
        })
        .collect()
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

impl fmt::Debug for FrameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameEngine")
            .field("parameters", self.state.frame().parameters())
            .field("pending", &self.state.has_pending())
            .finish()
    }
}
