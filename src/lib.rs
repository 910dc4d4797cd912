#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod brick;
pub mod geom;

use std::fmt;

use brick::{BrickWall, BrickWallDiagnostics, BrickWallOptions, UnitClass, generate_brick_wall};
use geom::{FourPointSurface, Plane, Point3, Polyline};
use serde::Serialize;
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
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

/// One brick, flattened for hosts that consume packed buffers.
#[derive(Debug, Serialize)]
pub struct BrickExport<'a> {
    pub sequence: usize,
    pub row: usize,
    pub column: usize,
    pub unit: UnitClass,
    /// `[x0, y0, z0, x1, ...]`
    pub positions: &'a [f64],
    /// Quad indices, four per face.
    pub faces: &'a [u32],
    pub vertex_normals: &'a [[f64; 3]],
    pub face_normals: &'a [[f64; 3]],
    pub front_outline: Vec<[f64; 3]>,
    pub back_outline: Vec<[f64; 3]>,
    pub reference_frame: &'a Plane,
    pub back_reference_frame: &'a Plane,
    pub center_plane: &'a Plane,
    /// Center plane offset by `+wall_thickness / 2`.
    pub front_plane: &'a Plane,
    /// Center plane offset by `-wall_thickness / 2`.
    pub back_plane: &'a Plane,
    pub fit_deviation: f64,
}

#[derive(Debug, Serialize)]
pub struct BrickWallExport<'a> {
    pub rows: usize,
    pub columns: usize,
    pub bricks: Vec<BrickExport<'a>>,
    pub diagnostics: &'a BrickWallDiagnostics,
}

fn outline_points(outline: &Polyline) -> Vec<[f64; 3]> {
    outline.points.iter().map(|p| p.to_array()).collect()
}

/// Flattens a generated wall into [`BrickWallExport`], in brick sequence order.
#[must_use]
pub fn export_wall(wall: &BrickWall) -> BrickWallExport<'_> {
    let bricks = wall
        .bricks
        .iter()
        .map(|brick| BrickExport {
            sequence: brick.sequence(),
            row: brick.row(),
            column: brick.column(),
            unit: brick.unit(),
            positions: brick.mesh().positions_flat(),
            faces: brick.mesh().faces_flat(),
            vertex_normals: &brick.mesh().vertex_normals,
            face_normals: &brick.mesh().face_normals,
            front_outline: outline_points(brick.front_outline()),
            back_outline: outline_points(brick.back_outline()),
            reference_frame: brick.reference_frame(),
            back_reference_frame: brick.back_reference_frame(),
            center_plane: brick.center_plane(),
            front_plane: brick.front_plane(),
            back_plane: brick.back_plane(),
            fit_deviation: brick.fit_deviation(),
        })
        .collect();

    BrickWallExport {
        rows: wall.grid.as_ref().map_or(0, brick::SampleGrid::rows),
        columns: wall.grid.as_ref().map_or(0, brick::SampleGrid::columns),
        bricks,
        diagnostics: &wall.diagnostics,
    }
}

/// Builds a four-point surface from 3 or 4 packed corners (`[x, y, z, ...]`).
pub fn surface_from_corners(corners: &[f64]) -> Result<FourPointSurface, String> {
    if corners.len() != 9 && corners.len() != 12 {
        return Err(format!(
            "expected 9 or 12 corner coordinates, got {}",
            corners.len()
        ));
    }
    if corners.iter().any(|c| !c.is_finite()) {
        return Err("corner coordinates must be finite".to_string());
    }

    let points: Vec<Point3> = corners
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect();
    FourPointSurface::from_points(&points)
}

/// Generates a brick wall on the bilinear patch through `corners` and returns
/// the flattened bricks and diagnostics.
///
/// `options` may be `undefined`/`null` for the defaults or a partial object.
#[wasm_bindgen]
pub fn generate_brick_wall_js(corners: &[f64], options: JsValue) -> Result<JsValue, JsValue> {
    let surface = surface_from_corners(corners).map_err(|err| js_error(&err))?;
    let options: BrickWallOptions = if options.is_undefined() || options.is_null() {
        BrickWallOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
    };

    let wall = generate_brick_wall(&surface, &options).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&export_wall(&wall)).map_err(to_js_error)
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen::JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
