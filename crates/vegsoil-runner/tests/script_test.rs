//! End-to-end tests of the export script against the recording client.

use std::path::Path;

use serde_json::Value;
use vegsoil_client::{RecordedCall, RecordingClient, TaskState};
use vegsoil_expr::{Expression, ImageOp, Reducer, Region};
use vegsoil_runner::{load_config, load_config_from_str, run, RunConfig};

// ============================================================================
// Helpers
// ============================================================================

fn recorded_run(config: &RunConfig) -> Vec<RecordedCall> {
    let client = RecordingClient::new("test-project");
    run(config, &client).expect("run should succeed");
    client.calls().expect("calls")
}

/// Function names of an encoded expression, in id order.
fn functions(expr: &Expression) -> Vec<&str> {
    expr.function_names()
}

fn invocation<'a>(expr: &'a Expression, function: &str) -> &'a Value {
    expr.values
        .values()
        .find(|v| v["functionInvocationValue"]["functionName"] == function)
        .unwrap_or_else(|| panic!("{} not found in expression", function))
}

// ============================================================================
// Configuration file
// ============================================================================

#[test]
fn test_shipped_config_matches_defaults() {
    // Integration tests run from the crate directory.
    let config = load_config(Path::new("../../configs/conus.yaml")).expect("load config");
    assert_eq!(config, RunConfig::default());
}

// ============================================================================
// Script behavior
// ============================================================================

#[test]
fn test_two_exports_with_expected_descriptions_and_scales() {
    let calls = recorded_run(&RunConfig::default());

    let exports: Vec<_> = calls
        .iter()
        .filter_map(|call| match call {
            RecordedCall::Export { request, .. } => Some(request),
            _ => None,
        })
        .collect();

    assert_eq!(exports.len(), 2);
    assert_eq!(exports[0].description(), "conus_ndvi");
    assert_eq!(exports[0].scale(), 5000.0);
    assert_eq!(exports[0].image().collection().id(), "MODIS/006/MOD13A2");
    assert_eq!(exports[1].description(), "smap_mean");
    assert_eq!(exports[1].scale(), 10000.0);
    assert_eq!(
        exports[1].image().collection().id(),
        "NASA_USDA/HSL/SMAP10KM_soil_moisture"
    );
}

#[test]
fn test_exported_products_are_fully_built() {
    let calls = recorded_run(&RunConfig::default());

    for call in &calls {
        let RecordedCall::Export { request, .. } = call else {
            continue;
        };
        let steps = request.image().steps();
        match request.description() {
            "conus_ndvi" => {
                assert_eq!(request.image().reducer(), Reducer::Max);
                assert_eq!(
                    steps,
                    &[
                        ImageOp::Clip(Region::CONUS),
                        ImageOp::Reproject {
                            crs: "EPSG:4326".to_string(),
                            scale: 5000.0,
                        },
                        ImageOp::ReduceResolution {
                            reducer: Reducer::Mean,
                            max_pixels: 1024,
                        },
                    ]
                );
            }
            "smap_mean" => {
                assert_eq!(request.image().reducer(), Reducer::Mean);
                assert_eq!(steps, &[ImageOp::Clip(Region::CONUS)]);
            }
            other => panic!("Unexpected export {}", other),
        }
    }
}

#[test]
fn test_export_bodies_encode_the_pipelines() {
    let calls = recorded_run(&RunConfig::default());
    let bodies: Vec<_> = calls
        .iter()
        .filter_map(|call| match call {
            RecordedCall::Export { body, .. } => Some(body),
            _ => None,
        })
        .collect();

    let ndvi = &bodies[0].expression;
    let names = functions(ndvi);
    assert!(names.contains(&"reduce.max"));
    assert!(names.contains(&"Image.reproject"));
    assert!(names.contains(&"Image.reduceResolution"));
    assert_eq!(
        invocation(ndvi, "Image.reduceResolution")["functionInvocationValue"]["arguments"]
            ["maxPixels"]["constantValue"],
        1024
    );
    assert_eq!(
        invocation(ndvi, "Projection")["functionInvocationValue"]["arguments"]["crs"]
            ["constantValue"],
        "EPSG:4326"
    );
    let bbox = &invocation(ndvi, "GeometryConstructors.BBox")["functionInvocationValue"]
        ["arguments"];
    assert_eq!(bbox["west"]["constantValue"], -125.48);
    assert_eq!(bbox["south"]["constantValue"], 24.86);
    assert_eq!(bbox["east"]["constantValue"], -65.93);
    assert_eq!(bbox["north"]["constantValue"], 49.84);

    let smap = &bodies[1].expression;
    let names = functions(smap);
    assert!(names.contains(&"reduce.mean"));
    assert!(names.contains(&"Image.clip"));
    assert!(!names.contains(&"Image.reproject"));
    assert!(!names.contains(&"Image.reduceResolution"));
}

#[test]
fn test_layers_registered_before_exports() {
    let calls = recorded_run(&RunConfig::default());

    let labels: Vec<&str> = calls
        .iter()
        .filter_map(|call| match call {
            RecordedCall::AddLayer { label, .. } => Some(label.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["ndvi_max", "smap_mean"]);

    let first_export = calls
        .iter()
        .position(|call| matches!(call, RecordedCall::Export { .. }))
        .unwrap();
    assert_eq!(first_export, 2);
}

#[test]
fn test_layers_can_be_disabled() {
    let config = load_config_from_str("add_layers: false\n").unwrap();
    let calls = recorded_run(&config);
    assert_eq!(calls.len(), 2);
    assert!(calls
        .iter()
        .all(|call| matches!(call, RecordedCall::Export { .. })));
}

#[test]
fn test_summary_reports_pending_tasks() {
    let client = RecordingClient::new("test-project");
    let summary = run(&RunConfig::default(), &client).unwrap();

    let descriptions: Vec<&str> = summary
        .tasks
        .iter()
        .map(|task| task.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["conus_ndvi", "smap_mean"]);
    assert!(summary.tasks.iter().all(|t| t.state == TaskState::Pending));
    assert!(summary.layers[0].tile_url.ends_with("/tiles/{z}/{x}/{y}"));
}
