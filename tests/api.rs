//! HTTP-level tests against JSON artifact fixtures

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use noshow_api::api::{self, AppState};
use noshow_api::config::ArtifactsConfig;
use noshow_api::metrics::ServiceMetrics;
use noshow_api::models::loader::{ArtifactLoader, Artifacts};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tempfile::TempDir;

const NEIGHBOURHOODS: [&str; 4] = ["AEROPORTO", "ANDORINHAS", "BELA VISTA", "JARDIM CAMBURI"];

#[derive(Clone, Copy)]
struct Fixture {
    model: bool,
    scaler: bool,
    label_encoder: bool,
}

const ALL: Fixture = Fixture {
    model: true,
    scaler: true,
    label_encoder: true,
};

const NONE: Fixture = Fixture {
    model: false,
    scaler: false,
    label_encoder: false,
};

/// Write the requested artifacts into a temp dir and load them the way `main` does
fn load_artifacts(fixture: Fixture) -> (TempDir, Artifacts) {
    let dir = tempfile::tempdir().unwrap();
    let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();

    if fixture.model {
        let model = json!({
            "coefficients": [0.05, 0.1, 0.0, 0.2, -0.1, 0.05, 0.1, 0.0, -0.3, 0.8],
            "intercept": -0.4,
        });
        write(dir.path(), "model.json", &model);
    }
    if fixture.scaler {
        let scaler = json!({
            "mean": [0.35, 37.0, 40.0, 0.1, 0.2, 0.07, 0.03, 0.02, 0.32, 10.0],
            "scale": [0.48, 23.0, 22.0, 0.3, 0.4, 0.26, 0.17, 0.16, 0.47, 15.0],
        });
        write(dir.path(), "scaler.json", &scaler);
    }
    if fixture.label_encoder {
        write(
            dir.path(),
            "label_encoder.json",
            &json!({ "classes": NEIGHBOURHOODS }),
        );
    }

    let config = ArtifactsConfig {
        model_path: path("model.json"),
        scaler_path: path("scaler.json"),
        label_encoder_path: path("label_encoder.json"),
        onnx_threads: 1,
    };
    let artifacts = ArtifactLoader::new().load_all(&config);
    (dir, artifacts)
}

fn write(dir: &Path, name: &str, body: &Value) {
    std::fs::write(dir.join(name), body.to_string()).unwrap();
}

fn state(artifacts: Artifacts) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        Arc::new(artifacts),
        Arc::new(ServiceMetrics::new()),
    ))
}

fn valid_body() -> Value {
    json!({
        "Gender": 1,
        "Age": 29,
        "Neighbourhood": 2,
        "Scholarship": 0,
        "Hipertension": 0,
        "Diabetes": 0,
        "Alcoholism": 0,
        "Handcap": 0,
        "SMS_received": 1,
        "WaitDays": 21
    })
}

#[actix_web::test]
async fn test_root_message() {
    let (_dir, artifacts) = load_artifacts(NONE);
    let app = test::init_service(
        App::new()
            .app_data(state(artifacts))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], api::SERVICE_MESSAGE);
}

#[actix_web::test]
async fn test_predict_with_all_artifacts() {
    let (_dir, artifacts) = load_artifacts(ALL);
    let app = test::init_service(
        App::new()
            .app_data(state(artifacts))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(valid_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let prediction = body["prediction"].as_i64().unwrap();
    let probability = body["probability"].as_f64().unwrap();
    assert!(prediction == 0 || prediction == 1);
    assert!((0.0..=1.0).contains(&probability));
}

#[actix_web::test]
async fn test_predict_is_deterministic() {
    let (_dir, artifacts) = load_artifacts(ALL);
    let app = test::init_service(
        App::new()
            .app_data(state(artifacts))
            .configure(api::configure),
    )
    .await;

    let mut responses = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(valid_body())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        responses.push(body);
    }

    assert_eq!(responses[0], responses[1]);
}

#[actix_web::test]
async fn test_predict_without_classifier_or_scaler_is_unavailable() {
    let missing_model = Fixture {
        model: false,
        ..ALL
    };
    let missing_scaler = Fixture {
        scaler: false,
        ..ALL
    };

    for fixture in [missing_model, missing_scaler] {
        let (_dir, artifacts) = load_artifacts(fixture);
        let data = state(artifacts);
        let app = test::init_service(
            App::new()
                .app_data(data.clone())
                .configure(api::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Model not loaded");

        let metrics = &data.metrics;
        assert_eq!(metrics.predictions_served.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.unavailable_responses.load(Ordering::Relaxed), 1);
    }
}

#[actix_web::test]
async fn test_neighbourhoods_without_encoder_is_unavailable() {
    let (_dir, artifacts) = load_artifacts(Fixture {
        label_encoder: false,
        ..ALL
    });
    let app = test::init_service(
        App::new()
            .app_data(state(artifacts))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/neighbourhoods").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Label encoder not loaded");
}

#[actix_web::test]
async fn test_neighbourhood_ids_are_contiguous() {
    let (_dir, artifacts) = load_artifacts(ALL);
    let app = test::init_service(
        App::new()
            .app_data(state(artifacts))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/neighbourhoods").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let entries = body["neighbourhoods"].as_array().unwrap();

    assert_eq!(entries.len(), NEIGHBOURHOODS.len());
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry["id"], i);
        assert_eq!(entry["name"], NEIGHBOURHOODS[i]);
    }
}

#[actix_web::test]
async fn test_health_reports_load_status() {
    let (_dir, artifacts) = load_artifacts(NONE);
    let app = test::init_service(
        App::new()
            .app_data(state(artifacts))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["scaler_loaded"], false);
    assert_eq!(body["label_encoder_loaded"], false);

    let (_dir, artifacts) = load_artifacts(ALL);
    let app = test::init_service(
        App::new()
            .app_data(state(artifacts))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["scaler_loaded"], true);
    assert_eq!(body["label_encoder_loaded"], true);
}

#[actix_web::test]
async fn test_malformed_bodies_are_rejected() {
    let (_dir, artifacts) = load_artifacts(ALL);
    let data = state(artifacts);
    let app = test::init_service(
        App::new()
            .app_data(data.clone())
            .configure(api::configure),
    )
    .await;

    let mut missing_field = valid_body();
    missing_field.as_object_mut().unwrap().remove("WaitDays");

    let mut wrong_type = valid_body();
    wrong_type["Age"] = json!("twenty-nine");

    for body in [missing_field, wrong_type] {
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].is_string());
    }

    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(header::ContentType::json())
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(data.metrics.predictions_served.load(Ordering::Relaxed), 0);
}

#[actix_web::test]
async fn test_cors_allows_configured_origin() {
    let (_dir, artifacts) = load_artifacts(NONE);
    let origins = vec!["http://localhost:3000".to_string()];
    let app = test::init_service(
        App::new()
            .wrap(api::build_cors(&origins))
            .app_data(state(artifacts))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[actix_web::test]
async fn test_cors_skips_malformed_origins() {
    let (_dir, artifacts) = load_artifacts(NONE);
    let origins = vec!["http://localhost:3000".to_string(), "not a url".to_string()];
    let app = test::init_service(
        App::new()
            .wrap(api::build_cors(&origins))
            .app_data(state(artifacts))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}
