// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Prediction endpoint tests for POST /predict
//!
//! These tests drive the full router with hand-built multipart bodies and
//! verify that:
//! - Valid uploads return a label plus three star categories
//! - Upload preconditions fail with 400 and fixed messages
//! - A missing model and processing failures return 500 without leaking detail
//! - Identical requests produce identical responses

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use star_classifier::{
    api::{create_app, AppState},
    classifier::{Classifier, Label, ModelManager},
    vision::StaticStarDetector,
};
use std::io::Cursor;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

const BOUNDARY: &str = "----star-classifier-test-boundary";

/// Always predicts the same label
struct ConstantClassifier(&'static str);

impl Classifier for ConstantClassifier {
    fn predict(&self, features: &[f32]) -> anyhow::Result<Label> {
        assert_eq!(features.len(), 4096, "classifier must receive 64x64 features");
        Ok(Label::new(self.0))
    }

    fn name(&self) -> &str {
        "constant"
    }
}

/// Fails every prediction with an internal-looking message
struct BrokenClassifier;

impl Classifier for BrokenClassifier {
    fn predict(&self, _features: &[f32]) -> anyhow::Result<Label> {
        anyhow::bail!("/opt/models/star_model.onnx: input tensor rank mismatch")
    }

    fn name(&self) -> &str {
        "broken"
    }
}

struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    data: &'a [u8],
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
            }
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn predict_request(parts: &[Part]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn file_request(filename: &str, data: &[u8]) -> Request<Body> {
    predict_request(&[Part {
        name: "file",
        filename: Some(filename),
        data,
    }])
}

fn encode_image(format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(80, 60, |x, y| {
        Rgb([(x * 3) as u8, (y * 4) as u8, 128])
    }));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

fn app_with(classifier: Arc<dyn Classifier>) -> Router {
    let state = AppState::new(
        ModelManager::with_classifier(classifier),
        Arc::new(StaticStarDetector),
    );
    create_app(state)
}

fn app_with_model() -> Router {
    app_with(Arc::new(ConstantClassifier("5")))
}

fn app_without_model() -> Router {
    create_app(AppState::new_for_test())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn assert_error(body: &Value, expected: &str) {
    assert_eq!(body["error"], expected, "unexpected body: {}", body);
    assert_eq!(body.as_object().map(|o| o.len()), Some(1));
}

#[cfg(test)]
mod predict_endpoint_tests {
    use super::*;

    // =============================================================================
    // Success Path
    // =============================================================================

    /// Test 1: Valid PNG returns label and three star categories
    #[tokio::test]
    async fn test_valid_png_returns_prediction() {
        let png = encode_image(ImageFormat::Png);
        let (status, body) = send(app_with_model(), file_request("sky.png", &png)).await;

        assert_eq!(status, StatusCode::OK, "body: {}", body);
        assert_eq!(body["message"], "Predicción: 5");

        let stars = body["stars"].as_object().expect("stars should be an object");
        assert_eq!(stars.len(), 3);
        for key in ["fourPoint", "fivePoint", "sixPoint"] {
            let entries = stars[key].as_array().expect("category should be an array");
            assert_eq!(entries.len(), 1, "{} should have one entry", key);
            for field in ["x", "y", "radius"] {
                assert!(entries[0][field].is_number(), "{}.{} should be numeric", key, field);
            }
        }
    }

    /// Test 2: Static annotations carry the placeholder coordinates
    #[tokio::test]
    async fn test_static_star_values() {
        let png = encode_image(ImageFormat::Png);
        let (_, body) = send(app_with_model(), file_request("sky.png", &png)).await;

        assert_eq!(body["stars"]["fourPoint"][0]["x"], 0.2);
        assert_eq!(body["stars"]["fivePoint"][0]["radius"], 0.07);
        assert_eq!(body["stars"]["sixPoint"][0]["y"], 0.7);
    }

    /// Test 3: JPEG and GIF uploads are accepted
    #[tokio::test]
    async fn test_jpeg_and_gif_accepted() {
        let cases = [
            ("photo.jpg", ImageFormat::Jpeg),
            ("photo.jpeg", ImageFormat::Jpeg),
            ("anim.gif", ImageFormat::Gif),
        ];
        for (filename, format) in cases {
            let data = encode_image(format);
            let (status, body) = send(app_with_model(), file_request(filename, &data)).await;
            assert_eq!(status, StatusCode::OK, "{} failed: {}", filename, body);
        }
    }

    /// Test 4: Extension check is case-insensitive
    #[tokio::test]
    async fn test_uppercase_extension_accepted() {
        let png = encode_image(ImageFormat::Png);
        let (status, _) = send(app_with_model(), file_request("SKY.PNG", &png)).await;
        assert_eq!(status, StatusCode::OK);
    }

    /// Test 5: Identical requests yield identical responses
    #[tokio::test]
    async fn test_repeated_request_is_idempotent() {
        let png = encode_image(ImageFormat::Png);
        let app = app_with_model();

        let (_, first) = send(app.clone(), file_request("sky.png", &png)).await;
        let (_, second) = send(app, file_request("sky.png", &png)).await;
        assert_eq!(first, second);
    }

    /// Test 6: Other form fields do not interfere with the file part
    #[tokio::test]
    async fn test_extra_fields_are_ignored() {
        let png = encode_image(ImageFormat::Png);
        let request = predict_request(&[
            Part {
                name: "comment",
                filename: None,
                data: b"night sky",
            },
            Part {
                name: "file",
                filename: Some("sky.png"),
                data: &png,
            },
        ]);
        let (status, _) = send(app_with_model(), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    // =============================================================================
    // Upload Validation (400)
    // =============================================================================

    /// Test 7: Missing file part
    #[tokio::test]
    async fn test_missing_file_part() {
        let request = predict_request(&[Part {
            name: "image",
            filename: Some("sky.png"),
            data: b"irrelevant",
        }]);
        let (status, body) = send(app_with_model(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, "No file part");
    }

    /// Test 8: A `file` form value without a filename is not a file part
    #[tokio::test]
    async fn test_file_field_without_filename() {
        let request = predict_request(&[Part {
            name: "file",
            filename: None,
            data: b"just text",
        }]);
        let (status, body) = send(app_with_model(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, "No file part");
    }

    /// Test 9: Non-multipart body is treated as missing file
    #[tokio::test]
    async fn test_non_multipart_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"file": "sky.png"}"#))
            .unwrap();
        let (status, body) = send(app_with_model(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, "No file part");
    }

    /// Test 10: Empty filename
    #[tokio::test]
    async fn test_empty_filename() {
        let png = encode_image(ImageFormat::Png);
        let (status, body) = send(app_with_model(), file_request("", &png)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, "No selected file");
    }

    /// Test 11: Disallowed or missing extensions
    #[tokio::test]
    async fn test_disallowed_extensions() {
        let png = encode_image(ImageFormat::Png);
        for filename in ["sky.bmp", "sky", "sky.png.txt", "archive.tar.gz"] {
            let (status, body) = send(app_with_model(), file_request(filename, &png)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} should be rejected", filename);
            assert_error(&body, "File type not allowed");
        }
    }

    /// Test 12: Filename checks run before the model check
    #[tokio::test]
    async fn test_validation_precedes_model_check() {
        let (status, body) = send(app_without_model(), file_request("notes.txt", b"hi")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, "File type not allowed");
    }

    /// Test 13: Oversized uploads are rejected by the body limit
    #[tokio::test]
    async fn test_upload_over_limit() {
        let state = AppState::new(
            ModelManager::with_classifier(Arc::new(ConstantClassifier("5"))),
            Arc::new(StaticStarDetector),
        )
        .with_max_upload_bytes(512);
        let big = vec![0u8; 8 * 1024];

        let (status, body) = send(create_app(state), file_request("big.png", &big)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_error(&body, "File too large");
    }

    // =============================================================================
    // Server Errors (500)
    // =============================================================================

    /// Test 14: No model loaded
    #[tokio::test]
    async fn test_model_not_loaded() {
        let png = encode_image(ImageFormat::Png);
        let (status, body) = send(app_without_model(), file_request("sky.png", &png)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_error(&body, "Model not loaded");
    }

    /// Test 15: Undecodable bytes with an allowed extension
    #[tokio::test]
    async fn test_undecodable_image() {
        let (status, body) =
            send(app_with_model(), file_request("sky.png", b"definitely not a png")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_error(&body, "Could not decode image");
    }

    /// Test 16: Classifier failure does not leak internal detail
    #[tokio::test]
    async fn test_inference_failure_is_sanitized() {
        let png = encode_image(ImageFormat::Png);
        let (status, body) =
            send(app_with(Arc::new(BrokenClassifier)), file_request("sky.png", &png)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_error(&body, "Prediction failed");
        assert!(!body.to_string().contains("/opt/models"));
    }
}
