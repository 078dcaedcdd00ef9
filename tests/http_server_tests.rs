use anyhow::Result;
use axum::response::Response;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use penguin_charts::http::app_server::{
    AppServer, PATH_DATA, PATH_HEALTH, PATH_HISTOGRAM, PATH_SCATTER_PLOT, PATH_UPLOAD,
};
use penguin_charts::PenguinEngine;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

const BUNDLED_DATASET: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/penguins_original.csv");
const BUNDLED_ROWS: usize = 28;

const THREE_PENGUINS: &str = "species,bill_length_mm,bill_depth_mm,flipper_length_mm\n\
    Adelie,39.1,18.7,181\n\
    Gentoo,50.0,15.3,230\n\
    Chinstrap,45.5,17.0,195\n";

const BOUNDARY: &str = "penguin-test-boundary";

/// Create test router whose working file lives in a temp dir, seeded from the bundled dataset
async fn setup_test() -> Result<(Router, TempDir)> {
    let temp_dir = tempfile::tempdir()?;

    let engine = PenguinEngine::builder()
        .working_file(temp_dir.path().join("penguins.csv"))
        .default_file(BUNDLED_DATASET)
        .build()
        .await?;

    let app = AppServer::new(engine);

    Ok((app.router, temp_dir))
}

fn multipart_body(field: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"penguins.csv\"\r\nContent-Type: text/csv\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: &Router, field: &str, content: &[u8]) -> Result<Response> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(PATH_UPLOAD)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(field, content)))?,
        )
        .await?;
    Ok(response)
}

async fn get(app: &Router, uri: &str) -> Result<Response> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    Ok(response)
}

async fn body_json(response: Response) -> Result<Value> {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&body)?)
}

async fn body_text(response: Response) -> Result<String> {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(body.to_vec())?)
}

/// Chart endpoints return the figure JSON wrapped in a JSON string.
async fn figure_json(response: Response) -> Result<Value> {
    let encoded = body_json(response).await?;
    let figure = encoded
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("expected a JSON string, got {}", encoded))?;
    Ok(serde_json::from_str(figure)?)
}

fn point_count(figure: &Value) -> usize {
    figure["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|trace| trace["x"].as_array().unwrap().len())
        .sum()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_data_serves_bundled_dataset_on_first_start() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = get(&app, PATH_DATA).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await?;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), BUNDLED_ROWS);

    let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
    assert_eq!(
        keys,
        vec![
            "species",
            "island",
            "bill_length_mm",
            "bill_depth_mm",
            "flipper_length_mm",
            "body_mass_g",
            "sex",
            "year"
        ]
    );

    // The NA row keeps every key, with nulls
    assert_eq!(rows[3]["bill_length_mm"], Value::Null);
    assert_eq!(rows[3]["year"], json!(2007));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_then_data_returns_uploaded_rows() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = upload(&app, "file", THREE_PENGUINS.as_bytes()).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await?,
        json!({"message": "File uploaded successfully"})
    );

    let json = body_json(get(&app, PATH_DATA).await?).await?;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0]["species"], "Adelie");
    assert_eq!(rows[0]["bill_length_mm"].as_f64(), Some(39.1));
    assert_eq!(rows[0]["bill_depth_mm"].as_f64(), Some(18.7));
    assert_eq!(rows[0]["flipper_length_mm"], json!(181));

    assert_eq!(rows[1]["species"], "Gentoo");
    assert_eq!(rows[1]["bill_length_mm"].as_f64(), Some(50.0));
    assert_eq!(rows[1]["bill_depth_mm"].as_f64(), Some(15.3));
    assert_eq!(rows[1]["flipper_length_mm"], json!(230));

    assert_eq!(rows[2]["species"], "Chinstrap");
    assert_eq!(rows[2]["bill_length_mm"].as_f64(), Some(45.5));
    assert_eq!(rows[2]["bill_depth_mm"].as_f64(), Some(17.0));
    assert_eq!(rows[2]["flipper_length_mm"], json!(195));

    for row in rows {
        let keys: Vec<&String> = row.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec![
                "species",
                "bill_length_mm",
                "bill_depth_mm",
                "flipper_length_mm"
            ]
        );
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_short_rows_are_padded_with_nulls() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = upload(
        &app,
        "file",
        b"species,bill_length_mm,flipper_length_mm\nAdelie,39.1\nGentoo,50.0,230\nChinstrap\n",
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(&app, PATH_DATA).await?).await?;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0]["bill_length_mm"].as_f64(), Some(39.1));
    assert_eq!(rows[0]["flipper_length_mm"], Value::Null);
    assert_eq!(rows[1]["flipper_length_mm"], json!(230));
    assert_eq!(rows[2]["species"], "Chinstrap");
    assert_eq!(rows[2]["bill_length_mm"], Value::Null);
    assert_eq!(rows[2]["flipper_length_mm"], Value::Null);

    // Padded rows have no flipper length, so only Gentoo passes the filter
    let response = get(
        &app,
        &format!("{PATH_HISTOGRAM}?column=bill_length_mm&color=species&flipper_length_min=0"),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let figure = figure_json(response).await?;
    assert_eq!(point_count(&figure), 1);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_histogram_filters_on_flipper_length() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;
    upload(&app, "file", THREE_PENGUINS.as_bytes()).await?;

    let response = get(
        &app,
        &format!("{PATH_HISTOGRAM}?column=bill_length_mm&color=species&flipper_length_min=190"),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let figure = figure_json(response).await?;
    assert_eq!(point_count(&figure), 2);

    let names: Vec<&str> = figure["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Gentoo", "Chinstrap"]);

    assert_eq!(figure["data"][0]["type"], "histogram");
    assert_eq!(
        figure["layout"]["title"]["text"],
        "Penguin Bill Length vs Bill Depth"
    );
    assert_eq!(figure["layout"]["xaxis"]["title"]["text"], "Bill Length (mm)");

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_histogram_default_filter_drops_missing_flipper_lengths() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = get(&app, &format!("{PATH_HISTOGRAM}?column=body_mass_g&color=sex")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let figure = figure_json(response).await?;
    assert_eq!(point_count(&figure), BUNDLED_ROWS - 1);
    // Unmapped column keeps its raw name even under the fixed title
    assert_eq!(figure["layout"]["xaxis"]["title"]["text"], "body_mass_g");

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scatter_points_respect_minimum() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = get(
        &app,
        &format!(
            "{PATH_SCATTER_PLOT}?x=flipper_length_mm&y=bill_depth_mm&color=species&flipper_length_min=200"
        ),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let figure = figure_json(response).await?;
    assert_eq!(figure["data"][0]["type"], "scatter");
    assert_eq!(figure["data"][0]["mode"], "markers");
    assert_eq!(figure["layout"]["yaxis"]["title"]["text"], "Bill Depth (mm)");

    let flipper_lengths: Vec<f64> = figure["data"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|t| t["x"].as_array().unwrap().clone())
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(flipper_lengths.len(), 8);
    assert!(flipper_lengths.iter().all(|&v| v >= 200.0));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scatter_unknown_column_is_server_error() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = get(
        &app,
        &format!("{PATH_SCATTER_PLOT}?x=beak_width&y=bill_depth_mm&color=species"),
    )
    .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await?,
        json!({"detail": "Internal Server Error"})
    );

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scatter_missing_query_param_is_rejected() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = get(&app, &format!("{PATH_SCATTER_PLOT}?x=bill_length_mm&color=species")).await?;
    assert!(response.status().is_client_error());

    let response = get(
        &app,
        &format!(
            "{PATH_SCATTER_PLOT}?x=bill_length_mm&y=bill_depth_mm&color=species&flipper_length_min=abc"
        ),
    )
    .await?;
    assert!(response.status().is_client_error());

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_invalid_utf8_keeps_previous_dataset() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;
    upload(&app, "file", THREE_PENGUINS.as_bytes()).await?;

    let response = upload(&app, "file", &[0xff, 0xfe, b'a', b',', b'b', b'\n']).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await?;
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .starts_with("An error occurred: "));

    let rows = body_json(get(&app, PATH_DATA).await?).await?;
    assert_eq!(rows.as_array().unwrap().len(), 3);
    assert_eq!(rows[0]["species"], "Adelie");

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_malformed_csv_is_bad_request() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = upload(&app, "file", b"a,b\n1,2\n3,4,5\n").await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = upload(&app, "file", b"").await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let rows = body_json(get(&app, PATH_DATA).await?).await?;
    assert_eq!(rows.as_array().unwrap().len(), BUNDLED_ROWS);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_without_file_field_is_bad_request() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = upload(&app, "attachment", THREE_PENGUINS.as_bytes()).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await?;
    assert_eq!(
        json["detail"],
        "An error occurred: missing multipart field 'file'"
    );

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_non_multipart_is_bad_request() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(PATH_UPLOAD)
                .header(header::CONTENT_TYPE, "text/csv")
                .body(Body::from(THREE_PENGUINS))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await?;
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .starts_with("An error occurred: "));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_new_layout_then_chart_without_filter_column_fails() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = upload(&app, "file", b"island,year\nDream,2008\nBiscoe,2009\n").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = body_json(get(&app, PATH_DATA).await?).await?;
    assert_eq!(rows, json!([
        {"island": "Dream", "year": 2008},
        {"island": "Biscoe", "year": 2009}
    ]));

    let response = get(&app, &format!("{PATH_HISTOGRAM}?column=year&color=island")).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_render_plot_is_histogram() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = get(&app, "/render/plot").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()?
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let html = body_text(response).await?;
    assert!(html.contains("Histogram of Bill Length by Species"));
    assert!(html.contains(r#""type":"histogram""#));
    assert!(!html.contains(r#""type":"scatter""#));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_render_anything_else_is_scatter() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    for uri in ["/render/scatter", "/render/123", "/render/plots", "/render/"] {
        let response = get(&app, uri).await?;
        assert_eq!(response.status(), StatusCode::OK, "uri {uri}");

        let html = body_text(response).await?;
        assert!(html.contains("Penguin Bill Length vs Bill Depth"), "uri {uri}");
        assert!(html.contains(r#""type":"scatter""#), "uri {uri}");
        assert!(!html.contains(r#""type":"histogram""#), "uri {uri}");
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cors_allows_any_origin() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(PATH_HEALTH)
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://example.com"
    );

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health_endpoint() -> Result<()> {
    let (app, _tempdir) = setup_test().await?;

    let response = get(&app, PATH_HEALTH).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await?,
        json!({"status": "ok", "service": "penguin-charts"})
    );

    Ok(())
}
