use serde_json::json;

use std::sync::Arc;

use crate::common::{FailingShipmentStore, TestApp, routes};

fn valid_body() -> serde_json::Value {
    json!({
        "recipient": "Jane Doe",
        "address": "1 Main St, Springfield",
        "weight": 2.5,
        "service": "Express",
    })
}

mod create {
    use super::*;

    #[tokio::test]
    async fn returns_record_without_label_reference() {
        let app = TestApp::spawn().await;

        let res = app.post_json(routes::SHIPMENTS, &valid_body()).await;

        assert_eq!(res.status, 200, "{}", res.text());
        assert!(res.body["id"].is_string());
        assert_eq!(res.body["recipient"], "Jane Doe");
        assert_eq!(res.body["address"], "1 Main St, Springfield");
        assert_eq!(res.body["weight"], 2.5);
        assert_eq!(res.body["service"], "Express");
        assert!(res.body.get("labelReference").is_none());
    }

    #[tokio::test]
    async fn missing_field_is_rejected_and_nothing_is_stored() {
        let app = TestApp::spawn().await;

        for field in ["recipient", "address", "weight", "service"] {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(field);

            let res = app.post_json(routes::SHIPMENTS, &body).await;
            assert_eq!(res.status, 400, "missing {field}: {}", res.text());
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
            assert!(
                res.body["error"].as_str().unwrap().contains("required"),
                "{}",
                res.text()
            );
        }

        let list = app.get(routes::SHIPMENTS).await;
        assert_eq!(list.body, json!([]));
    }

    #[tokio::test]
    async fn blank_text_and_zero_weight_count_as_missing() {
        let app = TestApp::spawn().await;

        let mut blank = valid_body();
        blank["recipient"] = json!("   ");
        let res = app.post_json(routes::SHIPMENTS, &blank).await;
        assert_eq!(res.status, 400);

        let mut zero = valid_body();
        zero["weight"] = json!(0);
        let res = app.post_json(routes::SHIPMENTS, &zero).await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.post_raw(routes::SHIPMENTS, "{\"recipient\": ").await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app
            .post_raw(routes::SHIPMENTS, "{\"weight\": \"heavy\"}")
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn label_reference_appears_after_generation() {
        let app = TestApp::spawn().await;
        let id = app.create_shipment("Jane Doe").await;

        let reference = app.wait_for_label(&id).await;

        assert_eq!(
            reference,
            format!("http://{}/labels/label-{id}.pdf", app.addr)
        );
        assert!(
            app.labels_dir
                .path()
                .join(format!("label-{id}.pdf"))
                .exists()
        );
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::SHIPMENTS).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn lists_newest_first_up_to_limit() {
        let app = TestApp::spawn().await;
        let mut ids = Vec::new();
        for i in 0..7 {
            ids.push(app.create_shipment(&format!("Recipient {i}")).await);
        }

        let res = app.get(routes::SHIPMENTS).await;
        assert_eq!(res.status, 200);

        let listed: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap())
            .collect();
        let expected: Vec<&str> = ids.iter().rev().take(5).map(String::as_str).collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn zero_limit_lists_everything() {
        let app = TestApp::spawn_with(|config| config.shipments.list_limit = 0).await;
        for i in 0..7 {
            app.create_shipment(&format!("Recipient {i}")).await;
        }

        let res = app.get(routes::SHIPMENTS).await;
        assert_eq!(res.body.as_array().unwrap().len(), 7);
    }
}

mod merge_recent {
    use super::*;

    #[tokio::test]
    async fn without_labels_is_an_error() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::MERGE_RECENT).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "NO_DOCUMENTS");
        assert_eq!(res.body["error"], "No label PDFs to merge");
    }

    #[tokio::test]
    async fn merges_five_most_recent_labels() {
        let app = TestApp::spawn().await;
        for i in 0..7 {
            let id = app.create_shipment(&format!("Recipient {i}")).await;
            app.wait_for_label(&id).await;
        }

        let res = app.get(routes::MERGE_RECENT).await;

        assert_eq!(res.status, 200, "{}", res.text());
        assert_eq!(res.content_type.as_deref(), Some("application/pdf"));
        let disposition = res.content_disposition.unwrap();
        assert!(disposition.starts_with("attachment"), "{disposition}");
        assert!(disposition.contains("merged_labels.pdf"), "{disposition}");
        assert!(res.bytes.starts_with(b"%PDF"));
        assert_eq!(::common::document::page_count(&res.bytes).unwrap(), 5);

        // The merged artifact is also served from the label directory.
        let stored = app.get(&routes::label("merged_labels.pdf")).await;
        assert_eq!(stored.status, 200);
        assert_eq!(stored.bytes, res.bytes);
    }

    #[tokio::test]
    async fn filename_selection_merges_existing_labels() {
        let app = TestApp::spawn_with(|config| {
            config.labels.merge_selection =
                shiptrack_server::config::MergeSelection::Filename;
        })
        .await;
        for i in 0..3 {
            let id = app.create_shipment(&format!("Recipient {i}")).await;
            app.wait_for_label(&id).await;
        }

        let res = app.get(routes::MERGE_RECENT).await;

        assert_eq!(res.status, 200, "{}", res.text());
        assert_eq!(::common::document::page_count(&res.bytes).unwrap(), 3);
    }
}

mod server_errors {
    use super::*;

    async fn spawn_failing() -> TestApp {
        TestApp::spawn_with_store(Arc::new(FailingShipmentStore), |_| {}).await
    }

    #[tokio::test]
    async fn create_reports_persistence_failure() {
        let app = spawn_failing().await;

        let res = app.post_json(routes::SHIPMENTS, &valid_body()).await;

        assert_eq!(res.status, 500);
        assert_eq!(
            res.body,
            json!({"code": "INTERNAL_ERROR", "error": "Server error"})
        );
    }

    #[tokio::test]
    async fn create_still_validates_before_persisting() {
        let app = spawn_failing().await;

        let res = app.post_json(routes::SHIPMENTS, &json!({"recipient": "Jane"})).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn list_reports_persistence_failure() {
        let app = spawn_failing().await;

        let res = app.get(routes::SHIPMENTS).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["error"], "Server error");
    }

    #[tokio::test]
    async fn record_merge_reports_persistence_failure() {
        let app = spawn_failing().await;

        let res = app.get(routes::MERGE_RECENT).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["error"], "Server error");
        assert!(res.content_type.as_deref() != Some("application/pdf"));
    }

    #[tokio::test]
    async fn corrupt_label_aborts_merge_without_document() {
        let app = TestApp::spawn_with(|config| {
            config.labels.merge_selection =
                shiptrack_server::config::MergeSelection::Filename;
        })
        .await;
        let id = app.create_shipment("Jane Doe").await;
        app.wait_for_label(&id).await;
        std::fs::write(app.labels_dir.path().join("label-x.pdf"), b"not a pdf").unwrap();

        let res = app.get(routes::MERGE_RECENT).await;

        assert_eq!(res.status, 500);
        assert_eq!(
            res.body,
            json!({"code": "INTERNAL_ERROR", "error": "Server error"})
        );
        assert!(!app.labels_dir.path().join("merged_labels.pdf").exists());
        let merged = app.get(&routes::label("merged_labels.pdf")).await;
        assert_eq!(merged.status, 404);
    }
}

#[tokio::test]
async fn health_reports_server_working() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["message"], "Server is working!");
}
