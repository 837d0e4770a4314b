//! End-to-end tests for the scoring engine and the JSON service

use crate::server::{serve, ErrorResponse, HealthResponse};
use crate::*;

fn demo_engine() -> SharedScoringEngine {
    ScoringEngine::builtin(Box::new(InMemoryCatalog::demo().unwrap()), WeightPolicy::Strict).unwrap()
}

#[tokio::test]
async fn test_full_report_for_qn90c() {
    let engine = demo_engine();
    let report = engine.report("samsung-qn90c-65").await.unwrap().unwrap();

    let hmum = report.hmum.as_ref().unwrap();
    assert!((0.0..=10.0).contains(&hmum.score));
    assert!(!hmum.vetoed);
    assert_eq!(hmum.breakdown.len(), 10);
    assert!(hmum.best_context.is_some());

    let unified = report.unified.as_ref().unwrap();
    assert_eq!(unified.metacategories.len(), 4);
    assert!(unified.overall_score <= 10.0);

    let sic = report.sic.as_ref().unwrap();
    assert_eq!(sic.limiting_component.id, "tv-backlight-miniled");
    assert!((sic.estimated_lifespan_years - 11.02).abs() < 0.5);

    let tco = report.tco.unwrap();
    assert_eq!(tco.lifespan_years, sic.estimated_lifespan_years);
    assert!(tco.total_tco > tco.acquisition_cost);
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn test_random_navigation_robot_is_vetoed() {
    let engine = demo_engine();
    let product = engine.product("wap-robot-w100").await.unwrap().unwrap();
    let hmum = engine.score_product(&product).unwrap();

    assert!(hmum.vetoed);
    assert_eq!(hmum.vetoed_by.as_deref(), Some("c2"));
    assert!(hmum.score <= 0.1);
    let c2 = hmum.breakdown.iter().find(|c| c.criterion_id == "c2").unwrap();
    assert!(c2.has_flag(CriterionFlag::Veto));

    let ranking = engine.rank_category("robot_vacuum").await.unwrap().unwrap();
    let last = ranking.entries.last().unwrap();
    assert_eq!(last.product_id, "wap-robot-w100");
    assert!(last.vetoed);
}

#[tokio::test]
async fn test_missing_editorial_score_is_imputed_neutral() {
    let engine = demo_engine();
    let tcl = engine.product("tcl-qled-c645-55").await.unwrap().unwrap();
    assert!(!tcl.scores.contains_key("c7"));

    let imputed = engine.score_product(&tcl).unwrap();
    let explicit = engine.score_product(&tcl.clone().with_score("c7", 5.0)).unwrap();

    assert_eq!(imputed.raw_score, explicit.raw_score);
    let c7 = imputed.breakdown.iter().find(|c| c.criterion_id == "c7").unwrap();
    assert!(c7.has_flag(CriterionFlag::Imputed));
    assert!(!explicit.breakdown.iter().any(|c| c.has_flag(CriterionFlag::Imputed) && c.criterion_id == "c7"));
}

#[tokio::test]
async fn test_hidden_truths_surface_as_warnings() {
    let engine = demo_engine();
    let tcl = engine.product("tcl-qled-c645-55").await.unwrap().unwrap();
    let unified = engine.unified_product(&tcl).unwrap();

    assert!(unified.warnings.iter().any(|w| w.contains("PWM")));
    assert!(unified.warnings.iter().any(|w| w.contains("local dimming")));

    let qn90c = engine.product("samsung-qn90c-65").await.unwrap().unwrap();
    assert!(engine.unified_product(&qn90c).unwrap().warnings.is_empty());
}

#[tokio::test]
async fn test_category_ranking_is_ordered() {
    let engine = demo_engine();
    let ranking = engine.rank_category("tv").await.unwrap().unwrap();

    assert_eq!(ranking.label, "Smart TVs");
    assert_eq!(ranking.entries.len(), 3);
    for (idx, entry) in ranking.entries.iter().enumerate() {
        assert_eq!(entry.rank, idx + 1);
        assert!(entry.score.is_some());
        assert!(entry.total_tco.is_some());
    }
    for pair in ranking.entries.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    assert!(engine.rank_category("toaster").await.unwrap().is_none());
}

#[tokio::test]
async fn test_compare_reports_missing_ids() {
    let engine = demo_engine();
    let ids = vec!["lg-oled-c3-55".to_string(), "nope".to_string(), "consul-crm39".to_string()];
    let comparison = engine.compare(&ids).await.unwrap();

    let found: Vec<&str> = comparison.reports.iter().map(|r| r.product_id.as_str()).collect();
    assert_eq!(found, ["lg-oled-c3-55", "consul-crm39"]);
    assert_eq!(comparison.missing, ["nope"]);
}

#[tokio::test]
async fn test_ai_summary_keys() {
    let engine = demo_engine();
    let summary = engine.ai_summary("roborock-s8").await.unwrap().unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert!(json["hmum_score"].is_number());
    assert!(json["nota_auditoria"].is_number());
    assert!(engine.ai_summary("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_null_score_in_catalog_counts_as_missing() {
    let json = r#"[
        {"id": "tv-null", "categoryId": "tv", "brand": "X", "price": 2000,
         "specs": {"panel_type": "QLED"}, "scores": {"c1": 7, "c3": null, "c7": null}},
        {"id": "tv-absent", "categoryId": "tv", "brand": "X", "price": 2000,
         "specs": {"panel_type": "QLED"}, "scores": {"c1": 7}}
    ]"#;
    let catalog = InMemoryCatalog::from_json(json).unwrap();
    let engine = ScoringEngine::builtin(Box::new(catalog), WeightPolicy::Strict).unwrap();

    let nulled = engine.product("tv-null").await.unwrap().unwrap();
    let absent = engine.product("tv-absent").await.unwrap().unwrap();
    let with_null = engine.score_product(&nulled).unwrap();
    let without = engine.score_product(&absent).unwrap();

    assert_eq!(with_null.raw_score, without.raw_score);
    let c7 = with_null.breakdown.iter().find(|c| c.criterion_id == "c7").unwrap();
    assert!(c7.has_flag(CriterionFlag::Imputed));
}

#[tokio::test]
async fn test_unsupported_category_degrades() {
    let catalog = InMemoryCatalog::new(vec![ProductRecord::new("acme-t1", "toaster", "Acme", 99.0)]);
    let engine = ScoringEngine::builtin(Box::new(catalog), WeightPolicy::Strict).unwrap();
    let report = engine.report("acme-t1").await.unwrap().unwrap();

    assert!(report.hmum.is_none());
    assert!(report.sic.is_none());
    assert!(report.tco.is_none());
    assert!(report.warnings.iter().any(|w| w.contains("toaster")));
}

#[tokio::test]
async fn test_http_service() {
    let engine = demo_engine();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(serve(engine, listener));

    let client = reqwest::Client::new();

    let health: HealthResponse = client.get(format!("{}/health", base)).send().await.unwrap().json().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.categories.len(), 5);

    let sic: serde_json::Value = client
        .get(format!("{}/api/products/samsung-qn90c-65/sic", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(sic["limitingComponent"]["id"], "tv-backlight-miniled");
    assert!(sic["estimatedLifespanYears"].is_number());

    let score: serde_json::Value = client
        .get(format!("{}/api/products/wap-robot-w100/score", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(score["vetoed"], true);
    assert!(score["breakdown"][0]["criterionId"].is_string());

    let missing = client.get(format!("{}/api/products/nope/score", base)).send().await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    let body: ErrorResponse = missing.json().await.unwrap();
    assert_eq!(body.error, "Product not found");

    let tco: serde_json::Value = client
        .post(format!("{}/api/tco", base))
        .json(&serde_json::json!({ "price": 1000, "energyKwhMonth": 0, "maintenanceRate": 0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tco["totalTco"], 1000);

    let invalid = client
        .post(format!("{}/api/tco", base))
        .json(&serde_json::json!({ "price": -5, "energyKwhMonth": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), reqwest::StatusCode::BAD_REQUEST);

    let ranking = client.get(format!("{}/api/categories/toaster/ranking", base)).send().await.unwrap();
    assert_eq!(ranking.status(), reqwest::StatusCode::NOT_FOUND);
}
