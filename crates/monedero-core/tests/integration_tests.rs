//! Integration tests for monedero-core
//!
//! These tests exercise the full ledger file → pipeline → validated result workflow
//! with a scripted mock backend.

use std::str::FromStr;

use monedero_core::{
    get_balance, AIClient, Analyst, CategorizationPipeline, DateRange, Error, LedgerStore,
    MockBackend, PromptLibrary,
};
use rust_decimal::Decimal;

fn ledger_file() -> (tempfile::TempDir, LedgerStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("finanzas.json");
    std::fs::write(
        &path,
        r#"{
            "titular": "Ana",
            "movimientos": [
                {"fecha": "2024-01-05", "monto": 1000, "tipo": "ingreso", "descripcion": "Sueldo"},
                {"fecha": "2024-01-10", "monto": 120.5, "tipo": "gasto", "descripcion": "Supermercado"},
                {"fecha": "2024-01-12", "monto": 79.5, "tipo": "gasto", "descripcion": "Colectivo"},
                {"fecha": "2024-02-02", "monto": 35, "tipo": "gasto", "descripcion": "Cine"}
            ]
        }"#,
    )
    .expect("Failed to write ledger");
    (dir, LedgerStore::new(path))
}

fn pipeline(mock: MockBackend) -> CategorizationPipeline {
    CategorizationPipeline::new(AIClient::Mock(mock), PromptLibrary::embedded_only())
}

const JANUARY_REPLY: &str = r#"{
    "ingresos": {"Sueldo": 1000, "Monto inicial": 0, "Regalos": 0, "Prestamos recibidos": 0, "Otros": 0},
    "gastos": {"Comida": 120.5, "Transporte": 79.5, "Telefonía": 0, "Entretenimiento": 0, "Gimnasio": 0, "Hogar": 0, "Otros": 0},
    "totales": {"total_ingresos": 1000, "total_gastos": 200, "balance": 800}
}"#;

// =============================================================================
// Balance
// =============================================================================

#[test]
fn test_balance_from_ledger_file() {
    let (_dir, store) = ledger_file();
    let summary = get_balance(&store).unwrap();

    assert_eq!(summary.income, Decimal::new(1000, 0));
    assert_eq!(summary.expenses, Decimal::new(235, 0));
    assert_eq!(summary.balance, Decimal::new(765, 0));
}

#[test]
fn test_balance_wire_shape() {
    let (_dir, store) = ledger_file();
    let json = serde_json::to_value(get_balance(&store).unwrap()).unwrap();

    assert_eq!(json["ingresos"].as_f64(), Some(1000.0));
    assert_eq!(json["gastos"].as_f64(), Some(235.0));
    assert_eq!(json["balance"].as_f64(), Some(765.0));
}

#[test]
fn test_balance_missing_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let err = get_balance(&LedgerStore::new(dir.path().join("nada.json"))).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

// =============================================================================
// Categorization
// =============================================================================

#[tokio::test]
async fn test_categorize_direct_json_reply() {
    let (_dir, store) = ledger_file();
    let ledger = store.load().unwrap();
    let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-31"))
        .unwrap()
        .unwrap();
    let mock = MockBackend::replying(JANUARY_REPLY);

    let totals = pipeline(mock.clone())
        .categorize(&ledger, Some(&range), None)
        .await
        .unwrap();

    assert_eq!(totals.income["Sueldo"], Decimal::new(1000, 0));
    assert_eq!(totals.expenses["Comida"], Decimal::from_str("120.5").unwrap());
    assert_eq!(totals.totals.balance, Decimal::new(800, 0));
    assert_eq!(
        totals.totals.balance,
        totals.totals.total_income - totals.totals.total_expenses
    );

    let sent = mock.last_request().unwrap();
    assert!(sent.prompt.contains("Colectivo"));
    assert!(!sent.prompt.contains("Cine"));
    assert!(sent.prompt.contains("\"titular\": \"Ana\""));
}

#[tokio::test]
async fn test_categorize_recovers_json_wrapped_in_prose() {
    let (_dir, store) = ledger_file();
    let ledger = store.load().unwrap();
    let reply = format!("Here is the result:\n{}\nHope this helps!", JANUARY_REPLY);

    let totals = pipeline(MockBackend::replying(reply))
        .categorize(&ledger, None, Some("Agrupa transporte público en Transporte"))
        .await
        .unwrap();

    assert_eq!(totals.expenses["Transporte"], Decimal::from_str("79.5").unwrap());
}

#[tokio::test]
async fn test_categorize_result_has_every_bucket() {
    let (_dir, store) = ledger_file();
    let ledger = store.load().unwrap();
    let reply = r#"{"ingresos": {"Sueldo": 1000}, "gastos": {"Comida": 200},
        "totales": {"total_ingresos": 1000, "total_gastos": 200, "balance": 800}}"#;

    let totals = pipeline(MockBackend::replying(reply))
        .categorize(&ledger, None, None)
        .await
        .unwrap();

    let json = serde_json::to_value(&totals).unwrap();
    assert_eq!(json["ingresos"].as_object().unwrap().len(), 5);
    assert_eq!(json["gastos"].as_object().unwrap().len(), 7);
    assert_eq!(json["gastos"]["Hogar"].as_f64(), Some(0.0));
    assert_eq!(json["totales"]["balance"].as_f64(), Some(800.0));
}

#[tokio::test]
async fn test_categorize_reply_without_json() {
    let (_dir, store) = ledger_file();
    let ledger = store.load().unwrap();

    let err = pipeline(MockBackend::replying("Lo siento, no puedo."))
        .categorize(&ledger, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn test_categorize_truncated_reply() {
    let (_dir, store) = ledger_file();
    let ledger = store.load().unwrap();
    let truncated = r#"{"ingresos": {"Sueldo": 1000}, "gastos": {"Comida": 12"#;

    let err = pipeline(MockBackend::replying(truncated))
        .categorize(&ledger, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn test_categorize_reply_missing_totals() {
    let (_dir, store) = ledger_file();
    let ledger = store.load().unwrap();

    let err = pipeline(MockBackend::replying(
        r#"{"ingresos": {"Sueldo": 1000}, "gastos": {}}"#,
    ))
    .categorize(&ledger, None, None)
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_categorize_bad_movement_date_with_range() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("finanzas.json");
    std::fs::write(
        &path,
        r#"{"movimientos": [{"fecha": "10/01/2024", "monto": 5, "tipo": "gasto"}]}"#,
    )
    .unwrap();
    let ledger = LedgerStore::new(&path).load().unwrap();
    let range = DateRange::parse(Some("2024-01-01"), None).unwrap().unwrap();
    let mock = MockBackend::new();

    let err = pipeline(mock.clone())
        .categorize(&ledger, Some(&range), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(mock.last_request().is_none());
}

// =============================================================================
// Free-text analysis
// =============================================================================

#[tokio::test]
async fn test_analyze_whole_ledger() {
    let (_dir, store) = ledger_file();
    let ledger = store.load().unwrap();
    let mock = MockBackend::replying("Tu mayor gasto fue el supermercado.");
    let analyst = Analyst::new(AIClient::Mock(mock.clone()), PromptLibrary::embedded_only());

    let answer = analyst
        .analyze(&ledger, "¿Cuál fue mi mayor gasto?")
        .await
        .unwrap();
    assert_eq!(answer, "Tu mayor gasto fue el supermercado.");

    let sent = mock.last_request().unwrap();
    assert!(sent.prompt.contains("Cine"));
    assert!(sent.prompt.contains("Supermercado"));
}
