mod investment_params;
mod loan_params;
mod params;

use axum::{
    Router,
    extract::{
        Json,
        Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    InvestmentInputs, InvestmentResult, LoanInputs, LoanResult, calculate_investment,
    calculate_loan, investment_issues, loan_issues, normalize_investment, normalize_loan,
};

pub use investment_params::{has_investment_params, investment_from_params, params_from_investment};
pub use loan_params::{has_loan_params, loan_from_params, params_from_loan};
pub use params::QueryParams;

/// A calculation plus the canonical share-link query for its normalized input.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse<T> {
    pub result: T,
    pub query: String,
}

#[derive(Debug, Serialize)]
struct IssuesResponse {
    issues: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Validates, then calculates. Issues are returned instead of a result when
/// the input is not worth presenting.
pub fn evaluate_investment(
    inputs: &InvestmentInputs,
) -> Result<CalculationResponse<InvestmentResult>, Vec<String>> {
    let issues = investment_issues(inputs);
    if !issues.is_empty() {
        return Err(issues);
    }

    let result = calculate_investment(&normalize_investment(inputs));
    let query = params_from_investment(&result.inputs).to_query_string();
    Ok(CalculationResponse { result, query })
}

pub fn evaluate_loan(inputs: &LoanInputs) -> Result<CalculationResponse<LoanResult>, Vec<String>> {
    let issues = loan_issues(inputs);
    if !issues.is_empty() {
        return Err(issues);
    }

    let result = calculate_loan(&normalize_loan(inputs));
    let query = params_from_loan(&result.inputs).to_query_string();
    Ok(CalculationResponse { result, query })
}

pub fn router() -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route(
            "/api/investment",
            get(investment_get_handler).post(investment_post_handler),
        )
        .route("/api/loan", get(loan_get_handler).post(loan_post_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> crate::error::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("finsched HTTP API listening on http://{addr}");
    log::info!("Local access: http://127.0.0.1:{port}/api/investment?mode=sip");

    axum::serve(listener, router()).await?;
    Ok(())
}

type RawQuery = Result<Query<Vec<(String, String)>>, QueryRejection>;

fn query_params(query: RawQuery) -> Result<QueryParams, Response> {
    match query {
        Ok(Query(pairs)) => Ok(QueryParams::from(pairs)),
        Err(rejection) => Err(error_response(rejection.status(), &rejection.body_text())),
    }
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn investment_get_handler(query: RawQuery) -> Response {
    let params = match query_params(query) {
        Ok(params) => params,
        Err(response) => return response,
    };
    let inputs = investment_from_params(&params);
    log::debug!("investment request decoded as {inputs:?}");
    investment_response(&inputs)
}

async fn investment_post_handler(
    payload: Result<Json<InvestmentInputs>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(inputs)) => investment_response(&inputs),
        Err(rejection) => rejection_response(rejection),
    }
}

async fn loan_get_handler(query: RawQuery) -> Response {
    let params = match query_params(query) {
        Ok(params) => params,
        Err(response) => return response,
    };
    let inputs = loan_from_params(&params);
    log::debug!("loan request decoded as {inputs:?}");
    loan_response(&inputs)
}

async fn loan_post_handler(payload: Result<Json<LoanInputs>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(inputs)) => loan_response(&inputs),
        Err(rejection) => rejection_response(rejection),
    }
}

fn investment_response(inputs: &InvestmentInputs) -> Response {
    match evaluate_investment(inputs) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(issues) => issues_response(issues),
    }
}

fn loan_response(inputs: &LoanInputs) -> Response {
    match evaluate_loan(inputs) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(issues) => issues_response(issues),
    }
}

fn rejection_response(rejection: JsonRejection) -> Response {
    log::debug!("rejecting request body: {rejection}");
    error_response(rejection.status(), &rejection.body_text())
}

fn issues_response(issues: Vec<String>) -> Response {
    log::debug!("rejecting request with {} issue(s)", issues.len());
    json_response(StatusCode::UNPROCESSABLE_ENTITY, IssuesResponse { issues })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoanTerms, SipPlan};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn investment(query: &str) -> CalculationResponse<InvestmentResult> {
        let params = QueryParams::parse(query).expect("valid query");
        evaluate_investment(&investment_from_params(&params)).expect("valid inputs")
    }

    fn loan(query: &str) -> CalculationResponse<LoanResult> {
        let params = QueryParams::parse(query).expect("valid query");
        evaluate_loan(&loan_from_params(&params)).expect("valid inputs")
    }

    fn to_json<T: Serialize>(body: &T) -> serde_json::Value {
        serde_json::to_value(body).expect("response should serialize")
    }

    /// Serves the router on an ephemeral port and returns the raw HTTP response.
    async fn round_trip(request: String) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router()).await;
        });

        let mut stream = tokio::net::TcpStream::connect(addr)
            .await
            .expect("connect to test server");
        stream
            .write_all(request.as_bytes())
            .await
            .expect("write request");
        let mut raw = String::new();
        stream
            .read_to_string(&mut raw)
            .await
            .expect("read response");
        raw
    }

    async fn post_json(path: &str, body: &str) -> String {
        let head = format!(
            "POST {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
             Content-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            body.len()
        );
        round_trip(head + body).await
    }

    fn status_line(raw: &str) -> &str {
        raw.lines().next().unwrap_or_default()
    }

    fn has_header(raw: &str, name: &str, value: &str) -> bool {
        let head = raw.split("\r\n\r\n").next().unwrap_or_default();
        head.lines().any(|line| match line.split_once(':') {
            Some((k, v)) => k.trim().eq_ignore_ascii_case(name) && v.trim().starts_with(value),
            None => false,
        })
    }

    fn assert_json_error(raw: &str, status: &str) {
        assert!(status_line(raw).contains(status), "{raw}");
        assert!(has_header(raw, "content-type", "application/json"), "{raw}");
        assert!(has_header(raw, "cache-control", "no-store"), "{raw}");
        assert!(raw.contains(r#"{"error":"#), "{raw}");
    }

    #[tokio::test]
    async fn malformed_json_body_gets_json_error_and_no_store() {
        let raw = post_json("/api/investment", "not json").await;
        assert_json_error(&raw, " 400 ");
    }

    #[tokio::test]
    async fn wrongly_typed_loan_body_gets_json_error_and_no_store() {
        let body = r#"{"mode":"emi","principal":"lots","annualInterestRate":9,"years":10}"#;
        let raw = post_json("/api/loan", body).await;
        assert_json_error(&raw, " 422 ");
    }

    #[tokio::test]
    async fn fractional_years_in_json_body_are_rounded() {
        let body = r#"{"mode":"sip","monthlyInvestment":5000,"annualReturnRate":12,"years":10.5}"#;
        let raw = post_json("/api/investment", body).await;
        assert!(status_line(&raw).contains(" 200 "), "{raw}");
        assert!(has_header(&raw, "cache-control", "no-store"), "{raw}");
        assert!(raw.contains("mode=sip&rate=12&years=11&amt=5000"), "{raw}");
    }

    #[tokio::test]
    async fn unknown_path_gets_json_not_found() {
        let request = "GET /nope HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
        let raw = round_trip(request.to_string()).await;
        assert_json_error(&raw, " 404 ");
        assert!(raw.contains(r#"{"error":"Not found"}"#), "{raw}");
    }

    #[test]
    fn investment_link_round_trips_through_evaluation() {
        let response = investment("mode=stepup&m=7000&s=5&r=11&y=12");
        assert_eq!(response.result.schedule.len(), 12);
        assert_eq!(
            response.query,
            "mode=stepup&rate=11&years=12&amt=7000&step=5"
        );
        let again = investment(&response.query);
        assert_eq!(again.result, response.result);
    }

    #[test]
    fn investment_link_is_normalized_before_sharing() {
        let response = investment("years=90&rate=140");
        assert_eq!(response.query, "mode=sip&rate=100&years=60&amt=5000");
    }

    #[test]
    fn investment_issues_block_calculation() {
        let inputs = InvestmentInputs::Sip(SipPlan {
            monthly_investment: 0.0,
            annual_return_rate: 12.0,
            years: 10,
        });
        let issues = evaluate_investment(&inputs).expect_err("zero SIP must be rejected");
        assert_eq!(issues, vec!["Monthly SIP amount must be greater than 0."]);
    }

    #[test]
    fn loan_link_evaluates_reference_emi() {
        let response = loan("");
        assert_eq!(response.result.emi.round(), 8_678.0);
        assert_eq!(
            response.query,
            "mode=emi&principal=1000000&rate=8.5&years=20"
        );
    }

    #[test]
    fn loan_issues_block_calculation() {
        let inputs = LoanInputs::Emi(LoanTerms {
            principal: 0.0,
            annual_interest_rate: 8.5,
            years: 20,
        });
        let issues = evaluate_loan(&inputs).expect_err("zero principal must be rejected");
        assert_eq!(issues, vec!["Loan amount must be greater than 0."]);
    }

    #[test]
    fn investment_response_serialization_uses_wire_names() {
        let json = to_json(&investment("mode=hybrid&years=3"));
        let result = &json["result"];
        let first_row = &result["schedule"][0];
        assert_eq!(result["inputs"]["mode"], "hybrid");
        assert_eq!(result["inputs"]["lumpsumEveryYears"], 1);
        assert!(first_row.get("lumpsumThisYear").is_some());
        assert!(first_row.get("sipMonthlyForYear").is_some());
        assert!(result.get("maturityValue").is_some());
        let query = json["query"].as_str().unwrap_or_default();
        assert!(query.starts_with("mode=hybrid"), "{query}");
    }

    #[test]
    fn loan_response_serialization_flattens_neutralizer() {
        let json = to_json(&loan("years=1"));
        let result = &json["result"];
        assert!(result.get("mfMaturityValue").is_none());
        assert!(result["monthlySchedule"][0].get("mfValue").is_none());

        let json = to_json(&loan("mode=neutralize&years=1"));
        let result = &json["result"];
        let first_month = &result["monthlySchedule"][0];
        assert!(result.get("mfMaturityValue").is_some());
        assert!(
            result
                .get("mfRequiredMonthlyInvestmentToMatchInterest")
                .is_some()
        );
        assert!(result["schedule"][0].get("mfGains").is_some());
        let invested = first_month["mfInvestedTotal"].as_f64().unwrap_or(0.0);
        assert_approx(invested, 10_000.0);
    }

    #[test]
    fn json_body_inputs_deserialize_by_mode_tag() {
        let inputs: InvestmentInputs = serde_json::from_str(
            r#"{"mode":"lumpsum","lumpsumInvestment":250000,"annualReturnRate":10,"years":5}"#,
        )
        .expect("json should parse");
        let response = evaluate_investment(&inputs).expect("valid inputs");
        assert_approx(response.result.maturity_value, 250_000.0 * 1.1_f64.powi(5));

        let loan: LoanInputs = serde_json::from_str(
            r#"{"mode":"neutralize","principal":500000,"annualInterestRate":9,"years":10,
                "mfMonthlyInvestment":5000,"mfAnnualReturnRate":12}"#,
        )
        .expect("json should parse");
        assert_eq!(loan.terms().principal, 500_000.0);
        let response = evaluate_loan(&loan).expect("valid inputs");
        assert!(response.result.neutralizer.is_some());
    }
}
