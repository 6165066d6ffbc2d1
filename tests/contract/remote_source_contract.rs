//! Contract tests for the Alpha Vantage remote source
//!
//! Every remote source must honor the same contract: CSV endpoints return raw
//! bytes untouched, service notices and non-2xx responses surface as typed
//! transport errors, and the profile endpoint tolerates missing fields.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use stockwatch_core::{
    AlphaVantageApi, ApiConfig, CompanyInfo, HttpClient, HttpError, HttpRequest, HttpResponse,
    StockApi, Symbol, TransportErrorKind,
};

// =============================================================================
// Recording transport
// =============================================================================

/// Replays scripted responses in order and records every request.
struct RecordingHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    fn replying(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request log")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

impl HttpClient for RecordingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("request log").push(request);
        let next = self
            .responses
            .lock()
            .expect("scripted responses")
            .pop_front()
            .unwrap_or_else(|| {
                Err(HttpError::Request(String::from("no scripted response left")))
            });
        Box::pin(async move { next })
    }
}

fn api(http: Arc<RecordingHttpClient>) -> AlphaVantageApi {
    let config = ApiConfig::from_lookup(|key| match key {
        "STOCKWATCH_ALPHAVANTAGE_BASE_URL" => Some(String::from("https://av.contract/")),
        "STOCKWATCH_ALPHAVANTAGE_API_KEY" => Some(String::from("contract-key")),
        _ => None,
    });
    AlphaVantageApi::new(http, config)
}

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

// =============================================================================
// Contract: Request Shape
// =============================================================================

#[tokio::test]
async fn contract_each_endpoint_is_one_get_against_the_query_path() {
    // Given: A transport answering three requests
    let http = RecordingHttpClient::replying(vec![
        Ok(HttpResponse::ok("symbol,name,exchange\n")),
        Ok(HttpResponse::ok("timestamp,open,high,low,close,volume\n")),
        Ok(HttpResponse::ok(r#"{"Symbol": "IBM"}"#)),
    ]);
    let api = api(http.clone());
    let ibm = symbol("IBM");

    // When: All three endpoints are called once
    api.listing_snapshot().await.expect("snapshot");
    api.intraday_series(&ibm).await.expect("series");
    api.company_profile(&ibm).await.expect("profile");

    // Then: Each call is a single request with the documented query
    assert_eq!(
        http.urls(),
        vec![
            String::from("https://av.contract/query?function=LISTING_STATUS&apikey=contract-key"),
            String::from(
                "https://av.contract/query?function=TIME_SERIES_INTRADAY&symbol=IBM&interval=60min&datatype=csv&apikey=contract-key"
            ),
            String::from("https://av.contract/query?function=OVERVIEW&symbol=IBM&apikey=contract-key"),
        ]
    );
}

#[tokio::test]
async fn contract_requests_carry_the_configured_timeout() {
    // Given: A source configured with a short timeout
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok("symbol,name,exchange\n"))]);
    let api = AlphaVantageApi::new(http.clone(), ApiConfig::default().with_timeout_ms(750));

    // When: The snapshot is requested
    api.listing_snapshot().await.expect("snapshot");

    // Then: The transport received that timeout
    let requests = http.requests.lock().expect("request log");
    assert_eq!(requests[0].timeout_ms, 750);
}

// =============================================================================
// Contract: CSV Endpoints
// =============================================================================

#[tokio::test]
async fn contract_csv_body_is_returned_byte_for_byte() {
    // Given: A snapshot body with CRLF endings and a trailing blank line
    let body = b"symbol,name,exchange\r\nA,Agilent Technologies Inc,NYSE\r\n\r\n".to_vec();
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok(body.clone()))]);

    // When: The snapshot is fetched
    let bytes = api(http).listing_snapshot().await.expect("snapshot");

    // Then: No decoding or trimming happened in the source
    assert_eq!(bytes, body);
}

#[tokio::test]
async fn contract_service_notice_on_csv_endpoint_is_an_error_payload() {
    for notice in [
        r#"{"Note": "API call frequency exceeded"}"#,
        r#"{"Information": "The demo API key is for demo purposes only."}"#,
        r#"{"Error Message": "Invalid API call."}"#,
    ] {
        // Given: The service answers with a JSON notice instead of CSV
        let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok(notice))]);

        // When: The intraday series is requested
        let error = api(http)
            .intraday_series(&symbol("IBM"))
            .await
            .expect_err("notice must not pass as csv");

        // Then: The error is classified as a service payload
        assert_eq!(error.kind(), TransportErrorKind::ErrorPayload, "{notice}");
        assert_eq!(error.code(), "transport.error_payload");
    }
}

#[tokio::test]
async fn contract_non_success_status_is_a_status_error() {
    // Given: A gateway failure
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::new(502, "bad gateway"))]);

    // When: The snapshot is requested
    let error = api(http).listing_snapshot().await.expect_err("502");

    // Then: The status is reported
    assert_eq!(error.kind(), TransportErrorKind::Status);
    assert!(error.message().contains("502"));
}

#[tokio::test]
async fn contract_transport_failure_is_unreachable_and_hides_the_key() {
    // Given: A transport that cannot connect
    let http = RecordingHttpClient::replying(vec![Err(HttpError::Connect(String::from(
        "connection refused",
    )))]);

    // When: The snapshot is requested
    let error = api(http).listing_snapshot().await.expect_err("offline");

    // Then: The failure is typed and the API key never appears in it
    assert_eq!(error.kind(), TransportErrorKind::Unreachable);
    assert!(!error.to_string().contains("contract-key"));
}

// =============================================================================
// Contract: Company Profile
// =============================================================================

#[tokio::test]
async fn contract_profile_with_nulls_maps_to_empty_strings() {
    // Given: A profile where everything but the symbol is null or absent
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok(
        r#"{"Symbol": "AAPL", "Description": null, "Name": null}"#,
    ))]);

    // When: The profile is fetched and converted
    let info: CompanyInfo = api(http)
        .company_profile(&symbol("AAPL"))
        .await
        .expect("profile")
        .into();

    // Then: Missing fields become empty strings
    assert_eq!(
        info,
        CompanyInfo {
            symbol: String::from("AAPL"),
            ..CompanyInfo::default()
        }
    );
}

#[tokio::test]
async fn contract_profile_ignores_unknown_fields() {
    // Given: A full OVERVIEW body with many fields the domain does not use
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok(
        r#"{
            "Symbol": "IBM",
            "AssetType": "Common Stock",
            "Name": "International Business Machines",
            "Description": "IBM is an American multinational technology company.",
            "Exchange": "NYSE",
            "Country": "USA",
            "Sector": "TECHNOLOGY",
            "Industry": "COMPUTER & OFFICE EQUIPMENT",
            "MarketCapitalization": "151592813000"
        }"#,
    ))]);

    // When: The profile is fetched
    let dto = api(http)
        .company_profile(&symbol("IBM"))
        .await
        .expect("profile");

    // Then: The known fields are populated
    assert_eq!(dto.name.as_deref(), Some("International Business Machines"));
    assert_eq!(dto.country.as_deref(), Some("USA"));
    assert_eq!(dto.industry.as_deref(), Some("COMPUTER & OFFICE EQUIPMENT"));
}

#[tokio::test]
async fn contract_empty_profile_object_is_not_an_error() {
    // Given: The service returns {} for an unknown symbol
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok("{}"))]);

    // When: The profile is fetched
    let dto = api(http)
        .company_profile(&symbol("ZZZZ"))
        .await
        .expect("empty object decodes");

    // Then: Every field is absent
    assert_eq!(dto, Default::default());
}

#[tokio::test]
async fn contract_profile_body_that_is_not_json_is_malformed() {
    // Given: An HTML error page
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok(
        "<html><body>Service Unavailable</body></html>",
    ))]);

    // When: The profile is fetched
    let error = api(http)
        .company_profile(&symbol("IBM"))
        .await
        .expect_err("html");

    // Then: The body is rejected as malformed
    assert_eq!(error.kind(), TransportErrorKind::Malformed);
}
