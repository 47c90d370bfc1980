//! End-to-end query pipeline tests against a wiremock server.

use std::time::Duration;

use assert2::{check, let_assert};
use querent::endpoints::compliance::{ComplianceJobs, ComplianceResponse, JobStatus};
use querent::endpoints::likes::LikedResponse;
use querent::{ApiClient, CancellationToken, Error, HyperClient, Predicate};
use serde::Deserialize;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

fn api(server: &MockServer, client: HyperClient) -> ApiClient<HyperClient> {
    ApiClient::new(client, format!("{}/2/", server.uri())).expect("base url")
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .expect("valid date")
}

#[tokio::test]
async fn multiple_jobs_query_string_is_canonical() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/compliance/jobs"))
        .and(query_param("end_time", "2021-01-01T12:59:59Z"))
        .and(query_param("start_time", "2020-12-31T00:00:01Z"))
        .and(query_param("status", "in_progress,expired"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                { "id": "1", "status": "in_progress" },
                { "id": "2", "status": "expired" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let predicate = ComplianceJobs::multiple_jobs()
        .and(Predicate::eq("EndTime", at(2021, 1, 1, 12, 59, 59)))
        .and(Predicate::eq("StartTime", at(2020, 12, 31, 0, 0, 1)))
        .and(ComplianceJobs::status_in(&[JobStatus::InProgress, JobStatus::Expired]));

    let response: ComplianceResponse = api(&server, HyperClient::new())
        .query::<ComplianceJobs, _>(Some(&predicate), &CancellationToken::new())
        .await
        .expect("jobs");

    check!(response.jobs().len() == 2);

    let requests = server.received_requests().await.expect("recording");
    let_assert!([request] = requests.as_slice());
    check!(
        request.url.query()
            == Some(
                "end_time=2021-01-01T12%3A59%3A59Z&start_time=2020-12-31T00%3A00%3A01Z&status=in_progress%2Cexpired"
            )
    );
}

#[tokio::test]
async fn single_job_uses_path_and_no_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/compliance/jobs/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "id": "123", "type": "tweets", "status": "complete" }
        })))
        .mount(&server)
        .await;

    let result = api(&server, HyperClient::new())
        .query_raw::<ComplianceJobs, ComplianceResponse>(
            Some(&ComplianceJobs::single_job("123")),
            &CancellationToken::new(),
        )
        .await
        .expect("job");

    let_assert!(Some(job) = result.value.job());
    check!(job.id == "123");
    check!(job.status == Some(JobStatus::Complete));
    check!(!result.raw.is_empty());

    let requests = server.received_requests().await.expect("recording");
    let_assert!([request] = requests.as_slice());
    check!(request.url.query().is_none());
}

#[tokio::test]
async fn missing_id_fails_before_sending() {
    let server = MockServer::start().await;

    let_assert!(
        Err(Error::MissingRequiredField { field }) = api(&server, HyperClient::new())
            .query::<ComplianceJobs, ComplianceResponse>(
                Some(&Predicate::eq("Type", "SingleJob")),
                &CancellationToken::new(),
            )
            .await
    );
    check!(field == "ID");

    let requests = server.received_requests().await.expect("recording");
    check!(requests.is_empty());
}

#[tokio::test]
async fn http_error_keeps_status_and_payload() {
    #[derive(Debug, Deserialize)]
    struct Problem {
        title: String,
    }

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/compliance/jobs/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "title": "Not Found Error",
            "detail": "Could not find job with id: [404]."
        })))
        .mount(&server)
        .await;

    let_assert!(
        Err(err) = api(&server, HyperClient::new())
            .query::<ComplianceJobs, ComplianceResponse>(
                Some(&ComplianceJobs::single_job("404")),
                &CancellationToken::new(),
            )
            .await
    );

    check!(err.status() == Some(404));
    check!(err.is_client_error());
    let_assert!(Some(Ok(problem)) = err.decode_body::<Problem>());
    check!(problem.title == "Not Found Error");
}

#[tokio::test]
async fn malformed_payload_is_a_deserialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/compliance/jobs/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{"id":1}}"#))
        .mount(&server)
        .await;

    let_assert!(
        Err(Error::Deserialization { payload, .. }) = api(&server, HyperClient::new())
            .query::<ComplianceJobs, ComplianceResponse>(
                Some(&ComplianceJobs::single_job("1")),
                &CancellationToken::new(),
            )
            .await
    );
    check!(payload.as_ref() == br#"{"data":{"id":1}}"#);
}

#[tokio::test]
async fn like_posts_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2/users/15/likes"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "tweet_id": "20" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": { "liked": true } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = api(&server, HyperClient::new())
        .like("15", "20", &CancellationToken::new())
        .await
        .expect("liked");

    check!(response.liked() == Some(true));
}

#[tokio::test]
async fn empty_write_response_is_default() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/2/users/15/likes/20"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let response = api(&server, HyperClient::new())
        .unlike("15", "20", &CancellationToken::new())
        .await
        .expect("unliked");

    check!(response == LikedResponse::default());
}

#[tokio::test]
async fn blank_like_argument_fails_before_sending() {
    let server = MockServer::start().await;

    let_assert!(
        Err(Error::MissingRequiredField { field }) = api(&server, HyperClient::new())
            .like("15", "  ", &CancellationToken::new())
            .await
    );
    check!(field == "TweetID");
    check!(server.received_requests().await.expect("recording").is_empty());
}

#[tokio::test]
async fn cancellation_is_distinct_from_transport_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/compliance/jobs/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let_assert!(
        Err(err) = api(&server, HyperClient::new())
            .query::<ComplianceJobs, ComplianceResponse>(
                Some(&ComplianceJobs::single_job("slow")),
                &cancel,
            )
            .await
    );
    check!(err.is_cancelled());
    check!(!err.is_transport());
}

#[tokio::test]
async fn transport_timeout_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/compliance/jobs/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let client = HyperClient::builder()
        .timeout(Duration::from_millis(100))
        .build();

    let_assert!(
        Err(err) = api(&server, client)
            .query::<ComplianceJobs, ComplianceResponse>(
                Some(&ComplianceJobs::single_job("slow")),
                &CancellationToken::new(),
            )
            .await
    );
    check!(err.is_timeout());
    check!(err.is_transport());
}

#[tokio::test]
async fn unreachable_host_is_a_connection_error() {
    let api = ApiClient::new(HyperClient::new(), "http://127.0.0.1:9/2/").expect("base url");

    let_assert!(
        Err(err) = api
            .query::<ComplianceJobs, ComplianceResponse>(
                Some(&ComplianceJobs::single_job("1")),
                &CancellationToken::new(),
            )
            .await
    );
    check!(err.is_transport());
}
