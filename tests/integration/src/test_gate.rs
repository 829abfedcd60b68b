//! Signature gate integration tests.

#[cfg(test)]
mod tests {
    use crate::{endpoint_url, http_client, post_form, sign};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_signed_request() {
        let client = http_client();
        let pairs = [("Body", "hello"), ("From", "+15551234567")];
        let signature = sign("/hook", &pairs);

        let response = post_form(&client, "/hook", &pairs, Some(&signature)).await;

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_signed_request_with_query_string() {
        let client = http_client();
        let pairs = [("Body", "hello"), ("id", "7")];
        let signature = sign("/hook?id=7", &pairs);

        let response = post_form(&client, "/hook?id=7", &pairs, Some(&signature)).await;

        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_tampered_body() {
        let client = http_client();
        let signature = sign("/hook", &[("Body", "hello")]);

        let response = post_form(&client, "/hook", &[("Body", "HELLO")], Some(&signature)).await;

        assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
        let body = response.bytes().await.expect("test read body");
        assert!(body.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_missing_signature() {
        let client = http_client();

        let response = post_form(&client, "/hook", &[("Body", "hello")], None).await;

        assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_health() {
        let client = http_client();

        let response = client
            .get(format!("{}/health", endpoint_url()))
            .send()
            .await
            .expect("test health request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body = response.text().await.expect("test read body");
        assert!(body.contains("running"));
    }
}
